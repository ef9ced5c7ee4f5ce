mod mail_client;

pub use mail_client::{HttpMailer, MailError, MailMessage, Mailer};
