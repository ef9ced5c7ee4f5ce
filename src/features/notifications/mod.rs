pub mod clients;
pub mod services;

pub use clients::{HttpMailer, MailError, MailMessage, Mailer};
pub use services::NotificationService;
