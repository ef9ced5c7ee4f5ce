use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::MailConfig;
use crate::features::notifications::clients::{HttpMailer, MailError, MailMessage, Mailer};
use crate::features::reports::models::WasteReport;

/// Best-effort reporter notifications.
///
/// At most one send attempt per event, bounded by `timeout`. Failures are
/// logged and dropped; callers never see them.
pub struct NotificationService {
    mailer: Option<Arc<dyn Mailer>>,
    timeout: Duration,
}

impl NotificationService {
    pub fn new(mailer: Option<Arc<dyn Mailer>>, timeout: Duration) -> Self {
        Self { mailer, timeout }
    }

    /// Build from mail config; an unconfigured or broken mail API disables mail
    pub fn from_config(config: &MailConfig) -> Self {
        if !config.is_configured() {
            info!("Mail notifications disabled (MAIL_API_KEY/MAIL_DEFAULT_SENDER not set)");
            return Self::new(None, config.timeout);
        }

        let mailer: Option<Arc<dyn Mailer>> = match HttpMailer::from_config(config) {
            Ok(Some(mailer)) => {
                info!("Mail notifications enabled via {}", mailer.endpoint());
                Some(Arc::new(mailer))
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Mail notifications disabled: {}", e);
                None
            }
        };

        Self::new(mailer, config.timeout)
    }

    pub async fn notify_created(&self, report: &WasteReport) {
        if let Some(message) = created_message(report) {
            self.deliver(report.id, message).await;
        }
    }

    pub async fn notify_status_changed(&self, report: &WasteReport) {
        if let Some(message) = status_changed_message(report) {
            self.deliver(report.id, message).await;
        }
    }

    async fn deliver(&self, report_id: i64, message: MailMessage) {
        let Some(mailer) = &self.mailer else {
            debug!("Mail not configured, skipping notification for report {}", report_id);
            return;
        };

        let result = match tokio::time::timeout(self.timeout, mailer.send(&message)).await {
            Ok(result) => result,
            Err(_) => Err(MailError::Timeout(self.timeout)),
        };

        match result {
            Ok(()) => info!(
                "Sent '{}' notification for report {}",
                message.subject, report_id
            ),
            Err(e) => warn!(
                "Failed to send '{}' notification for report {}: {}",
                message.subject, report_id, e
            ),
        }
    }
}

fn created_message(report: &WasteReport) -> Option<MailMessage> {
    let to = report.contact_email()?;
    Some(MailMessage {
        to: to.to_string(),
        subject: "Waste report received".to_string(),
        body: format!(
            "Hello {},\n\n\
             Thank you for reporting waste at {}. Your report #{} has been received \
             and is currently {}.\n\n\
             TakaSmart",
            report.name, report.location, report.id, report.status
        ),
    })
}

fn status_changed_message(report: &WasteReport) -> Option<MailMessage> {
    let to = report.contact_email()?;
    Some(MailMessage {
        to: to.to_string(),
        subject: "Waste report status updated".to_string(),
        body: format!(
            "Hello {},\n\n\
             The status of your waste report #{} at {} has been updated to: {}.\n\n\
             TakaSmart",
            report.name, report.id, report.location, report.status
        ),
    })
}
