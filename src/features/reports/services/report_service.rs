use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::notifications::NotificationService;
use crate::features::reports::dtos::SubmitReportDto;
use crate::features::reports::models::{
    parse_coordinates, NewWasteReport, ReportCounts, ReportStatus, WasteReport,
};
use crate::features::reports::services::ReportRepository;
use crate::modules::storage::{LocalStorage, UploadedFile};
use crate::shared::constants::MSG_REQUIRED_FIELDS;

/// Report lifecycle: validation, image storage, persistence and
/// notifications for every citizen and admin action.
pub struct ReportService {
    repository: ReportRepository,
    storage: Arc<LocalStorage>,
    notifications: Arc<NotificationService>,
}

impl ReportService {
    pub fn new(
        repository: ReportRepository,
        storage: Arc<LocalStorage>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            repository,
            storage,
            notifications,
        }
    }

    /// Accept a citizen submission and return the new report id.
    ///
    /// Disallowed image types and image write failures leave the report
    /// without an image. The confirmation mail is best-effort.
    pub async fn submit(&self, dto: SubmitReportDto, image: Option<UploadedFile>) -> Result<i64> {
        let dto = dto.normalized();

        if dto.is_missing_required() {
            return Err(AppError::Validation(MSG_REQUIRED_FIELDS.to_string()));
        }
        if let Err(errors) = dto.validate() {
            let mut fields: Vec<_> = errors.field_errors().into_keys().collect();
            fields.sort();
            return Err(AppError::Validation(format!(
                "These fields are too long: {}",
                fields.join(", ")
            )));
        }

        let coordinates = parse_coordinates(dto.latitude.as_deref(), dto.longitude.as_deref());
        if coordinates.is_none() && (dto.latitude.is_some() || dto.longitude.is_some()) {
            tracing::debug!(
                "Ignoring invalid coordinates: lat={:?}, lon={:?}",
                dto.latitude,
                dto.longitude
            );
        }

        let image_filename = match image {
            Some(file) => match self.storage.store(&file).await {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!("Continuing without image: {}", e);
                    None
                }
            },
            None => None,
        };

        let data = NewWasteReport {
            name: dto.name,
            email: Some(dto.email),
            phone: dto.phone,
            location: dto.location,
            description: dto.description,
            image_filename: image_filename.clone(),
            latitude: coordinates.map(|(lat, _)| lat),
            longitude: coordinates.map(|(_, lon)| lon),
            date_reported: Utc::now(),
        };

        let report = match self.repository.create(&data).await {
            Ok(report) => report,
            Err(e) => {
                if let Some(filename) = &image_filename {
                    self.storage.delete(filename).await;
                }
                return Err(e);
            }
        };

        tracing::info!(
            "Created waste report: id={}, location={}, image={}",
            report.id,
            report.location,
            report.image_filename.is_some()
        );

        self.notifications.notify_created(&report).await;

        Ok(report.id)
    }

    /// Apply a new status and tell the reporter about it
    pub async fn change_status(&self, id: i64, new_status: &str) -> Result<WasteReport> {
        // Existence first: a missing report is NotFound whatever the label
        self.repository.get(id).await?;

        let status: ReportStatus = new_status.trim().parse().map_err(AppError::Validation)?;

        let report = self.repository.update_status(id, status.as_str()).await?;

        tracing::info!("Updated waste report status: id={}, status={}", id, status);

        self.notifications.notify_status_changed(&report).await;

        Ok(report)
    }

    /// Delete a report and, best-effort, its image
    pub async fn remove(&self, id: i64) -> Result<()> {
        let report = self.repository.get(id).await?;

        if let Some(filename) = &report.image_filename {
            self.storage.delete(filename).await;
        }

        self.repository.delete(id).await?;

        tracing::info!("Deleted waste report: id={}", id);
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<WasteReport> {
        self.repository.get(id).await
    }

    /// Reports newest first, optionally with exactly `status_filter`
    pub async fn list_for_admin(&self, status_filter: Option<&str>) -> Result<Vec<WasteReport>> {
        self.repository.list(status_filter).await
    }

    pub async fn dashboard_counts(&self) -> Result<ReportCounts> {
        Ok(ReportCounts {
            total: self.repository.count(None).await?,
            pending: self
                .repository
                .count(Some(ReportStatus::Pending.as_str()))
                .await?,
            verified: self
                .repository
                .count(Some(ReportStatus::Verified.as_str()))
                .await?,
            collected: self
                .repository
                .count(Some(ReportStatus::Collected.as_str()))
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::Mailer;
    use crate::shared::test_helpers::{
        submission, temp_upload_storage, test_pool, FailingMailer, RecordingMailer,
    };
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    async fn service_with(mailer: Option<Arc<dyn Mailer>>) -> (ReportService, Arc<LocalStorage>) {
        let storage = Arc::new(temp_upload_storage().await);
        let notifications = Arc::new(NotificationService::new(mailer, Duration::from_secs(1)));
        let service = ReportService::new(
            ReportRepository::new(test_pool().await),
            Arc::clone(&storage),
            notifications,
        );
        (service, storage)
    }

    fn image(filename: &str) -> Option<UploadedFile> {
        Some(UploadedFile {
            data: b"GIF89a".to_vec(),
            filename: filename.to_string(),
        })
    }

    #[tokio::test]
    async fn test_submit_creates_single_pending_report() {
        let (service, _) = service_with(None).await;

        let id = assert_ok!(service.submit(submission(), None).await);

        let reports = service.list_for_admin(None).await.unwrap();
        let matching: Vec<_> = reports.iter().filter(|r| r.id == id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].status, "Pending");
    }

    #[tokio::test]
    async fn test_submit_ids_are_unique() {
        let (service, _) = service_with(None).await;

        let first = service.submit(submission(), None).await.unwrap();
        let second = service.submit(submission(), None).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_submit_with_missing_field_creates_nothing() {
        let (service, _) = service_with(None).await;

        for blank in ["name", "email", "location", "description"] {
            let mut dto = submission();
            match blank {
                "name" => dto.name = "   ".into(),
                "email" => dto.email = String::new(),
                "location" => dto.location = String::new(),
                _ => dto.description = String::new(),
            }

            let result = service.submit(dto, None).await;
            assert!(
                matches!(result, Err(AppError::Validation(ref msg)) if msg == MSG_REQUIRED_FIELDS),
                "blank {} should be rejected",
                blank
            );
        }

        assert_eq!(service.dashboard_counts().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_overlong_name() {
        let (service, _) = service_with(None).await;
        let mut dto = submission();
        dto.name = "n".repeat(150);

        let err = assert_err!(service.submit(dto, None).await);

        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("name")));
    }

    #[tokio::test]
    async fn test_disallowed_image_is_ignored() {
        let (service, _) = service_with(None).await;

        let id = service
            .submit(submission(), image("photo.exe"))
            .await
            .unwrap();

        assert_eq!(service.get(id).await.unwrap().image_filename, None);
    }

    #[tokio::test]
    async fn test_mixed_case_image_extension_is_stored() {
        let (service, storage) = service_with(None).await;

        let id = service
            .submit(submission(), image("photo.JPG"))
            .await
            .unwrap();

        let filename = service.get(id).await.unwrap().image_filename.unwrap();
        assert!(filename.ends_with(".jpg"));
        assert!(storage.exists(&filename));
    }

    #[tokio::test]
    async fn test_malformed_latitude_drops_both_coordinates() {
        let (service, _) = service_with(None).await;
        let mut dto = submission();
        dto.latitude = Some("abc".into());
        dto.longitude = Some("36.82".into());

        let id = service.submit(dto, None).await.unwrap();

        let report = service.get(id).await.unwrap();
        assert_eq!(report.latitude, None);
        assert_eq!(report.longitude, None);
    }

    #[tokio::test]
    async fn test_valid_coordinates_are_stored() {
        let (service, _) = service_with(None).await;
        let mut dto = submission();
        dto.latitude = Some("-1.2921".into());
        dto.longitude = Some("36.8219".into());

        let id = service.submit(dto, None).await.unwrap();

        let report = service.get(id).await.unwrap();
        assert_eq!(report.latitude, Some(-1.2921));
        assert_eq!(report.longitude, Some(36.8219));
    }

    #[tokio::test]
    async fn test_submit_sends_confirmation() {
        let mailer = Arc::new(RecordingMailer::default());
        let (service, _) = service_with(Some(mailer.clone() as Arc<dyn Mailer>)).await;

        service.submit(submission(), None).await.unwrap();

        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].subject, "Waste report received");
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_block_submit() {
        let (service, _) = service_with(Some(Arc::new(FailingMailer) as Arc<dyn Mailer>)).await;

        let id = assert_ok!(service.submit(submission(), None).await);

        assert_eq!(service.get(id).await.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_change_status_only_touches_status() {
        let mailer = Arc::new(RecordingMailer::default());
        let (service, _) = service_with(Some(mailer.clone() as Arc<dyn Mailer>)).await;
        let id = service.submit(submission(), image("pile.png")).await.unwrap();
        let before = service.get(id).await.unwrap();

        let updated = service.change_status(id, "Verified").await.unwrap();

        assert_eq!(updated.status, "Verified");
        assert_eq!(
            WasteReport {
                status: before.status.clone(),
                ..updated.clone()
            },
            before
        );
        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].body.contains("Verified"));
    }

    #[tokio::test]
    async fn test_change_status_on_missing_report() {
        let (service, _) = service_with(None).await;
        let id = service.submit(submission(), None).await.unwrap();

        let result = service.change_status(id + 100, "Verified").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(service.get(id).await.unwrap().status, "Pending");
    }

    #[tokio::test]
    async fn test_change_status_rejects_unknown_label() {
        let (service, _) = service_with(None).await;
        let id = service.submit(submission(), None).await.unwrap();

        let result = service.change_status(id, "Lost").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(service.get(id).await.unwrap().status, "Pending");
    }

    #[tokio::test]
    async fn test_change_status_missing_report_wins_over_unknown_label() {
        let (service, _) = service_with(None).await;

        let result = service.change_status(999, "Lost").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_any_status_can_move_to_any_other() {
        let (service, _) = service_with(None).await;
        let id = service.submit(submission(), None).await.unwrap();

        for status in ["Collected", "Pending", "Verified", "Collected", "Verified"] {
            let report = service.change_status(id, status).await.unwrap();
            assert_eq!(report.status, status);
        }
    }

    #[tokio::test]
    async fn test_remove_deletes_row_and_image() {
        let (service, storage) = service_with(None).await;
        let id = service.submit(submission(), image("pile.gif")).await.unwrap();
        let filename = service.get(id).await.unwrap().image_filename.unwrap();
        assert!(storage.exists(&filename));

        service.remove(id).await.unwrap();

        assert!(!storage.exists(&filename));
        assert!(matches!(service.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.remove(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_survives_missing_image_file() {
        let (service, storage) = service_with(None).await;
        let id = service.submit(submission(), image("pile.png")).await.unwrap();
        let filename = service.get(id).await.unwrap().image_filename.unwrap();
        tokio::fs::remove_file(storage.root().join(&filename))
            .await
            .unwrap();

        assert_ok!(service.remove(id).await);
        assert_eq!(service.dashboard_counts().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_list_for_admin_filters_exactly() {
        let (service, _) = service_with(None).await;
        let a = service.submit(submission(), None).await.unwrap();
        let b = service.submit(submission(), None).await.unwrap();
        let _c = service.submit(submission(), None).await.unwrap();
        service.change_status(a, "Collected").await.unwrap();
        service.change_status(b, "Collected").await.unwrap();

        let collected = service.list_for_admin(Some("Collected")).await.unwrap();

        assert_eq!(
            collected.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![b, a]
        );
        assert!(collected.iter().all(|r| r.status == "Collected"));
        assert!(service
            .list_for_admin(Some("collected"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let (service, _) = service_with(None).await;
        service.submit(submission(), None).await.unwrap();
        service.submit(submission(), None).await.unwrap();
        let verified = service.submit(submission(), None).await.unwrap();
        service.change_status(verified, "Verified").await.unwrap();

        let counts = service.dashboard_counts().await.unwrap();

        assert_eq!(
            counts,
            ReportCounts {
                total: 3,
                pending: 2,
                verified: 1,
                collected: 0,
            }
        );
    }
}
