use async_trait::async_trait;
use axum_test::{TestResponse, TestServer};
use chrono::Utc;
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::app::{build_router, AppServices};
use crate::core::config::{AppConfig, SwaggerConfig, UploadConfig};
use crate::core::database::run_migrations;
use crate::features::notifications::{MailError, MailMessage, Mailer, NotificationService};
use crate::features::reports::dtos::SubmitReportDto;
use crate::features::reports::models::WasteReport;
use crate::features::reports::{ReportRepository, ReportService};
use crate::modules::storage::LocalStorage;
use crate::shared::constants::FLASH_COOKIE_NAME;
use crate::shared::flash::FlashSigner;
use crate::shared::templates::TemplateEngine;

// =============================================================================
// DATABASE & STORAGE
// =============================================================================

/// Fresh in-memory database with the schema applied
pub async fn test_pool() -> SqlitePool {
    // One connection that never expires, or the in-memory database is lost
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    run_migrations(&pool).await.expect("migrations");
    pool
}

/// Upload storage rooted in a unique temporary directory
pub async fn temp_upload_storage() -> LocalStorage {
    let dir = std::env::temp_dir().join(format!("takasmart-test-{}", uuid::Uuid::new_v4().simple()));
    LocalStorage::new(UploadConfig { dir })
        .await
        .expect("temp upload dir")
}

pub fn templates_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/pages"))
}

// =============================================================================
// FIXTURES
// =============================================================================

/// A complete, valid citizen submission
pub fn submission() -> SubmitReportDto {
    SubmitReportDto {
        name: Name().fake(),
        email: SafeEmail().fake(),
        phone: Some("+254711000111".to_string()),
        location: StreetName().fake(),
        description: Sentence(3..8).fake(),
        latitude: None,
        longitude: None,
    }
}

pub fn sample_report(email: Option<&str>) -> WasteReport {
    WasteReport {
        id: 7,
        name: "Amina Odhiambo".to_string(),
        email: email.map(String::from),
        phone: None,
        location: "Gikomba market".to_string(),
        description: "Overflowing skip next to the stalls".to_string(),
        image_filename: None,
        latitude: None,
        longitude: None,
        status: "Pending".to_string(),
        date_reported: Utc::now(),
    }
}

// =============================================================================
// MAILERS
// =============================================================================

/// Keeps every message it is asked to send
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().expect("mailer lock").push(message.clone());
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
        Err(MailError::Transport("connection refused".to_string()))
    }
}

/// Sleeps before succeeding
pub struct SlowMailer(pub Duration);

#[async_trait]
impl Mailer for SlowMailer {
    async fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }
}

// =============================================================================
// HTTP
// =============================================================================

pub struct TestApp {
    pub server: TestServer,
    pub report_service: Arc<ReportService>,
    pub storage: Arc<LocalStorage>,
}

/// Full router over an in-memory database, temp uploads and no mail
pub async fn test_app() -> TestApp {
    let storage = Arc::new(temp_upload_storage().await);
    let notifications = Arc::new(NotificationService::new(None, Duration::from_secs(1)));
    let report_service = Arc::new(ReportService::new(
        ReportRepository::new(test_pool().await),
        Arc::clone(&storage),
        notifications,
    ));

    let app_config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_request_body_size: 1024 * 1024,
        templates_dir: templates_dir(),
        secret_key: "test-secret".to_string(),
    };
    let swagger_config = SwaggerConfig {
        username: None,
        password: None,
        title: "TakaSmart API".to_string(),
        version: "test".to_string(),
        description: "test".to_string(),
    };

    let services = AppServices {
        report_service: Arc::clone(&report_service),
        storage: Arc::clone(&storage),
        templates: Arc::new(TemplateEngine::new(app_config.templates_dir.clone())),
        flash: Arc::new(FlashSigner::new(&app_config.secret_key)),
    };

    let server = TestServer::new(build_router(services, &app_config, &swagger_config))
        .expect("test server");

    TestApp {
        server,
        report_service,
        storage,
    }
}

/// Value of the flash cookie set by a response, if any
pub fn flash_cookie(response: &TestResponse) -> Option<String> {
    let prefix = format!("{}=", FLASH_COOKIE_NAME);
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.strip_prefix(prefix.as_str()))
        .map(|v| v.split(';').next().unwrap_or("").to_string())
        .find(|v| !v.is_empty())
}
