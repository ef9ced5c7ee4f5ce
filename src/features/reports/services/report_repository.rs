use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewWasteReport, WasteReport};

const REPORT_COLUMNS: &str = r#"
    id, name, email, phone, location, description, image_filename,
    latitude, longitude, status, date_reported
"#;

/// Persistence for waste reports.
///
/// Every write is a single statement, visible to the next read. Concurrent
/// status updates to the same report are last-write-wins.
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a report with status `Pending`
    pub async fn create(&self, data: &NewWasteReport) -> Result<WasteReport> {
        let sql = format!(
            r#"
            INSERT INTO waste_reports (
                name, email, phone, location, description, image_filename,
                latitude, longitude, status, date_reported
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'Pending', ?9)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, WasteReport>(&sql)
            .bind(&data.name)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(&data.location)
            .bind(&data.description)
            .bind(&data.image_filename)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(data.date_reported)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create waste report: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(report)
    }

    pub async fn get(&self, id: i64) -> Result<WasteReport> {
        let sql = format!("SELECT {} FROM waste_reports WHERE id = ?1", REPORT_COLUMNS);

        sqlx::query_as::<_, WasteReport>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get waste report: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// List reports newest first, optionally only those with exactly `status`
    pub async fn list(&self, status: Option<&str>) -> Result<Vec<WasteReport>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM waste_reports
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY date_reported DESC, id DESC
            "#,
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, WasteReport>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list waste reports: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Set the status verbatim; callers decide which labels are acceptable
    pub async fn update_status(&self, id: i64, status: &str) -> Result<WasteReport> {
        let sql = format!(
            "UPDATE waste_reports SET status = ?2 WHERE id = ?1 RETURNING {}",
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, WasteReport>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update waste report status: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM waste_reports WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete waste report: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        Ok(())
    }

    /// Count reports, optionally only those with exactly `status`
    pub async fn count(&self, status: Option<&str>) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM waste_reports WHERE (?1 IS NULL OR status = ?1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count waste reports: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;
    use chrono::{Duration, Utc};
    use fake::faker::address::en::StreetName;
    use fake::faker::lorem::en::Sentence;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn new_report(minutes_ago: i64) -> NewWasteReport {
        NewWasteReport {
            name: Name().fake(),
            email: None,
            phone: None,
            location: StreetName().fake(),
            description: Sentence(3..8).fake(),
            image_filename: None,
            latitude: None,
            longitude: None,
            date_reported: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids_and_pending_status() {
        let repo = ReportRepository::new(test_pool().await);

        let first = repo.create(&new_report(0)).await.unwrap();
        let second = repo.create(&new_report(0)).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.status, "Pending");
        assert_eq!(repo.get(first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = ReportRepository::new(test_pool().await);
        assert!(matches!(repo.get(42).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = ReportRepository::new(test_pool().await);
        let old = repo.create(&new_report(60)).await.unwrap();
        let newest = repo.create(&new_report(1)).await.unwrap();
        let middle = repo.create(&new_report(30)).await.unwrap();

        let ids: Vec<i64> = repo
            .list(None)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(ids, vec![newest.id, middle.id, old.id]);
    }

    #[tokio::test]
    async fn test_update_status_is_lenient_and_filterable() {
        let repo = ReportRepository::new(test_pool().await);
        let report = repo.create(&new_report(0)).await.unwrap();

        let updated = repo.update_status(report.id, "Archived").await.unwrap();
        assert_eq!(updated.status, "Archived");

        assert_eq!(repo.list(Some("Archived")).await.unwrap().len(), 1);
        assert!(repo.list(Some("Pending")).await.unwrap().is_empty());
        assert_eq!(repo.count(Some("Archived")).await.unwrap(), 1);
        assert_eq!(repo.count(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_status_missing_is_not_found() {
        let repo = ReportRepository::new(test_pool().await);
        assert!(matches!(
            repo.update_status(7, "Verified").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let repo = ReportRepository::new(test_pool().await);
        let report = repo.create(&new_report(0)).await.unwrap();

        repo.delete(report.id).await.unwrap();

        assert!(matches!(
            repo.delete(report.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(repo.count(None).await.unwrap(), 0);
    }
}
