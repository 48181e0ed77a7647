use chrono::Utc;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use review_insights::config::AppConfig;
use review_insights::db::connect_existing;
use review_insights::export::{export_all, ExportSummary};
use review_insights::loader::{self, LoadError};
use review_insights::model::DashboardData;
use review_insights::search::SearchSource;
use review_insights::DataKind;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::{error, info};

/// Side effects the app performs: file loads for the dashboard and the export.
#[derive(Debug)]
pub struct AppActions {
    pub data_dir: PathBuf,
    pub database_url: String,
    pub db_pool: Option<SqlitePool>,
}

impl AppActions {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            database_url: config.database_url.clone(),
            db_pool: None,
        }
    }

    pub async fn initialize_db(&mut self) -> Result<()> {
        self.db_pool = Some(connect_existing(&self.database_url).await?);
        Ok(())
    }

    pub async fn load_dashboard(&self, kind: DataKind) -> Result<DashboardData, LoadError> {
        let result = loader::load_dashboard(&self.data_dir, kind).await;
        match &result {
            Ok(data) => info!(
                kind = %kind,
                categories = data.categories.len(),
                months = data.time_series.len(),
                "dashboard data loaded"
            ),
            Err(e) => error!(kind = %kind, error = %e, "failed to load dashboard data"),
        }
        result
    }

    pub async fn load_sources(&self) -> Result<Vec<SearchSource>, LoadError> {
        let result = loader::load_sources(&self.data_dir).await;
        match &result {
            Ok(sources) => info!(sources = sources.len(), "search sources loaded"),
            Err(e) => error!(error = %e, "failed to load search sources"),
        }
        result
    }

    pub async fn export(&self) -> Result<ExportSummary> {
        let pool = self.pool()?;
        export_all(pool, &self.data_dir, Utc::now().naive_utc())
            .await
            .map_err(Into::into)
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| eyre!("Database not initialized"))
    }
}
