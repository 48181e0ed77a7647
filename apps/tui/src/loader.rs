use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::DataKind;
use crate::model::{Category, DashboardData, Item, Meta, TimeSeries};
use crate::search::SearchSource;
use crate::wire::{CategoryFile, MomentsFile, SourcesFile, WireItem, WireSearchSource};

pub const SOURCES_FILE: &str = "sources.json";
pub const MAGIC_MOMENTS_CATEGORY: &str = "Magic Moments";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("time series in {path} is misaligned: {detail}")]
    Misaligned { path: PathBuf, detail: String },
}

/// Parses the date formats found in the exports. Anything else counts as no date.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn data_file(data_dir: &Path, kind: DataKind) -> PathBuf {
    data_dir.join(kind.file_name())
}

async fn read(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads one data kind from `data_dir`.
pub async fn load_dashboard(data_dir: &Path, kind: DataKind) -> Result<DashboardData, LoadError> {
    let path = data_file(data_dir, kind);
    debug!(path = %path.display(), "loading dashboard data");
    let json = read(&path).await?;
    let data = parse_dashboard(kind, &json, &path)?;
    info!(
        kind = %kind,
        categories = data.categories.len(),
        months = data.time_series.len(),
        "loaded dashboard data"
    );
    Ok(data)
}

pub fn parse_dashboard(
    kind: DataKind,
    json: &str,
    path: &Path,
) -> Result<DashboardData, LoadError> {
    let parse_error = |source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut data = if kind == DataKind::MagicMoments {
        let file: MomentsFile = serde_json::from_str(json).map_err(parse_error)?;
        moments_dashboard(file)
    } else {
        let file: CategoryFile = serde_json::from_str(json).map_err(parse_error)?;
        file.into_dashboard(kind)
    };

    if data.time_series.is_empty() && data.total_items() > 0 {
        data.time_series = TimeSeries::monthly(
            data.categories
                .iter()
                .map(|category| (category.name.as_str(), category.items.as_slice())),
        );
    }

    check_alignment(&data.time_series, path)?;
    Ok(data)
}

fn moments_dashboard(file: MomentsFile) -> DashboardData {
    let items: Vec<Item> = file.moments.into_iter().map(WireItem::into_item).collect();
    let category = Category {
        name: MAGIC_MOMENTS_CATEGORY.to_string(),
        count: items.len(),
        ai_summary: format!("{} moments where the product delighted its users.", items.len()),
        items,
    };
    let time_series = TimeSeries::monthly([(category.name.as_str(), category.items.as_slice())]);
    DashboardData {
        kind: DataKind::MagicMoments,
        categories: vec![category],
        time_series,
        meta: file.meta.map(Meta::from),
    }
}

fn check_alignment(series: &TimeSeries, path: &Path) -> Result<(), LoadError> {
    if series.is_aligned() {
        return Ok(());
    }
    let expected = series.raw_labels.len();
    let detail = if series.labels.len() == expected {
        let (name, data) = series
            .datasets
            .iter()
            .find(|(_, data)| data.len() != expected)
            .map(|(name, data)| (name.as_str(), data.len()))
            .unwrap_or_default();
        format!("dataset '{name}' has {data} points, expected {expected}")
    } else {
        format!(
            "{} labels but {expected} raw labels",
            series.labels.len()
        )
    };
    Err(LoadError::Misaligned {
        path: path.to_path_buf(),
        detail,
    })
}

/// Loads the search corpus.
pub async fn load_sources(data_dir: &Path) -> Result<Vec<SearchSource>, LoadError> {
    let path = data_dir.join(SOURCES_FILE);
    let json = read(&path).await?;
    let sources = parse_sources(&json, &path)?;
    info!(count = sources.len(), "loaded search sources");
    Ok(sources)
}

pub fn parse_sources(json: &str, path: &Path) -> Result<Vec<SearchSource>, LoadError> {
    let file: SourcesFile = serde_json::from_str(json).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file
        .sources
        .into_iter()
        .map(WireSearchSource::into_source)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COMPLAINTS: &str = r#"{
        "categories": [
            {"name": "Bugs", "count": 2, "aiSummary": "Crashes.", "complaints": [
                {"complaint": "crash", "quote": "crashes often", "sourceType": "reviews",
                 "date": "2025-10-03T10:00:00", "icon": "appstore.png",
                 "source": {"type": "review", "platform": "App Store", "rating": 1,
                            "body": "This app crashes often", "url": null}},
                {"complaint": "crash", "quote": "dies", "sourceType": "reddit_content",
                 "date": "not a date", "icon": "reddit.png",
                 "source": {"type": "post", "title": "Crash", "body": "it dies",
                            "community": "apps",
                            "url": "https://reddit.com/x", "upvotes": 3}}
            ]},
            {"name": "other", "count": 0, "aiSummary": "", "complaints": []}
        ],
        "timeSeries": {"labels": ["Sep 2025", "Oct 2025"], "rawLabels": ["2025-09", "2025-10"],
                       "datasets": {"Bugs": [0, 1], "other": [0, 0]}},
        "meta": {"totalComplaints": 2, "totalCategories": 2}
    }"#;

    #[test]
    fn parse_date_accepts_export_formats() {
        assert!(parse_date("2025-10-03T10:00:00").is_some());
        assert!(parse_date("2025-10-03T10:00:00.123456").is_some());
        assert!(parse_date("2025-10-03T10:00:00+00:00").is_some());
        assert!(parse_date("2025-10-03T10:00:00Z").is_some());
        assert!(parse_date("2025-10-03 10:00:00").is_some());
        assert_eq!(
            parse_date("2025-10-03").map(|d| d.format("%Y-%m-%d").to_string()),
            Some("2025-10-03".to_string())
        );
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[tokio::test]
    async fn load_dashboard_reads_kind_file_from_data_dir(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        tokio::fs::write(dir.path().join("complaints.json"), COMPLAINTS).await?;

        let data = load_dashboard(dir.path(), DataKind::Complaints).await?;

        assert_eq!(data.categories.len(), 2);
        let bugs = data.find_category("bugs").ok_or("missing Bugs")?;
        assert_eq!(bugs.items.len(), 2);
        assert!(bugs.items[0].date.is_some());
        // an unparseable date is treated as missing
        assert_eq!(bugs.items[1].date, None);
        assert_eq!(data.meta.and_then(|meta| meta.total), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let result = load_dashboard(dir.path(), DataKind::UseCases).await;
        assert!(matches!(result, Err(LoadError::Io { .. })));
        Ok(())
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let result = parse_dashboard(DataKind::Complaints, "{not json", Path::new("x.json"));
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn misaligned_series_is_rejected() {
        let json = r#"{"categories": [{"name": "Bugs", "complaints": []}],
            "timeSeries": {"labels": ["Sep 2025"], "rawLabels": ["2025-09"],
                           "datasets": {"Bugs": [1, 2]}}}"#;
        let result = parse_dashboard(DataKind::Complaints, json, Path::new("c.json"));
        match result {
            Err(LoadError::Misaligned { detail, .. }) => assert!(detail.contains("Bugs")),
            other => panic!("expected misaligned error, got {other:?}"),
        }
    }

    #[test]
    fn magic_moments_become_a_single_category() {
        let json = r#"{"moments": [
            {"quote": "wow", "sourceType": "reviews", "date": "2025-05-02",
             "source": {"type": "review", "platform": "Trustpilot", "body": "wow it just works"}},
            {"quote": "magic", "sourceType": "reviews", "date": "2025-06-09",
             "source": {"type": "review", "platform": "Trustpilot", "body": "feels like magic"}}
        ], "meta": {"total": 2}}"#;

        let data = parse_dashboard(DataKind::MagicMoments, json, Path::new("m.json")).unwrap();

        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, MAGIC_MOMENTS_CATEGORY);
        assert_eq!(data.time_series.raw_labels, vec!["2025-05", "2025-06"]);
        assert_eq!(
            data.time_series.series_for(MAGIC_MOMENTS_CATEGORY),
            Some(&[1, 1][..])
        );
    }

    #[test]
    fn missing_time_series_is_derived_from_item_dates() {
        let json = r#"{"categories": [{"name": "Speed", "useCases": [
            {"useCase": "speed", "quote": "q", "date": "2025-01-15",
             "source": {"type": "review", "body": "b"}}
        ]}]}"#;
        let data = parse_dashboard(DataKind::UseCases, json, Path::new("u.json")).unwrap();
        assert_eq!(data.time_series.raw_labels, vec!["2025-01"]);
    }

    #[tokio::test]
    async fn sources_are_loaded_and_normalized() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let json = r#"{"sources": [
            {"type": "reddit", "contentType": "comment", "body": "Bluetooth drops", "upvotes": 3},
            {"type": "review", "platform": "App Store", "body": "fine", "rating": 4}
        ]}"#;
        tokio::fs::write(dir.path().join(SOURCES_FILE), json).await?;

        let sources = load_sources(dir.path()).await?;

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].platform_key(), "appstore");
        Ok(())
    }
}
