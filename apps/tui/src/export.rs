//! Writes the dashboard JSON files from the insights database.
//!
//! The tables are owned by the extraction pipeline; this module only reads
//! them. Category summaries are plain counts, no model is called here.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::models::{InsightRow, RedditRecord, ReviewRecord};
use crate::db::{queries, table_exists};
use crate::domain::DataKind;
use crate::loader::{parse_date, SOURCES_FILE};
use crate::model::{
    platform_key, Category, DashboardData, Item, Meta, PlatformReview, RedditKind, RedditSource,
    SourceRef, TimeSeries, OTHER_CATEGORY,
};
use crate::search::{SearchOrigin, SearchSource};
use crate::wire::{
    format_date, CategoryFile, MomentsFile, SourcesFile, SourcesMeta, WireItem, WireMeta,
    WireSearchSource, REDDIT_TABLE, REVIEWS_TABLE,
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Display name for a raw extracted category.
///
/// `voice_commands` becomes `Voice Commands`; anything named `other` or
/// prefixed `other:` is folded into the other category.
pub fn normalize_category(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or_default();
    let lowered = raw.to_lowercase();
    if raw.is_empty() || lowered == OTHER_CATEGORY || lowered.starts_with("other:") {
        return OTHER_CATEGORY.to_string();
    }

    let mut titled = String::with_capacity(raw.len());
    let mut previous_alpha = false;
    for c in raw.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if c.is_alphabetic() {
            if previous_alpha {
                titled.extend(c.to_lowercase());
            } else {
                titled.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            titled.push(c);
            previous_alpha = false;
        }
    }
    titled.replace("Llm", "LLMs")
}

/// Icon for an item given its source table and review platform.
pub fn source_icon(source_table: Option<&str>, platform: Option<&str>) -> &'static str {
    if source_table == Some(REDDIT_TABLE) {
        return "reddit.png";
    }
    match platform_key(platform).as_str() {
        "appstore" => "appstore.png",
        "trustpilot" => "trustpilot.png",
        "microsoft" | "microsoftstore" | "windows" => "windows.png",
        "producthunt" => "producthunt.png",
        _ => "reddit.png",
    }
}

/// Platform and icon detected from a free-form review source name.
pub fn detect_platform(source: Option<&str>) -> (String, &'static str) {
    let lowered = source.unwrap_or_default().to_lowercase();
    if lowered.contains("appstore") || lowered.contains("app store") {
        ("appstore".to_string(), "appstore.png")
    } else if lowered.contains("trustpilot") {
        ("trustpilot".to_string(), "trustpilot.png")
    } else if lowered.contains("producthunt") || lowered.contains("product hunt") {
        ("producthunt".to_string(), "producthunt.png")
    } else if lowered.contains("microsoft") || lowered.contains("windows") {
        ("microsoft".to_string(), "windows.png")
    } else {
        (platform_key(source), "reddit.png")
    }
}

fn clamp_rating(rating: Option<i64>) -> Option<u8> {
    rating.and_then(|rating| u8::try_from(rating.clamp(1, 5)).ok())
}

/// Normalizes a joined insight row. The date falls back to the extraction time.
pub fn item_from_row(row: &InsightRow) -> Item {
    let is_reddit = row.source_table.as_deref() == Some(REDDIT_TABLE);
    let source_date = if is_reddit {
        row.reddit_date.as_deref()
    } else {
        row.review_date.as_deref()
    };
    let date = source_date
        .and_then(parse_date)
        .or_else(|| row.extracted_at.as_deref().and_then(parse_date));

    let source = if is_reddit {
        SourceRef::Reddit(RedditSource {
            kind: RedditKind::parse(row.reddit_content_type.as_deref().unwrap_or("post")),
            community: row.reddit_community.clone(),
            score: row.reddit_upvotes.unwrap_or(0),
            url: row.reddit_url.clone(),
            body: row.reddit_body.clone().unwrap_or_default(),
            title: row.reddit_title.clone(),
        })
    } else {
        SourceRef::Review(PlatformReview {
            platform: row.review_source.clone(),
            rating: clamp_rating(row.review_rating),
            user_name: row.review_user.clone(),
            url: None,
            body: row.review_text.clone().unwrap_or_default(),
            title: None,
        })
    };

    Item {
        label: row.category.clone(),
        quote: row.quote.clone().filter(|quote| !quote.is_empty()),
        date,
        source,
        icon: source_icon(row.source_table.as_deref(), row.review_source.as_deref()).to_string(),
    }
}

fn fallback_summary(kind: DataKind, name: &str, count: usize) -> String {
    format!(
        "This category contains {count} {} about {}.",
        kind.item_noun(),
        name.to_lowercase()
    )
}

/// Groups rows into categories, most populated first.
pub fn build_dashboard(kind: DataKind, rows: &[InsightRow], generated_at: &str) -> DashboardData {
    let mut categories: Vec<Category> = Vec::new();
    for row in rows {
        let name = normalize_category(row.category.as_deref());
        let item = item_from_row(row);
        match categories.iter_mut().find(|category| category.name == name) {
            Some(category) => category.items.push(item),
            None => categories.push(Category {
                name,
                count: 0,
                ai_summary: String::new(),
                items: vec![item],
            }),
        }
    }
    for category in &mut categories {
        category.count = category.items.len();
        category.ai_summary = fallback_summary(kind, &category.name, category.count);
    }
    categories.sort_by_key(|category| Reverse(category.count));

    let time_series = TimeSeries::monthly(
        categories
            .iter()
            .map(|category| (category.name.as_str(), category.items.as_slice())),
    );
    let meta = Meta {
        total: Some(rows.len()),
        total_categories: Some(categories.len()),
        date_start: time_series.raw_labels.first().cloned(),
        date_end: time_series.raw_labels.last().cloned(),
        generated_at: Some(generated_at.to_string()),
    };

    DashboardData {
        kind,
        categories,
        time_series,
        meta: Some(meta),
    }
}

pub fn build_moments(rows: &[InsightRow], generated_at: &str) -> MomentsFile {
    MomentsFile {
        moments: rows
            .iter()
            .map(|row| WireItem::from_item(DataKind::MagicMoments, &item_from_row(row)))
            .collect(),
        meta: Some(WireMeta {
            total: Some(rows.len()),
            generated_at: Some(generated_at.to_string()),
            ..WireMeta::default()
        }),
    }
}

fn reddit_source(record: &RedditRecord) -> SearchSource {
    SearchSource {
        origin: SearchOrigin::Reddit {
            kind: RedditKind::parse(record.content_type.as_deref().unwrap_or("post")),
            community: record.community_name.clone(),
            upvotes: record.up_votes.unwrap_or(0),
        },
        title: record.title.clone(),
        body: record.body.clone().unwrap_or_default(),
        date: record.created_at.as_deref().and_then(parse_date),
        url: record.url.clone(),
        author: record.username.clone(),
        icon: "reddit.png".to_string(),
    }
}

fn review_source(record: &ReviewRecord) -> SearchSource {
    let (platform, icon) = detect_platform(record.source.as_deref());
    SearchSource {
        origin: SearchOrigin::Review {
            platform,
            rating: clamp_rating(record.rating),
        },
        title: None,
        body: record.review_text.clone().unwrap_or_default(),
        date: record.date.as_deref().and_then(parse_date),
        url: None,
        author: record.user_name.clone(),
        icon: icon.to_string(),
    }
}

/// Search corpus, newest first, with per-type counts.
pub fn build_sources(
    reddit: &[RedditRecord],
    reviews: &[ReviewRecord],
    generated_at: &str,
) -> SourcesFile {
    let mut sources: Vec<(String, SearchSource)> = reddit
        .iter()
        .map(|record| (format!("reddit_{}", record.id), reddit_source(record)))
        .chain(
            reviews
                .iter()
                .map(|record| (format!("review_{}", record.review_id), review_source(record))),
        )
        .collect();
    // undated entries sort last
    sources.sort_by_key(|(_, source)| Reverse(source.date.map(format_date)));

    let mut meta = SourcesMeta {
        total: sources.len(),
        generated_at: Some(generated_at.to_string()),
        ..SourcesMeta::default()
    };
    for (_, source) in &sources {
        match &source.origin {
            SearchOrigin::Reddit { kind, .. } => {
                meta.reddit += 1;
                match kind {
                    RedditKind::Post => meta.posts += 1,
                    RedditKind::Comment => meta.comments += 1,
                }
            }
            SearchOrigin::Review { platform, .. } => {
                meta.reviews += 1;
                *meta.platforms.entry(platform.clone()).or_insert(0) += 1;
            }
        }
    }

    SourcesFile {
        sources: sources
            .into_iter()
            .map(|(id, source)| WireSearchSource::from_source(id, &source))
            .collect(),
        meta: Some(meta),
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<(PathBuf, usize)>,
    pub skipped: Vec<String>,
}

/// Writes every data kind plus the search corpus into `out_dir`.
pub async fn export_all(
    pool: &SqlitePool,
    out_dir: &Path,
    now: NaiveDateTime,
) -> Result<ExportSummary, ExportError> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| ExportError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;
    let generated_at = format_date(now);
    let mut summary = ExportSummary::default();

    for kind in DataKind::ALL {
        if !table_exists(pool, kind.table_name()).await? {
            warn!(table = kind.table_name(), "table missing, skipping export");
            summary.skipped.push(kind.table_name().to_string());
            continue;
        }
        let rows = queries::fetch_insights(pool, kind).await?;
        let path = out_dir.join(kind.file_name());
        if kind == DataKind::MagicMoments {
            write_json(&path, &build_moments(&rows, &generated_at)).await?;
        } else {
            let data = build_dashboard(kind, &rows, &generated_at);
            write_json(&path, &CategoryFile::from_dashboard(&data)).await?;
        }
        info!(kind = %kind, rows = rows.len(), path = %path.display(), "exported");
        summary.written.push((path, rows.len()));
    }

    if table_exists(pool, REDDIT_TABLE).await? && table_exists(pool, REVIEWS_TABLE).await? {
        let reddit = queries::fetch_reddit_sources(pool).await?;
        let reviews = queries::fetch_review_sources(pool).await?;
        let file = build_sources(&reddit, &reviews, &generated_at);
        let path = out_dir.join(SOURCES_FILE);
        let count = file.sources.len();
        write_json(&path, &file).await?;
        info!(sources = count, path = %path.display(), "exported search sources");
        summary.written.push((path, count));
    } else {
        warn!("source tables missing, skipping search corpus");
        summary.skipped.push(SOURCES_FILE.to_string());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::tests::setup_test_db;
    use crate::loader;
    use crate::model::fixtures::date;
    use pretty_assertions::assert_eq;

    #[test]
    fn category_names_are_title_cased() {
        assert_eq!(normalize_category(Some("voice_commands")), "Voice Commands");
        assert_eq!(normalize_category(Some("llm_integration")), "LLMs Integration");
        assert_eq!(normalize_category(Some("other")), "other");
        assert_eq!(normalize_category(Some("other: font size")), "other");
        assert_eq!(normalize_category(Some("")), "other");
        assert_eq!(normalize_category(None), "other");
    }

    #[test]
    fn icons_follow_source_and_platform() {
        assert_eq!(source_icon(Some("reddit_content"), None), "reddit.png");
        assert_eq!(source_icon(Some("reviews"), Some("App Store")), "appstore.png");
        assert_eq!(source_icon(Some("reviews"), Some("microsoft")), "windows.png");
        assert_eq!(
            detect_platform(Some("Product Hunt")),
            ("producthunt".to_string(), "producthunt.png")
        );
        assert_eq!(detect_platform(Some("Windows Store")).0, "microsoft");
    }

    #[test]
    fn item_date_falls_back_to_extraction_time() {
        let row = InsightRow {
            source_table: Some("reviews".to_string()),
            review_date: None,
            extracted_at: Some("2025-12-02 00:00:00".to_string()),
            review_text: Some("body".to_string()),
            ..InsightRow::default()
        };
        let item = item_from_row(&row);
        assert_eq!(
            item.date.map(|d| d.format("%Y-%m-%d").to_string()),
            Some("2025-12-02".to_string())
        );
    }

    #[tokio::test]
    async fn dashboard_export_groups_and_sorts_categories(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;
        let rows = queries::fetch_insights(&pool, DataKind::Complaints).await?;

        let data = build_dashboard(DataKind::Complaints, &rows, "2026-01-01T00:00:00");

        let names: Vec<&str> = data.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names[0], "Bluetooth Issues");
        assert!(names.contains(&"other"));
        assert!(names.contains(&"LLMs Quality"));
        assert!(data.time_series.is_aligned());
        assert_eq!(data.meta.as_ref().and_then(|m| m.total), Some(5));
        let bluetooth = data.find_category("Bluetooth Issues").ok_or("missing")?;
        assert_eq!(bluetooth.count, 2);
        assert!(bluetooth.ai_summary.contains("2 complaints"));
        Ok(())
    }

    #[tokio::test]
    async fn sources_are_sorted_newest_first_with_counts(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;
        let reddit = queries::fetch_reddit_sources(&pool).await?;
        let reviews = queries::fetch_review_sources(&pool).await?;

        let file = build_sources(&reddit, &reviews, "2026-01-01T00:00:00");

        let ids: Vec<&str> = file.sources.iter().filter_map(|s| s.id.as_deref()).collect();
        assert_eq!(ids, vec!["reddit_t1_b", "reddit_t3_a", "review_r1", "review_r2", "review_r3"]);
        let meta = file.meta.ok_or("missing meta")?;
        assert_eq!((meta.posts, meta.comments, meta.reviews), (1, 1, 3));
        assert_eq!(meta.platforms.get("microsoft"), Some(&1));
        Ok(())
    }

    #[tokio::test]
    async fn export_all_round_trips_through_the_loader() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;
        let dir = tempfile::tempdir()?;

        let summary = export_all(&pool, dir.path(), date("2026-01-01")).await?;

        assert_eq!(summary.skipped, vec!["use_cases", "value_drivers"]);
        let complaints = loader::load_dashboard(dir.path(), DataKind::Complaints).await?;
        assert_eq!(complaints.total_items(), 5);
        let moments = loader::load_dashboard(dir.path(), DataKind::MagicMoments).await?;
        assert_eq!(moments.total_items(), 1);
        let sources = loader::load_sources(dir.path()).await?;
        assert_eq!(sources.len(), 5);
        Ok(())
    }
}
