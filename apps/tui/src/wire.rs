//! JSON shapes of the exported data files and their mapping onto [`crate::model`].

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::DataKind;
use crate::loader::parse_date;
use crate::model::{
    Category, DashboardData, Item, Meta, PlatformReview, RedditKind, RedditSource, SourceRef,
    TimeSeries,
};
use crate::search::{SearchOrigin, SearchSource};

pub const REDDIT_TABLE: &str = "reddit_content";
pub const REVIEWS_TABLE: &str = "reviews";

pub fn format_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSource {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "score", skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub source: Option<WireSource>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl WireItem {
    pub fn into_item(self) -> Item {
        let label = self
            .complaint
            .or(self.use_case)
            .or(self.value_driver)
            .or(self.label);
        let wire_source = self.source.unwrap_or_default();
        let is_reddit = self.source_type.as_deref() == Some(REDDIT_TABLE)
            || matches!(wire_source.kind.as_deref(), Some("post" | "comment"));

        let body = wire_source.body.unwrap_or_default();
        let source = if is_reddit {
            SourceRef::Reddit(RedditSource {
                kind: RedditKind::parse(wire_source.kind.as_deref().unwrap_or("post")),
                community: wire_source.community,
                score: wire_source.upvotes.unwrap_or(0),
                url: wire_source.url,
                body,
                title: wire_source.title,
            })
        } else {
            SourceRef::Review(PlatformReview {
                platform: wire_source.platform,
                rating: wire_source.rating.and_then(rating_from_wire),
                user_name: wire_source.user_name,
                url: wire_source.url,
                body,
                title: wire_source.title,
            })
        };

        let icon = self
            .icon
            .unwrap_or_else(|| if is_reddit { "reddit.png" } else { "review.png" }.to_string());

        Item {
            label,
            quote: self.quote.filter(|quote| !quote.is_empty()),
            date: self.date.as_deref().and_then(parse_date),
            source,
            icon,
        }
    }

    pub fn from_item(kind: DataKind, item: &Item) -> Self {
        let mut wire = Self {
            quote: item.quote.clone(),
            date: item.date.map(format_date),
            icon: Some(item.icon.clone()),
            ..Self::default()
        };
        match kind {
            DataKind::Complaints => wire.complaint = item.label.clone(),
            DataKind::UseCases => wire.use_case = item.label.clone(),
            DataKind::ValueDrivers => wire.value_driver = item.label.clone(),
            DataKind::MagicMoments => wire.label = item.label.clone(),
        }

        let (source_type, source) = match &item.source {
            SourceRef::Reddit(reddit) => (
                REDDIT_TABLE,
                WireSource {
                    kind: Some(reddit.kind.as_str().to_string()),
                    title: reddit.title.clone(),
                    body: Some(reddit.body.clone()),
                    community: reddit.community.clone(),
                    url: reddit.url.clone(),
                    upvotes: Some(reddit.score),
                    ..WireSource::default()
                },
            ),
            SourceRef::Review(review) => (
                REVIEWS_TABLE,
                WireSource {
                    kind: Some("review".to_string()),
                    title: review.title.clone(),
                    body: Some(review.body.clone()),
                    url: review.url.clone(),
                    platform: review.platform.clone(),
                    user_name: review.user_name.clone(),
                    rating: review.rating.map(f64::from),
                    ..WireSource::default()
                },
            ),
        };
        wire.source_type = Some(source_type.to_string());
        wire.source = Some(source);
        wire
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rating_from_wire(rating: f64) -> Option<u8> {
    if rating.is_finite() && rating >= 1.0 {
        Some(rating.round().min(5.0) as u8)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCategory {
    pub name: String,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub complaints: Vec<WireItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<WireItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_drivers: Vec<WireItem>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, usize>,
}

impl WireCategory {
    pub fn into_category(self) -> Category {
        let mut items = self.complaints;
        items.extend(self.use_cases);
        items.extend(self.value_drivers);
        let items: Vec<Item> = items.into_iter().map(WireItem::into_item).collect();
        Category {
            name: self.name,
            count: self.count.unwrap_or(items.len()),
            ai_summary: self.ai_summary.unwrap_or_default(),
            items,
        }
    }

    pub fn from_category(kind: DataKind, category: &Category) -> Self {
        let items: Vec<WireItem> = category
            .items
            .iter()
            .map(|item| WireItem::from_item(kind, item))
            .collect();
        let mut sources = BTreeMap::new();
        for item in &items {
            if let Some(table) = &item.source_type {
                *sources.entry(table.clone()).or_insert(0) += 1;
            }
        }

        let mut wire = Self {
            name: category.name.clone(),
            count: Some(category.count),
            ai_summary: Some(category.ai_summary.clone()),
            sources,
            ..Self::default()
        };
        match kind {
            DataKind::UseCases => wire.use_cases = items,
            DataKind::ValueDrivers => wire.value_drivers = items,
            DataKind::Complaints | DataKind::MagicMoments => wire.complaints = items,
        }
        wire
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTimeSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub raw_labels: Vec<String>,
    #[serde(default)]
    pub datasets: BTreeMap<String, Vec<u32>>,
}

impl From<WireTimeSeries> for TimeSeries {
    fn from(wire: WireTimeSeries) -> Self {
        Self {
            labels: wire.labels,
            raw_labels: wire.raw_labels,
            datasets: wire.datasets,
        }
    }
}

impl From<&TimeSeries> for WireTimeSeries {
    fn from(series: &TimeSeries) -> Self {
        Self {
            labels: series.labels.clone(),
            raw_labels: series.raw_labels.clone(),
            datasets: series.datasets.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireDateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMeta {
    #[serde(
        default,
        alias = "totalComplaints",
        alias = "totalUseCases",
        alias = "totalValueDrivers",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_categories: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<WireDateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

impl From<WireMeta> for Meta {
    fn from(wire: WireMeta) -> Self {
        let (date_start, date_end) = wire
            .date_range
            .map(|range| (range.start, range.end))
            .unwrap_or_default();
        Self {
            total: wire.total,
            total_categories: wire.total_categories,
            date_start,
            date_end,
            generated_at: wire.generated_at,
        }
    }
}

impl From<&Meta> for WireMeta {
    fn from(meta: &Meta) -> Self {
        let date_range = (meta.date_start.is_some() || meta.date_end.is_some()).then(|| {
            WireDateRange {
                start: meta.date_start.clone(),
                end: meta.date_end.clone(),
            }
        });
        Self {
            total: meta.total,
            total_categories: meta.total_categories,
            date_range,
            generated_at: meta.generated_at.clone(),
        }
    }
}

/// `complaints.json`, `use_cases.json` and `value_drivers.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFile {
    pub categories: Vec<WireCategory>,
    #[serde(default)]
    pub time_series: WireTimeSeries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<WireMeta>,
}

impl CategoryFile {
    pub fn into_dashboard(self, kind: DataKind) -> DashboardData {
        DashboardData {
            kind,
            categories: self
                .categories
                .into_iter()
                .map(WireCategory::into_category)
                .collect(),
            time_series: self.time_series.into(),
            meta: self.meta.map(Meta::from),
        }
    }

    pub fn from_dashboard(data: &DashboardData) -> Self {
        Self {
            categories: data
                .categories
                .iter()
                .map(|category| WireCategory::from_category(data.kind, category))
                .collect(),
            time_series: (&data.time_series).into(),
            meta: data.meta.as_ref().map(WireMeta::from),
        }
    }
}

/// `magic_moments.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MomentsFile {
    pub moments: Vec<WireItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<WireMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSearchSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl WireSearchSource {
    pub fn into_source(self) -> SearchSource {
        let kind = self.kind.to_lowercase();
        let origin = if kind == "reddit" {
            SearchOrigin::Reddit {
                kind: RedditKind::parse(self.content_type.as_deref().unwrap_or("post")),
                community: self.community,
                upvotes: self.upvotes.unwrap_or(0),
            }
        } else {
            let platform = if kind == "review" {
                self.platform
            } else {
                self.platform.or(Some(kind))
            };
            SearchOrigin::Review {
                platform: crate::model::platform_key(platform.as_deref()),
                rating: self.rating.and_then(rating_from_wire),
            }
        };
        let icon = self.icon.unwrap_or_else(|| match origin {
            SearchOrigin::Reddit { .. } => "reddit.png".to_string(),
            SearchOrigin::Review { .. } => "review.png".to_string(),
        });

        SearchSource {
            origin,
            title: self.title.filter(|title| !title.is_empty()),
            body: self.body.unwrap_or_default(),
            date: self.date.as_deref().and_then(parse_date),
            url: self.url,
            author: self.username,
            icon,
        }
    }

    pub fn from_source(id: String, source: &SearchSource) -> Self {
        let mut wire = Self {
            id: Some(id),
            title: source.title.clone(),
            body: Some(source.body.clone()),
            username: source.author.clone(),
            url: source.url.clone(),
            date: source.date.map(format_date),
            icon: Some(source.icon.clone()),
            ..Self::default()
        };
        match &source.origin {
            SearchOrigin::Reddit {
                kind,
                community,
                upvotes,
            } => {
                wire.kind = "reddit".to_string();
                wire.content_type = Some(kind.as_str().to_string());
                wire.community = community.clone();
                wire.upvotes = Some(*upvotes);
            }
            SearchOrigin::Review { platform, rating } => {
                wire.kind = "review".to_string();
                wire.content_type = Some("review".to_string());
                wire.platform = Some(platform.clone());
                wire.rating = rating.map(f64::from);
            }
        }
        wire
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesMeta {
    pub total: usize,
    pub reddit: usize,
    pub posts: usize,
    pub comments: usize,
    pub reviews: usize,
    pub platforms: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

/// `sources.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<WireSearchSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SourcesMeta>,
}
