//! Normalized dashboard data.
//!
//! Every export file is mapped onto these types by [`crate::loader`] so that
//! the dashboard never has to care whether it is looking at complaints,
//! use cases, value drivers or magic moments.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::DataKind;

pub const OTHER_CATEGORY: &str = "other";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedditKind {
    Post,
    Comment,
}

impl RedditKind {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("comment") {
            Self::Comment
        } else {
            Self::Post
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditSource {
    pub kind: RedditKind,
    pub community: Option<String>,
    pub score: i64,
    pub url: Option<String>,
    pub body: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformReview {
    pub platform: Option<String>,
    pub rating: Option<u8>,
    pub user_name: Option<String>,
    pub url: Option<String>,
    pub body: String,
    pub title: Option<String>,
}

/// Where an item was said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Reddit(RedditSource),
    Review(PlatformReview),
}

impl SourceRef {
    /// Key used for the per-platform badges.
    pub fn platform_key(&self) -> String {
        match self {
            Self::Reddit(_) => "reddit".to_string(),
            Self::Review(review) => platform_key(review.platform.as_deref()),
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::Reddit(reddit) => &reddit.body,
            Self::Review(review) => &review.body,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Reddit(reddit) => reddit.title.as_deref(),
            Self::Review(review) => review.title.as_deref(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Reddit(reddit) => reddit.url.as_deref(),
            Self::Review(review) => review.url.as_deref(),
        }
    }
}

/// Lower-cased platform name with all whitespace removed, `"unknown"` when absent.
pub fn platform_key(platform: Option<&str>) -> String {
    let key: String = platform
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if key.is_empty() {
        "unknown".to_string()
    } else {
        key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Raw extracted label (the un-normalized complaint or use case).
    pub label: Option<String>,
    pub quote: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub source: SourceRef,
    pub icon: String,
}

impl Item {
    pub fn month_key(&self) -> Option<String> {
        self.date.map(|date| date.format("%Y-%m").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub count: usize,
    pub ai_summary: String,
    pub items: Vec<Item>,
}

impl Category {
    pub fn is_other(&self) -> bool {
        self.name.eq_ignore_ascii_case(OTHER_CATEGORY)
    }
}

/// Monthly counts per category. All three vectors share index alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub raw_labels: Vec<String>,
    pub datasets: BTreeMap<String, Vec<u32>>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.raw_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_labels.is_empty()
    }

    pub fn is_aligned(&self) -> bool {
        let len = self.raw_labels.len();
        self.labels.len() == len && self.datasets.values().all(|data| data.len() == len)
    }

    pub fn last_raw_label(&self) -> Option<&str> {
        self.raw_labels.last().map(String::as_str)
    }

    /// Series for a category, preferring an exact name match.
    pub fn series_for(&self, name: &str) -> Option<&[u32]> {
        self.datasets
            .get(name)
            .or_else(|| {
                self.datasets
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, data)| data)
            })
            .map(Vec::as_slice)
    }

    /// Builds an aligned series from dated items. Undated items are not counted.
    pub fn monthly<'a, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Item])>,
    {
        let mut counts: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
        let mut months = BTreeSet::new();

        for (name, items) in groups {
            let per_month = counts.entry(name.to_string()).or_default();
            for month in items.iter().filter_map(Item::month_key) {
                months.insert(month.clone());
                *per_month.entry(month).or_insert(0) += 1;
            }
        }

        let raw_labels: Vec<String> = months.into_iter().collect();
        let labels = raw_labels.iter().map(|raw| month_label(raw)).collect();
        let datasets = counts
            .into_iter()
            .map(|(name, per_month)| {
                let data = raw_labels
                    .iter()
                    .map(|month| per_month.get(month).copied().unwrap_or(0))
                    .collect();
                (name, data)
            })
            .collect();

        Self {
            labels,
            raw_labels,
            datasets,
        }
    }
}

/// `2025-09` becomes `Sep 2025`; anything unparseable is returned as is.
pub fn month_label(raw: &str) -> String {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_or_else(|_| raw.to_string(), |date| date.format("%b %Y").to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub total: Option<usize>,
    pub total_categories: Option<usize>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub kind: DataKind,
    pub categories: Vec<Category>,
    pub time_series: TimeSeries,
    pub meta: Option<Meta>,
}

impl DashboardData {
    pub fn find_category(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(name))
    }

    /// Categories shown as bars, in data order.
    pub fn bar_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|category| !category.is_other())
    }

    pub fn bar_category(&self, index: usize) -> Option<&Category> {
        self.bar_categories().nth(index)
    }

    pub fn other_category(&self) -> Option<&Category> {
        self.categories.iter().find(|category| category.is_other())
    }

    pub fn total_items(&self) -> usize {
        self.categories.iter().map(|category| category.items.len()).sum()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(value: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn review_item(platform: &str, quote: &str, body: &str, when: Option<&str>) -> Item {
        Item {
            label: None,
            quote: Some(quote.to_string()),
            date: when.map(date),
            source: SourceRef::Review(PlatformReview {
                platform: Some(platform.to_string()),
                rating: Some(3),
                user_name: None,
                url: None,
                body: body.to_string(),
                title: None,
            }),
            icon: "appstore.png".to_string(),
        }
    }

    pub fn reddit_item(quote: &str, body: &str, when: Option<&str>) -> Item {
        Item {
            label: None,
            quote: Some(quote.to_string()),
            date: when.map(date),
            source: SourceRef::Reddit(RedditSource {
                kind: RedditKind::Comment,
                community: Some("productivity".to_string()),
                score: 4,
                url: Some("https://reddit.com/r/productivity/1".to_string()),
                body: body.to_string(),
                title: None,
            }),
            icon: "reddit.png".to_string(),
        }
    }

    pub fn category(name: &str, items: Vec<Item>) -> Category {
        Category {
            name: name.to_string(),
            count: items.len(),
            ai_summary: format!("Summary of {name}"),
            items,
        }
    }

    /// Five months of data with Bugs, Pricing, Speed and other.
    pub fn dashboard() -> DashboardData {
        let bugs = category(
            "Bugs",
            vec![
                reddit_item("crashes", "it crashes", Some("2025-11-02")),
                review_item("App Store", "slow", "so slow", Some("2025-09-10")),
                review_item("Trustpilot", "broken", "broken again", Some("2025-07-04")),
                review_item("App Store", "undated", "no date here", None),
            ],
        );
        let speed = category(
            "Speed",
            vec![review_item("Microsoft", "lag", "lag on typing", Some("2025-10-01"))],
        );
        let pricing = category(
            "Pricing",
            vec![
                review_item("App Store", "too expensive", "way too expensive", Some("2025-08-15")),
                reddit_item("pricey", "pricey for what it does", Some("2025-11-20")),
            ],
        );
        let other = category(
            "other",
            vec![review_item("Product Hunt", "misc", "misc thing", Some("2025-10-12"))],
        );
        let categories = vec![bugs, speed, pricing, other];
        let time_series = TimeSeries::monthly(
            categories
                .iter()
                .map(|category| (category.name.as_str(), category.items.as_slice())),
        );
        DashboardData {
            kind: DataKind::Complaints,
            categories,
            time_series,
            meta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn platform_key_strips_whitespace_and_lowercases() {
        assert_eq!(platform_key(Some("App Store")), "appstore");
        assert_eq!(platform_key(Some(" Product\tHunt ")), "producthunt");
        assert_eq!(platform_key(None), "unknown");
        assert_eq!(platform_key(Some("  ")), "unknown");
    }

    #[test]
    fn reddit_sources_always_key_as_reddit() {
        let item = reddit_item("q", "body", None);
        assert_eq!(item.source.platform_key(), "reddit");
    }

    #[test]
    fn monthly_series_is_aligned_and_sorted() {
        let data = dashboard();
        let series = &data.time_series;

        assert!(series.is_aligned());
        assert_eq!(
            series.raw_labels,
            vec!["2025-07", "2025-08", "2025-09", "2025-10", "2025-11"]
        );
        assert_eq!(series.labels[0], "Jul 2025");
        assert_eq!(series.series_for("Bugs"), Some(&[1, 0, 1, 0, 1][..]));
        assert_eq!(series.series_for("pricing"), Some(&[0, 1, 0, 0, 1][..]));
        assert_eq!(series.series_for("Missing"), None);
    }

    #[test]
    fn other_category_is_excluded_from_bars() {
        let data = dashboard();
        let bars: Vec<&str> = data.bar_categories().map(|c| c.name.as_str()).collect();
        assert_eq!(bars, vec!["Bugs", "Speed", "Pricing"]);
        assert_eq!(data.other_category().map(|c| c.name.as_str()), Some("other"));
        assert_eq!(data.find_category("BUGS").map(|c| c.items.len()), Some(4));
    }

    #[test]
    fn month_label_falls_back_to_raw_value() {
        assert_eq!(month_label("2024-02"), "Feb 2024");
        assert_eq!(month_label("unknown"), "unknown");
    }
}
