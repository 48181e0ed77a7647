use std::collections::HashMap;

use crate::model::{Category, Item, SourceRef};
use crate::text::{quote_in_context, Segment};

use super::time_filter::TimeWindow;

pub const INLINE_CARD_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    /// Side panel, capped at [`INLINE_CARD_LIMIT`] cards.
    Inline,
    /// Full-screen modal with every card.
    Expanded,
}

/// Item counts per platform key, most frequent first.
pub fn platform_histogram<'a, I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order = Vec::new();
    for item in items {
        let key = item.source.platform_key();
        let count = counts.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            0
        });
        *count += 1;
    }
    let mut histogram: Vec<(String, usize)> = order
        .into_iter()
        .map(|key| {
            let count = counts.get(&key).copied().unwrap_or(0);
            (key, count)
        })
        .collect();
    // stable: ties keep first-seen order
    histogram.sort_by(|a, b| b.1.cmp(&a.1));
    histogram
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBadge {
    pub key: String,
    pub count: usize,
    pub active: bool,
}

pub fn source_badges(items: &[&Item], selected_source: Option<&str>) -> Vec<SourceBadge> {
    let mut badges: Vec<SourceBadge> = platform_histogram(items.iter().copied())
        .into_iter()
        .map(|(key, count)| SourceBadge {
            active: selected_source == Some(key.as_str()),
            key,
            count,
        })
        .collect();
    if let Some(selected) = selected_source {
        if !badges.iter().any(|badge| badge.active) {
            badges.push(SourceBadge {
                key: selected.to_string(),
                count: 0,
                active: true,
            });
        }
    }
    badges
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCard {
    pub icon: String,
    pub platform: String,
    pub label: Option<String>,
    pub title: Option<String>,
    pub byline: String,
    pub date: Option<String>,
    pub url: Option<String>,
    pub body: Option<Vec<Segment>>,
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

impl ItemCard {
    pub fn from_item(item: &Item) -> Self {
        let byline = match &item.source {
            SourceRef::Reddit(reddit) => {
                let mut parts = Vec::new();
                if let Some(community) = &reddit.community {
                    parts.push(format!("r/{community}"));
                }
                parts.push(reddit.kind.as_str().to_string());
                parts.push(format!("{} upvotes", reddit.score));
                parts.join(" · ")
            }
            SourceRef::Review(review) => {
                let platform = review.platform.as_deref().unwrap_or("unknown");
                let mut parts = vec![platform.to_string()];
                if let Some(rating) = review.rating {
                    parts.push(stars(rating));
                }
                if let Some(user) = &review.user_name {
                    parts.push(user.clone());
                }
                parts.join(" · ")
            }
        };

        Self {
            icon: item.icon.clone(),
            platform: item.source.platform_key(),
            label: item.label.clone(),
            title: item.source.title().map(ToString::to_string),
            byline,
            date: item.date.map(|date| date.format("%b %-d, %Y").to_string()),
            url: item.source.url().map(ToString::to_string),
            body: quote_in_context(item.source.body(), item.quote.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub category: String,
    pub summary: String,
    /// Items inside the time window, before the source filter.
    pub in_window: usize,
    /// Items left after the source filter.
    pub matching: usize,
    pub badges: Vec<SourceBadge>,
    pub cards: Vec<ItemCard>,
}

impl DetailView {
    pub fn is_truncated(&self) -> bool {
        self.cards.len() < self.matching
    }
}

pub fn build_detail(
    category: &Category,
    window: &TimeWindow,
    selected_source: Option<&str>,
    mode: DetailMode,
) -> DetailView {
    let in_window = window.filter(&category.items);
    let badges = source_badges(&in_window, selected_source);

    let matching: Vec<&Item> = in_window
        .iter()
        .copied()
        .filter(|item| selected_source.map_or(true, |source| item.source.platform_key() == source))
        .collect();
    let limit = match mode {
        DetailMode::Inline => INLINE_CARD_LIMIT,
        DetailMode::Expanded => usize::MAX,
    };

    DetailView {
        category: category.name.clone(),
        summary: category.ai_summary.clone(),
        in_window: in_window.len(),
        matching: matching.len(),
        badges,
        cards: matching.into_iter().take(limit).map(ItemCard::from_item).collect(),
    }
}
