//! Full-text search over the raw posts, comments and reviews.
//!
//! Matching is an ordered case-insensitive substring scan, not a ranking:
//! results come back in corpus order and the scan stops at
//! [`MAX_SEARCH_RESULTS`]. Only the autocomplete suggestions are ranked.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::debug;

use crate::model::RedditKind;
use crate::text::{find_case_insensitive, MIN_QUERY_CHARS};

pub const MAX_SEARCH_RESULTS: usize = 50;
pub const MAX_SUGGESTIONS: usize = 8;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Canned queries offered before any category names are known.
pub const CANNED_QUERIES: &[&str] = &[
    "accuracy",
    "bluetooth",
    "battery",
    "crash",
    "keyboard shortcut",
    "languages",
    "latency",
    "microphone",
    "pricing",
    "privacy",
    "subscription",
    "windows",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOrigin {
    Reddit {
        kind: RedditKind,
        community: Option<String>,
        upvotes: i64,
    },
    Review {
        platform: String,
        rating: Option<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSource {
    pub origin: SearchOrigin,
    pub title: Option<String>,
    pub body: String,
    pub date: Option<NaiveDateTime>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub icon: String,
}

impl SearchSource {
    pub fn platform_key(&self) -> &str {
        match &self.origin {
            SearchOrigin::Reddit { .. } => "reddit",
            SearchOrigin::Review { platform, .. } => platform,
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.title
            .as_deref()
            .is_some_and(|title| find_case_insensitive(title, query).is_some())
            || find_case_insensitive(&self.body, query).is_some()
    }
}

/// Badge counts for one query, always over the unfiltered results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub total: usize,
    pub posts: usize,
    pub comments: usize,
    pub platforms: BTreeMap<String, usize>,
}

impl FilterCounts {
    fn tally<'a>(sources: impl IntoIterator<Item = &'a SearchSource>) -> Self {
        let mut counts = Self::default();
        for source in sources {
            counts.total += 1;
            match &source.origin {
                SearchOrigin::Reddit {
                    kind: RedditKind::Post,
                    ..
                } => counts.posts += 1,
                SearchOrigin::Reddit {
                    kind: RedditKind::Comment,
                    ..
                } => counts.comments += 1,
                SearchOrigin::Review { platform, .. } => {
                    *counts.platforms.entry(platform.clone()).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    pub fn count_for(&self, filter: &SearchFilter) -> usize {
        match filter {
            SearchFilter::All => self.total,
            SearchFilter::Posts => self.posts,
            SearchFilter::Comments => self.comments,
            SearchFilter::Platform(platform) => self.platforms.get(platform).copied().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchFilter {
    #[default]
    All,
    Posts,
    Comments,
    Platform(String),
}

impl SearchFilter {
    pub fn accepts(&self, source: &SearchSource) -> bool {
        match (self, &source.origin) {
            (Self::All, _) => true,
            (Self::Posts, SearchOrigin::Reddit { kind, .. }) => *kind == RedditKind::Post,
            (Self::Comments, SearchOrigin::Reddit { kind, .. }) => *kind == RedditKind::Comment,
            (Self::Platform(wanted), SearchOrigin::Review { platform, .. }) => wanted == platform,
            _ => false,
        }
    }

    /// Toggling the active filter turns filtering off.
    #[must_use]
    pub fn toggle(&self, filter: Self) -> Self {
        if *self == filter {
            Self::All
        } else {
            filter
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::All => "All".to_string(),
            Self::Posts => "Posts".to_string(),
            Self::Comments => "Comments".to_string(),
            Self::Platform(platform) => platform.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    /// Positions into the index, in corpus order.
    pub hits: Vec<usize>,
    pub counts: FilterCounts,
}

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    sources: Vec<SearchSource>,
}

impl SearchIndex {
    pub const fn new(sources: Vec<SearchSource>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&SearchSource> {
        self.sources.get(position)
    }

    pub fn search(&self, query: &str) -> SearchResults {
        let query = query.trim();
        let hits: Vec<usize> = if query.chars().count() < MIN_QUERY_CHARS {
            (0..self.sources.len()).collect()
        } else {
            self.sources
                .iter()
                .enumerate()
                .filter(|(_, source)| source.matches(query))
                .map(|(position, _)| position)
                .take(MAX_SEARCH_RESULTS)
                .collect()
        };
        let counts = FilterCounts::tally(hits.iter().filter_map(|&position| self.get(position)));
        debug!(query, hits = hits.len(), "search executed");
        SearchResults {
            query: query.to_string(),
            hits,
            counts,
        }
    }

    /// Results narrowed by `filter`, in corpus order.
    pub fn visible<'a>(
        &'a self,
        results: &SearchResults,
        filter: &SearchFilter,
    ) -> Vec<&'a SearchSource> {
        results
            .hits
            .iter()
            .filter_map(|&position| self.get(position))
            .filter(|source| filter.accepts(source))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub query: String,
}

/// Keyboard-navigable suggestions. `selected == None` means nothing is highlighted.
pub struct Autocomplete {
    catalog: Vec<Suggestion>,
    suggestions: Vec<Suggestion>,
    selected: Option<usize>,
    matcher: SkimMatcherV2,
}

impl std::fmt::Debug for Autocomplete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autocomplete")
            .field("catalog", &self.catalog.len())
            .field("suggestions", &self.suggestions)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new(CANNED_QUERIES.iter().map(ToString::to_string))
    }
}

impl Autocomplete {
    pub fn new(queries: impl IntoIterator<Item = String>) -> Self {
        let mut autocomplete = Self {
            catalog: Vec::new(),
            suggestions: Vec::new(),
            selected: None,
            matcher: SkimMatcherV2::default(),
        };
        autocomplete.extend(queries);
        autocomplete
    }

    /// Adds queries (category names, say) to the catalog, skipping duplicates.
    pub fn extend(&mut self, queries: impl IntoIterator<Item = String>) {
        for query in queries {
            let query = query.trim().to_string();
            if query.is_empty()
                || self
                    .catalog
                    .iter()
                    .any(|existing| existing.query.eq_ignore_ascii_case(&query))
            {
                continue;
            }
            self.catalog.push(Suggestion {
                label: query.clone(),
                query: query.to_lowercase(),
            });
        }
    }

    /// Re-ranks suggestions for `input` and resets the highlight.
    pub fn update(&mut self, input: &str) {
        self.selected = None;
        let input = input.trim();
        if input.is_empty() {
            self.suggestions.clear();
            return;
        }
        let mut ranked: Vec<(i64, &Suggestion)> = self
            .catalog
            .iter()
            .filter_map(|suggestion| {
                self.matcher
                    .fuzzy_match(&suggestion.label, input)
                    .map(|score| (score, suggestion))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.label.cmp(&b.1.label)));
        self.suggestions = ranked
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, suggestion)| suggestion.clone())
            .collect();
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn next(&mut self) {
        let Some(last) = self.suggestions.len().checked_sub(1) else {
            return;
        };
        self.selected = Some(self.selected.map_or(0, |index| (index + 1).min(last)));
    }

    pub fn previous(&mut self) {
        self.selected = match self.selected {
            Some(0) | None => None,
            Some(index) => Some(index - 1),
        };
    }

    /// The highlighted suggestion's query, if any.
    pub fn accept(&self) -> Option<String> {
        self.selected
            .and_then(|index| self.suggestions.get(index))
            .map(|suggestion| suggestion.query.clone())
    }

    pub fn clear(&mut self) {
        self.suggestions.clear();
        self.selected = None;
    }
}

/// Runs the latest input once it has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(Instant, String)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((now + self.delay, query.into()));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, query)| query),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Search page state: input, debounced results, filter and suggestions.
#[derive(Debug, Default)]
pub struct SearchSession {
    index: Option<SearchIndex>,
    input: String,
    filter: SearchFilter,
    results: Option<SearchResults>,
    autocomplete: Autocomplete,
    debouncer: Debouncer,
}

impl SearchSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
            ..Self::default()
        }
    }

    pub const fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    pub fn load(&mut self, sources: Vec<SearchSource>) {
        let index = SearchIndex::new(sources);
        self.results = Some(index.search(&self.input));
        self.index = Some(index);
    }

    pub fn add_suggestions(&mut self, queries: impl IntoIterator<Item = String>) {
        self.autocomplete.extend(queries);
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub const fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub const fn results(&self) -> Option<&SearchResults> {
        self.results.as_ref()
    }

    pub const fn autocomplete(&self) -> &Autocomplete {
        &self.autocomplete
    }

    pub fn autocomplete_mut(&mut self) -> &mut Autocomplete {
        &mut self.autocomplete
    }

    pub const fn index(&self) -> Option<&SearchIndex> {
        self.index.as_ref()
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.input.push(c);
        self.input_changed(now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        if self.input.pop().is_some() {
            self.input_changed(now);
        }
    }

    fn input_changed(&mut self, now: Instant) {
        self.autocomplete.update(&self.input);
        self.debouncer.push(self.input.clone(), now);
    }

    /// Runs a debounced search when it is due. Returns whether results changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.run(&query);
                true
            }
            None => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Replaces the input and searches immediately.
    pub fn run_query(&mut self, query: &str) {
        self.input = query.to_string();
        self.debouncer.cancel();
        self.autocomplete.clear();
        self.run(query);
    }

    fn run(&mut self, query: &str) {
        if let Some(index) = &self.index {
            self.results = Some(index.search(query));
        }
    }

    pub fn toggle_filter(&mut self, filter: SearchFilter) {
        self.filter = self.filter.toggle(filter);
    }

    pub fn visible(&self) -> Vec<&SearchSource> {
        match (&self.index, &self.results) {
            (Some(index), Some(results)) => index.visible(results, &self.filter),
            _ => Vec::new(),
        }
    }

    /// Filters that currently have at least one result, `All` first.
    pub fn available_filters(&self) -> Vec<(SearchFilter, usize)> {
        let Some(results) = &self.results else {
            return Vec::new();
        };
        let counts = &results.counts;
        let mut filters = vec![(SearchFilter::All, counts.total)];
        if counts.posts > 0 {
            filters.push((SearchFilter::Posts, counts.posts));
        }
        if counts.comments > 0 {
            filters.push((SearchFilter::Comments, counts.comments));
        }
        filters.extend(
            counts
                .platforms
                .iter()
                .map(|(platform, count)| (SearchFilter::Platform(platform.clone()), *count)),
        );
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reddit(kind: RedditKind, body: &str) -> SearchSource {
        SearchSource {
            origin: SearchOrigin::Reddit {
                kind,
                community: Some("productivity".to_string()),
                upvotes: 1,
            },
            title: None,
            body: body.to_string(),
            date: None,
            url: None,
            author: None,
            icon: "reddit.png".to_string(),
        }
    }

    fn review(platform: &str, body: &str) -> SearchSource {
        SearchSource {
            origin: SearchOrigin::Review {
                platform: platform.to_string(),
                rating: Some(4),
            },
            title: None,
            body: body.to_string(),
            date: None,
            url: None,
            author: None,
            icon: "appstore.png".to_string(),
        }
    }

    fn corpus() -> SearchIndex {
        SearchIndex::new(vec![
            reddit(RedditKind::Post, "My Bluetooth mic is ignored"),
            review("appstore", "Works great with AirPods"),
            review("trustpilot", "bluetooth headsets lag badly, Bluetooth is a mess"),
        ])
    }

    #[test]
    fn query_matches_case_insensitively_and_counts_only_hits() {
        let index = corpus();
        let results = index.search("bluetooth");

        assert_eq!(results.hits, vec![0, 2]);
        assert_eq!(results.counts.total, 2);
        assert_eq!(results.counts.posts, 1);
        assert_eq!(
            results.counts.platforms,
            BTreeMap::from([("trustpilot".to_string(), 1)])
        );
    }

    #[test]
    fn short_query_returns_everything() {
        let index = corpus();
        assert_eq!(index.search("b").hits.len(), 3);
        assert_eq!(index.search("").hits.len(), 3);
    }

    #[test]
    fn title_is_searched_too() {
        let mut source = reddit(RedditKind::Post, "nothing here");
        source.title = Some("Dictation accuracy".to_string());
        let index = SearchIndex::new(vec![source]);
        assert_eq!(index.search("ACCURACY").hits, vec![0]);
    }

    #[test]
    fn scan_stops_at_the_result_cap() {
        let sources = (0..80).map(|i| review("appstore", &format!("crash {i}"))).collect();
        let index = SearchIndex::new(sources);
        let results = index.search("crash");
        assert_eq!(results.hits.len(), MAX_SEARCH_RESULTS);
        assert_eq!(results.hits.last(), Some(&(MAX_SEARCH_RESULTS - 1)));
    }

    #[test]
    fn filter_narrows_display_but_not_counts() {
        let index = corpus();
        let results = index.search("bluetooth");

        let trustpilot = SearchFilter::Platform("trustpilot".to_string());
        let only_reviews = index.visible(&results, &trustpilot);
        assert_eq!(only_reviews.len(), 1);
        assert_eq!(index.visible(&results, &SearchFilter::Comments).len(), 0);
        assert_eq!(results.counts.count_for(&SearchFilter::All), 2);
    }

    #[test]
    fn toggling_active_filter_returns_all() {
        let active = SearchFilter::Posts;
        assert_eq!(active.toggle(SearchFilter::Posts), SearchFilter::All);
        assert_eq!(active.toggle(SearchFilter::Comments), SearchFilter::Comments);
    }

    #[test]
    fn autocomplete_index_stays_within_bounds() {
        let mut autocomplete = Autocomplete::new(["pricing".to_string(), "privacy".to_string()]);
        autocomplete.update("pri");
        assert_eq!(autocomplete.suggestions().len(), 2);
        assert_eq!(autocomplete.selected(), None);

        autocomplete.previous();
        assert_eq!(autocomplete.selected(), None);
        autocomplete.next();
        autocomplete.next();
        autocomplete.next();
        assert_eq!(autocomplete.selected(), Some(1));
        autocomplete.previous();
        autocomplete.previous();
        assert_eq!(autocomplete.selected(), None);
        assert_eq!(autocomplete.accept(), None);

        autocomplete.next();
        assert!(autocomplete.accept().is_some());
    }

    #[test]
    fn autocomplete_ranks_closer_matches_first() {
        let mut autocomplete = Autocomplete::default();
        autocomplete.extend(["Bluetooth Issues".to_string()]);
        autocomplete.update("blue");
        let first = autocomplete.suggestions().first().map(|s| s.query.as_str());
        assert!(matches!(first, Some("bluetooth" | "bluetooth issues")));
        autocomplete.update("zzzz");
        assert!(autocomplete.suggestions().is_empty());
    }

    #[test]
    fn debouncer_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push("blu", start);
        debouncer.push("blue", start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(400)),
            Some("blue".to_string())
        );
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn session_searches_after_debounce() {
        let start = Instant::now();
        let mut session = SearchSession::new(Duration::from_millis(300));
        session.load(corpus().sources);
        assert_eq!(session.visible().len(), 3);

        for (i, c) in "bluetooth".chars().enumerate() {
            session.push_char(c, start + Duration::from_millis(10 * i as u64));
        }
        assert!(!session.tick(start + Duration::from_millis(100)));
        assert_eq!(session.visible().len(), 3);

        assert!(session.tick(start + Duration::from_secs(1)));
        assert_eq!(session.visible().len(), 2);
        session.toggle_filter(SearchFilter::Posts);
        assert_eq!(session.visible().len(), 1);
        assert_eq!(session.results().map(|r| r.counts.total), Some(2));
    }
}
