//! Highlighting and truncation shared by the detail cards and search results.
//!
//! Highlights are returned as [`Segment`]s rather than markup so the terminal
//! renderer can style them and tests can strip them trivially.

use std::ops::Range;

pub const ELLIPSIS: &str = "...";
/// Characters of context shown around a quote on an item card.
pub const QUOTE_CONTEXT_BUDGET: usize = 300;
/// Characters shown for a search result when nothing is highlighted.
pub const SNIPPET_PREVIEW_CHARS: usize = 250;
pub const SNIPPET_CHARS_BEFORE: usize = 50;
pub const SNIPPET_CHARS_AFTER: usize = 200;
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlight: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: false,
        }
    }

    pub fn highlighted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: true,
        }
    }
}

/// Concatenated text of all segments, markup stripped.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(|segment| segment.text.as_str()).collect()
}

/// Concatenated text of the highlighted segments only.
pub fn highlighted_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter(|segment| segment.highlight)
        .map(|segment| segment.text.as_str())
        .collect()
}

fn push_plain(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if !last.highlight => last.text.push_str(text),
        _ => segments.push(Segment::plain(text)),
    }
}

fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte range of the first case-insensitive occurrence of `needle` in `haystack`.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<Range<usize>> {
    find_case_insensitive_from(haystack, needle, 0)
}

fn find_case_insensitive_from(haystack: &str, needle: &str, from: usize) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    let tail = haystack.get(from..)?;
    for (offset, _) in tail.char_indices() {
        let start = from + offset;
        let mut candidate = haystack[start..].char_indices();
        let mut end = start;
        let matched = needle.chars().all(|wanted| match candidate.next() {
            Some((at, found)) if chars_match(found, wanted) => {
                end = start + at + found.len_utf8();
                true
            }
            _ => false,
        });
        if matched {
            return Some(start..end);
        }
    }
    None
}

/// All non-overlapping case-insensitive occurrences, in order.
pub fn find_all_case_insensitive(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(range) = find_case_insensitive_from(haystack, needle, from) {
        from = range.end;
        found.push(range);
    }
    found
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index `count` characters after `from`, clamped to the end.
fn advance_chars(text: &str, from: usize, count: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(offset, _)| from + offset)
}

/// Byte index `count` characters before `to`, clamped to the start.
fn retreat_chars(text: &str, to: usize, count: usize) -> usize {
    if count == 0 {
        return to;
    }
    text[..to]
        .char_indices()
        .rev()
        .nth(count - 1)
        .map_or(0, |(offset, _)| offset)
}

/// First `max_chars` characters, with an ellipsis when anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let end = advance_chars(text, 0, max_chars);
    if end == text.len() {
        text.to_string()
    } else {
        format!("{}{ELLIPSIS}", &text[..end])
    }
}

/// Like [`truncate_chars`] but backs off to the last word boundary.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let end = advance_chars(text, 0, max_chars);
    if end == text.len() {
        return text.to_string();
    }
    let cut = &text[..end];
    let cut = cut
        .rfind(char::is_whitespace)
        .filter(|&pos| pos > 0)
        .map_or(cut, |pos| &cut[..pos]);
    format!("{}{ELLIPSIS}", cut.trim_end())
}

/// Splits `budget` characters of context between the text before and after a quote.
pub const fn split_budget(before: usize, after: usize, budget: usize) -> (usize, usize) {
    if before + after <= budget {
        return (before, after);
    }
    let half = budget / 2;
    if before < half {
        (before, budget - before)
    } else if after < half {
        (budget - after, after)
    } else {
        (half, budget - half)
    }
}

/// Renders a card body with the quote highlighted in its surrounding text.
///
/// Returns `None` when there is no body. Without a quote the body is
/// truncated at a word boundary. A quote that cannot be found in the body is
/// shown alone, highlighted.
pub fn quote_in_context(body: &str, quote: Option<&str>) -> Option<Vec<Segment>> {
    if body.trim().is_empty() {
        return None;
    }
    let Some(quote) = quote.filter(|quote| !quote.trim().is_empty()) else {
        return Some(vec![Segment::plain(truncate_at_word(body, QUOTE_CONTEXT_BUDGET))]);
    };

    let located = body
        .find(quote)
        .map(|start| start..start + quote.len())
        .or_else(|| find_case_insensitive(body, quote));
    let Some(range) = located else {
        return Some(vec![Segment::highlighted(quote)]);
    };

    let before = &body[..range.start];
    let matched = &body[range.clone()];
    let after = &body[range.end..];

    let budget = QUOTE_CONTEXT_BUDGET.saturating_sub(char_len(matched));
    let (before_chars, after_chars) = split_budget(char_len(before), char_len(after), budget);

    let mut segments = Vec::with_capacity(3);

    let shown_before = &before[retreat_chars(before, before.len(), before_chars)..];
    if shown_before.len() < before.len() {
        let trimmed = shown_before
            .find(char::is_whitespace)
            .map_or(shown_before, |pos| shown_before[pos..].trim_start());
        push_plain(&mut segments, ELLIPSIS);
        push_plain(&mut segments, trimmed);
    } else {
        push_plain(&mut segments, shown_before);
    }

    segments.push(Segment::highlighted(matched));

    let shown_after = &after[..advance_chars(after, 0, after_chars)];
    if shown_after.len() < after.len() {
        let trimmed = shown_after
            .rfind(char::is_whitespace)
            .map_or(shown_after, |pos| shown_after[..pos].trim_end());
        push_plain(&mut segments, trimmed);
        push_plain(&mut segments, ELLIPSIS);
    } else {
        push_plain(&mut segments, shown_after);
    }

    Some(segments)
}

/// Search result preview with every occurrence of `query` highlighted.
///
/// The window covers up to 50 characters before the first match and 200
/// after it. Short queries are not highlighted.
pub fn search_snippet(text: &str, query: &str) -> Vec<Segment> {
    let query = query.trim();
    if char_len(query) < MIN_QUERY_CHARS {
        return vec![Segment::plain(truncate_chars(text, SNIPPET_PREVIEW_CHARS))];
    }
    let Some(first) = find_case_insensitive(text, query) else {
        return vec![Segment::plain(truncate_chars(text, SNIPPET_PREVIEW_CHARS))];
    };

    let start = retreat_chars(text, first.start, SNIPPET_CHARS_BEFORE);
    let end = advance_chars(text, first.end, SNIPPET_CHARS_AFTER);
    let window = &text[start..end];

    let mut segments = Vec::new();
    if start > 0 {
        push_plain(&mut segments, ELLIPSIS);
    }
    let mut cursor = 0;
    for range in find_all_case_insensitive(window, query) {
        push_plain(&mut segments, &window[cursor..range.start]);
        segments.push(Segment::highlighted(&window[range.clone()]));
        cursor = range.end;
    }
    push_plain(&mut segments, &window[cursor..]);
    if end < text.len() {
        push_plain(&mut segments, ELLIPSIS);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_body_is_shown_in_full_around_the_quote() {
        let body = "This app crashes often and I hate it so much honestly";
        let segments = quote_in_context(body, Some("crashes often")).unwrap();

        assert_eq!(
            segments,
            vec![
                Segment::plain("This app "),
                Segment::highlighted("crashes often"),
                Segment::plain(" and I hate it so much honestly"),
            ]
        );
        assert!(!plain_text(&segments).contains(ELLIPSIS));
    }

    #[test]
    fn verbatim_quote_round_trips_through_the_highlight() {
        let body = format!(
            "{} the dictation is flawless {}",
            "lead ".repeat(100),
            "tail ".repeat(100)
        );
        let quote = "the dictation is flawless";
        let segments = quote_in_context(&body, Some(quote)).unwrap();

        assert_eq!(highlighted_text(&segments), quote);
    }

    #[test]
    fn quote_is_located_case_insensitively_keeping_body_casing() {
        let segments = quote_in_context("It CRASHES Often.", Some("crashes often")).unwrap();
        assert_eq!(highlighted_text(&segments), "CRASHES Often");
    }

    #[test]
    fn missing_quote_is_rendered_alone() {
        let segments = quote_in_context("Nothing in common", Some("battery drain")).unwrap();
        assert_eq!(segments, vec![Segment::highlighted("battery drain")]);
    }

    #[test]
    fn no_body_renders_nothing() {
        assert_eq!(quote_in_context("", Some("quote")), None);
        assert_eq!(quote_in_context("   ", None), None);
    }

    #[test]
    fn no_quote_truncates_at_word_boundary() {
        let body = "word ".repeat(100);
        let segments = quote_in_context(&body, None).unwrap();
        let text = plain_text(&segments);

        assert!(text.ends_with("word..."));
        assert!(text.chars().count() <= QUOTE_CONTEXT_BUDGET + ELLIPSIS.len());
    }

    #[test]
    fn long_context_is_trimmed_to_words_with_ellipses() {
        let before = "alpha ".repeat(60);
        let after = " omega".repeat(60);
        let body = format!("{before}QUOTE{after}");
        let segments = quote_in_context(&body, Some("QUOTE")).unwrap();
        let text = plain_text(&segments);

        assert!(text.starts_with("...alpha"));
        assert!(text.ends_with("omega..."));
        assert!(text.chars().count() <= QUOTE_CONTEXT_BUDGET + 2 * ELLIPSIS.len());
    }

    #[test]
    fn budget_gives_the_short_side_all_of_its_text() {
        assert_eq!(split_budget(10, 20, 100), (10, 20));
        assert_eq!(split_budget(10, 500, 100), (10, 90));
        assert_eq!(split_budget(500, 30, 100), (70, 30));
        assert_eq!(split_budget(500, 500, 101), (50, 51));
    }

    #[test]
    fn truncation_helpers_only_add_ellipsis_when_cutting() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_at_word("hello brave new world", 13), "hello brave...");
        assert_eq!(truncate_chars("héllo wörld", 4), "héll...");
    }

    #[test]
    fn snippet_highlights_every_occurrence_in_window() {
        let text = "Bluetooth keeps dropping. My bluetooth headset too.";
        let segments = search_snippet(text, "bluetooth");

        let highlighted: Vec<&str> = segments
            .iter()
            .filter(|segment| segment.highlight)
            .map(|segment| segment.text.as_str())
            .collect();
        assert_eq!(highlighted, vec!["Bluetooth", "bluetooth"]);
        assert_eq!(plain_text(&segments), text);
    }

    #[test]
    fn snippet_windows_long_text_around_first_match() {
        let text = format!("{}needle{}", "a".repeat(120), "b".repeat(400));
        let segments = search_snippet(&text, "NEEDLE");
        let rendered = plain_text(&segments);

        assert!(rendered.starts_with(ELLIPSIS));
        assert!(rendered.ends_with(ELLIPSIS));
        assert_eq!(
            rendered.chars().count(),
            SNIPPET_CHARS_BEFORE + "needle".len() + SNIPPET_CHARS_AFTER + 2 * ELLIPSIS.len()
        );
    }

    #[test]
    fn short_query_only_truncates() {
        let text = "x".repeat(300);
        let segments = search_snippet(&text, "x");
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].highlight);
        assert_eq!(segments[0].text.chars().count(), SNIPPET_PREVIEW_CHARS + ELLIPSIS.len());
    }

    #[test]
    fn finds_all_occurrences_without_overlap() {
        assert_eq!(find_all_case_insensitive("aaaa", "aa"), vec![0..2, 2..4]);
        assert_eq!(find_case_insensitive("Straße", "SSE"), None);
        assert_eq!(find_case_insensitive("ÉCOLE école", "école"), Some(0..6));
    }
}
