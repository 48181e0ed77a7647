use chrono::{Months, NaiveDate, NaiveDateTime};

use crate::domain::{TimeAnchor, TimeRange};
use crate::model::{Item, TimeSeries};

fn parse_month(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.split_once('-')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok().filter(|month| (1..=12).contains(month))?;
    Some((year, month))
}

/// `YYYY-MM` of the first month inside the range, counting `last_raw` itself.
pub fn cutoff_month_label(last_raw: &str, months_back: u32) -> Option<String> {
    let (year, month) = parse_month(last_raw)?;
    let months = i64::from(year) * 12 + i64::from(month - 1)
        - i64::from(months_back.saturating_sub(1));
    let cutoff_year = months.div_euclid(12);
    let cutoff_month = months.rem_euclid(12) + 1;
    Some(format!("{cutoff_year:04}-{cutoff_month:02}"))
}

/// First index of `raw_labels` inside the range. Falls back to 0.
pub fn chart_start_index(raw_labels: &[String], range: TimeRange) -> usize {
    let (Some(months_back), Some(last)) = (range.months_back(), raw_labels.last()) else {
        return 0;
    };
    let Some(cutoff) = cutoff_month_label(last, months_back) else {
        return 0;
    };
    // "YYYY-MM" sorts chronologically
    raw_labels
        .iter()
        .position(|label| label.as_str() >= cutoff.as_str())
        .unwrap_or(0)
}

/// Earliest date an item may carry to survive the range, `None` for `all`.
pub fn item_cutoff(
    range: TimeRange,
    anchor: TimeAnchor,
    last_raw: Option<&str>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let months_back = range.months_back()?;
    let from_data = || {
        let last = last_raw?;
        let cutoff = cutoff_month_label(last, months_back)?;
        NaiveDate::parse_from_str(&format!("{cutoff}-01"), "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)
    };
    let from_clock = || now.checked_sub_months(Months::new(months_back));

    match anchor {
        TimeAnchor::LatestData => from_data().or_else(from_clock),
        TimeAnchor::WallClock => from_clock(),
    }
}

/// Undated items are always kept.
pub fn filter_items(items: &[Item], cutoff: Option<NaiveDateTime>) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| match (cutoff, item.date) {
            (Some(cutoff), Some(date)) => date >= cutoff,
            _ => true,
        })
        .collect()
}

/// The resolved time range: where the chart starts and where items are cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub range: TimeRange,
    pub start_index: usize,
    pub cutoff: Option<NaiveDateTime>,
}

impl TimeWindow {
    pub fn resolve(
        range: TimeRange,
        anchor: TimeAnchor,
        series: &TimeSeries,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            range,
            start_index: chart_start_index(&series.raw_labels, range),
            cutoff: item_cutoff(range, anchor, series.last_raw_label(), now),
        }
    }

    pub fn filter<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        filter_items(items, self.cutoff)
    }

    pub fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        data.get(self.start_index..).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{date, review_item};
    use pretty_assertions::assert_eq;

    fn months(labels: &[&str]) -> Vec<String> {
        labels.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn three_months_starts_two_months_before_the_last_label() {
        let raw = months(&["2025-07", "2025-08", "2025-09", "2025-10", "2025-11"]);
        assert_eq!(chart_start_index(&raw, TimeRange::ThreeMonths), 2);
        assert_eq!(raw[2], "2025-09");
        assert_eq!(chart_start_index(&raw, TimeRange::All), 0);
        // range longer than the data keeps everything
        assert_eq!(chart_start_index(&raw, TimeRange::OneYear), 0);
    }

    #[test]
    fn cutoff_label_wraps_across_years() {
        assert_eq!(cutoff_month_label("2025-02", 3).as_deref(), Some("2024-12"));
        assert_eq!(cutoff_month_label("2025-01", 12).as_deref(), Some("2024-02"));
        assert_eq!(cutoff_month_label("2025-11", 6).as_deref(), Some("2025-06"));
        assert_eq!(cutoff_month_label("garbage", 3), None);
    }

    #[test]
    fn gaps_in_months_resolve_to_first_label_at_or_after_cutoff() {
        let raw = months(&["2024-01", "2025-03", "2025-06"]);
        assert_eq!(chart_start_index(&raw, TimeRange::ThreeMonths), 2);
        assert_eq!(chart_start_index(&raw, TimeRange::SixMonths), 1);
    }

    #[test]
    fn dateless_items_survive_every_range() {
        let raw = months(&["2025-07", "2025-08", "2025-09", "2025-10", "2025-11"]);
        let mut items = Vec::new();
        for day in ["2025-09-01", "2025-10-15", "2025-11-30"] {
            items.push(review_item("App Store", "recent", "recent", Some(day)));
        }
        for day in ["2025-01-01", "2025-03-01", "2025-05-01", "2025-07-01", "2025-08-31"] {
            items.push(review_item("App Store", "old", "old", Some(day)));
        }
        items.push(review_item("App Store", "undated", "undated", None));
        items.push(review_item("App Store", "undated", "undated", None));
        assert_eq!(items.len(), 10);

        let last = raw.last().map(String::as_str);
        let cutoff = item_cutoff(
            TimeRange::ThreeMonths,
            TimeAnchor::LatestData,
            last,
            date("2026-06-01"),
        );
        assert_eq!(filter_items(&items, cutoff).len(), 5);
        assert_eq!(filter_items(&items, None).len(), 10);
    }

    #[test]
    fn wall_clock_anchor_measures_from_now() {
        let raw = months(&["2025-07", "2025-11"]);
        let now = date("2026-03-15");
        let last = raw.last().map(String::as_str);
        let cutoff = item_cutoff(TimeRange::ThreeMonths, TimeAnchor::WallClock, last, now);
        assert_eq!(cutoff, Some(date("2025-12-15")));
    }

    #[test]
    fn data_anchor_falls_back_to_clock_without_labels() {
        let now = date("2026-03-15");
        let cutoff = item_cutoff(TimeRange::SixMonths, TimeAnchor::LatestData, None, now);
        assert_eq!(cutoff, Some(date("2025-09-15")));
        assert_eq!(item_cutoff(TimeRange::All, TimeAnchor::LatestData, None, now), None);
    }

    #[test]
    fn window_slice_is_a_suffix() {
        let series = crate::model::fixtures::dashboard().time_series;
        let window = TimeWindow::resolve(
            TimeRange::ThreeMonths,
            TimeAnchor::LatestData,
            &series,
            date("2026-01-01"),
        );
        assert_eq!(window.slice(&series.raw_labels), &series.raw_labels[2..]);
        assert_eq!(window.cutoff, Some(date("2025-09-01").date().and_hms_opt(0, 0, 0).unwrap()));
    }
}
