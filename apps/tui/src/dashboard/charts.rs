use crate::model::{DashboardData, TimeSeries};

use super::time_filter::TimeWindow;

/// How a bar is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarVisual {
    Default,
    Hovered,
    Selected,
}

impl BarVisual {
    pub fn of(index: usize, selected: Option<usize>, hovered: Option<usize>) -> Self {
        if selected == Some(index) {
            Self::Selected
        } else if hovered == Some(index) {
            Self::Hovered
        } else {
            Self::Default
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarEntry {
    pub index: usize,
    pub name: String,
    pub count: usize,
    pub visual: BarVisual,
}

/// One bar per non-"other" category in data order, counted inside the window.
pub fn bar_entries(
    data: &DashboardData,
    window: &TimeWindow,
    selected: Option<usize>,
    hovered: Option<usize>,
) -> Vec<BarEntry> {
    data.bar_categories()
        .enumerate()
        .map(|(index, category)| BarEntry {
            index,
            name: category.name.clone(),
            count: window.filter(&category.items).len(),
            visual: BarVisual::of(index, selected, hovered),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Selected,
    Hover,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSeries {
    pub name: String,
    pub role: LineRole,
    pub data: Vec<u32>,
}

impl LineSeries {
    fn sliced(series: &TimeSeries, window: &TimeWindow, name: &str, role: LineRole) -> Self {
        let visible = series.len().saturating_sub(window.start_index);
        let data = series
            .series_for(name)
            .map_or_else(|| vec![0; visible], |data| window.slice(data).to_vec());
        Self {
            name: name.to_string(),
            role,
            data,
        }
    }
}

/// Labels plus at most one selected line and one hover line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeriesChart {
    labels: Vec<String>,
    selected: Option<LineSeries>,
    hover: Option<LineSeries>,
}

impl TimeSeriesChart {
    pub fn new(series: &TimeSeries, window: &TimeWindow) -> Self {
        Self {
            labels: window.slice(&series.labels).to_vec(),
            selected: None,
            hover: None,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub const fn selected(&self) -> Option<&LineSeries> {
        self.selected.as_ref()
    }

    pub const fn hover(&self) -> Option<&LineSeries> {
        self.hover.as_ref()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSeries> {
        self.selected.iter().chain(self.hover.iter())
    }

    pub fn replace_selected(&mut self, series: &TimeSeries, window: &TimeWindow, name: &str) {
        self.selected = Some(LineSeries::sliced(series, window, name, LineRole::Selected));
    }

    pub fn show_hover(&mut self, series: &TimeSeries, window: &TimeWindow, name: &str) {
        self.hover = Some(LineSeries::sliced(series, window, name, LineRole::Hover));
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    /// Re-slices labels and both lines after the window changed.
    pub fn retruncate(&mut self, series: &TimeSeries, window: &TimeWindow) {
        self.labels = window.slice(&series.labels).to_vec();
        if let Some(line) = self.selected.take() {
            self.replace_selected(series, window, &line.name);
        }
        if let Some(line) = self.hover.take() {
            self.show_hover(series, window, &line.name);
        }
    }

    pub fn max_value(&self) -> u32 {
        self.lines()
            .flat_map(|line| line.data.iter().copied())
            .max()
            .unwrap_or(0)
    }
}
