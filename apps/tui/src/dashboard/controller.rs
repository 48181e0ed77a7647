use chrono::{NaiveDateTime, Utc};
use tracing::debug;

use crate::domain::{TimeAnchor, TimeRange};
use crate::model::{Category, DashboardData};

use super::charts::{bar_entries, BarEntry, TimeSeriesChart};
use super::detail::{build_detail, DetailMode, DetailView};
use super::state::{reduce, DashboardEvent, DashboardState, Effect, RenderTicket, Selection};
use super::time_filter::TimeWindow;

/// Owns the loaded data and everything derived from the selection state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    data: DashboardData,
    state: DashboardState,
    chart: TimeSeriesChart,
    window: TimeWindow,
    anchor: TimeAnchor,
    now: NaiveDateTime,
}

impl Dashboard {
    pub fn new(data: DashboardData, time_range: TimeRange, anchor: TimeAnchor) -> Self {
        Self::with_clock(data, time_range, anchor, Utc::now().naive_utc())
    }

    pub fn with_clock(
        data: DashboardData,
        time_range: TimeRange,
        anchor: TimeAnchor,
        now: NaiveDateTime,
    ) -> Self {
        let state = DashboardState::initial(&data, time_range);
        let window = TimeWindow::resolve(time_range, anchor, &data.time_series, now);
        let mut chart = TimeSeriesChart::new(&data.time_series, &window);
        chart.replace_selected(&data.time_series, &window, state.selection.name());
        Self {
            data,
            state,
            chart,
            window,
            anchor,
            now,
        }
    }

    pub const fn data(&self) -> &DashboardData {
        &self.data
    }

    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    pub const fn chart(&self) -> &TimeSeriesChart {
        &self.chart
    }

    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub const fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Applies an event. Returns a ticket when a detail render must be scheduled.
    pub fn dispatch(&mut self, event: DashboardEvent) -> Option<RenderTicket> {
        let transition = reduce(&self.state, &event);
        self.state = transition.state;

        let mut scheduled = None;
        for effect in transition.effects {
            debug!(?effect, "applying dashboard effect");
            match effect {
                Effect::ReplaceSelectedLine(name) => {
                    self.chart
                        .replace_selected(&self.data.time_series, &self.window, &name);
                }
                Effect::ShowHoverLine(name) => {
                    self.chart.show_hover(&self.data.time_series, &self.window, &name);
                }
                Effect::RemoveHoverLine => self.chart.clear_hover(),
                Effect::Retruncate => {
                    self.window = TimeWindow::resolve(
                        self.state.time_range,
                        self.anchor,
                        &self.data.time_series,
                        self.now,
                    );
                    self.chart.retruncate(&self.data.time_series, &self.window);
                }
                Effect::ScheduleRender(ticket) => scheduled = Some(ticket),
            }
        }
        scheduled
    }

    pub fn select_bar_at(&mut self, index: usize) -> Option<RenderTicket> {
        let name = self.data.bar_category(index)?.name.clone();
        self.dispatch(DashboardEvent::SelectCategory { name, index })
    }

    pub fn hover_bar_at(&mut self, index: usize) {
        if let Some(category) = self.data.bar_category(index) {
            let name = category.name.clone();
            self.dispatch(DashboardEvent::HoverBar { index, name });
        }
    }

    pub fn bars(&self) -> Vec<BarEntry> {
        bar_entries(
            &self.data,
            &self.window,
            self.state.selection.bar_index(),
            self.state.hovered_bar,
        )
    }

    pub fn bar_count(&self) -> usize {
        self.data.bar_categories().count()
    }

    pub fn rendered_category(&self) -> Option<&str> {
        self.state.rendered.as_ref().map(Selection::name)
    }

    fn category_for(&self, selection: &Selection) -> Option<&Category> {
        match selection {
            Selection::Other => self.data.other_category(),
            Selection::Category { name, .. } => self.data.find_category(name),
        }
    }

    /// Detail panel for the committed selection, `None` while nothing is committed.
    pub fn detail(&self, mode: DetailMode) -> Option<DetailView> {
        let selection = self.state.rendered.as_ref()?;
        let category = self.category_for(selection)?;
        Some(build_detail(
            category,
            &self.window,
            self.state.selected_source.as_deref(),
            mode,
        ))
    }
}
