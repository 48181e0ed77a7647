//! Selection state machine.
//!
//! [`reduce`] is a pure function of `(state, event)`. Anything that touches
//! the chart model or the clock is returned as an [`Effect`] and applied by
//! [`super::Dashboard`].

use crate::domain::TimeRange;
use crate::model::{DashboardData, OTHER_CATEGORY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Category { name: String, index: usize },
    Other,
}

impl Selection {
    pub fn name(&self) -> &str {
        match self {
            Self::Category { name, .. } => name,
            Self::Other => OTHER_CATEGORY,
        }
    }

    pub const fn bar_index(&self) -> Option<usize> {
        match self {
            Self::Category { index, .. } => Some(*index),
            Self::Other => None,
        }
    }

    pub const fn is_other(&self) -> bool {
        matches!(self, Self::Other)
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
    }
}

/// Issued for each selection change; only the newest one may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTicket {
    generation: u64,
}

impl RenderTicket {
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub selection: Selection,
    pub selected_source: Option<String>,
    pub time_range: TimeRange,
    pub hovered_bar: Option<usize>,
    pub generation: u64,
    pub loading: bool,
    /// Selection whose detail panel is currently on screen.
    pub rendered: Option<Selection>,
}

impl DashboardState {
    /// Fresh state for newly loaded data. Only the time range carries over.
    pub fn initial(data: &DashboardData, time_range: TimeRange) -> Self {
        let selection = data
            .bar_categories()
            .next()
            .map_or(Selection::Other, |category| Selection::Category {
                name: category.name.clone(),
                index: 0,
            });
        Self {
            rendered: Some(selection.clone()),
            selection,
            selected_source: None,
            time_range,
            hovered_bar: None,
            generation: 0,
            loading: false,
        }
    }

    pub const fn current_ticket(&self) -> RenderTicket {
        RenderTicket {
            generation: self.generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    SelectCategory { name: String, index: usize },
    SelectOther,
    SetTimeRange(TimeRange),
    HoverBar { index: usize, name: String },
    ClearHover,
    ToggleSource(String),
    RenderDue(RenderTicket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ReplaceSelectedLine(String),
    ShowHoverLine(String),
    RemoveHoverLine,
    Retruncate,
    ScheduleRender(RenderTicket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: DashboardState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &DashboardState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

fn change_selection(state: &DashboardState, selection: Selection) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    if next.hovered_bar.is_some() && next.hovered_bar == selection.bar_index() {
        next.hovered_bar = None;
        effects.push(Effect::RemoveHoverLine);
    }
    effects.push(Effect::ReplaceSelectedLine(selection.name().to_string()));

    next.selection = selection;
    next.selected_source = None;
    next.generation += 1;
    next.loading = true;
    effects.push(Effect::ScheduleRender(next.current_ticket()));

    Transition {
        state: next,
        effects,
    }
}

pub fn reduce(state: &DashboardState, event: &DashboardEvent) -> Transition {
    match event {
        DashboardEvent::SelectCategory { name, .. }
            if name.eq_ignore_ascii_case(OTHER_CATEGORY) =>
        {
            reduce(state, &DashboardEvent::SelectOther)
        }
        DashboardEvent::SelectCategory { name, index } => {
            if state.selection.matches_name(name) {
                return Transition::unchanged(state);
            }
            change_selection(
                state,
                Selection::Category {
                    name: name.clone(),
                    index: *index,
                },
            )
        }
        DashboardEvent::SelectOther => {
            if state.selection.is_other() {
                return Transition::unchanged(state);
            }
            change_selection(state, Selection::Other)
        }
        DashboardEvent::SetTimeRange(range) => {
            if *range == state.time_range {
                return Transition::unchanged(state);
            }
            let mut next = state.clone();
            next.time_range = *range;
            Transition {
                state: next,
                effects: vec![Effect::Retruncate],
            }
        }
        DashboardEvent::HoverBar { index, name } => {
            if state.selection.bar_index() == Some(*index) {
                return reduce(state, &DashboardEvent::ClearHover);
            }
            if state.hovered_bar == Some(*index) {
                return Transition::unchanged(state);
            }
            let mut next = state.clone();
            next.hovered_bar = Some(*index);
            Transition {
                state: next,
                effects: vec![Effect::ShowHoverLine(name.clone())],
            }
        }
        DashboardEvent::ClearHover => {
            if state.hovered_bar.is_none() {
                return Transition::unchanged(state);
            }
            let mut next = state.clone();
            next.hovered_bar = None;
            Transition {
                state: next,
                effects: vec![Effect::RemoveHoverLine],
            }
        }
        DashboardEvent::ToggleSource(_) if state.loading => Transition::unchanged(state),
        DashboardEvent::ToggleSource(source) => {
            let mut next = state.clone();
            next.selected_source = if state.selected_source.as_deref() == Some(source.as_str()) {
                None
            } else {
                Some(source.clone())
            };
            Transition {
                state: next,
                effects: Vec::new(),
            }
        }
        DashboardEvent::RenderDue(ticket) => {
            if ticket.generation != state.generation || !state.loading {
                return Transition::unchanged(state);
            }
            let mut next = state.clone();
            next.loading = false;
            next.rendered = Some(next.selection.clone());
            Transition {
                state: next,
                effects: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::dashboard;
    use pretty_assertions::assert_eq;

    fn select(name: &str, index: usize) -> DashboardEvent {
        DashboardEvent::SelectCategory {
            name: name.to_string(),
            index,
        }
    }

    fn settled(state: DashboardState) -> DashboardState {
        let ticket = state.current_ticket();
        reduce(&state, &DashboardEvent::RenderDue(ticket)).state
    }

    #[test]
    fn initial_state_selects_first_bar_category() {
        let state = DashboardState::initial(&dashboard(), TimeRange::SixMonths);
        assert_eq!(
            state.selection,
            Selection::Category {
                name: "Bugs".to_string(),
                index: 0
            }
        );
        assert_eq!(state.time_range, TimeRange::SixMonths);
        assert!(!state.loading);
    }

    #[test]
    fn selecting_the_selected_category_is_a_no_op() {
        let mut state = DashboardState::initial(&dashboard(), TimeRange::All);
        state.selected_source = Some("appstore".to_string());

        let transition = reduce(&state, &select("bugs", 5));

        assert_eq!(transition.state, state);
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn selecting_a_category_resets_source_and_schedules_render() {
        let mut state = DashboardState::initial(&dashboard(), TimeRange::All);
        state.selected_source = Some("appstore".to_string());

        let transition = reduce(&state, &select("Pricing", 2));
        let next = &transition.state;

        assert_eq!(next.selection.bar_index(), Some(2));
        assert_eq!(next.selected_source, None);
        assert!(next.loading);
        assert_eq!(
            transition.effects,
            vec![
                Effect::ReplaceSelectedLine("Pricing".to_string()),
                Effect::ScheduleRender(next.current_ticket()),
            ]
        );
    }

    #[test]
    fn selecting_other_clears_the_bar_index() {
        let initial = DashboardState::initial(&dashboard(), TimeRange::All);
        let state = settled(reduce(&initial, &select("Pricing", 2)).state);

        let transition = reduce(&state, &DashboardEvent::SelectOther);

        assert_eq!(transition.state.selection, Selection::Other);
        assert_eq!(transition.state.selection.bar_index(), None);
        assert_eq!(transition.effects[0], Effect::ReplaceSelectedLine("other".to_string()));
        // again is a no-op
        assert!(reduce(&transition.state, &DashboardEvent::SelectOther).effects.is_empty());
    }

    #[test]
    fn stale_render_tickets_are_discarded() {
        let state = DashboardState::initial(&dashboard(), TimeRange::All);
        let first = reduce(&state, &select("Speed", 1)).state;
        let stale = first.current_ticket();
        let second = reduce(&first, &select("Pricing", 2)).state;

        let after_stale = reduce(&second, &DashboardEvent::RenderDue(stale)).state;
        assert!(after_stale.loading);
        assert_eq!(after_stale.rendered, state.rendered);

        let committed = settled(after_stale);
        assert!(!committed.loading);
        assert_eq!(committed.rendered.as_ref().map(Selection::name), Some("Pricing"));
    }

    #[test]
    fn time_range_change_keeps_selection_and_source() {
        let mut state = DashboardState::initial(&dashboard(), TimeRange::All);
        state.selected_source = Some("reddit".to_string());

        let transition = reduce(&state, &DashboardEvent::SetTimeRange(TimeRange::ThreeMonths));

        assert_eq!(transition.state.selection, state.selection);
        assert_eq!(transition.state.selected_source.as_deref(), Some("reddit"));
        assert_eq!(transition.effects, vec![Effect::Retruncate]);
    }

    #[test]
    fn hovering_the_selected_bar_clears_hover() {
        let state = DashboardState::initial(&dashboard(), TimeRange::All);
        let hovered = reduce(
            &state,
            &DashboardEvent::HoverBar {
                index: 1,
                name: "Speed".to_string(),
            },
        );
        assert_eq!(hovered.state.hovered_bar, Some(1));
        assert_eq!(hovered.effects, vec![Effect::ShowHoverLine("Speed".to_string())]);

        let on_selected = reduce(
            &hovered.state,
            &DashboardEvent::HoverBar {
                index: 0,
                name: "Bugs".to_string(),
            },
        );
        assert_eq!(on_selected.state.hovered_bar, None);
        assert_eq!(on_selected.effects, vec![Effect::RemoveHoverLine]);
    }

    #[test]
    fn toggling_the_active_source_clears_it() {
        let state = DashboardState::initial(&dashboard(), TimeRange::All);
        let on = reduce(&state, &DashboardEvent::ToggleSource("appstore".to_string())).state;
        assert_eq!(on.selected_source.as_deref(), Some("appstore"));
        let off = reduce(&on, &DashboardEvent::ToggleSource("appstore".to_string())).state;
        assert_eq!(off.selected_source, None);
    }

    #[test]
    fn source_toggles_wait_for_the_pending_render() {
        let state = DashboardState::initial(&dashboard(), TimeRange::All);
        let pending = reduce(&state, &select("Speed", 1)).state;

        let toggled = reduce(&pending, &DashboardEvent::ToggleSource("reddit".to_string()));
        assert_eq!(toggled.state, pending);

        let committed = settled(toggled.state);
        assert_eq!(committed.selected_source, None);
        assert_eq!(committed.rendered.as_ref().map(Selection::name), Some("Speed"));
    }
}
