//! Interactive dashboard logic: time filtering, chart models, the selection
//! state machine and the detail panel.

pub mod charts;
pub mod controller;
pub mod detail;
pub mod state;
pub mod time_filter;

pub use charts::{BarEntry, BarVisual, LineRole, LineSeries, TimeSeriesChart};
pub use controller::Dashboard;
pub use detail::{DetailMode, DetailView, ItemCard, SourceBadge, INLINE_CARD_LIMIT};
pub use state::{DashboardEvent, DashboardState, Effect, RenderTicket, Selection, Transition};
pub use time_filter::TimeWindow;
