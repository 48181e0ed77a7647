// Application state, side effects and key handling for the dashboard binary

pub mod actions;
pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, AppScreen};
