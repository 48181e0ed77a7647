pub mod cards;
pub mod charts;
pub mod popup;
pub mod text;
