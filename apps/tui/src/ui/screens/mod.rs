pub mod dashboard;
pub mod details;
pub mod help;
pub mod search;
