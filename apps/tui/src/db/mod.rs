pub mod models;
pub mod pool;
pub mod queries;
pub use pool::{connect_existing, table_exists};
