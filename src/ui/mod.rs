//! Plain-text rendering of [`AppState`](crate::state::AppState) for the terminal.
//!
//! Every function here only reads the state and returns the text to print.

pub mod panels;
pub mod plot;
pub mod table;

/// Shown when there is no result to render.
pub const NO_DATA: &str = "No data to display";
pub const NO_DATA_HINT: &str = "Execute a SQL query to see results here";
