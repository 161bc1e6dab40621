//! Query Lens: turns a schema-described query result into table, facet,
//! chart and CSV views.
//!
//! ```text
//!  QueryService ─► ResultSet ─► materialize ─► Vec<Record>
//!                                              ├─► columns  (format, facets, search)
//!                                              ├─► chart    (axes, points, ChartSpec)
//!                                              └─► export   (CSV artifact)
//! ```
//!
//! [`state::AppState`] ties the stages together for a surface and
//! [`ui`] renders it as text.

pub mod chart;
pub mod color;
pub mod columns;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod facets;
pub mod format;
pub mod query;
pub mod state;
pub mod ui;
