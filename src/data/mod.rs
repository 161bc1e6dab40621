//! Data layer: core types, materialization, filtering and sorting.
//!
//! Architecture:
//! ```text
//!  headers + rows (query result)
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ materialize │  positional zip → Vec<Record>
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ filter, sort │  column predicates → visible row indices
//!   └──────────────┘
//! ```
pub mod filter;
pub mod loader;
pub mod materialize;
pub mod model;
pub mod sort;
