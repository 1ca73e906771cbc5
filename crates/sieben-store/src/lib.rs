//! # sieben-store
//!
//! SQLite persistence for Sieben goal graphs.
//!
//! The store never looks inside the engine: it writes the triple produced by
//! [`Goals::export`](sieben_goal::Goals::export) into three tables and reads
//! it back through [`Goals::build`](sieben_goal::Goals::build), which refuses
//! structurally corrupt data. Stored layouts are upgraded by a small
//! versioned migration runner before anything is read.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use sieben_store::GoalStore;
//!
//! let mut store = GoalStore::open("/tmp/sieben.db").unwrap();
//! let mut goals = store.load_or_new("Rename me").unwrap();
//! goals.add("Write the report", None);
//! store.save(&goals).unwrap();
//! ```

pub mod error;
mod schema;
pub mod store;

pub use error::StoreError;
pub use store::GoalStore;
