//! # Hospital Core
//!
//! Record keeping for a small hospital department: patients, staff, radiopharmaceuticals,
//! exams and appointments, each kept in its own CSV table.
//!
//! - [`TableStore`] is the persistence layer for one table (add/remove/update/find rows,
//!   load and save).
//! - [`entities`] holds the record types and their validation (age and BMI for patients).
//! - [`Hospital`] owns one store per table and saves after every change.
//!
//! **No console concerns**: menus and prompts live in the `hospital-run` package, and the
//! scripting commands in `hospital-cli`.

pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod hospital;
pub mod row;
pub mod table;

pub use config::{DirPolicy, StorageConfig};
pub use entities::{Record, TableKind};
pub use error::{HospitalError, HospitalResult};
pub use hospital::Hospital;
pub use hospital_types::RecordId;
pub use row::{Row, Table};
pub use table::{ColumnData, FindMode, Found, TableStore};
