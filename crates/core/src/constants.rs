//! Constants used throughout the hospital core crate.
//!
//! Table and column names are the names written to disk. They are kept stable so that data
//! files produced by earlier versions of the tool stay readable.

/// Default directory for table files when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Extension of every table file.
pub const TABLE_FILE_EXTENSION: &str = "csv";

/// Format of every date entered at the console.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Status given to staff members when none is supplied.
pub const DEFAULT_STAFF_STATUS: &str = "Ativo";

/// Primary key column shared by every table.
pub const ID_COLUMN: &str = "id";

pub const PATIENTS_TABLE: &str = "pacientes";
pub const STAFF_TABLE: &str = "funcionarios";
pub const RADIOPHARMACEUTICALS_TABLE: &str = "radiofarmacos";
pub const EXAMS_TABLE: &str = "exames";
pub const APPOINTMENTS_TABLE: &str = "consultas";
pub const HANDOFFS_TABLE: &str = "passagens";
