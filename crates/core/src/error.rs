#[derive(Debug, thiserror::Error)]
pub enum HospitalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid birth date {0:?}: expected DD/MM/YYYY, not in the future")]
    InvalidBirthDate(String),
    #[error("height must be greater than zero to compute BMI (got {0})")]
    InvalidHeight(f64),
    #[error("weight must be a finite number (got {0})")]
    InvalidWeight(f64),

    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("row with id {id:?} already exists in table {table}")]
    DuplicateId { table: String, id: String },
    #[error("row with id {id:?} does not exist in table {table}")]
    RowNotFound { table: String, id: String },
    #[error("row has no id column")]
    MissingId,
    #[error("column {column:?} already exists in table {table}")]
    ColumnExists { table: String, column: String },
    #[error("row columns do not match the columns of table {table}")]
    ColumnMismatch { table: String },
    #[error("column {column:?} does not exist in table {table}")]
    UnknownColumn { table: String, column: String },
    #[error("invalid find mode {0:?} (expected \"full\" or \"index\")")]
    InvalidFindMode(String),
    #[error("no row in table {table} has {column} = {value:?}")]
    NoMatch {
        table: String,
        column: String,
        value: String,
    },
    #[error("exactly one load source (file path or column data) must be provided")]
    LoadSource,
    #[error("column data has uneven lengths")]
    RaggedColumns,

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("storage directory does not exist: {}", .0.display())]
    StorageDirMissing(std::path::PathBuf),
    #[error("failed to read table file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write table file: {0}")]
    FileWrite(std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialize list cell: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize list cell: {0}")]
    Deserialization(serde_json::Error),
}

impl From<hospital_types::TextError> for HospitalError {
    fn from(err: hospital_types::TextError) -> Self {
        HospitalError::InvalidInput(err.to_string())
    }
}

pub type HospitalResult<T> = std::result::Result<T, HospitalError>;
