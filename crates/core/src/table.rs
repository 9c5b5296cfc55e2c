//! Tabular persistence for one entity table.
//!
//! A [`TableStore`] keeps the whole table in memory and mirrors it to a single CSV file under
//! the configured data directory:
//!
//! ```text
//! <data_dir>/
//!   pacientes.csv      # header row, then one line per record
//!   funcionarios.csv
//!   ...
//! ```
//!
//! Rows keep their insertion order. An `id -> position` map sits alongside the rows so that
//! duplicate checks and id lookups do not scan the table. The map always points at the first
//! row carrying a given id; a file edited by hand may hold more than one.
//!
//! Every operation reports failure through [`HospitalResult`]. Rejections that leave the table
//! untouched (duplicate id, missing row, column clashes) are also logged at `warn` level.

use crate::config::StorageConfig;
use crate::constants::ID_COLUMN;
use crate::row::{Row, Table};
use crate::{HospitalError, HospitalResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Column-oriented table data: each entry is a column name and every value in that column.
pub type ColumnData = Vec<(String, Vec<String>)>;

/// How [`TableStore::find`] reports its matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FindMode {
    /// Every matching row, as a sub-table.
    Full,
    /// Position of the first matching row.
    Index,
}

impl FromStr for FindMode {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(FindMode::Full),
            "index" => Ok(FindMode::Index),
            other => Err(HospitalError::InvalidFindMode(other.to_string())),
        }
    }
}

/// Result of [`TableStore::find`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Found {
    Rows(Table),
    Index(usize),
}

/// In-memory table bound to its backing CSV file.
#[derive(Debug)]
pub struct TableStore {
    name: String,
    path: PathBuf,
    cfg: StorageConfig,
    table: Table,
    index: HashMap<String, usize>,
}

impl TableStore {
    /// Creates a store bound to `<data_dir>/<name>.csv` without reading the file.
    pub fn empty(name: impl Into<String>, cfg: &StorageConfig) -> Self {
        let name = name.into();
        Self {
            path: cfg.table_path(&name),
            name,
            cfg: cfg.clone(),
            table: Table::default(),
            index: HashMap::new(),
        }
    }

    /// Creates a store and loads its backing file if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(name: impl Into<String>, cfg: &StorageConfig) -> HospitalResult<Self> {
        let mut store = Self::empty(name, cfg);
        store.refresh()?;
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    pub fn rows(&self) -> &[Row] {
        self.table.rows()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Row with the given id, if present.
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.index.get(id).map(|&pos| &self.table.rows()[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Adds a column holding `default` on every existing row.
    ///
    /// # Errors
    ///
    /// Returns [`HospitalError::ColumnExists`] if the table already has a column called `column`.
    pub fn add_column(&mut self, column: &str, default: &str) -> HospitalResult<()> {
        if self.table.has_column(column) {
            return Err(self.reject(HospitalError::ColumnExists {
                table: self.name.clone(),
                column: column.to_string(),
            }));
        }

        self.table.columns_mut().push(column.to_string());
        for row in self.table.rows_mut() {
            row.push_cell(column.to_string(), default.to_string());
        }
        tracing::debug!(table = %self.name, column, "added column");
        Ok(())
    }

    /// Appends a row.
    ///
    /// When the table has no rows yet, the row's columns become the table header. Otherwise the
    /// row must carry exactly the header's columns (in any order) and is stored in header order.
    ///
    /// # Errors
    ///
    /// - [`HospitalError::MissingId`] if the row has no `id` cell
    /// - [`HospitalError::DuplicateId`] if a row with the same id exists
    /// - [`HospitalError::ColumnMismatch`] if the row's columns differ from the header
    pub fn add_row(&mut self, row: Row) -> HospitalResult<()> {
        let Some(id) = row.id().map(str::to_owned) else {
            return Err(self.reject(HospitalError::MissingId));
        };

        if self.index.contains_key(&id) {
            return Err(self.reject(HospitalError::DuplicateId {
                table: self.name.clone(),
                id,
            }));
        }

        let row = if self.table.is_empty() {
            *self.table.columns_mut() = row.columns().map(str::to_owned).collect();
            row
        } else if row.has_columns(self.table.columns()) {
            row.arranged(self.table.columns())
        } else {
            return Err(self.reject(HospitalError::ColumnMismatch {
                table: self.name.clone(),
            }));
        };

        self.index.insert(id.clone(), self.table.len());
        self.table.rows_mut().push(row);
        tracing::debug!(table = %self.name, id = %id, "added row");
        Ok(())
    }

    /// Applies [`TableStore::add_row`] to each row in turn.
    ///
    /// A rejected row is logged and skipped; the rows after it are still attempted. Returns the
    /// number of rows that were added.
    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = Row>) -> usize {
        rows.into_iter()
            .map(|row| self.add_row(row))
            .filter(Result::is_ok)
            .count()
    }

    /// Removes every row whose id matches the id of `row`.
    ///
    /// Only the `id` cell of `row` is looked at. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// - [`HospitalError::MissingId`] if `row` has no `id` cell
    /// - [`HospitalError::RowNotFound`] if no row carries that id
    pub fn remove_row(&mut self, row: &Row) -> HospitalResult<usize> {
        let Some(id) = row.id() else {
            return Err(self.reject(HospitalError::MissingId));
        };

        if !self.index.contains_key(id) {
            return Err(self.reject(HospitalError::RowNotFound {
                table: self.name.clone(),
                id: id.to_string(),
            }));
        }

        let before = self.table.len();
        self.table.rows_mut().retain(|r| r.id() != Some(id));
        let removed = before - self.table.len();
        self.reindex();
        tracing::debug!(table = %self.name, id, removed, "removed rows");
        Ok(removed)
    }

    /// Replaces the row that has the same id as `row`.
    ///
    /// # Errors
    ///
    /// - [`HospitalError::MissingId`] if `row` has no `id` cell
    /// - [`HospitalError::RowNotFound`] if no row carries that id
    /// - [`HospitalError::ColumnMismatch`] if the row's columns differ from the header
    pub fn update_row(&mut self, row: Row) -> HospitalResult<()> {
        let Some(id) = row.id().map(str::to_owned) else {
            return Err(self.reject(HospitalError::MissingId));
        };

        let Some(&pos) = self.index.get(&id) else {
            return Err(self.reject(HospitalError::RowNotFound {
                table: self.name.clone(),
                id,
            }));
        };

        if !row.has_columns(self.table.columns()) {
            return Err(self.reject(HospitalError::ColumnMismatch {
                table: self.name.clone(),
            }));
        }

        self.table.rows_mut()[pos] = row.arranged(self.table.columns());
        tracing::debug!(table = %self.name, id = %id, "updated row");
        Ok(())
    }

    /// Looks up rows whose `column` equals `value`.
    ///
    /// With [`FindMode::Full`] every match is returned as a sub-table (possibly empty). With
    /// [`FindMode::Index`] the position of the first match is returned.
    ///
    /// # Errors
    ///
    /// - [`HospitalError::UnknownColumn`] if the table has no such column
    /// - [`HospitalError::NoMatch`] in index mode when nothing matches
    pub fn find(&self, column: &str, value: &str, mode: FindMode) -> HospitalResult<Found> {
        self.check_column(column)?;
        match mode {
            FindMode::Full => Ok(Found::Rows(self.matching_rows(column, value))),
            FindMode::Index => self.first_position(column, value).map(Found::Index),
        }
    }

    /// [`TableStore::find`] with the mode given as text (`"full"` or `"index"`).
    ///
    /// # Errors
    ///
    /// Returns [`HospitalError::InvalidFindMode`] for any other mode string, in addition to the
    /// errors of [`TableStore::find`].
    pub fn find_with_mode(&self, column: &str, value: &str, mode: &str) -> HospitalResult<Found> {
        let mode = mode.parse::<FindMode>().map_err(|e| self.reject(e))?;
        self.find(column, value, mode)
    }

    /// Every row whose `column` equals `value`.
    pub fn find_rows(&self, column: &str, value: &str) -> HospitalResult<Table> {
        self.check_column(column)?;
        Ok(self.matching_rows(column, value))
    }

    /// Position of the first row whose `column` equals `value`.
    pub fn position(&self, column: &str, value: &str) -> HospitalResult<usize> {
        self.check_column(column)?;
        self.first_position(column, value)
    }

    /// Replaces the whole table from a CSV file or from column data.
    ///
    /// Exactly one of `path` and `data` must be given. Returns the number of rows loaded.
    ///
    /// # Errors
    ///
    /// - [`HospitalError::LoadSource`] if neither or both sources are given; the table is left
    ///   untouched
    /// - [`HospitalError::RaggedColumns`] if the columns of `data` have different lengths
    /// - [`HospitalError::FileRead`] or [`HospitalError::Csv`] if the file cannot be read
    pub fn load(&mut self, path: Option<&Path>, data: Option<ColumnData>) -> HospitalResult<usize> {
        let table = match (path, data) {
            (Some(path), None) => read_csv(path)?,
            (None, Some(data)) => table_from_columns(data)?,
            _ => return Err(self.reject(HospitalError::LoadSource)),
        };

        self.table = table;
        self.reindex();
        tracing::info!(table = %self.name, rows = self.table.len(), "loaded table");
        Ok(self.table.len())
    }

    /// Writes the whole table to its backing file, overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is missing and may not be created, or if the file
    /// cannot be written.
    pub fn save(&self) -> HospitalResult<()> {
        self.cfg.ensure_data_dir()?;
        write_csv(&self.path, &self.table)?;
        tracing::info!(
            table = %self.name,
            rows = self.table.len(),
            path = %self.path.display(),
            "saved table"
        );
        Ok(())
    }

    /// Reloads the table from its backing file, if the file exists.
    ///
    /// Returns `true` when a reload happened.
    pub fn refresh(&mut self) -> HospitalResult<bool> {
        if !self.path.is_file() {
            return Ok(false);
        }
        let path = self.path.clone();
        self.load(Some(&path), None)?;
        Ok(true)
    }

    /// Puts back a table taken from [`TableStore::table`] earlier.
    pub(crate) fn restore(&mut self, table: Table) {
        self.table = table;
        self.reindex();
    }

    fn check_column(&self, column: &str) -> HospitalResult<()> {
        if self.table.has_column(column) {
            return Ok(());
        }
        Err(self.reject(HospitalError::UnknownColumn {
            table: self.name.clone(),
            column: column.to_string(),
        }))
    }

    fn matching_rows(&self, column: &str, value: &str) -> Table {
        let rows = if column == ID_COLUMN && !self.index.contains_key(value) {
            Vec::new()
        } else {
            self.table
                .rows()
                .iter()
                .filter(|r| r.get(column) == Some(value))
                .cloned()
                .collect()
        };
        Table::new(self.table.columns().to_vec(), rows)
    }

    fn first_position(&self, column: &str, value: &str) -> HospitalResult<usize> {
        let pos = if column == ID_COLUMN {
            self.index.get(value).copied()
        } else {
            self.table
                .rows()
                .iter()
                .position(|r| r.get(column) == Some(value))
        };
        pos.ok_or_else(|| {
            self.reject(HospitalError::NoMatch {
                table: self.name.clone(),
                column: column.to_string(),
                value: value.to_string(),
            })
        })
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, row) in self.table.rows().iter().enumerate() {
            if let Some(id) = row.id() {
                self.index.entry(id.to_owned()).or_insert(pos);
            }
        }
    }

    fn reject(&self, err: HospitalError) -> HospitalError {
        tracing::warn!(table = %self.name, "{}", err);
        err
    }
}

fn read_csv(path: &Path) -> HospitalResult<Table> {
    let file = fs::File::open(path).map_err(HospitalError::FileRead)?;
    let mut reader = csv::Reader::from_reader(file);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (column, value) in columns.iter().zip(record.iter()) {
            row.push_cell(column.clone(), value.to_owned());
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn write_csv(path: &Path, table: &Table) -> HospitalResult<()> {
    let file = fs::File::create(path).map_err(HospitalError::FileWrite)?;
    if table.columns().is_empty() {
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|(_, v)| v))?;
    }
    writer.flush().map_err(HospitalError::FileWrite)
}

fn table_from_columns(data: ColumnData) -> HospitalResult<Table> {
    let len = data.first().map_or(0, |(_, values)| values.len());
    if data.iter().any(|(_, values)| values.len() != len) {
        return Err(HospitalError::RaggedColumns);
    }

    let columns: Vec<String> = data.iter().map(|(c, _)| c.clone()).collect();
    let rows = (0..len)
        .map(|i| {
            let mut row = Row::new();
            for (column, values) in &data {
                row.push_cell(column.clone(), values[i].clone());
            }
            row
        })
        .collect();

    Ok(Table::new(columns, rows))
}
