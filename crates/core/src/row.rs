//! Rows and tables of string cells.
//!
//! A [`Row`] is the serialised form of one entity: an ordered list of `(column, value)` cells.
//! Values are kept as strings because that is what the backing CSV files hold; entities convert
//! numbers and lists on the way in and out.

use crate::constants::ID_COLUMN;
use crate::{HospitalError, HospitalResult};
use std::collections::HashSet;
use std::fmt;

/// One record as an ordered mapping from column name to cell value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Row::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.set(column, value);
        self
    }

    /// Sets `column` to `value`, replacing the existing cell or appending a new one.
    pub fn set(&mut self, column: impl Into<String>, value: impl ToString) {
        let column = column.into();
        let value = value.to_string();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    /// Value of the `id` column, if the row has one.
    pub fn id(&self) -> Option<&str> {
        self.get(ID_COLUMN)
    }

    /// Value of `column`, or [`HospitalError::InvalidInput`] when the column is absent.
    pub fn require(&self, column: &str) -> HospitalResult<&str> {
        self.get(column)
            .ok_or_else(|| HospitalError::InvalidInput(format!("row has no {column:?} column")))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when the row has exactly the given columns, in any order.
    pub(crate) fn has_columns(&self, columns: &[String]) -> bool {
        if self.cells.len() != columns.len() {
            return false;
        }
        let mine: HashSet<&str> = self.columns().collect();
        mine.len() == columns.len() && columns.iter().all(|c| mine.contains(c.as_str()))
    }

    /// Copy of the row with its cells arranged in `columns` order.
    ///
    /// Columns missing from the row become empty cells.
    pub(crate) fn arranged(&self, columns: &[String]) -> Row {
        Row {
            cells: columns
                .iter()
                .map(|c| (c.clone(), self.get(c).unwrap_or_default().to_owned()))
                .collect(),
        }
    }

    pub(crate) fn push_cell(&mut self, column: String, value: String) {
        self.cells.push((column, value));
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (column, value) in self.iter() {
            writeln!(f, "{column}: {value}")?;
        }
        Ok(())
    }
}

/// A header plus the rows under it, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<String> {
        &mut self.columns
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }
}
