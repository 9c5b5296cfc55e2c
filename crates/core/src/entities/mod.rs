//! Entity records and their table bindings.
//!
//! Each entity knows which table it lives in and how to turn itself into a [`Row`] and back.
//! Constructors are the validation point: an entity value that exists has passed every check
//! for its type, and derived fields (a patient's age and BMI) are computed there.

mod appointment;
mod exam;
mod patient;
mod radiopharmaceutical;
mod staff;

pub use appointment::Appointment;
pub use exam::Exam;
pub use patient::{bmi, parse_date, Age, Patient, PatientData};
pub use radiopharmaceutical::Radiopharmaceutical;
pub use staff::Staff;

use crate::constants::{
    APPOINTMENTS_TABLE, EXAMS_TABLE, HANDOFFS_TABLE, PATIENTS_TABLE, RADIOPHARMACEUTICALS_TABLE,
    STAFF_TABLE,
};
use crate::row::Row;
use crate::{HospitalError, HospitalResult};
use hospital_types::RecordId;
use std::fmt;
use std::str::FromStr;

/// The tables kept by the system, one per entity plus the handoff table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableKind {
    Patients,
    Staff,
    Radiopharmaceuticals,
    Exams,
    Appointments,
    /// Shift handoff notes. Loaded and saved with the rest but never written by an entity.
    Handoffs,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Patients,
        TableKind::Staff,
        TableKind::Radiopharmaceuticals,
        TableKind::Exams,
        TableKind::Appointments,
        TableKind::Handoffs,
    ];

    /// Name of the backing file, without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            TableKind::Patients => PATIENTS_TABLE,
            TableKind::Staff => STAFF_TABLE,
            TableKind::Radiopharmaceuticals => RADIOPHARMACEUTICALS_TABLE,
            TableKind::Exams => EXAMS_TABLE,
            TableKind::Appointments => APPOINTMENTS_TABLE,
            TableKind::Handoffs => HANDOFFS_TABLE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TableKind::Patients => "patients",
            TableKind::Staff => "staff",
            TableKind::Radiopharmaceuticals => "radiopharmaceuticals",
            TableKind::Exams => "exams",
            TableKind::Appointments => "appointments",
            TableKind::Handoffs => "handoffs",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for TableKind {
    type Err = HospitalError;

    /// Accepts either the file stem (`pacientes`) or the English label (`patients`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TableKind::ALL
            .into_iter()
            .find(|kind| {
                kind.file_stem().eq_ignore_ascii_case(s) || kind.label().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| HospitalError::UnknownTable(s.to_string()))
    }
}

/// An entity that is stored as one row of one table.
pub trait Record: Sized {
    const TABLE: TableKind;

    fn id(&self) -> &RecordId;

    /// Serialises the entity into a row, columns in table order.
    fn to_row(&self) -> HospitalResult<Row>;

    /// Rebuilds the entity from a stored row, re-running constructor validation.
    fn from_row(row: &Row) -> HospitalResult<Self>;
}

/// Encodes a list cell as a JSON array.
pub(crate) fn encode_list(items: &[String]) -> HospitalResult<String> {
    serde_json::to_string(items).map_err(HospitalError::Serialization)
}

/// Decodes a list cell written by [`encode_list`]. An empty cell is an empty list.
pub(crate) fn decode_list(cell: &str) -> HospitalResult<Vec<String>> {
    if cell.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(cell).map_err(HospitalError::Deserialization)
}

pub(crate) fn row_id(row: &Row) -> HospitalResult<RecordId> {
    let id = row.id().ok_or(HospitalError::MissingId)?;
    Ok(RecordId::new(id)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_kind_parses_stem_and_label() {
        assert_eq!("pacientes".parse::<TableKind>().unwrap(), TableKind::Patients);
        assert_eq!("Staff".parse::<TableKind>().unwrap(), TableKind::Staff);
        assert_eq!("passagens".parse::<TableKind>().unwrap(), TableKind::Handoffs);
        assert!(matches!(
            "pharmacy".parse::<TableKind>(),
            Err(HospitalError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_list_cells_round_trip_and_empty() {
        let items = vec!["ECG".to_string(), "Cintilografia, repouso".to_string()];
        let cell = encode_list(&items).unwrap();
        assert_eq!(cell, r#"["ECG","Cintilografia, repouso"]"#);
        assert_eq!(decode_list(&cell).unwrap(), items);
        assert!(decode_list("").unwrap().is_empty());
        assert!(matches!(
            decode_list("ECG"),
            Err(HospitalError::Deserialization(_))
        ));
    }
}
