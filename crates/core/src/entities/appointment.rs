use super::{decode_list, encode_list, row_id, Record, TableKind};
use crate::row::Row;
use crate::HospitalResult;
use hospital_types::RecordId;

/// A scheduled appointment and the procedures planned for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appointment {
    pub id: RecordId,
    pub patient_id: String,
    pub date: String,
    pub staff_id: String,
    pub procedures: Vec<String>,
}

impl Appointment {
    pub fn new(
        id: RecordId,
        patient_id: impl Into<String>,
        date: impl Into<String>,
        staff_id: impl Into<String>,
        procedures: Vec<String>,
    ) -> Self {
        Self {
            id,
            patient_id: patient_id.into(),
            date: date.into(),
            staff_id: staff_id.into(),
            procedures,
        }
    }

    /// Splits a comma-separated procedure list, dropping blank entries.
    pub fn parse_procedures(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl Record for Appointment {
    const TABLE: TableKind = TableKind::Appointments;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_row(&self) -> HospitalResult<Row> {
        Ok(Row::new()
            .with("id", &self.id)
            .with("id_paciente", &self.patient_id)
            .with("data", &self.date)
            .with("id_funcionario", &self.staff_id)
            .with("procedimento", encode_list(&self.procedures)?))
    }

    fn from_row(row: &Row) -> HospitalResult<Self> {
        Ok(Self::new(
            row_id(row)?,
            row.require("id_paciente")?,
            row.require("data")?,
            row.require("id_funcionario")?,
            decode_list(row.require("procedimento")?)?,
        ))
    }
}
