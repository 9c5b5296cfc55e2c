use super::{row_id, Record, TableKind};
use crate::row::Row;
use crate::HospitalResult;
use hospital_types::RecordId;

/// An exam performed on a patient.
///
/// The `*_id` fields reference rows of other tables but are stored as given; nothing checks
/// that the referenced rows exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exam {
    pub id: RecordId,
    pub kind: String,
    pub date: String,
    pub patient_id: String,
    pub staff_id: String,
    pub appointment_id: String,
    pub radiopharmaceutical_id: String,
}

impl Exam {
    pub fn new(
        id: RecordId,
        kind: impl Into<String>,
        date: impl Into<String>,
        patient_id: impl Into<String>,
        staff_id: impl Into<String>,
        appointment_id: impl Into<String>,
        radiopharmaceutical_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            date: date.into(),
            patient_id: patient_id.into(),
            staff_id: staff_id.into(),
            appointment_id: appointment_id.into(),
            radiopharmaceutical_id: radiopharmaceutical_id.into(),
        }
    }
}

impl Record for Exam {
    const TABLE: TableKind = TableKind::Exams;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_row(&self) -> HospitalResult<Row> {
        Ok(Row::new()
            .with("id", &self.id)
            .with("tipo", &self.kind)
            .with("data", &self.date)
            .with("id_paciente", &self.patient_id)
            .with("id_funcionario", &self.staff_id)
            .with("id_consulta", &self.appointment_id)
            .with("id_radiofarmaco", &self.radiopharmaceutical_id))
    }

    fn from_row(row: &Row) -> HospitalResult<Self> {
        Ok(Self::new(
            row_id(row)?,
            row.require("tipo")?,
            row.require("data")?,
            row.require("id_paciente")?,
            row.require("id_funcionario")?,
            row.require("id_consulta")?,
            row.require("id_radiofarmaco")?,
        ))
    }
}
