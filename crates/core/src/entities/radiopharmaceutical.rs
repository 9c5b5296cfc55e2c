use super::{row_id, Record, TableKind};
use crate::row::Row;
use crate::HospitalResult;
use hospital_types::RecordId;

/// A radiopharmaceutical batch used in nuclear medicine exams.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Radiopharmaceutical {
    pub id: RecordId,
    pub active_ingredient: String,
    pub concentration: String,
    /// Free text, conventionally `DD/MM/YYYY`.
    pub manufacture_date: String,
}

impl Radiopharmaceutical {
    pub fn new(
        id: RecordId,
        active_ingredient: impl Into<String>,
        concentration: impl Into<String>,
        manufacture_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            active_ingredient: active_ingredient.into(),
            concentration: concentration.into(),
            manufacture_date: manufacture_date.into(),
        }
    }
}

impl Record for Radiopharmaceutical {
    const TABLE: TableKind = TableKind::Radiopharmaceuticals;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_row(&self) -> HospitalResult<Row> {
        Ok(Row::new()
            .with("id", &self.id)
            .with("princip_ativo", &self.active_ingredient)
            .with("concentracao", &self.concentration)
            .with("data_fabricacao", &self.manufacture_date))
    }

    fn from_row(row: &Row) -> HospitalResult<Self> {
        Ok(Self::new(
            row_id(row)?,
            row.require("princip_ativo")?,
            row.require("concentracao")?,
            row.require("data_fabricacao")?,
        ))
    }
}
