use super::{row_id, Record, TableKind};
use crate::constants::DEFAULT_STAFF_STATUS;
use crate::row::Row;
use crate::HospitalResult;
use hospital_types::RecordId;

/// A member of staff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Staff {
    pub id: RecordId,
    pub name: String,
    pub role: String,
    /// Identity document number. Not validated.
    pub document: String,
    status: String,
}

impl Staff {
    /// Creates a staff member. `status` defaults to `"Ativo"` when `None`.
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        role: impl Into<String>,
        document: impl Into<String>,
        status: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role: role.into(),
            document: document.into(),
            status: status.unwrap_or_else(|| DEFAULT_STAFF_STATUS.to_string()),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Changes the status. Any value is accepted.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

impl Record for Staff {
    const TABLE: TableKind = TableKind::Staff;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_row(&self) -> HospitalResult<Row> {
        Ok(Row::new()
            .with("id", &self.id)
            .with("nome", &self.name)
            .with("cargo", &self.role)
            .with("n_doc", &self.document)
            .with("status", &self.status))
    }

    fn from_row(row: &Row) -> HospitalResult<Self> {
        // Files written before the status column existed have no status cell.
        let status = row.get("status").map(str::to_owned);
        Ok(Self::new(
            row_id(row)?,
            row.require("nome")?,
            row.require("cargo")?,
            row.require("n_doc")?,
            status,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_status() {
        let staff = Staff::new(RecordId::new("F1").unwrap(), "Ana", "Biomédica", "998", None);
        assert_eq!(staff.status(), "Ativo");
    }

    #[test]
    fn test_set_status_accepts_any_value() {
        let mut staff = Staff::new(RecordId::new("F1").unwrap(), "Ana", "Biomédica", "998", None);
        staff.set_status("Férias");
        assert_eq!(staff.status(), "Férias");
        staff.set_status("");
        assert_eq!(staff.status(), "");
    }

    #[test]
    fn test_row_includes_status() {
        let staff = Staff::new(
            RecordId::new("F1").unwrap(),
            "Ana",
            "Biomédica",
            "998",
            Some("Inativo".into()),
        );
        let row = staff.to_row().unwrap();
        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec!["id", "nome", "cargo", "n_doc", "status"]
        );
        assert_eq!(Staff::from_row(&row).unwrap(), staff);
    }

    #[test]
    fn test_from_row_without_status_uses_default() {
        let row = Row::new()
            .with("id", "F2")
            .with("nome", "Bruno")
            .with("cargo", "Físico")
            .with("n_doc", "123");
        assert_eq!(Staff::from_row(&row).unwrap().status(), "Ativo");
    }
}
