//! The hospital system: one [`TableStore`] per table, saved after every change.

use crate::config::StorageConfig;
use crate::constants::DEFAULT_STAFF_STATUS;
use crate::entities::{Record, Staff, TableKind};
use crate::row::{Row, Table};
use crate::table::TableStore;
use crate::{HospitalError, HospitalResult};

/// Owns every table of the system.
///
/// Mutating operations write the affected table back to disk before returning, so a crash
/// between two operations loses nothing. When that write fails the in-memory change is undone,
/// leaving memory and disk in step. [`Hospital::save_all`] is still called at shutdown to
/// flush the tables nobody touched (for example the handoff table).
#[derive(Debug)]
pub struct Hospital {
    cfg: StorageConfig,
    patients: TableStore,
    staff: TableStore,
    radiopharmaceuticals: TableStore,
    exams: TableStore,
    appointments: TableStore,
    handoffs: TableStore,
}

impl Hospital {
    /// Opens every table, loading the backing files that exist.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while reading an existing table file.
    pub fn open(cfg: StorageConfig) -> HospitalResult<Self> {
        let open = |kind: TableKind| TableStore::open(kind.file_stem(), &cfg);
        let mut hospital = Self {
            patients: open(TableKind::Patients)?,
            staff: open(TableKind::Staff)?,
            radiopharmaceuticals: open(TableKind::Radiopharmaceuticals)?,
            exams: open(TableKind::Exams)?,
            appointments: open(TableKind::Appointments)?,
            handoffs: open(TableKind::Handoffs)?,
            cfg,
        };

        // Staff files written before statuses were tracked have no status column.
        let staff = &mut hospital.staff;
        if !staff.columns().is_empty() && !staff.table().has_column("status") {
            staff.add_column("status", DEFAULT_STAFF_STATUS)?;
            tracing::info!(table = %staff.name(), "added missing status column");
        }

        tracing::info!(
            data_dir = %hospital.cfg.data_dir().display(),
            patients = hospital.patients.len(),
            staff = hospital.staff.len(),
            "opened hospital tables"
        );
        Ok(hospital)
    }

    pub fn config(&self) -> &StorageConfig {
        &self.cfg
    }

    pub fn store(&self, kind: TableKind) -> &TableStore {
        match kind {
            TableKind::Patients => &self.patients,
            TableKind::Staff => &self.staff,
            TableKind::Radiopharmaceuticals => &self.radiopharmaceuticals,
            TableKind::Exams => &self.exams,
            TableKind::Appointments => &self.appointments,
            TableKind::Handoffs => &self.handoffs,
        }
    }

    fn store_mut(&mut self, kind: TableKind) -> &mut TableStore {
        match kind {
            TableKind::Patients => &mut self.patients,
            TableKind::Staff => &mut self.staff,
            TableKind::Radiopharmaceuticals => &mut self.radiopharmaceuticals,
            TableKind::Exams => &mut self.exams,
            TableKind::Appointments => &mut self.appointments,
            TableKind::Handoffs => &mut self.handoffs,
        }
    }

    /// Inserts a new record and saves its table.
    ///
    /// # Errors
    ///
    /// Returns [`HospitalError::DuplicateId`] if the id is taken, or an I/O error from saving.
    pub fn register<R: Record>(&mut self, record: &R) -> HospitalResult<()> {
        let row = record.to_row()?;
        self.commit(R::TABLE, |store| store.add_row(row))
    }

    /// Replaces an existing record and saves its table.
    ///
    /// # Errors
    ///
    /// Returns [`HospitalError::RowNotFound`] if no record has that id.
    pub fn update<R: Record>(&mut self, record: &R) -> HospitalResult<()> {
        let row = record.to_row()?;
        self.commit(R::TABLE, |store| store.update_row(row))
    }

    /// Stored row with the given id.
    pub fn find(&self, kind: TableKind, id: &str) -> Option<&Row> {
        self.store(kind).get(id)
    }

    /// Every row of `kind` whose `column` equals `value`.
    pub fn find_by(&self, kind: TableKind, column: &str, value: &str) -> HospitalResult<Table> {
        self.store(kind).find_rows(column, value)
    }

    /// Rebuilds the record with the given id, if present.
    pub fn get<R: Record>(&self, id: &str) -> HospitalResult<Option<R>> {
        self.find(R::TABLE, id).map(R::from_row).transpose()
    }

    /// Removes every row with the given id and saves the table.
    ///
    /// Returns how many rows were removed.
    pub fn remove(&mut self, kind: TableKind, id: &str) -> HospitalResult<usize> {
        let key = Row::new().with("id", id);
        self.commit(kind, |store| store.remove_row(&key))
    }

    /// Changes a staff member's status and saves the staff table.
    pub fn set_staff_status(&mut self, id: &str, status: &str) -> HospitalResult<Staff> {
        let mut staff = self
            .get::<Staff>(id)?
            .ok_or_else(|| HospitalError::RowNotFound {
                table: TableKind::Staff.to_string(),
                id: id.to_string(),
            })?;
        staff.set_status(status);
        self.update(&staff)?;
        Ok(staff)
    }

    /// Applies `change` to one table and saves it, undoing the change if the save fails.
    fn commit<T>(
        &mut self,
        kind: TableKind,
        change: impl FnOnce(&mut TableStore) -> HospitalResult<T>,
    ) -> HospitalResult<T> {
        let store = self.store_mut(kind);
        let before = store.table().clone();
        let out = change(&mut *store)?;
        if let Err(err) = store.save() {
            store.restore(before);
            tracing::warn!(table = %kind, "save failed, change undone: {}", err);
            return Err(err);
        }
        Ok(out)
    }

    /// Saves every table.
    ///
    /// All tables are attempted even if one fails; the first error is returned.
    pub fn save_all(&self) -> HospitalResult<()> {
        let mut first_error = None;
        for kind in TableKind::ALL {
            if let Err(err) = self.store(kind).save() {
                tracing::error!(table = %kind, "failed to save table: {}", err);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
