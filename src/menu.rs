//! The interactive menu.
//!
//! A flat dispatch loop: every call to [`Menu::step`] draws one screen, reads one choice and
//! returns a [`Flow`]. Invalid input leaves the current screen in place and the loop simply
//! draws it again.

use crate::console::Console;
use hospital_core::constants::DATE_FORMAT;
use hospital_core::entities::{Appointment, Exam, Patient, PatientData, Radiopharmaceutical, Staff};
use hospital_core::{Hospital, HospitalError, Record, RecordId, TableKind};
use std::io::{self, BufRead, Write};

const DIVIDER: &str = "=============================================";

const ENTITY_CHOICES: [(&str, TableKind); 5] = [
    ("1", TableKind::Patients),
    ("2", TableKind::Staff),
    ("3", TableKind::Radiopharmaceuticals),
    ("4", TableKind::Exams),
    ("5", TableKind::Appointments),
];

/// Whether the loop keeps going after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Register,
    Modify,
    Query,
    Delete,
}

impl Action {
    fn title(self) -> &'static str {
        match self {
            Action::Register => "Choose what to register or schedule:",
            Action::Modify => "Choose what to modify:",
            Action::Query => "Choose what to look up:",
            Action::Delete => "Choose what to delete:",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Main,
    Entities(Action),
}

/// Failure of a single menu action.
///
/// Hospital errors are shown to the operator and the menu carries on; I/O errors end the loop.
#[derive(Debug, thiserror::Error)]
enum ActionError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Hospital(#[from] HospitalError),
}

type ActionResult<T> = Result<T, ActionError>;

fn noun(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Patients => "Patient",
        TableKind::Staff => "Staff member",
        TableKind::Radiopharmaceuticals => "Radiopharmaceutical",
        TableKind::Exams => "Exam",
        TableKind::Appointments => "Appointment",
        TableKind::Handoffs => "Handoff note",
    }
}

pub struct Menu<'a, R, W> {
    hospital: &'a mut Hospital,
    console: Console<R, W>,
    screen: Screen,
    notice: Option<String>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(hospital: &'a mut Hospital, console: Console<R, W>) -> Self {
        Self {
            hospital,
            console,
            screen: Screen::Main,
            notice: None,
        }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Runs until the operator confirms exit.
    ///
    /// If the input stream ends first, every table is saved as if exit had been confirmed.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    tracing::info!("input closed, shutting down");
                    self.console.say("")?;
                    return self.shutdown();
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Draws the current screen and handles one choice.
    pub fn step(&mut self) -> io::Result<Flow> {
        self.console.clear()?;
        if let Some(notice) = self.notice.take() {
            self.console.say(notice)?;
        }
        match self.screen {
            Screen::Main => self.main_menu(),
            Screen::Entities(action) => self.entity_menu(action),
        }
    }

    fn main_menu(&mut self) -> io::Result<Flow> {
        self.console.say("Welcome to the hospital management system!")?;
        self.console.say("Choose an option:")?;
        self.console.say("1 - Register/Schedule")?;
        self.console.say("2 - Modify")?;
        self.console.say("3 - Query")?;
        self.console.say("4 - Delete")?;
        self.console.say("0 - Exit")?;

        let choice = self.console.prompt("Select your option: ")?;
        match choice.trim() {
            "1" => self.screen = Screen::Entities(Action::Register),
            "2" => self.screen = Screen::Entities(Action::Modify),
            "3" => self.screen = Screen::Entities(Action::Query),
            "4" => self.screen = Screen::Entities(Action::Delete),
            "0" => return self.confirm_exit(),
            _ => self.notice = Some("Invalid option!".into()),
        }
        Ok(Flow::Continue)
    }

    fn entity_menu(&mut self, action: Action) -> io::Result<Flow> {
        self.console.say(action.title())?;
        for (key, kind) in ENTITY_CHOICES {
            self.console.say(format!("{key} - {}", noun(kind)))?;
        }
        self.console.say("0 - Back")?;

        let choice = self.console.prompt("Select your option: ")?;
        let choice = choice.trim();
        if choice == "0" {
            self.screen = Screen::Main;
            return Ok(Flow::Continue);
        }

        match ENTITY_CHOICES.iter().find(|(key, _)| *key == choice) {
            Some(&(_, kind)) => {
                self.perform(action, kind)?;
                self.screen = Screen::Main;
            }
            None => self.notice = Some("Invalid option!".into()),
        }
        Ok(Flow::Continue)
    }

    fn confirm_exit(&mut self) -> io::Result<Flow> {
        self.console.say("Are you sure you want to shut down the system?")?;
        let answer = self.console.prompt("Type 's' to confirm: ")?;
        if answer.trim() == "s" {
            self.shutdown()?;
            Ok(Flow::Exit)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn shutdown(&mut self) -> io::Result<()> {
        match self.hospital.save_all() {
            Ok(()) => self.console.say(format!(
                "{DIVIDER}\nDatabase saved!\n{DIVIDER}\nShutting down the system...\n{DIVIDER}"
            )),
            Err(err) => self
                .console
                .say(format!("Error: could not save every table: {err}")),
        }
    }

    fn perform(&mut self, action: Action, kind: TableKind) -> io::Result<()> {
        self.console.clear()?;
        let result = match action {
            Action::Register => self.register(kind),
            Action::Modify => self.modify(kind),
            Action::Query => self.query(kind),
            Action::Delete => self.delete(kind),
        };

        match result {
            Ok(message) => self.console.say(message)?,
            Err(ActionError::Hospital(err)) => self.console.say(format!("Error: {err}"))?,
            Err(ActionError::Io(err)) => return Err(err),
        }
        self.console.pause()
    }

    fn register(&mut self, kind: TableKind) -> ActionResult<String> {
        match kind {
            TableKind::Patients => self.register_record::<Patient>(Self::edit_patient),
            TableKind::Staff => self.register_record::<Staff>(Self::edit_staff),
            TableKind::Radiopharmaceuticals => {
                self.register_record::<Radiopharmaceutical>(Self::edit_radiopharmaceutical)
            }
            TableKind::Exams => self.register_record::<Exam>(Self::edit_exam),
            TableKind::Appointments => self.register_record::<Appointment>(Self::edit_appointment),
            TableKind::Handoffs => Err(read_only(kind)),
        }
    }

    fn modify(&mut self, kind: TableKind) -> ActionResult<String> {
        match kind {
            TableKind::Patients => self.modify_record::<Patient>(Self::edit_patient),
            TableKind::Staff => self.modify_record::<Staff>(Self::edit_staff),
            TableKind::Radiopharmaceuticals => {
                self.modify_record::<Radiopharmaceutical>(Self::edit_radiopharmaceutical)
            }
            TableKind::Exams => self.modify_record::<Exam>(Self::edit_exam),
            TableKind::Appointments => self.modify_record::<Appointment>(Self::edit_appointment),
            TableKind::Handoffs => Err(read_only(kind)),
        }
    }

    fn query(&mut self, kind: TableKind) -> ActionResult<String> {
        let raw = self
            .console
            .prompt(&format!("{} ID (leave blank to list all): ", noun(kind)))?;
        let id = raw.trim();

        if id.is_empty() {
            let store = self.hospital.store(kind);
            if store.is_empty() {
                return Ok("No records found.".into());
            }
            let listing: Vec<String> = store.rows().iter().map(ToString::to_string).collect();
            return Ok(listing.join(&format!("{DIVIDER}\n")));
        }

        match self.hospital.find(kind, id) {
            Some(row) => Ok(row.to_string()),
            None => Err(not_found(kind, id)),
        }
    }

    fn delete(&mut self, kind: TableKind) -> ActionResult<String> {
        let id = self.prompt_id(kind)?;
        let removed = self.hospital.remove(kind, id.as_str())?;
        Ok(format!(
            "{} {id} deleted ({removed} record(s) removed).",
            noun(kind)
        ))
    }

    fn register_record<T: Record>(
        &mut self,
        edit: fn(&mut Self, RecordId, Option<&T>) -> ActionResult<T>,
    ) -> ActionResult<String> {
        let id = self.prompt_id(T::TABLE)?;
        if self.hospital.find(T::TABLE, id.as_str()).is_some() {
            return Err(HospitalError::DuplicateId {
                table: T::TABLE.to_string(),
                id: id.into_inner(),
            }
            .into());
        }

        let record = edit(self, id, None)?;
        self.hospital.register(&record)?;

        let verb = match T::TABLE {
            TableKind::Appointments => "scheduled",
            _ => "registered",
        };
        Ok(format!(
            "{} {} {verb} successfully!",
            noun(T::TABLE),
            record.id()
        ))
    }

    fn modify_record<T: Record>(
        &mut self,
        edit: fn(&mut Self, RecordId, Option<&T>) -> ActionResult<T>,
    ) -> ActionResult<String> {
        let id = self.prompt_id(T::TABLE)?;
        let Some(current) = self.hospital.get::<T>(id.as_str())? else {
            return Err(not_found(T::TABLE, id.as_str()));
        };

        self.console.say("Enter the new data (leave blank to keep the current value):")?;
        let record = edit(self, id, Some(&current))?;
        self.hospital.update(&record)?;

        Ok(format!(
            "{} {} updated successfully!",
            noun(T::TABLE),
            record.id()
        ))
    }

    fn prompt_id(&mut self, kind: TableKind) -> ActionResult<RecordId> {
        let raw = self.console.prompt(&format!("{} ID: ", noun(kind)))?;
        Ok(RecordId::new(raw).map_err(HospitalError::from)?)
    }

    fn prompt_number(&mut self, label: &str, current: Option<f64>) -> ActionResult<f64> {
        let current = current.map(|v| v.to_string());
        let raw = self.console.prompt_field(label, current.as_deref())?;
        raw.trim().replace(',', ".").parse().map_err(|_| {
            ActionError::from(HospitalError::InvalidInput(format!(
                "{label} must be a number, got {raw:?}"
            )))
        })
    }

    fn edit_patient(&mut self, id: RecordId, current: Option<&Patient>) -> ActionResult<Patient> {
        let name = self
            .console
            .prompt_field("Full name", current.map(Patient::name))?;
        let document = self
            .console
            .prompt_field("CPF (digits only)", current.map(Patient::document))?;
        let birth_date = current.map(|p| p.birth_date().format(DATE_FORMAT).to_string());
        let birth_date = self
            .console
            .prompt_field("Birth date (DD/MM/YYYY)", birth_date.as_deref())?;
        let sex = self
            .console
            .prompt_field("Sex (M/F)", current.map(Patient::sex))?;
        let weight = self.prompt_number("Weight (kg)", current.map(Patient::weight))?;
        let height = self.prompt_number("Height (m)", current.map(Patient::height))?;

        Ok(Patient::new(PatientData {
            id,
            name,
            document,
            birth_date,
            sex,
            weight,
            height,
        })?)
    }

    fn edit_staff(&mut self, id: RecordId, current: Option<&Staff>) -> ActionResult<Staff> {
        let name = self
            .console
            .prompt_field("Full name", current.map(|s| s.name.as_str()))?;
        let role = self
            .console
            .prompt_field("Role", current.map(|s| s.role.as_str()))?;
        let document = self
            .console
            .prompt_field("Document number", current.map(|s| s.document.as_str()))?;
        // New staff start with the default status; only existing staff get asked.
        let status = match current {
            Some(staff) => Some(self.console.prompt_field("Status", Some(staff.status()))?),
            None => None,
        };

        Ok(Staff::new(id, name, role, document, status))
    }

    fn edit_radiopharmaceutical(
        &mut self,
        id: RecordId,
        current: Option<&Radiopharmaceutical>,
    ) -> ActionResult<Radiopharmaceutical> {
        let active_ingredient = self.console.prompt_field(
            "Active ingredient",
            current.map(|r| r.active_ingredient.as_str()),
        )?;
        let concentration = self
            .console
            .prompt_field("Concentration", current.map(|r| r.concentration.as_str()))?;
        let manufacture_date = self.console.prompt_field(
            "Manufacture date (DD/MM/YYYY)",
            current.map(|r| r.manufacture_date.as_str()),
        )?;

        Ok(Radiopharmaceutical::new(
            id,
            active_ingredient,
            concentration,
            manufacture_date,
        ))
    }

    fn edit_exam(&mut self, id: RecordId, current: Option<&Exam>) -> ActionResult<Exam> {
        let kind = self
            .console
            .prompt_field("Exam type", current.map(|e| e.kind.as_str()))?;
        let date = self
            .console
            .prompt_field("Exam date (DD/MM/YYYY)", current.map(|e| e.date.as_str()))?;
        let patient_id = self
            .console
            .prompt_field("Patient ID", current.map(|e| e.patient_id.as_str()))?;
        let staff_id = self
            .console
            .prompt_field("Staff ID", current.map(|e| e.staff_id.as_str()))?;
        let appointment_id = self
            .console
            .prompt_field("Appointment ID", current.map(|e| e.appointment_id.as_str()))?;
        let radiopharmaceutical_id = self.console.prompt_field(
            "Radiopharmaceutical ID",
            current.map(|e| e.radiopharmaceutical_id.as_str()),
        )?;

        Ok(Exam::new(
            id,
            kind,
            date,
            patient_id,
            staff_id,
            appointment_id,
            radiopharmaceutical_id,
        ))
    }

    fn edit_appointment(
        &mut self,
        id: RecordId,
        current: Option<&Appointment>,
    ) -> ActionResult<Appointment> {
        let patient_id = self
            .console
            .prompt_field("Patient ID", current.map(|a| a.patient_id.as_str()))?;
        let date = self.console.prompt_field(
            "Appointment date (DD/MM/YYYY)",
            current.map(|a| a.date.as_str()),
        )?;
        let staff_id = self
            .console
            .prompt_field("Staff ID", current.map(|a| a.staff_id.as_str()))?;
        let procedures = current.map(|a| a.procedures.join(", "));
        let procedures = self.console.prompt_field(
            "Procedures (comma separated)",
            procedures.as_deref(),
        )?;

        Ok(Appointment::new(
            id,
            patient_id,
            date,
            staff_id,
            Appointment::parse_procedures(&procedures),
        ))
    }
}

fn not_found(kind: TableKind, id: &str) -> ActionError {
    HospitalError::RowNotFound {
        table: kind.to_string(),
        id: id.to_string(),
    }
    .into()
}

fn read_only(kind: TableKind) -> ActionError {
    HospitalError::InvalidInput(format!("{} records cannot be edited here", noun(kind))).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hospital_core::{DirPolicy, StorageConfig};
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_hospital(data_dir: &Path) -> Hospital {
        let cfg = StorageConfig::new(data_dir, DirPolicy::CreateIfMissing)
            .expect("StorageConfig::new should succeed");
        Hospital::open(cfg).expect("Hospital::open should succeed")
    }

    /// Runs the menu over `lines` and returns everything it printed.
    fn run_script(hospital: &mut Hospital, lines: &[&str]) -> String {
        let mut input = lines.join("\n");
        input.push('\n');
        let console = Console::new(Cursor::new(input.into_bytes()), Vec::new()).without_clear();

        let mut menu = Menu::new(hospital, console);
        menu.run().expect("menu should run to completion");
        String::from_utf8(menu.into_console().into_output()).expect("utf-8 output")
    }

    #[test]
    fn test_register_patient_and_exit() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let output = run_script(
            &mut hospital,
            &[
                "1",
                "1",
                "P1",
                "Maria",
                "123",
                "01/01/2000",
                "F",
                "70",
                "1,75",
                "",
                "0",
                "s",
            ],
        );

        assert!(output.contains("Patient P1 registered successfully!"));
        assert!(output.contains("Database saved!"));
        let row = hospital.find(TableKind::Patients, "P1").expect("patient stored");
        assert_eq!(row.get("imc"), Some("22.86"));
        assert!(temp_dir.path().join("pacientes.csv").is_file());
    }

    #[test]
    fn test_malformed_birth_date_returns_to_menu() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let output = run_script(
            &mut hospital,
            &[
                "1",
                "1",
                "P1",
                "Maria",
                "123",
                "2000-01-01",
                "F",
                "70",
                "1.75",
                "",
                "0",
                "s",
            ],
        );

        assert!(output.contains("Error: invalid birth date"));
        assert!(hospital.store(TableKind::Patients).is_empty());
        assert!(output.contains("Database saved!"));
    }

    #[test]
    fn test_non_numeric_weight_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let output = run_script(
            &mut hospital,
            &["1", "1", "P1", "Maria", "123", "01/01/2000", "F", "setenta", "", "0", "s"],
        );

        assert!(output.contains("Weight (kg) must be a number"));
        assert!(hospital.store(TableKind::Patients).is_empty());
    }

    #[test]
    fn test_invalid_option_redraws_menu() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let output = run_script(&mut hospital, &["9", "1", "7", "0", "0", "s"]);

        assert_eq!(output.matches("Invalid option!").count(), 2);
        assert_eq!(
            output
                .matches("Choose what to register or schedule:")
                .count(),
            2
        );
    }

    #[test]
    fn test_many_invalid_options_do_not_grow_the_stack() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let mut lines = vec!["x"; 20_000];
        lines.extend(["0", "s"]);
        let output = run_script(&mut hospital, &lines);

        assert!(output.contains("Database saved!"));
    }

    #[test]
    fn test_exit_requires_confirmation() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let output = run_script(&mut hospital, &["0", "n", "0", "s"]);

        assert_eq!(
            output
                .matches("Welcome to the hospital management system!")
                .count(),
            2
        );
        assert_eq!(output.matches("Database saved!").count(), 1);
    }

    #[test]
    fn test_register_duplicate_id_is_rejected_before_prompting() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());
        hospital
            .register(&Staff::new(RecordId::new("F1").unwrap(), "Ana", "Biomédica", "9", None))
            .unwrap();

        let output = run_script(&mut hospital, &["1", "2", "F1", "", "0", "s"]);

        assert!(output.contains("already exists"));
        assert!(!output.contains("Full name"));
        assert_eq!(hospital.store(TableKind::Staff).len(), 1);
    }

    #[test]
    fn test_modify_staff_keeps_blank_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());
        hospital
            .register(&Staff::new(RecordId::new("F1").unwrap(), "Ana", "Biomédica", "9", None))
            .unwrap();

        let output = run_script(
            &mut hospital,
            &["2", "2", "F1", "", "Física", "", "Inativo", "", "0", "s"],
        );

        assert!(output.contains("Staff member F1 updated successfully!"));
        let staff = hospital.get::<Staff>("F1").unwrap().unwrap();
        assert_eq!(staff.name, "Ana");
        assert_eq!(staff.role, "Física");
        assert_eq!(staff.status(), "Inativo");
    }

    #[test]
    fn test_modify_unknown_id_reports_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let output = run_script(&mut hospital, &["2", "1", "P404", "", "0", "s"]);

        assert!(output.contains("does not exist"));
    }

    #[test]
    fn test_schedule_appointment_then_query() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let output = run_script(
            &mut hospital,
            &[
                "1",
                "5",
                "C1",
                "P1",
                "20/09/2024",
                "F1",
                "ECG, Cintilografia",
                "",
                "3",
                "5",
                "C1",
                "",
                "0",
                "s",
            ],
        );

        assert!(output.contains("Appointment C1 scheduled successfully!"));
        assert!(output.contains(r#"procedimento: ["ECG","Cintilografia"]"#));
    }

    #[test]
    fn test_query_blank_lists_all_rows() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());
        for id in ["R1", "R2"] {
            hospital
                .register(&Radiopharmaceutical::new(
                    RecordId::new(id).unwrap(),
                    "FDG",
                    "10 mCi",
                    "01/02/2024",
                ))
                .unwrap();
        }

        let output = run_script(&mut hospital, &["3", "3", "", "", "0", "s"]);

        assert!(output.contains("id: R1"));
        assert!(output.contains("id: R2"));
    }

    #[test]
    fn test_delete_exam() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());
        hospital
            .register(&Exam::new(RecordId::new("E1").unwrap(), "PET", "", "P1", "F1", "", "R1"))
            .unwrap();

        let output = run_script(&mut hospital, &["4", "4", "E1", "", "0", "s"]);

        assert!(output.contains("Exam E1 deleted (1 record(s) removed)."));
        assert!(hospital.find(TableKind::Exams, "E1").is_none());
    }

    #[test]
    fn test_closed_input_saves_and_exits() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut hospital = test_hospital(temp_dir.path());

        let console = Console::new(Cursor::new(b"1\n".to_vec()), Vec::new()).without_clear();
        let mut menu = Menu::new(&mut hospital, console);
        menu.run().expect("closed input should not be an error");

        assert!(temp_dir.path().join("passagens.csv").is_file());
    }
}
