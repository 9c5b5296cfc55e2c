//! Patients and their derived fields.
//!
//! Age and BMI are never read back from disk as trusted values. Both are recomputed whenever a
//! [`Patient`] is constructed, including when one is rebuilt from a stored row, so the `idade`
//! column always reflects the day the row was last written.

use super::{decode_list, encode_list, row_id, Record, TableKind};
use crate::constants::DATE_FORMAT;
use crate::row::Row;
use crate::{HospitalError, HospitalResult};
use chrono::{Datelike, Local, Months, NaiveDate};
use hospital_types::RecordId;
use std::fmt;

/// Elapsed calendar time between a birth date and a reference date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Age {
    /// Whole years, then whole months, then the remaining days from `birth` to `today`.
    ///
    /// Adding months clamps to the end of shorter months (31 Jan + 1 month = 28/29 Feb), so a
    /// patient born on the 31st ages by whole months on the last day of shorter months.
    ///
    /// Returns `None` if `birth` is after `today`.
    pub fn between(birth: NaiveDate, today: NaiveDate) -> Option<Self> {
        if birth > today {
            return None;
        }

        let months_apart = (today.year() - birth.year()) * 12 + today.month() as i32
            - birth.month() as i32;
        let mut total_months = u32::try_from(months_apart).ok()?;
        let mut anchor = birth.checked_add_months(Months::new(total_months))?;
        if anchor > today {
            total_months = total_months.checked_sub(1)?;
            anchor = birth.checked_add_months(Months::new(total_months))?;
        }
        let days = u32::try_from((today - anchor).num_days()).ok()?;

        Some(Self {
            years: total_months / 12,
            months: total_months % 12,
            days,
        })
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} anos, {} meses e {} dias",
            self.years, self.months, self.days
        )
    }
}

/// Parses a `DD/MM/YYYY` date.
///
/// # Errors
///
/// Returns [`HospitalError::InvalidBirthDate`] if the input does not match the format or is not
/// a real calendar date.
pub fn parse_date(input: &str) -> HospitalResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| HospitalError::InvalidBirthDate(input.to_string()))
}

/// Body mass index, `weight / height²`, rounded to two decimals.
///
/// # Errors
///
/// - [`HospitalError::InvalidHeight`] if `height` is not a finite number above zero
/// - [`HospitalError::InvalidWeight`] if `weight` is not finite
pub fn bmi(weight: f64, height: f64) -> HospitalResult<f64> {
    if !height.is_finite() || height <= 0.0 {
        return Err(HospitalError::InvalidHeight(height));
    }
    if !weight.is_finite() {
        return Err(HospitalError::InvalidWeight(weight));
    }
    Ok((weight / (height * height) * 100.0).round() / 100.0)
}

/// Constructor input for a [`Patient`], as typed at the console.
#[derive(Clone, Debug)]
pub struct PatientData {
    pub id: RecordId,
    pub name: String,
    /// National document number (CPF). Not validated.
    pub document: String,
    /// Birth date as `DD/MM/YYYY`.
    pub birth_date: String,
    pub sex: String,
    /// Kilograms.
    pub weight: f64,
    /// Metres.
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    id: RecordId,
    name: String,
    document: String,
    birth_date: NaiveDate,
    age: Age,
    sex: String,
    weight: f64,
    height: f64,
    bmi: f64,
    appointments: Vec<String>,
}

impl Patient {
    /// Builds a patient, computing age against today's local date.
    ///
    /// # Errors
    ///
    /// Returns [`HospitalError::InvalidBirthDate`] if the birth date is malformed or in the
    /// future, and [`HospitalError::InvalidHeight`]/[`HospitalError::InvalidWeight`] if BMI
    /// cannot be computed.
    pub fn new(data: PatientData) -> HospitalResult<Self> {
        Self::new_at(data, Local::now().date_naive())
    }

    /// Builds a patient, computing age as of `today`.
    pub fn new_at(data: PatientData, today: NaiveDate) -> HospitalResult<Self> {
        let birth_date = parse_date(&data.birth_date)?;
        let age = Age::between(birth_date, today)
            .ok_or_else(|| HospitalError::InvalidBirthDate(data.birth_date.clone()))?;
        let bmi = bmi(data.weight, data.height)?;

        Ok(Self {
            id: data.id,
            name: data.name,
            document: data.document,
            birth_date,
            age,
            sex: data.sex,
            weight: data.weight,
            height: data.height,
            bmi,
            appointments: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn age(&self) -> Age {
        self.age
    }

    pub fn sex(&self) -> &str {
        &self.sex
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    /// Appointment ids linked to this patient. Always empty for now.
    pub fn appointments(&self) -> &[String] {
        &self.appointments
    }
}

impl Record for Patient {
    const TABLE: TableKind = TableKind::Patients;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_row(&self) -> HospitalResult<Row> {
        Ok(Row::new()
            .with("id", &self.id)
            .with("nome", &self.name)
            .with("cpf", &self.document)
            .with("data_nascimento", self.birth_date.format(DATE_FORMAT))
            .with("idade", self.age)
            .with("sexo", &self.sex)
            .with("peso", self.weight)
            .with("altura", self.height)
            .with("imc", self.bmi)
            .with("consultas", encode_list(&self.appointments)?))
    }

    fn from_row(row: &Row) -> HospitalResult<Self> {
        let data = PatientData {
            id: row_id(row)?,
            name: row.require("nome")?.to_string(),
            document: row.require("cpf")?.to_string(),
            birth_date: row.require("data_nascimento")?.to_string(),
            sex: row.require("sexo")?.to_string(),
            weight: parse_number(row, "peso")?,
            height: parse_number(row, "altura")?,
        };
        let mut patient = Patient::new(data)?;
        patient.appointments = decode_list(row.get("consultas").unwrap_or_default())?;
        Ok(patient)
    }
}

fn parse_number(row: &Row, column: &str) -> HospitalResult<f64> {
    let raw = row.require(column)?;
    raw.trim()
        .parse()
        .map_err(|_| HospitalError::InvalidInput(format!("{column} is not a number: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn test_data() -> PatientData {
        PatientData {
            id: RecordId::new("P1").unwrap(),
            name: "Maria da Silva".into(),
            document: "12345678900".into(),
            birth_date: "01/01/2000".into(),
            sex: "F".into(),
            weight: 70.0,
            height: 1.75,
        }
    }

    #[test]
    fn test_bmi_rounds_to_two_decimals() {
        assert_eq!(bmi(70.0, 1.75).unwrap(), 22.86);
        assert_eq!(bmi(62.5, 1.75).unwrap(), 20.41);
    }

    #[test]
    fn test_bmi_rejects_non_positive_height() {
        assert!(matches!(bmi(70.0, 0.0), Err(HospitalError::InvalidHeight(_))));
        assert!(matches!(bmi(70.0, -1.6), Err(HospitalError::InvalidHeight(_))));
        assert!(matches!(
            bmi(70.0, f64::NAN),
            Err(HospitalError::InvalidHeight(_))
        ));
    }

    #[test]
    fn test_age_whole_years() {
        let age = Age::between(date(1, 1, 2000), date(1, 1, 2025)).unwrap();
        assert_eq!(age.to_string(), "25 anos, 0 meses e 0 dias");
    }

    #[test]
    fn test_age_months_and_days() {
        let age = Age::between(date(15, 3, 1990), date(10, 6, 2024)).unwrap();
        assert_eq!(
            age,
            Age {
                years: 34,
                months: 2,
                days: 26
            }
        );
    }

    #[test]
    fn test_age_clamps_month_end() {
        let age = Age::between(date(31, 1, 2025), date(1, 3, 2025)).unwrap();
        assert_eq!(
            age,
            Age {
                years: 0,
                months: 1,
                days: 1
            }
        );
    }

    #[test]
    fn test_age_whole_month_on_last_day_of_shorter_month() {
        let age = Age::between(date(31, 1, 2025), date(28, 2, 2025)).unwrap();
        assert_eq!(age.to_string(), "0 anos, 1 meses e 0 dias");

        let age = Age::between(date(31, 1, 2025), date(27, 2, 2025)).unwrap();
        assert_eq!(age.to_string(), "0 anos, 0 meses e 27 dias");
    }

    #[test]
    fn test_age_leap_day_birthday_in_common_year() {
        let age = Age::between(date(29, 2, 2000), date(28, 2, 2001)).unwrap();
        assert_eq!(
            age,
            Age {
                years: 1,
                months: 0,
                days: 0
            }
        );
    }

    #[test]
    fn test_age_rejects_future_birth() {
        assert!(Age::between(date(2, 1, 2025), date(1, 1, 2025)).is_none());
    }

    #[test]
    fn test_new_at_computes_derived_fields() {
        let patient = Patient::new_at(test_data(), date(1, 1, 2025)).unwrap();
        assert_eq!(patient.age().to_string(), "25 anos, 0 meses e 0 dias");
        assert_eq!(patient.bmi(), 22.86);
        assert!(patient.appointments().is_empty());
    }

    #[test]
    fn test_new_rejects_malformed_birth_date() {
        for bad in ["2000-01-01", "31/02/2000", "", "1/1/00x"] {
            let data = PatientData {
                birth_date: bad.into(),
                ..test_data()
            };
            assert!(
                matches!(
                    Patient::new_at(data, date(1, 1, 2025)),
                    Err(HospitalError::InvalidBirthDate(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_new_rejects_zero_height() {
        let data = PatientData {
            height: 0.0,
            ..test_data()
        };
        assert!(matches!(
            Patient::new_at(data, date(1, 1, 2025)),
            Err(HospitalError::InvalidHeight(_))
        ));
    }

    #[test]
    fn test_to_row_column_order_and_values() {
        let patient = Patient::new_at(test_data(), date(1, 1, 2025)).unwrap();
        let row = patient.to_row().unwrap();

        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec![
                "id",
                "nome",
                "cpf",
                "data_nascimento",
                "idade",
                "sexo",
                "peso",
                "altura",
                "imc",
                "consultas"
            ]
        );
        assert_eq!(row.get("data_nascimento"), Some("01/01/2000"));
        assert_eq!(row.get("peso"), Some("70"));
        assert_eq!(row.get("altura"), Some("1.75"));
        assert_eq!(row.get("imc"), Some("22.86"));
        assert_eq!(row.get("consultas"), Some("[]"));
    }

    #[test]
    fn test_from_row_rebuilds_patient() {
        let patient = Patient::new(test_data()).unwrap();
        let rebuilt = Patient::from_row(&patient.to_row().unwrap()).unwrap();
        assert_eq!(rebuilt, patient);
    }

    #[test]
    fn test_from_row_rejects_non_numeric_height() {
        let mut row = Patient::new(test_data()).unwrap().to_row().unwrap();
        row.set("altura", "alto");
        assert!(matches!(
            Patient::from_row(&row),
            Err(HospitalError::InvalidInput(_))
        ));
    }
}
