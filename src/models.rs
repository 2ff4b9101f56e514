//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. `Student` guards its own invariants: every public mutation goes through
//! a validating setter, so a value that exists outside the persistence layer is
//! always storable.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use thiserror::Error;

/// Lowest score accepted for either subject.
pub const MIN_SCORE: f64 = 0.0;
/// Highest score accepted for either subject.
pub const MAX_SCORE: f64 = 100.0;

/// Rejections raised when a `Student` field is assigned an invalid value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    EmptyName,
    #[error("Gender must be one of male, female or other (got '{0}').")]
    InvalidGender(String),
    #[error("{subject} score must be between 0 and 100 (got {value}).")]
    ScoreOutOfRange { subject: Subject, value: f64 },
}

/// The two graded subjects tracked per student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Math,
    Java,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Math => write!(f, "Math"),
            Subject::Java => write!(f, "Java"),
        }
    }
}

/// Closed set of genders the schema accepts. Stored as the lowercase word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ValidationError::InvalidGender(raw.trim().to_string())),
        }
    }
}

impl ToSql for Gender {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Gender {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|err: ValidationError| FromSqlError::Other(Box::new(err)))
    }
}

/// In-memory representation of one row of the `students` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    /// Primary key assigned by SQLite. Zero until the row has been persisted.
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) gender: Gender,
    pub(crate) class_name: String,
    pub(crate) math_score: f64,
    pub(crate) java_score: f64,
    /// Populated from the store on read; `None` for a student built in memory.
    pub(crate) created_at: Option<NaiveDateTime>,
    pub(crate) updated_at: Option<NaiveDateTime>,
}

impl Student {
    /// Build a not-yet-persisted student, running every field through the same
    /// checks the setters apply.
    pub fn new(
        name: &str,
        gender: &str,
        class_name: &str,
        math_score: f64,
        java_score: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: 0,
            name: validate_name(name)?,
            gender: gender.parse()?,
            class_name: class_name.trim().to_string(),
            math_score: validate_score(Subject::Math, math_score)?,
            java_score: validate_score(Subject::Java, java_score)?,
            created_at: None,
            updated_at: None,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn math_score(&self) -> f64 {
        self.math_score
    }

    pub fn java_score(&self) -> f64 {
        self.java_score
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.updated_at
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validate_name(name)?;
        Ok(())
    }

    pub fn set_gender(&mut self, gender: &str) -> Result<(), ValidationError> {
        self.gender = gender.parse()?;
        Ok(())
    }

    pub fn set_class_name(&mut self, class_name: &str) {
        self.class_name = class_name.trim().to_string();
    }

    pub fn set_math_score(&mut self, score: f64) -> Result<(), ValidationError> {
        self.math_score = validate_score(Subject::Math, score)?;
        Ok(())
    }

    pub fn set_java_score(&mut self, score: f64) -> Result<(), ValidationError> {
        self.java_score = validate_score(Subject::Java, score)?;
        Ok(())
    }

    /// Sum of both subject scores.
    pub fn total(&self) -> f64 {
        self.math_score + self.java_score
    }

    /// Mean of both subject scores.
    pub fn average(&self) -> f64 {
        self.total() / 2.0
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {:<4} Name: {:<12} Gender: {:<7} Class: {:<15} Math: {:<6.2} Java: {:<6.2} Avg: {:.2}",
            self.id,
            self.name,
            self.gender,
            self.class_name,
            self.math_score,
            self.java_score,
            self.average()
        )
    }
}

/// Per-subject means across every stored student.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAverages {
    pub math: f64,
    pub java: f64,
}

impl ScoreAverages {
    /// Mean of the two subject averages.
    pub fn overall(&self) -> f64 {
        (self.math + self.java) / 2.0
    }

    /// `[math, java]`, in column order.
    pub fn as_array(&self) -> [f64; 2] {
        [self.math, self.java]
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}

// NaN fails both comparisons and is rejected with the rest.
fn validate_score(subject: Subject, value: f64) -> Result<f64, ValidationError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::ScoreOutOfRange { subject, value })
    }
}
