use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Gender, Student};

/// Internal representation of the "add student" form fields. Values are kept
/// as raw text until `parse_inputs` turns them into a validated `Student`.
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) gender: String,
    pub(crate) class_name: String,
    pub(crate) math_score: String,
    pub(crate) java_score: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

/// Fields available within the student form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Gender,
    ClassName,
    MathScore,
    JavaScore,
}

impl StudentField {
    pub(crate) const ALL: [StudentField; 5] = [
        StudentField::Name,
        StudentField::Gender,
        StudentField::ClassName,
        StudentField::MathScore,
        StudentField::JavaScore,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            StudentField::Name => "Name",
            StudentField::Gender => "Gender",
            StudentField::ClassName => "Class",
            StudentField::MathScore => "Math score",
            StudentField::JavaScore => "Java score",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            StudentField::Name => "<required>",
            StudentField::Gender => "<male / female / other>",
            StudentField::ClassName => "<optional>",
            StudentField::MathScore | StudentField::JavaScore => "<0-100>",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, StudentField::MathScore | StudentField::JavaScore)
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

impl StudentForm {
    /// Move focus forward (`1`) or backward (`-1`), wrapping at either end.
    pub(crate) fn cycle_field(&mut self, offset: isize) {
        let len = StudentField::ALL.len() as isize;
        let next = (self.active.index() as isize + offset).rem_euclid(len);
        self.active = StudentField::ALL[next as usize];
    }

    /// Step through the known genders while the gender field has focus. Any
    /// free text already typed is replaced.
    pub(crate) fn cycle_gender(&mut self, offset: isize) -> bool {
        if self.active != StudentField::Gender {
            return false;
        }
        let len = Gender::ALL.len() as isize;
        let current = self
            .gender
            .parse::<Gender>()
            .ok()
            .and_then(|gender| Gender::ALL.iter().position(|g| *g == gender));
        let next = match current {
            Some(idx) => (idx as isize + offset).rem_euclid(len),
            None if offset < 0 => len - 1,
            None => 0,
        };
        self.gender = Gender::ALL[next as usize].to_string();
        true
    }

    /// Append a character to the active field. Score fields only take digits
    /// and a single decimal point.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        let value = self.value_mut(field);
        if field.is_numeric() && !(ch.is_ascii_digit() || (ch == '.' && !value.contains('.'))) {
            return false;
        }
        value.push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Parse the score fields and build a validated `Student`. Non-numeric
    /// scores are rejected here, before the model sees them.
    pub(crate) fn parse_inputs(&self) -> Result<Student> {
        let math_score = parse_score(&self.math_score, StudentField::MathScore)?;
        let java_score = parse_score(&self.java_score, StudentField::JavaScore)?;
        let student = Student::new(
            &self.name,
            &self.gender,
            &self.class_name,
            math_score,
            java_score,
        )?;
        Ok(student)
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: StudentField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Gender => &self.gender,
            StudentField::ClassName => &self.class_name,
            StudentField::MathScore => &self.math_score,
            StudentField::JavaScore => &self.java_score,
        }
    }

    fn value_mut(&mut self, field: StudentField) -> &mut String {
        match field {
            StudentField::Name => &mut self.name,
            StudentField::Gender => &mut self.gender,
            StudentField::ClassName => &mut self.class_name,
            StudentField::MathScore => &mut self.math_score,
            StudentField::JavaScore => &mut self.java_score,
        }
    }
}

fn parse_score(raw: &str, field: StudentField) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} is required.", field.label()));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| anyhow!("{} must be a number.", field.label()))
}

/// Single-field form used by the "find by ID" flow.
#[derive(Default, Clone)]
pub(crate) struct IdForm {
    pub(crate) id: String,
    pub(crate) error: Option<String>,
}

impl IdForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() {
            self.id.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.id.pop();
    }

    pub(crate) fn parse_id(&self) -> Result<i64> {
        let raw = self.id.trim();
        if raw.is_empty() {
            return Err(anyhow!("Student ID is required."));
        }
        raw.parse::<i64>()
            .map_err(|_| anyhow!("Student ID must be a whole number."))
    }
}
