use anyhow::{Context, Result};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{ScoreAverages, Student};

const STUDENT_COLUMNS: &str =
    "id, name, gender, class_name, math_score, java_score, created_at, updated_at";

/// Issues the four student statements against a connection owned by the
/// caller. Every public operation absorbs execution errors: they are logged
/// with their full context chain and turned into `None` or an empty list, so a
/// failing statement never takes the session down.
pub struct StudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> StudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Insert a student and return the id SQLite assigned, or `None` when the
    /// statement failed.
    pub fn create(&self, student: &Student) -> Option<i64> {
        match self.try_create(student) {
            Ok(id) => {
                info!("event=student_create status=ok id={id}");
                Some(id)
            }
            Err(err) => {
                error!("event=student_create status=error error={err:#}");
                None
            }
        }
    }

    /// Look a student up by primary key. `None` covers both "no such row" and
    /// a failed statement; only the latter is logged as an error.
    pub fn get_by_id(&self, id: i64) -> Option<Student> {
        self.lookup(id).ok().flatten()
    }

    /// Like `get_by_id`, but keeps "not found" (`Ok(None)`) apart from a failed
    /// statement (`Err`). The failure is logged before it is returned, so the
    /// UI only needs to say that it happened.
    pub(crate) fn lookup(&self, id: i64) -> Result<Option<Student>> {
        self.try_get_by_id(id)
            .inspect(|found| {
                if found.is_none() {
                    debug!("event=student_get status=not_found id={id}");
                }
            })
            .inspect_err(|err| {
                error!("event=student_get status=error id={id} error={err:#}");
            })
    }

    /// Every student ordered by ascending id. Empty when the table is empty or
    /// the query failed.
    pub fn get_all(&self) -> Vec<Student> {
        match self.try_get_all() {
            Ok(students) => students,
            Err(err) => {
                error!("event=student_list status=error error={err:#}");
                Vec::new()
            }
        }
    }

    /// Per-subject means across all rows. An empty table reports `0.0` for
    /// both subjects; `None` means the aggregate query itself failed.
    pub fn average_scores(&self) -> Option<ScoreAverages> {
        match self.try_average_scores() {
            Ok(averages) => Some(averages),
            Err(err) => {
                error!("event=student_averages status=error error={err:#}");
                None
            }
        }
    }

    fn try_create(&self, student: &Student) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO students (name, gender, class_name, math_score, java_score)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    student.name,
                    student.gender,
                    student.class_name,
                    student.math_score,
                    student.java_score
                ],
            )
            .context("failed to insert student")?;

        Ok(self.conn.last_insert_rowid())
    }

    fn try_get_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
                [id],
                student_from_row,
            )
            .optional()
            .context("failed to load student")
    }

    fn try_get_all(&self) -> Result<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"
            ))
            .context("failed to prepare student query")?;

        let students = stmt
            .query_map([], student_from_row)
            .context("failed to load students")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect students")?;

        Ok(students)
    }

    fn try_average_scores(&self) -> Result<ScoreAverages> {
        self.conn
            .query_row(
                "SELECT COALESCE(AVG(math_score), 0.0), COALESCE(AVG(java_score), 0.0)
                 FROM students",
                [],
                |row| {
                    Ok(ScoreAverages {
                        math: row.get(0)?,
                        java: row.get(1)?,
                    })
                },
            )
            .context("failed to compute average scores")
    }
}

/// Hydrate a `Student` straight from a row. Values come from our own table,
/// whose CHECK constraints match the model's validation, so the setters are
/// bypassed.
fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        gender: row.get(2)?,
        class_name: row.get(3)?,
        math_score: row.get(4)?,
        java_score: row.get(5)?,
        created_at: Some(row.get(6)?),
        updated_at: Some(row.get(7)?),
    })
}
