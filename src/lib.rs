//! Core library surface for the Student Records TUI application.
//!
//! The `bin` target wires these pieces together; integration tests drive the
//! model and repository directly against in-memory SQLite.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::AppConfig;

/// Persistence entry points: connection bootstrap and the student repository.
pub use db::{open_database, open_in_memory, StudentRepository};

/// Domain types shared by the repository and the UI.
pub use models::{Gender, ScoreAverages, Student, Subject, ValidationError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
