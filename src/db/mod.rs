//! Persistence module split across logical submodules.

mod connection;
mod students;

pub use connection::{ensure_schema, open_database, open_in_memory};
pub use students::StudentRepository;
