//! Ratatui front-end: the main menu, the add/find forms, and the list,
//! detail and averages screens. State lives in `App`; `run_app` owns the
//! terminal.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
