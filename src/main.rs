//! Binary entry point: resolve configuration, start file logging, open the
//! database, and drive the Ratatui event loop until the user exits.
use log::{error, info};
use student_records::{logging, open_database, run_app, App, AppConfig};

/// Returning a `Result` bubbles fatal startup problems (an unreadable data
/// directory, a locked database) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let _logger = logging::init_logging(&config.log_level, &config.log_dir)?;

    let conn = open_database(&config).inspect_err(|err| {
        error!("event=app_start status=error error={err:#}");
    })?;

    let mut app = App::new(conn);
    let result = run_app(&mut app);
    match &result {
        Ok(()) => info!("event=app_exit status=ok"),
        Err(err) => error!("event=app_exit status=error error={err:#}"),
    }
    result
}
