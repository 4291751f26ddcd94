use std::process::ExitCode;

use tracing::error;

mod bootstrap;
mod dialog;
mod loop_runner;
mod npcs;
mod scenes;

pub(crate) fn run() -> ExitCode {
    match bootstrap::build_app() {
        Ok(wiring) => loop_runner::run(wiring),
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
