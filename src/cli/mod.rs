//! Command-line interface: argument types, output formatting and handlers

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use crate::domain::RagError;

/// Exit code for startup failures (configuration, corpus, index)
pub const EXIT_STARTUP: i32 = 2;

/// Exit code for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// Whether the error chain carries a startup [`RagError`]
pub fn is_startup_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<RagError>())
        .is_some_and(RagError::is_fatal)
}

/// Process exit code for a command error
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if is_startup_failure(err) {
        EXIT_STARTUP
    } else {
        EXIT_FAILURE
    }
}

/// Print a command error and exit non-zero
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    let startup = is_startup_failure(err);
    if json_mode {
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
            "startup": startup,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else if startup {
        eprintln!("Error: mailrag could not start: {err:#}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(exit_code(err));
}
