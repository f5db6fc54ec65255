pub mod bindings;
pub mod bootstrap;
pub mod completions;
pub mod devfile;
pub mod init;
pub mod man_pages;

use std::path::PathBuf;
use trellis_core::CoreError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_PARAMETER_ERROR: u8 = 2;
pub const EXIT_IO_ERROR: u8 = 3;

const PARAMETER_PREFIX: &str = "invalid input:";
const IO_PREFIX: &str = "io error:";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Render a core error as the message `main` prints, tagged with its class.
pub fn describe(err: &CoreError) -> String {
    if err.is_parameter_error() {
        format!("{PARAMETER_PREFIX} {err}")
    } else if err.is_io_error() {
        format!("{IO_PREFIX} {err}")
    } else {
        err.to_string()
    }
}

pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with(PARAMETER_PREFIX) {
        EXIT_PARAMETER_ERROR
    } else if msg.starts_with(IO_PREFIX) {
        EXIT_IO_ERROR
    } else {
        EXIT_FAILURE
    }
}

pub fn ok_mark() -> String {
    console::Style::new().green().apply_to("✓").to_string()
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
