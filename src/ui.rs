// ============================================================================
// src/ui.rs – Short operator-facing console messages
// ============================================================================

use console::Style;

/// One-line fatal message on stderr; the full chain goes to the log.
pub fn error(msg: &str) {
    let tag = Style::new().for_stderr().red().bold().apply_to("Error:");
    eprintln!(" {tag} {msg}");
}

pub fn warn(msg: &str) {
    let tag = Style::new().for_stderr().yellow().bold().apply_to("Warning:");
    eprintln!(" {tag} {msg}");
}
