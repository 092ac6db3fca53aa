// ============================================================================
// src/cmd/mod.rs – command subsystem root
// ============================================================================
pub mod base; // allowlisted process execution (Cmd, OutputData)
pub mod runner; // Tool dispatch + privilege escalation

// Re-export common types for convenience:
pub use base::OutputData;
pub use runner::{Runner, SystemRunner, Tool};
