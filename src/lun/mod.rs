// ============================================================================
// src/lun/mod.rs – LUN identifiers, labels and the per-LUN audit record
// ============================================================================

pub mod discovery;
pub mod format;
pub mod ownership;
pub mod script;
pub mod ticket;
pub mod verify;

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{LunError, Result};

pub const MAX_LABEL_LEN: usize = 8;
/// Largest id list accepted from the command line in one run.
pub const MAX_LUNS_PER_RUN: usize = 30;
/// Slice that carries the data partition on every labelled LUN.
pub const DATA_SLICE: &str = "s6";

/// Controller 0, a 32 character WWN-style target starting with 6, disk 0.
pub(crate) const LUN_ID_PATTERN: &str = r"c0t6[0-9A-Za-z_]{31}d0";

static LUN_ID: OnceLock<Regex> = OnceLock::new();

fn lun_id_regex() -> &'static Regex {
    LUN_ID.get_or_init(|| {
        Regex::new(&format!("^{LUN_ID_PATTERN}$"))
            .expect("Failed to initialise known-working regex")
    })
}

/// Volume name written into every LUN labelled in one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label(String);

impl Label {
    pub fn parse(raw: &str) -> Result<Self> {
        let word = |c: char| c.is_ascii_alphanumeric() || c == '_';
        if raw.is_empty() || raw.len() > MAX_LABEL_LEN || !raw.chars().all(word) {
            return Err(LunError::InvalidLabel(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LunId(String);

impl LunId {
    /// Ids captured by the inventory pattern already have the right shape.
    pub(crate) fn discovered(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if lun_id_regex().is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(LunError::InvalidLunId(raw.to_string()))
        }
    }

    /// All or nothing: one malformed id rejects the whole batch.
    pub fn parse_list<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>> {
        if raw.len() > MAX_LUNS_PER_RUN {
            return Err(LunError::TooManyLuns {
                count: raw.len(),
                max: MAX_LUNS_PER_RUN,
            });
        }
        raw.iter().map(|id| Self::parse(id.as_ref())).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Device name of the data slice, e.g. `c0t6...d0s6`.
    pub fn data_slice(&self) -> String {
        format!("{}{DATA_SLICE}", self.0)
    }
}

impl fmt::Display for LunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing snapshots taken around a chown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ownership {
    pub device: String,
    pub before: String,
    pub after: String,
}

/// Everything learned about one LUN during a run. Each stage hands back a
/// new value with its own field filled in; nothing is ever overwritten.
#[derive(Clone, Debug)]
pub struct Lun {
    id: LunId,
    label: Option<Label>,
    format_output: Option<String>,
    ownership: Option<Ownership>,
    verification: Option<Vec<String>>,
    ticket_path: Option<String>,
}

impl Lun {
    pub fn new(id: LunId, label: Option<Label>) -> Self {
        Self {
            id,
            label,
            format_output: None,
            ownership: None,
            verification: None,
            ticket_path: None,
        }
    }

    pub fn id(&self) -> &LunId {
        &self.id
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn format_output(&self) -> Option<&str> {
        self.format_output.as_deref()
    }

    pub fn ownership(&self) -> Option<&Ownership> {
        self.ownership.as_ref()
    }

    pub fn verification(&self) -> Option<&[String]> {
        self.verification.as_deref()
    }

    pub fn ticket_path(&self) -> Option<&str> {
        self.ticket_path.as_deref()
    }

    pub fn with_format_output(self, transcript: String) -> Self {
        Self {
            format_output: Some(transcript),
            ..self
        }
    }

    pub fn with_ownership(self, ownership: Ownership) -> Self {
        Self {
            ownership: Some(ownership),
            ..self
        }
    }

    pub fn with_verification(self, lines: Vec<String>) -> Self {
        Self {
            verification: Some(lines),
            ..self
        }
    }

    pub fn with_ticket_path(self, path: String) -> Self {
        Self {
            ticket_path: Some(path),
            ..self
        }
    }
}

impl fmt::Display for Lun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (device, before, after) = match &self.ownership {
            Some(o) => (o.device.as_str(), o.before.as_str(), o.after.as_str()),
            None => ("chown not run.", "None", "None"),
        };
        writeln!(f, "LUN ID: {}", self.id)?;
        match &self.label {
            Some(label) => writeln!(f, "LABEL: {label}")?,
            None => writeln!(f, "LABEL: None")?,
        }
        writeln!(f, "LUN DEVICE FILE: {device}")?;
        writeln!(f, "LUN DEVICE FILE OWNERSHIP BEFORE CHOWN: {before}")?;
        writeln!(f, "LUN DEVICE FILE OWNERSHIP AFTER CHOWN: {after}")?;
        match &self.verification {
            Some(lines) => {
                writeln!(f, "PERTINENT LUN \"format verify\" INFORMATION:")?;
                for line in lines {
                    writeln!(f, "    {line}")?;
                }
            }
            None => writeln!(
                f,
                "PERTINENT LUN \"format verify\" INFORMATION: Verification not run."
            )?,
        }
        write!(
            f,
            "LUN ABSOLUTE PATH: {}",
            self.ticket_path.as_deref().unwrap_or("None")
        )
    }
}
