// ============================================================================
// src/config.rs – strict config loader
// ============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::lun::ownership::DEFAULT_OWNERSHIP;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/lun_format.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tools {
    #[serde(default = "default_cfgadm")]
    pub cfgadm: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_ls")]
    pub ls: String,
    #[serde(default = "default_chown")]
    pub chown: String,
}

fn default_cfgadm() -> String {
    "/usr/sbin/cfgadm".to_string()
}

fn default_format() -> String {
    "/usr/sbin/format".to_string()
}

fn default_ls() -> String {
    "/usr/bin/ls".to_string()
}

fn default_chown() -> String {
    "/bin/chown".to_string()
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            cfgadm: default_cfgadm(),
            format: default_format(),
            ls: default_ls(),
            chown: default_chown(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escalation {
    #[default]
    Sudo,
    Pfexec,
    None,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Privilege {
    /// How cfgadm, format and chown are elevated. `ls` always runs as-is.
    #[serde(default)]
    pub escalation: Escalation,
    #[serde(default = "default_sudo_path")]
    pub sudo_path: String,
    #[serde(default = "default_pfexec_path")]
    pub pfexec_path: String,
}

fn default_sudo_path() -> String {
    "/usr/bin/sudo".to_string()
}

fn default_pfexec_path() -> String {
    "/usr/bin/pfexec".to_string()
}

impl Default for Privilege {
    fn default() -> Self {
        Self {
            escalation: Escalation::default(),
            sudo_path: default_sudo_path(),
            pfexec_path: default_pfexec_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Run {
    #[serde(default = "default_device_root")]
    pub device_root: String,
    /// `user:group` handed to chown.
    #[serde(default = "default_ownership")]
    pub ownership: String,
    #[serde(default = "default_logfile_path")]
    pub logfile_path: PathBuf,
    /// Upper bound for a single tool invocation. Unset waits forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_device_root() -> String {
    "/dev/rdsk/".to_string()
}

fn default_ownership() -> String {
    DEFAULT_OWNERSHIP.to_string()
}

fn default_logfile_path() -> PathBuf {
    PathBuf::from("/var/tmp/")
}

impl Default for Run {
    fn default() -> Self {
        Self {
            device_root: default_device_root(),
            ownership: default_ownership(),
            logfile_path: default_logfile_path(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub tools: Tools,
    #[serde(default)]
    pub privilege: Privilege,
    #[serde(default)]
    pub run: Run,
}

impl Config {
    pub fn load<P: AsRef<Path>>(p: P) -> Result<Self> {
        let s = fs::read_to_string(&p)
            .with_context(|| format!("read config: {}", p.as_ref().display()))?;
        let cfg: Self = if p.as_ref().extension().and_then(|e| e.to_str()) == Some("toml") {
            toml::from_str(&s).context("toml parse")?
        } else {
            serde_yaml::from_str(&s).context("yaml parse")?
        };
        Ok(cfg)
    }

    /// An explicit path must exist; the system-wide default is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
