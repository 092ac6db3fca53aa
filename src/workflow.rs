// ============================================================================
// src/workflow.rs – Run modes: standard provisioning, verify-only, shared chown
// ============================================================================

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::cmd::Runner;
use crate::error::{LunError, Result};
use crate::lun::discovery::discover;
use crate::lun::format::format_lun;
use crate::lun::ownership::chown_lun;
use crate::lun::script::build_format_script;
use crate::lun::ticket::{ticket_path, write_tickets};
use crate::lun::verify::verify_lun;
use crate::lun::{Label, Lun, LunId};

/// What one invocation will do, decided and validated before anything on
/// the host is touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    /// Discover, format, optionally chown, verify, print ticket paths.
    Standard {
        label: Label,
        chown: bool,
        quiet: bool,
    },
    /// Verify already formatted LUNs only.
    VerifyOnly { ids: Vec<LunId> },
    /// Chown LUNs formatted on the primary of a shared-disk pair.
    SharedChown {
        ids: Vec<LunId>,
        label: Option<Label>,
    },
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub device_root: String,
    pub ownership: String,
}

/// `format`, `cfgadm` and the `/dev/rdsk` layout only exist on SunOS.
pub fn check_platform(os: &str) -> Result<()> {
    match os {
        "solaris" | "illumos" => Ok(()),
        other => Err(LunError::UnsupportedPlatform(other.to_string())),
    }
}

/// Device names are passed to the tools relative to the device root.
pub fn enter_device_root(root: &Path) -> Result<()> {
    std::env::set_current_dir(root).map_err(|source| LunError::ChangeDirectory {
        path: root.to_path_buf(),
        source,
    })
}

pub fn execute(
    plan: &Plan,
    runner: &dyn Runner,
    opts: &RunOptions,
    out: &mut dyn Write,
) -> Result<Vec<Lun>> {
    match plan {
        Plan::Standard {
            label,
            chown,
            quiet,
        } => standard_run(runner, label, *chown, *quiet, opts, out),
        Plan::VerifyOnly { ids } => verify_only(runner, ids),
        Plan::SharedChown { ids, label } => shared_chown(runner, ids, label.as_ref(), opts),
    }
}

pub fn standard_run(
    runner: &dyn Runner,
    label: &Label,
    chown: bool,
    quiet: bool,
    opts: &RunOptions,
    out: &mut dyn Write,
) -> Result<Vec<Lun>> {
    let ids = discover(runner)?;
    if ids.is_empty() {
        info!("No new luns found; nothing to format");
        return Ok(Vec::new());
    }

    debug!("Creating format input template");
    let script = build_format_script(label);

    let mut luns = Vec::with_capacity(ids.len());
    for id in ids {
        let lun = Lun::new(id, Some(label.clone()));
        let lun = format_lun(runner, lun, &script)?;
        let lun = if chown {
            chown_lun(runner, lun, &opts.ownership, !quiet)?
        } else {
            lun
        };
        let lun = verify_lun(runner, lun)?;
        let path = ticket_path(&opts.device_root, lun.id());
        luns.push(lun.with_ticket_path(path));
    }

    info!("Listing lun path(s) for ticket");
    write_tickets(out, &luns)?;
    for lun in &luns {
        info!("\n{lun}");
        debug!(
            id = %lun.id(),
            verification = ?lun.verification(),
            "format output:\n{}",
            lun.format_output().unwrap_or("format not run.")
        );
    }
    Ok(luns)
}

pub fn verify_only(runner: &dyn Runner, ids: &[LunId]) -> Result<Vec<Lun>> {
    debug!("Verifying lun(s) formatting");
    ids.iter()
        .map(|id| verify_lun(runner, Lun::new(id.clone(), None)))
        .collect()
}

pub fn shared_chown(
    runner: &dyn Runner,
    ids: &[LunId],
    label: Option<&Label>,
    opts: &RunOptions,
) -> Result<Vec<Lun>> {
    let names: Vec<&str> = ids.iter().map(LunId::as_str).collect();
    info!("Chowning shared lun(s) {names:?}");

    let mut luns = Vec::with_capacity(ids.len());
    for id in ids {
        let lun = Lun::new(id.clone(), label.cloned());
        let lun = chown_lun(runner, lun, &opts.ownership, false)?;
        debug!(?lun);
        luns.push(lun);
    }

    info!(" -=[Before]=-");
    for lun in &luns {
        if let Some(o) = lun.ownership() {
            info!("{}:{}", lun.id(), o.before);
        }
    }
    info!(" -=[After]=-");
    for lun in &luns {
        if let Some(o) = lun.ownership() {
            info!("{}:{}", lun.id(), o.after);
        }
    }
    Ok(luns)
}
