// ============================================================================
// src/lun/ownership.rs – Resolve a LUN's raw device file and chown it
// ============================================================================

use tracing::{debug, info};

use super::{Lun, LunId, Ownership};
use crate::cmd::{Runner, Tool};
use crate::error::{LunError, Result};

pub const DEFAULT_OWNERSHIP: &str = "oracle:dba";

/// Link target from an `ls -l` line such as
/// `lrwxrwxrwx 1 root root 66 Mar 14 2018 c0t6...d0s6 -> ../../devices/...:g,raw`.
pub fn parse_device_target(listing: &str) -> Option<String> {
    let line = listing.lines().find(|l| l.contains(" -> "))?;
    let target = line.rsplit(" -> ").next()?.trim();
    if target.is_empty() || target.contains(char::is_whitespace) {
        return None;
    }
    Some(target.to_string())
}

/// Follow the `/dev/rdsk/<id>s6` symlink to the device node it names.
pub fn resolve_device(runner: &dyn Runner, id: &LunId) -> Result<String> {
    let link = id.data_slice();
    let out = runner.run(Tool::Ls, &["-l", &link], None)?;
    if !out.success() {
        return Err(LunError::DeviceResolve {
            path: link,
            detail: out.combined().trim().to_string(),
        });
    }
    parse_device_target(&out.stdout).ok_or_else(|| LunError::DeviceResolve {
        path: link,
        detail: format!("not a symlink: {}", out.stdout.trim()),
    })
}

fn long_listing(runner: &dyn Runner, device: &str) -> Result<String> {
    Ok(runner
        .run(Tool::Ls, &["-l", device], None)?
        .combined()
        .trim()
        .to_string())
}

/// Resolve, list, chown, list again. `verbose` puts the before/after
/// listings on the console; otherwise they only reach the debug log.
pub fn chown_lun(runner: &dyn Runner, lun: Lun, ownership: &str, verbose: bool) -> Result<Lun> {
    let device = resolve_device(runner, lun.id())?;
    let before = long_listing(runner, &device)?;

    let out = runner.run(Tool::Chown, &[ownership, &device], None)?;
    if !out.success() {
        return Err(LunError::Chown {
            device,
            status: out.status,
            output: out.combined().trim().to_string(),
        });
    }

    let after = long_listing(runner, &device)?;
    if verbose {
        info!("[Before]: {before}");
        info!("[After ]: {after}");
    } else {
        debug!("[Before]: {before}");
        debug!("[After ]: {after}");
    }

    Ok(lun.with_ownership(Ownership {
        device,
        before,
        after,
    }))
}
