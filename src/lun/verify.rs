// ============================================================================
// src/lun/verify.rs – Post-format check via `format -e <lun>s6` + verify
// ============================================================================

use tracing::info;

use super::Lun;
use crate::cmd::{Runner, Tool};
use crate::error::Result;

pub const VERIFY_INPUT: &str = "verify\n";

/// The volume name shows the label took; `usr` rows show the partitions.
const MARKERS: [&str; 2] = ["Volume name", "usr"];

/// Transcript lines an operator needs, in their original order.
pub fn filter_verification(transcript: &str) -> Vec<String> {
    transcript
        .lines()
        .filter(|line| MARKERS.iter().any(|m| line.contains(m)))
        .map(str::to_string)
        .collect()
}

pub fn verify_lun(runner: &dyn Runner, lun: Lun) -> Result<Lun> {
    let target = lun.id().data_slice();
    info!("Verifying:\t{target}");

    let out = runner.run(Tool::Format, &["-e", &target], Some(VERIFY_INPUT))?;
    let lines = filter_verification(&out.combined());
    for line in &lines {
        info!("{line}");
    }

    Ok(lun.with_verification(lines))
}
