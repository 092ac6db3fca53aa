// ============================================================================
// src/lun/format.rs – Drive `format -e` through the labelling script
// ============================================================================

use tracing::{debug, info, warn};

use super::Lun;
use crate::cmd::{Runner, Tool};
use crate::error::Result;

/// Label one LUN. The transcript is kept for the audit record only.
pub fn format_lun(runner: &dyn Runner, lun: Lun, script: &str) -> Result<Lun> {
    match lun.label() {
        Some(label) => info!("Starting format work on {} with label: {label}", lun.id()),
        None => info!("Starting format work on {}", lun.id()),
    }

    let out = runner.run(Tool::Format, &["-e", lun.id().as_str()], Some(script))?;
    if !out.success() {
        warn!(status = out.status, "format -e {} exited non-zero", lun.id());
    }
    let transcript = out.combined();
    debug!("format output for {}:\n{transcript}", lun.id());

    Ok(lun.with_format_output(transcript))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lun::script::build_format_script;
    use crate::lun::{Label, LunId};
    use crate::testing::{FakeRunner, LUN_A};

    #[test]
    fn pipes_the_script_into_expert_mode() {
        let runner = FakeRunner::solaris(&[LUN_A]);
        let label = Label::parse("DB01").unwrap();
        let script = build_format_script(&label);
        let lun = Lun::new(LunId::parse(LUN_A).unwrap(), Some(label));

        let lun = format_lun(&runner, lun, &script).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool, Tool::Format);
        assert_eq!(calls[0].args, ["-e", LUN_A]);
        assert_eq!(calls[0].input.as_deref(), Some(script.as_str()));
        assert!(lun.format_output().unwrap().contains("Ready to label disk"));
    }

    #[test]
    fn transcript_keeps_stderr_too() {
        let runner = FakeRunner::new(|_, _, _| {
            Ok(crate::cmd::OutputData {
                stdout: "format> ".into(),
                stderr: "Warning: Current Disk has mounted partitions.\n".into(),
                status: 1,
            })
        });
        let lun = Lun::new(LunId::parse(LUN_A).unwrap(), None);
        let lun = format_lun(&runner, lun, "q").unwrap();
        assert_eq!(
            lun.format_output(),
            Some("format> Warning: Current Disk has mounted partitions.\n")
        );
    }
}
