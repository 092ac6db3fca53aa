// ============================================================================
// src/lun/discovery.rs – Rescan controllers and pick out unlabelled LUNs
// ============================================================================

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::{LunId, LUN_ID_PATTERN};
use crate::cmd::{Runner, Tool};
use crate::error::Result;

static NEW_DISK: OnceLock<Regex> = OnceLock::new();

/// `format` prints `<id>: configured with capacity of ...` for every disk
/// that has no label yet.
fn new_disk_regex() -> &'static Regex {
    NEW_DISK.get_or_init(|| {
        Regex::new(&format!(r"({LUN_ID_PATTERN}):?\s+configured with capacity"))
            .expect("Failed to initialise known-working regex")
    })
}

/// Unlabelled LUN ids in inventory order.
pub fn parse_inventory(inventory: &str) -> Vec<LunId> {
    let mut ids: Vec<LunId> = Vec::new();
    for caps in new_disk_regex().captures_iter(inventory) {
        let id = LunId::discovered(&caps[1]);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// `cfgadm -al` to pick up newly zoned LUNs, then a bare `format` for the
/// disk inventory. An empty result just means there is nothing to do.
pub fn discover(runner: &dyn Runner) -> Result<Vec<LunId>> {
    info!("Scanning for new luns");
    let scan = runner.run(Tool::Cfgadm, &["-al"], None)?;
    if !scan.success() {
        warn!(status = scan.status, "cfgadm -al reported failure: {}", scan.stderr.trim());
    }

    let inventory = runner.run(Tool::Format, &[], None)?;
    if !inventory.success() {
        debug!(status = inventory.status, "format inventory exited non-zero");
    }

    let ids = parse_inventory(&inventory.stdout);
    info!("Found {} new lun(s)", ids.len());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LunError;
    use crate::testing::{failed, inventory, ok, FakeRunner, LUN_A, LUN_B};

    fn ids(found: &[LunId]) -> Vec<&str> {
        found.iter().map(LunId::as_str).collect()
    }

    #[test]
    fn picks_unlabelled_luns_from_the_inventory() {
        let text = "c0t60060E8007DF23000030DF23000000CFd0: configured with capacity of 100GB is unformatted";
        assert_eq!(ids(&parse_inventory(text)), [LUN_A]);
    }

    #[test]
    fn ignores_labelled_disks_and_other_controllers() {
        let text = format!(
            "{}\n\
             c0t5000CCA02546C5E8d0: configured with capacity of 279.37GB\n\
             c1t60060E8007DF23000030DF23000000CFd0: configured with capacity of 1GB\n\
             c0t60060E8007DF23000030DF23000000CFd0 <HITACHI-OPEN-V-SUN-8001>\n",
            inventory(&[LUN_B])
        );
        assert_eq!(ids(&parse_inventory(&text)), [LUN_B]);
    }

    #[test]
    fn keeps_inventory_order() {
        let text = inventory(&[LUN_B, LUN_A]);
        assert_eq!(ids(&parse_inventory(&text)), [LUN_B, LUN_A]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = inventory(&[LUN_A, LUN_B]);
        assert_eq!(parse_inventory(&text), parse_inventory(&text));
    }

    #[test]
    fn nothing_new_is_an_empty_list() {
        assert!(parse_inventory(&inventory(&[])).is_empty());
        assert!(parse_inventory("").is_empty());
    }

    #[test]
    fn discover_rescans_before_reading_inventory() {
        let runner = FakeRunner::solaris(&[LUN_A]);
        let found = discover(&runner).unwrap();
        assert_eq!(ids(&found), [LUN_A]);

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool, Tool::Cfgadm);
        assert_eq!(calls[0].args, ["-al"]);
        assert_eq!(calls[1].tool, Tool::Format);
        assert!(calls[1].args.is_empty());
        assert!(calls[1].input.is_none());
    }

    #[test]
    fn scan_failure_status_is_not_fatal() {
        let runner = FakeRunner::new(|tool, _, _| {
            Ok(match tool {
                Tool::Cfgadm => failed(1, "cfgadm: Library error"),
                _ => ok(&inventory(&[LUN_A])),
            })
        });
        assert_eq!(ids(&discover(&runner).unwrap()), [LUN_A]);
    }

    #[test]
    fn tool_launch_failure_is_fatal() {
        let runner = FakeRunner::new(|_, _, _| {
            Err(LunError::ProcessLaunch {
                program: "/usr/bin/sudo".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        });
        let err = discover(&runner).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(runner.tools(), [Tool::Cfgadm]);
    }
}
