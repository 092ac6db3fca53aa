// ============================================================================
// src/cmd/runner.rs – Tool dispatch seam between the workflow and the host
// ============================================================================

use std::time::Duration;

use crate::cmd::base::{Cmd, OutputData};
use crate::config::{Config, Escalation};
use crate::error::Result;

/// The external programs the workflow drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Cfgadm,
    Format,
    Ls,
    Chown,
}

impl Tool {
    /// Everything except directory listings touches hardware or ownership.
    pub fn privileged(self) -> bool {
        !matches!(self, Tool::Ls)
    }
}

pub trait Runner {
    /// Run `tool` to completion, feeding `input` on stdin when present.
    fn run(&self, tool: Tool, args: &[&str], input: Option<&str>) -> Result<OutputData>;
}

/// Runs the real Solaris binaries named in the config.
#[derive(Debug)]
pub struct SystemRunner {
    escalation: Option<Cmd>,
    cfgadm: Cmd,
    format: Cmd,
    ls: Cmd,
    chown: Cmd,
}

impl SystemRunner {
    pub fn from_config(cfg: &Config, timeout: Option<Duration>) -> Result<Self> {
        let escalation = match cfg.privilege.escalation {
            Escalation::Sudo => Some(Cmd::new_allowlisted(&cfg.privilege.sudo_path, timeout)?),
            Escalation::Pfexec => Some(Cmd::new_allowlisted(&cfg.privilege.pfexec_path, timeout)?),
            Escalation::None => None,
        };
        Ok(Self {
            escalation,
            cfgadm: Cmd::new_allowlisted(&cfg.tools.cfgadm, timeout)?,
            format: Cmd::new_allowlisted(&cfg.tools.format, timeout)?,
            ls: Cmd::new_allowlisted(&cfg.tools.ls, timeout)?,
            chown: Cmd::new_allowlisted(&cfg.tools.chown, timeout)?,
        })
    }

    fn cmd(&self, tool: Tool) -> &Cmd {
        match tool {
            Tool::Cfgadm => &self.cfgadm,
            Tool::Format => &self.format,
            Tool::Ls => &self.ls,
            Tool::Chown => &self.chown,
        }
    }

    /// The program actually spawned and its full argument list.
    fn argv<'a>(&'a self, tool: Tool, args: &[&'a str]) -> (&'a Cmd, Vec<&'a str>) {
        let target = self.cmd(tool);
        match &self.escalation {
            Some(escalation) if tool.privileged() => {
                let mut argv = Vec::with_capacity(args.len() + 1);
                argv.push(target.path.as_str());
                argv.extend_from_slice(args);
                (escalation, argv)
            }
            _ => (target, args.to_vec()),
        }
    }
}

impl Runner for SystemRunner {
    fn run(&self, tool: Tool, args: &[&str], input: Option<&str>) -> Result<OutputData> {
        let (cmd, argv) = self.argv(tool, args);
        cmd.run(&argv, input.map(str::as_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LunError;

    #[test]
    fn privileged_tools_go_through_sudo() {
        let runner = SystemRunner::from_config(&Config::default(), None).unwrap();

        let (cmd, argv) = runner.argv(Tool::Format, &["-e", "c0t6d0"]);
        assert_eq!(cmd.path, "/usr/bin/sudo");
        assert_eq!(argv, ["/usr/sbin/format", "-e", "c0t6d0"]);

        let (cmd, argv) = runner.argv(Tool::Chown, &["oracle:dba", "dev"]);
        assert_eq!(cmd.path, "/usr/bin/sudo");
        assert_eq!(argv, ["/bin/chown", "oracle:dba", "dev"]);
    }

    #[test]
    fn listings_never_escalate() {
        let runner = SystemRunner::from_config(&Config::default(), None).unwrap();
        let (cmd, argv) = runner.argv(Tool::Ls, &["-l", "c0t6d0s6"]);
        assert_eq!(cmd.path, "/usr/bin/ls");
        assert_eq!(argv, ["-l", "c0t6d0s6"]);
    }

    #[test]
    fn pfexec_and_direct_execution() {
        let mut cfg = Config::default();
        cfg.privilege.escalation = Escalation::Pfexec;
        let runner = SystemRunner::from_config(&cfg, None).unwrap();
        let (cmd, argv) = runner.argv(Tool::Cfgadm, &["-al"]);
        assert_eq!(cmd.path, "/usr/bin/pfexec");
        assert_eq!(argv, ["/usr/sbin/cfgadm", "-al"]);

        cfg.privilege.escalation = Escalation::None;
        let runner = SystemRunner::from_config(&cfg, None).unwrap();
        let (cmd, argv) = runner.argv(Tool::Cfgadm, &["-al"]);
        assert_eq!(cmd.path, "/usr/sbin/cfgadm");
        assert_eq!(argv, ["-al"]);
    }

    #[test]
    fn configured_paths_must_be_allowlisted() {
        let mut cfg = Config::default();
        cfg.tools.format = "/opt/tools/format".to_string();
        assert!(matches!(
            SystemRunner::from_config(&cfg, None),
            Err(LunError::NotAllowlisted(p)) if p == "/opt/tools/format"
        ));
    }
}
