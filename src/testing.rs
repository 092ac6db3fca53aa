// ============================================================================
// src/testing.rs – Scripted stand-in for the Solaris tools (tests only)
// ============================================================================

use std::cell::RefCell;

use crate::cmd::{OutputData, Runner, Tool};
use crate::error::Result;

pub const LUN_A: &str = "c0t60060E8007DF23000030DF23000000CFd0";
pub const LUN_B: &str = "c0t60060E8007DF23000030DF23000000D0d0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub tool: Tool,
    pub args: Vec<String>,
    pub input: Option<String>,
}

type Responder = Box<dyn Fn(Tool, &[&str], Option<&str>) -> Result<OutputData>>;

/// Answers every invocation through `respond` and records what was asked.
pub struct FakeRunner {
    respond: Responder,
    calls: RefCell<Vec<Call>>,
}

impl FakeRunner {
    pub fn new(respond: impl Fn(Tool, &[&str], Option<&str>) -> Result<OutputData> + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A host that behaves like a healthy Solaris box with `luns` freshly zoned.
    pub fn solaris(luns: &'static [&'static str]) -> Self {
        Self::new(move |tool, args, _| {
            Ok(match tool {
                Tool::Cfgadm => ok(CFGADM_OUT),
                Tool::Format if args.is_empty() => ok(&inventory(luns)),
                Tool::Format if args.last().is_some_and(|a| a.ends_with("s6")) => {
                    ok(&verify_transcript("DB01"))
                }
                Tool::Format => ok("format> label\nReady to label disk, continue? y\n"),
                Tool::Ls if args[1].ends_with("s6") => ok(&symlink_listing(args[1])),
                Tool::Ls => ok(&format!("crw-r-----   1 root     sys      118, 102 Mar 14 15:09 {}\n", args[1])),
                Tool::Chown => ok(""),
            })
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.calls.borrow().iter().map(|c| c.tool).collect()
    }
}

impl Runner for FakeRunner {
    fn run(&self, tool: Tool, args: &[&str], input: Option<&str>) -> Result<OutputData> {
        self.calls.borrow_mut().push(Call {
            tool,
            args: args.iter().map(|a| a.to_string()).collect(),
            input: input.map(str::to_string),
        });
        (self.respond)(tool, args, input)
    }
}

pub fn ok(stdout: &str) -> OutputData {
    OutputData {
        stdout: stdout.to_string(),
        stderr: String::new(),
        status: 0,
    }
}

pub fn failed(status: i32, stderr: &str) -> OutputData {
    OutputData {
        stdout: String::new(),
        stderr: stderr.to_string(),
        status,
    }
}

pub const CFGADM_OUT: &str = "\
Ap_Id                          Type         Receptacle   Occupant     Condition
c2                             fc-fabric    connected    configured   unknown
c2::50060e8007df2320           disk         connected    configured   unknown
c3                             fc-fabric    connected    configured   unknown
";

pub fn inventory(luns: &[&str]) -> String {
    let mut out = String::from("Searching for disks...done\n\n");
    for lun in luns {
        out.push_str(&format!(
            "{lun}: configured with capacity of 100.00GB\n"
        ));
    }
    out.push_str("\n\nAVAILABLE DISK SELECTIONS:\n");
    out.push_str(
        "       0. c0t5000CCA02546C5E8d0 <SUN300G cyl 46873 alt 2 hd 20 sec 625>\n          /scsi_vhci/disk@g5000cca02546c5e8\n",
    );
    for (n, lun) in luns.iter().enumerate() {
        out.push_str(&format!(
            "       {}. {lun} <HITACHI-OPEN-V-SUN-8001 cyl 65533 alt 2 hd 15 sec 512>\n",
            n + 1
        ));
    }
    out.push_str("Specify disk (enter its number): ");
    out
}

pub fn symlink_listing(slice: &str) -> String {
    let wwn = slice[3..35].to_ascii_lowercase();
    format!(
        "lrwxrwxrwx   1 root     root          66 Mar 14  2018 {slice} -> ../../devices/scsi_vhci/ssd@g{wwn}:g,raw\n"
    )
}

pub fn verify_transcript(label: &str) -> String {
    format!(
        "\
format> verify

Primary label contents:

Volume name = <{label:<8}>
ascii name  = <HITACHI-OPEN-V-SUN-8001 cyl 65533 alt 2 hd 15 sec 512>
pcyl        = 65535
ncyl        = 65533
acyl        =    2
nhead       =   15
nsect       =  512
Part      Tag    Flag     Cylinders         Size            Blocks
  0 unassigned    wm       0                0         (0/0/0)              0
  1        usr    wm       0 -    33      127.50MB    (34/0/0)        261120
  2     backup    wu       0 - 65532      239.99GB    (65533/0/0) 503293440
  6        usr    wm      34 - 65532      239.87GB    (65499/0/0) 503032320

format> "
    )
}
