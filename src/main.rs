mod cmd;
mod config;
mod error;
mod logging;
mod lun;
mod ui;
mod workflow;

#[cfg(test)]
mod testing;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;

use cmd::SystemRunner;
use config::Config;
use error::{LunError, Result};
use lun::{Label, LunId};
use workflow::{Plan, RunOptions};

const VERIFY_HELP: &str = "Runs a verification of lun arguments, then exits. \
e.g. lun_format ver --verify c0t60060E8007DF23000030DF23000000CFd0 c0t60060E8007DF23000030DF23000000CGd0";
const SHARED_CHOWN_HELP: &str = "Chowns shared disks on a secondary db host given a list of luns. \
e.g. lun_format shared --shared_chown c0t60060E8007DF23000030DF23000000CFd0 c0t60060E8007DF23000030DF23000000CGd0";

/// [Solaris] Given a label, add any new luns, and potentially chown for oracle use.
#[derive(Parser, Debug)]
#[command(name = "lun_format", version)]
struct Cli {
    /// Assigns label to any new luns. 8 char max.
    #[arg(required_unless_present_any = ["verify", "shared_chown"])]
    label: Option<String>,

    /// Sets new lun permissions to the --ownership user:group
    #[arg(short, long)]
    chown: bool,

    #[arg(long = "shared_chown", num_args = 1.., value_name = "LUN", help = SHARED_CHOWN_HELP)]
    shared_chown: Option<Vec<String>>,

    #[arg(long, num_args = 1.., value_name = "LUN", conflicts_with = "shared_chown", help = VERIFY_HELP)]
    verify: Option<Vec<String>>,

    /// Minimize output of chown
    #[arg(short, long)]
    quiet: bool,

    /// user:group for chown [default: oracle:dba]
    #[arg(long, value_name = "USER:GROUP")]
    ownership: Option<String>,

    /// Directory for lun_format.log; must be writeable by your user [default: /var/tmp/]
    #[arg(long = "logfile_path", value_name = "DIR")]
    logfile_path: Option<PathBuf>,

    /// Debug logging; the only way to see raw format output
    #[arg(long)]
    debug: bool,

    /// TOML or YAML config file [default: /etc/lun_format.toml if present]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Give up on any single tool after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(LunError::Config(e)),
    };

    let logfile_path = cli
        .logfile_path
        .clone()
        .unwrap_or_else(|| config.run.logfile_path.clone());
    let _log_guard = logging::init(&logfile_path, cli.debug);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn fail(err: LunError) -> ExitCode {
    let code = err.exit_code();
    ui::error(&err.to_string());
    error!("{:#}", anyhow::Error::new(err));
    ExitCode::from(code)
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let plan = plan(cli)?;

    workflow::check_platform(std::env::consts::OS)?;
    workflow::enter_device_root(Path::new(&config.run.device_root))?;

    let runner = SystemRunner::from_config(config, timeout(cli, config))?;
    let opts = run_options(cli, config);
    workflow::execute(&plan, &runner, &opts, &mut io::stdout().lock())?;
    Ok(())
}

/// Turn the command line into a validated plan. Bad labels and malformed
/// ids are rejected here, before any tool runs.
fn plan(cli: &Cli) -> Result<Plan> {
    if let Some(ids) = &cli.verify {
        return Ok(Plan::VerifyOnly {
            ids: LunId::parse_list(ids)?,
        });
    }
    if let Some(ids) = &cli.shared_chown {
        let ids = LunId::parse_list(ids)?;
        let label = cli.label.as_deref().map(Label::parse).transpose()?;
        return Ok(Plan::SharedChown { ids, label });
    }

    let raw = cli.label.as_deref().unwrap_or_default();
    Ok(Plan::Standard {
        label: Label::parse(raw)?,
        chown: cli.chown,
        quiet: cli.quiet,
    })
}

fn run_options(cli: &Cli, config: &Config) -> RunOptions {
    RunOptions {
        device_root: config.run.device_root.clone(),
        ownership: cli
            .ownership
            .clone()
            .unwrap_or_else(|| config.run.ownership.clone()),
    }
}

/// Zero means no bound, same as leaving it unset.
fn timeout(cli: &Cli, config: &Config) -> Option<Duration> {
    cli.timeout
        .or(config.run.timeout_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
