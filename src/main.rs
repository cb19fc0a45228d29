// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! vboxss - take, restore and delete snapshots of running VirtualBox VMs.
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::{io::Write, path::PathBuf, process::ExitCode};
use vboxss::{
    action::{Action, Dispatcher, OutputFormat},
    config::Config,
    types::{VmError, VmResult},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Snapshot helper for running VirtualBox VMs")]
struct Cli {
    /// Path to VBoxManage
    #[arg(short = 'e', long = "exec", env = "VBOXSS_VBOXMANAGE", global = true)]
    executable_path: Option<String>,

    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fail on VM names which match no running VM
    #[arg(long, global = true)]
    strict: bool,

    /// Print debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print running VMs, or the snapshots of <VMNAME>
    List {
        /// Print JSON instead of tab-separated text
        #[arg(long)]
        json: bool,
        #[arg(value_name = "VMNAME")]
        args: Vec<String>,
    },
    /// Take the snapshot of the specified VM
    Take { vm: String, snapshot: String },
    /// Delete the snapshot of the specified VM
    Delete { vm: String, snapshot: String },
    /// Restore VM from the specified snapshot
    Restore { vm: String, snapshot: String },
}

impl Commands {
    fn action(&self) -> VmResult<Action> {
        Ok(match self {
            Self::List { args, .. } => Action::list(args)?,
            Self::Take { vm, snapshot } => Action::Take {
                vm: vm.clone(),
                snapshot: snapshot.clone(),
            },
            Self::Delete { vm, snapshot } => Action::Delete {
                vm: vm.clone(),
                snapshot: snapshot.clone(),
            },
            Self::Restore { vm, snapshot } => Action::Restore {
                vm: vm.clone(),
                snapshot: snapshot.clone(),
            },
        })
    }

    fn format(&self) -> OutputFormat {
        match self {
            Self::List { json: true, .. } => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

fn run(cli: &Cli) -> VmResult<()> {
    let mut config = Config::load(cli.config.as_ref())?;
    if let Some(x) = &cli.executable_path {
        config.executable_path = x.clone();
    }
    if cli.strict {
        config.strict = true;
    }
    let action = cli.command.action()?;
    let cmd = config.vboxmanage()?;

    let mut dispatcher = Dispatcher::new(&cmd);
    dispatcher
        .fallback(config.fallback())
        .format(cli.command.format());

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    let ret = dispatcher.run(&action, &mut stdout);
    stdout.flush()?;
    ret
}

/// Renders a fatal error for stderr. Independent of the log level.
fn error_message(e: &VmError) -> String {
    if e.is_usage() {
        format!("{}\nRun `vboxss --help` for usage.", e)
    } else {
        e.to_string()
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(x) => x,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    let mut logger = env_logger::Builder::new();
    logger.filter_level(LevelFilter::Warn).parse_default_env();
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_message(&e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vboxss::{resolve::NameFallback, types::ErrorKind};

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("vboxss").chain(args.iter().copied()))
    }

    #[test]
    fn list_args() {
        let cli = parse(&["list"]).unwrap();
        assert_eq!(Ok(Action::ListVms), cli.command.action());
        let cli = parse(&["list", "alpha"]).unwrap();
        assert_eq!(
            Ok(Action::ListSnapshots {
                vm: "alpha".to_string()
            }),
            cli.command.action()
        );
        let cli = parse(&["list", "alpha", "beta"]).unwrap();
        assert!(cli.command.action().unwrap_err().is_usage());
    }

    #[test]
    fn list_json() {
        let cli = parse(&["list", "--json"]).unwrap();
        assert_eq!(OutputFormat::Json, cli.command.format());
        let cli = parse(&["list"]).unwrap();
        assert_eq!(OutputFormat::Text, cli.command.format());
    }

    #[test]
    fn snapshot_args() {
        let cli = parse(&["restore", "alpha", "snap1"]).unwrap();
        assert_eq!(
            Ok(Action::Restore {
                vm: "alpha".to_string(),
                snapshot: "snap1".to_string()
            }),
            cli.command.action()
        );
        assert!(parse(&["take", "alpha"]).is_err());
        assert!(parse(&["delete", "alpha", "snap1", "extra"]).is_err());
    }

    #[test]
    fn unknown_command() {
        let e = parse(&["frobnicate"]).unwrap_err();
        assert!(e.use_stderr());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn global_flags() {
        let cli =
            parse(&["take", "--strict", "-e", "/opt/vbox", "alpha", "s"])
                .unwrap();
        assert!(cli.strict);
        assert_eq!(Some("/opt/vbox".to_string()), cli.executable_path);
    }

    #[test]
    fn ambiguous_name_message() {
        let e = VmError::from(ErrorKind::AmbiguousVmName {
            name: "alpha".to_string(),
            candidates: vec![
                "alpha_default_1_1".to_string(),
                "alpha_default_2_2".to_string(),
            ],
        });
        assert_eq!(
            "Found several VMs for `alpha`. You must specify not short vmname \
             but long vmname.\n  alpha_default_1_1\n  alpha_default_2_2",
            error_message(&e)
        );
    }

    #[test]
    fn usage_message() {
        let e = Action::list(&["a", "b"]).unwrap_err();
        let msg = error_message(&e);
        assert!(msg.starts_with("Invalid arguments: "));
        assert!(msg.ends_with("\nRun `vboxss --help` for usage."));
        let e = VmError::from(ErrorKind::VmNotFound);
        assert_eq!("VM not found", error_message(&e));
    }

    #[test]
    fn fallback_from_config() {
        let config = Config {
            strict: true,
            ..Config::default()
        };
        assert_eq!(NameFallback::Strict, config.fallback());
    }
}
