// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! Subcommands and their handlers.
use crate::{
    resolve::{NameFallback, Resolver},
    types::*,
};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Action {
    /// Prints running VMs.
    ListVms,
    /// Prints snapshots of a VM.
    ListSnapshots { vm: String },
    Take { vm: String, snapshot: String },
    Delete { vm: String, snapshot: String },
    /// Powers off a VM, restores a snapshot and starts the VM headless.
    Restore { vm: String, snapshot: String },
}

impl Action {
    /// Builds a `list` action from its positional arguments.
    pub fn list<T: AsRef<str>>(args: &[T]) -> VmResult<Self> {
        match args {
            [] => Ok(Self::ListVms),
            [vm] => Ok(Self::ListSnapshots {
                vm: vm.as_ref().to_string(),
            }),
            _ => vmerr!(ErrorKind::Usage(format!(
                "list takes 0 or 1 arguments, but {} were given",
                args.len()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Runs actions against a controller.
pub struct Dispatcher<'a, C> {
    cmd: &'a C,
    resolver: Resolver<'a, C>,
    format: OutputFormat,
}

impl<'a, C> Dispatcher<'a, C>
where
    C: RunningVmCmd + SnapshotCmd + PowerCmd,
{
    pub fn new(cmd: &'a C) -> Self {
        Self {
            cmd,
            resolver: Resolver::new(cmd),
            format: OutputFormat::default(),
        }
    }

    pub fn fallback(&mut self, fallback: NameFallback) -> &mut Self {
        self.resolver.fallback(fallback);
        self
    }

    pub fn format(&mut self, format: OutputFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Runs `action` and writes its report to `out`.
    pub fn run<W: Write>(&self, action: &Action, out: &mut W) -> VmResult<()> {
        match action {
            Action::ListVms => self.list_vms(out),
            Action::ListSnapshots { vm } => self.list_snapshots(vm, out),
            Action::Take { vm, snapshot } => {
                let vm = self.resolver.resolve(vm)?;
                write!(out, "Take snapshot of {} as '{}'... ", vm, snapshot)?;
                report(out, self.cmd.take_snapshot(&vm, snapshot))
            }
            Action::Delete { vm, snapshot } => {
                let vm = self.resolver.resolve(vm)?;
                write!(
                    out,
                    "Delete snapshot of {} named '{}'... ",
                    vm, snapshot
                )?;
                report(out, self.cmd.delete_snapshot(&vm, snapshot))
            }
            Action::Restore { vm, snapshot } => {
                let vm = self.resolver.resolve(vm)?;
                write!(
                    out,
                    "Restore VM({}) from the snapshot named '{}'... ",
                    vm, snapshot
                )?;
                report(out, self.restore(&vm, snapshot))
            }
        }
    }

    fn list_vms<W: Write>(&self, out: &mut W) -> VmResult<()> {
        let vms = self.cmd.list_running_vms()?;
        if self.format == OutputFormat::Json {
            return write_json(out, &vms);
        }
        for vm in &vms {
            writeln!(out, "{}\t{}", vm.short_name, vm.name)?;
        }
        Ok(())
    }

    fn list_snapshots<W: Write>(&self, vm: &str, out: &mut W) -> VmResult<()> {
        let vm = self.resolver.resolve(vm)?;
        if self.format == OutputFormat::Json {
            return write_json(out, &self.cmd.list_snapshots(&vm)?);
        }
        // Header precedes any output of the listing.
        writeln!(out, "List of the snapshots of {}", vm)?;
        let snapshots = self.cmd.list_snapshots(&vm)?;
        if snapshots.is_empty() {
            writeln!(out, "No snapshot")?;
        }
        for ss in &snapshots {
            writeln!(out, "{}\t{}", ss.name, ss.id)?;
        }
        Ok(())
    }

    /// Stops at the first failing step. The VM is left as that step left it.
    fn restore(&self, vm: &str, snapshot: &str) -> VmResult<()> {
        self.cmd.poweroff(vm)?;
        self.cmd.restore_snapshot(vm, snapshot)?;
        self.cmd.start_headless(vm)
    }
}

fn report<W: Write>(out: &mut W, r: VmResult<()>) -> VmResult<()> {
    match r {
        Ok(()) => writeln!(out, "done!")?,
        Err(e) => {
            writeln!(out, "error!")?;
            return Err(e);
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(out: &mut W, v: &T) -> VmResult<()> {
    serde_json::to_writer_pretty(&mut *out, v)
        .map_err(|e| vmerr!(@r ErrorKind::Io(e.to_string())))?;
    writeln!(out)?;
    Ok(())
}
