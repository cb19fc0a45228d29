// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! VBoxManage controller.
use crate::{
    types::*,
    virtualbox::parser::{OutputParser, RegexParser},
    CmdOutput, Exec, SystemExec,
};
use std::process::Command;

#[derive(Clone, Debug)]
pub struct VBoxManage<E = SystemExec, P = RegexParser> {
    executable_path: String,
    exec: E,
    parser: P,
}

impl Default for VBoxManage {
    fn default() -> Self { Self::new() }
}

impl VBoxManage {
    pub fn new() -> Self {
        Self {
            executable_path: "vboxmanage".to_string(),
            exec: SystemExec::new(),
            parser: RegexParser::new(),
        }
    }
}

impl<E: Exec, P: OutputParser> VBoxManage<E, P> {
    impl_setter!(
        /// Sets the path to VBoxManage.
        executable_path: String
    );

    /// Replaces the command runner.
    pub fn with_exec<E2: Exec>(self, exec: E2) -> VBoxManage<E2, P> {
        VBoxManage {
            executable_path: self.executable_path,
            exec,
            parser: self.parser,
        }
    }

    /// Replaces the output parser.
    pub fn with_parser<P2: OutputParser>(self, parser: P2) -> VBoxManage<E, P2> {
        VBoxManage {
            executable_path: self.executable_path,
            exec: self.exec,
            parser,
        }
    }

    pub fn get_executable_path(&self) -> &str { &self.executable_path }

    pub fn get_exec(&self) -> &E { &self.exec }

    #[inline]
    fn handle_error(s: &str) -> Option<VmError> {
        starts_err!(
            s,
            "Could not find a registered machine named",
            ErrorKind::VmNotFound
        );
        starts_err!(
            s,
            "Could not find a snapshot named ",
            ErrorKind::SnapshotNotFound
        );
        if s.starts_with("Invalid machine state: PoweredOff")
            || s.starts_with("Machine in invalid state 1 -- powered off")
            || s.ends_with(" is not currently running")
            || s.contains("is not running")
        {
            return Some(VmError::from(ErrorKind::InvalidPowerState(
                VmPowerState::NotRunning,
            )));
        }
        if s.lines().next().map_or(false, |x| {
            x.ends_with(
                "is already locked by a session (or being locked or unlocked)",
            )
        }) {
            return Some(VmError::from(ErrorKind::InvalidPowerState(
                VmPowerState::Running,
            )));
        }
        None
    }

    /// Turns a failed command into an error, classified by its
    /// `VBoxManage: error:` lines if possible.
    fn check(o: CmdOutput) -> VmResult<CmdOutput> {
        if o.success() {
            return Ok(o);
        }
        if !o.stderr.trim().is_empty() {
            warn!("{}", o.stderr.trim_end());
        }
        let known = o.stderr.lines().find_map(|line| {
            let lower = line.to_ascii_lowercase();
            ["vboxmanage: error: ", "vboxmanage.exe: error: "]
                .iter()
                .find(|p| lower.starts_with(*p))
                .and_then(|p| Self::handle_error(line[p.len()..].trim()))
        });
        match known {
            Some(e) => Err(e),
            None => vmerr!(ErrorKind::CommandFailed {
                code: o.code,
                stdout: o.stdout,
                stderr: o.stderr,
            }),
        }
    }

    #[inline]
    fn exec_raw(&self, cmd: &mut Command) -> VmResult<CmdOutput> {
        self.exec.exec(cmd)
    }

    fn exec(&self, cmd: &mut Command) -> VmResult<String> {
        Ok(Self::check(self.exec_raw(cmd)?)?.stdout)
    }

    #[inline]
    fn exec2(&self, cmd: &mut Command) -> VmResult<()> {
        self.exec(cmd)?;
        Ok(())
    }

    #[inline]
    fn cmd(&self) -> Command { Command::new(&self.executable_path) }

    pub fn list_running_vms(&self) -> VmResult<Vec<RunningVm>> {
        let s = self.exec(self.cmd().args(["list", "runningvms"]))?;
        Ok(self.parser.parse_running_vms(&s))
    }

    pub fn list_snapshots(&self, vm: &str) -> VmResult<Vec<Snapshot>> {
        let o = self.exec_raw(self.cmd().args(["snapshot", vm, "list"]))?;
        if !o.success() && self.parser.is_no_snapshots(&o.stdout) {
            debug!("{} has no snapshots", vm);
            return Ok(vec![]);
        }
        let o = Self::check(o)?;
        Ok(self.parser.parse_snapshots(&o.stdout))
    }

    pub fn take_snapshot(
        &self,
        vm: &str,
        name: &str,
        pause: bool,
    ) -> VmResult<()> {
        let mut cmd = self.cmd();
        cmd.args(["snapshot", vm, "take", name]);
        if pause {
            cmd.arg("--pause");
        }
        self.exec2(&mut cmd)
    }

    pub fn delete_snapshot(&self, vm: &str, name: &str) -> VmResult<()> {
        self.exec2(self.cmd().args(["snapshot", vm, "delete", name]))
    }

    pub fn restore_snapshot(&self, vm: &str, name: &str) -> VmResult<()> {
        self.exec2(self.cmd().args(["snapshot", vm, "restore", name]))
    }

    pub fn poweroff_vm(&self, vm: &str) -> VmResult<()> {
        self.exec2(self.cmd().args(["controlvm", vm, "poweroff"]))
    }

    pub fn start_vm(&self, vm: &str, headless: bool) -> VmResult<()> {
        let mut cmd = self.cmd();
        cmd.arg("startvm");
        if headless {
            cmd.args(["--type", "headless"]);
        }
        cmd.arg(vm);
        self.exec2(&mut cmd)
    }
}

impl<E: Exec, P: OutputParser> RunningVmCmd for VBoxManage<E, P> {
    fn list_running_vms(&self) -> VmResult<Vec<RunningVm>> {
        Self::list_running_vms(self)
    }
}

impl<E: Exec, P: OutputParser> SnapshotCmd for VBoxManage<E, P> {
    fn list_snapshots(&self, vm: &str) -> VmResult<Vec<Snapshot>> {
        Self::list_snapshots(self, vm)
    }

    fn take_snapshot(&self, vm: &str, name: &str) -> VmResult<()> {
        Self::take_snapshot(self, vm, name, true)
    }

    fn restore_snapshot(&self, vm: &str, name: &str) -> VmResult<()> {
        Self::restore_snapshot(self, vm, name)
    }

    fn delete_snapshot(&self, vm: &str, name: &str) -> VmResult<()> {
        Self::delete_snapshot(self, vm, name)
    }
}

impl<E: Exec, P: OutputParser> PowerCmd for VBoxManage<E, P> {
    fn poweroff(&self, vm: &str) -> VmResult<()> { self.poweroff_vm(vm) }

    fn start_headless(&self, vm: &str) -> VmResult<()> {
        self.start_vm(vm, true)
    }
}
