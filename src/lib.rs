// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! # vboxss
//! A snapshot helper for running VirtualBox VMs.
//!
//! vboxss drives [VBoxManage](https://www.virtualbox.org/manual/ch08.html)
//! and parses its textual output. VMs may be addressed by their short name,
//! i.e., the name without the `_default_<digits>` suffix Vagrant appends.
//!
//! # License
//!
//! This software is released under the MIT or Apache-2.0 License, see LICENSE-MIT or LICENSE-APACHE.
#[macro_use]
pub mod types;

pub mod action;
pub mod config;
pub mod resolve;
pub mod virtualbox;

#[macro_use]
extern crate log;

use crate::types::{ErrorKind, VmResult};
use encoding_rs::{Encoding, UTF_8};
use log::Level;
use std::{borrow::Cow, process::Command};

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CmdOutput {
    /// `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    #[inline]
    pub fn success(&self) -> bool { self.code == Some(0) }
}

/// Runs external commands.
pub trait Exec {
    /// Executes `cmd` until it exits and captures its output.
    fn exec(&self, cmd: &mut Command) -> VmResult<CmdOutput>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Copy)]
pub struct SystemExec {
    encoding: &'static Encoding,
}

impl Default for SystemExec {
    fn default() -> Self { Self::new() }
}

impl SystemExec {
    pub fn new() -> Self { Self { encoding: UTF_8 } }

    /// Sets the encoding of the output, e.g., the ANSI code page on Windows.
    pub fn encoding(&mut self, encoding: &'static Encoding) -> &mut Self {
        self.encoding = encoding;
        self
    }
}

impl Exec for SystemExec {
    fn exec(&self, cmd: &mut Command) -> VmResult<CmdOutput> {
        exec_cmd(self.encoding, cmd)
    }
}

pub(crate) fn decode(encoding: &'static Encoding, b: &[u8]) -> String {
    let (text, _, had_errors) = encoding.decode(b);
    if had_errors {
        debug!("Malformed {} sequence in output", encoding.name());
    }
    match text {
        Cow::Owned(s) => s,
        Cow::Borrowed(s) => s.to_string(),
    }
}

/// Executes `cmd` and returns its exit code, stdout and stderr.
pub(crate) fn exec_cmd(
    encoding: &'static Encoding,
    cmd: &mut Command,
) -> VmResult<CmdOutput> {
    dbg_cmd(cmd);
    match cmd.output() {
        Ok(o) => Ok(CmdOutput {
            code: o.status.code(),
            stdout: decode(encoding, &o.stdout),
            stderr: decode(encoding, &o.stderr),
        }),
        Err(x) => vmerr!(ErrorKind::ExecutionFailed(format!(
            "{}: {}",
            cmd_line(cmd),
            x
        ))),
    }
}

/// Renders `cmd` as a single line for logs and messages.
pub fn cmd_line(cmd: &Command) -> String {
    let mut s = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        s.push(' ');
        s.push_str(&arg.to_string_lossy());
    }
    s
}

pub(crate) fn dbg_cmd(cmd: &Command) {
    if log_enabled!(Level::Debug) {
        debug!("exec: {}", cmd_line(cmd));
    }
}
