// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
#![allow(dead_code)]
use std::{cell::RefCell, collections::VecDeque, process::Command};
use vboxss::{types::VmResult, virtualbox::VBoxManage, CmdOutput, Exec};

pub const LIST_RUNNINGVMS: &str = r#""alpha_default_1601234567890_12345" {2b5bd5a6-2f9d-4b4b-9f0e-1c1a0d0a8a11}
"beta_default_1601234567891_23456" {7c1f4f12-0d6e-4d73-8d3c-3c1e9b7ef222}
"gamma" {b0c6a2e4-1a2b-4c3d-8e9f-0a1b2c3d4e33}
"#;

pub const SNAPSHOT_LIST: &str = "   Name: base (UUID: 0f4f3a2e-8d7c-4b6a-9e5d-4c3b2a190001)
      Name: with-docker (UUID: 0f4f3a2e-8d7c-4b6a-9e5d-4c3b2a190002)
         Name: before upgrade (UUID: 0f4f3a2e-8d7c-4b6a-9e5d-4c3b2a190003) *
";

pub const NO_SNAPSHOTS: &str = "This machine does not have any snapshots\n";

/// Replays scripted outputs and records every command line.
///
/// Runs out of script as a successful command with empty output.
#[derive(Default)]
pub struct MockExec {
    outputs: RefCell<VecDeque<VmResult<CmdOutput>>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl MockExec {
    pub fn new() -> Self { Self::default() }

    pub fn push(&self, r: VmResult<CmdOutput>) -> &Self {
        self.outputs.borrow_mut().push_back(r);
        self
    }

    pub fn ok(&self, stdout: &str) -> &Self {
        self.push(Ok(CmdOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }))
    }

    pub fn fail(&self, code: i32, stdout: &str, stderr: &str) -> &Self {
        self.push(Ok(CmdOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }))
    }

    /// Returns recorded command lines, the program first.
    pub fn calls(&self) -> Vec<Vec<String>> { self.calls.borrow().clone() }
}

impl Exec for MockExec {
    fn exec(&self, cmd: &mut Command) -> VmResult<CmdOutput> {
        self.calls.borrow_mut().push(
            std::iter::once(cmd.get_program())
                .chain(cmd.get_args())
                .map(|x| x.to_string_lossy().into_owned())
                .collect(),
        );
        self.outputs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(CmdOutput {
                    code: Some(0),
                    ..Default::default()
                })
            })
    }
}

pub fn vboxmanage() -> VBoxManage<MockExec> {
    VBoxManage::new().with_exec(MockExec::new())
}

pub fn args(v: &[&str]) -> Vec<String> { v.iter().map(|x| x.to_string()).collect() }
