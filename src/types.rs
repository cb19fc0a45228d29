// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! Common types: errors, records and controller traits.
use serde::{Deserialize, Serialize};

#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct VmError {
    kind: ErrorKind,
}

#[macro_export]
macro_rules! vmerr {
    (@r $x:expr) => {
        $crate::types::VmError::from($x)
    };
    ($x:expr) => {
        Err($crate::types::VmError::from($x))
    };
}

macro_rules! starts_err {
    ($s:expr, $x:expr, $y:expr) => {
        if $s.starts_with($x) {
            return Some(VmError::from($y));
        }
    };
}

macro_rules! impl_setter {
    ($(#[$m:meta])* $name:ident : $t:ty) => {
        $(#[$m])*
        pub fn $name<T: Into<$t>>(&mut self, $name: T) -> &mut Self {
            self.$name = $name.into();
            self
        }
    };
    ($(#[$m:meta])* @opt $name:ident : $t:ty) => {
        $(#[$m])*
        pub fn $name<T: Into<Option<$t>>>(&mut self, $name: T) -> &mut Self {
            self.$name = $name.into();
            self
        }
    };
}

impl VmError {
    pub fn kind(&self) -> &ErrorKind { &self.kind }

    /// Returns the candidates if the error is an ambiguous VM name.
    pub fn candidates(&self) -> Option<&[String]> {
        match self.kind() {
            ErrorKind::AmbiguousVmName { candidates, .. } => {
                Some(candidates.as_slice())
            }
            _ => None,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self.kind(), ErrorKind::Usage(_))
    }
}

impl std::error::Error for VmError {}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub enum ErrorKind {
    /// The executable could not be spawned.
    ExecutionFailed(String),
    /// The executable exited with a non-zero status.
    CommandFailed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    VmNotFound,
    SnapshotNotFound,
    InvalidPowerState(VmPowerState),
    /// Several VMs share the given name.
    AmbiguousVmName {
        name: String,
        candidates: Vec<String>,
    },
    Usage(String),
    InvalidConfig(String),
    Io(String),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorKind::*;
        match self {
            ExecutionFailed(x) => write!(f, "Failed to execute: {}", x),
            CommandFailed { code, stderr, .. } => {
                match code {
                    Some(c) => write!(f, "Command failed; exit status={}", c)?,
                    None => write!(f, "Command failed")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, "; {}", stderr)?;
                }
                Ok(())
            }
            VmNotFound => "VM not found".fmt(f),
            SnapshotNotFound => "Snapshot not found".fmt(f),
            InvalidPowerState(VmPowerState::Running) => {
                "The VM is running".fmt(f)
            }
            InvalidPowerState(VmPowerState::NotRunning) => {
                "The VM is not running".fmt(f)
            }
            AmbiguousVmName { name, candidates } => {
                write!(
                    f,
                    "Found several VMs for `{}`. You must specify not short \
                     vmname but long vmname.",
                    name
                )?;
                for x in candidates {
                    write!(f, "\n  {}", x)?;
                }
                Ok(())
            }
            Usage(x) => write!(f, "Invalid arguments: {}", x),
            InvalidConfig(x) => write!(f, "Invalid configuration: {}", x),
            Io(x) => write!(f, "I/O error; {}", x),
        }
    }
}

impl From<ErrorKind> for VmError {
    fn from(kind: ErrorKind) -> Self { Self { kind } }
}

impl From<std::io::Error> for VmError {
    fn from(e: std::io::Error) -> Self {
        Self::from(ErrorKind::Io(e.to_string()))
    }
}

pub type VmResult<T> = Result<T, VmError>;

#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum VmPowerState {
    Running,
    NotRunning,
}

/// A running VM as reported by `list runningvms`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RunningVm {
    /// The canonical name. Every mutating command uses this one.
    pub name: String,
    /// `name` without the `_default_<digits>` suffix. Not unique.
    pub short_name: String,
    pub id: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub id: String,
}

pub trait RunningVmCmd {
    /// Returns running VMs in the order the hypervisor reports them.
    fn list_running_vms(&self) -> VmResult<Vec<RunningVm>>;
}

pub trait SnapshotCmd {
    /// Returns snapshots of a VM. A VM without snapshots yields an empty list.
    fn list_snapshots(&self, vm: &str) -> VmResult<Vec<Snapshot>>;
    /// Takes a snapshot of a VM, pausing it during the capture.
    fn take_snapshot(&self, vm: &str, name: &str) -> VmResult<()>;
    /// Reverts the current VM state to a snapshot of the VM.
    fn restore_snapshot(&self, vm: &str, name: &str) -> VmResult<()>;
    /// Deletes a snapshot of a VM.
    fn delete_snapshot(&self, vm: &str, name: &str) -> VmResult<()>;
}

pub trait PowerCmd {
    /// Powers off a VM hardly.
    fn poweroff(&self, vm: &str) -> VmResult<()>;
    /// Starts a VM without a window.
    fn start_headless(&self, vm: &str) -> VmResult<()>;
}
