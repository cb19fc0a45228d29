// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! Parsers of the human-readable VBoxManage output.
use crate::types::*;
use regex::Regex;

/// Default pattern deriving a short name from a VM name.
///
/// The first capture group is the short name.
pub const DEFAULT_SHORT_NAME_PATTERN: &str = r"^(.+)_default_[0-9_]+";

const NO_SNAPSHOTS: &str = "This machine does not have any snapshots";

/// Extracts records from the output of VBoxManage.
pub trait OutputParser {
    /// Parses `list runningvms`. Lines which do not look like a VM are
    /// skipped.
    fn parse_running_vms(&self, s: &str) -> Vec<RunningVm>;

    /// Parses `snapshot <vm> list`. Lines which do not look like a snapshot
    /// are skipped.
    fn parse_snapshots(&self, s: &str) -> Vec<Snapshot>;

    /// Returns `true` if `s` says the VM has no snapshots.
    fn is_no_snapshots(&self, s: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct RegexParser {
    vm_line: Regex,
    short_name: Regex,
    snapshot_line: Regex,
}

impl Default for RegexParser {
    fn default() -> Self {
        Self::build(compile(DEFAULT_SHORT_NAME_PATTERN))
    }
}

impl RegexParser {
    pub fn new() -> Self { Self::default() }

    /// Creates a parser whose short names are the first capture group of
    /// `pattern`.
    pub fn with_short_name_pattern(pattern: &str) -> VmResult<Self> {
        let short_name = Regex::new(pattern).map_err(|e| {
            vmerr!(@r ErrorKind::InvalidConfig(format!(
                "short_name_pattern: {}",
                e
            )))
        })?;
        if short_name.captures_len() < 2 {
            return vmerr!(ErrorKind::InvalidConfig(format!(
                "short_name_pattern has no capture group: {}",
                pattern
            )));
        }
        Ok(Self::build(short_name))
    }

    fn build(short_name: Regex) -> Self {
        Self {
            vm_line: compile(r#""([^"]+)"\s+\{([^}]+)\}"#),
            short_name,
            snapshot_line: compile(r"Name:\s*(.+)\s\(UUID:\s*([^)]+)"),
        }
    }

    /// Returns the short name of `name`, or `name` itself if the pattern
    /// does not match.
    pub fn short_name<'a>(&self, name: &'a str) -> &'a str {
        self.short_name
            .captures(name)
            .and_then(|c| c.get(1))
            .map_or(name, |m| m.as_str())
    }
}

fn compile(re: &str) -> Regex {
    // Built-in patterns are known to be valid.
    Regex::new(re).unwrap_or_else(|e| panic!("Invalid pattern {}: {}", re, e))
}

impl OutputParser for RegexParser {
    fn parse_running_vms(&self, s: &str) -> Vec<RunningVm> {
        // "vm name" {uuid}
        s.lines()
            .filter_map(|x| self.vm_line.captures(x))
            .map(|c| {
                let name = c[1].to_string();
                RunningVm {
                    short_name: self.short_name(&name).to_string(),
                    id: c[2].to_string(),
                    name,
                }
            })
            .collect()
    }

    fn parse_snapshots(&self, s: &str) -> Vec<Snapshot> {
        //    Name: snap (UUID: uuid) *
        s.lines()
            .filter_map(|x| self.snapshot_line.captures(x))
            .map(|c| Snapshot {
                name: c[1].to_string(),
                id: c[2].to_string(),
            })
            .collect()
    }

    #[inline]
    fn is_no_snapshots(&self, s: &str) -> bool { s.contains(NO_SNAPSHOTS) }
}
