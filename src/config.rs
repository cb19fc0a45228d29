// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! Configuration file.
//!
//! # config.toml example
//!
//! ```toml
//! executable_path = "C:\\Program Files\\Oracle\\VirtualBox\\VBoxManage.exe"
//! encoding = "shift_jis"
//! strict = false
//! short_name_pattern = "^(.+)_default_[0-9_]+"
//! ```
use crate::{
    resolve::NameFallback,
    types::*,
    virtualbox::{parser::DEFAULT_SHORT_NAME_PATTERN, RegexParser, VBoxManage},
    SystemExec,
};
use encoding_rs::Encoding;
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "VBOXSS_CONFIG";

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub executable_path: String,
    /// A WHATWG encoding label of the VBoxManage output.
    pub encoding: String,
    /// Fails instead of passing unknown VM names through.
    pub strict: bool,
    pub short_name_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable_path: "vboxmanage".to_string(),
            encoding: "utf-8".to_string(),
            strict: false,
            short_name_pattern: DEFAULT_SHORT_NAME_PATTERN.to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> VmResult<Self> {
        toml::from_str(s)
            .map_err(|e| vmerr!(@r ErrorKind::InvalidConfig(e.to_string())))
    }

    pub fn read<P: AsRef<Path>>(path: P) -> VmResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            vmerr!(@r ErrorKind::InvalidConfig(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        debug!("Loaded config: {}", path.display());
        Self::from_toml(&s)
    }

    /// Reads `path`, or the file named by `VBOXSS_CONFIG`, or falls back to
    /// the defaults.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> VmResult<Self> {
        match path {
            Some(p) => Self::read(p),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(p) if !p.is_empty() => Self::read(p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn encoding(&self) -> VmResult<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            vmerr!(@r ErrorKind::InvalidConfig(format!(
                "Unknown encoding: {}",
                self.encoding
            )))
        })
    }

    pub fn fallback(&self) -> NameFallback {
        if self.strict {
            NameFallback::Strict
        } else {
            NameFallback::Lenient
        }
    }

    /// Builds a VBoxManage controller from this configuration.
    pub fn vboxmanage(&self) -> VmResult<VBoxManage> {
        let mut exec = SystemExec::new();
        exec.encoding(self.encoding()?);
        let parser =
            RegexParser::with_short_name_pattern(&self.short_name_pattern)?;
        let mut cmd = VBoxManage::new().with_exec(exec).with_parser(parser);
        cmd.executable_path(self.executable_path.as_str());
        Ok(cmd)
    }
}
