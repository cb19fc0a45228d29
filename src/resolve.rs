// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! Resolves user-supplied VM names to canonical VM names.
use crate::types::*;

/// What to do when no running VM matches.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum NameFallback {
    /// Pass the name through unchanged and let VBoxManage report it.
    #[default]
    Lenient,
    /// Fail with [`ErrorKind::VmNotFound`].
    Strict,
}

/// Resolves `name` against `vms`.
///
/// `name` matches a VM if it equals either its short name or its full name.
/// Exactly one match resolves to the full name of the VM. Several matches
/// are an [`ErrorKind::AmbiguousVmName`] carrying every candidate.
pub fn resolve_vm_name(
    vms: &[RunningVm],
    name: &str,
    fallback: NameFallback,
) -> VmResult<String> {
    let candidates: Vec<&RunningVm> = vms
        .iter()
        .filter(|vm| vm.short_name == name || vm.name == name)
        .collect();
    match candidates.as_slice() {
        [vm] => Ok(vm.name.clone()),
        [] => match fallback {
            NameFallback::Lenient => Ok(name.to_string()),
            NameFallback::Strict => vmerr!(ErrorKind::VmNotFound),
        },
        _ => vmerr!(ErrorKind::AmbiguousVmName {
            name: name.to_string(),
            candidates: candidates.iter().map(|vm| vm.name.clone()).collect(),
        }),
    }
}

/// Resolves names against the live list of running VMs.
#[derive(Debug, Clone)]
pub struct Resolver<'a, C> {
    cmd: &'a C,
    fallback: NameFallback,
}

impl<'a, C: RunningVmCmd> Resolver<'a, C> {
    pub fn new(cmd: &'a C) -> Self {
        Self {
            cmd,
            fallback: NameFallback::default(),
        }
    }

    pub fn fallback(&mut self, fallback: NameFallback) -> &mut Self {
        self.fallback = fallback;
        self
    }

    /// Fetches running VMs and resolves `name` against them.
    ///
    /// In lenient mode a failure to list VMs is not fatal and `name` is
    /// returned as is.
    pub fn resolve(&self, name: &str) -> VmResult<String> {
        let vms = match self.cmd.list_running_vms() {
            Ok(vms) => vms,
            Err(e) if self.fallback == NameFallback::Lenient => {
                warn!("Failed to list running VMs: {}", e);
                return Ok(name.to_string());
            }
            Err(e) => return Err(e),
        };
        let ret = resolve_vm_name(&vms, name, self.fallback)?;
        if ret != name {
            info!("Resolved `{}` to `{}`", name, ret);
        }
        Ok(ret)
    }
}
