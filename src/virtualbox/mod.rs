// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
//! VirtualBox controllers.
pub mod parser;
pub mod vboxmanage;

pub use parser::{OutputParser, RegexParser};
pub use vboxmanage::*;
