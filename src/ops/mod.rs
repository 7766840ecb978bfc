//! High-level operations.
//!
//! This module contains the implementation of lecfg commands.

pub mod lecfg_configure;
pub mod lecfg_resolve;

pub use lecfg_configure::configure;
pub use lecfg_resolve::{parse_override, resolve, BuildRequest, Platform, Resolution, ResolveError};
