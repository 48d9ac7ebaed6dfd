//! Command implementations for the assetboot CLI

pub mod completions;
pub mod helpers;
pub mod install;
pub mod status;
pub mod version;
