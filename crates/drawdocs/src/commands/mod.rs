//! CLI command implementations.

pub(crate) mod assets;
pub(crate) mod process;

pub(crate) use assets::AssetsArgs;
pub(crate) use process::ProcessArgs;
