//! conscanner CLI - find container images in manifests and scan them.

pub mod commands;
pub mod output;
