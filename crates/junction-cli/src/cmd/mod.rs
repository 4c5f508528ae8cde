//! Subcommand implementations.

pub mod build;
pub mod check;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::Context;
use junction_core::NetworkDescription;
use tracing::debug;

/// Read a network description from `path`, or from stdin when `path` is `-`.
pub fn read_description(path: &Path) -> anyhow::Result<NetworkDescription> {
    let desc = if path == Path::new("-") {
        NetworkDescription::from_reader(io::stdin().lock())?
    } else {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        NetworkDescription::from_reader(BufReader::new(file))?
    };
    debug!(
        path = %path.display(),
        nodes = desc.nodes.len(),
        edges = desc.edges.len(),
        "read network description"
    );
    Ok(desc)
}
