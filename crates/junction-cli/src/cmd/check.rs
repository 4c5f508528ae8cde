//! `jt check`: validate a network description without building its tree.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use junction_core::graph::find_all_cycles;
use junction_core::pipeline::load_directed;
use junction_core::{PipelineConfig, VarId};
use serde::Serialize;

use crate::output::{OutputMode, fmt_set, pretty_kv, pretty_section, render_mode};

/// Arguments for `jt check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Network description (JSON). Use `-` for stdin.
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    variables: usize,
    edges: usize,
    content_hash: String,
    /// Cycles found when the acyclicity check is disabled.
    cycles: Vec<Vec<VarId>>,
}

/// Execute `jt check`.
pub fn run_check(args: &CheckArgs, config: &PipelineConfig, output: OutputMode) -> anyhow::Result<()> {
    let desc = super::read_description(&args.file)?;
    let directed = load_directed(&desc, config)?;

    let payload = CheckOutput {
        variables: directed.node_count(),
        edges: directed.edge_count(),
        cycles: find_all_cycles(&directed.graph),
        content_hash: directed.content_hash,
    };

    render_mode(output, &payload, render_check_text, render_check_pretty)
}

fn render_check_text(payload: &CheckOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "ok variables={} edges={} hash={}",
        payload.variables, payload.edges, payload.content_hash
    )?;
    for cycle in &payload.cycles {
        writeln!(w, "cycle {}", fmt_set(cycle))?;
    }
    Ok(())
}

fn render_check_pretty(payload: &CheckOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Network OK")?;
    pretty_kv(w, "Variables", payload.variables.to_string())?;
    pretty_kv(w, "Edges", payload.edges.to_string())?;
    pretty_kv(w, "Hash", &payload.content_hash)?;
    if !payload.cycles.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Cycles ({})", payload.cycles.len()))?;
        for cycle in &payload.cycles {
            writeln!(w, "  {}", fmt_set(cycle))?;
        }
    }
    Ok(())
}
