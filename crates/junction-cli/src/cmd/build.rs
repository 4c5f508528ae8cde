//! `jt build`: run the pipeline and print cliques and separators.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use junction_core::{JunctionReport, PipelineConfig, StageReport, VarId, build_junction_tree};
use serde::Serialize;

use crate::output::{OutputMode, fmt_set, pretty_kv, pretty_section, render_mode};

/// Arguments for `jt build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Network description (JSON). Use `-` for stdin.
    pub file: PathBuf,

    /// Also print the intermediate edge sets of every stage.
    #[arg(long)]
    pub stages: bool,
}

#[derive(Debug, Serialize)]
struct BuildOutput {
    #[serde(flatten)]
    report: JunctionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    stages: Option<StageReport>,
}

/// Execute `jt build`.
pub fn run_build(args: &BuildArgs, config: &PipelineConfig, output: OutputMode) -> anyhow::Result<()> {
    let desc = super::read_description(&args.file)?;
    let out = build_junction_tree(&desc, config)?;

    let payload = BuildOutput {
        report: out.report(),
        stages: args.stages.then(|| out.stages()),
    };

    render_mode(output, &payload, render_build_text, render_build_pretty)
}

fn fmt_pairs(pairs: &[(VarId, VarId)]) -> String {
    let inner: Vec<String> = pairs.iter().map(|(a, b)| format!("{a}-{b}")).collect();
    inner.join(" ")
}

fn fmt_ids(ids: &[VarId]) -> String {
    let inner: Vec<String> = ids.iter().map(ToString::to_string).collect();
    inner.join(" ")
}

fn render_build_text(payload: &BuildOutput, w: &mut dyn Write) -> io::Result<()> {
    let report = &payload.report;
    writeln!(w, "hash {}", report.content_hash)?;
    for (i, clique) in report.cliques.iter().enumerate() {
        writeln!(w, "clique {i} {}", fmt_set(clique))?;
    }
    for edge in &report.edges {
        writeln!(w, "edge {} {} sep {}", edge.a, edge.b, fmt_set(&edge.separator))?;
    }
    writeln!(w, "components {}", report.components)?;

    if let Some(ref stages) = payload.stages {
        writeln!(w, "directed {}", fmt_pairs(&stages.directed_edges))?;
        writeln!(w, "moral {}", fmt_pairs(&stages.moral_edges))?;
        writeln!(w, "marriages {}", fmt_pairs(&stages.marriages))?;
        writeln!(w, "ordering {}", fmt_ids(&stages.elimination_ordering))?;
        writeln!(w, "fill-in {}", fmt_pairs(&stages.fill_in))?;
        for edge in &stages.clique_graph_edges {
            writeln!(
                w,
                "candidate {} {} weight {}",
                edge.a,
                edge.b,
                edge.separator.len()
            )?;
        }
    }
    Ok(())
}

fn render_build_pretty(payload: &BuildOutput, w: &mut dyn Write) -> io::Result<()> {
    let report = &payload.report;

    if let Some(ref stages) = payload.stages {
        pretty_section(w, "Stages")?;
        pretty_kv(w, "Directed", fmt_pairs(&stages.directed_edges))?;
        pretty_kv(w, "Moral", fmt_pairs(&stages.moral_edges))?;
        pretty_kv(w, "Marriages", fmt_pairs(&stages.marriages))?;
        pretty_kv(w, "Ordering", fmt_ids(&stages.elimination_ordering))?;
        pretty_kv(w, "Fill-in", fmt_pairs(&stages.fill_in))?;
        pretty_kv(
            w,
            "Candidates",
            stages.clique_graph_edges.len().to_string(),
        )?;
        writeln!(w)?;
    }

    pretty_section(w, &format!("Cliques ({})", report.cliques.len()))?;
    for (i, clique) in report.cliques.iter().enumerate() {
        writeln!(w, "  C{i:<4} {}", fmt_set(clique))?;
    }
    writeln!(w)?;

    pretty_section(w, &format!("Separators ({})", report.edges.len()))?;
    if report.edges.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for edge in &report.edges {
        writeln!(
            w,
            "  C{} - C{}  {}",
            edge.a,
            edge.b,
            fmt_set(&edge.separator)
        )?;
    }
    writeln!(w)?;

    pretty_kv(w, "Components", report.components.to_string())?;
    pretty_kv(w, "Hash", &report.content_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::NetworkDescription;

    fn payload(stages: bool) -> BuildOutput {
        let desc = NetworkDescription::from_edges([1, 2, 3], &[(1, 2), (2, 3)]);
        let out = build_junction_tree(&desc, &PipelineConfig::default()).expect("pipeline");
        BuildOutput {
            report: out.report(),
            stages: stages.then(|| out.stages()),
        }
    }

    #[test]
    fn text_lists_cliques_and_separators() {
        let mut buf = Vec::new();
        render_build_text(&payload(false), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("clique 0 {1, 2}\n"));
        assert!(text.contains("clique 1 {2, 3}\n"));
        assert!(text.contains("edge 0 1 sep {2}\n"));
        assert!(text.ends_with("components 1\n"));
    }

    #[test]
    fn text_stages_are_optional() {
        let mut buf = Vec::new();
        render_build_text(&payload(true), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("moral 1-2 2-3\n"));
        assert!(text.contains("ordering "));
        assert!(text.contains("candidate 0 1 weight 1\n"));
    }

    #[test]
    fn json_flattens_report() {
        let value = serde_json::to_value(payload(false)).expect("json");
        assert_eq!(value["components"], 1);
        assert_eq!(value["cliques"][0], serde_json::json!([1, 2]));
        assert!(value.get("stages").is_none());
    }

    #[test]
    fn pretty_has_sections() {
        let mut buf = Vec::new();
        render_build_pretty(&payload(true), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Stages"));
        assert!(text.contains("Cliques (2)"));
        assert!(text.contains("Separators (1)"));
    }
}
