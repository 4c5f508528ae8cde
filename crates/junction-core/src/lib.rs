#![forbid(unsafe_code)]
//! junction-core library.
//!
//! Turns a Bayesian network (a DAG of variables) into a junction tree: the
//! cliques of a triangulated moral graph joined into a maximum-weight
//! spanning forest, with a separator on every edge. Numeric inference over
//! the tree is out of scope.
//!
//! # Conventions
//!
//! - **Errors**: Pipeline stages return [`JunctionError`]; config loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! ```rust,ignore
//! use junction_core::{NetworkDescription, PipelineConfig, build_junction_tree};
//!
//! let desc = NetworkDescription::from_json_str(json)?;
//! let out = build_junction_tree(&desc, &PipelineConfig::default())?;
//! for sep in &out.junction_tree.separators {
//!     println!("{} - {}: {:?}", sep.a, sep.b, sep.vars);
//! }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod pipeline;
pub mod verify;

pub use config::{PipelineConfig, load_config, load_project_config};
pub use error::{ErrorCode, JunctionError};
pub use model::{NetworkDescription, VarId, Variable};
pub use pipeline::{JunctionReport, PipelineOutput, ReportEdge, StageReport, build_junction_tree};
