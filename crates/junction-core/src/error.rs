//! Error type shared by every pipeline stage.
//!
//! All errors are fatal to the invocation that raised them: no stage retries
//! or returns partial output. [`ErrorCode`] gives each variant a stable
//! identifier so callers (the CLI's JSON output in particular) can branch on
//! it without parsing messages.

use std::fmt;

use crate::model::VarId;

/// Failure of a single pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JunctionError {
    /// The variable list is empty.
    #[error("network has no variables")]
    EmptyGraph,

    /// An edge references a variable id that is not in the variable list.
    #[error("edge {from} -> {to} references unknown variable {missing}")]
    UnknownVertex { from: VarId, to: VarId, missing: VarId },

    /// Two variables share the same identifier.
    #[error("variable id {0} is declared more than once")]
    DuplicateVariable(VarId),

    /// The directed edge set contains a cycle.
    #[error("directed cycle through variables {members:?}")]
    CycleDetected { members: Vec<VarId> },

    /// A stage received data violating an upstream guarantee. Always a
    /// pipeline defect, never an input defect.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    /// The network description could not be decoded.
    #[error("malformed network description: {0}")]
    Parse(String),
}

impl JunctionError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyGraph => ErrorCode::EmptyGraph,
            Self::UnknownVertex { .. } => ErrorCode::UnknownVertex,
            Self::DuplicateVariable(_) => ErrorCode::DuplicateVariable,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::InternalInvariant(_) => ErrorCode::InternalInvariant,
            Self::Parse(_) => ErrorCode::MalformedInput,
        }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariant(message.into())
    }
}

impl From<serde_json::Error> for JunctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Stable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MalformedInput,
    EmptyGraph,
    UnknownVertex,
    DuplicateVariable,
    CycleDetected,
    InternalInvariant,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MalformedInput => "E1001",
            Self::EmptyGraph => "E2001",
            Self::UnknownVertex => "E2002",
            Self::DuplicateVariable => "E2003",
            Self::CycleDetected => "E2004",
            Self::InternalInvariant => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MalformedInput => "Malformed network description",
            Self::EmptyGraph => "Network has no variables",
            Self::UnknownVertex => "Edge references unknown variable",
            Self::DuplicateVariable => "Duplicate variable id",
            Self::CycleDetected => "Network is not acyclic",
            Self::InternalInvariant => "Internal invariant violated",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::MalformedInput => Some("Check the JSON against the `nodes`/`edges` layout."),
            Self::EmptyGraph => Some("Add at least one variable to the network."),
            Self::UnknownVertex => Some("Every edge endpoint must name a declared variable id."),
            Self::DuplicateVariable => Some("Give every variable a unique id."),
            Self::CycleDetected => Some("Remove an edge on the reported cycle to restore a DAG."),
            Self::InternalInvariant => Some("Report a bug with the input network attached."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
