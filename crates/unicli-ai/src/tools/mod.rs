//! File-system tools exposed to the model.
//!
//! Three tools (`list_files`, `read_file`, `write_file`) run against a
//! [`ToolSandbox`] rooted at the project directory. Failures are returned
//! to the model as text, never raised.

mod definitions;
mod registry;
mod sandbox;

use std::path::PathBuf;

pub use definitions::{builtin_tools, to_openai_tool};
pub use registry::{ToolName, ToolRegistry};
pub use sandbox::{FileOp, ToolSandbox, EMPTY_DIRECTORY};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Access denied: Path {path} is outside of allowed root: {}", .root.display())]
    AccessDenied { path: String, root: PathBuf },
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: FileOp,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Missing required argument '{argument}' for {tool}")]
    MissingArgument {
        argument: &'static str,
        tool: &'static str,
    },
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}
