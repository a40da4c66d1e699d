//! Maps tool names from the model to sandbox operations.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::ToolDefinition;

use super::{builtin_tools, ToolError, ToolSandbox};

/// Canonical tool names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListFiles,
    ReadFile,
    WriteFile,
}

impl ToolName {
    /// Tie-break order used by [`ToolName::normalize`].
    const MATCH_ORDER: [ToolName; 3] = [ToolName::WriteFile, ToolName::ReadFile, ToolName::ListFiles];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::ListFiles => "list_files",
            ToolName::ReadFile => "read_file",
            ToolName::WriteFile => "write_file",
        }
    }

    /// Map a possibly mangled name to a canonical tool.
    ///
    /// Some backends echo names like `write_filewrite_file` or
    /// `functions.read_file`; the first canonical name contained in `raw`
    /// wins, checking `write_file`, `read_file`, `list_files` in that order.
    pub fn normalize(raw: &str) -> Option<Self> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|name| raw.contains(name.as_str()))
    }
}

/// Tool declarations plus dispatch to the sandboxed file accessor.
pub struct ToolRegistry {
    sandbox: ToolSandbox,
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(sandbox: ToolSandbox) -> Self {
        Self {
            sandbox,
            definitions: builtin_tools(),
        }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn sandbox(&self) -> &ToolSandbox {
        &self.sandbox
    }

    /// Run a tool call and return its result text.
    ///
    /// Never fails: access violations, I/O errors, bad arguments and unknown
    /// names all come back as text for the model to read.
    pub async fn dispatch(&self, name: &str, args: &Map<String, Value>) -> String {
        match self.try_dispatch(name, args).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool call failed");
                e.to_string()
            }
        }
    }

    async fn try_dispatch(&self, name: &str, args: &Map<String, Value>) -> Result<String, ToolError> {
        let tool = ToolName::normalize(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        if tool.as_str() != name {
            debug!(raw = %name, tool = tool.as_str(), "Normalized tool name");
        }

        match tool {
            ToolName::ListFiles => {
                let path = string_arg(args, "path").unwrap_or(".");
                self.sandbox.list(path).await
            }
            ToolName::ReadFile => {
                let path = required_arg(args, "path", tool)?;
                self.sandbox.read(path).await
            }
            ToolName::WriteFile => {
                let path = required_arg(args, "path", tool)?;
                let content = required_arg(args, "content", tool)?;
                self.sandbox.write(path, content).await
            }
        }
    }
}

fn string_arg<'a>(args: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn required_arg<'a>(
    args: &'a Map<String, Value>,
    key: &'static str,
    tool: ToolName,
) -> Result<&'a str, ToolError> {
    string_arg(args, key).ok_or(ToolError::MissingArgument {
        argument: key,
        tool: tool.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangled_names_normalize() {
        assert_eq!(ToolName::normalize("write_file"), Some(ToolName::WriteFile));
        assert_eq!(
            ToolName::normalize("write_filewrite_file"),
            Some(ToolName::WriteFile)
        );
        assert_eq!(
            ToolName::normalize("functions.write_file"),
            Some(ToolName::WriteFile)
        );
        assert_eq!(ToolName::normalize("read_fileread_file"), Some(ToolName::ReadFile));
        assert_eq!(ToolName::normalize("list_files"), Some(ToolName::ListFiles));
        assert_eq!(ToolName::normalize("delete_file"), None);
        assert_eq!(ToolName::normalize(""), None);
    }

    #[test]
    fn write_wins_over_read_and_list() {
        assert_eq!(
            ToolName::normalize("read_file_then_write_file"),
            Some(ToolName::WriteFile)
        );
        assert_eq!(
            ToolName::normalize("list_filesread_file"),
            Some(ToolName::ReadFile)
        );
    }
}
