//! Tool declarations advertised to the model on every request.

use crate::ToolDefinition;

use super::ToolName;

/// The three file-system tools, in declaration order.
pub fn builtin_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: ToolName::ListFiles.as_str().to_string(),
            description: "List files in a directory. Use this to explore the project structure."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Relative path to the directory (e.g. \".\" for root, \"src\" for src folder)."
                    }
                },
                "required": ["path"]
            }),
        },
        ToolDefinition {
            name: ToolName::ReadFile.as_str().to_string(),
            description: "Read the content of a file. Use this to examine code or text files."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Relative path to the file (e.g. \"src/main.rs\")."
                    }
                },
                "required": ["path"]
            }),
        },
        ToolDefinition {
            name: ToolName::WriteFile.as_str().to_string(),
            description: "Write content to a file. Use this to create new files or overwrite existing ones completely."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Relative path to the file."
                    },
                    "content": {
                        "type": "string",
                        "description": "The full content to write to the file."
                    }
                },
                "required": ["path", "content"]
            }),
        },
    ]
}

/// Convert a tool definition to the chat-completions `tools` entry format.
pub fn to_openai_tool(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_three_tools_with_required_path() {
        let tools = builtin_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["list_files", "read_file", "write_file"]);
        for tool in &tools {
            let required = tool.parameters["required"].as_array().unwrap();
            assert!(required.iter().any(|r| r == "path"), "{}", tool.name);
        }
        assert_eq!(tools[2].parameters["required"][1], "content");
    }

    #[test]
    fn openai_format_wraps_function() {
        let tools = builtin_tools();
        let wire = to_openai_tool(&tools[1]);
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "read_file");
        assert_eq!(wire["function"]["parameters"], tools[1].parameters);
    }
}
