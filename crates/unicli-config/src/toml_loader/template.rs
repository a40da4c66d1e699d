//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# universal-cli configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

# system_prompt = "You are a helpful AI assistant in the terminal."

[api]
# Any OpenAI-compatible server (Ollama, LM Studio, vLLM, OpenAI, ...).
# base_url = "http://localhost:11434/v1"
# api_key = "ollama"
# model = "llama3"
# stream_usage = false   # request token usage in the stream

[agent]
# max_tool_rounds = 25          # 1-1000 tool rounds per message
# request_timeout_secs = 300    # 1-3600
# connect_timeout_secs = 10     # 1-120

[logging]
# level = "WARNING"      # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
