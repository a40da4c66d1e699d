//! Slash commands handled by the front end instead of the model.
//!
//! Only registered names are commands; any other `/...` input is sent to
//! the model as ordinary text.

use std::path::Path;

use tracing::info;
use unicli_config::{config_to_json, save_config_to_path, UnicliConfig};

pub const FAREWELL: &str = "See you later! Thanks for using Universal CLI.";

const SET_USAGE: &str = "Usage: /set [url|model|key|system] <value>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Bye,
    Welcome,
    Config,
    Set,
}

/// Registered names in help order; `/exit` and `/quit` are hidden aliases.
const REGISTRY: [(&str, SlashCommand); 7] = [
    ("/help", SlashCommand::Help),
    ("/bye", SlashCommand::Bye),
    ("/welcome", SlashCommand::Welcome),
    ("/config", SlashCommand::Config),
    ("/set", SlashCommand::Set),
    ("/exit", SlashCommand::Bye),
    ("/quit", SlashCommand::Bye),
];

const HIDDEN_ALIASES: [&str; 2] = ["/exit", "/quit"];

impl SlashCommand {
    /// Recognize a registered command, returning it with its argument text.
    pub fn parse(input: &str) -> Option<(Self, &str)> {
        let input = input.trim();
        let (name, rest) = input
            .split_once(char::is_whitespace)
            .unwrap_or((input, ""));
        let name = name.to_lowercase();
        REGISTRY
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, command)| (*command, rest.trim()))
    }

    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Help => "Shows a list of available commands",
            SlashCommand::Bye => "Ends session and exits",
            SlashCommand::Welcome => "Shows the welcome screen",
            SlashCommand::Config => "Shows the current configuration",
            SlashCommand::Set => "Set config: /set [url|model|key|system] <value>",
        }
    }
}

/// What the REPL should print and whether it should exit afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
    pub exit: bool,
}

impl CommandReply {
    fn show(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }
}

/// Run `command`. `/set` edits `config` in place and persists it to `config_path`.
pub fn execute(
    command: SlashCommand,
    args: &str,
    config: &mut UnicliConfig,
    config_path: &Path,
) -> CommandReply {
    match command {
        SlashCommand::Help => CommandReply::show(help_text()),
        SlashCommand::Bye => CommandReply {
            text: format!("{FAREWELL}\n"),
            exit: true,
        },
        SlashCommand::Welcome => CommandReply::show(welcome_banner(config)),
        SlashCommand::Config => CommandReply::show(format!("{}\n", config_to_json(config))),
        SlashCommand::Set => CommandReply::show(set(args, config, config_path)),
    }
}

fn help_text() -> String {
    let mut text = String::from("\nAvailable commands:\n");
    for (name, command) in REGISTRY
        .iter()
        .filter(|(name, _)| !HIDDEN_ALIASES.contains(name))
    {
        text.push_str(&format!("  {name:<10} - {}\n", command.description()));
    }
    text.push('\n');
    text
}

fn set(args: &str, config: &mut UnicliConfig, config_path: &Path) -> String {
    let Some((key, value)) = args.split_once(char::is_whitespace) else {
        return format!("{SET_USAGE}\n");
    };
    let value = value.trim();
    if value.is_empty() {
        return format!("{SET_USAGE}\n");
    }

    let message = match key.to_lowercase().as_str() {
        "url" => {
            config.api.set_base_url(value);
            format!("Updated Base URL to: {}", config.api.base_url)
        }
        "model" => {
            config.api.model = value.to_string();
            format!("Updated Model to: {value}")
        }
        "key" => {
            config.api.api_key = value.to_string();
            "Updated API Key.".to_string()
        }
        "system" => {
            config.system_prompt = value.to_string();
            "Updated system prompt.".to_string()
        }
        _ => return "Unknown setting. Use: url, model, key, system\n".to_string(),
    };

    match save_config_to_path(config, config_path) {
        Ok(()) => {
            info!(setting = %key, path = %config_path.display(), "Saved config");
            format!("{message}\n")
        }
        Err(e) => format!("{message} (not saved: {e})\n"),
    }
}

/// Session banner: title, model, endpoint and a help hint.
pub fn welcome_banner(config: &UnicliConfig) -> String {
    let rule = "=".repeat(50);
    format!(
        "{rule}\n UNIVERSAL CLI  -  Your Local AI Assistant\n{rule}\n Model: {}\n URL:   {}\n\n Type a message or use a command (e.g. /help)\n\n",
        config.api.model, config.api.base_url
    )
}
