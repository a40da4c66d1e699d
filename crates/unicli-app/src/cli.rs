use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

/// universal-cli: a terminal assistant for local and OpenAI-compatible LLMs.
#[derive(Parser, Debug)]
#[command(name = "unicli", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. `debug`, `unicli=info`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive chat session with the model.
    Chat(ChatArgs),
}

#[derive(clap::Args, Debug)]
pub struct ChatArgs {
    /// Project directory the file tools are confined to.
    #[arg(short = 'p', long, default_value = ".")]
    pub project_path: String,
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn print_help() -> std::io::Result<()> {
    Args::command().print_help()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_subcommand_is_accepted() {
        let args = Args::try_parse_from(["unicli"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn chat_defaults_to_current_directory() {
        let args = Args::try_parse_from(["unicli", "chat"]).unwrap();
        let Some(Command::Chat(chat)) = args.command else {
            panic!("expected chat");
        };
        assert_eq!(chat.project_path, ".");
    }

    #[test]
    fn chat_with_project_path_and_globals() {
        let args = Args::try_parse_from([
            "unicli",
            "chat",
            "-p",
            "../other",
            "--config",
            "/tmp/c.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let Some(Command::Chat(chat)) = args.command else {
            panic!("expected chat");
        };
        assert_eq!(chat.project_path, "../other");
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
