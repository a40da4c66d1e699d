mod cli;
mod commands;
mod render;
mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use unicli_common::UnicliError;
use unicli_config::toml_loader;

/// Pick the log filter: `--log-level`, then `RUST_LOG`, then the config
/// file's `logging.level`.
fn log_filter(flag: Option<&str>, config_path: &Path) -> EnvFilter {
    if let Some(directive) = flag {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid --log-level '{directive}': {e}"),
        }
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = toml_loader::load_from_path(config_path)
        .map(|config| config.logging.level)
        .unwrap_or_default();
    EnvFilter::new(level.as_directive())
}

fn init_logging(flag: Option<&str>, config_path: &Path) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(flag, config_path))
        .with_writer(std::io::stderr)
        .init();
}

fn config_path(flag: Option<PathBuf>) -> Result<PathBuf, UnicliError> {
    match flag {
        Some(path) => Ok(path),
        None => Ok(toml_loader::default_config_path()?),
    }
}

fn run(args: cli::Args, chat: cli::ChatArgs) -> Result<(), UnicliError> {
    let config_path = config_path(args.config)?;
    init_logging(args.log_level.as_deref(), &config_path);

    tracing::info!("universal-cli v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::debug!(config = %config_path.display(), "Using config file");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let repl = repl::Repl::start(chat.project_path, config_path)?;
        repl.run().await
    })
}

fn main() -> ExitCode {
    let mut args = cli::parse();

    let Some(cli::Command::Chat(chat)) = args.command.take() else {
        return match cli::print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    };

    match run(args, chat) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
