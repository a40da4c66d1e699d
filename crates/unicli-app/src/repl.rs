//! Interactive chat loop.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use unicli_ai::{ClientOptions, OpenAiClient, Session, SessionConfig, ToolRegistry, ToolSandbox};
use unicli_common::UnicliError;
use unicli_config::{ReloadManager, UnicliConfig};

use crate::commands::{self, SlashCommand, FAREWELL};
use crate::render::{self, TerminalRenderer};

enum Input {
    Line(String),
    /// End of input or Ctrl-C.
    Closed,
}

pub struct Repl {
    /// Project path as the user typed it, shown in the prompt.
    project_path: String,
    config_path: PathBuf,
    config: UnicliConfig,
    config_rx: watch::Receiver<UnicliConfig>,
    session: Session,
    client: OpenAiClient,
    renderer: TerminalRenderer,
}

impl Repl {
    /// Load config, start the reload watcher and open the sandbox.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(project_path: String, config_path: PathBuf) -> Result<Self, UnicliError> {
        let (config, config_rx) = ReloadManager::start(config_path.clone());

        let sandbox = ToolSandbox::new(&project_path)?;
        if !sandbox.root().is_dir() {
            warn!(root = %sandbox.root().display(), "Project path is not a directory");
        }
        let session = Session::new(ToolRegistry::new(sandbox))
            .with_max_tool_rounds(config.agent.max_tool_rounds);
        info!(
            session = %session.id(),
            root = %session.registry().sandbox().root().display(),
            model = %config.api.model,
            "Chat session started"
        );
        let client = build_client(&config)?;

        Ok(Self {
            project_path,
            config_path,
            config,
            config_rx,
            session,
            client,
            renderer: TerminalRenderer::stdout(),
        })
    }

    pub async fn run(mut self) -> Result<(), UnicliError> {
        render::print(&commands::welcome_banner(&self.config));
        render::print(&format!(
            "Working Directory: {}\n   (All file operations will be relative to this path)\n\n",
            self.session.registry().sandbox().root().display()
        ));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            self.refresh_config()?;
            render::print(&self.prompt());

            let line = match next_input(&mut lines).await? {
                Input::Line(line) => line,
                Input::Closed => {
                    self.farewell();
                    return Ok(());
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some((command, args)) = SlashCommand::parse(line) {
                let reply = commands::execute(command, args, &mut self.config, &self.config_path);
                render::print(&reply.text);
                if reply.exit {
                    return Ok(());
                }
                continue;
            }

            if !self.run_turn(line).await {
                self.farewell();
                return Ok(());
            }
        }
    }

    /// Run one turn. Returns `false` if the user interrupted it.
    async fn run_turn(&mut self, input: &str) -> bool {
        let session_config = session_config(&self.config);

        let result = tokio::select! {
            result = self.session.run_turn(&self.client, &session_config, input, &mut self.renderer) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        match result {
            Some(Ok(outcome)) => {
                debug!(
                    rounds = outcome.tool_rounds,
                    stop = ?outcome.stop,
                    total_tokens = self.session.tracker().total_tokens(),
                    "Turn complete"
                );
                true
            }
            Some(Err(e)) => {
                warn!(error = %e, "Turn failed");
                self.renderer.fail(&e);
                true
            }
            None => {
                self.renderer.clear();
                false
            }
        }
    }

    /// Adopt a config published by the file watcher, if any.
    fn refresh_config(&mut self) -> Result<(), UnicliError> {
        if !self.config_rx.has_changed().unwrap_or(false) {
            return Ok(());
        }
        let updated = self.config_rx.borrow_and_update().clone();
        if updated == self.config {
            return Ok(());
        }

        info!("Applying reloaded config");
        if client_options(&updated) != self.client.options() {
            self.client = build_client(&updated)?;
        }
        self.session.set_max_tool_rounds(updated.agent.max_tool_rounds);
        self.config = updated;
        Ok(())
    }

    fn prompt(&self) -> String {
        if self.project_path == "." {
            "You > ".to_string()
        } else {
            format!("[{}] You > ", self.project_path)
        }
    }

    fn farewell(&mut self) {
        self.renderer.clear();
        render::print(&format!("\n{FAREWELL}\n"));
    }
}

async fn next_input(lines: &mut Lines<BufReader<Stdin>>) -> Result<Input, UnicliError> {
    tokio::select! {
        line = lines.next_line() => Ok(match line? {
            Some(line) => Input::Line(line),
            None => Input::Closed,
        }),
        _ = tokio::signal::ctrl_c() => Ok(Input::Closed),
    }
}

/// The per-turn view of the config handed to the session.
fn session_config(config: &UnicliConfig) -> SessionConfig {
    SessionConfig::new(&config.api.base_url, &config.api.model)
        .with_api_key(&config.api.api_key)
        .with_system_prompt(&config.system_prompt)
        .with_stream_usage(config.api.stream_usage)
}

fn client_options(config: &UnicliConfig) -> ClientOptions {
    ClientOptions {
        connect_timeout: Duration::from_secs(config.agent.connect_timeout_secs.into()),
        request_timeout: Duration::from_secs(config.agent.request_timeout_secs.into()),
    }
}

fn build_client(config: &UnicliConfig) -> Result<OpenAiClient, UnicliError> {
    OpenAiClient::new(client_options(config)).map_err(|e| UnicliError::Ai(e.to_string()))
}
