//! Terminal output for a running turn.
//!
//! Assistant text and the tool trace go to stdout. The progress spinner
//! and error reports go to stderr so piped output stays clean.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use unicli_ai::{AiError, FirstOutput, TurnEvent, TurnObserver};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

pub const GENERATING: &str = "Generating response...";
pub const ANALYZING: &str = "Analyzing...";
pub const AI_PREFIX: &str = "AI > ";

/// Stdout writer that ends the process quietly when the reader goes away.
pub struct StdoutSink;

impl Write for StdoutSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().lock().write(buf).map_err(exit_on_broken_pipe)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().lock().flush().map_err(exit_on_broken_pipe)
    }
}

fn exit_on_broken_pipe(e: io::Error) -> io::Error {
    if e.kind() == io::ErrorKind::BrokenPipe {
        std::process::exit(0);
    }
    e
}

/// Write `text` to stdout and flush.
pub fn print(text: &str) {
    let mut sink = StdoutSink;
    if let Err(e) = sink.write_all(text.as_bytes()).and_then(|()| sink.flush()) {
        debug!(error = %e, "stdout write failed");
    }
}

fn print_err(text: &str) {
    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(text.as_bytes());
    let _ = stderr.flush();
}

struct Spinner {
    message: watch::Sender<&'static str>,
    task: JoinHandle<()>,
}

impl Spinner {
    fn start(message: &'static str) -> Self {
        let (tx, rx) = watch::channel(message);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(FRAME_INTERVAL);
            for frame in SPINNER_FRAMES.iter().cycle() {
                interval.tick().await;
                let message = *rx.borrow();
                print_err(&format!("\r\x1b[2K{frame} {message}"));
            }
        });
        Self { message: tx, task }
    }

    fn set_message(&self, message: &'static str) {
        self.message.send_replace(message);
    }

    fn stop(self) {
        self.task.abort();
        print_err("\r\x1b[2K");
    }
}

/// Renders [`TurnEvent`]s for an interactive user.
pub struct TerminalRenderer<W: Write + Send = StdoutSink> {
    out: W,
    /// Draw the spinner; off when stderr is not a terminal.
    animate: bool,
    spinner: Option<Spinner>,
    /// Assistant text has been printed for the current response.
    streaming_text: bool,
}

impl TerminalRenderer {
    pub fn stdout() -> Self {
        Self::new(StdoutSink, io::stderr().is_terminal())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, animate: bool) -> Self {
        Self {
            out,
            animate,
            spinner: None,
            streaming_text: false,
        }
    }

    /// Report a turn that ended with a remote error.
    pub fn fail(&mut self, error: &AiError) {
        self.clear();
        print_err(&format!("✖ Error\nDetails: {error}\n"));
    }

    /// Stop the spinner and terminate any partial line of assistant text.
    pub fn clear(&mut self) {
        self.stop_spinner();
        if self.streaming_text {
            self.write("\n");
            self.streaming_text = false;
        }
    }

    fn start_spinner(&mut self, message: &'static str) {
        self.stop_spinner();
        if self.animate {
            self.spinner = Some(Spinner::start(message));
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop();
        }
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            debug!(error = %e, "render write failed");
        }
    }
}

impl<W: Write + Send> TurnObserver for TerminalRenderer<W> {
    fn on_event(&mut self, event: TurnEvent<'_>) {
        match event {
            TurnEvent::AwaitingModel { .. } => {
                self.streaming_text = false;
                self.start_spinner(GENERATING);
            }
            TurnEvent::OutputStarted(FirstOutput::Text) => {
                self.stop_spinner();
                self.write(AI_PREFIX);
                self.streaming_text = true;
            }
            TurnEvent::OutputStarted(FirstOutput::ToolCall) => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message(ANALYZING);
                }
            }
            TurnEvent::TextDelta(text) => {
                if !self.streaming_text {
                    self.stop_spinner();
                    self.write(AI_PREFIX);
                    self.streaming_text = true;
                }
                self.write(text);
            }
            TurnEvent::ResponseComplete => {
                self.stop_spinner();
                if self.streaming_text {
                    self.write("\n\n");
                    self.streaming_text = false;
                }
            }
            TurnEvent::ExecutingTools { count } => {
                self.write(&format!("[Executing {count} tool(s)...]\n"));
            }
            TurnEvent::ArgumentParseError { name, .. } => {
                print_err(&format!("Failed to parse arguments for {name}\n"));
            }
            TurnEvent::ToolStarted { name, arguments } => {
                self.write(&format!(" > {name}({arguments})\n"));
            }
            TurnEvent::ToolFinished { name, output } => {
                debug!(tool = %name, bytes = output.len(), "Tool finished");
            }
            TurnEvent::ToolRoundLimit { limit } => {
                print_err(&format!(
                    "Stopped after {limit} tool rounds without a final answer.\n"
                ));
            }
        }
    }
}

impl<W: Write + Send> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(events: Vec<TurnEvent<'_>>) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new(), false);
        for event in events {
            renderer.on_event(event);
        }
        String::from_utf8(std::mem::take(&mut renderer.out)).unwrap()
    }

    #[test]
    fn text_answer_is_prefixed_and_terminated() {
        let out = render(vec![
            TurnEvent::AwaitingModel { round: 1 },
            TurnEvent::OutputStarted(FirstOutput::Text),
            TurnEvent::TextDelta("Hel"),
            TurnEvent::TextDelta("lo!"),
            TurnEvent::ResponseComplete,
        ]);
        assert_eq!(out, "AI > Hello!\n\n");
    }

    #[test]
    fn tool_round_prints_trace() {
        let out = render(vec![
            TurnEvent::AwaitingModel { round: 1 },
            TurnEvent::OutputStarted(FirstOutput::ToolCall),
            TurnEvent::ResponseComplete,
            TurnEvent::ExecutingTools { count: 2 },
            TurnEvent::ToolStarted {
                name: "list_files",
                arguments: "{\"path\":\"src\"}",
            },
            TurnEvent::ToolFinished {
                name: "list_files",
                output: "[FILE] main.rs",
            },
            TurnEvent::ToolStarted {
                name: "read_file",
                arguments: "{}",
            },
        ]);
        assert_eq!(
            out,
            "[Executing 2 tool(s)...]\n > list_files({\"path\":\"src\"})\n > read_file({})\n"
        );
    }

    #[test]
    fn clear_terminates_partial_text() {
        let mut renderer = TerminalRenderer::new(Vec::new(), false);
        renderer.on_event(TurnEvent::TextDelta("partial"));
        renderer.clear();
        assert_eq!(String::from_utf8_lossy(&renderer.out), "AI > partial\n");
    }
}
