//! Interactive REPL for the AWS chat agent

mod commands;

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use awschat_core::{Agent, AgentError};
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::CliError;

pub use commands::LineAction;

pub const BANNER: &str = "AWS Chatbot. Type 'quit' to exit.";
pub const PROMPT: &str = "> ";

/// One read from a [`LineSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl+C
    Interrupted,
    /// Ctrl+D or end of piped input
    Eof,
}

/// Where the shell reads lines from
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input, CliError>;

    /// Remember a line for history navigation. No-op by default.
    fn add_history(&mut self, _line: &str) {}
}

/// What answers the lines the shell forwards
#[async_trait(?Send)]
pub trait Responder {
    type Error: fmt::Display;

    async fn respond(&self, line: &str) -> Result<String, Self::Error>;
}

#[async_trait(?Send)]
impl Responder for Agent {
    type Error = AgentError;

    async fn respond(&self, line: &str) -> Result<String, AgentError> {
        self.run(line).await.map(|response| response.text)
    }
}

/// Run the read-ask-print loop until the user leaves.
///
/// Answers go to `out` unmodified. Agent failures go to `err` and the loop
/// continues.
pub async fn run_loop<S, R, O, E>(
    source: &mut S,
    responder: &R,
    out: &mut O,
    err: &mut E,
) -> Result<(), CliError>
where
    S: LineSource + ?Sized,
    R: Responder + ?Sized,
    O: Write,
    E: Write,
{
    writeln!(out, "{}", BANNER)?;

    loop {
        out.flush()?;
        let line = match source.read_line(PROMPT) {
            Ok(Input::Line(line)) => line,
            Ok(Input::Interrupted) => {
                writeln!(out, "^C")?;
                continue;
            }
            Ok(Input::Eof) => break,
            Err(e) => {
                writeln!(err, "Error: {}", e)?;
                break;
            }
        };

        if !line.is_empty() {
            source.add_history(&line);
        }

        let question = match LineAction::parse(&line) {
            LineAction::Exit => break,
            LineAction::Ask(question) => question,
        };

        match responder.respond(question).await {
            Ok(answer) => writeln!(out, "{}", answer)?,
            Err(e) => {
                log::debug!("agent run failed: {}", e);
                writeln!(err, "Error: {}", e)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// [`LineSource`] over a rustyline editor with on-disk history
pub struct RustylineSource {
    editor: DefaultEditor,
    history_path: PathBuf,
}

impl RustylineSource {
    /// Open an editor and load history from `<cache dir>/awschat/history.txt`
    /// when it exists.
    pub fn new() -> Result<Self, CliError> {
        let history_path = dirs::cache_dir()
            .map(|p| p.join("awschat/history.txt"))
            .unwrap_or_else(|| ".awschat/history.txt".into());
        Self::with_history_path(history_path)
    }

    pub fn with_history_path(history_path: PathBuf) -> Result<Self, CliError> {
        let mut editor = DefaultEditor::with_config(Config::default())?;
        if history_path.exists() {
            if let Err(e) = editor.load_history(&history_path) {
                log::debug!("could not load history from {}: {}", history_path.display(), e);
            }
        }
        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Write history back to disk. Failures are logged and ignored.
    pub fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        if let Err(e) = self.editor.save_history(&self.history_path) {
            log::debug!(
                "could not save history to {}: {}",
                self.history_path.display(),
                e
            );
        }
    }
}

impl LineSource for RustylineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            log::debug!("could not add history entry: {}", e);
        }
    }
}

/// Run the interactive shell for the agent on the terminal
///
/// ```ignore
/// let agent = awschat_cli::build_agent(&config, &sdk_config).await?;
/// awschat_cli::run_cli(agent).await?;
/// ```
pub async fn run_cli(agent: Agent) -> Result<(), CliError> {
    let mut source = RustylineSource::new()?;
    let result = run_loop(
        &mut source,
        &agent,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await;
    source.save_history();
    result
}
