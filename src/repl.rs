//! Interactive command loop
//!
//! Reads one line at a time, parses it into a command, and dispatches.
//! One command is fully processed (including the model round-trip) before
//! the next line is read. Every non-fatal error is converted to a printed
//! message here; the loop itself never dies on a bad command.

use crate::gemini::ModelBackend;
use crate::render::{parse_nodes, render_nodes, render_thoughts};
use crate::request::{build_request, RequestMode};
use crate::session::SessionState;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `upload:<path>[,<path>...]`
    Upload(Vec<PathBuf>),
    /// `create:<instruction>`
    Create(String),
    /// Anything else non-empty: free-form chat.
    Chat(String),
    /// `quit`, case-insensitive.
    Quit,
    /// Blank line: re-prompt, no state change.
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();

        if line.is_empty() {
            return Command::Empty;
        }
        if line.eq_ignore_ascii_case("quit") {
            return Command::Quit;
        }
        if let Some(rest) = line.strip_prefix("upload:") {
            let paths: Vec<PathBuf> = rest
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect();
            return Command::Upload(paths);
        }
        if let Some(rest) = line.strip_prefix("create:") {
            return Command::Create(rest.trim().to_string());
        }
        Command::Chat(line.to_string())
    }
}

/// Whether the loop keeps going after a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Quit,
}

/// The command loop: owns the session state and the model backend.
pub struct Repl<B: ModelBackend> {
    backend: B,
    session: SessionState,
}

impl<B: ModelBackend> Repl<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: SessionState::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Dispatch one input line. Errors from command handlers are printed
    /// and swallowed; only `quit` (or end of input) stops the loop.
    pub async fn dispatch(&mut self, line: &str) -> LoopAction {
        match Command::parse(line) {
            Command::Empty => LoopAction::Continue,
            Command::Quit => {
                info!("Session ended by user");
                LoopAction::Quit
            }
            Command::Upload(paths) => {
                println!("{}", self.handle_upload(&paths).await);
                LoopAction::Continue
            }
            Command::Create(instruction) => {
                match self.handle_create(&instruction).await {
                    Ok(output) => println!("{}", output),
                    Err(e) => println!("[FAILED] generation failed: {}", e),
                }
                LoopAction::Continue
            }
            Command::Chat(text) => {
                match self.handle_chat(&text).await {
                    Ok(output) => println!("Agent: {}", output),
                    Err(e) => println!("[FAILED] {}", e),
                }
                LoopAction::Continue
            }
        }
    }

    /// Upload each named file. A missing path is reported and skipped and
    /// never touches the session; the last successful upload becomes the
    /// active document.
    pub async fn handle_upload(&mut self, paths: &[PathBuf]) -> String {
        if paths.is_empty() {
            return "No file path given. Usage: upload:/path/to/file".to_string();
        }

        let mut lines = Vec::new();
        for path in paths {
            if !path.exists() {
                warn!(path = %path.display(), "Upload target does not exist");
                lines.push(format!("file not found: {}", path.display()));
                continue;
            }
            match self.backend.upload(path).await {
                Ok(file) => {
                    lines.push(format!("Uploaded: {}", file.display_name));
                    self.session.set_document(file);
                }
                Err(e) => lines.push(e.to_string()),
            }
        }

        if let Some(doc) = self.session.document() {
            lines.push(format!("Active document: {}", doc.display_name));
        }
        lines.join("\n")
    }

    /// Structured generation: IDLE → SENDING → PARSE_OK | PARSE_FAIL.
    /// No retries; a failure is reported and the loop returns to idle.
    /// History is untouched either way, node batches are print-only.
    pub async fn handle_create(&mut self, instruction: &str) -> crate::Result<String> {
        let mut output = String::new();

        if self.session.document().is_none() {
            warn!("create: issued with no uploaded document");
            output.push_str("[notice] no document uploaded; generating from instruction only\n");
        }

        let request = build_request(RequestMode::Structured, instruction, &self.session);
        let reply = self.backend.generate(request).await?;

        let nodes = parse_nodes(&reply.text)?;
        info!(count = nodes.len(), "Structured generation succeeded");

        output.push_str(&render_thoughts(&reply.thoughts));
        output.push_str(&render_nodes(&nodes));
        Ok(output)
    }

    /// Free-form chat. The exchange is appended to history only after the
    /// model answers, so failed calls leave the session as it was.
    pub async fn handle_chat(&mut self, text: &str) -> crate::Result<String> {
        let request = build_request(RequestMode::Freeform, text, &self.session);
        let reply = self.backend.generate(request).await?;

        self.session.record_exchange(text, &reply.text);

        let mut output = render_thoughts(&reply.thoughts);
        output.push_str(&reply.text);
        Ok(output)
    }

    /// Read lines until `quit` or end of input. Blocking stdin reads are
    /// fine here: the loop is strictly one-command-at-a-time anyway.
    pub async fn run(&mut self) -> crate::Result<()> {
        let stdin = std::io::stdin();
        let mut line = String::new();

        loop {
            print!("You: ");
            std::io::stdout().flush()?;

            line.clear();
            let bytes = stdin.lock().read_line(&mut line)?;
            if bytes == 0 {
                // end of input behaves like quit
                break;
            }

            if self.dispatch(&line).await == LoopAction::Quit {
                break;
            }
        }

        Ok(())
    }
}
