//! Boundary to the external search/find engine (ripgrep).
//!
//! Searches run `rg --json` and parse its event stream; file finds run
//! `rg --files`. Both are consumed lazily, one stdout line at a time, so a
//! capped query never buffers the whole result set. Dropping a stream kills
//! the child process.

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

use crate::error::{Result, ServerError};
use crate::models::{CONTEXT_AFTER, CONTEXT_BEFORE, MATCHES_PER_FILE};
use crate::search::filters::FilterSet;

/// One event from ripgrep's `--json` output.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum RgEvent {
    Begin(RgBegin),
    Match(RgLine),
    Context(RgLine),
    End(RgEnd),
    Summary(serde_json::Value),
}

#[derive(Debug, Deserialize)]
pub struct RgBegin {
    pub path: RgText,
}

#[derive(Debug, Deserialize)]
pub struct RgEnd {
    pub path: RgText,
}

#[derive(Debug, Deserialize)]
pub struct RgLine {
    pub lines: RgText,
    pub line_number: Option<usize>,
}

/// ripgrep reports text as `{"text": ...}`, or omits it for non-UTF-8 data.
#[derive(Debug, Deserialize)]
pub struct RgText {
    pub text: Option<String>,
}

pub fn parse_event(line: &str) -> Result<Option<RgEvent>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let event = serde_json::from_str(line)
        .map_err(|e| ServerError::Validation(format!("Invalid JSON from search engine: {e}")))?;
    Ok(Some(event))
}

/// A line reported by the engine, either a match or surrounding context.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    pub line_number: usize,
    pub text: String,
}

/// All matches and context lines the engine reported for one file.
#[derive(Debug, Default)]
pub struct RawFileMatches {
    pub path: String,
    pub matches: Vec<RawLine>,
    pub context: Vec<RawLine>,
}

/// Lazy per-file stream over a running `rg --json` search.
pub struct SearchStream {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    current: Option<RawFileMatches>,
}

impl SearchStream {
    /// Spawn the engine against `working_dir`. Matching is case-insensitive
    /// with fixed context and a fixed per-file match cap.
    pub fn spawn(working_dir: &Path, patterns: &[String], filters: &FilterSet) -> Result<Self> {
        let mut cmd = Command::new("rg");
        cmd.current_dir(working_dir)
            .arg("--json")
            .arg("--no-config")
            .arg("--no-messages")
            .arg("-i")
            .arg("--max-count")
            .arg(MATCHES_PER_FILE.to_string())
            .arg("-B")
            .arg(CONTEXT_BEFORE.to_string())
            .arg("-A")
            .arg(CONTEXT_AFTER.to_string());
        filters.apply(&mut cmd);
        // Patterns only, no positional path: rg searches the working
        // directory and reports paths relative to it, without a ./ prefix.
        for pattern in patterns {
            cmd.arg("-e").arg(pattern);
        }

        let (child, lines) = spawn_engine(cmd)?;
        Ok(Self {
            child,
            lines,
            current: None,
        })
    }

    /// The next file with at least one match, in the order the engine
    /// reports files. `None` once the stream is exhausted.
    pub async fn next_file(&mut self) -> Result<Option<RawFileMatches>> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| ServerError::Validation(format!("Search engine read failed: {e}")))?;

            let Some(line) = line else {
                finish(&mut self.child).await?;
                return Ok(self.current.take());
            };

            match parse_event(&line)? {
                Some(RgEvent::Begin(begin)) => {
                    self.current = Some(RawFileMatches {
                        path: begin.path.text.unwrap_or_default(),
                        ..Default::default()
                    });
                }
                Some(RgEvent::Match(m)) => {
                    if let (Some(current), Some(line_number)) = (&mut self.current, m.line_number) {
                        if let Some(text) = m.lines.text {
                            current.matches.push(RawLine { line_number, text });
                        }
                    }
                }
                Some(RgEvent::Context(c)) => {
                    if let (Some(current), Some(line_number)) = (&mut self.current, c.line_number) {
                        if let Some(text) = c.lines.text {
                            current.context.push(RawLine { line_number, text });
                        }
                    }
                }
                Some(RgEvent::End(_)) => {
                    if let Some(done) = self.current.take() {
                        return Ok(Some(done));
                    }
                }
                Some(RgEvent::Summary(_)) | None => {}
            }
        }
    }
}

/// Lazy path stream over a running `rg --files` listing.
pub struct FindStream {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl FindStream {
    pub fn spawn(working_dir: &Path, filters: &FilterSet) -> Result<Self> {
        let mut cmd = Command::new("rg");
        cmd.current_dir(working_dir)
            .arg("--files")
            .arg("--no-config")
            .arg("--no-messages");
        filters.apply(&mut cmd);

        let (child, lines) = spawn_engine(cmd)?;
        Ok(Self { child, lines })
    }

    pub async fn next_path(&mut self) -> Result<Option<String>> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| ServerError::Validation(format!("Find engine read failed: {e}")))?;

            match line {
                None => {
                    finish(&mut self.child).await?;
                    return Ok(None);
                }
                Some(path) if path.is_empty() => {}
                Some(path) => return Ok(Some(path)),
            }
        }
    }
}

fn spawn_engine(mut cmd: Command) -> Result<(Child, Lines<BufReader<ChildStdout>>)> {
    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ServerError::Validation(format!("Could not launch search engine: {e}")))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ServerError::Validation("Search engine has no stdout".to_string()))?;

    Ok((child, BufReader::new(stdout).lines()))
}

/// Reap a finished engine process. Exit code 1 means "no matches" and is not
/// an error; anything above that (bad pattern syntax, engine crash) surfaces
/// with the engine's stderr instead of masquerading as an empty result.
async fn finish(child: &mut Child) -> Result<()> {
    let status = child
        .wait()
        .await
        .map_err(|e| ServerError::Validation(format!("Search engine did not exit: {e}")))?;

    if status.success() || status.code() == Some(1) {
        return Ok(());
    }

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr).await;
    }
    Err(ServerError::Validation(format!(
        "Search engine failed ({status}): {}",
        stderr.trim()
    )))
}
