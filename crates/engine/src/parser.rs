// SPDX-License-Identifier: MIT

//! Stdout interpretation for `autopkg` invocations
//!
//! Raw byte chunks arrive from the process adapter with no line
//! alignment; [`OutputParser`] owns the splitting, turns recognized
//! lines into [`Progress`] events, and keeps the full text around for
//! the enumeration decoders.

use ph_core::{Progress, RecipeListing, RepoEntry, SearchHit, Verb};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Enumeration output did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

fn percent_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "45%" or "45.5%" anywhere in the line.
    RE.get_or_init(|| Regex::new(r"(\d{1,3}(?:\.\d+)?)%").unwrap_or_else(|_| unreachable!()))
}

fn processing_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Processing (.+?)\.\.\.").unwrap_or_else(|_| unreachable!()))
}

/// Accumulates raw chunks and yields complete lines.
///
/// Chunk boundaries carry no meaning: a line may span several chunks,
/// and one chunk may hold several lines. Both `\n` and `\r\n` endings
/// are accepted; a bare trailing `\r` is stripped.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop(); // the newline
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Drain a trailing unterminated line, if any. Called at EOF.
    pub fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        let trimmed = line.trim_end_matches('\r').to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Turns a task's stdout stream into progress events.
///
/// Recognized lines:
/// - a percent marker (`"… 45% …"`) yields that fraction directly;
/// - `"Processing <recipe>..."` advances a recipe counter, yielding
///   `processed / expected` when the recipe count is known up front;
/// - anything else is forwarded as an indeterminate message.
///
/// Blank lines produce no event. All text is retained verbatim for
/// [`OutputParser::stdout`].
#[derive(Debug)]
pub struct OutputParser {
    buffer: LineBuffer,
    expected_recipes: Option<usize>,
    processed: usize,
    stdout: String,
}

impl OutputParser {
    pub fn new() -> Self {
        Self {
            buffer: LineBuffer::new(),
            expected_recipes: None,
            processed: 0,
            stdout: String::new(),
        }
    }

    /// A parser that knows how many recipes the run covers, enabling
    /// fractional progress from `Processing` lines.
    pub fn with_recipe_count(count: usize) -> Self {
        let mut parser = Self::new();
        parser.expected_recipes = (count > 0).then_some(count);
        parser
    }

    /// Feed one raw chunk; returns the progress events it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Progress> {
        self.buffer
            .feed(chunk)
            .into_iter()
            .filter_map(|line| self.interpret(&line))
            .collect()
    }

    /// Flush any unterminated final line. Called once, at EOF.
    pub fn finish(&mut self) -> Option<Progress> {
        let line = self.buffer.flush()?;
        self.interpret(&line)
    }

    /// Everything the task wrote to stdout, reassembled.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    fn interpret(&mut self, line: &str) -> Option<Progress> {
        self.stdout.push_str(line);
        self.stdout.push('\n');

        if line.trim().is_empty() {
            return None;
        }
        if let Some(caps) = percent_marker().captures(line) {
            if let Ok(pct) = caps[1].parse::<f64>() {
                return Some(Progress::at(line, pct / 100.0));
            }
        }
        if let Some(caps) = processing_marker().captures(line) {
            self.processed += 1;
            let message = format!("Running {}", &caps[1]);
            return match self.expected_recipes {
                Some(total) => Some(Progress::at(message, self.processed as f64 / total as f64)),
                None => Some(Progress::indeterminate(message)),
            };
        }
        Some(Progress::indeterminate(line))
    }
}

impl Default for OutputParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode `autopkg search` table output.
///
/// The table is a header row (`Name  Repo  Path`), a dashed underline,
/// and one row per hit, ending at the first blank line. Output with no
/// table at all (the "nothing found" case) decodes to an empty list;
/// a row with fewer than three columns is an error.
pub fn decode_search(stdout: &str) -> Result<Vec<SearchHit>, DecodeError> {
    let mut lines = stdout.lines();
    let header = lines.find(|line| {
        let mut cols = line.split_whitespace();
        cols.next() == Some("Name") && line.contains("Repo") && line.contains("Path")
    });
    if header.is_none() {
        return Ok(Vec::new());
    }

    let mut hits = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            break;
        }
        if line.trim_start().starts_with('-') {
            continue; // underline row
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        match cols.as_slice() {
            [recipe, repo, path] => hits.push(SearchHit {
                recipe: (*recipe).to_string(),
                repo: (*repo).to_string(),
                repo_path: (*path).to_string(),
            }),
            _ => {
                return Err(DecodeError(format!("unrecognized search row: {line:?}")));
            }
        }
    }
    Ok(hits)
}

/// Decode `autopkg repo-list` output: one `path (url)` line per repo.
pub fn decode_repo_list(stdout: &str) -> Result<Vec<RepoEntry>, DecodeError> {
    let mut entries = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let open = line
            .rfind(" (")
            .ok_or_else(|| DecodeError(format!("unrecognized repo row: {line:?}")))?;
        let url = line[open + 2..]
            .strip_suffix(')')
            .ok_or_else(|| DecodeError(format!("unrecognized repo row: {line:?}")))?;
        entries.push(RepoEntry {
            path: PathBuf::from(&line[..open]),
            url: url.to_string(),
        });
    }
    Ok(entries)
}

/// Decode `autopkg list-recipes` output: one recipe name per line.
pub fn decode_recipe_list(stdout: &str) -> Result<Vec<RecipeListing>, DecodeError> {
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(RecipeListing::new)
        .collect())
}

/// Which decoder, if any, a verb's stdout goes through.
pub(crate) fn decode_for(verb: Verb, stdout: &str) -> Result<DecodedResults, DecodeError> {
    match verb {
        Verb::Search => decode_search(stdout).map(DecodedResults::Search),
        Verb::RepoList => decode_repo_list(stdout).map(DecodedResults::Repos),
        Verb::ListRecipes => decode_recipe_list(stdout).map(DecodedResults::Recipes),
        _ => Ok(DecodedResults::None),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum DecodedResults {
    #[default]
    None,
    Search(Vec<SearchHit>),
    Repos(Vec<RepoEntry>),
    Recipes(Vec<RecipeListing>),
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
