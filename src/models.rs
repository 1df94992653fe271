use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hard ceiling on the number of paths a single batch file read may name.
pub const GET_FILES_LIMIT: usize = 20;

/// Context lines captured before and after each match.
pub const CONTEXT_BEFORE: usize = 4;
pub const CONTEXT_AFTER: usize = 4;

/// Matches returned per file, enforced by the engine invocation itself.
pub const MATCHES_PER_FILE: usize = 3;

/// A sparse, ordered mapping from line number to line text. Keys need not be
/// contiguous; for match windows a line that is blank after trimming is never
/// present as a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineMap(pub BTreeMap<usize, String>);

impl LineMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, line_number: usize, text: String) {
        self.0.insert(line_number, text);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn line_numbers(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    /// Split text into a map keyed by 0-based line index. Line terminators are
    /// stripped; blank lines are retained.
    pub fn from_text(text: &str) -> Self {
        Self(text.lines().map(|l| l.to_string()).enumerate().collect())
    }

    /// The first `count` entries in key order.
    pub fn first(&self, count: usize) -> Self {
        Self(
            self.0
                .iter()
                .take(count)
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        )
    }
}

/// One match with its surrounding context. Blank lines are excluded from the
/// before/after maps, so callers may notice "skips" in the line numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchWindow {
    #[serde(default)]
    pub before: LineMap,
    #[serde(rename = "match", default)]
    pub matched: LineMap,
    #[serde(default)]
    pub after: LineMap,
}

/// A file that had at least one surviving match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub url: String,
    pub matches: Vec<MatchWindow>,
}

/// A whole-file read, optionally truncated. `truncated` is true iff
/// `total_lines` exceeds the requested cap, in which case `lines` holds
/// exactly the first N entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    pub url: String,
    pub lines: LineMap,
    pub total_lines: usize,
    pub truncated: bool,
}

impl FileContent {
    pub fn from_text(url: String, text: &str, truncate_lines: Option<usize>) -> Self {
        let mut lines = LineMap::from_text(text);
        let total_lines = lines.len();

        let truncated = truncate_lines.is_some_and(|cap| total_lines > cap);
        if truncated {
            lines = lines.first(truncate_lines.unwrap_or(total_lines));
        }

        Self {
            url,
            lines,
            total_lines,
            truncated,
        }
    }
}

/// Name and location of a file, without its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathInfo {
    pub path: String,
}

/// A glob or type filter field that accepts either a lone string or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Absent filter lists are treated as empty.
pub fn filter_list(field: Option<OneOrMany>) -> Vec<String> {
    field.map(OneOrMany::into_vec).unwrap_or_default()
}

/// Request body for POST /api/file
#[derive(Debug, Deserialize)]
pub struct FileRequest {
    pub owner: String,
    pub repo: String,
    pub path: String,
    #[serde(default = "default_truncate_lines")]
    pub truncate_lines: usize,
}

/// Request body for POST /api/files
#[derive(Debug, Deserialize)]
pub struct FilesRequest {
    pub owner: String,
    pub repo: String,
    pub paths: Vec<String>,
    #[serde(default = "default_truncate_lines")]
    pub truncate_lines: usize,
}

/// Request body for POST /api/find
#[derive(Debug, Deserialize)]
pub struct FindRequest {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub include_globs: Option<OneOrMany>,
    #[serde(default)]
    pub exclude_globs: Option<OneOrMany>,
    #[serde(default)]
    pub include_types: Option<OneOrMany>,
    #[serde(default)]
    pub exclude_types: Option<OneOrMany>,
    #[serde(default = "default_find_max_results")]
    pub max_results: usize,
}

/// Request body for POST /api/search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub owner: String,
    pub repo: String,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub include_globs: Option<OneOrMany>,
    #[serde(default)]
    pub exclude_globs: Option<OneOrMany>,
    #[serde(default)]
    pub include_types: Option<OneOrMany>,
    #[serde(default)]
    pub exclude_types: Option<OneOrMany>,
    #[serde(default = "default_search_max_results")]
    pub max_results: usize,
}

fn default_truncate_lines() -> usize {
    100
}

fn default_find_max_results() -> usize {
    100
}

fn default_search_max_results() -> usize {
    30
}
