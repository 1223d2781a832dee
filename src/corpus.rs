/// Chunk data model and corpus loading.
///
/// Mirrors the upstream chunker's output shape: a single JSON document with a
/// top-level `chunks` array, or one chunk object per line (`.jsonl`).
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a corpus file.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid chunk JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corpus {path} contains no chunks")]
    Empty { path: String },
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

/// A single code chunk as emitted by the chunking pipeline.
///
/// Optional fields follow the producer's `omitempty` behavior: they default
/// on read and are omitted again when empty on write.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chunk {
    pub id: String,
    pub file_path: String,

    #[serde(default)]
    pub start_line: u32,

    #[serde(default)]
    pub end_line: u32,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub language: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub framework: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,

    /// Directed references to other chunk ids. No uniqueness or acyclicity
    /// is guaranteed by the producer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_chunks: Vec<String>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub token_count: u64,
}

/// Serialization view of a chunk without its `related_chunks` list.
///
/// Used wherever a report reproduces an input record but the relation edges
/// are already represented elsewhere in the output.
#[derive(Debug, Serialize)]
pub struct ChunkDetails<'a> {
    pub id: &'a str,
    pub file_path: &'a str,
    pub start_line: u32,
    pub end_line: u32,
    pub content: &'a str,
    pub language: &'a str,

    #[serde(skip_serializing_if = "str::is_empty")]
    pub framework: &'a str,

    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub symbols: &'a [String],

    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub imports: &'a [String],

    #[serde(skip_serializing_if = "is_zero")]
    pub token_count: u64,
}

impl<'a> From<&'a Chunk> for ChunkDetails<'a> {
    fn from(chunk: &'a Chunk) -> Self {
        Self {
            id: &chunk.id,
            file_path: &chunk.file_path,
            start_line: chunk.start_line,
            end_line: chunk.end_line,
            content: &chunk.content,
            language: &chunk.language,
            framework: &chunk.framework,
            symbols: &chunk.symbols,
            imports: &chunk.imports,
            token_count: chunk.token_count,
        }
    }
}

/// An ordered collection of chunks loaded from one corpus file.
#[derive(Debug, Deserialize, Serialize)]
pub struct Corpus {
    pub chunks: Vec<Chunk>,
}

impl Corpus {
    /// Load a corpus from disk.
    ///
    /// Files ending in `.jsonl` are parsed as JSON Lines (one chunk per
    /// line); everything else as one document with a top-level `chunks`
    /// array. An empty corpus is rejected.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let data = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: display.clone(),
            source,
        })?;

        let is_jsonl = path.extension().and_then(|e| e.to_str()) == Some("jsonl");
        let corpus = if is_jsonl {
            Self::parse_jsonl(&data, &display)?
        } else {
            serde_json::from_str(&data).map_err(|source| CorpusError::Json {
                path: display.clone(),
                source,
            })?
        };

        if corpus.chunks.is_empty() {
            return Err(CorpusError::Empty { path: display });
        }

        Ok(corpus)
    }

    fn parse_jsonl(data: &str, path: &str) -> Result<Self, CorpusError> {
        let mut chunks = Vec::new();
        for line in data.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let chunk = serde_json::from_str(line).map_err(|source| CorpusError::Json {
                path: path.to_string(),
                source,
            })?;
            chunks.push(chunk);
        }
        Ok(Self { chunks })
    }

    /// Number of chunks in the corpus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Find a chunk by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
