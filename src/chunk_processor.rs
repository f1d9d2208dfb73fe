/*!
 * Chunk file handling: discovery, natural ordering and completion tracking.
 *
 * A chunk is one bounded slice of a larger document, produced by an external
 * splitting step. This module never mutates chunk files; translations are
 * written as sibling artifacts named `{stem}_{target}.{ext}`.
 */

use anyhow::{Result, anyhow};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

/// One component of a natural sort key: either a run of non-digit
/// characters (compared case-insensitively) or a run of digits
/// (compared by numeric value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPart {
    /// Non-digit run, lowercased for comparison
    Text(String),
    /// Digit run, parsed numerically
    Number(u128),
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyPart::Text(a), KeyPart::Text(b)) => a.cmp(b),
            (KeyPart::Number(a), KeyPart::Number(b)) => a.cmp(b),
            // Keys alternate text/digit runs starting with a (possibly
            // empty) text run, so mixed comparisons only happen when one
            // name runs out of parts structure. Text sorts first.
            (KeyPart::Text(_), KeyPart::Number(_)) => Ordering::Less,
            (KeyPart::Number(_), KeyPart::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Decompose a file name into a natural sort key so that embedded numbers
/// compare by value: `chunk_2` sorts before `chunk_10`. Names without
/// digits degrade to plain case-insensitive lexical comparison.
pub fn natural_sort_key(name: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in name.chars() {
        if c.is_ascii_digit() {
            if !text.is_empty() || (parts.is_empty() && digits.is_empty()) {
                // Keys always start with a text run so that positions
                // align across names; it may be empty.
                parts.push(KeyPart::Text(std::mem::take(&mut text).to_lowercase()));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                // Digit runs in file names are short; u128 covers any
                // realistic chunk index. Oversized runs keep their
                // lexical form.
                match std::mem::take(&mut digits).parse::<u128>() {
                    Ok(n) => parts.push(KeyPart::Number(n)),
                    Err(_) => parts.push(KeyPart::Text(name.to_lowercase())),
                }
            }
            text.push(c);
        }
    }
    if !digits.is_empty() {
        match digits.parse::<u128>() {
            Ok(n) => parts.push(KeyPart::Number(n)),
            Err(_) => parts.push(KeyPart::Text(name.to_lowercase())),
        }
    }
    if !text.is_empty() {
        parts.push(KeyPart::Text(text.to_lowercase()));
    }

    parts
}

/// Check whether a file stem already carries the target-language suffix
/// token, i.e. ends with `_{target}` immediately before the extension.
pub fn has_language_suffix(stem: &str, target_language: &str) -> bool {
    stem.ends_with(&format!("_{}", target_language))
}

/// A named, ordered unit of source text. Read-only to the orchestrator.
#[derive(Debug, Clone)]
pub struct ChunkFile {
    /// Path to the chunk file
    path: PathBuf,
    /// File name without extension
    stem: String,
}

impl ChunkFile {
    /// Create a chunk handle for a path. Fails if the path has no file stem.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Path has no file name: {:?}", path))?;
        Ok(Self { path, stem })
    }

    /// Path to the chunk file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// File name for display in logs and tallies
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| self.stem.clone())
    }

    /// Read the chunk content. Content is read fresh on each call; chunks
    /// are small relative to the translation payloads built from them.
    pub fn load(&self) -> Result<String> {
        FileManager::read_to_string(&self.path)
    }
}

/// An ordered collection of chunk files for one translation job.
/// Sort order is stable and numeric-aware.
#[derive(Debug, Clone)]
pub struct ChunkSequence {
    chunks: Vec<ChunkFile>,
}

impl ChunkSequence {
    /// Build a trivial one-item sequence from a single explicit file.
    pub fn single<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !FileManager::file_exists(&path) {
            return Err(anyhow!("Input file does not exist: {:?}", path.as_ref()));
        }
        Ok(Self {
            chunks: vec![ChunkFile::new(path)?],
        })
    }

    /// Enumerate chunk files in a directory, excluding files that already
    /// carry the target-language suffix, and sort them naturally.
    pub fn discover<P: AsRef<Path>>(
        dir: P,
        extension: &str,
        target_language: &str,
    ) -> Result<Self> {
        if !FileManager::dir_exists(&dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", dir.as_ref()));
        }

        let mut chunks = Vec::new();
        for path in FileManager::find_files(&dir, extension)? {
            let chunk = ChunkFile::new(&path)?;
            if has_language_suffix(chunk.stem(), target_language) {
                continue;
            }
            chunks.push(chunk);
        }

        chunks.sort_by_key(|c| natural_sort_key(&c.display_name()));

        Ok(Self { chunks })
    }

    /// Number of chunks in the sequence
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the sequence holds no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk at a sequence position
    pub fn get(&self, index: usize) -> Option<&ChunkFile> {
        self.chunks.get(index)
    }

    /// Iterate over chunks in sequence order
    pub fn iter(&self) -> impl Iterator<Item = &ChunkFile> {
        self.chunks.iter()
    }
}

/// Predicate for artifact existence. The default implementation checks the
/// filesystem; tests substitute an in-memory store.
pub trait ArtifactStore: Send + Sync {
    /// Whether an artifact already exists at the given path
    fn artifact_exists(&self, path: &Path) -> bool;
}

/// Filesystem-backed artifact store
#[derive(Debug, Default)]
pub struct FsArtifactStore;

impl ArtifactStore for FsArtifactStore {
    fn artifact_exists(&self, path: &Path) -> bool {
        FileManager::file_exists(path)
    }
}

/// Determines, per chunk, whether a translation artifact already exists so
/// that re-runs skip completed work.
pub struct CompletionTracker {
    /// Output directory override; when None, artifacts live next to their source chunk
    output_dir: Option<PathBuf>,
    /// Target language token used in artifact names
    target_language: String,
    /// Artifact file extension
    extension: String,
    /// Existence predicate
    store: Box<dyn ArtifactStore>,
}

impl CompletionTracker {
    /// Create a tracker backed by the real filesystem.
    pub fn new(output_dir: Option<PathBuf>, target_language: &str, extension: &str) -> Self {
        Self::with_store(
            output_dir,
            target_language,
            extension,
            Box::new(FsArtifactStore),
        )
    }

    /// Create a tracker with an injected artifact store.
    pub fn with_store(
        output_dir: Option<PathBuf>,
        target_language: &str,
        extension: &str,
        store: Box<dyn ArtifactStore>,
    ) -> Self {
        Self {
            output_dir,
            target_language: target_language.to_string(),
            extension: extension.to_string(),
            store,
        }
    }

    /// Deterministic artifact path for a chunk: `{stem}_{target}.{ext}` in
    /// the output directory, defaulting to the chunk's own directory.
    pub fn artifact_path(&self, chunk: &ChunkFile) -> PathBuf {
        let dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| chunk.path().parent().unwrap_or(Path::new(".")).to_path_buf());
        FileManager::generate_output_path(
            chunk.path(),
            dir,
            &self.target_language,
            &self.extension,
        )
    }

    /// Whether a chunk's translation is already complete: the artifact
    /// exists, or the stem itself is a translation output.
    pub fn is_complete(&self, chunk: &ChunkFile) -> bool {
        if has_language_suffix(chunk.stem(), &self.target_language) {
            return true;
        }
        self.store.artifact_exists(&self.artifact_path(chunk))
    }

    /// Partition a sequence into pending positions. Positions index into the
    /// full sequence so callers can still reach already-translated neighbors
    /// for context extraction.
    pub fn pending(&self, sequence: &ChunkSequence) -> Vec<usize> {
        sequence
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !self.is_complete(chunk))
            .map(|(index, _)| index)
            .collect()
    }
}
