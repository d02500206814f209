use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

/// What is shown when there is no usable high score.
pub const NO_SCORE: &str = "N/A";

/// A persistent key-value store for high scores.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// The best (lowest) guess count in `store`.
///
/// A missing or unparseable value counts as no score.
pub fn best_score<S: ScoreStore + ?Sized>(store: &S, key: &str) -> Option<u32> {
    let raw = store.get(key)?;
    match raw.trim().parse() {
        Ok(score) => Some(score),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring corrupted high score");
            None
        }
    }
}

/// Stores `guesses` if it beats the current best score.
///
/// Returns whether the store was updated.
pub fn record_score<S: ScoreStore + ?Sized>(
    store: &mut S,
    key: &str,
    guesses: u32,
) -> anyhow::Result<bool> {
    match best_score(store, key) {
        Some(best) if best <= guesses => Ok(false),
        _ => {
            store.set(key, &guesses.to_string())?;
            Ok(true)
        }
    }
}

pub fn display_score(score: Option<u32>) -> String {
    match score {
        Some(score) => score.to_string(),
        None => String::from(NO_SCORE),
    }
}

/// A store that forgets everything when dropped.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    values: HashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(String::from(key), String::from(value));
        Ok(())
    }
}

/// A store backed by a JSON object on disk, rewritten on every update.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store, and so is a file that is not a JSON
    /// object of strings. Such a file is overwritten by the next update.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if path.is_dir() {
            anyhow::bail!("'{}' is a directory, not a score file", path.display());
        }
        let values = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            serde_json::from_reader(reader).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "Score file is corrupted, starting afresh");
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(String::from(key), String::from(value));
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &self.values)?;
        writer.flush()?;
        Ok(())
    }
}
