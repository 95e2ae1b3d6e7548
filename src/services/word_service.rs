use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const BUILTIN_WORDS: [&str; 8] = [
    "사과", "바다", "기차", "우산", "시계", "연필", "하늘", "나무",
];

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse word list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word list is empty")]
    Empty,
}

// on-disk shape: {"word": ["...", ...]}
#[derive(Debug, Deserialize)]
struct WordFile {
    word: Vec<String>,
}

/// Pool the round's secret word is drawn from.
#[derive(Debug, Clone)]
pub struct SecretWords {
    words: Vec<String>,
}

impl SecretWords {
    pub fn new(words: Vec<String>) -> Result<Self, WordListError> {
        let words: Vec<String> = words
            .into_iter()
            .filter(|w| !w.trim().is_empty())
            .collect();
        if words.is_empty() {
            return Err(WordListError::Empty);
        }
        Ok(Self { words })
    }

    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, WordListError> {
        let file: WordFile = serde_json::from_str(text)?;
        Self::new(file.word)
    }

    pub fn load(path: &Path) -> Result<Self, WordListError> {
        let text = fs::read_to_string(path).map_err(|source| WordListError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Loads `path` when given, otherwise falls back to the built-in list.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, WordListError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.words[rng.gen_range(0..self.words.len())]
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
