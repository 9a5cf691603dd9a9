//! Vocabularies: concept names mapped to producers, built in code or
//! loaded from RON.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::core::speaker::Speaker;
use crate::core::text::{Producer, Text};
use crate::schema::phrase::Phrase;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A set of named concepts. Names are compared for exact equality.
#[derive(Clone, Default)]
pub struct Vocabulary {
    concepts: FxHashMap<String, Producer>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a concept from a closure.
    pub fn insert<F, T>(&mut self, concept: impl Into<String>, producer: F)
    where
        F: Fn(&mut Speaker<'_>) -> T + Send + Sync + 'static,
        T: Into<Text>,
    {
        let producer: Producer = Arc::new(move |speaker: &mut Speaker<'_>| producer(speaker).into());
        self.concepts.insert(concept.into(), producer);
    }

    /// Builder-style [`Vocabulary::insert`].
    pub fn with<F, T>(mut self, concept: impl Into<String>, producer: F) -> Self
    where
        F: Fn(&mut Speaker<'_>) -> T + Send + Sync + 'static,
        T: Into<Text>,
    {
        self.insert(concept, producer);
        self
    }

    /// Define (or redefine) a concept from a phrase tree.
    pub fn insert_phrase(&mut self, concept: impl Into<String>, phrase: Phrase) {
        self.insert(concept, move |speaker| speaker.expand(&phrase));
    }

    pub fn get(&self, concept: &str) -> Option<&Producer> {
        self.concepts.get(concept)
    }

    pub fn contains(&self, concept: &str) -> bool {
        self.concepts.contains_key(concept)
    }

    /// Concept names in sorted order.
    pub fn concepts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.concepts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Merge another vocabulary into this one. Concepts from `other`
    /// override concepts in `self` with the same name.
    pub fn merge(&mut self, other: Vocabulary) {
        self.concepts.extend(other.concepts);
    }

    /// Load a vocabulary from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Vocabulary, VocabularyError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a vocabulary from a RON map of concept names to phrases.
    pub fn parse_ron(input: &str) -> Result<Vocabulary, VocabularyError> {
        let mut vocabulary = Vocabulary::new();
        for (name, phrase) in parse_phrases(input)? {
            vocabulary.insert_phrase(name, phrase);
        }
        Ok(vocabulary)
    }
}

impl fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vocabulary")
            .field("concepts", &self.concepts())
            .finish()
    }
}

/// Parse the raw phrase trees of a RON vocabulary, keyed by concept name.
pub fn parse_phrases(input: &str) -> Result<BTreeMap<String, Phrase>, VocabularyError> {
    Ok(ron::from_str(input)?)
}

/// Load the raw phrase trees of a RON vocabulary file.
pub fn load_phrases_from_ron(path: &Path) -> Result<BTreeMap<String, Phrase>, VocabularyError> {
    let contents = std::fs::read_to_string(path)?;
    parse_phrases(&contents)
}
