//! The persona: a vocabulary plus the state its primitives carry between
//! calls (parameters, cycle history, RNG).

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::cycle::CycleTracker;
use crate::core::speaker::Speaker;
use crate::core::vocabulary::{Vocabulary, VocabularyError};
use crate::schema::params::Params;

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("vocabulary error in {path}: {source}")]
    Vocabulary {
        path: PathBuf,
        #[source]
        source: VocabularyError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An articulating persona. Built via `Persona::builder()` or
/// `Persona::new()`.
///
/// A persona is not meant to be shared between concurrent callers; keep
/// one per conversation or session.
#[derive(Debug)]
pub struct Persona {
    name: String,
    vocabulary: Vocabulary,
    params: Params,
    cycles: CycleTracker,
    rng: StdRng,
}

/// Builder for constructing a `Persona`.
pub struct PersonaBuilder {
    name: String,
    seed: Option<u64>,
    /// Directly provided vocabulary (the base layer).
    vocabulary: Option<Vocabulary>,
    vocabulary_dir: Option<PathBuf>,
    vocabulary_files: Vec<PathBuf>,
}

impl Persona {
    pub fn builder() -> PersonaBuilder {
        PersonaBuilder {
            name: "persona".to_string(),
            seed: None,
            vocabulary: None,
            vocabulary_dir: None,
            vocabulary_files: Vec::new(),
        }
    }

    /// A persona over `vocabulary` with an entropy-seeded RNG.
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self::from_parts("persona".to_string(), vocabulary, StdRng::from_entropy())
    }

    fn from_parts(name: String, vocabulary: Vocabulary, rng: StdRng) -> Self {
        Self {
            name,
            vocabulary,
            params: Params::new(),
            cycles: CycleTracker::new(),
            rng,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Replace the vocabulary wholesale. Cycle history and parameters are kept.
    pub fn set_vocabulary(&mut self, vocabulary: Vocabulary) {
        self.vocabulary = vocabulary;
    }

    /// The parameters stored by the most recent call.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Values drawn in a cycle group since its last reset.
    pub fn used(&self, group: &str) -> &[String] {
        self.cycles.used(group)
    }

    pub fn reset_cycles(&mut self) {
        self.cycles.clear();
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Borrow the speaking capability directly, e.g. to call primitives
    /// outside of any concept.
    pub fn speaker(&mut self) -> Speaker<'_> {
        Speaker::new(
            &self.vocabulary,
            &mut self.params,
            &mut self.cycles,
            &mut self.rng,
        )
    }

    /// Articulate a concept with an empty parameter context.
    pub fn articulate(&mut self, concept: &str) -> String {
        self.articulate_with(concept, Params::new())
    }

    /// Articulate a concept, replacing the stored parameters with `params`.
    pub fn articulate_with(&mut self, concept: &str, params: Params) -> String {
        self.speaker().say_with(concept, params)
    }

    /// Articulate under a fresh RNG seeded with `seed`. The persona's own
    /// RNG is left where it was.
    pub fn articulate_seeded(&mut self, concept: &str, params: Params, seed: u64) -> String {
        let saved = std::mem::replace(&mut self.rng, StdRng::seed_from_u64(seed));
        let output = self.articulate_with(concept, params);
        self.rng = saved;
        output
    }

    /// Generate several articulations of the same concept and parameters.
    pub fn articulate_variants(
        &mut self,
        concept: &str,
        params: &Params,
        count: usize,
    ) -> Vec<String> {
        (0..count)
            .map(|_| self.articulate_with(concept, params.clone()))
            .collect()
    }

    /// Articulate a concept, reusing the parameters from the previous call.
    pub fn say(&mut self, concept: &str) -> String {
        self.speaker().say(concept)
    }

    pub fn say_with(&mut self, concept: &str, params: Params) -> String {
        self.speaker().say_with(concept, params)
    }

    pub fn cap_say(&mut self, concept: &str) -> String {
        self.speaker().cap_say(concept)
    }

    pub fn cap_say_with(&mut self, concept: &str, params: Params) -> String {
        self.speaker().cap_say_with(concept, params)
    }
}

impl PersonaBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Provide a vocabulary directly (for code-defined concepts).
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Load every `.ron` file in `path`, in lexical order.
    pub fn vocabulary_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.vocabulary_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load a single RON vocabulary file. Files override the directory.
    pub fn vocabulary_file(mut self, path: impl AsRef<Path>) -> Self {
        self.vocabulary_files.push(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<Persona, PersonaError> {
        let mut vocabulary = self.vocabulary.unwrap_or_default();

        // Directory vocabularies first, a missing directory is skipped
        if let Some(ref dir) = self.vocabulary_dir {
            if dir.exists() {
                load_ron_files_from_dir(dir, |path| {
                    vocabulary.merge(load_vocabulary(path)?);
                    Ok(())
                })?;
            }
        }

        for path in &self.vocabulary_files {
            vocabulary.merge(load_vocabulary(path)?);
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::debug!(
            "built persona '{}' with {} concepts",
            self.name,
            vocabulary.len()
        );
        Ok(Persona::from_parts(self.name, vocabulary, rng))
    }
}

fn load_vocabulary(path: &Path) -> Result<Vocabulary, PersonaError> {
    Vocabulary::load_from_ron(path).map_err(|source| PersonaError::Vocabulary {
        path: path.to_path_buf(),
        source,
    })
}

/// Load all .ron files from a directory in lexical order, calling `loader`
/// for each.
fn load_ron_files_from_dir<F>(dir: &Path, mut loader: F) -> Result<(), PersonaError>
where
    F: FnMut(&Path) -> Result<(), PersonaError>,
{
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            paths.push(path);
        }
    }
    paths.sort();
    for path in &paths {
        loader(path)?;
    }
    Ok(())
}
