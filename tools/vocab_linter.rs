//! Vocabulary Linter: validates concept references and choice weights.
//!
//! Usage: vocab_linter <vocabulary_file_or_dir>

use persona_engine::core::vocabulary::load_phrases_from_ron;
use persona_engine::schema::phrase::Phrase;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: vocab_linter <vocabulary_file_or_dir>");
        process::exit(0);
    }

    let mut phrases = BTreeMap::new();
    let path = Path::new(&args[1]);

    if path.is_file() {
        match load_phrases_from_ron(path) {
            Ok(loaded) => phrases.extend(loaded),
            Err(e) => {
                eprintln!("ERROR: Failed to load vocabulary file: {}", e);
                process::exit(1);
            }
        }
    } else if path.is_dir() {
        load_vocabularies_recursive(path, &mut phrases);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", args[1]);
        process::exit(1);
    }

    println!("Loaded {} concepts", phrases.len());

    let (errors, warnings) = lint_vocabulary(&phrases);

    println!("\n=== Vocabulary Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_vocabularies_recursive(dir: &Path, phrases: &mut BTreeMap<String, Phrase>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            load_vocabularies_recursive(&path, phrases);
        } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            match load_phrases_from_ron(&path) {
                Ok(loaded) => {
                    println!("  Loaded: {}", path.display());
                    phrases.extend(loaded);
                }
                Err(e) => {
                    eprintln!("  ERROR loading {}: {}", path.display(), e);
                }
            }
        }
    }
}

fn lint_vocabulary(phrases: &BTreeMap<String, Phrase>) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut referenced = BTreeSet::new();

    for (name, phrase) in phrases {
        // Concept references that don't exist
        for target in phrase.referenced_concepts() {
            referenced.insert(target);
            if !phrases.contains_key(target) {
                errors.push(format!(
                    "Concept '{}' references non-existent concept '{}'",
                    name, target
                ));
            } else if target == name {
                warnings.push(format!(
                    "Concept '{}' references itself (make sure some branch terminates)",
                    name
                ));
            }
        }

        phrase.walk(&mut |node| match node {
            Phrase::Choose(alternatives) | Phrase::Maybe(alternatives) => {
                if !has_selectable(alternatives) {
                    errors.push(format!(
                        "Concept '{}' has a choice with no selectable alternative or an invalid weight",
                        name
                    ));
                }
            }
            Phrase::Cycle {
                group,
                alternatives,
            } => {
                if !has_selectable(alternatives) {
                    errors.push(format!(
                        "Concept '{}' cycles group '{}' with no selectable alternative or an invalid weight",
                        name, group
                    ));
                } else if alternatives.len() < 2 {
                    warnings.push(format!(
                        "Concept '{}' cycles group '{}' over a single alternative",
                        name, group
                    ));
                }
            }
            Phrase::Chance { probability, .. } if !(0.0..=1.0).contains(probability) => {
                warnings.push(format!(
                    "Concept '{}' has chance probability {} outside [0, 1] (it will be clamped)",
                    name, probability
                ));
            }
            _ => {}
        });
    }

    for name in phrases.keys() {
        if !referenced.contains(name.as_str()) {
            warnings.push(format!(
                "Concept '{}' is never referenced by another concept",
                name
            ));
        }
    }

    (errors, warnings)
}

/// Whether the chooser can draw from these alternatives: every weight
/// finite and non-negative, and at least one positive.
fn has_selectable(alternatives: &[Phrase]) -> bool {
    let weights: Vec<f64> = alternatives
        .iter()
        .map(|alternative| match alternative {
            Phrase::Weighted(weight, _) => *weight,
            _ => 1.0,
        })
        .collect();
    weights.iter().all(|w| w.is_finite() && *w >= 0.0) && weights.iter().any(|w| *w > 0.0)
}
