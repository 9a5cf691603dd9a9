use serde::{Deserialize, Serialize};

use crate::core::text::{self, Text};

/// A data-driven vocabulary entry: a resolver tree mirroring the speaking
/// primitives, so concepts can be authored in RON instead of code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Phrase {
    /// Literal text, emitted as-is.
    Text(String),
    /// Another concept, with the parameters in effect.
    Say(String),
    CapSay(String),
    Param(String),
    /// Parts concatenated in order.
    Seq(Vec<Phrase>),
    /// Only meaningful as an alternative of `Choose`, `Cycle` or `Maybe`.
    /// Anywhere else the weight is ignored.
    Weighted(f64, Box<Phrase>),
    Choose(Vec<Phrase>),
    Cycle {
        group: String,
        alternatives: Vec<Phrase>,
    },
    Chance {
        phrase: Box<Phrase>,
        probability: f64,
    },
    Maybe(Vec<Phrase>),
    IfThen {
        param: String,
        then: Box<Phrase>,
    },
    IfNot {
        param: String,
        then: Box<Phrase>,
    },
    IfElse {
        param: String,
        then: Box<Phrase>,
        otherwise: Box<Phrase>,
    },
    DoFirst {
        cases: Vec<(String, Phrase)>,
        #[serde(default)]
        default: Box<Phrase>,
    },
    Capitalize(Box<Phrase>),
    SpaceBefore(Box<Phrase>),
    SpaceAfter(Box<Phrase>),
    SpaceAround(Box<Phrase>),
}

impl Default for Phrase {
    fn default() -> Self {
        Phrase::Text(String::new())
    }
}

impl Phrase {
    /// Convert into a chooser alternative, lifting a top-level `Weighted`
    /// into a weighted text. Evaluation stays deferred until picked.
    pub fn to_alternative(&self) -> Text {
        match self {
            Phrase::Weighted(weight, inner) => text::weighted(inner.as_ref().clone(), *weight),
            other => Text::from(other.clone()),
        }
    }

    /// Visit this phrase and every phrase nested inside it, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Phrase)) {
        visit(self);
        match self {
            Phrase::Text(_) | Phrase::Say(_) | Phrase::CapSay(_) | Phrase::Param(_) => {}
            Phrase::Seq(parts)
            | Phrase::Choose(parts)
            | Phrase::Maybe(parts)
            | Phrase::Cycle {
                alternatives: parts,
                ..
            } => {
                for part in parts {
                    part.walk(visit);
                }
            }
            Phrase::Weighted(_, inner)
            | Phrase::Chance { phrase: inner, .. }
            | Phrase::IfThen { then: inner, .. }
            | Phrase::IfNot { then: inner, .. }
            | Phrase::Capitalize(inner)
            | Phrase::SpaceBefore(inner)
            | Phrase::SpaceAfter(inner)
            | Phrase::SpaceAround(inner) => inner.walk(visit),
            Phrase::IfElse {
                then, otherwise, ..
            } => {
                then.walk(visit);
                otherwise.walk(visit);
            }
            Phrase::DoFirst { cases, default } => {
                for (_, case) in cases {
                    case.walk(visit);
                }
                default.walk(visit);
            }
        }
    }

    /// Every concept name this phrase refers to via `Say`/`CapSay`.
    pub fn referenced_concepts(&self) -> Vec<&str> {
        let mut concepts = Vec::new();
        self.walk(&mut |phrase| {
            if let Phrase::Say(name) | Phrase::CapSay(name) = phrase {
                concepts.push(name.as_str());
            }
        });
        concepts
    }
}

impl From<Phrase> for Text {
    fn from(phrase: Phrase) -> Self {
        match phrase {
            Phrase::Text(s) => Text::Literal(s),
            other => Text::deferred(move |speaker| speaker.expand(&other)),
        }
    }
}
