//! The speaking capability handed to vocabulary producers.
//!
//! Every primitive a vocabulary author can reach for lives here: concept
//! lookup (`say`), weighted choice, non-repeating cycles, parameter
//! conditionals and the formatting helpers. All of them return plain
//! strings and none of them fail; recoverable misuse collapses to `""`
//! with a logged warning.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::chooser::pick_index;
use crate::core::cycle::{CycleGroup, CycleTracker};
use crate::core::format;
use crate::core::text::{self, Text};
use crate::core::vocabulary::Vocabulary;
use crate::schema::params::Params;
use crate::schema::phrase::Phrase;

/// Mutable view over one persona for the duration of an articulation.
pub struct Speaker<'a> {
    vocabulary: &'a Vocabulary,
    params: &'a mut Params,
    cycles: &'a mut CycleTracker,
    rng: &'a mut StdRng,
}

impl<'a> Speaker<'a> {
    pub(crate) fn new(
        vocabulary: &'a Vocabulary,
        params: &'a mut Params,
        cycles: &'a mut CycleTracker,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            vocabulary,
            params,
            cycles,
            rng,
        }
    }

    /// The parameters currently in effect.
    pub fn params(&self) -> &Params {
        self.params
    }

    /// Articulate a concept with the parameters already in effect.
    pub fn say(&mut self, concept: &str) -> String {
        let vocabulary = self.vocabulary;
        match vocabulary.get(concept) {
            Some(producer) => {
                let value = producer(self);
                self.render(value)
            }
            None => {
                log::warn!("concept \"{}\" not found, using empty string", concept);
                String::new()
            }
        }
    }

    /// Replace the parameters wholesale, then articulate a concept.
    pub fn say_with(&mut self, concept: &str, params: Params) -> String {
        *self.params = params;
        self.say(concept)
    }

    pub fn cap_say(&mut self, concept: &str) -> String {
        let said = self.say(concept);
        format::capitalize(&said)
    }

    pub fn cap_say_with(&mut self, concept: &str, params: Params) -> String {
        let said = self.say_with(concept, params);
        format::capitalize(&said)
    }

    /// Collapse any value into its final string.
    ///
    /// Producers are invoked and their result rendered again, weighted
    /// wrappers render their value, numbers and `true` are stringified,
    /// and every falsy value becomes `""`.
    pub fn render(&mut self, value: impl Into<Text>) -> String {
        match value.into() {
            Text::Empty => String::new(),
            Text::Literal(s) => s,
            Text::Int(0) => String::new(),
            Text::Int(n) => n.to_string(),
            Text::Float(x) if x == 0.0 || x.is_nan() => String::new(),
            Text::Float(x) => x.to_string(),
            Text::Bool(true) => "true".to_string(),
            Text::Bool(false) => String::new(),
            Text::Producer(producer) => {
                let next = producer(self);
                self.render(next)
            }
            Text::Weighted(value, _) => self.render(*value),
        }
    }

    /// Pick one alternative by weight and render it. Bare values weigh 1.
    pub fn choose<I>(&mut self, alternatives: I) -> String
    where
        I: IntoIterator,
        I::Item: Into<Text>,
    {
        self.choose_from(normalize(alternatives), None)
    }

    /// Like [`Speaker::choose`], drawing from a one-off RNG seeded with `seed`.
    pub fn choose_seeded<I>(&mut self, seed: u64, alternatives: I) -> String
    where
        I: IntoIterator,
        I::Item: Into<Text>,
    {
        self.choose_from(normalize(alternatives), Some(seed))
    }

    pub fn weighted(&self, value: impl Into<Text>, weight: f64) -> Text {
        text::weighted(value, weight)
    }

    /// Render `value` with the given probability, otherwise `""`.
    /// The probability is clamped to `[0, 1]`; NaN counts as 0.
    pub fn chance(&mut self, value: impl Into<Text>, probability: f64) -> String {
        let p = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self.choose([text::weighted("", 1.0 - p), text::weighted(value, p)])
    }

    /// Pick an alternative not yet used in `group` since its last reset.
    pub fn cycle<I>(&mut self, group: impl Into<CycleGroup>, alternatives: I) -> String
    where
        I: IntoIterator,
        I::Item: Into<Text>,
    {
        self.cycle_from(group.into(), normalize(alternatives), None)
    }

    pub fn cycle_seeded<I>(
        &mut self,
        seed: u64,
        group: impl Into<CycleGroup>,
        alternatives: I,
    ) -> String
    where
        I: IntoIterator,
        I::Item: Into<Text>,
    {
        self.cycle_from(group.into(), normalize(alternatives), Some(seed))
    }

    /// Even odds between `""` and one of `values`.
    pub fn maybe<I>(&mut self, values: I) -> String
    where
        I: IntoIterator,
        I::Item: Into<Text>,
    {
        let inner = self.choose(values);
        self.choose([Text::from(""), Text::Literal(inner)])
    }

    /// Render the parameter at `key`, or `""` when it is absent.
    pub fn param(&mut self, key: &str) -> String {
        let value = self.params.get(key).cloned().unwrap_or_default();
        self.render(value)
    }

    /// Whether the parameter at `key` is present and truthy.
    pub fn is_set(&self, key: &str) -> bool {
        self.params.is_truthy(key)
    }

    pub fn if_then(&mut self, key: &str, then: impl Into<Text>) -> String {
        self.if_else(key, then, Text::Empty)
    }

    pub fn if_not(&mut self, key: &str, then: impl Into<Text>) -> String {
        self.if_else(key, Text::Empty, then)
    }

    /// Render `then` when the parameter is truthy, `otherwise` when not.
    /// Only the taken branch is rendered.
    pub fn if_else(
        &mut self,
        key: &str,
        then: impl Into<Text>,
        otherwise: impl Into<Text>,
    ) -> String {
        if self.is_set(key) {
            self.render(then)
        } else {
            self.render(otherwise)
        }
    }

    /// Render the value of the first case whose parameter is truthy,
    /// falling back to `default`.
    pub fn do_first<I, K, T>(&mut self, cases: I, default: impl Into<Text>) -> String
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: Into<Text>,
    {
        for (key, value) in cases {
            if self.is_set(key.as_ref()) {
                return self.render(value);
            }
        }
        self.render(default)
    }

    pub fn capitalize(&mut self, value: impl Into<Text>) -> String {
        let rendered = self.render(value);
        format::capitalize(&rendered)
    }

    pub fn sb(&mut self, value: impl Into<Text>) -> String {
        let rendered = self.render(value);
        format::space_before(&rendered)
    }

    pub fn sa(&mut self, value: impl Into<Text>) -> String {
        let rendered = self.render(value);
        format::space_after(&rendered)
    }

    pub fn sba(&mut self, value: impl Into<Text>) -> String {
        let rendered = self.render(value);
        format::space_around(&rendered)
    }

    /// Evaluate a data-driven phrase tree through the same primitives.
    pub fn expand(&mut self, phrase: &Phrase) -> String {
        match phrase {
            Phrase::Text(s) => s.clone(),
            Phrase::Say(concept) => self.say(concept),
            Phrase::CapSay(concept) => self.cap_say(concept),
            Phrase::Param(key) => self.param(key),
            Phrase::Seq(parts) => parts.iter().map(|part| self.expand(part)).collect(),
            Phrase::Weighted(_, inner) => self.expand(inner),
            Phrase::Choose(alternatives) => {
                self.choose(alternatives.iter().map(Phrase::to_alternative))
            }
            Phrase::Cycle {
                group,
                alternatives,
            } => self.cycle(group.as_str(), alternatives.iter().map(Phrase::to_alternative)),
            Phrase::Chance {
                phrase,
                probability,
            } => self.chance(Text::from(phrase.as_ref().clone()), *probability),
            Phrase::Maybe(alternatives) => {
                self.maybe(alternatives.iter().map(Phrase::to_alternative))
            }
            Phrase::IfThen { param, then } => {
                self.if_then(param, Text::from(then.as_ref().clone()))
            }
            Phrase::IfNot { param, then } => self.if_not(param, Text::from(then.as_ref().clone())),
            Phrase::IfElse {
                param,
                then,
                otherwise,
            } => {
                if self.is_set(param) {
                    self.expand(then)
                } else {
                    self.expand(otherwise)
                }
            }
            Phrase::DoFirst { cases, default } => {
                match cases.iter().find(|(param, _)| self.is_set(param)) {
                    Some((_, chosen)) => self.expand(chosen),
                    None => self.expand(default),
                }
            }
            Phrase::Capitalize(inner) => {
                let expanded = self.expand(inner);
                format::capitalize(&expanded)
            }
            Phrase::SpaceBefore(inner) => {
                let expanded = self.expand(inner);
                format::space_before(&expanded)
            }
            Phrase::SpaceAfter(inner) => {
                let expanded = self.expand(inner);
                format::space_after(&expanded)
            }
            Phrase::SpaceAround(inner) => {
                let expanded = self.expand(inner);
                format::space_around(&expanded)
            }
        }
    }

    fn pick(&mut self, weights: &[f64], seed: Option<u64>) -> Option<usize> {
        match seed {
            Some(seed) => pick_index(weights, &mut StdRng::seed_from_u64(seed)),
            None => pick_index(weights, &mut *self.rng),
        }
    }

    fn choose_from(&mut self, mut alternatives: Vec<(Text, f64)>, seed: Option<u64>) -> String {
        let weights: Vec<f64> = alternatives.iter().map(|(_, weight)| *weight).collect();
        match self.pick(&weights, seed) {
            Some(index) => {
                log::trace!("chose alternative {} of {}", index, weights.len());
                let (value, _) = alternatives.swap_remove(index);
                self.render(value)
            }
            None => {
                log::warn!(
                    "no selectable alternative among weights {:?}, using empty string",
                    weights
                );
                String::new()
            }
        }
    }

    fn cycle_from(
        &mut self,
        group: CycleGroup,
        alternatives: Vec<(Text, f64)>,
        seed: Option<u64>,
    ) -> String {
        let rendered: Vec<(String, f64)> = alternatives
            .into_iter()
            .map(|(value, weight)| (self.render(value), weight))
            .collect();

        let candidates = self.cycles.candidates(group.name(), &rendered);
        let weights: Vec<f64> = candidates.iter().map(|&i| rendered[i].1).collect();
        match self.pick(&weights, seed) {
            Some(index) => {
                let chosen = rendered[candidates[index]].0.clone();
                self.cycles.record(group.name(), chosen.clone());
                chosen
            }
            None => {
                log::warn!(
                    "no selectable alternative in cycle group '{}' among weights {:?}, using empty string",
                    group.name(),
                    weights
                );
                String::new()
            }
        }
    }
}

fn normalize<I>(alternatives: I) -> Vec<(Text, f64)>
where
    I: IntoIterator,
    I::Item: Into<Text>,
{
    alternatives
        .into_iter()
        .map(|alternative| alternative.into().into_weighted())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::text::weighted;
    use rand::Rng;
    use std::collections::HashSet;

    struct Fixture {
        vocabulary: Vocabulary,
        params: Params,
        cycles: CycleTracker,
        rng: StdRng,
    }

    impl Fixture {
        fn new(vocabulary: Vocabulary) -> Self {
            Self {
                vocabulary,
                params: Params::new(),
                cycles: CycleTracker::new(),
                rng: StdRng::seed_from_u64(42),
            }
        }

        fn speaker(&mut self) -> Speaker<'_> {
            Speaker::new(
                &self.vocabulary,
                &mut self.params,
                &mut self.cycles,
                &mut self.rng,
            )
        }
    }

    fn empty() -> Fixture {
        Fixture::new(Vocabulary::new())
    }

    #[test]
    fn render_literals_unchanged() {
        let mut fx = empty();
        let mut s = fx.speaker();
        assert_eq!(s.render("x"), "x");
        assert_eq!(s.render("  spaced  "), "  spaced  ");
    }

    #[test]
    fn render_falsy_collapses() {
        let mut fx = empty();
        let mut s = fx.speaker();
        assert_eq!(s.render(Text::Empty), "");
        assert_eq!(s.render(""), "");
        assert_eq!(s.render(0), "");
        assert_eq!(s.render(0.0), "");
        assert_eq!(s.render(f64::NAN), "");
        assert_eq!(s.render(false), "");
    }

    #[test]
    fn render_stringifies_truthy_scalars() {
        let mut fx = empty();
        let mut s = fx.speaker();
        assert_eq!(s.render(12345), "12345");
        assert_eq!(s.render(1.5), "1.5");
        assert_eq!(s.render(2.0), "2");
        assert_eq!(s.render(true), "true");
    }

    #[test]
    fn render_unwraps_weighted_and_producers() {
        let mut fx = empty();
        let mut s = fx.speaker();
        assert_eq!(s.render(weighted("woof", 100.0)), "woof");
        assert_eq!(s.render(Text::deferred(|_| Text::deferred(|_| "nested"))), "nested");
        assert_eq!(s.render(weighted(Text::deferred(|_| "deep"), 0.5)), "deep");
    }

    #[test]
    fn say_missing_concept_is_empty() {
        let mut fx = empty();
        assert_eq!(fx.speaker().say("meow"), "");
    }

    #[test]
    fn say_resolves_nested_concepts() {
        let vocabulary = Vocabulary::new()
            .with("howl", |_| "howl")
            .with("loud", |s| s.cap_say("howl"));
        let mut fx = Fixture::new(vocabulary);
        assert_eq!(fx.speaker().say("loud"), "Howl");
    }

    #[test]
    fn say_with_replaces_params() {
        let vocabulary = Vocabulary::new().with("name", |s| s.param("name"));
        let mut fx = Fixture::new(vocabulary);
        let mut s = fx.speaker();
        assert_eq!(s.say_with("name", Params::new().with("name", "Justin")), "Justin");
        assert_eq!(s.say("name"), "Justin");
        assert_eq!(s.say_with("name", Params::new().with("other", "x")), "");
    }

    #[test]
    fn choose_membership() {
        let mut fx = empty();
        let mut s = fx.speaker();
        for _ in 0..50 {
            let picked = s.choose(["woof", "bark", "ruff"]);
            assert!(["woof", "bark", "ruff"].contains(&picked.as_str()));
        }
    }

    #[test]
    fn choose_renders_only_the_pick() {
        let mut fx = empty();
        let mut s = fx.speaker();
        let picked = s.choose([
            weighted(Text::deferred(|_| "chosen"), 1.0),
            weighted(Text::deferred(|_| -> Text { panic!("rendered unselected") }), 0.0),
        ]);
        assert_eq!(picked, "chosen");
    }

    #[test]
    fn choose_degenerate_is_empty() {
        let mut fx = empty();
        let mut s = fx.speaker();
        assert_eq!(s.choose(Vec::<Text>::new()), "");
        assert_eq!(s.choose([weighted("never", 0.0)]), "");
    }

    #[test]
    fn choose_weighted_dominance() {
        let mut fx = empty();
        let mut s = fx.speaker();
        for _ in 0..100 {
            let picked = s.choose([
                weighted("woof", 1e6),
                weighted("bark", 1e-5),
                weighted("ruff", 1e-5),
            ]);
            assert_eq!(picked, "woof");
        }
    }

    #[test]
    fn choose_seeded_is_reproducible() {
        let mut fx = empty();
        let mut s = fx.speaker();
        let options = ["a", "b", "c", "d", "e", "f"];
        let first = s.choose_seeded(7, options);
        for _ in 0..10 {
            assert_eq!(s.choose_seeded(7, options), first);
        }
    }

    #[test]
    fn chance_bounds() {
        let mut fx = empty();
        let mut s = fx.speaker();
        for _ in 0..50 {
            assert_eq!(s.chance("x", 0.0), "");
            assert_eq!(s.chance("x", 1.0), "x");
            assert_eq!(s.chance("x", -3.0), "");
            assert_eq!(s.chance("x", 7.0), "x");
            assert_eq!(s.chance("x", f64::NAN), "");
        }
    }

    #[test]
    fn cycle_never_repeats_within_a_round() {
        let mut fx = empty();
        let mut s = fx.speaker();
        for _ in 0..10 {
            let round: HashSet<String> = (0..3)
                .map(|_| s.cycle("greet", ["woof", "bark", "ruff"]))
                .collect();
            assert_eq!(round.len(), 3);
        }
    }

    #[test]
    fn cycle_skips_zero_weights() {
        let mut fx = empty();
        let mut s = fx.speaker();
        for _ in 0..10 {
            let picked = s.cycle("g", [weighted("never", 0.0), Text::from("always")]);
            assert_eq!(picked, "always");
        }
    }

    #[test]
    fn cycle_all_zero_is_empty_and_unrecorded() {
        let mut fx = empty();
        {
            let mut s = fx.speaker();
            assert_eq!(s.cycle("g", [weighted("never", 0.0)]), "");
        }
        assert!(fx.cycles.used("g").is_empty());
    }

    #[test]
    fn maybe_membership() {
        let mut fx = empty();
        let mut s = fx.speaker();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let picked = s.maybe(["scratch", "dig", "burrow"]);
            assert!(["scratch", "dig", "burrow", ""].contains(&picked.as_str()));
            seen.insert(picked);
        }
        assert!(seen.contains(""));
        assert!(seen.len() > 1);
    }

    #[test]
    fn conditionals() {
        let mut fx = empty();
        let mut s = fx.speaker();
        *s.params = Params::new().with("k", true);
        assert_eq!(s.if_else("k", "Y", "N"), "Y");
        assert_eq!(s.if_then("k", "Y"), "Y");
        assert_eq!(s.if_not("k", "N"), "");

        *s.params = Params::new().with("k", false);
        assert_eq!(s.if_else("k", "Y", "N"), "N");
        assert_eq!(s.if_then("k", "Y"), "");
        assert_eq!(s.if_not("k", "N"), "N");

        *s.params = Params::new();
        assert_eq!(s.if_else("k", "Y", "N"), "N");
    }

    #[test]
    fn if_else_renders_only_taken_branch() {
        let mut fx = empty();
        let mut s = fx.speaker();
        let out = s.if_else(
            "missing",
            Text::deferred(|_| -> Text { panic!("rendered untaken branch") }),
            "fallback",
        );
        assert_eq!(out, "fallback");
    }

    #[test]
    fn do_first_ordering() {
        let mut fx = empty();
        let mut s = fx.speaker();
        *s.params = Params::new().with("b", true);
        assert_eq!(s.do_first([("a", "A"), ("b", "B")], "D"), "B");

        *s.params = Params::new().with("a", 1).with("b", true);
        assert_eq!(s.do_first([("a", "A"), ("b", "B")], "D"), "A");

        *s.params = Params::new();
        assert_eq!(s.do_first([("a", "A"), ("b", "B")], "D"), "D");
        assert_eq!(s.do_first([("a", "A")], Text::Empty), "");
    }

    #[test]
    fn param_renders_producers_and_numbers() {
        let mut fx = empty();
        let mut s = fx.speaker();
        *s.params = Params::new()
            .with("name", Text::deferred(|_| "Justin"))
            .with("number", 12345);
        assert_eq!(s.param("name"), "Justin");
        assert_eq!(s.param("number"), "12345");
        assert_eq!(s.param("absent"), "");
    }

    #[test]
    fn formatting_helpers_render_first() {
        let vocabulary = Vocabulary::new().with("howl", |_| "howl");
        let mut fx = Fixture::new(vocabulary);
        let mut s = fx.speaker();
        assert_eq!(s.capitalize(Text::deferred(|s| s.say("howl"))), "Howl");
        assert_eq!(s.sb("howl"), " howl");
        assert_eq!(s.sa("howl"), "howl ");
        assert_eq!(s.sba("howl"), " howl ");
    }

    #[test]
    fn expand_phrase_tree() {
        let vocabulary = Vocabulary::new().with("howl", |_| "howl");
        let mut fx = Fixture::new(vocabulary);
        let mut s = fx.speaker();
        *s.params = Params::new().with("angry", true);

        let phrase = Phrase::Seq(vec![
            Phrase::CapSay("howl".to_string()),
            Phrase::Text("!".to_string()),
            Phrase::SpaceBefore(Box::new(Phrase::IfElse {
                param: "angry".to_string(),
                then: Box::new(Phrase::Text("grr".to_string())),
                otherwise: Box::new(Phrase::Text("wag".to_string())),
            })),
        ]);
        assert_eq!(s.expand(&phrase), "Howl! grr");
    }

    #[test]
    fn expand_choose_respects_weights() {
        let mut fx = empty();
        let mut s = fx.speaker();
        let phrase = Phrase::Choose(vec![
            Phrase::Weighted(0.0, Box::new(Phrase::Text("never".to_string()))),
            Phrase::Text("always".to_string()),
        ]);
        for _ in 0..20 {
            assert_eq!(s.expand(&phrase), "always");
        }
    }

    #[test]
    fn cycle_seeded_never_repeats_within_a_round() {
        let mut fx = empty();
        let mut s = fx.speaker();
        for _ in 0..4 {
            let round: HashSet<String> = (0..3)
                .map(|_| s.cycle_seeded(9, "letters", ["a", "b", "c"]))
                .collect();
            assert_eq!(round.len(), 3);
        }
    }

    #[test]
    fn cycle_seeded_is_reproducible_and_leaves_rng_alone() {
        let draw = |fx: &mut Fixture| -> Vec<String> {
            let mut s = fx.speaker();
            (0..6)
                .map(|_| s.cycle_seeded(9, "letters", ["a", "b", "c"]))
                .collect()
        };
        let mut first = empty();
        let mut second = empty();
        assert_eq!(draw(&mut first), draw(&mut second));
        assert_eq!(first.cycles.used("letters").len(), 3);

        let mut untouched = StdRng::seed_from_u64(42);
        assert_eq!(first.rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn expand_chance_matches_primitive() {
        let mut fx = empty();
        let mut s = fx.speaker();
        let chance = |probability: f64| Phrase::Chance {
            phrase: Box::new(Phrase::Text("x".to_string())),
            probability,
        };
        for _ in 0..20 {
            assert_eq!(s.expand(&chance(1.0)), s.chance("x", 1.0));
            assert_eq!(s.expand(&chance(0.0)), "");
            assert_eq!(s.expand(&chance(7.0)), "x");
        }
    }

    #[test]
    fn expand_if_then_and_if_not_match_primitives() {
        let vocabulary = Vocabulary::new().with("howl", |_| "howl");
        let mut fx = Fixture::new(vocabulary);
        let mut s = fx.speaker();
        let if_then = Phrase::IfThen {
            param: "angry".to_string(),
            then: Box::new(Phrase::Say("howl".to_string())),
        };
        let if_not = Phrase::IfNot {
            param: "angry".to_string(),
            then: Box::new(Phrase::Text("sniff".to_string())),
        };

        *s.params = Params::new().with("angry", true);
        assert_eq!(s.expand(&if_then), "howl");
        assert_eq!(s.expand(&if_not), "");
        assert_eq!(s.expand(&if_not), s.if_not("angry", "sniff"));

        *s.params = Params::new().with("angry", false);
        assert_eq!(s.expand(&if_then), "");
        assert_eq!(s.expand(&if_then), s.if_then("angry", "howl"));
        assert_eq!(s.expand(&if_not), "sniff");
    }

    #[test]
    fn expand_weighted_cycle_skips_zero_and_never_repeats() {
        let mut fx = empty();
        let mut s = fx.speaker();
        let phrase = Phrase::Cycle {
            group: "greet".to_string(),
            alternatives: vec![
                Phrase::Weighted(0.0, Box::new(Phrase::Text("never".to_string()))),
                Phrase::Weighted(5.0, Box::new(Phrase::Text("woof".to_string()))),
                Phrase::Text("bark".to_string()),
            ],
        };
        for _ in 0..10 {
            let round: HashSet<String> = (0..2).map(|_| s.expand(&phrase)).collect();
            assert!(!round.contains("never"));
            assert_eq!(round.len(), 2);
        }
    }
}
