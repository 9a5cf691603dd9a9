//! Persona Engine: a varied, non-repetitive voice for chatbots and NPCs.
//!
//! A persona maps concept names to producers built from a handful of
//! primitives: weighted choice, non-repeating cycles, parameter
//! conditionals and nested concept references. Articulating a concept
//! resolves the whole tree down to a single string.

pub mod core;
pub mod schema;
