//! The resolution engine.

pub mod chooser;
pub mod cycle;
pub mod format;
pub mod persona;
pub mod speaker;
pub mod text;
pub mod vocabulary;
