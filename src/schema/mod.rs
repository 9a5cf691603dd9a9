//! Data carried into and described by a persona.

pub mod params;
pub mod phrase;
