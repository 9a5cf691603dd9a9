//! WASM bindings for persona-engine: powers the interactive web demo.

use serde_json::Value;
use wasm_bindgen::prelude::*;

use persona_engine::core::persona::Persona;
use persona_engine::core::text::Text;
use persona_engine::core::vocabulary::Vocabulary;
use persona_engine::schema::params::Params;

// ---------------------------------------------------------------------------
// Embedded personas: compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const DOG: &str = include_str!("../../personas/dog.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct PersonaInfo<'a> {
    name: &'a str,
    concepts: Vec<&'a str>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a JSON value into a parameter value. Arrays and objects are
/// kept as their JSON text, which is always truthy.
fn json_to_text(value: Value) -> Text {
    match value {
        Value::Null => Text::Empty,
        Value::Bool(b) => Text::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Text::Int(i),
            None => n.as_f64().map(Text::Float).unwrap_or_default(),
        },
        Value::String(s) => Text::Literal(s),
        other => Text::Literal(other.to_string()),
    }
}

fn parse_params(params_json: Option<String>) -> Result<Params, JsError> {
    let Some(json) = params_json.filter(|s| !s.trim().is_empty()) else {
        return Ok(Params::new());
    };
    let map: serde_json::Map<String, Value> = serde_json::from_str(&json)
        .map_err(|e| JsError::new(&format!("Invalid params JSON: {e}")))?;
    Ok(map
        .into_iter()
        .map(|(key, value)| (key, json_to_text(value)))
        .collect())
}

// ---------------------------------------------------------------------------
// WasmPersona: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct WasmPersona {
    persona: Persona,
}

#[wasm_bindgen]
impl WasmPersona {
    /// Create a persona from RON vocabulary text.
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str, vocabulary_ron: &str, seed: u64) -> Result<WasmPersona, JsError> {
        let vocabulary = Vocabulary::parse_ron(vocabulary_ron)
            .map_err(|e| JsError::new(&format!("Vocabulary parse error: {e}")))?;
        let persona = Persona::builder()
            .name(name)
            .seed(seed)
            .with_vocabulary(vocabulary)
            .build()
            .map_err(|e| JsError::new(&format!("Persona build error: {e}")))?;
        Ok(WasmPersona { persona })
    }

    /// The bundled dog persona.
    pub fn dog(seed: u64) -> Result<WasmPersona, JsError> {
        WasmPersona::new("max", data::DOG, seed)
    }

    /// Articulate a concept. `params_json` is an optional JSON object such
    /// as `{"name": "justin", "angry": true}`.
    pub fn articulate(&mut self, concept: &str, params_json: Option<String>) -> Result<String, JsError> {
        let params = parse_params(params_json)?;
        Ok(self.persona.articulate_with(concept, params))
    }

    /// Articulate the same concept several times. Returns a JSON array of strings.
    pub fn articulate_variants(
        &mut self,
        concept: &str,
        params_json: Option<String>,
        count: usize,
    ) -> Result<String, JsError> {
        let params = parse_params(params_json)?;
        let variants = self.persona.articulate_variants(concept, &params, count);
        serde_json::to_string(&variants)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Known concept names, sorted, as a JSON array.
    pub fn concepts(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.persona.vocabulary().concepts())
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Persona name and concept list as JSON.
    pub fn info(&self) -> Result<String, JsError> {
        let info = PersonaInfo {
            name: self.persona.name(),
            concepts: self.persona.vocabulary().concepts(),
        };
        serde_json::to_string(&info)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Reseed the RNG and forget cycle history.
    pub fn reset(&mut self, seed: u64) {
        self.persona.reseed(seed);
        self.persona.reset_cycles();
    }
}
