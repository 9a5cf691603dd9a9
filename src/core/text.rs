//! Producible values: everything a vocabulary entry or primitive can hand
//! back before it is rendered down to a plain string.

use std::fmt;
use std::sync::Arc;

use crate::core::speaker::Speaker;

/// A deferred value, invoked with the speaking persona when rendered.
pub type Producer = Arc<dyn Fn(&mut Speaker<'_>) -> Text + Send + Sync>;

/// A value that renders to a string.
///
/// Rendering always terminates in a string as long as producers do not
/// refer back to themselves without a terminating branch.
#[derive(Clone, Default)]
pub enum Text {
    /// No value at all. Renders to the empty string.
    #[default]
    Empty,
    /// Literal text, emitted as-is.
    Literal(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A zero-argument callable, resolved lazily.
    Producer(Producer),
    /// A value paired with a selection weight. The weight only matters to
    /// the chooser; rendering discards it.
    Weighted(Box<Text>, f64),
}

impl Text {
    /// Wrap a closure as a deferred producer.
    pub fn deferred<F, T>(f: F) -> Text
    where
        F: Fn(&mut Speaker<'_>) -> T + Send + Sync + 'static,
        T: Into<Text>,
    {
        Text::Producer(Arc::new(move |speaker: &mut Speaker<'_>| f(speaker).into()))
    }

    /// Truthiness as used by the conditional primitives.
    ///
    /// `Empty`, `""`, `0`, `0.0`, `NaN` and `false` are falsy. Producers
    /// and weighted wrappers are truthy without being invoked.
    pub fn is_truthy(&self) -> bool {
        match self {
            Text::Empty => false,
            Text::Literal(s) => !s.is_empty(),
            Text::Int(n) => *n != 0,
            Text::Float(f) => *f != 0.0 && !f.is_nan(),
            Text::Bool(b) => *b,
            Text::Producer(_) | Text::Weighted(..) => true,
        }
    }

    /// Split into the value and its selection weight. Anything that is not
    /// explicitly weighted counts as weight 1.
    pub fn into_weighted(self) -> (Text, f64) {
        match self {
            Text::Weighted(value, weight) => (*value, weight),
            other => (other, 1.0),
        }
    }
}

/// Pair a value with a selection weight.
pub fn weighted(value: impl Into<Text>, weight: f64) -> Text {
    Text::Weighted(Box::new(value.into()), weight)
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Text::Empty => write!(f, "Empty"),
            Text::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Text::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Text::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Text::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Text::Producer(_) => write!(f, "Producer(..)"),
            Text::Weighted(value, weight) => {
                f.debug_tuple("Weighted").field(value).field(weight).finish()
            }
        }
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::Literal(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::Literal(s)
    }
}

impl From<&String> for Text {
    fn from(s: &String) -> Self {
        Text::Literal(s.clone())
    }
}

impl From<i64> for Text {
    fn from(n: i64) -> Self {
        Text::Int(n)
    }
}

impl From<i32> for Text {
    fn from(n: i32) -> Self {
        Text::Int(n.into())
    }
}

impl From<f64> for Text {
    fn from(x: f64) -> Self {
        Text::Float(x)
    }
}

impl From<bool> for Text {
    fn from(b: bool) -> Self {
        Text::Bool(b)
    }
}

impl<T: Into<Text>> From<Option<T>> for Text {
    fn from(value: Option<T>) -> Self {
        value.map_or(Text::Empty, Into::into)
    }
}
