//! Stateless string helpers.

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn space_before(text: &str) -> String {
    format!(" {}", text)
}

pub fn space_after(text: &str) -> String {
    format!("{} ", text)
}

pub fn space_around(text: &str) -> String {
    format!(" {} ", text)
}
