//! Non-repeating selection memory, kept per named group.

use rustc_hash::FxHashMap;

/// Names the pool a `cycle` call draws from. Calls sharing a group share
/// their history of recently used values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CycleGroup(pub String);

impl CycleGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CycleGroup {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for CycleGroup {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Used-value history for every cycle group a persona has touched.
#[derive(Debug, Clone, Default)]
pub struct CycleTracker {
    groups: FxHashMap<String, Vec<String>>,
}

impl CycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values drawn in `group` since its last reset, oldest first.
    pub fn used(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices into `rendered` that may be drawn next.
    ///
    /// An alternative is fresh when its weight is nonzero and its rendered
    /// value is not in the group's history. When nothing is fresh, every
    /// alternative becomes a candidate again and one history entry per
    /// alternative is removed. History belonging to values outside this
    /// call's alternatives is left alone.
    pub fn candidates(&mut self, group: &str, rendered: &[(String, f64)]) -> Vec<usize> {
        let used = self.groups.entry(group.to_string()).or_default();

        let fresh: Vec<usize> = rendered
            .iter()
            .enumerate()
            .filter(|(_, (value, weight))| *weight != 0.0 && !used.contains(value))
            .map(|(i, _)| i)
            .collect();
        if !fresh.is_empty() {
            return fresh;
        }

        for (value, _) in rendered {
            if let Some(pos) = used.iter().position(|u| u == value) {
                used.remove(pos);
            }
        }
        log::debug!(
            "cycle group '{}' exhausted, {} entries left in history",
            group,
            used.len()
        );
        (0..rendered.len()).collect()
    }

    /// Append a drawn value to the group's history.
    pub fn record(&mut self, group: &str, value: String) {
        self.groups.entry(group.to_string()).or_default().push(value);
    }

    /// Forget every group's history.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
