//! Drink customization options attached to a line item

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separator between option parts in line ids and display text
const PART_SEPARATOR: &str = ", ";

/// Identity key used when no option is set
pub const DEFAULT_OPTIONS_KEY: &str = "default";

/// Canonical `{size, milk, extras}` shape.
///
/// `extras` is an ordered set: trimmed, no blanks, no duplicates, insertion
/// order kept for display. The identity key sorts it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOptions {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub milk: String,
    #[serde(default)]
    pub extras: Vec<String>,
}

impl LineOptions {
    pub fn new<I, S>(size: &str, milk: &str, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self {
            size: size.trim().to_string(),
            milk: milk.trim().to_string(),
            extras: Vec::new(),
        };
        for extra in extras {
            options.push_extra(extra.as_ref());
        }
        options
    }

    /// Coerce any partial or malformed JSON value into the canonical shape.
    ///
    /// Non-objects become empty options. Non-string `size`/`milk` become
    /// empty. Only string entries of an `extras` array are kept.
    pub fn normalize(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::default();
        };

        let text = |key: &str| obj.get(key).and_then(Value::as_str).unwrap_or_default();
        let extras = obj
            .get("extras")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();

        Self::new(text("size"), text("milk"), extras)
    }

    /// Re-apply the canonical rules to an already typed value
    pub fn normalized(&self) -> Self {
        Self::new(&self.size, &self.milk, &self.extras)
    }

    fn push_extra(&mut self, extra: &str) {
        let extra = extra.trim();
        if !extra.is_empty() && !self.extras.iter().any(|e| e == extra) {
            self.extras.push(extra.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty() && self.milk.is_empty() && self.extras.is_empty()
    }

    /// Stable identity rendering: extras sorted, `"default"` when nothing is set
    pub fn identity_key(&self) -> String {
        let mut extras = self.extras.clone();
        extras.sort();
        let key = join_parts(&self.size, &self.milk, &extras);
        if key.is_empty() {
            DEFAULT_OPTIONS_KEY.to_string()
        } else {
            key
        }
    }

    /// Human rendering in insertion order; empty string when nothing is set
    pub fn display_text(&self) -> String {
        join_parts(&self.size, &self.milk, &self.extras)
    }
}

fn join_parts(size: &str, milk: &str, extras: &[String]) -> String {
    let extras = extras.join(PART_SEPARATOR);
    [size, milk, extras.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(PART_SEPARATOR)
}
