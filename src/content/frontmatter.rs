//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Delimiter line that opens and closes a YAML front-matter block
const DELIMITER: &str = "---";

/// Front-matter data from a post or page
///
/// Keys are kept in the order they were written. No schema is applied: any
/// key may be absent and any value may have an unexpected type, so the typed
/// accessors coerce scalars to strings instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(rest) = strip_opening_delimiter(content) else {
            return Ok((FrontMatter::default(), content));
        };

        // Find the closing --- line
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end_matches(['\n', '\r']) == DELIMITER {
                let yaml_content = &rest[..offset];
                let remaining = &rest[offset + line.len()..];
                return Ok((Self::from_yaml(yaml_content)?, remaining));
            }
            offset += line.len();
        }

        // No closing ---, treat as no front-matter
        Ok((FrontMatter::default(), content))
    }

    fn from_yaml(yaml_content: &str) -> Result<Self, serde_yaml::Error> {
        if yaml_content.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let fields: Option<IndexMap<String, Value>> = serde_yaml::from_str(yaml_content)?;
        Ok(Self {
            fields: fields.unwrap_or_default(),
        })
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Value for a key coerced to a string; `null` counts as absent
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(value_to_string)
    }

    /// Like [`get_str`](Self::get_str), but `false`, zero and empty strings
    /// also count as absent so that callers can fall back to a default
    pub fn get_nonempty(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            value => value_to_string(value).filter(|s| !s.is_empty()),
        }
    }

    pub fn title(&self) -> Option<String> {
        self.get_nonempty("title")
    }

    pub fn date(&self) -> Option<String> {
        self.get_nonempty("date")
    }

    pub fn excerpt(&self) -> Option<String> {
        self.get_str("excerpt")
    }

    pub fn hero_image(&self) -> Option<String> {
        self.get_str("hero_image")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

/// Returns the text after the opening `---` line, if the content starts with one
fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let (first, rest) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };
    (first.trim_end_matches('\r') == DELIMITER).then_some(rest)
}

/// Coerce a YAML value to a string: scalars are printed, collections become
/// compact JSON
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Sequence(_) | Value::Mapping(_) => serde_json::to_string(value).ok(),
        Value::Tagged(tagged) => value_to_string(&tagged.value),
    }
}
