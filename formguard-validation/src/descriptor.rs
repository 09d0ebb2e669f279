// Field descriptor extraction

use crate::{FieldValue, InputElement};
use formguard_log::warn;
use std::str::FromStr;

/// Dataset key holding the pipe-delimited rule chain
pub const RULES_KEY: &str = "rules";
/// Dataset key holding pipe-delimited custom messages
pub const MESSAGES_KEY: &str = "messages";
/// Dataset key holding the `minlength` minimum
pub const LENGTH_KEY: &str = "length";
/// Dataset key holding the `file` extension allow-list
pub const EXTENSION_KEY: &str = "extension";
/// Dataset key holding the `file` size limit in bytes
pub const SIZE_KEY: &str = "size";

/// Rule-specific settings attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfig {
    pub min_length: Option<usize>,
    /// Lowercased extensions without the leading dot
    pub allowed_extensions: Option<Vec<String>>,
    pub max_size: Option<u64>,
}

/// A field's rule chain, custom messages, configuration and value,
/// read from its element for one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub id: String,
    /// Rule names in evaluation order
    pub rules: Vec<String>,
    /// Custom messages aligned with `rules` by position
    pub messages: Option<Vec<String>>,
    pub config: RuleConfig,
    pub value: FieldValue,
}

impl FieldDescriptor {
    /// Read the descriptor from an element's dataset.
    ///
    /// Empty chain segments are dropped together with the custom message
    /// declared at the same position. Malformed numeric attributes are
    /// logged and read as absent.
    pub fn extract(element: &InputElement) -> Self {
        // declared positions of the non-empty segments
        let (positions, rules): (Vec<usize>, Vec<String>) = element
            .data(RULES_KEY)
            .map(|chain| {
                chain
                    .split('|')
                    .map(str::trim)
                    .enumerate()
                    .filter(|(_, rule)| !rule.is_empty())
                    .map(|(position, rule)| (position, rule.to_string()))
                    .unzip()
            })
            .unwrap_or_default();

        // realigned with the surviving rules
        let messages = element.data(MESSAGES_KEY).map(|raw| {
            let declared: Vec<&str> = raw.split('|').collect();
            positions
                .iter()
                .map_while(|&position| declared.get(position).map(|m| m.to_string()))
                .collect()
        });

        let allowed_extensions = element.data(EXTENSION_KEY).map(|raw| {
            raw.split('|')
                .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect()
        });

        Self {
            id: element.id().to_string(),
            rules,
            messages,
            config: RuleConfig {
                min_length: parse_data(element, LENGTH_KEY),
                allowed_extensions,
                max_size: parse_data(element, SIZE_KEY),
            },
            value: element.value().clone(),
        }
    }

    /// The value as rules see it, see [`normalize`].
    pub fn normalized_value(&self) -> String {
        normalize(self.value.as_text())
    }

    /// Custom message for a chain position, if one was declared there.
    pub fn custom_message(&self, position: usize) -> Option<&str> {
        self.messages
            .as_ref()
            .and_then(|messages| messages.get(position))
            .map(String::as_str)
    }
}

fn parse_data<T: FromStr>(element: &InputElement, key: &str) -> Option<T> {
    let raw = element.data(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                "ignoring malformed '{}' attribute '{}' on field '{}'",
                key,
                raw,
                element.id()
            );
            None
        }
    }
}

/// Strip leading and trailing whitespace and collapse inner runs to one space.
pub fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
