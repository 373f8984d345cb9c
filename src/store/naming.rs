use log::warn;

use crate::error::Result;

/// Turns a free-form element name into a programmatic identifier
pub trait NameTranslator {
    fn translate(&self, display_name: &str) -> Result<String>;
}

/// Always answers with the same identifier
#[derive(Debug, Clone)]
pub struct PlaceholderTranslator {
    identifier: String,
}

impl PlaceholderTranslator {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl NameTranslator for PlaceholderTranslator {
    fn translate(&self, _display_name: &str) -> Result<String> {
        Ok(self.identifier.clone())
    }
}

/// Identifier for `display_name`, or `fallback` when the translator fails or
/// answers with nothing usable.
pub fn identifier_for(
    translator: &dyn NameTranslator,
    display_name: &str,
    fallback: &str,
) -> String {
    match translator.translate(display_name) {
        Ok(identifier) if !identifier.trim().is_empty() => identifier,
        Ok(_) => {
            warn!("Empty identifier for {:?}, using {}", display_name, fallback);
            fallback.to_string()
        }
        Err(e) => {
            warn!("Name translation unavailable ({}), using {}", e, fallback);
            fallback.to_string()
        }
    }
}
