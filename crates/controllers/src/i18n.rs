//! Message lookup for dialog titles, bodies and button labels.

use std::{collections::HashMap, fs, path::Path};

use thiserror::Error;

/// Message keys used by the controllers.
pub mod keys {
    pub const OK: &str = "ok";
    pub const CANCEL: &str = "cancel";

    pub const REGISTER_SUCCESS_TITLE: &str = "register_request.success_title";
    pub const REGISTER_SUCCESS_MESSAGE: &str = "register_request.success_message";
    pub const REGISTER_ERROR_TITLE: &str = "register_request.error_title";
    pub const REGISTER_ERROR_USERNAME_EXISTS: &str = "register_request.error_username_exists";
    pub const REGISTER_ERROR_EMAIL_EXISTS: &str = "register_request.error_email_exists";
    pub const REGISTER_ERROR_MESSAGE: &str = "register_request.error_message";

    pub const TRANSLATE_SUCCESS_TITLE: &str = "file.view.translate_success_title";
    pub const TRANSLATE_SUCCESS_MESSAGE: &str = "file.view.translate_success_message";
    pub const TRANSLATE_ERROR_TITLE: &str = "file.view.translate_error_title";
    pub const TRANSLATE_ERROR_MESSAGE: &str = "file.view.translate_error_message";

    pub const APPROVE_SUCCESS_TITLE: &str = "settings.user.approve_success_title";
    pub const APPROVE_SUCCESS_MESSAGE: &str = "settings.user.approve_success_message";
    pub const APPROVE_ERROR_TITLE: &str = "settings.user.approve_error_title";
    pub const APPROVE_ERROR_MESSAGE: &str = "settings.user.approve_error_message";
    pub const APPROVE_ERROR_USERNAME_EXISTS: &str = "settings.user.approve_error_username_exists";
    pub const REJECT_CONFIRM_TITLE: &str = "settings.user.reject_confirm_title";
    pub const REJECT_CONFIRM_MESSAGE: &str = "settings.user.reject_confirm_message";
}

pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;

    /// Replaces `{{ name }}` placeholders in the translated text.
    fn translate_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        interpolate(&self.translate(key), params)
    }
}

pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (name, value) in params {
        text = text
            .replace(&format!("{{{{ {name} }}}}"), value)
            .replace(&format!("{{{{{name}}}}}"), value);
    }
    text
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read message catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid message catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Key/text table loaded from TOML. Nested tables flatten to dotted keys,
/// so `[register_request] success_title = ".."` answers
/// `register_request.success_title`. Unknown keys translate to themselves.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    entries: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let table: toml::Table = toml::from_str(raw)?;
        let mut entries = HashMap::new();
        flatten_into(&mut entries, None, &table);
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: Option<&str>, table: &toml::Table) {
    for (key, value) in table {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            toml::Value::Table(nested) => flatten_into(entries, Some(&full_key), nested),
            toml::Value::String(text) => {
                entries.insert(full_key, text.clone());
            }
            other => {
                entries.insert(full_key, other.to_string());
            }
        }
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_tables_flatten_to_dotted_keys() {
        let catalog = MessageCatalog::from_toml_str(
            r#"
ok = "OK"

[register_request]
success_title = "Request sent"

[settings.user]
approve_error_title = "Cannot approve"
"#,
        )
        .expect("catalog");

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.translate(keys::OK), "OK");
        assert_eq!(catalog.translate(keys::REGISTER_SUCCESS_TITLE), "Request sent");
        assert_eq!(catalog.translate(keys::APPROVE_ERROR_TITLE), "Cannot approve");
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.translate("missing.key"), "missing.key");
    }

    #[test]
    fn interpolation_accepts_both_brace_spacings() {
        let catalog = MessageCatalog::from_toml_str(
            r#"greeting = "Hello {{ name }}, you have {{count}} files""#,
        )
        .expect("catalog");
        assert_eq!(
            catalog.translate_with("greeting", &[("name", "alice"), ("count", "3")]),
            "Hello alice, you have 3 files"
        );
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        assert!(matches!(
            MessageCatalog::from_toml_str("not = [valid"),
            Err(CatalogError::Parse(_))
        ));
    }
}
