//! String catalogs embedded from `assets/i18n/<lang>.toml`.
//!
//! Only English ships. Any other selected language resolves each key through
//! its own catalog if one exists, then through English.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_embed::RustEmbed;
use serde::Deserialize;

pub const FALLBACK_LANGUAGE: &str = "en";

/// Languages offered in the switcher: (code, native name).
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("pt", "Português"),
];

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

#[derive(Debug, Clone, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    strings: HashMap<String, String>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    faq: Vec<FaqEntry>,
}

impl Catalog {
    fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

static CATALOGS: Lazy<HashMap<String, Catalog>> = Lazy::new(load_catalogs);

fn load_catalogs() -> HashMap<String, Catalog> {
    let mut catalogs = HashMap::new();
    for file in Asset::iter() {
        let Some(lang) = file
            .strip_prefix("i18n/")
            .and_then(|name| name.strip_suffix(".toml"))
        else {
            continue;
        };
        let Some(content) = Asset::get(&file) else {
            continue;
        };
        let raw = String::from_utf8_lossy(&content.data);
        match Catalog::parse(&raw) {
            Ok(catalog) => {
                catalogs.insert(lang.to_string(), catalog);
            }
            Err(e) => tracing::warn!(lang, "skipping broken catalog: {e}"),
        }
    }
    catalogs
}

/// Looks up UI text for the active language.
#[derive(Debug, Clone)]
pub struct Translator {
    language: String,
}

impl Translator {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) {
        if !CATALOGS.contains_key(language) {
            tracing::debug!(language, "no catalog, falling back to {FALLBACK_LANGUAGE}");
        }
        self.language = language.to_string();
    }

    fn catalogs(&self) -> impl Iterator<Item = &'static Catalog> + '_ {
        [self.language.as_str(), FALLBACK_LANGUAGE]
            .into_iter()
            .filter_map(|lang| CATALOGS.get(lang))
    }

    /// Text for `key`; the key itself when no catalog has it.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.catalogs()
            .find_map(|c| c.strings.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn features(&self) -> &'static [String] {
        self.catalogs()
            .map(|c| c.features.as_slice())
            .find(|f| !f.is_empty())
            .unwrap_or_default()
    }

    pub fn faq(&self) -> &'static [FaqEntry] {
        self.catalogs()
            .map(|c| c.faq.as_slice())
            .find(|f| !f.is_empty())
            .unwrap_or_default()
    }
}

/// Native name for a language code, or the code itself.
pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_catalog_is_embedded() {
        let tr = Translator::new("en");
        assert_eq!(tr.t("download-title"), "Download YouTube Thumbnails");
        assert_eq!(tr.t("fetch-btn"), "Get Thumbnails");
        assert_eq!(tr.t("faq-title"), "Frequently Asked Questions");
    }

    #[test]
    fn every_page_key_is_present() {
        let tr = Translator::new("en");
        for key in [
            "download-title",
            "placeholder",
            "fetch-btn",
            "available-qualities",
            "edit-title",
            "features-title",
            "faq-title",
        ] {
            assert_ne!(tr.t(key), key, "missing {key}");
        }
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let mut tr = Translator::new("en");
        tr.set_language("de");
        assert_eq!(tr.language(), "de");
        assert_eq!(tr.t("edit-title"), "Edit Thumbnail");
        assert!(!tr.faq().is_empty());
        assert!(!tr.features().is_empty());
    }

    #[test]
    fn missing_key_echoes_key() {
        assert_eq!(Translator::new("en").t("no-such-key"), "no-such-key");
    }

    #[test]
    fn language_names() {
        assert_eq!(language_name("fr"), "Français");
        assert_eq!(language_name("xx"), "xx");
    }
}
