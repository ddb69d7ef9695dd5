//! DeepL translate / usage wire types

use serde::{Deserialize, Serialize};

/// Client-side marker meaning "let DeepL detect the language"
const AUTO_DETECT: &str = "auto";

#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub detected_source_language: String,
    pub text: String,
}

/// Also the shape we send back to callers
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub character_count: u64,
    #[serde(default)]
    pub character_limit: u64,
}

impl Usage {
    /// Share of the limit already used, `None` for an unknown (zero) limit
    pub fn used_percent(&self) -> Option<f64> {
        if self.character_limit == 0 {
            None
        } else {
            Some(self.character_count as f64 * 100.0 / self.character_limit as f64)
        }
    }
}

/// Form fields for `POST /v2/translate`.
///
/// Language codes are upper-cased; `source_lang` is left out when empty or `auto`.
pub fn build_translate_form(text: &str, target_lang: &str, source_lang: Option<&str>) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("text", text.to_string()),
        ("target_lang", target_lang.to_uppercase()),
    ];

    if let Some(source) = source_lang {
        if !source.is_empty() && !source.eq_ignore_ascii_case(AUTO_DETECT) {
            form.push(("source_lang", source.to_uppercase()));
        }
    }

    form
}
