//! Target languages supported by the translation endpoint.

use serde::{Deserialize, Serialize};

/// A language the analysis can be translated into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Bengali,
    Tamil,
    Telugu,
    Marathi,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
}

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Hindi,
        Language::Bengali,
        Language::Tamil,
        Language::Telugu,
        Language::Marathi,
        Language::Gujarati,
        Language::Kannada,
        Language::Malayalam,
        Language::Punjabi,
    ];

    /// Display name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Bengali => "Bengali",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Marathi => "Marathi",
            Language::Gujarati => "Gujarati",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Punjabi => "Punjabi",
        }
    }

    /// Two-letter code understood by the translation service.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Bengali => "bn",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Marathi => "mr",
            Language::Gujarati => "gu",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Punjabi => "pa",
        }
    }

    /// Look up a language by display name or code, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(value) || l.code().eq_ignore_ascii_case(value))
    }

    /// Default language for a city, English when the city is not mapped.
    pub fn default_for_city(city: &str) -> Self {
        match city {
            "Delhi" | "Mumbai" => Language::Hindi,
            "Chennai" => Language::Tamil,
            "Kolkata" => Language::Bengali,
            "Hyderabad" => Language::Telugu,
            "Bangalore" => Language::Kannada,
            "Ahmedabad" => Language::Gujarati,
            "Pune" => Language::Marathi,
            "Thiruvananthapuram" => Language::Malayalam,
            "Amritsar" => Language::Punjabi,
            _ => Language::English,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Language entry as listed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
    pub code: String,
}

impl From<Language> for LanguageInfo {
    fn from(language: Language) -> Self {
        Self {
            name: language.name().to_string(),
            code: language.code().to_string(),
        }
    }
}
