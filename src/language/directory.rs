//! Bidirectional mapping between display names and engine language codes.

use crate::error::UnresolvedLanguage;
use crate::language::{AUTO, AUTODETECT_LABEL};

/// One supported language of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// Human-readable name (e.g. "French")
    pub name: String,

    /// Engine-specific code (e.g. "fr", "zh-CN")
    pub code: String,
}

/// Ordered set of languages supported by one engine.
///
/// Names and codes are unique within a directory. Iteration order is the order
/// the entries were supplied in, which is also the order listings are rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageDirectory {
    languages: Vec<Language>,
}

impl LanguageDirectory {
    /// Build a directory from `(name, code)` pairs.
    ///
    /// Later duplicates of an already-present name or code are dropped, so the
    /// first occurrence wins.
    pub fn from_pairs<I, N, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut languages: Vec<Language> = Vec::new();
        for (name, code) in pairs {
            let language = Language {
                name: name.into(),
                code: code.into(),
            };
            let duplicate = languages.iter().any(|existing| {
                eq_ignore_case(&existing.name, &language.name)
                    || eq_ignore_case(&existing.code, &language.code)
            });
            if !duplicate {
                languages.push(language);
            }
        }
        Self { languages }
    }

    /// Resolve free-form user input to a language code.
    ///
    /// Rules, in order, all case-insensitive:
    /// 1. `auto` or the autodetect label resolve to [`AUTO`]
    /// 2. a display name resolves to its code
    /// 3. a code resolves to itself, with the directory's casing
    ///
    /// Returns `None` when nothing matches.
    pub fn resolve_code(&self, input: &str) -> Option<String> {
        let input = input.trim();

        if eq_ignore_case(input, AUTO) || eq_ignore_case(input, AUTODETECT_LABEL) {
            return Some(AUTO.to_string());
        }

        if let Some(language) = self.get_by_name(input) {
            return Some(language.code.clone());
        }

        self.get_by_code(input).map(|language| language.code.clone())
    }

    /// Like [`resolve_code`](Self::resolve_code) but with a typed error.
    pub fn try_resolve_code(&self, input: &str) -> Result<String, UnresolvedLanguage> {
        self.resolve_code(input)
            .ok_or_else(|| UnresolvedLanguage(input.trim().to_string()))
    }

    /// Display name for a language token.
    ///
    /// [`AUTO`] maps to the autodetect label. Codes are matched exactly, since
    /// tokens in paths are expected to be canonical codes already.
    pub fn resolve_name(&self, code: &str) -> Option<&str> {
        if code == AUTO {
            return Some(AUTODETECT_LABEL);
        }
        self.languages
            .iter()
            .find(|language| language.code == code)
            .map(|language| language.name.as_str())
    }

    /// Find a language by display name, ignoring case.
    pub fn get_by_name(&self, name: &str) -> Option<&Language> {
        self.languages
            .iter()
            .find(|language| eq_ignore_case(&language.name, name))
    }

    /// Find a language by code, ignoring case.
    pub fn get_by_code(&self, code: &str) -> Option<&Language> {
        self.languages
            .iter()
            .find(|language| eq_ignore_case(&language.code, code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// Unicode-aware case-insensitive comparison, e.g. `Español` and `ESPAÑOL`.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl<'a> IntoIterator for &'a LanguageDirectory {
    type Item = &'a Language;
    type IntoIter = std::slice::Iter<'a, Language>;

    fn into_iter(self) -> Self::IntoIter {
        self.languages.iter()
    }
}
