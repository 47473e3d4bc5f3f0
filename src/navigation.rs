//! Navigation state carried entirely in the request path.
//!
//! Canonical shape: `/<engine>/<from>/<to>/<percent-encoded text>`.
//!
//! Decoding never fails. Missing or blank segments fall back to defaults so a
//! half-typed URL still renders a usable page, and everything after `<to>` is
//! one text value, slashes included. Only the text is percent-decoded.
//!
//! A text of exactly `.` or `..` cannot be carried: URL parsers remove such
//! segments even when percent-encoded. See [`is_dot_segment`].
//!
//! Every page transition is a pure function from the current state and an
//! [`Action`] to the next state; the gateway only turns the result into a
//! redirect or a link.

use crate::language::{AUTO, DEFAULT_TARGET};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in the text segment. `/` is escaped so the text stays a
/// single segment that URL parsers cannot collapse.
const TEXT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'/')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Which language slot an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSlot {
    From,
    To,
}

impl LanguageSlot {
    /// Path spelling (`from` / `to`).
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageSlot::From => "from",
            LanguageSlot::To => "to",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "from" => Some(LanguageSlot::From),
            "to" => Some(LanguageSlot::To),
            _ => None,
        }
    }
}

/// A user action that moves to a new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetLanguage(LanguageSlot, String),
    SetText(String),
    SwitchEngine(String),
}

/// Everything a page needs, recovered from the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub engine: String,
    pub from: String,
    pub to: String,
    pub text: String,
}

impl NavigationState {
    pub fn new(
        engine: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            engine: engine.into(),
            from: from.into(),
            to: to.into(),
            text: text.into(),
        }
    }

    /// Default state for `engine`: autodetect to English, no text.
    pub fn initial(engine: impl Into<String>) -> Self {
        Self::new(engine, AUTO, DEFAULT_TARGET, "")
    }

    /// Decode a full view path such as `/google/auto/en/bonjour`.
    ///
    /// A missing or blank engine segment yields `default_engine`.
    pub fn decode(path: &str, default_engine: &str) -> Self {
        let path = path.trim_start_matches('/');
        let (engine, rest) = path.split_once('/').unwrap_or((path, ""));
        let engine = if engine.trim().is_empty() {
            default_engine
        } else {
            engine
        };
        Self::decode_rest(engine, rest)
    }

    /// Decode the part of a view path after the engine segment.
    ///
    /// Segment 0 is `from`, segment 1 is `to`, the rest is the text. A blank
    /// `from` discards the remaining segments entirely; a blank `to` means
    /// the default target.
    pub fn decode_rest(engine: &str, rest: &str) -> Self {
        let mut state = Self::initial(engine);

        let mut segments = rest.splitn(3, '/');
        let from = segments.next().unwrap_or_default();
        if from.trim().is_empty() {
            return state;
        }
        state.from = from.to_string();

        if let Some(to) = segments.next().filter(|to| !to.trim().is_empty()) {
            state.to = to.to_string();
        }
        if let Some(text) = segments.next() {
            state.text = decode_text(text);
        }
        state
    }

    /// Canonical path for this state.
    pub fn encode(&self) -> String {
        let mut path = format!("/{}/{}/{}", self.engine, self.from, self.to);
        if !self.text.is_empty() {
            path.push('/');
            path.push_str(&encode_text(&self.text));
        }
        path
    }

    /// Next state after `action`. Languages and text are not validated here.
    pub fn apply(&self, action: Action) -> Self {
        let mut next = self.clone();
        match action {
            Action::SetLanguage(LanguageSlot::From, code) => next.from = code,
            Action::SetLanguage(LanguageSlot::To, code) => next.to = code,
            Action::SetText(text) => next.text = text,
            Action::SwitchEngine(engine) => next.engine = engine,
        }
        next
    }

    /// Whether a View of this state should call the engine.
    pub fn wants_translation(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Prompt link for changing one language slot:
    /// `/set/<slot>/<engine>/<other slot>[/<text>]`.
    pub fn set_language_path(&self, slot: LanguageSlot) -> String {
        let other = match slot {
            LanguageSlot::From => &self.to,
            LanguageSlot::To => &self.from,
        };
        let mut path = format!("/set/{}/{}/{}", slot.as_str(), self.engine, other);
        if !self.text.is_empty() {
            path.push('/');
            path.push_str(&encode_text(&self.text));
        }
        path
    }

    /// Inverse of [`set_language_path`](Self::set_language_path): rebuild the
    /// state a set-language link was generated from, with `slot` still unset.
    pub fn from_set_language_path(
        slot: LanguageSlot,
        engine: &str,
        other: &str,
        text: Option<&str>,
    ) -> Self {
        let text = text.map(decode_text).unwrap_or_default();
        match slot {
            LanguageSlot::From => Self::new(engine, AUTO, other, text),
            LanguageSlot::To => Self::new(engine, other, DEFAULT_TARGET, text),
        }
    }

    /// Prompt link for entering text: `/set_text/<engine>/<from>/<to>`.
    pub fn set_text_path(&self) -> String {
        format!("/set_text/{}/{}/{}", self.engine, self.from, self.to)
    }
}

/// Percent-encode a text value for the path.
pub fn encode_text(text: &str) -> String {
    utf8_percent_encode(text, TEXT).to_string()
}

/// Whether `text` would be dropped as a `.` or `..` path segment.
pub fn is_dot_segment(text: &str) -> bool {
    matches!(text, "." | "..")
}

/// Percent-decode a text value. Invalid UTF-8 is replaced, never rejected.
pub fn decode_text(text: &str) -> String {
    percent_decode_str(text).decode_utf8_lossy().into_owned()
}
