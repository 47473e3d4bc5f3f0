//! Gemtext documents for every page the capsule serves.

use crate::engines::EngineRegistry;
use crate::error::BackendError;
use crate::language::{Language, AUTO, AUTODETECT_LABEL};
use crate::navigation::{Action, LanguageSlot, NavigationState};

const BANNER: &str = r#"   _____            __    ______                  __     __
  / __(_)_ _  ___  / /_ _/_  __/______ ____  ___ / /__ _/ /____
 _\ \/ /  ' \/ _ \/ / // // / / __/ _ `/ _ \(_-</ / _ `/ __/ -_)
/___/_/_/_/_/ .__/_/\_, //_/ /_/  \_,_/_//_/___/_/\_,_/\__/\__/
           /_/     /___/"#;

const SOURCE_URL: &str = "https://git.sr.ht/~metalune/simplytranslate_gemini";

/// Line prefixes gemtext gives meaning to.
const MARKUP_PREFIXES: &[&str] = &["=>", "```", "#", "* ", ">"];

/// Line-oriented gemtext builder.
#[derive(Debug, Default)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(mut self, text: &str) -> Self {
        self.lines.push(format!("# {}", single_line(text)));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    /// Free text that must not be read as gemtext markup.
    pub fn verbatim(mut self, text: &str) -> Self {
        for line in text.lines() {
            if MARKUP_PREFIXES.iter().any(|prefix| line.starts_with(*prefix)) {
                self.lines.push(format!(" {}", line));
            } else {
                self.lines.push(line.to_string());
            }
        }
        self
    }

    pub fn link(mut self, path: &str, label: &str) -> Self {
        self.lines
            .push(format!("=> {} {}", path, single_line(label)).trim_end().to_string());
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(String::new());
        self
    }

    pub fn preformatted(mut self, alt: &str, block: &str) -> Self {
        self.lines.push(format!("```{}", alt));
        self.lines.extend(block.lines().map(str::to_string));
        self.lines.push("```".to_string());
        self
    }

    fn banner(self) -> Self {
        self.preformatted("SimplyTranslate", BANNER).blank()
    }

    fn footer(self) -> Self {
        self.blank()
            .blank()
            .text("SimplyTranslate is part of the Simple Web project.")
            .link(SOURCE_URL, "Source code for this gemini capsule")
    }

    pub fn render(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Collapse line breaks so a value fits on one gemtext line.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Everything the main page shows.
pub struct ViewPage<'a> {
    pub state: &'a NavigationState,
    pub engines: &'a EngineRegistry,
    pub from_name: &'a str,
    pub to_name: &'a str,
    /// `None` when there was nothing to translate
    pub translation: Option<Result<String, BackendError>>,
}

pub fn view_page(page: &ViewPage<'_>) -> String {
    let state = page.state;
    let mut doc = Document::new()
        .banner()
        .heading("Simply Translate")
        .blank()
        .text("Translation Engine:");

    // the switcher is pointless with a single engine
    if page.engines.len() > 1 {
        for engine in page.engines.iter() {
            let target = state.apply(Action::SwitchEngine(engine.name().to_string()));
            let label = if engine.name() == state.engine {
                format!("+ {}", engine.display_name())
            } else {
                engine.display_name().to_string()
            };
            doc = doc.link(&target.encode(), &label);
        }
    }

    doc = doc
        .link(
            &format!("/supported_source_languages/{}", state.engine),
            "List of supported source languages",
        )
        .link(
            &format!("/supported_target_languages/{}", state.engine),
            "List of supported target languages",
        )
        .blank()
        .text("Languages:")
        .link(
            &state.set_language_path(LanguageSlot::From),
            &format!("From: {}", page.from_name),
        )
        .link(
            &state.set_language_path(LanguageSlot::To),
            &format!("To: {}", page.to_name),
        )
        .blank()
        .text("Text:");

    doc = if state.wants_translation() {
        doc.link(&state.set_text_path(), &state.text)
    } else {
        doc.link(&state.set_text_path(), "Enter Text to Translate")
    };

    if let Some(translation) = &page.translation {
        doc = doc.blank().text("Translation:");
        doc = match translation {
            Ok(text) => doc.verbatim(text),
            Err(e) => doc.text(&format!("Translation failed: {}", e)),
        };
    }

    doc.footer().render()
}

/// Which listing of an engine's directory to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Directory preceded by the autodetect entry
    Source,
    Target,
    All,
}

impl Listing {
    fn title(self) -> &'static str {
        match self {
            Listing::Source => "Supported source languages",
            Listing::Target => "Supported target languages",
            Listing::All => "Supported languages",
        }
    }
}

/// `displayName: code` per line, in directory order.
pub fn language_listing<'a>(
    listing: Listing,
    engine_name: &str,
    languages: impl IntoIterator<Item = &'a Language>,
) -> String {
    let mut doc = Document::new()
        .banner()
        .heading(&format!("{} for {}", listing.title(), engine_name))
        .blank();

    if listing == Listing::Source {
        doc = doc.text(&format!("{}: {}", AUTODETECT_LABEL, AUTO));
    }
    for language in languages {
        doc = doc.text(&format!("{}: {}", single_line(&language.name), language.code));
    }

    doc.blank().link(&format!("/{}", engine_name), "Back").render()
}

/// Meta line for a View whose languages did not resolve, e.g.
/// `Could not find 'xx' and 'yy'`.
pub fn not_found_message(unresolved: &[&str]) -> String {
    let quoted: Vec<String> = unresolved.iter().map(|token| format!("'{}'", token)).collect();
    format!("Could not find {}", quoted.join(" and "))
}
