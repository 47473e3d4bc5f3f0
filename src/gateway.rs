//! Route handlers: decode the path, consult the engine, answer.
//!
//! No state survives between requests. Every transition is expressed as the
//! next path the client is sent to, built from [`NavigationState`].

use crate::engines::{EngineRegistry, TranslationEngine};
use crate::error::BackendError;
use crate::gemini::{Handler, Request, Response};
use crate::navigation::{self, Action, LanguageSlot, NavigationState};
use crate::render::{self, Listing, ViewPage};
use crate::router::{RouteMatch, Router};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Home,
    SetLanguage,
    SetText,
    Languages(Listing),
    View,
}

pub struct Gateway {
    engines: EngineRegistry,
    router: Router<Route>,
    translate_timeout: Duration,
}

impl Gateway {
    /// `translate_timeout` bounds every engine call made while serving a View.
    pub fn new(engines: EngineRegistry, translate_timeout: Duration) -> Result<Self, regex::Error> {
        let router = Router::new()
            .route("/?", Route::Home)?
            .route(
                "/set/(?P<slot>from|to)/(?P<engine>[^/]+)/(?P<other>[^/]+)(?:/(?P<text>.*))?",
                Route::SetLanguage,
            )?
            .route(
                "/set_text/(?P<engine>[^/]+)/(?P<from>[^/]+)/(?P<to>[^/]+)/?",
                Route::SetText,
            )?
            .route(
                "/supported_source_languages/(?P<engine>[^/]+)/?",
                Route::Languages(Listing::Source),
            )?
            .route(
                "/supported_target_languages/(?P<engine>[^/]+)/?",
                Route::Languages(Listing::Target),
            )?
            .route(
                "/supported_languages/(?P<engine>[^/]+)/?",
                Route::Languages(Listing::All),
            )?
            .route("/.*", Route::View)?;

        Ok(Self {
            engines,
            router,
            translate_timeout,
        })
    }

    pub fn engines(&self) -> &EngineRegistry {
        &self.engines
    }

    /// Render a state, translating its text when there is any.
    ///
    /// Unresolvable `from`/`to` tokens end the request with a not-found naming
    /// them. Engine failures are shown inline; the page still renders.
    pub async fn view(&self, path: &str) -> Response {
        let decoded = NavigationState::decode(path, self.engines.default_engine().name());
        let engine = self.engines.get(&decoded.engine);
        // unknown engine names render as the fallback engine
        let state = decoded.apply(Action::SwitchEngine(engine.name().to_string()));

        let languages = engine.supported_languages();
        let from_name = languages.resolve_name(&state.from);
        let to_name = languages.resolve_name(&state.to);

        let (from_name, to_name) = match (from_name, to_name) {
            (Some(from_name), Some(to_name)) => (from_name, to_name),
            (from_name, to_name) => {
                let mut unresolved = Vec::new();
                if from_name.is_none() {
                    unresolved.push(state.from.as_str());
                }
                if to_name.is_none() {
                    unresolved.push(state.to.as_str());
                }
                return Response::not_found(render::not_found_message(&unresolved));
            }
        };

        let translation = if state.wants_translation() {
            Some(self.translate(engine, &state).await)
        } else {
            None
        };

        Response::success(render::view_page(&ViewPage {
            state: &state,
            engines: &self.engines,
            from_name,
            to_name,
            translation,
        }))
    }

    async fn translate(
        &self,
        engine: &dyn TranslationEngine,
        state: &NavigationState,
    ) -> Result<String, BackendError> {
        let call = engine.translate(&state.text, &state.from, &state.to);
        let result = match tokio::time::timeout(self.translate_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout),
        };
        if let Err(e) = &result {
            warn!(
                "{} failed to translate {} -> {}: {}",
                engine.name(),
                state.from,
                state.to,
                e
            );
        }
        result
    }

    /// Resolve user input for one language slot and redirect to the new View.
    ///
    /// Without input, or with input the engine does not know, the client is
    /// (re-)prompted. `other` and `text` are carried over untouched.
    pub fn set_language(
        &self,
        slot: LanguageSlot,
        engine_name: &str,
        other: &str,
        text: Option<&str>,
        input: Option<&str>,
    ) -> Response {
        let Some(input) = input else {
            return Response::input("Enter the language (either language code or full name)");
        };

        let engine = self.engines.get(engine_name);
        match engine.supported_languages().try_resolve_code(input) {
            Ok(code) => {
                let current =
                    NavigationState::from_set_language_path(slot, engine.name(), other, text);
                let next = current.apply(Action::SetLanguage(slot, code));
                Response::redirect(next.encode())
            }
            Err(e) => {
                debug!("{}: {}", engine.name(), e);
                Response::input(format!("{}, please try again", e))
            }
        }
    }

    /// Substitute submitted text and redirect to the new View. The languages
    /// are passed through as-is; View validates them.
    pub fn set_text(&self, engine_name: &str, from: &str, to: &str, input: Option<&str>) -> Response {
        let Some(text) = input else {
            return Response::input("Enter the text you want to translate");
        };
        if navigation::is_dot_segment(text) {
            return Response::input(format!("Cannot translate '{}', please try again", text));
        }

        let engine = self.engines.get(engine_name);
        let current = NavigationState::new(engine.name(), from, to, "");
        Response::redirect(current.apply(Action::SetText(text.to_string())).encode())
    }

    pub fn supported_languages(&self, listing: Listing, engine_name: &str) -> Response {
        let engine = self.engines.get(engine_name);
        Response::success(render::language_listing(
            listing,
            engine.name(),
            engine.supported_languages(),
        ))
    }

    async fn dispatch(
        &self,
        path: &str,
        matched: RouteMatch<'_, Route>,
        input: Option<&str>,
    ) -> Response {
        let engine = matched.param("engine").unwrap_or_default();
        match matched.route {
            Route::Home | Route::View => self.view(path).await,
            Route::SetLanguage => {
                let slot = match matched.param("slot").and_then(LanguageSlot::parse) {
                    Some(slot) => slot,
                    None => return Response::not_found("Not found"),
                };
                self.set_language(
                    slot,
                    engine,
                    matched.param("other").unwrap_or_default(),
                    matched.param("text"),
                    input,
                )
            }
            Route::SetText => self.set_text(
                engine,
                matched.param("from").unwrap_or_default(),
                matched.param("to").unwrap_or_default(),
                input,
            ),
            Route::Languages(listing) => self.supported_languages(listing, engine),
        }
    }
}

#[async_trait]
impl Handler for Gateway {
    async fn handle(&self, request: &Request) -> Response {
        let path = request.path();
        let input = request.query();
        match self.router.match_path(path) {
            Some(matched) => self.dispatch(path, matched, input.as_deref()).await,
            None => Response::not_found("Not found"),
        }
    }
}
