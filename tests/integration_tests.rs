//! Integration tests for the SimplyTranslate gemini capsule
//!
//! These tests drive the full request path: raw request line, gateway,
//! real engine implementations against mocked HTTP backends, wire response.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use simplytranslate_gemini::{
    engines::{EngineRegistry, GoogleEngine, LibreEngine, TranslationEngine},
    gateway::Gateway,
    gemini::handle_connection,
};

// ==================== Test Helpers ====================

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build client")
}

async fn mount_libre_languages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"code": "en", "name": "English"},
            {"code": "fr", "name": "French"},
            {"code": "de", "name": "German"}
        ])))
        .mount(server)
        .await;
}

async fn google_only(server: &MockServer) -> Gateway {
    let engines: Vec<Arc<dyn TranslationEngine>> =
        vec![Arc::new(GoogleEngine::new(client(), &server.uri()))];
    Gateway::new(EngineRegistry::new(engines).unwrap(), Duration::from_secs(5)).unwrap()
}

async fn google_and_libre(google: &MockServer, libre: &MockServer) -> Gateway {
    mount_libre_languages(libre).await;
    let libre_engine = LibreEngine::connect(client(), &libre.uri(), None)
        .await
        .expect("LibreTranslate should connect");

    let engines: Vec<Arc<dyn TranslationEngine>> = vec![
        Arc::new(GoogleEngine::new(client(), &google.uri())),
        Arc::new(libre_engine),
    ];
    Gateway::new(EngineRegistry::new(engines).unwrap(), Duration::from_secs(5)).unwrap()
}

/// Send one raw request line and collect everything the server wrote.
async fn request(gateway: &Gateway, url: &str) -> String {
    let (mut client, server) = duplex(64 * 1024);
    client
        .write_all(format!("{}\r\n", url).as_bytes())
        .await
        .unwrap();

    handle_connection(server, "localhost", gateway).await.unwrap();

    let mut out = String::new();
    client.read_to_string(&mut out).await.unwrap();
    out
}

// ==================== View Tests ====================

#[tokio::test]
async fn test_google_view_translates() {
    let google = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("sl", "auto"))
        .and(query_param("tl", "en"))
        .and(query_param("q", "bonjour"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([[["hello", "bonjour"]], null, "fr"])),
        )
        .expect(1)
        .mount(&google)
        .await;

    let gateway = google_only(&google).await;
    let out = request(&gateway, "gemini://localhost/google/auto/en/bonjour").await;

    assert!(out.starts_with("20 text/gemini; charset=utf-8\r\n"), "{}", out);
    assert!(out.contains("From: Autodetect"));
    assert!(out.contains("To: English"));
    assert!(out.contains("hello"));
}

#[tokio::test]
async fn test_root_renders_defaults_without_backend_call() {
    let google = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&google)
        .await;

    let gateway = google_only(&google).await;
    let out = request(&gateway, "gemini://localhost/").await;

    assert!(out.starts_with("20 "));
    assert!(out.contains("=> /set/from/google/en From: Autodetect"));
    assert!(out.contains("=> /set_text/google/auto/en Enter Text to Translate"));
}

#[tokio::test]
async fn test_unknown_language_is_not_found() {
    let google = MockServer::start().await;
    let gateway = google_only(&google).await;

    let out = request(&gateway, "gemini://localhost/google/xx/en/hello").await;

    assert_eq!(out, "51 Could not find 'xx'\r\n");
}

#[tokio::test]
async fn test_backend_failure_still_renders_page() {
    let google = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&google)
        .await;

    let gateway = google_only(&google).await;
    let out = request(&gateway, "gemini://localhost/google/fr/en/bonjour").await;

    assert!(out.starts_with("20 "));
    assert!(out.contains("Translation failed: translation engine returned 503"));
    assert!(out.contains("=> /set_text/google/fr/en bonjour"));
}

#[tokio::test]
async fn test_libre_view_translates() {
    let google = MockServer::start().await;
    let libre = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(json!({"q": "guten tag", "source": "de", "target": "fr"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translatedText": "bonjour"})))
        .expect(1)
        .mount(&libre)
        .await;

    let gateway = google_and_libre(&google, &libre).await;
    let out = request(&gateway, "gemini://localhost/libre/de/fr/guten%20tag").await;

    assert!(out.contains("From: German"));
    assert!(out.contains("To: French"));
    assert!(out.contains("Translation:\nbonjour\n"));
    // switcher lists both, marking the current one
    assert!(out.contains("=> /google/de/fr/guten%20tag Google\n"));
    assert!(out.contains("=> /libre/de/fr/guten%20tag + Libre\n"));
}

// ==================== Prompt and Redirect Tests ====================

#[tokio::test]
async fn test_set_language_flow() {
    let google = MockServer::start().await;
    let gateway = google_only(&google).await;

    let prompt = request(&gateway, "gemini://localhost/set/to/google/auto/bonjour").await;
    assert_eq!(
        prompt,
        "10 Enter the language (either language code or full name)\r\n"
    );

    let redirect = request(&gateway, "gemini://localhost/set/to/google/auto/bonjour?Spanish").await;
    assert_eq!(redirect, "30 /google/auto/es/bonjour\r\n");

    let retry = request(&gateway, "gemini://localhost/set/to/google/auto/bonjour?Elvish").await;
    assert_eq!(retry, "10 Language 'Elvish' not found, please try again\r\n");
}

#[tokio::test]
async fn test_set_text_flow() {
    let google = MockServer::start().await;
    let gateway = google_only(&google).await;

    let prompt = request(&gateway, "gemini://localhost/set_text/google/auto/en").await;
    assert_eq!(prompt, "10 Enter the text you want to translate\r\n");

    let redirect = request(&gateway, "gemini://localhost/set_text/google/auto/en?hello%20world").await;
    assert_eq!(redirect, "30 /google/auto/en/hello%20world\r\n");
}

#[tokio::test]
async fn test_libre_set_language_uses_fetched_directory() {
    let google = MockServer::start().await;
    let libre = MockServer::start().await;
    let gateway = google_and_libre(&google, &libre).await;

    // Spanish is known to Google but not to this instance
    let out = request(&gateway, "gemini://localhost/set/to/libre/en?Spanish").await;
    assert_eq!(out, "10 Language 'Spanish' not found, please try again\r\n");

    let out = request(&gateway, "gemini://localhost/set/to/libre/en?german").await;
    assert_eq!(out, "30 /libre/en/de\r\n");
}

// ==================== Listing Tests ====================

#[tokio::test]
async fn test_source_language_listing() {
    let google = MockServer::start().await;
    let libre = MockServer::start().await;
    let gateway = google_and_libre(&google, &libre).await;

    let out = request(&gateway, "gemini://localhost/supported_source_languages/libre").await;

    assert!(out.starts_with("20 "));
    assert!(out.contains("Autodetect: auto\nEnglish: en\nFrench: fr\nGerman: de\n"));
    assert!(out.contains("=> /libre Back"));
}

#[tokio::test]
async fn test_google_listing_has_builtin_directory() {
    let google = MockServer::start().await;
    let gateway = google_only(&google).await;

    let out = request(&gateway, "gemini://localhost/supported_target_languages/google").await;

    assert!(out.contains("English: en\n"));
    assert!(out.contains("Hebrew: iw\n"));
    assert!(!out.contains("Autodetect"));
}

// ==================== Transport Tests ====================

#[tokio::test]
async fn test_foreign_host_is_refused() {
    let google = MockServer::start().await;
    let gateway = google_only(&google).await;

    let out = request(&gateway, "gemini://elsewhere.example/google").await;

    assert_eq!(out, "53 Proxy request refused\r\n");
}

#[tokio::test]
async fn test_libre_connect_fails_on_bad_language_list() {
    let libre = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&libre)
        .await;

    let result = LibreEngine::connect(client(), &libre.uri(), None).await;

    assert!(result.is_err());
}
