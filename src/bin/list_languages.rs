use anyhow::Result;
use simplytranslate_gemini::config::Config;
use simplytranslate_gemini::engines;
use tracing::info;

/// Print the language directory of every enabled engine, in the same
/// `name: code` form the capsule's listing pages use.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("list_languages=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let client = engines::http_client(&config)?;

    for engine in engines::from_config(&config, client).await? {
        let languages = engine.supported_languages();
        info!("{}: {} languages", engine.name(), languages.len());

        println!("# {}", engine.display_name());
        for language in languages {
            println!("{}: {}", language.name, language.code);
        }
        println!();
    }

    Ok(())
}
