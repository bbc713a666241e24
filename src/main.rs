use anyhow::Result;
use i18n_manager::{Config, I18nManager};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_manager=info".parse()?),
        )
        .init();

    let config = match std::env::var("I18N_CONFIG_FILE") {
        Ok(path) => {
            info!("Reading configuration from {}", path);
            Config::from_file(&path)?
        }
        Err(_) => Config::from_env()?,
    };

    let manager = Arc::new(I18nManager::new(config));
    manager.load_translations().await?;

    info!(
        "Supported locales: {}",
        manager.supported_locales().join(", ")
    );

    // Optional Accept-Language value to negotiate
    if let Some(preference) = std::env::args().nth(1) {
        match manager.get_supported_locale_for(preference.as_str()) {
            Some(locale) => println!("{}", locale),
            None => println!(
                "{} (default, no match for '{}')",
                manager.default_locale(),
                preference
            ),
        }
    }

    Ok(())
}
