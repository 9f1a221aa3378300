use anyhow::{bail, Result};

use zeny::config::ZenyConfig;
use zeny::models::{ModelRegistry, AVAILABLE_MODELS};
use zeny::provider;

/// Print the static model table, or the provider's live listing with `remote`.
pub async fn models(config: &ZenyConfig, remote: bool) -> Result<()> {
    if !remote {
        println!("Available models (default: {})", config.provider.default_model);
        println!("{}", "=".repeat(40));
        for model in AVAILABLE_MODELS {
            println!("  {:<18} {}", model.id, model.name);
            println!("  {:<18} {}", "", model.description);
            println!("  {:<18} {}", "", model.rate_limit);
            println!();
        }
        return Ok(());
    }

    let Some(provider) = provider::create_provider(config)? else {
        bail!("no provider configured; set GEMINI_API_KEY to list remote models");
    };

    let remote_models = provider.list_remote_models().await?;
    println!("Models supporting generateContent:");
    for model in &remote_models {
        let marker = if ModelRegistry::is_known(&model.id) { "*" } else { " " };
        println!("{marker} {}", model.id);
        println!("    Display name: {}", model.display_name);
        if !model.description.is_empty() {
            println!("    Description:  {}", model.description);
        }
    }
    println!();
    println!("* selectable through the API");

    Ok(())
}
