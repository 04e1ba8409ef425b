use super::AppContext;
use crate::output::{Output, OutputFormat};
use cinewheel_config::RemoteStoreConfig;
use clap::{ArgAction, Subcommand};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use serde_json::json;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the full configuration including masked values
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Configure the TMDB metadata source
    #[command(long_about = "Configure the TMDB API used for metadata enrichment. Get an API key at https://www.themoviedb.org/settings/api.")]
    Tmdb {
        /// TMDB API key
        #[arg(long)]
        api_key: Option<String>,

        /// Metadata language (e.g. 'ru-RU', 'en-US')
        #[arg(long)]
        language: Option<String>,
    },

    /// Configure the remote user-data store
    #[command(long_about = "Set the base URL of the remote store used for favorites, exclusions, and ratings while signed in.")]
    Remote {
        /// Remote store base URL
        #[arg(long)]
        base_url: String,
    },

    /// Set the catalog file path
    Catalog {
        /// Path to the films JSON file
        path: PathBuf,
    },
}

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output).await,
        ConfigCommands::Tmdb { api_key, language } => configure_tmdb(api_key, language, output).await,
        ConfigCommands::Remote { base_url } => configure_remote(base_url, output).await,
        ConfigCommands::Catalog { path } => configure_catalog(path, output).await,
    }
}

async fn show_config(full: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let config = &ctx.config;

    let api_key_display = if full {
        config.tmdb.api_key.clone()
    } else {
        mask_string(&config.tmdb.api_key)
    };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(ctx.paths.config_file().display().to_string()),
            ]);
            table.add_row(vec![
                Cell::new("Catalog"),
                Cell::new(ctx.catalog_path().display().to_string()),
            ]);
            table.add_row(vec![Cell::new("TMDB API key"), Cell::new(&api_key_display)]);
            table.add_row(vec![Cell::new("TMDB API URL"), Cell::new(&config.tmdb.api_url)]);
            table.add_row(vec![Cell::new("Language"), Cell::new(&config.tmdb.language)]);
            table.add_row(vec![
                Cell::new("Remote store"),
                Cell::new(
                    config
                        .remote
                        .as_ref()
                        .map(|r| r.base_url.clone())
                        .unwrap_or_else(|| "<not set>".to_string()),
                ),
            ]);
            table.add_row(vec![
                Cell::new("Signed in as"),
                Cell::new(
                    config
                        .user_key
                        .clone()
                        .unwrap_or_else(|| "<anonymous>".to_string()),
                ),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": ctx.paths.config_file(),
                "catalog": ctx.catalog_path(),
                "tmdb": {
                    "api_key": api_key_display,
                    "api_url": config.tmdb.api_url,
                    "language": config.tmdb.language,
                },
                "remote": config.remote.as_ref().map(|r| &r.base_url),
                "user_key": config.user_key,
            }));
        }
    }

    Ok(())
}

async fn configure_tmdb(
    api_key: Option<String>,
    language: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if api_key.is_none() && language.is_none() {
        output.warn("Nothing to change. Use --api-key and/or --language");
        return Ok(());
    }

    if let Some(api_key) = api_key {
        ctx.config.tmdb.api_key = api_key;
    }
    if let Some(language) = language {
        ctx.config.tmdb.language = language;
    }

    ctx.save_config()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    output.success("TMDB configuration saved");
    Ok(())
}

async fn configure_remote(base_url: String, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    ctx.config.remote = Some(RemoteStoreConfig { base_url });
    ctx.save_config()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    output.success("Remote store configured");
    Ok(())
}

async fn configure_catalog(path: PathBuf, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if !path.exists() {
        output.warn(format!("{} does not exist yet", path.display()));
    }

    ctx.config.catalog = Some(path.clone());
    ctx.save_config()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    output.success(format!("Catalog set to {}", path.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    // Split on characters, not bytes: keys are not guaranteed ASCII
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
