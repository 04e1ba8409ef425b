use super::AppContext;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use serde_json::json;

pub async fn run_favorite(id: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let session = ctx.session().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let title = match session.film(id) {
        Some(film) => film.title.clone(),
        None => {
            output.error(format!("No film with id {}", id));
            return Ok(());
        }
    };

    let now_favorite = session
        .toggle_favorite(id)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if now_favorite {
        output.success(format!("Added \"{}\" to favorites", title));
    } else {
        output.success(format!("Removed \"{}\" from favorites", title));
    }

    Ok(())
}

pub async fn run_exclude(id: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let session = ctx.session().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let title = match session.film(id) {
        Some(film) => film.title.clone(),
        None => {
            output.error(format!("No film with id {}", id));
            return Ok(());
        }
    };

    let now_excluded = session
        .toggle_excluded(id)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if now_excluded {
        output.success(format!("\"{}\" will no longer come out of the wheel", title));
    } else {
        output.success(format!("\"{}\" is back in the wheel", title));
    }

    Ok(())
}

pub async fn run_exclusions(output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let session = ctx.session().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let excluded = session
        .excluded()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let mut entries: Vec<(u32, String)> = excluded
        .iter()
        .map(|&id| {
            let title = session
                .film(id)
                .map(|film| film.title.clone())
                .unwrap_or_else(|| "(not in catalog)".to_string());
            (id, title)
        })
        .collect();
    entries.sort_by_key(|(id, _)| *id);

    match output.format() {
        OutputFormat::Human => {
            if entries.is_empty() {
                output.info("No films are excluded from the wheel");
            }
            for (id, title) in &entries {
                output.println(format!("{:>4}  {}", id, title));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let items: Vec<serde_json::Value> = entries
                .iter()
                .map(|(id, title)| json!({ "id": id, "title": title }))
                .collect();
            output.json(&json!({ "excluded": items }));
        }
    }

    Ok(())
}

pub async fn run_login(user_key: &str, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    ctx.config.user_key = Some(user_key.to_string());
    ctx.save_config()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    output.success(format!("Signed in as \"{}\"", user_key));
    if ctx.config.remote.is_none() {
        output.warn(
            "No remote store configured; data stays local until you set one \
             (cinewheel config remote --base-url <URL>)",
        );
    } else {
        output.info("Favorites, exclusions, and ratings now use the remote store. Local anonymous data is kept but not merged.");
    }

    Ok(())
}

pub async fn run_logout(output: &Output) -> Result<()> {
    let mut ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    match ctx.config.user_key.take() {
        Some(user_key) => {
            ctx.save_config()
                .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            output.success(format!("Signed out \"{}\"; back to the local store", user_key));
        }
        None => {
            output.info("Not signed in");
        }
    }

    Ok(())
}
