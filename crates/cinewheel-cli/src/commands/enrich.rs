use super::AppContext;
use crate::output::{Output, OutputFormat};
use cinewheel_core::load_catalog;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

pub async fn run_enrich(output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let path = ctx.catalog_path();
    let films = load_catalog(&path).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if films.is_empty() {
        output.warn("The catalog is empty, nothing to enrich");
        return Ok(());
    }

    let total = films.len();
    let bar = if output.is_quiet() || output.format() != OutputFormat::Human {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} films")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    let enricher = ctx.enricher();
    let progress = bar.clone();
    let enriched = enricher.enrich_all(films, move || progress.inc(1)).await;
    bar.finish_and_clear();

    match enriched {
        Some(films) => {
            let missing: Vec<&str> = films
                .iter()
                .filter(|film| film.poster.is_empty() && film.description.is_empty())
                .map(|film| film.title.as_str())
                .collect();

            match output.format() {
                OutputFormat::Human => {
                    output.success(format!(
                        "Enriched {} film(s); results cached for 7 days",
                        total
                    ));
                    if !missing.is_empty() {
                        output.warn(format!("No metadata found for: {}", missing.join(", ")));
                    }
                }
                OutputFormat::Json | OutputFormat::JsonPretty => {
                    output.json(&json!({
                        "enriched": total,
                        "not_found": missing,
                    }));
                }
            }
        }
        None => {
            output.warn("Enrichment was superseded by a newer run; results discarded");
        }
    }

    Ok(())
}
