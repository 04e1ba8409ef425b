use super::{AppContext, FilterArgs};
use crate::output::{Output, OutputFormat};
use cinewheel_core::Wheel;
use cinewheel_models::Film;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_wheel(filter: FilterArgs, pick: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let mut session = ctx.session().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    filter.apply(&mut session.filter);
    session.save_filter_state();

    // Wheel context: exclusions apply on top of the shared filters
    let candidates = session.filtered(true).await;
    if candidates.is_empty() {
        output.warn("No films to pick from (check your filters and exclusions)");
        return Ok(());
    }

    let chosen = if pick {
        Wheel::pick(&candidates).cloned()
    } else {
        spin_with_animation(candidates, output).await
    };

    match chosen {
        Some(film) => announce(&film, output),
        None => output.warn("The spin was cancelled"),
    }

    Ok(())
}

async fn spin_with_animation(candidates: Vec<Film>, output: &Output) -> Option<Film> {
    let spinner = if output.is_quiet() || output.format() != OutputFormat::Human {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner
    };

    let ticker = spinner.clone();
    let mut wheel = Wheel::new();
    let chosen = wheel
        .spin(candidates, move |film| {
            ticker.set_message(format!("{} ({})", film.title, film.year));
            ticker.tick();
        })
        .await;
    spinner.finish_and_clear();
    chosen
}

fn announce(film: &Film, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return;
            }
            println!(
                "{} {} ({})",
                "Tonight:".bold(),
                film.title.bright_cyan().bold(),
                film.year
            );
            if !film.genres.is_empty() {
                println!("  {}", film.genres.join(", "));
            }
            if !film.duration.is_empty() {
                println!("  {}", film.duration);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "id": film.id,
                "title": film.title,
                "year": film.year,
                "genres": film.genres,
                "duration": film.duration,
            }));
        }
    }
}
