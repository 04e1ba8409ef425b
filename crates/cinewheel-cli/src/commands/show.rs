use super::rate::format_score;
use super::AppContext;
use crate::output::{Output, OutputFormat};
use cinewheel_core::{composite_score, ScoreBand};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use serde_json::json;

pub async fn run_show(id: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let session = ctx.session().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let film = match session.film(id) {
        Some(film) => film.clone(),
        None => {
            output.error(format!("No film with id {}", id));
            return Ok(());
        }
    };

    let favorites = session
        .favorites()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let excluded = session
        .excluded()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let rating = session
        .rating(id)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![Cell::new(&film.title)
                .fg(comfy_table::Color::Cyan)
                .add_attribute(comfy_table::Attribute::Bold)]);
            table.add_row(vec![Cell::new("Year"), Cell::new(film.year)]);
            if let Some(original) = &film.original_title {
                table.add_row(vec![Cell::new("Original title"), Cell::new(original)]);
            }
            table.add_row(vec![Cell::new("Genres"), Cell::new(film.genres.join(", "))]);
            table.add_row(vec![Cell::new("Director"), Cell::new(&film.director)]);
            table.add_row(vec![Cell::new("Duration"), Cell::new(&film.duration)]);
            table.add_row(vec![Cell::new("Rating"), Cell::new(&film.rating)]);
            if !film.poster.is_empty() {
                table.add_row(vec![Cell::new("Poster"), Cell::new(&film.poster)]);
            }
            if let Some(url) = &film.video_url {
                table.add_row(vec![Cell::new("Video"), Cell::new(url)]);
            }
            if !film.description.is_empty() {
                table.add_row(vec![Cell::new("Description"), Cell::new(&film.description)]);
            }
            table.add_row(vec![
                Cell::new("Favorite"),
                Cell::new(if favorites.contains(&id) { "yes" } else { "no" }),
            ]);
            table.add_row(vec![
                Cell::new("Excluded from wheel"),
                Cell::new(if excluded.contains(&id) { "yes" } else { "no" }),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);

            if let Some(rating) = &rating {
                let score = composite_score(rating);
                let band = ScoreBand::for_score(score);
                println!(
                    "Your rating: {} ({}) — scores {:?}, impression {}",
                    format_score(score, band),
                    band.label(),
                    rating.base_scores(),
                    rating.m
                );
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let user_rating = rating.as_ref().map(|r| {
                let score = composite_score(r);
                json!({
                    "scores": r.base_scores(),
                    "impression": r.m,
                    "composite": score,
                    "band": ScoreBand::for_score(score).label(),
                })
            });
            output.json(&json!({
                "film": film,
                "favorite": favorites.contains(&id),
                "excluded": excluded.contains(&id),
                "user_rating": user_rating,
            }));
        }
    }

    Ok(())
}
