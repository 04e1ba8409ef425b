use super::{AppContext, FilterArgs};
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use serde_json::json;

pub async fn run_list(filter: FilterArgs, output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let mut session = ctx.session().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    filter.apply(&mut session.filter);
    session.save_filter_state();

    let films = session.filtered(false).await;
    let favorites = session
        .favorites()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if films.is_empty() {
                output.info("No films match the current filters");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Genres").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Duration").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Rating").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Fav").add_attribute(comfy_table::Attribute::Bold),
            ]);
            for film in &films {
                table.add_row(vec![
                    Cell::new(film.id),
                    Cell::new(&film.title),
                    Cell::new(film.year),
                    Cell::new(film.genres.join(", ")),
                    Cell::new(&film.duration),
                    Cell::new(&film.rating),
                    Cell::new(if favorites.contains(&film.id) { "★" } else { "" }),
                ]);
            }
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
            println!("{} film(s)", films.len());
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let items: Vec<serde_json::Value> = films
                .iter()
                .map(|film| {
                    json!({
                        "id": film.id,
                        "title": film.title,
                        "year": film.year,
                        "genres": film.genres,
                        "duration": film.duration,
                        "rating": film.rating,
                        "favorite": favorites.contains(&film.id),
                    })
                })
                .collect();
            output.json(&json!({ "films": items, "count": films.len() }));
        }
    }

    Ok(())
}

pub async fn run_genres(output: &Output) -> Result<()> {
    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let session = ctx.session().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let genres = session.genres();

    match output.format() {
        OutputFormat::Human => {
            if genres.is_empty() {
                output.info("No genres yet. Run `cinewheel enrich` to fetch metadata.");
            }
            for genre in &genres {
                output.println(genre);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "genres": genres }));
        }
    }

    Ok(())
}
