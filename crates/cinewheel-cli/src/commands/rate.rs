use super::AppContext;
use crate::output::{Output, OutputFormat};
use cinewheel_core::ScoreBand;
use cinewheel_models::RatingVector;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_rate(id: u32, scores: &[u8], output: &Output) -> Result<()> {
    // clap guarantees exactly six values in 1..=10
    let rating = RatingVector {
        s1: scores[0],
        s2: scores[1],
        s3: scores[2],
        s4: scores[3],
        s5: scores[4],
        m: scores[5],
    };

    let ctx = AppContext::load().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let session = ctx.session().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let title = match session.film(id) {
        Some(film) => film.title.clone(),
        None => {
            output.error(format!("No film with id {}", id));
            return Ok(());
        }
    };

    let score = session
        .rate(id, rating)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let band = ScoreBand::for_score(score);

    match output.format() {
        OutputFormat::Human => {
            output.success(format!(
                "Rated \"{}\": {} ({})",
                title,
                format_score(score, band),
                band.label()
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "id": id,
                "title": title,
                "composite": score,
                "band": band.label(),
            }));
        }
    }

    Ok(())
}

pub(crate) fn format_score(score: f64, band: ScoreBand) -> String {
    match band {
        ScoreBand::Terrible | ScoreBand::Poor => score.red().to_string(),
        ScoreBand::Average => score.yellow().to_string(),
        ScoreBand::Good | ScoreBand::Excellent => score.green().to_string(),
        ScoreBand::OffTheScale => score.magenta().bold().to_string(),
    }
}
