use cinewheel_models::RatingVector;

/// Composite score: the mechanical average of the five base sub-scores,
/// pushed up or down by the subjective score. The pull grows with the gap
/// between gut feeling and average, and is itself amplified when the
/// subjective score is extreme. Result is rounded to one decimal.
pub fn composite_score(rating: &RatingVector) -> f64 {
    let base: f64 = rating.base_scores().iter().map(|&s| s as f64).sum::<f64>() / 5.0;
    let m = rating.m as f64;
    let diff = m - base;

    let pull = diff * (-0.2 * diff.powi(2) + 50.0) / 100.0;
    let weight = if diff >= 0.0 {
        pull * ((0.5 * m.powi(2) + 50.0) / 100.0)
    } else {
        pull * ((-0.5 * m.powi(2) + 100.0) / 100.0)
    };

    round_to_tenth(base + weight)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Band of a composite score, as shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Terrible,
    Poor,
    Average,
    Good,
    Excellent,
    /// A perfect 10, or a subjective pull past it.
    OffTheScale,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score < 3.0 {
            ScoreBand::Terrible
        } else if score < 5.0 {
            ScoreBand::Poor
        } else if score < 7.0 {
            ScoreBand::Average
        } else if score < 8.5 {
            ScoreBand::Good
        } else if score < 10.0 {
            ScoreBand::Excellent
        } else {
            // Every band is a strict upper bound; an exact 10 lands here
            ScoreBand::OffTheScale
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Terrible => "terrible",
            ScoreBand::Poor => "poor",
            ScoreBand::Average => "average",
            ScoreBand::Good => "good",
            ScoreBand::Excellent => "excellent",
            ScoreBand::OffTheScale => "off the scale",
        }
    }
}
