use crate::filter::apply_filters;
use cinewheel_models::{Film, FilterState};
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

pub const SPIN_STEPS: u32 = 20;
pub const SPIN_TICK: Duration = Duration::from_millis(100);

/// Random-pick wheel over the filtered, non-excluded films. At most one
/// spin animation is outstanding: starting a new spin aborts the previous
/// ticker first.
#[derive(Default)]
pub struct Wheel {
    current_spin: Option<AbortHandle>,
}

impl Wheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Films eligible for a spin: the shared filters apply, and excluded
    /// films are dropped on top of them.
    pub fn candidates(
        films: &[Film],
        state: &FilterState,
        favorites: &HashSet<u32>,
        excluded: &HashSet<u32>,
    ) -> Vec<Film> {
        apply_filters(films, state, favorites, Some(excluded))
    }

    /// Uniform random pick without animation (the wheel preview).
    pub fn pick(candidates: &[Film]) -> Option<&Film> {
        if candidates.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..candidates.len());
        Some(&candidates[index])
    }

    /// Animated spin: a fixed-interval ticker shows a random candidate per
    /// step; the candidate of the last step is the result. Returns None for
    /// an empty candidate list or when the spin was aborted by a newer one.
    pub async fn spin<F>(&mut self, candidates: Vec<Film>, mut on_tick: F) -> Option<Film>
    where
        F: FnMut(&Film) + Send + 'static,
    {
        if let Some(previous) = self.current_spin.take() {
            debug!("Cancelling previous spin");
            previous.abort();
        }
        if candidates.is_empty() {
            return None;
        }

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SPIN_TICK);
            let mut chosen = None;
            for _ in 0..SPIN_STEPS {
                interval.tick().await;
                let index = rand::thread_rng().gen_range(0..candidates.len());
                let film = candidates[index].clone();
                on_tick(&film);
                chosen = Some(film);
            }
            chosen
        });
        self.current_spin = Some(task.abort_handle());

        match task.await {
            Ok(result) => {
                self.current_spin = None;
                result
            }
            // Aborted by a newer spin
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn film(id: u32) -> Film {
        Film {
            id,
            title: format!("Film {}", id),
            original_title: None,
            year: 2000,
            genres: Vec::new(),
            director: String::new(),
            duration: String::new(),
            duration_minutes: None,
            poster: String::new(),
            rating: String::new(),
            video_url: None,
            description: String::new(),
        }
    }

    #[test]
    fn candidates_drop_excluded_films() {
        let films = vec![film(1), film(2), film(3)];
        let excluded: HashSet<u32> = [2].into_iter().collect();
        let candidates = Wheel::candidates(
            &films,
            &FilterState::default(),
            &HashSet::new(),
            &excluded,
        );
        let ids: Vec<u32> = candidates.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn pick_from_empty_list_is_none() {
        assert!(Wheel::pick(&[]).is_none());
    }

    #[test]
    fn pick_returns_a_candidate() {
        let films = vec![film(1), film(2), film(3)];
        let picked = Wheel::pick(&films).unwrap();
        assert!(films.iter().any(|f| f.id == picked.id));
    }

    #[tokio::test(start_paused = true)]
    async fn spin_ticks_fixed_number_of_steps_and_lands_on_last() {
        let mut wheel = Wheel::new();
        let ticks = Arc::new(AtomicU32::new(0));
        let last_seen = Arc::new(AtomicU32::new(0));

        let ticks_inner = ticks.clone();
        let last_inner = last_seen.clone();
        let result = wheel
            .spin(vec![film(1), film(2)], move |f| {
                ticks_inner.fetch_add(1, Ordering::SeqCst);
                last_inner.store(f.id, Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert_eq!(ticks.load(Ordering::SeqCst), SPIN_STEPS);
        assert_eq!(result.id, last_seen.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn spin_with_no_candidates_returns_none() {
        let mut wheel = Wheel::new();
        assert!(wheel.spin(Vec::new(), |_| {}).await.is_none());
    }
}
