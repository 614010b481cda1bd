use super::settings::ScoringSettings;
use super::types::MatchKind;
use crate::SessionRng;

#[derive(Clone, Debug)]
pub struct ScoreKeeper {
    settings: ScoringSettings,
    score: u64,
    multiplier: u32,
    median: f64,
}

impl ScoreKeeper {
    pub fn new(settings: ScoringSettings) -> Self {
        let median = median(&settings.multiplier_population);
        Self {
            multiplier: settings.starting_multiplier,
            settings,
            score: 0,
            median,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Points a match is worth at the current multiplier.
    pub fn points_for(&self, kind: MatchKind, rows_removed: usize) -> u64 {
        let bonus = match kind {
            MatchKind::Equal => 1,
            MatchKind::SumToTarget => self.settings.sum_multiplier,
        };
        let base = self
            .settings
            .single_score
            .saturating_mul(2)
            .saturating_add(self.settings.row_score.saturating_mul(rows_removed as u64));
        u64::from(self.multiplier)
            .saturating_mul(bonus)
            .saturating_mul(base)
    }

    pub fn on_match(&mut self, kind: MatchKind, rows_removed: usize) -> u64 {
        let points = self.points_for(kind, rows_removed);
        self.score = self.score.saturating_add(points);
        points
    }

    /// Picks a different multiplier. Low multipliers lean towards higher ones
    /// and vice versa, so the multiplier drifts back to the middle.
    pub fn reroll_multiplier(&mut self, rng: &mut SessionRng) -> u32 {
        let current = self.multiplier;
        let candidates: Vec<u32> = self
            .settings
            .multiplier_population
            .iter()
            .copied()
            .filter(|&m| m != current)
            .collect();

        let picked = if self.settings.weighted_multiplier {
            let table = if f64::from(current) <= self.median {
                &self.settings.weights_current_low
            } else {
                &self.settings.weights_current_high
            };
            rng.choose_weighted_index(table)
                .and_then(|i| candidates.get(i).copied())
        } else {
            rng.choose(&candidates).copied()
        };

        if let Some(next) = picked {
            self.multiplier = next;
        }
        self.multiplier
    }
}

fn median(values: &[u32]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        f64::from(sorted[n / 2])
    } else {
        (f64::from(sorted[n / 2 - 1]) + f64::from(sorted[n / 2])) / 2.0
    }
}
