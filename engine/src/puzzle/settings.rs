use serde::{Deserialize, Serialize};

use super::error::SettingsError;
use super::types::{MAX_CELL_VALUE, MIN_CELL_VALUE};
use crate::config::Validate;

/// Everything tunable about a puzzle session. Built once, validated once,
/// then handed to the engine by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleSettings {
    /// Cells per row.
    pub width: usize,
    /// Rows dealt by `generate`.
    pub start_rows: usize,
    /// Two values summing to this match each other.
    pub target_sum: u8,
    /// Ceiling for the generate and scramble retry loops.
    pub max_generation_attempts: u32,
    /// Reject pairs that match by value but were not discovered by the
    /// adjacency scan.
    pub require_adjacent: bool,
    pub weights: MatchWeights,
    pub economy: EconomySettings,
    pub scoring: ScoringSettings,
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        Self {
            width: 10,
            start_rows: 6,
            target_sum: 10,
            max_generation_attempts: 100,
            require_adjacent: false,
            weights: MatchWeights::default(),
            economy: EconomySettings::default(),
            scoring: ScoringSettings::default(),
        }
    }
}

/// Grid value contributed by one discovered match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub row: f64,
    pub column: f64,
    /// Fraction of the orientation weight kept when a match reuses a cell.
    pub reuse: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            row: 1.2,
            column: 1.0,
            reuse: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomySettings {
    /// Row count from which scramble may replace build.
    pub scramble_rows: usize,
    /// Share of `scramble_rows` a grid needs before it can be considered
    /// dried up.
    pub scramble_row_fraction: f64,
    /// Builds after which a tall grid is scrambled instead of built.
    pub build_count_min: u32,
    /// Builds after which build is retired until the next scramble.
    pub build_count_max: u32,
    /// Grid value at or below `baseline × this` counts as low.
    pub build_scramble_threshold: f64,
    /// Grid value at or below `baseline × this` counts as dried up.
    pub dry_value_threshold: f64,
    /// Active cells per row above which a build streak turns into scramble.
    pub density_threshold: f64,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            scramble_rows: 20,
            scramble_row_fraction: 0.4,
            build_count_min: 6,
            build_count_max: 12,
            build_scramble_threshold: 0.2,
            dry_value_threshold: 0.05,
            density_threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Points per cell of a match.
    pub single_score: u64,
    /// Points per row removed by a match.
    pub row_score: u64,
    /// Extra factor for sum-to-target matches.
    pub sum_multiplier: u64,
    pub starting_multiplier: u32,
    pub multiplier_population: Vec<u32>,
    /// Reroll weights while the multiplier is at or below the median.
    /// One entry per population member except the current one.
    pub weights_current_low: Vec<f64>,
    /// Reroll weights while the multiplier is above the median.
    pub weights_current_high: Vec<f64>,
    pub weighted_multiplier: bool,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            single_score: 1,
            row_score: 10,
            sum_multiplier: 2,
            starting_multiplier: 1,
            multiplier_population: vec![1, 2, 3, 4, 5, 6, 7, 8],
            weights_current_low: vec![0.04, 0.06, 0.1, 0.2, 0.3, 0.2, 0.1],
            weights_current_high: vec![0.1, 0.2, 0.3, 0.2, 0.1, 0.06, 0.04],
            weighted_multiplier: true,
        }
    }
}

impl Validate for PuzzleSettings {
    type Error = SettingsError;

    fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 {
            return Err(SettingsError::ZeroWidth);
        }
        if self.start_rows == 0 {
            return Err(SettingsError::ZeroStartRows);
        }
        let lowest = MIN_CELL_VALUE * 2;
        let highest = MAX_CELL_VALUE * 2;
        if self.target_sum < lowest || self.target_sum > highest {
            return Err(SettingsError::UnreachableTarget {
                target: self.target_sum,
                lowest,
                highest,
            });
        }
        if self.max_generation_attempts == 0 {
            return Err(SettingsError::ZeroGenerationAttempts);
        }
        self.weights.validate()?;
        self.economy.validate()?;
        self.scoring.validate()
    }
}

impl MatchWeights {
    fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [("row", self.row), ("column", self.column)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::InvalidWeight { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.reuse) {
            return Err(SettingsError::InvalidWeight {
                name: "reuse",
                value: self.reuse,
            });
        }
        Ok(())
    }
}

impl EconomySettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.build_count_max == 0 || self.build_count_min > self.build_count_max {
            return Err(SettingsError::BuildBounds {
                min: self.build_count_min,
                max: self.build_count_max,
            });
        }
        for (name, value) in [
            ("scramble_row_fraction", self.scramble_row_fraction),
            ("build_scramble_threshold", self.build_scramble_threshold),
            ("dry_value_threshold", self.dry_value_threshold),
            ("density_threshold", self.density_threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

impl ScoringSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        let population = &self.multiplier_population;
        if population.contains(&0) {
            return Err(SettingsError::ZeroMultiplier);
        }
        let mut distinct = population.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != population.len() || distinct.len() < 2 {
            return Err(SettingsError::MultiplierPopulation);
        }
        if !population.contains(&self.starting_multiplier) {
            return Err(SettingsError::StartingMultiplier(self.starting_multiplier));
        }
        for (name, table) in [
            ("weights_current_low", &self.weights_current_low),
            ("weights_current_high", &self.weights_current_high),
        ] {
            if table.len() != population.len() - 1 {
                return Err(SettingsError::WeightTableLength {
                    name,
                    expected: population.len() - 1,
                    actual: table.len(),
                });
            }
            let usable = table.iter().all(|w| w.is_finite() && *w >= 0.0)
                && table.iter().any(|w| *w > 0.0);
            if !usable {
                return Err(SettingsError::WeightTableValues { name });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PuzzleSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let settings = PuzzleSettings {
            width: 0,
            ..PuzzleSettings::default()
        };

        assert_eq!(settings.validate(), Err(SettingsError::ZeroWidth));
    }

    #[test]
    fn test_unreachable_target_rejected() {
        for target in [0, 1, 19, 40] {
            let settings = PuzzleSettings {
                target_sum: target,
                ..PuzzleSettings::default()
            };

            assert!(matches!(
                settings.validate(),
                Err(SettingsError::UnreachableTarget { .. })
            ));
        }
    }

    #[test]
    fn test_inverted_build_bounds_rejected() {
        let mut settings = PuzzleSettings::default();
        settings.economy.build_count_min = 13;

        assert!(matches!(
            settings.validate(),
            Err(SettingsError::BuildBounds { min: 13, max: 12 })
        ));
    }

    #[test]
    fn test_weight_table_length_must_match_population() {
        let mut settings = PuzzleSettings::default();
        settings.scoring.multiplier_population = vec![1, 2, 3];

        assert!(matches!(
            settings.validate(),
            Err(SettingsError::WeightTableLength { expected: 2, actual: 7, .. })
        ));
    }

    #[test]
    fn test_starting_multiplier_must_be_in_population() {
        let mut settings = PuzzleSettings::default();
        settings.scoring.starting_multiplier = 9;

        assert_eq!(settings.validate(), Err(SettingsError::StartingMultiplier(9)));
    }

    #[test]
    fn test_duplicate_multipliers_rejected() {
        let mut settings = PuzzleSettings::default();
        settings.scoring.multiplier_population = vec![1, 1, 2, 3, 4, 5, 6, 7];

        assert_eq!(settings.validate(), Err(SettingsError::MultiplierPopulation));
    }

    #[test]
    fn test_negative_reuse_weight_rejected() {
        let mut settings = PuzzleSettings::default();
        settings.weights.reuse = -0.1;

        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidWeight { name: "reuse", .. })
        ));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "width: 5\neconomy:\n  build_count_max: 3\n";

        let settings: PuzzleSettings = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(settings.width, 5);
        assert_eq!(settings.start_rows, 6);
        assert_eq!(settings.economy.build_count_max, 3);
        assert_eq!(settings.economy.build_count_min, 6);
        assert_eq!(settings.scoring, ScoringSettings::default());
    }
}
