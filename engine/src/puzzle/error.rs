use thiserror::Error;

use super::types::Position;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PuzzleError {
    #[error("invalid match: {0}")]
    InvalidMatch(#[from] InvalidMatch),
    #[error("no grid with a legal match after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("{0} is not a valid cell value")]
    InvalidCell(i8),
}

/// Why a pair of positions could not be matched. The grid is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidMatch {
    #[error("{0} is outside the grid")]
    OutOfBounds(Position),
    #[error("{0} was picked twice")]
    SamePosition(Position),
    #[error("{0} is already used")]
    AlreadyConsumed(Position),
    #[error("{first_value} and {second_value} are neither equal nor sum to {target}")]
    ValuesDoNotMatch {
        first_value: u8,
        second_value: u8,
        target: u8,
    },
    #[error("{0} and {1} are not neighbours")]
    NotAdjacent(Position, Position),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("width must be positive")]
    ZeroWidth,
    #[error("start rows must be positive")]
    ZeroStartRows,
    #[error("target sum {target} cannot be reached by two cells (must be {lowest}..={highest})")]
    UnreachableTarget { target: u8, lowest: u8, highest: u8 },
    #[error("generation needs at least one attempt")]
    ZeroGenerationAttempts,
    #[error("{name} match weight {value} is out of range")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("{name} {value} must be a non-negative number")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("build count bounds min={min} max={max} are inconsistent")]
    BuildBounds { min: u32, max: u32 },
    #[error("multipliers must be positive")]
    ZeroMultiplier,
    #[error("multiplier population needs at least two distinct values")]
    MultiplierPopulation,
    #[error("starting multiplier {0} is not in the population")]
    StartingMultiplier(u32),
    #[error("{name} has {actual} weights, expected {expected}")]
    WeightTableLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{name} needs non-negative weights with at least one positive")]
    WeightTableValues { name: &'static str },
}
