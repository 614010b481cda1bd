mod bot;
mod display;
mod economy;
mod error;
mod game_state;
mod grid;
mod match_finder;
mod resolver;
mod scoring;
mod settings;
mod types;

pub use bot::{BotAction, DEFAULT_MAX_STEPS, SolveSummary, Solver, calculate_action};
pub use display::render;
pub use economy::{Economy, GridReading};
pub use error::{InvalidMatch, PuzzleError, SettingsError};
pub use game_state::Puzzle;
pub use grid::Grid;
pub use match_finder::{MatchScan, find_invalid_pair, find_matches, has_matchable_values};
pub use settings::{EconomySettings, MatchWeights, PuzzleSettings, ScoringSettings};
pub use types::{
    ActionOffer, Cell, MAX_CELL_VALUE, MIN_CELL_VALUE, Match, MatchKind, MatchOutcome,
    Orientation, Position, PuzzleEvent,
};
