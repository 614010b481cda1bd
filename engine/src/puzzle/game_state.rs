use super::display;
use super::economy::{Economy, GridReading};
use super::error::{InvalidMatch, PuzzleError};
use super::grid::Grid;
use super::match_finder::{MatchScan, find_invalid_pair, find_matches, has_matchable_values};
use super::resolver;
use super::scoring::ScoreKeeper;
use super::settings::PuzzleSettings;
use super::types::{
    ActionOffer, Cell, MAX_CELL_VALUE, MIN_CELL_VALUE, Match, MatchKind, MatchOutcome, Position,
    PuzzleEvent,
};
use crate::SessionRng;
use crate::config::Validate;
use crate::logger::Verbosity;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Step {
    Generate,
    Match,
    Build,
    Scramble,
}

/// One puzzle session: the grid plus everything derived from it.
///
/// Each mutating call runs to completion and ends in `settle`, which
/// rescans matches and recomputes the build/scramble offers, so readers
/// never see a half-updated state.
pub struct Puzzle {
    settings: PuzzleSettings,
    rng: SessionRng,
    grid: Grid,
    scan: MatchScan,
    scoring: ScoreKeeper,
    economy: Economy,
    cycle_start_rows: usize,
    pending_events: Vec<PuzzleEvent>,
}

impl Puzzle {
    /// Validates the settings and deals the first grid.
    pub fn new(settings: PuzzleSettings, rng: SessionRng) -> Result<Self, PuzzleError> {
        let mut puzzle = Self::empty(settings, rng)?;
        puzzle.generate()?;
        Ok(puzzle)
    }

    /// Starts from a given layout instead of a dealt one. Negative values
    /// are consumed cells.
    pub fn from_values(
        settings: PuzzleSettings,
        values: &[i8],
        rng: SessionRng,
    ) -> Result<Self, PuzzleError> {
        if let Some(&bad) = values
            .iter()
            .find(|v| !(MIN_CELL_VALUE..=MAX_CELL_VALUE).contains(&v.unsigned_abs()))
        {
            return Err(PuzzleError::InvalidCell(bad));
        }
        let mut puzzle = Self::empty(settings, rng)?;
        puzzle.grid = Grid::from_values(values, puzzle.settings.width);
        puzzle.cycle_start_rows = puzzle.grid.row_count();
        puzzle.settle(Step::Generate);
        Ok(puzzle)
    }

    fn empty(settings: PuzzleSettings, rng: SessionRng) -> Result<Self, PuzzleError> {
        settings.validate()?;
        Ok(Self {
            grid: Grid::new(Vec::new(), settings.width),
            scan: MatchScan::default(),
            scoring: ScoreKeeper::new(settings.scoring.clone()),
            economy: Economy::new(settings.economy),
            cycle_start_rows: 0,
            pending_events: Vec::new(),
            settings,
            rng,
        })
    }

    /// Deals a fresh grid of paired values and restarts the economy. Score
    /// and multiplier carry over. Draws again until the grid holds a match,
    /// up to the attempt ceiling; on failure the session is left as it was.
    pub fn generate(&mut self) -> Result<(), PuzzleError> {
        let max_attempts = self.settings.max_generation_attempts;
        for attempt in 1..=max_attempts {
            let candidate = Grid::new(self.deal(), self.settings.width);
            if self.scan_of(&candidate).is_empty() {
                crate::log!(Verbosity::Events, "### GENERATE: NO MATCHES, REGENERATING");
                continue;
            }

            self.grid = candidate;
            self.economy = Economy::new(self.settings.economy);
            self.cycle_start_rows = self.grid.row_count();
            self.pending_events.push(PuzzleEvent::Generated {
                attempts: attempt,
                row_count: self.grid.row_count(),
            });
            crate::log!(Verbosity::Events, "### GENERATE");
            self.settle(Step::Generate);
            return Ok(());
        }
        Err(PuzzleError::GenerationExhausted {
            attempts: max_attempts,
        })
    }

    /// Each value is drawn once and placed twice, so the count is even and a
    /// fresh grid always holds equal pairs somewhere.
    fn deal(&mut self) -> Vec<Cell> {
        let mut length = self.settings.start_rows * self.settings.width;
        if length % 2 != 0 {
            length += 1;
        }
        let mut cells = Vec::with_capacity(length);
        for _ in 0..length / 2 {
            let value: u8 = self.rng.random_range(MIN_CELL_VALUE..=MAX_CELL_VALUE);
            cells.push(Cell::new(value));
            cells.push(Cell::new(value));
        }
        self.rng.shuffle(&mut cells);
        cells
    }

    /// Consumes the pair, clears finished rows and scores the match. The
    /// grid is untouched when the pair is rejected.
    pub fn match_pair(
        &mut self,
        first: Position,
        second: Position,
    ) -> Result<MatchOutcome, InvalidMatch> {
        let (v1, v2) = (self.display_value(first), self.display_value(second));
        let discovered = self
            .settings
            .require_adjacent
            .then_some(self.scan.matches.as_slice());

        let resolution = match resolver::resolve(
            &mut self.grid,
            first,
            second,
            self.settings.target_sum,
            discovered,
        ) {
            Ok(resolution) => resolution,
            Err(err) => {
                crate::log!(
                    Verbosity::Events,
                    "### MATCH: {}: {} & {}: {} | INVALID MATCH",
                    first,
                    v1,
                    second,
                    v2
                );
                self.pending_events
                    .push(PuzzleEvent::MatchRejected { first, second });
                return Err(err);
            }
        };

        let points = self
            .scoring
            .on_match(resolution.kind, resolution.rows_removed);
        let kind_text = match resolution.kind {
            MatchKind::Equal => "PAIR",
            MatchKind::SumToTarget => "SUM",
        };
        if resolution.rows_removed > 0 {
            crate::log!(
                Verbosity::Events,
                "### MATCH: {}: {} & {}: {} | {} + {} ROW(s) REMOVED | SCORE: {}",
                first,
                v1,
                second,
                v2,
                kind_text,
                resolution.rows_removed,
                points
            );
        } else {
            crate::log!(
                Verbosity::Events,
                "### MATCH: {}: {} & {}: {} | {} | SCORE: {}",
                first,
                v1,
                second,
                v2,
                kind_text,
                points
            );
        }

        self.pending_events.push(PuzzleEvent::PairMatched {
            first,
            second,
            kind: resolution.kind,
            points,
        });
        if resolution.rows_removed > 0 {
            self.pending_events.push(PuzzleEvent::RowsCleared {
                count: resolution.rows_removed,
            });
        }

        self.settle(Step::Match);
        if self.grid.is_empty() {
            self.pending_events.push(PuzzleEvent::Cleared);
        }

        Ok(MatchOutcome {
            kind: resolution.kind,
            rows_removed: resolution.rows_removed,
            points,
        })
    }

    fn display_value(&self, pos: Position) -> String {
        match self.grid.index_of(pos).and_then(|i| self.grid.get(i)) {
            Some(cell) if cell.is_active() => cell.value().to_string(),
            _ => "_".to_string(),
        }
    }

    /// Appends a copy of every active cell. Allowed whether or not build is
    /// currently offered. Build cannot fail, so instead of a `Result` it
    /// returns the number of cells added.
    pub fn build(&mut self) -> usize {
        self.economy.record_build();
        let added = self.grid.append_active_copies();
        self.pending_events.push(PuzzleEvent::Built {
            added,
            row_count: self.grid.row_count(),
        });
        crate::log!(Verbosity::Events, "### BUILD");
        self.settle(Step::Build);
        added
    }

    /// Drops consumed cells, reshuffles the rest until a match appears and
    /// rerolls the multiplier. Allowed whether or not scramble is currently
    /// offered. On failure the session is left as it was.
    pub fn scramble(&mut self) -> Result<u32, PuzzleError> {
        let mut cells: Vec<Cell> = self
            .grid
            .cells()
            .iter()
            .copied()
            .filter(|c| c.is_active())
            .collect();
        let values: Vec<u8> = self.grid.active_values().collect();
        if !has_matchable_values(&values, self.settings.target_sum) {
            return Err(PuzzleError::GenerationExhausted { attempts: 0 });
        }

        let max_attempts = self.settings.max_generation_attempts;
        for attempt in 1..=max_attempts {
            self.rng.shuffle(&mut cells);
            let candidate = Grid::new(cells.clone(), self.settings.width);
            if self.scan_of(&candidate).is_empty() {
                crate::log!(Verbosity::Events, "### SCRAMBLE: NO MATCHES, SCRAMBLING");
                continue;
            }

            self.grid = candidate;
            let multiplier = self.scoring.reroll_multiplier(&mut self.rng);
            self.cycle_start_rows = self.grid.row_count();
            self.pending_events.push(PuzzleEvent::Scrambled {
                attempts: attempt,
                multiplier,
            });
            crate::log!(
                Verbosity::Events,
                "### SCRAMBLE: NEW MULTIPLIER = {}",
                multiplier
            );
            self.settle(Step::Scramble);
            return Ok(multiplier);
        }
        Err(PuzzleError::GenerationExhausted {
            attempts: max_attempts,
        })
    }

    fn scan_of(&self, grid: &Grid) -> MatchScan {
        find_matches(grid, self.settings.target_sum, self.settings.weights)
    }

    /// Brings everything derived from the grid back in line after a step.
    fn settle(&mut self, step: Step) {
        if step == Step::Match {
            self.economy.record_match();
        }

        self.scan = self.scan_of(&self.grid);
        if matches!(step, Step::Generate | Step::Scramble) {
            self.economy.start_cycle(self.scan.grid_value);
        }

        let reading = GridReading {
            row_count: self.grid.row_count(),
            active_count: self.grid.active_count(),
            grid_value: self.scan.grid_value,
        };
        let before = (self.economy.build_enabled(), self.economy.scramble_enabled());
        if self.economy.recompute(reading) {
            self.announce_offers(before);
        }
        crate::log!(Verbosity::Grid, "{}", display::render(self));
    }

    fn announce_offers(&mut self, before: (bool, bool)) {
        let build = self.economy.build_enabled();
        let scramble = self.economy.scramble_enabled();
        if build != before.0 {
            let text = if build {
                "### + BUILD ENABLED"
            } else {
                "### - BUILD DISABLED"
            };
            crate::log!(Verbosity::Events, "{}", text);
        }
        if scramble != before.1 {
            let text = if scramble {
                "### * SCRAMBLE ENABLED"
            } else {
                "### o SCRAMBLE DISABLED"
            };
            crate::log!(Verbosity::Events, "{}", text);
        }
        self.pending_events
            .push(PuzzleEvent::OffersChanged { build, scramble });
    }

    pub fn take_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Signed cell values in reading order plus the row width.
    pub fn snapshot(&self) -> (Vec<i8>, usize) {
        (self.grid.raw_values(), self.grid.width())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The first active cell whose next active cell does not pair with it,
    /// for showing what a rejected match looks like.
    pub fn invalid_pair(&self) -> Option<(Position, Position)> {
        find_invalid_pair(&self.grid, self.settings.target_sum)
            .map(|(a, b)| (self.grid.position_of(a), self.grid.position_of(b)))
    }

    pub fn available_matches(&self) -> &[Match] {
        &self.scan.matches
    }

    pub fn match_count(&self) -> usize {
        self.scan.matches.len()
    }

    pub fn grid_value(&self) -> f64 {
        self.scan.grid_value
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    pub fn active_count(&self) -> usize {
        self.grid.active_count()
    }

    pub fn is_cleared(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn build_enabled(&self) -> bool {
        self.economy.build_enabled()
    }

    pub fn scramble_enabled(&self) -> bool {
        self.economy.scramble_enabled()
    }

    pub fn offer(&self) -> ActionOffer {
        self.economy.offer(self.scan.grid_value)
    }

    pub fn build_count(&self) -> u32 {
        self.economy.build_count()
    }

    pub fn consecutive_builds(&self) -> u32 {
        self.economy.consecutive_builds()
    }

    /// Row count right after the last generate or scramble.
    pub fn cycle_start_rows(&self) -> usize {
        self.cycle_start_rows
    }

    pub fn score(&self) -> u64 {
        self.scoring.score()
    }

    pub fn multiplier(&self) -> u32 {
        self.scoring.multiplier()
    }

    pub fn settings(&self) -> &PuzzleSettings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}
