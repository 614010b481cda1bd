use std::collections::BTreeMap;
use std::fmt;

use super::game_state::Puzzle;
use super::types::Match;
use crate::SessionRng;
use crate::logger::Verbosity;

pub const DEFAULT_MAX_STEPS: u64 = 100_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BotAction {
    Match(Match),
    Build,
    Scramble,
    Stop,
}

/// Picks the next move: any available match at random, otherwise the
/// recovery action the economy asks for. With `fully_solve` off the bot
/// stops instead of scrambling.
pub fn calculate_action(puzzle: &Puzzle, fully_solve: bool, rng: &mut SessionRng) -> BotAction {
    if let Some(m) = rng.choose(puzzle.available_matches()) {
        return BotAction::Match(*m);
    }
    if puzzle.is_cleared() {
        return BotAction::Stop;
    }
    if puzzle.scramble_enabled() {
        return if fully_solve {
            BotAction::Scramble
        } else {
            BotAction::Stop
        };
    }
    BotAction::Build
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolveSummary {
    pub steps: u64,
    pub highest_row_count: usize,
    pub matches: u64,
    pub builds: u64,
    pub scrambles: u64,
    pub score: u64,
    /// How many cycles were played at each multiplier, the opening one
    /// included.
    pub multipliers: BTreeMap<u32, u32>,
    pub cleared: bool,
}

impl fmt::Display for SolveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### SOLVE")?;
        writeln!(f, "  TOTAL STEPS:       {:>6}", self.steps)?;
        writeln!(f, "  HIGHEST ROW COUNT: {:>6}", self.highest_row_count)?;
        writeln!(f, "  TOTAL MATCHES:     {:>6}", self.matches)?;
        writeln!(f, "  TOTAL BUILDS:      {:>6}", self.builds)?;
        writeln!(f, "  TOTAL SCRAMBLES:   {:>6}", self.scrambles)?;
        writeln!(f, "  SCORE:             {:>6}", self.score)?;
        write!(f, "  MULTIPLIERS:")?;
        for (multiplier, count) in &self.multipliers {
            write!(f, "\n  {} : {}", multiplier, "*".repeat(*count as usize))?;
        }
        Ok(())
    }
}

/// Plays a puzzle on its own until it is cleared, it stalls (partial
/// solve), or the step ceiling is hit.
pub struct Solver {
    rng: SessionRng,
    fully_solve: bool,
    max_steps: u64,
}

impl Solver {
    pub fn new(rng: SessionRng, fully_solve: bool, max_steps: u64) -> Self {
        Self {
            rng,
            fully_solve,
            max_steps,
        }
    }

    pub fn run(&mut self, puzzle: &mut Puzzle) -> SolveSummary {
        let mut summary = SolveSummary {
            steps: 0,
            highest_row_count: puzzle.row_count(),
            matches: 0,
            builds: 0,
            scrambles: 0,
            score: puzzle.score(),
            multipliers: puzzle
                .settings()
                .scoring
                .multiplier_population
                .iter()
                .map(|&m| (m, 0))
                .collect(),
            cleared: puzzle.is_cleared(),
        };
        *summary.multipliers.entry(puzzle.multiplier()).or_insert(0) += 1;

        while summary.steps < self.max_steps {
            let label = match calculate_action(puzzle, self.fully_solve, &mut self.rng) {
                BotAction::Match(m) => match puzzle.match_pair(m.first, m.second) {
                    Ok(_) => {
                        summary.matches += 1;
                        "MATCH"
                    }
                    Err(err) => {
                        crate::log!(Verbosity::Solver, "### SOLVER: discovered match refused: {}", err);
                        break;
                    }
                },
                BotAction::Build => {
                    puzzle.build();
                    summary.builds += 1;
                    "BUILD"
                }
                BotAction::Scramble => match puzzle.scramble() {
                    Ok(multiplier) => {
                        summary.scrambles += 1;
                        *summary.multipliers.entry(multiplier).or_insert(0) += 1;
                        "SCRAMBLE"
                    }
                    Err(err) => {
                        crate::log!(Verbosity::Solver, "### SOLVER: {}, building instead", err);
                        puzzle.build();
                        summary.builds += 1;
                        "BUILD"
                    }
                },
                BotAction::Stop => break,
            };

            summary.steps += 1;
            summary.highest_row_count = summary.highest_row_count.max(puzzle.row_count());
            crate::log!(
                Verbosity::Solver,
                "STEP {:>6} | {:^8} | ROWS {:>3} | NUMS {:>4} | MATCHES {:>5} | MULTIPLIER {} | SCORE {:>7} ",
                summary.steps,
                label,
                puzzle.row_count(),
                puzzle.active_count(),
                puzzle.match_count(),
                puzzle.multiplier(),
                puzzle.score()
            );
        }

        summary.score = puzzle.score();
        summary.cleared = puzzle.is_cleared();
        summary
    }
}
