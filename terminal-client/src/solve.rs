use std::io::Write;
use std::time::Instant;

use numzilla_engine::SessionRng;
use numzilla_engine::puzzle::{Puzzle, SolveSummary, Solver, render};

pub struct SolveOptions {
    pub fully_solve: bool,
    pub max_steps: u64,
}

/// Lets the bot play, then prints the final grid, the summary and the
/// runtime.
pub fn run_solver(
    puzzle: &mut Puzzle,
    options: &SolveOptions,
    mut output: impl Write,
) -> std::io::Result<SolveSummary> {
    let start = Instant::now();
    writeln!(output, "{}", render(puzzle))?;

    let bot_rng = SessionRng::new(puzzle.seed().wrapping_add(1));
    let summary = Solver::new(bot_rng, options.fully_solve, options.max_steps).run(puzzle);

    writeln!(output, "{}", render(puzzle))?;
    writeln!(output, "{}", summary)?;
    if !summary.cleared && options.fully_solve {
        writeln!(output, "  STOPPED AFTER {} STEPS", summary.steps)?;
    }
    writeln!(output, "TOTAL RUNTIME: {}", start.elapsed().as_secs_f64())?;
    Ok(summary)
}
