use std::io::{BufRead, Write};

use numzilla_engine::SessionRng;
use numzilla_engine::puzzle::{Puzzle, PuzzleEvent, render};

use crate::command::{HELP, PlayerCommand, parse_command};

/// Reads commands line by line until `q`, end of input, or a cleared grid.
pub fn run_interactive(
    puzzle: &mut Puzzle,
    input: impl BufRead,
    mut output: impl Write,
) -> std::io::Result<()> {
    let mut hint_rng = SessionRng::new(puzzle.seed().wrapping_add(1));

    writeln!(output, "{}", render(puzzle))?;
    writeln!(output, "{}", HELP)?;
    puzzle.take_events();

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "? {}", err)?;
                continue;
            }
        };

        match command {
            PlayerCommand::Quit => break,
            PlayerCommand::Help => {
                writeln!(output, "{}", HELP)?;
                continue;
            }
            PlayerCommand::Hint => {
                match hint_rng.choose(puzzle.available_matches()) {
                    Some(m) => writeln!(output, "try {} and {}", m.first, m.second)?,
                    None => writeln!(output, "no matches left, build or scramble")?,
                }
                continue;
            }
            PlayerCommand::TryInvalid => {
                match puzzle.invalid_pair() {
                    Some((first, second)) => {
                        if let Err(err) = puzzle.match_pair(first, second) {
                            writeln!(output, "INVALID MATCH: {}", err)?;
                        }
                    }
                    None => writeln!(output, "every neighbouring pair matches")?,
                }
                continue;
            }
            PlayerCommand::Match(first, second) => {
                if let Err(err) = puzzle.match_pair(first, second) {
                    writeln!(output, "INVALID MATCH: {}", err)?;
                    continue;
                }
            }
            PlayerCommand::Build => {
                puzzle.build();
            }
            PlayerCommand::Scramble => {
                if let Err(err) = puzzle.scramble() {
                    writeln!(output, "scramble failed: {}", err)?;
                    continue;
                }
            }
        }

        report_events(puzzle, &mut output)?;
        writeln!(output, "{}", render(puzzle))?;
        if puzzle.is_cleared() {
            writeln!(output, "CLEARED! FINAL SCORE: {}", puzzle.score())?;
            break;
        }
    }
    Ok(())
}

fn report_events(puzzle: &mut Puzzle, output: &mut impl Write) -> std::io::Result<()> {
    for event in puzzle.take_events() {
        match event {
            PuzzleEvent::PairMatched { kind, points, .. } => {
                writeln!(output, "{:?} +{}", kind, points)?;
            }
            PuzzleEvent::RowsCleared { count } => {
                writeln!(output, "{} row(s) removed", count)?;
            }
            PuzzleEvent::Built { added, .. } => {
                writeln!(output, "built {} cells", added)?;
            }
            PuzzleEvent::Scrambled { multiplier, .. } => {
                writeln!(output, "scrambled, multiplier is now {}", multiplier)?;
            }
            _ => {}
        }
    }
    Ok(())
}
