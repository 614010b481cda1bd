use numzilla_engine::puzzle::Position;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlayerCommand {
    Match(Position, Position),
    Build,
    Scramble,
    Hint,
    TryInvalid,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("match needs four numbers: m <col> <row> <col> <row>")]
    MatchArity,
    #[error("'{0}' is not a positive number")]
    BadNumber(String),
}

pub const HELP: &str = "\
  m <col> <row> <col> <row>   match two cells (1-based)
  b                           build
  s                           scramble
  h                           hint
  i                           try a pair that does not match
  ?                           this help
  q                           quit";

fn parse_coordinate(token: &str) -> Result<usize, CommandError> {
    match token.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadNumber(token.to_string())),
    }
}

pub fn parse_command(line: &str) -> Result<PlayerCommand, CommandError> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Err(CommandError::Empty);
    };

    match head.to_ascii_lowercase().as_str() {
        "m" | "match" => {
            let numbers: Vec<&str> = tokens.collect();
            if numbers.len() != 4 {
                return Err(CommandError::MatchArity);
            }
            let c1 = parse_coordinate(numbers[0])?;
            let r1 = parse_coordinate(numbers[1])?;
            let c2 = parse_coordinate(numbers[2])?;
            let r2 = parse_coordinate(numbers[3])?;
            Ok(PlayerCommand::Match(
                Position::new(c1, r1),
                Position::new(c2, r2),
            ))
        }
        "b" | "build" => Ok(PlayerCommand::Build),
        "s" | "scramble" => Ok(PlayerCommand::Scramble),
        "h" | "hint" => Ok(PlayerCommand::Hint),
        "i" | "invalid" => Ok(PlayerCommand::TryInvalid),
        "?" | "help" => Ok(PlayerCommand::Help),
        "q" | "quit" => Ok(PlayerCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match() {
        assert_eq!(
            parse_command("m 1 2 3 4"),
            Ok(PlayerCommand::Match(Position::new(1, 2), Position::new(3, 4)))
        );
        assert_eq!(
            parse_command("  MATCH 10 1   1 2 "),
            Ok(PlayerCommand::Match(Position::new(10, 1), Position::new(1, 2)))
        );
    }

    #[test]
    fn test_parse_single_letter_commands() {
        assert_eq!(parse_command("b"), Ok(PlayerCommand::Build));
        assert_eq!(parse_command("s"), Ok(PlayerCommand::Scramble));
        assert_eq!(parse_command("h"), Ok(PlayerCommand::Hint));
        assert_eq!(parse_command("i"), Ok(PlayerCommand::TryInvalid));
        assert_eq!(parse_command("q"), Ok(PlayerCommand::Quit));
        assert_eq!(parse_command("?"), Ok(PlayerCommand::Help));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(parse_command("m 1 2 3"), Err(CommandError::MatchArity));
        assert_eq!(
            parse_command("m 1 0 3 4"),
            Err(CommandError::BadNumber("0".to_string()))
        );
        assert_eq!(
            parse_command("m 1 x 3 4"),
            Err(CommandError::BadNumber("x".to_string()))
        );
        assert_eq!(
            parse_command("jump"),
            Err(CommandError::Unknown("jump".to_string()))
        );
    }
}
