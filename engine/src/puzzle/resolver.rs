use super::error::InvalidMatch;
use super::grid::Grid;
use super::types::{Match, MatchKind, Position};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Resolution {
    pub kind: MatchKind,
    pub rows_removed: usize,
}

/// Checks a pair without touching the grid. `discovered` is only consulted
/// when adjacency is enforced.
pub fn check_pair(
    grid: &Grid,
    first: Position,
    second: Position,
    target: u8,
    discovered: Option<&[Match]>,
) -> Result<(usize, usize, MatchKind), InvalidMatch> {
    let i1 = grid.index_of(first).ok_or(InvalidMatch::OutOfBounds(first))?;
    let i2 = grid.index_of(second).ok_or(InvalidMatch::OutOfBounds(second))?;
    if i1 == i2 {
        return Err(InvalidMatch::SamePosition(first));
    }

    let (c1, c2) = (grid.cells()[i1], grid.cells()[i2]);
    if !c1.is_active() {
        return Err(InvalidMatch::AlreadyConsumed(first));
    }
    if !c2.is_active() {
        return Err(InvalidMatch::AlreadyConsumed(second));
    }

    let kind = MatchKind::of(c1.value(), c2.value(), target).ok_or(
        InvalidMatch::ValuesDoNotMatch {
            first_value: c1.value(),
            second_value: c2.value(),
            target,
        },
    )?;

    if let Some(matches) = discovered
        && !matches.iter().any(|m| m.connects(first, second))
    {
        return Err(InvalidMatch::NotAdjacent(first, second));
    }

    Ok((i1, i2, kind))
}

/// Consumes both cells and deletes every row left fully consumed.
pub fn resolve(
    grid: &mut Grid,
    first: Position,
    second: Position,
    target: u8,
    discovered: Option<&[Match]>,
) -> Result<Resolution, InvalidMatch> {
    let (i1, i2, kind) = check_pair(grid, first, second, target, discovered)?;

    grid.consume(i1);
    grid.consume(i2);
    let rows_removed = grid.remove_consumed_rows();

    Ok(Resolution { kind, rows_removed })
}
