use super::game_state::Puzzle;
use super::types::Cell;

fn cell_text(cell: Cell) -> String {
    if cell.is_active() {
        format!(" {} ", cell.value())
    } else {
        format!("({})", cell.value())
    }
}

fn centered(text: &str, width: usize) -> String {
    let span = (width * 3 + width.saturating_sub(2)) as i64;
    let offset = ((span - text.len() as i64) / 2 + 1).max(1) as usize;
    format!("{}{}", " ".repeat(offset), text)
}

/// Text view of the puzzle: score and multiplier centred over the grid,
/// live cells as ` v `, used ones as `(v)`, then the derived figures and the
/// current offers.
pub fn render(puzzle: &Puzzle) -> String {
    let width = puzzle.settings().width;
    let rule_len = width * 3 + width.saturating_sub(1);
    let outer = "=".repeat(rule_len);
    let inner = "-".repeat(rule_len);

    let mut lines = vec![
        outer.clone(),
        centered(&format!("SCORE: {}", puzzle.score()), width),
        centered(&format!("MULTIPLIER: {}", puzzle.multiplier()), width),
    ];
    for row in puzzle.grid().rows() {
        let cells: Vec<String> = row.iter().map(|&c| cell_text(c)).collect();
        lines.push(cells.join(" "));
    }
    lines.push(inner.clone());
    lines.push(format!("  GRID MATCHES:   {}", puzzle.match_count()));
    lines.push(format!("  GRID VALUE:     {:.2}", puzzle.grid_value()));
    lines.push(format!("  ROW COUNT:      {}", puzzle.row_count()));
    lines.push(format!("  BUILD COUNT:    {}", puzzle.build_count()));
    lines.push(inner);
    lines.push(if puzzle.build_enabled() {
        " +BUILD ENABLED".to_string()
    } else {
        "  BUILD DISABLED".to_string()
    });
    lines.push(if puzzle.scramble_enabled() {
        " *SCRAMBLE ENABLED".to_string()
    } else {
        "  SCRAMBLE DISABLED".to_string()
    });
    lines.push(outer);
    lines.join("\n")
}
