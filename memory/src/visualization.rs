use crate::{CardState, GameState};

/// How many columns a board of `num_cards` cards is laid out in: the
/// smallest count that gives a grid at least as tall as it is wide.
pub fn grid_columns(num_cards: usize) -> usize {
    let mut columns = 1;
    while columns * columns < num_cards {
        columns += 1;
    }
    columns
}

/// Draws the board as text, with face-down cards shown as `🂠` and matched
/// tokens in brackets.
pub fn visualize_board(state: &GameState) -> String {
    let cards = state.cards();
    let columns = grid_columns(cards.len());
    let cells: Vec<String> = cards
        .iter()
        .map(|card| match card.state {
            CardState::FaceDown => String::from("🂠"),
            CardState::FaceUp => card.token.to_string(),
            CardState::Matched => format!("[{}]", card.token),
        })
        .collect();
    let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);

    // Draw the top of the box
    let inner_width = columns * (width + 1) + 1;
    let mut result = String::from("╭");
    result += &"─".repeat(inner_width);
    result += "╮\n";

    for row in cells.chunks(columns) {
        result += "│ ";
        for cell in row {
            result += &format!("{:<width$} ", cell, width = width);
        }
        for _ in row.len()..columns {
            result += &" ".repeat(width + 1);
        }
        result += "│\n";
    }

    // Draw the bottom of the box
    result += "╰";
    result += &"─".repeat(inner_width);
    result += "╯";
    result
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", visualize_board(self))?;
        write!(
            f,
            "\nguesses: {}, pairs found: {}/{}",
            self.guesses(),
            self.matches(),
            self.pair_count()
        )
    }
}
