use serde::{Deserialize, Serialize};

use crate::Token;

/// The position of a card on the board, which is its index in the [`Deck`](crate::Deck).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub usize);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a card is showing, and why.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    FaceDown,
    /// Flipped this turn and waiting for the pair to be resolved.
    FaceUp,
    /// Part of a found pair. Stays face-up for the rest of the game.
    Matched,
}

impl CardState {
    /// Whether the token is visible.
    pub fn is_flipped(self) -> bool {
        !matches!(self, CardState::FaceDown)
    }
}

/// A card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub token: Token,
    pub state: CardState,
}

impl Card {
    pub fn face_down(token: Token) -> Self {
        Self {
            token,
            state: CardState::FaceDown,
        }
    }

    /// The token, if it is visible.
    pub fn visible_token(&self) -> Option<&Token> {
        self.state.is_flipped().then_some(&self.token)
    }
}
