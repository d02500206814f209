use memory::{CardId, CardState, GameState, Token};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// What a player can see of one card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardView<'a> {
    FaceDown,
    FaceUp(&'a Token),
    Matched(&'a Token),
}

/// The board as the player sees it, without the hidden tokens.
pub fn board_view(state: &GameState) -> Vec<CardView<'_>> {
    state
        .cards()
        .iter()
        .map(|card| match card.state {
            CardState::FaceDown => CardView::FaceDown,
            CardState::FaceUp => CardView::FaceUp(&card.token),
            CardState::Matched => CardView::Matched(&card.token),
        })
        .collect()
}

/// A trait to simplify writing automated players.
pub trait Player {
    fn name(&self) -> &str;
    fn new_game(&mut self, num_cards: usize);
    /// Picks the next card to flip. Picking a card that is not face-down
    /// wastes the move.
    fn choose(&mut self, board: &[CardView]) -> CardId;
    /// Called whenever a card is turned face-up.
    fn observe(&mut self, card: CardId, token: &Token);
}

/// Flips random face-down cards and remembers nothing.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        "random"
    }

    fn new_game(&mut self, _num_cards: usize) {}

    fn choose(&mut self, board: &[CardView]) -> CardId {
        let face_down: Vec<CardId> = board
            .iter()
            .enumerate()
            .filter(|(_, view)| **view == CardView::FaceDown)
            .map(|(idx, _)| CardId(idx))
            .collect();
        // Falling back to the first card is harmless, the selection is ignored
        face_down
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(CardId(0))
    }

    fn observe(&mut self, _card: CardId, _token: &Token) {}
}
