use std::collections::BTreeMap;

use memory::{CardId, Token};

use crate::{CardView, Player};

/// Every token seen so far, derived from observing all flipped cards.
///
/// Matched cards are forgotten, since they can never be played again.
#[derive(Clone, Debug, Default)]
pub struct TokenMemory {
    seen: BTreeMap<CardId, Token>,
}

impl TokenMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn remember(&mut self, card: CardId, token: &Token) {
        self.seen.insert(card, token.clone());
    }

    pub fn recall(&self, card: CardId) -> Option<&Token> {
        self.seen.get(&card)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forgets all cards that are already matched on `board`.
    pub fn forget_matched(&mut self, board: &[CardView]) {
        self.seen
            .retain(|card, _| !matches!(board.get(card.0), Some(CardView::Matched(_)) | None));
    }

    /// A face-down card other than `except` that is known to show `token`.
    pub fn partner_of(&self, token: &Token, except: CardId, board: &[CardView]) -> Option<CardId> {
        self.seen
            .iter()
            .find(|&(&card, seen)| {
                card != except && seen == token && board.get(card.0) == Some(&CardView::FaceDown)
            })
            .map(|(&card, _)| card)
    }

    /// Two face-down cards known to show the same token.
    pub fn known_pair(&self, board: &[CardView]) -> Option<(CardId, CardId)> {
        for (&card, token) in &self.seen {
            if board.get(card.0) != Some(&CardView::FaceDown) {
                continue;
            }
            if let Some(partner) = self.partner_of(token, card, board) {
                return Some((card, partner));
            }
        }
        None
    }
}

/// Remembers every card it has seen and collects known pairs first.
#[derive(Default)]
pub struct RecallPlayer {
    memory: TokenMemory,
}

impl RecallPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn first_unseen(&self, board: &[CardView]) -> Option<CardId> {
        (0..board.len())
            .map(CardId)
            .find(|&card| board[card.0] == CardView::FaceDown && self.memory.recall(card).is_none())
    }

    fn any_face_down(board: &[CardView]) -> Option<CardId> {
        (0..board.len())
            .map(CardId)
            .find(|&card| board[card.0] == CardView::FaceDown)
    }
}

impl Player for RecallPlayer {
    fn name(&self) -> &str {
        "recall"
    }

    fn new_game(&mut self, _num_cards: usize) {
        self.memory.clear();
    }

    fn choose(&mut self, board: &[CardView]) -> CardId {
        self.memory.forget_matched(board);

        let face_up = board.iter().enumerate().find_map(|(idx, view)| match view {
            CardView::FaceUp(token) => Some((CardId(idx), *token)),
            _ => None,
        });
        let choice = match face_up {
            Some((first, token)) => self
                .memory
                .partner_of(token, first, board)
                .or_else(|| self.first_unseen(board)),
            None => self
                .memory
                .known_pair(board)
                .map(|(card, _)| card)
                .or_else(|| self.first_unseen(board)),
        };
        choice
            .or_else(|| Self::any_face_down(board))
            .unwrap_or(CardId(0))
    }

    fn observe(&mut self, card: CardId, token: &Token) {
        self.memory.remember(card, token);
    }
}

#[cfg(test)]
mod tests {
    use memory::token;

    use super::*;

    #[test]
    fn completes_a_known_pair() {
        let a = token!("A");
        let b = token!("B");
        let mut player = RecallPlayer::new();
        player.new_game(4);
        player.observe(CardId(0), &a);
        player.observe(CardId(1), &b);
        player.observe(CardId(3), &a);

        let board = [
            CardView::FaceDown,
            CardView::FaceDown,
            CardView::FaceDown,
            CardView::FaceDown,
        ];
        assert_eq!(player.choose(&board), CardId(0));

        let board = [
            CardView::FaceUp(&a),
            CardView::FaceDown,
            CardView::FaceDown,
            CardView::FaceDown,
        ];
        assert_eq!(player.choose(&board), CardId(3));
    }

    #[test]
    fn explores_unseen_cards() {
        let a = token!("A");
        let b = token!("B");
        let mut player = RecallPlayer::new();
        player.observe(CardId(0), &a);
        player.observe(CardId(1), &b);
        let board = [
            CardView::FaceDown,
            CardView::FaceUp(&b),
            CardView::FaceDown,
            CardView::FaceDown,
        ];
        assert_eq!(player.choose(&board), CardId(2));
    }

    #[test]
    fn forgets_matched_cards() {
        let a = token!("A");
        let mut memory = TokenMemory::new();
        memory.remember(CardId(0), &a);
        memory.remember(CardId(1), &a);
        memory.forget_matched(&[CardView::Matched(&a), CardView::Matched(&a)]);
        assert!(memory.is_empty());
    }
}
