use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{Card, CardId, CardState, Deck};

/// Identifies one pending pair resolution.
///
/// A ticket is only honored by the game generation that issued it, so a
/// resolution that was scheduled before a restart is discarded afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionTicket {
    pub generation: u64,
    /// Counts the pairs flipped within one generation.
    pub seq: u64,
}

/// Where the game is between selections.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    OneFlipped {
        first: CardId,
    },
    Resolving {
        first: CardId,
        second: CardId,
        ticket: ResolutionTicket,
    },
    Won,
}

/// Why a selection had no effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IgnoredSelection {
    /// The board has not been dealt yet. Only reported by the
    /// [`Controller`](crate::Controller).
    NotStarted,
    OutOfRange,
    AlreadyFlipped,
    /// Two cards are already waiting to be resolved.
    Resolving,
    GameOver,
}

/// The outcome of [`GameState::select()`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Ignored(IgnoredSelection),
    First {
        card: CardId,
    },
    /// The pair is complete; `ticket` must be passed to
    /// [`GameState::resolve()`] once the reveal delay is over.
    Second {
        card: CardId,
        ticket: ResolutionTicket,
    },
}

/// The outcome of [`GameState::resolve()`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The ticket does not belong to the pending pair, e.g. because the
    /// game was restarted. Nothing changed.
    Stale,
    Matched { first: CardId, second: CardId },
    Mismatched { first: CardId, second: CardId },
    /// The last pair was found. Reported exactly once per game.
    Won { first: CardId, second: CardId },
}

/// The rules of one game: which cards are flipped, how many guesses were
/// made, and how many pairs were found.
#[derive(Clone, Debug)]
pub struct GameState {
    cards: Vec<Card>,
    phase: Phase,
    guesses: u32,
    matches: usize,
    generation: u64,
    next_seq: u64,
}

impl GameState {
    pub fn new(deck: &Deck) -> Self {
        Self {
            cards: deck.tokens().iter().cloned().map(Card::face_down).collect(),
            phase: Phase::Idle,
            guesses: 0,
            matches: 0,
            generation: 0,
            next_seq: 0,
        }
    }

    /// Starts over with a new deck.
    ///
    /// Tickets issued before the reset become stale.
    pub fn reset(&mut self, deck: &Deck) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::new(deck)
        };
        debug!(generation, pairs = self.pair_count(), "Game reset");
    }

    /// Handles the player picking a card.
    pub fn select(&mut self, card: CardId) -> Selection {
        let selection = self.try_select(card);
        if let Selection::Ignored(reason) = selection {
            trace!(card = card.0, ?reason, "Selection ignored");
        }
        selection
    }

    fn try_select(&mut self, card: CardId) -> Selection {
        match self.phase {
            Phase::Won => return Selection::Ignored(IgnoredSelection::GameOver),
            Phase::Resolving { .. } => return Selection::Ignored(IgnoredSelection::Resolving),
            Phase::Idle | Phase::OneFlipped { .. } => {}
        }
        let Some(selected) = self.cards.get_mut(card.0) else {
            return Selection::Ignored(IgnoredSelection::OutOfRange);
        };
        if selected.state.is_flipped() {
            return Selection::Ignored(IgnoredSelection::AlreadyFlipped);
        }
        selected.state = CardState::FaceUp;
        self.guesses += 1;

        match self.phase {
            Phase::OneFlipped { first } => {
                let ticket = ResolutionTicket {
                    generation: self.generation,
                    seq: self.next_seq,
                };
                self.next_seq += 1;
                self.phase = Phase::Resolving {
                    first,
                    second: card,
                    ticket,
                };
                Selection::Second { card, ticket }
            }
            _ => {
                self.phase = Phase::OneFlipped { first: card };
                Selection::First { card }
            }
        }
    }

    /// Compares the two face-up cards once the reveal delay is over.
    pub fn resolve(&mut self, ticket: ResolutionTicket) -> Resolution {
        let (first, second) = match self.phase {
            Phase::Resolving {
                first,
                second,
                ticket: pending,
            } if pending == ticket => (first, second),
            _ => {
                debug!(?ticket, generation = self.generation, "Discarding stale resolution");
                return Resolution::Stale;
            }
        };

        if self.cards[first.0].token == self.cards[second.0].token {
            self.cards[first.0].state = CardState::Matched;
            self.cards[second.0].state = CardState::Matched;
            self.matches += 1;
            debug!(first = first.0, second = second.0, matches = self.matches, "Found a pair");
            if self.matches == self.pair_count() {
                self.phase = Phase::Won;
                debug!(guesses = self.guesses, "All pairs found");
                Resolution::Won { first, second }
            } else {
                self.phase = Phase::Idle;
                Resolution::Matched { first, second }
            }
        } else {
            self.cards[first.0].state = CardState::FaceDown;
            self.cards[second.0].state = CardState::FaceDown;
            self.phase = Phase::Idle;
            trace!(first = first.0, second = second.0, "No match");
            Resolution::Mismatched { first, second }
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, card: CardId) -> Option<&Card> {
        self.cards.get(card.0)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// How many cards are waiting to be resolved: 0, 1 or 2.
    pub fn cards_flipped(&self) -> usize {
        match self.phase {
            Phase::Idle | Phase::Won => 0,
            Phase::OneFlipped { .. } => 1,
            Phase::Resolving { .. } => 2,
        }
    }

    /// The card flipped first in the current turn.
    pub fn first_card(&self) -> Option<CardId> {
        match self.phase {
            Phase::OneFlipped { first } | Phase::Resolving { first, .. } => Some(first),
            _ => None,
        }
    }

    /// The card flipped second in the current turn.
    pub fn second_card(&self) -> Option<CardId> {
        match self.phase {
            Phase::Resolving { second, .. } => Some(second),
            _ => None,
        }
    }

    /// The number of cards flipped so far, counting both cards of a pair.
    pub fn guesses(&self) -> u32 {
        self.guesses
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }

    /// The pending resolution, if two cards are face-up.
    pub fn pending_ticket(&self) -> Option<ResolutionTicket> {
        match self.phase {
            Phase::Resolving { ticket, .. } => Some(ticket),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::PlayInput;
    use crate::token;

    fn game(tokens: &[&str]) -> GameState {
        let tokens = tokens.iter().map(|t| t.parse().unwrap()).collect();
        GameState::new(&Deck::from_tokens_unshuffled(tokens).unwrap())
    }

    fn flipped(state: &GameState) -> Vec<usize> {
        (0..state.cards().len())
            .filter(|&i| state.cards()[i].state.is_flipped())
            .collect()
    }

    quickcheck! {
        fn matches_never_decrease(input: PlayInput) -> bool {
            let mut state = GameState::new(&input.deck);
            let mut matches = 0;
            for step in input.steps {
                match step {
                    Some(card) => { state.select(CardId(card)); }
                    None => {
                        if let Some(ticket) = state.pending_ticket() {
                            state.resolve(ticket);
                        }
                    }
                }
                if state.matches() < matches || state.matches() > state.pair_count() {
                    return false;
                }
                matches = state.matches();
                let awaiting = state.cards().iter().filter(|c| c.state == CardState::FaceUp).count();
                if awaiting != state.cards_flipped() {
                    return false;
                }
            }
            true
        }
    }

    quickcheck! {
        fn reselecting_never_counts_as_guess(input: PlayInput) -> bool {
            let mut state = GameState::new(&input.deck);
            for step in input.steps {
                let Some(card) = step else {
                    if let Some(ticket) = state.pending_ticket() {
                        state.resolve(ticket);
                    }
                    continue;
                };
                let was_flipped = state
                    .card(CardId(card))
                    .map_or(false, |c| c.state.is_flipped());
                let guesses = state.guesses();
                state.select(CardId(card));
                if was_flipped && state.guesses() != guesses {
                    return false;
                }
            }
            true
        }
    }

    #[test]
    fn matching_pair_stays_flipped() {
        let mut state = game(&["A", "A", "B", "B"]);
        assert_eq!(state.select(CardId(0)), Selection::First { card: CardId(0) });
        assert_eq!(state.guesses(), 1);
        assert_eq!(flipped(&state), vec![0]);
        assert_eq!(state.first_card(), Some(CardId(0)));

        let Selection::Second { card, ticket } = state.select(CardId(1)) else {
            panic!("Expected the second card to be flipped");
        };
        assert_eq!(card, CardId(1));
        assert_eq!(state.guesses(), 2);
        assert_eq!(state.cards_flipped(), 2);

        assert_eq!(
            state.resolve(ticket),
            Resolution::Matched {
                first: CardId(0),
                second: CardId(1)
            }
        );
        assert_eq!(state.matches(), 1);
        assert_eq!(flipped(&state), vec![0, 1]);
        assert_eq!(state.cards()[0].state, CardState::Matched);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn mismatched_pair_is_turned_back() {
        let mut state = game(&["A", "B", "A", "B"]);
        state.select(CardId(0));
        let Selection::Second { ticket, .. } = state.select(CardId(1)) else {
            panic!("Expected the second card to be flipped");
        };
        assert!(matches!(state.resolve(ticket), Resolution::Mismatched { .. }));
        assert_eq!(state.matches(), 0);
        assert!(flipped(&state).is_empty());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.guesses(), 2);
    }

    #[test]
    fn invalid_selections_are_ignored() {
        let mut state = game(&["A", "B", "A", "B"]);
        state.select(CardId(0));
        assert_eq!(
            state.select(CardId(0)),
            Selection::Ignored(IgnoredSelection::AlreadyFlipped)
        );
        assert_eq!(
            state.select(CardId(4)),
            Selection::Ignored(IgnoredSelection::OutOfRange)
        );
        assert_eq!(state.guesses(), 1);

        state.select(CardId(2));
        assert_eq!(
            state.select(CardId(3)),
            Selection::Ignored(IgnoredSelection::Resolving)
        );
        assert_eq!(state.guesses(), 2);
        assert_eq!(state.card(CardId(3)).unwrap().state, CardState::FaceDown);
    }

    #[test]
    fn matched_cards_cannot_be_selected() {
        let mut state = game(&["A", "A", "B", "B"]);
        state.select(CardId(0));
        state.select(CardId(1));
        state.resolve(state.pending_ticket().unwrap());
        assert_eq!(
            state.select(CardId(1)),
            Selection::Ignored(IgnoredSelection::AlreadyFlipped)
        );
        assert_eq!(state.guesses(), 2);
    }

    #[test]
    fn win_is_reported_once() {
        let mut state = game(&["A", "B", "B", "A"]);
        state.select(CardId(1));
        state.select(CardId(2));
        let ticket = state.pending_ticket().unwrap();
        assert!(matches!(state.resolve(ticket), Resolution::Matched { .. }));
        assert_eq!(state.resolve(ticket), Resolution::Stale);

        state.select(CardId(3));
        state.select(CardId(0));
        let ticket = state.pending_ticket().unwrap();
        assert_eq!(
            state.resolve(ticket),
            Resolution::Won {
                first: CardId(3),
                second: CardId(0)
            }
        );
        assert!(state.is_won());
        assert_eq!(state.resolve(ticket), Resolution::Stale);
        assert_eq!(
            state.select(CardId(0)),
            Selection::Ignored(IgnoredSelection::GameOver)
        );
        assert_eq!(state.matches(), 2);
    }

    #[test]
    fn reset_invalidates_pending_ticket() {
        let deck = Deck::from_tokens_unshuffled(vec![token!("A"), token!("A")]).unwrap();
        let mut state = GameState::new(&deck);
        state.select(CardId(0));
        state.select(CardId(1));
        let old_ticket = state.pending_ticket().unwrap();

        state.reset(&deck);
        assert_eq!(state.generation(), 1);
        assert_eq!(state.guesses(), 0);
        state.select(CardId(0));
        state.select(CardId(1));
        // Same position in the new game, but issued by an older generation
        assert_eq!(state.resolve(old_ticket), Resolution::Stale);
        assert_eq!(state.cards_flipped(), 2);
        let ticket = state.pending_ticket().unwrap();
        assert!(matches!(state.resolve(ticket), Resolution::Won { .. }));
    }
}
