use serde::{Deserialize, Serialize};

use crate::{CardId, CardState, Token};

/// The parts of the screen that are shown or hidden as a whole.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    StartScreen,
    Scoreboard,
    HighScoreBoard,
    RestartButton,
}

impl Element {
    /// Whether the element is visible before the game starts.
    pub fn initially_visible(self) -> bool {
        matches!(self, Element::StartScreen)
    }
}

/// Whatever draws the game. The [`Controller`](crate::Controller) only ever
/// talks to the screen through this trait.
pub trait RenderSurface {
    /// Adds a face-down card. Cards are created in board order, so `card`
    /// is always the number of cards created since the last
    /// [`clear_board()`](Self::clear_board).
    fn create_card(&mut self, card: CardId, token: &Token);
    fn set_card_state(&mut self, card: CardId, state: CardState);
    fn clear_board(&mut self);
    /// Sets the headline text.
    fn show_message(&mut self, text: &str);
    fn toggle_visibility(&mut self, element: Element);
    fn show_guesses(&mut self, guesses: u32);
    fn show_high_score(&mut self, text: &str);
}

/// One call made to a [`RenderSurface`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SurfaceCall {
    CreateCard { card: CardId, token: Token },
    SetCardState { card: CardId, state: CardState },
    ClearBoard,
    ShowMessage { text: String },
    ToggleVisibility { element: Element },
    ShowGuesses { guesses: u32 },
    ShowHighScore { text: String },
}

/// A surface that draws nothing and remembers every call, for tests and
/// for recording games.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Returns the calls recorded so far and starts a new recording.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }
}

impl RenderSurface for RecordingSurface {
    fn create_card(&mut self, card: CardId, token: &Token) {
        self.calls.push(SurfaceCall::CreateCard {
            card,
            token: token.clone(),
        });
    }

    fn set_card_state(&mut self, card: CardId, state: CardState) {
        self.calls.push(SurfaceCall::SetCardState { card, state });
    }

    fn clear_board(&mut self) {
        self.calls.push(SurfaceCall::ClearBoard);
    }

    fn show_message(&mut self, text: &str) {
        self.calls.push(SurfaceCall::ShowMessage {
            text: String::from(text),
        });
    }

    fn toggle_visibility(&mut self, element: Element) {
        self.calls.push(SurfaceCall::ToggleVisibility { element });
    }

    fn show_guesses(&mut self, guesses: u32) {
        self.calls.push(SurfaceCall::ShowGuesses { guesses });
    }

    fn show_high_score(&mut self, text: &str) {
        self.calls.push(SurfaceCall::ShowHighScore {
            text: String::from(text),
        });
    }
}
