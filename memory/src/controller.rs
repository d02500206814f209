use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::{
    best_score, display_score, record_score, CardId, CardState, ConfigError, Deck, DeckSource,
    Element, GameConfig, GameState, IgnoredSelection, RenderSurface, Resolution, Scheduler,
    ScoreStore, Selection,
};

pub const TITLE: &str = "Memory Game!";
pub const WIN_MESSAGE: &str = "You win!";

/// Runs games on a [`RenderSurface`], keeping the best score in a
/// [`ScoreStore`].
///
/// Lifecycle: [`new()`](Self::new), [`start()`](Self::start), then any number
/// of [`select()`](Self::select) and [`tick()`](Self::tick) calls, and
/// [`restart()`](Self::restart) to play again.
pub struct Controller<R: RenderSurface, S: ScoreStore> {
    surface: R,
    store: S,
    source: DeckSource,
    rng: StdRng,
    deck: Deck,
    state: GameState,
    scheduler: Scheduler,
    resolve_delay: Duration,
    high_score_key: String,
    started: bool,
    restart_visible: bool,
}

impl<R: RenderSurface, S: ScoreStore> Controller<R, S> {
    pub fn new(config: &GameConfig, surface: R, store: S) -> Result<Self, ConfigError> {
        let source = config.deck_source()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, pairs = source.pair_count(), "New controller");
        Ok(Self::with_source(
            source,
            StdRng::seed_from_u64(seed),
            config.resolve_delay(),
            &config.high_score_key,
            surface,
            store,
        ))
    }

    pub fn with_source(
        source: DeckSource,
        mut rng: StdRng,
        resolve_delay: Duration,
        high_score_key: &str,
        surface: R,
        store: S,
    ) -> Self {
        let deck = source.generate(&mut rng);
        let state = GameState::new(&deck);
        Self {
            surface,
            store,
            source,
            rng,
            deck,
            state,
            scheduler: Scheduler::new(),
            resolve_delay,
            high_score_key: String::from(high_score_key),
            started: false,
            restart_visible: false,
        }
    }

    /// Leaves the start screen and deals the cards. Does nothing when
    /// called a second time.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.surface.toggle_visibility(Element::StartScreen);
        self.surface.toggle_visibility(Element::Scoreboard);
        self.surface.toggle_visibility(Element::HighScoreBoard);
        let best = best_score(&self.store, &self.high_score_key);
        self.surface.show_high_score(&display_score(best));
        self.surface.show_guesses(0);
        self.deal();
    }

    fn deal(&mut self) {
        for (idx, token) in self.deck.tokens().iter().enumerate() {
            self.surface.create_card(CardId(idx), token);
        }
    }

    /// Handles the player picking a card at time `now`.
    pub fn select(&mut self, card: CardId, now: Instant) -> Selection {
        if !self.started {
            return Selection::Ignored(IgnoredSelection::NotStarted);
        }
        let selection = self.state.select(card);
        match selection {
            Selection::Ignored(_) => {}
            Selection::First { card } => {
                self.surface.set_card_state(card, CardState::FaceUp);
                self.surface.show_guesses(self.state.guesses());
            }
            Selection::Second { card, ticket } => {
                self.surface.set_card_state(card, CardState::FaceUp);
                self.surface.show_guesses(self.state.guesses());
                self.scheduler.schedule(now + self.resolve_delay, ticket);
            }
        }
        selection
    }

    /// Runs the resolutions that are due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<Resolution> {
        let mut resolutions = Vec::new();
        for ticket in self.scheduler.take_due(now) {
            let resolution = self.state.resolve(ticket);
            match resolution {
                Resolution::Stale => {}
                Resolution::Matched { first, second } => {
                    self.surface.set_card_state(first, CardState::Matched);
                    self.surface.set_card_state(second, CardState::Matched);
                }
                Resolution::Mismatched { first, second } => {
                    self.surface.set_card_state(first, CardState::FaceDown);
                    self.surface.set_card_state(second, CardState::FaceDown);
                }
                Resolution::Won { first, second } => {
                    self.surface.set_card_state(first, CardState::Matched);
                    self.surface.set_card_state(second, CardState::Matched);
                    self.show_win_screen();
                }
            }
            resolutions.push(resolution);
        }
        resolutions
    }

    fn show_win_screen(&mut self) {
        self.surface.show_message(WIN_MESSAGE);
        if !self.restart_visible {
            self.surface.toggle_visibility(Element::RestartButton);
            self.restart_visible = true;
        }
        let guesses = self.state.guesses();
        match record_score(&mut self.store, &self.high_score_key, guesses) {
            Ok(true) => info!(guesses, "New high score"),
            Ok(false) => {}
            Err(err) => warn!(%err, "Could not store the high score"),
        }
        let best = best_score(&self.store, &self.high_score_key);
        self.surface.show_high_score(&display_score(best));
    }

    /// Throws away the current game and deals a fresh deck.
    ///
    /// Resolutions that are still pending are cancelled; a ticket from the old
    /// game passed to [`GameState::resolve()`] is discarded as stale.
    pub fn restart(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "Cancelled pending resolutions");
        }
        self.deck = self.source.generate(&mut self.rng);
        self.state.reset(&self.deck);
        if !self.started {
            return;
        }
        self.surface.show_message(TITLE);
        self.surface.clear_board();
        if self.restart_visible {
            self.surface.toggle_visibility(Element::RestartButton);
            self.restart_visible = false;
        }
        self.surface.show_guesses(0);
        self.deal();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// When the next pending resolution is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn resolve_delay(&self) -> Duration {
        self.resolve_delay
    }
}
