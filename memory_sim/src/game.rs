use std::time::Instant;

use memory::{Controller, RecordingSurface, ScoreStore, Selection};
use tracing::trace;

use crate::player::{board_view, Player};
use crate::recording::{GameRecording, Recorder};

/// How many times the expected cost of blind play a game may take before it
/// is given up.
const SELECTION_LIMIT_FACTOR: usize = 20;

/// Selections after which a game on `num_cards` cards is given up.
///
/// A player that remembers nothing needs about `num_cards² / 2` selections,
/// so the limit grows quadratically with the board.
pub fn selection_limit(num_cards: usize) -> usize {
    SELECTION_LIMIT_FACTOR * (num_cards * num_cards / 2).max(num_cards)
}

pub struct GameResult {
    pub guesses: u32,
    /// Selections that were ignored, e.g. because the card was already face-up.
    pub wasted_moves: usize,
}

/// Plays one full game, restarting the controller first if a game was
/// already played on it.
///
/// Time is simulated: instead of waiting for the reveal delay, the pending
/// resolution is run at its deadline right away.
pub fn play_game<P: Player + ?Sized, S: ScoreStore>(
    controller: &mut Controller<RecordingSurface, S>,
    player: &mut P,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameResult> {
    if !controller.is_started() {
        controller.start();
    } else {
        controller.restart();
    }
    let num_cards = controller.state().cards().len();
    player.new_game(num_cards);

    let max_selections = selection_limit(num_cards);
    let mut now = Instant::now();
    let mut selections = 0;
    let mut wasted_moves = 0;
    while !controller.state().is_won() {
        if selections >= max_selections {
            anyhow::bail!(
                "Player '{}' did not finish the game after {} selections",
                player.name(),
                selections
            );
        }
        selections += 1;

        let card = player.choose(&board_view(controller.state()));
        match controller.select(card, now) {
            Selection::Ignored(reason) => {
                trace!(card = card.0, ?reason, "Wasted move");
                wasted_moves += 1;
            }
            Selection::First { card } | Selection::Second { card, .. } => {
                if let Some(flipped) = controller.state().card(card) {
                    player.observe(card, &flipped.token);
                }
            }
        }
        if let Some(deadline) = controller.next_deadline() {
            now = deadline;
            controller.tick(now);
        }
    }

    let guesses = controller.state().guesses();
    trace!("Final board:\n{}", controller.state());
    if let Some(rec) = recorder {
        rec.write_game_recording(&GameRecording {
            player: String::from(player.name()),
            guesses,
            calls: controller.surface_mut().take_calls(),
        })?;
    } else {
        controller.surface_mut().take_calls();
    }
    Ok(GameResult {
        guesses,
        wasted_moves,
    })
}
