//! Per-frame animation tick
//!
//! Advances every card's entrance animation and the feedback timer. Ticks
//! never change selection, scoring or round progress.

use super::card::Card;
use super::state::GameState;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, dt: f32) {
    for card in &mut state.classes {
        card.advance(dt);
    }
    for card in &mut state.interfaces {
        card.advance(dt);
    }
    state.feedback.countdown(dt);
}
