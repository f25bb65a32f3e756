//! Game simulation module
//!
//! All gameplay logic lives here. This module must stay renderer-free:
//! - Positions come from pure layout functions
//! - Only `GameState` mutates session state
//! - Animation advances by fixed steps per tick

pub mod card;
pub mod layout;
pub mod state;
pub mod tick;

pub use card::{Card, CardTransform, ClassCard, InterfaceCard, Rect};
pub use layout::{Layout, Viewport};
pub use state::{ClickTarget, Feedback, GameEvent, GamePhase, GameState};
pub use tick::tick;
