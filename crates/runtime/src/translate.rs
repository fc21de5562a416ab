//! Chat history to model messages.

use tracing::warn;

use crate::history::{ChatTurn, TurnRole};
use crate::model::Message;

/// Convert stored chat turns into model messages, preserving order and content.
///
/// Turns the model protocol cannot carry are dropped with a warning: unknown
/// roles, and stored `tool` turns, which have no assistant tool call to answer
/// once the exchange that produced them is gone.
pub fn translate(history: &[ChatTurn]) -> Vec<Message> {
    history
        .iter()
        .filter_map(|turn| match &turn.role {
            TurnRole::System => Some(Message::system(&turn.content)),
            TurnRole::User => Some(Message::user(&turn.content)),
            TurnRole::Assistant => Some(Message::assistant(&turn.content)),
            role => {
                warn!(%role, "Unknown role in history; dropping turn");
                None
            }
        })
        .collect()
}
