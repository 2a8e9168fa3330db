//! Site assistant: a short conversational helper backed by the text-generation
//! capability, with per-session history.

pub mod handlers;
pub mod prompts;
pub mod session;

use tracing::warn;

use crate::assistant::prompts::{
    ASSISTANT_SYSTEM, CONNECTION_ERROR_REPLY, EMPTY_MESSAGE_REPLY, UNAVAILABLE_REPLY,
};
use crate::assistant::session::SessionStore;
use crate::llm_client::{ChatTurn, TextGeneration};

/// Produces the assistant's reply to `message` within session `session_id`.
/// Always returns a displayable string; failures map to fixed replies and
/// leave the session history unchanged.
pub async fn reply(
    generation: &TextGeneration,
    sessions: &SessionStore,
    session_id: &str,
    message: &str,
) -> String {
    let message = message.trim();
    if message.is_empty() {
        return EMPTY_MESSAGE_REPLY.to_string();
    }

    let TextGeneration::Enabled(generator) = generation else {
        return UNAVAILABLE_REPLY.to_string();
    };

    let mut turns = sessions.history(session_id);
    turns.push(ChatTurn::user(message));

    match generator.complete(Some(ASSISTANT_SYSTEM), &turns).await {
        Ok(text) => {
            sessions.record_exchange(session_id, ChatTurn::user(message), ChatTurn::model(&text));
            text
        }
        Err(e) => {
            warn!(session_id, "Assistant reply failed: {e}");
            CONNECTION_ERROR_REPLY.to_string()
        }
    }
}
