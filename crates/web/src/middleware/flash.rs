//! One-shot flash messages carried in the session.

use tower_sessions::Session;

use crate::models::{FlashMessage, session_keys};

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push_flash(
    session: &Session,
    message: FlashMessage,
) -> Result<(), tower_sessions::session::Error> {
    let mut queued: Vec<FlashMessage> = session
        .get(session_keys::FLASH)
        .await?
        .unwrap_or_default();
    queued.push(message);
    session.insert(session_keys::FLASH, queued).await
}

/// Drain queued messages. A session read failure yields no messages.
pub async fn take_flashes(session: &Session) -> Vec<FlashMessage> {
    match session.remove::<Vec<FlashMessage>>(session_keys::FLASH).await {
        Ok(messages) => messages.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_flashes_drain_in_order() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push_flash(&session, FlashMessage::success("Store created.")).await.unwrap();
        push_flash(&session, FlashMessage::error("Not on your list.")).await.unwrap();

        let messages = take_flashes(&session).await;
        assert_eq!(
            messages,
            vec![
                FlashMessage::success("Store created."),
                FlashMessage::error("Not on your list."),
            ]
        );
        assert!(take_flashes(&session).await.is_empty());
    }
}
