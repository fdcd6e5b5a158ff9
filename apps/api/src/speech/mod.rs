//! Speech/Text I/O boundary and the Turn Driver that runs an interview over it.
//!
//! The driver never inspects answers itself: it relays utterances to the
//! session and speaks whatever the session replies. Listening timeouts are
//! handled here, not in the state machine.

pub mod console;
pub mod driver;

use std::time::Duration;

use async_trait::async_trait;

/// Speech or text channel to the candidate.
#[async_trait]
pub trait SpeechIo: Send {
    /// Speaks (or prints) one system utterance.
    async fn say(&mut self, text: &str) -> anyhow::Result<()>;

    /// Waits for the candidate's next utterance; `None` means the timeout elapsed.
    async fn listen(&mut self, timeout: Duration) -> anyhow::Result<Option<String>>;
}
