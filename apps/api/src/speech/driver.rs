//! Turn Driver — greets the candidate, then alternates listen → respond → say
//! until the session reports completion or the candidate stops answering.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::interview::session::InterviewSession;
use crate::interview::state_machine::InterviewError;
use crate::speech::SpeechIo;

pub const SIGN_OFF: &str =
    "It seems we've lost you, so let's end the interview here. Thank you for your time!";

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Speech I/O failed: {0}")]
    Io(#[from] anyhow::Error),

    #[error(transparent)]
    Interview(#[from] InterviewError),
}

/// Listening limits for one interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPolicy {
    pub intro_timeout: Duration,
    pub answer_timeout: Duration,
    /// How many times the last prompt is repeated after consecutive timeouts.
    pub max_listen_retries: u32,
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self {
            intro_timeout: Duration::from_secs(60),
            answer_timeout: Duration::from_secs(90),
            max_listen_retries: 2,
        }
    }
}

impl TurnPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            intro_timeout: Duration::from_secs(config.intro_timeout_secs),
            answer_timeout: Duration::from_secs(config.answer_timeout_secs),
            max_listen_retries: config.max_listen_retries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewOutcome {
    /// Every question was asked; `turns` counts candidate utterances, intro included.
    Completed { turns: usize },
    /// The candidate stopped answering before the interview finished.
    Abandoned {
        question_index: usize,
        followup_index: usize,
    },
}

/// Runs a whole interview over `io`.
pub async fn run_interview(
    session: &mut InterviewSession,
    io: &mut dyn SpeechIo,
    policy: &TurnPolicy,
) -> Result<InterviewOutcome, DriverError> {
    let mut prompt = session.greeting().greeting;
    io.say(&prompt).await?;

    let mut timeout = policy.intro_timeout;
    let mut turns = 0;

    loop {
        let Some(utterance) = listen_with_retries(io, &prompt, timeout, policy.max_listen_retries).await? else {
            let state = session.state();
            warn!(
                "Session {} abandoned at question {} followup {}",
                session.id(),
                state.question_index,
                state.followup_index
            );
            io.say(SIGN_OFF).await?;
            return Ok(InterviewOutcome::Abandoned {
                question_index: state.question_index,
                followup_index: state.followup_index,
            });
        };

        let reply = session.respond(&utterance)?;
        turns += 1;
        io.say(&reply.reply).await?;

        if reply.done {
            info!("Session {} completed after {} turns", session.id(), turns);
            return Ok(InterviewOutcome::Completed { turns });
        }

        prompt = reply.reply;
        timeout = policy.answer_timeout;
    }
}

/// Listens once, then repeats `prompt` and listens again after each timeout.
async fn listen_with_retries(
    io: &mut dyn SpeechIo,
    prompt: &str,
    timeout: Duration,
    retries: u32,
) -> anyhow::Result<Option<String>> {
    for attempt in 0..=retries {
        if attempt > 0 {
            io.say(prompt).await?;
        }
        if let Some(utterance) = io.listen(timeout).await? {
            return Ok(Some(utterance));
        }
        warn!(
            "No answer within {}s (attempt {} of {})",
            timeout.as_secs(),
            attempt + 1,
            retries + 1
        );
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use async_trait::async_trait;

    use crate::interview::chooser::FixedChooser;
    use crate::interview::session::INTRO_TRANSITION;
    use crate::interview::state_machine::{CLOSING_STATEMENT, ELABORATE_PROMPT};
    use crate::models::JobDescription;

    const LONG_ANSWER: &str = "Here is a detailed answer about my work.";

    /// Plays back scripted answers; `None` entries (or an empty script) time out.
    struct ScriptedIo {
        answers: VecDeque<Option<String>>,
        said: Vec<String>,
        timeouts_seen: Vec<Duration>,
    }

    impl ScriptedIo {
        fn new(answers: Vec<Option<&str>>) -> Self {
            Self {
                answers: answers.into_iter().map(|a| a.map(String::from)).collect(),
                said: vec![],
                timeouts_seen: vec![],
            }
        }
    }

    #[async_trait]
    impl SpeechIo for ScriptedIo {
        async fn say(&mut self, text: &str) -> anyhow::Result<()> {
            self.said.push(text.to_string());
            Ok(())
        }

        async fn listen(&mut self, timeout: Duration) -> anyhow::Result<Option<String>> {
            self.timeouts_seen.push(timeout);
            Ok(self.answers.pop_front().flatten())
        }
    }

    struct BrokenIo;

    #[async_trait]
    impl SpeechIo for BrokenIo {
        async fn say(&mut self, _text: &str) -> anyhow::Result<()> {
            anyhow::bail!("connection lost")
        }

        async fn listen(&mut self, _timeout: Duration) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
    }

    fn generic_session() -> InterviewSession {
        InterviewSession::new(
            "",
            &JobDescription::default(),
            Some("Sam"),
            Box::new(FixedChooser(0)),
        )
    }

    #[tokio::test]
    async fn test_completes_generic_interview() {
        let mut session = generic_session();
        let mut io = ScriptedIo::new(vec![Some(LONG_ANSWER); 4]);

        let outcome = run_interview(&mut session, &mut io, &TurnPolicy::default())
            .await
            .unwrap();

        assert_eq!(outcome, InterviewOutcome::Completed { turns: 4 });
        assert_eq!(
            io.said[0],
            "Hi Sam, let's begin the interview. Tell me about yourself."
        );
        assert!(io.said[1].starts_with(INTRO_TRANSITION));
        assert!(io.said.last().unwrap().ends_with(CLOSING_STATEMENT));
        assert!(session.is_done());
    }

    #[tokio::test]
    async fn test_intro_and_answer_timeouts_are_distinct() {
        let mut session = generic_session();
        let mut io = ScriptedIo::new(vec![Some(LONG_ANSWER); 4]);
        let policy = TurnPolicy {
            intro_timeout: Duration::from_secs(5),
            answer_timeout: Duration::from_secs(7),
            max_listen_retries: 0,
        };

        run_interview(&mut session, &mut io, &policy).await.unwrap();

        assert_eq!(io.timeouts_seen[0], Duration::from_secs(5));
        assert!(io.timeouts_seen[1..]
            .iter()
            .all(|t| *t == Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn test_short_answer_is_reprompted_not_advanced() {
        let mut session = generic_session();
        let mut io = ScriptedIo::new(vec![
            Some("intro"),
            Some("no"),
            Some(LONG_ANSWER),
            Some(LONG_ANSWER),
            Some(LONG_ANSWER),
        ]);

        let outcome = run_interview(&mut session, &mut io, &TurnPolicy::default())
            .await
            .unwrap();

        assert_eq!(outcome, InterviewOutcome::Completed { turns: 5 });
        assert_eq!(io.said[2], ELABORATE_PROMPT);
    }

    #[tokio::test]
    async fn test_timeout_repeats_last_prompt() {
        let mut session = generic_session();
        let mut io = ScriptedIo::new(vec![
            Some("intro"),
            None,
            Some(LONG_ANSWER),
            Some(LONG_ANSWER),
            Some(LONG_ANSWER),
        ]);

        let outcome = run_interview(&mut session, &mut io, &TurnPolicy::default())
            .await
            .unwrap();

        assert!(matches!(outcome, InterviewOutcome::Completed { .. }));
        // The opening question is spoken again after the timeout.
        assert_eq!(io.said[1], io.said[2]);
    }

    #[tokio::test]
    async fn test_repeated_timeouts_abandon_interview() {
        let mut session = generic_session();
        let mut io = ScriptedIo::new(vec![Some("intro"), Some(LONG_ANSWER)]);

        let outcome = run_interview(&mut session, &mut io, &TurnPolicy::default())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            InterviewOutcome::Abandoned {
                question_index: 1,
                followup_index: 0
            }
        );
        assert_eq!(io.said.last().unwrap(), SIGN_OFF);
        // intro listen + first answer + 1 initial listen + 2 retries
        assert_eq!(io.timeouts_seen.len(), 5);
    }

    #[tokio::test]
    async fn test_speech_failure_surfaces_as_io_error() {
        let mut session = generic_session();
        let err = run_interview(&mut session, &mut BrokenIo, &TurnPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DriverError::Io(_)));
    }
}
