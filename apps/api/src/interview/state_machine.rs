//! Conversation State Machine — decides the next system utterance for a
//! candidate answer and advances the question/follow-up cursors.
//!
//! The state is a plain `Copy` value. `process_response` takes the current
//! state and returns the next one inside a `Turn`; nothing else mutates it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interview::chooser::Chooser;
use crate::interview::question_bank::QuestionBank;

/// Answers shorter than this (after trimming, in characters) are re-prompted.
pub const MIN_RESPONSE_CHARS: usize = 20;

pub const ELABORATE_PROMPT: &str = "Can you elaborate a bit more on that?";
pub const NEXT_QUESTION_LEAD: &str = "Let's move to the next question:";
pub const CLOSING_STATEMENT: &str = "That concludes our interview. Thank you for your time!";

pub const ACKNOWLEDGMENTS: [&str; 4] = [
    "That's insightful.",
    "Thanks for sharing that.",
    "Great, that makes sense.",
    "Interesting, I appreciate the details.",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterviewError {
    #[error("Interview is already complete")]
    AlreadyComplete,
}

/// Cursor pair into the question bank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub question_index: usize,
    pub followup_index: usize,
}

/// Named position of the interview, derived from the cursors alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingFirstAnswer,
    AskingFollowup,
    AskingNextQuestion,
    Terminal,
}

impl ConversationState {
    pub fn is_complete(&self, bank: &QuestionBank) -> bool {
        self.question_index >= bank.len()
    }

    pub fn phase(&self, bank: &QuestionBank) -> Phase {
        if self.is_complete(bank) {
            Phase::Terminal
        } else if self.followup_index > 0 {
            Phase::AskingFollowup
        } else if self.question_index == 0 {
            Phase::AwaitingFirstAnswer
        } else {
            Phase::AskingNextQuestion
        }
    }
}

/// What kind of utterance a turn produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Elaborate,
    Followup,
    NextQuestion,
    Closing,
}

/// Result of processing one candidate utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub state: ConversationState,
    pub reply: String,
    pub kind: TurnKind,
}

impl Turn {
    pub fn is_done(&self) -> bool {
        self.kind == TurnKind::Closing
    }
}

/// Processes one candidate utterance against the bank.
///
/// Fails with `AlreadyComplete` once every question has been asked; the caller
/// must stop issuing turns after a `Closing` turn.
pub fn process_response(
    state: ConversationState,
    bank: &QuestionBank,
    utterance: &str,
    chooser: &mut dyn Chooser,
) -> Result<Turn, InterviewError> {
    let current = bank
        .get(state.question_index)
        .ok_or(InterviewError::AlreadyComplete)?;

    if !is_adequate(utterance) {
        return Ok(Turn {
            state,
            reply: ELABORATE_PROMPT.to_string(),
            kind: TurnKind::Elaborate,
        });
    }

    let ack = ACKNOWLEDGMENTS[chooser.pick(ACKNOWLEDGMENTS.len())];

    if let Some(followup) = current.followups.get(state.followup_index) {
        return Ok(Turn {
            state: ConversationState {
                question_index: state.question_index,
                followup_index: state.followup_index + 1,
            },
            reply: format!("{ack} {followup}"),
            kind: TurnKind::Followup,
        });
    }

    let next = ConversationState {
        question_index: state.question_index + 1,
        followup_index: 0,
    };

    match bank.get(next.question_index) {
        Some(group) => Ok(Turn {
            state: next,
            reply: format!("{ack} {NEXT_QUESTION_LEAD} {}", group.prompt),
            kind: TurnKind::NextQuestion,
        }),
        None => Ok(Turn {
            state: next,
            reply: format!("{ack} {CLOSING_STATEMENT}"),
            kind: TurnKind::Closing,
        }),
    }
}

/// Adequacy check: at least `MIN_RESPONSE_CHARS` characters once trimmed.
pub fn is_adequate(utterance: &str) -> bool {
    utterance.trim().chars().count() >= MIN_RESPONSE_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::chooser::FixedChooser;
    use crate::interview::question_bank::build;
    use crate::models::JobDescription;

    const LONG_ANSWER: &str = "I designed the eviction policy and benchmarked it.";

    fn generic_bank() -> QuestionBank {
        build("", &JobDescription::default(), &mut FixedChooser(0))
    }

    fn resume_bank() -> QuestionBank {
        let resume = "Experience: Built a cache\n\nSkills: Go\n\n";
        build(resume, &JobDescription::default(), &mut FixedChooser(0))
    }

    fn answer(state: ConversationState, bank: &QuestionBank) -> Turn {
        process_response(state, bank, LONG_ANSWER, &mut FixedChooser(0)).unwrap()
    }

    #[test]
    fn test_short_answer_requests_elaboration_without_advancing() {
        let bank = resume_bank();
        let state = ConversationState {
            question_index: 0,
            followup_index: 1,
        };
        for short in ["", "yes", "   nineteen chars!!   ", "ok ok ok ok ok ok o"] {
            let turn = process_response(state, &bank, short, &mut FixedChooser(0)).unwrap();
            assert_eq!(turn.reply, ELABORATE_PROMPT);
            assert_eq!(turn.kind, TurnKind::Elaborate);
            assert_eq!(turn.state, state);
        }
    }

    #[test]
    fn test_adequacy_counts_characters_not_bytes() {
        // 19 multi-byte characters is still too short.
        assert!(!is_adequate(&"é".repeat(19)));
        assert!(is_adequate(&"é".repeat(20)));
        assert!(is_adequate("   exactly twenty chars   ".trim()));
    }

    #[test]
    fn test_first_adequate_answer_asks_first_followup() {
        let bank = resume_bank();
        let turn = answer(ConversationState::default(), &bank);
        assert_eq!(turn.kind, TurnKind::Followup);
        assert_eq!(turn.reply, "That's insightful. What were your key contributions?");
        assert_eq!(
            turn.state,
            ConversationState {
                question_index: 0,
                followup_index: 1
            }
        );
    }

    #[test]
    fn test_acknowledgment_comes_from_chooser() {
        let bank = resume_bank();
        let turn =
            process_response(ConversationState::default(), &bank, LONG_ANSWER, &mut FixedChooser(3))
                .unwrap();
        assert!(turn.reply.starts_with(ACKNOWLEDGMENTS[3]));
    }

    #[test]
    fn test_exhausted_followups_advance_question_and_reset_cursor() {
        let bank = resume_bank();
        let state = ConversationState {
            question_index: 0,
            followup_index: 2,
        };
        let turn = answer(state, &bank);
        assert_eq!(turn.kind, TurnKind::NextQuestion);
        assert_eq!(
            turn.state,
            ConversationState {
                question_index: 1,
                followup_index: 0
            }
        );
        assert_eq!(
            turn.reply,
            "That's insightful. Let's move to the next question: Tell me about your experience with Go."
        );
    }

    #[test]
    fn test_group_without_followups_advances_immediately() {
        let bank = generic_bank();
        let turn = answer(ConversationState::default(), &bank);
        assert_eq!(turn.kind, TurnKind::NextQuestion);
        assert_eq!(turn.state.question_index, 1);
        assert!(turn.reply.ends_with(&bank.groups()[1].prompt));
    }

    #[test]
    fn test_last_answer_closes_interview() {
        let bank = generic_bank();
        let state = ConversationState {
            question_index: 2,
            followup_index: 0,
        };
        let turn = answer(state, &bank);
        assert!(turn.is_done());
        assert_eq!(turn.reply, format!("That's insightful. {CLOSING_STATEMENT}"));
        assert_eq!(turn.state.question_index, bank.len());
        assert_eq!(turn.state.phase(&bank), Phase::Terminal);
    }

    #[test]
    fn test_turn_after_completion_fails() {
        let bank = generic_bank();
        let done = ConversationState {
            question_index: bank.len(),
            followup_index: 0,
        };
        let err = process_response(done, &bank, LONG_ANSWER, &mut FixedChooser(0)).unwrap_err();
        assert_eq!(err, InterviewError::AlreadyComplete);

        // Even a short answer is rejected once complete.
        let err = process_response(done, &bank, "hi", &mut FixedChooser(0)).unwrap_err();
        assert_eq!(err, InterviewError::AlreadyComplete);
    }

    #[test]
    fn test_full_walk_through_resume_bank() {
        let bank = resume_bank();
        let mut state = ConversationState::default();
        let mut kinds = Vec::new();
        loop {
            let turn = answer(state, &bank);
            kinds.push(turn.kind);
            state = turn.state;
            if turn.is_done() {
                break;
            }
        }
        // experience (2 followups) + technology (2 followups) + 3 generic.
        let expected_turns = 3 + 3 + 3;
        assert_eq!(kinds.len(), expected_turns);
        assert_eq!(
            kinds.iter().filter(|k| **k == TurnKind::Followup).count(),
            4
        );
        assert_eq!(kinds.last(), Some(&TurnKind::Closing));
        assert!(process_response(state, &bank, LONG_ANSWER, &mut FixedChooser(0)).is_err());
    }

    #[test]
    fn test_phase_names() {
        let bank = resume_bank();
        assert_eq!(
            ConversationState::default().phase(&bank),
            Phase::AwaitingFirstAnswer
        );
        let followup = ConversationState {
            question_index: 0,
            followup_index: 1,
        };
        assert_eq!(followup.phase(&bank), Phase::AskingFollowup);
        let next = ConversationState {
            question_index: 1,
            followup_index: 0,
        };
        assert_eq!(next.phase(&bank), Phase::AskingNextQuestion);
    }
}
