//! Interview Session — one candidate's question bank, cursors and intro phase.
//!
//! The session owns the bank and the conversation state; every answer after the
//! self-introduction is handed to `process_response` and the returned state is
//! stored back. Sessions are not shared between threads without the store's mutex.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::interview::chooser::Chooser;
use crate::interview::question_bank::{build, QuestionBank};
use crate::interview::state_machine::{
    process_response, ConversationState, InterviewError, Phase, TurnKind,
};
use crate::models::JobDescription;

pub const DEFAULT_CANDIDATE_NAME: &str = "Candidate";
pub const INTRO_TRANSITION: &str =
    "Thank you for sharing. Let's begin with some technical questions.";

/// Greeting returned by `start_interview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Greeting {
    pub greeting: String,
}

/// Formats the opening line for a candidate. Pure formatting.
pub fn start_interview(candidate_name: &str) -> Greeting {
    Greeting {
        greeting: format!(
            "Hi {candidate_name}, let's begin the interview. Tell me about yourself."
        ),
    }
}

/// Finds the candidate's name in the resume: the first line mentioning "name",
/// taking the text after its last colon.
pub fn candidate_name_from_resume(resume: &str) -> Option<String> {
    resume
        .lines()
        .find(|line| line.to_lowercase().contains("name"))
        .and_then(|line| line.rsplit(':').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

/// A reply handed back to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub reply: String,
    pub done: bool,
    pub kind: ReplyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Acknowledged the self-introduction and asked the first question.
    Introduction,
    Elaborate,
    Followup,
    NextQuestion,
    Closing,
}

impl From<TurnKind> for ReplyKind {
    fn from(kind: TurnKind) -> Self {
        match kind {
            TurnKind::Elaborate => ReplyKind::Elaborate,
            TurnKind::Followup => ReplyKind::Followup,
            TurnKind::NextQuestion => ReplyKind::NextQuestion,
            TurnKind::Closing => ReplyKind::Closing,
        }
    }
}

/// Snapshot of a session's progress.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub candidate_name: String,
    pub question_index: usize,
    pub followup_index: usize,
    pub question_count: usize,
    pub chosen_technology: Option<String>,
    pub introduced: bool,
    pub phase: Phase,
    pub done: bool,
    pub started_at: DateTime<Utc>,
}

pub struct InterviewSession {
    id: Uuid,
    candidate_name: String,
    bank: QuestionBank,
    state: ConversationState,
    introduced: bool,
    started_at: DateTime<Utc>,
    last_activity: Instant,
    chooser: Box<dyn Chooser + Send>,
}

impl InterviewSession {
    /// Builds the question bank once; the technology draw made here is final.
    pub fn new(
        resume: &str,
        job_description: &JobDescription,
        candidate_name: Option<&str>,
        mut chooser: Box<dyn Chooser + Send>,
    ) -> Self {
        let bank = build(resume, job_description, chooser.as_mut());
        let candidate_name = candidate_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .or_else(|| candidate_name_from_resume(resume))
            .unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string());

        let id = Uuid::new_v4();
        info!(
            "Interview session {} created for {} with {} questions",
            id,
            candidate_name,
            bank.len()
        );

        Self {
            id,
            candidate_name,
            bank,
            state: ConversationState::default(),
            introduced: false,
            started_at: Utc::now(),
            last_activity: Instant::now(),
            chooser,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.is_complete(&self.bank)
    }

    /// When the candidate last spoke, or when the session opened.
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn greeting(&self) -> Greeting {
        start_interview(&self.candidate_name)
    }

    /// The line that hands over from the self-introduction to the first question.
    pub fn opening_question(&self) -> String {
        match self.bank.groups().first() {
            Some(group) => format!("{INTRO_TRANSITION} {}", group.prompt),
            None => INTRO_TRANSITION.to_string(),
        }
    }

    /// Feeds one candidate utterance into the session.
    ///
    /// The first call consumes the self-introduction; later calls run the state
    /// machine and store the state it returns.
    pub fn respond(&mut self, utterance: &str) -> Result<Reply, InterviewError> {
        self.last_activity = Instant::now();

        if !self.introduced {
            self.introduced = true;
            debug!("Session {} received self-introduction", self.id);
            return Ok(Reply {
                reply: self.opening_question(),
                done: self.is_done(),
                kind: ReplyKind::Introduction,
            });
        }

        let turn = process_response(self.state, &self.bank, utterance, self.chooser.as_mut())?;
        debug!(
            "Session {} turn {:?}: question {} followup {} -> question {} followup {}",
            self.id,
            turn.kind,
            self.state.question_index,
            self.state.followup_index,
            turn.state.question_index,
            turn.state.followup_index
        );
        self.state = turn.state;

        if turn.is_done() {
            info!("Interview session {} complete", self.id);
        }

        Ok(Reply {
            done: turn.is_done(),
            kind: turn.kind.into(),
            reply: turn.reply,
        })
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.id,
            candidate_name: self.candidate_name.clone(),
            question_index: self.state.question_index,
            followup_index: self.state.followup_index,
            question_count: self.bank.len(),
            chosen_technology: self.bank.chosen_technology().map(String::from),
            introduced: self.introduced,
            phase: self.state.phase(&self.bank),
            done: self.is_done(),
            started_at: self.started_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::chooser::FixedChooser;
    use crate::interview::state_machine::{CLOSING_STATEMENT, ELABORATE_PROMPT};

    const RESUME: &str = "Name: Grace Hopper\n\nExperience: Wrote a compiler\n\n";
    const LONG_ANSWER: &str = "I worked closely with the hardware team on it.";

    fn session(resume: &str, name: Option<&str>) -> InterviewSession {
        InterviewSession::new(
            resume,
            &JobDescription::default(),
            name,
            Box::new(FixedChooser(0)),
        )
    }

    #[test]
    fn test_start_interview_greeting() {
        let greeting = start_interview("Alex");
        assert_eq!(
            greeting.greeting,
            "Hi Alex, let's begin the interview. Tell me about yourself."
        );
    }

    #[test]
    fn test_candidate_name_from_resume() {
        assert_eq!(
            candidate_name_from_resume(RESUME),
            Some("Grace Hopper".to_string())
        );
        assert_eq!(
            candidate_name_from_resume("Full NAME: Alan Turing\nName: Other"),
            Some("Alan Turing".to_string())
        );
        assert_eq!(candidate_name_from_resume("Skills: Go"), None);
        assert_eq!(candidate_name_from_resume("Name:   \nSkills: Go"), None);
    }

    #[test]
    fn test_explicit_name_wins_over_resume() {
        assert_eq!(session(RESUME, Some("Dr. Hopper")).candidate_name(), "Dr. Hopper");
        assert_eq!(session(RESUME, Some("  ")).candidate_name(), "Grace Hopper");
        assert_eq!(session("", None).candidate_name(), DEFAULT_CANDIDATE_NAME);
    }

    #[test]
    fn test_first_utterance_is_introduction() {
        let mut s = session(RESUME, None);
        let reply = s.respond("hi").unwrap();
        assert_eq!(reply.kind, ReplyKind::Introduction);
        assert!(reply.reply.starts_with(INTRO_TRANSITION));
        assert!(reply.reply.ends_with("Can you walk me through what you did there?"));
        assert_eq!(s.state(), ConversationState::default());
        assert!(s.status().introduced);
    }

    #[test]
    fn test_short_answer_after_intro_is_reprompted() {
        let mut s = session(RESUME, None);
        s.respond(LONG_ANSWER).unwrap();
        let reply = s.respond("yes").unwrap();
        assert_eq!(reply.reply, ELABORATE_PROMPT);
        assert!(!reply.done);
        assert_eq!(s.state(), ConversationState::default());
    }

    #[test]
    fn test_session_runs_to_completion_then_errors() {
        let mut s = session(RESUME, None);
        s.respond(LONG_ANSWER).unwrap();

        let mut last = None;
        for _ in 0..20 {
            let reply = s.respond(LONG_ANSWER).unwrap();
            let done = reply.done;
            last = Some(reply);
            if done {
                break;
            }
        }

        let last = last.unwrap();
        assert!(last.done);
        assert_eq!(last.kind, ReplyKind::Closing);
        assert!(last.reply.ends_with(CLOSING_STATEMENT));
        assert!(s.is_done());
        assert_eq!(s.status().phase, Phase::Terminal);
        assert_eq!(
            s.respond(LONG_ANSWER).unwrap_err(),
            InterviewError::AlreadyComplete
        );
    }

    #[test]
    fn test_status_reports_cursors() {
        let mut s = session(RESUME, None);
        s.respond(LONG_ANSWER).unwrap();
        s.respond(LONG_ANSWER).unwrap();
        let status = s.status();
        assert_eq!(status.question_index, 0);
        assert_eq!(status.followup_index, 1);
        assert_eq!(status.question_count, 4);
        assert_eq!(status.phase, Phase::AskingFollowup);
        assert_eq!(status.chosen_technology, None);
        assert!(!status.done);
    }

    #[test]
    fn test_status_reports_chosen_technology() {
        let s = InterviewSession::new(
            "Skills: Go, Rust\n\n",
            &JobDescription::default(),
            None,
            Box::new(FixedChooser(1)),
        );
        assert_eq!(s.status().chosen_technology, Some("Rust".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_respond_refreshes_last_activity() {
        let mut s = session(RESUME, None);
        let opened = s.last_activity();

        tokio::time::advance(std::time::Duration::from_secs(30)).await;
        s.respond(LONG_ANSWER).unwrap();

        assert_eq!(
            s.last_activity().duration_since(opened),
            std::time::Duration::from_secs(30)
        );
    }
}
