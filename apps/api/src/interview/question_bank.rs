//! Question Bank Builder — turns resume sections and job-description metadata
//! into the ordered list of questions asked during one interview.
//!
//! Order: experience → technology → project (each only when its source data
//! exists), then the generic questions. `MAX_QUESTION_GROUPS` bounds the bank;
//! with three resume groups and three generic ones every group fits.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::interview::chooser::Chooser;
use crate::interview::extractor::extract;
use crate::models::JobDescription;

pub const MAX_QUESTION_GROUPS: usize = 6;

const EXPERIENCE_FOLLOWUPS: [&str; 2] = [
    "What were your key contributions?",
    "What challenges did you overcome?",
];

const PROJECT_FOLLOWUPS: [&str; 2] = [
    "Was it a team project or solo?",
    "How did you test and deploy it?",
];

pub const GENERIC_QUESTIONS: [&str; 3] = [
    "This role expects quick learning of new frameworks. Share an example where you had to do that.",
    "How do you usually manage tasks and deadlines in a team setting?",
    "What tools do you use for code versioning and why?",
];

/// Where a question group came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionSource {
    Experience,
    /// Carries the technology drawn at build time.
    Technology { technology: String },
    Project,
    General,
}

/// One top-level question plus its ordered follow-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionGroup {
    pub source: QuestionSource,
    pub prompt: String,
    pub followups: Vec<String>,
}

impl QuestionGroup {
    fn general(prompt: &str) -> Self {
        Self {
            source: QuestionSource::General,
            prompt: prompt.to_string(),
            followups: vec![],
        }
    }
}

/// The ordered, size-bounded question list for one session. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    groups: Vec<QuestionGroup>,
}

impl QuestionBank {
    pub fn groups(&self) -> &[QuestionGroup] {
        &self.groups
    }

    pub fn get(&self, index: usize) -> Option<&QuestionGroup> {
        self.groups.get(index)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// The technology drawn for the technology group, if one was built.
    pub fn chosen_technology(&self) -> Option<&str> {
        self.groups.iter().find_map(|g| match &g.source {
            QuestionSource::Technology { technology } => Some(technology.as_str()),
            _ => None,
        })
    }
}

/// Builds the question bank for a resume and job description.
///
/// Never fails: missing sections simply shrink the bank. The chooser is consulted
/// at most once, for the technology draw, and only when the pool is non-empty.
pub fn build(
    resume: &str,
    job_description: &JobDescription,
    chooser: &mut dyn Chooser,
) -> QuestionBank {
    let experience = extract(resume, "experience");
    let skills = extract(resume, "skills");
    let projects = extract(resume, "projects");

    let tech_pool: Vec<&str> = skills
        .iter()
        .chain(job_description.required_technologies.iter())
        .map(String::as_str)
        .collect();

    debug!(
        experience = experience.len(),
        skills = skills.len(),
        projects = projects.len(),
        tech_pool = tech_pool.len(),
        "Extracted resume sections"
    );

    let mut groups = Vec::with_capacity(MAX_QUESTION_GROUPS);

    if let Some(first) = experience.first() {
        groups.push(experience_group(first));
    }

    if !tech_pool.is_empty() {
        let tech = tech_pool[chooser.pick(tech_pool.len())];
        groups.push(technology_group(tech));
    }

    if let Some(first) = projects.first() {
        groups.push(project_group(first));
    }

    groups.extend(GENERIC_QUESTIONS.iter().map(|q| QuestionGroup::general(q)));
    groups.truncate(MAX_QUESTION_GROUPS);

    QuestionBank { groups }
}

fn experience_group(experience: &str) -> QuestionGroup {
    QuestionGroup {
        source: QuestionSource::Experience,
        prompt: format!(
            "I noticed you mentioned: '{experience}'. Can you walk me through what you did there?"
        ),
        followups: EXPERIENCE_FOLLOWUPS.iter().map(|f| f.to_string()).collect(),
    }
}

fn technology_group(tech: &str) -> QuestionGroup {
    QuestionGroup {
        source: QuestionSource::Technology {
            technology: tech.to_string(),
        },
        prompt: format!("Tell me about your experience with {tech}."),
        followups: vec![
            format!("What was the biggest challenge you faced using {tech}?"),
            format!("How did you ensure your code was reliable and efficient with {tech}?"),
        ],
    }
}

fn project_group(project: &str) -> QuestionGroup {
    QuestionGroup {
        source: QuestionSource::Project,
        prompt: format!(
            "Tell me more about the project: '{project}'. What problem were you solving?"
        ),
        followups: PROJECT_FOLLOWUPS.iter().map(|f| f.to_string()).collect(),
    }
}
