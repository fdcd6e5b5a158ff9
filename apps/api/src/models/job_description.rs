use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Job description metadata supplied alongside the resume.
///
/// Only `required_technologies` drives question generation; every other key is
/// kept as-is so callers can round-trip their own metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    #[serde(default)]
    pub required_technologies: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl JobDescription {
    pub fn with_technologies<I, S>(technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_technologies: technologies.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        }
    }
}
