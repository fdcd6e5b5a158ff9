//! Document Loader — reads resume text and job-description data before a session starts.
//!
//! Resumes may be plain text or PDF; job descriptions are JSON objects.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::models::JobDescription;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("Resume is not valid UTF-8 text")]
    Encoding,

    #[error("Invalid job description JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Loads resume text from a `.txt` or `.pdf` file.
pub async fn load_resume(path: &Path) -> Result<String, LoadError> {
    let is_pdf = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(is_pdf_name)
        .unwrap_or(false);

    let text = if is_pdf {
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text(&owned).map_err(|e| e.to_string())
        })
        .await?
        .map_err(LoadError::Pdf)?
    } else {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?
    };

    info!("Loaded resume from {} ({} chars)", path.display(), text.len());
    Ok(text)
}

/// Loads a job description JSON file.
pub async fn load_job_description(path: &Path) -> Result<JobDescription, LoadError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let jd = parse_job_description(&raw)?;
    info!(
        "Loaded job description from {} ({} required technologies)",
        path.display(),
        jd.required_technologies.len()
    );
    Ok(jd)
}

/// Parses job-description JSON. Blank input means "no job description".
pub fn parse_job_description(raw: &str) -> Result<JobDescription, LoadError> {
    if raw.trim().is_empty() {
        return Ok(JobDescription::default());
    }
    Ok(serde_json::from_str(raw)?)
}

/// Decodes an uploaded resume. PDFs are detected by file name or `%PDF` magic.
pub async fn resume_from_bytes(file_name: Option<&str>, data: Vec<u8>) -> Result<String, LoadError> {
    let is_pdf = file_name.map(is_pdf_name).unwrap_or(false) || data.starts_with(b"%PDF");

    if is_pdf {
        debug!("Extracting text from uploaded PDF ({} bytes)", data.len());
        return tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
        })
        .await?
        .map_err(LoadError::Pdf);
    }

    String::from_utf8(data).map_err(|_| LoadError::Encoding)
}
