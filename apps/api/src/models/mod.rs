pub mod job_description;

pub use job_description::JobDescription;
