//! Extraction input.
//!
//! The claim set and resume profile are produced by an external extraction
//! step. This module parses that output, validates it against JSON Schema and
//! canonicalises duplicate claims before they enter the core.

pub mod patterns;
mod parser;
mod schema;

pub use parser::{
    Contact, EducationEntry, ExperienceEntry, ExtractionError, ExtractionResult, JobDescription,
    ProfileLinks, ProjectEntry, ResumeProfile,
};
pub use schema::{validate_extraction_schema, validate_job_description_schema, SchemaError};
