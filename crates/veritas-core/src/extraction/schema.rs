//! JSON Schema validation for extraction output.
//!
//! Extraction results are validated against schema/extraction.schema.json
//! and job descriptions against schema/job_description.schema.json before
//! they are deserialised.

use std::sync::OnceLock;
use thiserror::Error;

const EXTRACTION_SCHEMA_JSON: &str = include_str!("../../../../schema/extraction.schema.json");
const JOB_DESCRIPTION_SCHEMA_JSON: &str =
    include_str!("../../../../schema/job_description.schema.json");

static EXTRACTION_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
static JOB_DESCRIPTION_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema loading.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn compile(source: &str) -> Result<jsonschema::Validator, String> {
    let schema_value: serde_json::Value =
        serde_json::from_str(source).map_err(|e| format!("Invalid schema JSON: {}", e))?;

    jsonschema::options()
        .build(&schema_value)
        .map_err(|e| format!("Failed to compile schema: {}", e))
}

fn get_validator(
    cell: &'static OnceLock<Result<jsonschema::Validator, String>>,
    source: &str,
) -> Result<&'static jsonschema::Validator, SchemaError> {
    match cell.get_or_init(|| compile(source)) {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

fn collect_errors(
    validator: &jsonschema::Validator,
    value: &serde_json::Value,
) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an extraction result JSON value.
///
/// Returns every validation error message, not just the first.
pub fn validate_extraction_schema(value: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator(&EXTRACTION_SCHEMA, EXTRACTION_SCHEMA_JSON)
        .map_err(|e| vec![e.to_string()])?;
    collect_errors(validator, value)
}

/// Validate a job description JSON value.
pub fn validate_job_description_schema(value: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator(&JOB_DESCRIPTION_SCHEMA, JOB_DESCRIPTION_SCHEMA_JSON)
        .map_err(|e| vec![e.to_string()])?;
    collect_errors(validator, value)
}
