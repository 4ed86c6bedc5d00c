//! Validation of agent output.
//!
//! Agents produce evidence, not verdicts. Their output is checked before the
//! merge; anything that fails validation is discarded.

mod validator;

pub use validator::{OutcomeValidationError, OutcomeValidator};
