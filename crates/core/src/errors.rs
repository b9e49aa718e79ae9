//! Shared value errors.

use std::{error, iter};

use thiserror::Error;

/// A stored string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: `{value}`")]
pub struct UnknownValueError {
    /// What was being parsed.
    pub kind: &'static str,

    /// The rejected input.
    pub value: String,
}

impl UnknownValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Render `error` followed by each of its sources, joined by `: `.
#[must_use]
pub fn error_chain(error: &dyn error::Error) -> String {
    iter::successors(Some(error), |error| error.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}
