//! Outcome of a single classification call.

use std::fmt;

/// Why a classifier fell back to its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The prompt could not be rendered, so the oracle was never called.
    Prompt(String),
    /// The oracle call itself failed (transport, auth, quota).
    OracleUnavailable(String),
    /// The oracle answered with something outside the accepted set.
    UnexpectedResponse(String),
    /// The oracle answer did not follow the requested layout.
    MalformedResponse(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt(e) => write!(f, "prompt rendering failed: {e}"),
            Self::OracleUnavailable(e) => write!(f, "oracle call failed: {e}"),
            Self::UnexpectedResponse(r) => write!(f, "unexpected response: {r:?}"),
            Self::MalformedResponse(r) => write!(f, "malformed response: {r:?}"),
        }
    }
}

/// A classification value, tagged with whether the oracle produced it.
///
/// Callers that only need the value use [`Verdict::value`]; callers that
/// care about the difference between "classified as the default" and
/// "could not classify" match on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T> {
    /// The oracle produced a usable answer.
    Classified(T),
    /// The classifier substituted its default.
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Verdict<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Classified(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Classified(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Classified(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}
