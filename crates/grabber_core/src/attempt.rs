use std::fmt;

/// Result of one resolution tier.
///
/// `Degraded` is the recoverable case: the caller moves on to the next tier
/// or settles for an empty result. Fatal conditions never travel through this
/// type; they use ordinary `Result`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Resolved(T),
    Degraded(Degradation),
}

impl<T> Attempt<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Attempt::Resolved(value) => Some(value),
            Attempt::Degraded(_) => None,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Attempt<U>) -> Attempt<U> {
        match self {
            Attempt::Resolved(value) => f(value),
            Attempt::Degraded(reason) => Attempt::Degraded(reason),
        }
    }
}

impl<T> From<Result<T, Degradation>> for Attempt<T> {
    fn from(result: Result<T, Degradation>) -> Self {
        match result {
            Ok(value) => Attempt::Resolved(value),
            Err(reason) => Attempt::Degraded(reason),
        }
    }
}

/// Why a tier produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Connection, timeout or body read failure.
    Transport(String),
    HttpStatus(u16),
    /// The endpoint answered with something other than JSON, typically a
    /// login or captcha page.
    NotJson { preview: String },
    /// The JSON envelope carried `"error": true`.
    ErrorFlag { message: Option<String> },
    /// Valid JSON that does not have the expected structure.
    UnexpectedShape(String),
    /// A required field or element was absent.
    Missing(&'static str),
    /// The tier worked but found nothing.
    Empty,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::Transport(message) => write!(f, "transport error: {message}"),
            Degradation::HttpStatus(code) => write!(f, "http status {code}"),
            Degradation::NotJson { .. } => write!(f, "response was not JSON"),
            Degradation::ErrorFlag { message: Some(message) } => {
                write!(f, "api reported an error: {message}")
            }
            Degradation::ErrorFlag { message: None } => write!(f, "api reported an error"),
            Degradation::UnexpectedShape(detail) => write!(f, "unexpected response shape: {detail}"),
            Degradation::Missing(what) => write!(f, "missing {what}"),
            Degradation::Empty => write!(f, "nothing found"),
        }
    }
}
