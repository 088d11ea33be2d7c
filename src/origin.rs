use regex_automata::meta::{BuildError, Regex};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Origins permitted to read responses cross-origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowOrigins {
    /// Any origin (`"*"` in configuration).
    Any,
    /// Case-sensitive, exact origins.
    List(Vec<String>),
}

impl Default for AllowOrigins {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl AllowOrigins {
    pub fn any() -> Self {
        Self::Any
    }

    /// Builds an explicit list. A `"*"` entry anywhere turns the whole list
    /// into [`AllowOrigins::Any`].
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut origins: Vec<String> = Vec::new();
        for value in values {
            let value = value.into().trim().to_string();
            if value == "*" {
                return Self::Any;
            }
            if !value.is_empty() && !origins.contains(&value) {
                origins.push(value);
            }
        }

        Self::List(origins)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn contains(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(values) => values.iter().any(|value| value == origin),
        }
    }
}

/// Why an origin pattern could not be turned into a matcher.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid origin regex")]
    Build(#[source] Box<BuildError>),
    #[error("origin regex took {elapsed:?} to compile, over the {budget:?} budget")]
    Timeout { elapsed: Duration, budget: Duration },
    #[error("origin regex is {length} bytes long, the limit is {max}")]
    TooLong { length: usize, max: usize },
}

const PATTERN_COMPILE_BUDGET: Duration = Duration::from_millis(100);
const MAX_PATTERN_LENGTH: usize = 50_000;
const MAX_ORIGIN_LENGTH: usize = 4_096;

/// Regular expression an origin must match in full to be allowed.
#[derive(Clone, Debug)]
pub struct OriginPattern {
    source: String,
    regex: Regex,
}

impl OriginPattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Self::compile(pattern, PATTERN_COMPILE_BUDGET)
    }

    fn compile(pattern: &str, budget: Duration) -> Result<Self, PatternError> {
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(PatternError::TooLong {
                length: pattern.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }

        let started = Instant::now();
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|err| PatternError::Build(Box::new(err)))?;
        let elapsed = started.elapsed();
        if elapsed > budget {
            return Err(PatternError::Timeout { elapsed, budget });
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_budget(pattern: &str, budget: Duration) -> Result<Self, PatternError> {
        Self::compile(pattern, budget)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, origin: &str) -> bool {
        origin.len() <= MAX_ORIGIN_LENGTH && self.regex.is_match(origin)
    }
}

#[cfg(test)]
#[path = "origin_test.rs"]
mod origin_test;
