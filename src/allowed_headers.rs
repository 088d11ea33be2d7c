use crate::constants::header;
use std::collections::HashSet;

/// Configuration for the `Access-Control-Allow-Headers` response value.
///
/// CORS-safelisted request headers are always allowed on top of the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowedHeaders {
    List(Vec<String>),
    /// Wildcard: every requested header is allowed and mirrored back on preflight.
    Any,
}

impl Default for AllowedHeaders {
    fn default() -> Self {
        AllowedHeaders::List(Vec::new())
    }
}

impl AllowedHeaders {
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut deduped: Vec<String> = Vec::new();
        for value in values.into_iter() {
            let trimmed = value.into().trim().to_string();
            if trimmed == "*" {
                return Self::Any;
            }
            if trimmed.is_empty() {
                continue;
            }
            let key = trimmed.to_ascii_lowercase();
            if seen.insert(key) {
                deduped.push(trimmed);
            }
        }

        Self::List(deduped)
    }

    pub fn any() -> Self {
        Self::Any
    }

    /// Checks a raw `Access-Control-Request-Headers` value.
    pub fn allows_headers(&self, request_headers: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(allowed) => request_headers
                .split(',')
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .all(|requested| {
                    header::SAFELISTED
                        .iter()
                        .copied()
                        .chain(allowed.iter().map(String::as_str))
                        .any(|allowed_header| allowed_header.eq_ignore_ascii_case(requested))
                }),
        }
    }

    /// Value advertised on a preflight response.
    pub fn header_value(&self, request_headers: Option<&str>) -> String {
        match self {
            Self::Any => request_headers
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or("*")
                .to_string(),
            Self::List(allowed) => {
                let mut values: Vec<&str> = header::SAFELISTED.to_vec();
                for value in allowed {
                    if !values
                        .iter()
                        .any(|existing| existing.eq_ignore_ascii_case(value))
                    {
                        values.push(value.as_str());
                    }
                }
                values.join(", ")
            }
        }
    }
}

#[cfg(test)]
#[path = "allowed_headers_test.rs"]
mod allowed_headers_test;
