use crate::constants::method;

/// Configuration for the `Access-Control-Allow-Methods` response header.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AllowedMethods {
    /// Allow every method; advertised as the full standard method list.
    Any,
    /// Case-sensitive list of methods, in configuration order.
    List(Vec<String>),
}

impl AllowedMethods {
    /// Construct an explicit list of allowed methods. A `"*"` entry yields [`Self::Any`].
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for value in values {
            let value = value.into().trim().to_string();
            if value == "*" {
                return Self::Any;
            }
            if !deduped.iter().any(|existing| existing == &value) {
                deduped.push(value);
            }
        }

        Self::List(deduped)
    }

    pub fn any() -> Self {
        Self::Any
    }

    pub fn allows_method(&self, requested: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(values) => values.iter().any(|value| value == requested.trim()),
        }
    }

    /// Return the header value representation, if any.
    pub fn header_value(&self) -> Option<String> {
        match self {
            AllowedMethods::Any => Some(method::ALL.join(", ")),
            AllowedMethods::List(values) if values.is_empty() => None,
            AllowedMethods::List(values) => Some(values.join(", ")),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            AllowedMethods::Any => &[],
            AllowedMethods::List(values) => values,
        };
        values.iter().map(String::as_str)
    }
}

impl Default for AllowedMethods {
    fn default() -> Self {
        Self::list([method::GET])
    }
}

#[cfg(test)]
#[path = "allowed_methods_test.rs"]
mod allowed_methods_test;
