//! `{{name}}` placeholder expansion for contract variables and expectations.

use std::collections::BTreeMap;

use serde_json::Value;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VarError {
    #[error("unresolved placeholder {{{{{0}}}}}")]
    Unresolved(String),
    #[error("expected key=value, got {0:?}")]
    BadAssignment(String),
}

/// Named values available to contracts (`user.id`, `product.slug`, ...).
#[derive(Debug, Clone, Default)]
pub struct Vars(BTreeMap<String, String>);

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Parse a `--var key=value` assignment.
    pub fn parse_assignment(raw: &str) -> Result<(String, String), VarError> {
        match raw.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_owned(), v.to_owned())),
            _ => Err(VarError::BadAssignment(raw.to_owned())),
        }
    }

    /// Expand every placeholder inside string values (object keys are left alone).
    pub fn expand(&self, value: &Value) -> Result<Value, VarError> {
        Ok(match value {
            Value::String(s) => Value::String(self.expand_str(s)?),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|v| self.expand(v))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), self.expand(v)?)))
                    .collect::<Result<_, VarError>>()?,
            ),
            other => other.clone(),
        })
    }

    pub fn expand_str(&self, s: &str) -> Result<String, VarError> {
        let mut out = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find("{{") {
            let Some(len) = rest[start + 2..].find("}}") else {
                break;
            };
            let name = rest[start + 2..start + 2 + len].trim();
            let value = self
                .get(name)
                .ok_or_else(|| VarError::Unresolved(name.to_owned()))?;
            out.push_str(&rest[..start]);
            out.push_str(value);
            rest = &rest[start + 2 + len + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
