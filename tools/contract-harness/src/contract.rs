//! Contract file format and loader.
//!
//! Each file at `contracts/graphql/{area}/{id}.json` describes one GraphQL
//! round trip: the operation to send and what the response envelope must look like.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// A single GraphQL contract loaded from a file.
#[derive(Debug, Clone, Deserialize)]
pub struct Contract {
    /// Area used for filtering (`catalog`, `checkout`, `account`, `security`).
    /// Taken from the parent directory name.
    #[serde(skip)]
    pub area: String,
    /// Filename stem.
    #[serde(skip)]
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub auth: Auth,
    pub request: Request,
    #[serde(default)]
    pub expect: Expect,
}

/// Which `Authorization` header the request carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Auth {
    #[default]
    None,
    /// Bearer token of the seeded user. SKIP when no token is available.
    User,
    /// A syntactically valid but unsigned token.
    Invalid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Sent verbatim. Placeholders are never expanded here.
    pub query: String,
    #[serde(default = "empty_object")]
    pub variables: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorsExpectation {
    /// No top-level `errors`.
    #[default]
    Absent,
    Present,
    Any,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Expect {
    #[serde(default = "ok_status")]
    pub status: u16,
    #[serde(default)]
    pub errors: ErrorsExpectation,
    /// Dotted path from the envelope root (`data.product.id`, `errors.0.extensions.code`).
    #[serde(default)]
    pub equals: BTreeMap<String, Value>,
    #[serde(default)]
    pub non_empty: Vec<String>,
    #[serde(default)]
    pub empty: Vec<String>,
    #[serde(default)]
    pub null: Vec<String>,
    /// Strings that must not appear inside any string value under `data`.
    #[serde(default)]
    pub not_echoed: Vec<String>,
}

impl Default for Expect {
    fn default() -> Self {
        Self {
            status: ok_status(),
            errors: ErrorsExpectation::default(),
            equals: BTreeMap::new(),
            non_empty: Vec::new(),
            empty: Vec::new(),
            null: Vec::new(),
            not_echoed: Vec::new(),
        }
    }
}

fn ok_status() -> u16 {
    200
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// Load every contract under `{workspace_root}/contracts/graphql/`, optionally
/// restricted to one area, sorted by area then id.
pub fn load_all(workspace_root: &Path, area: Option<&str>) -> Result<Vec<Contract>> {
    let graphql_dir = workspace_root.join("contracts/graphql");

    let area_dirs: Vec<_> = match area {
        Some(a) => vec![graphql_dir.join(a)],
        None => fs::read_dir(&graphql_dir)
            .with_context(|| format!("cannot open {}", graphql_dir.display()))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
    };

    let mut contracts = Vec::new();
    for dir in area_dirs {
        if !dir.exists() {
            continue;
        }
        let area_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for entry in fs::read_dir(&dir)
            .with_context(|| format!("cannot read {}", dir.display()))?
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                let mut contract: Contract = serde_json::from_str(&content)
                    .with_context(|| format!("invalid contract JSON in {}", path.display()))?;
                contract.area = area_name.clone();
                contract.id = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                contracts.push(contract);
            }
        }
    }

    contracts.sort_by(|a, b| a.area.cmp(&b.area).then(a.id.cmp(&b.id)));
    Ok(contracts)
}
