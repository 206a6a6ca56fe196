use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::UserId;

const MAX_SAFE_NAME_LEN: usize = 50;
const MIN_SAFE_NAME_LEN: usize = 3;

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]").expect("valid regex"));
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Name of a per-user vector collection: `user_{user_id}_doc_{safe_filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn for_document(user_id: &UserId, filename: &str) -> Self {
        Self(format!(
            "{}doc_{}",
            Self::user_prefix(user_id),
            safe_filename(filename)
        ))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn user_prefix(user_id: &UserId) -> String {
        format!("user_{}_", user_id.as_str())
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.0.starts_with(&Self::user_prefix(user_id))
    }

    /// The document part of the name, e.g. `report` for `user_42_doc_report`.
    pub fn document_name(&self, user_id: &UserId) -> String {
        self.0
            .replace(&format!("{}doc_", Self::user_prefix(user_id)), "")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns an uploaded filename into a fragment that is valid inside a collection name.
pub fn safe_filename(filename: &str) -> String {
    let stripped = filename.replace(".pdf", "").replace(".PDF", "");
    let replaced = DISALLOWED_CHARS.replace_all(&stripped, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    let mut name = collapsed.trim_matches(|c| c == '_' || c == '.').to_string();

    if name.is_empty() {
        name = "document".to_string();
    }

    if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        name = format!("doc_{name}");
    }

    if !name.ends_with(|c: char| c.is_ascii_alphanumeric()) {
        name.push_str("_doc");
    }

    // Only ASCII survives the replacement above, so byte truncation is safe.
    if name.len() > MAX_SAFE_NAME_LEN {
        name.truncate(MAX_SAFE_NAME_LEN);
    }

    if name.len() < MIN_SAFE_NAME_LEN {
        name = format!("doc_{name}");
    }

    name
}
