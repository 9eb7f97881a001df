//! Raw location parsing.
//!
//! Locations are parsed relative to a synthetic origin so the `url` crate
//! can split path, query and fragment and remove dot segments.

use url::Url;

use crate::routing::error::RouterError;

const ORIGIN: &str = "http://router.invalid/";

/// A parsed application location (path, query, hash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Encoded path, always starting with `/`.
    pub path: String,

    /// Decoded query pairs in order of appearance.
    pub query: Vec<(String, String)>,

    /// Fragment without the leading `#`.
    pub hash: Option<String>,

    /// Query string as written (still encoded), when parsed from text.
    search: Option<String>,
}

impl Location {
    /// Parse a raw location such as `/login?redirect=%2F#form`.
    ///
    /// An empty string is the root location.
    pub fn parse(raw: &str) -> Result<Self, RouterError> {
        let raw = raw.trim();
        let relative = if raw.is_empty() || raw.starts_with('/') {
            raw.to_string()
        } else {
            format!("/{}", raw)
        };

        let base = Url::parse(ORIGIN).map_err(|e| invalid(raw, e))?;
        let url = base.join(&relative).map_err(|e| invalid(raw, e))?;
        if url.origin() != base.origin() {
            return Err(RouterError::InvalidLocation {
                location: raw.to_string(),
                reason: "location must be a path, not an absolute URL".to_string(),
            });
        }

        Ok(Self {
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
            search: url.query().filter(|q| !q.is_empty()).map(str::to_string),
            hash: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
        })
    }

    /// Build a location from a path plus query and hash parts.
    pub fn new(path: impl Into<String>, query: Vec<(String, String)>, hash: Option<String>) -> Self {
        Self {
            path: path.into(),
            query,
            hash,
            search: None,
        }
    }

    /// Path with the encoded query string and hash appended.
    ///
    /// A parsed query is emitted exactly as it was written.
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        if let Some(search) = &self.search {
            full.push('?');
            full.push_str(search);
        } else if !self.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            full.push('?');
            full.push_str(&query);
        }
        if let Some(hash) = &self.hash {
            full.push('#');
            full.push_str(hash);
        }
        full
    }
}

fn invalid(raw: &str, err: url::ParseError) -> RouterError {
    RouterError::InvalidLocation {
        location: raw.to_string(),
        reason: err.to_string(),
    }
}
