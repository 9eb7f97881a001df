//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile route paths into segment lists
//! - Match request paths (case-insensitive, optional trailing slash)
//! - Rank patterns so the most specific one is tried first
//! - Build concrete paths from a pattern and parameter values
//!
//! # Pattern syntax
//! - `login`: static segment
//! - `:id`: one required segment
//! - `:id?`: optional segment, last position only
//! - `:rest(.*)`: everything that remains, last position only
//!
//! # Design Decisions
//! - No regex: segments are compared one by one
//! - Parameter values are percent-decoded on match and encoded on build

use std::collections::BTreeMap;

use crate::routing::error::{RouteError, RouterError};

const SCORE_STATIC: u8 = 40;
const SCORE_PARAM: u8 = 20;
/// Closes every score so a pattern that ends beats one continuing with optional parts.
const SCORE_END: u8 = 15;
const SCORE_OPTIONAL: u8 = 10;
const SCORE_CATCH_ALL: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static { text: String, folded: String },
    Param(String),
    Optional(String),
    CatchAll(String),
}

impl Segment {
    fn score(&self) -> u8 {
        match self {
            Segment::Static { .. } => SCORE_STATIC,
            Segment::Param(_) => SCORE_PARAM,
            Segment::Optional(_) => SCORE_OPTIONAL,
            Segment::CatchAll(_) => SCORE_CATCH_ALL,
        }
    }

    fn must_be_last(&self) -> bool {
        matches!(self, Segment::Optional(_) | Segment::CatchAll(_))
    }
}

/// A compiled route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile `path` for the route called `route`.
    ///
    /// Returns every problem found in the path, not only the first.
    pub fn parse(route: &str, path: &str) -> Result<Self, Vec<RouteError>> {
        let mut errors = Vec::new();
        if !path.starts_with('/') {
            errors.push(RouteError::MissingLeadingSlash {
                name: route.to_string(),
                path: path.to_string(),
            });
        }

        let raw_segments = split_segments(path);
        let mut segments = Vec::with_capacity(raw_segments.len());
        let mut seen_params: Vec<&str> = Vec::new();

        for (i, raw) in raw_segments.iter().enumerate() {
            let segment = match parse_segment(raw) {
                Some(segment) => segment,
                None => {
                    errors.push(RouteError::InvalidParam {
                        name: route.to_string(),
                        segment: raw.to_string(),
                    });
                    continue;
                }
            };

            if segment.must_be_last() && i + 1 != raw_segments.len() {
                errors.push(RouteError::MisplacedSegment {
                    name: route.to_string(),
                    segment: raw.to_string(),
                });
            }
            if let Some(param) = param_name_in(raw) {
                if seen_params.contains(&param) {
                    errors.push(RouteError::DuplicateParam {
                        name: route.to_string(),
                        param: param.to_string(),
                    });
                }
                seen_params.push(param);
            }
            segments.push(segment);
        }

        if errors.is_empty() {
            Ok(Self {
                raw: path.to_string(),
                segments,
            })
        } else {
            Err(errors)
        }
    }

    /// The path as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Shape of the pattern with case and parameter names erased.
    ///
    /// Two patterns with the same key match exactly the same paths.
    pub fn conflict_key(&self) -> String {
        let mut key = String::new();
        for segment in &self.segments {
            key.push('/');
            match segment {
                Segment::Static { folded, .. } => key.push_str(folded),
                Segment::Param(_) => key.push(':'),
                Segment::Optional(_) => key.push_str(":?"),
                Segment::CatchAll(_) => key.push('*'),
            }
        }
        if key.is_empty() {
            key.push('/');
        }
        key
    }

    /// Ranking score; higher sorts first.
    pub fn score(&self) -> Vec<u8> {
        let mut score: Vec<u8> = self.segments.iter().map(Segment::score).collect();
        score.push(SCORE_END);
        score
    }

    /// Match an encoded request path, returning decoded parameters.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let parts = split_segments(path);
        let mut params = BTreeMap::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static { folded, .. } => {
                    let part = parts.get(i)?;
                    if decode(part).to_lowercase() != *folded {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let part = parts.get(i)?;
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), decode(part));
                }
                Segment::Optional(name) => {
                    if let Some(part) = parts.get(i) {
                        if part.is_empty() {
                            return None;
                        }
                        params.insert(name.clone(), decode(part));
                    }
                }
                Segment::CatchAll(name) => {
                    let rest = parts.get(i..).unwrap_or(&[]).join("/");
                    params.insert(name.clone(), decode(&rest));
                    return Some(params);
                }
            }
        }

        if parts.len() > self.segments.len() {
            return None;
        }
        Some(params)
    }

    /// Build a concrete, encoded path from parameter values.
    pub fn build(
        &self,
        route: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<String, RouterError> {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Static { text, .. } => {
                    path.push('/');
                    path.push_str(text);
                }
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| RouterError::MissingParam {
                            route: route.to_string(),
                            param: name.clone(),
                        })?;
                    path.push('/');
                    path.push_str(&urlencoding::encode(value));
                }
                Segment::Optional(name) => {
                    if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
                        path.push('/');
                        path.push_str(&urlencoding::encode(value));
                    }
                }
                Segment::CatchAll(name) => {
                    if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
                        for piece in value.trim_start_matches('/').split('/') {
                            path.push('/');
                            path.push_str(&urlencoding::encode(piece));
                        }
                    }
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

/// Split a path into segments, ignoring the leading slash and one trailing slash.
fn split_segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

fn parse_segment(raw: &str) -> Option<Segment> {
    let Some(spec) = raw.strip_prefix(':') else {
        return Some(Segment::Static {
            text: raw.to_string(),
            folded: raw.to_lowercase(),
        });
    };

    let name = param_name_in(raw)?;
    if spec.ends_with("(.*)") {
        Some(Segment::CatchAll(name.to_string()))
    } else if spec.ends_with('?') {
        Some(Segment::Optional(name.to_string()))
    } else if spec == name {
        Some(Segment::Param(name.to_string()))
    } else {
        None
    }
}

/// Parameter name of a `:name`, `:name?` or `:name(.*)` segment.
fn param_name_in(raw: &str) -> Option<&str> {
    let spec = raw.strip_prefix(':')?;
    let name = spec
        .strip_suffix("(.*)")
        .or_else(|| spec.strip_suffix('?'))
        .unwrap_or(spec);
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(name)
}

fn decode(part: &str) -> String {
    urlencoding::decode(part)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| part.to_string())
}
