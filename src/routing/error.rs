//! Routing error definitions.

use std::fmt;

use thiserror::Error;

/// Problems found in a single route record while building a router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route `{name}`: path `{path}` must start with `/`")]
    MissingLeadingSlash { name: String, path: String },

    #[error("route with path `{path}` has an empty name")]
    EmptyName { path: String },

    #[error("route `{name}`: path `{path}` is already declared by `{existing}`")]
    DuplicatePath {
        name: String,
        path: String,
        existing: String,
    },

    #[error("route name `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("route `{name}`: invalid parameter `{segment}`")]
    InvalidParam { name: String, segment: String },

    #[error("route `{name}`: parameter `{param}` appears more than once")]
    DuplicateParam { name: String, param: String },

    #[error("route `{name}`: `{segment}` must be the last segment")]
    MisplacedSegment { name: String, segment: String },
}

/// Errors returned by the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The route table was rejected; every problem is listed.
    #[error("invalid route table: {}", Joined(.0))]
    InvalidRoutes(Vec<RouteError>),

    #[error("no route matches `{location}`")]
    NoMatch { location: String },

    #[error("no route named `{0}`")]
    UnknownRouteName(String),

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParam { route: String, param: String },

    /// Navigating to the location that is already current.
    #[error("already at `{location}`")]
    NavigationDuplicated { location: String },

    #[error("invalid location `{location}`: {reason}")]
    InvalidLocation { location: String, reason: String },
}

struct Joined<'a>(&'a [RouteError]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_routes_lists_every_problem() {
        let err = RouterError::InvalidRoutes(vec![
            RouteError::DuplicateName("HomeView".into()),
            RouteError::EmptyName { path: "/x".into() },
        ]);
        assert_eq!(
            err.to_string(),
            "invalid route table: route name `HomeView` is declared more than once, \
             route with path `/x` has an empty name"
        );
    }
}
