//! Ordered path routing with anchored regular expressions.

use regex::{Captures, Regex};

/// Routes are tried in registration order; the first match wins.
#[derive(Debug, Clone)]
pub struct Router<R> {
    routes: Vec<(Regex, R)>,
}

/// A matched route plus its named path parameters.
#[derive(Debug)]
pub struct RouteMatch<'p, R> {
    pub route: R,
    captures: Captures<'p>,
}

impl<'p, R> RouteMatch<'p, R> {
    /// Named parameter, `None` when the group did not participate.
    pub fn param(&self, name: &str) -> Option<&'p str> {
        self.captures.name(name).map(|m| m.as_str())
    }
}

impl<R: Copy> Router<R> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register `route` for `pattern`. The pattern is anchored at both ends.
    pub fn route(mut self, pattern: &str, route: R) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        self.routes.push((regex, route));
        Ok(self)
    }

    pub fn match_path<'p>(&self, path: &'p str) -> Option<RouteMatch<'p, R>> {
        self.routes.iter().find_map(|(regex, route)| {
            regex.captures(path).map(|captures| RouteMatch {
                route: *route,
                captures,
            })
        })
    }
}

impl<R: Copy> Default for Router<R> {
    fn default() -> Self {
        Self::new()
    }
}
