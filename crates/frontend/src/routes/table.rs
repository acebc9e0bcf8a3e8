//! Static route table.
//!
//! Routes are declared as a tree of [`RouteDef`] and flattened once into a
//! validated, immutable [`RouteTable`]. Child paths are relative to their
//! parent unless they start with `/`; segments written as `:name` capture a
//! parameter.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteDef {
    pub path: String,
    pub name: String,
    pub requires_auth: bool,
    pub redirect: Option<String>,
    pub children: Vec<RouteDef>,
}

impl RouteDef {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requires_auth: false,
            redirect: None,
            children: Vec::new(),
        }
    }

    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn redirect(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(to.into());
        self
    }

    pub fn children(mut self, children: Vec<RouteDef>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("route '{name}': empty path")]
    EmptyPath { name: String },

    #[error("route '{name}': malformed path '{path}'")]
    MalformedPath { name: String, path: String },

    #[error("route '{name}': top-level path '{path}' must start with '/'")]
    RelativeTopLevel { name: String, path: String },

    #[error("route '{name}': empty segment in '{path}'")]
    EmptySegment { name: String, path: String },

    #[error("route '{name}': unnamed parameter in '{path}'")]
    UnnamedParam { name: String, path: String },

    #[error("route with path '{path}' has no name")]
    MissingName { path: String },

    #[error("duplicate route name '{0}'")]
    DuplicateName(String),

    #[error("duplicate route path '{0}'")]
    DuplicatePath(String),

    #[error("route '{name}': redirect target '{target}' does not resolve to a route")]
    DanglingRedirect { name: String, target: String },

    #[error("route '{name}': redirect routes cannot have children")]
    RedirectWithChildren { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A route after flattening: full path, own flags, and its parent index
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub name: String,
    pub full_path: String,
    pub requires_auth: bool,
    pub redirect: Option<String>,
    pub parent: Option<usize>,
    segments: Vec<Segment>,
}

impl ResolvedRoute {
    fn shape(&self) -> String {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Static(v) => v.as_str(),
                Segment::Param(_) => ":",
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    fn capture(&self, parts: &[&str]) -> Option<Vec<(String, String)>> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) if expected == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    let value = urlencoding::decode(part)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| part.to_string());
                    params.push((name.clone(), value));
                }
            }
        }
        Some(params)
    }
}

/// Result of resolving a path: matched routes from root to leaf
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a> {
    pub chain: Vec<&'a ResolvedRoute>,
    pub params: Vec<(String, String)>,
}

impl<'a> RouteMatch<'a> {
    pub fn route(&self) -> &'a ResolvedRoute {
        self.chain[self.chain.len() - 1]
    }

    /// True if the matched route or any ancestor requires a session
    pub fn requires_auth(&self) -> bool {
        self.chain.iter().any(|r| r.requires_auth)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<ResolvedRoute>,
}

impl RouteTable {
    /// Flatten and validate the declared routes; fails on the first defect
    pub fn new(defs: Vec<RouteDef>) -> Result<Self, RouteTableError> {
        let mut routes = Vec::new();
        for def in &defs {
            flatten(def, None, &mut routes)?;
        }

        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|r| r.name == route.name) {
                return Err(RouteTableError::DuplicateName(route.name.clone()));
            }
            let shape = route.shape();
            if routes[..i].iter().any(|r| r.shape() == shape) {
                return Err(RouteTableError::DuplicatePath(route.full_path.clone()));
            }
        }

        let table = Self { routes };
        for route in &table.routes {
            if let Some(target) = &route.redirect {
                let resolves = target.starts_with('/')
                    && table
                        .resolve(target)
                        .is_some_and(|m| m.route().name != route.name);
                if !resolves {
                    return Err(RouteTableError::DanglingRedirect {
                        name: route.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        log::debug!("Route table ready: {} routes", table.routes.len());
        Ok(table)
    }

    pub fn routes(&self) -> &[ResolvedRoute] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&ResolvedRoute> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// First declared route (depth-first) whose pattern matches `path`
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        self.routes.iter().enumerate().find_map(|(index, route)| {
            let params = route.capture(&parts)?;
            Some(RouteMatch {
                chain: self.chain(index),
                params,
            })
        })
    }

    fn chain(&self, index: usize) -> Vec<&ResolvedRoute> {
        let mut chain = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            chain.push(&self.routes[i]);
            cursor = self.routes[i].parent;
        }
        chain.reverse();
        chain
    }
}

/// Normalize a navigation target: leading `/`, no query or fragment, no
/// trailing `/` except for the root.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn flatten(
    def: &RouteDef,
    parent: Option<usize>,
    out: &mut Vec<ResolvedRoute>,
) -> Result<(), RouteTableError> {
    if def.name.trim().is_empty() {
        return Err(RouteTableError::MissingName {
            path: def.path.clone(),
        });
    }
    if def.redirect.is_some() && !def.children.is_empty() {
        return Err(RouteTableError::RedirectWithChildren {
            name: def.name.clone(),
        });
    }

    let own = parse_segments(def, parent.is_none())?;
    let segments = match parent {
        Some(p) if !def.path.starts_with('/') => {
            let mut segments = out[p].segments.clone();
            segments.extend(own);
            segments
        }
        _ => own,
    };
    let full_path = render(&segments);

    out.push(ResolvedRoute {
        name: def.name.clone(),
        full_path,
        requires_auth: def.requires_auth,
        redirect: def.redirect.clone(),
        parent,
        segments,
    });
    let index = out.len() - 1;

    for child in &def.children {
        flatten(child, Some(index), out)?;
    }
    Ok(())
}

fn parse_segments(def: &RouteDef, top_level: bool) -> Result<Vec<Segment>, RouteTableError> {
    let path = def.path.as_str();
    let malformed = || RouteTableError::MalformedPath {
        name: def.name.clone(),
        path: path.to_string(),
    };

    if path.is_empty() {
        return Err(RouteTableError::EmptyPath {
            name: def.name.clone(),
        });
    }
    if top_level && !path.starts_with('/') {
        return Err(RouteTableError::RelativeTopLevel {
            name: def.name.clone(),
            path: path.to_string(),
        });
    }
    if path == "/" {
        return Ok(Vec::new());
    }

    let body = path.strip_prefix('/').unwrap_or(path);
    let mut segments = Vec::new();
    for part in body.split('/') {
        if part.is_empty() {
            return Err(RouteTableError::EmptySegment {
                name: def.name.clone(),
                path: path.to_string(),
            });
        }
        if let Some(param) = part.strip_prefix(':') {
            if param.is_empty() {
                return Err(RouteTableError::UnnamedParam {
                    name: def.name.clone(),
                    path: path.to_string(),
                });
            }
            if !param.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(malformed());
            }
            segments.push(Segment::Param(param.to_string()));
        } else {
            if !part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            {
                return Err(malformed());
            }
            segments.push(Segment::Static(part.to_string()));
        }
    }
    Ok(segments)
}

fn render(segments: &[Segment]) -> String {
    let parts: Vec<String> = segments
        .iter()
        .map(|s| match s {
            Segment::Static(v) => v.clone(),
            Segment::Param(name) => format!(":{}", name),
        })
        .collect();
    format!("/{}", parts.join("/"))
}
