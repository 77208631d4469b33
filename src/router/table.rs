use std::collections::{BTreeMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pattern::{normalize_path, split_path, PathPattern};
use super::views::{RenderedView, ViewId};
use crate::error::RouteError;

/// One entry of the declarative route table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct RouteConfig {
    /// Absolute, or relative to the parent for children. `:name` segments are params.
    pub path: String,
    pub name: String,
    pub view: ViewId,
    /// Views exposing private data must set this; nothing else protects them.
    #[serde(default)]
    pub requires_auth: bool,
    /// Pass matched path params to the view as props.
    #[serde(default)]
    pub props: bool,
    #[serde(default)]
    pub children: Vec<RouteConfig>,
}

/// The route table the app ships with.
pub fn default_routes() -> Vec<RouteConfig> {
    let route = |path: &str, name: &str, view, requires_auth, props| RouteConfig {
        path: path.to_string(),
        name: name.to_string(),
        view,
        requires_auth,
        props,
        children: Vec::new(),
    };
    vec![
        route("/note/:id", "LetterViewer", ViewId::ThoughtReader, false, true),
        route("/", "Home", ViewId::Home, true, false),
        route("/login", "Login", ViewId::Login, false, false),
        route("/thoughts", "Thoughts", ViewId::ThoughtList, true, false),
        route("/compose", "Composer", ViewId::ThoughtComposer, true, false),
    ]
}

/// A validated route with its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub name: String,
    pub path: String,
    pub view: ViewId,
    pub requires_auth: bool,
    pub props: bool,
    pattern: PathPattern,
    children: Vec<RouteRecord>,
}

impl RouteRecord {
    fn build(
        config: &RouteConfig,
        parent_path: &str,
        names: &mut HashSet<String>,
    ) -> Result<Self, RouteError> {
        if !names.insert(config.name.clone()) {
            return Err(RouteError::DuplicateName(config.name.clone()));
        }
        let path = PathPattern::join(parent_path, &config.path);
        let pattern = PathPattern::parse(&path)?;
        let children = config
            .children
            .iter()
            .map(|child| RouteRecord::build(child, &path, names))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: config.name.clone(),
            path,
            view: config.view,
            requires_auth: config.requires_auth,
            props: config.props,
            pattern,
            children,
        })
    }

    /// Depth-first match; children are tried before their parent.
    fn resolve<'a>(
        &'a self,
        parts: &[&str],
        chain: &mut Vec<&'a RouteRecord>,
    ) -> Option<BTreeMap<String, String>> {
        chain.push(self);
        for child in &self.children {
            if let Some(params) = child.resolve(parts, chain) {
                return Some(params);
            }
        }
        if let Some(params) = self.pattern.matches(parts) {
            return Some(params);
        }
        chain.pop();
        None
    }

    fn find(&self, name: &str, chain: &mut Vec<RouteRecord>) -> bool {
        chain.push(self.clone());
        if self.name == name || self.children.iter().any(|child| child.find(name, chain)) {
            return true;
        }
        chain.pop();
        false
    }
}

/// A path resolved against the table: the matched chain, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub path: String,
    pub matched: Vec<RouteRecord>,
    pub params: BTreeMap<String, String>,
}

impl ResolvedRoute {
    pub fn leaf(&self) -> &RouteRecord {
        // A resolved route always has at least one matched record.
        &self.matched[self.matched.len() - 1]
    }

    pub fn name(&self) -> &str {
        &self.leaf().name
    }

    /// True when any record in the matched chain requires authentication.
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|record| record.requires_auth)
    }

    pub fn render(&self) -> RenderedView {
        let leaf = self.leaf();
        RenderedView {
            view: leaf.view,
            route_name: leaf.name.clone(),
            path: self.path.clone(),
            props: if leaf.props {
                self.params.clone()
            } else {
                BTreeMap::new()
            },
        }
    }
}

/// Ordered, validated route tree.
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    login_route: String,
}

impl RouteTable {
    /// Build the table. Names must be unique, patterns valid, and the login
    /// route must exist without requiring authentication.
    pub fn new(configs: &[RouteConfig], login_route: &str) -> Result<Self, RouteError> {
        let mut names = HashSet::new();
        let records = configs
            .iter()
            .map(|config| RouteRecord::build(config, "/", &mut names))
            .collect::<Result<Vec<_>, _>>()?;
        let table = Self {
            records,
            login_route: login_route.to_string(),
        };

        let login = table.resolve_name(login_route)?;
        if login.requires_auth() {
            return Err(RouteError::LoginRouteRequiresAuth(login_route.to_string()));
        }
        debug!("Route table built with {} routes", names.len());
        Ok(table)
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn resolve(&self, path: &str) -> Result<ResolvedRoute, RouteError> {
        let parts = split_path(path);
        for record in &self.records {
            let mut chain = Vec::new();
            if let Some(params) = record.resolve(&parts, &mut chain) {
                return Ok(ResolvedRoute {
                    path: normalize_path(path),
                    matched: chain.into_iter().cloned().collect(),
                    params,
                });
            }
        }
        Err(RouteError::NoMatch(path.to_string()))
    }

    /// Resolve a named route that has no path params.
    pub fn resolve_name(&self, name: &str) -> Result<ResolvedRoute, RouteError> {
        for record in &self.records {
            let mut chain = Vec::new();
            if record.find(name, &mut chain) {
                let leaf = &chain[chain.len() - 1];
                if leaf.pattern.has_params() {
                    return Err(RouteError::MissingParams(name.to_string()));
                }
                return Ok(ResolvedRoute {
                    path: leaf.path.clone(),
                    matched: chain,
                    params: BTreeMap::new(),
                });
            }
        }
        Err(RouteError::UnknownRoute(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(&default_routes(), "Login").unwrap()
    }

    fn nested_routes() -> Vec<RouteConfig> {
        let mut routes = default_routes();
        routes.push(RouteConfig {
            path: "/journal".to_string(),
            name: "Journal".to_string(),
            view: ViewId::ThoughtList,
            requires_auth: true,
            props: false,
            children: vec![RouteConfig {
                path: ":id".to_string(),
                name: "JournalEntry".to_string(),
                view: ViewId::ThoughtReader,
                requires_auth: false,
                props: true,
                children: Vec::new(),
            }],
        });
        routes
    }

    #[test]
    fn test_reader_route_receives_id_prop() {
        let resolved = table().resolve("/note/42").unwrap();
        assert_eq!(resolved.name(), "LetterViewer");
        assert!(!resolved.requires_auth());
        let view = resolved.render();
        assert_eq!(view.view, ViewId::ThoughtReader);
        assert_eq!(view.props.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_protected_routes_are_flagged() {
        let table = table();
        assert!(table.resolve("/").unwrap().requires_auth());
        assert!(table.resolve("/thoughts").unwrap().requires_auth());
        assert!(table.resolve("/compose").unwrap().requires_auth());
        assert!(!table.resolve("/login").unwrap().requires_auth());
    }

    #[test]
    fn test_props_only_for_props_routes() {
        let view = table().resolve("/thoughts?page=3").unwrap().render();
        assert_eq!(view.path, "/thoughts");
        assert!(view.props.is_empty());
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(
            table().resolve("/nope"),
            Err(RouteError::NoMatch("/nope".to_string()))
        );
    }

    #[test]
    fn test_child_inherits_parent_auth_requirement() {
        let table = RouteTable::new(&nested_routes(), "Login").unwrap();
        let resolved = table.resolve("/journal/7").unwrap();
        let names: Vec<&str> = resolved.matched.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Journal", "JournalEntry"]);
        assert!(resolved.requires_auth());
        assert_eq!(resolved.render().props.get("id").map(String::as_str), Some("7"));

        let parent = table.resolve("/journal").unwrap();
        assert_eq!(parent.matched.len(), 1);
    }

    #[test]
    fn test_first_declared_route_wins() {
        let mut routes = default_routes();
        routes.push(RouteConfig {
            path: "/note/draft".to_string(),
            name: "Draft".to_string(),
            view: ViewId::ThoughtComposer,
            requires_auth: true,
            props: false,
            children: Vec::new(),
        });
        let table = RouteTable::new(&routes, "Login").unwrap();
        assert_eq!(table.resolve("/note/draft").unwrap().name(), "LetterViewer");
    }

    #[test]
    fn test_resolve_name() {
        let table = RouteTable::new(&nested_routes(), "Login").unwrap();
        assert_eq!(table.resolve_name("Login").unwrap().path, "/login");
        assert_eq!(
            table.resolve_name("LetterViewer"),
            Err(RouteError::MissingParams("LetterViewer".to_string()))
        );
        assert_eq!(
            table.resolve_name("Missing"),
            Err(RouteError::UnknownRoute("Missing".to_string()))
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut routes = default_routes();
        routes.push(routes[0].clone());
        assert_eq!(
            RouteTable::new(&routes, "Login").unwrap_err(),
            RouteError::DuplicateName("LetterViewer".to_string())
        );
    }

    #[test]
    fn test_login_route_must_exist_and_be_public() {
        assert_eq!(
            RouteTable::new(&default_routes(), "SignIn").unwrap_err(),
            RouteError::UnknownRoute("SignIn".to_string())
        );

        let mut routes = default_routes();
        for route in &mut routes {
            if route.name == "Login" {
                route.requires_auth = true;
            }
        }
        assert_eq!(
            RouteTable::new(&routes, "Login").unwrap_err(),
            RouteError::LoginRouteRequiresAuth("Login".to_string())
        );
    }

    #[test]
    fn test_route_config_from_yaml_defaults() {
        let config: RouteConfig = serde_json::from_str(
            r#"{"path": "/about", "name": "About", "view": "home"}"#,
        )
        .unwrap();
        assert!(!config.requires_auth);
        assert!(!config.props);
        assert!(config.children.is_empty());
    }
}
