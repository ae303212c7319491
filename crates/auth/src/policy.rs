//! Static routing policy: where each role lands and who may enter which view.
//!
//! This is configuration, not state. It is built once at startup and never
//! mutated afterwards.

use std::collections::BTreeMap;

use serde::Serialize;

use sgms_core::Role;

/// Public entry route (login screen).
pub const PUBLIC_ENTRY: &str = "/login";

/// A protected view and the roles allowed to enter it.
///
/// An empty role list means "any authenticated identity".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedRoute {
    pub path: String,
    pub allowed: Vec<Role>,
}

/// Role → landing path mapping plus per-route role declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePolicy {
    public_entry: String,
    landings: BTreeMap<Role, String>,
    routes: Vec<ProtectedRoute>,
}

impl RoutePolicy {
    pub fn builder(public_entry: impl Into<String>) -> RoutePolicyBuilder {
        RoutePolicyBuilder {
            policy: RoutePolicy {
                public_entry: public_entry.into(),
                landings: BTreeMap::new(),
                routes: Vec::new(),
            },
        }
    }

    /// The console's route table.
    pub fn standard() -> Self {
        Self::standard_with_entry(PUBLIC_ENTRY)
    }

    /// The console's route table with a different public entry route.
    pub fn standard_with_entry(public_entry: impl Into<String>) -> Self {
        use Role::*;

        Self::builder(public_entry)
            .landing(Admin, "/dashboard/admin")
            .landing(Supervisor, "/dashboard/manager")
            .landing(Guard, "/dashboard/guard")
            .landing(Client, "/dashboard/client")
            .route("/dashboard/admin", &[Admin])
            .route("/dashboard/manager", &[Supervisor])
            .route("/dashboard/guard", &[Guard])
            .route("/dashboard/client", &[Client])
            .route("/guards", &[Admin, Supervisor])
            .route("/clients", &[Admin, Supervisor])
            .route("/sites", &[Admin, Supervisor])
            .route("/site-posts", &[Admin, Supervisor])
            .route("/assignments", &[Admin, Supervisor])
            .route("/attendance", &[Admin, Supervisor, Guard])
            .route("/profile", &[])
            .build()
    }

    pub fn public_entry(&self) -> &str {
        &self.public_entry
    }

    /// Canonical landing path of `role`, if one is configured.
    pub fn landing(&self, role: Role) -> Option<&str> {
        self.landings.get(&role).map(String::as_str)
    }

    /// Declaration governing `path`: the longest protected prefix that ends on
    /// a segment boundary. `None` means the path is public.
    pub fn route_for(&self, path: &str) -> Option<&ProtectedRoute> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.routes
            .iter()
            .filter(|r| covers(&r.path, path))
            .max_by_key(|r| r.path.len())
    }
}

fn covers(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub struct RoutePolicyBuilder {
    policy: RoutePolicy,
}

impl RoutePolicyBuilder {
    pub fn landing(mut self, role: Role, path: impl Into<String>) -> Self {
        self.policy.landings.insert(role, path.into());
        self
    }

    pub fn route(mut self, path: impl Into<String>, allowed: &[Role]) -> Self {
        self.policy.routes.push(ProtectedRoute {
            path: path.into(),
            allowed: allowed.to_vec(),
        });
        self
    }

    pub fn build(self) -> RoutePolicy {
        self.policy
    }
}
