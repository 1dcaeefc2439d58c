use crate::models::Role;

/// PolicyError
///
/// Raised while parsing a `ROUTE_POLICIES` value at startup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("route policy entry `{0}` must have the form /prefix=role[,role]")]
    MalformedEntry(String),
    #[error("route prefix `{0}` must start with `/`")]
    InvalidPrefix(String),
    #[error("unknown role `{role}` for prefix `{prefix}`")]
    UnknownRole { prefix: String, role: String },
    #[error("route prefix `{0}` lists no roles")]
    NoRoles(String),
    #[error("no route policies given; refusing to start with every route public")]
    Empty,
}

/// RoutePolicy
///
/// One protected prefix and the roles allowed behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    pub prefix: String,
    pub allowed_roles: Vec<Role>,
}

impl RoutePolicy {
    pub fn new(prefix: impl Into<String>, allowed_roles: impl Into<Vec<Role>>) -> Self {
        Self {
            prefix: prefix.into(),
            allowed_roles: allowed_roles.into(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// RoutePolicyTable
///
/// Ordered mapping of path prefixes to allowed roles. Built once at startup and
/// shared read-only through `AppState`; a path matching no entry is public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicyTable {
    entries: Vec<RoutePolicy>,
}

impl Default for RoutePolicyTable {
    /// `/dashboard` for users and admins, `/private` for admins only.
    fn default() -> Self {
        Self::new(vec![
            RoutePolicy::new("/dashboard", [Role::User, Role::Admin]),
            RoutePolicy::new("/private", [Role::Admin]),
        ])
    }
}

impl RoutePolicyTable {
    pub fn new(entries: Vec<RoutePolicy>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RoutePolicy] {
        &self.entries
    }

    /// First entry, in declaration order, whose prefix the path starts with.
    pub fn find(&self, path: &str) -> Option<&RoutePolicy> {
        self.entries
            .iter()
            .find(|policy| path.starts_with(policy.prefix.as_str()))
    }

    /// parse
    ///
    /// Reads the `/prefix=role,role;/other=role` format. Empty segments between
    /// semicolons are skipped; everything else must be well formed, and at
    /// least one entry must remain.
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        let mut entries = Vec::new();

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (prefix, roles) = segment
                .split_once('=')
                .ok_or_else(|| PolicyError::MalformedEntry(segment.to_string()))?;
            let prefix = prefix.trim();

            if !prefix.starts_with('/') {
                return Err(PolicyError::InvalidPrefix(prefix.to_string()));
            }

            let mut allowed_roles = Vec::new();
            for name in roles.split(',').map(str::trim).filter(|r| !r.is_empty()) {
                let role = Role::parse(name).ok_or_else(|| PolicyError::UnknownRole {
                    prefix: prefix.to_string(),
                    role: name.to_string(),
                })?;
                if !allowed_roles.contains(&role) {
                    allowed_roles.push(role);
                }
            }

            if allowed_roles.is_empty() {
                return Err(PolicyError::NoRoles(prefix.to_string()));
            }

            entries.push(RoutePolicy::new(prefix, allowed_roles));
        }

        if entries.is_empty() {
            return Err(PolicyError::Empty);
        }

        Ok(Self::new(entries))
    }
}
