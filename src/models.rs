use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Identity ---

/// Role
///
/// The closed set of roles a session can carry. Serialized in lowercase
/// (`"admin"`, `"user"`, `"guest"`); any other string is rejected at
/// deserialization time, so comparison sites never see an unknown role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    User,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Guest => "guest",
        }
    }

    /// Display label stamped onto a session at login.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "admin user",
            _ => "standard user",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value.trim() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session
///
/// The authenticated principal carried in the session cookie as a JSON object.
/// Extra fields in the cookie payload are ignored; missing fields or an unknown
/// role make the whole payload unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    /// Opaque identifier generated at login.
    pub id: String,
    /// Derived from the role at login; never set independently.
    pub name: String,
    pub role: Role,
}

// --- Request/Response DTOs ---

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub role: Role,
    /// Where to send the browser once the cookie is set. Only local paths are honoured.
    pub callback_url: Option<String>,
}

/// Query string accepted by `GET /login`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
    pub callback_url: Option<String>,
}

/// What the login page needs to render its role picker.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPageResponse {
    pub callback_url: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_revenue: String,
    pub active_users: u32,
    pub system_status: String,
}

impl Default for AdminStats {
    fn default() -> Self {
        Self {
            total_revenue: "$1,234,567".to_string(),
            active_users: 8942,
            system_status: "Operational".to_string(),
        }
    }
}

/// Payload of `GET /dashboard`. `admin_stats` is only present for admins.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub name: String,
    pub role: Role,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_stats: Option<AdminStats>,
}

impl From<&Session> for DashboardResponse {
    fn from(session: &Session) -> Self {
        let is_admin = session.role == Role::Admin;
        Self {
            name: session.name.clone(),
            role: session.role,
            is_admin,
            admin_stats: is_admin.then(AdminStats::default),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrivateResponse {
    pub message: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DashboardUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserStats {
    pub posts: u32,
    pub followers: u32,
    pub following: u32,
}

/// Payload of `GET /api/user-dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDashboardResponse {
    pub user: DashboardUser,
    pub stats: UserStats,
}

impl Default for UserDashboardResponse {
    fn default() -> Self {
        Self {
            user: DashboardUser {
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
            },
            stats: UserStats {
                posts: 42,
                followers: 1200,
                following: 350,
            },
        }
    }
}
