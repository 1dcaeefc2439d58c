/// Router Module Index
///
/// Routes are grouped by who may reach them. Access is not enforced here: the
/// route guard in front of the whole router consults the policy table, and
/// these groups only mirror the default table so the layout reads the same way.

/// Routes open to anonymous visitors (login flow, health, public API).
pub mod public;

/// Routes the default policy opens to `user` and `admin` sessions.
pub mod authenticated;

/// Routes the default policy reserves for `admin` sessions.
pub mod admin;
