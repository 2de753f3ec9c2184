//! Page redirects.
//!
//! Computes where the front-end should send the user: the login page after a
//! session expires, or the dashboard that matches their role. Paths are
//! resolved against the site prefix in front of the `views` segment so the
//! pages work from any deployment sub-path.

use crate::constants::pages;
use crate::types::{Role, User};

/// Role a page requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    /// Customer pages.
    Customer,
    /// Therapist pages (therapists and cleaners).
    Therapist,
    /// Staff pages (staff and super admins).
    Admin,
}

impl RequiredRole {
    /// Whether `role` may view pages requiring `self`.
    pub const fn allows(self, role: &Role) -> bool {
        match self {
            Self::Customer => matches!(role, Role::Customer),
            Self::Therapist => role.is_therapist(),
            Self::Admin => role.is_admin(),
        }
    }
}

/// Outcome of a page access check.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// Show the page to this user.
    Granted(User),
    /// Navigate to this path instead.
    Redirect(String),
}

/// Site prefix in front of the `views` segment.
///
/// Only a `views` segment past index 1 counts; `/views/...` has no prefix.
fn base_path(current_path: &str) -> String {
    let parts: Vec<&str> = current_path.split('/').collect();
    match parts.iter().position(|p| *p == pages::VIEWS_SEGMENT) {
        Some(idx) if idx > 1 => parts[..idx].join("/"),
        _ => String::new(),
    }
}

/// Login page for the site `current_path` belongs to.
pub fn login_page(current_path: &str) -> String {
    format!("{}{}", base_path(current_path), pages::LOGIN)
}

/// Where to go after the session expired, or `None` when already on the login page.
pub fn login_redirect(current_path: &str) -> Option<String> {
    if current_path.contains(pages::LOGIN_MARKER) {
        return None;
    }
    Some(login_page(current_path))
}

/// Dashboard page for `role`.
pub fn dashboard_path(role: &Role, current_path: &str) -> String {
    let section = if role.is_admin() {
        "staff"
    } else if role.is_therapist() {
        "therapist"
    } else {
        "customer"
    };
    format!("{}/{}/{section}/dashboard.html", base_path(current_path), pages::VIEWS_SEGMENT)
}

/// Grant access, or redirect a user with the wrong role to their own dashboard.
pub fn check_access(user: User, required: Option<RequiredRole>, current_path: &str) -> Access {
    match required {
        Some(required) if !required.allows(&user.role) => {
            tracing::debug!("{} may not view {current_path}", user.role);
            Access::Redirect(dashboard_path(&user.role, current_path))
        }
        _ => Access::Granted(user),
    }
}
