//! Display formatting for booking data.

use chrono::{DateTime, NaiveDate};

use crate::types::{Role, User};

/// Placeholder avatar used when a user has no profile image.
pub const DEFAULT_AVATAR: &str = "data:image/svg+xml,%3Csvg xmlns=%27http://www.w3.org/2000/svg%27 width=%2740%27 height=%2740%27%3E%3Crect fill=%27%23e5e7eb%27 width=%2740%27 height=%2740%27/%3E%3C/svg%3E";

/// `"14:05"` -> `"2:05 PM"`. Empty input stays empty; unparseable input is returned as-is.
pub fn format_time(time: &str) -> String {
    if time.is_empty() {
        return String::new();
    }
    let mut parts = time.split(':');
    let (Some(hours), Some(minutes)) = (parts.next(), parts.next()) else {
        return time.to_string();
    };
    let Ok(hour) = hours.trim().parse::<u32>() else {
        return time.to_string();
    };
    let ampm = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minutes} {ampm}")
}

/// `"2025-03-05"` or an RFC 3339 timestamp -> `"Mar 5, 2025"`.
pub fn format_date(date: &str) -> String {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|d| d.date_naive()));
    parsed.map_or_else(|| date.to_string(), |d| d.format("%b %-d, %Y").to_string())
}

/// `"in_progress"` -> `"In Progress"`
pub fn format_status(status: &str) -> String {
    status
        .split('_')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"in_progress"` -> `"badge-in-progress"`
pub fn status_badge_class(status: &str) -> String {
    format!("badge-{}", status.replace('_', "-"))
}

/// Human label for a role.
pub fn role_display_name(role: &Role) -> String {
    match role {
        Role::Therapist | Role::Cleaner => "Massage Therapist".to_string(),
        Role::SuperAdmin => "Super Admin".to_string(),
        other => capitalize(other.as_str()),
    }
}

/// Resolve a displayable image URL for `user`.
///
/// Absolute URLs are upgraded to https. Storage-relative paths are served via
/// `<backend_url>/api/storage/`. `cache_buster` is appended as `v=` so a fresh
/// upload replaces the cached image.
pub fn profile_image_url(user: Option<&User>, backend_url: &str, cache_buster: i64) -> String {
    let Some(user) = user else {
        return DEFAULT_AVATAR.to_string();
    };

    let candidate = user
        .profile_image_url
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| user.profile_image.as_deref().filter(|s| !s.is_empty()));
    let Some(image) = candidate else {
        return DEFAULT_AVATAR.to_string();
    };

    if image.starts_with("http://") || image.starts_with("https://") {
        let secure = image.strip_prefix("http://").map_or_else(|| image.to_string(), |rest| format!("https://{rest}"));
        let sep = if secure.contains('?') { '&' } else { '?' };
        return format!("{secure}{sep}v={cache_buster}");
    }

    let backend = backend_url.trim_end_matches('/');
    let path = if let Some(rest) = image.strip_prefix("/api/storage/") {
        format!("/api/storage/{rest}")
    } else if let Some(rest) = image.strip_prefix("api/storage/") {
        format!("/api/storage/{rest}")
    } else if let Some(rest) = image.strip_prefix("/storage/") {
        format!("/api/storage/{rest}")
    } else if let Some(rest) = image.strip_prefix("storage/") {
        format!("/api/storage/{rest}")
    } else {
        format!("/api/storage/{image}")
    };
    format!("{backend}{path}?v={cache_buster}")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
