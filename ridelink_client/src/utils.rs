//! Small helpers shared by the stores and the CLI.

use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::models::UserSummary;

pub const APP_NAME: &str = "ridelink_client";

/// Formats `timestamp` relative to `now` as `"Nm ago"`, `"Nh ago"` or `"Nd ago"`.
///
/// Timestamps in the future clamp to `"0m ago"`.
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes().max(0);
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{}d ago", hours / 24)
    }
}

/// Resolves the image URL to show for `user`.
///
/// Absolute URLs are used as-is, server-relative paths are joined onto
/// `api_base`, and users without a picture get a generated placeholder.
pub fn resolve_avatar_url(api_base: &str, placeholder_base: &str, user: &UserSummary) -> String {
    match user.profile_picture.as_deref().map(str::trim) {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => url.to_string(),
        Some(path) if path.starts_with('/') => format!("{api_base}{path}"),
        Some(path) if !path.is_empty() => format!("{api_base}/{path}"),
        _ => placeholder_avatar_url(placeholder_base, user),
    }
}

fn placeholder_avatar_url(placeholder_base: &str, user: &UserSummary) -> String {
    let label = if user.name.trim().is_empty() {
        user.id.as_str()
    } else {
        user.name.trim()
    };
    match Url::parse_with_params(placeholder_base, &[("name", label)]) {
        Ok(url) => url.to_string(),
        Err(err) => {
            log::warn!("invalid avatar placeholder base {placeholder_base}: {err}");
            placeholder_base.to_string()
        }
    }
}
