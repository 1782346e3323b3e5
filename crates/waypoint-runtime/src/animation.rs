#![forbid(unsafe_code)]

//! Animated-transition policy.
//!
//! Pushes and modal presentations animate by default; setting
//! `WAYPOINT_NO_ANIMATION` (truthy: `1`, `true`, `yes`, `on`) disables
//! them for test harnesses and dumb hosts. The environment is read once
//! and cached.

use std::sync::OnceLock;

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[inline]
fn animations_from_env_impl<F>(get_env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match get_env("WAYPOINT_NO_ANIMATION") {
        Some(value) => !env_flag(&value),
        None => true,
    }
}

/// Compute the animation policy using a custom environment lookup.
#[inline]
pub fn animations_from_env<F>(get_env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    animations_from_env_impl(get_env)
}

/// Cached animation policy (fast path).
#[inline]
#[must_use]
pub fn animations_enabled() -> bool {
    static ANIMATIONS: OnceLock<bool> = OnceLock::new();
    *ANIMATIONS.get_or_init(|| animations_from_env_impl(|key| std::env::var(key).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_animated() {
        assert!(animations_from_env(|_| None));
    }

    #[test]
    fn truthy_opt_out_disables_animation() {
        for value in ["1", "true", "YES", " on "] {
            let value = value.to_owned();
            assert!(!animations_from_env(|key| {
                (key == "WAYPOINT_NO_ANIMATION").then(|| value.clone())
            }));
        }
    }

    #[test]
    fn falsy_opt_out_keeps_animation() {
        for value in ["0", "false", "off", ""] {
            let value = value.to_owned();
            assert!(animations_from_env(|key| {
                (key == "WAYPOINT_NO_ANIMATION").then(|| value.clone())
            }));
        }
    }
}
