//! Configuration loading and representation.

use std::{fmt::Display, str::FromStr};

use tracing::{info, warn};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SECTION_SIZE: usize = 4;
pub const DEFAULT_YEARLY_SECTIONS: usize = 3;
pub const DEFAULT_COMMIT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Cap for each homepage section (popular, editor's pick, monthly, yearly samples).
    pub section_size: usize,
    /// Number of past years shown as yearly collections on the homepage.
    pub yearly_sections: usize,
    /// Attempts at a conditional visibility commit before giving up.
    pub commit_attempts: u32,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            section_size: DEFAULT_SECTION_SIZE,
            yearly_sections: DEFAULT_YEARLY_SECTIONS,
            commit_attempts: DEFAULT_COMMIT_ATTEMPTS,
        }
    }
}

impl ShowcaseConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing or invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("SHOWCASE_BIND_ADDR").unwrap_or_else(|| {
                info!("SHOWCASE_BIND_ADDR not set, using default: {DEFAULT_BIND_ADDR}");
                DEFAULT_BIND_ADDR.to_string()
            }),
            section_size: try_load(&lookup, "SHOWCASE_SECTION_SIZE", DEFAULT_SECTION_SIZE),
            yearly_sections: try_load(&lookup, "SHOWCASE_YEARLY_SECTIONS", DEFAULT_YEARLY_SECTIONS),
            commit_attempts: try_load(&lookup, "SHOWCASE_COMMIT_ATTEMPTS", DEFAULT_COMMIT_ATTEMPTS),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display + PartialOrd + Default,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => v,
        Ok(_) => {
            warn!("{key} must be positive, using default: {default}");
            default
        }
        Err(e) => {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }
    }
}
