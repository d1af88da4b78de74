//! Version comparison for tool prerequisites

use semver::Version;

/// Minimum Node.js version the Expo CLI supports
pub const MIN_NODE_VERSION: &str = "18.0.0";

/// Compare an installed tool version against a minimum.
/// Returns a warning message if the installed version is older.
pub fn check_minimum(tool: &str, installed: &str, minimum: &str) -> Option<String> {
    let installed_ver = match parse_version(installed) {
        Some(v) => v,
        None => return None, // Can't compare, skip warning
    };

    let minimum_ver = match parse_version(minimum) {
        Some(v) => v,
        None => return None,
    };

    if installed_ver < minimum_ver {
        Some(format!(
            "{} {} is older than the recommended {}. Consider upgrading.",
            tool, installed, minimum
        ))
    } else {
        None
    }
}

/// Parse version string, handling a leading 'v' and surrounding whitespace
pub fn parse_version(version_str: &str) -> Option<Version> {
    let trimmed = version_str.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).ok()
}
