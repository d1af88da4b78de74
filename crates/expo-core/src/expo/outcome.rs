//! Success classification of Expo CLI output
//!
//! These are substring heuristics, not exit-status checks (a non-zero exit is
//! already an error before classification happens). A tool that writes
//! informational text to stderr without a success marker on stdout is
//! classified as failed.

use crate::runtime::shell::CommandResult;

/// stdout markers that mark a build as successful regardless of stderr
pub const BUILD_SUCCESS_MARKERS: &[&str] = &["Successfully built", "Build finished"];

/// stdout markers that mark a deployment as successful regardless of stderr
pub const DEPLOY_SUCCESS_MARKERS: &[&str] = &["successfully", "deployed"];

fn succeeded(result: &CommandResult, markers: &[&str]) -> bool {
    markers.iter().any(|m| result.stdout.contains(m)) || result.stderr.is_empty()
}

pub fn build_succeeded(result: &CommandResult) -> bool {
    succeeded(result, BUILD_SUCCESS_MARKERS)
}

pub fn deploy_succeeded(result: &CommandResult) -> bool {
    succeeded(result, DEPLOY_SUCCESS_MARKERS)
}

/// Verdict of `expo doctor`: any stderr output counts as issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorVerdict {
    Clean,
    Issues,
}

pub fn doctor_verdict(result: &CommandResult) -> DoctorVerdict {
    if result.stderr.is_empty() {
        DoctorVerdict::Clean
    } else {
        DoctorVerdict::Issues
    }
}
