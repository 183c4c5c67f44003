//! Schema versioning and compatibility.

/// Current schema version for all JSON outputs.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (field removals, type changes)
/// - MINOR: Additive changes (new optional fields)
/// - PATCH: Bug fixes, documentation
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Check whether `version` shares its major version with `current`.
///
/// Versions whose major component does not parse are never compatible.
pub fn is_compatible(version: &str, current: &str) -> bool {
    let major = |v: &str| v.split('.').next().and_then(|s| s.trim().parse::<u32>().ok());
    major(version).is_some() && major(version) == major(current)
}
