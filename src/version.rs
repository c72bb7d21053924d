//! Version information.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit SHA passed in at build time through `HEIMDALL_GIT_SHA`, if any.
pub const GIT_SHA: Option<&str> = option_env!("HEIMDALL_GIT_SHA");

/// Full version string: `{version}` or `{version}+{sha}`.
///
/// Examples:
/// - `0.1.0`
/// - `0.1.0+abc1234`
pub fn version_string() -> String {
    match GIT_SHA.filter(|sha| !sha.is_empty()) {
        Some(sha) => format!("{PKG_VERSION}+{}", &sha[..7.min(sha.len())]),
        None => PKG_VERSION.to_string(),
    }
}
