//! adb response classification.
//!
//! adb speaks plain text only, so success is decided by token matching.

/// Tokens in `adb connect` output that mean the session is up.
pub const CONNECT_SUCCESS_TOKENS: &[&str] = &["connected", "already connected"];

/// Joins captured stdout and stderr into one trimmed string.
#[must_use]
pub fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let out = String::from_utf8_lossy(stdout);
    let err = String::from_utf8_lossy(stderr);
    match (out.trim(), err.trim()) {
        (o, "") => o.to_string(),
        ("", e) => e.to_string(),
        (o, e) => format!("{o}\n{e}"),
    }
}

/// Case-insensitive match of `adb connect` output against the success tokens.
#[must_use]
pub fn is_connect_success(output: &str) -> bool {
    let lower = output.to_lowercase();
    CONNECT_SUCCESS_TOKENS.iter().any(|t| lower.contains(t))
}

/// Whether `adb devices` output lists a session for `address`.
#[must_use]
pub fn devices_lists(output: &str, address: &str) -> bool {
    output.contains(address)
}

/// `adb install` can exit 0 while printing `Failure [REASON]`.
#[must_use]
pub fn install_failure(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("Failure") || l.starts_with("adb: failed"))
        .map(str::to_owned)
}
