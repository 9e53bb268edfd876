//! Command-line helpers and time rendering.

/// The command line as typed, without the leading `/` and surrounding
/// whitespace.
pub fn command_line(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('/').unwrap_or(trimmed).trim_start()
}

/// The command name: first word of the line, lowercased.
///
/// ```rust
/// use warden_cooldown::command_name;
///
/// assert_eq!(command_name("/Home bed"), "home");
/// assert_eq!(command_name("spawn"), "spawn");
/// ```
pub fn command_name(raw: &str) -> String {
    command_line(raw)
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Renders seconds as `mm:ss`. Minutes are not wrapped at an hour.
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
