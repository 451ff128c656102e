//! Session naming rules

use std::path::Path;

/// Name used when a directory has no usable base name
const FALLBACK_ROOT_NAME: &str = "root";

/// Make a string safe to use as a tmux session name
///
/// Whitespace-only input yields an empty name. Leading dots are dropped and
/// `.`, `:`, `/` and spaces become `_`.
pub fn sanitize_session_name(name: &str) -> String {
    if name.trim().is_empty() {
        return String::new();
    }
    name.trim_start_matches('.')
        .chars()
        .map(|c| match c {
            '.' | ':' | '/' | ' ' => '_',
            c => c,
        })
        .collect()
}

/// Derive a root session name from a directory's base name
pub fn root_name_from_dir(dir: &Path) -> String {
    let base = dir
        .file_name()
        .map(|name| name.to_string_lossy())
        .filter(|name| !name.is_empty() && *name != ".")
        .unwrap_or(FALLBACK_ROOT_NAME.into());
    sanitize_session_name(&base)
}

/// Full session name of a child
pub fn child_session_name(root: &str, separator: &str, child: &str) -> String {
    format!("{root}{separator}{child}")
}

/// Display label of a child: its name with the `root + separator` prefix
/// removed, or the full session name if nothing is left
pub fn child_label<'a>(root: &str, separator: &str, session: &'a str) -> &'a str {
    let label = session
        .strip_prefix(root)
        .and_then(|rest| rest.strip_prefix(separator))
        .unwrap_or(session)
        .trim();
    if label.is_empty() {
        session
    } else {
        label
    }
}

/// Wrap a command so tmux runs it through a login shell
pub fn shell_command(command: Option<&str>) -> Vec<String> {
    match command.map(str::trim) {
        Some(command) if !command.is_empty() => {
            vec!["sh".to_string(), "-lc".to_string(), command.to_string()]
        }
        _ => Vec::new(),
    }
}
