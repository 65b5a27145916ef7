use std::path::Path;

use serde_json::Value;

/// Event names recognised in the legacy flat `hooks.json` layout.
const KNOWN_EVENTS: &[&str] = &[
    "PreToolUse",
    "PostToolUse",
    "PostToolUseFailure",
    "UserPromptSubmit",
    "Stop",
    "SubagentStart",
    "SubagentStop",
    "PreCompact",
    "SessionStart",
    "SessionEnd",
    "Notification",
    "PermissionRequest",
];

/// Event names a plugin's `hooks/hooks.json` subscribes to.
///
/// Supports the official nested layout `{"hooks": {"PreToolUse": [...]}}`
/// and the flat legacy layout `{"PreToolUse": [...]}`. For the flat layout
/// only known event names are taken. A missing or unreadable file yields no
/// events; an unreadable one is logged.
pub fn hook_events(path: &Path) -> Vec<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable hooks config");
            return Vec::new();
        }
    };
    let value: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unparseable hooks config");
            return Vec::new();
        }
    };

    if let Some(hooks) = value.get("hooks").and_then(Value::as_object) {
        return hooks.keys().cloned().collect();
    }
    value
        .as_object()
        .map(|flat| {
            flat.keys()
                .filter(|k| KNOWN_EVENTS.contains(&k.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
