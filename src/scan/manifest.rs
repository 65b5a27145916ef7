use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ScanError;

pub(super) const PLUGIN_CONFIG_DIR: &str = ".claude-plugin";
const PLUGIN_MANIFEST_FILE: &str = "plugin.json";

/// `.claude-plugin/plugin.json`.
///
/// Only `name` is required. List fields that are not arrays, and
/// `mcpServers` values that are not objects, are ignored rather than
/// rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub agents: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub commands: Vec<String>,
    #[serde(default, deserialize_with = "server_map")]
    pub mcp_servers: BTreeMap<String, McpServerEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpServerEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl McpServerEntry {
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
        Self {
            transport: field("type"),
            command: field("command"),
        }
    }

    pub fn transport_or_default(&self) -> &str {
        self.transport.as_deref().unwrap_or("stdio")
    }
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn server_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, McpServerEntry>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .iter()
            .map(|(name, config)| (name.clone(), McpServerEntry::from_value(config)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

impl PluginManifest {
    pub fn path(root_dir: &Path) -> PathBuf {
        root_dir.join(PLUGIN_CONFIG_DIR).join(PLUGIN_MANIFEST_FILE)
    }

    pub fn load(root_dir: &Path) -> Result<Self, ScanError> {
        let manifest_path = Self::path(root_dir);
        if !manifest_path.exists() {
            return Err(ScanError::ManifestNotFound {
                path: manifest_path,
            });
        }
        let content =
            std::fs::read_to_string(&manifest_path).map_err(|source| ScanError::Read {
                path: manifest_path.clone(),
                source,
            })?;
        serde_json::from_str(&content).map_err(|e| ScanError::InvalidManifest {
            path: manifest_path,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_manifest(dir: &Path, content: &str) {
        let config_dir = dir.join(PLUGIN_CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(PLUGIN_MANIFEST_FILE), content).unwrap();
    }

    #[test]
    fn test_manifest_load() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{
                "name": "interflux",
                "description": "Multi-agent review",
                "version": "0.4.1",
                "skills": ["../skills/flux-drive"],
                "agents": ["./agents/fd-architecture.md"],
                "commands": ["./commands/flux.md", "./commands/drive.md"],
                "mcpServers": {
                    "exa": {"type": "stdio", "command": "npx"},
                    "remote": {"type": "http", "url": "https://example.com"}
                }
            }"#,
        );

        let manifest = PluginManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.name, "interflux");
        assert_eq!(manifest.version.as_deref(), Some("0.4.1"));
        assert_eq!(manifest.skills, ["../skills/flux-drive"]);
        assert_eq!(manifest.commands.len(), 2);
        assert_eq!(
            manifest.mcp_servers["exa"],
            McpServerEntry {
                transport: Some("stdio".into()),
                command: Some("npx".into()),
            }
        );
        assert_eq!(manifest.mcp_servers["remote"].command, None);
    }

    #[test]
    fn test_manifest_minimal() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), r#"{"name":"bare"}"#);

        let manifest = PluginManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.description, "");
        assert!(manifest.version.is_none());
        assert!(manifest.skills.is_empty());
        assert!(manifest.mcp_servers.is_empty());
    }

    #[test]
    fn test_non_list_fields_are_ignored() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{"name":"loose","skills":"./skills","agents":[1, "./a.md"],"mcpServers":"./.mcp.json"}"#,
        );

        let manifest = PluginManifest::load(dir.path()).unwrap();
        assert!(manifest.skills.is_empty());
        assert_eq!(manifest.agents, ["./a.md"]);
        assert!(manifest.mcp_servers.is_empty());
    }

    #[test]
    fn test_manifest_not_found() {
        let dir = tempdir().unwrap();
        let err = PluginManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_manifest_invalid_json() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), "not json");
        let err = PluginManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::InvalidManifest { .. }));
    }

    #[test]
    fn test_manifest_missing_name() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), r#"{"description":"nameless"}"#);
        let err = PluginManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::InvalidManifest { .. }));
    }

    #[test]
    fn test_default_transport() {
        assert_eq!(McpServerEntry::default().transport_or_default(), "stdio");
    }
}
