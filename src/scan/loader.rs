use std::path::{Component, Path, PathBuf};

use super::companion::CompanionMatcher;
use super::frontmatter::read_frontmatter;
use super::hooks::hook_events;
use super::ids;
use super::manifest::{PLUGIN_CONFIG_DIR, PluginManifest};
use super::ScanError;
use crate::assembler::ComponentRecord;
use crate::config::EdgeSpec;
use crate::graph::{Edge, EdgeType, Node, NodeType};

const SKILL_FILE: &str = "SKILL.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Hub,
    Plugin,
}

impl ComponentKind {
    fn node_type(self) -> NodeType {
        match self {
            Self::Hub => NodeType::Hub,
            Self::Plugin => NodeType::Plugin,
        }
    }
}

/// Reads one plugin or hub directory into a [`ComponentRecord`].
pub(crate) struct ComponentLoader<'a> {
    pub root: &'a Path,
    pub companion: &'a CompanionMatcher,
    pub hub_edges: &'a [EdgeSpec],
    pub plugin_edges: &'a [EdgeSpec],
}

impl ComponentLoader<'_> {
    pub fn load(&self, dir: &Path, kind: ComponentKind) -> Result<ComponentRecord, ScanError> {
        let manifest = PluginManifest::load(dir)?;
        let name = manifest.name.as_str();

        let mut node = Node::new(name, kind.node_type(), name)
            .description(manifest.description.clone())
            .meta_opt("version", manifest.version.clone())
            .meta("path", self.relative(dir));
        if !manifest.commands.is_empty() {
            node = node.meta("commandCount", manifest.commands.len());
        }
        let mut record = ComponentRecord::new(node);

        for skill_ref in &manifest.skills {
            let skill_dir = resolve_skill_dir(dir, skill_ref);
            record = record.provides(self.skill_node(name, &skill_dir), EdgeType::ProvidesSkill);
        }

        if kind == ComponentKind::Hub {
            for skill_dir in subdirectories(&dir.join("skills")) {
                let skill = self.skill_node(name, &skill_dir);
                if record.children.iter().all(|c| c.id != skill.id) {
                    record = record.provides(skill, EdgeType::ProvidesSkill);
                }
            }
        }

        for agent_ref in &manifest.agents {
            record = record.provides(agent_node(name, dir, agent_ref), EdgeType::ProvidesAgent);
        }

        for (server, entry) in &manifest.mcp_servers {
            let server_node = Node::new(ids::mcp_id(name, server), NodeType::McpServer, server)
                .description(format!("MCP server: {}", entry.transport_or_default()))
                .meta("plugin", name)
                .meta_opt("type", entry.transport.clone())
                .meta_opt("command", entry.command.clone());
            record = record.provides(server_node, EdgeType::ProvidesMcp);
        }

        for event in hook_events(&dir.join("hooks").join("hooks.json")) {
            let hook = Node::new(ids::hook_id(&event), NodeType::HookEvent, event.as_str())
                .description(format!("Hook event: {event}"));
            record = record.provides(hook, EdgeType::FiresHook);
        }

        if let Some(target) = self.companion.target(&manifest.description) {
            record = record.deferred(Edge::new(name, target, EdgeType::CompanionOf));
        }

        let structural = match kind {
            ComponentKind::Hub => self.hub_edges,
            ComponentKind::Plugin => self.plugin_edges,
        };
        for spec in structural {
            record = record.edge(spec.from_source(name));
        }

        Ok(record)
    }

    fn skill_node(&self, plugin: &str, skill_dir: &Path) -> Node {
        let fm = read_frontmatter(&skill_dir.join(SKILL_FILE)).unwrap_or_default();
        let skill_name = fm.name.unwrap_or_else(|| file_name(skill_dir));
        Node::new(ids::skill_id(plugin, &skill_name), NodeType::Skill, skill_name)
            .description(fm.description.unwrap_or_default())
            .meta("plugin", plugin)
            .meta("path", self.relative(skill_dir))
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

fn agent_node(plugin: &str, dir: &Path, agent_ref: &str) -> Node {
    let agent_name = Path::new(agent_ref)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.strip_suffix(".md").unwrap_or(n).to_string())
        .unwrap_or_else(|| agent_ref.to_string());

    let description = [dir.join(agent_ref), dir.join(PLUGIN_CONFIG_DIR).join(agent_ref)]
        .iter()
        .find_map(|p| read_frontmatter(p))
        .and_then(|fm| fm.description)
        .unwrap_or_default();

    Node::new(ids::agent_id(plugin, &agent_name), NodeType::Agent, agent_name)
        .description(description)
        .meta("plugin", plugin)
        .meta("path", agent_ref)
}

/// Manifest skill paths are relative to `.claude-plugin/`. A path naming a
/// file resolves to its directory, and a path that does not exist there is
/// retried against the plugin root.
fn resolve_skill_dir(plugin_dir: &Path, skill_ref: &str) -> PathBuf {
    let resolved = normalize(&plugin_dir.join(PLUGIN_CONFIG_DIR).join(skill_ref));
    match std::fs::metadata(&resolved) {
        Ok(meta) if meta.is_dir() => resolved,
        Ok(_) => resolved
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(resolved),
        Err(_) => normalize(&plugin_dir.join(skill_ref)),
    }
}

/// Lexically resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Immediate subdirectories, sorted by name. Missing directory yields none.
pub(super) fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}
