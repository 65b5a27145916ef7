//! Node id conventions for discovered resources.
//!
//! Resources are namespaced by their owning plugin so that two plugins can
//! ship a skill or agent with the same name.

pub const NAMESPACE_SEP: char = ':';

pub fn namespaced(plugin: &str, resource: &str) -> String {
    format!("{}{}{}", plugin, NAMESPACE_SEP, resource)
}

pub fn skill_id(plugin: &str, skill: &str) -> String {
    namespaced(plugin, skill)
}

pub fn agent_id(plugin: &str, agent: &str) -> String {
    namespaced(plugin, &namespaced("agent", agent))
}

pub fn mcp_id(plugin: &str, server: &str) -> String {
    namespaced("mcp", &namespaced(plugin, server))
}

/// Hook events are shared across plugins.
pub fn hook_id(event: &str) -> String {
    namespaced("hook", event)
}
