use std::path::Path;

use serde::Deserialize;

/// The subset of `SKILL.md` / agent front-matter the graph uses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Frontmatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parses a leading `---` delimited block.
///
/// Front-matter in the wild often carries unquoted colons that are not
/// valid YAML; those fall back to reading `name:` and `description:` lines
/// verbatim. Returns `None` when there is no block at all.
pub fn parse_frontmatter(content: &str) -> Option<Frontmatter> {
    let after_first = content.strip_prefix("---")?;
    let end_pos = after_first.find("\n---")?;
    let block = after_first[..end_pos].trim();

    match serde_yaml_bw::from_str::<Frontmatter>(block) {
        Ok(fm) => Some(fm),
        Err(e) => {
            tracing::debug!(error = %e, "Front-matter is not valid YAML, reading lines");
            Some(scan_lines(block))
        }
    }
}

fn scan_lines(block: &str) -> Frontmatter {
    let field = |key: &str| {
        block.lines().find_map(|line| {
            let value = line.strip_prefix(key)?.strip_prefix(':')?.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    };
    Frontmatter {
        name: field("name"),
        description: field("description"),
    }
}

pub fn read_frontmatter(path: &Path) -> Option<Frontmatter> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_frontmatter(&content)
}
