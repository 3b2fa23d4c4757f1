//! Indented text rendering
//!
//! Prints one line per node with box-drawing prefixes showing ancestry.
//! Labels come from a `{Field}` template over the node's provider
//! attributes, e.g. `{Name} ({Id})` or `{Name} <{Email}>`.

use crate::error::ConfigError;
use crate::org::types::OrgNode;
use crate::tree::OrgTree;

/// Default label template
pub const DEFAULT_NODE_FORMAT: &str = "{Name} ({Id})";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed node label template.
///
/// `{Field}` substitutes the node attribute of that name; a field the node
/// does not carry renders as the field name itself, so a template works
/// across roots, units, and accounts. `{{` and `}}` escape literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFormat {
    template: String,
    segments: Vec<Segment>,
}

impl NodeFormat {
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut field = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => field.push(ch),
                            None => {
                                return Err(ConfigError::InvalidNodeFormat {
                                    template: template.to_string(),
                                    reason: "unclosed '{'".into(),
                                })
                            }
                        }
                    }
                    if field.is_empty() {
                        return Err(ConfigError::InvalidNodeFormat {
                            template: template.to_string(),
                            reason: "empty field name".into(),
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => {
                    return Err(ConfigError::InvalidNodeFormat {
                        template: template.to_string(),
                        reason: "unmatched '}'".into(),
                    })
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// The template this format was parsed from
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render a node's label
    pub fn render(&self, node: &OrgNode) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => match node.attribute(name) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(name),
                },
            }
        }
        out
    }
}

impl Default for NodeFormat {
    fn default() -> Self {
        Self::parse(DEFAULT_NODE_FORMAT).expect("default template is valid")
    }
}

/// Render the whole tree as indented text, one line per node.
pub fn render_text_tree(tree: &OrgTree, format: &NodeFormat) -> String {
    let mut out = String::new();
    for root in tree.roots() {
        out.push_str(&format.render(root));
        out.push('\n');
        let children: Vec<&OrgNode> = tree.children_of(root.id()).collect();
        render_children(tree, &children, "", format, &mut out);
    }
    out
}

fn render_children(
    tree: &OrgTree,
    children: &[&OrgNode],
    indent: &str,
    format: &NodeFormat,
    out: &mut String,
) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();

        out.push_str(indent);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&format.render(child));
        out.push('\n');

        let next_indent = format!("{}{}", indent, if last { "    " } else { "│   " });
        let grandchildren: Vec<&OrgNode> = tree.children_of(child.id()).collect();
        render_children(tree, &grandchildren, &next_indent, format, out);
    }
}
