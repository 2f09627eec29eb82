//! String templates with `{{name}}` placeholders.
//!
//! Templates are plain HTML files. The engine understands four tags:
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `{{name}}` | Replaced by the text value of `name` |
//! | `{{#each name}}…{{/each}}` | Body repeated once per item of the list `name` |
//! | `{{#if name}}…{{/if}}` | Body kept when `name` is truthy |
//! | anything else in braces | Left in the output untouched |
//!
//! A template is parsed once into a node tree and rendered by walking it, so
//! substituted values are never scanned for placeholders again: a value that
//! literally reads `{{title}}` is emitted as-is. Placeholders with no value in
//! the context are also emitted as-is. Nothing is HTML-escaped; content values
//! come from the site's own content tree.
//!
//! Inside an `#each` body, names resolve against the current item first and
//! then against the enclosing context.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unclosed {{{{#{tag} {name}}}}} block")]
    Unclosed { tag: String, name: String },
    #[error("Unexpected closing tag {{{{/{0}}}}}")]
    UnexpectedClose(String),
    #[error("Template has no <main> element to fill")]
    MissingMain,
}

/// A value bound to a template name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<Context>),
    Flag(bool),
}

impl Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Text(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Flag(b) => *b,
        }
    }
}

/// Name → value bindings for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    vars: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.vars.insert(name.into(), value);
        self
    }

    pub fn set_text(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.set(name, Value::Text(text.into()))
    }

    pub fn set_flag(&mut self, name: impl Into<String>, flag: bool) -> &mut Self {
        self.set(name, Value::Flag(flag))
    }

    pub fn set_list(&mut self, name: impl Into<String>, items: Vec<Context>) -> &mut Self {
        self.set(name, Value::List(items))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Var(String),
    Each { name: String, body: Vec<Node> },
    If { name: String, body: Vec<Node> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Each,
    If,
}

impl BlockKind {
    fn tag(self) -> &'static str {
        match self {
            BlockKind::Each => "each",
            BlockKind::If => "if",
        }
    }
}

/// An open block while parsing.
struct Frame {
    kind: BlockKind,
    name: String,
    nodes: Vec<Node>,
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            let Some(len) = rest[open + 2..].find("}}") else {
                break;
            };
            let raw = &rest[open..open + 2 + len + 2];
            let inner = raw[2..raw.len() - 2].trim();
            push_text(target_of(&mut stack, &mut nodes), &rest[..open]);
            rest = &rest[open + raw.len()..];

            if let Some(name) = block_open(inner, "#each") {
                stack.push(Frame {
                    kind: BlockKind::Each,
                    name: name.to_string(),
                    nodes: Vec::new(),
                });
            } else if let Some(name) = block_open(inner, "#if") {
                stack.push(Frame {
                    kind: BlockKind::If,
                    name: name.to_string(),
                    nodes: Vec::new(),
                });
            } else if let Some(tag) = inner.strip_prefix('/') {
                let frame = match stack.pop() {
                    Some(frame) if frame.kind.tag() == tag.trim() => frame,
                    _ => return Err(TemplateError::UnexpectedClose(tag.trim().to_string())),
                };
                let node = match frame.kind {
                    BlockKind::Each => Node::Each {
                        name: frame.name,
                        body: frame.nodes,
                    },
                    BlockKind::If => Node::If {
                        name: frame.name,
                        body: frame.nodes,
                    },
                };
                target_of(&mut stack, &mut nodes).push(node);
            } else if is_identifier(inner) {
                target_of(&mut stack, &mut nodes).push(Node::Var(inner.to_string()));
            } else {
                push_text(target_of(&mut stack, &mut nodes), raw);
            }
        }

        if let Some(frame) = stack.pop() {
            return Err(TemplateError::Unclosed {
                tag: frame.kind.tag().to_string(),
                name: frame.name,
            });
        }
        push_text(&mut nodes, rest);
        Ok(Template { nodes })
    }

    pub fn render(&self, context: &Context) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, &[context], &mut out);
        out
    }
}

fn target_of<'a>(stack: &'a mut [Frame], nodes: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => &mut frame.nodes,
        None => nodes,
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn block_open<'a>(inner: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = inner.strip_prefix(keyword)?;
    let name = rest.strip_prefix(char::is_whitespace)?.trim();
    is_identifier(name).then_some(name)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

fn lookup<'a>(scopes: &[&'a Context], name: &str) -> Option<&'a Value> {
    scopes.iter().rev().copied().find_map(|ctx| ctx.get(name))
}

fn render_nodes(nodes: &[Node], scopes: &[&Context], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => match lookup(scopes, name) {
                Some(Value::Text(text)) => out.push_str(text),
                Some(Value::Flag(flag)) => out.push_str(if *flag { "true" } else { "false" }),
                Some(Value::List(_)) => {}
                None => {
                    out.push_str("{{");
                    out.push_str(name);
                    out.push_str("}}");
                }
            },
            Node::Each { name, body } => {
                if let Some(Value::List(items)) = lookup(scopes, name) {
                    for item in items {
                        let mut inner = scopes.to_vec();
                        inner.push(item);
                        render_nodes(body, &inner, out);
                    }
                }
            }
            Node::If { name, body } => {
                if lookup(scopes, name).is_some_and(Value::is_truthy) {
                    render_nodes(body, scopes, out);
                }
            }
        }
    }
}

/// Replace everything between `<main …>` and the last `</main>` with `content`.
///
/// The `<main>` tag itself, attributes included, is kept.
pub fn splice_main(html: &str, content: &str) -> Result<String, TemplateError> {
    let start = html
        .match_indices("<main")
        .map(|(i, _)| i)
        .find(|&i| {
            html[i + 5..]
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c.is_whitespace())
        })
        .ok_or(TemplateError::MissingMain)?;
    let open_end = html[start..]
        .find('>')
        .map(|i| start + i + 1)
        .ok_or(TemplateError::MissingMain)?;
    let close = html
        .rfind("</main>")
        .filter(|&i| i >= open_end)
        .ok_or(TemplateError::MissingMain)?;

    let mut out = String::with_capacity(html.len() + content.len());
    out.push_str(&html[..open_end]);
    out.push_str(content);
    out.push_str(&html[close..]);
    Ok(out)
}
