//! Placeholder templates.
//!
//! A page template is plain HTML with these placeholders:
//!
//! - `{{#id}}` or `{{#id|default html}}`: an element's content
//! - `{{region #id}} ... {{end}}`: an element whose default content is the
//!   enclosed markup, which may hold further placeholders; replacing the
//!   region replaces everything inside it
//! - `{{hidden #id}}`: renders ` hidden` while the element is hidden, meant
//!   to sit inside the element's opening tag
//!
//! `{{ ... }}` sequences that are not placeholders are kept verbatim.

use std::collections::HashMap;

use thiserror::Error;

use super::Document;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),

    #[error("Region {0} is never closed")]
    UnclosedRegion(String),

    #[error("Unexpected {{{{end}}}} at byte {0}")]
    UnexpectedEnd(usize),
}

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Slot(String),
    Hidden(String),
    Region(String, Vec<Node>),
}

#[derive(Debug, Clone)]
struct SlotState {
    default: String,
    content: Option<String>,
    visible: bool,
}

enum Placeholder<'a> {
    Slot(&'a str, &'a str),
    Hidden(&'a str),
    RegionStart(&'a str),
    RegionEnd,
}

impl<'a> Placeholder<'a> {
    fn parse(inner: &'a str) -> Option<Self> {
        let inner = inner.trim();
        if inner == "end" {
            return Some(Placeholder::RegionEnd);
        }
        if let Some(sel) = inner.strip_prefix("region ") {
            return is_selector(sel.trim()).then(|| Placeholder::RegionStart(sel.trim()));
        }
        if let Some(sel) = inner.strip_prefix("hidden ") {
            return is_selector(sel.trim()).then(|| Placeholder::Hidden(sel.trim()));
        }
        let (sel, default) = inner.split_once('|').unwrap_or((inner, ""));
        is_selector(sel.trim()).then(|| Placeholder::Slot(sel.trim(), default))
    }
}

fn is_selector(s: &str) -> bool {
    (s.starts_with('#') || s.starts_with('.'))
        && s.len() > 1
        && !s.chars().any(char::is_whitespace)
}

/// A page template whose placeholders can be filled through `Document`.
#[derive(Debug, Clone)]
pub struct SlotDocument {
    nodes: Vec<Node>,
    slots: HashMap<String, SlotState>,
}

impl SlotDocument {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut slots: HashMap<String, SlotState> = HashMap::new();
        let mut open: Vec<(String, Vec<Node>)> = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        let mut rest = template;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                current.push(Node::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or(TemplateError::Unterminated(offset + start))?;
            let consumed = start + 2 + end + 2;

            match Placeholder::parse(&after[..end]) {
                Some(Placeholder::Slot(sel, default)) => {
                    register(&mut slots, sel, default);
                    current.push(Node::Slot(sel.to_string()));
                }
                Some(Placeholder::Hidden(sel)) => {
                    register(&mut slots, sel, "");
                    current.push(Node::Hidden(sel.to_string()));
                }
                Some(Placeholder::RegionStart(sel)) => {
                    register(&mut slots, sel, "");
                    open.push((sel.to_string(), std::mem::take(&mut current)));
                }
                Some(Placeholder::RegionEnd) => {
                    let (sel, parent) = open
                        .pop()
                        .ok_or(TemplateError::UnexpectedEnd(offset + start))?;
                    let children = std::mem::replace(&mut current, parent);
                    current.push(Node::Region(sel, children));
                }
                None => current.push(Node::Text(rest[start..consumed].to_string())),
            }

            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            current.push(Node::Text(rest.to_string()));
        }
        if let Some((sel, _)) = open.pop() {
            return Err(TemplateError::UnclosedRegion(sel));
        }

        Ok(Self {
            nodes: current,
            slots,
        })
    }

    /// Current content of an element: what was set, else the template default
    pub fn content(&self, selector: &str) -> Option<&str> {
        self.slots
            .get(selector)
            .map(|s| s.content.as_deref().unwrap_or(&s.default))
    }

    pub fn is_visible(&self, selector: &str) -> bool {
        self.slots.get(selector).map(|s| s.visible).unwrap_or(false)
    }

    /// Selectors present in the template, sorted
    pub fn selectors(&self) -> Vec<&str> {
        let mut selectors: Vec<&str> = self.slots.keys().map(String::as_str).collect();
        selectors.sort_unstable();
        selectors
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_nodes(&self.nodes, &mut out);
        out
    }

    fn render_nodes(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Slot(sel) => out.push_str(self.content(sel).unwrap_or_default()),
                Node::Hidden(sel) => {
                    if !self.is_visible(sel) {
                        out.push_str(" hidden");
                    }
                }
                Node::Region(sel, children) => {
                    match self.slots.get(sel).and_then(|s| s.content.as_deref()) {
                        Some(content) => out.push_str(content),
                        None => self.render_nodes(children, out),
                    }
                }
            }
        }
    }
}

fn register(slots: &mut HashMap<String, SlotState>, selector: &str, default: &str) {
    let state = slots.entry(selector.to_string()).or_insert_with(|| SlotState {
        default: String::new(),
        content: None,
        visible: true,
    });
    if state.default.is_empty() {
        state.default = default.to_string();
    }
}

impl Document for SlotDocument {
    fn contains(&self, selector: &str) -> bool {
        self.slots.contains_key(selector)
    }

    fn set_html(&mut self, selector: &str, html: &str) -> bool {
        match self.slots.get_mut(selector) {
            Some(state) => {
                state.content = Some(html.to_string());
                true
            }
            None => false,
        }
    }

    fn set_visible(&mut self, selector: &str, visible: bool) -> bool {
        match self.slots.get_mut(selector) {
            Some(state) => {
                state.visible = visible;
                true
            }
            None => false,
        }
    }

    fn reset(&mut self, selector: &str) -> bool {
        match self.slots.get_mut(selector) {
            Some(state) => {
                state.content = None;
                true
            }
            None => false,
        }
    }
}
