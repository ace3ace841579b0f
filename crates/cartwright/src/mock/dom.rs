//! Rendered node tree and locator resolution for the mock storefront.
//!
//! A page is built as a [`Node`] tree, then flattened into a pre-order
//! [`Dom`] arena so a subtree is the contiguous range `i + 1..end`.
//! CSS matching is by key equality: a node lists the exact selector strings
//! it answers to.

use super::store::Action;
use crate::locator::{Locator, Position, Selector};

/// Form control behaviour of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Control {
    /// Text input or textarea bound to a field
    Text { field: String },
    /// `<select>` bound to a field, options as `(value, label)`
    Select {
        field: String,
        options: Vec<(String, String)>,
    },
    /// Checkbox bound to a field
    Checkbox { field: String },
    /// Radio setting `group` to `value`
    Radio { group: String, value: String },
}

/// One element of a rendered page
#[derive(Debug, Clone)]
pub(crate) struct Node {
    keys: Vec<String>,
    role: Option<&'static str>,
    text: String,
    visible: bool,
    enabled: bool,
    control: Option<Control>,
    on_click: Option<Action>,
    children: Vec<Node>,
}

impl Node {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            keys: vec![key.to_string()],
            role: None,
            text: String::new(),
            visible: true,
            enabled: true,
            control: None,
            on_click: None,
            children: Vec::new(),
        }
    }

    /// Link with an accessible name
    pub(crate) fn link(text: &str, action: Action) -> Self {
        Self::new("a").role("link").text(text).on_click(action)
    }

    /// Button with an accessible name
    pub(crate) fn button(key: &str, text: &str, action: Action) -> Self {
        Self::new(key).role("button").text(text).on_click(action)
    }

    pub(crate) fn key(mut self, key: &str) -> Self {
        self.keys.push(key.to_string());
        self
    }

    pub(crate) const fn role(mut self, role: &'static str) -> Self {
        self.role = Some(role);
        self
    }

    pub(crate) fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub(crate) const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub(crate) const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub(crate) fn input(mut self, field: &str) -> Self {
        self.control = Some(Control::Text {
            field: field.to_string(),
        });
        self
    }

    pub(crate) fn select(mut self, field: &str, options: Vec<(String, String)>) -> Self {
        self.control = Some(Control::Select {
            field: field.to_string(),
            options,
        });
        self
    }

    pub(crate) fn checkbox(mut self, field: &str) -> Self {
        self.control = Some(Control::Checkbox {
            field: field.to_string(),
        });
        self
    }

    pub(crate) fn radio(mut self, group: &str, value: &str) -> Self {
        self.control = Some(Control::Radio {
            group: group.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub(crate) fn on_click(mut self, action: Action) -> Self {
        self.on_click = Some(action);
        self
    }

    pub(crate) fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A flattened node
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) keys: Vec<String>,
    pub(crate) role: Option<&'static str>,
    pub(crate) text: String,
    /// Visible itself and through every ancestor
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) control: Option<Control>,
    pub(crate) on_click: Option<Action>,
    /// Exclusive end of this element's subtree
    end: usize,
    leaf: bool,
    children: Vec<usize>,
}

/// Pre-order arena of a rendered page
#[derive(Debug, Clone, Default)]
pub(crate) struct Dom {
    elements: Vec<Element>,
}

impl Dom {
    pub(crate) fn from_roots(roots: Vec<Node>) -> Self {
        let mut dom = Self::default();
        for root in roots {
            dom.push(root, true);
        }
        dom
    }

    fn push(&mut self, node: Node, parent_visible: bool) -> usize {
        let index = self.elements.len();
        let visible = parent_visible && node.visible;
        self.elements.push(Element {
            keys: node.keys,
            role: node.role,
            text: node.text,
            visible,
            enabled: node.enabled,
            control: node.control,
            on_click: node.on_click,
            end: index + 1,
            leaf: node.children.is_empty(),
            children: Vec::new(),
        });
        let mut children = Vec::with_capacity(node.children.len());
        for child in node.children {
            children.push(self.push(child, visible));
        }
        let end = self.elements.len();
        let element = &mut self.elements[index];
        element.end = end;
        element.children = children;
        index
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Own text followed by each child's text content, one per line
    pub(crate) fn text_content(&self, index: usize) -> String {
        let element = &self.elements[index];
        let mut parts = Vec::new();
        if !element.text.is_empty() {
            parts.push(element.text.clone());
        }
        for &child in &element.children {
            let text = self.text_content(child);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join("\n")
    }

    fn matches(&self, index: usize, selector: &Selector) -> bool {
        let element = &self.elements[index];
        match selector {
            Selector::Css(css) => element.keys.iter().any(|k| k == css),
            Selector::CssWithText { css, text } => {
                element.keys.iter().any(|k| k == css) && self.text_content(index).contains(text)
            }
            Selector::Text(text) => element.leaf && element.text.contains(text.as_str()),
            Selector::Role { role, name } => {
                element.role == Some(role.as_str())
                    && self
                        .text_content(index)
                        .trim()
                        .to_lowercase()
                        .contains(&name.trim().to_lowercase())
            }
        }
    }

    /// Indices of every element `locator` resolves to, in document order
    pub(crate) fn resolve(&self, locator: &Locator) -> Vec<usize> {
        let selector = locator.selector();
        let matched: Vec<usize> = match locator.scope() {
            None => (0..self.elements.len())
                .filter(|&i| self.matches(i, selector))
                .collect(),
            Some(scope) => {
                let mut out = Vec::new();
                for root in self.resolve(scope) {
                    if matches!(selector, Selector::Css(css) if css == ":scope") {
                        out.push(root);
                        continue;
                    }
                    let end = self.elements[root].end;
                    out.extend((root + 1..end).filter(|&i| self.matches(i, selector)));
                }
                out
            }
        };

        match locator.position() {
            None => matched,
            Some(Position::Nth(i)) => matched.get(i).copied().into_iter().collect(),
            Some(Position::First) => matched.first().copied().into_iter().collect(),
            Some(Position::Last) => matched.last().copied().into_iter().collect(),
        }
    }

    /// First element `locator` resolves to
    pub(crate) fn first(&self, locator: &Locator) -> Option<usize> {
        self.resolve(locator).first().copied()
    }
}
