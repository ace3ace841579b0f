//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a description of zero-or-more rendered elements, never a
//! handle to them. Every driver call resolves it again against the live page,
//! so a locator stays valid across navigations and re-renders.
//!
//! # Composition
//!
//! - `page.locator(".single-products").nth(2)`: positional pick
//! - `rows.nth(i).within(Selector::css(".cart_price p"))`: row-scoped query
//! - `Selector::role("link", "Signup / Login")`: accessible role + name

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// CSS selector filtered by contained text (`a:has-text("Logged in as")`)
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
    /// Leaf elements whose text contains the given string
    Text(String),
    /// ARIA role with an accessible name (case-insensitive substring)
    Role {
        /// Role name, e.g. "link" or "button"
        role: String,
        /// Accessible name to match
        name: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a CSS selector with a text filter
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// CSS that approximates the elements carrying an ARIA role
    #[must_use]
    pub fn role_css(role: &str) -> String {
        match role {
            "link" => "a[href], [role=\"link\"]".to_string(),
            "button" => {
                "button, [role=\"button\"], input[type=\"button\"], input[type=\"submit\"]"
                    .to_string()
            }
            "textbox" => "input:not([type]), input[type=\"text\"], input[type=\"email\"], textarea, [role=\"textbox\"]".to_string(),
            "checkbox" => "input[type=\"checkbox\"], [role=\"checkbox\"]".to_string(),
            "radio" => "input[type=\"radio\"], [role=\"radio\"]".to_string(),
            "heading" => "h1, h2, h3, h4, h5, h6, [role=\"heading\"]".to_string(),
            other => format!("[role={other:?}]"),
        }
    }

    /// JavaScript expression yielding an Array of matches below `root`
    #[must_use]
    pub fn to_query_in(&self, root: &str) -> String {
        match self {
            Self::Css(s) => format!("Array.from({root}.querySelectorAll({s:?}))"),
            Self::CssWithText { css, text } => format!(
                "Array.from({root}.querySelectorAll({css:?})).filter(el => (el.textContent || '').includes({text:?}))"
            ),
            Self::Text(t) => format!(
                "Array.from({root}.querySelectorAll('*')).filter(el => el.children.length === 0 && (el.textContent || '').includes({t:?}))"
            ),
            Self::Role { role, name } => {
                let css = Self::role_css(role);
                let needle = name.trim().to_lowercase();
                format!(
                    "Array.from({root}.querySelectorAll({css:?})).filter(el => (el.getAttribute('aria-label') || el.textContent || el.value || '').trim().toLowerCase().includes({needle:?}))"
                )
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::CssWithText { css, text } => write!(f, "{css}:has-text({text:?})"),
            Self::Text(t) => write!(f, "text={t:?}"),
            Self::Role { role, name } => write!(f, "role={role}[name={name:?}]"),
        }
    }
}

/// Positional pick applied after matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Zero-based index into the ordered matches
    Nth(usize),
    /// The first match
    First,
    /// The last match
    Last,
}

/// A locator for finding elements.
///
/// Resolution order: scope first (if any), then the selector inside every
/// scope match (in document order), then the positional pick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
    scope: Option<Box<Locator>>,
    position: Option<Position>,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(css: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(css.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            scope: None,
            position: None,
        }
    }

    /// Pick the match at `index` (zero-based)
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.with_position(Position::Nth(index))
    }

    /// Pick the first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.with_position(Position::First)
    }

    /// Pick the last match
    #[must_use]
    pub fn last(&self) -> Self {
        self.with_position(Position::Last)
    }

    fn with_position(&self, position: Position) -> Self {
        match self.position {
            // Re-picking an already positioned locator narrows it further
            Some(_) => Self {
                selector: Selector::Css(":scope".to_string()),
                scope: Some(Box::new(self.clone())),
                position: Some(position),
            },
            None => Self {
                position: Some(position),
                ..self.clone()
            },
        }
    }

    /// Query `selector` inside every element this locator matches
    #[must_use]
    pub fn within(&self, selector: Selector) -> Self {
        Self {
            selector,
            scope: Some(Box::new(self.clone())),
            position: None,
        }
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the enclosing scope, if any
    #[must_use]
    pub fn scope(&self) -> Option<&Self> {
        self.scope.as_deref()
    }

    /// Get the positional pick, if any
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    /// JavaScript expression yielding the ordered Array of matched elements
    #[must_use]
    pub fn to_elements_js(&self) -> String {
        let matched = match &self.scope {
            None => self.selector.to_query_in("document"),
            Some(scope) => {
                let inner = match &self.selector {
                    // `:scope` means the scope element itself
                    Selector::Css(css) if css == ":scope" => "[root]".to_string(),
                    other => other.to_query_in("root"),
                };
                format!("{}.flatMap(root => {inner})", scope.to_elements_js())
            }
        };

        match self.position {
            None => matched,
            Some(Position::Nth(i)) => format!("{matched}.slice({i}, {})", i + 1),
            Some(Position::First) => format!("{matched}.slice(0, 1)"),
            Some(Position::Last) => format!("{matched}.slice(-1)"),
        }
    }

    /// JavaScript expression yielding the match count
    #[must_use]
    pub fn to_count_js(&self) -> String {
        format!("{}.length", self.to_elements_js())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "{scope} >> ")?;
        }
        write!(f, "{}", self.selector)?;
        match self.position {
            Some(Position::Nth(i)) => write!(f, " >> nth={i}"),
            Some(Position::First) => write!(f, " >> first"),
            Some(Position::Last) => write!(f, " >> last"),
            None => Ok(()),
        }
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::from_selector(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let q = Selector::css("#cart_info").to_query_in("document");
            assert_eq!(q, "Array.from(document.querySelectorAll(\"#cart_info\"))");
        }

        #[test]
        fn test_css_with_text_query() {
            let q = Selector::css_with_text("a", "Logged in as").to_query_in("document");
            assert!(q.contains("querySelectorAll(\"a\")"));
            assert!(q.contains("includes(\"Logged in as\")"));
        }

        #[test]
        fn test_role_query_lowercases_name() {
            let q = Selector::role("link", "Signup / Login").to_query_in("document");
            assert!(q.contains("a[href]"));
            assert!(q.contains("\"signup / login\""));
        }

        #[test]
        fn test_unknown_role_uses_attribute() {
            assert_eq!(Selector::role_css("dialog"), "[role=\"dialog\"]");
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css(".x").to_string(), ".x");
            assert_eq!(
                Selector::role("button", "Continue Shopping").to_string(),
                "role=button[name=\"Continue Shopping\"]"
            );
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_nth_slices() {
            let js = Locator::new(".cart_price p").nth(2).to_elements_js();
            assert!(js.ends_with(".slice(2, 3)"));
        }

        #[test]
        fn test_first_and_last() {
            assert!(Locator::new("h2").first().to_elements_js().ends_with(".slice(0, 1)"));
            assert!(Locator::new("h2").last().to_elements_js().ends_with(".slice(-1)"));
        }

        #[test]
        fn test_within_scopes_to_row() {
            let cell = Locator::new("tbody tr")
                .nth(1)
                .within(Selector::css(".cart_total_price"));
            let js = cell.to_elements_js();
            assert!(js.starts_with("Array.from(document.querySelectorAll(\"tbody tr\")).slice(1, 2)"));
            assert!(js.contains(".flatMap(root => Array.from(root.querySelectorAll(\".cart_total_price\")))"));
            assert_eq!(cell.scope().and_then(Locator::position), Some(Position::Nth(1)));
        }

        #[test]
        fn test_repositioning_narrows() {
            let picked = Locator::new("li").nth(3).first();
            assert_eq!(picked.position(), Some(Position::First));
            assert_eq!(picked.scope().and_then(Locator::position), Some(Position::Nth(3)));
            assert!(picked.to_elements_js().contains("flatMap(root => [root])"));
        }

        #[test]
        fn test_count_js() {
            assert!(Locator::new("tbody tr").to_count_js().ends_with(".length"));
        }

        #[test]
        fn test_display_chain() {
            let l = Locator::new("tbody tr").nth(0).within(Selector::css("h4 a"));
            assert_eq!(l.to_string(), "tbody tr >> nth=0 >> h4 a");
        }

        #[test]
        fn test_from_selector() {
            let l: Locator = Selector::text("Cart is empty!").into();
            assert_eq!(l.selector(), &Selector::text("Cart is empty!"));
            assert!(l.scope().is_none());
        }
    }
}
