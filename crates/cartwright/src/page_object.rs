//! Page object support.
//!
//! Every page model implements [`PageObject`]: it names its canonical route
//! and can tell whether a URL belongs to it.

use std::collections::HashMap;

/// A page or component of the storefront.
///
/// Page models assume the browser is already on their route; callers
/// navigate first (usually with the page's `open`).
pub trait PageObject {
    /// Canonical entry route, relative to the base URL (e.g. `/view_cart`)
    fn route(&self) -> &str;

    /// URL pattern that matches this page (defaults to the route)
    fn url_pattern(&self) -> &str {
        self.route()
    }

    /// Page name for logging
    fn page_name(&self) -> &str;

    /// Whether `url` is this page
    fn is_current(&self, url: &str) -> bool {
        UrlMatcher::new(self.url_pattern()).matches(url)
    }
}

/// URL pattern matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

/// Path component of an absolute or relative URL, without query or fragment
#[must_use]
pub fn url_path(url: &str) -> &str {
    let without_scheme = url.find("://").map_or(url, |i| &url[i + 3..]);
    let path = if url.contains("://") {
        without_scheme
            .find('/')
            .map_or("/", |i| &without_scheme[i..])
    } else {
        without_scheme
    };
    let end = path.find(|c| c == '?' || c == '#').unwrap_or(path.len());
    &path[..end]
}

fn path_segments(url: &str) -> Vec<&str> {
    url_path(url).split('/').filter(|s| !s.is_empty()).collect()
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/login`
    /// - Wildcards: `/category_products/*`
    /// - Named parameters: `/product_details/:id`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a URL (absolute or path-only) matches the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let url_segments = path_segments(url);
        url_segments.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(&url_segments)
                .all(|(segment, actual)| match segment {
                    UrlSegment::Literal(lit) => lit == actual,
                    UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
                })
    }

    /// Extract named parameters from a matching URL
    #[must_use]
    pub fn extract_params(&self, url: &str) -> HashMap<String, String> {
        if !self.matches(url) {
            return HashMap::new();
        }
        self.segments
            .iter()
            .zip(path_segments(url))
            .filter_map(|(segment, value)| match segment {
                UrlSegment::Parameter(name) => Some((name.clone(), value.to_string())),
                _ => None,
            })
            .collect()
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod url_path_tests {
        use super::*;

        #[test]
        fn test_absolute_urls() {
            assert_eq!(url_path("https://shop.test/view_cart"), "/view_cart");
            assert_eq!(url_path("https://shop.test"), "/");
            assert_eq!(url_path("https://shop.test/products?search=top#x"), "/products");
        }

        #[test]
        fn test_relative_urls() {
            assert_eq!(url_path("/login"), "/login");
            assert_eq!(url_path("/login?next=/"), "/login");
        }
    }

    mod matcher_tests {
        use super::*;

        #[test]
        fn test_literal_match() {
            let matcher = UrlMatcher::new("/view_cart");
            assert!(matcher.matches("https://automationexercise.com/view_cart"));
            assert!(!matcher.matches("https://automationexercise.com/checkout"));
        }

        #[test]
        fn test_root_pattern() {
            let matcher = UrlMatcher::new("/");
            assert!(matcher.matches("https://automationexercise.com/"));
            assert!(matcher.matches("https://automationexercise.com"));
            assert!(!matcher.matches("https://automationexercise.com/login"));
        }

        #[test]
        fn test_parameter_match_and_extract() {
            let matcher = UrlMatcher::new("/product_details/:id");
            let url = "https://automationexercise.com/product_details/3";
            assert!(matcher.matches(url));
            assert_eq!(matcher.extract_params(url).get("id").map(String::as_str), Some("3"));
            assert!(matcher.extract_params("/products").is_empty());
        }

        #[test]
        fn test_wildcard_match() {
            let matcher = UrlMatcher::new("/category_products/*");
            assert!(matcher.matches("/category_products/1"));
            assert!(!matcher.matches("/category_products"));
            assert_eq!(matcher.pattern(), "/category_products/*");
        }
    }

    mod page_object_tests {
        use super::*;

        struct Cart;

        impl PageObject for Cart {
            fn route(&self) -> &str {
                "/view_cart"
            }

            fn page_name(&self) -> &str {
                "Cart"
            }
        }

        #[test]
        fn test_is_current_uses_route() {
            assert!(Cart.is_current("https://shop.test/view_cart"));
            assert!(!Cart.is_current("https://shop.test/"));
            assert_eq!(Cart.url_pattern(), "/view_cart");
        }
    }
}
