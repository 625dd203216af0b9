//! Element locators.

use std::fmt;

/// How to find an element on the page.
///
/// Parsed from configuration strings: an `xpath:` prefix selects XPath,
/// anything else is a CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    /// Parse a configuration string.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix("xpath:") {
            Some(expr) => Locator::XPath(expr.trim().to_string()),
            None => Locator::Css(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={}", s),
            Locator::XPath(s) => write!(f, "xpath={}", s),
        }
    }
}
