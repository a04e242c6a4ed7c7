//! Browser automation capability.
//!
//! The scraper only talks to this trait, so any driver that can navigate, look up elements,
//! and run a script against an element satisfies it.

#[cfg(test)]
pub mod fake;

use std::{
    borrow::Cow,
    fmt::{Display, Formatter},
};

use crate::prelude::*;

/// Element lookup strategy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Locator {
    Id(Cow<'static, str>),
    Css(Cow<'static, str>),
    XPath(Cow<'static, str>),
    TagName(Cow<'static, str>),
}

impl Locator {
    pub const fn id(id: &'static str) -> Self {
        Self::Id(Cow::Borrowed(id))
    }

    pub const fn css(selector: &'static str) -> Self {
        Self::Css(Cow::Borrowed(selector))
    }

    pub const fn xpath(expression: &'static str) -> Self {
        Self::XPath(Cow::Borrowed(expression))
    }

    pub const fn tag_name(name: &'static str) -> Self {
        Self::TagName(Cow::Borrowed(name))
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Css(selector) => write!(f, "{selector}"),
            Self::XPath(expression) => write!(f, "{expression}"),
            Self::TagName(name) => write!(f, "<{name}>"),
        }
    }
}

/// Driver-assigned element reference, valid within the page it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::Display, derive_more::From)]
pub struct ElementId(pub String);

/// A single live browser page.
///
/// Lookups return [`None`] for absent elements, errors are reserved for driver failures.
pub trait Page {
    fn navigate(&mut self, url: &str) -> Result;

    fn back(&mut self) -> Result;

    fn refresh(&mut self) -> Result;

    fn find(&mut self, locator: &Locator) -> Result<Option<ElementId>>;

    fn find_all_within(&mut self, parent: &ElementId, locator: &Locator) -> Result<Vec<ElementId>>;

    fn text(&mut self, element: &ElementId) -> Result<String>;

    fn attribute(&mut self, element: &ElementId, name: &str) -> Result<Option<String>>;

    fn is_displayed(&mut self, element: &ElementId) -> Result<bool>;

    fn send_keys(&mut self, element: &ElementId, text: &str) -> Result;

    /// Native click, subject to overlay interception.
    fn click(&mut self, element: &ElementId) -> Result;

    fn execute_script(
        &mut self,
        script: &str,
        arguments: &[&ElementId],
    ) -> Result<serde_json::Value>;

    /// End the browser session.
    fn quit(self) -> Result
    where
        Self: Sized;

    /// Click through JavaScript, bypassing whatever overlays the element.
    fn script_click(&mut self, element: &ElementId) -> Result {
        self.execute_script("arguments[0].click();", &[element])?;
        Ok(())
    }

    /// Trimmed text of the first matching element, if any.
    fn find_text(&mut self, locator: &Locator) -> Result<Option<String>> {
        match self.find(locator)? {
            Some(element) => Ok(Some(self.text(&element)?.trim().to_owned())),
            None => Ok(None),
        }
    }
}

/// Opens fresh, isolated pages, one per account.
pub trait Browser {
    type Page: Page;

    fn open(&self) -> Result<Self::Page>;
}
