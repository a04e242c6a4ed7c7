use std::{
    fmt::Display,
    thread::sleep,
    time::{Duration, Instant},
};

use crate::{
    error::Error,
    page::{ElementId, Locator, Page},
    prelude::*,
};

/// Bounded poll against the live page.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Wait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Wait {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout, poll_interval: Duration::from_millis(250) }
    }

    /// Poll the condition until it yields a value or the deadline passes.
    ///
    /// The condition is evaluated at least once, and its errors are propagated immediately.
    pub fn until<P: Page, T>(
        &self,
        page: &mut P,
        what: impl Display,
        mut condition: impl FnMut(&mut P) -> Result<Option<T>>,
    ) -> Result<T> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(value) = condition(page)? {
                return Ok(value);
            }
            if Instant::now() >= deadline {
                trace!(%what, "timed out");
                return Err(Error::ElementLookupTimeout {
                    what: what.to_string(),
                    timeout: self.timeout,
                }
                .into());
            }
            sleep(self.poll_interval);
        }
    }

    pub fn for_element<P: Page>(&self, page: &mut P, locator: &Locator) -> Result<ElementId> {
        self.until(page, locator, |page| page.find(locator))
    }

    pub fn for_displayed<P: Page>(&self, page: &mut P, locator: &Locator) -> Result<ElementId> {
        self.until(page, locator, |page| {
            let Some(element) = page.find(locator)? else {
                return Ok(None);
            };
            Ok(page.is_displayed(&element)?.then_some(element))
        })
    }

    /// Wait until the element exists and has non-blank text.
    pub fn for_text<P: Page>(&self, page: &mut P, locator: &Locator) -> Result<String> {
        self.until(page, locator, |page| {
            Ok(page.find_text(locator)?.filter(|text| !text.is_empty()))
        })
    }
}
