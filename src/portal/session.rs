use std::{borrow::Cow, thread::sleep};

use itertools::Itertools;

use crate::{
    credentials::Credential,
    error::Error,
    page::{Locator, Page},
    portal::{
        CUSTOMER_OPTION,
        CUSTOMER_SELECT,
        CustomerNumber,
        LOGIN_BUTTON,
        LOGIN_ID,
        LOGIN_PASSWORD,
        REALTIME_USAGE,
        Settings,
        summary::SummaryView,
    },
    prelude::*,
};

/// Authenticated portal session over a single page.
///
/// Logging in consumes a fresh page, closing the session quits it.
pub struct Session<'s, P> {
    page: P,
    settings: &'s Settings,
}

impl<'s, P: Page> Session<'s, P> {
    /// Log in and wait for the summary view.
    ///
    /// On failure, the page is handed back so that the caller could still quit it.
    #[instrument(skip_all, fields(user_id = credential.id))]
    pub fn login(
        mut page: P,
        credential: &Credential<'_>,
        settings: &'s Settings,
    ) -> Result<Self, (P, anyhow::Error)> {
        match Self::submit_login(&mut page, credential, settings) {
            Ok(()) => {
                info!("logged in");
                Ok(Self { page, settings })
            }
            Err(error) => Err((page, error)),
        }
    }

    fn submit_login(page: &mut P, credential: &Credential<'_>, settings: &Settings) -> Result {
        info!("logging in…");
        page.navigate(settings.base_url.as_str())?;
        let id_input = settings.wait.for_element(page, &LOGIN_ID)?;
        page.send_keys(&id_input, credential.id)?;
        let password_input =
            page.find(&LOGIN_PASSWORD)?.context("the password input is missing")?;
        page.send_keys(&password_input, credential.password)?;
        let button = settings.wait.for_element(page, &LOGIN_BUTTON)?;
        page.script_click(&button)?;
        settings.wait.for_element(page, &CUSTOMER_SELECT).map_err(|error| {
            match error.downcast_ref::<Error>() {
                Some(Error::ElementLookupTimeout { timeout, .. }) => {
                    Error::AuthenticationTimeout { timeout: *timeout }.into()
                }
                _ => error,
            }
        })?;
        Ok(())
    }

    pub const fn page(&mut self) -> &mut P {
        &mut self.page
    }

    pub const fn summary(&mut self) -> SummaryView<'_, P> {
        SummaryView::new(&mut self.page, self.settings)
    }

    /// Unique customer numbers in selector order, the first one is selected after login.
    #[instrument(skip_all)]
    pub fn customer_numbers(&mut self) -> Result<Vec<CustomerNumber>> {
        let select = self.settings.wait.for_element(&mut self.page, &CUSTOMER_SELECT)?;
        let mut numbers = Vec::new();
        for option in self.page.find_all_within(&select, &CUSTOMER_OPTION)? {
            match self.page.attribute(&option, "value")? {
                Some(value) if !value.trim().is_empty() => {
                    numbers.push(CustomerNumber(value.trim().to_owned()));
                }
                _ => debug!(%option, "skipping an option without value"),
            }
        }
        let numbers = numbers.into_iter().unique().collect_vec();
        info!(?numbers, "found customer numbers");
        Ok(numbers)
    }

    /// Select another customer through the custom dropdown widget.
    #[instrument(skip_all, fields(customer = %customer))]
    pub fn switch_to(&mut self, customer: &CustomerNumber) -> Result {
        info!("switching…");
        let wait = self.settings.wait;
        let page = &mut self.page;

        let select = wait.for_element(page, &CUSTOMER_SELECT)?;
        let instance = page
            .attribute(&select, "sb")?
            .context("the customer selector is not bound to a dropdown widget")?;

        let holder = wait.for_displayed(page, &dropdown_holder(&instance))?;
        page.click(&holder)?;
        wait.for_displayed(page, &dropdown_option(&instance, customer))?;

        // The dropdown overlay intercepts native clicks on its own links.
        let link = wait.for_element(page, &customer_link(customer))?;
        page.script_click(&link)?;

        wait.for_text(page, &REALTIME_USAGE)?;
        sleep(self.settings.switch_settle_delay);
        Ok(())
    }

    /// Quit the browser.
    #[instrument(skip_all)]
    pub fn close(self) -> Result {
        self.page.quit()
    }
}

pub fn dropdown_holder(instance: &str) -> Locator {
    Locator::Id(Cow::Owned(format!("sbHolder_{instance}")))
}

pub fn dropdown_option(instance: &str, customer: &CustomerNumber) -> Locator {
    Locator::XPath(Cow::Owned(format!("//ul[@id='sbOptions_{instance}']/li/a[@rel='{customer}']")))
}

pub fn customer_link(customer: &CustomerNumber) -> Locator {
    Locator::XPath(Cow::Owned(format!("//a[@rel='{customer}']")))
}
