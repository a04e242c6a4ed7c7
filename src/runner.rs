use crate::{
    credentials::{Account, Credential},
    page::{Browser, Page},
    portal::{CustomerNumber, Settings, detail, session::Session},
    prelude::*,
    publisher::{Published, Publisher, StateStore},
    tables::build_snapshot_table,
    validator::Validator,
};

#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub n_accounts_succeeded: usize,
    pub n_accounts_failed: usize,
    pub n_accounts_skipped: usize,
    pub n_customers_succeeded: usize,
    pub n_customers_failed: usize,
    pub published: Published,
}

impl RunSummary {
    fn record_customer(&mut self, customer: Option<&CustomerNumber>, result: Result<Published>) {
        match result {
            Ok(published) => {
                self.n_customers_succeeded += 1;
                self.published += published;
            }
            Err(error) => {
                error!(customer = customer.map(tracing::field::display), "skipping: {error:#}");
                self.n_customers_failed += 1;
            }
        }
    }
}

/// Single pass over all accounts and their customer numbers.
pub struct Runner<B, S> {
    pub browser: B,
    pub publisher: Publisher<S>,
    pub settings: Settings,
    pub validator: Validator,
}

impl<B: Browser, S: StateStore> Runner<B, S> {
    /// Process the accounts one by one.
    ///
    /// A failing account or customer is logged and counted, the rest are still processed.
    pub fn run(&self, accounts: &[Account]) -> RunSummary {
        let mut summary = RunSummary::default();
        for (index, account) in accounts.iter().enumerate() {
            let Some(credential) = account.credential() else {
                warn!(index, "skipping the account without an ID or password");
                summary.n_accounts_skipped += 1;
                continue;
            };
            match self.run_account(&credential, &mut summary) {
                Ok(()) => summary.n_accounts_succeeded += 1,
                Err(error) => {
                    error!(user_id = credential.id, "account failed: {error:#}");
                    summary.n_accounts_failed += 1;
                }
            }
        }
        summary
    }

    #[instrument(skip_all, fields(user_id = credential.id))]
    fn run_account(&self, credential: &Credential<'_>, summary: &mut RunSummary) -> Result {
        let page = self.browser.open()?;
        let mut session = match Session::login(page, credential, &self.settings) {
            Ok(session) => session,
            Err((page, error)) => {
                if let Err(quit_error) = page.quit() {
                    warn!("failed to quit the browser: {quit_error:#}");
                }
                return Err(error);
            }
        };
        let result = self.run_customers(&mut session, summary);
        if let Err(error) = session.close() {
            warn!("failed to close the session: {error:#}");
        }
        result
    }

    fn run_customers(
        &self,
        session: &mut Session<'_, B::Page>,
        summary: &mut RunSummary,
    ) -> Result {
        let mut customers = session.customer_numbers()?;
        if customers.is_empty() {
            warn!("no customer numbers found, reading the current view");
            summary.record_customer(None, self.run_customer(session, None));
            return Ok(());
        }
        if !self.publisher.naming.per_customer && customers.len() > 1 {
            warn!(n_customers = customers.len(), "single-entity mode, only the first customer");
            customers.truncate(1);
        }
        for (index, customer) in customers.iter().enumerate() {
            let result = if index == 0 {
                self.run_customer(session, Some(customer))
            } else {
                session
                    .switch_to(customer)
                    .and_then(|()| self.run_customer(session, Some(customer)))
            };
            summary.record_customer(Some(customer), result);
        }
        Ok(())
    }

    /// Read, reconcile, and publish the currently selected customer.
    #[instrument(skip_all, fields(customer = customer.map(tracing::field::display)))]
    fn run_customer(
        &self,
        session: &mut Session<'_, B::Page>,
        customer: Option<&CustomerNumber>,
    ) -> Result<Published> {
        let readings = {
            let mut view = session.summary();
            view.wait_populated()?;
            self.validator.validate(&mut view)?
        };
        let snapshot = detail::reconcile(session.page(), &self.settings, readings);
        println!("{}", build_snapshot_table(customer, &snapshot));
        Ok(self.publisher.publish(customer, &snapshot))
    }
}
