use crate::{
    extract::extract,
    page::Page,
    portal::{
        ESTIMATED_CHARGE,
        ESTIMATED_USAGE,
        REALTIME_CHARGE,
        REALTIME_USAGE,
        SUMMARY_FIELDS,
        Settings,
    },
    prelude::*,
    snapshot::Readings,
    validator::ReadingsSource,
};

/// Summary view of the currently selected customer.
pub struct SummaryView<'a, P> {
    page: &'a mut P,
    settings: &'a Settings,
}

impl<'a, P: Page> SummaryView<'a, P> {
    pub const fn new(page: &'a mut P, settings: &'a Settings) -> Self {
        Self { page, settings }
    }

    /// Block until all four fields show something.
    ///
    /// The fields are briefly blank while the portal is fetching them.
    pub fn wait_populated(&mut self) -> Result {
        for locator in &SUMMARY_FIELDS {
            self.settings.wait.for_text(self.page, locator)?;
        }
        Ok(())
    }
}

impl<P: Page> ReadingsSource for SummaryView<'_, P> {
    #[instrument(skip_all, level = Level::DEBUG)]
    fn read(&mut self) -> Result<Readings> {
        Ok(Readings {
            realtime_usage: extract(self.page, &REALTIME_USAGE)?,
            estimated_usage: extract(self.page, &ESTIMATED_USAGE)?,
            realtime_charge: extract(self.page, &REALTIME_CHARGE)?,
            estimated_charge: extract(self.page, &ESTIMATED_CHARGE)?,
        })
    }

    #[instrument(skip_all)]
    fn refresh(&mut self) -> Result {
        info!("refreshing…");
        self.page.refresh()?;
        self.wait_populated()
    }
}
