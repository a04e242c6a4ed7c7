use crate::{
    extract::{Decorated, parse},
    page::{Locator, Page},
    portal::{CUSTOMER_SELECT, Settings},
    prelude::*,
    quantity::{KilowattHours, Won},
    snapshot::{Generation, Readings, UsageSnapshot},
};

pub const CONTAINER: Locator = Locator::css(".smart_now");
pub const HEADER: Locator = Locator::css("div.smart_now thead");
pub const ROW: Locator = Locator::tag_name("tr");
pub const CELL: Locator = Locator::tag_name("td");

/// Energy charge row, its last cell holds the generated amount.
pub const GENERATION_ROW: Locator = Locator::xpath("//th[contains(text(), '전력량요금')]/..");

/// Footer row, its last cell holds the charge after compensation.
pub const NET_CHARGE_ROW: Locator = Locator::xpath("//tfoot//th[contains(text(), '실시간 요금')]/..");

/// Enrich the readings with generation data, if the customer has any.
///
/// Never fails: anything going wrong on the detail page means no generation data this time.
#[instrument(skip_all)]
pub fn reconcile<P: Page>(page: &mut P, settings: &Settings, readings: Readings) -> UsageSnapshot {
    let generation = DetailView::enter(page, settings)
        .and_then(|mut view| view.generation(readings.realtime_usage));
    match generation {
        Ok(generation) => {
            if generation.is_none() {
                info!("no generation data");
            }
            UsageSnapshot { readings, generation }
        }
        Err(error) => {
            warn!("could not read the generation data, skipping: {error:#}");
            UsageSnapshot::from(readings)
        }
    }
}

/// Detail page, navigating back to the summary when dropped.
pub struct DetailView<'a, P: Page> {
    page: &'a mut P,
    settings: &'a Settings,
}

impl<'a, P: Page> DetailView<'a, P> {
    /// Navigate to the detail page.
    ///
    /// The guard exists once the navigation has been issued, so a detail page that never loads
    /// still returns to the summary. A failed navigation leaves the browser where it was.
    pub fn enter(page: &'a mut P, settings: &'a Settings) -> Result<Self> {
        let url = settings.detail_url()?;
        debug!(%url, "navigating…");
        page.navigate(url.as_str())?;
        let view = Self { page, settings };
        settings.wait.for_element(view.page, &CONTAINER)?;
        Ok(view)
    }

    /// Read the generation figures, [`None`] when the breakdown table has no header rows.
    pub fn generation(&mut self, realtime_usage: KilowattHours) -> Result<Option<Generation>> {
        let Some(header) = self.page.find(&HEADER)? else {
            return Ok(None);
        };
        if self.page.find_all_within(&header, &ROW)?.is_empty() {
            return Ok(None);
        }
        let generated: KilowattHours = self.last_cell(&GENERATION_ROW)?;
        let net_charge: Won = self.last_cell(&NET_CHARGE_ROW)?;
        let generation = Generation::reconcile(realtime_usage, generated, net_charge);
        info!(?generation, "reconciled");
        Ok(Some(generation))
    }

    fn last_cell<T: Decorated>(&mut self, row: &Locator) -> Result<T> {
        let element = self.page.find(row)?.with_context(|| format!("no `{row}` row"))?;
        let cell =
            self.page.find_all_within(&element, &CELL)?.pop().context("the row has no cells")?;
        let text = self.page.text(&cell)?;
        Ok(parse(&format!("{row} last cell"), &text)?)
    }

    fn return_to_summary(&mut self) -> Result {
        self.page.back()?;
        self.settings.wait.for_element(self.page, &CUSTOMER_SELECT)?;
        debug!("back to the summary");
        Ok(())
    }
}

impl<P: Page> Drop for DetailView<'_, P> {
    fn drop(&mut self) {
        if let Err(error) = self.return_to_summary() {
            error!("failed to return to the summary: {error:#}");
        }
    }
}
