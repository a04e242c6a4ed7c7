//! KEPCO PowerPlanner portal.

pub mod detail;
#[cfg(test)]
pub mod fake;
pub mod session;
pub mod summary;

use std::time::Duration;

use url::Url;

use crate::{page::Locator, prelude::*, wait::Wait};

pub const LOGIN_ID: Locator = Locator::id("RSA_USER_ID");
pub const LOGIN_PASSWORD: Locator = Locator::id("RSA_USER_PWD");
pub const LOGIN_BUTTON: Locator = Locator::id("intro_btn_indi");

/// Customer selector, also the marker of a loaded summary view.
pub const CUSTOMER_SELECT: Locator = Locator::id("country_id");
pub const CUSTOMER_OPTION: Locator = Locator::tag_name("option");

pub const REALTIME_USAGE: Locator = Locator::id("F_AP_QT");
pub const ESTIMATED_USAGE: Locator = Locator::id("PREDICT_TOT");
pub const REALTIME_CHARGE: Locator = Locator::id("TOTAL_CHARGE");
pub const ESTIMATED_CHARGE: Locator = Locator::id("PREDICT_TOTAL_CHARGE");

pub const SUMMARY_FIELDS: [Locator; 4] =
    [REALTIME_USAGE, ESTIMATED_USAGE, REALTIME_CHARGE, ESTIMATED_CHARGE];

/// Path of the real-time charge breakdown.
const DETAIL_PATH: &str = "pr/pr0201.do?menu_id=O020401";

#[must_use]
#[derive(Clone, Debug, bon::Builder)]
pub struct Settings {
    pub base_url: Url,

    #[builder(default = Wait::new(Duration::from_secs(20)))]
    pub wait: Wait,

    /// Pause after the customer switch to let the asynchronous refresh land.
    #[builder(default = Duration::from_secs(2))]
    pub switch_settle_delay: Duration,
}

impl Settings {
    pub fn detail_url(&self) -> Result<Url> {
        self.base_url.join(DETAIL_PATH).context("failed to build the detail page URL")
    }
}

/// Sub-account key, meaningful only within the session it was read from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::Display, derive_more::From)]
pub struct CustomerNumber(pub String);

impl From<&str> for CustomerNumber {
    fn from(number: &str) -> Self {
        Self(number.to_owned())
    }
}
