use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::{
    portal::Settings,
    publisher::Naming,
    validator::{Policy, Validator},
    wait::Wait,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub accounts: AccountArgs,

    #[clap(flatten)]
    pub home_assistant: HomeAssistantArgs,

    #[clap(flatten)]
    pub browser: BrowserArgs,

    #[clap(flatten)]
    pub scraping: ScrapingArgs,
}

#[derive(Parser)]
pub struct AccountArgs {
    /// JSON list of accounts, for example: `[{"RSA_USER_ID": "…", "RSA_USER_PWD": "…"}]`.
    #[clap(long, env = "ACCOUNTS", hide_env_values = true)]
    pub accounts: Option<String>,

    /// Single account ID, used when the list is not set.
    #[clap(long = "user-id", env = "RSA_USER_ID")]
    pub user_id: Option<String>,

    #[clap(long = "password", env = "RSA_USER_PWD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Parser)]
pub struct HomeAssistantArgs {
    /// Home Assistant API access token.
    #[clap(
        long = "home-assistant-access-token",
        env = "SUPERVISOR_TOKEN",
        hide_env_values = true
    )]
    pub access_token: String,

    /// Home Assistant API base URL.
    #[clap(
        long = "home-assistant-api-base-url",
        env = "HOME_ASSISTANT_API_BASE_URL",
        default_value = "http://supervisor/core/api"
    )]
    pub base_url: Url,

    /// Prefix entity IDs with the customer number.
    #[clap(
        long = "per-customer-entities",
        env = "PER_CUSTOMER_ENTITIES",
        default_value = "true",
        action = clap::ArgAction::Set,
    )]
    pub per_customer: bool,

    /// Add the `unique_id` attribute to the published states.
    #[clap(
        long = "unique-id",
        env = "UNIQUE_ID",
        default_value = "false",
        action = clap::ArgAction::Set,
    )]
    pub unique_id: bool,
}

impl HomeAssistantArgs {
    pub const fn naming(&self) -> Naming {
        Naming { per_customer: self.per_customer, unique_id: self.unique_id }
    }
}

#[derive(Parser)]
pub struct BrowserArgs {
    /// WebDriver endpoint, for example a running `chromedriver`.
    #[clap(long = "webdriver-url", env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: Url,

    #[clap(
        long = "user-agent",
        env = "USER_AGENT",
        default_value = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
    )]
    pub user_agent: String,
}

#[derive(Parser)]
pub struct ScrapingArgs {
    #[clap(long = "portal-url", env = "PORTAL_URL", default_value = "https://pp.kepco.co.kr/")]
    pub portal_url: Url,

    /// How long to wait for a page element.
    #[clap(long = "wait-timeout", env = "WAIT_TIMEOUT", default_value = "20s")]
    pub wait_timeout: humantime::Duration,

    /// Number of reads before giving up on inconsistent readings.
    #[clap(
        long = "max-attempts",
        env = "MAX_ATTEMPTS",
        default_value = "5",
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    pub max_attempts: u16,

    /// Pause after refreshing inconsistent readings.
    #[clap(long = "settle-delay", env = "SETTLE_DELAY", default_value = "1s")]
    pub settle_delay: humantime::Duration,

    /// Pause after switching to another customer number.
    #[clap(long = "switch-settle-delay", env = "SWITCH_SETTLE_DELAY", default_value = "2s")]
    pub switch_settle_delay: humantime::Duration,

    /// What to do when the readings are still inconsistent after the last attempt.
    #[clap(long = "on-inconsistent", env = "ON_INCONSISTENT", default_value = "fail")]
    pub on_inconsistent: Policy,
}

impl ScrapingArgs {
    pub fn settings(&self) -> Settings {
        Settings::builder()
            .base_url(self.portal_url.clone())
            .wait(Wait::new(self.wait_timeout.into()))
            .switch_settle_delay(self.switch_settle_delay.into())
            .build()
    }

    pub fn validator(&self) -> Validator {
        Validator::builder()
            .max_attempts(usize::from(self.max_attempts))
            .settle_delay(Duration::from(self.settle_delay))
            .on_exhausted(self.on_inconsistent)
            .build()
    }
}
