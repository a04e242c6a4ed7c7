pub mod home_assistant;
pub mod webdriver;

use std::time::Duration;

use ureq::Agent;

/// Build a default client.
///
/// Non-2xx statuses are left to the caller, both APIs put the details into the body.
pub fn agent(timeout: Duration) -> Agent {
    Agent::config_builder().timeout_global(Some(timeout)).http_status_as_error(false).build().into()
}
