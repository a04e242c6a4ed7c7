use std::time::Duration;

use ureq::Agent;
use url::Url;

use crate::{
    api,
    error::Error,
    prelude::*,
    publisher::{SensorUpdate, StateStore},
};

/// Home Assistant REST API.
pub struct Api {
    client: Agent,
    base_url: Url,
    authorization: String,
}

impl Api {
    pub fn new(access_token: &str, base_url: Url) -> Self {
        Self {
            client: api::agent(Duration::from_secs(10)),
            base_url,
            authorization: format!("Bearer {access_token}"),
        }
    }

    fn state_url(&self, entity_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .pop_if_empty()
            .push("states")
            .push(entity_id);
        Ok(url)
    }
}

impl StateStore for Api {
    #[instrument(skip_all, fields(entity_id = entity_id))]
    fn upsert(&self, entity_id: &str, update: &SensorUpdate) -> Result {
        let url = self.state_url(entity_id)?;
        let publish_error =
            |reason: String| Error::Publish { entity_id: entity_id.to_owned(), reason };
        let mut response = self
            .client
            .post(url.as_str())
            .header("Authorization", self.authorization.as_str())
            .send_json(update)
            .map_err(|error| publish_error(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(publish_error(format!("{status}: {}", body.trim())).into());
        }
        trace!(%status, "upserted");
        Ok(())
    }
}
