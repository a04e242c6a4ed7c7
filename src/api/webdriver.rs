//! W3C WebDriver client, for example against `chromedriver`.

use std::{borrow::Cow, time::Duration};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use ureq::{Agent, Body, http::Response};
use url::Url;

use crate::{
    api,
    page::{Browser, ElementId, Locator, Page},
    prelude::*,
};

/// Starts a new headless Chrome session for every page.
pub struct WebDriver {
    client: Agent,
    url: Url,
    user_agent: String,
}

impl WebDriver {
    pub fn new(mut url: Url, user_agent: String) -> Self {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Self { client: api::agent(Duration::from_secs(60)), url, user_agent }
    }

    fn capabilities(&self) -> serde_json::Value {
        // language=json
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": [
                            "--headless=new",
                            "--no-sandbox",
                            "--disable-dev-shm-usage",
                            "--disable-gpu",
                            "--disable-software-rasterizer",
                            format!("--user-agent={}", self.user_agent),
                        ],
                    },
                },
            },
        })
    }
}

impl Browser for WebDriver {
    type Page = Tab;

    #[instrument(skip_all, fields(url = %self.url))]
    fn open(&self) -> Result<Tab> {
        let response =
            self.client.post(self.url.join("session")?.as_str()).send_json(self.capabilities())?;
        let NewSession { session_id } =
            read_value(response).context("failed to start a browser session")?;
        info!(%session_id, "started a browser session");
        let session_url = self.url.join(&format!("session/{session_id}/"))?;
        Ok(Tab { client: self.client.clone(), session_url })
    }
}

/// A single WebDriver session.
pub struct Tab {
    client: Agent,

    /// Session endpoint with the trailing slash.
    session_url: Url,
}

impl Tab {
    fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        let url = self.session_url.join(path)?;
        trace!(%url, "POST");
        read_value(self.client.post(url.as_str()).send_json(body)?)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.session_url.join(path)?;
        trace!(%url, "GET");
        read_value(self.client.get(url.as_str()).call()?)
    }

    fn find_optional(&self, path: &str, locator: &Locator) -> Result<Option<ElementId>> {
        match self.post::<ElementRef>(path, &Selector::from(locator)) {
            Ok(element) => Ok(Some(element.into())),
            Err(error) if CommandError::is_no_such_element(&error) => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn find_many(&self, path: &str, locator: &Locator) -> Result<Vec<ElementId>> {
        let elements: Vec<ElementRef> = self.post(path, &Selector::from(locator))?;
        Ok(elements.into_iter().map(ElementId::from).collect())
    }
}

impl Page for Tab {
    fn navigate(&mut self, url: &str) -> Result {
        self.post("url", &json!({ "url": url }))
    }

    fn back(&mut self) -> Result {
        self.post("back", &json!({}))
    }

    fn refresh(&mut self) -> Result {
        self.post("refresh", &json!({}))
    }

    fn find(&mut self, locator: &Locator) -> Result<Option<ElementId>> {
        self.find_optional("element", locator)
    }

    fn find_all_within(&mut self, parent: &ElementId, locator: &Locator) -> Result<Vec<ElementId>> {
        self.find_many(&format!("element/{parent}/elements"), locator)
    }

    fn text(&mut self, element: &ElementId) -> Result<String> {
        self.get(&format!("element/{element}/text"))
    }

    fn attribute(&mut self, element: &ElementId, name: &str) -> Result<Option<String>> {
        self.get(&format!("element/{element}/attribute/{name}"))
    }

    fn is_displayed(&mut self, element: &ElementId) -> Result<bool> {
        self.get(&format!("element/{element}/displayed"))
    }

    fn send_keys(&mut self, element: &ElementId, text: &str) -> Result {
        self.post(&format!("element/{element}/value"), &json!({ "text": text }))
    }

    fn click(&mut self, element: &ElementId) -> Result {
        self.post(&format!("element/{element}/click"), &json!({}))
    }

    fn execute_script(
        &mut self,
        script: &str,
        arguments: &[&ElementId],
    ) -> Result<serde_json::Value> {
        let args: Vec<ElementRef> =
            arguments.iter().map(|element| ElementRef::from(*element)).collect();
        self.post("execute/sync", &json!({ "script": script, "args": args }))
    }

    #[instrument(skip_all, fields(session_url = %self.session_url))]
    fn quit(self) -> Result {
        let response = self.client.delete(self.session_url.as_str().trim_end_matches('/')).call()?;
        read_value::<serde_json::Value>(response)?;
        info!("quit the browser session");
        Ok(())
    }
}

/// Unwrap the `value` envelope, turning error payloads into [`CommandError`].
fn read_value<T: DeserializeOwned>(mut response: Response<Body>) -> Result<T> {
    if response.status().is_success() {
        Ok(response.body_mut().read_json::<Envelope<T>>()?.value)
    } else {
        let status = response.status();
        let error = response
            .body_mut()
            .read_json::<Envelope<CommandError>>()
            .with_context(|| format!("unexpected WebDriver response: {status}"))?
            .value;
        Err(error.into())
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    session_id: String,
}

#[derive(Debug, Deserialize, thiserror::Error)]
#[error("{error}: {message}")]
pub struct CommandError {
    pub error: String,
    pub message: String,
}

impl CommandError {
    fn is_no_such_element(error: &anyhow::Error) -> bool {
        error.downcast_ref::<Self>().is_some_and(|error| error.error == "no such element")
    }
}

/// Web element reference as it travels over the wire.
#[derive(Serialize, Deserialize)]
struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    id: String,
}

impl From<ElementRef> for ElementId {
    fn from(element: ElementRef) -> Self {
        Self(element.id)
    }
}

impl From<&ElementId> for ElementRef {
    fn from(element: &ElementId) -> Self {
        Self { id: element.0.clone() }
    }
}

#[derive(Serialize)]
struct Selector<'a> {
    using: &'static str,
    value: Cow<'a, str>,
}

impl<'a> From<&'a Locator> for Selector<'a> {
    fn from(locator: &'a Locator) -> Self {
        match locator {
            // There is no ID strategy in the W3C protocol.
            Locator::Id(id) => {
                Self { using: "css selector", value: format!("[id=\"{id}\"]").into() }
            }
            Locator::Css(selector) => Self { using: "css selector", value: Cow::Borrowed(selector) },
            Locator::XPath(expression) => Self { using: "xpath", value: Cow::Borrowed(expression) },
            Locator::TagName(name) => Self { using: "tag name", value: Cow::Borrowed(name) },
        }
    }
}
