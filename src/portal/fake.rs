//! Scripted portal for tests.

use std::time::Duration;

use url::Url;

use crate::{
    page::fake::{Dom, Event, FakePage},
    portal::{
        CUSTOMER_OPTION,
        CUSTOMER_SELECT,
        CustomerNumber,
        DETAIL_PATH,
        LOGIN_BUTTON,
        LOGIN_ID,
        LOGIN_PASSWORD,
        SUMMARY_FIELDS,
        Settings,
        detail,
        session::{customer_link, dropdown_holder, dropdown_option},
    },
    prelude::*,
    wait::Wait,
};

const DROPDOWN_INSTANCE: &str = "29";

/// Settings without any waiting.
pub fn settings() -> Result<Settings> {
    Ok(Settings::builder()
        .base_url(Url::parse("https://pp.kepco.co.kr/")?)
        .wait(Wait { timeout: Duration::ZERO, poll_interval: Duration::ZERO })
        .switch_settle_delay(Duration::ZERO)
        .build())
}

#[derive(Clone)]
pub struct FakeCustomer {
    number: CustomerNumber,

    /// Summary field texts, one entry per page load, the last one repeats.
    loads: Vec<[&'static str; 4]>,

    /// Last cells of the generation and net charge rows.
    detail: Option<(&'static str, &'static str)>,

    /// Listed in the selector but missing from the dropdown widget.
    is_hidden_in_dropdown: bool,
}

impl FakeCustomer {
    pub fn new(number: &str) -> Self {
        Self {
            number: number.into(),
            loads: Vec::new(),
            detail: None,
            is_hidden_in_dropdown: false,
        }
    }

    #[must_use]
    pub fn readings(mut self, texts: [&'static str; 4]) -> Self {
        self.loads.push(texts);
        self
    }

    #[must_use]
    pub fn detail(mut self, generated: &'static str, net_charge: &'static str) -> Self {
        self.detail = Some((generated, net_charge));
        self
    }

    #[must_use]
    pub fn hidden_in_dropdown(mut self) -> Self {
        self.is_hidden_in_dropdown = true;
        self
    }

    fn texts(&self, n_loads: usize) -> [&'static str; 4] {
        self.loads
            .get(n_loads)
            .or_else(|| self.loads.last())
            .copied()
            .unwrap_or(["0kWh", "0kWh", "0원", "0원"])
    }
}

#[derive(Clone)]
pub struct FakePortal {
    password: &'static str,
    customers: Vec<FakeCustomer>,
}

impl FakePortal {
    pub fn new(password: &'static str, customers: impl IntoIterator<Item = FakeCustomer>) -> Self {
        Self { password, customers: customers.into_iter().collect() }
    }

    pub fn settings(&self) -> Result<Settings> {
        settings()
    }

    /// Fresh page pointed at nothing, as a newly started browser.
    pub fn page(&self) -> FakePage {
        let mut state = State {
            portal: self.clone(),
            entered_password: None,
            is_logged_in: false,
            current: 0,
            n_loads: vec![0; self.customers.len()],
        };
        FakePage::with_reactor(move |event, dom| state.react(event, dom))
    }
}

struct State {
    portal: FakePortal,
    entered_password: Option<String>,
    is_logged_in: bool,
    current: usize,
    n_loads: Vec<usize>,
}

impl State {
    fn react(&mut self, event: &Event, dom: &mut Dom) {
        match event {
            Event::Navigate(url) if url.ends_with(DETAIL_PATH) && self.is_logged_in => {
                self.render_detail(dom);
            }
            Event::Navigate(_) => {
                dom.clear();
                dom.set_text(&LOGIN_ID, "");
                dom.set_text(&LOGIN_PASSWORD, "");
                dom.set_text(&LOGIN_BUTTON, "");
            }
            Event::Keys(element, text) if dom.first(&LOGIN_PASSWORD) == Some(element) => {
                self.entered_password = Some(text.clone());
            }
            Event::ScriptClick(element) if dom.first(&LOGIN_BUTTON) == Some(element) => {
                if self.entered_password.as_deref() == Some(self.portal.password) {
                    self.is_logged_in = true;
                    self.render_summary(dom);
                }
            }
            Event::ScriptClick(element) if self.is_logged_in => {
                let selected = self.portal.customers.iter().position(|customer| {
                    dom.first(&customer_link(&customer.number)) == Some(element)
                });
                if let Some(index) = selected {
                    self.current = index;
                    self.render_summary(dom);
                }
            }
            Event::Click(element)
                if dom.first(&dropdown_holder(DROPDOWN_INSTANCE)) == Some(element) =>
            {
                let listed = self.portal.customers.iter().filter(|c| !c.is_hidden_in_dropdown);
                for customer in listed {
                    dom.set_text(&dropdown_option(DROPDOWN_INSTANCE, &customer.number), "");
                    dom.set_text(&customer_link(&customer.number), "");
                }
            }
            Event::Refresh | Event::Back if self.is_logged_in => self.render_summary(dom),
            _ => {}
        }
    }

    fn render_summary(&mut self, dom: &mut Dom) {
        dom.clear();
        let select = dom.set_text(&CUSTOMER_SELECT, "");
        dom.node_mut(&select).attributes.insert("sb".to_owned(), DROPDOWN_INSTANCE.to_owned());
        for customer in &self.portal.customers {
            let option = dom.push_child(&select, &CUSTOMER_OPTION, &customer.number.0);
            dom.node_mut(&option).attributes.insert("value".to_owned(), customer.number.0.clone());
        }
        dom.set_text(&dropdown_holder(DROPDOWN_INSTANCE), "");

        let customer = &self.portal.customers[self.current];
        let texts = customer.texts(self.n_loads[self.current]);
        self.n_loads[self.current] += 1;
        for (locator, text) in SUMMARY_FIELDS.iter().zip(texts) {
            dom.set_text(locator, text);
        }
    }

    fn render_detail(&self, dom: &mut Dom) {
        dom.clear();
        dom.set_text(&detail::CONTAINER, "");
        let header = dom.set_text(&detail::HEADER, "");
        let Some((generated, net_charge)) = self.portal.customers[self.current].detail else {
            return;
        };
        dom.push_child(&header, &detail::ROW, "");
        let row = dom.set_text(&detail::GENERATION_ROW, "");
        dom.push_child(&row, &detail::CELL, "전력량요금");
        dom.push_child(&row, &detail::CELL, generated);
        let row = dom.set_text(&detail::NET_CHARGE_ROW, "");
        dom.push_child(&row, &detail::CELL, net_charge);
    }
}
