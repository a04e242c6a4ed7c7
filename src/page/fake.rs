//! In-memory page for tests.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use crate::{
    page::{Browser, ElementId, Locator, Page},
    prelude::*,
};

pub struct Node {
    pub text: String,
    pub attributes: HashMap<String, String>,
    pub displayed: bool,
    pub children: HashMap<Locator, Vec<ElementId>>,
}

impl Node {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            attributes: HashMap::new(),
            displayed: true,
            children: HashMap::new(),
        }
    }
}

/// Elements indexed by the exact locator they are found with.
#[derive(Default)]
pub struct Dom {
    nodes: HashMap<ElementId, Node>,
    roots: HashMap<Locator, Vec<ElementId>>,
    n_created: usize,
}

impl Dom {
    fn create(&mut self, text: &str) -> ElementId {
        self.n_created += 1;
        let id = ElementId(format!("element-{}", self.n_created));
        self.nodes.insert(id.clone(), Node::new(text));
        id
    }

    /// Set the text of the first element, creating it when absent.
    pub fn set_text(&mut self, locator: &Locator, text: &str) -> ElementId {
        if let Some(id) = self.roots.get(locator).and_then(|ids| ids.first()).cloned() {
            self.node_mut(&id).text = text.to_owned();
            id
        } else {
            self.push(locator, text)
        }
    }

    pub fn push(&mut self, locator: &Locator, text: &str) -> ElementId {
        let id = self.create(text);
        self.roots.entry(locator.clone()).or_default().push(id.clone());
        id
    }

    pub fn push_child(&mut self, parent: &ElementId, locator: &Locator, text: &str) -> ElementId {
        let id = self.create(text);
        self.node_mut(parent).children.entry(locator.clone()).or_default().push(id.clone());
        id
    }

    pub fn clear(&mut self) {
        self.roots.clear();
    }

    pub fn text_of(&self, locator: &Locator) -> Option<&str> {
        let id = self.roots.get(locator)?.first()?;
        self.nodes.get(id).map(|node| node.text.as_str())
    }

    pub fn first(&self, locator: &Locator) -> Option<&ElementId> {
        self.roots.get(locator)?.first()
    }

    pub fn node_mut(&mut self, id: &ElementId) -> &mut Node {
        self.nodes.get_mut(id).expect("the element should exist")
    }

    fn node(&self, id: &ElementId) -> Result<&Node> {
        self.nodes.get(id).with_context(|| format!("stale element `{id}`"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Navigate(String),
    Back,
    Refresh,
    Keys(ElementId, String),
    Click(ElementId),
    ScriptClick(ElementId),
    Quit,
}

type Reactor = Box<dyn FnMut(&Event, &mut Dom)>;

/// Page whose behaviour is scripted by a reactor called after every action.
#[derive(Default)]
pub struct FakePage {
    pub dom: Dom,
    pub events: Rc<RefCell<Vec<Event>>>,

    /// Make every navigation fail, as an unreachable site would.
    pub is_offline: bool,

    reactor: Option<Reactor>,
}

impl FakePage {
    pub fn with_reactor(reactor: impl FnMut(&Event, &mut Dom) + 'static) -> Self {
        Self { reactor: Some(Box::new(reactor)), ..Self::default() }
    }

    fn emit(&mut self, event: Event) {
        if let Some(reactor) = &mut self.reactor {
            reactor(&event, &mut self.dom);
        }
        self.events.borrow_mut().push(event);
    }
}

impl Page for FakePage {
    fn navigate(&mut self, url: &str) -> Result {
        if self.is_offline {
            bail!("net::ERR_INTERNET_DISCONNECTED at {url}");
        }
        self.emit(Event::Navigate(url.to_owned()));
        Ok(())
    }

    fn back(&mut self) -> Result {
        self.emit(Event::Back);
        Ok(())
    }

    fn refresh(&mut self) -> Result {
        self.emit(Event::Refresh);
        Ok(())
    }

    fn find(&mut self, locator: &Locator) -> Result<Option<ElementId>> {
        Ok(self.dom.first(locator).cloned())
    }

    fn find_all_within(&mut self, parent: &ElementId, locator: &Locator) -> Result<Vec<ElementId>> {
        Ok(self.dom.node(parent)?.children.get(locator).cloned().unwrap_or_default())
    }

    fn text(&mut self, element: &ElementId) -> Result<String> {
        Ok(self.dom.node(element)?.text.clone())
    }

    fn attribute(&mut self, element: &ElementId, name: &str) -> Result<Option<String>> {
        Ok(self.dom.node(element)?.attributes.get(name).cloned())
    }

    fn is_displayed(&mut self, element: &ElementId) -> Result<bool> {
        Ok(self.dom.node(element)?.displayed)
    }

    fn send_keys(&mut self, element: &ElementId, text: &str) -> Result {
        self.dom.node(element)?;
        self.emit(Event::Keys(element.clone(), text.to_owned()));
        Ok(())
    }

    fn click(&mut self, element: &ElementId) -> Result {
        self.dom.node(element)?;
        self.emit(Event::Click(element.clone()));
        Ok(())
    }

    fn execute_script(
        &mut self,
        script: &str,
        arguments: &[&ElementId],
    ) -> Result<serde_json::Value> {
        if script == "arguments[0].click();"
            && let Some(element) = arguments.first()
        {
            self.dom.node(element)?;
            self.emit(Event::ScriptClick((*element).clone()));
        }
        Ok(serde_json::Value::Null)
    }

    fn quit(mut self) -> Result {
        self.emit(Event::Quit);
        Ok(())
    }
}

/// Hands out prepared pages in order.
#[derive(Default)]
pub struct FakeBrowser {
    pub pages: RefCell<VecDeque<FakePage>>,
}

impl FakeBrowser {
    pub fn new(pages: impl IntoIterator<Item = FakePage>) -> Self {
        Self { pages: RefCell::new(pages.into_iter().collect()) }
    }
}

impl Browser for FakeBrowser {
    type Page = FakePage;

    fn open(&self) -> Result<Self::Page> {
        self.pages.borrow_mut().pop_front().context("no more pages")
    }
}
