//! Scripted stand-in for the target portal page: a tree of nodes addressed
//! by selector, with click handlers, mutable display/text state that emits
//! mutation events, and named one-shot events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use skladki::automation::{Mutation, NodeHandle, TargetNode};
use tokio::sync::broadcast;

type ClickHandler = Box<dyn Fn() + Send + Sync>;

pub struct FakeNode {
    name: String,
    value: Mutex<String>,
    display: Mutex<String>,
    text: Mutex<String>,
    children: Mutex<HashMap<String, Vec<NodeHandle>>>,
    content: Mutex<Option<NodeHandle>>,
    click_handler: Mutex<Option<ClickHandler>>,
    mutations: broadcast::Sender<Mutation>,
    events: broadcast::Sender<String>,
}

impl FakeNode {
    pub fn new(name: &str) -> Arc<Self> {
        let (mutations, _) = broadcast::channel(64);
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            name: name.to_string(),
            value: Mutex::new(String::new()),
            display: Mutex::new("block".to_string()),
            text: Mutex::new(String::new()),
            children: Mutex::new(HashMap::new()),
            content: Mutex::new(None),
            click_handler: Mutex::new(None),
            mutations,
            events,
        })
    }

    pub fn with_display(self: Arc<Self>, display: &str) -> Arc<Self> {
        *self.display.lock().unwrap() = display.to_string();
        self
    }

    pub fn with_text(self: Arc<Self>, text: &str) -> Arc<Self> {
        *self.text.lock().unwrap() = text.to_string();
        self
    }

    /// Register a child under the selector that finds it.
    pub fn insert(&self, selector: &str, node: NodeHandle) {
        self.children
            .lock()
            .unwrap()
            .entry(selector.to_string())
            .or_default()
            .push(node);
    }

    pub fn set_display(&self, display: &str) {
        *self.display.lock().unwrap() = display.to_string();
        let _ = self.mutations.send(Mutation::Attributes);
    }

    pub fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
        let _ = self.mutations.send(Mutation::CharacterData);
    }

    pub fn set_content_document(&self, document: NodeHandle) {
        *self.content.lock().unwrap() = Some(document);
    }

    pub fn on_click(&self, handler: impl Fn() + Send + Sync + 'static) {
        *self.click_handler.lock().unwrap() = Some(Box::new(handler));
    }

    pub fn dispatch(&self, event: &str) {
        let _ = self.events.send(event.to_string());
    }

    pub fn value(&self) -> String {
        self.value.lock().unwrap().clone()
    }
}

impl TargetNode for FakeNode {
    fn object_name(&self) -> String {
        self.name.clone()
    }

    fn query_selector(&self, selector: &str) -> Option<NodeHandle> {
        self.children
            .lock()
            .unwrap()
            .get(selector)
            .and_then(|nodes| nodes.first().cloned())
    }

    fn query_selector_all(&self, selector: &str) -> Vec<NodeHandle> {
        self.children
            .lock()
            .unwrap()
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    fn click(&self) {
        if let Some(handler) = self.click_handler.lock().unwrap().as_ref() {
            handler();
        }
    }

    fn set_value(&self, value: &str) {
        *self.value.lock().unwrap() = value.to_string();
    }

    fn display(&self) -> String {
        self.display.lock().unwrap().clone()
    }

    fn inner_text(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    fn content_document(&self) -> Option<NodeHandle> {
        self.content.lock().unwrap().clone()
    }

    fn mutations(&self) -> broadcast::Receiver<Mutation> {
        self.mutations.subscribe()
    }

    fn events(&self) -> broadcast::Receiver<String> {
        self.events.subscribe()
    }
}
