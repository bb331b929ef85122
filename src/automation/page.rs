use std::sync::Arc;

use tokio::sync::broadcast;

/// Kinds of change a node can report, mirroring what the waits care about:
/// presentation attributes (style, class) and text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Attributes,
    CharacterData,
}

pub type NodeHandle = Arc<dyn TargetNode>;

/// Handle to one element (or the document root) of the externally-controlled
/// target page. The automation layer only ever talks to the page through
/// this interface; the real browser binding lives outside this crate and
/// tests drive a scripted fake.
pub trait TargetNode: Send + Sync {
    /// Short human-readable description used in trace logs, e.g.
    /// `button#send-form`.
    fn object_name(&self) -> String;

    /// Scoped selector lookup, first match.
    fn query_selector(&self, selector: &str) -> Option<NodeHandle>;

    /// Scoped selector lookup, all matches in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<NodeHandle>;

    fn click(&self);

    fn set_value(&self, value: &str);

    /// Computed CSS display value.
    fn display(&self) -> String;

    fn inner_text(&self) -> String;

    /// The inner document of a frame element, if this node hosts one.
    fn content_document(&self) -> Option<NodeHandle> {
        None
    }

    /// Change notifications for this node. Every call returns a fresh
    /// receiver; missed messages before subscription are not replayed.
    fn mutations(&self) -> broadcast::Receiver<Mutation>;

    /// One-shot page events by name ("load" and friends).
    fn events(&self) -> broadcast::Receiver<String>;
}
