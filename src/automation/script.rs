use std::time::Duration;

use thiserror::Error;

use super::page::{Mutation, NodeHandle};
use super::wait::{first_event, poll_until, WaitOutcome, INTERVAL, TIMEOUT};

/// A failed automation step, carrying the human-readable description of the
/// UI element that was expected. These abort the whole store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AutomationError {
    pub message: String,
}

impl AutomationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One selector lookup. Without an error message a timeout degrades to
/// "not found"; with one, it fails the operation. `just_once` skips the
/// polling and probes exactly one time.
#[derive(Debug, Clone)]
pub struct Query {
    pub selector: String,
    pub error_message: Option<String>,
    pub just_once: bool,
    pub timeout: Duration,
    pub interval: Duration,
}

impl Query {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            error_message: None,
            just_once: false,
            timeout: TIMEOUT,
            interval: INTERVAL,
        }
    }

    pub fn required(mut self, error_message: impl Into<String>) -> Self {
        self.error_message = Some(error_message.into());
        self
    }

    pub fn once(mut self) -> Self {
        self.just_once = true;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl From<&str> for Query {
    fn from(selector: &str) -> Self {
        Query::new(selector)
    }
}

/// Condition wait options for [`ScriptScope::wait_for_display`] and
/// [`ScriptScope::wait_for_text`].
#[derive(Debug, Clone)]
pub struct Wait {
    pub error_message: Option<String>,
    pub timeout: Duration,
}

impl Default for Wait {
    fn default() -> Self {
        Self {
            error_message: None,
            timeout: TIMEOUT,
        }
    }
}

impl Wait {
    pub fn required(error_message: impl Into<String>) -> Self {
        Self {
            error_message: Some(error_message.into()),
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn timed_out<T>(error_message: Option<String>) -> Result<Option<T>, AutomationError> {
    match error_message {
        Some(message) => Err(AutomationError::new(message)),
        None => Ok(None),
    }
}

/// A chainable query scope over one node of the target page. Each successful
/// query narrows the scope to the matched subtree; failed optional lookups
/// yield `None`, failed required lookups abort with their error message.
#[derive(Clone)]
pub struct ScriptScope {
    node: NodeHandle,
}

impl ScriptScope {
    pub fn new(root: NodeHandle) -> Self {
        Self { node: root }
    }

    pub fn node(&self) -> &NodeHandle {
        &self.node
    }

    pub fn click(&self) {
        tracing::debug!(element = %self.node.object_name(), "clicking");
        self.node.click();
    }

    pub async fn query(&self, query: impl Into<Query>) -> Result<Option<ScriptScope>, AutomationError> {
        let query = query.into();
        tracing::debug!(selector = %query.selector, "query");

        let found = if query.just_once {
            self.node.query_selector(&query.selector)
        } else {
            let node = &self.node;
            let selector = query.selector.clone();
            poll_until(query.interval, query.timeout, &query.selector, move || {
                node.query_selector(&selector)
            })
            .await
            .into_option()
        };

        match found {
            Some(node) => {
                tracing::debug!(
                    selector = %query.selector,
                    found = %node.object_name(),
                    within = %self.node.object_name(),
                    "query matched"
                );
                Ok(Some(ScriptScope::new(node)))
            }
            None => timed_out(query.error_message),
        }
    }

    /// Probe once; when absent, run the fallback action (usually a click
    /// that makes the target appear) and re-query, this time loudly.
    pub async fn query_or(
        &self,
        selector: &str,
        fallback: impl FnOnce(&ScriptScope) -> bool,
        error_message: impl Into<String>,
    ) -> Result<Option<ScriptScope>, AutomationError> {
        if let Some(found) = self.query(Query::new(selector).once()).await? {
            return Ok(Some(found));
        }
        if !fallback(self) {
            return Ok(None);
        }
        self.query(Query::new(selector).required(error_message)).await
    }

    pub async fn query_and_click(
        &self,
        query: impl Into<Query>,
    ) -> Result<Option<ScriptScope>, AutomationError> {
        let target = self.query(query).await?;
        if let Some(target) = &target {
            target.click();
        }
        Ok(target)
    }

    /// Poll for all matches of a selector, then let the caller reduce the
    /// node list to the one it wants.
    pub async fn query_all(
        &self,
        query: impl Into<Query>,
        reduce: impl Fn(Vec<NodeHandle>) -> Option<NodeHandle>,
    ) -> Result<Option<ScriptScope>, AutomationError> {
        let query = query.into();
        tracing::debug!(selector = %query.selector, "query all");

        let list = if query.just_once {
            Some(self.node.query_selector_all(&query.selector))
        } else {
            let node = &self.node;
            let selector = query.selector.clone();
            poll_until(query.interval, query.timeout, &query.selector, move || {
                let matches = node.query_selector_all(&selector);
                if matches.is_empty() {
                    None
                } else {
                    Some(matches)
                }
            })
            .await
            .into_option()
        };

        let Some(list) = list else {
            return timed_out(query.error_message);
        };

        let count = list.len();
        match reduce(list) {
            Some(node) => {
                tracing::debug!(
                    selector = %query.selector,
                    found = %node.object_name(),
                    from = count,
                    "query all matched"
                );
                Ok(Some(ScriptScope::new(node)))
            }
            None => timed_out(query.error_message),
        }
    }

    /// Resolve when the node's computed display becomes the given value:
    /// immediately if it already is, otherwise on the first attribute
    /// mutation that flips the condition.
    pub async fn wait_for_display(
        &self,
        display: &str,
        wait: Wait,
    ) -> Result<Option<&ScriptScope>, AutomationError> {
        if self.node.display() == display {
            let display_text = display;
            tracing::debug!(element = %self.node.object_name(), display = display_text, "display already matched");
            return Ok(Some(self));
        }

        let node = &self.node;
        let outcome = first_event(
            self.node.mutations(),
            wait.timeout,
            &format!("display: {display}"),
            move |mutation| {
                (mutation == Mutation::Attributes && node.display() == display).then_some(())
            },
        )
        .await;

        match outcome {
            WaitOutcome::Found(()) => {
                let display_text = display;
                tracing::debug!(element = %self.node.object_name(), display = display_text, "display became");
                Ok(Some(self))
            }
            WaitOutcome::TimedOut => timed_out(wait.error_message),
        }
    }

    /// Same contract as [`Self::wait_for_display`], for text content.
    pub async fn wait_for_text(
        &self,
        inner_text: &str,
        wait: Wait,
    ) -> Result<Option<&ScriptScope>, AutomationError> {
        if self.node.inner_text() == inner_text {
            tracing::debug!(element = %self.node.object_name(), inner_text, "text already matched");
            return Ok(Some(self));
        }

        let node = &self.node;
        let outcome = first_event(
            self.node.mutations(),
            wait.timeout,
            &format!("innerText == {inner_text}"),
            move |mutation| {
                (mutation == Mutation::CharacterData && node.inner_text() == inner_text)
                    .then_some(())
            },
        )
        .await;

        match outcome {
            WaitOutcome::Found(()) => Ok(Some(self)),
            WaitOutcome::TimedOut => timed_out(wait.error_message),
        }
    }
}

/// Wait for one occurrence of a named page event, e.g. a frame's "load".
pub async fn one_shot(
    node: &NodeHandle,
    event_name: &str,
    error_message: Option<&str>,
) -> Result<Option<()>, AutomationError> {
    let outcome = first_event(node.events(), TIMEOUT, event_name, |name: String| {
        (name == event_name).then_some(())
    })
    .await;

    match outcome {
        WaitOutcome::Found(()) => {
            tracing::debug!(event = event_name, element = %node.object_name(), "event fired");
            Ok(Some(()))
        }
        WaitOutcome::TimedOut => timed_out(error_message.map(str::to_string)),
    }
}
