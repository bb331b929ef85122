//! Typed envelope carried between the controller side (which owns the
//! computed reports) and the automation side (which drives the target page).
//! Delivery is reliable and ordered; there is no acknowledgement layer.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::reports::{DraReport, RcaReport, Report};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanelMessage {
    /// Controller → automation: store this set of declarations.
    Store {
        reports: Vec<Report>,
        #[serde(rename = "rcaReports")]
        rca_reports: Vec<RcaReport>,
        #[serde(rename = "draReport")]
        dra_report: DraReport,
    },
    /// Automation → controller: progress, `step` out of `count`.
    Step {
        step: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        log: Option<String>,
    },
    /// Automation → controller: the in-flight operation failed.
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    /// Controller → automation: stop request (carried by the protocol but
    /// not wired to interrupt an in-flight step).
    Break,
}

/// One end of the bidirectional channel. Owned by whichever component drives
/// that side; posting never blocks, receiving yields messages in order.
pub struct Port {
    tx: mpsc::UnboundedSender<PanelMessage>,
    rx: mpsc::UnboundedReceiver<PanelMessage>,
}

/// Create a connected pair of port ends.
pub fn pair() -> (Port, Port) {
    let (a_tx, a_rx) = mpsc::unbounded_channel();
    let (b_tx, b_rx) = mpsc::unbounded_channel();
    (
        Port { tx: a_tx, rx: b_rx },
        Port { tx: b_tx, rx: a_rx },
    )
}

impl Port {
    pub fn post(&self, message: PanelMessage) {
        if self.tx.send(message).is_err() {
            tracing::warn!("posting to a disconnected port");
        }
    }

    pub async fn recv(&mut self) -> Option<PanelMessage> {
        self.rx.recv().await
    }

    pub fn post_store(
        &self,
        reports: Vec<Report>,
        rca_reports: Vec<RcaReport>,
        dra_report: DraReport,
    ) {
        self.post(PanelMessage::Store {
            reports,
            rca_reports,
            dra_report,
        });
    }

    pub fn post_step(&self, step: u32, count: Option<u32>, log: Option<String>) {
        self.post(PanelMessage::Step { step, count, log });
    }

    pub fn post_error(&self, message: String, source: Option<String>) {
        self.post(PanelMessage::Error { message, source });
    }

    pub fn post_break(&self) {
        self.post(PanelMessage::Break);
    }
}
