use crate::protocol::PanelMessage;
use crate::tr;

/// Progress of one multi-report store operation, folded from the step and
/// error messages the automation side posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreProgress {
    pub active: bool,
    pub step: u32,
    pub count: Option<u32>,
    pub message: Option<String>,
    pub error_message: Option<String>,
}

impl StoreProgress {
    /// Fold one port message into the progress view. Store/break requests
    /// travel the other way and are ignored here.
    pub fn apply(&mut self, message: &PanelMessage) {
        match message {
            PanelMessage::Step { step, count, log } => {
                if Some(*step) == *count {
                    self.active = false;
                    self.message = None;
                    return;
                }
                self.active = true;
                self.error_message = None;
                self.step = *step;
                self.count = *count;
                self.message = Some(
                    log.clone()
                        .unwrap_or_else(|| tr::FILLING_IN_PROGRESS.to_string()),
                );
            }
            PanelMessage::Error { message, source } => {
                self.error_message = Some(match source {
                    Some(source) => format!("[{source}] {message}"),
                    None => message.clone(),
                });
                self.message = None;
            }
            _ => {}
        }
    }

    /// Completed without an error report.
    pub fn is_done(&self) -> bool {
        !self.active && self.error_message.is_none()
    }

    /// Completion percentage for progress display, when the total is known.
    pub fn percentage(&self) -> Option<u32> {
        self.count.map(|count| self.step * 100 / count.max(1))
    }
}
