use std::time::Duration;

use crate::domain::format_grosze;
use crate::protocol::{PanelMessage, Port};
use crate::reports::{FieldValue, Report, ReportType};
use crate::tr;

use super::page::NodeHandle;
use super::script::{one_shot, AutomationError, Query, ScriptScope, Wait};
use super::wait::{sleep_for, INTERVAL, TIMEOUT};

// Fixed selectors of the target portal, by observation.
const DOCUMENT_LIST: &str = "#listaTypowDokumentow";
const DOCUMENT_MENU: &str = "#EPL0012";
const DOCUMENT_TYPE_ROWS: &str = "#GridTypowDokumentow .dojoxGridMasterView table tr";
const DOCUMENT_TYPE_CELL: &str = "td";
const ADD_DOCUMENT_BUTTON: &str = "#typeDokDodajBtnId";
const FORM_IFRAME: &str = "#html-form-iframe";
const AJAX_LOADER: &str = ".ajax-loader";
const MODAL: &str = "#pgwModal";
const MODAL_TEXT: &str = ".short-text";
const MODAL_CLOSE: &str = ".pm-close";
const SEND_FORM: &str = "#send-form";
const CLOSE_FORM: &str = "#close-form-fake";
const CLOSE_FORM_CONFIRM: &str = "#popup-close-form-btn";

const SETTLE_SHORT: Duration = Duration::from_millis(200);
const SETTLE_LONG: Duration = Duration::from_millis(1000);

/// Target input id for a section field: `_S_pF` with every `.` in the
/// section id replaced by `-C1_`.
pub fn input_id(section_id: &str, field_id: u32) -> String {
    format!("_{}_p{}", section_id.replace('.', "-C1_"), field_id)
}

/// One planned write: target input id, formatted value, and the
/// human-readable field address used in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillEntry {
    pub input_id: String,
    pub value: String,
    pub address: String,
}

/// Flatten a report into the deterministic list of input writes. Amounts
/// become fixed two-decimal strings; list values expand to one write per
/// element with a 1-based `_pI` suffix.
pub fn fill_entries(report: &Report) -> Vec<FillEntry> {
    let mut entries = Vec::new();
    for report_section in &report.sections {
        for report_field in &report_section.fields {
            let key = input_id(&report_section.id, report_field.id);
            let address = format!("{}, p. {}", report_section.id, report_field.id);
            match &report_field.value {
                FieldValue::List(items) => {
                    for (index, item) in items.iter().enumerate() {
                        entries.push(FillEntry {
                            input_id: format!("{}_p{}", key, index + 1),
                            value: item.clone(),
                            address: address.clone(),
                        });
                    }
                }
                FieldValue::Amount(amount) => entries.push(FillEntry {
                    input_id: key,
                    value: format_grosze(*amount),
                    address,
                }),
                FieldValue::Text(text) => entries.push(FillEntry {
                    input_id: key,
                    value: text.clone(),
                    address,
                }),
            }
        }
    }
    entries
}

/// Write every field of the report into the form document. Inputs are looked
/// up exactly once; a missing input aborts with the field's address.
pub async fn fill_report(form: &ScriptScope, report: &Report) -> Result<(), AutomationError> {
    for entry in fill_entries(report) {
        let selector = format!("#{}", entry.input_id);
        match form.query(Query::new(selector).once()).await? {
            Some(input) => {
                tracing::debug!(input = %entry.input_id, value = %entry.value, "fill");
                input.node().set_value(&entry.value);
            }
            None => {
                return Err(AutomationError::new(tr::cannot_resolve_input(
                    &entry.address,
                )));
            }
        }
    }
    Ok(())
}

/// Navigate the portal's document-type list and open a blank form of the
/// given type; resolves to the form frame element once it has loaded.
pub async fn create_empty_document(
    page: &ScriptScope,
    kind: ReportType,
) -> Result<Option<ScriptScope>, AutomationError> {
    let Some(list) = page
        .query_or(
            DOCUMENT_LIST,
            |scope| {
                // the list only exists after the menu entry was opened
                if let Some(menu) = scope.node().query_selector(DOCUMENT_MENU) {
                    menu.click();
                    true
                } else {
                    false
                }
            },
            tr::CANNOT_FIND_DOCUMENT_LIST,
        )
        .await?
    else {
        return Ok(None);
    };

    let row = list
        .query_all(
            Query::new(DOCUMENT_TYPE_ROWS).required(tr::cannot_find_report_switch(kind.as_str())),
            |rows| {
                rows.into_iter().find(|row| {
                    row.query_selector_all(DOCUMENT_TYPE_CELL)
                        .get(2)
                        .is_some_and(|cell| cell.inner_text() == kind.as_str())
                })
            },
        )
        .await?;
    if let Some(row) = row {
        row.click();
    }

    page.query_and_click(Query::new(ADD_DOCUMENT_BUTTON).required(tr::CANNOT_FIND_ADD_BUTTON))
        .await?;

    let frame = page
        .query(Query::new(FORM_IFRAME).required(tr::CANNOT_FIND_NEW_DOCUMENT))
        .await?;
    if let Some(frame) = &frame {
        one_shot(frame.node(), "load", Some(tr::NEW_DOCUMENT_TOO_SLOW)).await?;
    }
    Ok(frame)
}

struct ModalSpec {
    trigger: &'static str,
    confirmation_text: String,
    close: &'static str,
}

/// Trigger a form-level action and drive its confirmation dialog: wait for
/// the modal with the expected text to show, then dismiss it.
async fn confirm_modal(
    form: &ScriptScope,
    spec: ModalSpec,
) -> Result<Option<ScriptScope>, AutomationError> {
    form.query_and_click(Query::new(spec.trigger).required(tr::CANNOT_FIND_FORM_BUTTON))
        .await?;
    sleep_for(SETTLE_SHORT).await;

    let Some(modal) = form
        .query(Query::new(MODAL).required(tr::CANNOT_FIND_MODAL))
        .await?
    else {
        return Ok(None);
    };

    let text = modal
        .query(
            Query::new(MODAL_TEXT)
                .required(tr::cannot_find_dialog(&spec.confirmation_text))
                .timeout(TIMEOUT * 10)
                .interval(INTERVAL * 3),
        )
        .await?;
    if let Some(text) = &text {
        text.wait_for_text(
            &spec.confirmation_text,
            Wait::required(tr::cannot_find_dialog(&spec.confirmation_text)).timeout(TIMEOUT * 10),
        )
        .await?;
    }

    modal
        .wait_for_display(
            "block",
            Wait::required(tr::dialog_did_not_show(&spec.confirmation_text)).timeout(TIMEOUT * 10),
        )
        .await?;
    sleep_for(SETTLE_SHORT).await;

    let close_button = modal
        .query_and_click(
            Query::new(spec.close).required(tr::cannot_find_dialog_close(&spec.confirmation_text)),
        )
        .await?;
    sleep_for(SETTLE_SHORT).await;
    Ok(close_button)
}

/// Drive one report through its four steps: create an empty document, fill
/// it, save it behind its confirmation dialog, and close the form.
async fn store_one_report(
    page: &ScriptScope,
    port: &Port,
    report: &Report,
    step_offset: u32,
    count: u32,
) -> Result<(), AutomationError> {
    port.post_step(
        step_offset,
        Some(count),
        Some(tr::creating_report(&report.title)),
    );
    let frame = create_empty_document(page, report.kind).await?;
    let form = frame
        .as_ref()
        .and_then(|frame| frame.node().content_document())
        .map(ScriptScope::new)
        .ok_or_else(|| AutomationError::new(tr::cannot_create_report(report.kind.as_str())))?;

    if let Some(loader) = form.query(Query::new(AJAX_LOADER).once()).await? {
        loader.wait_for_display("none", Wait::default()).await?;
    }
    sleep_for(SETTLE_LONG).await;
    tracing::debug!(report = %report.id, "ready to fill");

    port.post_step(
        step_offset + 1,
        Some(count),
        Some(tr::filling_report(&report.title)),
    );
    fill_report(&form, report).await?;

    port.post_step(
        step_offset + 2,
        Some(count),
        Some(tr::saving_report(&report.title)),
    );
    let saved = confirm_modal(
        &form,
        ModalSpec {
            trigger: SEND_FORM,
            confirmation_text: tr::document_saved(report.kind.as_str()),
            close: MODAL_CLOSE,
        },
    )
    .await?;
    if saved.is_none() {
        return Err(AutomationError::new(tr::cannot_save_report(
            report.kind.as_str(),
        )));
    }

    port.post_step(
        step_offset + 3,
        Some(count),
        Some(tr::closing_report(&report.title)),
    );
    let closed = confirm_modal(
        &form,
        ModalSpec {
            trigger: CLOSE_FORM,
            confirmation_text: tr::CONFIRM_CLOSE_FORM.to_string(),
            close: CLOSE_FORM_CONFIRM,
        },
    )
    .await?;
    if closed.is_none() {
        return Err(AutomationError::new(tr::cannot_close_report(
            report.kind.as_str(),
        )));
    }
    Ok(())
}

/// Store a set of reports against the page, strictly one after another. The
/// first automation failure aborts the remaining steps of the current report
/// and every later report, and is reported once with the failing report type.
pub async fn store_reports(page: &ScriptScope, port: &Port, reports: &[Report]) {
    let count = reports.len() as u32 * 4 + 1;
    let mut offset = 1;
    let mut source = None;
    let outcome: Result<(), AutomationError> = async {
        for report in reports {
            source = Some(report.kind.as_str().to_string());
            store_one_report(page, port, report, offset, count).await?;
            offset += 4;
        }
        Ok(())
    }
    .await;

    match outcome {
        Ok(()) => port.post_step(count, Some(count), None),
        Err(error) => {
            tracing::error!(error = %error, "store operation failed");
            port.post_error(error.message, source);
        }
    }
}

/// Automation-side loop: react to `Store` requests until the peer goes away.
/// `Break` is acknowledged in the log only.
pub async fn run_automation(page: NodeHandle, mut port: Port) {
    let page = ScriptScope::new(page);
    while let Some(message) = port.recv().await {
        match message {
            PanelMessage::Store { reports, .. } => {
                tracing::info!(reports = reports.len(), "store requested");
                store_reports(&page, &port, &reports).await;
            }
            PanelMessage::Break => {
                tracing::debug!("break requested");
            }
            _ => {}
        }
    }
}
