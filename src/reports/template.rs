use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use super::model::{
    FieldFormat, FieldTemplate, FieldValue, RefSpec, ReportField, ReportSection, SectionTemplate,
    MONEY_FORMAT,
};

/// Compiled form of a field reference, interpreted by the resolver.
#[derive(Debug, Clone, PartialEq)]
enum CompiledRef {
    Text(String),
    Number(i64),
    Path(Vec<String>),
    Sum(Vec<u32>),
    Tuple(Vec<CompiledRef>),
}

#[derive(Debug, Clone)]
struct CompiledField {
    reference: CompiledRef,
    format: Option<FieldFormat>,
    hidden: bool,
}

fn compile_single(reference: &str) -> CompiledRef {
    if let Some(ids) = reference.strip_prefix("$+") {
        CompiledRef::Sum(
            ids.split(',')
                .filter_map(|id| id.trim().parse().ok())
                .collect(),
        )
    } else if let Some(path) = reference.strip_prefix('$') {
        CompiledRef::Path(path.split('.').map(str::to_string).collect())
    } else {
        CompiledRef::Text(reference.to_string())
    }
}

fn compile_field(template: &FieldTemplate) -> CompiledField {
    let reference = match &template.reference {
        RefSpec::Text(text) => compile_single(text),
        RefSpec::Number(value) => CompiledRef::Number(*value),
        RefSpec::Tuple(items) => {
            CompiledRef::Tuple(items.iter().map(|item| compile_single(item)).collect())
        }
    };
    // summation-only fields exist to feed the target page's readonly inputs
    let has_sum = match &reference {
        CompiledRef::Sum(_) => true,
        CompiledRef::Tuple(items) => items.iter().any(|item| matches!(item, CompiledRef::Sum(_))),
        _ => false,
    };
    CompiledField {
        reference,
        format: template.format,
        hidden: template.hidden || has_sum,
    }
}

/// Walk a dotted path into the serialized computed record. The path must end
/// on a leaf; landing on a nested record is an authoring error, reported and
/// treated as unresolved.
fn lookup_path(record: &Value, path: &[String]) -> Option<FieldValue> {
    let full_path = path.join(".");
    let mut current = record;
    for name in path {
        match current.get(name) {
            Some(next) => current = next,
            None => {
                tracing::error!(path = %full_path, missing = %name, "cannot find reference in report record");
                return None;
            }
        }
    }
    match current {
        Value::String(text) => Some(FieldValue::Text(text.clone())),
        Value::Number(number) => match number.as_i64() {
            Some(value) => Some(FieldValue::Amount(value)),
            None => {
                tracing::error!(path = %full_path, "reference is not a fixed-point number");
                None
            }
        },
        Value::Array(items) => {
            let texts: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            if texts.is_none() {
                tracing::error!(path = %full_path, "reference list holds non-text values");
            }
            texts.map(FieldValue::List)
        }
        _ => {
            tracing::error!(path = %full_path, "reference points to a sub-record");
            None
        }
    }
}

/// One operand of a summation: a field id resolved within the same section.
/// A field id the template does not define contributes nothing; a field
/// already being resolved poisons the whole sum instead of looping.
fn sum_term(
    record: &Value,
    section: &BTreeMap<u32, CompiledField>,
    id: u32,
    in_progress: &mut HashSet<u32>,
) -> Option<i64> {
    let Some(field) = section.get(&id) else {
        return Some(0);
    };
    if !in_progress.insert(id) {
        return None;
    }
    let term = match &field.reference {
        CompiledRef::Number(value) => Some(*value),
        CompiledRef::Path(path) => match lookup_path(record, path) {
            Some(FieldValue::Amount(value)) => Some(value),
            _ => None,
        },
        CompiledRef::Sum(ids) => resolve_sum(record, section, ids, in_progress),
        _ => None,
    };
    in_progress.remove(&id);
    term
}

fn resolve_sum(
    record: &Value,
    section: &BTreeMap<u32, CompiledField>,
    ids: &[u32],
    in_progress: &mut HashSet<u32>,
) -> Option<i64> {
    // grosze arithmetic is exact, so the statutory two-decimal rounding of
    // the sum is a no-op here
    let mut total = 0;
    for &id in ids {
        total += sum_term(record, section, id, in_progress)?;
    }
    Some(total)
}

fn stringify(value: FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text,
        FieldValue::Amount(value) => value.to_string(),
        FieldValue::List(items) => items.join(","),
    }
}

fn resolve_reference(
    record: &Value,
    section: &BTreeMap<u32, CompiledField>,
    reference: &CompiledRef,
    in_progress: &mut HashSet<u32>,
) -> Option<FieldValue> {
    match reference {
        CompiledRef::Text(text) => Some(FieldValue::Text(text.clone())),
        CompiledRef::Number(value) => Some(FieldValue::Amount(*value)),
        CompiledRef::Path(path) => lookup_path(record, path),
        CompiledRef::Sum(ids) => {
            resolve_sum(record, section, ids, in_progress).map(FieldValue::Amount)
        }
        CompiledRef::Tuple(items) => items
            .iter()
            .map(|item| {
                resolve_reference(record, section, item, in_progress).map(stringify)
            })
            .collect::<Option<Vec<String>>>()
            .map(FieldValue::List),
    }
}

fn resolve_field(
    record: &Value,
    section: &BTreeMap<u32, CompiledField>,
    id: u32,
    field: &CompiledField,
) -> Option<ReportField> {
    let mut in_progress = HashSet::from([id]);
    let value = resolve_reference(record, section, &field.reference, &mut in_progress)?;
    let format = field.format.or(match value {
        FieldValue::Amount(_) => Some(MONEY_FORMAT),
        _ => None,
    });
    Some(ReportField {
        id,
        value,
        format,
        hidden: field.hidden,
    })
}

/// Resolve a report template against a serialized computed record. Fields
/// whose reference cannot be resolved are omitted; the remaining fields come
/// out ordered by ascending field id.
pub fn resolve_sections(record: &Value, templates: &[SectionTemplate]) -> Vec<ReportSection> {
    templates
        .iter()
        .map(|template| {
            let compiled: BTreeMap<u32, CompiledField> = template
                .fields
                .iter()
                .map(|(id, field)| (*id, compile_field(field)))
                .collect();
            let fields = compiled
                .iter()
                .filter_map(|(id, field)| resolve_field(record, &compiled, *id, field))
                .collect();
            ReportSection {
                id: template.id.to_string(),
                fields,
            }
        })
        .collect()
}
