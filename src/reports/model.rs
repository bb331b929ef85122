use serde::Serialize;
use std::fmt;

use crate::domain::Grosze;
use crate::tr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
}

/// How a resolved field is presented: alignment, text around and between
/// values, and the number of decimal digits (-1 for plain text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldFormat {
    pub align: Align,
    pub prefix: &'static str,
    pub infix: &'static str,
    pub suffix: &'static str,
    pub digits: i8,
}

pub const NUMBER_FORMAT: FieldFormat = FieldFormat {
    align: Align::Right,
    prefix: "",
    infix: "\u{a0}",
    suffix: "",
    digits: 2,
};

pub const STRING_FORMAT: FieldFormat = FieldFormat {
    align: Align::Left,
    prefix: "",
    infix: "\u{a0}",
    suffix: "",
    digits: -1,
};

pub const MONEY_FORMAT: FieldFormat = FieldFormat {
    suffix: tr::SUFFIX_MONEY,
    ..NUMBER_FORMAT
};

pub const PERCENT_FORMAT: FieldFormat = FieldFormat {
    suffix: tr::SUFFIX_PERCENT,
    ..NUMBER_FORMAT
};

pub const RIGHT_ALIGNED_STRING: FieldFormat = FieldFormat {
    align: Align::Right,
    ..STRING_FORMAT
};

pub const TIME_RATIO: FieldFormat = FieldFormat {
    infix: "/",
    ..RIGHT_ALIGNED_STRING
};

/// A resolved field value: free text, a two-decimal fixed-point amount, or
/// an ordered list of text values (one per target sub-input).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Amount(Grosze),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportField {
    pub id: u32,
    pub value: FieldValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub id: String,
    pub fields: Vec<ReportField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportType {
    #[serde(rename = "ZUS RCA")]
    Rca,
    #[serde(rename = "ZUS DRA")]
    Dra,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Rca => "ZUS RCA",
            ReportType::Dra => "ZUS DRA",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A display-ready declaration: ordered sections of ordered fields. This is
/// the shape sent to the automation side and rendered by the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub sections: Vec<ReportSection>,
}

/// Authoring form of one field: a reference expression plus presentation
/// hints. References use a small fixed grammar: a bare literal resolves to
/// itself, `$a.b.c` is a dotted path into the computed record, `$+n1,n2,…`
/// sums other fields of the same section.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTemplate {
    pub reference: RefSpec,
    pub format: Option<FieldFormat>,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefSpec {
    Text(&'static str),
    Number(i64),
    Tuple(Vec<&'static str>),
}

impl FieldTemplate {
    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

pub fn field(reference: &'static str) -> FieldTemplate {
    FieldTemplate {
        reference: RefSpec::Text(reference),
        format: None,
        hidden: false,
    }
}

pub fn number(value: i64) -> FieldTemplate {
    FieldTemplate {
        reference: RefSpec::Number(value),
        format: None,
        hidden: false,
    }
}

pub fn tuple(references: &[&'static str]) -> FieldTemplate {
    FieldTemplate {
        reference: RefSpec::Tuple(references.to_vec()),
        format: None,
        hidden: false,
    }
}

pub fn percent(reference: &'static str) -> FieldTemplate {
    field(reference).with_format(PERCENT_FORMAT)
}

/// Authoring form of one report section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTemplate {
    pub id: &'static str,
    pub fields: Vec<(u32, FieldTemplate)>,
}

pub fn section(id: &'static str, fields: Vec<(u32, FieldTemplate)>) -> SectionTemplate {
    SectionTemplate { id, fields }
}
