use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use super::{Bps, Grosze, Insured, Rate};

/// Period identifier of a declaration set: zero-padded serial plus "MM-YYYY".
pub type ReportKey = (String, String);

/// Statutory parameters the contribution formulas run against. Persisted as
/// individual keys of the "local" storage namespace, next to the insured
/// list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionParams {
    /// Global minimum-wage override; 0 defers to the dated table.
    pub minimal: Grosze,
    pub cost_of_obtaining: Grosze,
    pub tax_free_allowance: Grosze,
    pub free_amount: Grosze,
    pub tax_rate: Bps,
    pub health: Bps,
    pub pension_insurance: Rate,
    pub disability_insurance: Rate,
    pub medical_insurance: Rate,
    pub accident_insurance: Rate,
    pub guaranteed_employee_benefits_fund: Rate,
}

impl Default for ContributionParams {
    fn default() -> Self {
        Self {
            minimal: 0,
            cost_of_obtaining: 25_000,
            tax_free_allowance: 3_000_000,
            free_amount: 45_000,
            tax_rate: 1200,
            health: 900,
            pension_insurance: Rate::split(1952, 976),
            disability_insurance: Rate::split(800, 150),
            medical_insurance: Rate::split(245, 245),
            accident_insurance: Rate::employer_only(167),
            guaranteed_employee_benefits_fund: Rate::employer_only(0),
        }
    }
}

/// Everything kept in the "local" storage namespace: the insured list plus
/// the statutory parameters, as one flat record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalState {
    #[serde(default)]
    pub insured: Vec<Insured>,
    #[serde(flatten)]
    pub params: ContributionParams,
}

/// The current report identifier, kept in the "session" namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub serial: u32,
    pub month: u32,
    pub year: i32,
    #[serde(rename = "useLastMonth")]
    pub use_last_month: bool,
}

impl Default for SessionParams {
    fn default() -> Self {
        let (month, year) = last_month();
        Self {
            serial: 1,
            month,
            year,
            use_last_month: true,
        }
    }
}

impl SessionParams {
    /// Effective reporting period, recomputed from the wall clock while
    /// "use last month" is set.
    pub fn period(&self) -> (u32, i32) {
        if self.use_last_month {
            last_month()
        } else {
            (self.month, self.year)
        }
    }

    pub fn identifier(&self) -> ReportKey {
        let (month, year) = self.period();
        (format!("{:02}", self.serial), format_period(month, year))
    }
}

/// The last calendar month as (month, year).
pub fn last_month() -> (u32, i32) {
    let today = Local::now().date_naive();
    if today.month() == 1 {
        (12, today.year() - 1)
    } else {
        (today.month() - 1, today.year())
    }
}

pub fn format_period(month: u32, year: i32) -> String {
    format!("{month:02}-{year:04}")
}

/// One entry of the dated minimum-wage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedMinimum {
    pub year: i32,
    pub month: u32,
    pub amount: Grosze,
}

/// Minimum wage effective for the given period: the configured override
/// wins when set; otherwise the table entry with the greatest period tag not
/// exceeding the requested period. On equal tags the later entry wins.
pub fn minimum_for(
    month: u32,
    year: i32,
    params: &ContributionParams,
    table: &[DatedMinimum],
) -> Grosze {
    if params.minimal > 0 {
        return params.minimal;
    }

    let tag = year * 100 + month as i32;
    let mut best_tag = 0;
    let mut amount = 0;
    for dated in table {
        let dated_tag = dated.year * 100 + dated.month as i32;
        if dated_tag > tag {
            continue;
        }
        if dated_tag < best_tag {
            continue;
        }
        best_tag = dated_tag;
        amount = dated.amount;
    }
    amount
}
