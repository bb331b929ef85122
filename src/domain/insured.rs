use serde::{Deserialize, Serialize};

use super::Grosze;
use crate::tr;

/// Fraction of full-time employment, e.g. (1, 2) for half-time.
pub type Ratio = (i64, i64);

/// One insured employee. The PESEL number is the stable identity used for
/// add/update/remove; `salary` absent means "minimum wage for the period",
/// `ratio` absent means full-time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insured {
    pub name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    pub pesel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<Grosze>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<Ratio>,
}

impl Insured {
    /// Collect every problem with the record as a human-readable list; an
    /// empty list means the record is acceptable. Problems are reported all
    /// at once so the user can correct everything in one pass.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push(tr::VALIDATE_NAME_MISSING.to_string());
        }
        if self.family_name.trim().is_empty() {
            problems.push(tr::VALIDATE_FAMILY_NAME_MISSING.to_string());
        }
        if self.pesel.len() != 11 || !self.pesel.bytes().all(|b| b.is_ascii_digit()) {
            problems.push(tr::validate_pesel(&self.pesel));
        }
        if let Some(salary) = self.salary {
            if salary < 0 {
                problems.push(tr::VALIDATE_SALARY_NEGATIVE.to_string());
            }
        }
        if let Some((numerator, denominator)) = self.ratio {
            if numerator <= 0 || denominator <= 0 || numerator > denominator {
                problems.push(tr::VALIDATE_RATIO_INVALID.to_string());
            }
        }
        problems
    }

    /// Work-time fraction with the full-time default applied.
    pub fn work_time_ratio(&self) -> Ratio {
        self.ratio.unwrap_or((1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_insured() -> Insured {
        Insured {
            name: "Jan".into(),
            family_name: "Kowalski".into(),
            pesel: "85010212345".into(),
            salary: Some(500_000),
            ratio: None,
        }
    }

    #[test]
    fn test_valid_record_has_no_problems() {
        assert!(valid_insured().validate().is_empty());
    }

    #[test]
    fn test_bad_pesel_is_reported() {
        let mut insured = valid_insured();
        insured.pesel = "123".into();
        assert_eq!(insured.validate().len(), 1);

        insured.pesel = "1234567890a".into();
        assert_eq!(insured.validate().len(), 1);
    }

    #[test]
    fn test_problems_are_batched() {
        let insured = Insured {
            name: "".into(),
            family_name: " ".into(),
            pesel: "x".into(),
            salary: Some(-1),
            ratio: Some((3, 2)),
        };
        assert_eq!(insured.validate().len(), 5);
    }

    #[test]
    fn test_ratio_defaults_to_full_time() {
        assert_eq!(valid_insured().work_time_ratio(), (1, 1));

        let mut insured = valid_insured();
        insured.ratio = Some((1, 2));
        assert_eq!(insured.work_time_ratio(), (1, 2));
    }
}
