use serde::{Deserialize, Serialize};

use super::{apply_rate, Bps, Grosze};

/// A statutory contribution rate, optionally split between the payer and the
/// insured person. When `insured` is absent the whole rate falls on the
/// employer (e.g. accident insurance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub total: Bps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insured: Option<Bps>,
}

impl Rate {
    pub fn employer_only(total: Bps) -> Self {
        Self {
            total,
            insured: None,
        }
    }

    pub fn split(total: Bps, insured: Bps) -> Self {
        Self {
            total,
            insured: Some(insured),
        }
    }

    /// Invariant check: `total >= 0` and, when present,
    /// `0 <= insured <= total`.
    pub fn is_valid(&self) -> bool {
        self.total >= 0
            && self
                .insured
                .map_or(true, |insured| insured >= 0 && insured <= self.total)
    }
}

/// One contribution, split between the contribution payer (employer) and the
/// insured person (employee). Field names follow the ZUS declaration forms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    #[serde(rename = "platnik_skladek")]
    pub employer: Grosze,
    #[serde(rename = "ubezpieczony")]
    pub employee: Grosze,
}

impl Contribution {
    pub const ZERO: Contribution = Contribution {
        employer: 0,
        employee: 0,
    };

    /// Element-wise sum, used when folding per-employee contributions into
    /// the aggregate declaration.
    pub fn combine(self, other: Contribution) -> Contribution {
        Contribution {
            employer: self.employer + other.employer,
            employee: self.employee + other.employee,
        }
    }
}

/// Split a rate over a contribution base. Each side is rounded to the grosz
/// independently.
pub fn calc_part(base: Grosze, rate: Rate) -> Contribution {
    let Some(insured) = rate.insured else {
        return Contribution {
            employer: apply_rate(base, rate.total),
            employee: 0,
        };
    };
    Contribution {
        employer: apply_rate(base, rate.total - insured),
        employee: apply_rate(base, insured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_part_split() {
        // pension: 19.52% total, 9.76% insured, base 5000.00 zł
        let part = calc_part(500_000, Rate::split(1952, 976));
        assert_eq!(part.employee, 48_800);
        assert_eq!(part.employer, 48_800);
    }

    #[test]
    fn test_calc_part_employer_only() {
        // accident: 1.67% with no insured share
        let part = calc_part(500_000, Rate::employer_only(167));
        assert_eq!(part.employer, 8_350);
        assert_eq!(part.employee, 0);
    }

    #[test]
    fn test_calc_part_disability() {
        // disability: 8% total, 1.5% insured
        let part = calc_part(500_000, Rate::split(800, 150));
        assert_eq!(part.employee, 7_500);
        assert_eq!(part.employer, 32_500);
    }

    #[test]
    fn test_combine() {
        let a = Contribution {
            employer: 100,
            employee: 50,
        };
        let b = Contribution {
            employer: 30,
            employee: 20,
        };
        let sum = a.combine(b);
        assert_eq!(sum.employer, 130);
        assert_eq!(sum.employee, 70);
        assert_eq!(Contribution::ZERO.combine(a), a);
    }

    #[test]
    fn test_rate_validity() {
        assert!(Rate::split(1952, 976).is_valid());
        assert!(Rate::employer_only(167).is_valid());
        assert!(Rate::split(800, 800).is_valid());
        assert!(!Rate::split(800, 900).is_valid());
        assert!(!Rate::employer_only(-1).is_valid());
        assert!(!Rate::split(800, -1).is_valid());
    }
}
