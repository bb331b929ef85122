use serde::{Deserialize, Serialize};

use crate::domain::{
    apply_rate, calc_part, div_round_half_up, minimum_for, positive, round_to_zloty, scale_ratio,
    Contribution, ContributionParams, DatedMinimum, Grosze, Insured, ReportKey,
};

use super::model::{field, section, tuple, SectionTemplate, TIME_RATIO};

/// Work-time fraction as it appears on the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTimeRatio {
    pub dzielnik: i64,
    pub dzielna: i64,
}

/// Gross/net salary figures derived from the contribution base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryFigures {
    pub brutto: Grosze,
    pub netto: Grosze,
    pub brutto_platnika: Grosze,
}

/// Total cost split between the insured person and the contribution payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentCost {
    pub ubezpieczonego: Grosze,
    pub platnika: Grosze,
}

/// Fully computed per-employee declaration record. Field names follow the
/// RCA form vocabulary; the report templates address them by these names.
/// Recomputed wholesale whenever the inputs or the period change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcaReport {
    pub key: ReportKey,
    pub imie: String,
    pub nazwisko: String,
    pub pesel: String,
    pub wymiar_czasu_pracy: WorkTimeRatio,
    pub pensja: SalaryFigures,
    pub podstawa: Grosze,
    pub kwota_obnizajaca_podatek: Grosze,
    pub ubezpieczenie_chorobowe: Contribution,
    pub ubezpieczenie_emerytalne: Contribution,
    pub ubezpieczenie_rentowe: Contribution,
    pub ubezpieczenie_wypadkowe: Contribution,
    pub fgsp: Contribution,
    pub skladki: Grosze,
    pub podstawa_na_zdrowotne: Grosze,
    pub zaliczka: Grosze,
    pub podatek: Grosze,
    pub skladka_spoleczna: Grosze,
    pub skladka_zdrowotna: Grosze,
    pub koszt: EmploymentCost,
}

/// Compute one employee's RCA record from the payroll inputs and the
/// statutory parameters. Pure: a missing salary falls back to the minimum
/// wage for the period, a missing ratio means full-time.
pub fn compute_rca(
    insured: &Insured,
    params: &ContributionParams,
    key: ReportKey,
    month: u32,
    year: i32,
    minimum_wage: &[DatedMinimum],
) -> RcaReport {
    let (dzielnik, dzielna) = insured.work_time_ratio();
    let salary = insured
        .salary
        .unwrap_or_else(|| minimum_for(month, year, params, minimum_wage));
    let podstawa = scale_ratio(salary, dzielnik, dzielna);

    let kwota_obnizajaca_podatek = div_round_half_up(
        params.tax_free_allowance as i128 * params.tax_rate as i128,
        10_000 * 12,
    );

    let ubezpieczenie_chorobowe = calc_part(podstawa, params.medical_insurance);
    let ubezpieczenie_emerytalne = calc_part(podstawa, params.pension_insurance);
    let ubezpieczenie_rentowe = calc_part(podstawa, params.disability_insurance);
    let ubezpieczenie_wypadkowe = calc_part(podstawa, params.accident_insurance);
    let fgsp = calc_part(podstawa, params.guaranteed_employee_benefits_fund);

    let skladki = ubezpieczenie_chorobowe.employee
        + ubezpieczenie_emerytalne.employee
        + ubezpieczenie_rentowe.employee;

    let podstawa_na_zdrowotne =
        round_to_zloty(positive(podstawa - (skladki + params.cost_of_obtaining)));
    let zaliczka = apply_rate(podstawa_na_zdrowotne, params.tax_rate);
    let podatek = positive(zaliczka - params.free_amount);

    // statutory cap: the health contribution never exceeds what the
    // allowance-adjusted tax would have been
    let health_lowered = positive(zaliczka - kwota_obnizajaca_podatek);
    let health_candidate = apply_rate(positive(podstawa - skladki), params.health);
    let skladka_zdrowotna = health_candidate.min(health_lowered);

    let koszt = EmploymentCost {
        ubezpieczonego: skladki + podatek + skladka_zdrowotna,
        platnika: ubezpieczenie_chorobowe.employer
            + ubezpieczenie_emerytalne.employer
            + ubezpieczenie_rentowe.employer
            + ubezpieczenie_wypadkowe.employer
            + fgsp.employer,
    };

    let skladka_spoleczna = skladki + koszt.platnika;

    let pensja = SalaryFigures {
        brutto: podstawa,
        netto: positive(podstawa - koszt.ubezpieczonego),
        brutto_platnika: podstawa + koszt.platnika,
    };

    RcaReport {
        key,
        imie: insured.name.clone(),
        nazwisko: insured.family_name.clone(),
        pesel: insured.pesel.clone(),
        wymiar_czasu_pracy: WorkTimeRatio { dzielnik, dzielna },
        pensja,
        podstawa,
        kwota_obnizajaca_podatek,
        ubezpieczenie_chorobowe,
        ubezpieczenie_emerytalne,
        ubezpieczenie_rentowe,
        ubezpieczenie_wypadkowe,
        fgsp,
        skladki,
        podstawa_na_zdrowotne,
        zaliczka,
        podatek,
        skladka_spoleczna,
        skladka_zdrowotna,
        koszt,
    }
}

/// Field layout of the RCA form.
pub fn rca_template() -> Vec<SectionTemplate> {
    vec![
        section("I", vec![(1, field("$key"))]),
        section(
            "III.A",
            vec![
                (1, field("$nazwisko")),
                (2, field("$imie")),
                (3, field("P")),
                (4, field("$pesel")),
            ],
        ),
        section(
            "III.B",
            vec![
                (1, tuple(&["0110", "0", "0"])),
                (
                    3,
                    tuple(&["$wymiar_czasu_pracy.dzielnik", "$wymiar_czasu_pracy.dzielna"])
                        .with_format(TIME_RATIO),
                ),
                //
                (4, field("$pensja.brutto")),
                (5, field("$pensja.brutto")),
                (6, field("$pensja.brutto")),
                //
                (7, field("$ubezpieczenie_emerytalne.ubezpieczony")),
                (8, field("$ubezpieczenie_rentowe.ubezpieczony")),
                (9, field("$ubezpieczenie_chorobowe.ubezpieczony")),
                (10, field("$ubezpieczenie_wypadkowe.ubezpieczony")),
                //
                (11, field("$ubezpieczenie_emerytalne.platnik_skladek")),
                (12, field("$ubezpieczenie_rentowe.platnik_skladek")),
                (13, field("$ubezpieczenie_chorobowe.platnik_skladek")),
                (14, field("$ubezpieczenie_wypadkowe.platnik_skladek")),
                //
                (29, field("$skladka_spoleczna").hidden()),
            ],
        ),
        section(
            "III.C",
            vec![
                (1, field("$podstawa_na_zdrowotne")),
                (4, field("$skladka_zdrowotna")),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::domain::Rate;

    use super::*;

    fn default_key() -> ReportKey {
        ("01".to_string(), "01-2025".to_string())
    }

    fn employee(salary: Option<Grosze>, ratio: Option<(i64, i64)>) -> Insured {
        Insured {
            name: "Jan".into(),
            family_name: "Kowalski".into(),
            pesel: "85010212345".into(),
            salary,
            ratio,
        }
    }

    /// The worked reference example: salary 5000.00 zł, full time, default
    /// statutory parameters, January 2025.
    #[test]
    fn test_reference_computation() {
        let report = compute_rca(
            &employee(Some(500_000), None),
            &ContributionParams::default(),
            default_key(),
            1,
            2025,
            &[],
        );

        assert_eq!(report.podstawa, 500_000);
        assert_eq!(report.ubezpieczenie_emerytalne.employee, 48_800);
        assert_eq!(report.ubezpieczenie_rentowe.employee, 7_500);
        assert_eq!(report.ubezpieczenie_chorobowe.employee, 12_250);
        assert_eq!(report.skladki, 68_550);
        assert_eq!(report.podstawa_na_zdrowotne, 406_500);
        assert_eq!(report.zaliczka, 48_780);
        assert_eq!(report.podatek, 3_780);
        assert_eq!(report.kwota_obnizajaca_podatek, 30_000);
        // candidate 388.31 zł capped by the allowance-reduced tax 187.80 zł
        assert_eq!(report.skladka_zdrowotna, 18_780);
        assert_eq!(report.pensja.netto, 408_890);
        assert_eq!(report.pensja.brutto, 500_000);
    }

    #[test]
    fn test_employer_side_costs() {
        let report = compute_rca(
            &employee(Some(500_000), None),
            &ContributionParams::default(),
            default_key(),
            1,
            2025,
            &[],
        );
        // 9.76% + 6.5% + 0% + 1.67% of the base, plus an empty benefits fund
        assert_eq!(report.ubezpieczenie_emerytalne.employer, 48_800);
        assert_eq!(report.ubezpieczenie_rentowe.employer, 32_500);
        assert_eq!(report.ubezpieczenie_chorobowe.employer, 0);
        assert_eq!(report.ubezpieczenie_wypadkowe.employer, 8_350);
        assert_eq!(report.fgsp.employer, 0);
        assert_eq!(report.koszt.platnika, 89_650);
        assert_eq!(report.skladka_spoleczna, 68_550 + 89_650);
        assert_eq!(report.pensja.brutto_platnika, 589_650);
    }

    #[test]
    fn test_ratio_scales_the_base() {
        let report = compute_rca(
            &employee(Some(500_000), Some((1, 2))),
            &ContributionParams::default(),
            default_key(),
            1,
            2025,
            &[],
        );
        assert_eq!(report.podstawa, 250_000);
        assert_eq!(report.wymiar_czasu_pracy.dzielnik, 1);
        assert_eq!(report.wymiar_czasu_pracy.dzielna, 2);
    }

    #[test]
    fn test_missing_salary_uses_minimum_wage() {
        let table = [DatedMinimum {
            year: 2025,
            month: 1,
            amount: 466_600,
        }];
        let report = compute_rca(
            &employee(None, None),
            &ContributionParams::default(),
            default_key(),
            1,
            2025,
            &table,
        );
        assert_eq!(report.podstawa, 466_600);
    }

    #[test]
    fn test_low_base_never_goes_negative() {
        let report = compute_rca(
            &employee(Some(10_000), None),
            &ContributionParams::default(),
            default_key(),
            1,
            2025,
            &[],
        );
        // 100.00 zł base: health base clamps to 0, so tax and health follow
        assert_eq!(report.podstawa_na_zdrowotne, 0);
        assert_eq!(report.zaliczka, 0);
        assert_eq!(report.podatek, 0);
        assert_eq!(report.skladka_zdrowotna, 0);
        assert!(report.pensja.netto >= 0);
    }

    #[test]
    fn test_health_cap_only_applies_when_lower() {
        // raise the free allowance so the cap stops binding
        let mut params = ContributionParams::default();
        params.tax_free_allowance = 0;
        let report = compute_rca(
            &employee(Some(500_000), None),
            &params,
            default_key(),
            1,
            2025,
            &[],
        );
        // candidate (5000 - 685.50) * 9% = 388.31 now below the uncapped tax
        assert_eq!(report.skladka_zdrowotna, 38_831);
    }

    #[test]
    fn test_employer_only_rate_has_no_employee_share() {
        let mut params = ContributionParams::default();
        params.guaranteed_employee_benefits_fund = Rate::employer_only(10);
        let report = compute_rca(
            &employee(Some(500_000), None),
            &params,
            default_key(),
            1,
            2025,
            &[],
        );
        assert_eq!(report.fgsp.employee, 0);
        assert_eq!(report.fgsp.employer, 500);
    }
}
