use serde::{Deserialize, Serialize};

use crate::domain::{Bps, Contribution, ContributionParams, Grosze, ReportKey};

use super::model::{field, percent, section, SectionTemplate};
use super::rca::RcaReport;

/// Aggregate settlement record: element-wise sums over the per-employee
/// records plus headcount and the accident rate, which is reported once
/// rather than summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraReport {
    pub key: ReportKey,
    pub liczba_ubezpieczonych: String,
    pub skladka_ubezpieczenia_wypadkowego: Bps,
    pub ubezpieczenie_chorobowe: Contribution,
    pub ubezpieczenie_emerytalne: Contribution,
    pub ubezpieczenie_rentowe: Contribution,
    pub ubezpieczenie_wypadkowe: Contribution,
    pub skladka_spoleczna: Grosze,
    pub skladka_zdrowotna: Grosze,
}

/// Fold the per-employee records into the aggregate declaration.
pub fn compute_dra(
    rca_reports: &[RcaReport],
    params: &ContributionParams,
    key: ReportKey,
) -> DraReport {
    let mut chorobowe = Contribution::ZERO;
    let mut emerytalne = Contribution::ZERO;
    let mut rentowe = Contribution::ZERO;
    let mut wypadkowe = Contribution::ZERO;
    let mut spoleczna = 0;
    let mut zdrowotna = 0;

    for report in rca_reports {
        chorobowe = chorobowe.combine(report.ubezpieczenie_chorobowe);
        emerytalne = emerytalne.combine(report.ubezpieczenie_emerytalne);
        rentowe = rentowe.combine(report.ubezpieczenie_rentowe);
        wypadkowe = wypadkowe.combine(report.ubezpieczenie_wypadkowe);
        spoleczna += report.skladka_spoleczna;
        zdrowotna += report.skladka_zdrowotna;
    }

    DraReport {
        key,
        liczba_ubezpieczonych: rca_reports.len().to_string(),
        skladka_ubezpieczenia_wypadkowego: params.accident_insurance.total,
        ubezpieczenie_chorobowe: chorobowe,
        ubezpieczenie_emerytalne: emerytalne,
        ubezpieczenie_rentowe: rentowe,
        ubezpieczenie_wypadkowe: wypadkowe,
        skladka_spoleczna: spoleczna,
        skladka_zdrowotna: zdrowotna,
    }
}

/// Field layout of the DRA form. Section IV is dominated by the summation
/// fields backing the form's readonly inputs; ids referencing insurance
/// classes this system never reports simply contribute zero.
pub fn dra_template() -> Vec<SectionTemplate> {
    vec![
        section("I", vec![(1, field("6")), (2, field("$key"))]),
        section(
            "III",
            vec![
                (1, field("$liczba_ubezpieczonych")),
                (3, percent("$skladka_ubezpieczenia_wypadkowego")),
            ],
        ),
        section(
            "IV",
            vec![
                (4, field("$ubezpieczenie_emerytalne.ubezpieczony")),
                (5, field("$ubezpieczenie_rentowe.ubezpieczony")),
                (7, field("$ubezpieczenie_emerytalne.platnik_skladek")),
                (8, field("$ubezpieczenie_rentowe.platnik_skladek")),
                //
                (22, field("$ubezpieczenie_chorobowe.ubezpieczony")),
                (23, field("$ubezpieczenie_wypadkowe.ubezpieczony")),
                (25, field("$ubezpieczenie_chorobowe.platnik_skladek")),
                (26, field("$ubezpieczenie_wypadkowe.platnik_skladek")),
                //
                (1, field("$+4,7,10,13,16")),
                (2, field("$+5,8,11,14,17")),
                (3, field("$+1,2")),
                (6, field("$+4,5")),
                (9, field("$+7,8")),
                (12, field("$+10,11")),
                (15, field("$+13,14")),
                (18, field("$+16,17")),
                //
                (19, field("$+22,25,28,31,34")),
                (20, field("$+23,26,29,32,35")),
                (21, field("$+19,20")),
                (24, field("$+22,23")),
                (27, field("$+25,26")),
                (30, field("$+28,29")),
                (33, field("$+31,32")),
                (36, field("$+34,35")),
                //
                (37, field("$+6,9,24,27")),
            ],
        ),
        section("VI", vec![(2, field("$skladka_zdrowotna"))]),
        section("IX", vec![(2, field("$skladka_spoleczna"))]),
    ]
}
