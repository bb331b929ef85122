use anyhow::Context;

use crate::domain::{
    ContributionParams, DatedMinimum, Insured, LocalState, ReportKey, SessionParams,
};
use crate::reports::{
    compute_dra, compute_rca, dra_template, rca_template, resolve_sections, DraReport, RcaReport,
    Report, ReportType,
};
use crate::storage::{Area, Repository, StorageChange};
use tokio::sync::broadcast;

use super::AppError;

/// Application service providing the high-level operations of the payroll
/// controller: the insured registry, the statutory parameters, the report
/// identifier, and report computation. This is the primary interface for any
/// client (CLI, panel UI, automation driver).
#[derive(Clone)]
pub struct PayrollService {
    repo: Repository,
    minimum_wage: Vec<DatedMinimum>,
}

/// Everything report computation depends on, loaded in one pass so a
/// recomputation sees a consistent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportState {
    pub local: LocalState,
    pub session: SessionParams,
    pub minimum_wage: Vec<DatedMinimum>,
}

/// One computed generation of reports: the raw records plus the resolved,
/// display-ready views sent to the automation side.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSet {
    pub key: ReportKey,
    pub rca_reports: Vec<RcaReport>,
    pub dra_report: DraReport,
    pub views: Vec<Report>,
}

impl PayrollService {
    /// Create a new service over the given repository.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            minimum_wage: Vec::new(),
        }
    }

    /// Attach the dated minimum-wage table from the deployment config.
    pub fn with_minimum_wage(mut self, table: Vec<DatedMinimum>) -> Self {
        self.minimum_wage = table;
        self
    }

    /// Initialize a new database at the given path and seed the defaults.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        let service = Self::new(repo);
        service.bootstrap().await?;
        Ok(service)
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Seed both namespaces with defaults; anything already stored wins.
    pub async fn bootstrap(&self) -> Result<(), AppError> {
        self.repo
            .init_defaults(Area::Local, &LocalState::default())
            .await?;
        self.repo
            .init_defaults(Area::Session, &SessionParams::default())
            .await?;
        Ok(())
    }

    /// Subscribe to storage change notifications; dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.repo.subscribe()
    }

    pub async fn local_state(&self) -> Result<LocalState, AppError> {
        Ok(self
            .repo
            .load_area(Area::Local, &LocalState::default())
            .await?)
    }

    pub async fn session(&self) -> Result<SessionParams, AppError> {
        Ok(self
            .repo
            .load_area(Area::Session, &SessionParams::default())
            .await?)
    }

    // ========================
    // Insured registry
    // ========================

    pub async fn list_insured(&self) -> Result<Vec<Insured>, AppError> {
        Ok(self.local_state().await?.insured)
    }

    /// Register a new insured person. The PESEL must not be taken yet; a
    /// rejected add leaves the stored list untouched.
    pub async fn add_insured(&self, insured: Insured) -> Result<(), AppError> {
        let problems = insured.validate();
        if !problems.is_empty() {
            return Err(AppError::Validation(problems));
        }

        let mut all_insured = self.list_insured().await?;
        if all_insured.iter().any(|existing| existing.pesel == insured.pesel) {
            return Err(AppError::PeselAlreadyRegistered(insured.pesel));
        }

        all_insured.push(insured);
        self.store_insured(&all_insured).await
    }

    /// Replace the record registered under `pesel` (which may itself change
    /// to the new record's number).
    pub async fn update_insured(&self, pesel: &str, insured: Insured) -> Result<(), AppError> {
        let problems = insured.validate();
        if !problems.is_empty() {
            return Err(AppError::Validation(problems));
        }

        let mut all_insured = self.list_insured().await?;
        let position = all_insured
            .iter()
            .position(|existing| existing.pesel == pesel)
            .ok_or_else(|| AppError::PeselNotFound(insured.pesel.clone()))?;

        all_insured[position] = insured;
        self.store_insured(&all_insured).await
    }

    pub async fn remove_insured(&self, pesel: &str) -> Result<(), AppError> {
        let mut all_insured = self.list_insured().await?;
        let position = all_insured
            .iter()
            .position(|existing| existing.pesel == pesel)
            .ok_or_else(|| AppError::PeselNotFound(pesel.to_string()))?;

        all_insured.remove(position);
        self.store_insured(&all_insured).await
    }

    async fn store_insured(&self, all_insured: &[Insured]) -> Result<(), AppError> {
        Ok(self.repo.set_item(Area::Local, "insured", &all_insured).await?)
    }

    // ========================
    // Statutory parameters & period
    // ========================

    /// Apply a change to the statutory parameters and persist the result.
    pub async fn update_params(
        &self,
        mutate: impl FnOnce(&mut ContributionParams),
    ) -> Result<ContributionParams, AppError> {
        let mut params = self.local_state().await?.params;
        mutate(&mut params);
        self.repo.store_area(Area::Local, &params).await?;
        Ok(params)
    }

    /// Pin the report identifier to an explicit serial and period.
    pub async fn set_identifier(
        &self,
        serial: u32,
        month: u32,
        year: i32,
    ) -> Result<SessionParams, AppError> {
        let mut session = self.session().await?;
        session.serial = serial;
        session.month = month;
        session.year = year;
        session.use_last_month = false;
        self.repo.store_area(Area::Session, &session).await?;
        Ok(session)
    }

    pub async fn set_serial(&self, serial: u32) -> Result<SessionParams, AppError> {
        let mut session = self.session().await?;
        session.serial = serial;
        self.repo.store_area(Area::Session, &session).await?;
        Ok(session)
    }

    pub async fn set_use_last_month(&self, use_last_month: bool) -> Result<SessionParams, AppError> {
        let mut session = self.session().await?;
        session.use_last_month = use_last_month;
        self.repo.store_area(Area::Session, &session).await?;
        Ok(session)
    }

    // ========================
    // Reports
    // ========================

    /// Load a consistent snapshot of everything report computation needs.
    pub async fn load_state(&self) -> Result<ReportState, AppError> {
        Ok(ReportState {
            local: self.local_state().await?,
            session: self.session().await?,
            minimum_wage: self.minimum_wage.clone(),
        })
    }

    /// Convenience wrapper: snapshot then recompute.
    pub async fn compute_reports(&self) -> Result<ReportSet, AppError> {
        let state = self.load_state().await?;
        recompute(&state)
    }
}

/// Recompute every report from a state snapshot. Deterministic: the same
/// state always yields the same report set.
pub fn recompute(state: &ReportState) -> Result<ReportSet, AppError> {
    let key = state.session.identifier();
    let (month, year) = state.session.period();

    let rca_reports: Vec<RcaReport> = state
        .local
        .insured
        .iter()
        .map(|insured| {
            compute_rca(
                insured,
                &state.local.params,
                key.clone(),
                month,
                year,
                &state.minimum_wage,
            )
        })
        .collect();
    let dra_report = compute_dra(&rca_reports, &state.local.params, key.clone());

    let mut views = if rca_reports.len() == 1 {
        vec![pack_rca_report(&rca_reports[0], None)?]
    } else {
        rca_reports
            .iter()
            .enumerate()
            .map(|(index, report)| pack_rca_report(report, Some(index)))
            .collect::<Result<_, _>>()?
    };
    views.push(pack_dra_report(&dra_report)?);

    Ok(ReportSet {
        key,
        rca_reports,
        dra_report,
        views,
    })
}

fn pack_rca_report(report: &RcaReport, index: Option<usize>) -> Result<Report, AppError> {
    let (id, title) = match index {
        None => ("rca".to_string(), "RCA".to_string()),
        Some(index) => (format!("rca-{}", report.pesel), format!("RCA #{}", index + 1)),
    };
    let record = serde_json::to_value(report).context("Failed to serialize RCA record")?;
    Ok(Report {
        id,
        title,
        kind: ReportType::Rca,
        sections: resolve_sections(&record, &rca_template()),
    })
}

fn pack_dra_report(report: &DraReport) -> Result<Report, AppError> {
    let record = serde_json::to_value(report).context("Failed to serialize DRA record")?;
    Ok(Report {
        id: "dra".to_string(),
        title: "DRA".to_string(),
        kind: ReportType::Dra,
        sections: resolve_sections(&record, &dra_template()),
    })
}
