use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{AppConfig, PayrollService};
use crate::automation::fill_entries;
use crate::domain::{
    format_grosze, parse_grosze, ContributionParams, Grosze, Insured, Rate, Ratio,
};
use crate::reports::{Align, FieldValue, Report, ReportField};
use crate::tr;

/// Skladki - ZUS payroll contribution calculator
#[derive(Parser)]
#[command(name = "skladki")]
#[command(about = "Computes ZUS payroll contributions and prepares RCA/DRA declarations")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "skladki.db")]
    pub database: String,

    /// Deployment config file (dated minimum-wage table)
    #[arg(short, long, default_value = "skladki.json")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database with the statutory defaults
    Init,

    /// Insured-person registry
    #[command(subcommand)]
    Insured(InsuredCommands),

    /// Statutory parameters
    #[command(subcommand)]
    Params(ParamsCommands),

    /// Report identifier (serial and period)
    #[command(subcommand)]
    Period(PeriodCommands),

    /// Compute and display the RCA/DRA declarations for the current period
    Preview {
        /// Emit the raw report structures as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the input writes the form filler would perform
    FillPlan,
}

#[derive(Subcommand)]
pub enum InsuredCommands {
    /// Register a new insured person
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        family_name: String,

        /// 11-digit PESEL number, the record's identity
        #[arg(long)]
        pesel: String,

        /// Monthly gross salary (e.g. "5000.00"); omit to use the minimum wage
        #[arg(long)]
        salary: Option<String>,

        /// Work-time fraction (e.g. "1/2"); omit for full time
        #[arg(long)]
        ratio: Option<String>,
    },

    /// List registered insured persons
    List,

    /// Replace the record registered under a PESEL
    Update {
        pesel: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        family_name: String,

        /// New PESEL of the record (defaults to the addressed one)
        #[arg(long)]
        new_pesel: Option<String>,

        #[arg(long)]
        salary: Option<String>,

        #[arg(long)]
        ratio: Option<String>,
    },

    /// Remove the record registered under a PESEL
    Remove { pesel: String },
}

#[derive(Subcommand)]
pub enum ParamsCommands {
    /// Show the current statutory parameters
    Show,

    /// Set one parameter: amounts as "250.00", rates as "19.52/9.76" or "1.67"
    Set { key: String, value: String },
}

#[derive(Subcommand)]
pub enum PeriodCommands {
    /// Show the current report identifier
    Show,

    /// Pin the identifier to an explicit serial and period
    Set {
        #[arg(long)]
        serial: u32,

        #[arg(long)]
        month: u32,

        #[arg(long)]
        year: i32,
    },

    /// Change only the serial number
    Serial { serial: u32 },

    /// Follow the last calendar month again
    LastMonth,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = AppConfig::load(&self.config)?;

        if matches!(self.command, Commands::Init) {
            PayrollService::init(&self.database).await?;
            println!("Initialized database at {}", self.database);
            return Ok(());
        }

        let service = PayrollService::connect(&self.database)
            .await?
            .with_minimum_wage(config.minimum_wage);

        match self.command {
            Commands::Init => unreachable!(),
            Commands::Insured(command) => run_insured_command(&service, command).await?,
            Commands::Params(command) => run_params_command(&service, command).await?,
            Commands::Period(command) => run_period_command(&service, command).await?,
            Commands::Preview { json } => run_preview_command(&service, json).await?,
            Commands::FillPlan => run_fill_plan_command(&service).await?,
        }
        Ok(())
    }
}

fn parse_salary(raw: Option<&str>) -> Result<Option<Grosze>> {
    raw.map(|raw| {
        parse_grosze(raw).with_context(|| format!("Invalid salary '{raw}' (expected e.g. 5000.00)"))
    })
    .transpose()
}

fn parse_ratio(raw: Option<&str>) -> Result<Option<Ratio>> {
    raw.map(|raw| {
        let (numerator, denominator) = raw
            .split_once('/')
            .with_context(|| format!("Invalid ratio '{raw}' (expected e.g. 1/2)"))?;
        Ok((
            numerator.trim().parse().context("Invalid ratio numerator")?,
            denominator
                .trim()
                .parse()
                .context("Invalid ratio denominator")?,
        ))
    })
    .transpose()
}

fn parse_rate(raw: &str) -> Result<Rate> {
    match raw.split_once('/') {
        Some((total, insured)) => Ok(Rate::split(
            parse_grosze(total.trim()).context("Invalid rate")?,
            parse_grosze(insured.trim()).context("Invalid insured share")?,
        )),
        None => Ok(Rate::employer_only(
            parse_grosze(raw.trim()).context("Invalid rate")?,
        )),
    }
}

fn format_rate(rate: Rate) -> String {
    match rate.insured {
        Some(insured) => format!(
            "{}/{}{}",
            format_grosze(rate.total),
            format_grosze(insured),
            tr::SUFFIX_PERCENT
        ),
        None => format!("{}{}", format_grosze(rate.total), tr::SUFFIX_PERCENT),
    }
}

async fn run_insured_command(service: &PayrollService, command: InsuredCommands) -> Result<()> {
    match command {
        InsuredCommands::Add {
            name,
            family_name,
            pesel,
            salary,
            ratio,
        } => {
            let insured = Insured {
                name,
                family_name,
                pesel: pesel.clone(),
                salary: parse_salary(salary.as_deref())?,
                ratio: parse_ratio(ratio.as_deref())?,
            };
            service.add_insured(insured).await?;
            println!("Registered {pesel}");
        }
        InsuredCommands::List => {
            let all_insured = service.list_insured().await?;
            if all_insured.is_empty() {
                println!("No insured persons registered");
                return Ok(());
            }
            println!(
                "{:<15} {:<20} {:<20} {:>12} {:>8}",
                "PESEL", "NAZWISKO", "IMIĘ", "PENSJA", "WYMIAR"
            );
            println!("{}", "-".repeat(79));
            for insured in &all_insured {
                let salary = insured
                    .salary
                    .map(format_grosze)
                    .unwrap_or_else(|| "minimalna".to_string());
                let (numerator, denominator) = insured.work_time_ratio();
                println!(
                    "{:<15} {:<20} {:<20} {:>12} {:>8}",
                    insured.pesel,
                    insured.family_name,
                    insured.name,
                    salary,
                    format!("{numerator}/{denominator}")
                );
            }
        }
        InsuredCommands::Update {
            pesel,
            name,
            family_name,
            new_pesel,
            salary,
            ratio,
        } => {
            let insured = Insured {
                name,
                family_name,
                pesel: new_pesel.unwrap_or_else(|| pesel.clone()),
                salary: parse_salary(salary.as_deref())?,
                ratio: parse_ratio(ratio.as_deref())?,
            };
            service.update_insured(&pesel, insured).await?;
            println!("Updated {pesel}");
        }
        InsuredCommands::Remove { pesel } => {
            service.remove_insured(&pesel).await?;
            println!("Removed {pesel}");
        }
    }
    Ok(())
}

async fn run_params_command(service: &PayrollService, command: ParamsCommands) -> Result<()> {
    match command {
        ParamsCommands::Show => {
            let params = service.local_state().await?.params;
            let amount =
                |value: Grosze| format!("{}{}", format_grosze(value), tr::SUFFIX_MONEY);
            let percent = |value| format!("{}{}", format_grosze(value), tr::SUFFIX_PERCENT);
            println!("{:<28} {}", tr::LABEL_MINIMAL, amount(params.minimal));
            println!(
                "{:<28} {}",
                tr::LABEL_COST_OF_OBTAINING,
                amount(params.cost_of_obtaining)
            );
            println!(
                "{:<28} {}",
                tr::LABEL_TAX_FREE_ALLOWANCE,
                amount(params.tax_free_allowance)
            );
            println!("{:<28} {}", tr::LABEL_FREE_AMOUNT, amount(params.free_amount));
            println!("{:<28} {}", tr::LABEL_TAX_RATE, percent(params.tax_rate));
            println!("{:<28} {}", tr::LABEL_HEALTH, percent(params.health));
            println!(
                "{:<28} {}",
                tr::LABEL_PENSION,
                format_rate(params.pension_insurance)
            );
            println!(
                "{:<28} {}",
                tr::LABEL_DISABILITY,
                format_rate(params.disability_insurance)
            );
            println!(
                "{:<28} {}",
                tr::LABEL_MEDICAL,
                format_rate(params.medical_insurance)
            );
            println!(
                "{:<28} {}",
                tr::LABEL_ACCIDENT,
                format_rate(params.accident_insurance)
            );
            println!(
                "{:<28} {}",
                tr::LABEL_BENEFITS_FUND,
                format_rate(params.guaranteed_employee_benefits_fund)
            );
        }
        ParamsCommands::Set { key, value } => {
            apply_param(service, &key, &value).await?;
            println!("Set {key} = {value}");
        }
    }
    Ok(())
}

async fn apply_param(service: &PayrollService, key: &str, value: &str) -> Result<()> {
    fn set_amount(
        target: fn(&mut ContributionParams) -> &mut Grosze,
        value: &str,
    ) -> Result<impl FnOnce(&mut ContributionParams)> {
        let amount = parse_grosze(value).context("Invalid amount")?;
        Ok(move |params: &mut ContributionParams| *target(params) = amount)
    }

    fn set_rate(
        target: fn(&mut ContributionParams) -> &mut Rate,
        value: &str,
    ) -> Result<impl FnOnce(&mut ContributionParams)> {
        let rate = parse_rate(value)?;
        anyhow::ensure!(rate.is_valid(), "Rate shares must satisfy 0 <= insured <= total");
        Ok(move |params: &mut ContributionParams| *target(params) = rate)
    }

    match key {
        "minimal" => service.update_params(set_amount(|p| &mut p.minimal, value)?).await?,
        "cost_of_obtaining" => {
            service
                .update_params(set_amount(|p| &mut p.cost_of_obtaining, value)?)
                .await?
        }
        "tax_free_allowance" => {
            service
                .update_params(set_amount(|p| &mut p.tax_free_allowance, value)?)
                .await?
        }
        "free_amount" => {
            service
                .update_params(set_amount(|p| &mut p.free_amount, value)?)
                .await?
        }
        "tax_rate" => service.update_params(set_amount(|p| &mut p.tax_rate, value)?).await?,
        "health" => service.update_params(set_amount(|p| &mut p.health, value)?).await?,
        "pension_insurance" => {
            service
                .update_params(set_rate(|p| &mut p.pension_insurance, value)?)
                .await?
        }
        "disability_insurance" => {
            service
                .update_params(set_rate(|p| &mut p.disability_insurance, value)?)
                .await?
        }
        "medical_insurance" => {
            service
                .update_params(set_rate(|p| &mut p.medical_insurance, value)?)
                .await?
        }
        "accident_insurance" => {
            service
                .update_params(set_rate(|p| &mut p.accident_insurance, value)?)
                .await?
        }
        "guaranteed_employee_benefits_fund" => {
            service
                .update_params(set_rate(|p| &mut p.guaranteed_employee_benefits_fund, value)?)
                .await?
        }
        _ => anyhow::bail!(
            "Unknown parameter '{}'. Valid keys: minimal, cost_of_obtaining, tax_free_allowance, \
             free_amount, tax_rate, health, pension_insurance, disability_insurance, \
             medical_insurance, accident_insurance, guaranteed_employee_benefits_fund",
            key
        ),
    };
    Ok(())
}

async fn run_period_command(service: &PayrollService, command: PeriodCommands) -> Result<()> {
    match command {
        PeriodCommands::Show => {
            let session = service.session().await?;
            let (serial, period) = session.identifier();
            let mode = if session.use_last_month {
                " (follows the last calendar month)"
            } else {
                ""
            };
            println!("Identifier: {serial} / {period}{mode}");
        }
        PeriodCommands::Set {
            serial,
            month,
            year,
        } => {
            anyhow::ensure!((1..=12).contains(&month), "Month must be 1-12");
            let session = service.set_identifier(serial, month, year).await?;
            let (serial, period) = session.identifier();
            println!("Identifier: {serial} / {period}");
        }
        PeriodCommands::Serial { serial } => {
            let session = service.set_serial(serial).await?;
            let (serial, period) = session.identifier();
            println!("Identifier: {serial} / {period}");
        }
        PeriodCommands::LastMonth => {
            let session = service.set_use_last_month(true).await?;
            let (serial, period) = session.identifier();
            println!("Identifier: {serial} / {period}");
        }
    }
    Ok(())
}

/// Render a resolved field the way the panel would: formatted value with
/// prefix/suffix, list elements joined by the format's infix.
fn render_field(report_field: &ReportField) -> String {
    let format = report_field.format;
    let infix = format.map_or("\u{a0}", |f| f.infix);
    let rendered = match &report_field.value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Amount(amount) => format_grosze(*amount),
        FieldValue::List(items) => items.join(infix),
    };
    match format {
        Some(format) => format!("{}{}{}", format.prefix, rendered, format.suffix),
        None => rendered,
    }
}

fn print_report(report: &Report) {
    println!("{} ({})", report.title, report.kind);
    for report_section in &report.sections {
        let visible: Vec<_> = report_section
            .fields
            .iter()
            .filter(|report_field| !report_field.hidden)
            .collect();
        if visible.is_empty() {
            continue;
        }
        println!("  [{}]", report_section.id);
        for report_field in visible {
            let rendered = render_field(report_field);
            let aligned = match report_field.format.map(|f| f.align) {
                Some(Align::Right) => format!("{rendered:>18}"),
                _ => rendered,
            };
            println!("    {:>3}. {}", report_field.id, aligned);
        }
    }
}

async fn run_preview_command(service: &PayrollService, json: bool) -> Result<()> {
    let report_set = service.compute_reports().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report_set.views)?);
        return Ok(());
    }

    let (serial, period) = report_set.key.clone();
    println!("Declarations {serial} / {period}");
    println!();
    for report in &report_set.views {
        print_report(report);
        println!();
    }
    Ok(())
}

async fn run_fill_plan_command(service: &PayrollService) -> Result<()> {
    let report_set = service.compute_reports().await?;
    for report in &report_set.views {
        println!("# {} ({})", report.title, report.kind);
        for entry in fill_entries(report) {
            println!("{} = {}", entry.input_id, entry.value);
        }
    }
    Ok(())
}
