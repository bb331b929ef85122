// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

pub mod fake_page;

use anyhow::Result;
use skladki::application::PayrollService;
use skladki::domain::{Grosze, Insured};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(PayrollService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = PayrollService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Test fixture: employees with well-formed records
pub fn insured(pesel: &str, salary: Option<Grosze>) -> Insured {
    Insured {
        name: "Jan".into(),
        family_name: "Kowalski".into(),
        pesel: pesel.into(),
        salary,
        ratio: None,
    }
}

pub fn full_time_5000(pesel: &str) -> Insured {
    insured(pesel, Some(500_000))
}
