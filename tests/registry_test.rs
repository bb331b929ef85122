mod common;

use common::{full_time_5000, insured, test_service};
use skladki::application::AppError;
use skladki::domain::{Insured, Rate};
use skladki::storage::Area;

#[tokio::test]
async fn test_add_and_read_back() {
    let (service, _tmp) = test_service().await.unwrap();

    service.add_insured(full_time_5000("85010212345")).await.unwrap();
    let all = service.list_insured().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].pesel, "85010212345");
    assert_eq!(all[0].salary, Some(500_000));
}

#[tokio::test]
async fn test_duplicate_pesel_is_rejected_without_mutation() {
    let (service, _tmp) = test_service().await.unwrap();

    service.add_insured(full_time_5000("85010212345")).await.unwrap();
    let before = service.list_insured().await.unwrap();

    let mut duplicate = full_time_5000("85010212345");
    duplicate.name = "Adam".into();
    let error = service.add_insured(duplicate).await.unwrap_err();
    assert!(matches!(error, AppError::PeselAlreadyRegistered(_)));
    assert!(error.to_string().contains("85010212345"));

    assert_eq!(service.list_insured().await.unwrap(), before);
}

#[tokio::test]
async fn test_update_then_read_back_yields_the_updated_record() {
    let (service, _tmp) = test_service().await.unwrap();

    service.add_insured(full_time_5000("85010212345")).await.unwrap();

    let updated = Insured {
        name: "Anna".into(),
        family_name: "Nowak".into(),
        pesel: "85010212345".into(),
        salary: None,
        ratio: Some((1, 2)),
    };
    service
        .update_insured("85010212345", updated.clone())
        .await
        .unwrap();

    assert_eq!(service.list_insured().await.unwrap(), vec![updated]);
}

#[tokio::test]
async fn test_missing_pesel_fails_without_mutation() {
    let (service, _tmp) = test_service().await.unwrap();

    service.add_insured(full_time_5000("85010212345")).await.unwrap();
    let before = service.list_insured().await.unwrap();

    let error = service.remove_insured("00000000000").await.unwrap_err();
    assert!(matches!(error, AppError::PeselNotFound(_)));
    assert_eq!(service.list_insured().await.unwrap(), before);

    let error = service
        .update_insured("00000000000", full_time_5000("00000000000"))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::PeselNotFound(_)));
    assert_eq!(service.list_insured().await.unwrap(), before);
}

#[tokio::test]
async fn test_remove_deletes_exactly_one_record() {
    let (service, _tmp) = test_service().await.unwrap();

    service.add_insured(full_time_5000("85010212345")).await.unwrap();
    service.add_insured(full_time_5000("90020254321")).await.unwrap();
    service.remove_insured("85010212345").await.unwrap();

    let all = service.list_insured().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].pesel, "90020254321");
}

#[tokio::test]
async fn test_invalid_records_report_every_problem_at_once() {
    let (service, _tmp) = test_service().await.unwrap();

    let broken = Insured {
        name: "".into(),
        family_name: "".into(),
        pesel: "123".into(),
        salary: Some(-100),
        ratio: None,
    };
    let error = service.add_insured(broken).await.unwrap_err();
    match error {
        AppError::Validation(problems) => assert_eq!(problems.len(), 4),
        other => panic!("expected a validation batch, got {other}"),
    }
    assert!(service.list_insured().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_params_update_persists() {
    let (service, _tmp) = test_service().await.unwrap();

    service
        .update_params(|params| {
            params.cost_of_obtaining = 30_000;
            params.pension_insurance = Rate::split(2000, 1000);
        })
        .await
        .unwrap();

    let params = service.local_state().await.unwrap().params;
    assert_eq!(params.cost_of_obtaining, 30_000);
    assert_eq!(params.pension_insurance, Rate::split(2000, 1000));
    // untouched parameters keep their defaults
    assert_eq!(params.tax_rate, 1200);
}

#[tokio::test]
async fn test_bootstrap_never_overwrites_stored_values() {
    let (service, _tmp) = test_service().await.unwrap();

    service
        .update_params(|params| params.free_amount = 50_000)
        .await
        .unwrap();
    service.bootstrap().await.unwrap();

    assert_eq!(service.local_state().await.unwrap().params.free_amount, 50_000);
}

#[tokio::test]
async fn test_identifier_round_trip() {
    let (service, _tmp) = test_service().await.unwrap();

    let session = service.set_identifier(7, 3, 2025).await.unwrap();
    assert!(!session.use_last_month);
    assert_eq!(session.identifier(), ("07".to_string(), "03-2025".to_string()));

    // survives a reload
    let session = service.session().await.unwrap();
    assert_eq!(session.identifier(), ("07".to_string(), "03-2025".to_string()));

    let session = service.set_serial(12).await.unwrap();
    assert_eq!(session.identifier().0, "12");
}

#[tokio::test]
async fn test_writes_are_announced() {
    let (service, _tmp) = test_service().await.unwrap();

    let mut changes = service.subscribe();
    service.add_insured(insured("85010212345", None)).await.unwrap();

    let change = changes.recv().await.unwrap();
    assert_eq!(change.area, Area::Local);
    assert_eq!(change.key, "insured");
}
