//! Integration tests for the training plan search

use capacity_finder::{
    OFFERING_COLUMNS, ProviderError, ScanItem, ScanRequest, find_training_plans, parse_date,
    scan_training_plans,
};
use rstest::rstest;

use crate::common::{MockProvider, reservation_window, training_offering};

fn request(regions: &[&str]) -> ScanRequest {
    ScanRequest::new(
        &["p5.48xlarge"],
        regions,
        2,
        7,
        parse_date("2025-01-01").unwrap(),
        Some(parse_date("2025-03-01").unwrap()),
    )
    .unwrap()
}

#[test]
fn first_reservation_window_is_surfaced() {
    let provider = MockProvider::new().training(
        "us-west-2",
        "p5.48xlarge",
        Ok(vec![training_offering(vec![
            reservation_window("us-west-2a", "2025-01-05T00:00:00Z", "2025-01-12T00:00:00Z"),
            reservation_window("us-west-2b", "2025-02-05T00:00:00Z", "2025-02-12T00:00:00Z"),
        ])]),
    );

    let report = find_training_plans(&provider, &request(&["us-west-2"]));

    let offerings = &report.result.offerings;
    assert_eq!(offerings.columns(), OFFERING_COLUMNS);
    assert_eq!(
        offerings.rows(),
        [vec![
            "us-west-2",
            "p5.48xlarge",
            "2",
            "7.00",
            "05/01/2025 00:00",
            "12/01/2025 00:00",
            "$2500",
            "2",
            "us-west-2a",
        ]]
    );
}

#[test]
fn offerings_without_windows_are_skipped() {
    let provider = MockProvider::new().training(
        "us-east-1",
        "p5.48xlarge",
        Ok(vec![
            training_offering(Vec::new()),
            training_offering(vec![reservation_window(
                "us-east-1c",
                "2025-01-10T00:00:00Z",
                "2025-01-17T00:00:00Z",
            )]),
        ]),
    );

    let report = find_training_plans(&provider, &request(&["us-east-1"]));

    assert_eq!(report.result.offerings.len(), 1);
    assert_eq!(report.result.offerings.rows()[0][8], "us-east-1c");
}

#[test]
fn training_plan_calls_use_the_prefixed_type() {
    let provider = MockProvider::new();

    find_training_plans(&provider, &request(&["us-east-1", "eu-north-1"]));

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.instance_type == "ml.p5.48xlarge"));
    assert!(calls.iter().all(|call| call.duration_hours == 168));
}

#[rstest]
#[case::invalid_action(ProviderError::service(
    "InvalidAction",
    "InvalidAction: The action SearchTrainingPlanOfferings is not valid for this web service."
))]
#[case::auth_failure(ProviderError::service(
    "AuthFailure",
    "AuthFailure: AWS was not able to validate the provided access credentials"
))]
#[case::message_only(ProviderError::transport(
    "An error occurred (InvalidAction) when calling the SearchTrainingPlanOfferings operation"
))]
fn unsupported_regions_yield_no_rows_and_no_errors(#[case] error: ProviderError) {
    let provider = MockProvider::new().training("ap-southeast-3", "p5.48xlarge", Err(error));
    let params = request(&["ap-southeast-3"]).params();

    let items = scan_training_plans(&provider, "ap-southeast-3", "p5.48xlarge", &params);

    assert!(items.is_empty());
}

#[test]
fn other_failures_are_reported_per_region() {
    let provider = MockProvider::new()
        .training(
            "us-east-1",
            "p5.48xlarge",
            Err(ProviderError::service("InvalidAction", "InvalidAction: not here")),
        )
        .training(
            "us-east-2",
            "p5.48xlarge",
            Err(ProviderError::service(
                "ValidationException",
                "ValidationException: DurationHours must be a multiple of 24",
            )),
        )
        .training(
            "us-west-2",
            "p5.48xlarge",
            Ok(vec![training_offering(vec![reservation_window(
                "us-west-2a",
                "2025-01-05T00:00:00Z",
                "2025-01-12T00:00:00Z",
            )])]),
        );

    let report = find_training_plans(&provider, &request(&["us-east-1", "us-east-2", "us-west-2"]));

    assert_eq!(report.result.offerings.len(), 1);
    assert_eq!(
        report.result.errors.rows(),
        [vec![
            "us-east-2",
            "ValidationException: DurationHours must be a multiple of 24",
        ]]
    );
}

#[test]
fn unreadable_window_time_fails_the_pair() {
    let provider = MockProvider::new().training(
        "us-west-2",
        "p5.48xlarge",
        Ok(vec![
            training_offering(vec![reservation_window(
                "us-west-2a",
                "garbage",
                "2025-01-12T00:00:00Z",
            )]),
            training_offering(vec![reservation_window(
                "us-west-2b",
                "2025-01-05T00:00:00Z",
                "2025-01-12T00:00:00Z",
            )]),
        ]),
    );
    let params = request(&["us-west-2"]).params();

    let items = scan_training_plans(&provider, "us-west-2", "p5.48xlarge", &params);

    match &items[..] {
        [ScanItem::Error(err)] => {
            assert_eq!(err.region, "us-west-2");
            assert!(err.error.contains("garbage"));
        }
        other => panic!("expected a single error item, got {other:?}"),
    }
}
