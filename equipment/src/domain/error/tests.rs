//! Regression coverage for this module.

use serde_json::json;

use super::*;

#[test]
fn convenience_constructors_set_matching_codes() {
    let cases = [
        (Error::not_found("x"), ErrorCode::NotFound),
        (Error::invalid_transition("x"), ErrorCode::InvalidTransition),
        (Error::conflict("x"), ErrorCode::Conflict),
        (Error::invalid_argument("x"), ErrorCode::InvalidArgument),
        (Error::data_inconsistency("x"), ErrorCode::DataInconsistency),
        (Error::internal("x"), ErrorCode::Internal),
    ];

    for (error, code) in cases {
        assert_eq!(error.code(), code);
    }
}

#[test]
fn display_prints_only_the_message() {
    let error = Error::conflict("lock 2 is not free");
    assert_eq!(error.to_string(), "lock 2 is not free");
}

#[test]
fn details_are_absent_until_attached() {
    let error = Error::not_found("bike 9 not found");
    assert!(error.details().is_none());

    let error = error.with_details(json!({ "bikeId": 9 }));
    assert_eq!(error.details(), Some(&json!({ "bikeId": 9 })));
}

#[test]
fn serialises_with_snake_case_code_and_skips_empty_details() {
    let value = serde_json::to_value(Error::data_inconsistency("occupied lock without a bike"))
        .expect("serialise");

    assert_eq!(
        value,
        json!({
            "code": "data_inconsistency",
            "message": "occupied lock without a bike",
        })
    );
}

#[test]
fn round_trips_through_json() {
    let original = Error::conflict("station 7 has 3 attached lock(s)")
        .with_details(json!({ "stationId": 7, "attachedLocks": 3 }));

    let encoded = serde_json::to_string(&original).expect("serialise");
    let decoded: Error = serde_json::from_str(&encoded).expect("parse");

    assert_eq!(decoded, original);
}
