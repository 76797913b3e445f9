use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Path, State};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use calendar_cell::handlers::{get_day_appointments, get_month_calendar};
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser, TEST_JWT_SECRET};

fn create_auth_header(token: &str) -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer(token).unwrap())
}

fn user_extension(user: &TestUser) -> Extension<User> {
    Extension(user.to_user())
}

#[tokio::test]
async fn test_get_month_calendar_builds_grid() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_arc();

    let doctor = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, TEST_JWT_SECRET, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .and(query_param("date", "gte.2024-02-01"))
        .and(query_param("date", "lte.2024-02-29"))
        .and(header("Authorization", format!("Bearer {}", token)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response(&doctor.id, "2024-02-12", "completed"),
            MockSupabaseResponses::appointment_response(&doctor.id, "2024-02-12", "scheduled"),
            MockSupabaseResponses::appointment_response(&doctor.id, "2024-02-29", "cancelled"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = get_month_calendar(
        State(config),
        create_auth_header(&token),
        user_extension(&doctor),
        Path((2024, 2)),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(response["first_day"], "2024-02-01");
    assert_eq!(response["last_day"], "2024-02-29");

    let grid = &response["grid"];
    assert_eq!(grid["month"], 1);
    assert_eq!(grid["leading_blanks"], 4);
    assert_eq!(grid["days_in_month"], 29);

    let cells = grid["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 33);
    assert_eq!(cells[0]["kind"], "empty");

    let twelfth = &cells[4 + 11];
    assert_eq!(twelfth["kind"], "day");
    assert_eq!(twelfth["day_number"], 12);
    assert_eq!(twelfth["has_appointment"], true);
    assert_eq!(twelfth["composite_status"], "mixed");

    let leap_day = cells.last().unwrap();
    assert_eq!(leap_day["day_number"], 29);
    assert_eq!(leap_day["composite_status"], "cancelled");

    assert_eq!(cells[4]["composite_status"], "none");
    assert_eq!(cells[4]["has_appointment"], false);
}

#[tokio::test]
async fn test_get_month_calendar_rejects_patients() {
    let config = TestConfig::default().to_arc();
    let patient = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&patient, TEST_JWT_SECRET, Some(1));

    let result = get_month_calendar(
        State(config),
        create_auth_header(&token),
        user_extension(&patient),
        Path((2024, 2)),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_get_month_calendar_rejects_invalid_month() {
    let config = TestConfig::default().to_arc();
    let doctor = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, TEST_JWT_SECRET, Some(1));

    for month in [0, 13] {
        let result = get_month_calendar(
            State(Arc::clone(&config)),
            create_auth_header(&token),
            user_extension(&doctor),
            Path((2024, month)),
        )
        .await;

        assert_matches!(result, Err(AppError::ValidationError(_)));
    }
}

#[tokio::test]
async fn test_get_day_appointments_keeps_query_order() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_arc();

    let doctor = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, TEST_JWT_SECRET, Some(1));

    let mut morning = MockSupabaseResponses::appointment_response(&doctor.id, "2024-12-31", "cancelled");
    morning["time"] = json!("9:30 AM");
    let mut late_morning = MockSupabaseResponses::appointment_response(&doctor.id, "2024-12-31", "confirmed");
    late_morning["time"] = json!("10:00 AM");
    let mut afternoon = MockSupabaseResponses::appointment_response(&doctor.id, "2024-12-31", "scheduled");
    afternoon["time"] = json!("2:00 PM");

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", "eq.2024-12-31"))
        .and(query_param("order", "time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([morning, late_morning, afternoon])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = get_day_appointments(
        State(config),
        create_auth_header(&token),
        user_extension(&doctor),
        Path((2024, 12, 31)),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(response["date"], "2024-12-31");
    assert_eq!(response["composite_status"], "scheduled");
    assert_eq!(response["indicator"], "blue");
    assert_eq!(response["total"], 3);
    assert_eq!(response["appointments"][0]["time"], "9:30 AM");
    assert_eq!(response["appointments"][1]["time"], "10:00 AM");
    assert_eq!(response["appointments"][2]["time"], "2:00 PM");
}

#[tokio::test]
async fn test_get_day_appointments_invalid_date() {
    let config = TestConfig::default().to_arc();
    let doctor = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, TEST_JWT_SECRET, Some(1));

    let result = get_day_appointments(
        State(config),
        create_auth_header(&token),
        user_extension(&doctor),
        Path((2023, 2, 29)),
    )
    .await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_supabase_failure_maps_to_bad_gateway() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_arc();

    let doctor = TestUser::doctor("doctor@example.com");
    let token = JwtTestUtils::create_test_token(&doctor, TEST_JWT_SECRET, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(503).set_body_json(
            MockSupabaseResponses::error_response("upstream unavailable", "PGRST000"),
        ))
        .mount(&mock_server)
        .await;

    let result = get_month_calendar(
        State(config),
        create_auth_header(&token),
        user_extension(&doctor),
        Path((2024, 3)),
    )
    .await;

    assert_matches!(result, Err(AppError::ExternalService(_)));
}
