//! End-to-end API tests
//!
//! Drive the assembled router against a temporary SQLite database with
//! migrations applied, through login → domain operations → audit trail.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use shared::models::{ProfileCreate, Role, SalaryType};
use staff_server::auth::password;
use staff_server::core::{Config, ServerState};
use staff_server::core::server::build_router;
use staff_server::db::repository::profile;

const ADMIN_EMAIL: &str = "ana@example.com";
const ADMIN_PASSWORD: &str = "admin-password";
const EMPLOYEE_EMAIL: &str = "bob@example.com";
const EMPLOYEE_PASSWORD: &str = "employee-password";

struct TestApp {
    router: Router,
    state: ServerState,
    // Keeps the temp dir (and the database under it) alive for the test
    _work_dir: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    let work_dir = tempfile::tempdir().expect("temp work dir");
    let config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config)
        .await
        .expect("state initialization");

    seed_profiles(&state).await;

    TestApp {
        router: build_router(state.clone()),
        state,
        _work_dir: work_dir,
    }
}

async fn seed_profiles(state: &ServerState) {
    let admin_hash = password::hash_password(ADMIN_PASSWORD).expect("hash");
    profile::create(
        &state.pool,
        ProfileCreate {
            email: ADMIN_EMAIL.to_string(),
            password: String::new(),
            full_name: "Ana García".to_string(),
            role: Role::Admin,
            salary_type: SalaryType::Monthly,
            hourly_rate: None,
            monthly_salary: Some(3000.0),
        },
        admin_hash,
    )
    .await
    .expect("seed admin");

    let employee_hash = password::hash_password(EMPLOYEE_PASSWORD).expect("hash");
    profile::create(
        &state.pool,
        ProfileCreate {
            email: EMPLOYEE_EMAIL.to_string(),
            password: String::new(),
            full_name: "Bob Smith".to_string(),
            role: Role::Employee,
            salary_type: SalaryType::Hourly,
            hourly_rate: Some(15.0),
            monthly_salary: None,
        },
        employee_hash,
    )
    .await
    .expect("seed employee");
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(router: &Router, email: &str, password: &str) -> (String, i64) {
    let (status, body) = send(
        router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    let token = body["token"].as_str().expect("token").to_string();
    let user_id = body["user"]["id"].as_i64().expect("user id");
    (token, user_id)
}

/// The audit worker consumes its channel asynchronously; poll until the
/// expected number of entries has landed.
async fn wait_for_audit(state: &ServerState, min_entries: i64) {
    for _ in 0..50 {
        let (_, total) = state
            .audit_service
            .query(&Default::default())
            .await
            .expect("audit query");
        if total >= min_entries {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("audit worker did not catch up to {min_entries} entries");
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected_before_anything_else() {
    let app = spawn_app().await;

    for (method, uri) in [
        ("GET", "/api/attendance"),
        ("POST", "/api/attendance/check-in"),
        ("GET", "/api/salary"),
        ("GET", "/api/notifications"),
        ("GET", "/api/users"),
        ("GET", "/api/dashboard/summary"),
        ("GET", "/api/audit-log"),
    ] {
        let (status, _) = send(&app.router, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    // Garbage token is rejected as well
    let (status, _) = send(&app.router, "GET", "/api/attendance", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Health stays public
    let (status, body) = send(&app.router, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn login_uses_unified_error_and_returns_profile() {
    let app = spawn_app().await;

    let (status, wrong_pass) = send(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, unknown_user) = send(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ghost@example.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Same message for unknown email and wrong password (no enumeration)
    assert_eq!(wrong_pass["message"], unknown_user["message"]);

    let (token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, me) = send(&app.router, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], ADMIN_EMAIL);
    assert_eq!(me["role"], "admin");
    // The password hash must never be serialized
    assert!(me.get("hash_pass").is_none());
}

#[tokio::test]
async fn check_in_check_out_lifecycle_enforces_state_machine() {
    let app = spawn_app().await;
    let (bob_token, bob_id) = login(&app.router, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD).await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // Checking in on behalf of someone else is forbidden, even for admins
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance/check-in",
        Some(&ana_token),
        Some(json!({"user_id": bob_id})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Bob opens a session
    let (status, record) = send(
        &app.router,
        "POST",
        "/api/attendance/check-in",
        Some(&bob_token),
        Some(json!({"user_id": bob_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(record["check_out"].is_null());
    assert!(record["total_hours"].is_null());
    let attendance_id = record["id"].as_i64().expect("attendance id");

    // Second check-in the same day conflicts
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance/check-in",
        Some(&bob_token),
        Some(json!({"user_id": bob_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A foreign caller cannot close the session
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance/check-out",
        Some(&ana_token),
        Some(json!({"attendance_id": attendance_id})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Bob closes it; total_hours is derived
    let (status, closed) = send(
        &app.router,
        "POST",
        "/api/attendance/check-out",
        Some(&bob_token),
        Some(json!({"attendance_id": attendance_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(closed["check_out"].is_i64());
    assert!(closed["total_hours"].is_number());

    // Closing twice conflicts
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance/check-out",
        Some(&bob_token),
        Some(json!({"attendance_id": attendance_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Closing a nonexistent record is NotFound
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance/check-out",
        Some(&bob_token),
        Some(json!({"attendance_id": 999_999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The closed session shows up in Bob's listing with the derived hours
    let (status, listing) = send(
        &app.router,
        "GET",
        "/api/attendance",
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = listing.as_array().expect("listing");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(attendance_id));
    assert_eq!(rows[0]["full_name"], "Bob Smith");
}

#[tokio::test]
async fn manual_attendance_entry_derives_hours_with_minute_precision() {
    let app = spawn_app().await;
    let (bob_token, bob_id) = login(&app.router, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD).await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let check_in = shared::util::now_millis() - 4 * 3_600_000;
    // 2h 32m 45s later — seconds truncate, so 2 + 32/60 = 2.53 (not 2.55)
    let check_out = check_in + 2 * 3_600_000 + 32 * 60_000 + 45_000;

    // Employees cannot use manual entry
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance",
        Some(&bob_token),
        Some(json!({"user_id": bob_id, "check_in": check_in, "check_out": check_out})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // check_out before check_in is rejected
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance",
        Some(&ana_token),
        Some(json!({"user_id": bob_id, "check_in": check_out, "check_out": check_in})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown profile is NotFound
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance",
        Some(&ana_token),
        Some(json!({"user_id": 424242, "check_in": check_in, "check_out": check_out})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, record) = send(
        &app.router,
        "POST",
        "/api/attendance",
        Some(&ana_token),
        Some(json!({
            "user_id": bob_id,
            "check_in": check_in,
            "check_out": check_out,
            "notes": "forgot to clock in"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{record}");
    assert_eq!(record["total_hours"], json!(2.53));
    assert_eq!(record["notes"], "forgot to clock in");
}

#[tokio::test]
async fn salary_totals_are_always_recomputed_server_side() {
    let app = spawn_app().await;
    let (bob_token, bob_id) = login(&app.router, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD).await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // Employees cannot create salary records
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/salary",
        Some(&bob_token),
        Some(json!({
            "user_id": bob_id,
            "period_start": "2025-07-01",
            "period_end": "2025-07-31",
            "base_amount": 1000.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, record) = send(
        &app.router,
        "POST",
        "/api/salary",
        Some(&ana_token),
        Some(json!({
            "user_id": bob_id,
            "period_start": "2025-07-01",
            "period_end": "2025-07-31",
            "base_amount": 1000.0,
            "bonus": 100.0,
            "deductions": 50.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{record}");
    assert_eq!(record["total_amount"], json!(1050.0));
    assert_eq!(record["status"], "pending");
    assert!(record["paid_at"].is_null());
    let salary_id = record["id"].as_i64().expect("salary id");

    // Partial update of a single field recomputes the total
    let (status, updated) = send(
        &app.router,
        "PUT",
        &format!("/api/salary/{salary_id}"),
        Some(&ana_token),
        Some(json!({"bonus": 150.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["total_amount"], json!(1100.0));
    assert_eq!(updated["status"], "pending");

    // Marking paid stamps paid_at and audits as mark_paid
    let (status, paid) = send(
        &app.router,
        "PUT",
        &format!("/api/salary/{salary_id}"),
        Some(&ana_token),
        Some(json!({"status": "paid"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "paid");
    assert!(paid["paid_at"].is_i64());

    // 2 logins + create_salary + update_salary + mark_paid
    wait_for_audit(&app.state, 5).await;
    let (status, audit) = send(
        &app.router,
        "GET",
        "/api/audit-log?action=mark_paid",
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["total"], json!(1));
    assert_eq!(audit["items"][0]["entity_id"], json!(salary_id));

    // Deductions beyond base + bonus yield a negative total, accepted as-is
    let (status, negative) = send(
        &app.router,
        "PUT",
        &format!("/api/salary/{salary_id}"),
        Some(&ana_token),
        Some(json!({"deductions": 2000.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(negative["total_amount"], json!(-850.0));

    // Employees see only their own records; admin filter works
    let (status, bob_view) = send(&app.router, "GET", "/api/salary", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bob_view.as_array().expect("list").len(), 1);
    assert_eq!(bob_view[0]["user_id"], json!(bob_id));

    let (status, filtered) = send(
        &app.router,
        "GET",
        "/api/salary?status=paid",
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered.as_array().expect("list").len(), 1);
}

#[tokio::test]
async fn notification_visibility_follows_target_role() {
    let app = spawn_app().await;
    let (bob_token, _) = login(&app.router, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD).await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // Employees cannot broadcast
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/notifications",
        Some(&bob_token),
        Some(json!({"title": "hi", "message": "all hands"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for (title, target) in [
        ("for everyone", "all"),
        ("admins only", "admin"),
        ("employees only", "employee"),
    ] {
        let (status, created) = send(
            &app.router,
            "POST",
            "/api/notifications",
            Some(&ana_token),
            Some(json!({"title": title, "message": "msg", "target_role": target})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{created}");
    }

    let (_, bob_list) = send(&app.router, "GET", "/api/notifications", Some(&bob_token), None).await;
    let bob_titles: Vec<&str> = bob_list
        .as_array()
        .expect("list")
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert!(bob_titles.contains(&"for everyone"));
    assert!(bob_titles.contains(&"employees only"));
    assert!(!bob_titles.contains(&"admins only"));

    let (_, ana_list) = send(&app.router, "GET", "/api/notifications", Some(&ana_token), None).await;
    let ana_titles: Vec<&str> = ana_list
        .as_array()
        .expect("list")
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert!(ana_titles.contains(&"for everyone"));
    assert!(ana_titles.contains(&"admins only"));
    assert!(!ana_titles.contains(&"employees only"));

    // Everything starts unread
    assert!(bob_list.as_array().unwrap().iter().all(|n| n["is_read"] == json!(false)));
}

#[tokio::test]
async fn mark_read_is_idempotent() {
    let app = spawn_app().await;
    let (bob_token, _) = login(&app.router, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD).await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, created) = send(
        &app.router,
        "POST",
        "/api/notifications",
        Some(&ana_token),
        Some(json!({"title": "policy update", "message": "read me"})),
    )
    .await;
    let id = created["id"].as_i64().expect("notification id");

    let (status, first) = send(
        &app.router,
        "POST",
        &format!("/api/notifications/{id}/read"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["newly_read"], json!(true));

    // Second call succeeds without creating a duplicate
    let (status, second) = send(
        &app.router,
        "POST",
        &format!("/api/notifications/{id}/read"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["newly_read"], json!(false));

    let (_, list) = send(&app.router, "GET", "/api/notifications", Some(&bob_token), None).await;
    let entry = list
        .as_array()
        .expect("list")
        .iter()
        .find(|n| n["id"].as_i64() == Some(id))
        .expect("notification in list");
    assert_eq!(entry["is_read"], json!(true));
    assert!(entry["read_at"].is_i64());

    // Unknown notification id is NotFound
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/notifications/123456/read",
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_administration_is_admin_only() {
    let app = spawn_app().await;
    let (bob_token, _) = login(&app.router, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD).await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _) = send(&app.router, "GET", "/api/users", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let new_user = json!({
        "email": "carol@example.com",
        "password": "carol-password",
        "full_name": "Carol Jones",
        "role": "employee",
        "salary_type": "monthly",
        "monthly_salary": 2500.0
    });
    let (status, created) = send(
        &app.router,
        "POST",
        "/api/users",
        Some(&ana_token),
        Some(new_user.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["salary_type"], "monthly");
    assert!(created["hourly_rate"].is_null());
    assert!(created.get("hash_pass").is_none());
    let carol_id = created["id"].as_i64().expect("id");

    // Duplicate email conflicts
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/users",
        Some(&ana_token),
        Some(new_user),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Malformed email is a validation error
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/users",
        Some(&ana_token),
        Some(json!({
            "email": "not-an-email",
            "password": "password",
            "full_name": "X",
            "role": "employee",
            "salary_type": "hourly",
            "hourly_rate": 10.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The new account can log in...
    let (carol_token, _) = login(&app.router, "carol@example.com", "carol-password").await;
    let (status, _) = send(&app.router, "GET", "/api/auth/me", Some(&carol_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // ...until it is deactivated
    let (status, updated) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{carol_id}"),
        Some(&ana_token),
        Some(json!({"is_active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_active"], json!(false));

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "carol@example.com", "password": "carol-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn switching_salary_type_keeps_exactly_one_rate() {
    let app = spawn_app().await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, users) = send(&app.router, "GET", "/api/users", Some(&ana_token), None).await;
    let bob = users
        .as_array()
        .expect("users")
        .iter()
        .find(|u| u["email"] == EMPLOYEE_EMAIL)
        .expect("bob");
    assert_eq!(bob["salary_type"], "hourly");
    assert_eq!(bob["hourly_rate"], json!(15.0));
    assert!(bob["monthly_salary"].is_null());
    let bob_id = bob["id"].as_i64().expect("id");

    let (status, updated) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{bob_id}"),
        Some(&ana_token),
        Some(json!({"salary_type": "monthly", "monthly_salary": 2800.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["salary_type"], "monthly");
    assert_eq!(updated["monthly_salary"], json!(2800.0));
    assert!(updated["hourly_rate"].is_null());

    // Switching without supplying the matching rate is a validation error
    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{bob_id}"),
        Some(&ana_token),
        Some(json!({"salary_type": "hourly"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_reports_hours_and_estimated_salary() {
    let app = spawn_app().await;
    let (bob_token, bob_id) = login(&app.router, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD).await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // Give Bob a closed session via manual entry
    let check_in = shared::util::now_millis() - 3 * 3_600_000;
    let check_out = check_in + 2 * 3_600_000 + 30 * 60_000;
    let (status, _) = send(
        &app.router,
        "POST",
        "/api/attendance",
        Some(&ana_token),
        Some(json!({"user_id": bob_id, "check_in": check_in, "check_out": check_out})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, summary) = send(
        &app.router,
        "GET",
        "/api/dashboard/summary",
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{summary}");
    let month_hours = summary["month_hours"].as_f64().expect("month_hours");
    let estimated = summary["estimated_salary"].as_f64().expect("estimate");
    // Hourly profile: estimate = round2(month_hours × rate)
    let expected = (month_hours * 15.0 * 100.0).round() / 100.0;
    assert!((estimated - expected).abs() < 1e-9, "{estimated} vs {expected}");

    // Stats are admin-only
    let (status, _) = send(
        &app.router,
        "GET",
        "/api/dashboard/stats",
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) = send(
        &app.router,
        "GET",
        "/api/dashboard/stats",
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{stats}");
    assert_eq!(stats["total_employees"], json!(1));
    assert_eq!(stats["pending_salaries"], json!(0));
}

#[tokio::test]
async fn audit_trail_records_operations_and_verifies_chain() {
    let app = spawn_app().await;
    let (bob_token, bob_id) = login(&app.router, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD).await;
    let (ana_token, _) = login(&app.router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, record) = send(
        &app.router,
        "POST",
        "/api/attendance/check-in",
        Some(&bob_token),
        Some(json!({"user_id": bob_id})),
    )
    .await;
    let attendance_id = record["id"].as_i64().expect("id");
    send(
        &app.router,
        "POST",
        "/api/attendance/check-out",
        Some(&bob_token),
        Some(json!({"attendance_id": attendance_id})),
    )
    .await;

    // 2 logins + check_in + check_out
    wait_for_audit(&app.state, 4).await;

    // Audit access is admin-only
    let (status, _) = send(&app.router, "GET", "/api/audit-log", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, check_ins) = send(
        &app.router,
        "GET",
        "/api/audit-log?action=check_in",
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check_ins["total"], json!(1));
    assert_eq!(check_ins["items"][0]["entity_id"], json!(attendance_id));
    assert_eq!(check_ins["items"][0]["operator_id"], json!(bob_id));

    // Check-out captured before/after snapshots
    let (_, check_outs) = send(
        &app.router,
        "GET",
        "/api/audit-log?action=check_out",
        Some(&ana_token),
        None,
    )
    .await;
    let entry = &check_outs["items"][0];
    assert_eq!(entry["old_values"]["check_out"], Value::Null);
    assert!(entry["new_values"]["check_out"].is_i64());
    assert!(entry["new_values"]["total_hours"].is_number());

    // The hash chain is intact
    let (status, verification) = send(
        &app.router,
        "GET",
        "/api/audit-log/verify",
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verification["chain_intact"], json!(true));
    assert!(verification["total_entries"].as_i64().expect("entries") >= 4);
}
