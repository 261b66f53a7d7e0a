use std::sync::{Arc, OnceLock};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::{Duration, Local, NaiveDate};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use roster_api::auth::create_token;
use roster_api::credentials::hash_password;
use roster_api::members::bootstrap_admin;
use roster_api::{AppState, AppStateInner, router};
use roster_core::LockPolicy;
use roster_db::Database;
use roster_types::Member;

const PASSWORD: &str = "secret123";

/// Argon2 is slow in debug builds; hash the shared test password once.
fn known_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap())
}

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    fn new(lock_policy: LockPolicy) -> Self {
        let state: AppState = Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            jwt_secret: "test-secret".into(),
            token_days: 1,
            lock_policy,
        });
        Self {
            app: router(state.clone()),
            state,
        }
    }

    /// Insert a member directly, password already changed.
    fn member(&self, nickname: &str, is_admin: bool) -> (Member, String) {
        let id = Uuid::new_v4().to_string();
        let email = format!("{}@club.de", nickname.to_lowercase());
        self.state
            .db
            .create_member(&id, nickname, &email, known_hash(), is_admin)
            .unwrap();
        self.state.db.update_member_password(&id, known_hash(), false).unwrap();
        let member = self
            .state
            .db
            .get_member_by_id(&id)
            .unwrap()
            .unwrap()
            .into_member()
            .unwrap();
        let token = create_token(&self.state.jwt_secret, &member, 1).unwrap();
        (member, token)
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_event(&self, admin: &str, date: NaiveDate, time_from: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/admin/events",
                Some(admin),
                Some(json!({
                    "date": date,
                    "time_from": time_from,
                    "time_to": "23:30",
                    "location": "Sportplatz",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tokio::test]
async fn health_is_public_and_routes_need_a_token() {
    let t = TestApp::new(LockPolicy::Strict);
    let (status, body) = t.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = t.send(Method::GET, "/grid", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing or invalid token");

    let (status, _) = t.send(Method::GET, "/grid", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_checks_credentials() {
    let t = TestApp::new(LockPolicy::Strict);
    t.member("Anna", false);

    let (status, body) = t
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "anna@club.de", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid email or password");

    let (status, _) = t
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@club.de", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = t
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": " Anna@Club.de ", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["nickname"], "Anna");
    assert_eq!(body["must_change_password"], false);

    let token = body["token"].as_str().unwrap();
    let (status, me) = t.send(Method::GET, "/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "anna@club.de");
}

#[tokio::test]
async fn new_member_must_change_temporary_password() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);

    let (status, created) = t
        .send(
            Method::POST,
            "/admin/members",
            Some(&admin),
            Some(json!({ "nickname": "Tom", "email": "Tom@Club.de" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["member"]["email"], "tom@club.de");
    assert_eq!(created["member"]["must_change_password"], true);
    let temporary = created["password"].as_str().unwrap().to_string();
    assert_eq!(temporary.len(), 12);

    let (status, login) = t
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "tom@club.de", "password": temporary })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["must_change_password"], true);
    let token = login["token"].as_str().unwrap().to_string();

    let (status, body) = t.send(Method::GET, "/grid", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "password change required");

    let (status, body) = t
        .send(
            Method::POST,
            "/auth/password",
            Some(&token),
            Some(json!({ "new_password": "abc", "confirm_password": "abc" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password must be at least 6 characters long");

    let (status, body) = t
        .send(
            Method::POST,
            "/auth/password",
            Some(&token),
            Some(json!({ "new_password": "abcdef", "confirm_password": "abcdeg" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "passwords do not match");

    let (status, _) = t
        .send(
            Method::POST,
            "/auth/password",
            Some(&token),
            Some(json!({ "new_password": "abcdef", "confirm_password": "abcdef" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t.send(Method::GET, "/grid", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    t.member("Anna", false);

    let (status, body) = t
        .send(
            Method::POST,
            "/admin/members",
            Some(&admin),
            Some(json!({ "nickname": "Anna B", "email": "ANNA@club.de" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email is already registered");

    let (status, _) = t
        .send(
            Method::POST,
            "/admin/members",
            Some(&admin),
            Some(json!({ "nickname": "  ", "email": "x@club.de" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_routes_reject_members() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, member) = t.member("Anna", false);

    for (method, uri) in [
        (Method::GET, "/admin/members"),
        (Method::POST, "/admin/events"),
        (Method::PUT, "/admin/season"),
    ] {
        let (status, body) = t.send(method, uri, Some(&member), Some(json!({}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"], "admin rights required");
    }
}

#[tokio::test]
async fn recurring_events_follow_weekdays() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    let from = today() + Duration::days(7);
    let to = from + Duration::days(6);

    let (status, body) = t
        .send(
            Method::POST,
            "/admin/events/recurring",
            Some(&admin),
            Some(json!({
                "date_from": from,
                "date_to": to,
                "weekdays": [1, 3],
                "time_from": "18:00",
                "time_to": "20:00",
                "location": "Halle",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert!(created[0]["date"].as_str() < created[1]["date"].as_str());

    let (status, events) = t.send(Method::GET, "/events?only_future=true", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 2);
    assert_eq!(events[0]["time_from"], "18:00");
}

#[tokio::test]
async fn invalid_recurrence_writes_nothing() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    let from = today() + Duration::days(7);

    for (weekdays, date_to, error) in [
        (json!([]), from + Duration::days(6), "at least one weekday must be selected"),
        (json!([1]), from - Duration::days(1), ""),
    ] {
        let (status, body) = t
            .send(
                Method::POST,
                "/admin/events/recurring",
                Some(&admin),
                Some(json!({
                    "date_from": from,
                    "date_to": date_to,
                    "weekdays": weekdays,
                    "time_from": "18:00",
                    "time_to": "20:00",
                    "location": "Halle",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        if !error.is_empty() {
            assert_eq!(body["error"], error);
        }
    }

    let (_, events) = t.send(Method::GET, "/events", Some(&admin), None).await;
    assert!(events.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn registration_upsert_and_aggregation() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    let (anna, anna_token) = t.member("Anna", false);
    let (_, tom_token) = t.member("Tom", false);
    let event = t.create_event(&admin, today() + Duration::days(3), "18:00").await;
    let uri = format!("/events/{event}/registration");

    let (status, first) = t
        .send(
            Method::PUT,
            &uri,
            Some(&anna_token),
            Some(json!({ "status": "yes", "comment": "komme", "guests": 2, "items": { "ball": true } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{first}");

    let (status, second) = t
        .send(
            Method::PUT,
            &uri,
            Some(&anna_token),
            Some(json!({ "status": "yes", "guests": 1, "items": { "ball": true, "pumpe": true } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["comment"], Value::Null);
    assert_eq!(second["guests"], 1);

    let (status, _) = t
        .send(
            Method::PUT,
            &uri,
            Some(&tom_token),
            Some(json!({ "status": "no", "guests": 3, "items": { "ball": true } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, regs) = t.send(Method::GET, "/registrations", Some(&admin), None).await;
    assert_eq!(regs.as_array().unwrap().len(), 2);

    let (status, summary) = t.send(Method::GET, &format!("/events/{event}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["locked"], false);
    assert_eq!(summary["attendance"], json!({ "members": 1, "guests": 1, "total": 2 }));
    assert_eq!(summary["meets_minimum"], false);
    let ball = summary["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["key"] == "ball")
        .unwrap();
    assert_eq!(ball["bringers"], json!(["Anna"]));

    let (status, grid) = t.send(Method::GET, "/grid", Some(&anna_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grid["season"], "summer");
    assert_eq!(grid["members"].as_array().unwrap().len(), 3);
    let anna_cell = grid["cells"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["member_id"] == json!(anna.id))
        .unwrap();
    assert_eq!(anna_cell["status"], "yes");
    assert_eq!(anna_cell["registered"], true);
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, member) = t.member("Anna", false);
    let uri = format!("/events/{}/registration", Uuid::new_v4());
    let (status, body) = t
        .send(Method::PUT, &uri, Some(&member), Some(json!({ "status": "yes" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "event not found");
}

#[tokio::test]
async fn locked_events_reject_writes() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    let (_, member) = t.member("Anna", false);
    let past = t.create_event(&admin, today() - Duration::days(1), "18:00").await;
    let uri = format!("/events/{past}/registration");

    for token in [member.as_str(), admin.as_str()] {
        let (status, body) = t
            .send(Method::PUT, &uri, Some(token), Some(json!({ "status": "yes" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "event is locked for changes");
    }
}

#[tokio::test]
async fn admin_exempt_policy_lets_admins_edit_locked_events() {
    let t = TestApp::new(LockPolicy::AdminExempt);
    let (_, admin) = t.member("Max", true);
    let (anna, member) = t.member("Anna", false);
    let past = t.create_event(&admin, today() - Duration::days(1), "18:00").await;

    let (status, _) = t
        .send(
            Method::PUT,
            &format!("/events/{past}/registration"),
            Some(&member),
            Some(json!({ "status": "yes" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/admin/events/{past}/registrations/{}", anna.id),
            Some(&admin),
            Some(json!({ "status": "yes", "guests": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["member_id"], json!(anna.id));
}

#[tokio::test]
async fn deleting_an_event_cascades() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    let (_, member) = t.member("Anna", false);
    let event = t.create_event(&admin, today() + Duration::days(2), "18:00").await;

    let (status, _) = t
        .send(
            Method::PUT,
            &format!("/events/{event}/registration"),
            Some(&member),
            Some(json!({ "status": "yes", "guests": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .send(Method::DELETE, &format!("/admin/events/{event}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, regs) = t.send(Method::GET, "/registrations", Some(&admin), None).await;
    assert!(regs.as_array().unwrap().is_empty());

    let (_, grid) = t.send(Method::GET, "/grid", Some(&admin), None).await;
    assert!(grid["events"].as_array().unwrap().is_empty());

    let (status, _) = t
        .send(Method::DELETE, &format!("/admin/events/{event}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn season_is_admin_controlled() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);

    let (status, season) = t.send(Method::GET, "/season", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(season["season"], "summer");
    assert_eq!(season["min_players"], 12);
    assert_eq!(season["items"].as_array().unwrap().len(), 5);
    assert_eq!(season["items"][0], json!({ "label": "Schlüssel", "key": "schluessel" }));

    let (status, updated) = t
        .send(Method::PUT, "/admin/season", Some(&admin), Some(json!({ "season": "winter" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["min_players"], 8);

    let (_, season) = t.send(Method::GET, "/season", Some(&admin), None).await;
    assert_eq!(season["season"], "winter");
    let labels: Vec<&str> = season["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Hallenball", "Pumpe", "Überzieher"]);

    let (status, _) = t
        .send(Method::PUT, "/admin/season", Some(&admin), Some(json!({ "season": "spring" })))
        .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn inactive_members_are_hidden_and_read_only() {
    let t = TestApp::new(LockPolicy::Strict);
    let (admin_member, admin) = t.member("Max", true);
    let (anna, member) = t.member("Anna", false);
    let event = t.create_event(&admin, today() + Duration::days(2), "18:00").await;

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/admin/members/{}/active", anna.id),
            Some(&admin),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let (_, roster) = t.send(Method::GET, "/members", Some(&admin), None).await;
    assert_eq!(roster.as_array().unwrap().len(), 1);
    let (_, everyone) = t.send(Method::GET, "/admin/members", Some(&admin), None).await;
    assert_eq!(everyone.as_array().unwrap().len(), 2);

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/events/{event}/registration"),
            Some(&member),
            Some(json!({ "status": "yes" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "account is inactive");

    let (status, _) = t
        .send(
            Method::PUT,
            &format!("/admin/members/{}/active", admin_member.id),
            Some(&admin),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .send(
            Method::PUT,
            &format!("/admin/members/{}/active", Uuid::new_v4()),
            Some(&admin),
            Some(json!({ "is_active": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_password_reset_forces_change() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    let (anna, member) = t.member("Anna", false);

    let (status, body) = t
        .send(
            Method::POST,
            &format!("/admin/members/{}/reset-password", anna.id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["password"].as_str().unwrap().len(), 12);

    let (status, _) = t.send(Method::GET, "/members", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[test]
fn bootstrap_admin_only_on_empty_store() {
    let db = Database::open_in_memory().unwrap();
    let password = bootstrap_admin(&db, "Chef@Club.de", "Chef").unwrap();
    assert!(password.is_some());

    let admin = db.get_member_by_email("chef@club.de").unwrap().unwrap();
    assert!(admin.is_admin);
    assert!(admin.must_change_password);

    assert!(bootstrap_admin(&db, "other@club.de", "Other").unwrap().is_none());
    assert_eq!(db.count_members().unwrap(), 1);
}

#[tokio::test]
async fn deactivated_members_are_not_listed_as_bringers() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    let (lisa, lisa_token) = t.member("Lisa", false);
    let (_, tom_token) = t.member("Tom", false);
    let event = t.create_event(&admin, today() + Duration::days(3), "18:00").await;
    let uri = format!("/events/{event}/registration");

    for token in [lisa_token.as_str(), tom_token.as_str()] {
        let (status, _) = t
            .send(
                Method::PUT,
                &uri,
                Some(token),
                Some(json!({ "status": "yes", "items": { "ball": true } })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    assert!(t.state.db.set_member_active(&lisa.id.to_string(), false).unwrap());

    let (status, summary) = t.send(Method::GET, &format!("/events/{event}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let ball = summary["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["key"] == "ball")
        .unwrap();
    assert_eq!(ball["bringers"], json!(["Tom"]));

    let (_, grid) = t.send(Method::GET, "/grid", Some(&admin), None).await;
    let ball = grid["events"][0]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["key"] == "ball")
        .unwrap();
    assert_eq!(ball["bringers"], json!(["Tom"]));
}

#[tokio::test]
async fn concurrent_creates_with_one_email_conflict() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);
    let body = json!({ "nickname": "Tom", "email": "tom@club.de" });

    let (a, b) = tokio::join!(
        t.send(Method::POST, "/admin/members", Some(&admin), Some(body.clone())),
        t.send(Method::POST, "/admin/members", Some(&admin), Some(body.clone())),
    );
    let mut statuses = [a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let (status, body) = t.send(Method::POST, "/admin/members", Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email is already registered");
    assert_eq!(t.state.db.count_members().unwrap(), 2);
}

#[tokio::test]
async fn deactivated_admin_cannot_edit_for_others() {
    let t = TestApp::new(LockPolicy::AdminExempt);
    let (max, admin) = t.member("Max", true);
    let (anna, _) = t.member("Anna", false);
    let event = t.create_event(&admin, today() + Duration::days(3), "18:00").await;

    assert!(t.state.db.set_member_active(&max.id.to_string(), false).unwrap());

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/admin/events/{event}/registrations/{}", anna.id),
            Some(&admin),
            Some(json!({ "status": "yes" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "account is inactive");

    let (_, regs) = t.send(Method::GET, "/registrations", Some(&admin), None).await;
    assert!(regs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn overlong_recurrence_is_rejected() {
    let t = TestApp::new(LockPolicy::Strict);
    let (_, admin) = t.member("Max", true);

    let (status, body) = t
        .send(
            Method::POST,
            "/admin/events/recurring",
            Some(&admin),
            Some(json!({
                "date_from": "0001-01-01",
                "date_to": "9999-12-31",
                "weekdays": [0, 1, 2, 3, 4, 5, 6],
                "time_from": "18:00",
                "time_to": "20:00",
                "location": "Halle",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("date range spans"));

    let (_, events) = t.send(Method::GET, "/events", Some(&admin), None).await;
    assert!(events.as_array().unwrap().is_empty());
}
