//! Request/response cycle through the full router, backed by in-memory
//! SQLite.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, TokenService, router};

const SECRET: &str = "route-test-secret";

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::AccountsMigrator::up(&db, None).await.unwrap();
    migration::LedgersMigrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4) // bcrypt minimum cost (bcrypt::MIN_COST is private)
        .build()
        .await
        .unwrap();
    router(ServerState {
        engine: std::sync::Arc::new(engine),
        tokens: std::sync::Arc::new(TokenService::new(SECRET)),
    })
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => Body::from(serde_json::to_vec(&json).unwrap()),
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Register and log in, returning `(id, token)`.
async fn sign_up(app: &Router, name: &str) -> (String, String) {
    let email = format!("{name}@example.com");
    let (status, body) = call(
        app,
        "POST",
        "/user",
        None,
        Some(json!({"Username": name, "Email": email, "Password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["Data"]["Email"], email.as_str());

    let (status, body) = call(
        app,
        "POST",
        "/user/login",
        None,
        Some(json!({"Email": email, "Password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        body["Data"]["UUID"].as_str().unwrap().to_string(),
        body["Data"]["Token"].as_str().unwrap().to_string(),
    )
}

async fn open_ledger(app: &Router, token: &str, members: Value) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/ledger",
        Some(token),
        Some(json!({
            "Name": "Flat",
            "Notification": true,
            "Theme": "dark",
            "Currency": "EUR",
            "Types": {"ParentTypes": [
                {"PTID": 1, "Name": "Food", "ChildTypes": [{"CTID": 1, "Name": "Groceries"}]}
            ]},
            "Members": members,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["Data"]["ULID"].as_str().unwrap().to_string()
}

fn transaction(payer: &str, sharers: Value, amount: i64) -> Value {
    let at = Utc::now().timestamp() - 60;
    json!({
        "Amount": amount,
        "RecordTime": at,
        "UpdateTime": at,
        "Type": {"Action": "expense", "ParentType": 1, "ChildType": 1},
        "Name": "Groceries",
        "Payer": payer,
        "Sharers": sharers,
    })
}

#[tokio::test]
async fn ledger_and_transaction_lifecycle() {
    let app = app().await;
    let (alice, token) = sign_up(&app, "alice").await;
    let (bob, bob_token) = sign_up(&app, "bob").await;

    let ledger = open_ledger(&app, &token, json!([{"UUID": alice, "Nickname": "Al"}])).await;

    let (status, _) = call(
        &app,
        "POST",
        &format!("/ledger/{ledger}/member"),
        Some(&token),
        Some(json!({"UUID": bob, "Nickname": "Bobby"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "GET", "/ledger", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Status"], true);
    let ledgers = body["Data"].as_array().unwrap();
    assert_eq!(ledgers.len(), 1);
    assert_eq!(ledgers[0]["ULID"], ledger.as_str());
    assert_eq!(ledgers[0]["Members"][1]["Nickname"], "Bobby");
    assert_eq!(ledgers[0]["Types"]["ParentTypes"][0]["ChildTypes"][0]["CTID"], 1);

    let (status, body) = call(
        &app,
        "POST",
        &format!("/ledger/{ledger}/transaction"),
        Some(&bob_token),
        Some(transaction(
            &alice,
            json!([{"UUID": alice, "Amount": 600}, {"UUID": bob, "Amount": 400}]),
            1000,
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let utid = body["Data"]["UTID"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "GET",
        &format!("/ledger/{ledger}/transaction/{utid}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Data"]["Amount"], 1000);
    assert_eq!(body["Data"]["Payer"], alice.as_str());
    assert_eq!(body["Data"]["Type"]["Action"], "expense");
    assert_eq!(body["Data"]["Sharers"][1]["UUID"], bob.as_str());

    let (status, body) = call(
        &app,
        "GET",
        &format!(
            "/ledger/{ledger}/transaction/time?StartTime=0&EndTime={}",
            u32::MAX
        ),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Data"].as_array().unwrap().len(), 1);

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/ledger/{ledger}/transaction/{utid}"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(
        &app,
        "GET",
        &format!("/ledger/{ledger}/transaction/{utid}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Message"], "transaction not found");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = app().await;
    let (alice, _) = sign_up(&app, "alice").await;

    let (status, body) = call(&app, "GET", "/ledger", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["Status"], false);
    assert_eq!(body["Message"], "Authorization header is missing");

    let expired = TokenService::new(SECRET)
        .issue_expiring_at(&alice, "alice@example.com", Utc::now() - Duration::minutes(1))
        .unwrap();
    let (status, body) = call(&app, "GET", "/ledger", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["Message"], "token is expired");
    assert_eq!(body["Code"], "unauthorized");

    let forged = TokenService::new("someone-else")
        .issue(&alice, "alice@example.com")
        .unwrap();
    let (status, body) = call(&app, "GET", "/ledger", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["Message"],
        "signature validation failed (token's content has been tampered with)"
    );
}

#[tokio::test]
async fn malformed_path_ids_are_rejected() {
    let app = app().await;
    let (_, token) = sign_up(&app, "alice").await;

    let (status, body) = call(
        &app,
        "GET",
        "/ledger/NOT-AN-ID/transaction/time?StartTime=0&EndTime=1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Message"], "ULID is not in valid format");
}

#[tokio::test]
async fn transaction_rules_surface_as_400() {
    let app = app().await;
    let (alice, token) = sign_up(&app, "alice").await;
    let (bob, _) = sign_up(&app, "bob").await;
    let ledger = open_ledger(&app, &token, json!([{"UUID": alice, "Nickname": "Al"}])).await;
    let uri = format!("/ledger/{ledger}/transaction");

    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(transaction(
            &alice,
            json!([{"UUID": alice, "Amount": 60}, {"UUID": alice, "Amount": 39}]),
            100,
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["Message"],
        "amount should be equal to the sum of sharers' amount"
    );

    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(transaction(&bob, json!([{"UUID": alice, "Amount": 100}]), 100)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Message"], "payer is not a member of the ledger");
    assert_eq!(body["Code"], "not_a_member");

    let mut gift = transaction(&alice, json!([{"UUID": alice, "Amount": 100}]), 100);
    gift["Type"]["Action"] = json!("gift");
    let (status, body) = call(&app, "POST", &uri, Some(&token), Some(gift)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["Message"],
        "type.action should be income or expense or transfer"
    );

    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({"Amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Code"], "validation");

    let (status, body) = call(
        &app,
        "GET",
        &format!("{uri}/time?StartTime=0&EndTime={}", u32::MAX),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["Data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn account_conflicts_and_membership_errors() {
    let app = app().await;
    let (alice, token) = sign_up(&app, "alice").await;
    let (bob, bob_token) = sign_up(&app, "bob").await;

    let (status, body) = call(
        &app,
        "POST",
        "/user",
        None,
        Some(json!({"Username": "again", "Email": "alice@example.com", "Password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["Message"], "email already exists");

    let (status, body) = call(
        &app,
        "PUT",
        "/user/",
        Some(&bob_token),
        Some(json!({"UUID": alice, "Username": "x", "Email": "x@example.com", "Is_Pro": true})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["Message"], "Can not update other user's info");

    let (status, body) = call(&app, "GET", &format!("/user/{alice}"), Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Data"]["Username"], "alice");
    assert_eq!(body["Data"]["Is_Pro"], false);

    let ledger = open_ledger(&app, &token, json!([{"UUID": alice, "Nickname": "Al"}])).await;
    let member_uri = format!("/ledger/{ledger}/member");

    let (status, _) = call(
        &app,
        "POST",
        &member_uri,
        Some(&token),
        Some(json!({"UUID": bob, "Nickname": "B"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(
        &app,
        "POST",
        &member_uri,
        Some(&token),
        Some(json!({"UUID": bob, "Nickname": "B"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["Message"], "user already exists in the ledger");

    let (status, _) = call(&app, "DELETE", &member_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = call(&app, "DELETE", &member_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Message"], "user not found in the ledger");

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/ledger/{ledger}/"),
        Some(&token),
        Some(json!({"Theme": "light"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Status"], true);
}

#[tokio::test]
async fn ledger_creation_needs_notification_and_types() {
    let app = app().await;
    let (alice, token) = sign_up(&app, "alice").await;

    let (status, body) = call(
        &app,
        "POST",
        "/ledger",
        Some(&token),
        Some(json!({
            "Name": "Flat",
            "Theme": "dark",
            "Currency": "EUR",
            "Members": [{"UUID": alice, "Nickname": "Al"}],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Status"], false);
    assert_eq!(body["Code"], "validation");

    let (status, body) = call(&app, "GET", "/ledger", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["Data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn transaction_update_nickname_and_range_routes() {
    let app = app().await;
    let (alice, token) = sign_up(&app, "alice").await;
    let (bob, _) = sign_up(&app, "bob").await;
    let ledger = open_ledger(&app, &token, json!([{"UUID": alice, "Nickname": "Al"}])).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/ledger/{ledger}/transaction"),
        Some(&token),
        Some(transaction(&alice, json!([{"UUID": alice, "Amount": 100}]), 100)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!(
        "/ledger/{ledger}/transaction/{}",
        body["Data"]["UTID"].as_str().unwrap()
    );

    let mut edited = transaction(&alice, json!([{"UUID": alice, "Amount": 250}]), 250);
    edited["Name"] = json!("Dinner");
    edited["Type"]["Action"] = json!("income");
    let (status, body) = call(&app, "PUT", &uri, Some(&token), Some(edited)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Status"], true);

    let (status, body) = call(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Data"]["Amount"], 250);
    assert_eq!(body["Data"]["Name"], "Dinner");
    assert_eq!(body["Data"]["Type"]["Action"], "income");
    assert_eq!(body["Data"]["ULID"], ledger.as_str());

    let (status, body) = call(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(transaction(&bob, json!([{"UUID": alice, "Amount": 250}]), 250)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Code"], "not_a_member");
    assert_eq!(body["Message"], "payer is not a member of the ledger");

    let (_, body) = call(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(body["Data"]["Payer"], alice.as_str());

    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/ledger/{ledger}/member"),
        Some(&token),
        Some(json!({"Nickname": "Ally"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "GET", "/ledger", Some(&token), None).await;
    assert_eq!(body["Data"][0]["Members"][0]["Nickname"], "Ally");

    let (status, body) = call(
        &app,
        "GET",
        &format!("/ledger/{ledger}/transaction/time?StartTime=10&EndTime=1"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Message"], "start time should not be after end time");
}

#[tokio::test]
async fn malformed_account_id_is_rejected() {
    let app = app().await;
    let (_, token) = sign_up(&app, "alice").await;

    let (status, body) = call(&app, "GET", "/user/Alice", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Message"], "UUID is not valid format");
}
