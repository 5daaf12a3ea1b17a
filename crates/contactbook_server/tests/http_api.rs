use std::net::SocketAddr;
use std::sync::Arc;

use chrono::NaiveDate;
use contactbook_core::db::open_db_in_memory;
use contactbook_core::{ContactServiceOptions, FixedClock};
use contactbook_server::{router, AppState, ContactStore};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_app() -> SocketAddr {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = ContactStore::from_connection(conn, ContactServiceOptions::default())
        .expect("bootstrapped store");
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).expect("valid date");
    let state = AppState::new(store, Arc::new(FixedClock(today)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("serve app");
    });
    addr
}

async fn send_raw(addr: SocketAddr, method: &str, path: &str, body: Option<&str>) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    match body {
        Some(body) => {
            req.push_str("Content-Type: application/json\r\n");
            req.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
        }
        None => req.push_str("Content-Length: 0\r\n\r\n"),
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, body.to_string())
}

async fn send_json(addr: SocketAddr, method: &str, path: &str, body: Option<&Value>) -> (u16, Value) {
    let encoded = body.map(Value::to_string);
    let (status, body) = send_raw(addr, method, path, encoded.as_deref()).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };
    (status, value)
}

fn contact_json(first: &str, last: &str, email: &str, birthday: &str) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "email": email,
        "phone": "555-0100",
        "birthday": birthday,
        "additional_data": "",
    })
}

fn first_names(body: &Value) -> Vec<String> {
    body["contacts"]
        .as_array()
        .expect("contacts array")
        .iter()
        .map(|c| c["first_name"].as_str().expect("first_name").to_string())
        .collect()
}

async fn seed(addr: SocketAddr) {
    for payload in [
        contact_json("Bob", "Stone", "bob@example.com", "1990-06-12"),
        contact_json("Alice", "Young", "alice@example.com", "1985-12-30"),
        contact_json("Carol", "Adams", "carol@work.org", "1992-06-20"),
    ] {
        let (status, body) = send_json(addr, "POST", "/contacts", Some(&payload)).await;
        assert_eq!(status, 201, "{body}");
    }
}

#[tokio::test]
async fn health_reports_version() {
    let addr = spawn_app().await;
    let (status, body) = send_json(addr, "GET", "/health", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn create_then_get_update_delete() {
    let addr = spawn_app().await;
    let payload = contact_json("Ann", "Lee", "ann@example.com", "1990-01-15");
    let (status, body) = send_json(addr, "POST", "/contacts", Some(&payload)).await;
    assert_eq!(status, 201);
    assert_eq!(body, json!({"message": "Contact created"}));

    let (status, body) = send_json(addr, "GET", "/contacts/1", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["contact"]["id"], 1);
    assert_eq!(body["contact"]["first_name"], "Ann");
    assert_eq!(body["contact"]["additional_data"], "");

    let mut changed = payload.clone();
    changed["phone"] = json!("555-0199");
    let (status, body) = send_json(addr, "PUT", "/contacts/1", Some(&changed)).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Contact updated"}));

    let (_, body) = send_json(addr, "GET", "/contacts/1", None).await;
    assert_eq!(body["contact"]["phone"], "555-0199");

    let (status, body) = send_json(addr, "DELETE", "/contacts/1", None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Contact deleted"}));

    let (status, body) = send_json(addr, "GET", "/contacts/1", None).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"detail": "Contact not found"}));
}

#[tokio::test]
async fn missing_contacts_return_not_found() {
    let addr = spawn_app().await;
    let payload = contact_json("Ann", "Lee", "ann@example.com", "1990-01-15");

    let (status, body) = send_json(addr, "PUT", "/contacts/42", Some(&payload)).await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "Contact not found");

    let (status, body) = send_json(addr, "DELETE", "/contacts/42", None).await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "Contact not found");
}

#[tokio::test]
async fn invalid_input_is_unprocessable() {
    let addr = spawn_app().await;

    let empty_name = contact_json("", "Lee", "ann@example.com", "1990-01-15");
    let (status, body) = send_json(addr, "POST", "/contacts", Some(&empty_name)).await;
    assert_eq!(status, 422);
    assert!(body["detail"].as_str().expect("detail").contains("first_name"));

    let bad_birthday = contact_json("Ann", "Lee", "ann@example.com", "1990-02-30");
    let (status, _) = send_json(addr, "POST", "/contacts", Some(&bad_birthday)).await;
    assert_eq!(status, 422);

    let (status, body) = send_raw(addr, "POST", "/contacts", Some("{not json")).await;
    assert_eq!(status, 422);
    assert!(body.contains("detail"));

    let (status, _) = send_json(addr, "GET", "/contacts/abc", None).await;
    assert_eq!(status, 422);

    let (_, body) = send_json(addr, "GET", "/contacts/all", None).await;
    assert_eq!(body["contacts"], json!([]));
}

#[tokio::test]
async fn update_with_missing_field_leaves_row_unchanged() {
    let addr = spawn_app().await;
    let payload = contact_json("Ann", "Lee", "ann@example.com", "1990-01-15");
    send_json(addr, "POST", "/contacts", Some(&payload)).await;

    let partial = json!({"first_name": "Changed"});
    let (status, body) = send_json(addr, "PUT", "/contacts/1", Some(&partial)).await;
    assert_eq!(status, 422);
    assert!(body["detail"].is_string());

    let (_, body) = send_json(addr, "GET", "/contacts/1", None).await;
    assert_eq!(body["contact"]["first_name"], "Ann");
}

#[tokio::test]
async fn list_sorts_and_paginates() {
    let addr = spawn_app().await;
    seed(addr).await;

    let (status, body) = send_json(addr, "GET", "/contacts", None).await;
    assert_eq!(status, 200);
    assert_eq!(first_names(&body), ["Bob", "Alice", "Carol"]);

    let (_, body) = send_json(addr, "GET", "/contacts?sort_by=first_name", None).await;
    assert_eq!(first_names(&body), ["Alice", "Bob", "Carol"]);

    let (_, body) = send_json(
        addr,
        "GET",
        "/contacts?sort_by=last_name&sort_order=desc",
        None,
    )
    .await;
    assert_eq!(first_names(&body), ["Alice", "Bob", "Carol"]);

    let (_, body) = send_json(
        addr,
        "GET",
        "/contacts?sort_by=first_name&page=2&page_size=2",
        None,
    )
    .await;
    assert_eq!(first_names(&body), ["Carol"]);

    let (_, body) = send_json(addr, "GET", "/contacts?page=9", None).await;
    assert_eq!(body["contacts"], json!([]));

    let (status, body) = send_json(addr, "GET", "/contacts?page=0", None).await;
    assert_eq!(status, 422);
    assert!(body["detail"].as_str().expect("detail").contains("page"));

    let (status, _) = send_json(addr, "GET", "/contacts?page_size=abc", None).await;
    assert_eq!(status, 422);

    let (status, body) = send_json(addr, "GET", "/contacts/all", None).await;
    assert_eq!(status, 200);
    assert_eq!(first_names(&body), ["Bob", "Alice", "Carol"]);
}

#[tokio::test]
async fn search_uses_wildcard_matching_by_default() {
    let addr = spawn_app().await;
    seed(addr).await;

    let (status, body) = send_json(addr, "GET", "/contacts/search", None).await;
    assert_eq!(status, 200);
    assert_eq!(first_names(&body).len(), 3);

    let (_, body) = send_json(addr, "GET", "/contacts/search?name=Car", None).await;
    assert_eq!(first_names(&body).len(), 3);
}

#[tokio::test]
async fn upcoming_birthdays_use_server_today() {
    let addr = spawn_app().await;
    seed(addr).await;

    let (status, body) = send_json(addr, "GET", "/contacts/upcoming_birthdays", None).await;
    assert_eq!(status, 200);
    assert_eq!(first_names(&body), ["Bob"]);
}
