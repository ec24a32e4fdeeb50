//! Integration tests for the conference backend.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::{Config, LogFormat, StorageBackend};
use crate::db::{open_store, Repository};
use crate::{create_router, AppState};

const API_KEY: &str = "test-api-key";

/// Test fixture for integration tests.
struct TestFixture {
    /// Sends the admin key on every request.
    admin: Client,
    /// Sends no credentials.
    public: Client,
    base_url: String,
    temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_options(Some(API_KEY.to_string()), StorageBackend::JsonFiles).await
    }

    async fn with_options(psk: Option<String>, storage: StorageBackend) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let config = Config {
            api_psk: psk.clone(),
            data_dir: temp_dir.path().join("data"),
            storage,
            db_path: temp_dir.path().join("test.sqlite"),
            upload_dir: temp_dir.path().join("uploads"),
            max_upload_bytes: 1024,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
        };

        let store = open_store(&config).await.expect("Failed to open store");
        let state = AppState {
            repo: Arc::new(Repository::new(store)),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut admin_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            admin_builder = admin_builder.default_headers(headers);
        }

        TestFixture {
            admin: admin_builder.build().unwrap(),
            public: Client::new(),
            base_url,
            temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.admin.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .admin
            .request(method, self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::POST, path, body).await
    }

    async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::PATCH, path, body).await
    }

    async fn create_poll(&self, options: &[&str], allow_multiple: bool) -> Value {
        let (status, body) = self
            .post(
                "/api/voting",
                json!({
                    "action": "create_poll",
                    "title": "Favourite session?",
                    "description": "Pick one",
                    "options": options,
                    "allowMultiple": allow_multiple
                }),
            )
            .await;
        assert_eq!(status, 200, "{}", body);
        body["data"].clone()
    }

    async fn vote(&self, poll: &Value, option: usize, voter: &str) -> (StatusCode, Value) {
        self.post(
            "/api/voting",
            json!({
                "action": "vote",
                "pollId": poll["id"],
                "optionId": poll["options"][option]["id"],
                "voterId": voter
            }),
        )
        .await
    }
}

fn delegate(first: &str, email: &str, ticket: &str) -> Value {
    json!({
        "firstName": first,
        "lastName": "Tester",
        "email": email,
        "ticketType": ticket
    })
}

fn booking(delegates: Vec<Value>) -> Value {
    json!({
        "delegates": delegates,
        "billingInfo": {
            "cardholderName": "Pat Payer",
            "cardholderPhone": "01234 567890",
            "company": "Acme Ltd",
            "streetAddress": "1 High Street",
            "city": "Stratford",
            "postalCode": "CV37 6YR"
        }
    })
}

// ============================================================================
// Health & auth
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .public
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_admin_route_requires_key() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .public
        .get(fixture.url("/api/registrations"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let resp = fixture
        .public
        .get(fixture.url("/api/registrations"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = fixture
        .public
        .get(fixture.url("/api/registrations"))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_public_routes_need_no_key() {
    let fixture = TestFixture::new().await;

    let public_paths = [
        "/api/sponsors",
        "/api/agenda",
        "/api/tabs",
        "/api/venue",
        "/api/branding",
        "/api/messages",
        "/api/voting",
    ];
    for path in public_paths {
        let resp = fixture.public.get(fixture.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 200, "{}", path);
    }

    let resp = fixture
        .public
        .post(fixture.url("/api/sponsors"))
        .json(&json!([]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_open_when_no_psk_configured() {
    let fixture = TestFixture::with_options(None, StorageBackend::JsonFiles).await;

    let resp = fixture
        .public
        .get(fixture.url("/api/registrations"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

// ============================================================================
// Registrations
// ============================================================================

#[tokio::test]
async fn test_single_registration() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/registrations",
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "ticketType": "CONFERENCE_ONLY",
                "company": "Analytical Engines"
            }),
        )
        .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["success"], true);

    let reference = body["data"]["reference"].as_str().unwrap().to_string();
    let pattern = regex::Regex::new(r"^FWD\d{6}$").unwrap();
    assert!(pattern.is_match(&reference), "{}", reference);

    let created = &body["data"]["registrations"][0];
    assert_eq!(created["bookingReference"], reference.as_str());
    assert_eq!(created["status"], "pending");
    assert_eq!(created["company"], "Analytical Engines");
    assert_eq!(created["billingEmail"], "ada@example.com");

    let (_, list) = fixture.get("/api/registrations").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_batch_registration_shares_reference() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/registrations",
            booking(vec![
                delegate("A", "a@example.com", "CONFERENCE_ONLY"),
                delegate("B", "b@example.com", "CONFERENCE_DINNER"),
            ]),
        )
        .await;
    assert_eq!(status, 200, "{}", body);

    let base = body["data"]["reference"].as_str().unwrap();
    let regs = body["data"]["registrations"].as_array().unwrap();
    assert_eq!(regs.len(), 2);
    assert_eq!(regs[0]["bookingReference"], format!("{}-1", base));
    assert_eq!(regs[1]["bookingReference"], format!("{}-2", base));
    assert_eq!(regs[0]["billingName"], "Pat Payer");
    assert_eq!(regs[0]["billingPhone"], "01234 567890");
    assert_eq!(regs[0]["billingAddress"], "1 High Street, Stratford, CV37 6YR");
    assert_eq!(regs[1]["company"], "Acme Ltd");
    assert_eq!(regs[1]["billingEmail"], "b@example.com");

    // Filter by batch reference
    let (_, filtered) = fixture
        .get(&format!("/api/registrations?reference={}", base))
        .await;
    assert_eq!(filtered["data"].as_array().unwrap().len(), 2);

    let (_, filtered) = fixture
        .get(&format!("/api/registrations?reference={}-2", base))
        .await;
    assert_eq!(filtered["data"].as_array().unwrap().len(), 1);

    // Second booking gets a different reference
    let (_, second) = fixture
        .post(
            "/api/registrations",
            booking(vec![delegate("C", "c@example.com", "CONFERENCE_ONLY")]),
        )
        .await;
    assert_ne!(second["data"]["reference"], base);
}

#[tokio::test]
async fn test_invalid_batch_persists_nothing() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/registrations",
            booking(vec![
                delegate("A", "a@example.com", "CONFERENCE_ONLY"),
                delegate("B", "not-an-email", "CONFERENCE_ONLY"),
            ]),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("delegates[1].email"));

    let (status, _) = fixture
        .post(
            "/api/registrations",
            booking(vec![delegate("A", "a@example.com", "PLATINUM_PASS")]),
        )
        .await;
    assert_eq!(status, 400);

    let (_, list) = fixture.get("/api/registrations").await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_registration_status_lifecycle() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture
        .post(
            "/api/registrations",
            booking(vec![delegate("A", "a@example.com", "CONFERENCE_ONLY")]),
        )
        .await;
    let id = body["data"]["registrations"][0]["id"].as_str().unwrap().to_string();
    let path = format!("/api/registrations/{}", id);

    let (status, body) = fixture.patch(&path, json!({ "status": "confirmed" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "confirmed");

    let (status, _) = fixture.patch(&path, json!({ "status": "approved" })).await;
    assert_eq!(status, 400);

    let (_, confirmed) = fixture.get("/api/registrations?status=confirmed").await;
    assert_eq!(confirmed["data"].as_array().unwrap().len(), 1);
    let (_, pending) = fixture.get("/api/registrations?status=pending").await;
    assert!(pending["data"].as_array().unwrap().is_empty());

    let (status, _) = fixture
        .patch("/api/registrations/missing", json!({ "status": "cancelled" }))
        .await;
    assert_eq!(status, 404);

    let resp = fixture.admin.delete(fixture.url(&path)).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let (status, body) = fixture.get(&path).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp = fixture.admin.delete(fixture.url(&path)).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

// ============================================================================
// Export
// ============================================================================

async fn confirmed_pair(fixture: &TestFixture) {
    let (_, body) = fixture
        .post(
            "/api/registrations",
            booking(vec![
                delegate("A", "a@example.com", "CONFERENCE_ONLY"),
                delegate("B", "b@example.com", "CONFERENCE_ONLY"),
            ]),
        )
        .await;
    for reg in body["data"]["registrations"].as_array().unwrap() {
        let path = format!("/api/registrations/{}", reg["id"].as_str().unwrap());
        let (status, _) = fixture.patch(&path, json!({ "status": "confirmed" })).await;
        assert_eq!(status, 200);
    }
}

#[tokio::test]
async fn test_export_csv() {
    let fixture = TestFixture::new().await;
    confirmed_pair(&fixture).await;

    let resp = fixture
        .admin
        .get(fixture.url("/api/export"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let disposition = resp.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"bookings-"));
    assert!(disposition.ends_with(".csv\""));

    let csv = resp.text().await.unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Booking Reference,"));
    assert!(lines[1].contains("\"CONFERENCE_ONLY\",\"399\""));
    assert!(lines[2].contains("\"confirmed\""));
}

#[tokio::test]
async fn test_export_report_revenue() {
    let fixture = TestFixture::new().await;
    confirmed_pair(&fixture).await;

    let resp = fixture
        .admin
        .get(fixture.url("/api/export?format=pdf"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .ends_with(".html\""));
    let html = resp.text().await.unwrap();
    assert!(html.contains("&pound;798"));

    let resp = fixture
        .admin
        .get(fixture.url("/api/export?format=xlsx"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = fixture
        .public
        .get(fixture.url("/api/export"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

// ============================================================================
// Voting
// ============================================================================

#[tokio::test]
async fn test_vote_is_tallied() {
    let fixture = TestFixture::new().await;
    let poll = fixture.create_poll(&["A", "B"], false).await;
    assert_eq!(poll["isActive"], true);
    assert_eq!(poll["isOpen"], true);

    let (status, body) = fixture.vote(&poll, 0, "v1").await;
    assert_eq!(status, 200, "{}", body);

    let (_, body) = fixture
        .get(&format!("/api/voting?pollId={}", poll["id"].as_str().unwrap()))
        .await;
    assert_eq!(body["data"]["options"][0]["votes"], 1);
    assert_eq!(body["data"]["options"][1]["votes"], 0);
    assert_eq!(body["data"]["totalVotes"], 1);

    // Single choice: a second vote replaces the first
    fixture.vote(&poll, 1, "v1").await;
    let (_, body) = fixture.post("/api/voting", json!({ "action": "list" })).await;
    let listed = &body["data"][0];
    assert_eq!(listed["options"][0]["votes"], 0);
    assert_eq!(listed["options"][1]["votes"], 1);
    assert_eq!(listed["totalVotes"], 1);
}

#[tokio::test]
async fn test_multi_choice_duplicate_rejected() {
    let fixture = TestFixture::new().await;
    let poll = fixture.create_poll(&["A", "B", "C"], true).await;

    assert_eq!(fixture.vote(&poll, 0, "v1").await.0, 200);
    assert_eq!(fixture.vote(&poll, 2, "v1").await.0, 200);
    let (status, body) = fixture.vote(&poll, 0, "v1").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["message"], "You have already voted for this option");
}

#[tokio::test]
async fn test_inactive_poll_refuses_votes() {
    let fixture = TestFixture::new().await;
    let poll = fixture.create_poll(&["A", "B"], false).await;

    let (status, body) = fixture
        .patch(
            "/api/voting",
            json!({ "pollId": poll["id"], "isActive": false }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["isOpen"], false);

    let (status, _) = fixture.vote(&poll, 0, "v1").await;
    assert_eq!(status, 400);

    let (_, body) = fixture.get("/api/voting").await;
    assert_eq!(body["data"][0]["totalVotes"], 0);
}

#[tokio::test]
async fn test_voting_errors() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.post("/api/voting", json!({ "action": "bogus" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["message"], "Invalid action");

    let (status, _) = fixture
        .post(
            "/api/voting",
            json!({ "action": "vote", "pollId": "missing", "optionId": "x", "voterId": "v" }),
        )
        .await;
    assert_eq!(status, 404);

    let (status, _) = fixture
        .post(
            "/api/voting",
            json!({ "action": "create_poll", "title": "Q", "options": ["Only", "  "] }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, _) = fixture.get("/api/voting?pollId=missing").await;
    assert_eq!(status, 404);

    let (status, _) = fixture
        .patch("/api/voting", json!({ "pollId": "missing", "isActive": true }))
        .await;
    assert_eq!(status, 404);

    // Creating polls is an admin action; voting is not
    let resp = fixture
        .public
        .post(fixture.url("/api/voting"))
        .json(&json!({ "action": "create_poll", "title": "Q", "options": ["A", "B"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_concurrent_votes_are_not_lost() {
    let fixture = Arc::new(TestFixture::new().await);
    let poll = fixture.create_poll(&["A", "B"], false).await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let fixture = fixture.clone();
        let poll = poll.clone();
        handles.push(tokio::spawn(async move {
            fixture.vote(&poll, i % 2, &format!("voter-{}", i)).await.0
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    let (_, body) = fixture
        .get(&format!("/api/voting?pollId={}", poll["id"].as_str().unwrap()))
        .await;
    assert_eq!(body["data"]["totalVotes"], 20);
    assert_eq!(body["data"]["options"][0]["votes"], 10);
}

// ============================================================================
// Content
// ============================================================================

#[tokio::test]
async fn test_tab_move_renumbers() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post("/api/tabs/agenda/move", json!({ "direction": "up" }))
        .await;
    assert_eq!(status, 200, "{}", body);

    let (_, body) = fixture.get("/api/tabs").await;
    let tabs = body["data"].as_array().unwrap();
    let ids: Vec<&str> = tabs.iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec!["overview", "venue", "agenda", "sponsors", "messages", "voting", "register"]
    );
    let orders: Vec<u64> = tabs.iter().map(|t| t["order"].as_u64().unwrap()).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5, 6, 7]);

    let (status, _) = fixture
        .post("/api/tabs/missing/move", json!({ "direction": "down" }))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_save_tabs_renumbers_and_validates() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/tabs",
            json!({ "tabs": [
                { "id": "b", "label": "B", "icon": "🅱", "enabled": true, "order": 20 },
                { "id": "a", "label": "A", "icon": "🅰", "enabled": false, "order": 5 }
            ]}),
        )
        .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["data"][0]["id"], "a");
    assert_eq!(body["data"][0]["order"], 1);
    assert_eq!(body["data"][1]["order"], 2);

    let (status, _) = fixture
        .post(
            "/api/tabs",
            json!({ "tabs": [{ "id": "a", "label": "", "icon": "x", "enabled": true, "order": 1 }] }),
        )
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_agenda_defaults_and_move() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/agenda").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 11);
    assert_eq!(body["revisionId"], 0);

    let (status, body) = fixture
        .post("/api/agenda/2/move", json!({ "direction": "up" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["id"], "2");
    assert_eq!(body["data"][1]["id"], "1");
    assert_eq!(body["revisionId"], 1);

    // Moving the first item up changes nothing
    let (_, body) = fixture
        .post("/api/agenda/2/move", json!({ "direction": "up" }))
        .await;
    assert_eq!(body["data"][0]["id"], "2");
}

#[tokio::test]
async fn test_sponsor_tiers() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/sponsors/tiers").await;
    let tiers: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["tier"].as_str().unwrap())
        .collect();
    assert_eq!(tiers, vec!["platinum", "gold", "silver", "bronze"]);

    let (status, _) = fixture
        .post(
            "/api/sponsors",
            json!([{ "id": "s1", "name": "Solo", "tier": "gold" }]),
        )
        .await;
    assert_eq!(status, 200);

    let (_, body) = fixture.get("/api/sponsors/tiers").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["sponsors"][0]["name"], "Solo");
}

#[tokio::test]
async fn test_branding_and_venue() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/branding",
            json!({ "eventTitle": "Summit", "eventLocation": "Leeds" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["message"], "eventDate is required");

    let (status, _) = fixture
        .post(
            "/api/branding",
            json!({
                "eventTitle": "Summit",
                "eventDate": "1 May 2026",
                "eventLocation": "Leeds",
                "primaryColor": ""
            }),
        )
        .await;
    assert_eq!(status, 200);

    let (_, body) = fixture.get("/api/branding").await;
    assert_eq!(body["data"]["eventTitle"], "Summit");
    assert_eq!(body["data"]["primaryColor"], "blue");

    let (_, body) = fixture.get("/api/venue").await;
    assert_eq!(body["data"]["name"], "Crowne Plaza Stratford upon Avon");

    let (status, _) = fixture.post("/api/venue", json!({ "name": " " })).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_messages() {
    let fixture = TestFixture::new().await;

    let (status, first) = fixture
        .post(
            "/api/messages",
            json!({ "senderId": "u1", "senderName": "Una", "content": "Hello all" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(first["data"]["type"], "discussion");
    assert_eq!(first["data"]["status"], "active");

    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    let (status, _) = fixture
        .post(
            "/api/messages",
            json!({ "senderId": "u2", "senderName": "Tom", "content": "Wifi?", "type": "question" }),
        )
        .await;
    assert_eq!(status, 200);

    let (_, body) = fixture.get("/api/messages").await;
    assert_eq!(body["data"][0]["content"], "Wifi?");
    assert_eq!(body["data"][1]["content"], "Hello all");

    let (_, body) = fixture.get("/api/messages?type=question").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = fixture.get("/api/messages?type=bogus").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = fixture
        .post(
            "/api/messages",
            json!({ "senderId": "u1", "senderName": "Una", "content": "   " }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, _) = fixture
        .post(
            "/api/messages",
            json!({ "senderId": "u1", "senderName": "Una", "content": "Hi", "type": "rant" }),
        )
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_malformed_bodies_use_envelope() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/tabs",
            json!({ "tabs": [{ "id": "overview", "label": "Overview", "icon": "x", "enabled": true }] }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("order"));
    assert!(body["revisionId"].is_i64());

    let (_, created) = fixture
        .post(
            "/api/registrations",
            delegate("Ada", "ada@example.com", "CONFERENCE_ONLY"),
        )
        .await;
    let id = created["data"]["registrations"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let (status, body) = fixture
        .patch(&format!("/api/registrations/{}", id), json!({ "status": 5 }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .admin
        .post(fixture.url("/api/sponsors"))
        .body("[]")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_branding_file_with_nulls_loads() {
    let fixture = TestFixture::new().await;

    let data_dir = fixture.temp_dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(
        data_dir.join("branding.json"),
        r#"{"eventTitle":"Summit","eventDate":"1 May","eventLocation":"Leeds","logoUrl":null}"#,
    )
    .unwrap();

    let (status, body) = fixture.get("/api/branding").await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["data"]["eventTitle"], "Summit");
    assert_eq!(body["data"]["logoUrl"], "");
    assert_eq!(body["data"]["primaryColor"], "blue");
}

#[tokio::test]
async fn test_revisions_track_writes() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/revisions").await;
    assert!(body["data"].as_object().unwrap().is_empty());

    fixture
        .post(
            "/api/messages",
            json!({ "senderId": "u1", "senderName": "Una", "content": "one" }),
        )
        .await;
    let (_, body) = fixture
        .post(
            "/api/messages",
            json!({ "senderId": "u1", "senderName": "Una", "content": "two" }),
        )
        .await;
    assert_eq!(body["revisionId"], 2);

    let (_, body) = fixture.get("/api/revisions").await;
    assert_eq!(body["data"]["messages"], 2);
    assert!(body["data"].get("voting").is_none());
}

#[tokio::test]
async fn test_json_files_on_disk() {
    let fixture = TestFixture::new().await;
    fixture
        .post(
            "/api/registrations",
            booking(vec![delegate("A", "a@example.com", "CONFERENCE_ONLY")]),
        )
        .await;

    let path = fixture.temp_dir.path().join("data").join("registrations.json");
    let stored: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(stored[0]["firstName"], "A");
    assert_eq!(stored[0]["status"], "pending");
}

// ============================================================================
// Uploads
// ============================================================================

#[tokio::test]
async fn test_upload_image() {
    let fixture = TestFixture::new().await;

    let png = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G', 1, 2, 3])
        .file_name("logo.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .part("file", png)
        .text("type", "sponsor");
    let resp = fixture
        .admin
        .post(fixture.url("/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let url = body["data"]["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/sponsor-"));
    assert!(url.ends_with(".png"));

    let served = fixture.public.get(fixture.url(&url)).send().await.unwrap();
    assert_eq!(served.status(), 200);
    assert_eq!(served.bytes().await.unwrap().len(), 7);

    let text = reqwest::multipart::Part::text("hello")
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let resp = fixture
        .admin
        .post(fixture.url("/api/upload"))
        .multipart(reqwest::multipart::Form::new().part("file", text))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let big = reqwest::multipart::Part::bytes(vec![0u8; 2048])
        .file_name("big.png")
        .mime_str("image/png")
        .unwrap();
    let resp = fixture
        .admin
        .post(fixture.url("/api/upload"))
        .multipart(reqwest::multipart::Form::new().part("file", big))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_upload_truncated_field_is_bad_request() {
    let fixture = TestFixture::new().await;

    // Body ends inside the `type` field, before any closing boundary.
    let body = "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\nspons";
    let resp = fixture
        .admin
        .post(fixture.url("/api/upload"))
        .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// ============================================================================
// SQLite backend
// ============================================================================

#[tokio::test]
async fn test_sqlite_backend_end_to_end() {
    let fixture =
        TestFixture::with_options(Some(API_KEY.to_string()), StorageBackend::Sqlite).await;

    let (status, _) = fixture
        .post(
            "/api/registrations",
            booking(vec![
                delegate("A", "a@example.com", "CONFERENCE_ONLY"),
                delegate("B", "b@example.com", "CONFERENCE_DINNER"),
            ]),
        )
        .await;
    assert_eq!(status, 200);

    let (_, body) = fixture.get("/api/registrations").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["revisionId"], 1);

    let poll = fixture.create_poll(&["A", "B"], false).await;
    fixture.vote(&poll, 1, "v1").await;
    let (_, body) = fixture.get("/api/voting").await;
    assert_eq!(body["data"][0]["options"][1]["votes"], 1);

    let (_, body) = fixture.get("/api/revisions").await;
    assert_eq!(body["data"]["registrations"], 1);
    assert_eq!(body["data"]["voting"], 2);
}
