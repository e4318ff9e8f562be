//! End-to-end checks against a live router backed by a throwaway SQLite
//! file.

use haven_core::BackendConfig;
use haven_server::config::PayuConfig;
use haven_server::payu::{PaymentFields, response_hash};
use haven_server::{AppState, open_database, router};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

const ADMIN: &str = "test-admin-token";
const PAYU_KEY: &str = "gtKFFx";
const PAYU_SALT: &str = "eCwWELxi";

struct TestServer {
    base: String,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = BackendConfig::Sqlite {
            path: dir.path().join("haven.sqlite"),
        };
        let db = open_database(&backend).await.expect("open database");

        let payu = PayuConfig {
            key: PAYU_KEY.into(),
            salt: PAYU_SALT.into(),
            base_url: Some("https://test.payu.in/_payment".into()),
        };
        let state = AppState::new(db, ADMIN, payu, None);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind random port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn admin_get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(ADMIN)
            .send()
            .await
            .expect("admin get")
    }

    async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("post")
    }
}

#[tokio::test]
async fn health_reports_backend() {
    let srv = TestServer::start().await;

    let body: Value = srv
        .client
        .get(srv.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "sqlite");
}

#[tokio::test]
async fn contact_is_public_to_write_and_admin_to_read() {
    let srv = TestServer::start().await;

    let resp = srv
        .post_json(
            "/api/contact",
            json!({
                "firstName": "Asha",
                "lastName": "Rao",
                "email": "Asha@Example.org",
                "subject": "Volunteering",
                "message": "How can I help?"
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert!(created["id"].as_i64().unwrap() > 0);

    let anon = srv
        .client
        .get(srv.url("/api/contacts"))
        .send()
        .await
        .unwrap();
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);
    let err: Value = anon.json().await.unwrap();
    assert_eq!(err["error"]["code"], "unauthorized");

    let wrong = srv
        .client
        .get(srv.url("/api/contacts"))
        .bearer_auth("not-the-token")
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let rows: Vec<Value> = srv.admin_get("/api/contacts").await.json().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "asha@example.org");
    assert_eq!(rows[0]["first_name"], "Asha");
}

#[tokio::test]
async fn contact_validation_rejects_blank_fields() {
    let srv = TestServer::start().await;

    let resp = srv
        .post_json(
            "/api/contact",
            json!({ "firstName": " ", "lastName": "Rao", "email": "a@b.org", "message": "hi" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = srv
        .post_json(
            "/api/contact",
            json!({ "firstName": "A", "lastName": "Rao", "email": "nope", "message": "hi" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_checks_the_admin_token() {
    let srv = TestServer::start().await;

    let ok = srv.post_json("/api/auth/login", json!({ "token": ADMIN })).await;
    assert_eq!(ok.status(), StatusCode::OK);

    let bad = srv.post_json("/api/auth/login", json!({ "token": "guess" })).await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn subscribing_twice_is_not_an_error() {
    let srv = TestServer::start().await;

    let first = srv
        .post_json("/api/subscribe", json!({ "email": "reader@example.org" }))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = srv
        .post_json("/api/subscribe", json!({ "email": "READER@example.org" }))
        .await;
    assert_eq!(second.status(), StatusCode::OK);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["message"], "already subscribed");

    let rows: Vec<Value> = srv.admin_get("/api/subscribers").await.json().await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn seeded_programs_and_program_crud() {
    let srv = TestServer::start().await;

    let programs: Vec<Value> = srv
        .client
        .get(srv.url("/api/programs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(programs.len(), 5);
    assert!(programs.iter().any(|p| p["title"] == "Tech for All"));

    let anon = srv
        .post_json("/api/programs", json!({ "title": "Night School", "category": "Education" }))
        .await;
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);

    let created: Value = srv
        .client
        .post(srv.url("/api/programs"))
        .bearer_auth(ADMIN)
        .json(&json!({ "title": "Night School", "category": "Education" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();

    let updated = srv
        .client
        .put(srv.url(&format!("/api/programs/{id}")))
        .bearer_auth(ADMIN)
        .json(&json!({ "title": "Night School", "category": "Adult Education", "icon": "moon" }))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::NO_CONTENT);

    let deleted = srv
        .client
        .delete(srv.url(&format!("/api/programs/{id}")))
        .bearer_auth(ADMIN)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = srv
        .client
        .delete(srv.url(&format!("/api/programs/{id}")))
        .bearer_auth(ADMIN)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

async fn career_id(srv: &TestServer, title: &str) -> i64 {
    let careers: Vec<Value> = srv
        .client
        .get(srv.url("/api/careers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    careers
        .iter()
        .find(|c| c["title"] == title)
        .and_then(|c| c["id"].as_i64())
        .expect("seeded career")
}

fn application_form(resume: &[u8], mime: &str) -> Form {
    Form::new()
        .text("firstName", "Ravi")
        .text("lastName", "Kumar")
        .text("email", "ravi@example.org")
        .text("coverLetter", "I teach maths.")
        .part(
            "resume",
            Part::bytes(resume.to_vec())
                .file_name("cv.pdf")
                .mime_str(mime)
                .unwrap(),
        )
}

#[tokio::test]
async fn application_lifecycle() {
    let srv = TestServer::start().await;
    let job = career_id(&srv, "Volunteer Teacher").await;
    let pdf = b"%PDF-1.4 fake resume".to_vec();

    let resp = srv
        .client
        .post(srv.url(&format!("/api/careers/{job}/apply")))
        .multipart(application_form(&pdf, "application/pdf"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let app_id = resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    let apps: Vec<Value> = srv.admin_get("/api/applications").await.json().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0]["status"], "Pending");
    assert_eq!(apps[0]["job_title"], "Volunteer Teacher");
    assert_eq!(apps[0]["resume"], "cv.pdf");

    let patched = srv
        .client
        .patch(srv.url(&format!("/api/applications/{app_id}/status")))
        .bearer_auth(ADMIN)
        .json(&json!({ "status": "interview" }))
        .send()
        .await
        .unwrap();
    assert_eq!(patched.status(), StatusCode::NO_CONTENT);

    let invalid = srv
        .client
        .patch(srv.url(&format!("/api/applications/{app_id}/status")))
        .bearer_auth(ADMIN)
        .json(&json!({ "status": "promoted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let resume = srv
        .admin_get(&format!("/api/applications/{app_id}/resume"))
        .await;
    assert_eq!(resume.status(), StatusCode::OK);
    assert_eq!(
        resume.headers()["content-type"].to_str().unwrap(),
        "application/pdf"
    );
    assert_eq!(resume.bytes().await.unwrap().to_vec(), pdf);

    let removed = srv
        .client
        .delete(srv.url(&format!("/api/careers/{job}")))
        .bearer_auth(ADMIN)
        .send()
        .await
        .unwrap();
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let apps: Vec<Value> = srv.admin_get("/api/applications").await.json().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0]["status"], "Interview");
    assert!(apps[0]["job_title"].is_null());
}

#[tokio::test]
async fn application_rejects_unknown_job_and_bad_resume_type() {
    let srv = TestServer::start().await;

    let missing = srv
        .client
        .post(srv.url("/api/careers/9999/apply"))
        .multipart(application_form(b"%PDF", "application/pdf"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let job = career_id(&srv, "Program Coordinator").await;
    let wrong_type = srv
        .client
        .post(srv.url(&format!("/api/careers/{job}/apply")))
        .multipart(application_form(b"MZ", "application/x-msdownload"))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn event_registration() {
    let srv = TestServer::start().await;

    let missing = srv
        .post_json(
            "/api/events/42/register",
            json!({ "name": "Meera", "email": "meera@example.org" }),
        )
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let created: Value = srv
        .client
        .post(srv.url("/api/events"))
        .bearer_auth(ADMIN)
        .json(&json!({ "title": "Charity Run", "date": "2026-12-01", "location": "Pune" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let event = created["id"].as_i64().unwrap();

    let registered = srv
        .post_json(
            &format!("/api/events/{event}/register"),
            json!({ "name": "Meera", "email": "meera@example.org", "phone": "98450" }),
        )
        .await;
    assert_eq!(registered.status(), StatusCode::CREATED);

    let rows: Vec<Value> = srv
        .admin_get(&format!("/api/events/{event}/registrations"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["event_id"], event);
    assert_eq!(rows[0]["name"], "Meera");
}

#[tokio::test]
async fn donation_then_csv_export() {
    let srv = TestServer::start().await;

    let bad = srv
        .post_json(
            "/api/donations",
            json!({ "amount": 0, "frequency": "one-time", "paymentMethod": "card" }),
        )
        .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let ok = srv
        .post_json(
            "/api/donations",
            json!({
                "amount": 1500.5,
                "frequency": "monthly",
                "paymentMethod": "card",
                "firstName": "Lee, Jr.",
                "email": "lee@example.org"
            }),
        )
        .await;
    assert_eq!(ok.status(), StatusCode::CREATED);

    let export = srv.admin_get("/api/donations/export").await;
    assert_eq!(export.status(), StatusCode::OK);
    assert!(
        export.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        export.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("donations.csv")
    );

    let body = export.text().await.unwrap();
    let mut lines = body.split("\r\n");
    assert_eq!(
        lines.next(),
        Some("id,amount,frequency,payment_method,first_name,last_name,email,txnid,status,created_at")
    );
    let row = lines.next().unwrap();
    assert!(row.contains("\"Lee, Jr.\""));
    assert!(row.contains("monthly,card"));
    assert!(row.contains(",completed,"));
}

#[tokio::test]
async fn payu_hash_and_verify() {
    let srv = TestServer::start().await;

    let signed: Value = srv
        .post_json(
            "/api/payments/payu/hash",
            json!({
                "amount": "750.00",
                "productinfo": "Donation",
                "firstname": "Asha",
                "email": "asha@example.org",
                "udf1": "monthly"
            }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(signed["key"], PAYU_KEY);
    assert_eq!(signed["action"], "https://test.payu.in/_payment");
    assert_eq!(signed["hash"].as_str().unwrap().len(), 128);
    let txnid = signed["txnid"].as_str().unwrap().to_string();
    assert!(txnid.starts_with("TXN"));

    let fields = PaymentFields {
        txnid: txnid.clone(),
        amount: "750.00".into(),
        productinfo: "Donation".into(),
        firstname: "Asha".into(),
        email: "asha@example.org".into(),
        udf: ["monthly".into(), String::new(), String::new(), String::new(), String::new()],
    };
    let hash = response_hash(PAYU_KEY, PAYU_SALT, "success", &fields);

    let callback = |hash: String| {
        vec![
            ("status", "success".to_string()),
            ("txnid", txnid.clone()),
            ("amount", "750.00".to_string()),
            ("productinfo", "Donation".to_string()),
            ("firstname", "Asha".to_string()),
            ("email", "asha@example.org".to_string()),
            ("udf1", "monthly".to_string()),
            ("mode", "UPI".to_string()),
            ("hash", hash),
        ]
    };

    let forged = srv
        .client
        .post(srv.url("/api/payments/payu/verify"))
        .form(&callback("0".repeat(128)))
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::BAD_REQUEST);

    let verified = srv
        .client
        .post(srv.url("/api/payments/payu/verify"))
        .form(&callback(hash.clone()))
        .send()
        .await
        .unwrap();
    assert_eq!(verified.status(), StatusCode::OK);
    let body: Value = verified.json().await.unwrap();
    assert_eq!(body["verified"], true);
    assert_eq!(body["status"], "success");

    let first_id = body["id"].as_i64().unwrap();

    let replayed = srv
        .client
        .post(srv.url("/api/payments/payu/verify"))
        .form(&callback(hash))
        .send()
        .await
        .unwrap();
    assert_eq!(replayed.status(), StatusCode::OK);
    let body: Value = replayed.json().await.unwrap();
    assert_eq!(body["verified"], true);
    assert_eq!(body["id"], first_id);
    assert_eq!(body["status"], "success");

    let donations: Vec<Value> = srv.admin_get("/api/donations").await.json().await.unwrap();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0]["txnid"], txnid.as_str());
    assert_eq!(donations[0]["frequency"], "monthly");
    assert_eq!(donations[0]["payment_method"], "payu:upi");
    assert_eq!(donations[0]["amount"], 750.0);
}

#[tokio::test]
async fn payu_hash_accepts_numeric_amount() {
    let srv = TestServer::start().await;

    let resp = srv
        .post_json(
            "/api/payments/payu/hash",
            json!({
                "txnid": "TXNNUMERIC1",
                "amount": 500,
                "productinfo": "Donation",
                "firstname": "Asha",
                "email": "asha@example.org"
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let signed: Value = resp.json().await.unwrap();
    assert_eq!(signed["amount"], "500.00");
    assert_eq!(signed["txnid"], "TXNNUMERIC1");
}

#[tokio::test]
async fn ai_endpoints_report_unconfigured() {
    let srv = TestServer::start().await;

    let resp = srv
        .post_json("/api/ai/chat", json!({ "message": "What do you do?" }))
        .await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
