//! Client tests against a local HTTP server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use rust_decimal::Decimal;
use tokio::net::TcpListener;

use tailor_client::TailorClient;
use tailor_client::auth::StaticTokenProvider;
use tailor_client::error::{ApiError, Error};
use tailor_client::model::{Employee, EmployeeStatus, LeaveStatus};
use tailor_client::retry::RetryConfig;

// =============================================================================
// Test server
// =============================================================================

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    auth: Option<String>,
    body: String,
}

struct Reply {
    status: u16,
    body: String,
    headers: Vec<(&'static str, String)>,
    delay: Duration,
}

fn reply(status: u16, body: impl Into<String>) -> Reply {
    Reply {
        status,
        body: body.into(),
        headers: Vec::new(),
        delay: Duration::ZERO,
    }
}

type Handler = Arc<dyn Fn(&Seen, usize) -> Reply + Send + Sync>;

struct TestServer {
    url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl TestServer {
    fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn client(&self) -> TailorClient {
        TailorClient::builder().url(&self.url).build().unwrap()
    }
}

/// Serve every connection with `handler`, which also gets the 1-based
/// request count.
async fn serve(handler: impl Fn(&Seen, usize) -> Reply + Send + Sync + 'static) -> TestServer {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handler: Handler = Arc::new(handler);
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            let log = Arc::clone(&log);
            let service = service_fn(move |req: Request<Incoming>| {
                let handler = Arc::clone(&handler);
                let log = Arc::clone(&log);
                async move {
                    let method = req.method().to_string();
                    let path = req.uri().path().to_string();
                    let auth = req
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let body = req
                        .into_body()
                        .collect()
                        .await
                        .map(|b| b.to_bytes())
                        .unwrap_or_default();
                    let seen = Seen {
                        method,
                        path,
                        auth,
                        body: String::from_utf8_lossy(&body).into_owned(),
                    };
                    let count = {
                        let mut log = log.lock().unwrap();
                        log.push(seen.clone());
                        log.len()
                    };

                    let reply = handler(&seen, count);
                    if !reply.delay.is_zero() {
                        tokio::time::sleep(reply.delay).await;
                    }
                    let mut response = Response::builder()
                        .status(reply.status)
                        .header("Content-Type", "application/json");
                    for (name, value) in reply.headers {
                        response = response.header(name, value);
                    }
                    Ok::<_, Infallible>(response.body(Full::new(Bytes::from(reply.body))).unwrap())
                }
            });
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    TestServer {
        url: format!("http://{}/api", addr),
        seen,
    }
}

const EMPLOYEE: &str = r#"{
    "id": "e-1",
    "employeeId": "EMP001",
    "name": "Rahim Uddin",
    "email": "rahim@example.com",
    "department": "Cutting",
    "designation": "Cutter",
    "joiningDate": "2021-02-01",
    "salary": "18000",
    "status": "Active"
}"#;

fn employee() -> Employee {
    serde_json::from_str(EMPLOYEE).unwrap()
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_list_bare_array() {
    let server = serve(|_, _| reply(200, format!("[{}]", EMPLOYEE))).await;
    let employees = server.client().employees().list().await.unwrap();

    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].employee_id, "EMP001");
    assert_eq!(employees[0].salary, Decimal::from(18000));
    assert_eq!(employees[0].status, EmployeeStatus::Active);

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/employees");
    assert_eq!(requests[0].auth, None);
}

#[tokio::test]
async fn test_list_wrapped_in_data() {
    let body = r#"{"data":[{"employeeId":"EMP003","employeeName":"Nasrin Akter",
        "leaveType":"Sick","fromDate":"2024-05-06","toDate":"2024-05-07","days":2}]}"#;
    let server = serve(move |_, _| reply(200, body)).await;
    let leaves = server.client().leaves().list().await.unwrap();

    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].status, LeaveStatus::Pending);
    assert_eq!(leaves[0].from_date, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
    assert_eq!(server.requests()[0].path, "/api/leaves");
}

#[tokio::test]
async fn test_get_by_id() {
    let server = serve(|_, _| reply(200, EMPLOYEE)).await;
    let employee = server.client().employees().get("e-1").await.unwrap();
    assert_eq!(employee.name, "Rahim Uddin");
    assert_eq!(server.requests()[0].path, "/api/employees/e-1");
}

#[tokio::test]
async fn test_create_posts_camel_case_json() {
    let server = serve(|seen, _| reply(201, seen.body.clone())).await;
    let mut draft = employee();
    draft.id.clear();

    let created = server.client().employees().create(&draft).await.unwrap();
    assert_eq!(created, draft);

    let request = &server.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/employees");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["employeeId"], "EMP001");
    assert_eq!(body["joiningDate"], "2021-02-01");
}

#[tokio::test]
async fn test_update_puts_to_record() {
    let server = serve(|seen, _| reply(200, format!(r#"{{"data":{}}}"#, seen.body))).await;
    let mut record = employee();
    record.designation = "Senior Cutter".into();

    let saved = server
        .client()
        .employees()
        .update("e-1", &record)
        .await
        .unwrap();
    assert_eq!(saved.designation, "Senior Cutter");

    let request = &server.requests()[0];
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/api/employees/e-1");
}

#[tokio::test]
async fn test_delete_ignores_empty_body() {
    let server = serve(|_, _| reply(204, "")).await;
    server.client().overtime().delete("ot-9").await.unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.path, "/api/overtime/ot-9");
}

#[tokio::test]
async fn test_resource_paths() {
    let server = serve(|_, _| reply(200, "[]")).await;
    let client = server.client();
    client.attendance().list().await.unwrap();
    client.payroll().list().await.unwrap();
    client.companies().list().await.unwrap();
    client.opening_balances().list().await.unwrap();

    let paths: Vec<String> = server.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/api/attendance",
            "/api/payroll",
            "/api/companies",
            "/api/opening-balances"
        ]
    );
}

#[tokio::test]
async fn test_bearer_token_sent() {
    let server = serve(|_, _| reply(200, "[]")).await;
    let client = TailorClient::builder()
        .url(&server.url)
        .token_provider(StaticTokenProvider::new("secret-token"))
        .build()
        .unwrap();
    client.companies().list().await.unwrap();
    assert_eq!(
        server.requests()[0].auth.as_deref(),
        Some("Bearer secret-token")
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_not_found_keeps_status_and_message() {
    let server = serve(|_, _| reply(404, r#"{"message":"Employee not found"}"#)).await;
    let err = server.client().employees().get("nope").await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        Error::Api(ApiError::Http { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Employee not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = serve(|_, _| reply(200, "<html>oops</html>")).await;
    let err = server.client().payroll().list().await.unwrap_err();
    match err {
        Error::Api(ApiError::Parse { body, .. }) => {
            assert_eq!(body.as_deref(), Some("<html>oops</html>"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_not_retried_by_default() {
    let server = serve(|_, _| reply(503, "Service Unavailable")).await;
    let err = server.client().attendance().list().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
    assert!(err.is_retryable());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_reads_retry_when_configured() {
    let server = serve(|_, n| {
        if n < 3 {
            reply(502, "Bad Gateway")
        } else {
            reply(200, "[]")
        }
    })
    .await;
    let client = TailorClient::builder()
        .url(&server.url)
        .retry(
            RetryConfig::standard()
                .max_retries(2)
                .initial_delay(Duration::from_millis(5)),
        )
        .build()
        .unwrap();

    let rows = client.payroll().list().await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_writes_never_retry() {
    let server = serve(|_, _| reply(500, "boom")).await;
    let client = TailorClient::builder()
        .url(&server.url)
        .retry(RetryConfig::standard().initial_delay(Duration::from_millis(5)))
        .build()
        .unwrap();

    let err = client.employees().create(&employee()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let server = serve(|_, _| Reply {
        headers: vec![("Retry-After", "7".to_string())],
        ..reply(429, "")
    })
    .await;
    let err = server.client().leaves().list().await.unwrap_err();
    match err {
        Error::RateLimit { retry_after } => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout() {
    let server = serve(|_, _| Reply {
        delay: Duration::from_secs(2),
        ..reply(200, "[]")
    })
    .await;
    let client = TailorClient::builder()
        .url(&server.url)
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.companies().list().await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::Timeout(_))));
}
