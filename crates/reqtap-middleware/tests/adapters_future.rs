//! Future-style adapter end-to-end: lifecycle logs, error propagation,
//! slow-response flagging, and the metric set.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use reqtap_core::{HandlerError, Instrumentor, LogFields, RequestMeta};
use reqtap_middleware::adapt::{FutureTap, Handler, Wrap};
use reqtap_middleware::config::LogLevel;
use reqtap_middleware::logger::MemoryLogger;
use reqtap_middleware::stats::MemoryStats;

struct TestRequest {
    method: &'static str,
    url: &'static str,
}

impl RequestMeta for TestRequest {
    fn method(&self) -> &str {
        self.method
    }

    fn raw_path(&self) -> Option<&str> {
        Some(self.url)
    }

    fn query_params(&self) -> LogFields {
        LogFields::new()
    }
}

fn fixture() -> (Arc<MemoryLogger>, Arc<MemoryStats>, FutureTap) {
    let logger = Arc::new(MemoryLogger::new());
    let stats = Arc::new(MemoryStats::new());
    let instr = Arc::new(Instrumentor::new(logger.clone(), Some(stats.clone())));
    (logger, stats, FutureTap::new(instr))
}

fn tags(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| (*s).to_owned()).collect()
}

#[tokio::test]
async fn success_produces_single_info_response_log() {
    let (logger, stats, tap) = fixture();
    let wrapped = tap.wrap(|_req: TestRequest| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok::<_, HandlerError>("done")
    });

    let out = wrapped
        .call(TestRequest {
            method: "GET",
            url: "/users/123?active=true",
        })
        .await
        .unwrap();
    assert_eq!(out, "done");

    let responses = logger.matching(LogLevel::Info, "response");
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].fields.get("status"), Some(&Value::from(200)));
    assert!(logger.matching(LogLevel::Warn, "slow response").is_empty());

    assert_eq!(stats.counter_total("response_status"), 1);
    assert_eq!(stats.counter_total("response_status_2xx"), 1);
    assert_eq!(stats.counter_total("response_error"), 0);
    assert_eq!(stats.counter_total("slow_response"), 0);
    assert_eq!(stats.histogram_count("route_GET_users_123"), 1);
}

#[tokio::test]
async fn rejection_propagates_error_and_warns() {
    let (logger, stats, tap) = fixture();
    let wrapped = tap.wrap(|_req: TestRequest| async {
        Err::<(), _>(HandlerError::with_status(403, "forbidden"))
    });

    let out = wrapped
        .call(TestRequest {
            method: "POST",
            url: "/admin",
        })
        .await;
    assert_eq!(out, Err(HandlerError::with_status(403, "forbidden")));

    let warnings = logger.matching(LogLevel::Warn, "response");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].fields.get("status"), Some(&Value::from(403)));

    // a 4xx ticks both error counters
    let t = tags(&[
        "method:POST",
        "status:403",
        "statusGroup:4xx",
        "route:admin",
    ]);
    assert_eq!(stats.counter_value("client_error", &t), 1);
    assert_eq!(stats.counter_value("response_error", &t), 1);
}

#[tokio::test]
async fn unexpected_error_maps_to_500_error_log() {
    let (logger, stats, tap) = fixture();
    let wrapped = tap.wrap(|_req: TestRequest| async {
        Err::<(), _>(HandlerError::unexpected("boom"))
    });

    let out = wrapped
        .call(TestRequest {
            method: "GET",
            url: "/explode",
        })
        .await;
    assert!(out.is_err());

    let errors = logger.matching(LogLevel::Error, "response");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].fields.get("status"), Some(&Value::from(500)));
    assert!(errors[0].fields.get("error").is_some());

    // a 5xx ticks only response_error
    assert_eq!(stats.counter_total("response_error"), 1);
    assert_eq!(stats.counter_total("client_error"), 0);
}

#[tokio::test]
async fn slow_handler_flags_slow_response_once() {
    let (logger, stats, tap) = fixture();
    let wrapped = tap.wrap(|_req: TestRequest| async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        Ok::<_, HandlerError>(())
    });

    wrapped
        .call(TestRequest {
            method: "GET",
            url: "/slow",
        })
        .await
        .unwrap();

    // the status log and the slow log are distinct records
    assert_eq!(logger.matching(LogLevel::Info, "response").len(), 1);
    let slow = logger.matching(LogLevel::Warn, "slow response");
    assert_eq!(slow.len(), 1);
    assert_eq!(slow[0].fields.get("url"), Some(&Value::from("/slow")));
    assert_eq!(slow[0].fields.get("route"), Some(&Value::from("slow")));

    assert_eq!(stats.counter_total("slow_response"), 1);
    let duration = stats
        .histogram_summary(
            "response_duration",
            &tags(&["method:GET", "status:200", "statusGroup:2xx", "route:slow"]),
        )
        .unwrap();
    assert_eq!(duration.count, 1);
    assert!(duration.sum >= 1500);
}

#[tokio::test]
async fn start_and_finish_share_the_request_id() {
    let (logger, _stats, tap) = fixture();
    let wrapped = tap.wrap(|_req: TestRequest| async { Ok::<_, HandlerError>(()) });

    wrapped
        .call(TestRequest {
            method: "GET",
            url: "/ping",
        })
        .await
        .unwrap();

    let start = logger.matching(LogLevel::Info, "request");
    let finish = logger.matching(LogLevel::Info, "response");
    assert_eq!(start.len(), 1);
    assert_eq!(finish.len(), 1);
    assert_eq!(start[0].fields.get("id"), finish[0].fields.get("id"));
}
