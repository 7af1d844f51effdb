#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqmeter_core::{ErrorLabel, ReqMeterError, DEFAULT_BUCKETS};
use reqmeter_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
service: { domain: shop, name: orders, version: "1.2.0" }
metrics:
  bukets: [0.1, 1.0] # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, ReqMeterError::Config(_)), "{err}");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
service: { domain: shop, name: orders, version: "1.2.0" }
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.service.qualified_name(), "shop.orders");
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.metrics.buckets, DEFAULT_BUCKETS.to_vec());
    assert_eq!(cfg.metrics.error_label, ErrorLabel::Kind);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
service:
  domain: shop
  name: orders
  version: "2.0.0"
gateway:
  listen: "127.0.0.1:9090"
metrics:
  buckets: [0.005, 0.05, 0.5, 5]
  error_label: message
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.gateway.listen_addr().unwrap().port(), 9090);
    assert_eq!(cfg.metrics.buckets, vec![0.005, 0.05, 0.5, 5.0]);
    assert_eq!(cfg.metrics.error_label, ErrorLabel::Message);
}

#[test]
fn rejects_wrong_version() {
    let bad = r#"
version: 2
service: { domain: shop, name: orders, version: "1.2.0" }
"#;
    assert!(matches!(config::load_from_str(bad), Err(ReqMeterError::Config(_))));
}

#[test]
fn rejects_empty_service_fields() {
    let bad = r#"
version: 1
service: { domain: "", name: orders, version: "1.2.0" }
"#;
    assert!(matches!(config::load_from_str(bad), Err(ReqMeterError::InvalidServiceInfo(_))));
}

#[test]
fn rejects_unsorted_buckets() {
    let bad = r#"
version: 1
service: { domain: shop, name: orders, version: "1.2.0" }
metrics: { buckets: [1.0, 0.5] }
"#;
    assert!(matches!(config::load_from_str(bad), Err(ReqMeterError::InvalidBuckets(_))));
}

#[test]
fn rejects_bad_listen() {
    let bad = r#"
version: 1
service: { domain: shop, name: orders, version: "1.2.0" }
gateway: { listen: "not-an-addr" }
"#;
    assert!(matches!(config::load_from_str(bad), Err(ReqMeterError::Config(_))));
}
