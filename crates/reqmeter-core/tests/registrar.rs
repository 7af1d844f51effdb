#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use reqmeter_core::{
    register_service_info, Interceptor, InterceptorOptions, ReqMeterError, ServiceInfo,
};

fn info_series(registry: &Registry) -> Vec<(Vec<(String, String)>, f64)> {
    registry
        .gather()
        .into_iter()
        .filter(|mf| mf.get_name() == "service_info")
        .flat_map(|mf| {
            mf.get_metric()
                .iter()
                .map(|m| {
                    let labels = m
                        .get_label()
                        .iter()
                        .map(|l| (l.get_name().to_string(), l.get_value().to_string()))
                        .collect();
                    (labels, m.get_gauge().get_value())
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn publishes_service_identity() {
    let registry = Registry::new();
    let info = ServiceInfo::new("shop", "orders", "1.2.0");

    register_service_info(&registry, &info, &InterceptorOptions::default()).expect("register");

    let series = info_series(&registry);
    assert_eq!(series.len(), 1);
    let (labels, value) = &series[0];
    assert_eq!(*value, 1.0);
    assert_eq!(
        labels,
        &vec![
            ("domain".to_string(), "shop".to_string()),
            ("name".to_string(), "shop.orders".to_string()),
            ("version".to_string(), "1.2.0".to_string()),
        ]
    );
}

#[test]
fn registers_interceptor_instruments_on_same_registry() {
    let registry = Registry::new();
    let info = ServiceInfo::new("shop", "orders", "1.2.0");
    let i = register_service_info(&registry, &info, &InterceptorOptions::default()).unwrap();

    i.latency().with_label_values(&["create", "OrdersController"]).observe(0.01);
    let names: Vec<String> = registry.gather().iter().map(|mf| mf.get_name().to_string()).collect();
    assert!(names.contains(&"request_duration_seconds".to_string()));
    assert!(names.contains(&"service_info".to_string()));
}

fn register(registry: &Registry, version: &str) -> Result<Interceptor, ReqMeterError> {
    let info = ServiceInfo::new("shop", "orders", version);
    register_service_info(registry, &info, &InterceptorOptions::default())
}

fn family_names(registry: &Registry) -> Vec<String> {
    registry
        .gather()
        .iter()
        .map(|mf| mf.get_name().to_string())
        .collect()
}

#[test]
fn rejects_empty_fields() {
    let registry = Registry::new();
    let opts = InterceptorOptions::default();
    for info in [
        ServiceInfo::new("", "orders", "1.0.0"),
        ServiceInfo::new("shop", " ", "1.0.0"),
        ServiceInfo::new("shop", "orders", ""),
    ] {
        let err = register_service_info(&registry, &info, &opts).unwrap_err();
        assert!(matches!(err, ReqMeterError::InvalidServiceInfo(_)), "{err}");
    }
    assert!(registry.gather().is_empty());
}

#[test]
fn second_call_with_same_identity_conflicts() {
    let registry = Registry::new();
    register(&registry, "1.2.0").unwrap();

    match register(&registry, "1.2.0").unwrap_err() {
        ReqMeterError::RegistrationConflict { metric, .. } => assert_eq!(metric, "service_info"),
        other => panic!("unexpected: {other}"),
    }
}

#[test]
fn second_call_with_new_version_conflicts_and_keeps_first_series() {
    let registry = Registry::new();
    register(&registry, "1.2.0").unwrap();

    let err = register(&registry, "1.3.0").unwrap_err();
    assert!(matches!(err, ReqMeterError::RegistrationConflict { .. }));

    let series = info_series(&registry);
    assert_eq!(series.len(), 1);
    assert!(series[0].0.contains(&("version".to_string(), "1.2.0".to_string())));
}

#[test]
fn incompatible_existing_metric_conflicts() {
    let registry = Registry::new();
    let other = IntCounterVec::new(Opts::new("service_info", "something else"), &["host"]).unwrap();
    registry.register(Box::new(other)).unwrap();

    let err = register(&registry, "1.2.0").unwrap_err();
    assert!(matches!(err, ReqMeterError::RegistrationConflict { .. }));
}

#[test]
fn conflict_on_failure_counter_leaves_registry_untouched() {
    let registry = Registry::new();
    let clash = IntCounter::new("requests_failed_total", "owned by someone else").unwrap();
    registry.register(Box::new(clash)).unwrap();

    match register(&registry, "1.2.0").unwrap_err() {
        ReqMeterError::RegistrationConflict { metric, .. } => {
            assert_eq!(metric, "requests_failed_total")
        }
        other => panic!("unexpected: {other}"),
    }
    assert_eq!(family_names(&registry), vec!["requests_failed_total".to_string()]);
    assert!(info_series(&registry).is_empty());
}

#[test]
fn conflict_on_histogram_rolls_back_service_info() {
    let registry = Registry::new();
    let clash = IntCounter::new("request_duration_seconds", "owned by someone else").unwrap();
    registry.register(Box::new(clash)).unwrap();

    let err = register(&registry, "1.2.0").unwrap_err();
    assert!(matches!(err, ReqMeterError::RegistrationConflict { .. }));
    assert_eq!(family_names(&registry), vec!["request_duration_seconds".to_string()]);
}

#[test]
fn interceptor_conflict_leaves_no_partial_instruments() {
    let registry = Registry::new();
    let clash = IntCounter::new("requests_failed_total", "owned by someone else").unwrap();
    registry.register(Box::new(clash)).unwrap();

    let err = Interceptor::new(&registry, &InterceptorOptions::default()).unwrap_err();
    assert!(matches!(err, ReqMeterError::RegistrationConflict { .. }));
    assert_eq!(family_names(&registry), vec!["requests_failed_total".to_string()]);
}

#[test]
fn separate_registries_are_independent() {
    for version in ["1.0.0", "2.0.0"] {
        let registry = Registry::new();
        register(&registry, version).unwrap();
        assert_eq!(info_series(&registry).len(), 1);
    }
}

#[test]
fn invalid_buckets_fail_before_registration() {
    let registry = Registry::new();
    let opts = InterceptorOptions {
        buckets: vec![0.1, 0.1, 1.0],
        ..InterceptorOptions::default()
    };
    let info = ServiceInfo::new("shop", "orders", "1.2.0");
    let err = register_service_info(&registry, &info, &opts).unwrap_err();
    assert!(matches!(err, ReqMeterError::InvalidBuckets(_)));
    assert!(registry.gather().is_empty());
}
