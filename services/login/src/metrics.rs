//! Prometheus metrics for the Login Service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};

/// Tokens issued counter.
pub static TOKENS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "login_service_tokens_issued_total",
        "Total number of tokens issued",
        &["token_type", "algorithm"]
    )
    .expect("Failed to register tokens_issued metric")
});

/// Grant requests counter.
pub static GRANTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "login_service_grants_total",
        "Total number of token endpoint grant requests",
        &["grant_type", "status"]
    )
    .expect("Failed to register grants metric")
});

/// Refresh token rotations counter.
pub static REFRESH_ROTATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "login_service_refresh_rotations_total",
        "Total number of refresh token rotations",
        &["status"]
    )
    .expect("Failed to register refresh_rotations metric")
});

/// Bearer validations counter.
pub static BEARER_VALIDATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "login_service_bearer_validations_total",
        "Total number of bearer token validations",
        &["status"]
    )
    .expect("Failed to register bearer_validations metric")
});

/// Security events counter.
pub static SECURITY_EVENTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "login_service_security_events_total",
        "Total number of security events",
        &["event_type"]
    )
    .expect("Failed to register security_events metric")
});

/// Record a token issuance.
pub fn record_token_issued(token_type: &str, algorithm: &str) {
    TOKENS_ISSUED
        .with_label_values(&[token_type, algorithm])
        .inc();
}

/// Record a grant outcome.
pub fn record_grant(grant_type: &str, status: &str) {
    GRANTS.with_label_values(&[grant_type, status]).inc();
}

/// Record a refresh rotation outcome.
pub fn record_refresh_rotation(status: &str) {
    REFRESH_ROTATIONS.with_label_values(&[status]).inc();
}

/// Record a bearer validation outcome.
pub fn record_bearer_validation(status: &str) {
    BEARER_VALIDATIONS.with_label_values(&[status]).inc();
}

/// Record a security event.
pub fn record_security_event(event_type: &str) {
    SECURITY_EVENTS.with_label_values(&[event_type]).inc();
}

/// Render the default registry in Prometheus text format.
#[must_use]
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
