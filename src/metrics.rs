//! Prometheus metrics for the identity service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec};

/// Reset tokens issued counter.
pub static RESET_TOKENS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "identity_reset_tokens_issued_total",
        "Total number of password reset token issuance attempts",
        &["status"]
    )
    .expect("Failed to register reset_tokens_issued metric")
});

/// Reset token validations counter.
pub static RESET_TOKEN_VALIDATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "identity_reset_token_validations_total",
        "Total number of password reset token validations",
        &["outcome"]
    )
    .expect("Failed to register reset_token_validations metric")
});

/// OAuth provider requests counter.
pub static OAUTH_REQUESTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "identity_oauth_requests_total",
        "Total number of OAuth provider requests",
        &["operation", "status"]
    )
    .expect("Failed to register oauth_requests metric")
});

/// Record a reset token issuance.
pub fn record_token_issued(status: &str) {
    RESET_TOKENS_ISSUED.with_label_values(&[status]).inc();
}

/// Record a reset token validation outcome.
pub fn record_token_validation(outcome: &str) {
    RESET_TOKEN_VALIDATIONS.with_label_values(&[outcome]).inc();
}

/// Record an OAuth provider request.
pub fn record_oauth_request(operation: &str, status: &str) {
    OAUTH_REQUESTS.with_label_values(&[operation, status]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_token_issued() {
        record_token_issued("success");
        let value = RESET_TOKENS_ISSUED.with_label_values(&["success"]).get();
        assert!(value > 0.0);
    }

    #[test]
    fn test_record_token_validation() {
        record_token_validation("expired");
        let value = RESET_TOKEN_VALIDATIONS.with_label_values(&["expired"]).get();
        assert!(value > 0.0);
    }

    #[test]
    fn test_record_oauth_request() {
        record_oauth_request("access_token", "error");
        let value = OAUTH_REQUESTS.with_label_values(&["access_token", "error"]).get();
        assert!(value > 0.0);
    }
}
