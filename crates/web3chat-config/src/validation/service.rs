//! Validation for the `[service]` section.

use crate::schema::{HistoryMode, Transport, Web3ChatConfig};

use super::helpers::check_range;

pub(crate) fn validate_service(errors: &mut Vec<String>, config: &Web3ChatConfig) {
    let service = &config.service;

    let endpoint = service.endpoint.trim();
    if endpoint.is_empty() {
        errors.push("service.endpoint must not be empty".into());
    } else if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
        errors.push(format!(
            "service.endpoint = {endpoint:?} must start with http:// or https://"
        ));
    }

    if service.history == HistoryMode::Remote && service.transport == Transport::Http {
        errors.push("service.history = \"remote\" requires transport = \"graphql\"".into());
    }

    check_range(
        errors,
        "service.connect_timeout_secs",
        service.connect_timeout_secs,
        1..=120,
    );
    check_range(
        errors,
        "service.request_timeout_secs",
        service.request_timeout_secs,
        1..=600,
    );
}
