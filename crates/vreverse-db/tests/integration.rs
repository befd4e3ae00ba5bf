//! Offline unit tests for vreverse-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use vreverse_core::{AppConfig, Environment};
use vreverse_db::{PoolConfig, SubscriberRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: Some("postgres://example".to_string()),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        gemini_api_key: None,
        gemini_model: "gemini-3-pro-preview".to_string(),
        gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        gemini_timeout_secs: 120,
        strict_variations: false,
        admin_emails: vec![],
        webhook_token: None,
        max_upload_bytes: 20 * 1024 * 1024,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`SubscriberRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn subscriber_row_has_expected_fields() {
    use chrono::Utc;

    let row = SubscriberRow {
        email: "buyer@example.com".to_string(),
        last_event: "PURCHASE_APPROVED".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.email, "buyer@example.com");
    assert_eq!(row.last_event, "PURCHASE_APPROVED");
    assert!(row.updated_at >= row.created_at);
}
