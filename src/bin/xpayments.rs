//! XPayments demo driver
//!
//! Runs the test-mode harness against a simulated client and prints the
//! results as JSON. Configuration comes from `XPAYMENTS_*` environment
//! variables; without `XPAYMENTS_API_KEY` the built-in test configuration is
//! used.

use rust_xpayments::storage::{InMemoryRecordStore, PaymentRecord, PaymentRecordStore};
use rust_xpayments::testing::{
    run_rate_limit_probe, run_retry_probe, run_scenarios, test_mode_config, ScenarioOutcome,
};
use rust_xpayments::{PaymentConfig, XPayments};
use std::env;

async fn store_successes(store: &InMemoryRecordStore, outcomes: &[ScenarioOutcome]) {
    for response in outcomes.iter().filter_map(|o| o.response.as_ref()) {
        if let Err(e) = store.insert(PaymentRecord::from_response(response)).await {
            tracing::warn!("Failed to store payment {}: {}", response.id, e);
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = match PaymentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::info!("Using test configuration: {}", e);
            test_mode_config(true)
        }
    };

    let probe_count: u32 = env::var("XPAYMENTS_PROBE_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(15);

    let client = XPayments::init(config)?;
    let store = InMemoryRecordStore::new();

    tracing::info!("Testing payment scenarios...");
    let scenarios = run_scenarios(&client).await;
    store_successes(&store, &scenarios).await;

    client.reset_rate_limits().await;

    tracing::info!("Testing rate limiting...");
    let rate_limit = run_rate_limit_probe(&client, probe_count).await;
    store_successes(&store, &rate_limit).await;

    client.reset_rate_limits().await;

    tracing::info!("Testing retry mechanism...");
    let retry = run_retry_probe(&client, 5).await;
    store_successes(&store, &retry).await;

    let recent = store.recent(10).await?;
    tracing::info!("Stored {} successful payments", store.len().await);

    let report = serde_json::json!({
        "scenarios": scenarios,
        "rateLimit": rate_limit,
        "retry": retry,
        "recentPayments": recent,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
