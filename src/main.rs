//! Oracle Aggregation Playground.
//!
//! Walks every named scenario through a session in mock mode and prints how
//! the median holds up. Set `ORACLE_SIM_LIVE=1` to also run against the live
//! gateway.

use anyhow::Result;
use oracle_sim::*;
use rust_decimal_macros::dec;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("oracle_sim=info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = SimulatorConfig::from_env();
    let mut session = SimulationSession::new(config);

    println!("Oracle Aggregation Playground");
    println!("Median aggregation under failure scenarios\n");

    scenario_1_named_presets(&mut session).await;
    scenario_2_stacked_knobs(&mut session).await;
    scenario_3_majority_corruption(&mut session).await;

    if std::env::var("ORACLE_SIM_LIVE").is_ok_and(|v| v == "1") {
        scenario_4_live_feed(&mut session).await;
    }

    println!("\n{} runs, {} events recorded.", session.runs_started(), session.events().len());
    Ok(())
}

/// Each named preset against ETH.
async fn scenario_1_named_presets(session: &mut SimulationSession) {
    println!("Scenario 1: Named Presets (ETH, mock)\n");

    for preset in ScenarioPreset::NAMED {
        println!("  {}: {}", preset.title(), preset.description());
        match session.run_preset("ETH", SourceMode::Mock, preset).await {
            Ok(Some(result)) => print_result(&result),
            Ok(None) => println!("    skipped, run in progress"),
            Err(e) => println!("    failed: {}", e),
        }
        session.reset();
    }
}

/// Shift, delay, outlier and one corrupt signer together.
async fn scenario_2_stacked_knobs(session: &mut SimulationSession) {
    println!("Scenario 2: Stacked Knobs (BTC, mock)\n");

    let config = ScenarioConfig::default()
        .with_price_shift(dec!(-10))
        .with_delay(dec!(120))
        .with_outlier(dec!(80))
        .with_corrupt_signers(1);

    match session.run_scenario("BTC", SourceMode::Mock, config).await {
        Ok(Some(result)) => print_result(&result),
        Ok(None) => println!("    skipped, run in progress"),
        Err(e) => println!("    failed: {}", e),
    }
    session.reset();
}

/// Two of three signers corrupt: the median no longer protects the feed.
async fn scenario_3_majority_corruption(session: &mut SimulationSession) {
    println!("Scenario 3: Majority Corruption (SOL, mock)\n");

    let config = ScenarioConfig::default().with_corrupt_signers(2);
    match session.run_scenario("SOL", SourceMode::Mock, config).await {
        Ok(Some(result)) => {
            print_result(&result);
            println!("    with 2 of 3 signers corrupt the median follows the corrupt value\n");
        }
        Ok(None) => println!("    skipped, run in progress"),
        Err(e) => println!("    failed: {}", e),
    }
    session.reset();
}

async fn scenario_4_live_feed(session: &mut SimulationSession) {
    println!("Scenario 4: Live Gateway (ETH)\n");

    match session.run_preset("ETH", SourceMode::Live, ScenarioPreset::CorruptSigner).await {
        Ok(Some(result)) => print_result(&result),
        Ok(None) => println!("    skipped, run in progress"),
        Err(e) => println!("    failed: {} (state: {})\n", e, session.state()),
    }
    session.reset();
}

fn print_result(result: &AggregateResult) {
    for (obs, sig) in result.observations.iter().zip(&result.signatures) {
        println!("    {}: ${} @ {} sig {}", obs.id, obs.value.round_dp(2), obs.timestamp, short(sig));
    }
    if let Some(summary) = result.summary {
        println!(
            "    median ${}, mean ${}, spread {}%",
            summary.median.round_dp(2),
            summary.mean.round_dp(2),
            (summary.spread_ratio() * dec!(100)).round_dp(2)
        );
    }
    if let Some(freshness) = result.freshness(Timestamp::now()) {
        println!("    freshness: {}", freshness);
    }
    println!(
        "    tx {} block {} gas {}\n",
        short(&result.metadata.transaction_hash),
        result.metadata.block_number,
        result.metadata.gas_used
    );
}

fn short(s: &str) -> String {
    if s.chars().count() > 12 {
        format!("{}…", s.chars().take(12).collect::<String>())
    } else {
        s.to_string()
    }
}
