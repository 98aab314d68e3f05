//! Demo driver for the welfare ledger engine.
//!
//! Runs one officer session end-to-end: load the demo dataset, inspect the
//! detected fraud clusters, apply a budget, fire the attack simulation and
//! recover, then print the session audit log.
//!
//! Usage: `welfare-ledger [seed] [budget]`

use welfare_ledger_core_rs::{
    chain_intact, SessionConfig, SessionCoordinator, SessionMode,
};

fn main() {
    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let budget: i64 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(500_000);

    let mut session = SessionCoordinator::new(SessionConfig::new(seed));
    session.set_authenticated(true);
    session.set_mode(SessionMode::Demo);

    println!("── JAN-DHANRAKSHA demo session (seed {seed}) ──");
    println!("  session {}", session.session_id());
    print_overview(&session);

    println!("\nFraud clusters:");
    for cluster in session.clusters() {
        let regions: Vec<&str> = cluster.regions().iter().map(String::as_str).collect();
        println!(
            "  {}  claims={}  regions={}",
            cluster.citizen_hash(),
            cluster.claim_count(),
            regions.join(",")
        );
    }

    let summary = session.apply_budget(budget);
    println!(
        "\nBudget pass: budget=₹{} approved={} blocked={} remaining=₹{}",
        summary.budget, summary.approved, summary.blocked, summary.remaining_budget
    );

    let report = session.simulate_attack();
    println!(
        "\nAttack simulated: {} [{}] -> {}",
        report.threat, report.severity, report.recommended_action
    );
    print_overview(&session);

    session.recover_system();
    println!("\nRecovered.");
    print_overview(&session);

    println!("\nSession audit log:");
    for event in session.events().events() {
        println!("  {event:?}");
    }
}

fn print_overview(session: &SessionCoordinator) {
    let metrics = session.metrics();
    let system = session.system();
    println!(
        "  status={} integrity={:.1}% under_attack={} chain_intact={}",
        system.status(),
        system.ledger_integrity(),
        system.under_attack(),
        chain_intact(session.records()),
    );
    println!(
        "  records={} approved={} pending={} blocked={} avg_risk={} fraud_rate={:.2}",
        metrics.total,
        metrics.approved,
        metrics.pending,
        metrics.blocked,
        metrics.average_risk,
        metrics.fraud_rate,
    );
}
