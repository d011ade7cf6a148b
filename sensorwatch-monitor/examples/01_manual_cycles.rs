//! Drive the monitor by hand and print what it saw
//!
//! Run with `RUST_LOG=debug cargo run --example 01_manual_cycles` to see each
//! cycle being logged.

use sensorwatch_core::ManualClock;
use sensorwatch_monitor::{MonitorConfig, MonitorResult, SensorMonitor};

fn main() -> MonitorResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // One simulated minute, reproducible run to run
    let clock = ManualClock::new(1_700_000_000_000);
    let monitor = SensorMonitor::builder()
        .config(MonitorConfig::default().with_seed(2024))
        .clock(clock.clone())
        .build()?;

    for _ in 0..60 {
        clock.advance(1_000);
        let report = monitor.run_cycle()?;
        if report.alerts_raised > 0 {
            println!("cycle {:>2}: {} alert(s)", report.cycle, report.alerts_raised);
        }
    }

    monitor.trigger_anomaly(Some("press_01"))?;

    let status = monitor.status();
    println!();
    println!("Readings:     {}", status.statistics.total_readings);
    println!("Uptime:       {} s", status.statistics.uptime_seconds);
    println!("Anomaly rate: {:.1}%", status.statistics.anomaly_rate * 100.0);
    println!(
        "Alerts:       W={} C={}",
        status.alert_count.warning, status.alert_count.critical
    );

    println!();
    for (id, analytics) in &status.analytics {
        println!(
            "{:<9} now {:>7.2}  avg {:>7.2}  [{:>7.2}, {:>7.2}]  {}",
            id, analytics.current, analytics.avg, analytics.min, analytics.max, analytics.trend
        );
    }

    println!();
    for alert in status.recent_alerts.iter().rev().take(5) {
        println!("{}  {}", alert.timestamp.format("%H:%M:%S"), alert.message);
    }

    Ok(())
}
