//! Run the background tick thread for a few seconds, then export
//!
//! The export document is written as pretty JSON to stdout; pipe it into a
//! file or `jq` to inspect it.

use std::io;
use std::thread;
use std::time::Duration;

use log::info;
use sensorwatch_monitor::{MonitorConfig, MonitorResult, SensorMonitor};

fn main() -> MonitorResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let monitor = SensorMonitor::new(MonitorConfig::fast())?;
    monitor.start()?;

    for _ in 0..3 {
        thread::sleep(Duration::from_secs(1));
        let status = monitor.status();
        info!(
            "{} cycles, {} readings, W={} C={}",
            status.cycle_count,
            status.statistics.total_readings,
            status.alert_count.warning,
            status.alert_count.critical
        );
    }

    monitor.stop();
    monitor.write_export(io::stdout().lock())?;
    Ok(())
}
