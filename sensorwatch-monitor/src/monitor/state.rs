//! Mutable monitor state
//!
//! Everything a tick touches lives in one [`MonitorState`] so a single lock
//! guards it. The tick thread holds that lock for a whole cycle; readers never
//! observe a half-updated history.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Timelike, Utc};
use log::{debug, error, info};

use sensorwatch_core::constants::{CRITICAL_ANOMALY_SHARE, MS_PER_SECOND, READING_PRECISION};
use sensorwatch_core::time::{delta_ms, to_datetime};
use sensorwatch_core::{round_to, CircularBuffer, Entropy, TimeSource, Timestamp};

use crate::analytics::SensorAnalytics;
use crate::config::MonitorConfig;
use crate::errors::{MonitorError, MonitorResult};
use crate::events::{Alert, SensorReading};
use crate::sensors::SensorConfig;
use crate::signal::{SignalContext, SignalSource};
use crate::tier::{classify, Tier, TierCounts};

const TREND_CHOICES: [i8; 3] = [-1, 0, 1];

/// Distance beyond a hard bound of a manually triggered anomaly, as a share
/// of the sensor span
const TRIGGERED_ANOMALY_OFFSET: f64 = 0.2;

/// One registered sensor and everything recorded about it
pub(crate) struct SensorSlot {
    pub(crate) config: SensorConfig,
    pub(crate) source: Box<dyn SignalSource>,
    pub(crate) trend: i8,
    pub(crate) history: CircularBuffer<SensorReading>,
    pub(crate) current: Option<SensorReading>,
}

/// Outcome of a completed cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Cycle number, starting at 1
    pub cycle: u64,
    /// Readings recorded, in sensor registration order
    pub readings: Vec<SensorReading>,
    /// Alerts raised during the cycle
    pub alerts_raised: usize,
    /// Wall time spent in the cycle
    pub elapsed: Duration,
}

/// Processing-time metrics of the tick loop
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Performance {
    /// Exponential moving average of cycle time, seconds
    pub(crate) avg_processing_time: f64,
    /// Sensors divided by the last cycle time
    pub(crate) readings_per_second: f64,
}

pub(crate) struct MonitorState {
    pub(crate) sensors: Vec<SensorSlot>,
    index: HashMap<String, usize>,
    pub(crate) alerts: CircularBuffer<Alert>,
    pub(crate) tier_counts: TierCounts,
    pub(crate) total_readings: u64,
    pub(crate) session_start: DateTime<Utc>,
    session_start_ms: Timestamp,
    pub(crate) uptime_seconds: u64,
    pub(crate) cycle_count: u64,
    pub(crate) performance: Performance,
    anomaly_chance: f64,
    trend_resample_every: u64,
    entropy: Box<dyn Entropy + Send>,
    clock: Arc<dyn TimeSource>,
}

impl MonitorState {
    pub(crate) fn new(
        config: &MonitorConfig,
        sensors: Vec<(SensorConfig, Box<dyn SignalSource>)>,
        entropy: Box<dyn Entropy + Send>,
        clock: Arc<dyn TimeSource>,
    ) -> MonitorResult<Self> {
        config.validate()?;
        if sensors.is_empty() {
            return Err(MonitorError::config("at least one sensor is required"));
        }

        let mut index = HashMap::with_capacity(sensors.len());
        let mut slots = Vec::with_capacity(sensors.len());
        for (position, (sensor, source)) in sensors.into_iter().enumerate() {
            sensor.validate()?;
            if index.insert(sensor.id.clone(), position).is_some() {
                return Err(MonitorError::DuplicateSensor { id: sensor.id });
            }
            slots.push(SensorSlot {
                config: sensor,
                source,
                trend: 0,
                history: CircularBuffer::with_capacity(config.history_capacity)?,
                current: None,
            });
        }

        let session_start_ms = clock.now();
        let mut state = Self {
            sensors: slots,
            index,
            alerts: CircularBuffer::with_capacity(config.alert_capacity)?,
            tier_counts: TierCounts::default(),
            total_readings: 0,
            session_start: to_datetime(session_start_ms),
            session_start_ms,
            uptime_seconds: 0,
            cycle_count: 0,
            performance: Performance::default(),
            anomaly_chance: config.anomaly_chance,
            trend_resample_every: config.trend_resample_every,
            entropy,
            clock,
        };
        state.resample_trends();
        Ok(state)
    }

    /// Produce, classify and record one reading per sensor
    ///
    /// Stops at the first sensor whose source misbehaves; readings already
    /// recorded in this cycle stay, and the cycle is not counted.
    pub(crate) fn run_cycle(&mut self) -> MonitorResult<CycleReport> {
        let started = Instant::now();
        let now = to_datetime(self.clock.now());

        let mut readings = Vec::with_capacity(self.sensors.len());
        for position in 0..self.sensors.len() {
            let (value, tier) = self.sample(position, now.hour())?;
            readings.push(self.record(position, now, value, tier));
        }

        self.cycle_count += 1;
        if self.trend_resample_every > 0 && self.cycle_count % self.trend_resample_every == 0 {
            self.resample_trends();
        }

        let elapsed = started.elapsed();
        self.update_metrics(elapsed);

        let alerts_raised = readings.iter().filter(|r| r.status.is_alert()).count();
        debug!(
            "cycle {} recorded {} readings, {} alerts",
            self.cycle_count,
            readings.len(),
            alerts_raised
        );

        Ok(CycleReport {
            cycle: self.cycle_count,
            readings,
            alerts_raised,
            elapsed,
        })
    }

    /// Turn a failed cycle into a critical system alert
    pub(crate) fn record_system_error(&mut self, error: &dyn fmt::Display) {
        error!("Error in monitoring cycle: {}", error);
        let alert = Alert::system_error(self.clock.now_utc(), error);
        self.alerts.push(alert);
    }

    /// Record a critical reading well outside a hard bound
    pub(crate) fn trigger_anomaly(&mut self, sensor_id: Option<&str>) -> MonitorResult<SensorReading> {
        let position = match sensor_id {
            Some(id) => self.position(id)?,
            None => self.entropy.pick_index(self.sensors.len()),
        };
        let sensor = &self
            .sensors
            .get(position)
            .ok_or_else(|| MonitorError::config("no sensors registered"))?
            .config;

        let offset = sensor.span() * TRIGGERED_ANOMALY_OFFSET;
        let value = if self.entropy.chance(0.5) {
            sensor.max + offset
        } else {
            sensor.min - offset
        };

        let reading = self.record(position, self.clock.now_utc(), value, Tier::Critical);
        info!("Triggered anomaly on {}: {}{}", reading.sensor_id, reading.value, reading.unit);
        Ok(reading)
    }

    pub(crate) fn position(&self, sensor_id: &str) -> MonitorResult<usize> {
        self.index
            .get(sensor_id)
            .copied()
            .ok_or_else(|| MonitorError::UnknownSensor {
                id: sensor_id.to_string(),
            })
    }

    fn slot(&self, sensor_id: &str) -> Option<&SensorSlot> {
        self.position(sensor_id).ok().map(|position| &self.sensors[position])
    }

    pub(crate) fn analytics(&self, sensor_id: &str) -> Option<SensorAnalytics> {
        let slot = self.slot(sensor_id)?;
        let values: Vec<f64> = slot.history.iter().map(|r| r.value).collect();
        SensorAnalytics::from_values(&values)
    }

    pub(crate) fn all_analytics(&self) -> BTreeMap<String, SensorAnalytics> {
        self.sensors
            .iter()
            .filter_map(|slot| {
                let values: Vec<f64> = slot.history.iter().map(|r| r.value).collect();
                SensorAnalytics::from_values(&values).map(|a| (slot.config.id.clone(), a))
            })
            .collect()
    }

    /// A `limit` of 0 means every retained reading
    pub(crate) fn history(&self, sensor_id: &str, limit: usize) -> Vec<SensorReading> {
        self.slot(sensor_id)
            .map(|slot| match limit {
                0 => slot.history.to_vec(),
                n => slot.history.tail(n).cloned().collect(),
            })
            .unwrap_or_default()
    }

    pub(crate) fn full_history(&self) -> BTreeMap<String, Vec<SensorReading>> {
        self.sensors
            .iter()
            .map(|slot| (slot.config.id.clone(), slot.history.to_vec()))
            .collect()
    }

    pub(crate) fn current_readings(&self) -> BTreeMap<String, SensorReading> {
        self.sensors
            .iter()
            .filter_map(|slot| slot.current.clone().map(|r| (slot.config.id.clone(), r)))
            .collect()
    }

    /// Share of readings that were not normal, three decimals
    pub(crate) fn anomaly_rate(&self) -> f64 {
        if self.total_readings == 0 {
            return 0.0;
        }
        round_to(
            self.tier_counts.non_normal() as f64 / self.total_readings as f64,
            3,
        )
    }

    pub(crate) fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }

    /// Steps 1-4: generate, clamp, classify, maybe force an anomaly
    fn sample(&mut self, position: usize, hour: u32) -> MonitorResult<(f64, Tier)> {
        let tick = self.cycle_count;
        let slot = &mut self.sensors[position];
        let ctx = SignalContext {
            sensor: &slot.config,
            prior: slot.current.as_ref().map(|r| r.value),
            tick,
            trend: slot.trend,
            hour,
        };

        let raw = slot.source.next_value(&ctx, self.entropy.as_mut());
        if !raw.is_finite() {
            return Err(MonitorError::InvalidValue {
                sensor: slot.config.id.clone(),
                value: raw,
            });
        }

        let value = slot.config.clamp(raw);
        let tier = classify(value, &slot.config.normal_range);
        Ok(self.apply_anomaly(position, value, tier))
    }

    fn apply_anomaly(&mut self, position: usize, value: f64, tier: Tier) -> (f64, Tier) {
        if !self.entropy.chance(self.anomaly_chance) {
            return (value, tier);
        }
        if !self.entropy.chance(CRITICAL_ANOMALY_SHARE) {
            return (value, Tier::Warning);
        }

        let sensor = &self.sensors[position].config;
        let offset = self.entropy.uniform(0.01, 0.05) * sensor.span();
        let value = if self.entropy.chance(0.5) {
            sensor.max + offset
        } else {
            sensor.min - offset
        };
        (value, Tier::Critical)
    }

    /// Step 5: round, store, count and alert
    fn record(
        &mut self,
        position: usize,
        timestamp: DateTime<Utc>,
        value: f64,
        tier: Tier,
    ) -> SensorReading {
        let slot = &mut self.sensors[position];
        let reading = SensorReading {
            sensor_id: slot.config.id.clone(),
            timestamp,
            value: round_to(value, READING_PRECISION),
            unit: slot.config.unit.clone(),
            status: tier,
        };

        slot.history.push(reading.clone());
        slot.current = Some(reading.clone());
        self.tier_counts.record(tier);
        self.total_readings += 1;

        if tier.is_alert() {
            let alert = Alert::from_reading(&reading, &slot.config);
            debug!("{}", alert.message);
            self.alerts.push(alert);
        }
        reading
    }

    fn resample_trends(&mut self) {
        for slot in &mut self.sensors {
            slot.trend = TREND_CHOICES[self.entropy.pick_index(TREND_CHOICES.len())];
        }
    }

    /// Step 7: moving-average cycle time, throughput and uptime
    fn update_metrics(&mut self, elapsed: Duration) {
        let seconds = elapsed.as_secs_f64();
        let perf = &mut self.performance;
        perf.avg_processing_time = perf.avg_processing_time * 0.9 + seconds * 0.1;
        perf.readings_per_second = if seconds > 0.0 {
            self.sensors.len() as f64 / seconds
        } else {
            0.0
        };

        self.uptime_seconds = delta_ms(self.session_start_ms, self.clock.now()) / MS_PER_SECOND;
    }
}
