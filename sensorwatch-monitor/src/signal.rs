//! Signal sources
//!
//! A signal source fabricates the raw value of one sensor for one tick. The
//! monitor clamps and classifies whatever comes out, so sources are free to
//! overshoot the hard bounds; they must only return finite numbers.
//!
//! Three sources ship with the crate, selected per sensor by
//! [`SignalProfile`]. Tests and embedders can plug in their own through
//! [`from_fn`] or by implementing [`SignalSource`].

use std::f64::consts::PI;

use sensorwatch_core::Entropy;

use crate::sensors::{SensorConfig, SignalProfile};

/// Chance of a load spike per tick
pub const SPIKE_CHANCE: f64 = 0.1;

/// Everything a source may look at when producing a value
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    /// Sensor being sampled
    pub sensor: &'a SensorConfig,
    /// Value of the previous reading, if any
    pub prior: Option<f64>,
    /// Number of completed cycles before this one
    pub tick: u64,
    /// Drift bias, one of -1, 0 or +1
    pub trend: i8,
    /// Hour of day (0..24, UTC) of the monitor clock
    pub hour: u32,
}

/// Per-sensor value generator
pub trait SignalSource: Send {
    /// Produce the raw value for this tick
    fn next_value(&mut self, ctx: &SignalContext<'_>, entropy: &mut dyn Entropy) -> f64;
}

/// Random walk around the previous value
///
/// Starts uniformly within the hard bounds, then moves by half the trend
/// bias plus Gaussian noise (σ = 0.3) each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWalk;

impl SignalSource for RandomWalk {
    fn next_value(&mut self, ctx: &SignalContext<'_>, entropy: &mut dyn Entropy) -> f64 {
        match ctx.prior {
            Some(prior) => prior + f64::from(ctx.trend) * 0.5 + entropy.gaussian(0.0, 0.3),
            None => entropy.uniform(ctx.sensor.min, ctx.sensor.max),
        }
    }
}

/// Daily temperature-like cycle, coolest at midnight and warmest at noon
#[derive(Debug, Clone, Copy, Default)]
pub struct DiurnalCycle;

impl SignalSource for DiurnalCycle {
    fn next_value(&mut self, ctx: &SignalContext<'_>, entropy: &mut dyn Entropy) -> f64 {
        let phase = (f64::from(ctx.hour) - 6.0) * PI / 12.0;
        22.0 + 3.0 * phase.sin() + entropy.gaussian(0.0, 0.5)
    }
}

/// Oscillating base load with occasional spikes into the 70-95 band
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadSpikes;

impl SignalSource for LoadSpikes {
    fn next_value(&mut self, ctx: &SignalContext<'_>, entropy: &mut dyn Entropy) -> f64 {
        if entropy.chance(SPIKE_CHANCE) {
            entropy.uniform(70.0, 95.0)
        } else {
            30.0 + 20.0 * (ctx.tick as f64 / 10.0).sin() + entropy.gaussian(0.0, 5.0)
        }
    }
}

/// Default source for a profile
pub fn source_for(profile: SignalProfile) -> Box<dyn SignalSource> {
    match profile {
        SignalProfile::RandomWalk => Box::new(RandomWalk),
        SignalProfile::Diurnal => Box::new(DiurnalCycle),
        SignalProfile::LoadSpikes => Box::new(LoadSpikes),
    }
}

/// Source backed by a closure
pub struct FnSource<F>(F);

impl<F> SignalSource for FnSource<F>
where
    F: FnMut(&SignalContext<'_>, &mut dyn Entropy) -> f64 + Send,
{
    fn next_value(&mut self, ctx: &SignalContext<'_>, entropy: &mut dyn Entropy) -> f64 {
        (self.0)(ctx, entropy)
    }
}

/// Wrap a closure as a [`SignalSource`]
///
/// ```
/// use sensorwatch_monitor::signal::from_fn;
///
/// // Always reads 21.5 regardless of sensor or tick
/// let source = from_fn(|_ctx, _entropy| 21.5);
/// # let _ = source;
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: FnMut(&SignalContext<'_>, &mut dyn Entropy) -> f64 + Send,
{
    FnSource(f)
}
