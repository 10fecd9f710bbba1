//! Analog Sample Sources
//!
//! [`AnalogSource`] is the seam to the converter driver. Peripheral setup
//! lives behind it; the pipeline only asks for one count per channel.

use crate::{AcquisitionError, AdcChannel, MAX_ADC};
use tracing::debug;

/// Port for reading raw converter counts
pub trait AnalogSource: Send {
    /// Read one sample from `channel`
    fn sample(&mut self, channel: AdcChannel) -> Result<u16, AcquisitionError>;
}

/// Deterministic stand-in for the joystick used on the bench
///
/// Each channel follows a triangle wave over `period_cycles` samples. The
/// river lags the rain by a quarter period, so a run walks through dry
/// weather, a storm, the river cresting, and the recession.
#[derive(Debug, Clone)]
pub struct SimulatedJoystick {
    period_cycles: u32,
    steps: [u32; 2],
    rain_range: (u16, u16),
    river_range: (u16, u16),
}

impl SimulatedJoystick {
    /// Create a simulator repeating every `period_cycles` samples per channel
    pub fn new(period_cycles: u32) -> Self {
        Self {
            period_cycles: period_cycles.max(2),
            steps: [0, 0],
            rain_range: (0, MAX_ADC),
            river_range: (1024, MAX_ADC),
        }
    }

    fn triangle(&self, step: u32, range: (u16, u16)) -> u16 {
        let half = f64::from(self.period_cycles) / 2.0;
        let position = f64::from(step % self.period_cycles);
        let fraction = if position < half {
            position / half
        } else {
            (f64::from(self.period_cycles) - position) / half
        };

        let (low, high) = range;
        let value = f64::from(low) + f64::from(high - low) * fraction;
        value.round() as u16
    }
}

impl Default for SimulatedJoystick {
    fn default() -> Self {
        Self::new(60)
    }
}

impl AnalogSource for SimulatedJoystick {
    fn sample(&mut self, channel: AdcChannel) -> Result<u16, AcquisitionError> {
        let step = self.steps[channel.index()];
        self.steps[channel.index()] = step.wrapping_add(1);

        let value = match channel {
            AdcChannel::Rain => self.triangle(step, self.rain_range),
            AdcChannel::River => {
                let lag = self.period_cycles / 4;
                self.triangle(step.wrapping_add(self.period_cycles - lag), self.river_range)
            }
        };

        debug!("Simulated {} sample: {}", channel, value);
        Ok(value)
    }
}

/// Replays recorded `(rain, river)` raw pairs
///
/// Each channel keeps its own cursor, so a cycle that reads rain then
/// river consumes exactly one pair.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    samples: Vec<(u16, u16)>,
    cursors: [usize; 2],
    looping: bool,
}

impl ReplaySource {
    /// Replay `samples` once
    pub fn new(samples: Vec<(u16, u16)>) -> Self {
        Self {
            samples,
            cursors: [0, 0],
            looping: false,
        }
    }

    /// Replay `samples` forever
    pub fn looping(samples: Vec<(u16, u16)>) -> Self {
        Self {
            looping: true,
            ..Self::new(samples)
        }
    }

    /// Pairs not yet fully consumed
    pub fn remaining(&self) -> usize {
        let consumed = self.cursors[0].max(self.cursors[1]);
        self.samples.len().saturating_sub(consumed)
    }
}

impl AnalogSource for ReplaySource {
    fn sample(&mut self, channel: AdcChannel) -> Result<u16, AcquisitionError> {
        if self.samples.is_empty() {
            return Err(AcquisitionError::Exhausted);
        }

        let cursor = &mut self.cursors[channel.index()];
        if *cursor >= self.samples.len() {
            if !self.looping {
                return Err(AcquisitionError::Exhausted);
            }
            *cursor = 0;
        }

        let (rain, river) = self.samples[*cursor];
        *cursor += 1;

        Ok(match channel {
            AdcChannel::Rain => rain,
            AdcChannel::River => river,
        })
    }
}
