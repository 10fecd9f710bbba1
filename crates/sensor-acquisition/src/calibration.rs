//! Raw-to-Physical Conversion

use crate::{AcquisitionError, AdcChannel, SensorReading, MAX_ADC};
use serde::{Deserialize, Serialize};

/// Constants mapping converter counts to river level and rain intensity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorCalibration {
    /// Normal river level (meters)
    pub baseline_level_m: f64,
    /// Rain intensity at full scale (percent)
    pub max_rain: f64,
    /// Converter full scale
    pub max_adc: u16,
    /// Raw count at the river sensor's rest position
    pub adc_center: u16,
    /// Raw distance from center to either end of travel
    pub adc_span: u16,
    /// Lower edge of the river dead zone (inclusive)
    pub dead_zone_low: u16,
    /// Upper edge of the river dead zone (inclusive)
    pub dead_zone_high: u16,
}

impl Default for SensorCalibration {
    fn default() -> Self {
        Self {
            baseline_level_m: 5.0,
            max_rain: 100.0,
            max_adc: MAX_ADC,
            adc_center: 2048,
            adc_span: 2047,
            dead_zone_low: 1800,
            dead_zone_high: 2100,
        }
    }
}

impl SensorCalibration {
    /// Check that the constants describe a usable mapping
    pub fn validate(&self) -> Result<(), AcquisitionError> {
        if !(self.baseline_level_m > 0.0) {
            return Err(AcquisitionError::InvalidCalibration(format!(
                "baseline level must be positive, got {}",
                self.baseline_level_m
            )));
        }
        if !(self.max_rain > 0.0) {
            return Err(AcquisitionError::InvalidCalibration(format!(
                "max rain must be positive, got {}",
                self.max_rain
            )));
        }
        if self.max_adc == 0 || self.adc_span == 0 {
            return Err(AcquisitionError::InvalidCalibration(
                "full scale and span must be non-zero".to_string(),
            ));
        }
        if self.dead_zone_low > self.adc_center || self.adc_center > self.dead_zone_high {
            return Err(AcquisitionError::InvalidCalibration(format!(
                "dead zone [{}, {}] must contain center {}",
                self.dead_zone_low, self.dead_zone_high, self.adc_center
            )));
        }
        Ok(())
    }

    /// Reject samples above full scale
    pub fn check_raw(&self, channel: AdcChannel, raw: u16) -> Result<u16, AcquisitionError> {
        if raw > self.max_adc {
            Err(AcquisitionError::OutOfRange {
                channel,
                value: raw,
                max: self.max_adc,
            })
        } else {
            Ok(raw)
        }
    }

    /// River level in meters
    ///
    /// Flat at the baseline inside the dead zone, linear on either side,
    /// never below zero.
    pub fn river_level(&self, raw: u16) -> f64 {
        let baseline = self.baseline_level_m;
        let center = f64::from(self.adc_center);
        let span = f64::from(self.adc_span);
        let raw_f = f64::from(raw);

        let level = if raw > self.dead_zone_high {
            baseline + baseline * (raw_f - center) / span
        } else if raw < self.dead_zone_low {
            baseline - baseline * (center - raw_f) / span
        } else {
            baseline
        };

        level.max(0.0)
    }

    /// Rain intensity in percent of the modeled maximum
    pub fn rain_intensity(&self, raw: u16) -> f64 {
        (self.max_rain * f64::from(raw) / f64::from(self.max_adc)).clamp(0.0, self.max_rain)
    }

    /// Build a reading from one pair of raw samples
    pub fn reading(
        &self,
        raw_rain: u16,
        raw_river: u16,
    ) -> Result<SensorReading, AcquisitionError> {
        let raw_rain = self.check_raw(AdcChannel::Rain, raw_rain)?;
        let raw_river = self.check_raw(AdcChannel::River, raw_river)?;

        Ok(SensorReading {
            raw_rain,
            raw_river,
            river_level: self.river_level(raw_river),
            rain_intensity: self.rain_intensity(raw_rain),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dead_zone_is_exact_baseline() {
        let cal = SensorCalibration::default();
        for raw in [1800, 1900, 2048, 2100] {
            assert_eq!(cal.river_level(raw), 5.0);
        }
    }

    #[test]
    fn test_river_extremes() {
        let cal = SensorCalibration::default();
        assert!((cal.river_level(4095) - 10.0).abs() < 1e-9);
        // 5 - 5 * 2048 / 2047 dips just under zero and is clamped
        assert_eq!(cal.river_level(0), 0.0);
        assert!(cal.river_level(2101) > 5.0);
        assert!(cal.river_level(1799) < 5.0);
    }

    #[test]
    fn test_rain_linear() {
        let cal = SensorCalibration::default();
        assert_eq!(cal.rain_intensity(0), 0.0);
        assert_eq!(cal.rain_intensity(4095), 100.0);
        assert!((cal.rain_intensity(2048) - 100.0 * 2048.0 / 4095.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let cal = SensorCalibration::default();
        assert_eq!(
            cal.reading(4096, 2000),
            Err(AcquisitionError::OutOfRange {
                channel: AdcChannel::Rain,
                value: 4096,
                max: 4095,
            })
        );
        assert!(matches!(
            cal.reading(100, 5000),
            Err(AcquisitionError::OutOfRange { channel: AdcChannel::River, .. })
        ));
    }

    #[test]
    fn test_reading_keeps_raw_values() {
        let cal = SensorCalibration::default();
        let reading = cal.reading(1000, 3000).unwrap();
        assert_eq!(reading.raw_rain, 1000);
        assert_eq!(reading.raw_river, 3000);
        assert!(reading.river_level > 5.0);
    }

    #[test]
    fn test_validate() {
        assert!(SensorCalibration::default().validate().is_ok());

        let inverted = SensorCalibration {
            dead_zone_low: 2200,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let no_baseline = SensorCalibration {
            baseline_level_m: 0.0,
            ..Default::default()
        };
        assert!(no_baseline.validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_low_side_below_baseline_and_monotone(raw in 0u16..1799) {
            let cal = SensorCalibration::default();
            prop_assert!(cal.river_level(raw) < 5.0);
            prop_assert!(cal.river_level(raw) <= cal.river_level(raw + 1));
        }

        #[test]
        fn prop_high_side_above_baseline_and_monotone(raw in 2101u16..4095) {
            let cal = SensorCalibration::default();
            prop_assert!(cal.river_level(raw) > 5.0);
            prop_assert!(cal.river_level(raw) <= cal.river_level(raw + 1));
        }

        #[test]
        fn prop_dead_zone(raw in 1800u16..=2100) {
            prop_assert_eq!(SensorCalibration::default().river_level(raw), 5.0);
        }

        #[test]
        fn prop_rain_formula(raw in 0u16..=4095) {
            let rain = SensorCalibration::default().rain_intensity(raw);
            let expected = 100.0 * f64::from(raw) / 4095.0;
            prop_assert!((rain - expected).abs() < 1e-9);
            prop_assert!((0.0..=100.0).contains(&rain));
        }
    }
}
