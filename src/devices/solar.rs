/// A rooftop solar array modelled as a bell-shaped daily generation curve.
///
/// Output is zero outside the daylight window, peaks at the midpoint of the
/// window, and is linearly attenuated by cloud cover up to a configurable
/// maximum reduction at 100% cover.
///
/// The model is pure: power depends only on the hour and the cloud cover
/// passed in. Callers own all randomness; cloud sampling happens in the
/// telemetry and forecast generators.
#[derive(Debug, Clone)]
pub struct SolarArray {
    /// Peak output at the top of the curve under clear sky (W).
    pub peak_w: f32,

    /// First daylight hour (inclusive).
    pub sunrise_hour: u32,

    /// Last daylight hour (inclusive).
    pub sunset_hour: u32,

    /// Width of the Gaussian falloff; larger values flatten the curve.
    pub curve_width: f32,

    /// Fractional output reduction at 100% cloud cover (0.0 to 1.0).
    pub max_cloud_attenuation: f32,
}

impl SolarArray {
    /// Creates a new solar array.
    ///
    /// # Panics
    ///
    /// Panics if `sunrise_hour >= sunset_hour`, `sunset_hour > 23`,
    /// `curve_width <= 0`, or `max_cloud_attenuation` is outside [0, 1].
    pub fn new(
        peak_w: f32,
        sunrise_hour: u32,
        sunset_hour: u32,
        curve_width: f32,
        max_cloud_attenuation: f32,
    ) -> Self {
        assert!(sunrise_hour < sunset_hour && sunset_hour < 24);
        assert!(curve_width > 0.0);
        assert!((0.0..=1.0).contains(&max_cloud_attenuation));
        Self {
            peak_w: peak_w.max(0.0),
            sunrise_hour,
            sunset_hour,
            curve_width,
            max_cloud_attenuation,
        }
    }

    /// Hour at which the curve peaks (midpoint of the daylight window).
    pub fn peak_hour(&self) -> f32 {
        (self.sunrise_hour + self.sunset_hour) as f32 / 2.0
    }

    /// Instantaneous output at the given hour and cloud cover (W).
    ///
    /// Zero outside `[sunrise_hour, sunset_hour]`. Inside the window the
    /// output follows `peak * exp(-(hour - peak_hour)^2 / curve_width)`,
    /// scaled down linearly with cloud cover. Never negative.
    pub fn power_w(&self, hour: u32, cloud_cover_pct: f32) -> f32 {
        if hour < self.sunrise_hour || hour > self.sunset_hour {
            return 0.0;
        }

        let offset = hour as f32 - self.peak_hour();
        let curve = self.peak_w * (-(offset * offset) / self.curve_width).exp();

        let cloud = cloud_cover_pct.clamp(0.0, 100.0);
        let attenuation = 1.0 - self.max_cloud_attenuation * (cloud / 100.0);

        (curve * attenuation).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array() -> SolarArray {
        SolarArray::new(3500.0, 6, 18, 18.0, 0.6)
    }

    #[test]
    fn zero_outside_daylight_window() {
        let pv = array();
        for hour in [0, 1, 5, 19, 20, 23] {
            assert_eq!(pv.power_w(hour, 0.0), 0.0);
            assert_eq!(pv.power_w(hour, 100.0), 0.0);
        }
    }

    #[test]
    fn peak_at_noon_under_clear_sky() {
        let pv = array();
        let noon = pv.power_w(12, 0.0);
        assert!((noon - 3500.0).abs() < 1e-3);
        for hour in 0..24 {
            assert!(pv.power_w(hour, 0.0) <= noon);
        }
    }

    #[test]
    fn curve_is_symmetric_around_noon() {
        let pv = array();
        assert!((pv.power_w(9, 0.0) - pv.power_w(15, 0.0)).abs() < 1e-3);
        assert!((pv.power_w(7, 0.0) - pv.power_w(17, 0.0)).abs() < 1e-3);
    }

    #[test]
    fn cloud_cover_strictly_reduces_output() {
        let pv = array();
        let clear = pv.power_w(12, 0.0);
        let half = pv.power_w(12, 50.0);
        let full = pv.power_w(12, 100.0);
        assert!(clear > half && half > full);
        // 60% attenuation at full cover
        assert!((full - 3500.0 * 0.4).abs() < 1e-3);
    }

    #[test]
    fn cloud_cover_out_of_range_is_clamped() {
        let pv = array();
        assert_eq!(pv.power_w(12, 150.0), pv.power_w(12, 100.0));
        assert_eq!(pv.power_w(12, -10.0), pv.power_w(12, 0.0));
    }

    #[test]
    fn output_is_never_negative() {
        let pv = SolarArray::new(3500.0, 6, 18, 18.0, 1.0);
        for hour in 0..24 {
            assert!(pv.power_w(hour, 100.0) >= 0.0);
        }
    }

    #[test]
    fn sunset_hour_is_inclusive() {
        let pv = array();
        assert!(pv.power_w(18, 0.0) > 0.0);
        assert_eq!(pv.power_w(19, 0.0), 0.0);
    }

    #[test]
    #[should_panic]
    fn sunrise_after_sunset_panics() {
        SolarArray::new(3500.0, 18, 6, 18.0, 0.6);
    }

    #[test]
    fn negative_peak_clamped_to_zero() {
        let pv = SolarArray::new(-100.0, 6, 18, 18.0, 0.6);
        assert_eq!(pv.peak_w, 0.0);
    }
}
