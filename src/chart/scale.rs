const SIZE_EXPONENT: f64 = 0.5;

/// Square-root scale from `[0, max observed value]` to a radius range, so a
/// bubble's area grows linearly with its value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    domain_max: f64,
    min_radius: f32,
    max_radius: f32,
}

impl ValueScale {
    pub fn new(domain_max: f64, [min_radius, max_radius]: [f32; 2]) -> Self {
        Self {
            domain_max,
            min_radius,
            max_radius,
        }
    }

    /// Fits the domain to the largest value in one pass.
    pub fn fit(values: impl IntoIterator<Item = f64>, range: [f32; 2]) -> Self {
        let domain_max = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(0.0_f64, f64::max);
        Self::new(domain_max, range)
    }

    pub fn domain_max(&self) -> f64 {
        self.domain_max
    }

    fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() || !self.domain_max.is_finite() || self.domain_max <= 0.0 {
            return 0.0;
        }

        (value / self.domain_max).clamp(0.0, 1.0).powf(SIZE_EXPONENT)
    }

    /// Radius for `value`; out-of-domain input lands on the nearest bound.
    pub fn radius(&self, value: f64) -> f32 {
        let span = (self.max_radius - self.min_radius) as f64;
        (self.min_radius as f64 + span * self.normalize(value)) as f32
    }
}
