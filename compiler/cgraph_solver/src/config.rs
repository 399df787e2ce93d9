//! Solver configuration.

/// Conjugate-gradient settings, fixed when the solve is staged.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CgConfig {
    /// Upper bound on iterations.
    pub max_iters: u32,
    /// Relative tolerance: stop once `|r|^2 <= |r0|^2 * epsilon^2`.
    pub epsilon: f64,
    /// Time step of the post-solve position update `x += dt * v`, if any.
    pub dt: Option<f64>,
}

impl Default for CgConfig {
    fn default() -> Self {
        CgConfig {
            max_iters: 50,
            epsilon: 1e-6,
            dt: None,
        }
    }
}

impl CgConfig {
    /// Default settings.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_iters(mut self, max_iters: u32) -> Self {
        self.max_iters = max_iters;
        self
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Enable the position update with step `dt`.
    #[must_use]
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = CgConfig::new().max_iters(8).dt(1e-2);
        assert_eq!(config.max_iters, 8);
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!(config.dt, Some(1e-2));
    }
}
