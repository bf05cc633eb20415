//! Type definitions for transient analysis.

use crate::error::{Error, Result};

/// Integration interval `[start, stop]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpan {
    pub start: f64,
    pub stop: f64,
}

impl TimeSpan {
    /// Create a span, rejecting non-finite bounds and `stop <= start`.
    pub fn new(start: f64, stop: f64) -> Result<Self> {
        if !start.is_finite() || !stop.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "time span bounds must be finite, got [{start}, {stop}]"
            )));
        }
        if stop <= start {
            return Err(Error::InvalidConfig(format!(
                "time span must end after it starts, got [{start}, {stop}]"
            )));
        }
        Ok(Self { start, stop })
    }

    /// Span starting at zero.
    pub fn until(stop: f64) -> Result<Self> {
        Self::new(0.0, stop)
    }

    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }
}

/// Parameters for the integration driver.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorConfig {
    /// Absolute tolerance of the local error test.
    pub abs_tol: f64,
    /// Relative tolerance of the local error test.
    pub rel_tol: f64,
    /// Maximum number of attempted steps (accepted and rejected).
    pub max_steps: usize,
    /// First step size (s).
    pub initial_step: f64,
    /// Smallest step size before giving up (s).
    pub min_step: f64,
    /// Largest step size (s); the span length when `None`.
    pub max_step: Option<f64>,
    /// Highest BDF order, 1 or 2.
    pub max_order: usize,
    /// Exclude algebraic components from the error test.
    pub suppress_algebraic: bool,
    /// Resample the trajectory to `n + 1` evenly spaced times.
    pub output_points: Option<usize>,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            abs_tol: 1e-6,
            rel_tol: 1e-3,
            max_steps: 10_000,
            initial_step: 1e-14,
            min_step: 1e-20,
            max_step: None,
            max_order: 2,
            suppress_algebraic: true,
            output_points: None,
        }
    }
}

impl IntegratorConfig {
    /// Check tolerances, step limits and order.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )))
            }
        };

        positive("abs_tol", self.abs_tol)?;
        positive("rel_tol", self.rel_tol)?;
        positive("initial_step", self.initial_step)?;
        positive("min_step", self.min_step)?;
        if let Some(max_step) = self.max_step {
            positive("max_step", max_step)?;
            if max_step < self.min_step {
                return Err(Error::InvalidConfig(format!(
                    "max_step ({max_step}) is below min_step ({})",
                    self.min_step
                )));
            }
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfig("max_steps must be at least 1".into()));
        }
        if !(1..=2).contains(&self.max_order) {
            return Err(Error::InvalidConfig(format!(
                "max_order must be 1 or 2, got {}",
                self.max_order
            )));
        }
        if self.output_points == Some(0) {
            return Err(Error::InvalidConfig(
                "output_points must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
