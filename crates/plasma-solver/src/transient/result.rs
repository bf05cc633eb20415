//! Result types for transient analysis.

use nalgebra::DVector;
use serde::Serialize;

/// A single timepoint in the transient solution.
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    /// Simulation time.
    pub time: f64,
    /// Unknown vector at this time.
    pub state: DVector<f64>,
}

/// Step statistics of an integration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IntegrationStats {
    /// Number of accepted steps.
    pub accepted_steps: usize,
    /// Number of rejected steps.
    pub rejected_steps: usize,
    /// Smallest accepted step.
    pub min_step_used: f64,
    /// Largest accepted step.
    pub max_step_used: f64,
}

impl IntegrationStats {
    /// Total attempted steps.
    pub fn total_steps(&self) -> usize {
        self.accepted_steps + self.rejected_steps
    }
}

/// States returned by an integrator, in increasing time order.
#[derive(Debug, Clone, Default)]
pub struct RawTrajectory {
    pub points: Vec<TimePoint>,
    pub stats: IntegrationStats,
}

impl RawTrajectory {
    /// Get all time values.
    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|tp| tp.time).collect()
    }

    /// Get one component of the state across all timepoints.
    pub fn waveform(&self, index: usize) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|tp| (tp.time, tp.state[index]))
            .collect()
    }

    /// Last point of the trajectory.
    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    /// Interpolate the state at a specific time.
    ///
    /// Uses linear interpolation between the two nearest timepoints and
    /// clamps to the first or last point outside the simulated range.
    pub fn interpolate_at(&self, time: f64) -> Option<DVector<f64>> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if time <= first.time {
            return Some(first.state.clone());
        }
        if time >= last.time {
            return Some(last.state.clone());
        }

        // First point strictly after `time`; it has a predecessor here.
        let i = self.points.partition_point(|p| p.time <= time);
        let (p0, p1) = (&self.points[i - 1], &self.points[i]);
        let alpha = (time - p0.time) / (p1.time - p0.time);
        Some(&p0.state * (1.0 - alpha) + &p1.state * alpha)
    }

    /// Resample onto `intervals + 1` evenly spaced times from the first to
    /// the last point.
    pub fn resample(&self, intervals: usize) -> RawTrajectory {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return self.clone();
        };
        let intervals = intervals.max(1);
        let (start, stop) = (first.time, last.time);
        let dt = (stop - start) / intervals as f64;

        let points = (0..=intervals)
            .filter_map(|k| {
                // Land exactly on `stop` instead of accumulating rounding.
                let time = if k == intervals {
                    stop
                } else {
                    start + k as f64 * dt
                };
                self.interpolate_at(time)
                    .map(|state| TimePoint { time, state })
            })
            .collect();

        RawTrajectory {
            points,
            stats: self.stats,
        }
    }
}
