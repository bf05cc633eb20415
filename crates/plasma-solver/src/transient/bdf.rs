//! Variable-step, variable-order BDF for linear DAEs.
//!
//! Each step solves the linear system
//!
//! ```text
//! (α/h·A - B)·x_{n+1} = A·(β·x_n - γ·x_{n-1})/h + c
//! ```
//!
//! with the backward-difference coefficients of order 1 (`α = β = 1`,
//! `γ = 0`) or of order 2 on a variable grid. The local error is estimated
//! from the distance between the corrector and a polynomial predictor
//! through the last `k + 1` accepted points, measured in a weighted RMS norm.

use nalgebra::{DVector, Dyn, LU};

use crate::error::{Error, Result};
use crate::transient::integrator::{DaeIntegrator, DaeProblem};
use crate::transient::result::{IntegrationStats, RawTrajectory, TimePoint};
use crate::transient::types::{IntegratorConfig, TimeSpan};

/// Safety factor applied to the optimal step size.
const SAFETY: f64 = 0.9;
/// Largest step growth per accepted step.
const MAX_GROWTH: f64 = 2.0;
/// Largest step reduction per step.
const MAX_SHRINK: f64 = 0.1;

/// Built-in BDF integrator of order 1 or 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct BdfIntegrator;

impl BdfIntegrator {
    pub fn new() -> Self {
        Self
    }
}

impl DaeIntegrator for BdfIntegrator {
    fn integrate(
        &self,
        problem: &DaeProblem<'_>,
        span: TimeSpan,
        config: &IntegratorConfig,
    ) -> Result<RawTrajectory> {
        config.validate()?;
        for len in [problem.x0.len(), problem.xdot0.len()] {
            if len != problem.size() {
                return Err(Error::DimensionMismatch {
                    expected: problem.size(),
                    actual: len,
                });
            }
        }

        let trajectory = Stepper::new(problem, span, config).run()?;
        log::debug!(
            "BDF: {} accepted, {} rejected, h in [{:e}, {:e}]",
            trajectory.stats.accepted_steps,
            trajectory.stats.rejected_steps,
            trajectory.stats.min_step_used,
            trajectory.stats.max_step_used
        );

        Ok(match config.output_points {
            Some(intervals) => trajectory.resample(intervals),
            None => trajectory,
        })
    }
}

/// State of one integration run.
struct Stepper<'p, 'a> {
    problem: &'p DaeProblem<'a>,
    span: TimeSpan,
    config: &'p IntegratorConfig,
    max_step: f64,
    /// Components that take part in the error test.
    error_rows: Vec<usize>,
    points: Vec<TimePoint>,
    stats: IntegrationStats,
    /// Factorization of `coeff·A - B`, keyed by `coeff`.
    cache: Option<(f64, LU<f64, Dyn, Dyn>)>,
}

impl<'p, 'a> Stepper<'p, 'a> {
    fn new(problem: &'p DaeProblem<'a>, span: TimeSpan, config: &'p IntegratorConfig) -> Self {
        let error_rows = if config.suppress_algebraic {
            problem.system.differential_rows()
        } else {
            (0..problem.size()).collect()
        };
        let max_step = config
            .max_step
            .unwrap_or(span.duration())
            .min(span.duration());

        Self {
            problem,
            span,
            config,
            max_step,
            error_rows,
            points: vec![TimePoint {
                time: span.start,
                state: problem.x0.clone(),
            }],
            stats: IntegrationStats {
                min_step_used: f64::INFINITY,
                ..Default::default()
            },
            cache: None,
        }
    }

    fn run(mut self) -> Result<RawTrajectory> {
        if self.problem.size() == 0 {
            self.points.push(TimePoint {
                time: self.span.stop,
                state: DVector::zeros(0),
            });
            self.record_step(self.span.duration());
            return Ok(self.finish());
        }

        let mut h = self.config.initial_step.min(self.max_step);
        let mut rejected_last = false;

        loop {
            let t = self.last().time;
            if t >= self.span.stop {
                break;
            }
            if self.stats.total_steps() >= self.config.max_steps {
                return Err(self.failure(format!(
                    "maximum number of steps ({}) reached",
                    self.config.max_steps
                )));
            }

            let remaining = self.span.stop - t;
            let final_step = h >= remaining;
            if final_step {
                h = remaining;
            } else if h < self.config.min_step {
                log::warn!("BDF: step size collapsed to {h:e} at t = {t:e}");
                return Err(self.failure(format!(
                    "step size {h:e} below minimum {:e}",
                    self.config.min_step
                )));
            }

            let order = if self.config.max_order >= 2 && self.points.len() >= 3 && !rejected_last {
                2
            } else {
                1
            };

            let (state, norm) = self.attempt(h, order)?;
            if !norm.is_finite() {
                self.stats.rejected_steps += 1;
                return Err(self.failure("error estimate is not finite".into()));
            }

            if norm <= 1.0 {
                let time = if final_step { self.span.stop } else { t + h };
                log::trace!("BDF{order}: accept t = {time:e}, h = {h:e}, err = {norm:.3}");
                self.points.push(TimePoint { time, state });
                self.record_step(h);
                rejected_last = false;
                h *= step_factor(norm, order).clamp(MAX_SHRINK, MAX_GROWTH);
                h = h.min(self.max_step);
            } else {
                log::trace!("BDF{order}: reject t = {:e}, h = {h:e}, err = {norm:.3}", t + h);
                self.stats.rejected_steps += 1;
                rejected_last = true;
                h *= step_factor(norm, order).clamp(MAX_SHRINK, SAFETY);
            }
        }

        Ok(self.finish())
    }

    /// Solve one step of size `h` and estimate its local error.
    fn attempt(&mut self, h: f64, order: usize) -> Result<(DVector<f64>, f64)> {
        let system = self.problem.system;
        let n = self.points.len();
        let last = &self.points[n - 1];
        let t_new = last.time + h;

        let (coeff, history) = if order == 2 {
            let prev = &self.points[n - 2];
            let w = h / (last.time - prev.time);
            let alpha = (1.0 + 2.0 * w) / (1.0 + w);
            let beta = 1.0 + w;
            let gamma = w * w / (1.0 + w);
            (
                alpha / h,
                (&last.state * beta - &prev.state * gamma) / h,
            )
        } else {
            (1.0 / h, &last.state / h)
        };

        let (predicted, t_back) = if n > order {
            let window = &self.points[n - order - 1..];
            (extrapolate(window, t_new), window[0].time)
        } else {
            (&last.state + &self.problem.xdot0 * h, last.time - h)
        };
        let x_old = last.state.clone();

        let rhs = &system.a * history + &system.c;
        let Some(state) = self.solve(coeff, &rhs) else {
            self.stats.rejected_steps += 1;
            return Err(self.failure("singular iteration matrix".into()));
        };
        if state.iter().any(|v| !v.is_finite()) {
            self.stats.rejected_steps += 1;
            return Err(self.failure("state is not finite".into()));
        }

        let error = (&state - predicted) * (h / (t_new - t_back));
        let norm = self.error_norm(&error, &x_old, &state);
        Ok((state, norm))
    }

    fn solve(&mut self, coeff: f64, rhs: &DVector<f64>) -> Option<DVector<f64>> {
        let system = self.problem.system;
        let lu = match self.cache.take() {
            Some((key, lu)) if key == coeff => lu,
            _ => (&system.a * coeff - &system.b).lu(),
        };
        let x = lu.solve(rhs);
        self.cache = Some((coeff, lu));
        x
    }

    /// Weighted RMS norm with weights `abs_tol + rel_tol·|x|`.
    fn error_norm(&self, error: &DVector<f64>, x_old: &DVector<f64>, x_new: &DVector<f64>) -> f64 {
        if self.error_rows.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .error_rows
            .iter()
            .map(|&i| {
                let scale = x_old[i].abs().max(x_new[i].abs());
                let weight = self.config.abs_tol + self.config.rel_tol * scale;
                (error[i] / weight).powi(2)
            })
            .sum();
        (sum / self.error_rows.len() as f64).sqrt()
    }

    fn record_step(&mut self, h: f64) {
        self.stats.accepted_steps += 1;
        self.stats.min_step_used = self.stats.min_step_used.min(h);
        self.stats.max_step_used = self.stats.max_step_used.max(h);
    }

    fn last(&self) -> &TimePoint {
        // Seeded with the initial point and never shrinks.
        &self.points[self.points.len() - 1]
    }

    fn failure(&self, reason: String) -> Error {
        let last = self.last();
        Error::IntegrationFailed {
            time: last.time,
            steps: self.stats.total_steps(),
            reason,
            last_state: Some(last.clone()),
        }
    }

    fn finish(mut self) -> RawTrajectory {
        if self.stats.accepted_steps == 0 {
            self.stats.min_step_used = 0.0;
        }
        RawTrajectory {
            points: self.points,
            stats: self.stats,
        }
    }
}

/// Optimal step ratio for an error norm at the given order.
fn step_factor(norm: f64, order: usize) -> f64 {
    if norm == 0.0 {
        return MAX_GROWTH;
    }
    SAFETY * norm.powf(-1.0 / (order + 1) as f64)
}

/// Evaluate the interpolating polynomial through `points` at `time`.
fn extrapolate(points: &[TimePoint], time: f64) -> DVector<f64> {
    let mut result = DVector::zeros(points[0].state.len());
    for (i, pi) in points.iter().enumerate() {
        let weight: f64 = points
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, pj)| (time - pj.time) / (pi.time - pj.time))
            .product();
        result.axpy(weight, &pi.state, 1.0);
    }
    result
}
