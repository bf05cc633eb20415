//! Labeled analysis results.

use indexmap::IndexMap;
use nalgebra::DVector;
use plasma_core::{NodeLabel, Unknown, UnknownLayout};
use plasma_solver::{IntegrationStats, RawTrajectory};
use serde::Serialize;

/// Node voltages and branch currents at one instant.
///
/// Entries are kept in unknown-vector order: node voltages by node index,
/// then voltage-source currents, then inductor currents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperatingPoint {
    voltages: IndexMap<NodeLabel, f64>,
    currents: IndexMap<String, f64>,
}

impl OperatingPoint {
    /// Label an unknown vector through its layout.
    pub fn from_state(layout: &UnknownLayout, state: &DVector<f64>) -> Self {
        let mut point = Self::default();
        for (unknown, &value) in layout.iter().zip(state.iter()) {
            match unknown {
                Unknown::NodeVoltage(label) => {
                    point.voltages.insert(label.clone(), value);
                }
                Unknown::BranchCurrent { name, .. } => {
                    point.currents.insert(name.to_string(), value);
                }
            }
        }
        point
    }

    /// Voltage of a node; ground reads 0 V.
    pub fn voltage(&self, label: impl Into<NodeLabel>) -> Option<f64> {
        let label = label.into();
        if label.is_ground() {
            return Some(0.0);
        }
        self.voltages.get(&label.normalized()).copied()
    }

    /// Current through a voltage source or inductor, from its first terminal
    /// to its second.
    pub fn current(&self, name: &str) -> Option<f64> {
        self.currents.get(name).copied()
    }

    pub fn voltages(&self) -> &IndexMap<NodeLabel, f64> {
        &self.voltages
    }

    pub fn currents(&self) -> &IndexMap<String, f64> {
        &self.currents
    }

    /// `(column name, value)` pairs, `V(label)` then `I(name)`.
    pub fn columns(&self) -> Vec<(String, f64)> {
        self.voltages
            .iter()
            .map(|(label, &v)| (format!("V({label})"), v))
            .chain(
                self.currents
                    .iter()
                    .map(|(name, &i)| (format!("I({name})"), i)),
            )
            .collect()
    }

    /// The raw unknown vector `[v; i_V; i_L]`.
    pub fn to_vector(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.len(),
            self.voltages.values().chain(self.currents.values()).copied(),
        )
    }

    /// Number of unknowns.
    pub fn len(&self) -> usize {
        self.voltages.len() + self.currents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One row of a transient result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransientSample {
    pub time: f64,
    #[serde(flatten)]
    pub point: OperatingPoint,
}

/// Result of a transient analysis: one labeled sample per output time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransientSolution {
    pub samples: Vec<TransientSample>,
    pub stats: IntegrationStats,
}

impl TransientSolution {
    /// Label a raw trajectory through its layout.
    pub fn from_trajectory(layout: &UnknownLayout, trajectory: RawTrajectory) -> Self {
        let samples = trajectory
            .points
            .into_iter()
            .map(|p| TransientSample {
                time: p.time,
                point: OperatingPoint::from_state(layout, &p.state),
            })
            .collect();
        Self {
            samples,
            stats: trajectory.stats,
        }
    }

    /// Column names: `time`, then one per labeled unknown.
    pub fn header(&self) -> Vec<String> {
        let columns = self
            .samples
            .first()
            .map(|s| s.point.columns())
            .unwrap_or_default();
        std::iter::once("time".to_string())
            .chain(columns.into_iter().map(|(name, _)| name))
            .collect()
    }

    /// One row per sample, aligned with [`header`](Self::header).
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.samples
            .iter()
            .map(|s| {
                std::iter::once(s.time)
                    .chain(s.point.to_vector().iter().copied())
                    .collect()
            })
            .collect()
    }

    /// Get all time values.
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    /// Voltage of a node across all samples.
    pub fn voltage_waveform(&self, label: impl Into<NodeLabel>) -> Option<Vec<(f64, f64)>> {
        let label = label.into();
        self.samples
            .iter()
            .map(|s| s.point.voltage(label.clone()).map(|v| (s.time, v)))
            .collect()
    }

    /// Current of a branch across all samples.
    pub fn current_waveform(&self, name: &str) -> Option<Vec<(f64, f64)>> {
        self.samples
            .iter()
            .map(|s| s.point.current(name).map(|i| (s.time, i)))
            .collect()
    }

    pub fn last(&self) -> Option<&TransientSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plasma_solver::TimePoint;

    fn layout() -> UnknownLayout {
        UnknownLayout::new(
            vec![NodeLabel::from("in"), NodeLabel::from(2)],
            vec!["V1".into()],
            vec!["L1".into()],
        )
    }

    #[test]
    fn test_from_state_labels_in_order() {
        let x = DVector::from_vec(vec![5.0, 2.5, -1e-3, 2e-3]);
        let op = OperatingPoint::from_state(&layout(), &x);

        assert_eq!(op.voltage("in"), Some(5.0));
        assert_eq!(op.voltage(2), Some(2.5));
        assert_eq!(op.voltage(0), Some(0.0));
        assert_eq!(op.voltage("GND"), Some(0.0));
        assert_eq!(op.voltage("missing"), None);
        assert_eq!(op.current("V1"), Some(-1e-3));
        assert_eq!(op.current("L1"), Some(2e-3));
        assert_eq!(op.to_vector(), x);

        let names: Vec<_> = op.columns().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["V(in)", "V(2)", "I(V1)", "I(L1)"]);
    }

    #[test]
    fn test_transient_table() {
        let trajectory = RawTrajectory {
            points: vec![
                TimePoint {
                    time: 0.0,
                    state: DVector::from_vec(vec![1.0, 0.5, 0.0, 0.0]),
                },
                TimePoint {
                    time: 1e-3,
                    state: DVector::from_vec(vec![1.0, 0.25, 0.1, 0.2]),
                },
            ],
            stats: IntegrationStats::default(),
        };
        let solution = TransientSolution::from_trajectory(&layout(), trajectory);

        assert_eq!(
            solution.header(),
            vec!["time", "V(in)", "V(2)", "I(V1)", "I(L1)"]
        );
        let rows = solution.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec![1e-3, 1.0, 0.25, 0.1, 0.2]);
        assert_eq!(
            solution.voltage_waveform(2).unwrap(),
            vec![(0.0, 0.5), (1e-3, 0.25)]
        );
        assert!(solution.current_waveform("R1").is_none());
    }

    #[test]
    fn test_serialize_uses_labels() {
        let x = DVector::from_vec(vec![5.0, 2.5, -1e-3, 2e-3]);
        let op = OperatingPoint::from_state(&layout(), &x);
        let json = serde_json::to_value(&op).unwrap();

        assert_eq!(json["voltages"]["in"], 5.0);
        assert_eq!(json["voltages"]["2"], 2.5);
        assert_eq!(json["currents"]["L1"], 2e-3);
    }
}
