//! Alpha-maximizing portfolio optimizer.
//!
//! Solves
//!
//! ```text
//! maximize    Σ α(a) w(a)
//! subject to  every constraint in the set
//! ```
//!
//! with the Clarabel interior-point solver. Only selected assets (those with
//! an alpha) are variables; held assets without an alpha are liquidated and
//! their exit is charged against the turnover budget up front.
//!
//! When several portfolios reach the same objective the interior-point
//! iterates converge towards the center of the optimal face, so tied assets
//! share weight equally up to the solver tolerance. Results are
//! deterministic but not bit-for-bit symmetric.

mod program;

use clarabel::solver::{DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus};
use hobart_data::{Asset, CurrentPortfolio};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constraints::ConstraintSet;
use crate::error::{ConstraintError, OptimizeError};
use crate::target::TargetPortfolio;
use program::LinearProgram;

/// Solver budget and numerical policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Iteration budget (default: 200)
    pub max_iterations: u32,
    /// Wall-clock budget in seconds (default: none)
    pub time_limit_secs: Option<f64>,
    /// Base tolerance for certifying a solution, scaled by each bound (default: 1e-6)
    pub tolerance: f64,
    /// Weights smaller in magnitude are reported as 0 (default: 1e-9)
    pub zero_threshold: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            time_limit_secs: None,
            tolerance: 1e-6,
            zero_threshold: 1e-9,
        }
    }
}

impl SolverConfig {
    /// Check that the budget and tolerances are usable.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if self.max_iterations == 0 {
            return Err(ConstraintError::InvalidSolverSetting {
                name: "max_iterations",
                value: 0.0,
            });
        }
        if let Some(secs) = self.time_limit_secs
            && !(secs.is_finite() && secs > 0.0)
        {
            return Err(ConstraintError::InvalidSolverSetting {
                name: "time_limit_secs",
                value: secs,
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConstraintError::InvalidSolverSetting {
                name: "tolerance",
                value: self.tolerance,
            });
        }
        if !(self.zero_threshold.is_finite() && self.zero_threshold >= 0.0) {
            return Err(ConstraintError::InvalidSolverSetting {
                name: "zero_threshold",
                value: self.zero_threshold,
            });
        }
        Ok(())
    }
}

/// A certified optimal target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    /// Target weights; liquidated holdings appear with weight 0
    pub target: TargetPortfolio,
    /// `Σ α(a) w(a)` at the target
    pub expected_alpha: f64,
    /// Solver iterations (0 when there was nothing to solve)
    pub iterations: u32,
}

/// Linear portfolio optimizer.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: SolverConfig,
}

impl Optimizer {
    /// Create an optimizer, validating the solver settings.
    pub fn new(config: SolverConfig) -> Result<Self, ConstraintError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find the target maximizing `Σ α w` under `constraints`.
    ///
    /// An empty `alpha` yields the liquidation of `current`. Non-finite
    /// alphas or current weights are rejected before solving.
    pub fn optimize(
        &self,
        alpha: &BTreeMap<Asset, f64>,
        current: &CurrentPortfolio,
        constraints: &ConstraintSet,
    ) -> Result<Optimization, OptimizeError> {
        if let Some((asset, value)) = alpha.iter().find(|(_, v)| !v.is_finite()) {
            return Err(OptimizeError::InvalidAlpha {
                asset: asset.clone(),
                value: *value,
            });
        }
        if let Some((asset, value)) = current.iter().find(|(_, w)| !w.is_finite()) {
            return Err(OptimizeError::InvalidHolding {
                asset: asset.clone(),
                value,
            });
        }

        let forced_turnover: f64 = current
            .iter()
            .filter(|(a, _)| !alpha.contains_key(*a))
            .map(|(_, w)| w.abs())
            .sum();
        let mut turnover_budget = 0.0;
        if let Some(max_turnover) = constraints.max_turnover() {
            let slack = self.config.tolerance * max_turnover.max(1.0);
            if forced_turnover > max_turnover + slack {
                return Err(OptimizeError::Infeasible(format!(
                    "liquidating unselected holdings needs turnover {forced_turnover:.6}, above {max_turnover}"
                )));
            }
            turnover_budget = (max_turnover - forced_turnover).max(0.0);
        }

        if alpha.is_empty() {
            tracing::debug!(held = current.len(), "no alpha, liquidating");
            let target = TargetPortfolio::liquidation(current);
            self.certify(&target, current, constraints)?;
            return Ok(Optimization {
                target,
                expected_alpha: 0.0,
                iterations: 0,
            });
        }

        if let Some(max_leverage) = constraints.max_leverage() {
            let reachable = constraints.reachable_gross(alpha.len());
            if reachable < max_leverage {
                tracing::warn!(
                    assets = alpha.len(),
                    max_leverage,
                    reachable,
                    "position bound keeps gross exposure below the leverage cap"
                );
            }
        }

        let alpha: Vec<(Asset, f64)> = alpha.iter().map(|(a, v)| (a.clone(), *v)).collect();
        let program = LinearProgram::build(&alpha, current, constraints, turnover_budget);
        let (x, iterations) = self.solve(&program)?;

        let mut target = TargetPortfolio::new();
        let mut expected_alpha = 0.0;
        for ((asset, score), raw) in alpha.iter().zip(&x) {
            let w = if raw.abs() < self.config.zero_threshold {
                0.0
            } else {
                *raw
            };
            if w != 0.0 || current.holds(asset) {
                target.set(asset.clone(), w);
            }
            expected_alpha += score * w;
        }
        for (asset, _) in current.iter() {
            if !alpha.iter().any(|(a, _)| a == asset) {
                target.set(asset.clone(), 0.0);
            }
        }

        self.certify(&target, current, constraints)?;
        tracing::debug!(
            positions = target.len(),
            gross = target.gross_exposure(),
            expected_alpha,
            iterations,
            "optimal target"
        );
        Ok(Optimization {
            target,
            expected_alpha,
            iterations,
        })
    }

    fn solve(&self, program: &LinearProgram) -> Result<(Vec<f64>, u32), OptimizeError> {
        let settings = DefaultSettingsBuilder::default()
            .max_iter(self.config.max_iterations)
            .time_limit(self.config.time_limit_secs.unwrap_or(f64::INFINITY))
            .verbose(false)
            .build()
            .map_err(|e| OptimizeError::Setup(e.to_string()))?;

        let mut solver = DefaultSolver::new(
            &program.p,
            &program.q,
            &program.a,
            &program.b,
            &program.cones,
            settings,
        )
        .map_err(|e| OptimizeError::Setup(format!("{e:?}")))?;

        tracing::debug!(
            assets = program.assets.len(),
            variables = program.n_vars(),
            rows = program.n_rows(),
            "solving"
        );
        solver.solve();

        let status = &solver.solution.status;
        let iterations = solver.solution.iterations;
        tracing::debug!(?status, iterations, "solver finished");

        match status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => {
                Ok((solver.solution.x[..program.assets.len()].to_vec(), iterations))
            }
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => Err(
                OptimizeError::Infeasible(format!("solver certificate ({status:?})")),
            ),
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                Err(OptimizeError::Unbounded)
            }
            SolverStatus::MaxIterations
            | SolverStatus::MaxTime
            | SolverStatus::InsufficientProgress => Err(OptimizeError::DidNotConverge {
                status: format!("{status:?}"),
                iterations,
            }),
            _ => Err(OptimizeError::NumericalFailure(format!("{status:?}"))),
        }
    }

    fn certify(
        &self,
        target: &TargetPortfolio,
        current: &CurrentPortfolio,
        constraints: &ConstraintSet,
    ) -> Result<(), OptimizeError> {
        let violations = constraints.violations(target, current, self.config.tolerance);
        let Some(worst) = violations.first() else {
            return Ok(());
        };
        tracing::warn!(
            constraint = %worst.constraint,
            excess = worst.excess,
            count = violations.len(),
            "target fails certification"
        );
        Err(OptimizeError::Uncertified {
            constraint: worst.constraint.name(),
            excess: worst.excess,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintSetBuilder;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    fn alpha(values: &[(&str, f64)]) -> BTreeMap<Asset, f64> {
        values.iter().map(|(s, v)| (Asset::from(*s), *v)).collect()
    }

    fn holdings(values: &[(&str, f64)]) -> CurrentPortfolio {
        values.iter().map(|(s, v)| (Asset::from(*s), *v)).collect()
    }

    fn neutral_set(max_position: f64) -> ConstraintSet {
        ConstraintSetBuilder::new()
            .position_bound(max_position)
            .gross_exposure(1.0)
            .dollar_neutral()
            .build()
            .unwrap()
    }

    fn random_alpha(seed: u64, n: usize) -> BTreeMap<Asset, f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| (Asset::new(format!("S{i:03}")), rng.gen_range(-2.0..2.0)))
            .collect()
    }

    #[test]
    fn test_long_short_extremes() {
        let result = Optimizer::default()
            .optimize(
                &alpha(&[("A", 1.3), ("B", -1.3)]),
                &CurrentPortfolio::default(),
                &neutral_set(0.5),
            )
            .unwrap();

        let target = &result.target;
        assert_relative_eq!(target.weight(&Asset::from("A")), 0.5, epsilon = 1e-6);
        assert_relative_eq!(target.weight(&Asset::from("B")), -0.5, epsilon = 1e-6);
        assert_eq!(target.weight(&Asset::from("C")), 0.0);
        assert_relative_eq!(result.expected_alpha, 1.3, epsilon = 1e-5);
        assert!(result.iterations > 0);
    }

    #[test]
    fn test_turnover_bound_limits_trade() {
        let set = ConstraintSetBuilder::new()
            .position_bound(0.5)
            .gross_exposure(1.0)
            .dollar_neutral()
            .turnover(0.2)
            .build()
            .unwrap();
        let current = holdings(&[("A", 0.25), ("B", -0.25)]);
        let result = Optimizer::default()
            .optimize(
                &alpha(&[("A", 1.0), ("B", -1.0), ("C", 0.5), ("D", -0.5)]),
                &current,
                &set,
            )
            .unwrap();

        let target = &result.target;
        assert_relative_eq!(target.weight(&Asset::from("A")), 0.35, epsilon = 1e-5);
        assert_relative_eq!(target.weight(&Asset::from("B")), -0.35, epsilon = 1e-5);
        assert!(target.weight(&Asset::from("C")).abs() < 1e-5);
        assert!(target.turnover_from(&current) <= 0.2 + 1e-6);
    }

    #[test]
    fn test_turnover_infeasible() {
        let set = ConstraintSetBuilder::new()
            .position_bound(0.001)
            .gross_exposure(1.0)
            .dollar_neutral()
            .turnover(0.95)
            .build()
            .unwrap();
        let current = holdings(&[("A", 0.5), ("B", -0.5)]);

        // Shrinking both positions to 0.001 needs turnover 0.998
        let result =
            Optimizer::default().optimize(&alpha(&[("A", 1.0), ("B", -1.0)]), &current, &set);
        assert!(matches!(result, Err(OptimizeError::Infeasible(_))));
    }

    #[test]
    fn test_forced_liquidation_infeasible() {
        let set = ConstraintSetBuilder::new()
            .position_bound(0.1)
            .turnover(0.95)
            .build()
            .unwrap();
        let current = holdings(&[("C", 0.6), ("D", -0.6)]);
        let result =
            Optimizer::default().optimize(&alpha(&[("A", 1.0), ("B", -1.0)]), &current, &set);

        assert!(matches!(result, Err(OptimizeError::Infeasible(_))));
        assert!(!result.unwrap_err().is_retryable());
    }

    #[test]
    fn test_single_iteration_does_not_converge() {
        let optimizer = Optimizer::new(SolverConfig {
            max_iterations: 1,
            ..Default::default()
        })
        .unwrap();
        let result = optimizer.optimize(
            &random_alpha(3, 20),
            &CurrentPortfolio::default(),
            &neutral_set(0.1),
        );

        match result {
            Err(err @ OptimizeError::DidNotConverge { .. }) => assert!(err.is_retryable()),
            other => panic!("expected DidNotConverge, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_alpha_liquidates() {
        let set = ConstraintSetBuilder::new()
            .position_bound(0.1)
            .dollar_neutral()
            .turnover(0.95)
            .build()
            .unwrap();
        let current = holdings(&[("A", 0.2), ("B", -0.2)]);
        let result = Optimizer::default()
            .optimize(&BTreeMap::new(), &current, &set)
            .unwrap();

        assert_eq!(result.iterations, 0);
        assert_eq!(result.target.len(), 2);
        assert_eq!(result.target.gross_exposure(), 0.0);
    }

    #[test]
    fn test_unselected_holdings_are_liquidated() {
        let current = holdings(&[("A", 0.1), ("Z", 0.05)]);
        let result = Optimizer::default()
            .optimize(&alpha(&[("A", 1.0), ("B", -1.0)]), &current, &neutral_set(0.3))
            .unwrap();

        assert_eq!(result.target.as_map().get(&Asset::from("Z")), Some(&0.0));
    }

    #[test]
    fn test_invalid_alpha() {
        let result = Optimizer::default().optimize(
            &alpha(&[("A", f64::NAN)]),
            &CurrentPortfolio::default(),
            &neutral_set(0.1),
        );
        assert!(matches!(result, Err(OptimizeError::InvalidAlpha { .. })));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_holding(#[case] weight: f64) {
        let result = Optimizer::default().optimize(
            &alpha(&[("A", 1.0), ("B", -1.0)]),
            &holdings(&[("Z", weight)]),
            &ConstraintSetBuilder::new()
                .position_bound(0.015)
                .gross_exposure(1.0)
                .dollar_neutral()
                .turnover(0.95)
                .build()
                .unwrap(),
        );

        match result {
            Err(OptimizeError::InvalidHolding { asset, .. }) => {
                assert_eq!(asset.symbol(), "Z");
            }
            other => panic!("expected InvalidHolding, got {other:?}"),
        }
    }

    #[test]
    fn test_tied_alphas_share_weight() {
        let tied = alpha(&[("A", 1.0), ("B", 1.0), ("C", -1.0), ("D", -1.0), ("E", 1.0)]);
        let optimizer = Optimizer::default();
        let result = optimizer
            .optimize(&tied, &CurrentPortfolio::default(), &neutral_set(0.5))
            .unwrap();

        for long in ["A", "B", "E"] {
            let w = result.target.weight(&Asset::from(long));
            assert_relative_eq!(w, 1.0 / 6.0, epsilon = 1e-6);
        }
        for short in ["C", "D"] {
            let w = result.target.weight(&Asset::from(short));
            assert_relative_eq!(w, -0.25, epsilon = 1e-6);
        }
        let again = optimizer
            .optimize(&tied, &CurrentPortfolio::default(), &neutral_set(0.5))
            .unwrap();
        assert_eq!(result, again);
    }

    #[test]
    fn test_deterministic() {
        let alpha = random_alpha(5, 30);
        let current = holdings(&[("S001", 0.02), ("S010", -0.02)]);
        let set = ConstraintSetBuilder::new()
            .position_bound(0.05)
            .gross_exposure(1.0)
            .dollar_neutral()
            .turnover(0.95)
            .build()
            .unwrap();

        let optimizer = Optimizer::default();
        let first = optimizer.optimize(&alpha, &current, &set).unwrap();
        let second = optimizer.optimize(&alpha, &current, &set).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(1, 10, 0.15)]
    #[case(2, 40, 0.05)]
    #[case(3, 80, 0.015)]
    fn test_optimal_targets_satisfy_constraints(
        #[case] seed: u64,
        #[case] n: usize,
        #[case] max_position: f64,
    ) {
        let alpha = random_alpha(seed, n);
        let set = ConstraintSetBuilder::new()
            .position_bound(max_position)
            .gross_exposure(1.0)
            .dollar_neutral()
            .turnover(1.5)
            .build()
            .unwrap();
        let current = CurrentPortfolio::default();
        let result = Optimizer::default().optimize(&alpha, &current, &set).unwrap();
        let target = &result.target;

        assert!(target.net_exposure().abs() < 1e-6);
        assert!(target.max_abs_weight() <= max_position + 1e-6);
        assert!(target.gross_exposure() <= 1.0 + 1e-6);
        assert!(target.turnover_from(&current) <= 1.5 + 1e-6);
        assert!(result.expected_alpha > 0.0);
    }

    #[rstest]
    #[case(SolverConfig { max_iterations: 0, ..Default::default() })]
    #[case(SolverConfig { tolerance: 0.0, ..Default::default() })]
    #[case(SolverConfig { time_limit_secs: Some(-1.0), ..Default::default() })]
    fn test_invalid_solver_config(#[case] config: SolverConfig) {
        assert!(Optimizer::new(config).is_err());
    }
}
