//! Portfolio constraints and their validated, order-independent set.

use hobart_data::CurrentPortfolio;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConstraintError;
use crate::target::TargetPortfolio;

/// A single restriction on a target portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// `-max_position <= w(a) <= max_position` for every asset
    PositionBound {
        /// Largest absolute weight per asset
        max_position: f64,
    },
    /// `Σ|w(a)| <= max_leverage`
    GrossExposureBound {
        /// Largest gross exposure
        max_leverage: f64,
    },
    /// `Σ w(a) = 0`
    DollarNeutral,
    /// `Σ|w(a) - current(a)| <= max_turnover`
    TurnoverBound {
        /// Largest one-way turnover
        max_turnover: f64,
    },
}

impl Constraint {
    /// Stable name of the constraint kind.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PositionBound { .. } => "position_bound",
            Self::GrossExposureBound { .. } => "gross_exposure_bound",
            Self::DollarNeutral => "dollar_neutral",
            Self::TurnoverBound { .. } => "turnover_bound",
        }
    }

    /// Right-hand side of the constraint, if it has one.
    pub const fn bound(&self) -> Option<f64> {
        match self {
            Self::PositionBound { max_position } => Some(*max_position),
            Self::GrossExposureBound { max_leverage } => Some(*max_leverage),
            Self::DollarNeutral => None,
            Self::TurnoverBound { max_turnover } => Some(*max_turnover),
        }
    }

    /// How far `target` is beyond this constraint. 0 when satisfied,
    /// infinite when a weight is not a number.
    pub fn excess(&self, target: &TargetPortfolio, current: &CurrentPortfolio) -> f64 {
        let over = match self {
            Self::PositionBound { max_position } => target.max_abs_weight() - max_position,
            Self::GrossExposureBound { max_leverage } => target.gross_exposure() - max_leverage,
            Self::DollarNeutral => target.net_exposure().abs(),
            Self::TurnoverBound { max_turnover } => target.turnover_from(current) - max_turnover,
        };
        if over.is_nan() {
            return f64::INFINITY;
        }
        over.max(0.0)
    }

    /// Allowed excess for a base tolerance, scaled by the bound.
    pub fn tolerance(&self, tolerance: f64) -> f64 {
        tolerance * self.bound().unwrap_or(1.0).max(1.0)
    }

    fn validate(&self) -> Result<(), ConstraintError> {
        match self.bound() {
            Some(value) if !value.is_finite() || value < 0.0 => {
                Err(ConstraintError::InvalidBound {
                    constraint: self.name(),
                    value,
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bound() {
            Some(bound) => write!(f, "{}({bound})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// A constraint broken by a candidate portfolio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Violation {
    /// The violated constraint
    pub constraint: Constraint,
    /// Amount beyond the bound
    pub excess: f64,
}

/// Validated collection of at most one constraint of each kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Iterate the constraints in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Always false for a built set.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Per-asset bound, if present.
    pub fn max_position(&self) -> Option<f64> {
        self.iter().find_map(|c| match c {
            Constraint::PositionBound { max_position } => Some(*max_position),
            _ => None,
        })
    }

    /// Gross exposure bound, if present.
    pub fn max_leverage(&self) -> Option<f64> {
        self.iter().find_map(|c| match c {
            Constraint::GrossExposureBound { max_leverage } => Some(*max_leverage),
            _ => None,
        })
    }

    /// Turnover bound, if present.
    pub fn max_turnover(&self) -> Option<f64> {
        self.iter().find_map(|c| match c {
            Constraint::TurnoverBound { max_turnover } => Some(*max_turnover),
            _ => None,
        })
    }

    /// Whether net exposure is pinned to 0.
    pub fn is_dollar_neutral(&self) -> bool {
        self.iter().any(|c| matches!(c, Constraint::DollarNeutral))
    }

    /// Gross exposure reachable with `n_assets` positions.
    pub fn reachable_gross(&self, n_assets: usize) -> f64 {
        let by_position = self
            .max_position()
            .map_or(f64::INFINITY, |p| p * n_assets as f64);
        self.max_leverage().map_or(by_position, |l| l.min(by_position))
    }

    /// Every constraint broken by `target` beyond its scaled tolerance.
    pub fn violations(
        &self,
        target: &TargetPortfolio,
        current: &CurrentPortfolio,
        tolerance: f64,
    ) -> Vec<Violation> {
        self.iter()
            .filter_map(|constraint| {
                let excess = constraint.excess(target, current);
                (excess > constraint.tolerance(tolerance)).then_some(Violation {
                    constraint: *constraint,
                    excess,
                })
            })
            .collect()
    }

    /// Whether `target` satisfies every constraint.
    pub fn is_satisfied(
        &self,
        target: &TargetPortfolio,
        current: &CurrentPortfolio,
        tolerance: f64,
    ) -> bool {
        self.violations(target, current, tolerance).is_empty()
    }
}

/// Builder for [`ConstraintSet`].
#[derive(Debug, Clone, Default)]
pub struct ConstraintSetBuilder {
    constraints: Vec<Constraint>,
}

impl ConstraintSetBuilder {
    /// Start an empty builder.
    pub const fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    /// Add an arbitrary constraint.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Add `|w(a)| <= max_position`.
    pub fn position_bound(self, max_position: f64) -> Self {
        self.with(Constraint::PositionBound { max_position })
    }

    /// Add `Σ|w(a)| <= max_leverage`.
    pub fn gross_exposure(self, max_leverage: f64) -> Self {
        self.with(Constraint::GrossExposureBound { max_leverage })
    }

    /// Add `Σ w(a) = 0`.
    pub fn dollar_neutral(self) -> Self {
        self.with(Constraint::DollarNeutral)
    }

    /// Add `Σ|w(a) - current(a)| <= max_turnover`.
    pub fn turnover(self, max_turnover: f64) -> Self {
        self.with(Constraint::TurnoverBound { max_turnover })
    }

    /// Validate and freeze the set.
    pub fn build(self) -> Result<ConstraintSet, ConstraintError> {
        for (i, constraint) in self.constraints.iter().enumerate() {
            constraint.validate()?;
            if self.constraints[..i]
                .iter()
                .any(|c| c.name() == constraint.name())
            {
                return Err(ConstraintError::Duplicate(constraint.name()));
            }
        }

        let set = ConstraintSet {
            constraints: self.constraints,
        };
        if set.max_position().is_none() && set.max_leverage().is_none() {
            return Err(ConstraintError::Unbounded);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hobart_data::Asset;
    use rstest::rstest;

    fn target(weights: &[(&str, f64)]) -> TargetPortfolio {
        weights.iter().map(|(s, w)| (Asset::from(*s), *w)).collect()
    }

    fn full_set() -> ConstraintSet {
        ConstraintSetBuilder::new()
            .position_bound(0.5)
            .gross_exposure(1.0)
            .dollar_neutral()
            .turnover(0.95)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_full_set() {
        let set = full_set();
        assert_eq!(set.len(), 4);
        assert_eq!(set.max_position(), Some(0.5));
        assert_eq!(set.max_leverage(), Some(1.0));
        assert_eq!(set.max_turnover(), Some(0.95));
        assert!(set.is_dollar_neutral());
    }

    #[test]
    fn test_order_independent() {
        let a = ConstraintSetBuilder::new()
            .dollar_neutral()
            .gross_exposure(1.0)
            .position_bound(0.1)
            .build()
            .unwrap();
        let b = ConstraintSetBuilder::new()
            .position_bound(0.1)
            .dollar_neutral()
            .gross_exposure(1.0)
            .build()
            .unwrap();
        let w = target(&[("A", 0.2), ("B", -0.1)]);
        let current = CurrentPortfolio::default();
        assert_eq!(
            a.violations(&w, &current, 1e-6).len(),
            b.violations(&w, &current, 1e-6).len()
        );
    }

    #[rstest]
    #[case(ConstraintSetBuilder::new().position_bound(-0.1))]
    #[case(ConstraintSetBuilder::new().gross_exposure(f64::NAN))]
    #[case(ConstraintSetBuilder::new().position_bound(0.1).turnover(f64::INFINITY))]
    fn test_invalid_bounds(#[case] builder: ConstraintSetBuilder) {
        assert!(matches!(
            builder.build(),
            Err(ConstraintError::InvalidBound { .. })
        ));
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let result = ConstraintSetBuilder::new()
            .position_bound(0.1)
            .position_bound(0.2)
            .build();
        assert_eq!(result, Err(ConstraintError::Duplicate("position_bound")));
    }

    #[test]
    fn test_unbounded_set_rejected() {
        let result = ConstraintSetBuilder::new()
            .dollar_neutral()
            .turnover(0.5)
            .build();
        assert_eq!(result, Err(ConstraintError::Unbounded));
    }

    #[test]
    fn test_violations_by_name() {
        let set = full_set();
        let current: CurrentPortfolio = [(Asset::from("A"), -0.5)].into_iter().collect();
        // Position 0.7 > 0.5, gross 1.0 ok, net 0.4, turnover 1.2 + 0.3 = 1.5
        let w = target(&[("A", 0.7), ("B", -0.3)]);

        let violations = set.violations(&w, &current, 1e-6);
        let names: Vec<&str> = violations.iter().map(|v| v.constraint.name()).collect();
        assert_eq!(names, vec!["position_bound", "dollar_neutral", "turnover_bound"]);
        assert_relative_eq!(violations[0].excess, 0.2, epsilon = 1e-12);
        assert_relative_eq!(violations[1].excess, 0.4, epsilon = 1e-12);
        assert_relative_eq!(violations[2].excess, 0.55, epsilon = 1e-12);
    }

    #[test]
    fn test_tolerance_absorbs_rounding() {
        let set = full_set();
        let current: CurrentPortfolio = [(Asset::from("A"), 0.5), (Asset::from("B"), -0.5)]
            .into_iter()
            .collect();
        let w = target(&[("A", 0.5 + 1e-9), ("B", -0.5)]);
        assert!(set.is_satisfied(&w, &current, 1e-6));

        let w = target(&[("A", 0.5 + 2e-6), ("B", -0.5)]);
        let names: Vec<&str> = set
            .violations(&w, &current, 1e-6)
            .iter()
            .map(|v| v.constraint.name())
            .collect();
        assert_eq!(
            names,
            vec!["position_bound", "gross_exposure_bound", "dollar_neutral"]
        );
    }

    #[rstest]
    #[case(Constraint::PositionBound { max_position: 0.5 })]
    #[case(Constraint::GrossExposureBound { max_leverage: 1.0 })]
    #[case(Constraint::DollarNeutral)]
    #[case(Constraint::TurnoverBound { max_turnover: 0.95 })]
    fn test_nan_weight_is_never_satisfied(#[case] constraint: Constraint) {
        let w = target(&[("A", f64::NAN), ("B", -0.1)]);
        assert_eq!(
            constraint.excess(&w, &CurrentPortfolio::default()),
            f64::INFINITY
        );
    }

    #[test]
    fn test_reachable_gross() {
        let set = full_set();
        assert_relative_eq!(set.reachable_gross(1), 0.5);
        assert_relative_eq!(set.reachable_gross(10), 1.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Constraint::PositionBound { max_position: 0.015 }.to_string(),
            "position_bound(0.015)"
        );
        assert_eq!(Constraint::DollarNeutral.to_string(), "dollar_neutral");
    }
}
