//! Linear program assembly in Clarabel's standard form.
//!
//! ```text
//! minimize    qᵀx
//! subject to  Ax + s = b,  s ∈ {0}ᵉ × ℝ₊ᵐ
//! ```
//!
//! Variables are laid out as `[w | g | t]`: one weight per selected asset,
//! then gross exposure auxiliaries `g ≥ ±w` when the set bounds leverage,
//! then turnover auxiliaries `t ≥ ±(w - current)` when it bounds turnover.

use clarabel::algebra::CscMatrix;
use clarabel::solver::SupportedConeT;
use hobart_data::{Asset, CurrentPortfolio};

use crate::constraints::ConstraintSet;

/// Constraint rows collected as triplets.
#[derive(Debug, Default)]
struct Rows {
    triplets: Vec<(usize, usize, f64)>,
    b: Vec<f64>,
}

impl Rows {
    fn push<I>(&mut self, coeffs: I, rhs: f64)
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let row = self.b.len();
        self.triplets
            .extend(coeffs.into_iter().map(|(col, v)| (row, col, v)));
        self.b.push(rhs);
    }

    fn len(&self) -> usize {
        self.b.len()
    }
}

/// A portfolio problem ready for the solver.
#[derive(Debug)]
pub(crate) struct LinearProgram {
    /// Selected assets in variable order
    pub(crate) assets: Vec<Asset>,
    pub(crate) p: CscMatrix<f64>,
    pub(crate) q: Vec<f64>,
    pub(crate) a: CscMatrix<f64>,
    pub(crate) b: Vec<f64>,
    pub(crate) cones: Vec<SupportedConeT<f64>>,
}

impl LinearProgram {
    /// Build the program for `alpha` (in asset order).
    ///
    /// `turnover_budget` is the turnover left once unselected holdings are
    /// liquidated; it is only used when the set bounds turnover.
    pub(crate) fn build(
        alpha: &[(Asset, f64)],
        current: &CurrentPortfolio,
        constraints: &ConstraintSet,
        turnover_budget: f64,
    ) -> Self {
        let n = alpha.len();
        let gross = constraints.max_leverage();
        let turnover = constraints.max_turnover().map(|_| turnover_budget);

        let g_offset = n;
        let t_offset = n + if gross.is_some() { n } else { 0 };
        let n_vars = t_offset + if turnover.is_some() { n } else { 0 };

        let mut q = vec![0.0; n_vars];
        for (i, (_, score)) in alpha.iter().enumerate() {
            q[i] = -score;
        }

        let mut rows = Rows::default();

        if constraints.is_dollar_neutral() {
            rows.push((0..n).map(|i| (i, 1.0)), 0.0);
        }
        let n_equalities = rows.len();

        if let Some(max_position) = constraints.max_position() {
            for i in 0..n {
                rows.push([(i, 1.0)], max_position);
                rows.push([(i, -1.0)], max_position);
            }
        }

        if let Some(max_leverage) = gross {
            for i in 0..n {
                rows.push([(i, 1.0), (g_offset + i, -1.0)], 0.0);
                rows.push([(i, -1.0), (g_offset + i, -1.0)], 0.0);
            }
            rows.push((0..n).map(|i| (g_offset + i, 1.0)), max_leverage);
        }

        if let Some(budget) = turnover {
            for (i, (asset, _)) in alpha.iter().enumerate() {
                let held = current.weight(asset);
                rows.push([(i, 1.0), (t_offset + i, -1.0)], held);
                rows.push([(i, -1.0), (t_offset + i, -1.0)], -held);
            }
            rows.push((0..n).map(|i| (t_offset + i, 1.0)), budget);
        }

        let m = rows.len();
        let mut cones = Vec::with_capacity(2);
        if n_equalities > 0 {
            cones.push(SupportedConeT::ZeroConeT(n_equalities));
        }
        if m > n_equalities {
            cones.push(SupportedConeT::NonnegativeConeT(m - n_equalities));
        }

        Self {
            assets: alpha.iter().map(|(a, _)| a.clone()).collect(),
            p: CscMatrix::new(n_vars, n_vars, vec![0; n_vars + 1], vec![], vec![]),
            q,
            a: to_csc(m, n_vars, rows.triplets),
            b: rows.b,
            cones,
        }
    }

    /// Number of decision variables.
    pub(crate) fn n_vars(&self) -> usize {
        self.q.len()
    }

    /// Number of constraint rows.
    pub(crate) fn n_rows(&self) -> usize {
        self.b.len()
    }
}

/// Compress `(row, col, value)` triplets into a column-major matrix.
fn to_csc(m: usize, n: usize, mut triplets: Vec<(usize, usize, f64)>) -> CscMatrix<f64> {
    triplets.sort_by_key(|&(row, col, _)| (col, row));

    let mut colptr = vec![0usize; n + 1];
    let mut rowval = Vec::with_capacity(triplets.len());
    let mut nzval = Vec::with_capacity(triplets.len());
    for (row, col, v) in triplets {
        colptr[col + 1] += 1;
        rowval.push(row);
        nzval.push(v);
    }
    for col in 0..n {
        colptr[col + 1] += colptr[col];
    }

    CscMatrix::new(m, n, colptr, rowval, nzval)
}
