use serde::{Deserialize, Serialize};

use super::transform::{check_width, FeatureTransform};
use crate::core::{PredictorError, PredictorResult};

/// Polynomial feature expansion fitted offline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    pub degree: u32,

    #[serde(default = "default_include_bias")]
    pub include_bias: bool,

    #[serde(default)]
    pub interaction_only: bool,

    pub n_features_in: usize,

    /// Column index tuples, one per output monomial
    #[serde(skip)]
    terms: Vec<Vec<usize>>,
}

/// Largest expansion an artifact may describe
pub const MAX_OUTPUT_FEATURES: usize = 100_000;

fn default_include_bias() -> bool {
    true
}

impl PolynomialFeatures {
    pub fn new(degree: u32, n_features_in: usize) -> PredictorResult<Self> {
        Self {
            degree,
            include_bias: true,
            interaction_only: false,
            n_features_in,
            terms: Vec::new(),
        }
        .fitted()
    }

    /// Validate the hyperparameters and enumerate the output monomials.
    ///
    /// Monomials come in combinations-with-replacement order, grouped by
    /// degree: `1, x0, x1, .., x0^2, x0 x1, .., x1^2, ..`.
    pub fn fitted(mut self) -> PredictorResult<Self> {
        if self.degree == 0 {
            return Err(PredictorError::computation("polynomial degree must be at least 1"));
        }
        if self.n_features_in == 0 {
            return Err(PredictorError::computation("polynomial expander has no input features"));
        }

        let width = self.output_width().ok_or_else(|| {
            PredictorError::computation(format!(
                "degree {} over {} input features expands beyond {} columns",
                self.degree, self.n_features_in, MAX_OUTPUT_FEATURES
            ))
        })?;

        let mut terms = Vec::with_capacity(width);
        if self.include_bias {
            terms.push(Vec::new());
        }

        let mut current: Vec<Vec<usize>> = vec![Vec::new()];
        for _ in 0..self.degree {
            let mut next = Vec::new();
            for term in &current {
                let start = match (term.last(), self.interaction_only) {
                    (Some(&last), true) => last + 1,
                    (Some(&last), false) => last,
                    (None, _) => 0,
                };
                for column in start..self.n_features_in {
                    let mut extended = term.clone();
                    extended.push(column);
                    next.push(extended);
                }
            }
            if next.is_empty() {
                break;
            }
            terms.extend(next.iter().cloned());
            current = next;
        }

        self.terms = terms;
        Ok(self)
    }

    /// Number of output columns, or `None` past [`MAX_OUTPUT_FEATURES`].
    fn output_width(&self) -> Option<usize> {
        let n = self.n_features_in;
        let mut total = usize::from(self.include_bias);
        // Monomials of exactly degree k: C(n + k - 1, k), or C(n, k) without repeats
        let mut per_degree: usize = 1;

        for k in 1..=self.degree as usize {
            per_degree = if self.interaction_only {
                if k > n {
                    break;
                }
                per_degree.checked_mul(n - k + 1)? / k
            } else {
                per_degree.checked_mul(n.checked_add(k - 1)?)? / k
            };
            total = total.checked_add(per_degree)?;
            if total > MAX_OUTPUT_FEATURES {
                return None;
            }
        }

        Some(total)
    }
}

impl FeatureTransform for PolynomialFeatures {
    fn transform(&self, input: &[f64]) -> PredictorResult<Vec<f64>> {
        check_width("polynomial expander", self.n_features_in, input)?;

        Ok(self
            .terms
            .iter()
            .map(|term| term.iter().map(|&column| input[column]).product::<f64>())
            .collect())
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn n_features_out(&self) -> usize {
        self.terms.len()
    }
}
