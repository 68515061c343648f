//! Static resource guards
//!
//! Evaluation has no cancellation; these bounds are what keeps a pathological
//! template from looping or allocating without end.

/// Resource limits applied to every formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormulaLimits {
    /// Longest accepted formula, in characters (longer formulas evaluate to 0)
    pub max_formula_length: usize,
    /// Tokens kept per expression level (a function call counts as one);
    /// the rest of that level is dropped
    pub max_tokens: usize,
    /// Deepest accepted nesting of function calls
    pub max_function_depth: usize,
}

impl Default for FormulaLimits {
    fn default() -> Self {
        Self {
            max_formula_length: 500,
            max_tokens: 200,
            max_function_depth: 50,
        }
    }
}
