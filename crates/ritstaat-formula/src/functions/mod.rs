//! Built-in template functions
//!
//! Every function takes already-evaluated numeric arguments and returns a
//! number. Missing arguments read as 0; no function fails.

pub mod date;
pub mod financial;
pub mod info;
pub mod logical;
pub mod math;
pub mod statistical;

use std::collections::HashMap;

/// Function implementation signature
pub type FunctionImpl = fn(&[f64]) -> f64;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Implementation
    pub implementation: FunctionImpl,
    /// Spreadsheet function to emit on export when the name itself is not one
    /// (e.g. `SUMME` is written as `SUM`)
    pub native_name: Option<&'static str>,
}

impl FunctionDef {
    /// Name to write into an exported spreadsheet formula
    pub fn export_name(&self) -> &'static str {
        self.native_name.unwrap_or(self.name)
    }
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_math_functions();
        registry.register_logical_functions();
        registry.register_statistical_functions();
        registry.register_info_functions();
        registry.register_financial_functions();
        registry.register_date_functions();

        registry
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Check if a function is known
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Number of registered names, aliases included
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn add(&mut self, name: &'static str, implementation: FunctionImpl) {
        self.register(FunctionDef {
            name,
            implementation,
            native_name: None,
        });
    }

    fn add_alias(&mut self, name: &'static str, native: &'static str, implementation: FunctionImpl) {
        self.register(FunctionDef {
            name,
            implementation,
            native_name: Some(native),
        });
    }

    fn register_math_functions(&mut self) {
        self.add("SUM", math::fn_sum);
        self.add_alias("SUMME", "SUM", math::fn_sum);
        self.add("AVERAGE", math::fn_average);
        self.add_alias("AVG", "AVERAGE", math::fn_average);
        self.add_alias("GEMIDDELDE", "AVERAGE", math::fn_average);
        self.add("MIN", math::fn_min);
        self.add("MAX", math::fn_max);
        self.add("ABS", math::fn_abs);

        // Rounding
        self.add("ROUND", math::fn_round);
        self.add("ROUNDUP", math::fn_roundup);
        self.add("CEILING", math::fn_roundup);
        self.add("ROUNDDOWN", math::fn_rounddown);
        self.add("FLOOR", math::fn_rounddown);
        self.add("INT", math::fn_trunc);
        self.add("TRUNC", math::fn_trunc);
        self.add("MOD", math::fn_mod);

        self.add("POWER", math::fn_power);
        self.add("SQRT", math::fn_sqrt);
        self.add("SIGN", math::fn_sign);
        self.add("PI", math::fn_pi);
        self.add("LOG", math::fn_log);
        self.add("LOG10", math::fn_log10);
        self.add("LN", math::fn_ln);
        self.add("EXP", math::fn_exp);

        self.add("PRODUCT", math::fn_product);
        self.add("SUMPRODUCT", math::fn_sum);
    }

    fn register_logical_functions(&mut self) {
        self.add("IF", logical::fn_if);
        self.add("IFERROR", logical::fn_iferror);
        self.add("AND", logical::fn_and);
        self.add("OR", logical::fn_or);
        self.add("NOT", logical::fn_not);

        // Comparison helpers
        self.add("EQUAL", logical::fn_equal);
        self.add("GT", logical::fn_gt);
        self.add("GTE", logical::fn_gte);
        self.add("LT", logical::fn_lt);
        self.add("LTE", logical::fn_lte);
        self.add("BETWEEN", logical::fn_between);
    }

    fn register_statistical_functions(&mut self) {
        self.add("COUNT", statistical::fn_count);
        self.add("COUNTA", statistical::fn_count);
        self.add("MEDIAN", statistical::fn_median);
    }

    fn register_info_functions(&mut self) {
        self.add("ISBLANK", info::fn_isblank);
        self.add("ISNUMBER", info::fn_isnumber);
        self.add("ISEVEN", info::fn_iseven);
        self.add("ISODD", info::fn_isodd);
    }

    fn register_financial_functions(&mut self) {
        self.add("PMT", financial::fn_pmt);
    }

    fn register_date_functions(&mut self) {
        self.add("WEEKDAY", date::fn_weekday);
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// === Helper functions ===

/// Argument at `index`, or 0 when it was not supplied
pub(crate) fn arg(args: &[f64], index: usize) -> f64 {
    args.get(index).copied().unwrap_or(0.0)
}

/// Template truthiness: nonzero and not NaN
pub(crate) fn is_truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

pub(crate) fn from_bool(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = FunctionRegistry::new();
        assert!(registry.contains("round"));
        assert!(registry.contains("Gemiddelde"));
        assert!(!registry.contains("VLOOKUP"));
    }

    #[test]
    fn test_export_names() {
        let registry = FunctionRegistry::new();
        let name = |n: &str| registry.get(n).map(FunctionDef::export_name);

        assert_eq!(name("summe"), Some("SUM"));
        assert_eq!(name("AVG"), Some("AVERAGE"));
        assert_eq!(name("GEMIDDELDE"), Some("AVERAGE"));
        assert_eq!(name("ceiling"), Some("CEILING"));
        assert_eq!(name("NOPE"), None);
    }

    #[test]
    fn test_aliases_share_implementations() {
        let registry = FunctionRegistry::new();
        let call = |n: &str, args: &[f64]| registry.get(n).map(|f| (f.implementation)(args));

        assert_eq!(call("SUMME", &[1.0, 2.0]), Some(3.0));
        assert_eq!(call("AVG", &[2.0, 4.0]), Some(3.0));
        assert_eq!(call("SUMPRODUCT", &[2.0, 4.0]), Some(6.0));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(arg(&[1.0], 0), 1.0);
        assert_eq!(arg(&[1.0], 3), 0.0);
        assert!(is_truthy(-0.5));
        assert!(!is_truthy(0.0));
        assert!(!is_truthy(f64::NAN));
    }
}
