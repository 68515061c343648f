//! Property tests for the engine's guarantees

use proptest::prelude::*;
use ritstaat::prelude::*;
use ritstaat::{column_to_letters, evaluate_formula, letters_to_column, EvaluationContext};

/// Random arithmetic/comparison formulas over small integers and two columns
fn formula_body() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..100).prop_map(|n| n.to_string()),
        Just("a".to_string()),
        Just("b".to_string()),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), "[-+*/<>]|==|<>|<=|>=", inner.clone())
                .prop_map(|(l, op, r)| format!("{}{}{}", l, op, r)),
            inner.clone().prop_map(|e| format!("({})", e)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("SUM({},{})", l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| format!("MOD({},{})", l, r)),
        ]
    })
}

fn raw_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        Just(RawValue::Empty),
        any::<f64>().prop_map(RawValue::Number),
        "[0-9]{1,2}:[0-5][0-9]".prop_map(RawValue::Text),
        "[ -~]{0,8}".prop_map(RawValue::Text),
    ]
}

proptest! {
    #[test]
    fn column_letters_round_trip(position in 1u32..=ritstaat::MAX_COLS) {
        let letters = column_to_letters(position);
        prop_assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(letters_to_column(&letters).unwrap(), position);
    }

    #[test]
    fn column_letters_are_ordered(position in 1u32..ritstaat::MAX_COLS) {
        let here = column_to_letters(position);
        let next = column_to_letters(position + 1);
        prop_assert!((here.len(), &here) < (next.len(), &next));
    }

    #[test]
    fn division_by_zero_is_zero(n in any::<f64>()) {
        let ctx = EvaluationContext::new().with_value("n", n).with_value("zero", 0.0);
        let value = evaluate_formula("=n/zero", &ctx, &FormulaLimits::default());
        prop_assert_eq!(value, 0.0);
    }

    #[test]
    fn arithmetic_matches_precedence(a in -1000i32..1000, b in -1000i32..1000, c in 1i32..1000) {
        let ctx = EvaluationContext::new();
        let limits = FormulaLimits::default();
        let formula = format!("={}+{}*{}-{}/{}", a, b, c, a, c);
        let expected = a as f64 + (b as f64 * c as f64) - (a as f64 / c as f64);
        prop_assert_eq!(evaluate_formula(&formula, &ctx, &limits), expected);
    }

    #[test]
    fn computed_values_are_finite(
        body in formula_body(),
        a in raw_value(),
        b in raw_value(),
    ) {
        let columns = vec![
            ColumnDefinition::data("a"),
            ColumnDefinition::data("b"),
            ColumnDefinition::computed("c", format!("={}", body)),
            ColumnDefinition::computed("d", format!("=c*{}", body)),
        ];
        let calculator = RowCalculator::new(columns, SystemVariables::new());
        let row = Row::new().with("a", a).with("b", b);

        let values = calculator.calculate(&row);
        prop_assert_eq!(values.len(), 2);
        for (_, value) in values.iter() {
            prop_assert!(value.is_finite());
        }
    }

    #[test]
    fn calculation_is_idempotent(body in formula_body(), a in any::<f64>(), b in raw_value()) {
        let columns = vec![
            ColumnDefinition::data("a"),
            ColumnDefinition::data("b"),
            ColumnDefinition::computed("c", format!("={}", body)),
        ];
        let calculator = RowCalculator::new(columns, SystemVariables::new());
        let row = Row::new().with("a", a).with("b", b);

        prop_assert_eq!(calculator.calculate(&row), calculator.calculate(&row));
    }

    #[test]
    fn arbitrary_text_never_panics(text in "\\PC{0,80}") {
        let columns = vec![ColumnDefinition::computed("x", text.clone())];
        let values = RowCalculator::new(columns.clone(), SystemVariables::new()).calculate(&Row::new());
        prop_assert!(values.get("x").map_or(false, f64::is_finite));

        let _ = export_row(&columns, 1, &SystemVariableRefs::new(), &FormulaLimits::default());
        let _ = check_template(&columns, &[], &FormulaLimits::default());
    }
}
