//! Column dependency checks for templates
//!
//! Evaluation order is declaration order: a computed column sees the data
//! columns, the system variables and the computed columns declared before it.
//! [`check_template`] reports formulas that break this rule, without
//! evaluating anything. The row calculator never needs it; it is meant for
//! template editors.

use crate::error::FormulaError;
use crate::limits::FormulaLimits;
use crate::parser::parse_formula;
use ahash::AHashMap;
use ritstaat_core::ColumnDefinition;
use std::fmt;

/// A problem found in a template
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "issue", rename_all = "snake_case"))]
pub enum TemplateIssue {
    /// Two columns share an id; the later one is unreachable by formulas
    DuplicateColumn { column: String },
    /// Computed column without a formula (always 0)
    MissingFormula { column: String },
    /// Formula that does not parse or exceeds a limit (always 0)
    InvalidFormula {
        column: String,
        #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_display"))]
        error: FormulaError,
    },
    /// Formula referencing its own column (always 0)
    SelfReference { column: String },
    /// Reference to a computed column declared later (reads 0 at that point)
    ForwardReference { column: String, reference: String },
    /// Identifier that is neither a column nor a system variable (reads 0)
    UnknownIdentifier { column: String, identifier: String },
}

impl TemplateIssue {
    /// Id of the column the issue was found in
    pub fn column(&self) -> &str {
        match self {
            TemplateIssue::DuplicateColumn { column }
            | TemplateIssue::MissingFormula { column }
            | TemplateIssue::InvalidFormula { column, .. }
            | TemplateIssue::SelfReference { column }
            | TemplateIssue::ForwardReference { column, .. }
            | TemplateIssue::UnknownIdentifier { column, .. } => column,
        }
    }
}

impl fmt::Display for TemplateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateIssue::DuplicateColumn { column } => {
                write!(f, "{}: duplicate column id", column)
            }
            TemplateIssue::MissingFormula { column } => {
                write!(f, "{}: computed column has no formula", column)
            }
            TemplateIssue::InvalidFormula { column, error } => write!(f, "{}: {}", column, error),
            TemplateIssue::SelfReference { column } => {
                write!(f, "{}: formula references its own column", column)
            }
            TemplateIssue::ForwardReference { column, reference } => write!(
                f,
                "{}: references '{}', which is computed later",
                column, reference
            ),
            TemplateIssue::UnknownIdentifier { column, identifier } => {
                write!(f, "{}: unknown identifier '{}'", column, identifier)
            }
        }
    }
}

#[cfg(feature = "serde")]
fn serialize_display<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Check every column of a template, in declaration order
///
/// # Example
/// ```rust
/// use ritstaat_core::ColumnDefinition;
/// use ritstaat_formula::{check_template, FormulaLimits, TemplateIssue};
///
/// let columns = vec![
///     ColumnDefinition::data("begin_km"),
///     ColumnDefinition::computed("bedrag", "=km*tarief_per_km"),
///     ColumnDefinition::computed("km", "=eind_km-begin_km"),
/// ];
///
/// let issues = check_template(&columns, &["tarief_per_km"], &FormulaLimits::default());
/// assert_eq!(issues.len(), 2);
/// assert!(matches!(issues[0], TemplateIssue::ForwardReference { .. }));
/// assert!(matches!(issues[1], TemplateIssue::UnknownIdentifier { .. }));
/// ```
pub fn check_template(
    columns: &[ColumnDefinition],
    system_variable_names: &[&str],
    limits: &FormulaLimits,
) -> Vec<TemplateIssue> {
    let mut issues = Vec::new();

    // First declaration of every id
    let mut positions: AHashMap<&str, usize> = AHashMap::with_capacity(columns.len());
    for (i, column) in columns.iter().enumerate() {
        if positions.contains_key(column.id.as_str()) {
            issues.push(TemplateIssue::DuplicateColumn {
                column: column.id.clone(),
            });
        } else {
            positions.insert(&column.id, i);
        }
    }

    for (i, column) in columns.iter().enumerate() {
        if !column.is_computed() {
            continue;
        }

        let formula = match column.formula.as_deref() {
            Some(formula) if !formula.trim().is_empty() => formula,
            _ => {
                issues.push(TemplateIssue::MissingFormula {
                    column: column.id.clone(),
                });
                continue;
            }
        };

        let expr = match parse_formula(formula, limits) {
            Ok(expr) => expr,
            Err(error) => {
                issues.push(TemplateIssue::InvalidFormula {
                    column: column.id.clone(),
                    error,
                });
                continue;
            }
        };

        for identifier in expr.identifiers() {
            if identifier == column.id {
                issues.push(TemplateIssue::SelfReference {
                    column: column.id.clone(),
                });
                continue;
            }

            match positions.get(identifier) {
                // Data columns are seeded before any formula runs
                Some(&pos) if pos > i && columns[pos].is_computed() => {
                    issues.push(TemplateIssue::ForwardReference {
                        column: column.id.clone(),
                        reference: identifier.to_string(),
                    });
                }
                Some(_) => {}
                None if system_variable_names.contains(&identifier) => {}
                None => issues.push(TemplateIssue::UnknownIdentifier {
                    column: column.id.clone(),
                    identifier: identifier.to_string(),
                }),
            }
        }
    }

    if !issues.is_empty() {
        log::debug!("template check found {} issue(s)", issues.len());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(columns: &[ColumnDefinition]) -> Vec<TemplateIssue> {
        check_template(
            columns,
            &["tarief_per_uur", "tarief_per_km"],
            &FormulaLimits::default(),
        )
    }

    #[test]
    fn test_clean_template() {
        let columns = vec![
            ColumnDefinition::data("begin_tijd"),
            ColumnDefinition::data("eind_tijd"),
            ColumnDefinition::computed("uren", "=eind_tijd-begin_tijd"),
            ColumnDefinition::computed("bedrag", "=ROUND(uren*tarief_per_uur, 2)"),
        ];
        assert_eq!(check(&columns), vec![]);
    }

    #[test]
    fn test_later_data_column_is_fine() {
        let columns = vec![
            ColumnDefinition::computed("km", "=eind_km-begin_km"),
            ColumnDefinition::data("begin_km"),
            ColumnDefinition::data("eind_km"),
        ];
        assert_eq!(check(&columns), vec![]);
    }

    #[test]
    fn test_reported_issues() {
        let columns = vec![
            ColumnDefinition::data("pauze"),
            ColumnDefinition::data("pauze"),
            ColumnDefinition::computed("x", "=x+1"),
            ColumnDefinition::computed("a", "=b*2"),
            ColumnDefinition::computed("b", "=pauze+toeslag"),
            ColumnDefinition {
                id: "leeg".into(),
                kind: ritstaat_core::ColumnKind::Computed,
                formula: None,
            },
            ColumnDefinition::computed("kapot", "=pauze+"),
        ];

        assert_eq!(
            check(&columns),
            vec![
                TemplateIssue::DuplicateColumn {
                    column: "pauze".into()
                },
                TemplateIssue::SelfReference { column: "x".into() },
                TemplateIssue::ForwardReference {
                    column: "a".into(),
                    reference: "b".into()
                },
                TemplateIssue::UnknownIdentifier {
                    column: "b".into(),
                    identifier: "toeslag".into()
                },
                TemplateIssue::MissingFormula {
                    column: "leeg".into()
                },
                TemplateIssue::InvalidFormula {
                    column: "kapot".into(),
                    error: FormulaError::Parse("Incomplete expression".into()),
                },
            ]
        );
    }

    #[test]
    fn test_too_long_formula() {
        let formula = format!("={}", "1+".repeat(300) + "1");
        let issues = check(&[ColumnDefinition::computed("lang", formula)]);
        assert!(matches!(
            issues.as_slice(),
            [TemplateIssue::InvalidFormula {
                error: FormulaError::TooLong { .. },
                ..
            }]
        ));
    }

    #[test]
    fn test_display() {
        let issue = TemplateIssue::ForwardReference {
            column: "a".into(),
            reference: "b".into(),
        };
        assert_eq!(issue.to_string(), "a: references 'b', which is computed later");
        assert_eq!(issue.column(), "a");
    }
}
