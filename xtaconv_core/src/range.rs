use crate::{Constant, VarType, Variable, integer_constant};

/// Bounds and initial value of an integer declaration in the target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    /// Lower bound.
    pub min: i64,
    /// Upper bound.
    pub max: i64,
    /// Initial value.
    pub init: i64,
}

impl IntRange {
    /// Upper bound used when no better one is known.
    pub const DEFAULT_MAX: i64 = 1000;

    const DEFAULT: IntRange = IntRange {
        min: 0,
        max: Self::DEFAULT_MAX,
        init: 0,
    };

    /// Range of a constant declared as a variable.
    ///
    /// The upper bound leaves room for the value to double,
    /// and it is never lower than [`IntRange::DEFAULT_MAX`].
    pub fn for_constant(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(value) => IntRange {
                min: value.min(0),
                max: value.saturating_mul(2).max(Self::DEFAULT_MAX),
                init: value,
            },
            Err(_) => Self::DEFAULT,
        }
    }

    /// Range of a variable, resolving bounds and initializer
    /// against the integer constants.
    pub fn for_variable(var: &Variable, constants: &[Constant]) -> Self {
        match &var.var_type {
            VarType::Bool => IntRange {
                min: 0,
                max: 1,
                init: var
                    .init
                    .as_deref()
                    .map(|init| {
                        let init = init.trim();
                        init.eq_ignore_ascii_case("true") || init == "1"
                    })
                    .map_or(0, i64::from),
            },
            VarType::Int { bounds } => {
                let init = var
                    .init
                    .as_deref()
                    .and_then(|init| resolve(init, constants))
                    .unwrap_or(0);
                let bounds = bounds
                    .as_ref()
                    .and_then(|(lo, hi)| Some((resolve(lo, constants)?, resolve(hi, constants)?)));
                match bounds {
                    Some((min, max)) => IntRange { min, max, init },
                    None => IntRange {
                        init,
                        ..Self::DEFAULT
                    },
                }
            }
        }
    }
}

fn resolve(text: &str, constants: &[Constant]) -> Option<i64> {
    let text = text.trim();
    text.parse()
        .ok()
        .or_else(|| integer_constant(constants, text))
}

#[cfg(test)]
mod test {
    use super::*;

    fn int(name: &str, bounds: Option<(&str, &str)>, init: Option<&str>) -> Variable {
        Variable {
            name: name.to_string(),
            var_type: VarType::Int {
                bounds: bounds.map(|(lo, hi)| (lo.to_string(), hi.to_string())),
            },
            init: init.map(str::to_string),
        }
    }

    #[test]
    fn constant_ranges() {
        assert_eq!(
            IntRange::for_constant("4"),
            IntRange {
                min: 0,
                max: 1000,
                init: 4
            }
        );
        assert_eq!(IntRange::for_constant(" 700 ").max, 1400);
        assert_eq!(IntRange::for_constant("N * 2"), IntRange::DEFAULT);
        assert_eq!(IntRange::for_constant("-5").min, -5);
    }

    #[test]
    fn variable_ranges() {
        let constants = vec![Constant {
            name: "N".to_string(),
            value: "7".to_string(),
        }];
        let bounded = int("x", Some(("-1", "N")), Some("N"));
        assert_eq!(
            IntRange::for_variable(&bounded, &constants),
            IntRange {
                min: -1,
                max: 7,
                init: 7
            }
        );
        let unresolved = int("y", Some(("0", "M")), None);
        assert_eq!(
            IntRange::for_variable(&unresolved, &constants),
            IntRange::DEFAULT
        );
        let flag = Variable {
            name: "b".to_string(),
            var_type: VarType::Bool,
            init: Some("TRUE".to_string()),
        };
        assert_eq!(IntRange::for_variable(&flag, &constants).init, 1);
        assert_eq!(IntRange::for_variable(&flag, &constants).max, 1);
    }
}
