//! Rewriting of guards, invariants and assignments for the target formats.
//!
//! Expressions are kept as text: they are tokenized only to find the
//! identifiers and operators to rewrite,
//! while everything in between is copied verbatim.

use crate::{Constant, Process, integer_constant};
use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
enum Token {
    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[token("not")]
    Not,

    #[token("&&")]
    Conj,

    #[token("||")]
    Disj,

    #[token(":=")]
    Assign,

    #[regex("<=|>=|==|!=|<|>|=")]
    Cmp,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex("[0-9]+")]
    Integer,

    #[regex(r"[ \t\r\n]+")]
    Space,
}

type Spanned = (Result<Token, ()>, Range<usize>);

fn rewrite<F>(expr: &str, mut replace: F) -> String
where
    F: FnMut(Token, &str) -> Option<String>,
{
    let mut rewritten = String::with_capacity(expr.len());
    let mut last = 0;
    for (token, span) in Token::lexer(expr).spanned() {
        rewritten.push_str(&expr[last..span.start]);
        let slice = &expr[span.clone()];
        match token.ok().and_then(|token| replace(token, slice)) {
            Some(replacement) => rewritten.push_str(&replacement),
            None => rewritten.push_str(slice),
        }
        last = span.end;
    }
    rewritten.push_str(&expr[last..]);
    rewritten
}

fn tck_token(token: Token, slice: &str, process: &Process) -> Option<String> {
    match token {
        Token::Ident if process.is_local(slice) => Some(process.qualified(slice)),
        Token::And => Some("&&".to_owned()),
        Token::Or => Some("||".to_owned()),
        Token::Not => Some("!".to_owned()),
        _ => None,
    }
}

/// Converts a guard or invariant of `process` to TCK syntax.
///
/// Local clocks and variables are qualified with the process' name,
/// keyword operators become symbols. Constants are left untouched.
pub fn tck_expression(expr: &str, process: &Process) -> String {
    rewrite(expr, |token, slice| tck_token(token, slice, process))
        .trim()
        .to_owned()
}

/// Converts a comma-separated list of assignments of `process` to TCK syntax,
/// with `;`-separated statements using `=` as assignment operator.
pub fn tck_assignments(assign: &str, process: &Process) -> String {
    let converted = rewrite(assign, |token, slice| match token {
        Token::Assign => Some("=".to_owned()),
        _ => tck_token(token, slice, process),
    });
    converted
        .split(',')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Replaces boolean literals with `1`/`0` and integer constants with their value.
pub fn substitute(expr: &str, constants: &[Constant]) -> String {
    rewrite(expr, |token, slice| match token {
        Token::Ident if slice.eq_ignore_ascii_case("true") => Some("1".to_owned()),
        Token::Ident if slice.eq_ignore_ascii_case("false") => Some("0".to_owned()),
        Token::Ident => integer_constant(constants, slice).map(|value| value.to_string()),
        _ => None,
    })
    .trim()
    .to_owned()
}

/// Splits a conjunction at its top-level `&&`/`and` operators.
///
/// An expression with a top-level `||`/`or` is a disjunction,
/// and it is returned as a single item.
pub fn conjuncts(expr: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (token, span) in Token::lexer(expr).spanned() {
        match token {
            Ok(Token::LParen) => depth += 1,
            Ok(Token::RParen) => depth = depth.saturating_sub(1),
            Ok(Token::And | Token::Conj) if depth == 0 => {
                items.push(expr[start..span.start].trim());
                start = span.end;
            }
            Ok(Token::Or | Token::Disj) if depth == 0 => {
                items.clear();
                start = 0;
                break;
            }
            _ => {}
        }
    }
    items.push(expr[start..].trim());
    items.retain(|item| !item.is_empty());
    items
}

/// A comparison between two atoms (identifiers or integers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison<'a> {
    /// Left-hand side.
    pub left: &'a str,
    /// Comparison operator.
    pub op: &'a str,
    /// Right-hand side.
    pub right: &'a str,
}

fn atom(item: &str, token: Option<Spanned>) -> Option<&str> {
    match token {
        Some((Ok(Token::Ident | Token::Integer), span)) => Some(&item[span]),
        _ => None,
    }
}

fn significant(item: &str) -> impl Iterator<Item = Spanned> + '_ {
    Token::lexer(item)
        .spanned()
        .filter(|(token, _)| *token != Ok(Token::Space))
}

/// Recognizes expressions made of exactly `atom op atom`.
pub fn comparison(item: &str) -> Option<Comparison<'_>> {
    let mut tokens = significant(item);
    let left = atom(item, tokens.next())?;
    let op = match tokens.next() {
        Some((Ok(Token::Cmp), span)) => &item[span],
        _ => return None,
    };
    let right = atom(item, tokens.next())?;
    tokens
        .next()
        .is_none()
        .then_some(Comparison { left, op, right })
}

/// Renders a simple comparison as the Liana tuple `(left, op, right)`,
/// with constants and boolean literals substituted in the right-hand side.
pub fn comparison_tuple(item: &str, constants: &[Constant]) -> Option<String> {
    let Comparison { left, op, right } = comparison(item)?;
    Some(format!("({left}, {op}, {})", substitute(right, constants)))
}

/// Splits `var := value` (or `var = value`) into variable and value.
pub fn split_assignment(item: &str) -> Option<(&str, &str)> {
    let mut tokens = significant(item);
    let var = match tokens.next() {
        Some((Ok(Token::Ident), span)) => &item[span],
        _ => return None,
    };
    let value_start = match tokens.next() {
        Some((Ok(Token::Assign), span)) => span.end,
        Some((Ok(Token::Cmp), span)) if &item[span.clone()] == "=" => span.end,
        _ => return None,
    };
    let value = item[value_start..].trim();
    (!value.is_empty()).then_some((var, value))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ModelError, VarType, Variable, XtaModel, XtaModelBuilder};

    fn model() -> Result<XtaModel, ModelError> {
        let mut builder = XtaModelBuilder::new();
        builder.new_global_clock("g");
        builder.new_constant("N", "4");
        let p = builder.new_process("P")?;
        builder.new_clock(p, "x")?;
        builder.new_var(
            p,
            Variable {
                name: "n".to_string(),
                var_type: VarType::Int { bounds: None },
                init: None,
            },
        )?;
        Ok(builder.build())
    }

    #[test]
    fn tck_qualifies_locals() -> Result<(), ModelError> {
        let model = model()?;
        let p = &model.processes()[0];
        assert_eq!(
            tck_expression(" x <= 5 and g > N or not n ", p),
            "P_x <= 5 && g > N || ! P_n"
        );
        assert_eq!(tck_expression("xx + x1 <= x", p), "xx + x1 <= P_x");
        assert_eq!(tck_expression("order and band", p), "order && band");
        Ok(())
    }

    #[test]
    fn tck_assignment_list() -> Result<(), ModelError> {
        let model = model()?;
        let p = &model.processes()[0];
        assert_eq!(
            tck_assignments("x := 0, n = n + 1, g:=0", p),
            "P_x = 0; P_n = P_n + 1; g=0"
        );
        assert_eq!(tck_assignments("n := N", p), "P_n = N");
        Ok(())
    }

    #[test]
    fn liana_substitution() -> Result<(), ModelError> {
        let model = model()?;
        assert_eq!(
            substitute("b == TRUE && N > 0 || NN", model.constants()),
            "b == 1 && 4 > 0 || NN"
        );
        Ok(())
    }

    #[test]
    fn split_conjuncts() {
        assert_eq!(
            conjuncts("x >= 2 && n == 1 and (y < 3 && z)"),
            vec!["x >= 2", "n == 1", "(y < 3 && z)"]
        );
        assert_eq!(conjuncts("   "), Vec::<&str>::new());
        assert_eq!(conjuncts("candy > 1"), vec!["candy > 1"]);
    }

    #[test]
    fn disjunctions_are_not_split() {
        assert_eq!(
            conjuncts("n == 1 || x < 2 && x > 5"),
            vec!["n == 1 || x < 2 && x > 5"]
        );
        assert_eq!(conjuncts(" a and b or c "), vec!["a and b or c"]);
        assert_eq!(
            conjuncts("x > 1 && (n == 1 || n == 2)"),
            vec!["x > 1", "(n == 1 || n == 2)"]
        );
    }

    #[test]
    fn tuples() -> Result<(), ModelError> {
        let model = model()?;
        assert_eq!(
            comparison_tuple("x<=N", model.constants()).as_deref(),
            Some("(x, <=, 4)")
        );
        assert_eq!(
            comparison_tuple("b == false", model.constants()).as_deref(),
            Some("(b, ==, 0)")
        );
        assert_eq!(comparison_tuple("x + 1 < 3", model.constants()), None);
        assert_eq!(comparison_tuple("x <", model.constants()), None);
        Ok(())
    }

    #[test]
    fn assignments() {
        assert_eq!(split_assignment("x := 0"), Some(("x", "0")));
        assert_eq!(split_assignment("n = n + 1"), Some(("n", "n + 1")));
        assert_eq!(split_assignment("n++"), None);
        assert_eq!(split_assignment("x == 1"), None);
        assert_eq!(split_assignment("x :="), None);
    }
}
