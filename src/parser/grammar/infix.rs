use log::trace;

use crate::ast::{Band, BinaryOp, Expr};
use crate::parser::combinators::{Farthest, ParseResultSet, Parsed};
use crate::parser::error::ParseError;
use crate::parser::state::Input;

use super::Scope;
use super::prefix::prefix;

/// A flat `operand (operator operand)*` sequence read so far.
#[derive(Debug, Clone)]
struct Chain {
    operands: Vec<Expr>,
    operators: Vec<(BinaryOp, usize)>,
    /// The chain grouped by precedence.
    grouped: Expr,
    end: usize,
    hint: Option<ParseError>,
}

impl Chain {
    fn start(operand: Parsed<Expr>) -> Self {
        Chain {
            operands: vec![operand.value.clone()],
            operators: vec![],
            grouped: operand.value,
            end: operand.next,
            hint: operand.how_to_continue,
        }
    }

    fn push(&self, op: BinaryOp, op_pos: usize, operand: Parsed<Expr>) -> Result<Chain, ParseError> {
        let mut operands = self.operands.clone();
        let mut operators = self.operators.clone();
        operands.push(operand.value);
        operators.push((op, op_pos));
        let grouped = group(operands.clone(), operators.clone())?;
        Ok(Chain {
            operands,
            operators,
            grouped,
            end: operand.next,
            hint: operand.how_to_continue,
        })
    }

    fn ends_open(&self) -> bool {
        self.operands.last().is_some_and(Expr::ends_open)
    }
}

/// expression := prefix (operator prefix)*
///
/// Every prefix of the chain is a candidate, grouped tightest band first. Two
/// different operators of one band next to each other need brackets, as does a
/// repeated operator that is not associative.
pub fn expression(input: &Input, pos: usize, scope: &Scope) -> ParseResultSet<Expr> {
    let first = prefix(input, pos, scope)?;
    let mut out = Vec::new();
    for operand in first {
        extend(input, scope, Chain::start(operand), &mut out);
    }
    trace!("{} chain candidate(s) from position {}", out.len(), pos);
    Ok(out)
}

fn extend(input: &Input, scope: &Scope, chain: Chain, out: &mut Vec<Parsed<Expr>>) {
    let mut farthest = Farthest::new();
    if let Some(hint) = &chain.hint {
        farthest.record(hint.clone());
    }

    // a binder operand has already taken everything it could
    if !chain.ends_open() {
        match next_operator(input, chain.end) {
            None => {}
            Some(Err(err)) => farthest.record(err),
            Some(Ok((op, op_pos, after))) => {
                match prefix(input, input.skip_whitespace(after), scope) {
                    Err(err) => farthest.record(err),
                    Ok(operands) => {
                        for operand in operands {
                            match chain.push(op, op_pos, operand) {
                                Ok(longer) => extend(input, scope, longer, out),
                                Err(err) => farthest.record(err),
                            }
                        }
                    }
                }
            }
        }
    }

    out.push(Parsed {
        value: chain.grouped,
        next: chain.end,
        how_to_continue: farthest.take(),
    });
}

/// The operator after `end`, checked for the required whitespace.
fn next_operator(input: &Input, end: usize) -> Option<Result<(BinaryOp, usize, usize), ParseError>> {
    let op_pos = input.skip_whitespace(end);
    let (op, after) = input.operator_at(op_pos)?;
    let spaced = op_pos > end && input.is_space(after);
    if !spaced && !op.allows_tight_spacing() {
        return Some(Err(ParseError::syntax(
            format!("put a space on each side of {}", op.symbol()),
            op_pos,
        )));
    }
    Some(Ok((op, op_pos, after)))
}

fn group(mut operands: Vec<Expr>, mut operators: Vec<(BinaryOp, usize)>) -> Result<Expr, ParseError> {
    for band in [Band::Tight, Band::Relation, Band::Connective] {
        let mut i = 0;
        while i < operators.len() {
            if operators[i].0.band() != Some(band) {
                i += 1;
                continue;
            }
            let mut j = i;
            while j + 1 < operators.len() && operators[j + 1].0.band() == Some(band) {
                j += 1;
            }

            let op = operators[i].0;
            for &(other, position) in &operators[i + 1..=j] {
                if other != op {
                    return Err(ParseError::syntax(
                        format!(
                            "use brackets to show how {} and {} group",
                            op.symbol(),
                            other.symbol()
                        ),
                        position,
                    ));
                }
                if !op.is_associative() {
                    return Err(ParseError::syntax(
                        format!("use brackets to show how the {} signs group", op.symbol()),
                        position,
                    ));
                }
            }

            let mut run = operands.drain(i..=j + 1);
            let Some(first) = run.next() else {
                unreachable!("an operator run always has operands");
            };
            let folded = run.fold(first, |left, right| Expr::binary(op, left, right));
            operands.insert(i, folded);
            operators.drain(i..=j);
        }
    }

    match operands.pop() {
        Some(expr) if operands.is_empty() => Ok(expr),
        _ => unreachable!("every operator joins two operands"),
    }
}
