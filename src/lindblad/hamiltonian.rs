// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-qubit Hamiltonian expressions.
//!
//! Accepted grammar (whitespace is ignored):
//!
//! ```text
//! expr   := ['+' | '-'] term (('+' | '-') term)*
//! term   := factor ('*' factor)*
//! factor := number | operator
//! operator := ['qutip.'] name '(' [2] ')'
//! name   := sigmax | sigmay | sigmaz | sigmap | sigmam | qeye
//! ```
//!
//! A term made only of numbers is that multiple of the identity. The
//! resulting matrix must be Hermitian.

use ndarray::Array2;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, char, digit1, multispace0},
    combinator::{all_consuming, map, opt},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use num_complex::Complex64;

use super::dissipator::conjugate_transpose;
use super::types::QubitOperator;
use crate::error::{Result, ValidationError};

const HERMITIAN_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
enum Factor<'a> {
    Number(f64),
    Operator {
        name: &'a str,
        argument: Option<&'a str>,
    },
}

/// A signed product of factors.
type Term<'a> = (f64, Vec<Factor<'a>>);

fn ham_error(message: impl Into<String>) -> crate::error::Error {
    ValidationError::Field {
        field: "ham".into(),
        message: message.into(),
    }
    .into()
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn parse_sign(input: &str) -> IResult<&str, f64> {
    alt((map(char('+'), |_| 1.0), map(char('-'), |_| -1.0)))(input)
}

/// Parse additive terms, with an optional leading sign.
fn parse_expression(input: &str) -> IResult<&str, Vec<Term<'_>>> {
    let (input, sign) = opt(ws(parse_sign))(input)?;
    let (input, first) = parse_product(input)?;
    let (input, rest) = many0(pair(ws(parse_sign), parse_product))(input)?;

    let mut terms = vec![(sign.unwrap_or(1.0), first)];
    terms.extend(rest);
    Ok((input, terms))
}

/// Parse `factor ('*' factor)*`.
fn parse_product(input: &str) -> IResult<&str, Vec<Factor<'_>>> {
    let (input, first) = parse_factor(input)?;
    let (input, rest) = many0(preceded(ws(char('*')), parse_factor))(input)?;

    let mut factors = vec![first];
    factors.extend(rest);
    Ok((input, factors))
}

fn parse_factor(input: &str) -> IResult<&str, Factor<'_>> {
    ws(alt((parse_operator, map(double, Factor::Number))))(input)
}

/// Parse `['qutip.'] name '(' [digits] ')'`.
fn parse_operator(input: &str) -> IResult<&str, Factor<'_>> {
    map(
        pair(
            preceded(opt(tag("qutip.")), alpha1),
            delimited(
                ws(char('(')),
                opt(terminated(digit1, multispace0)),
                char(')'),
            ),
        ),
        |(name, argument)| Factor::Operator { name, argument },
    )(input)
}

fn lookup_operator(name: &str) -> Option<QubitOperator> {
    match name {
        "sigmax" => Some(QubitOperator::SigmaX),
        "sigmay" => Some(QubitOperator::SigmaY),
        "sigmaz" => Some(QubitOperator::SigmaZ),
        "sigmap" => Some(QubitOperator::SigmaPlus),
        "sigmam" => Some(QubitOperator::SigmaMinus),
        "qeye" => Some(QubitOperator::Identity),
        _ => None,
    }
}

fn factor_matrix(factor: &Factor<'_>) -> Result<Array2<Complex64>> {
    match *factor {
        Factor::Number(v) if !v.is_finite() => {
            Err(ham_error(format!("number {} is not finite", v)))
        }
        Factor::Number(v) => Ok(QubitOperator::Identity.matrix().mapv(|z| z * v)),
        Factor::Operator { name, argument } => {
            let op = lookup_operator(name)
                .ok_or_else(|| ham_error(format!("unknown operator '{}'", name)))?;
            match argument {
                None => Ok(op.matrix()),
                Some("2") if op == QubitOperator::Identity => Ok(op.matrix()),
                Some(arg) => Err(ham_error(format!(
                    "'{}({})': only qeye takes an argument, and it must be 2",
                    name, arg
                ))),
            }
        }
    }
}

fn evaluate(terms: &[Term<'_>]) -> Result<Array2<Complex64>> {
    let mut total = Array2::zeros((2, 2));
    for (sign, factors) in terms {
        let mut product = QubitOperator::Identity.matrix();
        for factor in factors {
            product = product.dot(&factor_matrix(factor)?);
        }
        total = total + product.mapv(|z| z * *sign);
    }
    Ok(total)
}

/// Parse a Hamiltonian expression into a Hermitian 2 × 2 matrix.
pub fn parse_hamiltonian(input: &str) -> Result<Array2<Complex64>> {
    if input.trim().is_empty() {
        return Err(ham_error("expression is empty"));
    }

    let (_, terms) = all_consuming(ws(parse_expression))(input).map_err(|e| match e {
        nom::Err::Error(err) | nom::Err::Failure(err) => {
            ham_error(format!("cannot parse '{}' at '{}'", input, err.input))
        }
        nom::Err::Incomplete(_) => ham_error(format!("'{}' is incomplete", input)),
    })?;
    let matrix = evaluate(&terms)?;

    let deviation = (&matrix - &conjugate_transpose(&matrix))
        .iter()
        .map(|z| z.norm())
        .fold(0.0f64, f64::max);
    if deviation > HERMITIAN_TOLERANCE {
        return Err(ham_error(format!(
            "'{}' is not Hermitian (max |H - H†| = {:.2e})",
            input, deviation
        )));
    }

    Ok(matrix)
}
