// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The register expression language used by `when` guards.
//!
//! A register expression is a sequence of whitespace-separated tokens of
//! three shapes:
//!
//! - an **operand reference**, `<register_key>.<field>`, where `field` is
//!   one of `changed`, `stdout`, `stderr`, `exit_code`;
//! - an **operator**, one of `eq`, `neq`, `and`, `or`;
//! - any other bare token, a **literal** string value (so
//!   `myreg.stdout eq ready` compares `myreg`'s stdout against the literal
//!   text `ready`).
//!
//! Example: `a1b2c3.changed eq true and a1b2c3.exit_code eq 0`.
//!
//! Tokens are pushed onto a stack in order as they're read (operand
//! references are resolved against the store immediately, so the stack
//! only ever holds string values and operators). Once every token is
//! pushed, the stack is collapsed by repeatedly popping three items —
//! `(op_right, op, op_left)`, in that order, since the stack top is the
//! rightmost operand — applying the operator, and pushing the boolean
//! result back as `"true"`/`"false"`. Collapse continues until exactly one
//! value remains, which must parse as a boolean.
//!
//! This has **no operator precedence or grouping**: it is a flat,
//! right-associative-looking reduction, not a left-to-right fold of binary
//! comparisons. `a eq b and c eq d or e eq f` does not evaluate as
//! `((a eq b) and (c eq d)) or (e eq f)` — the rightmost triple collapses
//! first, then the fold works outward, so an `and`/`or` is applied against
//! the literal or operand immediately to its left, not against the result
//! of the clause that literal nominally belongs to. Intentional — configs
//! in the wild depend on this exact reduction order, so it's kept rather
//! than "fixed" into a conventional left-to-right boolean fold.

use crate::register::RegisterStore;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterExprError {
    #[error("empty register expression")]
    Empty,
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("invalid register field \"{0}\"")]
    UnknownField(String),
    #[error("register not found: {0}")]
    RegisterNotFound(String),
    #[error("malformed expression: {0}")]
    MalformedClause(String),
    #[error("expression did not reduce to a boolean: {0}")]
    NonBooleanResult(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Neq,
    And,
    Or,
}

enum StackItem {
    Operand(String),
    Op(Op),
}

fn resolve_operand_ref(store: &RegisterStore, token: &str) -> Result<String, RegisterExprError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(RegisterExprError::MalformedToken(token.to_string()));
    }
    let (key, field) = (parts[0], parts[1]);
    let register = store
        .get(key)
        .ok_or_else(|| RegisterExprError::RegisterNotFound(key.to_string()))?;
    Ok(match field {
        "changed" => register.changed.to_string(),
        "stdout" => register.stdout,
        "stderr" => register.stderr,
        "exit_code" => register.exit_code.to_string(),
        other => return Err(RegisterExprError::UnknownField(other.to_string())),
    })
}

fn parse_bool_lossy(s: &str) -> bool {
    s == "true"
}

fn apply(op: Op, left: &str, right: &str) -> bool {
    match op {
        Op::Eq => left == right,
        Op::Neq => left != right,
        Op::And => parse_bool_lossy(left) && parse_bool_lossy(right),
        Op::Or => parse_bool_lossy(left) || parse_bool_lossy(right),
    }
}

/// Evaluate a register expression against the current contents of `store`.
pub fn evaluate(expr: &str, store: &RegisterStore) -> Result<bool, RegisterExprError> {
    let tokens: Vec<&str> = expr.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(RegisterExprError::Empty);
    }

    let mut stack: Vec<StackItem> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let item = match token {
            "eq" => StackItem::Op(Op::Eq),
            "neq" => StackItem::Op(Op::Neq),
            "and" => StackItem::Op(Op::And),
            "or" => StackItem::Op(Op::Or),
            _ if token.contains('.') => StackItem::Operand(resolve_operand_ref(store, token)?),
            literal => StackItem::Operand(literal.to_string()),
        };
        stack.push(item);
    }

    while stack.len() > 1 {
        if stack.len() < 3 {
            return Err(RegisterExprError::MalformedClause(
                "not enough tokens to form a clause".to_string(),
            ));
        }
        let malformed = || {
            RegisterExprError::MalformedClause("not enough tokens to form a clause".to_string())
        };
        let op_right = stack.pop().ok_or_else(malformed)?;
        let op = stack.pop().ok_or_else(malformed)?;
        let op_left = stack.pop().ok_or_else(malformed)?;

        let op = match op {
            StackItem::Op(op) => op,
            StackItem::Operand(s) => {
                return Err(RegisterExprError::MalformedClause(format!(
                    "expected operator, found \"{s}\""
                )))
            }
        };
        let left = match op_left {
            StackItem::Operand(s) => s,
            StackItem::Op(_) => {
                return Err(RegisterExprError::MalformedClause(
                    "expected operand, found operator".to_string(),
                ))
            }
        };
        let right = match op_right {
            StackItem::Operand(s) => s,
            StackItem::Op(_) => {
                return Err(RegisterExprError::MalformedClause(
                    "expected operand, found operator".to_string(),
                ))
            }
        };

        stack.push(StackItem::Operand(apply(op, &left, &right).to_string()));
    }

    match stack.pop() {
        Some(StackItem::Operand(s)) if s == "true" => Ok(true),
        Some(StackItem::Operand(s)) if s == "false" => Ok(false),
        Some(StackItem::Operand(s)) => Err(RegisterExprError::NonBooleanResult(s)),
        Some(StackItem::Op(_)) => Err(RegisterExprError::MalformedClause(
            "expression reduced to a bare operator".to_string(),
        )),
        None => Err(RegisterExprError::Empty),
    }
}

#[cfg(test)]
#[path = "register_expr_tests.rs"]
mod tests;
