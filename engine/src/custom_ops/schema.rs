// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use super::value::IValue;
use crate::error::{ExtensionError, Result};
use std::{fmt, str::FromStr};

/// Types an operator schema can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    Tensor,
    Float,
    Int,
    Bool,
}

impl ArgType {
    /// Whether a value of kind `actual` may be passed where `self` is expected
    pub fn accepts(&self, actual: ArgType) -> bool {
        *self == actual || (*self == ArgType::Float && actual == ArgType::Int)
    }
}

impl FromStr for ArgType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Tensor" => Ok(ArgType::Tensor),
            "float" => Ok(ArgType::Float),
            "int" => Ok(ArgType::Int),
            "bool" => Ok(ArgType::Bool),
            other => Err(format!("unknown type '{other}'")),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgType::Tensor => "Tensor",
            ArgType::Float => "float",
            ArgType::Int => "int",
            ArgType::Bool => "bool",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub ty: ArgType,
}

/// Parsed operator signature such as
/// `muladd_cpp(Tensor a, Tensor b, float c) -> Tensor`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpSchema {
    name: String,
    arguments: Vec<Argument>,
    returns: ArgType,
}

impl OpSchema {
    pub fn parse(schema: &str) -> Result<Self> {
        let invalid = |reason: &str| ExtensionError::invalid_schema(schema, reason);

        let (signature, returns) = schema
            .split_once("->")
            .ok_or_else(|| invalid("missing '->' return type"))?;
        let returns = returns.trim().parse::<ArgType>().map_err(|e| invalid(&e))?;

        let signature = signature.trim();
        let (name, rest) = signature
            .split_once('(')
            .ok_or_else(|| invalid("missing '('"))?;
        let params = rest
            .strip_suffix(')')
            .ok_or_else(|| invalid("missing ')' before '->'"))?;

        let name = name.trim();
        if !is_identifier(name) {
            return Err(invalid(&format!("'{name}' is not a valid operator name")));
        }

        let mut arguments: Vec<Argument> = Vec::new();
        if !params.trim().is_empty() {
            for param in params.split(',') {
                let mut parts = param.split_whitespace();
                let (Some(ty), Some(arg_name), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err(invalid(&format!(
                        "argument '{}' must be written as '<type> <name>'",
                        param.trim()
                    )));
                };
                let ty = ty.parse::<ArgType>().map_err(|e| invalid(&e))?;
                if !is_identifier(arg_name) {
                    return Err(invalid(&format!("'{arg_name}' is not a valid argument name")));
                }
                if arguments.iter().any(|a| a.name == arg_name) {
                    return Err(invalid(&format!("duplicate argument '{arg_name}'")));
                }
                arguments.push(Argument {
                    name: arg_name.to_string(),
                    ty,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            arguments,
            returns,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    #[inline]
    pub fn returns(&self) -> ArgType {
        self.returns
    }

    /// Check arity and argument kinds of a call
    pub fn check_args(&self, args: &[IValue]) -> Result<()> {
        if args.len() != self.arguments.len() {
            return Err(ExtensionError::invalid_argument(format!(
                "{}() expected {} arguments, got {}",
                self.name,
                self.arguments.len(),
                args.len()
            )));
        }

        for (param, value) in self.arguments.iter().zip(args) {
            if !param.ty.accepts(value.kind()) {
                return Err(ExtensionError::invalid_argument(format!(
                    "{}(): argument '{}' must be {}, not {}",
                    self.name,
                    param.name,
                    param.ty,
                    value.kind()
                )));
            }
        }

        Ok(())
    }
}

impl FromStr for OpSchema {
    type Err = ExtensionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for OpSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", arg.ty, arg.name)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
