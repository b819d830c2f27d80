// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Typed transaction arguments and their JSON-Cadence encoding.
//!
//! Every operation declares an ordered parameter schema made of
//! [`ParamType`]s. Callers supply [`Value`]s, which are checked against the
//! schema before anything is sent to the ledger.

use std::fmt;

use serde_json::json;

use crate::operation::{OperationDescriptor, Param};
use crate::{Address, ArgumentError, UFix64};

/// The declared type of a transaction parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Cadence `String`
    String,
    /// Cadence `Address`
    Address,
    /// Cadence `UInt32`
    UInt32,
    /// Cadence `UFix64`
    UFix64,
    /// Cadence optional of the inner type
    Optional(&'static ParamType),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "String"),
            Self::Address => write!(f, "Address"),
            Self::UInt32 => write!(f, "UInt32"),
            Self::UFix64 => write!(f, "UFix64"),
            Self::Optional(inner) => write!(f, "{inner}?"),
        }
    }
}

/// A typed argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A string
    String(String),
    /// An account address
    Address(Address),
    /// A 32-bit unsigned integer
    UInt32(u32),
    /// A fixed-point amount
    UFix64(UFix64),
    /// An optional value, `None` encodes as `nil`
    Optional(Option<Box<Value>>),
}

impl Value {
    /// Returns `true` if the value can be passed for a parameter of type
    /// `ty`
    pub fn matches(&self, ty: &ParamType) -> bool {
        match (self, ty) {
            (Self::String(_), ParamType::String)
            | (Self::Address(_), ParamType::Address)
            | (Self::UInt32(_), ParamType::UInt32)
            | (Self::UFix64(_), ParamType::UFix64)
            | (Self::Optional(None), ParamType::Optional(_)) => true,
            (Self::Optional(Some(value)), ParamType::Optional(inner)) => {
                value.matches(inner)
            }
            _ => false,
        }
    }

    /// Describes the type of the value, used in error messages
    pub fn type_name(&self) -> String {
        match self {
            Self::String(_) => "String".into(),
            Self::Address(_) => "Address".into(),
            Self::UInt32(_) => "UInt32".into(),
            Self::UFix64(_) => "UFix64".into(),
            Self::Optional(None) => "nil".into(),
            Self::Optional(Some(value)) => format!("{}?", value.type_name()),
        }
    }

    /// Returns the JSON-Cadence representation of the value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => json!({ "type": "String", "value": s }),
            Self::Address(a) => {
                json!({ "type": "Address", "value": a.to_string() })
            }
            Self::UInt32(n) => {
                json!({ "type": "UInt32", "value": n.to_string() })
            }
            Self::UFix64(n) => {
                json!({ "type": "UFix64", "value": n.to_string() })
            }
            Self::Optional(value) => json!({
                "type": "Optional",
                "value": value.as_ref().map(|v| v.to_json()),
            }),
        }
    }

    /// Returns the JSON-Cadence encoded bytes sent to the ledger
    pub fn encode(&self) -> Vec<u8> {
        // serializing a `serde_json::Value` cannot fail
        serde_json::to_vec(&self.to_json()).unwrap_or_default()
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::UInt32(n)
    }
}

impl From<UFix64> for Value {
    fn from(n: UFix64) -> Self {
        Self::UFix64(n)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Self::Optional(value.map(|v| Box::new(v.into())))
    }
}

/// Checks `args` against the parameter schema of `descriptor`: the count
/// first, then every value against its declared type, in order.
pub fn validate(
    descriptor: &OperationDescriptor,
    args: &[Value],
) -> Result<(), ArgumentError> {
    if args.len() != descriptor.params.len() {
        return Err(ArgumentError::Arity {
            operation: descriptor.name,
            expected: descriptor.params.len(),
            actual: args.len(),
        });
    }

    for (Param { name, ty }, value) in descriptor.params.iter().zip(args) {
        if !value.matches(ty) {
            return Err(ArgumentError::Type {
                operation: descriptor.name,
                param: *name,
                expected: *ty,
                actual: value.type_name(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operation;

    #[test]
    fn json_cadence() {
        let amount: UFix64 = "10.0".parse().unwrap();
        assert_eq!(
            Value::from(amount).to_json(),
            json!({ "type": "UFix64", "value": "10.00000000" })
        );
        assert_eq!(
            Value::from(Some(5u32)).to_json(),
            json!({
                "type": "Optional",
                "value": { "type": "UInt32", "value": "5" }
            })
        );
        assert_eq!(
            Value::from(None::<u32>).to_json(),
            json!({ "type": "Optional", "value": null })
        );
        let addr: Address = "0x01".parse().unwrap();
        assert_eq!(
            Value::from(addr).to_json(),
            json!({ "type": "Address", "value": "0x0000000000000001" })
        );
    }

    #[test]
    fn optional_matching() {
        let ty = ParamType::Optional(&ParamType::UInt32);
        assert!(Value::from(Some(1u32)).matches(&ty));
        assert!(Value::from(None::<u32>).matches(&ty));
        assert!(!Value::from(Some("1")).matches(&ty));
        assert!(!Value::from(1u32).matches(&ty));
        assert_eq!(ty.to_string(), "UInt32?");
    }

    #[test]
    fn validate_schema() {
        let descriptor = Operation::RegisterDelegator.descriptor();
        let amount: UFix64 = "1.5".parse().unwrap();

        validate(descriptor, &["node1".into(), amount.into()]).unwrap();

        let err = validate(descriptor, &["node1".into()]).unwrap_err();
        assert!(matches!(
            err,
            ArgumentError::Arity {
                expected: 2,
                actual: 1,
                ..
            }
        ));

        let err =
            validate(descriptor, &[amount.into(), "node1".into()]).unwrap_err();
        assert!(matches!(
            err,
            ArgumentError::Type {
                param: "id",
                expected: ParamType::String,
                ..
            }
        ));
    }
}
