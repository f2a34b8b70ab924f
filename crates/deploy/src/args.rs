//! Constructor arguments and their ABI encoding.

use alloy_core::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use serde::{Deserialize, Serialize};

/// A single constructor argument.
///
/// The protocol's constructors only take addresses and unsigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "value")]
pub enum ConstructorArg {
    Address(Address),
    Uint(U256),
}

impl ConstructorArg {
    pub fn uint(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }

    fn to_sol_value(self) -> DynSolValue {
        match self {
            Self::Address(address) => DynSolValue::Address(address),
            Self::Uint(value) => DynSolValue::Uint(value, 256),
        }
    }
}

impl From<Address> for ConstructorArg {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

/// ABI-encode `args` as constructor parameters, ready to be appended to
/// creation bytecode.
pub fn encode_constructor_args(args: &[ConstructorArg]) -> Vec<u8> {
    if args.is_empty() {
        return Vec::new();
    }
    let values = args.iter().map(|arg| arg.to_sol_value()).collect();
    DynSolValue::Tuple(values).abi_encode_params()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::address;

    #[test]
    fn test_empty_args_encode_to_nothing() {
        assert!(encode_constructor_args(&[]).is_empty());
    }

    #[test]
    fn test_static_args_are_one_word_each() {
        let owner = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let encoded = encode_constructor_args(&[owner.into(), ConstructorArg::uint(80001)]);

        assert_eq!(encoded.len(), 64);
        assert_eq!(
            hex::encode(&encoded[..32]),
            "00000000000000000000000070997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
        assert_eq!(
            hex::encode(&encoded[32..]),
            "0000000000000000000000000000000000000000000000000000000000013881"
        );
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let json = serde_json::to_value(ConstructorArg::uint(5)).unwrap();
        assert_eq!(json["type"], "uint");
    }
}
