// src/blockchain/abi.rs
//
// Parameter normalization and call-data encoding for read-only contract calls.
// Only scalar ABI types are supported: uintN, intN, address, bool, string, bytes, bytesN.

use std::str::FromStr;

use ethers_core::abi::{encode, ParamType, Token};
use ethers_core::types::{Address, U256};
use ethers_core::utils::keccak256;

use crate::blockchain::models::{EncodingError, NormalizedParam, ParameterError};

/// Token in a contract's `params` template that stands for the wallet being checked.
pub const USER_ADDRESS_PLACEHOLDER: &str = "{user_address}";

/// Replaces the wallet placeholder, leaving every other token untouched.
pub fn substitute_placeholder<'a>(token: &'a str, user_address: &'a str) -> &'a str {
    if token == USER_ADDRESS_PLACEHOLDER {
        user_address
    } else {
        token
    }
}

/// Casts a textual parameter to the representation its ABI type requires.
///
/// - `uint*` / `int*`: integer literal, decimal or `0x`/`0o`/`0b` prefixed
/// - `address`: lower-cased, not validated
/// - `bool`: true iff `"true"` or `"1"` (case-insensitive)
/// - anything else: passed through unchanged
pub fn normalize_param(value: &str, abi_type: &str) -> Result<NormalizedParam, ParameterError> {
    if abi_type.starts_with("uint") || abi_type.starts_with("int") {
        return parse_integer_literal(value, abi_type);
    }
    match abi_type {
        "address" => Ok(NormalizedParam::Address(value.to_lowercase())),
        "bool" => {
            let v = value.to_lowercase();
            Ok(NormalizedParam::Bool(v == "true" || v == "1"))
        }
        _ => Ok(NormalizedParam::Raw(value.to_string())),
    }
}

fn parse_integer_literal(value: &str, abi_type: &str) -> Result<NormalizedParam, ParameterError> {
    let invalid = || ParameterError::InvalidInteger {
        value: value.to_string(),
        abi_type: abi_type.to_string(),
    };

    let s = value.trim();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let lower = s.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest.strip_prefix('_').unwrap_or(rest))
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest.strip_prefix('_').unwrap_or(rest))
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest.strip_prefix('_').unwrap_or(rest))
    } else {
        (10, lower.as_str())
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return Err(invalid());
    }
    // decimal literals with leading zeros are only valid when the value is zero
    if radix == 10 && digits.starts_with('0') && digits.chars().any(|c| c != '0' && c != '_') {
        return Err(invalid());
    }

    if !digits.chars().all(|c| c == '_' || c.is_digit(radix)) {
        return Err(invalid());
    }

    let overflow = || ParameterError::IntegerOverflow {
        value: value.to_string(),
    };
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let significant = cleaned.trim_start_matches('0');
    let magnitude = match radix {
        _ if significant.is_empty() => U256::zero(),
        10 | 16 => U256::from_str_radix(significant, radix).map_err(|_| overflow())?,
        // uint only parses decimal and hex; octal and binary digits map onto whole bits
        _ => {
            let bits_per_digit = radix.trailing_zeros() as usize;
            let digit_values: Vec<u32> =
                significant.chars().filter_map(|c| c.to_digit(radix)).collect();
            let leading_bits = digit_values.first().map_or(0, |d| 32 - d.leading_zeros() as usize);
            if leading_bits + (digit_values.len() - 1) * bits_per_digit > 256 {
                return Err(overflow());
            }
            digit_values
                .into_iter()
                .fold(U256::zero(), |acc, d| (acc << bits_per_digit) | U256::from(d))
        }
    };

    Ok(NormalizedParam::Integer {
        negative: negative && !magnitude.is_zero(),
        magnitude,
    })
}

/// Canonical function signature, e.g. `claimableTokens(address)`.
pub fn function_signature(method: &str, input_types: &[String]) -> String {
    format!("{}({})", method, input_types.join(","))
}

/// First four bytes of the keccak256 hash of the signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&keccak256(signature.as_bytes())[0..4]);
    sel
}

/// Builds `0x`-prefixed call data: selector followed by the ABI-encoded arguments.
pub fn encode_call(
    method: &str,
    input_types: &[String],
    params: &[NormalizedParam],
) -> Result<String, EncodingError> {
    if input_types.len() != params.len() {
        return Err(EncodingError::LengthMismatch {
            expected: input_types.len(),
            got: params.len(),
        });
    }

    let tokens = input_types
        .iter()
        .zip(params)
        .map(|(ty, param)| to_token(ty, param))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = selector(&function_signature(method, input_types)).to_vec();
    out.extend(encode(&tokens));
    Ok(format!("0x{}", hex::encode(out)))
}

fn parse_scalar_type(abi_type: &str) -> Result<ParamType, EncodingError> {
    let unsupported = || EncodingError::UnsupportedType(abi_type.to_string());

    let bit_width = |suffix: &str| -> Result<usize, EncodingError> {
        if suffix.is_empty() {
            return Ok(256);
        }
        match suffix.parse::<usize>() {
            Ok(n) if n > 0 && n <= 256 && n % 8 == 0 => Ok(n),
            _ => Err(unsupported()),
        }
    };

    match abi_type {
        "address" => Ok(ParamType::Address),
        "bool" => Ok(ParamType::Bool),
        "string" => Ok(ParamType::String),
        "bytes" => Ok(ParamType::Bytes),
        t if t.starts_with("uint") => Ok(ParamType::Uint(bit_width(&t[4..])?)),
        t if t.starts_with("int") => Ok(ParamType::Int(bit_width(&t[3..])?)),
        t if t.starts_with("bytes") => match t[5..].parse::<usize>() {
            Ok(n) if (1..=32).contains(&n) => Ok(ParamType::FixedBytes(n)),
            _ => Err(unsupported()),
        },
        _ => Err(unsupported()),
    }
}

fn to_token(abi_type: &str, param: &NormalizedParam) -> Result<Token, EncodingError> {
    let mismatch = || EncodingError::TypeMismatch {
        abi_type: abi_type.to_string(),
        value: param.to_string(),
    };
    let out_of_range = || EncodingError::OutOfRange {
        abi_type: abi_type.to_string(),
        value: param.to_string(),
    };

    match (parse_scalar_type(abi_type)?, param) {
        (ParamType::Uint(bits), NormalizedParam::Integer { negative, magnitude }) => {
            if *negative || magnitude.bits() > bits {
                return Err(out_of_range());
            }
            Ok(Token::Uint(*magnitude))
        }
        (ParamType::Int(bits), NormalizedParam::Integer { negative, magnitude }) => {
            let limit = U256::one() << (bits - 1);
            let in_range = if *negative {
                *magnitude <= limit
            } else {
                *magnitude < limit
            };
            if !in_range {
                return Err(out_of_range());
            }
            // two's complement over the full 256-bit word
            let raw = if *negative {
                U256::zero().overflowing_sub(*magnitude).0
            } else {
                *magnitude
            };
            Ok(Token::Int(raw))
        }
        (ParamType::Address, NormalizedParam::Address(s) | NormalizedParam::Raw(s)) => {
            Address::from_str(s)
                .map(Token::Address)
                .map_err(|_| EncodingError::InvalidAddress(s.clone()))
        }
        (ParamType::Bool, NormalizedParam::Bool(b)) => Ok(Token::Bool(*b)),
        (ParamType::String, NormalizedParam::Raw(s)) => Ok(Token::String(s.clone())),
        (ParamType::Bytes, NormalizedParam::Raw(s)) => Ok(Token::Bytes(decode_hex(abi_type, s)?)),
        (ParamType::FixedBytes(n), NormalizedParam::Raw(s)) => {
            let bytes = decode_hex(abi_type, s)?;
            if bytes.len() > n {
                return Err(out_of_range());
            }
            Ok(Token::FixedBytes(bytes))
        }
        _ => Err(mismatch()),
    }
}

fn decode_hex(abi_type: &str, s: &str) -> Result<Vec<u8>, EncodingError> {
    let invalid = || EncodingError::InvalidBytes {
        abi_type: abi_type.to_string(),
        value: s.to_string(),
    };
    let body = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    hex::decode(body).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0xAbC1230000000000000000000000000000000Def";

    fn types(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_normalize_integers() {
        assert_eq!(normalize_param("0x10", "uint256").unwrap(), NormalizedParam::uint(16));
        assert_eq!(normalize_param("0X0A", "int8").unwrap(), NormalizedParam::uint(10));
        assert_eq!(normalize_param("1_000", "uint64").unwrap(), NormalizedParam::uint(1000));
        assert_eq!(normalize_param("0b101", "uint8").unwrap(), NormalizedParam::uint(5));
        assert_eq!(normalize_param("0o17", "uint8").unwrap(), NormalizedParam::uint(15));
        assert_eq!(normalize_param(" 42 ", "uint256").unwrap(), NormalizedParam::uint(42));
        assert_eq!(
            normalize_param("-5", "int256").unwrap(),
            NormalizedParam::Integer {
                negative: true,
                magnitude: U256::from(5u64)
            }
        );
        assert_eq!(normalize_param("-0", "int256").unwrap(), NormalizedParam::uint(0));
        assert_eq!(normalize_param("0x0000", "uint8").unwrap(), NormalizedParam::uint(0));
        assert_eq!(
            normalize_param(&U256::MAX.to_string(), "uint256").unwrap(),
            NormalizedParam::Integer {
                negative: false,
                magnitude: U256::MAX
            }
        );
        assert_eq!(
            normalize_param(&format!("0b1{}", "0".repeat(255)), "uint256").unwrap(),
            NormalizedParam::Integer {
                negative: false,
                magnitude: U256::one() << 255
            }
        );
        assert_eq!(
            normalize_param(&format!("0x{}", "0".repeat(70)), "uint256").unwrap(),
            NormalizedParam::uint(0)
        );
    }

    #[test]
    fn test_normalize_rejects_bad_integers() {
        for bad in ["", "abc", "0x", "12ab", "1__0", "_1", "010", "0xZZ"] {
            assert!(
                matches!(
                    normalize_param(bad, "uint256"),
                    Err(ParameterError::InvalidInteger { .. })
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
        let too_big = format!("0x1{}", "0".repeat(64));
        assert!(matches!(
            normalize_param(&too_big, "uint256"),
            Err(ParameterError::IntegerOverflow { .. })
        ));
        let too_big_dec = format!("{}0", U256::MAX);
        assert!(matches!(
            normalize_param(&too_big_dec, "uint256"),
            Err(ParameterError::IntegerOverflow { .. })
        ));
        let too_big_bin = format!("0b1{}", "0".repeat(256));
        assert!(matches!(
            normalize_param(&too_big_bin, "uint256"),
            Err(ParameterError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            normalize_param("0o9", "uint256"),
            Err(ParameterError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_normalize_address_bool_and_passthrough() {
        assert_eq!(
            normalize_param("AbC123", "address").unwrap(),
            NormalizedParam::Address("abc123".to_string())
        );
        assert_eq!(normalize_param("True", "bool").unwrap(), NormalizedParam::Bool(true));
        assert_eq!(normalize_param("1", "bool").unwrap(), NormalizedParam::Bool(true));
        assert_eq!(normalize_param("no", "bool").unwrap(), NormalizedParam::Bool(false));
        assert_eq!(
            normalize_param("Hello", "string").unwrap(),
            NormalizedParam::Raw("Hello".to_string())
        );
    }

    #[test]
    fn test_placeholder_substitution() {
        assert_eq!(substitute_placeholder("{user_address}", WALLET), WALLET);
        assert_eq!(substitute_placeholder("0x1", WALLET), "0x1");
        assert_eq!(substitute_placeholder("{user_address} ", WALLET), "{user_address} ");
    }

    #[test]
    fn test_selector_matches_known_signatures() {
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
    }

    #[test]
    fn test_encode_balance_of() {
        let params = vec![normalize_param(WALLET, "address").unwrap()];
        let data = encode_call("balanceOf", &types(&["address"]), &params).unwrap();
        assert_eq!(
            data,
            "0x70a08231000000000000000000000000abc1230000000000000000000000000000000def"
        );
    }

    #[test]
    fn test_encode_is_deterministic_and_selector_independent_of_params() {
        let tys = types(&["address", "uint256"]);
        let a = vec![
            NormalizedParam::Address("0x0000000000000000000000000000000000000001".into()),
            NormalizedParam::uint(1),
        ];
        let b = vec![
            NormalizedParam::Address("0x0000000000000000000000000000000000000002".into()),
            NormalizedParam::uint(2),
        ];
        let first = encode_call("claim", &tys, &a).unwrap();
        assert_eq!(first, encode_call("claim", &tys, &a).unwrap());

        let other = encode_call("claim", &tys, &b).unwrap();
        assert_ne!(first, other);
        assert_eq!(first[..10], other[..10]);
        assert_eq!(&first[2..10], hex::encode(selector("claim(address,uint256)")));
        assert_eq!(first.len(), 2 + 8 + 2 * 64);
    }

    #[test]
    fn test_encode_signed_and_bool() {
        let data = encode_call(
            "f",
            &types(&["int8", "bool"]),
            &[
                normalize_param("-1", "int8").unwrap(),
                normalize_param("true", "bool").unwrap(),
            ],
        )
        .unwrap();
        let words = &data[10..];
        assert_eq!(&words[..64], "f".repeat(64));
        assert_eq!(&words[64..], format!("{}1", "0".repeat(63)));
    }

    #[test]
    fn test_encode_rejects_incompatible_values() {
        assert!(matches!(
            encode_call("f", &types(&["uint256"]), &[NormalizedParam::Bool(true)]),
            Err(EncodingError::TypeMismatch { .. })
        ));
        assert!(matches!(
            encode_call("f", &types(&["uint8"]), &[NormalizedParam::uint(256)]),
            Err(EncodingError::OutOfRange { .. })
        ));
        assert!(matches!(
            encode_call("f", &types(&["int8"]), &[NormalizedParam::uint(128)]),
            Err(EncodingError::OutOfRange { .. })
        ));
        assert!(matches!(
            encode_call(
                "f",
                &types(&["uint256"]),
                &[normalize_param("-1", "uint256").unwrap()]
            ),
            Err(EncodingError::OutOfRange { .. })
        ));
        assert!(matches!(
            encode_call("f", &types(&["address"]), &[NormalizedParam::Address("abc123".into())]),
            Err(EncodingError::InvalidAddress(_))
        ));
        assert!(matches!(
            encode_call("f", &types(&["uint256[]"]), &[NormalizedParam::Raw("[1]".into())]),
            Err(EncodingError::UnsupportedType(_))
        ));
        assert!(matches!(
            encode_call("f", &types(&["uint256"]), &[]),
            Err(EncodingError::LengthMismatch { expected: 1, got: 0 })
        ));
    }

    #[test]
    fn test_encode_int_boundaries() {
        let min = normalize_param("-128", "int8").unwrap();
        assert!(encode_call("f", &types(&["int8"]), &[min]).is_ok());
        let below = normalize_param("-129", "int8").unwrap();
        assert!(encode_call("f", &types(&["int8"]), &[below]).is_err());
        let max = normalize_param("127", "int8").unwrap();
        assert!(encode_call("f", &types(&["int8"]), &[max]).is_ok());
    }
}
