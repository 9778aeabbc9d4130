//! Refines the inferencer's generic output types by inspecting the
//! decoded values: `bytes32` narrows to `address`/`uint256`/`bytesN`,
//! `bytes` narrows to `string`, and per-element refinements across an
//! array are merged back into a single uniform element type.

use crate::oracle::OracleValue;
use crate::types::ParamType;

/// Refines `param` given its decoded `value`, recursing through tuples
/// and arrays. `param` and `value` are assumed to share the shape the
/// inferencer originally produced.
pub fn prettify(param: &ParamType, value: &OracleValue) -> ParamType {
    match (param, value) {
        (ParamType::Bytes32, OracleValue::Bytes32(bytes)) => refine_bytes32(bytes),
        (ParamType::Bytes, OracleValue::Bytes(bytes)) => refine_bytes(bytes),
        (ParamType::Tuple(field_types), OracleValue::Tuple(field_values)) => ParamType::Tuple(
            field_types
                .iter()
                .zip(field_values)
                .map(|(t, v)| prettify(t, v))
                .collect(),
        ),
        (ParamType::Array(elem_type), OracleValue::Array(elements)) => {
            if elements.is_empty() {
                ParamType::Array(elem_type.clone())
            } else {
                let refined = elements.iter().map(|v| prettify(elem_type, v));
                let merged = refined.reduce(|a, b| merge(&a, &b)).unwrap();
                ParamType::Array(Box::new(merged))
            }
        }
        // Uint256/Address/FixedBytes/String never appear pre-prettify; a
        // mismatch here means the value tree and the candidate diverged.
        _ => param.clone(),
    }
}

fn refine_bytes32(bytes: &[u8; 32]) -> ParamType {
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    if (12..=17).contains(&leading_zeros) {
        return ParamType::Address;
    }
    if leading_zeros > 16 {
        return ParamType::Uint256;
    }
    let trailing_zeros = bytes.iter().rev().take_while(|&&b| b == 0).count();
    if trailing_zeros > 0 {
        return ParamType::FixedBytes((32 - trailing_zeros) as u8);
    }
    ParamType::Bytes32
}

fn refine_bytes(bytes: &[u8]) -> ParamType {
    // An empty blob is trivially valid UTF-8 but carries no signal either
    // way; keep it as `bytes` rather than guessing `string`.
    if !bytes.is_empty() && std::str::from_utf8(bytes).is_ok() {
        ParamType::String
    } else {
        ParamType::Bytes
    }
}

/// Merges two refinements of what was originally the same element shape
/// so an array's element type stays uniform. See module docs for the
/// collapse rules.
pub fn merge(a: &ParamType, b: &ParamType) -> ParamType {
    if a == b {
        return a.clone();
    }
    match (a, b) {
        (ParamType::Tuple(xs), ParamType::Tuple(ys)) if xs.len() == ys.len() => {
            ParamType::Tuple(xs.iter().zip(ys).map(|(x, y)| merge(x, y)).collect())
        }
        (ParamType::Array(x), ParamType::Array(y)) => ParamType::Array(Box::new(merge(x, y))),
        (ParamType::String, ParamType::Bytes) | (ParamType::Bytes, ParamType::String) => ParamType::Bytes,
        (ParamType::Uint256, _) | (_, ParamType::Uint256) => ParamType::Uint256,
        _ => ParamType::Bytes32,
    }
}
