//! The reference ABI decoder used as a validation oracle.
//!
//! The inferencer proposes candidate parameter lists made only of the
//! five "raw" shapes (`uint256`, `bytes32`, `bytes`, tuples and arrays of
//! these). This module decodes a buffer against such a candidate and
//! rejects it if any offset or length is inconsistent with the buffer,
//! without caring how the candidate was derived. An implementer could
//! substitute a different decoder as long as it honors the same
//! offset/length bounds checking.
//!
//! # Docs consulted
//!
//! - Solidity ABI Specification

use crate::types::ParamType;
use crate::word::read_word;
use std::fmt;

/// Interprets a 32-byte word as a `usize`, taking the low 8 bytes
/// big-endian. Matches the convention of treating offset/length words as
/// small integers even though the ABI formally widens them to 256 bits.
fn word_to_usize(word: &[u8; 32]) -> u64 {
    u64::from_be_bytes(word[24..32].try_into().unwrap())
}

/// Maximum number of elements accepted in one array (prevents DoS via a
/// huge claimed length on a tiny buffer).
const MAX_ELEMENTS: usize = 4096;

/// Maximum recursion depth through nested tuples/arrays.
const MAX_DEPTH: usize = 16;

/// Reasons the oracle rejected a candidate parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleError {
    /// Buffer too short to contain a word the candidate requires.
    DataTooShort,
    /// An offset word did not point to a valid location in the buffer.
    InvalidOffset,
    /// A length word claimed more data than the buffer holds.
    InvalidLength,
    /// An array claimed more elements than is plausible.
    TooManyElements,
    /// Nesting exceeded the recursion guard.
    NestingTooDeep,
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::DataTooShort => write!(f, "data too short"),
            OracleError::InvalidOffset => write!(f, "invalid offset"),
            OracleError::InvalidLength => write!(f, "invalid length"),
            OracleError::TooManyElements => write!(f, "too many elements"),
            OracleError::NestingTooDeep => write!(f, "nesting too deep"),
        }
    }
}

impl std::error::Error for OracleError {}

/// The reduced type algebra the oracle understands: exactly the shapes
/// the inferencer ever proposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleType {
    Uint256,
    Bytes32,
    Bytes,
    Tuple(Vec<OracleType>),
    Array(Box<OracleType>),
}

impl OracleType {
    fn is_dynamic(&self) -> bool {
        match self {
            OracleType::Uint256 | OracleType::Bytes32 => false,
            OracleType::Bytes | OracleType::Array(_) => true,
            OracleType::Tuple(fields) => fields.iter().any(|f| f.is_dynamic()),
        }
    }

    fn head_size(&self) -> usize {
        if self.is_dynamic() {
            32
        } else {
            match self {
                OracleType::Tuple(fields) => fields.iter().map(|f| f.head_size()).sum(),
                _ => 32,
            }
        }
    }
}

/// A decoded value, mirroring [`OracleType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleValue {
    Uint256([u8; 32]),
    Bytes32([u8; 32]),
    Bytes(Vec<u8>),
    Tuple(Vec<OracleValue>),
    Array(Vec<OracleValue>),
}

/// Converts a candidate parameter list into the oracle's reduced
/// algebra. Returns `None` if a prettified-only variant (`Address`,
/// `FixedBytes`, `String`) is present, since the oracle is only ever
/// consulted before prettification runs.
pub fn to_oracle_type(param: &ParamType) -> Option<OracleType> {
    Some(match param {
        ParamType::Uint256 => OracleType::Uint256,
        ParamType::Bytes32 => OracleType::Bytes32,
        ParamType::Bytes => OracleType::Bytes,
        ParamType::Tuple(fields) => {
            let mut out = Vec::with_capacity(fields.len());
            for field in fields {
                out.push(to_oracle_type(field)?);
            }
            OracleType::Tuple(out)
        }
        ParamType::Array(elem) => OracleType::Array(Box::new(to_oracle_type(elem)?)),
        ParamType::Address | ParamType::FixedBytes(_) | ParamType::String => return None,
    })
}

/// Reference ABI decoder, used only to validate candidates produced by
/// the inferencer.
pub struct ReferenceOracle;

impl ReferenceOracle {
    /// Decodes `buf` under `types`, returning the full value tree or the
    /// first inconsistency encountered.
    pub fn decode(types: &[OracleType], buf: &[u8]) -> Result<Vec<OracleValue>, OracleError> {
        Self::decode_tuple(buf, types, 0)
    }

    fn decode_tuple(
        data: &[u8],
        types: &[OracleType],
        depth: usize,
    ) -> Result<Vec<OracleValue>, OracleError> {
        if depth > MAX_DEPTH {
            return Err(OracleError::NestingTooDeep);
        }
        let mut offset = 0usize;
        let mut values = Vec::with_capacity(types.len());
        for ty in types {
            values.push(Self::decode_value(data, &mut offset, ty, depth)?);
        }
        Ok(values)
    }

    fn decode_value(
        data: &[u8],
        offset: &mut usize,
        ty: &OracleType,
        depth: usize,
    ) -> Result<OracleValue, OracleError> {
        if depth > MAX_DEPTH {
            return Err(OracleError::NestingTooDeep);
        }
        match ty {
            OracleType::Uint256 => {
                let word = read_word(data, *offset).ok_or(OracleError::DataTooShort)?;
                *offset += 32;
                Ok(OracleValue::Uint256(word))
            }
            OracleType::Bytes32 => {
                let word = read_word(data, *offset).ok_or(OracleError::DataTooShort)?;
                *offset += 32;
                Ok(OracleValue::Bytes32(word))
            }
            OracleType::Bytes => {
                let data_offset = Self::read_offset(data, offset)?;
                let bytes = Self::read_dynamic_bytes(data, data_offset)?;
                Ok(OracleValue::Bytes(bytes))
            }
            OracleType::Array(inner) => {
                let data_offset = Self::read_offset(data, offset)?;
                let values = Self::decode_dynamic_array(data, data_offset, inner, depth + 1)?;
                Ok(OracleValue::Array(values))
            }
            OracleType::Tuple(fields) => {
                if fields.iter().any(|f| f.is_dynamic()) {
                    let data_offset = Self::read_offset(data, offset)?;
                    let values = Self::decode_tuple(&data[data_offset..], fields, depth + 1)?;
                    Ok(OracleValue::Tuple(values))
                } else {
                    let values = Self::decode_tuple(&data[*offset..], fields, depth + 1)?;
                    *offset += fields.iter().map(|f| f.head_size()).sum::<usize>();
                    Ok(OracleValue::Tuple(values))
                }
            }
        }
    }

    fn read_offset(data: &[u8], offset: &mut usize) -> Result<usize, OracleError> {
        let word = read_word(data, *offset).ok_or(OracleError::DataTooShort)?;
        *offset += 32;
        let value = word_to_usize(&word);
        if value as usize >= data.len() {
            return Err(OracleError::InvalidOffset);
        }
        Ok(value as usize)
    }

    fn read_dynamic_bytes(data: &[u8], offset: usize) -> Result<Vec<u8>, OracleError> {
        let len_word = read_word(data, offset).ok_or(OracleError::DataTooShort)?;
        let len = word_to_usize(&len_word) as usize;
        let data_start = offset + 32;
        let data_end = data_start.checked_add(len).ok_or(OracleError::InvalidLength)?;
        if data_end > data.len() {
            return Err(OracleError::DataTooShort);
        }
        Ok(data[data_start..data_end].to_vec())
    }

    fn decode_dynamic_array(
        data: &[u8],
        offset: usize,
        inner: &OracleType,
        depth: usize,
    ) -> Result<Vec<OracleValue>, OracleError> {
        let len_word = read_word(data, offset).ok_or(OracleError::DataTooShort)?;
        let len = word_to_usize(&len_word) as usize;
        if len > MAX_ELEMENTS {
            return Err(OracleError::TooManyElements);
        }
        if offset + 32 > data.len() {
            return Err(OracleError::DataTooShort);
        }
        let element_data = &data[offset + 32..];
        let mut elem_offset = 0usize;
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(Self::decode_value(element_data, &mut elem_offset, inner, depth)?);
        }
        Ok(values)
    }
}
