//! The parameter type algebra and function fragment model.
//!
//! `ParamType` is shared by both the inferencer and the prettifier: the
//! inferencer only ever produces the five "raw" variants (`Uint256`,
//! `Bytes32`, `Bytes`, `Tuple`, `Array`); `Address`, `FixedBytes` and
//! `String` are introduced exclusively by [`crate::prettify`].

use std::fmt;

/// A parameter type, either as emitted by the shape search or refined by
/// the prettifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// A 32-byte word treated as an unsigned integer.
    Uint256,
    /// A 32-byte word whose meaning could not be narrowed further.
    Bytes32,
    /// A variable-length byte blob.
    Bytes,
    /// A 20-byte address, recovered by the prettifier from a `Bytes32`.
    Address,
    /// A fixed-width byte vector narrower than 32 bytes, 1-32.
    FixedBytes(u8),
    /// A UTF-8 string, recovered by the prettifier from `Bytes`.
    String,
    /// A tuple (struct) of parameters.
    Tuple(Vec<ParamType>),
    /// A variable-length array of a single element type.
    Array(Box<ParamType>),
}

impl ParamType {
    /// Collapses a single-element list to its sole member, otherwise wraps
    /// it in a tuple. Used when an array element's shape is derived from a
    /// decoded tuple of field types.
    pub fn collapse_singleton(mut fields: Vec<ParamType>) -> ParamType {
        if fields.len() == 1 {
            fields.pop().unwrap()
        } else {
            ParamType::Tuple(fields)
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Uint256 => write!(f, "uint256"),
            ParamType::Bytes32 => write!(f, "bytes32"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::Address => write!(f, "address"),
            ParamType::FixedBytes(n) => write!(f, "bytes{}", n),
            ParamType::String => write!(f, "string"),
            ParamType::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, ")")
            }
            ParamType::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

/// A guessed function fragment: a cosmetic name plus the recovered
/// parameter list. Only the parameter list carries semantic weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionFragment {
    pub name: String,
    pub inputs: Vec<ParamType>,
}

impl fmt::Display for FunctionFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

impl FunctionFragment {
    /// Builds the synthetic `guessed_<hex selector>` fragment name.
    pub fn guessed_name(selector: &[u8; 4]) -> String {
        format!("guessed_{}", hex::encode(selector))
    }
}
