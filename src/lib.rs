//! Reconstructs a plausible function signature from raw Ethereum
//! transaction calldata with no prior knowledge of the target contract's
//! ABI.
//!
//! Given a 4-byte selector and an ABI-encoded argument tuple, this crate
//! runs a backtracking search over the 32-byte head words to guess which
//! slots are static scalars and which are pointers into dynamic tails,
//! recursively resolving each tail, and validates every candidate shape
//! against a reference ABI decoder before accepting it.
//!
//! # Security
//!
//! All parsing operates on untrusted input. The search:
//! - Validates every offset and length against the buffer before use
//! - Is bounded in recursion depth and head size (see `infer`'s guards)
//! - Fails closed: an input with no consistent shape returns `None`,
//!   never a partial or best-effort guess
//!
//! # Supported Types
//!
//! Recovered shapes: `uint256`, `bytes32`/`bytesN`, `address`, `bytes`,
//! `string`, tuples, and dynamic arrays. See the crate documentation's
//! Non-goals: parameter names, signed/narrow integers, fixed-length
//! arrays, and malformed/packed encodings are out of scope.
//!
//! # Docs consulted
//!
//! - Solidity ABI Specification

mod infer;
mod oracle;
mod prettify;
mod types;
mod word;

pub use oracle::{OracleError, OracleType, OracleValue, ReferenceOracle};
pub use types::{FunctionFragment, ParamType};

use log::{debug, trace};

/// Attempts to recover a function fragment from raw calldata.
///
/// Returns `None` if `calldata` is shorter than a selector, or if no
/// consistent parameter list can be found and oracle-validated.
pub fn guess_fragment(calldata: &[u8]) -> Option<FunctionFragment> {
    if calldata.len() < 4 {
        trace!("guess_fragment: calldata shorter than a selector");
        return None;
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&calldata[..4]);
    let args = &calldata[4..];

    let candidate = infer::infer_tuple(args, None, 0)?;
    debug!(
        "guess_fragment: inferencer accepted a {}-parameter shape for selector {}",
        candidate.len(),
        hex::encode(selector)
    );

    let oracle_types: Vec<_> = candidate
        .iter()
        .map(oracle::to_oracle_type)
        .collect::<Option<_>>()?;
    let values = ReferenceOracle::decode(&oracle_types, args).ok()?;

    let inputs: Vec<ParamType> = candidate
        .iter()
        .zip(&values)
        .map(|(param, value)| prettify::prettify(param, value))
        .collect();

    Some(FunctionFragment {
        name: FunctionFragment::guessed_name(&selector),
        inputs,
    })
}
