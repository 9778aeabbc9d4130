//! The tuple inferencer: a backtracking search over 32-byte head words
//! that classifies each slot as a static scalar or a dynamic pointer,
//! recursively resolves every dynamic tail, and validates the resulting
//! candidate against the reference oracle before accepting it.
//!
//! This is the hard core of the crate. See the module-level test vectors
//! below and `tests/golden_vectors.rs` for worked examples.

use log::{debug, trace};

use crate::oracle::{to_oracle_type, ReferenceOracle};
use crate::types::ParamType;
use crate::word::{probe_length, probe_offset};

/// Recursion guard: refuses to recurse past this many nested
/// tuples/arrays. Defensive only, mirrors the depth guard already used by
/// the reference oracle.
const MAX_DEPTH: usize = 16;

/// Refuses to grow a single head past this many slots. Defensive only;
/// no well-formed calldata produced by a real encoder approaches this.
const MAX_HEAD_SLOTS: usize = 4096;

#[derive(Debug, Clone, Copy)]
enum Slot {
    Static,
    Pointer { offset: usize, length: Option<usize> },
}

/// Attempts to infer the shape of `buf` as a tuple of parameters.
///
/// `mode` constrains slot 0 of this call only: `Some(true)` forbids
/// everything but pointer-with-length, `Some(false)` forbids everything
/// but pointer-without-length, `None` leaves all three branches open.
/// Used by recursive calls deciding between `T[]` and a `T` whose own
/// first field is itself a pointer.
pub fn infer_tuple(buf: &[u8], mode: Option<bool>, depth: usize) -> Option<Vec<ParamType>> {
    if depth > MAX_DEPTH {
        trace!("infer_tuple: depth guard tripped at depth {}", depth);
        return None;
    }
    search(buf, 0, buf.len(), mode, Vec::new(), 0, depth)
}

#[allow(clippy::too_many_arguments)]
fn search(
    buf: &[u8],
    slot_idx: usize,
    end_of_static: usize,
    mode: Option<bool>,
    head: Vec<Slot>,
    min_offset: usize,
    depth: usize,
) -> Option<Vec<ParamType>> {
    if slot_idx > MAX_HEAD_SLOTS {
        trace!("search: head slot guard tripped at slot {}", slot_idx);
        return None;
    }

    let pos = slot_idx * 32;
    if pos >= end_of_static {
        return resolve_tails(buf, &head, depth);
    }

    // The mode constraint only binds slot 0 of *this* call.
    let effective_mode = if slot_idx == 0 { mode } else { None };

    if effective_mode != Some(false) {
        if let Some(off) = probe_offset(buf, pos) {
            if off > min_offset {
                if let Some(len) = probe_length(buf, off) {
                    let mut next_head = head.clone();
                    next_head.push(Slot::Pointer {
                        offset: off,
                        length: Some(len),
                    });
                    let next_end = end_of_static.min(off);
                    if let Some(result) = search(buf, slot_idx + 1, next_end, None, next_head, off, depth) {
                        return Some(result);
                    }
                }
            }
        }
    }

    if effective_mode != Some(true) {
        if let Some(off) = probe_offset(buf, pos) {
            if off > min_offset {
                let mut next_head = head.clone();
                next_head.push(Slot::Pointer { offset: off, length: None });
                let next_end = end_of_static.min(off);
                if let Some(result) = search(buf, slot_idx + 1, next_end, None, next_head, off, depth) {
                    return Some(result);
                }
            }
        }
    }

    if effective_mode.is_none() {
        let mut next_head = head;
        next_head.push(Slot::Static);
        if let Some(result) = search(buf, slot_idx + 1, end_of_static, None, next_head, min_offset, depth) {
            return Some(result);
        }
    }

    None
}

/// Once the static head is complete, resolves every placeholder's tail
/// and submits the resulting candidate to the oracle.
fn resolve_tails(buf: &[u8], head: &[Slot], depth: usize) -> Option<Vec<ParamType>> {
    let pointer_offsets: Vec<usize> = head
        .iter()
        .filter_map(|s| match s {
            Slot::Pointer { offset, .. } => Some(*offset),
            Slot::Static => None,
        })
        .collect();

    let mut resolved: Vec<ParamType> = Vec::with_capacity(head.len());
    let mut pointer_cursor = 0usize;

    for slot in head {
        match slot {
            Slot::Static => resolved.push(ParamType::Bytes32),
            Slot::Pointer { offset, length } => {
                let tail_start = offset + if length.is_some() { 32 } else { 0 };
                let is_trailing = pointer_cursor + 1 == pointer_offsets.len();
                let tail_end = if is_trailing {
                    buf.len()
                } else {
                    pointer_offsets[pointer_cursor + 1]
                };
                pointer_cursor += 1;

                if tail_end < tail_start {
                    return None;
                }
                let tail = &buf[tail_start..tail_end];

                let param = match length {
                    None => ParamType::Tuple(infer_tuple(tail, None, depth + 1)?),
                    Some(k) => classify_length_tail(tail, *k, is_trailing, depth)?,
                };
                resolved.push(param);
            }
        }
    }

    let oracle_types: Vec<_> = resolved.iter().map(to_oracle_type).collect::<Option<_>>()?;
    match ReferenceOracle::decode(&oracle_types, buf) {
        Ok(_) => {
            debug!("resolve_tails: oracle accepted candidate with {} params", resolved.len());
            Some(resolved)
        }
        Err(err) => {
            debug!("resolve_tails: oracle rejected candidate: {}", err);
            None
        }
    }
}

/// Disambiguates a length-prefixed dynamic tail into `bytes`, an array of
/// dynamic elements, an array of static elements, or (failing those) a
/// chunked tuple, in that priority order.
fn classify_length_tail(tail: &[u8], k: usize, is_trailing: bool, depth: usize) -> Option<ParamType> {
    if depth > MAX_DEPTH {
        return None;
    }

    if looks_like_bytes(tail, k, is_trailing) {
        return Some(ParamType::Bytes);
    }

    if let Some(ty) = try_dynamic_element_array(tail, k, depth) {
        return Some(ty);
    }

    if let Some(ty) = try_static_element_array(tail, k, is_trailing, depth) {
        return Some(ty);
    }

    try_chunked_tuple_array(tail, k, depth)
}

fn looks_like_bytes(tail: &[u8], k: usize, is_trailing: bool) -> bool {
    if k == 0 {
        return tail.is_empty();
    }
    if k % 32 == 0 {
        return is_trailing || k == tail.len();
    }
    let word_idx = (k - 1) / 32;
    let word_start = word_idx * 32;
    let word_end = word_start + 32;
    if word_end > tail.len() {
        return false;
    }
    let within_word = (k - 1) % 32;
    tail[word_start + within_word + 1..word_end].iter().all(|&b| b == 0)
}

fn try_dynamic_element_array(tail: &[u8], k: usize, depth: usize) -> Option<ParamType> {
    if k == 0 || tail.len() % 32 != 0 {
        return None;
    }
    let words = tail.len() / 32;
    if words <= k {
        return None;
    }
    let all_offsets_plausible = (0..k).all(|idx| probe_offset(tail, idx * 32).is_some());
    if !all_offsets_plausible {
        return None;
    }

    for mode in [Some(true), Some(false)] {
        if let Some(inner) = infer_tuple(tail, mode, depth + 1) {
            if inner.len() == k {
                if let Some(elem_ty) = uniform_type(&inner) {
                    return Some(ParamType::Array(Box::new(elem_ty)));
                }
            }
        }
    }
    None
}

fn try_static_element_array(tail: &[u8], k: usize, is_trailing: bool, depth: usize) -> Option<ParamType> {
    if k == 0 || tail.len() % 32 != 0 {
        return None;
    }
    let total_words = tail.len() / 32;
    if total_words < k {
        return None;
    }

    let usable_tail: &[u8] = if total_words % k == 0 {
        tail
    } else if is_trailing {
        let usable_words = (total_words / k) * k;
        if usable_words == 0 {
            return None;
        }
        &tail[..usable_words * 32]
    } else {
        return None;
    };

    let element_words = (usable_tail.len() / 32) / k;
    if element_words == 0 {
        return None;
    }
    let element_size = element_words * 32;

    let mut shapes: Vec<Vec<ParamType>> = Vec::with_capacity(k);
    for i in 0..k {
        let slice = &usable_tail[i * element_size..(i + 1) * element_size];
        let shape = infer_tuple(slice, None, depth + 1)?;
        shapes.push(shape);
    }
    let first = shapes.first()?.clone();
    if shapes.iter().all(|s| *s == first) {
        Some(ParamType::Array(Box::new(ParamType::collapse_singleton(first))))
    } else {
        None
    }
}

fn try_chunked_tuple_array(tail: &[u8], k: usize, depth: usize) -> Option<ParamType> {
    if k == 0 {
        return None;
    }
    let inner = infer_tuple(tail, None, depth + 1)?;
    if inner.len() % k != 0 {
        return None;
    }
    let chunk_size = inner.len() / k;
    let chunks: Vec<&[ParamType]> = inner.chunks(chunk_size).collect();
    let first = ParamType::collapse_singleton(chunks[0].to_vec());
    for chunk in &chunks[1..] {
        if ParamType::collapse_singleton(chunk.to_vec()) != first {
            return None;
        }
    }
    Some(ParamType::Array(Box::new(first)))
}

/// Requires every element of `types` to be exactly the same shape,
/// returning that shared shape. Array-element uniformity at this stage is
/// strict equality; cross-element *refinement* merging happens later, in
/// the prettifier.
fn uniform_type(types: &[ParamType]) -> Option<ParamType> {
    let first = types.first()?.clone();
    if types.iter().all(|t| *t == first) {
        Some(first)
    } else {
        None
    }
}
