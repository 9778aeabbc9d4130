//! Test-only ABI encoder. Neither the crate nor the corpus it was grown
//! from ships an encoder (only decoders), so integration tests build
//! their own fixtures with this small helper rather than hand-writing
//! offset/length arithmetic into hex literals.

#![allow(dead_code)]

#[derive(Debug, Clone)]
pub enum Encodable {
    Uint(u64),
    Bytes32([u8; 32]),
    Bytes(Vec<u8>),
    Str(String),
    Tuple(Vec<Encodable>),
    Array(Vec<Encodable>),
}

impl Encodable {
    fn is_dynamic(&self) -> bool {
        match self {
            Encodable::Uint(_) | Encodable::Bytes32(_) => false,
            Encodable::Bytes(_) | Encodable::Str(_) | Encodable::Array(_) => true,
            Encodable::Tuple(fields) => fields.iter().any(|f| f.is_dynamic()),
        }
    }

    fn head_words(&self) -> usize {
        if self.is_dynamic() {
            1
        } else {
            match self {
                Encodable::Tuple(fields) => fields.iter().map(|f| f.head_words()).sum(),
                _ => 1,
            }
        }
    }
}

fn word_u64(v: u64) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[24..32].copy_from_slice(&v.to_be_bytes());
    w
}

fn pad_to_word(mut bytes: Vec<u8>) -> Vec<u8> {
    let rem = bytes.len() % 32;
    if rem != 0 {
        bytes.extend(std::iter::repeat(0u8).take(32 - rem));
    }
    bytes
}

/// Encodes a top-level argument tuple (the part of calldata after the
/// 4-byte selector).
pub fn encode_tuple(items: &[Encodable]) -> Vec<u8> {
    let head_words: usize = items.iter().map(|i| i.head_words()).sum();
    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut next_tail_offset = head_words * 32;

    for item in items {
        if item.is_dynamic() {
            head.extend_from_slice(&word_u64(next_tail_offset as u64));
            let encoded = encode_dynamic(item);
            next_tail_offset += encoded.len();
            tail.extend(encoded);
        } else {
            head.extend(encode_static(item));
        }
    }
    head.extend(tail);
    head
}

fn encode_static(item: &Encodable) -> Vec<u8> {
    match item {
        Encodable::Uint(v) => word_u64(*v).to_vec(),
        Encodable::Bytes32(b) => b.to_vec(),
        Encodable::Tuple(fields) => fields.iter().flat_map(encode_static).collect(),
        _ => panic!("encode_static called on a dynamic item"),
    }
}

fn encode_dynamic(item: &Encodable) -> Vec<u8> {
    match item {
        Encodable::Bytes(b) => {
            let mut out = word_u64(b.len() as u64).to_vec();
            out.extend(pad_to_word(b.clone()));
            out
        }
        Encodable::Str(s) => encode_dynamic(&Encodable::Bytes(s.as_bytes().to_vec())),
        Encodable::Array(elems) => {
            let mut out = word_u64(elems.len() as u64).to_vec();
            out.extend(encode_tuple(elems));
            out
        }
        Encodable::Tuple(fields) => encode_tuple(fields),
        _ => panic!("encode_dynamic called on a static item"),
    }
}

/// Prepends a 4-byte selector to an encoded argument tuple.
pub fn calldata(selector: [u8; 4], items: &[Encodable]) -> Vec<u8> {
    let mut out = selector.to_vec();
    out.extend(encode_tuple(items));
    out
}
