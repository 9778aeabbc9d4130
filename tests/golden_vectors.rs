//! Golden vector tests for the calldata shape inferencer.
//!
//! These mirror the concrete scenarios worked through by hand while
//! designing the backtracking search: a lone static scalar, a lone
//! bytes32, a fully-static nested tuple (which collapses to inlined
//! top-level fields, since fixed-shape-vs-tuple is explicitly out of
//! scope), an array of dynamic tuples, an empty dynamic array, and a
//! pair of sibling dynamic arrays of tuples.

mod support;

use calldata_shape_guesser::{guess_fragment, ParamType};
use support::{calldata, Encodable};

#[test]
fn recovers_lone_uint256() {
    let _ = env_logger::try_init();
    let data = calldata([0x11, 0x22, 0x33, 0x44], &[Encodable::Uint(123)]);
    let fragment = guess_fragment(&data).expect("a fragment should be recovered");
    assert_eq!(fragment.inputs, vec![ParamType::Uint256]);
}

#[test]
fn recovers_lone_bytes32() {
    let data = calldata(
        [0x11, 0x22, 0x33, 0x44],
        &[Encodable::Bytes32([0xab; 32])],
    );
    let fragment = guess_fragment(&data).expect("a fragment should be recovered");
    assert_eq!(fragment.inputs, vec![ParamType::Bytes32]);
}

#[test]
fn fully_static_nested_tuple_collapses_to_inlined_fields() {
    // test((uint256,uint256,bytes4)) with [[10, 20, 0x69696969]]. Since
    // fixed-shape-versus-tuple disambiguation is out of scope, this must
    // be recovered as three flat top-level parameters, not one nested
    // tuple parameter.
    let mut bytes4_word = [0u8; 32];
    bytes4_word[0..4].copy_from_slice(&[0x69, 0x69, 0x69, 0x69]);

    let data = calldata(
        [0x11, 0x22, 0x33, 0x44],
        &[
            Encodable::Uint(10),
            Encodable::Uint(20),
            Encodable::Bytes32(bytes4_word),
        ],
    );
    let fragment = guess_fragment(&data).expect("a fragment should be recovered");
    assert_eq!(
        fragment.inputs,
        vec![ParamType::Uint256, ParamType::Uint256, ParamType::FixedBytes(4)]
    );
}

#[test]
fn recovers_array_of_dynamic_tuples() {
    // test((string,uint256[])[]) with [["alice",[1,2,3]], ["bob",[4,5,6]]].
    let data = calldata(
        [0x11, 0x22, 0x33, 0x44],
        &[Encodable::Array(vec![
            Encodable::Tuple(vec![
                Encodable::Str("alice".to_string()),
                Encodable::Array(vec![Encodable::Uint(1), Encodable::Uint(2), Encodable::Uint(3)]),
            ]),
            Encodable::Tuple(vec![
                Encodable::Str("bob".to_string()),
                Encodable::Array(vec![Encodable::Uint(4), Encodable::Uint(5), Encodable::Uint(6)]),
            ]),
        ])],
    );
    let fragment = guess_fragment(&data).expect("a fragment should be recovered");
    assert_eq!(fragment.inputs.len(), 1);
    match &fragment.inputs[0] {
        ParamType::Array(elem) => match elem.as_ref() {
            ParamType::Tuple(fields) => {
                assert_eq!(fields.len(), 2);
                assert!(matches!(fields[0], ParamType::String | ParamType::Bytes));
                assert_eq!(fields[1], ParamType::Array(Box::new(ParamType::Uint256)));
            }
            other => panic!("expected element tuple, got {:?}", other),
        },
        other => panic!("expected an array parameter, got {:?}", other),
    }
}

#[test]
fn empty_dynamic_array_is_a_conservative_bytes_placeholder() {
    let data = calldata([0x11, 0x22, 0x33, 0x44], &[Encodable::Array(vec![])]);
    let fragment = guess_fragment(&data).expect("a fragment should be recovered");
    assert_eq!(fragment.inputs, vec![ParamType::Bytes]);
}

#[test]
fn recovers_two_sibling_dynamic_arrays() {
    // test((address,uint256)[], (uint8,uint256,(bool,uint256,uint256,uint256),uint256,uint256,address,uint256,bytes)[])
    let mut addr_word = [0u8; 32];
    addr_word[12..32].copy_from_slice(&[0xAA; 20]);

    let first_array = Encodable::Array(vec![
        Encodable::Tuple(vec![Encodable::Bytes32(addr_word), Encodable::Uint(1)]),
        Encodable::Tuple(vec![Encodable::Bytes32(addr_word), Encodable::Uint(2)]),
    ]);

    let make_second_elem = || {
        Encodable::Tuple(vec![
            Encodable::Uint(1),
            Encodable::Uint(2),
            Encodable::Tuple(vec![
                Encodable::Uint(1),
                Encodable::Uint(3),
                Encodable::Uint(4),
                Encodable::Uint(5),
            ]),
            Encodable::Uint(6),
            Encodable::Uint(7),
            Encodable::Bytes32(addr_word),
            Encodable::Uint(8),
            Encodable::Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
        ])
    };
    let second_array = Encodable::Array(vec![make_second_elem(), make_second_elem()]);

    let data = calldata([0x11, 0x22, 0x33, 0x44], &[first_array, second_array]);
    let fragment = guess_fragment(&data).expect("a fragment should be recovered");
    assert_eq!(fragment.inputs.len(), 2);
    assert!(matches!(fragment.inputs[0], ParamType::Array(_)));
    assert!(matches!(fragment.inputs[1], ParamType::Array(_)));
}
