//! Word-for-word tape layout checks.

#![allow(missing_docs)]

mod common;

use common::{header, parse_raw, parse_tape, word};
use jsontape::{tape_payload, tape_tag, TapeType};

#[test]
fn empty_object() {
    let tape = parse_tape("{}").unwrap();
    assert_eq!(
        tape,
        [
            word(TapeType::Root, 3),
            header(TapeType::StartObject, 2, 0),
            word(TapeType::EndObject, 1),
            word(TapeType::Root, 0),
        ]
    );
}

#[test]
fn empty_array() {
    let tape = parse_tape("[]").unwrap();
    assert_eq!(
        tape,
        [
            word(TapeType::Root, 3),
            header(TapeType::StartArray, 2, 0),
            word(TapeType::EndArray, 1),
            word(TapeType::Root, 0),
        ]
    );
}

#[test]
fn array_of_integers() {
    let tape = parse_tape("[1,2,3]").unwrap();
    assert_eq!(
        tape,
        [
            word(TapeType::Root, 9),
            header(TapeType::StartArray, 8, 3),
            word(TapeType::Int64, 0),
            1,
            word(TapeType::Int64, 0),
            2,
            word(TapeType::Int64, 0),
            3,
            word(TapeType::EndArray, 1),
            word(TapeType::Root, 0),
        ]
    );
}

#[test]
fn single_field_object_and_string_buffer() {
    let (tape, strings) = parse_raw(r#"{"a":true}"#).unwrap();
    assert_eq!(
        tape,
        [
            word(TapeType::Root, 5),
            header(TapeType::StartObject, 4, 1),
            word(TapeType::String, 0),
            word(TapeType::True, 0),
            word(TapeType::EndObject, 1),
            word(TapeType::Root, 0),
        ]
    );
    // 4-byte little-endian length, the byte, one NUL.
    assert_eq!(strings, [1, 0, 0, 0, b'a', 0]);
}

#[test]
fn root_sentinels_point_at_each_other() {
    for src in ["{}", "[]", "42", r#"{"k":[null,{"x":1.5}]}"#] {
        let tape = parse_tape(src).unwrap();
        let last = tape.len() - 1;
        assert_eq!(tape_tag(tape[0]), Some(TapeType::Root), "{src}");
        assert_eq!(tape_tag(tape[last]), Some(TapeType::Root), "{src}");
        assert_eq!(tape_payload(tape[0]), last as u64, "{src}");
        assert_eq!(tape_payload(tape[last]), 0, "{src}");
    }
}

#[test]
fn start_and_end_words_are_mutually_linked() {
    let tape = parse_tape(r#"{"a":[true,{"b":[]}],"c":{}}"#).unwrap();
    for (i, &w) in tape.iter().enumerate() {
        match tape_tag(w) {
            Some(TapeType::StartObject | TapeType::StartArray) => {
                let end = (tape_payload(w) & 0xFFFF_FFFF) as usize;
                assert_eq!(tape_payload(tape[end]), i as u64, "start at {i}");
            }
            Some(TapeType::EndObject | TapeType::EndArray) => {
                let start = tape_payload(w) as usize;
                let back = (tape_payload(tape[start]) & 0xFFFF_FFFF) as usize;
                assert_eq!(back, i, "end at {i}");
            }
            _ => {}
        }
    }
}

#[test]
fn number_words_carry_the_value_in_the_next_word() {
    let tape = parse_tape(r#"[-1,9223372036854775808,2.5]"#).unwrap();
    assert_eq!(tape_tag(tape[2]), Some(TapeType::Int64));
    assert_eq!(tape[3] as i64, -1);
    assert_eq!(tape_tag(tape[4]), Some(TapeType::Uint64));
    assert_eq!(tape[5], 9_223_372_036_854_775_808);
    assert_eq!(tape_tag(tape[6]), Some(TapeType::Double));
    assert_eq!(f64::from_bits(tape[7]), 2.5);
}

#[test]
fn string_buffer_entries_are_length_prefixed_and_nul_terminated() {
    let (tape, strings) = parse_raw(r#"["ab","","c\n"]"#).unwrap();
    let mut offsets = Vec::new();
    for &w in &tape {
        if tape_tag(w) == Some(TapeType::String) {
            offsets.push(tape_payload(w) as usize);
        }
    }
    assert_eq!(offsets.len(), 3);
    let mut expected = Vec::new();
    for (off, content) in offsets.iter().zip([&b"ab"[..], b"", b"c\n"]) {
        assert_eq!(*off, expected.len());
        let len = u32::from_le_bytes(strings[*off..*off + 4].try_into().unwrap()) as usize;
        assert_eq!(len, content.len());
        assert_eq!(&strings[off + 4..off + 4 + len], content);
        assert_eq!(strings[off + 4 + len], 0);
        expected.extend_from_slice(&(content.len() as u32).to_le_bytes());
        expected.extend_from_slice(content);
        expected.push(0);
    }
    assert_eq!(strings, expected);
}

#[test]
fn atoms_emit_zero_payload_words() {
    let tape = parse_tape("[true,false,null]").unwrap();
    assert_eq!(tape[2], word(TapeType::True, 0));
    assert_eq!(tape[3], word(TapeType::False, 0));
    assert_eq!(tape[4], word(TapeType::Null, 0));
}

#[test]
fn isolated_root_scalars_tolerate_missing_trailing_space() {
    assert_eq!(
        parse_tape("true").unwrap(),
        [
            word(TapeType::Root, 2),
            word(TapeType::True, 0),
            word(TapeType::Root, 0)
        ]
    );
    let tape = parse_tape("42").unwrap();
    assert_eq!(tape_tag(tape[1]), Some(TapeType::Int64));
    assert_eq!(tape[2], 42);
    let (tape, strings) = parse_raw(r#""x""#).unwrap();
    assert_eq!(tape_tag(tape[1]), Some(TapeType::String));
    assert_eq!(strings, [1, 0, 0, 0, b'x', 0]);
}
