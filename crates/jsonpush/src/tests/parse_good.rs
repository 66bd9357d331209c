use alloc::string::ToString;

use super::utils::collect_events;
use crate::{EventCollector, ParseEvent, Parser, StrictPolicy};

#[test]
fn object_with_scalar_members() {
    assert_eq!(
        collect_events(r#"{"a":1,"b":-2,"c":true}"#),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginObject,
            ParseEvent::Name("a".to_string()),
            ParseEvent::Uinteger(1),
            ParseEvent::Name("b".to_string()),
            ParseEvent::Integer(-2),
            ParseEvent::Name("c".to_string()),
            ParseEvent::Bool(true),
            ParseEvent::EndObject,
            ParseEvent::EndJson,
        ]
    );
}

#[test]
fn array_of_values() {
    assert_eq!(
        collect_events(r#"[null, 1.5e2, "hi"]"#),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginArray,
            ParseEvent::Null,
            ParseEvent::Double {
                value: 150.0,
                precision: 2
            },
            ParseEvent::String("hi".to_string()),
            ParseEvent::EndArray,
            ParseEvent::EndJson,
        ]
    );
}

#[test]
fn surrogate_pair_escape() {
    assert_eq!(
        collect_events(r#""\uD834\uDD1E""#),
        [
            ParseEvent::BeginJson,
            ParseEvent::String("\u{1D11E}".to_string()),
            ParseEvent::EndJson,
        ]
    );
    // The same scalar written directly survives untouched.
    assert_eq!(
        collect_events("\"\u{1D11E}\""),
        [
            ParseEvent::BeginJson,
            ParseEvent::String("\u{1D11E}".to_string()),
            ParseEvent::EndJson,
        ]
    );
}

#[test]
fn empty_containers() {
    assert_eq!(
        collect_events("{}"),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginObject,
            ParseEvent::EndObject,
            ParseEvent::EndJson,
        ]
    );
    assert_eq!(
        collect_events("[]"),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginArray,
            ParseEvent::EndArray,
            ParseEvent::EndJson,
        ]
    );
}

#[test]
fn root_scalars() {
    assert_eq!(
        collect_events("true"),
        [
            ParseEvent::BeginJson,
            ParseEvent::Bool(true),
            ParseEvent::EndJson,
        ]
    );
    assert_eq!(
        collect_events("false"),
        [
            ParseEvent::BeginJson,
            ParseEvent::Bool(false),
            ParseEvent::EndJson,
        ]
    );
    assert_eq!(
        collect_events("null"),
        [ParseEvent::BeginJson, ParseEvent::Null, ParseEvent::EndJson]
    );
    assert_eq!(
        collect_events(r#""solo""#),
        [
            ParseEvent::BeginJson,
            ParseEvent::String("solo".to_string()),
            ParseEvent::EndJson,
        ]
    );
}

#[test]
fn nested_structures() {
    assert_eq!(
        collect_events(r#"{"k":[1,{"x":[]}]}"#),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginObject,
            ParseEvent::Name("k".to_string()),
            ParseEvent::BeginArray,
            ParseEvent::Uinteger(1),
            ParseEvent::BeginObject,
            ParseEvent::Name("x".to_string()),
            ParseEvent::BeginArray,
            ParseEvent::EndArray,
            ParseEvent::EndObject,
            ParseEvent::EndArray,
            ParseEvent::EndObject,
            ParseEvent::EndJson,
        ]
    );
}

#[test]
fn surrounding_whitespace_and_line_breaks() {
    assert_eq!(
        collect_events(" \r\n\t[ true ,\r\nfalse ] \r\n "),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginArray,
            ParseEvent::Bool(true),
            ParseEvent::Bool(false),
            ParseEvent::EndArray,
            ParseEvent::EndJson,
        ]
    );
}

#[test]
fn tracks_lines_and_columns() {
    let mut events = EventCollector::new();
    let mut policy = StrictPolicy;
    let mut parser = Parser::new(&mut events, &mut policy);
    parser.set_source(b"[\r\n1,\n2]");
    parser.parse().unwrap();
    // A CRLF pair counts as a single line break.
    assert_eq!(parser.line_number(), 3);
    assert_eq!(parser.column_number(), 3);
    assert!(parser.done());
    assert!(parser.source_exhausted());
}

#[test]
fn reset_allows_a_second_document() {
    let mut events = EventCollector::new();
    let mut policy = StrictPolicy;
    {
        let mut parser = Parser::new(&mut events, &mut policy);
        parser.set_source(b"[1]");
        parser.parse().unwrap();
        parser.end_parse().unwrap();
        parser.check_done().unwrap();
        parser.reset();
        assert!(!parser.done());
        parser.set_source(b"{}");
        parser.parse().unwrap();
        parser.end_parse().unwrap();
        parser.check_done().unwrap();
    }
    assert_eq!(
        events.into_events(),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginArray,
            ParseEvent::Uinteger(1),
            ParseEvent::EndArray,
            ParseEvent::EndJson,
            ParseEvent::BeginJson,
            ParseEvent::BeginObject,
            ParseEvent::EndObject,
            ParseEvent::EndJson,
        ]
    );
}
