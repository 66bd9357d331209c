use alloc::string::ToString;

use super::utils::{collect_events, parse_outcome};
use crate::{
    ErrorKind, EventCollector, LenientPolicy, ParseEvent, Parser, StrictPolicy,
};

fn root_string(input: &str) -> ParseEvent {
    let events = collect_events(input);
    assert_eq!(events.len(), 3, "events for {input:?}: {events:?}");
    events[1].clone()
}

#[test]
fn simple_escapes_resolve() {
    assert_eq!(
        root_string(r#""\"\\\/\b\f\n\r\t""#),
        ParseEvent::String("\"\\/\u{8}\u{c}\n\r\t".to_string())
    );
}

#[test]
fn unicode_escapes_resolve() {
    assert_eq!(
        root_string(r#""\u0041""#),
        ParseEvent::String("A".to_string())
    );
    assert_eq!(
        root_string(r#""\u00e9""#),
        ParseEvent::String("é".to_string())
    );
    assert_eq!(
        root_string(r#""\u20AC""#),
        ParseEvent::String("\u{20AC}".to_string())
    );
    assert_eq!(
        root_string(r#""a\u0042c""#),
        ParseEvent::String("aBc".to_string())
    );
}

#[test]
fn empty_string() {
    assert_eq!(root_string(r#""""#), ParseEvent::String("".to_string()));
}

#[test]
fn multibyte_content_passes_through() {
    assert_eq!(
        root_string("\"π😊é\""),
        ParseEvent::String("π😊é".to_string())
    );
}

#[test]
fn unescaped_string_takes_the_raw_span_path() {
    let mut events = EventCollector::new();
    let mut policy = StrictPolicy;
    let mut parser = Parser::new(&mut events, &mut policy);
    parser.set_source(br#"["hello world"]"#);
    parser.parse().unwrap();
    assert_eq!(parser.buffered_string_emissions, 0);
}

#[test]
fn escapes_and_chunk_boundaries_use_the_scratch_buffer() {
    let mut events = EventCollector::new();
    let mut policy = StrictPolicy;
    {
        let mut parser = Parser::new(&mut events, &mut policy);
        parser.set_source(br#"["he\nllo"]"#);
        parser.parse().unwrap();
        assert_eq!(parser.buffered_string_emissions, 1);
    }

    let mut events = EventCollector::new();
    {
        let mut parser = Parser::new(&mut events, &mut policy);
        parser.set_source(br#"["hel"#);
        parser.parse().unwrap();
        parser.set_source(br#"lo"]"#);
        parser.parse().unwrap();
        assert_eq!(parser.buffered_string_emissions, 1);
    }
    assert_eq!(
        events.into_events(),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginArray,
            ParseEvent::String("hello".to_string()),
            ParseEvent::EndArray,
            ParseEvent::EndJson,
        ]
    );
}

#[test]
fn member_names_resolve_escapes_too() {
    assert_eq!(
        collect_events(r#"{"a\tb":1}"#)[2],
        ParseEvent::Name("a\tb".to_string())
    );
}

#[test]
fn lone_low_surrogate_escape() {
    let mut policy = StrictPolicy;
    let (_, result) = parse_outcome(&[br#""\uDC00""#], &mut policy);
    assert_eq!(result.unwrap_err().kind, ErrorKind::IllegalSurrogateValue);

    // Recovery drops the escape and keeps the string going.
    let mut policy = LenientPolicy;
    let (events, result) = parse_outcome(&[br#""a\uDC00b""#], &mut policy);
    result.unwrap();
    assert_eq!(events[1], ParseEvent::String("ab".to_string()));
}

#[test]
fn high_surrogate_with_non_low_partner() {
    let mut policy = StrictPolicy;
    let (_, result) = parse_outcome(&[br#""\uD834\uD834""#], &mut policy);
    assert_eq!(result.unwrap_err().kind, ErrorKind::UnpairedHighSurrogate);

    let mut policy = LenientPolicy;
    let (events, result) = parse_outcome(&[br#""x\uD834\uD834y""#], &mut policy);
    result.unwrap();
    assert_eq!(events[1], ParseEvent::String("xy".to_string()));
}

#[test]
fn tab_in_string_is_kept_on_recovery() {
    let mut policy = LenientPolicy;
    let (events, result) = parse_outcome(&[b"\"a\tb\""], &mut policy);
    result.unwrap();
    assert_eq!(events[1], ParseEvent::String("a\tb".to_string()));
}

#[test]
fn control_byte_in_string_is_skipped_on_recovery() {
    let mut policy = LenientPolicy;
    let (events, result) = parse_outcome(&[&[b'[', b'"', b'a', 0x01, b'b', b'"', b']']], &mut policy);
    result.unwrap();
    assert_eq!(events[2], ParseEvent::String("ab".to_string()));
}

#[test]
fn newline_in_string_is_kept_and_counted() {
    let mut events = EventCollector::new();
    let mut policy = LenientPolicy;
    let mut parser = Parser::new(&mut events, &mut policy);
    parser.set_source(b"[\"a\nb\",\n1]");
    parser.parse().unwrap();
    parser.end_parse().unwrap();
    // Two line breaks: one inside the string, one between elements.
    assert_eq!(parser.line_number(), 3);
    drop(parser);
    assert_eq!(events.events()[2], ParseEvent::String("a\nb".to_string()));
}
