use super::utils::{collect_events, parse_outcome, strict_error};
use crate::{ErrorKind, ParseEvent, StrictPolicy};

fn root_number(input: &str) -> ParseEvent {
    let events = collect_events(input);
    assert_eq!(events.len(), 3, "events for {input:?}: {events:?}");
    events[1].clone()
}

#[test]
fn unsigned_integers_up_to_u64_max() {
    assert_eq!(root_number("0"), ParseEvent::Uinteger(0));
    assert_eq!(root_number("42"), ParseEvent::Uinteger(42));
    assert_eq!(
        root_number("18446744073709551615"),
        ParseEvent::Uinteger(u64::MAX)
    );
}

#[test]
fn negative_integers_down_to_i64_min() {
    assert_eq!(root_number("-1"), ParseEvent::Integer(-1));
    assert_eq!(root_number("-0"), ParseEvent::Integer(0));
    assert_eq!(
        root_number("-9223372036854775808"),
        ParseEvent::Integer(i64::MIN)
    );
}

#[test]
fn out_of_range_integers_fall_through_to_double() {
    assert_eq!(
        root_number("18446744073709551616"),
        ParseEvent::Double {
            value: 1.8446744073709552e19,
            precision: 20
        }
    );
    assert_eq!(
        root_number("-9223372036854775809"),
        ParseEvent::Double {
            value: -9.223372036854776e18,
            precision: 19
        }
    );
}

#[test]
fn doubles_carry_significant_digit_counts() {
    assert_eq!(
        root_number("1.5e2"),
        ParseEvent::Double {
            value: 150.0,
            precision: 2
        }
    );
    assert_eq!(
        root_number("0.25"),
        ParseEvent::Double {
            value: 0.25,
            precision: 3
        }
    );
    assert_eq!(
        root_number("1e2"),
        ParseEvent::Double {
            value: 100.0,
            precision: 1
        }
    );
    assert_eq!(
        root_number("1e+2"),
        ParseEvent::Double {
            value: 100.0,
            precision: 1
        }
    );
    assert_eq!(
        root_number("2.5e-1"),
        ParseEvent::Double {
            value: 0.25,
            precision: 2
        }
    );
    assert_eq!(
        root_number("-12.75"),
        ParseEvent::Double {
            value: -12.75,
            precision: 4
        }
    );
}

#[test]
fn numbers_inside_containers_terminate_on_structure() {
    assert_eq!(
        collect_events("[1,2.5]"),
        [
            ParseEvent::BeginJson,
            ParseEvent::BeginArray,
            ParseEvent::Uinteger(1),
            ParseEvent::Double {
                value: 2.5,
                precision: 2
            },
            ParseEvent::EndArray,
            ParseEvent::EndJson,
        ]
    );
    assert_eq!(
        collect_events(r#"{"n":-7}"#)[2],
        ParseEvent::Integer(-7)
    );
}

#[test]
fn root_number_is_flushed_at_end_of_input() {
    // No terminator follows "42"; only end_parse completes it.
    assert_eq!(root_number("42"), ParseEvent::Uinteger(42));
}

#[test]
fn pending_number_inside_array_is_not_flushed() {
    let mut policy = StrictPolicy;
    let (events, result) = parse_outcome(&[b"[42"], &mut policy);
    assert_eq!(result.unwrap_err().kind, ErrorKind::UnexpectedEof);
    assert_eq!(events, [ParseEvent::BeginJson, ParseEvent::BeginArray]);
}

#[test]
fn truncated_numbers_are_eof() {
    for doc in ["-", "1.", "1e", "1e-"] {
        let mut policy = StrictPolicy;
        let (_, result) = parse_outcome(&[doc.as_bytes()], &mut policy);
        assert_eq!(
            result.unwrap_err().kind,
            ErrorKind::UnexpectedEof,
            "doc {doc:?}"
        );
    }
}

#[test]
fn malformed_numbers() {
    assert_eq!(strict_error("042").kind, ErrorKind::LeadingZero);
    assert_eq!(strict_error("1.x").kind, ErrorKind::InvalidNumber);
    assert_eq!(strict_error("1ex").kind, ErrorKind::ExpectedValue);
    assert_eq!(strict_error("-x").kind, ErrorKind::ExpectedValue);
    assert_eq!(strict_error("1x").kind, ErrorKind::InvalidNumber);
}

#[test]
fn number_terminated_by_comment() {
    use crate::DefaultPolicy;
    let mut policy = DefaultPolicy;
    let (events, result) = parse_outcome(&[b"1/* trailing */"], &mut policy);
    result.unwrap();
    assert_eq!(
        events,
        [
            ParseEvent::BeginJson,
            ParseEvent::Uinteger(1),
            ParseEvent::EndJson,
        ]
    );
}
