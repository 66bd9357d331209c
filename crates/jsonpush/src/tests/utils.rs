use alloc::vec::Vec;

use crate::{
    ErrorPolicy, EventCollector, ParseError, ParseEvent, Parser, StrictPolicy,
};

/// Runs a parse to completion over the given chunks and returns the recorded
/// events together with the first error, if any.
pub(crate) fn parse_outcome(
    chunks: &[&[u8]],
    policy: &mut dyn ErrorPolicy,
) -> (Vec<ParseEvent>, Result<(), ParseError>) {
    let mut events = EventCollector::new();
    let result = {
        let mut parser = Parser::new(&mut events, policy);
        let mut run = || {
            for chunk in chunks {
                parser.set_source(chunk);
                parser.parse()?;
            }
            parser.end_parse()?;
            parser.check_done()
        };
        run()
    };
    (events.into_events(), result)
}

/// Parses a complete document under [`StrictPolicy`], panicking on error.
pub(crate) fn collect_events(input: &str) -> Vec<ParseEvent> {
    collect_events_chunked(&[input.as_bytes()])
}

pub(crate) fn collect_events_chunked(chunks: &[&[u8]]) -> Vec<ParseEvent> {
    let mut policy = StrictPolicy;
    let (events, result) = parse_outcome(chunks, &mut policy);
    result.unwrap();
    events
}

/// Feeds `input` as two chunks split at byte offset `at`.
pub(crate) fn split_events(input: &str, at: usize) -> Vec<ParseEvent> {
    let bytes = input.as_bytes();
    collect_events_chunked(&[&bytes[..at], &bytes[at..]])
}

/// The error a strict parse of `input` aborts with.
pub(crate) fn strict_error(input: &str) -> ParseError {
    let mut policy = StrictPolicy;
    let (_, result) = parse_outcome(&[input.as_bytes()], &mut policy);
    result.unwrap_err()
}
