//! Feeds arbitrary bytes, whole and re-chunked at arbitrary offsets, and
//! checks that the parser neither panics nor lets the chunking change the
//! outcome: the event stream and the final result must be identical for
//! every partition of the same input.

#![no_main]

use arbitrary::Arbitrary;
use jsonpush::{
    ErrorPolicy, EventCollector, LenientPolicy, ParseError, ParseEvent, Parser, StrictPolicy,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Case {
    data: Vec<u8>,
    splits: Vec<u8>,
    strict: bool,
}

fn run(
    chunks: &[&[u8]],
    policy: &mut dyn ErrorPolicy,
) -> (Vec<ParseEvent>, Result<(), ParseError>) {
    let mut events = EventCollector::new();
    let result = {
        let mut parser = Parser::new(&mut events, policy);
        let mut feed = || {
            for chunk in chunks {
                parser.set_source(chunk);
                parser.parse()?;
            }
            parser.end_parse()?;
            parser.check_done()
        };
        feed()
    };
    (events.into_events(), result)
}

fuzz_target!(|case: Case| {
    let whole = if case.strict {
        run(&[&case.data], &mut StrictPolicy)
    } else {
        run(&[&case.data], &mut LenientPolicy)
    };

    let mut chunks: Vec<&[u8]> = Vec::new();
    let mut idx = 0;
    for &s in &case.splits {
        let remaining = case.data.len() - idx;
        if remaining == 0 {
            break;
        }
        let size = 1 + usize::from(s) % remaining;
        chunks.push(&case.data[idx..idx + size]);
        idx += size;
    }
    chunks.push(&case.data[idx..]);

    let chunked = if case.strict {
        run(&chunks, &mut StrictPolicy)
    } else {
        run(&chunks, &mut LenientPolicy)
    };

    assert_eq!(whole, chunked);
});
