//! Incremental, push-style JSON parsing.
//!
//! `jsonpush` is a pure state machine: it consumes arbitrary chunks of
//! UTF-8 bytes (or UTF-16 code units, via [`WideParser`]) and pushes a
//! stream of structural events — begin/end of objects and arrays, member
//! names, strings, integers, doubles, booleans, null — into a
//! caller-supplied [`EventSink`]. It builds no values, does no I/O, and can
//! suspend at any byte boundary: mid-number, mid-escape, mid-keyword,
//! mid-surrogate-pair.
//!
//! Validation is strict JSON (RFC 8259), including UTF-8 well-formedness of
//! string contents and surrogate-pair handling of `\uXXXX` escapes. What
//! happens on an anomaly is up to the caller-supplied [`ErrorPolicy`]: each
//! recoverable error kind either aborts the parse or continues with a
//! documented recovery.
//!
//! ```
//! use jsonpush::{EventCollector, ParseEvent, Parser, StrictPolicy};
//!
//! let mut events = EventCollector::new();
//! let mut policy = StrictPolicy;
//! let mut parser = Parser::new(&mut events, &mut policy);
//! parser.set_source(br#"{"greeting":"hi"}"#);
//! parser.parse()?;
//! parser.end_parse()?;
//! parser.check_done()?;
//! drop(parser);
//! assert_eq!(
//!     events.events(),
//!     &[
//!         ParseEvent::BeginJson,
//!         ParseEvent::BeginObject,
//!         ParseEvent::Name("greeting".to_string()),
//!         ParseEvent::String("hi".to_string()),
//!         ParseEvent::EndObject,
//!         ParseEvent::EndJson,
//!     ]
//! );
//! # Ok::<(), jsonpush::ParseError>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod context;
mod error;
mod escape;
mod event;
mod literal;
mod numbers;
mod parser;
mod policy;
mod sink;
mod source;
mod text;
pub mod unicode;

pub use context::ParseContext;
pub use error::{ErrorKind, ParseError};
pub use event::{EventCollector, ParseEvent};
pub use parser::{Parser, WideParser};
pub use policy::{DefaultPolicy, ErrorPolicy, LenientPolicy, StrictPolicy};
pub use sink::{EventSink, NullSink};
pub use text::CodeUnit;

#[cfg(test)]
mod tests;
