//! The receiving end of the parser: structural events.
//!
//! Implement [`EventSink`] to consume a document as it is parsed. Every
//! method has a no-op default, so a sink only overrides the events it cares
//! about; [`NullSink`] overrides none and swallows the stream.
//!
//! For a minimal document the parser emits `begin_json`, then the value
//! events, then `end_json`. `begin_X`/`end_X` pairs are balanced and
//! correctly nested, and a `name` is always followed by exactly one value
//! (or container) before the next `name` in the same object.
//!
//! # Examples
//!
//! ```
//! use jsonpush::{EventSink, ParseContext, Parser, StrictPolicy};
//!
//! #[derive(Default)]
//! struct StringCount(usize);
//!
//! impl EventSink for StringCount {
//!     fn string_value(&mut self, _value: &str, _ctx: &ParseContext) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut sink = StringCount::default();
//! let mut policy = StrictPolicy;
//! let mut parser = Parser::new(&mut sink, &mut policy);
//! parser.set_source(br#"["a","b"]"#);
//! parser.parse()?;
//! parser.end_parse()?;
//! drop(parser);
//! assert_eq!(sink.0, 2);
//! # Ok::<(), jsonpush::ParseError>(())
//! ```

use crate::{context::ParseContext, text::CodeUnit};

/// Receiver of structural parse events.
///
/// Text events borrow from the parser's buffers and are only valid for the
/// duration of the call; copy what you need to keep.
pub trait EventSink<C: CodeUnit = u8> {
    /// The document is starting.
    fn begin_json(&mut self, _ctx: &ParseContext) {}

    /// The root value is complete.
    fn end_json(&mut self, _ctx: &ParseContext) {}

    fn begin_object(&mut self, _ctx: &ParseContext) {}

    fn end_object(&mut self, _ctx: &ParseContext) {}

    fn begin_array(&mut self, _ctx: &ParseContext) {}

    fn end_array(&mut self, _ctx: &ParseContext) {}

    /// An object member name.
    fn name(&mut self, _name: &C::Text, _ctx: &ParseContext) {}

    fn string_value(&mut self, _value: &C::Text, _ctx: &ParseContext) {}

    /// A negative integer in `[-2^63, -1]`.
    fn integer_value(&mut self, _value: i64, _ctx: &ParseContext) {}

    /// A non-negative integer in `[0, 2^64 - 1]`.
    fn uinteger_value(&mut self, _value: u64, _ctx: &ParseContext) {}

    /// A number with a fraction or exponent, or an integer out of 64-bit
    /// range. `precision` is the count of significant decimal digits in the
    /// literal, for consumers that format round-trippably.
    fn double_value(&mut self, _value: f64, _precision: u8, _ctx: &ParseContext) {}

    fn bool_value(&mut self, _value: bool, _ctx: &ParseContext) {}

    fn null_value(&mut self, _ctx: &ParseContext) {}
}

/// A sink that discards every event; useful for pure validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<C: CodeUnit> EventSink<C> for NullSink {}
