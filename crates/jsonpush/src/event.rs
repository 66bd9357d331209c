//! Owned event records and a collecting sink.
//!
//! The parser itself hands out borrowed text; [`ParseEvent`] is the owned
//! form for consumers that want to hold on to the stream, and
//! [`EventCollector`] is the [`EventSink`] that records it.
//!
//! # Examples
//!
//! ```
//! use jsonpush::{EventCollector, ParseEvent, Parser, StrictPolicy};
//!
//! let mut events = EventCollector::new();
//! let mut policy = StrictPolicy;
//! let mut parser = Parser::new(&mut events, &mut policy);
//! parser.set_source(b"{\"a\":true}");
//! parser.parse()?;
//! parser.end_parse()?;
//! drop(parser);
//! assert_eq!(
//!     events.events(),
//!     &[
//!         ParseEvent::BeginJson,
//!         ParseEvent::BeginObject,
//!         ParseEvent::Name("a".to_string()),
//!         ParseEvent::Bool(true),
//!         ParseEvent::EndObject,
//!         ParseEvent::EndJson,
//!     ]
//! );
//! # Ok::<(), jsonpush::ParseError>(())
//! ```

use alloc::vec::Vec;

use crate::{context::ParseContext, sink::EventSink, text::CodeUnit};

/// One structural event, with any text copied out of the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent<C: CodeUnit = u8> {
    BeginJson,
    EndJson,
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Name(C::Owned),
    String(C::Owned),
    Integer(i64),
    Uinteger(u64),
    Double { value: f64, precision: u8 },
    Bool(bool),
    Null,
}

/// An [`EventSink`] that records the event stream.
#[derive(Debug, Default)]
pub struct EventCollector<C: CodeUnit = u8> {
    events: Vec<ParseEvent<C>>,
}

impl<C: CodeUnit> EventCollector<C> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[ParseEvent<C>] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ParseEvent<C>> {
        self.events
    }
}

impl<C: CodeUnit> EventSink<C> for EventCollector<C> {
    fn begin_json(&mut self, _ctx: &ParseContext) {
        self.events.push(ParseEvent::BeginJson);
    }

    fn end_json(&mut self, _ctx: &ParseContext) {
        self.events.push(ParseEvent::EndJson);
    }

    fn begin_object(&mut self, _ctx: &ParseContext) {
        self.events.push(ParseEvent::BeginObject);
    }

    fn end_object(&mut self, _ctx: &ParseContext) {
        self.events.push(ParseEvent::EndObject);
    }

    fn begin_array(&mut self, _ctx: &ParseContext) {
        self.events.push(ParseEvent::BeginArray);
    }

    fn end_array(&mut self, _ctx: &ParseContext) {
        self.events.push(ParseEvent::EndArray);
    }

    fn name(&mut self, name: &C::Text, _ctx: &ParseContext) {
        self.events.push(ParseEvent::Name(C::to_owned_text(name)));
    }

    fn string_value(&mut self, value: &C::Text, _ctx: &ParseContext) {
        self.events.push(ParseEvent::String(C::to_owned_text(value)));
    }

    fn integer_value(&mut self, value: i64, _ctx: &ParseContext) {
        self.events.push(ParseEvent::Integer(value));
    }

    fn uinteger_value(&mut self, value: u64, _ctx: &ParseContext) {
        self.events.push(ParseEvent::Uinteger(value));
    }

    fn double_value(&mut self, value: f64, precision: u8, _ctx: &ParseContext) {
        self.events.push(ParseEvent::Double { value, precision });
    }

    fn bool_value(&mut self, value: bool, _ctx: &ParseContext) {
        self.events.push(ParseEvent::Bool(value));
    }

    fn null_value(&mut self, _ctx: &ParseContext) {
        self.events.push(ParseEvent::Null);
    }
}
