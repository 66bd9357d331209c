//! The resumable push parser.
//!
//! The machine consumes one code unit per step and emits events as terminal
//! transitions fire. End of input is the only suspension point: every
//! sub-state checks for it explicitly, stores itself, and resumes when the
//! next span arrives via [`Parser::set_source`]. Feeding a document in one
//! span or in arbitrary fragments produces the same event stream.

#![allow(clippy::too_many_lines)]

use alloc::vec::Vec;

use crate::{
    context::ParseContext,
    error::{ErrorKind, ParseError},
    escape::{UnicodeEscapeBuffer, hex_digit},
    literal::{Keyword, LiteralMatcher, Step},
    numbers,
    policy::ErrorPolicy,
    sink::EventSink,
    source::Source,
    text::CodeUnit,
    unicode::{self, SpanValidator},
};

const INITIAL_STACK_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Bottom-of-stack sentinel.
    Root,
    Start,
    Slash,
    SlashSlash,
    SlashStar,
    SlashStarStar,
    ExpectCommaOrEnd,
    /// Container frame, on the stack only.
    Object,
    ExpectMemberNameOrEnd,
    ExpectMemberName,
    ExpectColon,
    ExpectValueOrEnd,
    ExpectValue,
    /// Container frame, on the stack only.
    Array,
    /// Marks that the string being parsed is a member name, on the stack only.
    MemberName,
    StringContent,
    Escape,
    EscapeUnicode,
    EscapeExpectSurrogatePair1,
    EscapeExpectSurrogatePair2,
    EscapeUnicodeSurrogate,
    Minus,
    Zero,
    Integer,
    Fraction1,
    Fraction2,
    Exp1,
    Exp2,
    Exp3,
    Literal,
    Cr,
    Lf,
    Done,
}

/// An incremental push-style JSON parser.
///
/// The parser is seeded with input spans via [`set_source`](Parser::set_source)
/// and stepped with [`parse`](Parser::parse); any span boundary may fall
/// anywhere, including inside numbers, keywords, escapes and multi-byte
/// sequences. Events go to the borrowed sink; anomalies go to the borrowed
/// policy, which decides between aborting and a documented recovery.
///
/// A single instance parses one document at a time; call
/// [`reset`](Parser::reset) to start another.
///
/// # Examples
///
/// ```
/// use jsonpush::{EventCollector, ParseEvent, Parser, StrictPolicy};
///
/// let mut events = EventCollector::new();
/// let mut policy = StrictPolicy;
/// let mut parser = Parser::new(&mut events, &mut policy);
/// parser.set_source(b"[1");
/// parser.parse()?;
/// parser.set_source(b",2]");
/// parser.parse()?;
/// parser.end_parse()?;
/// parser.check_done()?;
/// drop(parser);
/// assert_eq!(
///     events.events(),
///     &[
///         ParseEvent::BeginJson,
///         ParseEvent::BeginArray,
///         ParseEvent::Uinteger(1),
///         ParseEvent::Uinteger(2),
///         ParseEvent::EndArray,
///         ParseEvent::EndJson,
///     ]
/// );
/// # Ok::<(), jsonpush::ParseError>(())
/// ```
pub struct Parser<'a, C: CodeUnit = u8> {
    sink: &'a mut dyn EventSink<C>,
    policy: &'a mut dyn ErrorPolicy,

    state: State,
    state_stack: Vec<State>,
    nesting_depth: usize,
    max_depth: usize,

    line: usize,
    column: usize,

    source: Source<C>,

    /// Scratch for resolved string contents and for number digits.
    string_buffer: Vec<C>,
    validator: C::Validator,
    is_negative: bool,
    precision: u8,

    escape: UnicodeEscapeBuffer,
    cp: u32,
    cp2: u32,
    literal: LiteralMatcher,

    begun: bool,

    /// Counts string emissions that went through the scratch buffer instead
    /// of the raw-span fast path.
    #[cfg(test)]
    pub(crate) buffered_string_emissions: usize,
}

/// A [`Parser`] over UTF-16 code units.
pub type WideParser<'a> = Parser<'a, u16>;

impl<'a, C: CodeUnit> Parser<'a, C> {
    pub fn new(sink: &'a mut dyn EventSink<C>, policy: &'a mut dyn ErrorPolicy) -> Self {
        let mut state_stack = Vec::with_capacity(INITIAL_STACK_CAPACITY);
        state_stack.push(State::Root);
        Self {
            sink,
            policy,
            state: State::Start,
            state_stack,
            nesting_depth: 0,
            max_depth: usize::MAX,
            line: 1,
            column: 1,
            source: Source::new(),
            string_buffer: Vec::new(),
            validator: C::Validator::default(),
            is_negative: false,
            precision: 0,
            escape: UnicodeEscapeBuffer::default(),
            cp: 0,
            cp2: 0,
            literal: LiteralMatcher::none(),
            begun: false,
            #[cfg(test)]
            buffered_string_emissions: 0,
        }
    }

    /// Installs a new input span. Machine state is untouched, so chunked
    /// input resumes exactly where the previous span left off.
    pub fn set_source(&mut self, span: &[C]) {
        self.source.install(span);
    }

    /// Whether the cursor has consumed the current span.
    pub fn source_exhausted(&self) -> bool {
        self.source.exhausted()
    }

    /// Whether a complete document has been parsed.
    pub fn done(&self) -> bool {
        self.state == State::Done
    }

    pub fn line_number(&self) -> usize {
        self.line
    }

    pub fn column_number(&self) -> usize {
        self.column
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_depth
    }

    /// Caps the number of simultaneously open objects and arrays; opening
    /// one beyond the cap reports [`ErrorKind::MaxDepthExceeded`].
    pub fn set_max_nesting_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    /// Returns the parser to its initial condition so it can parse another
    /// document. The depth cap and the collaborators are kept.
    pub fn reset(&mut self) {
        self.state_stack.clear();
        self.state_stack.push(State::Root);
        self.state = State::Start;
        self.line = 1;
        self.column = 1;
        self.nesting_depth = 0;
        self.string_buffer.clear();
        self.validator.reset();
        self.is_negative = false;
        self.precision = 0;
        self.escape.reset();
        self.literal = LiteralMatcher::none();
        self.begun = false;
    }

    /// Advances the machine until the current span is exhausted or the
    /// document is complete.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        while self.state != State::Done {
            let Some(c) = self.source.peek() else { break };
            let u = c.as_u32();
            let ch = char::from_u32(u).unwrap_or('\u{FFFD}');
            match self.state {
                State::Cr => {
                    self.line += 1;
                    self.column = 1;
                    self.state = self.pop_state();
                    if ch == '\n' {
                        self.source.bump();
                    }
                }
                State::Lf => {
                    self.line += 1;
                    self.column = 1;
                    self.state = self.pop_state();
                }
                State::Start => {
                    if !self.begun {
                        self.begun = true;
                        self.sink.begin_json(&ParseContext::new(self.line, self.column));
                    }
                    self.step_start(c, ch)?;
                }
                State::ExpectCommaOrEnd => self.step_expect_comma_or_end(ch)?,
                State::ExpectMemberNameOrEnd => self.step_expect_member_name_or_end(ch)?,
                State::ExpectMemberName => self.step_expect_member_name(ch)?,
                State::ExpectColon => self.step_expect_colon(ch)?,
                State::ExpectValue => self.step_expect_value(c, ch)?,
                State::ExpectValueOrEnd => self.step_expect_value_or_end(c, ch)?,
                State::StringContent
                | State::Escape
                | State::EscapeUnicode
                | State::EscapeExpectSurrogatePair1
                | State::EscapeExpectSurrogatePair2
                | State::EscapeUnicodeSurrogate => self.parse_string()?,
                State::Minus
                | State::Zero
                | State::Integer
                | State::Fraction1
                | State::Fraction2
                | State::Exp1
                | State::Exp2
                | State::Exp3 => self.parse_number()?,
                State::Literal => match self.literal.step(u) {
                    Step::NeedMore => self.advance(),
                    Step::Done(keyword) => {
                        self.advance();
                        self.emit_keyword(keyword);
                    }
                    Step::Reject => return Err(self.fail(ErrorKind::InvalidValue)),
                },
                State::Slash => {
                    match ch {
                        '*' => {
                            self.state = State::SlashStar;
                            self.report(ErrorKind::IllegalComment)?;
                        }
                        '/' => {
                            self.state = State::SlashSlash;
                            self.report(ErrorKind::IllegalComment)?;
                        }
                        _ => self.report(ErrorKind::InvalidJsonText)?,
                    }
                    self.advance();
                }
                State::SlashSlash => match ch {
                    '\r' | '\n' => self.state = self.pop_state(),
                    _ => self.advance(),
                },
                State::SlashStar => {
                    match ch {
                        '\r' => {
                            self.push_state(State::SlashStar);
                            self.state = State::Cr;
                        }
                        '\n' => {
                            self.push_state(State::SlashStar);
                            self.state = State::Lf;
                        }
                        '*' => self.state = State::SlashStarStar,
                        _ => {}
                    }
                    self.advance();
                }
                State::SlashStarStar => {
                    match ch {
                        '/' => self.state = self.pop_state(),
                        _ => self.state = State::SlashStar,
                    }
                    self.advance();
                }
                State::Root | State::Object | State::Array | State::MemberName | State::Done => {
                    unreachable!()
                }
            }
        }
        Ok(())
    }

    /// Signals end of input. A number pending at the root is flushed; any
    /// other unfinished state reports [`ErrorKind::UnexpectedEof`].
    pub fn end_parse(&mut self) -> Result<(), ParseError> {
        if self.parent() == State::Root {
            match self.state {
                State::Zero | State::Integer => self.end_integer_value()?,
                State::Fraction2 | State::Exp3 => self.end_fraction_value()?,
                _ => {}
            }
        }
        if self.state == State::Cr || self.state == State::Lf {
            self.state = self.pop_state();
        }
        if !(self.state == State::Done || self.state == State::Start) {
            self.report(ErrorKind::UnexpectedEof)?;
        }
        Ok(())
    }

    /// Verifies that nothing but whitespace follows the document.
    pub fn check_done(&mut self) -> Result<(), ParseError> {
        if self.state != State::Done {
            self.report(ErrorKind::UnexpectedEof)?;
        }
        while let Some(c) = self.source.peek() {
            match c.as_u32() {
                0x09 | 0x0A | 0x0D | 0x20 => self.source.bump(),
                _ => {
                    self.report(ErrorKind::ExtraCharacter)?;
                    self.source.bump();
                }
            }
        }
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Structural states
    // ----------------------------------------------------------------------

    /// Whitespace, line breaks, comment openers and stray control characters
    /// common to every structural state. Returns `true` when the character
    /// was handled.
    fn step_filler(&mut self, ch: char) -> Result<bool, ParseError> {
        match ch {
            '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' => {
                self.report(ErrorKind::IllegalControlCharacter)?;
                // recovery: skip
                self.advance();
                Ok(true)
            }
            '\r' => {
                self.advance();
                self.push_state(self.state);
                self.state = State::Cr;
                Ok(true)
            }
            '\n' => {
                self.advance();
                self.push_state(self.state);
                self.state = State::Lf;
                Ok(true)
            }
            ' ' | '\t' => {
                self.skip_whitespace();
                Ok(true)
            }
            '/' => {
                self.advance();
                self.push_state(self.state);
                self.state = State::Slash;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Characters that may begin a value. Returns `false` when the character
    /// does not start one.
    fn step_value_start(&mut self, c: C, ch: char) -> Result<bool, ParseError> {
        match ch {
            '{' => {
                self.do_begin_object()?;
                self.advance();
            }
            '[' => {
                self.do_begin_array()?;
                self.advance();
            }
            '"' => {
                self.advance();
                self.state = State::StringContent;
            }
            '-' => {
                self.is_negative = true;
                self.advance();
                self.state = State::Minus;
            }
            '0' => {
                self.string_buffer.push(c);
                self.advance();
                self.state = State::Zero;
            }
            '1'..='9' => {
                self.string_buffer.push(c);
                self.advance();
                self.state = State::Integer;
            }
            'n' => self.begin_literal(Keyword::Null),
            't' => self.begin_literal(Keyword::True),
            'f' => self.begin_literal(Keyword::False),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn step_start(&mut self, c: C, ch: char) -> Result<(), ParseError> {
        if self.step_filler(ch)? {
            return Ok(());
        }
        if self.step_value_start(c, ch)? {
            return Ok(());
        }
        match ch {
            '}' => Err(self.fatal(ErrorKind::UnexpectedRightBrace)),
            ']' => Err(self.fatal(ErrorKind::UnexpectedRightBracket)),
            _ => Err(self.fatal(ErrorKind::InvalidJsonText)),
        }
    }

    fn step_expect_comma_or_end(&mut self, ch: char) -> Result<(), ParseError> {
        if self.step_filler(ch)? {
            return Ok(());
        }
        match ch {
            '}' => {
                self.do_end_object()?;
                self.advance();
            }
            ']' => {
                self.do_end_array()?;
                self.advance();
            }
            ',' => {
                self.begin_member_or_element()?;
                self.advance();
            }
            _ => {
                match self.parent() {
                    State::Array => self.report(ErrorKind::ExpectedCommaOrRightBracket)?,
                    State::Object => self.report(ErrorKind::ExpectedCommaOrRightBrace)?,
                    _ => {}
                }
                // recovery: skip
                self.advance();
            }
        }
        Ok(())
    }

    fn step_expect_member_name_or_end(&mut self, ch: char) -> Result<(), ParseError> {
        if self.step_filler(ch)? {
            return Ok(());
        }
        match ch {
            '}' => {
                self.do_end_object()?;
                self.advance();
            }
            '"' => {
                self.advance();
                self.push_state(State::MemberName);
                self.state = State::StringContent;
            }
            '\'' => {
                self.report(ErrorKind::SingleQuote)?;
                self.advance();
            }
            _ => {
                self.report(ErrorKind::ExpectedName)?;
                self.advance();
            }
        }
        Ok(())
    }

    fn step_expect_member_name(&mut self, ch: char) -> Result<(), ParseError> {
        if self.step_filler(ch)? {
            return Ok(());
        }
        match ch {
            '"' => {
                self.advance();
                self.push_state(State::MemberName);
                self.state = State::StringContent;
            }
            '}' => {
                self.report(ErrorKind::ExtraComma)?;
                // recovery: close the object
                self.do_end_object()?;
                self.advance();
            }
            '\'' => {
                self.report(ErrorKind::SingleQuote)?;
                self.advance();
            }
            _ => {
                self.report(ErrorKind::ExpectedName)?;
                self.advance();
            }
        }
        Ok(())
    }

    fn step_expect_colon(&mut self, ch: char) -> Result<(), ParseError> {
        if self.step_filler(ch)? {
            return Ok(());
        }
        match ch {
            ':' => {
                self.state = State::ExpectValue;
                self.advance();
            }
            _ => {
                self.report(ErrorKind::ExpectedColon)?;
                self.advance();
            }
        }
        Ok(())
    }

    fn step_expect_value(&mut self, c: C, ch: char) -> Result<(), ParseError> {
        if self.step_filler(ch)? {
            return Ok(());
        }
        if self.step_value_start(c, ch)? {
            return Ok(());
        }
        match ch {
            ']' => {
                if self.parent() == State::Array {
                    self.report(ErrorKind::ExtraComma)?;
                    // recovery: close the array
                    self.do_end_array()?;
                } else {
                    self.report(ErrorKind::ExpectedValue)?;
                }
                self.advance();
            }
            '\'' => {
                self.report(ErrorKind::SingleQuote)?;
                self.advance();
            }
            _ => {
                self.report(ErrorKind::ExpectedValue)?;
                self.advance();
            }
        }
        Ok(())
    }

    fn step_expect_value_or_end(&mut self, c: C, ch: char) -> Result<(), ParseError> {
        if self.step_filler(ch)? {
            return Ok(());
        }
        if self.step_value_start(c, ch)? {
            return Ok(());
        }
        match ch {
            ']' => {
                self.do_end_array()?;
                self.advance();
            }
            '\'' => {
                self.report(ErrorKind::SingleQuote)?;
                self.advance();
            }
            _ => {
                self.report(ErrorKind::ExpectedValue)?;
                self.advance();
            }
        }
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Containers
    // ----------------------------------------------------------------------

    fn do_begin_object(&mut self) -> Result<(), ParseError> {
        self.nesting_depth += 1;
        if self.nesting_depth > self.max_depth {
            self.report(ErrorKind::MaxDepthExceeded)?;
        }
        self.push_state(State::Object);
        self.state = State::ExpectMemberNameOrEnd;
        self.sink.begin_object(&ParseContext::new(self.line, self.column));
        Ok(())
    }

    fn do_end_object(&mut self) -> Result<(), ParseError> {
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
        self.state = self.pop_state();
        match self.state {
            State::Object => {
                self.sink.end_object(&ParseContext::new(self.line, self.column));
            }
            State::Array => return Err(self.fatal(ErrorKind::ExpectedCommaOrRightBracket)),
            _ => return Err(self.fatal(ErrorKind::UnexpectedRightBrace)),
        }
        self.after_value();
        Ok(())
    }

    fn do_begin_array(&mut self) -> Result<(), ParseError> {
        self.nesting_depth += 1;
        if self.nesting_depth > self.max_depth {
            self.report(ErrorKind::MaxDepthExceeded)?;
        }
        self.push_state(State::Array);
        self.state = State::ExpectValueOrEnd;
        self.sink.begin_array(&ParseContext::new(self.line, self.column));
        Ok(())
    }

    fn do_end_array(&mut self) -> Result<(), ParseError> {
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
        self.state = self.pop_state();
        match self.state {
            State::Array => {
                self.sink.end_array(&ParseContext::new(self.line, self.column));
            }
            State::Object => return Err(self.fatal(ErrorKind::ExpectedCommaOrRightBrace)),
            _ => return Err(self.fatal(ErrorKind::UnexpectedRightBracket)),
        }
        self.after_value();
        Ok(())
    }

    fn begin_member_or_element(&mut self) -> Result<(), ParseError> {
        match self.parent() {
            State::Object => self.state = State::ExpectMemberName,
            State::Array => self.state = State::ExpectValue,
            State::Root => {}
            _ => self.report(ErrorKind::InvalidJsonText)?,
        }
        Ok(())
    }

    /// The structural transition after a completed value.
    fn after_value(&mut self) {
        if self.parent() == State::Root {
            self.state = State::Done;
            self.sink.end_json(&ParseContext::new(self.line, self.column));
        } else {
            self.state = State::ExpectCommaOrEnd;
        }
    }

    // ----------------------------------------------------------------------
    // Keywords
    // ----------------------------------------------------------------------

    fn begin_literal(&mut self, keyword: Keyword) {
        let lit = keyword.text();
        if self.source.matches_ascii(lit) {
            self.source.bump_n(lit.len());
            self.column += lit.len();
            self.emit_keyword(keyword);
        } else {
            // Straddling a chunk boundary, or a typo; match unit by unit so
            // a mismatch is reported at the offending character.
            self.advance();
            self.literal = LiteralMatcher::start(keyword);
            self.state = State::Literal;
        }
    }

    fn emit_keyword(&mut self, keyword: Keyword) {
        let ctx = ParseContext::new(self.line, self.column);
        match keyword {
            Keyword::Null => self.sink.null_value(&ctx),
            Keyword::True => self.sink.bool_value(true, &ctx),
            Keyword::False => self.sink.bool_value(false, &ctx),
        }
        self.after_value();
    }

    // ----------------------------------------------------------------------
    // Numbers
    // ----------------------------------------------------------------------

    fn parse_number(&mut self) -> Result<(), ParseError> {
        loop {
            let Some(c) = self.source.peek() else {
                // Chunk boundary: the state and buffered digits resume later.
                return Ok(());
            };
            let ch = char::from_u32(c.as_u32()).unwrap_or('\u{FFFD}');
            match self.state {
                State::Minus => match ch {
                    '0' => {
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Zero;
                    }
                    '1'..='9' => {
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Integer;
                    }
                    _ => return Err(self.fail(ErrorKind::ExpectedValue)),
                },
                State::Zero => match ch {
                    '0'..='9' => return Err(self.fail(ErrorKind::LeadingZero)),
                    '.' => {
                        self.precision = digit_precision(self.string_buffer.len());
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Fraction1;
                    }
                    'e' | 'E' => {
                        self.precision = digit_precision(self.string_buffer.len());
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Exp1;
                    }
                    _ => return self.number_terminator(ch, false),
                },
                State::Integer => match ch {
                    '0'..='9' => {
                        self.string_buffer.push(c);
                        self.advance();
                    }
                    '.' => {
                        self.precision = digit_precision(self.string_buffer.len());
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Fraction1;
                    }
                    'e' | 'E' => {
                        self.precision = digit_precision(self.string_buffer.len());
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Exp1;
                    }
                    _ => return self.number_terminator(ch, false),
                },
                State::Fraction1 => match ch {
                    '0'..='9' => {
                        self.precision = self.precision.saturating_add(1);
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Fraction2;
                    }
                    _ => return Err(self.fail(ErrorKind::InvalidNumber)),
                },
                State::Fraction2 => match ch {
                    '0'..='9' => {
                        self.precision = self.precision.saturating_add(1);
                        self.string_buffer.push(c);
                        self.advance();
                    }
                    'e' | 'E' => {
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Exp1;
                    }
                    _ => return self.number_terminator(ch, true),
                },
                State::Exp1 => match ch {
                    '+' => {
                        self.advance();
                        self.state = State::Exp2;
                    }
                    '-' => {
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Exp2;
                    }
                    '0'..='9' => {
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Exp3;
                    }
                    _ => return Err(self.fail(ErrorKind::ExpectedValue)),
                },
                State::Exp2 => match ch {
                    '0'..='9' => {
                        self.string_buffer.push(c);
                        self.advance();
                        self.state = State::Exp3;
                    }
                    _ => return Err(self.fail(ErrorKind::ExpectedValue)),
                },
                State::Exp3 => match ch {
                    '0'..='9' => {
                        self.string_buffer.push(c);
                        self.advance();
                    }
                    _ => return self.number_terminator(ch, true),
                },
                _ => unreachable!(),
            }
        }
    }

    /// Emits the pending number and handles the terminating character. The
    /// terminator itself belongs to the enclosing structure.
    fn number_terminator(&mut self, ch: char, fraction: bool) -> Result<(), ParseError> {
        match ch {
            '\r' => {
                self.emit_number(fraction)?;
                self.advance();
                self.push_state(self.state);
                self.state = State::Cr;
                Ok(())
            }
            '\n' => {
                self.emit_number(fraction)?;
                self.advance();
                self.push_state(self.state);
                self.state = State::Lf;
                Ok(())
            }
            ' ' | '\t' => {
                self.emit_number(fraction)?;
                self.skip_whitespace();
                Ok(())
            }
            '/' => {
                self.emit_number(fraction)?;
                self.advance();
                self.push_state(self.state);
                self.state = State::Slash;
                Ok(())
            }
            '}' => {
                self.emit_number(fraction)?;
                self.do_end_object()?;
                self.advance();
                Ok(())
            }
            ']' => {
                self.emit_number(fraction)?;
                self.do_end_array()?;
                self.advance();
                Ok(())
            }
            ',' => {
                self.emit_number(fraction)?;
                self.begin_member_or_element()?;
                self.advance();
                Ok(())
            }
            _ => Err(self.fail(ErrorKind::InvalidNumber)),
        }
    }

    fn emit_number(&mut self, fraction: bool) -> Result<(), ParseError> {
        if fraction {
            self.end_fraction_value()
        } else {
            self.end_integer_value()
        }
    }

    /// Emits a number with no fraction and no exponent: 64-bit integer when
    /// in range, double otherwise.
    fn end_integer_value(&mut self) -> Result<(), ParseError> {
        let ctx = ParseContext::new(self.line, self.column);
        if self.is_negative {
            if let Some(n) = numbers::try_parse_negative_i64(&self.string_buffer) {
                self.sink.integer_value(n, &ctx);
            } else {
                let precision = digit_precision(self.string_buffer.len());
                match numbers::double_parse(&self.string_buffer) {
                    Ok(d) => self.sink.double_value(-d, precision, &ctx),
                    Err(_) => {
                        self.report(ErrorKind::InvalidNumber)?;
                        // recovery: a null in place of the number
                        self.sink.null_value(&ctx);
                    }
                }
            }
        } else if let Some(n) = numbers::try_parse_u64(&self.string_buffer) {
            self.sink.uinteger_value(n, &ctx);
        } else {
            let precision = digit_precision(self.string_buffer.len());
            match numbers::double_parse(&self.string_buffer) {
                Ok(d) => self.sink.double_value(d, precision, &ctx),
                Err(_) => {
                    self.report(ErrorKind::InvalidNumber)?;
                    self.sink.null_value(&ctx);
                }
            }
        }
        self.string_buffer.clear();
        self.is_negative = false;
        self.precision = 0;
        self.after_value();
        Ok(())
    }

    /// Emits a number that carries a fraction or exponent as a double.
    fn end_fraction_value(&mut self) -> Result<(), ParseError> {
        let ctx = ParseContext::new(self.line, self.column);
        match numbers::double_parse(&self.string_buffer) {
            Ok(d) => {
                let d = if self.is_negative { -d } else { d };
                self.sink.double_value(d, self.precision, &ctx);
            }
            Err(_) => {
                self.report(ErrorKind::InvalidNumber)?;
                self.sink.null_value(&ctx);
            }
        }
        self.string_buffer.clear();
        self.is_negative = false;
        self.precision = 0;
        self.after_value();
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Strings
    // ----------------------------------------------------------------------

    fn parse_string(&mut self) -> Result<(), ParseError> {
        let mut sb = self.source.pos();
        loop {
            match self.state {
                State::StringContent => {
                    let Some(c) = self.source.peek() else {
                        // Chunk boundary: carry the raw run into the scratch
                        // buffer; an incomplete trailing sequence stays
                        // pending in the validator.
                        self.take_span(sb, true, true)?;
                        return Ok(());
                    };
                    match c.as_u32() {
                        0x22 => {
                            // Closing quote.
                            let copy = !self.string_buffer.is_empty();
                            let clean = self.take_span(sb, false, copy)?;
                            if clean && !copy {
                                self.end_string_value(sb, false)?;
                            } else {
                                #[cfg(test)]
                                {
                                    self.buffered_string_emissions += 1;
                                }
                                self.end_string_value(sb, true)?;
                                self.string_buffer.clear();
                            }
                            self.source.bump();
                            self.column += 1;
                            return Ok(());
                        }
                        0x5C => {
                            // Escape: stash the raw run, resolve after it.
                            self.take_span(sb, false, true)?;
                            self.source.bump();
                            self.column += 1;
                            self.state = State::Escape;
                        }
                        0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F => {
                            self.take_span(sb, false, true)?;
                            self.report(ErrorKind::IllegalControlCharacter)?;
                            // recovery: skip the character
                            self.source.bump();
                            self.column += 1;
                            return Ok(());
                        }
                        0x0D => {
                            self.take_span(sb, false, true)?;
                            self.report(ErrorKind::IllegalCharacterInString)?;
                            // recovery: keep the character
                            self.string_buffer.push(c);
                            self.source.bump();
                            self.column += 1;
                            self.push_state(State::StringContent);
                            self.state = State::Cr;
                            return Ok(());
                        }
                        0x0A => {
                            self.take_span(sb, false, true)?;
                            self.report(ErrorKind::IllegalCharacterInString)?;
                            // recovery: keep the character
                            self.string_buffer.push(c);
                            self.source.bump();
                            self.column += 1;
                            self.push_state(State::StringContent);
                            self.state = State::Lf;
                            return Ok(());
                        }
                        0x09 => {
                            self.take_span(sb, false, true)?;
                            self.report(ErrorKind::IllegalCharacterInString)?;
                            // recovery: keep the character
                            self.string_buffer.push(c);
                            self.source.bump();
                            self.column += 1;
                            return Ok(());
                        }
                        _ => self.source.bump(),
                    }
                }
                State::Escape => {
                    let Some(c) = self.source.peek() else {
                        return Ok(());
                    };
                    match char::from_u32(c.as_u32()).unwrap_or('\u{FFFD}') {
                        'u' => {
                            self.escape.reset();
                            self.cp = 0;
                            self.advance();
                            self.state = State::EscapeUnicode;
                        }
                        ch => {
                            let resolved = match ch {
                                '"' | '\\' | '/' => c,
                                'b' => C::from_ascii(0x08),
                                'f' => C::from_ascii(0x0C),
                                'n' => C::from_ascii(b'\n'),
                                'r' => C::from_ascii(b'\r'),
                                't' => C::from_ascii(b'\t'),
                                _ => return Err(self.fail(ErrorKind::IllegalEscapedCharacter)),
                            };
                            self.string_buffer.push(resolved);
                            self.advance();
                            self.state = State::StringContent;
                            sb = self.source.pos();
                        }
                    }
                }
                State::EscapeUnicode => {
                    let Some(c) = self.source.peek() else {
                        return Ok(());
                    };
                    let Some(digit) = hex_digit(c.as_u32()) else {
                        return Err(self.fail(ErrorKind::InvalidHexEscapeSequence));
                    };
                    self.advance();
                    if let Some(unit) = self.escape.push_hex(digit) {
                        self.cp = unit;
                        if unicode::is_high_surrogate(unit) {
                            self.state = State::EscapeExpectSurrogatePair1;
                        } else if unicode::is_low_surrogate(unit) {
                            self.report(ErrorKind::IllegalSurrogateValue)?;
                            // recovery: drop the escape
                            self.state = State::StringContent;
                            sb = self.source.pos();
                        } else {
                            C::push_scalar(unit, &mut self.string_buffer);
                            self.state = State::StringContent;
                            sb = self.source.pos();
                        }
                    }
                }
                State::EscapeExpectSurrogatePair1 => {
                    let Some(c) = self.source.peek() else {
                        return Ok(());
                    };
                    if c.as_u32() == u32::from(b'\\') {
                        self.cp2 = 0;
                        self.advance();
                        self.state = State::EscapeExpectSurrogatePair2;
                    } else {
                        return Err(self.fail(ErrorKind::ExpectedCodepointSurrogatePair));
                    }
                }
                State::EscapeExpectSurrogatePair2 => {
                    let Some(c) = self.source.peek() else {
                        return Ok(());
                    };
                    if c.as_u32() == u32::from(b'u') {
                        self.escape.reset();
                        self.advance();
                        self.state = State::EscapeUnicodeSurrogate;
                    } else {
                        return Err(self.fail(ErrorKind::ExpectedCodepointSurrogatePair));
                    }
                }
                State::EscapeUnicodeSurrogate => {
                    let Some(c) = self.source.peek() else {
                        return Ok(());
                    };
                    let Some(digit) = hex_digit(c.as_u32()) else {
                        return Err(self.fail(ErrorKind::InvalidHexEscapeSequence));
                    };
                    self.advance();
                    if let Some(unit) = self.escape.push_hex(digit) {
                        self.cp2 = unit;
                        if unicode::is_low_surrogate(unit) {
                            let scalar = unicode::combine_surrogates(self.cp, self.cp2);
                            C::push_scalar(scalar, &mut self.string_buffer);
                        } else {
                            self.report(ErrorKind::UnpairedHighSurrogate)?;
                            // recovery: drop both escapes
                        }
                        self.state = State::StringContent;
                        sb = self.source.pos();
                    }
                }
                _ => unreachable!(),
            }
        }
    }

    /// Validates the raw run `[sb, p)` and folds it into the scratch buffer
    /// as needed, advancing `column` over the run. Recovery for an invalid
    /// sequence keeps the valid parts and drops the offending units, so the
    /// outcome does not depend on where chunk boundaries fell. With
    /// `partial` an incomplete trailing sequence stays pending in the
    /// validator; otherwise it is reported here. Returns `true` when the run
    /// was a single clean stretch (left in place unless `copy` is set).
    fn take_span(&mut self, sb: usize, partial: bool, copy: bool) -> Result<bool, ParseError> {
        let mut start = sb;
        let mut clean = true;
        loop {
            match self.validator.validate_partial(self.source.span_from(start)) {
                Ok(()) => break,
                Err(e) => {
                    clean = false;
                    self.string_buffer
                        .extend_from_slice(&self.source.span_from(start)[..e.valid_up_to]);
                    self.string_buffer
                        .truncate(self.string_buffer.len().saturating_sub(e.rewind));
                    self.column += e.valid_up_to;
                    self.column -= e.rewind;
                    self.report(e.kind.into())?;
                    self.column += e.rewind;
                    if e.rewind == 0 {
                        // recovery: drop the sequence's first unit and
                        // re-validate what followed it
                        self.column += 1;
                        start += e.valid_up_to + 1;
                    } else {
                        // recovery: the dropped units sat in earlier chunks;
                        // re-validate from the current unit
                        start += e.valid_up_to;
                    }
                }
            }
        }

        let end = self.source.pos();
        if !partial {
            if let Some((pending, kind)) = self.validator.pending() {
                // A sequence truncated at a boundary that requires it whole.
                // If it began in an earlier chunk, this span holds only its
                // continuation units, so `keep` is zero.
                let in_this_span = pending.min(end - start);
                let carried = pending - in_this_span;
                let keep = end - start - in_this_span;
                self.column += keep;
                self.column -= carried;
                self.report(kind.into())?;
                // recovery: drop the truncated sequence, including units
                // already carried over from earlier chunks
                self.string_buffer
                    .truncate(self.string_buffer.len().saturating_sub(carried));
                self.string_buffer
                    .extend_from_slice(&self.source.span_from(start)[..keep]);
                self.validator.reset();
                self.column += carried + in_this_span;
                return Ok(false);
            }
        }

        if copy || !clean {
            self.string_buffer.extend_from_slice(self.source.span_from(start));
        }
        self.column += end - start;
        Ok(clean)
    }

    /// Emits the completed string or member name. The text is either the raw
    /// run starting at `sb` (no escapes were seen) or the scratch buffer.
    fn end_string_value(&mut self, sb: usize, buffered: bool) -> Result<(), ParseError> {
        let ctx = ParseContext::new(self.line, self.column);
        let span: &[C] = if buffered {
            &self.string_buffer
        } else {
            self.source.span_from(sb)
        };
        // SAFETY: every span reaching emission has passed the validator.
        let text = unsafe { C::text_unchecked(span) };
        match self.parent() {
            State::MemberName => {
                self.sink.name(text, &ctx);
                self.pop_state();
                self.state = State::ExpectColon;
                Ok(())
            }
            State::Object | State::Array => {
                self.sink.string_value(text, &ctx);
                self.state = State::ExpectCommaOrEnd;
                Ok(())
            }
            State::Root => {
                self.sink.string_value(text, &ctx);
                self.state = State::Done;
                self.sink.end_json(&ctx);
                Ok(())
            }
            _ => {
                self.report(ErrorKind::InvalidJsonText)?;
                Ok(())
            }
        }
    }

    // ----------------------------------------------------------------------
    // Plumbing
    // ----------------------------------------------------------------------

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.source.peek() {
            match c.as_u32() {
                0x20 | 0x09 => {
                    self.source.bump();
                    self.column += 1;
                }
                _ => break,
            }
        }
    }

    #[inline]
    fn advance(&mut self) {
        self.source.bump();
        self.column += 1;
    }

    fn push_state(&mut self, state: State) {
        self.state_stack.push(state);
    }

    fn pop_state(&mut self) -> State {
        debug_assert!(!self.state_stack.is_empty());
        self.state_stack.pop().unwrap_or(State::Root)
    }

    fn parent(&self) -> State {
        *self.state_stack.last().unwrap_or(&State::Root)
    }

    /// Reports a recoverable error; `Err` when the policy aborts.
    fn report(&mut self, kind: ErrorKind) -> Result<(), ParseError> {
        if self
            .policy
            .error(kind, &ParseContext::new(self.line, self.column))
        {
            Err(ParseError {
                kind,
                line: self.line,
                column: self.column,
            })
        } else {
            Ok(())
        }
    }

    /// Notifies the policy, then aborts regardless of its verdict.
    fn fail(&mut self, kind: ErrorKind) -> ParseError {
        let _ = self
            .policy
            .error(kind, &ParseContext::new(self.line, self.column));
        ParseError {
            kind,
            line: self.line,
            column: self.column,
        }
    }

    /// A structural mismatch; never recoverable.
    fn fatal(&mut self, kind: ErrorKind) -> ParseError {
        self.policy
            .fatal_error(kind, &ParseContext::new(self.line, self.column));
        ParseError {
            kind,
            line: self.line,
            column: self.column,
        }
    }
}

/// Significant-digit count for the double event, saturating at `u8::MAX`.
fn digit_precision(digits: usize) -> u8 {
    u8::try_from(digits).unwrap_or(u8::MAX)
}
