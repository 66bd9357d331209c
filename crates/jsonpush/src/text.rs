//! Character elements the parser is generic over.
//!
//! JSON text arrives either as UTF-8 bytes or as UTF-16 code units. The
//! [`CodeUnit`] trait abstracts over the two so that a single state machine
//! serves both; [`Parser`](crate::Parser) defaults to `u8` and
//! [`WideParser`](crate::WideParser) fixes `u16`.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use crate::unicode::{Utf8Validator, Utf16Validator};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// One element of the input text: a UTF-8 byte or a UTF-16 code unit.
///
/// Sealed; the two implementations are `u8` and `u16`.
pub trait CodeUnit: sealed::Sealed + Copy + Eq + fmt::Debug + 'static {
    /// Borrowed text handed to the event sink: `str` for `u8`, `[u16]` for
    /// `u16`.
    type Text: ?Sized + fmt::Debug;

    /// Owned text stored in [`ParseEvent`](crate::ParseEvent).
    type Owned: Clone + fmt::Debug + PartialEq;

    /// Incremental well-formedness validator for raw string spans.
    type Validator: crate::unicode::SpanValidator<Self> + Default + fmt::Debug;

    /// Widens an ASCII byte into this element type.
    fn from_ascii(b: u8) -> Self;

    /// The element's code unit value.
    fn as_u32(self) -> u32;

    /// Appends one Unicode scalar value in this element's encoding.
    fn push_scalar(cp: u32, out: &mut Vec<Self>);

    /// Copies an all-ASCII span into `out` (used for number text).
    fn push_ascii(span: &[Self], out: &mut String);

    /// Reinterprets a span as sink text.
    ///
    /// # Safety
    ///
    /// `span` must have passed this element's [`Validator`](Self::Validator).
    unsafe fn text_unchecked(span: &[Self]) -> &Self::Text;

    /// Copies sink text into its owned form.
    fn to_owned_text(text: &Self::Text) -> Self::Owned;
}

impl CodeUnit for u8 {
    type Text = str;
    type Owned = String;
    type Validator = Utf8Validator;

    #[inline]
    fn from_ascii(b: u8) -> Self {
        b
    }

    #[inline]
    fn as_u32(self) -> u32 {
        u32::from(self)
    }

    fn push_scalar(cp: u32, out: &mut Vec<Self>) {
        if let Some(ch) = char::from_u32(cp) {
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
    }

    fn push_ascii(span: &[Self], out: &mut String) {
        for &b in span {
            out.push(char::from(b));
        }
    }

    unsafe fn text_unchecked(span: &[Self]) -> &Self::Text {
        // SAFETY: the caller guarantees the span passed UTF-8 validation.
        unsafe { core::str::from_utf8_unchecked(span) }
    }

    fn to_owned_text(text: &Self::Text) -> Self::Owned {
        text.to_string()
    }
}

impl CodeUnit for u16 {
    type Text = [u16];
    type Owned = Vec<u16>;
    type Validator = Utf16Validator;

    #[inline]
    fn from_ascii(b: u8) -> Self {
        u16::from(b)
    }

    #[inline]
    fn as_u32(self) -> u32 {
        u32::from(self)
    }

    fn push_scalar(cp: u32, out: &mut Vec<Self>) {
        if cp < 0x10000 {
            out.push(cp as u16);
        } else {
            let c = cp - 0x10000;
            out.push(0xD800 | (c >> 10) as u16);
            out.push(0xDC00 | (c & 0x3FF) as u16);
        }
    }

    fn push_ascii(span: &[Self], out: &mut String) {
        for &u in span {
            out.push(char::from_u32(u32::from(u)).unwrap_or('\u{FFFD}'));
        }
    }

    unsafe fn text_unchecked(span: &[Self]) -> &Self::Text {
        span
    }

    fn to_owned_text(text: &Self::Text) -> Self::Owned {
        text.to_vec()
    }
}
