//! The current input span and its cursor.
//!
//! Chunks are copied in on [`install`](Source::install); the cursor survives
//! across `parse` calls so an abort-and-continue policy can resume where it
//! stopped. Raw string runs are emitted as sub-slices of this buffer, which
//! keeps the no-escape string path free of scratch-buffer copies.

use alloc::vec::Vec;

use crate::text::CodeUnit;

#[derive(Debug)]
pub(crate) struct Source<C> {
    data: Vec<C>,
    p: usize,
}

impl<C: CodeUnit> Source<C> {
    pub(crate) fn new() -> Self {
        Self {
            data: Vec::new(),
            p: 0,
        }
    }

    /// Replaces the span; the cursor restarts at its beginning.
    pub(crate) fn install(&mut self, span: &[C]) {
        self.data.clear();
        self.data.extend_from_slice(span);
        self.p = 0;
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<C> {
        self.data.get(self.p).copied()
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.p += 1;
    }

    pub(crate) fn bump_n(&mut self, n: usize) {
        self.p += n;
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.p
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.p
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.p >= self.data.len()
    }

    /// The raw run from `start` up to the cursor.
    pub(crate) fn span_from(&self, start: usize) -> &[C] {
        &self.data[start..self.p]
    }

    /// Whether the units at the cursor spell the ASCII literal.
    pub(crate) fn matches_ascii(&self, lit: &[u8]) -> bool {
        self.remaining() >= lit.len()
            && lit
                .iter()
                .enumerate()
                .all(|(i, &b)| self.data[self.p + i].as_u32() == u32::from(b))
    }
}
