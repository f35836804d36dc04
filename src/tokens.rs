use core::slice::Iter;

use crate::Token;

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Tokens                                    ║
║                                   ¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// An iterator over the decoded tokens of a [`Pointer`](crate::Pointer).
#[derive(Debug, Clone)]
pub struct Tokens<'p> {
    inner: Iter<'p, Token<'static>>,
}

impl<'p> Iterator for Tokens<'p> {
    type Item = &'p Token<'static>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Tokens<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Tokens<'_> {}

impl<'p> Tokens<'p> {
    pub(crate) fn new(inner: Iter<'p, Token<'static>>) -> Self {
        Self { inner }
    }
}
