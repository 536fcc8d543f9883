use std::fmt;

use crate::TokenKind;

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenSet {
    bits: u32,
}

impl TokenSet {
    pub const EMPTY: Self = Self { bits: 0 };

    pub const WHITESPACE: Self = Self::new([
        TokenKind::SPACE,
        TokenKind::NEWLINE,
        TokenKind::COMMA,
        TokenKind::COMMENT,
    ]);

    pub const TRIVIA: Self = Self::WHITESPACE.union(Self::new([TokenKind::DOC_COMMENT]));

    const fn from_kind(kind: TokenKind) -> Self {
        let kind = kind as u32;

        debug_assert!(kind < u32::BITS, "Index out of bounds. Increase the size of the bitset.");

        Self { bits: 1 << kind }
    }

    pub const fn union(mut self, other: Self) -> Self {
        self.bits |= other.bits;
        self
    }

    pub const fn new<const N: usize>(kinds: [TokenKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            set = set.union(Self::from_kind(kinds[i]));
            i += 1;
        }

        set
    }

    pub const fn contains(self, kind: TokenKind) -> bool {
        self.bits & Self::from_kind(kind).bits != 0
    }

    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL.into_iter().filter(move |&kind| self.contains(kind))
    }
}

impl From<TokenKind> for TokenSet {
    fn from(kind: TokenKind) -> Self {
        Self::from_kind(kind)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
