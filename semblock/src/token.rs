// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! Session tokens for the semantic block query protocol.
//!
//! A [`Token`] is the 64-bit secret minted each time mode 2034 is enabled. It
//! is carried on the wire as four `u16` CSI parameters (`T1..T4`) rather than
//! a single 64-bit one, since CSI parameters are conventionally `u16`-sized.

use rand::RngCore;

/// A 64-bit session token, represented as four 16-bit parts in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(pub [u16; 4]);

impl Token {
    /// Returns the four wire parts in order.
    #[must_use]
    pub fn parts(&self) -> [u16; 4] {
        self.0
    }
}

/// Abstracts the entropy source used to mint new [`Token`]s.
///
/// Production code uses [`OsTokenSource`], backed by the operating system's
/// CSPRNG. Tests that need deterministic tokens can supply their own.
pub trait TokenSource {
    /// Produces a fresh, independent token.
    fn generate(&mut self) -> Token;
}

/// The default [`TokenSource`], backed by `rand`'s OS-seeded generator.
#[derive(Debug, Default)]
pub struct OsTokenSource;

impl TokenSource for OsTokenSource {
    fn generate(&mut self) -> Token {
        let mut rng = rand::rng();
        Token([
            rng.next_u32() as u16,
            rng.next_u32() as u16,
            rng.next_u32() as u16,
            rng.next_u32() as u16,
        ])
    }
}
