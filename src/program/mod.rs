//! Reference hosted program
//!
//! This module provides a Brainfuck program that runs under the harness like
//! any compiled one would, touching the tape only through the loaned cursor:
//! - [`lexer`]: source bytes → folded [`lexer::Token`]s
//! - [`interp`]: the [`interp::Interpreter`] hosted program
//!
//! [`Program`] is the checked form: every bracket has a partner.

pub mod interp;
pub mod lexer;

use lexer::{lex, Op, SourceLocation, Token};
use rustc_hash::FxHashMap;
use std::fmt;

/// Bracket errors found while building a [`Program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    UnmatchedLoopStart { location: SourceLocation },
    UnmatchedLoopEnd { location: SourceLocation },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnmatchedLoopStart { location } => {
                write!(f, "`[` at {} has no matching `]`", location)
            }
            ParseError::UnmatchedLoopEnd { location } => {
                write!(f, "`]` at {} has no matching `[`", location)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A tokenized program with its jump table
#[derive(Debug, Clone, Default)]
pub struct Program {
    tokens: Vec<Token>,
    /// Index of each bracket -> index of its partner, in both directions
    jumps: FxHashMap<usize, usize>,
}

impl Program {
    pub fn new(source: &[u8]) -> Result<Self, ParseError> {
        let tokens = lex(source);
        let jumps = compute_jumps(&tokens)?;
        Ok(Program { tokens, jumps })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn op(&self, index: usize) -> Option<Op> {
        self.tokens.get(index).map(|t| t.op)
    }

    /// Partner of the bracket at `index`
    pub fn jump_target(&self, index: usize) -> Option<usize> {
        self.jumps.get(&index).copied()
    }
}

fn compute_jumps(tokens: &[Token]) -> Result<FxHashMap<usize, usize>, ParseError> {
    let mut jumps = FxHashMap::default();
    let mut open = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        match token.op {
            Op::LoopStart => open.push(index),
            Op::LoopEnd => {
                let start = open.pop().ok_or(ParseError::UnmatchedLoopEnd {
                    location: token.location,
                })?;
                jumps.insert(start, index);
                jumps.insert(index, start);
            }
            _ => {}
        }
    }

    if let Some(&start) = open.last() {
        return Err(ParseError::UnmatchedLoopStart {
            location: tokens[start].location,
        });
    }

    Ok(jumps)
}
