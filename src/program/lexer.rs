//! Lexer for Brainfuck source
//!
//! Converts raw source bytes into a flat [`Token`] stream. The eight command
//! characters are recognised; every other byte is a comment. Runs of `+`/`-`
//! fold into one [`Op::Add`] and runs of `<`/`>` into one [`Op::Shift`]; runs
//! that cancel out vanish.

use std::fmt;

/// Line and column of a source character (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        SourceLocation { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// One folded operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Add to the current cell, modulo 256
    Add(u8),
    /// Move the cursor; negative is left
    Shift(isize),
    Read,
    Write,
    LoopStart,
    LoopEnd,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Add(n) => write!(f, "+{}", n),
            Op::Shift(n) if *n < 0 => write!(f, "<{}", -n),
            Op::Shift(n) => write!(f, ">{}", n),
            Op::Read => write!(f, ","),
            Op::Write => write!(f, "."),
            Op::LoopStart => write!(f, "["),
            Op::LoopEnd => write!(f, "]"),
        }
    }
}

/// An operation and where it starts in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub op: Op,
    pub location: SourceLocation,
}

/// Tokenize Brainfuck source
pub fn lex(source: &[u8]) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut line = 1;
    let mut column = 1;

    for &byte in source {
        let location = SourceLocation::new(line, column);
        if byte == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }

        let op = match byte {
            b'+' => Op::Add(1),
            b'-' => Op::Add(u8::MAX),
            b'>' => Op::Shift(1),
            b'<' => Op::Shift(-1),
            b',' => Op::Read,
            b'.' => Op::Write,
            b'[' => Op::LoopStart,
            b']' => Op::LoopEnd,
            _ => continue,
        };

        // Fold into the previous token when both are the same kind of run
        let folded = match (tokens.last_mut().map(|t| &mut t.op), op) {
            (Some(Op::Add(total)), Op::Add(n)) => {
                *total = total.wrapping_add(n);
                true
            }
            (Some(Op::Shift(total)), Op::Shift(n)) => {
                *total += n;
                true
            }
            _ => false,
        };

        if !folded {
            tokens.push(Token { op, location });
        } else if matches!(
            tokens.last().map(|t| t.op),
            Some(Op::Add(0) | Op::Shift(0))
        ) {
            tokens.pop();
        }
    }

    tokens
}
