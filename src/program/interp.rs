// Brainfuck interpreter hosted by the tape runtime

use super::lexer::Op;
use super::Program;
use crate::runtime::errors::HarnessError;
use crate::runtime::harness::{HostedProgram, Session};
use log::debug;
use std::io::{self, Write};

/// Cell value stored by `,` at end of input: the low byte of C `EOF`
pub const EOF_CELL_VALUE: u8 = 0xFF;

/// Executes a [`Program`] through the harness cursor and byte I/O
#[derive(Debug, Clone)]
pub struct Interpreter {
    program: Program,

    /// Why the last run stopped early (checked addressing only)
    fault: Option<HarnessError>,

    /// Operations executed by the last run
    steps: u64,

    /// Per-operation execution counts of the last run, indexed like the program
    counts: Vec<u64>,
}

impl Interpreter {
    pub fn new(program: Program) -> Self {
        Interpreter {
            program,
            fault: None,
            steps: 0,
            counts: Vec::new(),
        }
    }

    pub fn fault(&self) -> Option<&HarnessError> {
        self.fault.as_ref()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Write how often each operation ran, one tab-separated row per operation
    pub fn write_profile<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "PC\tOP\t# EXECUTED")?;
        for (pc, count) in self.counts.iter().enumerate() {
            if let Some(op) = self.program.op(pc) {
                writeln!(out, "{}\t{}\t{}", pc, op, count)?;
            }
        }
        writeln!(out)?;
        writeln!(out, "Total operations: {}", self.steps())
    }
}

impl HostedProgram for Interpreter {
    fn enter(&mut self, session: &mut Session<'_>) {
        self.fault = None;
        self.steps = 0;
        self.counts = vec![0; self.program.len()];

        let mut pc = 0;
        while let Some(op) = self.program.op(pc) {
            self.steps += 1;
            self.counts[pc] += 1;

            match op {
                Op::Add(n) => session.cursor().add(n),
                Op::Shift(delta) => {
                    if let Err(e) = session.cursor().shift(delta) {
                        debug!("Interpreter stopped at operation {}: {}", pc, e);
                        self.fault = Some(e);
                        return;
                    }
                }
                Op::Read => {
                    let value = session.read_byte().unwrap_or(EOF_CELL_VALUE);
                    session.cursor().set(value);
                }
                Op::Write => {
                    let value = session.cursor().get();
                    session.write_byte(value);
                }
                Op::LoopStart => {
                    if session.cursor().get() == 0 {
                        pc = self.partner(pc);
                    }
                }
                Op::LoopEnd => {
                    if session.cursor().get() != 0 {
                        pc = self.partner(pc);
                    }
                }
            }

            pc += 1;
        }
    }
}

impl Interpreter {
    fn partner(&self, pc: usize) -> usize {
        // Program::new rejects unmatched brackets
        self.program
            .jump_target(pc)
            .unwrap_or_else(|| unreachable!("bracket at {} has no partner", pc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::config::{Addressing, HarnessConfig};
    use crate::runtime::harness::Harness;

    fn run(source: &str, input: &[u8], config: HarnessConfig) -> (Interpreter, Vec<u8>) {
        let mut interp = Interpreter::new(Program::new(source.as_bytes()).unwrap());
        let mut diag = Vec::new();
        let output = Harness::new(config)
            .run_with(&mut interp, input, Vec::new(), &mut diag)
            .unwrap();
        (interp, output)
    }

    #[test]
    fn test_hello_world() {
        let source = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
        let (interp, output) = run(source, b"", HarnessConfig::default());
        assert_eq!(output, b"Hello World!\n");
        assert!(interp.fault().is_none());
    }

    #[test]
    fn test_cat_until_eof() {
        // Stops when `,` stores 255 at end of input
        let (_, output) = run(",+[-.,+]", b"abc\x1a\x00z", HarnessConfig::default());
        assert_eq!(output, b"abc\x1a\x00z");
    }

    #[test]
    fn test_eof_stores_255() {
        let (_, output) = run(",.", b"", HarnessConfig::default());
        assert_eq!(output, vec![255]);
    }

    #[test]
    fn test_leftward_room() {
        // Move left, write, come back: all within the reference tape
        let (_, output) = run("<<<<<+++.>>>>>.", b"", HarnessConfig::default());
        assert_eq!(output, vec![3, 0]);
    }

    #[test]
    fn test_checked_addressing_fault() {
        let config = HarnessConfig::new()
            .with_tape_size(4)
            .with_addressing(Addressing::Checked);
        let (interp, output) = run("+.>>.", b"", config);
        assert_eq!(output, vec![1]);
        assert_eq!(
            interp.fault(),
            Some(&HarnessError::OutOfRange { offset: 2, size: 4 })
        );
    }

    #[test]
    fn test_steps_counted() {
        let (interp, _) = run("+++[-]", b"", HarnessConfig::default());
        // Add, then [ - ] three times with the final ] falling through
        assert_eq!(interp.steps(), 1 + 1 + 3 * 2);
    }

    #[test]
    fn test_profile_counts_each_operation() {
        let (interp, _) = run("+++[-]", b"", HarnessConfig::default());
        let mut profile = Vec::new();
        interp.write_profile(&mut profile).unwrap();
        assert_eq!(
            String::from_utf8(profile).unwrap(),
            "PC\tOP\t# EXECUTED\n\
             0\t+3\t1\n\
             1\t[\t1\n\
             2\t+255\t3\n\
             3\t]\t3\n\
             \n\
             Total operations: 8\n"
        );
    }
}
