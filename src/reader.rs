//! The Brainfuck interpreter.
//!
//! Operates on a fixed tape of 30,000 byte cells with a single data pointer.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0.
//! - Strict pointer bounds: moving left from cell 0 or right past the last
//!   cell returns [`BrainfuckReaderError::PointerOutOfRange`].
//! - Brackets are matched once, up front; an unmatched `[` or `]` returns
//!   [`BrainfuckReaderError::UnmatchedBracket`] before anything executes.
//! - Input `,` reads a single byte; on end-of-input the current cell is set to 0.
//! - Output `.` writes the byte at the current cell (no newline).
//! - Any non-Brainfuck character causes an error.
//!
//! Quick start:
//!
//! ```
//! use ultimate_bf::BrainfuckReader;
//!
//! let mut out = Vec::new();
//! let mut bf = BrainfuckReader::new(",+.".to_string());
//! bf.run_with_io(&b"@"[..], &mut out).expect("program should run");
//! assert_eq!(out, b"A");
//! ```

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::debug;

/// Number of cells on the tape.
pub const TAPE_LEN: usize = 30_000;

/// Errors that can occur while interpreting Brainfuck code.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckReaderError {
    /// The data pointer attempted to move left of cell 0 or beyond the last cell.
    #[error("Pointer out of range at instruction {ip} (ptr={ptr}, op='{op}')")]
    PointerOutOfRange { ip: usize, ptr: usize, op: char },

    /// Encountered a character outside the Brainfuck instruction set `><+-.,[]`.
    #[error("Invalid character: '{ch}' at instruction {ip}")]
    InvalidCharacter { ch: char, ip: usize },

    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: UnmatchedBracketKind },

    /// Reading input or writing output failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io { ip: usize, #[source] source: io::Error },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (timeout, Ctrl+C).
    #[error("Execution aborted: cancelled")]
    Canceled,
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone, Default)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// A Brainfuck interpreter owning its program, tape and data pointer.
pub struct BrainfuckReader {
    code: String,
    memory: Box<[u8]>,
    pointer: usize,
}

/// Match every bracket in `chars`.
///
/// `jump_map[i]` holds the matching index for a `[` or `]` at index `i`;
/// every other position is `None`.
fn build_jump_map(chars: &[char]) -> Result<Vec<Option<usize>>, BrainfuckReaderError> {
    let mut jump_map: Vec<Option<usize>> = vec![None; chars.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '[' {
            stack.push(i);
        } else if c == ']' {
            let Some(open_index) = stack.pop() else {
                return Err(BrainfuckReaderError::UnmatchedBracket {
                    ip: i,
                    kind: UnmatchedBracketKind::Close,
                });
            };
            jump_map[open_index] = Some(i);
            jump_map[i] = Some(open_index);
        }
    }

    if let Some(unmatched_open) = stack.last().copied() {
        return Err(BrainfuckReaderError::UnmatchedBracket {
            ip: unmatched_open,
            kind: UnmatchedBracketKind::Open,
        });
    }

    Ok(jump_map)
}

impl BrainfuckReader {
    /// Create a new interpreter from Brainfuck `code` with a zeroed tape.
    pub fn new(code: String) -> Self {
        Self {
            code,
            memory: vec![0; TAPE_LEN].into_boxed_slice(),
            pointer: 0,
        }
    }

    /// Current data pointer.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Value of the cell at `index`, if it is on the tape.
    pub fn cell(&self, index: usize) -> Option<u8> {
        self.memory.get(index).copied()
    }

    fn execute<R: Read, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
        debug: bool,
        step_control: Option<&StepControl>,
    ) -> Result<(), BrainfuckReaderError> {
        let mut code_ptr = 0;
        let chars: Vec<char> = self.code.chars().collect();
        let code_len = chars.len();

        let jump_map = build_jump_map(&chars)?;
        debug!(instructions = code_len, "validated bracket structure");

        let mut step: usize = 0;
        if debug {
            let header = "STEP | IP  | PTR | CELL | INSTR | ACTION\n\
                          -----+-----+-----+------+-------+------------------------------------------------";
            writeln!(output, "{header}").map_err(|source| BrainfuckReaderError::Io { ip: 0, source })?;
        }

        while code_ptr < code_len {
            if let Some(ctrl) = step_control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    let _ = output.flush();
                    return Err(BrainfuckReaderError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if step >= max {
                        let _ = output.flush();
                        return Err(BrainfuckReaderError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let instr = chars[code_ptr];
            let ip = code_ptr;
            let (ptr_before, cell_before) = (self.pointer, self.memory[self.pointer]);
            let mut action: Option<String> = if debug { Some(String::new()) } else { None };

            match instr {
                '>' => {
                    if self.pointer >= self.memory.len() - 1 {
                        return Err(BrainfuckReaderError::PointerOutOfRange { ip, ptr: self.pointer, op: instr });
                    }
                    self.pointer += 1;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.pointer); }
                }
                '<' => {
                    if self.pointer == 0 {
                        return Err(BrainfuckReaderError::PointerOutOfRange { ip, ptr: self.pointer, op: instr });
                    }
                    self.pointer -= 1;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.pointer); }
                }
                '+' => {
                    let after = cell_before.wrapping_add(1);
                    self.memory[self.pointer] = after;
                    if let Some(a) = action.as_mut() { *a = format!("Increment cell[{ptr_before}] from {cell_before} to {after}"); }
                }
                '-' => {
                    let after = cell_before.wrapping_sub(1);
                    self.memory[self.pointer] = after;
                    if let Some(a) = action.as_mut() { *a = format!("Decrement cell[{ptr_before}] from {cell_before} to {after}"); }
                }
                '.' => {
                    if let Some(a) = action.as_mut() {
                        *a = format!("Output byte {cell_before} (suppressed in debug)");
                    } else {
                        output
                            .write_all(&[cell_before])
                            .map_err(|source| BrainfuckReaderError::Io { ip, source })?;
                    }
                }
                ',' => {
                    if let Some(a) = action.as_mut() {
                        self.memory[self.pointer] = 0;
                        *a = "Read byte -> simulated end-of-input (set cell to 0)".to_string();
                    } else {
                        // A prompt printed without a newline must be visible before blocking.
                        output.flush().map_err(|source| BrainfuckReaderError::Io { ip, source })?;
                        self.memory[self.pointer] = read_byte(&mut input)
                            .map_err(|source| BrainfuckReaderError::Io { ip, source })?
                            .unwrap_or(0);
                    }
                }
                '[' => {
                    if cell_before == 0 {
                        let Some(j) = jump_map[code_ptr] else {
                            return Err(BrainfuckReaderError::UnmatchedBracket { ip, kind: UnmatchedBracketKind::Open });
                        };
                        if let Some(a) = action.as_mut() { *a = format!("Cell is 0; jump forward to matching ']' at IP {j}"); }
                        code_ptr = j;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Enter loop (cell != 0)".to_string();
                    }
                }
                ']' => {
                    if cell_before != 0 {
                        let Some(j) = jump_map[code_ptr] else {
                            return Err(BrainfuckReaderError::UnmatchedBracket { ip, kind: UnmatchedBracketKind::Close });
                        };
                        if let Some(a) = action.as_mut() { *a = format!("Cell != 0; jump back to matching '[' at IP {j}"); }
                        code_ptr = j;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Exit loop (cell is 0)".to_string();
                    }
                }
                _ => {
                    return Err(BrainfuckReaderError::InvalidCharacter { ch: instr, ip });
                }
            }

            if let Some(a) = action {
                writeln!(
                    output,
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                    step, ip, ptr_before, cell_before, instr, a
                )
                .map_err(|source| BrainfuckReaderError::Io { ip, source })?;
            }

            step += 1;
            code_ptr += 1;
        }

        output
            .flush()
            .map_err(|source| BrainfuckReaderError::Io { ip: code_len, source })
    }

    /// Execute the program until completion against the process stdin/stdout.
    pub fn run(&mut self) -> Result<(), BrainfuckReaderError> {
        self.execute(io::stdin().lock(), io::stdout().lock(), false, None)
    }

    /// Execute the program reading `,` bytes from `input` and writing `.` bytes to `output`.
    pub fn run_with_io<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<(), BrainfuckReaderError> {
        self.execute(input, output, false, None)
    }

    /// Debug-run the program, writing a step-by-step table of operations to
    /// `output` instead of producing I/O side effects. The tape and pointer
    /// advance exactly as they would during a real run, but:
    /// - '.' does not emit the byte; the action is logged instead
    /// - ',' does not read; end-of-input is simulated and the cell set to 0
    pub fn run_debug<W: Write>(&mut self, output: W) -> Result<(), BrainfuckReaderError> {
        self.execute(io::empty(), output, true, None)
    }

    /// Execute with cooperative cancellation and optional step limit.
    pub fn run_with_control<R: Read, W: Write>(
        &mut self,
        input: R,
        output: W,
        step_control: StepControl,
    ) -> Result<(), BrainfuckReaderError> {
        self.execute(input, output, false, Some(&step_control))
    }

    /// Debug-run with cooperative cancellation and optional step limit.
    pub fn run_debug_with_control<W: Write>(
        &mut self,
        output: W,
        step_control: StepControl,
    ) -> Result<(), BrainfuckReaderError> {
        self.execute(io::empty(), output, true, Some(&step_control))
    }
}

/// Read exactly one byte, `None` on end-of-input.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
