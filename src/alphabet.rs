//! The eight-symbol instruction alphabet and its rotation cycle.
//!
//! The forward cycle is `> < + - . , [ ]` and then back to `>`. The backward
//! cycle is its exact inverse, so `s.forward().backward() == s` for every
//! symbol and eight forward steps always return the starting symbol.

use std::fmt;

/// Number of symbols in the alphabet, which is also the cycle length.
pub const CYCLE_LEN: usize = 8;

/// One Brainfuck instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `>`
    Right,
    /// `<`
    Left,
    /// `+`
    Inc,
    /// `-`
    Dec,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    LoopOpen,
    /// `]`
    LoopClose,
}

/// Which way to turn a symbol through the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Symbol {
    /// The alphabet in forward-cycle order.
    pub const ALL: [Symbol; CYCLE_LEN] = [
        Symbol::Right,
        Symbol::Left,
        Symbol::Inc,
        Symbol::Dec,
        Symbol::Output,
        Symbol::Input,
        Symbol::LoopOpen,
        Symbol::LoopClose,
    ];

    pub fn from_char(ch: char) -> Option<Symbol> {
        Some(match ch {
            '>' => Symbol::Right,
            '<' => Symbol::Left,
            '+' => Symbol::Inc,
            '-' => Symbol::Dec,
            '.' => Symbol::Output,
            ',' => Symbol::Input,
            '[' => Symbol::LoopOpen,
            ']' => Symbol::LoopClose,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Right => '>',
            Symbol::Left => '<',
            Symbol::Inc => '+',
            Symbol::Dec => '-',
            Symbol::Output => '.',
            Symbol::Input => ',',
            Symbol::LoopOpen => '[',
            Symbol::LoopClose => ']',
        }
    }

    /// Position of this symbol in [`Symbol::ALL`].
    fn index(self) -> usize {
        self as usize
    }

    /// One step along the forward cycle.
    pub fn forward(self) -> Symbol {
        Symbol::ALL[(self.index() + 1) % CYCLE_LEN]
    }

    /// One step along the backward cycle; inverse of [`Symbol::forward`].
    pub fn backward(self) -> Symbol {
        Symbol::ALL[(self.index() + CYCLE_LEN - 1) % CYCLE_LEN]
    }

    /// Apply a single-step rotation `times` times.
    ///
    /// The cycle length is 8, so only `times % 8` steps are actually taken.
    pub fn rotate(self, times: usize, direction: Direction) -> Symbol {
        let steps = times % CYCLE_LEN;
        let index = match direction {
            Direction::Forward => self.index() + steps,
            Direction::Backward => self.index() + CYCLE_LEN - steps,
        };
        Symbol::ALL[index % CYCLE_LEN]
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Keep only instruction characters, in their original order.
pub fn filter(source: &str) -> String {
    source.chars().filter(|&c| Symbol::from_char(c).is_some()).collect()
}

/// Like [`filter`], but yields typed symbols.
pub fn filter_symbols(source: &str) -> Vec<Symbol> {
    source.chars().filter_map(Symbol::from_char).collect()
}

/// Render a symbol sequence back to program text.
pub fn to_text(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_follows_cycle_order() {
        let text: String = Symbol::ALL.iter().map(|s| s.forward().as_char()).collect();
        assert_eq!(text, "<+-.,[]>");
    }

    #[test]
    fn backward_undoes_forward() {
        for s in Symbol::ALL {
            assert_eq!(s.forward().backward(), s);
            assert_eq!(s.backward().forward(), s);
        }
    }

    #[test]
    fn eight_steps_is_identity() {
        for s in Symbol::ALL {
            let mut cur = s;
            for _ in 0..CYCLE_LEN {
                cur = cur.forward();
            }
            assert_eq!(cur, s);
        }
    }

    #[test]
    fn rotate_matches_repeated_single_steps() {
        for s in Symbol::ALL {
            let mut fwd = s;
            let mut back = s;
            for times in 0..20 {
                assert_eq!(s.rotate(times, Direction::Forward), fwd);
                assert_eq!(s.rotate(times, Direction::Backward), back);
                fwd = fwd.forward();
                back = back.backward();
            }
        }
    }

    #[test]
    fn filter_drops_everything_else() {
        assert_eq!(filter("a+b\n[ -]# comment >."), "+[-]>.");
        assert_eq!(filter("héllo, wörld!"), ",");
    }

    #[test]
    fn filter_is_idempotent() {
        let once = filter("++ [> comment <] ., x");
        assert_eq!(filter(&once), once);
    }

    #[test]
    fn char_round_trip() {
        for s in Symbol::ALL {
            assert_eq!(Symbol::from_char(s.as_char()), Some(s));
        }
        assert_eq!(Symbol::from_char(' '), None);
    }
}
