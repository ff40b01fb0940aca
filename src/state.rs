//! Mode/set state machine shared by the encoder and decoder.
//!
//! The encoder asks [`ModeState::decide`] for the next [`Step`], writes it, and
//! calls [`ModeState::apply`]. The decoder reads a `Step` from the bitstream and
//! calls the same `apply`, so both sides walk identical state sequences.

use std::sync::LazyLock;

use crate::codebook::{
    DeltaSpecial, Selector, Slot, Tables, ALPHA_SET, ALPHA_SPACE, NUM_SET, NUM_SPACE, SYM_SET,
};

/// Sticky set that unescaped codes are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Alpha,
    Num,
    Delta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeState {
    pub mode: Mode,
    pub caps_lock: bool,
    /// Base for the next code point delta.
    pub prev_code_point: u32,
}

/// A code point or byte that no set covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    CodePoint { ch: char, sticky: bool },
    Raw(u8),
}

/// One token of the bitstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Vertical code in the active set.
    Direct { index: usize },
    /// Escape, selector, then a vertical code in the selected set.
    SwitchThenCode { selector: Selector, index: usize },
    /// Escape and the Alpha selector alone: leave Num mode.
    Switch,
    /// Repeat the previous byte `run` times.
    Repeat { run: usize },
    /// Copy `len` bytes starting `dist` bytes before the end of `line`.
    /// Line 0 is the output so far, line `k` the k-th most recent context line.
    BackRef { len: usize, dist: usize, line: usize },
    Literal(Literal),
    /// Code point delta inside Delta mode.
    Delta(char),
    DeltaSpecial(DeltaSpecial),
    Terminate,
}

impl Step {
    /// True for tokens that only change state and consume no input.
    pub fn is_state_only(&self, state: &ModeState) -> bool {
        match *self {
            Step::Switch | Step::Terminate | Step::DeltaSpecial(DeltaSpecial::Exit) => true,
            Step::SwitchThenCode {
                selector: Selector::Alpha,
                index,
            } => index == ALPHA_SPACE && state.mode == Mode::Alpha,
            _ => false,
        }
    }
}

/// What sits at an input position, independent of the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Letter { index: usize, upper: bool },
    Space,
    Num { index: usize, len: usize },
    Sym { index: usize, len: usize },
    Unicode { ch: char, len: usize },
    Raw(u8),
}

impl Symbol {
    /// Input bytes covered by this symbol.
    pub fn byte_len(&self) -> usize {
        match *self {
            Symbol::Num { len, .. } | Symbol::Sym { len, .. } | Symbol::Unicode { len, .. } => len,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AsciiClass {
    Alpha(usize),
    Num(usize),
    Sym(usize),
}

static ASCII_CLASSES: LazyLock<[Option<AsciiClass>; 128]> = LazyLock::new(|| {
    let mut table = [None; 128];
    for (index, slot) in ALPHA_SET.iter().enumerate() {
        if let Slot::Byte(b) = *slot {
            table[b as usize] = Some(AsciiClass::Alpha(index));
            if b.is_ascii_lowercase() {
                table[b.to_ascii_uppercase() as usize] = Some(AsciiClass::Alpha(index));
            }
        }
    }
    for (index, slot) in NUM_SET.iter().enumerate() {
        if let Slot::Byte(b) = *slot {
            if table[b as usize].is_none() {
                table[b as usize] = Some(AsciiClass::Num(index));
            }
        }
    }
    for (index, slot) in SYM_SET.iter().enumerate() {
        if let Slot::Byte(b) = *slot {
            if table[b as usize].is_none() {
                table[b as usize] = Some(AsciiClass::Sym(index));
            }
        }
    }
    table
});

/// Decode one UTF-8 scalar value at `pos`, if the bytes there form one.
pub fn decode_char(input: &[u8], pos: usize) -> Option<(char, usize)> {
    let width = match input[pos] {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    let bytes = input.get(pos..pos + width)?;
    let ch = std::str::from_utf8(bytes).ok()?.chars().next()?;
    Some((ch, width))
}

/// Set membership of the symbol starting at `pos`, preferring the longest
/// multi-byte sequence the tables offer.
pub fn classify(input: &[u8], pos: usize, tables: &Tables) -> Symbol {
    let rest = &input[pos..];
    for &(seq, set, index) in &tables.sequences {
        if rest.starts_with(seq) {
            let len = seq.len();
            return match set {
                Selector::Num => Symbol::Num { index, len },
                _ => Symbol::Sym { index, len },
            };
        }
    }
    classify_byte(input, pos)
}

/// Membership ignoring sequences. Every sequence starts with an ASCII byte,
/// so this still tells Unicode apart from everything else.
pub fn classify_byte(input: &[u8], pos: usize) -> Symbol {
    let byte = input[pos];
    if byte == b' ' {
        return Symbol::Space;
    }
    if byte.is_ascii() {
        match ASCII_CLASSES[byte as usize] {
            Some(AsciiClass::Alpha(index)) => {
                return Symbol::Letter {
                    index,
                    upper: byte.is_ascii_uppercase(),
                }
            }
            Some(AsciiClass::Num(index)) => return Symbol::Num { index, len: 1 },
            Some(AsciiClass::Sym(index)) => return Symbol::Sym { index, len: 1 },
            None => {}
        }
    }
    match decode_char(input, pos) {
        Some((ch, len)) => Symbol::Unicode { ch, len },
        None => Symbol::Raw(byte),
    }
}

fn run_while(input: &[u8], pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    input[pos..].iter().take_while(|&&b| pred(b)).count()
}

/// Number of upper-case letters that make caps lock worth turning on.
const CAPS_LOCK_RUN: usize = 4;

impl ModeState {
    /// Choose the next token for the symbol at `pos`.
    pub fn decide(&self, input: &[u8], pos: usize, symbol: Symbol) -> Step {
        if self.mode == Mode::Delta {
            return self.decide_in_delta(input, pos, symbol);
        }

        match symbol {
            Symbol::Letter { .. } if self.mode == Mode::Num => Step::Switch,
            Symbol::Letter { index, upper } if upper == self.caps_lock => Step::Direct { index },
            Symbol::Letter { index, upper } => {
                let run = if upper {
                    run_while(input, pos, |b| b.is_ascii_uppercase())
                } else {
                    run_while(input, pos, |b| b.is_ascii_lowercase())
                };
                // lock for long runs, flip a single letter otherwise
                let lock_at = if upper { CAPS_LOCK_RUN } else { 2 };
                let index = if run >= lock_at { ALPHA_SPACE } else { index };
                Step::SwitchThenCode {
                    selector: Selector::Alpha,
                    index,
                }
            }
            Symbol::Space => Step::Direct {
                index: if self.mode == Mode::Num {
                    NUM_SPACE
                } else {
                    ALPHA_SPACE
                },
            },
            Symbol::Num { index, .. } if self.mode == Mode::Num => Step::Direct { index },
            Symbol::Num { index, .. } => Step::SwitchThenCode {
                selector: Selector::Num,
                index,
            },
            Symbol::Sym { index, .. } => Step::SwitchThenCode {
                selector: Selector::Sym,
                index,
            },
            Symbol::Unicode { ch, len } => {
                let sticky = pos + len < input.len()
                    && matches!(classify_byte(input, pos + len), Symbol::Unicode { .. });
                Step::Literal(Literal::CodePoint { ch, sticky })
            }
            Symbol::Raw(byte) => Step::Literal(Literal::Raw(byte)),
        }
    }

    fn decide_in_delta(&self, input: &[u8], pos: usize, symbol: Symbol) -> Step {
        let wide_context = self.prev_code_point > 0x3000;
        match symbol {
            Symbol::Space => Step::DeltaSpecial(DeltaSpecial::Space),
            Symbol::Num { index, len: 1 } if NUM_SET[index] == Slot::Byte(b',') => {
                Step::DeltaSpecial(DeltaSpecial::Comma)
            }
            Symbol::Num { index, len: 1 }
                if NUM_SET[index] == Slot::Byte(b'.') && !wide_context =>
            {
                Step::DeltaSpecial(DeltaSpecial::Period)
            }
            Symbol::Unicode { ch: '\u{3002}', .. } if wide_context => {
                Step::DeltaSpecial(DeltaSpecial::Period)
            }
            Symbol::Sym { len: 1, .. } if input[pos] == b'\n' => {
                Step::DeltaSpecial(DeltaSpecial::LineFeed)
            }
            Symbol::Unicode { ch, .. } => Step::Delta(ch),
            _ => Step::DeltaSpecial(DeltaSpecial::Exit),
        }
    }

    /// Advance the state past `step`. Encoder and decoder both call this.
    pub fn apply(&mut self, step: &Step) {
        match *step {
            Step::Switch | Step::DeltaSpecial(DeltaSpecial::Exit) => self.mode = Mode::Alpha,
            Step::SwitchThenCode {
                selector: Selector::Alpha,
                index: ALPHA_SPACE,
            } if self.mode == Mode::Alpha => self.caps_lock = !self.caps_lock,
            Step::SwitchThenCode {
                selector: Selector::Num,
                index,
            } => {
                if matches!(NUM_SET[index], Slot::Byte(b) if b.is_ascii_digit()) {
                    self.mode = Mode::Num;
                }
            }
            Step::Literal(Literal::CodePoint { ch, sticky }) => {
                self.prev_code_point = ch as u32;
                if sticky {
                    self.mode = Mode::Delta;
                }
            }
            Step::Delta(ch) => self.prev_code_point = ch as u32,
            _ => {}
        }
    }
}
