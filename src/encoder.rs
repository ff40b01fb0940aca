//! Encoder: input bytes to a terminated, zero-padded bitstream.
//!
//! At every position the encoder tries, in order, a run of the previous byte,
//! a back-reference into earlier input or a context line, and finally
//! whatever token the mode state machine picks for the next symbol.

use tracing::{debug, trace, warn};

use crate::bitbuf::BitSink;
use crate::codebook::{
    count_bits, write_count, write_delta, DeltaEntry, DeltaSpecial, Selector, Tables,
    DELTA_ENTRY, DELTA_SPECIALS, MAX_COUNT, MIN_MATCH_LEN, MIN_REPEAT_RUN, NUM_REPEAT,
    NUM_TERMINATOR, SPECIAL_STEP, STEPS, VCODES,
};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::state::{classify, classify_byte, Literal, Mode, ModeState, Step, Symbol};

const ESCAPE: usize = 0;

/// Encode `input` into at most `max_output_len` bytes.
///
/// Returns the padded bytes and the exact number of meaningful bits.
pub fn encode(
    input: &[u8],
    max_output_len: usize,
    config: &CodecConfig,
) -> Result<(Vec<u8>, usize), CodecError> {
    encode_with_context(input, max_output_len, config, &[])
}

/// Encode `input`, allowing back-references into earlier lines.
///
/// `context` is ordered oldest first. The decoder must be handed the same
/// lines.
pub fn encode_with_context(
    input: &[u8],
    max_output_len: usize,
    config: &CodecConfig,
    context: &[&[u8]],
) -> Result<(Vec<u8>, usize), CodecError> {
    config.validate()?;
    if input.len() > config.max_input_len {
        return Err(CodecError::InputTooLarge {
            len: input.len(),
            max: config.max_input_len,
        });
    }

    let result = Encoder::new(input, max_output_len, config, context).run();
    match &result {
        Ok((bytes, bits)) => debug!(
            input_len = input.len(),
            output_len = bytes.len(),
            bits = *bits,
            context_lines = context.len(),
            preset = ?config.preset,
            "encoded"
        ),
        Err(CodecError::OutputBufferTooSmall { capacity }) => warn!(
            input_len = input.len(),
            capacity = *capacity,
            "encoded output exceeds capacity"
        ),
        Err(e) => debug!(error = %e, "encode failed"),
    }
    result
}

/// Rough bit cost of coding `byte` on its own, used to judge repeats and
/// back-references.
fn literal_cost(byte: u8) -> u32 {
    match classify_byte(std::slice::from_ref(&byte), 0) {
        Symbol::Letter { index, upper } => VCODES.width(index) + if upper { 4 } else { 0 },
        Symbol::Space => VCODES.width(1),
        Symbol::Num { .. } => 7,
        _ => 10,
    }
}

fn literal_cost_of(bytes: &[u8]) -> u32 {
    bytes.iter().map(|&b| literal_cost(b)).sum()
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

pub struct Encoder<'a> {
    input: &'a [u8],
    pos: usize,
    state: ModeState,
    sink: BitSink,
    config: &'a CodecConfig,
    tables: &'static Tables,
    context: &'a [&'a [u8]],
}

impl<'a> Encoder<'a> {
    pub fn new(
        input: &'a [u8],
        max_output_len: usize,
        config: &'a CodecConfig,
        context: &'a [&'a [u8]],
    ) -> Self {
        Self {
            input,
            pos: 0,
            state: ModeState::default(),
            sink: BitSink::with_capacity(max_output_len),
            config,
            tables: config.preset.tables(),
            context,
        }
    }

    pub fn run(mut self) -> Result<(Vec<u8>, usize), CodecError> {
        while self.pos < self.input.len() {
            let (step, advance) = self.next_step();
            self.emit(&step)?;
            self.state.apply(&step);
            self.pos += advance;
        }
        self.emit(&Step::Terminate)?;
        self.sink.flush()
    }

    /// Pick the next token and how many input bytes it covers.
    fn next_step(&self) -> (Step, usize) {
        if self.state.mode == Mode::Delta {
            // back-references are only coded outside Delta mode, so pay for the exit
            let exit =
                STEPS.width(SPECIAL_STEP) + DELTA_SPECIALS.width(DeltaSpecial::Exit as usize);
            if self.config.match_repeats && self.find_match(exit).is_some() {
                trace!(pos = self.pos, "leaving delta mode for a back-reference");
                return (Step::DeltaSpecial(DeltaSpecial::Exit), 0);
            }
        } else {
            if let Some(run) = self.repeat_run() {
                trace!(pos = self.pos, run, "repeat");
                return (Step::Repeat { run }, run);
            }
            if self.config.match_repeats {
                if let Some((len, dist, line)) = self.find_match(0) {
                    trace!(pos = self.pos, len, dist, line, "back-reference");
                    return (Step::BackRef { len, dist, line }, len);
                }
            }
        }

        let symbol = classify(self.input, self.pos, self.tables);
        let step = self.state.decide(self.input, self.pos, symbol);
        let advance = if step.is_state_only(&self.state) {
            0
        } else {
            symbol.byte_len()
        };
        (step, advance)
    }

    /// `None` when the preset has no code for `selector`.
    fn escape_cost(&self, selector: Selector) -> Option<u32> {
        let width = self.tables.selectors.width(selector)?;
        Some(VCODES.width(ESCAPE) + width)
    }

    fn repeat_run(&self) -> Option<usize> {
        let pos = self.pos;
        if pos == 0 || self.input[pos] != self.input[pos - 1] {
            return None;
        }
        let byte = self.input[pos];
        let run = self.input[pos..]
            .iter()
            .take_while(|&&b| b == byte)
            .take(MAX_COUNT + MIN_REPEAT_RUN)
            .count();
        if run < MIN_REPEAT_RUN {
            return None;
        }

        let mut cost = VCODES.width(NUM_REPEAT) + count_bits(run - MIN_REPEAT_RUN);
        if self.state.mode != Mode::Num {
            cost += self.escape_cost(Selector::Num)?;
        }
        (cost < literal_cost(byte) * run as u32).then_some(run)
    }

    /// Best match at the cursor as `(len, dist, line)`, taken only when it
    /// beats the literal cost after adding `extra` bits.
    fn find_match(&self, extra: u32) -> Option<(usize, usize, usize)> {
        let input = self.input;
        let pos = self.pos;
        let escape = self.escape_cost(Selector::Dict)?;
        if input.len() - pos < MIN_MATCH_LEN {
            return None;
        }
        let max_len = (input.len() - pos).min(MAX_COUNT + MIN_MATCH_LEN);

        let mut best = self
            .match_in(&input[..pos], max_len)
            .map(|(len, dist)| (len, dist, 0));
        for (k, line) in self.context.iter().rev().take(MAX_COUNT).enumerate() {
            if let Some((len, dist)) = self.match_in(line, max_len) {
                if best.map_or(true, |(best_len, _, _)| len > best_len) {
                    best = Some((len, dist, k + 1));
                }
            }
        }

        let (len, dist, line) = best?;
        let mut cost = escape
            + extra
            + count_bits(len - MIN_MATCH_LEN)
            + count_bits(dist - MIN_MATCH_LEN);
        if !self.context.is_empty() {
            cost += count_bits(line);
        }
        (cost < literal_cost_of(&input[pos..pos + len])).then_some((len, dist, line))
    }

    /// Longest match of the input at the cursor inside `history`, nearest
    /// first, as `(len, dist)` with `dist` counted back from its end.
    fn match_in(&self, history: &[u8], max_len: usize) -> Option<(usize, usize)> {
        let end = history.len();
        if end < MIN_MATCH_LEN {
            return None;
        }
        let ahead = &self.input[self.pos..];
        let lowest = end.saturating_sub(self.config.search_window);

        let mut best: Option<(usize, usize)> = None;
        for start in (lowest..=end - MIN_MATCH_LEN).rev() {
            // the copied span must lie entirely before the end of history
            let limit = max_len.min(end - start);
            let mut len = history[start..start + limit]
                .iter()
                .zip(&ahead[..limit])
                .take_while(|(a, b)| a == b)
                .count();
            while len > 0 && len < ahead.len() && is_continuation(ahead[len]) {
                len -= 1;
            }
            if len >= MIN_MATCH_LEN && best.map_or(true, |(best_len, _)| len > best_len) {
                best = Some((len, end - start));
            }
        }
        best
    }

    fn escape(&mut self, selector: Selector) -> Result<(), CodecError> {
        VCODES.write(&mut self.sink, ESCAPE)?;
        self.tables.selectors.write(&mut self.sink, selector)
    }

    fn delta_from_prev(&self, ch: char) -> i32 {
        ch as i32 - self.state.prev_code_point as i32
    }

    fn emit(&mut self, step: &Step) -> Result<(), CodecError> {
        match *step {
            Step::Direct { index } => VCODES.write(&mut self.sink, index),
            Step::SwitchThenCode { selector, index } => {
                self.escape(selector)?;
                VCODES.write(&mut self.sink, index)
            }
            Step::Switch => self.escape(Selector::Alpha),
            Step::Repeat { run } => {
                if self.state.mode != Mode::Num {
                    self.escape(Selector::Num)?;
                }
                VCODES.write(&mut self.sink, NUM_REPEAT)?;
                write_count(&mut self.sink, run - MIN_REPEAT_RUN)
            }
            Step::BackRef { len, dist, line } => {
                self.escape(Selector::Dict)?;
                write_count(&mut self.sink, len - MIN_MATCH_LEN)?;
                write_count(&mut self.sink, dist - MIN_MATCH_LEN)?;
                if self.context.is_empty() {
                    return Ok(());
                }
                write_count(&mut self.sink, line)
            }
            Step::Literal(Literal::CodePoint { ch, sticky }) => {
                self.escape(Selector::Delta)?;
                let entry = if sticky {
                    DeltaEntry::Sticky
                } else {
                    DeltaEntry::Single
                };
                DELTA_ENTRY.write(&mut self.sink, entry as usize)?;
                let delta = self.delta_from_prev(ch);
                write_delta(&mut self.sink, delta)
            }
            Step::Literal(Literal::Raw(byte)) => {
                self.escape(Selector::Delta)?;
                DELTA_ENTRY.write(&mut self.sink, DeltaEntry::Raw as usize)?;
                self.sink.write_bits(u32::from(byte), 8)
            }
            Step::Delta(ch) => {
                let delta = self.delta_from_prev(ch);
                write_delta(&mut self.sink, delta)
            }
            Step::DeltaSpecial(special) => {
                STEPS.write(&mut self.sink, SPECIAL_STEP)?;
                DELTA_SPECIALS.write(&mut self.sink, special as usize)
            }
            Step::Terminate => match self.state.mode {
                Mode::Num => VCODES.write(&mut self.sink, NUM_TERMINATOR),
                Mode::Alpha => {
                    self.escape(Selector::Alpha)?;
                    VCODES.write(&mut self.sink, ESCAPE)
                }
                Mode::Delta => {
                    self.emit(&Step::DeltaSpecial(DeltaSpecial::Exit))?;
                    self.escape(Selector::Alpha)?;
                    VCODES.write(&mut self.sink, ESCAPE)
                }
            },
        }
    }
}
