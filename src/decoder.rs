//! Decoder: bitstream back to the original bytes.

use tracing::{debug, trace};

use crate::bitbuf::BitSource;
use crate::codebook::{
    read_count, read_delta, DeltaEntry, DeltaSpecial, DeltaToken, Selector, Slot, Tables,
    ALPHA_SET, ALPHA_SPACE, DELTA_ENTRY, MIN_MATCH_LEN, MIN_REPEAT_RUN, NUM_SET, SYM_SET, VCODES,
};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::state::{Literal, Mode, ModeState, Step};

/// Decode at most `declared_bits` bits of `data`.
///
/// Stops at the terminator, or cleanly when the declared length runs out on a
/// token boundary.
pub fn decode(
    data: &[u8],
    declared_bits: usize,
    config: &CodecConfig,
) -> Result<Vec<u8>, CodecError> {
    decode_with_context(data, declared_bits, config, &[])
}

/// Decode a stream produced with the same `context` lines, oldest first.
pub fn decode_with_context(
    data: &[u8],
    declared_bits: usize,
    config: &CodecConfig,
    context: &[&[u8]],
) -> Result<Vec<u8>, CodecError> {
    config.validate()?;
    let result = Decoder::new(data, declared_bits, config, context).run();
    match &result {
        Ok(out) => debug!(
            input_len = data.len(),
            declared_bits,
            output_len = out.len(),
            "decoded"
        ),
        Err(e) => debug!(error = %e, declared_bits, "decode failed"),
    }
    result
}

pub struct Decoder<'a> {
    source: BitSource<'a>,
    state: ModeState,
    out: Vec<u8>,
    max_output_len: usize,
    token_start: usize,
    tables: &'static Tables,
    context: &'a [&'a [u8]],
}

impl<'a> Decoder<'a> {
    pub fn new(
        data: &'a [u8],
        declared_bits: usize,
        config: &CodecConfig,
        context: &'a [&'a [u8]],
    ) -> Self {
        let max_output_len = config.max_output_len;
        Self {
            source: BitSource::new(data, declared_bits),
            state: ModeState::default(),
            out: Vec::with_capacity((data.len() * 2).min(max_output_len)),
            max_output_len,
            token_start: 0,
            tables: config.preset.tables(),
            context,
        }
    }

    pub fn run(mut self) -> Result<Vec<u8>, CodecError> {
        loop {
            if self.source.remaining_bits() == 0 {
                trace!("declared length exhausted before terminator");
                break;
            }
            self.token_start = self.source.position();
            let step = self.next_step()?;
            if step == Step::Terminate {
                break;
            }
            self.expand(&step)?;
            self.state.apply(&step);
        }
        Ok(self.out)
    }

    fn invalid(&self, reason: &'static str) -> CodecError {
        CodecError::InvalidCode {
            bit_pos: self.token_start,
            reason,
        }
    }

    fn code_point(&self, delta: i32) -> Result<char, CodecError> {
        let value = i64::from(self.state.prev_code_point) + i64::from(delta);
        u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.invalid("delta leads outside Unicode scalar values"))
    }

    fn read_vcode(&mut self) -> Result<usize, CodecError> {
        VCODES.read(&mut self.source)
    }

    /// Num slots that mean something besides a byte.
    fn num_control(&mut self, index: usize) -> Result<Option<Step>, CodecError> {
        match NUM_SET[index] {
            Slot::Repeat => {
                let run = read_count(&mut self.source)? + MIN_REPEAT_RUN;
                Ok(Some(Step::Repeat { run }))
            }
            Slot::Terminator => Ok(Some(Step::Terminate)),
            Slot::Escape => Err(self.invalid("escape slot where a symbol was expected")),
            Slot::Byte(_) | Slot::Seq(_) | Slot::Frequent(_) => Ok(None),
        }
    }

    fn next_step(&mut self) -> Result<Step, CodecError> {
        let mode = self.state.mode;
        if mode == Mode::Delta {
            return match read_delta(&mut self.source)? {
                DeltaToken::Special(special) => Ok(Step::DeltaSpecial(special)),
                DeltaToken::CodePoint(delta) => Ok(Step::Delta(self.code_point(delta)?)),
            };
        }

        let index = self.read_vcode()?;
        if index != 0 {
            if mode == Mode::Num {
                if let Some(step) = self.num_control(index)? {
                    return Ok(step);
                }
            }
            return Ok(Step::Direct { index });
        }

        let selector = self.tables.selectors.read(&mut self.source)?;
        match selector {
            Selector::Alpha if mode == Mode::Num => Ok(Step::Switch),
            Selector::Alpha => match self.read_vcode()? {
                0 => Ok(Step::Terminate),
                index => Ok(Step::SwitchThenCode { selector, index }),
            },
            Selector::Sym => {
                let index = self.read_vcode()?;
                Ok(Step::SwitchThenCode { selector, index })
            }
            Selector::Num => {
                let index = self.read_vcode()?;
                match self.num_control(index)? {
                    Some(step) => Ok(step),
                    None => Ok(Step::SwitchThenCode { selector, index }),
                }
            }
            Selector::Dict => {
                let len = read_count(&mut self.source)? + MIN_MATCH_LEN;
                let dist = read_count(&mut self.source)? + MIN_MATCH_LEN;
                let line = if self.context.is_empty() {
                    0
                } else {
                    read_count(&mut self.source)?
                };
                Ok(Step::BackRef { len, dist, line })
            }
            Selector::Delta => {
                let entry = DeltaEntry::from_index(DELTA_ENTRY.read(&mut self.source)?);
                if entry == DeltaEntry::Raw {
                    let byte = self.source.read_bits(8)? as u8;
                    return Ok(Step::Literal(Literal::Raw(byte)));
                }
                let ch = match read_delta(&mut self.source)? {
                    DeltaToken::CodePoint(delta) => self.code_point(delta)?,
                    DeltaToken::Special(_) => {
                        return Err(self.invalid("special code after a delta escape"))
                    }
                };
                Ok(Step::Literal(Literal::CodePoint {
                    ch,
                    sticky: entry == DeltaEntry::Sticky,
                }))
            }
        }
    }

    fn reserve(&self, additional: usize) -> Result<(), CodecError> {
        if self.out.len() + additional > self.max_output_len {
            return Err(CodecError::OutputBufferTooSmall {
                capacity: self.max_output_len,
            });
        }
        Ok(())
    }

    fn push(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.reserve(bytes.len())?;
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    fn push_char(&mut self, ch: char) -> Result<(), CodecError> {
        let mut buf = [0u8; 4];
        self.push(ch.encode_utf8(&mut buf).as_bytes())
    }

    fn push_letter(&mut self, index: usize, upper: bool) -> Result<(), CodecError> {
        match ALPHA_SET[index] {
            Slot::Byte(b) if upper => self.push(&[b.to_ascii_uppercase()]),
            Slot::Byte(b) => self.push(&[b]),
            _ => Err(self.invalid("escape slot used as a letter")),
        }
    }

    fn push_slot(&mut self, slot: &'static Slot) -> Result<(), CodecError> {
        match self.tables.slot_bytes(slot) {
            Some(bytes) => self.push(bytes),
            None => Err(self.invalid("control slot used as data")),
        }
    }

    /// Bytes a back-reference copies from, other than the output itself.
    fn context_line(&self, line: usize) -> Result<&'a [u8], CodecError> {
        self.context
            .len()
            .checked_sub(line)
            .map(|i| self.context[i])
            .ok_or_else(|| self.invalid("back-reference names a missing context line"))
    }

    fn expand(&mut self, step: &Step) -> Result<(), CodecError> {
        let caps = self.state.caps_lock;
        match *step {
            Step::Direct { index } => match self.state.mode {
                Mode::Num => self.push_slot(&NUM_SET[index]),
                _ => self.push_letter(index, caps),
            },
            Step::SwitchThenCode {
                selector: Selector::Alpha,
                index,
            } => {
                if index == ALPHA_SPACE {
                    Ok(())
                } else {
                    self.push_letter(index, !caps)
                }
            }
            Step::SwitchThenCode {
                selector: Selector::Sym,
                index,
            } => self.push_slot(&SYM_SET[index]),
            Step::SwitchThenCode { index, .. } => self.push_slot(&NUM_SET[index]),
            Step::Repeat { run } => {
                let last = *self
                    .out
                    .last()
                    .ok_or_else(|| self.invalid("repeat with nothing to repeat"))?;
                self.reserve(run)?;
                self.out.resize(self.out.len() + run, last);
                Ok(())
            }
            Step::BackRef { len, dist, line } => {
                if len > dist {
                    return Err(self.invalid("back-reference overlaps the bytes it copies"));
                }
                if line == 0 {
                    if dist > self.out.len() {
                        return Err(self.invalid("back-reference reaches before the start"));
                    }
                    self.reserve(len)?;
                    let start = self.out.len() - dist;
                    self.out.extend_from_within(start..start + len);
                    return Ok(());
                }
                let source = self.context_line(line)?;
                if dist > source.len() {
                    return Err(self.invalid("back-reference reaches before its line"));
                }
                let start = source.len() - dist;
                self.push(&source[start..start + len])
            }
            Step::Literal(Literal::CodePoint { ch, .. }) | Step::Delta(ch) => self.push_char(ch),
            Step::Literal(Literal::Raw(byte)) => self.push(&[byte]),
            Step::DeltaSpecial(special) => match special {
                DeltaSpecial::Space => self.push(b" "),
                DeltaSpecial::Comma => self.push(b","),
                DeltaSpecial::Period if self.state.prev_code_point > 0x3000 => {
                    self.push_char('\u{3002}')
                }
                DeltaSpecial::Period => self.push(b"."),
                DeltaSpecial::LineFeed => self.push(b"\n"),
                DeltaSpecial::Exit => Ok(()),
            },
            Step::Switch | Step::Terminate => Ok(()),
        }
    }
}
