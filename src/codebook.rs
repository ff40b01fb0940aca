//! Static prefix-code tables and the character sets they index.
//!
//! Every table is validated once, on first use, and then shared read-only by
//! all encode and decode calls.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::bitbuf::{BitSink, BitSource};
use crate::error::{CodebookError, CodecError};

const MAX_CODE_LEN: u32 = 16;

/// An immutable prefix-free code. Codes are right-aligned and written MSB first.
#[derive(Debug)]
pub struct Codebook {
    name: &'static str,
    codes: Vec<(u32, u32)>,
    /// Indexed by `(1 << len) | value`; the marker bit keeps lengths apart.
    lookup: Vec<Option<u8>>,
    max_len: u32,
}

impl Codebook {
    pub fn new(name: &'static str, codes: &[(u32, u32)]) -> Result<Self, CodebookError> {
        if codes.is_empty() {
            return Err(CodebookError::Empty { name });
        }
        for (index, &(value, len)) in codes.iter().enumerate() {
            if len == 0 || len > MAX_CODE_LEN || value >> len != 0 || index > u8::MAX as usize {
                return Err(CodebookError::InvalidLength { name, index, len });
            }
        }
        for (a, &(va, la)) in codes.iter().enumerate() {
            for (b, &(vb, lb)) in codes.iter().enumerate() {
                if a != b && la <= lb && vb >> (lb - la) == va {
                    return Err(CodebookError::NotPrefixFree {
                        name,
                        shorter: a,
                        longer: b,
                    });
                }
            }
        }

        let max_len = codes.iter().map(|&(_, len)| len).max().unwrap_or(0);
        let mut lookup = vec![None; 1usize << (max_len + 1)];
        for (index, &(value, len)) in codes.iter().enumerate() {
            lookup[(1usize << len) | value as usize] = Some(index as u8);
        }

        Ok(Self {
            name,
            codes: codes.to_vec(),
            lookup,
            max_len,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Bit width of entry `index`.
    pub fn width(&self, index: usize) -> u32 {
        self.codes[index].1
    }

    /// True when every bit pattern starts with some code (Kraft sum of one).
    pub fn is_complete(&self) -> bool {
        let total: u64 = self
            .codes
            .iter()
            .map(|&(_, len)| 1u64 << (self.max_len - len))
            .sum();
        total == 1u64 << self.max_len
    }

    pub fn write(&self, sink: &mut BitSink, index: usize) -> Result<(), CodecError> {
        let (value, len) = self.codes[index];
        sink.write_bits(value, len)
    }

    /// Read one code bit by bit and return its entry index.
    pub fn read(&self, source: &mut BitSource<'_>) -> Result<usize, CodecError> {
        let start = source.position();
        let mut acc = 0usize;
        for len in 1..=self.max_len {
            acc = (acc << 1) | source.read_bit()? as usize;
            if let Some(index) = self.lookup[(1usize << len) | acc] {
                return Ok(index as usize);
            }
        }
        Err(CodecError::InvalidCode {
            bit_pos: start,
            reason: "bit pattern matches no codebook entry",
        })
    }
}

// Every built-in table is checked by test_builtin_books_are_complete.
fn build(name: &'static str, codes: &[(u32, u32)]) -> Codebook {
    Codebook::new(name, codes).expect("built-in codebook is malformed")
}

/// Per-set symbol code, shared by every set. Entry 0 is the escape in sticky sets.
pub static VCODES: LazyLock<Codebook> = LazyLock::new(|| {
    build(
        "vcodes",
        &[
            (0b00, 2),
            (0b010, 3),
            (0b011, 3),
            (0b1000, 4),
            (0b1001, 4),
            (0b1010, 4),
            (0b1011, 4),
            (0b1100, 4),
            (0b11010, 5),
            (0b11011, 5),
            (0b111000, 6),
            (0b111001, 6),
            (0b111010, 6),
            (0b1110110, 7),
            (0b1110111, 7),
            (0b1111000, 7),
            (0b1111001, 7),
            (0b1111010, 7),
            (0b11110110, 8),
            (0b11110111, 8),
            (0b11111000, 8),
            (0b11111001, 8),
            (0b11111010, 8),
            (0b11111011, 8),
            (0b11111100, 8),
            (0b11111101, 8),
            (0b11111110, 8),
            (0b11111111, 8),
        ],
    )
});

/// Unary step prefix for counts and code point deltas.
pub static STEPS: LazyLock<Codebook> = LazyLock::new(|| {
    build(
        "steps",
        &[
            (0b0, 1),
            (0b10, 2),
            (0b110, 3),
            (0b1110, 4),
            (0b11110, 5),
            (0b11111, 5),
        ],
    )
});

/// Codes following the special step while in Delta mode.
pub static DELTA_SPECIALS: LazyLock<Codebook> = LazyLock::new(|| {
    build(
        "delta-specials",
        &[(0b0, 1), (0b10, 2), (0b110, 3), (0b1110, 4), (0b1111, 4)],
    )
});

/// How a Delta escape continues.
pub static DELTA_ENTRY: LazyLock<Codebook> =
    LazyLock::new(|| build("delta-entry", &[(0b0, 1), (0b10, 2), (0b11, 2)]));

/// Set chosen after an escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    Alpha = 0,
    Sym = 1,
    Num = 2,
    Dict = 3,
    Delta = 4,
}

impl Selector {
    pub const ALL: [Selector; 5] = [
        Selector::Alpha,
        Selector::Sym,
        Selector::Num,
        Selector::Dict,
        Selector::Delta,
    ];
}

/// Prefix code over the selectors a preset offers.
///
/// A preset may leave a selector out entirely; the encoder then never needs
/// it and the decoder can never read it.
#[derive(Debug)]
pub struct SelectorCodes {
    book: Codebook,
    order: Vec<Selector>,
    entry: [Option<usize>; 5],
}

impl SelectorCodes {
    pub fn new(name: &'static str, codes: &[(Selector, u32, u32)]) -> Result<Self, CodebookError> {
        let book = Codebook::new(
            name,
            &codes.iter().map(|&(_, value, len)| (value, len)).collect::<Vec<_>>(),
        )?;
        let mut entry = [None; 5];
        for (index, &(selector, _, _)) in codes.iter().enumerate() {
            entry[selector as usize] = Some(index);
        }
        Ok(Self {
            book,
            order: codes.iter().map(|&(selector, _, _)| selector).collect(),
            entry,
        })
    }

    pub fn book(&self) -> &Codebook {
        &self.book
    }

    pub fn has(&self, selector: Selector) -> bool {
        self.entry[selector as usize].is_some()
    }

    pub fn width(&self, selector: Selector) -> Option<u32> {
        self.entry[selector as usize].map(|index| self.book.width(index))
    }

    pub fn write(&self, sink: &mut BitSink, selector: Selector) -> Result<(), CodecError> {
        match self.entry[selector as usize] {
            Some(index) => self.book.write(sink, index),
            None => Err(CodecError::Config(format!(
                "{} has no code for the {selector:?} set",
                self.book.name()
            ))),
        }
    }

    pub fn read(&self, source: &mut BitSource<'_>) -> Result<Selector, CodecError> {
        Ok(self.order[self.book.read(source)?])
    }
}

/// Named tuning of the selector codes and frequent sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Balanced codes, JSON and markup sequences.
    #[default]
    Default,
    FavourAlpha,
    FavourNum,
    FavourSym,
    /// One-bit escape into code point deltas for mostly non-Latin text.
    FavourUnicode,
    /// No back-reference selector; each of the rest costs two bits.
    NoDict,
    /// Default codes with English word fragments as sequences.
    Text,
    /// Default codes with URL fragments as sequences.
    Url,
}

pub const FREQUENT_COUNT: usize = 6;

const JSON_SEQUENCES: [&[u8]; FREQUENT_COUNT] =
    [b"\": \"", b"\": ", b"</", b"=\"", b"\":\"", b"://"];
const TEXT_SEQUENCES: [&[u8]; FREQUENT_COUNT] =
    [b" the ", b" and ", b"tion", b" with", b"ing", b"ment"];
const URL_SEQUENCES: [&[u8]; FREQUENT_COUNT] =
    [b"https://", b"www.", b".com", b"http://", b".org", b".net"];

use Selector::{Alpha as A, Delta as U, Dict as D, Num as N, Sym as S};

const BALANCED: [(Selector, u32, u32); 5] =
    [(A, 0b00, 2), (S, 0b01, 2), (N, 0b10, 2), (D, 0b110, 3), (U, 0b111, 3)];

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::Default,
        Preset::FavourAlpha,
        Preset::FavourNum,
        Preset::FavourSym,
        Preset::FavourUnicode,
        Preset::NoDict,
        Preset::Text,
        Preset::Url,
    ];

    fn selector_codes(self) -> &'static [(Selector, u32, u32)] {
        match self {
            Preset::Default | Preset::Text | Preset::Url => &BALANCED,
            Preset::FavourAlpha => &[
                (A, 0b0, 1),
                (S, 0b100, 3),
                (N, 0b101, 3),
                (D, 0b110, 3),
                (U, 0b111, 3),
            ],
            Preset::FavourNum => &[
                (N, 0b0, 1),
                (A, 0b100, 3),
                (S, 0b101, 3),
                (D, 0b110, 3),
                (U, 0b111, 3),
            ],
            Preset::FavourSym => &[
                (S, 0b0, 1),
                (A, 0b100, 3),
                (N, 0b101, 3),
                (D, 0b110, 3),
                (U, 0b111, 3),
            ],
            Preset::FavourUnicode => &[
                (U, 0b0, 1),
                (A, 0b100, 3),
                (S, 0b101, 3),
                (N, 0b110, 3),
                (D, 0b111, 3),
            ],
            Preset::NoDict => &[(A, 0b00, 2), (S, 0b01, 2), (N, 0b10, 2), (U, 0b11, 2)],
        }
    }

    fn frequent(self) -> [&'static [u8]; FREQUENT_COUNT] {
        match self {
            Preset::Text => TEXT_SEQUENCES,
            Preset::Url => URL_SEQUENCES,
            _ => JSON_SEQUENCES,
        }
    }

    /// Shared tables for this preset, built on first use.
    pub fn tables(self) -> &'static Tables {
        &PRESET_TABLES[self as usize]
    }
}

/// Everything about the format that varies by preset.
#[derive(Debug)]
pub struct Tables {
    pub preset: Preset,
    pub selectors: SelectorCodes,
    pub frequent: [&'static [u8]; FREQUENT_COUNT],
    /// Multi-byte set entries as `(bytes, set, slot)`, longest first.
    pub sequences: Vec<(&'static [u8], Selector, usize)>,
}

impl Tables {
    fn build(preset: Preset) -> Self {
        // Checked for every preset by test_builtin_books_are_complete.
        let selectors = SelectorCodes::new("selectors", preset.selector_codes())
            .expect("built-in selector codes are malformed");
        let frequent = preset.frequent();

        let mut sequences = vec![(&b"\r\n"[..], Selector::Sym, SYM_CRLF)];
        for (set, slots) in [(Selector::Num, &NUM_SET), (Selector::Sym, &SYM_SET)] {
            for (index, slot) in slots.iter().enumerate() {
                if let Slot::Frequent(k) = *slot {
                    sequences.push((frequent[k as usize], set, index));
                }
            }
        }
        sequences.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            preset,
            selectors,
            frequent,
            sequences,
        }
    }

    /// Bytes a set slot stands for, if it stands for data.
    pub fn slot_bytes(&self, slot: &'static Slot) -> Option<&'static [u8]> {
        match *slot {
            Slot::Byte(ref b) => Some(std::slice::from_ref(b)),
            Slot::Seq(seq) => Some(seq),
            Slot::Frequent(k) => Some(self.frequent[k as usize]),
            _ => None,
        }
    }
}

static PRESET_TABLES: LazyLock<Vec<Tables>> =
    LazyLock::new(|| Preset::ALL.iter().map(|&p| Tables::build(p)).collect());

/// Order matches `DELTA_SPECIALS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaSpecial {
    Space = 0,
    Exit = 1,
    Comma = 2,
    Period = 3,
    LineFeed = 4,
}

impl DeltaSpecial {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => DeltaSpecial::Space,
            1 => DeltaSpecial::Exit,
            2 => DeltaSpecial::Comma,
            3 => DeltaSpecial::Period,
            _ => DeltaSpecial::LineFeed,
        }
    }
}

/// Order matches `DELTA_ENTRY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaEntry {
    Single = 0,
    Sticky = 1,
    Raw = 2,
}

impl DeltaEntry {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => DeltaEntry::Single,
            1 => DeltaEntry::Sticky,
            _ => DeltaEntry::Raw,
        }
    }
}

/// Contents of one slot of a character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Escape,
    Byte(u8),
    Seq(&'static [u8]),
    /// One of the preset's frequent sequences.
    Frequent(u8),
    Repeat,
    Terminator,
}

use Slot::{Byte, Escape, Frequent, Repeat, Seq, Terminator};

pub const SET_SIZE: usize = 28;

/// Index of the space slot in Alpha; re-used as the caps-lock toggle after an escape.
pub const ALPHA_SPACE: usize = 1;
pub const NUM_SPACE: usize = 17;
pub const NUM_REPEAT: usize = 26;
pub const NUM_TERMINATOR: usize = 27;
pub const SYM_CRLF: usize = 8;

pub static ALPHA_SET: [Slot; SET_SIZE] = [
    Escape,
    Byte(b' '),
    Byte(b'e'),
    Byte(b't'),
    Byte(b'a'),
    Byte(b'o'),
    Byte(b'i'),
    Byte(b'n'),
    Byte(b's'),
    Byte(b'r'),
    Byte(b'l'),
    Byte(b'c'),
    Byte(b'd'),
    Byte(b'h'),
    Byte(b'u'),
    Byte(b'p'),
    Byte(b'm'),
    Byte(b'b'),
    Byte(b'g'),
    Byte(b'w'),
    Byte(b'f'),
    Byte(b'y'),
    Byte(b'v'),
    Byte(b'k'),
    Byte(b'q'),
    Byte(b'j'),
    Byte(b'x'),
    Byte(b'z'),
];

pub static NUM_SET: [Slot; SET_SIZE] = [
    Escape,
    Byte(b','),
    Byte(b'.'),
    Byte(b'0'),
    Byte(b'1'),
    Byte(b'9'),
    Byte(b'2'),
    Byte(b'5'),
    Byte(b'-'),
    Byte(b'/'),
    Byte(b'3'),
    Byte(b'4'),
    Byte(b'6'),
    Byte(b'7'),
    Byte(b'8'),
    Byte(b'('),
    Byte(b')'),
    Byte(b' '),
    Byte(b'='),
    Byte(b'+'),
    Byte(b'$'),
    Byte(b'%'),
    Byte(b'#'),
    Frequent(0),
    Frequent(1),
    Frequent(2),
    Repeat,
    Terminator,
];

pub static SYM_SET: [Slot; SET_SIZE] = [
    Byte(b'"'),
    Byte(b'{'),
    Byte(b'}'),
    Byte(b'_'),
    Byte(b'<'),
    Byte(b'>'),
    Byte(b':'),
    Byte(b'\n'),
    Seq(b"\r\n"),
    Byte(b'['),
    Byte(b']'),
    Byte(b'\\'),
    Byte(b';'),
    Byte(b'\''),
    Byte(b'\t'),
    Byte(b'@'),
    Byte(b'*'),
    Byte(b'&'),
    Byte(b'?'),
    Byte(b'!'),
    Byte(b'^'),
    Byte(b'|'),
    Byte(b'\r'),
    Byte(b'~'),
    Byte(b'`'),
    Frequent(3),
    Frequent(4),
    Frequent(5),
];

const COUNT_WIDTHS: [u32; 6] = [2, 5, 7, 9, 12, 16];
const COUNT_OFFSETS: [usize; 6] = [0, 4, 36, 164, 676, 4772];

/// Largest value `write_count` can represent.
pub const MAX_COUNT: usize = 4772 + (1 << 16) - 1;

/// Shortest run of one byte coded as a repeat.
pub const MIN_REPEAT_RUN: usize = 4;

/// Shortest back-reference.
pub const MIN_MATCH_LEN: usize = 5;

const DELTA_WIDTHS: [u32; 5] = [6, 12, 14, 16, 21];
const DELTA_OFFSETS: [u32; 5] = [0, 64, 4160, 20544, 86080];

/// `STEPS` entry that introduces a Delta special code.
pub const SPECIAL_STEP: usize = 5;

pub fn count_bits(count: usize) -> u32 {
    COUNT_OFFSETS
        .iter()
        .zip(COUNT_WIDTHS)
        .enumerate()
        .find(|&(_, (&offset, width))| count < offset + (1usize << width))
        .map(|(step, (_, width))| STEPS.width(step) + width)
        .unwrap_or(u32::MAX)
}

pub fn write_count(sink: &mut BitSink, count: usize) -> Result<(), CodecError> {
    for (step, (&offset, width)) in COUNT_OFFSETS.iter().zip(COUNT_WIDTHS).enumerate() {
        if count < offset + (1usize << width) {
            STEPS.write(sink, step)?;
            return sink.write_bits((count - offset) as u32, width);
        }
    }
    Err(CodecError::InputTooLarge {
        len: count,
        max: MAX_COUNT,
    })
}

pub fn read_count(source: &mut BitSource<'_>) -> Result<usize, CodecError> {
    let step = STEPS.read(source)?;
    let value = source.read_bits(COUNT_WIDTHS[step])? as usize;
    Ok(value + COUNT_OFFSETS[step])
}

/// Write a signed code point difference. Any two scalar values are within range.
pub fn write_delta(sink: &mut BitSink, delta: i32) -> Result<(), CodecError> {
    let magnitude = delta.unsigned_abs();
    for (step, (&offset, width)) in DELTA_OFFSETS.iter().zip(DELTA_WIDTHS).enumerate() {
        if magnitude < offset + (1u32 << width) {
            STEPS.write(sink, step)?;
            sink.write_bits(u32::from(delta < 0), 1)?;
            return sink.write_bits(magnitude - offset, width);
        }
    }
    Err(CodecError::InputTooLarge {
        len: magnitude as usize,
        max: (DELTA_OFFSETS[4] + (1 << DELTA_WIDTHS[4]) - 1) as usize,
    })
}

/// What follows a step prefix in Delta mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaToken {
    CodePoint(i32),
    Special(DeltaSpecial),
}

pub fn read_delta(source: &mut BitSource<'_>) -> Result<DeltaToken, CodecError> {
    let step = STEPS.read(source)?;
    if step == SPECIAL_STEP {
        let special = DELTA_SPECIALS.read(source)?;
        return Ok(DeltaToken::Special(DeltaSpecial::from_index(special)));
    }
    let negative = source.read_bit()?;
    let magnitude = (source.read_bits(DELTA_WIDTHS[step])? + DELTA_OFFSETS[step]) as i32;
    Ok(DeltaToken::CodePoint(if negative { -magnitude } else { magnitude }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_books() -> Vec<&'static Codebook> {
        let mut books = vec![&*VCODES, &*STEPS, &*DELTA_SPECIALS, &*DELTA_ENTRY];
        books.extend(Preset::ALL.iter().map(|p| p.tables().selectors.book()));
        books
    }

    #[test]
    fn test_builtin_books_are_complete() {
        for book in all_books() {
            assert!(book.is_complete(), "{} leaves unused bit patterns", book.name());
        }
        assert_eq!(VCODES.len(), SET_SIZE);
    }

    #[test]
    fn test_presets_offer_core_sets() {
        for preset in Preset::ALL {
            let selectors = &preset.tables().selectors;
            for selector in [Selector::Alpha, Selector::Sym, Selector::Num, Selector::Delta] {
                assert!(selectors.has(selector), "{preset:?} lacks {selector:?}");
            }
            assert_eq!(selectors.has(Selector::Dict), preset != Preset::NoDict);
        }
    }

    #[test]
    fn test_selector_read_back() {
        let selectors = &Preset::FavourNum.tables().selectors;
        let mut sink = BitSink::with_capacity(8);
        for selector in Selector::ALL {
            selectors.write(&mut sink, selector).unwrap();
        }
        assert_eq!(selectors.width(Selector::Num), Some(1));
        let (bytes, bits) = sink.flush().unwrap();
        assert_eq!(bits, 13);
        let mut source = BitSource::new(&bytes, bits);
        for selector in Selector::ALL {
            assert_eq!(selectors.read(&mut source).unwrap(), selector);
        }
    }

    #[test]
    fn test_missing_selector_cannot_be_written() {
        let selectors = &Preset::NoDict.tables().selectors;
        let mut sink = BitSink::with_capacity(8);
        assert_eq!(selectors.width(Selector::Dict), None);
        assert!(matches!(
            selectors.write(&mut sink, Selector::Dict),
            Err(CodecError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_prefix_collision() {
        let err = Codebook::new("bad", &[(0b0, 1), (0b01, 2)]).unwrap_err();
        assert_eq!(
            err,
            CodebookError::NotPrefixFree {
                name: "bad",
                shorter: 0,
                longer: 1
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_and_oversized() {
        assert!(Codebook::new("dup", &[(0b1, 1), (0b1, 1)]).is_err());
        assert!(Codebook::new("wide", &[(0b100, 2)]).is_err());
        assert!(Codebook::new("empty", &[]).is_err());
    }

    #[test]
    fn test_vcode_read_back() {
        let mut sink = BitSink::with_capacity(64);
        for index in 0..VCODES.len() {
            VCODES.write(&mut sink, index).unwrap();
        }
        let (bytes, bits) = sink.flush().unwrap();
        let mut source = BitSource::new(&bytes, bits);
        for index in 0..VCODES.len() {
            assert_eq!(VCODES.read(&mut source).unwrap(), index);
        }
    }

    #[test]
    fn test_count_boundaries() {
        let samples = [0, 3, 4, 35, 36, 164, 675, 676, 4771, 4772, MAX_COUNT];
        let mut sink = BitSink::with_capacity(128);
        for &count in &samples {
            write_count(&mut sink, count).unwrap();
        }
        assert!(write_count(&mut sink, MAX_COUNT + 1).is_err());
        let (bytes, bits) = sink.flush().unwrap();
        let mut source = BitSource::new(&bytes, bits);
        for &count in &samples {
            assert_eq!(read_count(&mut source).unwrap(), count);
        }
        assert_eq!(count_bits(0), 3);
        assert_eq!(count_bits(4), 7);
    }

    #[test]
    fn test_delta_extremes() {
        let samples = [0, 1, -1, 63, -64, 4159, 20544, -86079, 0x10FFFF, -0x10FFFF];
        let mut sink = BitSink::with_capacity(128);
        for &delta in &samples {
            write_delta(&mut sink, delta).unwrap();
        }
        let (bytes, bits) = sink.flush().unwrap();
        let mut source = BitSource::new(&bytes, bits);
        for &delta in &samples {
            assert_eq!(read_delta(&mut source).unwrap(), DeltaToken::CodePoint(delta));
        }
    }

    #[test]
    fn test_sequences_resolve_to_their_slots() {
        for preset in Preset::ALL {
            let tables = preset.tables();
            assert_eq!(tables.sequences.len(), FREQUENT_COUNT + 1);
            for &(seq, set, index) in &tables.sequences {
                let slot = match set {
                    Selector::Num => &NUM_SET[index],
                    _ => &SYM_SET[index],
                };
                assert_eq!(tables.slot_bytes(slot), Some(seq));
            }
            assert!(tables
                .sequences
                .windows(2)
                .all(|w| w[0].0.len() >= w[1].0.len()));
        }
    }

    #[test]
    fn test_url_preset_sequences() {
        let tables = Preset::Url.tables();
        assert_eq!(tables.sequences[0], (&b"https://"[..], Selector::Num, 23));
        assert_eq!(tables.slot_bytes(&SYM_SET[25]), Some(&b"http://"[..]));
        assert_eq!(tables.slot_bytes(&NUM_SET[26]), None);
    }
}
