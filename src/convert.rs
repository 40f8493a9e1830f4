// convert.rs — Encoding detection and CP949 -> UTF-8 conversion for UI text.
//
// Text reaches the UI draw path in one of three shapes:
//   - plain ASCII (nothing to do),
//   - raw CP949 double-byte text,
//   - CP949 text that an earlier loader read as Latin-1 and re-encoded as UTF-8,
//     so every original byte 0x80..=0xFF became a `C2 xx` / `C3 xx` pair.
// Both non-ASCII shapes are normalized to UTF-8 Hangul. Conversion is fail-soft:
// every input byte ends up in the output, either converted or copied verbatim.
//
// A run that is already valid UTF-8 is walked character by character, so
// converted text never splits into legacy pairs and a second pass is a no-op.
// Anything else is walked as raw CP949, pairing each lead byte with the byte
// after it before looking at anything else.

use crate::cp949;

/// Minimum run length before the Latin-1 corruption heuristic may fire.
///
/// Shorter runs are judged by the remaining rules; a lone `C2 A6` is read as a
/// legacy pair, which keeps every 2-byte CP949 syllable round-trippable.
pub const MIN_CORRUPTED_RUN: usize = 4;

/// Capacity of the per-thread conversion scratch buffer.
pub const SCRATCH_CAPACITY: usize = 8192;

/// Why a run is passed through unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassThrough {
    /// No byte >= 0x80.
    Ascii,
    /// Non-ASCII bytes that match neither heuristic (includes converted text).
    Unrecognized,
}

/// Outcome of [`classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detection {
    NoConversionNeeded(PassThrough),
    /// CP949 bytes that went through Latin-1 -> UTF-8.
    CorruptedSingleByte,
    /// Raw CP949 double-byte text.
    LegacyDoubleByte,
}

impl Detection {
    pub fn needs_conversion(self) -> bool {
        !matches!(self, Detection::NoConversionNeeded(_))
    }
}

/// Classification plus the number of bytes written by the conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub detection: Detection,
    pub len: usize,
}

#[inline]
fn is_latin1_utf8_pair(b0: u8, b1: u8) -> bool {
    (b0 == 0xC2 || b0 == 0xC3) && (0x80..=0xBF).contains(&b1)
}

/// Classify a byte run. Rules are applied in priority order over the whole run:
///
/// 1. no byte >= 0x80: pure ASCII;
/// 2. run of at least [`MIN_CORRUPTED_RUN`] bytes containing a `C2|C3, 80..=BF` pair:
///    Latin-1 corrupted CP949;
/// 3. a pair in the CP949 Hangul block: raw CP949. In a run that is valid UTF-8
///    only pairs starting on a character boundary count;
/// 4. otherwise unrecognized, passed through.
pub fn classify(text: &[u8]) -> Detection {
    if text.is_ascii() {
        return Detection::NoConversionNeeded(PassThrough::Ascii);
    }

    if text.len() >= MIN_CORRUPTED_RUN
        && text.windows(2).any(|w| is_latin1_utf8_pair(w[0], w[1]))
    {
        return Detection::CorruptedSingleByte;
    }

    let legacy = if std::str::from_utf8(text).is_ok() {
        LegacyUnits::new(text).any(|unit| matches!(unit, Unit::Hangul(_)))
    } else {
        text.windows(2).any(|w| cp949::is_lead(w[0]) && cp949::is_trail(w[1]))
    };
    if legacy {
        return Detection::LegacyDoubleByte;
    }

    Detection::NoConversionNeeded(PassThrough::Unrecognized)
}

/// Classify `src` and, if needed, convert it into `dst`.
///
/// Returns the produced length, excluding the NUL terminator. 0 means no
/// conversion was performed (or `dst` cannot hold even the terminator).
pub fn convert(src: &[u8], dst: &mut [u8]) -> usize {
    convert_detected(src, dst).len
}

/// [`convert`], also reporting which form was detected.
pub fn convert_detected(src: &[u8], dst: &mut [u8]) -> Conversion {
    let detection = classify(src);
    let len = match detection {
        Detection::NoConversionNeeded(_) => 0,
        Detection::CorruptedSingleByte => decode_corrupted(src, dst),
        Detection::LegacyDoubleByte => decode_legacy(src, dst),
    };
    Conversion { detection, len }
}

/// Convert raw CP949 text to UTF-8.
///
/// ASCII and unmatched bytes are copied; each mapped Hangul pair becomes three
/// UTF-8 bytes. When `src` is valid UTF-8 its multi-byte characters are copied
/// as units. Output is NUL-terminated and truncated at a unit boundary if `dst`
/// is too small.
pub fn decode_legacy(src: &[u8], dst: &mut [u8]) -> usize {
    emit(LegacyUnits::new(src), dst)
}

/// Undo a Latin-1 -> UTF-8 pass, then convert the recovered CP949 bytes.
///
/// 2-byte UTF-8 sequences for U+0080..=U+00FF collapse back to the original
/// byte; other 2-byte and all 3-byte sequences are kept verbatim and never
/// paired with neighbouring bytes.
pub fn decode_corrupted(src: &[u8], dst: &mut [u8]) -> usize {
    emit(Latin1Units { src, pos: 0 }, dst)
}

// ============================================================
// Unit streams
// ============================================================

/// One step of input: a raw byte that may form a CP949 pair, a pair already
/// resolved to its syllable, or bytes that are copied as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Unit<'a> {
    Byte(u8),
    Hangul(u32),
    Verbatim(&'a [u8]),
}

/// Raw CP949 walk. Pairs are resolved here, so a trail byte is never taken for
/// the start of something else.
struct LegacyUnits<'a> {
    src: &'a [u8],
    pos: usize,
    /// `src` is valid UTF-8; multi-byte characters pass as units.
    utf8: bool,
}

impl<'a> LegacyUnits<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0, utf8: std::str::from_utf8(src).is_ok() }
    }
}

impl<'a> Iterator for LegacyUnits<'a> {
    type Item = Unit<'a>;

    fn next(&mut self) -> Option<Unit<'a>> {
        let rest = self.src.get(self.pos..).filter(|r| !r.is_empty())?;
        if let &[lead, trail, ..] = rest {
            if let Some(cp) = cp949::to_unicode(lead, trail) {
                self.pos += 2;
                return Some(Unit::Hangul(cp));
            }
        }
        // A lead byte that starts a 2-byte character (C2..=C8) was paired above
        // when the next byte is a trail.
        let width = match rest[0] {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => 1,
        };
        if self.utf8 && width > 1 {
            if let Some(ch) = rest.get(..width) {
                self.pos += width;
                return Some(Unit::Verbatim(ch));
            }
        }
        self.pos += 1;
        Some(Unit::Byte(rest[0]))
    }
}

struct Latin1Units<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Latin1Units<'a> {
    type Item = Unit<'a>;

    fn next(&mut self) -> Option<Unit<'a>> {
        let rest = self.src.get(self.pos..).filter(|r| !r.is_empty())?;
        let b0 = rest[0];
        let is_cont = |i: usize| rest.get(i).is_some_and(|b| b & 0xC0 == 0x80);

        if b0 & 0xE0 == 0xC0 && is_cont(1) {
            self.pos += 2;
            let cp = ((b0 as u32 & 0x1F) << 6) | (rest[1] as u32 & 0x3F);
            return Some(match u8::try_from(cp) {
                Ok(byte) => Unit::Byte(byte),
                Err(_) => Unit::Verbatim(&rest[..2]),
            });
        }
        if b0 & 0xF0 == 0xE0 && is_cont(1) && is_cont(2) {
            self.pos += 3;
            return Some(Unit::Verbatim(&rest[..3]));
        }
        self.pos += 1;
        Some(Unit::Byte(b0))
    }
}

/// Bounded, NUL-terminated output cursor.
struct Output<'a> {
    dst: &'a mut [u8],
    len: usize,
}

impl Output<'_> {
    /// Append `bytes` if they fit in front of the terminator slot.
    fn push(&mut self, bytes: &[u8]) -> bool {
        let end = self.len + bytes.len();
        if end >= self.dst.len() {
            return false;
        }
        self.dst[self.len..end].copy_from_slice(bytes);
        self.len = end;
        true
    }

    fn finish(self) -> usize {
        if let Some(slot) = self.dst.get_mut(self.len) {
            *slot = 0;
        }
        self.len
    }
}

fn emit<'a>(units: impl Iterator<Item = Unit<'a>>, dst: &mut [u8]) -> usize {
    let mut out = Output { dst, len: 0 };
    let mut units = units.peekable();

    while let Some(unit) = units.next() {
        let fits = match unit {
            Unit::Verbatim(bytes) => out.push(bytes),
            Unit::Hangul(cp) => out.push(&cp949::utf8_bytes(cp)),
            Unit::Byte(lead) if cp949::is_lead(lead) => {
                let hangul = match units.peek() {
                    Some(&Unit::Byte(trail)) => cp949::to_unicode(lead, trail),
                    _ => None,
                };
                match hangul {
                    Some(cp) => {
                        units.next();
                        out.push(&cp949::utf8_bytes(cp))
                    }
                    None => out.push(&[lead]),
                }
            }
            Unit::Byte(b) => out.push(&[b]),
        };
        if !fits {
            break;
        }
    }

    out.finish()
}

// ============================================================
// Scratch buffer
// ============================================================

/// Fixed-capacity conversion target reused across calls.
///
/// Not reentrant: the result borrows the buffer until the caller is done with it.
pub struct ConversionBuffer {
    buf: Box<[u8]>,
}

impl ConversionBuffer {
    pub fn new() -> Self {
        Self::with_capacity(SCRATCH_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: vec![0u8; capacity].into_boxed_slice() }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Convert `src`; `None` when no conversion was performed.
    ///
    /// The returned slice excludes the terminator, which is still present in the
    /// buffer directly after it.
    pub fn convert(&mut self, src: &[u8]) -> (Detection, Option<&[u8]>) {
        let Conversion { detection, len } = convert_detected(src, &mut self.buf);
        let out = (len > 0).then(|| &self.buf[..len]);
        (detection, out)
    }
}

impl Default for ConversionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_vec(src: &[u8]) -> Vec<u8> {
        let mut dst = [0u8; 256];
        let n = convert(src, &mut dst);
        assert_eq!(dst[n], 0, "missing terminator");
        dst[..n].to_vec()
    }

    #[test]
    fn ascii_needs_nothing() {
        assert_eq!(classify(b"Hello, world"), Detection::NoConversionNeeded(PassThrough::Ascii));
        assert_eq!(classify(b""), Detection::NoConversionNeeded(PassThrough::Ascii));
        let mut dst = [0xAAu8; 16];
        assert_eq!(convert(b"abc", &mut dst), 0);
        assert_eq!(dst, [0xAA; 16]);
    }

    #[test]
    fn raw_cp949_is_detected_and_decoded() {
        // "제목: 가" in CP949.
        let src = [0xC1, 0xA6, 0xB8, 0xF1, b':', b' ', 0xB0, 0xA1];
        assert_eq!(classify(&src), Detection::LegacyDoubleByte);
        assert_eq!(convert_vec(&src), "제목: 가".as_bytes());
    }

    #[test]
    fn latin1_corruption_is_detected_and_reversed() {
        // CP949 "제" (C1 A6) read as Latin-1 "Á¦" and written as UTF-8.
        let src = [0xC3, 0x81, 0xC2, 0xA6];
        assert_eq!(classify(&src), Detection::CorruptedSingleByte);
        assert_eq!(convert_vec(&src), "제".as_bytes());

        // "비" (BA F1) -> "ºñ" -> C2 BA C3 B1, with ASCII around it.
        let src = [b'[', 0xC2, 0xBA, 0xC3, 0xB1, b']'];
        assert_eq!(convert_vec(&src), "[비]".as_bytes());
    }

    #[test]
    fn short_corruption_window_falls_through_to_legacy() {
        assert_eq!(classify(&[0xC2, 0xA6]), Detection::LegacyDoubleByte);
        assert_eq!(classify(&[0xC2, 0xA6, b'x']), Detection::LegacyDoubleByte);
        assert_eq!(classify(&[0xC2, 0xA6, b'x', b'y']), Detection::CorruptedSingleByte);
    }

    #[test]
    fn corrupted_path_keeps_existing_utf8_hangul_in_place() {
        let mut src = vec![0xC3, 0x81, 0xC2, 0xA6, b' '];
        src.extend_from_slice("가".as_bytes());
        src.push(b'!');
        assert_eq!(convert_vec(&src), "제 가!".as_bytes());
    }

    #[test]
    fn corrupted_path_keeps_non_latin1_two_byte_sequences() {
        // U+0410 (Cyrillic A) is D0 90; it must not be recombined with neighbours.
        let src = [0xC3, 0x81, 0xC2, 0xA6, 0xD0, 0x90];
        assert_eq!(convert_vec(&src), [&"제".as_bytes()[..], &[0xD0, 0x90]].concat());
    }

    #[test]
    fn unrecognized_non_ascii_passes_through() {
        let src = [b'a', 0x81, 0x41, b'b'];
        assert_eq!(classify(&src), Detection::NoConversionNeeded(PassThrough::Unrecognized));
        assert_eq!(convert_vec(&src), b"");
    }

    #[test]
    fn already_converted_text_is_stable() {
        let utf8 = "각 가나다 힝".as_bytes();
        assert_eq!(classify(utf8), Detection::NoConversionNeeded(PassThrough::Unrecognized));
        let mut dst = [0u8; 64];
        assert_eq!(convert(utf8, &mut dst), 0);
    }

    #[test]
    fn trail_bytes_shaped_like_utf8_stay_paired() {
        // "닿가": trail EA of 닿 followed by B0 A1 reads like UTF-8 "갡".
        let src = [0xB4, 0xEA, 0xB0, 0xA1];
        assert_eq!(classify(&src), Detection::LegacyDoubleByte);
        assert_eq!(convert_vec(&src), "닿가".as_bytes());
    }

    #[test]
    fn hanja_before_hangul_is_still_legacy() {
        // 濡 (EB A1) is outside the Hangul block; 가 after it must still count.
        let src = [0xEB, 0xA1, 0xB0, 0xA1];
        assert_eq!(classify(&src), Detection::LegacyDoubleByte);
        assert_eq!(convert_vec(&src), [&[0xEB, 0xA1][..], "가".as_bytes()].concat());
    }

    #[test]
    fn utf8_text_is_walked_by_character() {
        // 갡 is EA B0 A1: its last two bytes form a CP949 pair, but not on a boundary.
        let utf8 = "갡 中 аб".as_bytes();
        assert_eq!(classify(utf8), Detection::NoConversionNeeded(PassThrough::Unrecognized));
        let mut dst = [0u8; 16];
        assert_eq!(decode_legacy(utf8, &mut dst), utf8.len());
        assert_eq!(&dst[..utf8.len()], utf8);
    }

    #[test]
    fn truncated_pair_copies_the_lead() {
        let src = [b'a', 0xB0, 0xA1, 0xC1];
        assert_eq!(convert_vec(&src), [&b"a"[..], "가".as_bytes(), &[0xC1]].concat());
    }

    #[test]
    fn unmapped_or_out_of_range_bytes_are_kept() {
        let src = [0xB0, 0xA1, 0xB0, 0x41, 0xFF];
        assert_eq!(convert_vec(&src), [&"가".as_bytes()[..], &[0xB0, 0x41, 0xFF]].concat());
    }

    #[test]
    fn output_truncates_at_unit_boundary() {
        let src = [0xB0, 0xA1, 0xB0, 0xA1];
        // Room for one syllable plus terminator, not two.
        let mut dst = [0xEEu8; 6];
        let n = convert(&src, &mut dst);
        assert_eq!(n, 3);
        assert_eq!(&dst[..4], &[0xEA, 0xB0, 0x80, 0]);

        let mut tiny = [0xEEu8; 3];
        assert_eq!(convert(&src, &mut tiny), 0);
        assert_eq!(tiny[0], 0);

        let mut none: [u8; 0] = [];
        assert_eq!(convert(&src, &mut none), 0);
    }

    #[test]
    fn scratch_buffer_reports_detection() {
        let mut scratch = ConversionBuffer::with_capacity(32);
        let (det, out) = scratch.convert(&[0xC1, 0xA6]);
        assert_eq!(det, Detection::LegacyDoubleByte);
        assert_eq!(out, Some("제".as_bytes()));
        let (det, out) = scratch.convert(b"plain");
        assert_eq!(det, Detection::NoConversionNeeded(PassThrough::Ascii));
        assert_eq!(out, None);
    }
}
