// End-to-end properties of the CP949 table, glyph index and converter.

use encoding_rs::EUC_KR;
use hangul_text_hook::convert::{self, classify, decode_legacy, Detection, PassThrough};
use hangul_text_hook::cp949::{self, LEAD_MAX, LEAD_MIN, TRAIL_MAX, TRAIL_MIN};
use hangul_text_hook::glyph::{self, GlyphTable, BASE_GLYPHS};

fn pairs() -> impl Iterator<Item = (u8, u8)> {
    (LEAD_MIN..=LEAD_MAX).flat_map(|lead| (TRAIL_MIN..=TRAIL_MAX).map(move |trail| (lead, trail)))
}

fn converted(src: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; src.len() * 3 + 1];
    let n = convert::convert(src, &mut dst);
    assert_eq!(dst[n], 0);
    dst.truncate(n);
    dst
}

#[test]
fn table_agrees_with_euc_kr() {
    for (lead, trail) in pairs() {
        let bytes = [lead, trail];
        let (decoded, _, had_errors) = EUC_KR.decode(&bytes);
        assert!(!had_errors, "{:02X} {:02X}", lead, trail);
        let expected = decoded.chars().next().unwrap();
        assert_eq!(cp949::to_char(lead, trail), Some(expected), "{:02X} {:02X}", lead, trail);
    }
}

#[test]
fn every_pair_round_trips_through_conversion() {
    for (lead, trail) in pairs() {
        let out = converted(&[lead, trail]);
        let text = std::str::from_utf8(&out).unwrap();
        let mut chars = text.chars();
        let c = chars.next().unwrap();
        assert!(chars.next().is_none());
        assert_eq!(cp949::from_unicode(c as u32), Some((lead, trail)));

        let (encoded, _, _) = EUC_KR.encode(text);
        assert_eq!(&*encoded, &[lead, trail]);
    }
}

#[test]
fn converted_text_is_stable() {
    // Leads C2/C3 next to a trail in 80..=BF would look like Latin-1 damage.
    let legacy: Vec<u8> = pairs()
        .filter(|&(lead, _)| lead != 0xC2 && lead != 0xC3)
        .step_by(7)
        .flat_map(|(l, t)| [l, t, b' '])
        .collect();
    assert_eq!(classify(&legacy), Detection::LegacyDoubleByte);
    let once = converted(&legacy);
    assert_eq!(classify(&once), Detection::NoConversionNeeded(PassThrough::Unrecognized));
    assert!(converted(&once).is_empty());

    let mut dst = vec![0u8; once.len() + 1];
    let n = decode_legacy(&once, &mut dst);
    assert_eq!(&dst[..n], once.as_slice());

    assert_eq!(classify(b"ASCII only"), Detection::NoConversionNeeded(PassThrough::Ascii));
}

#[test]
fn adjacent_syllables_convert_without_separators() {
    // Every syllable directly followed by 가 (B0 A1); no spaces to resync on.
    let damage_shaped = |b: u8| b == 0xC2 || b == 0xC3;
    for (lead, trail) in pairs().filter(|&(l, t)| !damage_shaped(l) && !damage_shaped(t)) {
        let legacy = [lead, trail, 0xB0, 0xA1];
        let (expected, _, had_errors) = EUC_KR.decode(&legacy);
        assert!(!had_errors);
        assert_eq!(classify(&legacy), Detection::LegacyDoubleByte, "{:02X} {:02X}", lead, trail);
        assert_eq!(converted(&legacy), expected.as_bytes(), "{:02X} {:02X}", lead, trail);
    }

    let sentence = "규칙 룰가이드";
    let (legacy, _, _) = EUC_KR.encode(sentence);
    assert_eq!(converted(&legacy), sentence.as_bytes());
}

#[test]
fn glyph_table_build_is_idempotent() {
    let base: Vec<u32> = (0..BASE_GLYPHS as u32).collect();
    assert_eq!(GlyphTable::build(&base).unwrap(), GlyphTable::build(&base).unwrap());
}

#[test]
fn legacy_pair_reaches_glyph_and_utf8() {
    // 제: lead 0xC1 = 0xB0 + 17, trail 0xA6 = 0xA1 + 5
    assert_eq!(glyph::glyph_index(0xC1, 0xA6), Some(256 + 17 * 94 + 5));
    assert_eq!(cp949::to_unicode(0xC1, 0xA6), Some(0xC81C));
    assert_eq!(converted(&[0xC1, 0xA6]), vec![0xEC, 0xA0, 0x9C]);
}

#[test]
fn latin1_damaged_text_recovers_same_output() {
    // 제 after a Latin-1 -> UTF-8 pass: C1 -> C3 81, A6 -> C2 A6
    let damaged = [0xC3, 0x81, 0xC2, 0xA6];
    assert_eq!(classify(&damaged), Detection::CorruptedSingleByte);
    assert_eq!(converted(&damaged), converted(&[0xC1, 0xA6]));

    let sentence = "가나다 OK";
    let (legacy, _, _) = EUC_KR.encode(sentence);
    let damaged: String = legacy.iter().map(|&b| b as char).collect();
    assert_eq!(converted(damaged.as_bytes()), sentence.as_bytes());
    assert_eq!(converted(&legacy), sentence.as_bytes());
}

#[test]
fn short_c2_run_is_not_corruption() {
    assert_eq!(classify(&[0xC2, 0xA6]), Detection::LegacyDoubleByte);
}

#[test]
fn truncated_pair_and_small_buffer_fail_soft() {
    let mut dst = [0xFFu8; 16];
    let n = decode_legacy(&[0xC1, 0xA6, 0xB0], &mut dst);
    assert_eq!(&dst[..n + 1], &[0xEC, 0xA0, 0x9C, 0xB0, 0]);

    let mut small = [0xFFu8; 5];
    let n = convert::convert(&[0xC1, 0xA6, 0xC1, 0xA6], &mut small);
    assert_eq!(n, 3);
    assert_eq!(small[3], 0);
}
