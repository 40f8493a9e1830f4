// glyph.rs — Expanded glyph table and the flat glyph index contract.
//
// The renderer's font atlas is a flat array of code points. Slots [0, 256) are
// the game's own Latin table, untouched. Slots [256, 2606) hold the KS X 1001
// Hangul block in code-pair order, so the glyph for (lead, trail) sits at
//
//     256 + (lead - 0xB0) * 94 + (trail - 0xA1)
//
// and a text renderer can go from bytes to glyph slot with arithmetic alone.

use once_cell::sync::OnceCell;

use crate::cp949::{self, PAIR_COUNT};
use crate::error::{Error, Result};

/// Size of the renderer's original glyph table.
pub const BASE_GLYPHS: usize = 256;
/// Number of slots appended for the Hangul block.
pub const HANGUL_GLYPHS: usize = PAIR_COUNT;
/// Size of the expanded table the renderer bakes.
pub const TOTAL_GLYPHS: usize = BASE_GLYPHS + HANGUL_GLYPHS; // 2606
/// Code point baked for a pair without a mapping.
pub const FALLBACK_CODE_POINT: u32 = 0x20;

/// Glyph index for a legacy code pair, or `None` outside the Hangul block.
#[inline]
pub fn glyph_index(lead: u8, trail: u8) -> Option<u16> {
    cp949::pair_offset(lead, trail).map(|off| (BASE_GLYPHS + off) as u16)
}

/// Code pair stored at a glyph index (inverse of [`glyph_index`]).
#[inline]
pub fn code_pair(index: u16) -> Option<(u8, u8)> {
    (index as usize).checked_sub(BASE_GLYPHS).and_then(cp949::pair_at)
}

/// Glyph index of a Hangul syllable, if it is part of the baked repertoire.
pub fn glyph_index_for_char(c: char) -> Option<u16> {
    let (lead, trail) = cp949::from_unicode(c as u32)?;
    glyph_index(lead, trail)
}

// ============================================================
// Expanded table
// ============================================================

/// Base table followed by the Hangul expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphTable {
    code_points: Box<[u32]>,
    base_len: usize,
}

impl GlyphTable {
    /// Copy `base` verbatim and append one slot per code pair of the Hangul block.
    ///
    /// Slot `base.len() + pair_offset(lead, trail)` receives the pair's code point,
    /// or [`FALLBACK_CODE_POINT`] when the pair has no mapping.
    pub fn build(base: &[u32]) -> Result<Self> {
        let total = base.len() + HANGUL_GLYPHS;
        let mut code_points = Vec::new();
        code_points
            .try_reserve_exact(total)
            .map_err(|_| Error::Allocation { size: total * std::mem::size_of::<u32>() })?;

        code_points.extend_from_slice(base);
        code_points.extend((0..HANGUL_GLYPHS).map(|off| {
            cp949::pair_at(off)
                .and_then(|(lead, trail)| cp949::to_unicode(lead, trail))
                .unwrap_or(FALLBACK_CODE_POINT)
        }));

        Ok(Self { code_points: code_points.into_boxed_slice(), base_len: base.len() })
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.code_points
    }

    pub fn as_ptr(&self) -> *const u32 {
        self.code_points.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.code_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_points.is_empty()
    }

    /// The verbatim copy of the caller's base table.
    pub fn base(&self) -> &[u32] {
        &self.code_points[..self.base_len]
    }

    /// The Hangul expansion, in code-pair order.
    pub fn expansion(&self) -> &[u32] {
        &self.code_points[self.base_len..]
    }

    /// Code point at a glyph index.
    pub fn get(&self, index: usize) -> Option<u32> {
        self.code_points.get(index).copied()
    }
}

/// Write-once holder for the expanded table.
///
/// The first successful build wins; later requests return the same table no
/// matter what base they pass. A failed build leaves the cache empty so the
/// caller falls back to the unexpanded base table.
pub struct GlyphCache {
    table: OnceCell<GlyphTable>,
}

impl GlyphCache {
    pub const fn new() -> Self {
        Self { table: OnceCell::new() }
    }

    pub fn get_or_build(&self, base: &[u32]) -> Result<&GlyphTable> {
        self.table.get_or_try_init(|| GlyphTable::build(base))
    }

    pub fn get(&self) -> Option<&GlyphTable> {
        self.table.get()
    }

    pub fn is_built(&self) -> bool {
        self.table.get().is_some()
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latin_base() -> Vec<u32> {
        (0..BASE_GLYPHS as u32).collect()
    }

    #[test]
    fn index_formula_endpoints() {
        assert_eq!(glyph_index(0xB0, 0xA1), Some(256));
        assert_eq!(glyph_index(0xC8, 0xFE), Some(2605));
        assert_eq!(glyph_index(0xC1, 0xA6), Some(1859));
        assert_eq!(glyph_index(0xAF, 0xA1), None);
        assert_eq!(glyph_index(0xB0, 0xFF), None);
    }

    #[test]
    fn index_formula_has_no_gaps_or_collisions() {
        let mut seen = vec![false; TOTAL_GLYPHS];
        for lead in cp949::LEAD_MIN..=cp949::LEAD_MAX {
            for trail in cp949::TRAIL_MIN..=cp949::TRAIL_MAX {
                let idx = glyph_index(lead, trail).unwrap() as usize;
                assert!((BASE_GLYPHS..TOTAL_GLYPHS).contains(&idx));
                assert!(!seen[idx], "collision at {idx}");
                seen[idx] = true;
                assert_eq!(code_pair(idx as u16), Some((lead, trail)));
            }
        }
        assert!(seen[BASE_GLYPHS..].iter().all(|&s| s));
        assert_eq!(code_pair(255), None);
        assert_eq!(code_pair(TOTAL_GLYPHS as u16), None);
    }

    #[test]
    fn build_copies_base_and_expands() {
        let base = latin_base();
        let table = GlyphTable::build(&base).unwrap();
        assert_eq!(table.len(), TOTAL_GLYPHS);
        assert_eq!(table.base(), base.as_slice());
        assert_eq!(table.get(256), Some(0xAC00));
        assert_eq!(table.get(1859), Some('제' as u32));
        assert_eq!(table.get(256 + (0xBD - 0xB0) * 94 + (0xC3 - 0xA1)), Some('시' as u32));
        assert_eq!(table.expansion().len(), HANGUL_GLYPHS);
    }

    #[test]
    fn build_honours_other_base_sizes() {
        let table = GlyphTable::build(&[0x41, 0x42]).unwrap();
        assert_eq!(table.len(), 2 + HANGUL_GLYPHS);
        assert_eq!(table.get(2), Some(0xAC00));
    }

    #[test]
    fn cache_builds_once() {
        let cache = GlyphCache::new();
        assert!(!cache.is_built());
        let first = cache.get_or_build(&latin_base()).unwrap().clone();
        let second = cache.get_or_build(&[7; BASE_GLYPHS]).unwrap();
        assert_eq!(&first, second);
        assert_eq!(second.get(0), Some(0));
    }

    #[test]
    fn glyph_index_for_char_uses_reverse_table() {
        assert_eq!(glyph_index_for_char('가'), Some(256));
        assert_eq!(glyph_index_for_char('똠'), None);
        assert_eq!(glyph_index_for_char('A'), None);
    }
}
