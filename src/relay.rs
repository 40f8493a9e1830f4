// relay.rs — The functions the host ends up calling instead of its own.
//
// Each relay is a plain `extern "C"` function with the exact signature of the
// function it stands in for, so the compiler preserves everything the caller
// expects across the call. A relay only ever substitutes arguments:
//
//   bake_relay:      a 256-entry glyph bake becomes a 2606-entry bake
//   draw_text_relay: CP949 text becomes UTF-8 before the draw
//
// and then always calls the original, even when there is nothing to change.
// Hooks publish the original before the redirect goes live, so a relay always
// finds one; the empty check only keeps a stray direct call from jumping to 0.

use std::cell::RefCell;
use std::ffi::{c_char, c_int, c_void};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::slice;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::convert::{ConversionBuffer, Detection, PassThrough};
use crate::diag::{self, SampleBudget};
use crate::glyph::{GlyphCache, GlyphTable, BASE_GLYPHS};

// ============================================================
// Statistics
// ============================================================

/// Call counters, reported at detach.
pub struct Stats {
    text_calls: AtomicU64,
    corrupted: AtomicU64,
    legacy: AtomicU64,
    unrecognized: AtomicU64,
    reentrant: AtomicU64,
    bake_calls: AtomicU64,
    bake_expanded: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub text_calls: u64,
    pub corrupted: u64,
    pub legacy: u64,
    pub unrecognized: u64,
    pub reentrant: u64,
    pub bake_calls: u64,
    pub bake_expanded: u64,
}

impl Stats {
    pub const fn new() -> Self {
        Self {
            text_calls: AtomicU64::new(0),
            corrupted: AtomicU64::new(0),
            legacy: AtomicU64::new(0),
            unrecognized: AtomicU64::new(0),
            reentrant: AtomicU64::new(0),
            bake_calls: AtomicU64::new(0),
            bake_expanded: AtomicU64::new(0),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record(&self, detection: Detection) {
        match detection {
            Detection::CorruptedSingleByte => Self::bump(&self.corrupted),
            Detection::LegacyDoubleByte => Self::bump(&self.legacy),
            Detection::NoConversionNeeded(PassThrough::Unrecognized) => Self::bump(&self.unrecognized),
            Detection::NoConversionNeeded(PassThrough::Ascii) => {}
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let get = |c: &AtomicU64| c.load(Ordering::Relaxed);
        StatsSnapshot {
            text_calls: get(&self.text_calls),
            corrupted: get(&self.corrupted),
            legacy: get(&self.legacy),
            unrecognized: get(&self.unrecognized),
            reentrant: get(&self.reentrant),
            bake_calls: get(&self.bake_calls),
            bake_expanded: get(&self.bake_expanded),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text draws {} (corrupted {}, legacy {}, unhandled {}, reentrant {}), bakes {} (expanded {})",
            self.text_calls, self.corrupted, self.legacy, self.unrecognized, self.reentrant,
            self.bake_calls, self.bake_expanded
        )
    }
}

// ============================================================
// Shared relay state
// ============================================================

thread_local! {
    /// Conversion target of the draw in progress on this thread.
    static SCRATCH: RefCell<ConversionBuffer> = RefCell::new(ConversionBuffer::new());
}

/// Everything the relays share: where the originals live, the expanded glyph
/// table, counters and sample budgets.
pub struct Relays {
    bake_original: AtomicUsize,
    text_original: AtomicUsize,
    glyphs: GlyphCache,
    stats: Stats,
    bake_samples: SampleBudget,
    text_samples: SampleBudget,
}

/// The instance the `extern "C"` relays use.
pub static RELAYS: Relays = Relays::new();

impl Relays {
    pub const fn new() -> Self {
        Self {
            bake_original: AtomicUsize::new(0),
            text_original: AtomicUsize::new(0),
            glyphs: GlyphCache::new(),
            stats: Stats::new(),
            bake_samples: SampleBudget::new(0),
            text_samples: SampleBudget::new(0),
        }
    }

    /// Set the address the bake relay calls through.
    pub fn publish_bake(&self, original: usize) {
        self.bake_original.store(original, Ordering::Release);
    }

    /// Set the address the text relay calls through (a trampoline).
    pub fn publish_text(&self, original: usize) {
        self.text_original.store(original, Ordering::Release);
    }

    pub fn set_sample_budget(&self, samples: u32) {
        self.bake_samples.reset(samples);
        self.text_samples.reset(samples);
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn glyphs(&self) -> &GlyphCache {
        &self.glyphs
    }

    /// The expanded table to bake instead of `chars`, when the request is the
    /// renderer's 256-entry base table.
    ///
    /// # Safety
    /// A non-null `chars` must point to at least `count` readable entries.
    pub unsafe fn expanded_bake(&self, chars: *const u32, count: c_int) -> Option<&GlyphTable> {
        Stats::bump(&self.stats.bake_calls);
        if chars.is_null() || count != BASE_GLYPHS as c_int {
            if self.bake_samples.take() {
                log::debug!("bake: pass-through, count={}", count);
            }
            return None;
        }
        let first_build = !self.glyphs.is_built();
        let base = slice::from_raw_parts(chars, BASE_GLYPHS);
        match self.glyphs.get_or_build(base) {
            Ok(table) => {
                Stats::bump(&self.stats.bake_expanded);
                if first_build {
                    log::info!(
                        "bake: expanded {} -> {} glyphs, [256]=U+{:04X} [2605]=U+{:04X}",
                        BASE_GLYPHS,
                        table.len(),
                        table.get(256).unwrap_or(0),
                        table.get(table.len() - 1).unwrap_or(0)
                    );
                } else if self.bake_samples.take() {
                    log::debug!("bake: expanded request");
                }
                Some(table)
            }
            Err(e) => {
                log::warn!("bake: expansion failed, baking base table: {}", e);
                None
            }
        }
    }

    /// Call `draw` with the converted text, or with the original text when
    /// there is nothing to convert.
    ///
    /// `draw` runs while this thread's scratch buffer is borrowed; a draw that
    /// re-enters finds it taken and passes its own text through unconverted.
    ///
    /// # Safety
    /// A non-null `text` must point to at least `len` readable bytes.
    pub unsafe fn filter_text<R>(
        &self,
        text: *const c_char,
        len: c_int,
        mut draw: impl FnMut(*const c_char, c_int) -> R,
    ) -> R {
        Stats::bump(&self.stats.text_calls);
        if text.is_null() || len <= 0 {
            return draw(text, len);
        }
        let src = slice::from_raw_parts(text.cast::<u8>(), len as usize);

        let converted = SCRATCH.try_with(|cell| {
            let Ok(mut buf) = cell.try_borrow_mut() else {
                Stats::bump(&self.stats.reentrant);
                return None;
            };
            let (detection, out) = buf.convert(src);
            self.stats.record(detection);
            if detection != Detection::NoConversionNeeded(PassThrough::Ascii) && self.text_samples.take() {
                log::debug!(
                    "text: {:?} [{}] -> {}",
                    detection,
                    diag::hex_preview(src, 24),
                    out.map_or_else(|| "unchanged".to_string(), |o| diag::hex_preview(o, 24))
                );
            }
            out.map(|out| draw(out.as_ptr().cast(), out.len() as c_int))
        });

        match converted {
            Ok(Some(r)) => r,
            _ => draw(text, len),
        }
    }
}

impl Default for Relays {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================
// Glyph bake
// ============================================================

/// `AurGetTTFTexture`: bakes `count` code points from `chars` into a font texture.
#[cfg(not(target_os = "macos"))]
pub type BakeFn = unsafe extern "C" fn(
    ttf_path: *const c_char,
    pixel_height: f32,
    chars: *mut u32,
    count: c_int,
    p5: f32,
    p6: f32,
    p7: f32,
    out: *mut c_void,
);

#[cfg(target_os = "macos")]
pub type BakeFn = unsafe extern "C" fn(
    ttf: *mut c_void,
    chars: *mut u32,
    count: c_int,
    out: *mut c_void,
    scale: f32,
    p1: f32,
    p2: f32,
    p3: f32,
) -> *mut c_void;

fn bake_original() -> Option<BakeFn> {
    match RELAYS.bake_original.load(Ordering::Acquire) {
        0 => None,
        addr => Some(unsafe { std::mem::transmute::<usize, BakeFn>(addr) }),
    }
}

/// Swap in the expanded table for a base-table request; anything else is unchanged.
unsafe fn bake_arguments(chars: *mut u32, count: c_int) -> (*mut u32, c_int) {
    panic::catch_unwind(AssertUnwindSafe(|| match RELAYS.expanded_bake(chars, count) {
        Some(table) => (table.as_ptr() as *mut u32, table.len() as c_int),
        None => (chars, count),
    }))
    .unwrap_or((chars, count))
}

#[cfg(not(target_os = "macos"))]
pub unsafe extern "C" fn bake_relay(
    ttf_path: *const c_char,
    pixel_height: f32,
    chars: *mut u32,
    count: c_int,
    p5: f32,
    p6: f32,
    p7: f32,
    out: *mut c_void,
) {
    let Some(original) = bake_original() else { return };
    let (chars, count) = bake_arguments(chars, count);
    original(ttf_path, pixel_height, chars, count, p5, p6, p7, out)
}

#[cfg(target_os = "macos")]
pub unsafe extern "C" fn bake_relay(
    ttf: *mut c_void,
    chars: *mut u32,
    count: c_int,
    out: *mut c_void,
    scale: f32,
    p1: f32,
    p2: f32,
    p3: f32,
) -> *mut c_void {
    let Some(original) = bake_original() else { return std::ptr::null_mut() };
    let (chars, count) = bake_arguments(chars, count);
    original(ttf, chars, count, out, scale, p1, p2, p3)
}

// ============================================================
// UI text draw
// ============================================================

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NkRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// `nk_draw_list_add_text`.
pub type DrawTextFn = unsafe extern "C" fn(
    list: *mut c_void,
    font: *const c_void,
    rect: NkRect,
    text: *const c_char,
    len: c_int,
    font_height: f32,
    fg: NkColor,
);

fn text_original() -> Option<DrawTextFn> {
    match RELAYS.text_original.load(Ordering::Acquire) {
        0 => None,
        addr => Some(unsafe { std::mem::transmute::<usize, DrawTextFn>(addr) }),
    }
}

pub unsafe extern "C" fn draw_text_relay(
    list: *mut c_void,
    font: *const c_void,
    rect: NkRect,
    text: *const c_char,
    len: c_int,
    font_height: f32,
    fg: NkColor,
) {
    let Some(original) = text_original() else { return };
    let drawn = panic::catch_unwind(AssertUnwindSafe(|| {
        RELAYS.filter_text(text, len, |t, l| original(list, font, rect, t, l, font_height, fg))
    }));
    // Conversion panics before the draw, so the original has not run yet.
    if drawn.is_err() {
        original(list, font, rect, text, len, font_height, fg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn draw_collect(relays: &Relays, text: &[u8]) -> Vec<u8> {
        unsafe {
            relays.filter_text(text.as_ptr().cast(), text.len() as c_int, |t, l| {
                slice::from_raw_parts(t.cast::<u8>(), l as usize).to_vec()
            })
        }
    }

    #[test]
    fn filter_converts_legacy_text() {
        let relays = Relays::new();
        assert_eq!(draw_collect(&relays, &[0xC1, 0xA6, b'!']), vec![0xEC, 0xA0, 0x9C, b'!']);
        assert_eq!(draw_collect(&relays, b"plain"), b"plain".to_vec());
        let s = relays.stats().snapshot();
        assert_eq!((s.text_calls, s.legacy), (2, 1));
    }

    #[test]
    fn filter_passes_through_unhandled_and_empty() {
        let relays = Relays::new();
        assert_eq!(draw_collect(&relays, &[0x80, 0x81]), vec![0x80, 0x81]);
        let got = unsafe { relays.filter_text(std::ptr::null(), 0, |t, l| (t.is_null(), l)) };
        assert_eq!(got, (true, 0));
        assert_eq!(relays.stats().snapshot().unrecognized, 1);
    }

    #[test]
    fn reentrant_draw_passes_through() {
        let relays = Relays::new();
        let outer = [0xB0u8, 0xA1];
        let inner = [0xB0u8, 0xA2];
        let nested = RefCell::new(Vec::new());
        let got = unsafe {
            relays.filter_text(outer.as_ptr().cast(), 2, |t, l| {
                let inner_out = draw_collect(&relays, &inner);
                nested.borrow_mut().extend(inner_out);
                slice::from_raw_parts(t.cast::<u8>(), l as usize).to_vec()
            })
        };
        assert_eq!(got, "가".as_bytes());
        assert_eq!(nested.into_inner(), inner.to_vec());
        assert_eq!(relays.stats().snapshot().reentrant, 1);
    }

    #[test]
    fn bake_expands_only_base_requests() {
        let relays = Relays::new();
        let base: Vec<u32> = (0..256).collect();
        let table = unsafe { relays.expanded_bake(base.as_ptr(), 256) }.unwrap();
        assert_eq!(table.len(), 2606);
        assert_eq!(table.get(255), Some(255));
        assert_eq!(table.get(256), Some(0xAC00));

        assert!(unsafe { relays.expanded_bake(base.as_ptr(), 128) }.is_none());
        assert!(unsafe { relays.expanded_bake(std::ptr::null(), 256) }.is_none());
        let s = relays.stats().snapshot();
        assert_eq!((s.bake_calls, s.bake_expanded), (3, 1));
    }

    thread_local! {
        static DRAWN: RefCell<Vec<u8>> = RefCell::new(Vec::new());
    }

    unsafe extern "C" fn fake_draw(
        _list: *mut c_void,
        _font: *const c_void,
        rect: NkRect,
        text: *const c_char,
        len: c_int,
        _font_height: f32,
        fg: NkColor,
    ) {
        assert_eq!(rect.w, 64.0);
        assert_eq!(fg.a, 0xFF);
        let bytes = slice::from_raw_parts(text.cast::<u8>(), len as usize).to_vec();
        DRAWN.with(|d| *d.borrow_mut() = bytes);
    }

    #[test]
    fn draw_relay_calls_original_with_converted_text() {
        RELAYS.publish_text(fake_draw as usize);
        let rect = NkRect { x: 0.0, y: 0.0, w: 64.0, h: 16.0 };
        let fg = NkColor { r: 1, g: 2, b: 3, a: 0xFF };
        let text = [0xBD, 0xC3, b' ', b'o', b'k'];
        unsafe {
            draw_text_relay(std::ptr::null_mut(), std::ptr::null(), rect, text.as_ptr().cast(), 5, 12.0, fg);
        }
        DRAWN.with(|d| assert_eq!(d.borrow().as_slice(), "시 ok".as_bytes()));

        unsafe {
            draw_text_relay(std::ptr::null_mut(), std::ptr::null(), rect, b"abc".as_ptr().cast(), 3, 12.0, fg);
        }
        DRAWN.with(|d| assert_eq!(d.borrow().as_slice(), b"abc"));
    }

    #[cfg(not(target_os = "macos"))]
    mod bake {
        use super::*;

        thread_local! {
            static BAKED: RefCell<(usize, u32)> = RefCell::new((0, 0));
        }

        unsafe extern "C" fn fake_bake(
            _ttf: *const c_char,
            _h: f32,
            chars: *mut u32,
            count: c_int,
            _p5: f32,
            _p6: f32,
            _p7: f32,
            _out: *mut c_void,
        ) {
            let last = *chars.add(count as usize - 1);
            BAKED.with(|b| *b.borrow_mut() = (count as usize, last));
        }

        #[test]
        fn bake_relay_hands_expanded_table_to_original() {
            RELAYS.publish_bake(fake_bake as usize);
            let base: Vec<u32> = (0..256).collect();
            let mut chars = base.clone();
            unsafe {
                bake_relay(std::ptr::null(), 16.0, chars.as_mut_ptr(), 256, 0.0, 0.0, 0.0, std::ptr::null_mut());
            }
            BAKED.with(|b| assert_eq!(*b.borrow(), (2606, '힝' as u32)));

            unsafe {
                bake_relay(std::ptr::null(), 16.0, chars.as_mut_ptr(), 10, 0.0, 0.0, 0.0, std::ptr::null_mut());
            }
            BAKED.with(|b| assert_eq!(*b.borrow(), (10, 9)));
        }
    }
}
