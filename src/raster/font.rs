//! 5x7 bitmap font.
//!
//! Each glyph is 7 rows, top to bottom. Within a row the five low bits are
//! the columns, bit 4 being the leftmost.

pub const GLYPH_WIDTH: i64 = 5;
pub const GLYPH_HEIGHT: i64 = 7;

pub type Glyph = [u8; GLYPH_HEIGHT as usize];

/// Look up the glyph for `ch`. Characters outside the table have none.
pub fn glyph(ch: char) -> Option<&'static Glyph> {
    let glyph = match ch {
        'A' => &A,
        'B' => &B,
        'C' => &C,
        'D' => &D,
        'E' => &E,
        'F' => &F,
        'G' => &G,
        'H' => &H,
        'I' => &I,
        'J' => &J,
        'K' => &K,
        'L' => &L,
        'M' => &M,
        'N' => &N,
        'O' => &O,
        'P' => &P,
        'Q' => &Q,
        'R' => &R,
        'S' => &S,
        'T' => &T,
        'U' => &U,
        'V' => &V,
        'W' => &W,
        'X' => &X,
        'Y' => &Y,
        'Z' => &Z,
        '0' => &D0,
        '1' => &D1,
        '2' => &D2,
        '3' => &D3,
        '4' => &D4,
        '5' => &D5,
        '6' => &D6,
        '7' => &D7,
        '8' => &D8,
        '9' => &D9,
        _ => return None,
    };
    Some(glyph)
}

/// Whether the cell at column `gx`, row `gy` is lit.
pub fn is_set(glyph: &Glyph, gx: usize, gy: usize) -> bool {
    glyph[gy] & (0b10000 >> gx) != 0
}

// --- Letters ---

const A: Glyph = [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001];
const B: Glyph = [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110];
const C: Glyph = [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110];
const D: Glyph = [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100];
const E: Glyph = [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111];
const F: Glyph = [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b10000];
const G: Glyph = [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111];
const H: Glyph = [0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001, 0b10001];
const I: Glyph = [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110];
const J: Glyph = [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100];
const K: Glyph = [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001];
const L: Glyph = [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111];
const M: Glyph = [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001];
const N: Glyph = [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001];
const O: Glyph = [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110];
const P: Glyph = [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000];
const Q: Glyph = [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101];
const R: Glyph = [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001];
const S: Glyph = [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110];
const T: Glyph = [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100];
const U: Glyph = [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110];
const V: Glyph = [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100];
const W: Glyph = [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010];
const X: Glyph = [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001];
const Y: Glyph = [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100];
const Z: Glyph = [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111];

// --- Digits ---

const D0: Glyph = [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110];
const D1: Glyph = [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110];
const D2: Glyph = [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111];
const D3: Glyph = [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110];
const D4: Glyph = [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010];
const D5: Glyph = [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110];
const D6: Glyph = [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110];
const D7: Glyph = [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000];
const D8: Glyph = [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110];
const D9: Glyph = [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100];
