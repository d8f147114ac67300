/*
 * Filename: /src/utils.rs
 * Project: ks10mon
 * Created Date: 2021-09-02, 10:12:41
 * Author: valerino <xoanino@gmail.com>
 * Copyright (c) 2021 valerino
 *
 * MIT License
 *
 * Copyright (c) 2021 valerino
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of
 * this software and associated documentation files (the "Software"), to deal in
 * the Software without restriction, including without limitation the rights to
 * use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies
 * of the Software, and to permit persons to whom the Software is furnished to do
 * so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::monitor::monitor_error::{self, MonitorError};

/**
 * a 36 bit word, carried in the low bits of a u64.
 */
pub type Word = u64;

/**
 * a backplane address (memory or i/o).
 */
pub type Addr = u64;

/// all 36 bits of a word.
pub const WORD_MASK: Word = 0o777777777777;

/// one half (18 bits) of a word.
pub const HALF_MASK: Word = 0o777777;

/// JRST opcode, as found in the left half of a word (opcode + ac field).
pub const OP_JRST: Word = 0o254000;

/**
 * left half (bits 0-17) of a word.
 */
pub fn lh(w: Word) -> Word {
    (w >> 18) & HALF_MASK
}

/**
 * right half (bits 18-35) of a word.
 */
pub fn rh(w: Word) -> Word {
    w & HALF_MASK
}

/**
 * builds a word from its halves.
 */
pub fn make_word(l: Word, r: Word) -> Word {
    ((l & HALF_MASK) << 18) | (r & HALF_MASK)
}

/**
 * parse an octal number, at most 12 digits (36 bits).
 *
 * a leading '0' is allowed and just part of the number.
 */
pub fn parse_octal(s: &str) -> Result<Word, MonitorError> {
    if s.is_empty() || s.len() > 12 || !s.chars().all(|c| ('0'..='7').contains(&c)) {
        return Err(monitor_error::new_invalid_argument(&format!(
            "invalid octal number \"{}\"",
            s
        )));
    }
    match u64::from_str_radix(s, 8) {
        Err(_) => Err(monitor_error::new_invalid_argument(&format!(
            "invalid octal number \"{}\"",
            s
        ))),
        Ok(n) => Ok(n & WORD_MASK),
    }
}
