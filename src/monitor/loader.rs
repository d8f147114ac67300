/*
 * Filename: /src/monitor/loader.rs
 * Project: ks10mon
 * Created Date: 2021-09-04, 16:02:44
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

use crate::bus::Register;
use crate::monitor::monitor_error::{self, MonitorError};
use crate::monitor::Context;
use crate::utils::{self, Addr, Word, HALF_MASK, OP_JRST};
use log::*;
use std::fs::File;
use std::io::{self, Read, Write};

/// set in the count half of a record header while the record carries data.
const MORE_BIT: Word = 0o400000;

/**
 * what a successful load found in the image.
 */
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Image {
    /// entry point, if the image ends with a JRST.
    pub entry: Option<Addr>,

    /// data records.
    pub records: usize,

    /// data words written.
    pub words: usize,
}

/**
 * decodes a group of 5 bytes into a 36 bit word.
 *
 * layout (TOPS-10 ANSI-ASCII tape mode, also used by .SAV files):
 *
 * ```text
 * byte 0:   0  B00 B01 B02 B03 B04 B05 B06
 * byte 1:   0  B07 B08 B09 B10 B11 B12 B13
 * byte 2:   0  B14 B15 B16 B17 B18 B19 B20
 * byte 3:   0  B21 B22 B23 B24 B25 B26 B27
 * byte 4:  B35 B28 B29 B30 B31 B32 B33 B34
 * ```
 *
 * note where B35 lives.
 */
pub fn decode_word(b: &[u8; 5]) -> Word {
    ((b[0] & 0x7f) as Word) << 29
        | ((b[1] & 0x7f) as Word) << 22
        | ((b[2] & 0x7f) as Word) << 15
        | ((b[3] & 0x7f) as Word) << 8
        | ((b[4] & 0x7f) as Word) << 1
        | ((b[4] & 0x80) as Word) >> 7
}

/**
 * inverse of decode_word(), bits above 35 are ignored.
 */
pub fn encode_word(w: Word) -> [u8; 5] {
    [
        ((w >> 29) & 0x7f) as u8,
        ((w >> 22) & 0x7f) as u8,
        ((w >> 15) & 0x7f) as u8,
        ((w >> 8) & 0x7f) as u8,
        (((w >> 1) & 0x7f) as u8) | (((w & 1) as u8) << 7),
    ]
}

/**
 * reads up to 5 bytes, returns how many were read (less than 5 only at end of stream).
 */
fn read_group(source: &mut dyn Read, buf: &mut [u8; 5]) -> io::Result<usize> {
    let mut n = 0;
    while n < buf.len() {
        match source.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(r) => n += r,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(n)
}

impl Context {
    /**
     * reads the next word of the image.
     *
     * a short group is reported; unless strict image loading is configured the word reads as zero
     * and loading goes on.
     */
    fn get_data(&mut self, source: &mut dyn Read) -> Result<Word, MonitorError> {
        let mut buf = [0u8; 5];
        let n = match read_group(source, &mut buf) {
            Ok(n) => n,
            Err(e) => {
                warn!("image read error: {}", e);
                0
            }
        };
        if n != buf.len() {
            writeln!(self.out, "KS10: getdata - read() failed.")?;
            warn!("short read in boot image ({} of 5 bytes)", n);
            if self.config.strict_image_load {
                return Err(monitor_error::new_image_load_error("truncated boot image"));
            }
            return Ok(0);
        }
        Ok(decode_word(&buf))
    }

    /**
     * get_data(), with a strict mode failure reported and turned into None.
     */
    fn next_word(&mut self, source: &mut dyn Read) -> Result<Option<Word>, MonitorError> {
        match self.get_data(source) {
            Ok(w) => Ok(Some(w)),
            Err(e) if e.t == monitor_error::ErrorType::ImageLoad => {
                writeln!(self.out, "KS10: {}", e)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /**
     * loads a boot image from an open stream into target memory.
     *
     * the image is a sequence of records, each a header (-count,,address-1) followed by count words.
     * a header with the count sign bit clear ends the image; if it holds a JRST the right half is
     * the entry point and the JRST is put in the CIR, so a following continue starts the program.
     *
     * returns None only on a strict mode failure, word level problems are reported and skipped.
     * the checkpoint is polled between words.
     */
    pub fn load_image(&mut self, source: &mut dyn Read) -> Result<Option<Image>, MonitorError> {
        let mut img = Image::default();
        loop {
            self.checkpoint.poll()?;
            let data36 = match self.next_word(source)? {
                Some(w) => w,
                None => return Ok(None),
            };
            let mut words = utils::lh(data36);
            let mut addr = utils::rh(data36);

            // end of image ?
            if (words & MORE_BIT) == 0 {
                if words == OP_JRST {
                    writeln!(
                        self.out,
                        "KS10: Starting Address: {:06o},,{:06o}",
                        utils::lh(data36),
                        utils::rh(data36)
                    )?;
                    self.bus.write_reg(Register::Cir, data36);
                    img.entry = Some(addr);
                }
                info!("image loaded, {} records, {} words", img.records, img.words);
                return Ok(Some(img));
            }

            // record
            debug!("record at {:06o}, count {:06o}", addr, words);
            img.records += 1;
            while (words & MORE_BIT) != 0 {
                self.checkpoint.poll()?;
                let data36 = match self.next_word(source)? {
                    Some(w) => w,
                    None => return Ok(None),
                };
                addr = (addr + 1) & HALF_MASK;
                self.bus.write_mem(addr, data36);
                if self.bus.nxm_nxd() {
                    writeln!(self.out, "KS10: write to {:06o} failed. (NXM)", addr)?;
                }
                words = (words + 1) & HALF_MASK;
                img.words += 1;
            }
        }
    }

    /**
     * opens the file at path and loads it with load_image(), None if it can't be opened.
     */
    pub fn load_file(&mut self, path: &str) -> Result<Option<Image>, MonitorError> {
        let mut f = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                writeln!(self.out, "KS10: fopen({}) failed.", path)?;
                debug!("{}: {}", path, e);
                return Ok(None);
            }
        };
        info!("loading {}", path);
        self.load_image(&mut f)
    }
}
