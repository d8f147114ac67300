/*
 * Filename: /src/monitor/dasm.rs
 * Project: ks10mon
 * Created Date: 2021-09-06, 11:57:20
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

use crate::utils::Word;

/**
 * turns an instruction word into text. the real disassembler lives outside the monitor, it
 * gets plugged in through this trait.
 */
pub trait Disassembler {
    fn dasm(&self, insn: Word) -> String;
}

/**
 * minimal disassembler: splits the instruction into its fields and prints them in octal,
 * `op ac,@y(x)`.
 */
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldDasm;

impl Disassembler for FieldDasm {
    fn dasm(&self, insn: Word) -> String {
        let op = (insn >> 27) & 0o777;
        let ac = (insn >> 23) & 0o17;
        let i = (insn >> 22) & 1;
        let x = (insn >> 18) & 0o17;
        let y = insn & 0o777777;
        format!(
            "{:03o} {:02o},{}{:06o}{}",
            op,
            ac,
            if i != 0 { "@" } else { "" },
            y,
            if x != 0 {
                format!("({:02o})", x)
            } else {
                String::new()
            }
        )
    }
}

/**
 * trace line for a PCIR value: pc (bits 36-53) and the disassembled instruction (bits 0-35).
 */
pub fn format_pcir(d: &dyn Disassembler, pcir: u64) -> String {
    let pc = (pcir >> 36) & 0o777777;
    let ir = pcir & 0o777777777777;
    format!("{:06o}\t{}", pc, d.dasm(ir))
}
