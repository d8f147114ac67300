/*
 * Filename: /src/bus.rs
 * Project: ks10mon
 * Created Date: 2021-09-02, 10:20:48
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

use crate::utils::{Addr, Word};

pub mod sim_bus;

/// printer on-line bit in the LP console control register.
pub const LP_ONLINE: u64 = 1 << 8;

/// console communications area (low memory words shared with the target's monitor).
pub const SWITCH_ADDR: Addr = 0o000030;
pub const KASW_ADDR: Addr = 0o000031;
pub const CTYIN_ADDR: Addr = 0o000032;
pub const CTYOUT_ADDR: Addr = 0o000033;
pub const KLNIN_ADDR: Addr = 0o000034;
pub const KLNOUT_ADDR: Addr = 0o000035;
pub const RHBASE_ADDR: Addr = 0o000036;
pub const RHUNIT_ADDR: Addr = 0o000037;
pub const MTPARM_ADDR: Addr = 0o000040;

/**
 * the console-side registers exposed by the backplane interface.
 */
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Register {
    /// console instruction register, executed on start/continue.
    Cir,
    /// program counter (bits 36-53) and instruction register (bits 0-35), read only.
    Pcir,
    /// breakpoint address register for unit 0..3.
    Brar(usize),
    /// breakpoint mask register for unit 0..3.
    Brmr(usize),
    /// printer console control register.
    Lpccr,
}

/**
 * a Bus is the monitor's view of the target backplane: memory, i/o, console registers and
 * the run/halt machinery.
 *
 * every memory or i/o access latches the nxm/nxd flag, which must be checked with nxm_nxd() after the access.
 */
pub trait Bus {
    /**
     * reads a word from target memory.
     */
    fn read_mem(&mut self, addr: Addr) -> Word;

    /**
     * writes a word to target memory.
     */
    fn write_mem(&mut self, addr: Addr, data: Word);

    /**
     * reads a word from target i/o space.
     */
    fn read_io(&mut self, addr: Addr) -> Word;

    /**
     * writes a word to target i/o space.
     */
    fn write_io(&mut self, addr: Addr, data: Word);

    /**
     * true if the last memory/io access hit non existent memory or a non existent device.
     */
    fn nxm_nxd(&mut self) -> bool;

    /**
     * reads a console register.
     */
    fn read_reg(&mut self, reg: Register) -> u64;

    /**
     * writes a console register.
     */
    fn write_reg(&mut self, reg: Register, value: u64);

    /**
     * sets (true) or clears (false) the run flag, clearing it halts the cpu.
     */
    fn run(&mut self, enable: bool);

    /**
     * true if the cpu is halted.
     */
    fn halted(&mut self) -> bool;

    /**
     * starts the cpu executing the instruction in the CIR.
     */
    fn start_run(&mut self);

    /**
     * executes a single instruction.
     */
    fn start_step(&mut self);

    /**
     * continues from where the cpu halted.
     */
    fn start_cont(&mut self);

    /**
     * cache enable, None just queries. returns the current state.
     */
    fn cache_enable(&mut self, enable: Option<bool>) -> bool;

    /**
     * trap enable, None just queries. returns the current state.
     */
    fn trap_enable(&mut self, enable: Option<bool>) -> bool;

    /**
     * timer enable, None just queries. returns the current state.
     */
    fn timer_enable(&mut self, enable: Option<bool>) -> bool;

    /**
     * next character printed by the target on its console, if any.
     */
    fn get_char(&mut self) -> Option<u8>;

    /**
     * types a character on the target console.
     */
    fn put_char(&mut self, ch: u8);
}

/**
 * creates a new default (simulated) bus with the given memory size, in words.
 */
pub fn new_default(mem_words: usize) -> Box<dyn Bus> {
    Box::new(sim_bus::SimBus::new(mem_words))
}
