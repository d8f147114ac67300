/*
 * Filename: /src/bus/sim_bus.rs
 * Project: ks10mon
 * Created Date: 2021-09-02, 11:05:30
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

use crate::bus::{Bus, Register};
use crate::utils::{self, Addr, Word, HALF_MASK, OP_JRST, WORD_MASK};
use log::*;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/**
 * state behind a SimBus handle.
 */
struct SimState {
    mem: Vec<Word>,
    io: HashMap<Addr, Word>,
    devices: HashSet<Addr>,
    nxm: bool,
    cir: Word,
    pc: Word,
    brar: [u64; 4],
    brmr: [u64; 4],
    lpccr: u64,
    halted: bool,
    cache: bool,
    trap: bool,
    timer: bool,
    cty_out: VecDeque<u8>,
    cty_in: Vec<u8>,
    halt_after: Option<usize>,
}

/**
 * a software backplane: flat memory, a set of i/o addresses with a device behind them, the console
 * registers and a trivial run/halt model (the cpu never executes anything on its own).
 *
 * the handle is cheaply clonable, clones share the same state so a caller can keep one to inspect
 * the bus after handing another to the monitor.
 */
#[derive(Clone)]
pub struct SimBus {
    state: Rc<RefCell<SimState>>,
}

impl SimBus {
    /**
     * creates a new simulated bus with the given memory size, in words. the cpu starts halted.
     */
    pub fn new(mem_words: usize) -> SimBus {
        SimBus {
            state: Rc::new(RefCell::new(SimState {
                mem: vec![0; mem_words],
                io: HashMap::new(),
                devices: HashSet::new(),
                nxm: false,
                cir: 0,
                pc: 0,
                brar: [0; 4],
                brmr: [0; 4],
                lpccr: 0,
                halted: true,
                cache: false,
                trap: false,
                timer: false,
                cty_out: VecDeque::new(),
                cty_in: Vec::new(),
                halt_after: None,
            })),
        }
    }

    /**
     * puts a device at the given i/o address, so accesses there no longer report nxd.
     */
    pub fn attach_io(&self, addr: Addr) {
        self.state.borrow_mut().devices.insert(addr);
    }

    /**
     * queues characters as if the target had printed them on its console.
     */
    pub fn push_cty_output(&self, bytes: &[u8]) {
        self.state.borrow_mut().cty_out.extend(bytes.iter());
    }

    /**
     * everything typed to the target console so far.
     */
    pub fn cty_input(&self) -> Vec<u8> {
        self.state.borrow().cty_in.clone()
    }

    /**
     * makes the cpu halt by itself after being polled n more times while running.
     */
    pub fn halt_after(&self, n: usize) {
        self.state.borrow_mut().halt_after = Some(n);
    }

    /**
     * sets the program counter.
     */
    pub fn set_pc(&self, pc: Word) {
        self.state.borrow_mut().pc = pc & HALF_MASK;
    }

    /**
     * reads memory without touching the nxm flag, None if out of range.
     */
    pub fn peek_mem(&self, addr: Addr) -> Option<Word> {
        self.state.borrow().mem.get(addr as usize).copied()
    }
}

impl Bus for SimBus {
    fn read_mem(&mut self, addr: Addr) -> Word {
        let mut s = self.state.borrow_mut();
        match s.mem.get(addr as usize).copied() {
            Some(w) => {
                s.nxm = false;
                w
            }
            None => {
                debug!("nxm reading {:08o}", addr);
                s.nxm = true;
                0
            }
        }
    }

    fn write_mem(&mut self, addr: Addr, data: Word) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        match s.mem.get_mut(addr as usize) {
            Some(w) => {
                *w = data & WORD_MASK;
                s.nxm = false;
            }
            None => {
                debug!("nxm writing {:08o}", addr);
                s.nxm = true;
            }
        }
    }

    fn read_io(&mut self, addr: Addr) -> Word {
        let mut s = self.state.borrow_mut();
        if !s.devices.contains(&addr) {
            debug!("nxd reading {:08o}", addr);
            s.nxm = true;
            return 0;
        }
        s.nxm = false;
        s.io.get(&addr).copied().unwrap_or_default()
    }

    fn write_io(&mut self, addr: Addr, data: Word) {
        let mut s = self.state.borrow_mut();
        if !s.devices.contains(&addr) {
            debug!("nxd writing {:08o}", addr);
            s.nxm = true;
            return;
        }
        s.nxm = false;
        s.io.insert(addr, data & WORD_MASK);
    }

    fn nxm_nxd(&mut self) -> bool {
        self.state.borrow().nxm
    }

    fn read_reg(&mut self, reg: Register) -> u64 {
        let s = self.state.borrow();
        match reg {
            Register::Cir => s.cir,
            Register::Pcir => {
                let ir = s.mem.get(s.pc as usize).copied().unwrap_or_default();
                (s.pc << 36) | ir
            }
            Register::Brar(n) => s.brar.get(n).copied().unwrap_or_default(),
            Register::Brmr(n) => s.brmr.get(n).copied().unwrap_or_default(),
            Register::Lpccr => s.lpccr,
        }
    }

    fn write_reg(&mut self, reg: Register, value: u64) {
        let mut s = self.state.borrow_mut();
        match reg {
            Register::Cir => s.cir = value & WORD_MASK,
            Register::Pcir => warn!("PCIR is read only"),
            Register::Brar(n) => {
                if let Some(r) = s.brar.get_mut(n) {
                    *r = value;
                }
            }
            Register::Brmr(n) => {
                if let Some(r) = s.brmr.get_mut(n) {
                    *r = value;
                }
            }
            Register::Lpccr => s.lpccr = value,
        }
    }

    fn run(&mut self, enable: bool) {
        let mut s = self.state.borrow_mut();
        s.halted = !enable;
    }

    fn halted(&mut self) -> bool {
        let mut s = self.state.borrow_mut();
        if !s.halted {
            if let Some(n) = s.halt_after {
                if n == 0 {
                    s.halted = true;
                    s.halt_after = None;
                } else {
                    s.halt_after = Some(n - 1);
                }
            }
        }
        s.halted
    }

    fn start_run(&mut self) {
        let mut s = self.state.borrow_mut();
        if utils::lh(s.cir) == OP_JRST {
            s.pc = utils::rh(s.cir);
        }
        s.halted = false;
    }

    fn start_step(&mut self) {
        let mut s = self.state.borrow_mut();
        s.pc = (s.pc + 1) & HALF_MASK;
    }

    fn start_cont(&mut self) {
        self.state.borrow_mut().halted = false;
    }

    fn cache_enable(&mut self, enable: Option<bool>) -> bool {
        let mut s = self.state.borrow_mut();
        if let Some(e) = enable {
            s.cache = e;
        }
        s.cache
    }

    fn trap_enable(&mut self, enable: Option<bool>) -> bool {
        let mut s = self.state.borrow_mut();
        if let Some(e) = enable {
            s.trap = e;
        }
        s.trap
    }

    fn timer_enable(&mut self, enable: Option<bool>) -> bool {
        let mut s = self.state.borrow_mut();
        if let Some(e) = enable {
            s.timer = e;
        }
        s.timer
    }

    fn get_char(&mut self) -> Option<u8> {
        self.state.borrow_mut().cty_out.pop_front()
    }

    fn put_char(&mut self, ch: u8) {
        self.state.borrow_mut().cty_in.push(ch);
    }
}
