use ks10mon::bus::sim_bus::SimBus;
use ks10mon::bus::{Bus, Register, LP_ONLINE};
use ks10mon::monitor::breakpoints::{BreakCondition, BreakUnit};
use ks10mon::monitor::checkpoint::Checkpoint;
use ks10mon::monitor::console::{Terminal, CNTL_E, CNTL_L, CNTL_T, ESC};
use ks10mon::monitor::loader::{decode_word, encode_word};
use ks10mon::monitor::monitor_error::{MonitorError, MonitorErrorType};
use ks10mon::monitor::{CommandHandler, Context, Monitor, MonitorConfig};
use ks10mon::utils::{make_word, Word, OP_JRST};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Cursor, Write};
use std::rc::Rc;
use std::time::Duration;

/**
 * output sink shared between the monitor and the test.
 */
#[derive(Clone, Default)]
struct SharedBuf {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).to_string()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, b: &[u8]) -> io::Result<usize> {
        self.buf.borrow_mut().extend_from_slice(b);
        Ok(b.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct TermState {
    keys: VecDeque<Option<u8>>,
    signal_keys: bool,
    history: Vec<bool>,
    idle: usize,
}

/**
 * a terminal replaying a script of keys (None = no key this poll). once the script is over it
 * detaches after a while, so a broken test can't spin forever.
 */
#[derive(Clone)]
struct ScriptedTerminal {
    state: Rc<RefCell<TermState>>,
}

impl ScriptedTerminal {
    fn new(keys: &[Option<u8>]) -> ScriptedTerminal {
        ScriptedTerminal {
            state: Rc::new(RefCell::new(TermState {
                keys: keys.iter().copied().collect(),
                signal_keys: true,
                history: Vec::new(),
                idle: 0,
            })),
        }
    }

    fn push_keys(&self, keys: &[Option<u8>]) {
        self.state.borrow_mut().keys.extend(keys.iter());
    }
}

impl Terminal for ScriptedTerminal {
    fn signal_keys(&self) -> bool {
        self.state.borrow().signal_keys
    }

    fn set_signal_keys(&mut self, enabled: bool) -> io::Result<()> {
        let mut s = self.state.borrow_mut();
        s.signal_keys = enabled;
        s.history.push(enabled);
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
        let mut s = self.state.borrow_mut();
        match s.keys.pop_front() {
            Some(k) => Ok(k),
            None => {
                s.idle += 1;
                if s.idle > 10000 {
                    Ok(Some(CNTL_E))
                } else {
                    Ok(None)
                }
            }
        }
    }
}

/**
 * a monitor on a simulated bus, plus handles to look at the bus, the output and the terminal.
 */
fn new_monitor(
    mem_words: usize,
    keys: &[Option<u8>],
) -> (Monitor, SimBus, SharedBuf, ScriptedTerminal) {
    new_monitor_with_config(mem_words, keys, MonitorConfig::default())
}

fn new_monitor_with_config(
    mem_words: usize,
    keys: &[Option<u8>],
    config: MonitorConfig,
) -> (Monitor, SimBus, SharedBuf, ScriptedTerminal) {
    let bus = SimBus::new(mem_words);
    let out = SharedBuf::default();
    let term = ScriptedTerminal::new(keys);
    let m = Monitor::new(
        Box::new(bus.clone()),
        Box::new(term.clone()),
        Box::new(out.clone()),
        config,
    );
    (m, bus, out, term)
}

/**
 * turns words into a boot image.
 */
fn image(words: &[Word]) -> Vec<u8> {
    words.iter().flat_map(|w| encode_word(*w).to_vec()).collect()
}

/**
 * records the number of arguments it gets.
 */
struct Recorder {
    seen: Rc<RefCell<Vec<Vec<String>>>>,
}

impl CommandHandler for Recorder {
    fn invoke(&mut self, _ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
        self.seen
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());
        Ok(true)
    }
}

/**
 * gets interrupted while running, optionally reaching a safe point afterwards.
 */
struct Interrupted {
    poll: bool,
}

impl CommandHandler for Interrupted {
    fn invoke(&mut self, ctx: &mut Context, _args: &[&str]) -> Result<bool, MonitorError> {
        ctx.checkpoint.interrupt();
        if self.poll {
            ctx.poll_cancel()?;
        }
        writeln!(ctx.out, "finished")?;
        Ok(false)
    }
}

#[test]
fn test_unknown_command_does_not_stop_the_line() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.execute("BADCMD;HA"));
    let s = out.text();
    assert!(s.contains("BADCMD: Command not found."));
    assert!(s.contains("ha: already halted"));
}

#[test]
fn test_blank_segments() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.execute(""));
    assert!(m.execute(" ;;  ; "));
    assert!(out.text().is_empty());
}

#[test]
fn test_commands_are_case_insensitive() {
    let (mut m, mut bus, out, _term) = new_monitor(0o1000, &[]);
    bus.write_mem(0o100, 0o123456);
    assert!(m.execute("rd 100;Rd 100"));
    assert_eq!(out.text().matches("00000100: 000000123456").count(), 2);

    // only the first two characters count
    assert!(m.execute("rdx 100"));
    assert_eq!(out.text().matches("00000100: 000000123456").count(), 3);
}

#[test]
fn test_help() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.execute("?"));
    assert!(out.text().contains("monitor supported commands"));
    let first = out.text();
    assert!(m.execute("HE"));
    assert_eq!(out.text(), format!("{}{}", first, first));
}

#[test]
fn test_external_commands_and_max_args() {
    let (mut m, _bus, _out, _term) = new_monitor(0o1000, &[]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    m.register("xx", Box::new(Recorder { seen: seen.clone() }))
        .unwrap();

    // extra tokens are dropped
    let line: Vec<String> = (0..20).map(|i| format!("a{}", i)).collect();
    assert!(m.execute(&format!("xxyz {}", line.join(" "))));
    assert!(m.execute("XX   one  two"));
    let seen = seen.borrow();
    assert_eq!(seen[0].len(), 16);
    assert_eq!(seen[0][0], "xxyz");
    assert_eq!(seen[1], vec!["XX", "one", "two"]);
}

#[test]
fn test_register_duplicate() {
    let (mut m, _bus, _out, _term) = new_monitor(0o1000, &[]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let e = m
        .register("rd", Box::new(Recorder { seen: seen.clone() }))
        .unwrap_err();
    assert_eq!(e.t, MonitorErrorType::DuplicateCommand);

    // codes are one or two characters
    let e = m
        .register("abc", Box::new(Recorder { seen: seen.clone() }))
        .unwrap_err();
    assert_eq!(e.t, MonitorErrorType::InvalidArgument);
    let e = m.register("", Box::new(Recorder { seen })).unwrap_err();
    assert_eq!(e.t, MonitorErrorType::InvalidArgument);
}

#[test]
fn test_interrupt_while_disarmed_is_ignored() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    let cp = m.checkpoint();
    cp.interrupt();
    assert!(!cp.is_tripped());
    assert!(m.execute("RD 0"));
    assert!(out.text().contains("00000000: 000000000000"));
    assert!(!out.text().contains("aborted"));
}

#[test]
fn test_interrupt_aborts_only_the_running_command() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    m.register("IN", Box::new(Interrupted { poll: true }))
        .unwrap();
    assert!(m.execute("IN;RD 0"));
    let s = out.text();
    assert!(s.contains("KS10: Command aborted. Caught SIGINT."));
    assert!(!s.contains("finished"));

    // next command ran
    assert!(s.contains("00000000: 000000000000"));
    let cp = m.checkpoint();
    assert!(!cp.is_armed());
    assert!(!cp.is_tripped());
}

#[test]
fn test_interrupt_noticed_after_command() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    m.register("IN", Box::new(Interrupted { poll: false }))
        .unwrap();

    // the command returned false, but an aborted command always gets the prompt back
    assert!(m.execute("IN"));
    let s = out.text();
    assert!(s.contains("finished"));
    assert!(s.contains("KS10: Command aborted. Caught SIGINT."));
    assert!(!m.checkpoint().is_tripped());
}

#[test]
fn test_checkpoint_suspend() {
    let cp = Checkpoint::new();
    cp.arm();
    cp.suspend();
    cp.interrupt();
    assert!(!cp.is_tripped());
    cp.resume();
    assert!(cp.is_armed());
    assert!(cp.poll().is_ok());
    cp.interrupt();
    assert!(cp.poll().unwrap_err().is_cancelled());
    cp.disarm();
    assert!(cp.poll().is_ok());
}

#[test]
fn test_read_write() {
    let (mut m, mut bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.execute("WR 100 123456701234;RD 100"));
    assert!(out.text().contains("00000100: 123456701234"));
    assert_eq!(bus.read_mem(0o100), 0o123456701234);

    // nxm
    assert!(m.execute("RD 2000"));
    assert!(out.text().contains("(NXM)"));

    // bad numbers
    assert!(m.execute("WR 100 9"));
    assert!(out.text().contains("invalid octal number \"9\""));
    assert!(m.execute("RD 100 --bogus"));
    assert!(out.text().contains("unrecognized option: --bogus"));
}

#[test]
fn test_read_write_io() {
    let (mut m, bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.execute("RD 400000 --io"));
    assert!(out.text().contains("(NXD)"));

    bus.attach_io(0o400000);
    assert!(m.execute("WR 400000 17 --io;RD 400000 --io"));
    assert!(out.text().contains("00400000: 000000000017"));
}

#[test]
fn test_enables() {
    let (mut m, mut bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.execute("CE"));
    assert!(out.text().contains("ce: the cache is currently disabled."));
    assert!(m.execute("CE --enable;TP --enable;TE --en"));
    assert!(bus.cache_enable(None));
    assert!(bus.trap_enable(None));
    assert!(bus.timer_enable(None));
    assert!(m.execute("TE --disable;TE"));
    assert!(out.text().contains("te: the timer is currently disabled."));
    assert!(!bus.timer_enable(None));
}

#[test]
fn test_quit() {
    let (mut m, _bus, _out, _term) = new_monitor(0o1000, &[]);
    assert!(!m.quit_requested());
    m.execute("QU");
    assert!(m.quit_requested());
}

#[test]
fn test_halt() {
    let (mut m, mut bus, out, _term) = new_monitor(0o1000, &[]);
    bus.start_cont();
    assert!(!bus.halted());
    assert!(m.execute("HA"));
    assert!(bus.halted());
    assert!(!out.text().contains("failed"));
}

#[test]
fn test_step() {
    let (mut m, mut bus, out, _term) = new_monitor(0o1000, &[]);
    bus.set_pc(0o100);
    bus.write_mem(0o101, make_word(OP_JRST, 0o1234));
    assert!(m.execute("SI"));
    assert!(out.text().contains("000101\t254 00,001234"));
    assert!(m.execute("SI 2"));
    assert!(out.text().contains("000103\t000 00,000000"));
}

#[test]
fn test_recall_config() {
    let (mut m, bus, _out, _term) = new_monitor(0o1000, &[]);
    m.ctx.recall_config().unwrap();
    assert_eq!(bus.peek_mem(0o30), Some(0o400000400000));
    assert_eq!(bus.peek_mem(0o31), Some(0o003740000000));
    assert_eq!(bus.peek_mem(0o36), Some(0o000001776700));
}

#[test]
fn test_word_decode() {
    assert_eq!(decode_word(&[0x7f, 0x7f, 0x7f, 0x7f, 0xff]), 0o777777777777);

    // bit 35 lives in the top bit of the last byte
    assert_eq!(decode_word(&[0, 0, 0, 0, 0x80]), 1);
    assert_eq!(decode_word(&[0, 0, 0, 0, 0x01]), 2);
    assert_eq!(decode_word(&[0x40, 0, 0, 0, 0]), 0o400000000000);

    // the top bit of the first 4 bytes is ignored
    assert_eq!(decode_word(&[0x80, 0x80, 0x80, 0x80, 0]), 0);

    let w = 0o254000001000;
    assert_eq!(decode_word(&encode_word(w)), w);
}

#[test]
fn test_load_image() {
    let (mut m, bus, out, _term) = new_monitor(0o2000, &[]);

    // one word at address 0 (address field wraps), then two words at 1000, then the entry point
    let img = image(&[
        make_word(0o777777, 0o777777),
        0o123,
        make_word(0o777776, 0o777),
        0o1,
        0o2,
        make_word(OP_JRST, 0o1000),
    ]);
    let loaded = m.ctx.load_image(&mut Cursor::new(img)).unwrap().unwrap();
    assert_eq!(loaded.entry, Some(0o1000));
    assert_eq!(loaded.records, 2);
    assert_eq!(loaded.words, 3);
    assert_eq!(bus.peek_mem(0), Some(0o123));
    assert_eq!(bus.peek_mem(0o1000), Some(0o1));
    assert_eq!(bus.peek_mem(0o1001), Some(0o2));
    assert!(out
        .text()
        .contains("KS10: Starting Address: 254000,,001000"));
    let mut b = bus.clone();
    assert_eq!(b.read_reg(Register::Cir), make_word(OP_JRST, 0o1000));
}

#[test]
fn test_load_image_without_entry_point() {
    let (mut m, bus, out, _term) = new_monitor(0o1000, &[]);
    let img = image(&[make_word(0o777777, 0o77), 0o55, 0]);
    let loaded = m.ctx.load_image(&mut Cursor::new(img)).unwrap().unwrap();
    assert_eq!(loaded.entry, None);
    assert_eq!(bus.peek_mem(0o100), Some(0o55));
    assert!(!out.text().contains("Starting Address"));
    let mut b = bus.clone();
    assert_eq!(b.read_reg(Register::Cir), 0);
}

#[test]
fn test_load_truncated_image() {
    let mut img = image(&[make_word(0o777776, 0o77), 0o11]);
    img.extend_from_slice(&[1, 2]);

    // by default the missing word reads as zero
    let (mut m, mut bus, out, _term) = new_monitor(0o1000, &[]);
    bus.write_mem(0o101, 0o777);
    assert!(m.ctx.load_image(&mut Cursor::new(img.clone())).unwrap().is_some());
    assert!(out.text().contains("KS10: getdata - read() failed."));
    assert_eq!(bus.peek_mem(0o100), Some(0o11));
    assert_eq!(bus.peek_mem(0o101), Some(0));

    // strict
    let config = MonitorConfig {
        strict_image_load: true,
        ..MonitorConfig::default()
    };
    let (mut m, mut bus, out, _term) = new_monitor_with_config(0o1000, &[], config);
    bus.write_mem(0o101, 0o777);
    assert!(m.ctx.load_image(&mut Cursor::new(img)).unwrap().is_none());
    assert!(out.text().contains("KS10: getdata - read() failed."));
    assert!(out.text().contains("ImageLoad"));
    assert_eq!(bus.peek_mem(0o101), Some(0o777));
}

#[test]
fn test_load_cancelled() {
    let (mut m, _bus, _out, _term) = new_monitor(0o1000, &[]);
    let img = image(&[make_word(0o777777, 0o77), 0o55, 0]);
    m.ctx.checkpoint.arm();
    m.ctx.checkpoint.interrupt();
    let e = m.ctx.load_image(&mut Cursor::new(img)).unwrap_err();
    assert!(e.is_cancelled());
}

#[test]
fn test_load_missing_file() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.ctx.load_file("/nonexistent/boot.sav").unwrap().is_none());
    assert!(out.text().contains("KS10: fopen(/nonexistent/boot.sav) failed."));
}

#[test]
fn test_go() {
    let path = std::env::temp_dir().join(format!("ks10mon-go-{}.sav", std::process::id()));
    std::fs::write(
        &path,
        image(&[make_word(0o777777, 0o777), 0o42, make_word(OP_JRST, 0o1000)]),
    )
    .unwrap();

    let (mut m, mut bus, out, term) = new_monitor(0o2000, &[Some(CNTL_E)]);
    assert!(m.execute(&format!("GO {}", path.display())));
    assert!(out.text().contains("KS10: Starting Address: 254000,,001000"));
    assert_eq!(bus.peek_mem(0o1000), Some(0o42));
    assert!(!bus.halted());
    assert_eq!(bus.read_reg(Register::Pcir) >> 36, 0o1000);

    // programs run with cache, traps and timer on
    assert!(bus.cache_enable(None));
    assert!(bus.trap_enable(None));
    assert!(bus.timer_enable(None));

    // explicit start address
    bus.run(false);
    term.push_keys(&[Some(CNTL_E)]);
    assert!(m.execute(&format!("GO {} 1001", path.display())));
    assert_eq!(bus.read_reg(Register::Pcir) >> 36, 0o1001);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_go_without_starting_address() {
    let dir = std::env::temp_dir();
    let with_entry = dir.join(format!("ks10mon-entry-{}.sav", std::process::id()));
    let no_entry = dir.join(format!("ks10mon-noentry-{}.sav", std::process::id()));
    std::fs::write(
        &with_entry,
        image(&[make_word(0o777777, 0o777), 0o42, make_word(OP_JRST, 0o1000)]),
    )
    .unwrap();
    std::fs::write(&no_entry, image(&[make_word(0o777777, 0o1777), 0o43, 0])).unwrap();

    // the first program leaves its JRST in the CIR
    let (mut m, mut bus, out, term) = new_monitor(0o4000, &[Some(CNTL_E)]);
    assert!(m.execute(&format!("GO {}", with_entry.display())));
    assert!(!bus.halted());
    bus.run(false);
    bus.set_pc(0o3000);

    // a program without a starting address is loaded but not started
    term.push_keys(&[Some(CNTL_E)]);
    assert!(m.execute(&format!("GO {}", no_entry.display())));
    assert!(out.text().contains("has no starting address"));
    assert_eq!(bus.peek_mem(0o2000), Some(0o43));
    assert!(bus.halted());
    assert_eq!(bus.read_reg(Register::Pcir) >> 36, 0o3000);

    // unless given one
    assert!(m.execute(&format!("GO {} 2000", no_entry.display())));
    assert!(!bus.halted());
    assert_eq!(bus.read_reg(Register::Pcir) >> 36, 0o2000);
    let _ = std::fs::remove_file(&with_entry);
    let _ = std::fs::remove_file(&no_entry);
}

#[test]
fn test_breakpoint_encode() {
    assert_eq!(
        BreakCondition::Fetch(0o1000).encode(0),
        (0o400000001000, 0o404003777777)
    );
    assert_eq!(
        BreakCondition::Fetch(0o1000).encode(0o7),
        (0o400000001000, 0o404003777770)
    );
    assert_eq!(
        BreakCondition::Mem(0o1000).encode(0),
        (0o240000001000, 0o244003777777)
    );
    assert_eq!(
        BreakCondition::IoRead(0o200000).encode(0),
        (0o204000200000, 0o204017777777)
    );
    assert_eq!(BreakCondition::Raw(1, 2).encode(0), (1, 2));
}

#[test]
fn test_breakpoint_commands() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.execute("BR"));
    for n in 0..4 {
        assert!(out.text().contains(&format!("br{}: breakpoint disabled", n)));
    }

    assert!(m.execute("BR0 --fetch=1000"));
    let r = m.ctx.read_breakpoint(0).unwrap();
    assert_eq!((r.brar, r.brmr), (0o400000001000, 0o404003777777));
    assert!(out.text().contains("BRAR0: 400000001000"));

    assert!(m.execute("BR2 --raw 1,2"));
    let r = m.ctx.read_breakpoint(2).unwrap();
    assert_eq!((r.brar, r.brmr), (1, 2));

    assert!(m.execute("BR0 --disable"));
    assert!(out.text().contains("br0: breakpoint disabled"));
    assert!(m.ctx.read_breakpoint(0).unwrap().is_disabled());
    assert!(!m.ctx.read_breakpoint(2).unwrap().is_disabled());

    // disarming twice is fine
    assert!(m.execute("BR --disable;BR --disable"));
    assert_eq!(out.text().matches("br: all breakpoints disabled").count(), 2);
    for n in 0..4 {
        assert!(m.ctx.read_breakpoint(n).unwrap().is_disabled());
    }
}

#[test]
fn test_breakpoint_errors() {
    let (mut m, _bus, out, _term) = new_monitor(0o1000, &[]);
    assert!(m.execute("BR --fetch=1000"));
    assert!(out.text().contains("a breakpoint unit (br0-br3) is required"));
    assert!(m.execute("BR0 --fetch=1000 --mem=2000"));
    assert!(out.text().contains("only one break condition can be given"));
    assert!(m.execute("BR7"));
    assert!(out.text().contains("invalid breakpoint unit \"BR7\""));

    // only one unit digit
    assert!(m.execute("BR12 --fetch=1000;BR0x --fetch=1000"));
    assert!(out.text().contains("invalid breakpoint unit \"BR12\""));
    assert!(out.text().contains("invalid breakpoint unit \"BR0x\""));
    assert!(m.ctx.read_breakpoint(0).unwrap().is_disabled());
    assert!(m.ctx.arm_breakpoint(4, &BreakCondition::Fetch(0), 0).is_err());
    assert!(m.ctx.disarm_breakpoint(BreakUnit::Unit(4)).is_err());
}

#[test]
fn test_console_detach() {
    let keys = [Some(b'a'), Some(b'\n'), Some(CNTL_E)];
    let (mut m, mut bus, out, term) = new_monitor(0o2000, &keys);

    // still running: the prompt comes back
    assert!(m.execute("ST 1000"));
    assert!(!bus.halted());
    assert_eq!(bus.cty_input(), b"a\r".to_vec());

    // the terminal may be raw, the monitor's own lines carry their carriage return
    assert!(out.text().ends_with("^E\r\n"));

    // signal keys were off while attached, and are back on now
    let s = term.state.borrow();
    assert_eq!(s.history, vec![false, true]);
    assert!(s.signal_keys);
}

#[test]
fn test_console_halt() {
    let (mut m, bus, out, term) = new_monitor(0o1000, &[]);
    bus.push_cty_output(b"hello");
    bus.halt_after(3);
    assert!(!m.execute("CO"));
    assert!(out.text().contains("hello"));
    assert!(term.state.borrow().signal_keys);
}

#[test]
fn test_console_escape() {
    let keys = [
        Some(ESC),
        Some(CNTL_E),
        Some(ESC),
        Some(ESC),
        Some(CNTL_C),
        Some(CNTL_E),
    ];
    let (mut m, bus, out, _term) = new_monitor(0o1000, &keys);
    assert!(m.execute("CO"));
    assert_eq!(bus.cty_input(), vec![CNTL_E, ESC, CNTL_C]);
    assert_eq!(out.text().matches("^E").count(), 1);
}

/// ^C while attached is just a key for the target.
const CNTL_C: u8 = 0x03;

#[test]
fn test_console_trace_and_printer() {
    let keys = [Some(CNTL_T), Some(CNTL_L), Some(CNTL_E)];
    let (mut m, mut bus, out, _term) = new_monitor(0o2000, &keys);
    bus.write_mem(0o1000, make_word(OP_JRST, 0o1234));
    assert!(m.execute("ST 1000"));
    assert!(out.text().contains("001000\t254 00,001234\r\n"));
    assert_eq!(bus.read_reg(Register::Lpccr) & LP_ONLINE, LP_ONLINE);
    assert!(bus.cty_input().is_empty());
}

#[test]
fn test_console_output_drained() {
    let (mut m, bus, out, _term) = new_monitor(0o1000, &[None, Some(CNTL_E)]);
    bus.push_cty_output(b"KS10 CSL.V1\r\n");
    assert!(m.execute("CO"));
    assert!(out.text().starts_with("KS10 CSL.V1\r\n"));
}
