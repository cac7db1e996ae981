//! Exercises the deferred logging pipeline end to end: rendered output
//! format (`SPEC_FULL.md` §8's log-output scenario) and ring-buffer
//! overflow-then-resume behaviour.
//!
//! Single `#[test]` function: the ring buffer and module registry are both
//! global, process-wide state.

use std::sync::OnceLock;

use workcore::fmt::Arg;
use workcore::testkit::{run_for, FakePlatform};
use workcore::{platform, LogLevel, LOG_INF};

workcore::LOG_MODULE_REGISTER!(MODNAME, "modname");

static PLATFORM: FakePlatform = FakePlatform::new();
static INIT: OnceLock<()> = OnceLock::new();

fn init_platform() -> &'static FakePlatform {
    INIT.get_or_init(|| {
        platform::init(&PLATFORM);
        MODNAME.register();
    });
    &PLATFORM
}

#[test]
fn rendered_format_and_overflow_then_resume() {
    let plat = init_platform();
    MODNAME.set_level(LogLevel::Inf);
    plat.clear_debug_output();

    // A single record at uptime 1,234,567us renders as the documented
    // "[hh:mm:ss.mmm,uuu] <level> module: message" line.
    plat.advance_us(1_234_567);
    LOG_INF!(&MODNAME, c"hello %s %d", Arg::Str(c"world"), Arg::Signed(42));
    run_for(plat, 0);

    let output = plat.debug_output();
    let output = std::str::from_utf8(&output).unwrap();
    assert_eq!(output, "[00:00:01.234,567] <inf> modname: hello world 42\n");

    // Flooding the ring buffer with far more records than it can hold must
    // drop the excess (never corrupt the records that do fit) and surface
    // one aggregated "messages dropped" notice ahead of whatever survives.
    plat.clear_debug_output();
    for _ in 0..10_000 {
        LOG_INF!(&MODNAME, c"x");
    }
    run_for(plat, 0);

    let flood_output = plat.debug_output();
    let flood_output = std::str::from_utf8(&flood_output).unwrap();
    assert!(
        flood_output.contains("messages dropped"),
        "expected a drop notice in: {flood_output}"
    );

    // Once the flood has fully drained, logging resumes normally: a record
    // submitted after the overflow is rendered exactly like any other.
    plat.clear_debug_output();
    LOG_INF!(&MODNAME, c"%s", Arg::Str(c"world"));
    run_for(plat, 0);

    let resumed_output = plat.debug_output();
    let resumed_output = std::str::from_utf8(&resumed_output).unwrap();
    assert!(
        resumed_output.trim_end_matches('\n').ends_with("world"),
        "expected logging to resume cleanly after the overflow, got: {resumed_output}"
    );
}
