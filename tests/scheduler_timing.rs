//! Exercises `schedule_after`/`schedule_again` timing from `SPEC_FULL.md`
//! §8: delayed one-shot execution and drift-free periodic rescheduling.
//!
//! Single `#[test]` function for the same reason as
//! `scheduler_priority_order.rs`: the scheduler's queues are global state.

use std::sync::{Mutex, OnceLock};

use workcore::testkit::{run_for, FakePlatform};
use workcore::work_item::WorkItem;
use workcore::{platform, Scheduler};

static PLATFORM: FakePlatform = FakePlatform::new();
static INIT: OnceLock<()> = OnceLock::new();

fn init_platform() -> &'static FakePlatform {
    INIT.get_or_init(|| platform::init(&PLATFORM));
    &PLATFORM
}

static DELAYED_RUNS: Mutex<Vec<(u32, u64)>> = Mutex::new(Vec::new());

fn record_delayed(item: &WorkItem) {
    DELAYED_RUNS
        .lock()
        .unwrap()
        .push((item.priority() as u32, workcore::clock::uptime_ms()));
}

static D1: WorkItem = WorkItem::new(record_delayed, 101);
static D2: WorkItem = WorkItem::new(record_delayed, 102);
static D3: WorkItem = WorkItem::new(record_delayed, 103);

static PERIODIC_RUNS: Mutex<Vec<u64>> = Mutex::new(Vec::new());

fn periodic_handler(item: &WorkItem) {
    let mut runs = PERIODIC_RUNS.lock().unwrap();
    runs.push(workcore::clock::uptime_ms());
    if runs.len() < 5 {
        drop(runs);
        Scheduler::schedule_again(item, 100);
    }
}

static PERIODIC: WorkItem = WorkItem::new(periodic_handler, 55);

#[test]
fn delayed_and_drift_free_periodic_execution() {
    let plat = init_platform();
    let start_ms = plat.now_us() / 1000;

    // Three items scheduled 1000/2000/3000ms out must run at exactly those
    // absolute deadlines, regardless of submission order relative to delay.
    DELAYED_RUNS.lock().unwrap().clear();
    Scheduler::schedule_after(&D1, 1000);
    Scheduler::schedule_after(&D2, 2000);
    Scheduler::schedule_after(&D3, 3000);
    run_for(plat, 3000);

    let mut runs = DELAYED_RUNS.lock().unwrap().clone();
    runs.sort_by_key(|(priority, _)| *priority);
    assert_eq!(
        runs,
        vec![
            (101, start_ms + 1000),
            (102, start_ms + 2000),
            (103, start_ms + 3000),
        ]
    );

    // A periodic item that re-arms itself with `schedule_again` from inside
    // its own handler must fire every 100ms with no accumulated drift: T,
    // T+100, T+200, T+300, T+400.
    let period_start_ms = plat.now_us() / 1000;
    PERIODIC_RUNS.lock().unwrap().clear();
    // Seed the first firing through `schedule_after` (not `submit`) so the
    // handler's own `schedule_again` has a real deadline to add to.
    Scheduler::schedule_after(&PERIODIC, 0);
    run_for(plat, 500);

    assert_eq!(
        *PERIODIC_RUNS.lock().unwrap(),
        vec![
            period_start_ms,
            period_start_ms + 100,
            period_start_ms + 200,
            period_start_ms + 300,
            period_start_ms + 400,
        ]
    );
}
