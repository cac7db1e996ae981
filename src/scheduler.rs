//! S1 — the cooperative priority work scheduler.
//!
//! Two submitted queues (high/low priority, each priority-ordered with FIFO
//! ties) and one scheduled queue (deadline-ordered) hold [`WorkItem`]s that
//! live in caller-owned static storage. Dispatch is described in full in
//! `SPEC_FULL.md` §4.2.3; this module is a direct implementation of that
//! algorithm.

use crate::clock;
use crate::error::{fatal, Fatal};
use crate::platform;
use crate::queue::SortedQueue;
use crate::work_item::{Flags, WorkItem};

static LOW: SortedQueue = SortedQueue::new();
static HIGH: SortedQueue = SortedQueue::new();
static SCHEDULED: SortedQueue = SortedQueue::new();

/// Namespace for the scheduler's public operations. All state is process-wide
/// and global; this type carries no data of its own.
pub struct Scheduler;

impl Scheduler {
    /// See [`submit`].
    pub fn submit(item: &'static WorkItem) {
        submit(item);
    }
    /// See [`schedule_at`].
    pub fn schedule_at(item: &'static WorkItem, abs_uptime_ms: u64) {
        schedule_at(item, abs_uptime_ms);
    }
    /// See [`schedule_after`].
    pub fn schedule_after(item: &'static WorkItem, delay_ms: u64) {
        schedule_after(item, delay_ms);
    }
    /// See [`schedule_again`].
    pub fn schedule_again(item: &'static WorkItem, delay_ms: u64) {
        schedule_again(item, delay_ms);
    }
    /// See [`cancel`].
    pub fn cancel(item: &'static WorkItem) {
        cancel(item);
    }
    /// See [`run`].
    pub fn run() -> ! {
        run()
    }
}

fn priority_key(item: &WorkItem) -> i64 {
    item.priority() as i64
}

fn deadline_key(item: &WorkItem) -> i64 {
    item.scheduled_uptime_ms() as i64
}

fn queue_for_priority(priority: i32) -> &'static SortedQueue {
    if priority < 0 {
        &HIGH
    } else {
        &LOW
    }
}

/// Moves `item` to the tail of its priority class within the appropriate
/// submitted queue. No-op if already SUBMITTED. If SCHEDULED, it is first
/// dequeued from the scheduled queue. Safe from any context including ISR.
pub fn submit(item: &'static WorkItem) {
    critical_section::with(|_| {
        let flags = item.flags();
        if flags.contains(Flags::SUBMITTED) {
            return;
        }
        if flags.contains(Flags::SCHEDULED) {
            // SAFETY: inside critical section.
            unsafe {
                SCHEDULED.remove(item);
                item.remove_flags(Flags::SCHEDULED);
            }
        }

        let queue = queue_for_priority(item.priority());
        // SAFETY: inside critical section.
        unsafe {
            queue.insert_by_key(item, priority_key);
            item.insert_flags(Flags::SUBMITTED);
        }
    });

    if item.priority() < 0 {
        platform::get().softirq_trigger();
    }
}

/// Inserts `item` into the scheduled queue ordered by ascending deadline,
/// unless it is already SUBMITTED or SCHEDULED (first-schedule-wins — see
/// design note in `SPEC_FULL.md` §9). Re-arms the hardware timer from the
/// new head.
pub fn schedule_at(item: &'static WorkItem, abs_uptime_ms: u64) {
    critical_section::with(|_| {
        let flags = item.flags();
        if flags.contains(Flags::SUBMITTED) || flags.contains(Flags::SCHEDULED) {
            return;
        }

        // SAFETY: inside critical section.
        unsafe {
            item.set_scheduled_uptime_ms(abs_uptime_ms);
            SCHEDULED.insert_by_key(item, deadline_key);
            item.insert_flags(Flags::SCHEDULED);
        }
        rearm_timer();
    });
}

/// Equivalent to `schedule_at(item, uptime_ms() + delay_ms)`.
pub fn schedule_after(item: &'static WorkItem, delay_ms: u64) {
    schedule_at(item, clock::uptime_ms() + delay_ms);
}

/// Equivalent to `schedule_at(item, item.scheduled_uptime_ms() + delay_ms)`.
/// Produces drift-free periodicity when called from the item's own handler.
pub fn schedule_again(item: &'static WorkItem, delay_ms: u64) {
    schedule_at(item, item.scheduled_uptime_ms() + delay_ms);
}

/// Removes `item` from whichever queue it is in and clears the matching
/// flag. No-op if neither SUBMITTED nor SCHEDULED. Does not abort a
/// currently RUNNING execution.
pub fn cancel(item: &'static WorkItem) {
    critical_section::with(|_| {
        let flags = item.flags();
        if flags.contains(Flags::SUBMITTED) {
            let queue = queue_for_priority(item.priority());
            // SAFETY: inside critical section.
            unsafe {
                queue.remove(item);
                item.remove_flags(Flags::SUBMITTED);
            }
        } else if flags.contains(Flags::SCHEDULED) {
            // SAFETY: inside critical section.
            unsafe {
                SCHEDULED.remove(item);
                item.remove_flags(Flags::SCHEDULED);
            }
        }
    });
}

/// Re-arms the hardware timer from the scheduled queue's new head. Caller
/// must hold the critical section. No-op if the scheduled queue is empty.
fn rearm_timer() {
    // SAFETY: caller holds the critical section.
    if let Some(head) = unsafe { SCHEDULED.head() } {
        platform::get().timer_schedule_at(head.scheduled_uptime_ms());
    }
}

/// Pops every item in the scheduled queue whose deadline has passed, clears
/// SCHEDULED, and routes each to the correct submitted queue by the sign of
/// its priority. Triggers the soft-IRQ if any high-priority item was
/// promoted. Re-arms the timer from the new head.
pub(crate) fn promote_scheduled_due_items() {
    let mut promoted_high = false;

    critical_section::with(|_| {
        let now = clock::uptime_ms();
        loop {
            // SAFETY: inside critical section.
            let due = unsafe {
                match SCHEDULED.head() {
                    Some(head) if head.scheduled_uptime_ms() <= now => SCHEDULED.pop_front(),
                    _ => None,
                }
            };
            let Some(item) = due else { break };

            // SAFETY: inside critical section.
            unsafe {
                item.remove_flags(Flags::SCHEDULED);
            }
            let queue = queue_for_priority(item.priority());
            // SAFETY: inside critical section.
            unsafe {
                queue.insert_by_key(item, priority_key);
                item.insert_flags(Flags::SUBMITTED);
            }
            if item.priority() < 0 {
                promoted_high = true;
            }
        }
        rearm_timer();
    });

    if promoted_high {
        platform::get().softirq_trigger();
    }
}

/// Called by the platform's timer ISR trampoline when the scheduled
/// wake-up deadline is reached.
pub fn timer_handler() {
    promote_scheduled_due_items();
}

/// Pops one item from `queue`, runs it to completion, and restores its
/// flags. Returns `false` if the queue was empty.
pub(crate) fn drain_one(queue: &SortedQueue) -> bool {
    let item = critical_section::with(|_| {
        // SAFETY: inside critical section.
        let item = unsafe { queue.pop_front() }?;
        if item.flags().contains(Flags::RUNNING) {
            fatal(Fatal::SchedulerInvariantViolated);
        }
        // SAFETY: inside critical section.
        unsafe {
            item.remove_flags(Flags::SUBMITTED);
            item.insert_flags(Flags::RUNNING);
        }
        Some(item)
    });

    let Some(item) = item else { return false };

    (item.runs())(item);

    critical_section::with(|_| {
        // SAFETY: inside critical section.
        unsafe {
            item.remove_flags(Flags::RUNNING);
        }
    });
    true
}

/// Drains the high-priority queue until empty. Called by the platform's
/// soft-IRQ trampoline.
pub fn softirq_handler() {
    while drain_one(&HIGH) {}
}

/// Enters the critical section; if the low-priority queue is non-empty,
/// exits and returns immediately, otherwise calls `enter_sleep_mode` before
/// exiting (relying on the platform to service the pending-but-masked
/// interrupt only once the section is released).
fn idle_sleep() {
    critical_section::with(|_| {
        // SAFETY: inside critical section.
        if unsafe { LOW.is_empty() } {
            platform::get().enter_sleep_mode();
        }
    });
}

/// Runs the main loop. Never returns.
pub fn run() -> ! {
    platform::get().softirq_trigger();
    loop {
        promote_scheduled_due_items();
        if !drain_one(&LOW) {
            idle_sleep();
        }
    }
}

#[cfg(any(test, feature = "testkit"))]
pub(crate) mod testkit_support {
    use super::*;

    pub(crate) fn low_queue() -> &'static SortedQueue {
        &LOW
    }

    pub(crate) fn high_queue() -> &'static SortedQueue {
        &HIGH
    }

    pub(crate) fn scheduled_queue() -> &'static SortedQueue {
        &SCHEDULED
    }

    /// Deadline of the scheduled queue's head, if any. Used by the test
    /// harness to jump time forward to the next interesting instant
    /// instead of single-stepping.
    pub(crate) fn next_scheduled_deadline_ms() -> Option<u64> {
        critical_section::with(|_| {
            // SAFETY: inside critical section.
            unsafe { SCHEDULED.head() }.map(|item| item.scheduled_uptime_ms())
        })
    }

    pub(crate) fn drain_one(queue: &SortedQueue) -> bool {
        super::drain_one(queue)
    }

    pub(crate) fn promote_scheduled_due_items() {
        super::promote_scheduled_due_items();
    }
}
