//! S2 — the deferred logging pipeline: module registration and thresholds,
//! ISR-safe argument capture into the ring buffer, and asynchronous
//! rendering on the scheduler's lowest-priority work item.

mod macros;
mod record;
mod registry;
mod ring;

pub use registry::{set_level, LogModule};

#[cfg(any(test, feature = "testkit"))]
pub use ring::RingBuffer;

use crate::clock;
use crate::config;
use crate::fmt::{self, Arg};
use crate::platform;
use crate::scheduler::Scheduler;
use crate::work_item::WorkItem;

/// Severity, numerically ordered so `level > module.level()` is a plain
/// comparison: `Err` is most severe, `Dbg` least.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Err = 0,
    Wrn = 1,
    Inf = 2,
    Dbg = 3,
}

impl LogLevel {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Err,
            1 => LogLevel::Wrn,
            2 => LogLevel::Inf,
            _ => LogLevel::Dbg,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Err => "err",
            LogLevel::Wrn => "wrn",
            LogLevel::Inf => "inf",
            LogLevel::Dbg => "dbg",
        }
    }
}

static RING: ring::RingBuffer<{ config::LOG_BUFFER_SIZE }> = ring::RingBuffer::new();
static LOG_WORK_ITEM: WorkItem = WorkItem::new(log_output_handler, config::LOG_WORK_PRIORITY);

/// `LOG_xxx(module, fmt, args...)` call-site logic: early-exits on
/// threshold, samples the timestamp, captures the header + arguments into
/// the ring buffer, and submits the output work item. Safe from any
/// context, including an ISR.
pub fn log_record(module: &'static LogModule, level: LogLevel, format: &'static core::ffi::CStr, args: &[Arg]) {
    if level > module.level() {
        return;
    }

    let timestamp_us = clock::uptime_us();

    let mut buf = [0u8; config::LOG_MAX_MSG_DATA_SIZE];
    let header_len = record::encode_header(&mut buf, module, timestamp_us, level);

    let payload_len = fmt::capture(format, args, &mut buf[header_len..]);
    if payload_len == 0 {
        // Either the payload region filled or `format` used an unsupported
        // specifier; both count as a drop.
        RING.count_drop();
        return;
    }

    let total = header_len + payload_len;
    RING.push(&buf[..total]);
    Scheduler::submit(&LOG_WORK_ITEM);
}

fn debug_bytes(bytes: &[u8]) {
    let platform = platform::get();
    for &b in bytes {
        platform.debug_out(b);
    }
}

fn debug_str(s: &str) {
    debug_bytes(s.as_bytes());
}

fn write_padded_decimal(value: u64, min_digits: u32) {
    let spec = fmt::Spec {
        pad_zero: true,
        min_width: min_digits,
        length: fmt::Length::None,
        specifier: fmt::Specifier::UnsignedDec,
    };
    fmt::render_magnitude(value, 10, false, &spec, |b| platform::get().debug_out(b));
}

fn write_timestamp(timestamp_us: u64) {
    let total_ms = timestamp_us / 1000;
    let uuu = timestamp_us % 1000;
    let total_s = total_ms / 1000;
    let mmm = total_ms % 1000;
    let hh = total_s / 3600;
    let mm = total_s / 60 % 60;
    let ss = total_s % 60;

    debug_str("[");
    write_padded_decimal(hh, 2);
    debug_str(":");
    write_padded_decimal(mm, 2);
    debug_str(":");
    write_padded_decimal(ss, 2);
    debug_str(".");
    write_padded_decimal(mmm, 3);
    debug_str(",");
    write_padded_decimal(uuu, 3);
    debug_str("]");
}

fn write_level(level: LogLevel) {
    match level {
        LogLevel::Err => debug_str("\x1B[1;31merr\x1B[0m"),
        LogLevel::Wrn => debug_str("\x1B[1;33mwrn\x1B[0m"),
        other => debug_str(other.as_str()),
    }
}

fn emit_drop_notice(count: u32) {
    debug_str("\x1B[1;31m--- ");
    write_padded_decimal(count as u64, 1);
    debug_str(" messages dropped ---\x1B[0m");
    debug_str(config::LINE_END);
}

fn render_record(bytes: &[u8]) {
    let (module_ptr, timestamp_us, level) = record::decode_header(bytes);
    // SAFETY: the pointer was packed from a `&'static LogModule` at the
    // call site; log modules are required to have 'static storage.
    let module = unsafe { &*module_ptr };
    let payload = &bytes[record::HEADER_LEN..];

    write_timestamp(timestamp_us);
    debug_str(" <");
    write_level(level);
    debug_str("> ");
    debug_str(module.name());
    debug_str(": ");
    fmt::restore(payload, |b| platform::get().debug_out(b));
    debug_str(config::LINE_END);
}

fn log_output_handler(_item: &WorkItem) {
    let dropped = RING.take_dropped();
    if dropped > 0 {
        emit_drop_notice(dropped);
    }

    let mut buf = [0u8; config::LOG_MAX_MSG_DATA_SIZE];
    if let Some(len) = RING.pop(&mut buf) {
        render_record(&buf[..len]);
    }

    if !RING.is_empty() {
        Scheduler::submit(&LOG_WORK_ITEM);
    }
}

/// Synchronously drains the ring buffer to completion. Used by
/// [`crate::error::fatal`] before the platform halts or aborts.
pub fn log_panic() {
    loop {
        let dropped = RING.take_dropped();
        if dropped > 0 {
            emit_drop_notice(dropped);
        }

        let mut buf = [0u8; config::LOG_MAX_MSG_DATA_SIZE];
        match RING.pop(&mut buf) {
            Some(len) => render_record(&buf[..len]),
            None => break,
        }
    }
}

#[cfg(any(test, feature = "testkit"))]
pub(crate) mod testkit_support {
    use super::*;

    pub(crate) fn ring() -> &'static ring::RingBuffer<{ config::LOG_BUFFER_SIZE }> {
        &RING
    }
}
