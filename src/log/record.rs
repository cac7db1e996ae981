//! S2b/c record layout: a fixed header (module pointer, timestamp, level)
//! followed by the captured format payload, per `SPEC_FULL.md` §4.4.2.

use core::mem::size_of;

use super::{LogLevel, LogModule};

/// `module ptr (native width) + timestamp_us (8 bytes) + level (1 byte)`.
pub const HEADER_LEN: usize = size_of::<usize>() + 8 + 1;

/// Writes the fixed header into `buf[..HEADER_LEN]`, returning `HEADER_LEN`.
pub fn encode_header(buf: &mut [u8], module: &'static LogModule, timestamp_us: u64, level: LogLevel) -> usize {
    let ptr_width = size_of::<usize>();
    let ptr_bytes = (module as *const LogModule as u64).to_le_bytes();
    buf[..ptr_width].copy_from_slice(&ptr_bytes[..ptr_width]);
    buf[ptr_width..ptr_width + 8].copy_from_slice(&timestamp_us.to_le_bytes());
    buf[ptr_width + 8] = level as u8;
    HEADER_LEN
}

/// Reads back the fixed header. The module pointer is only valid because
/// log modules are required to have `'static` storage duration.
pub fn decode_header(buf: &[u8]) -> (*const LogModule, u64, LogLevel) {
    let ptr_width = size_of::<usize>();
    let mut ptr_bytes = [0u8; 8];
    ptr_bytes[..ptr_width].copy_from_slice(&buf[..ptr_width]);
    let module_ptr = u64::from_le_bytes(ptr_bytes) as usize as *const LogModule;

    let mut ts_bytes = [0u8; 8];
    ts_bytes.copy_from_slice(&buf[ptr_width..ptr_width + 8]);
    let timestamp_us = u64::from_le_bytes(ts_bytes);

    let level = LogLevel::from_u8(buf[ptr_width + 8]);

    (module_ptr, timestamp_us, level)
}
