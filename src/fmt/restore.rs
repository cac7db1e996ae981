use core::ffi::CStr;
use core::mem::size_of;

use super::value::{emit, packed_width_for, parse_spec, widen_signed, Resolved, Specifier};
use crate::error::{fatal, Fatal};

/// Unpacks a buffer previously produced by [`super::capture`] and renders it
/// byte-for-byte identically to what [`super::direct`] would have produced.
/// A buffer shorter than the format string demands is a contract violation
/// (the caller is expected to have round-tripped a record it produced
/// itself) and triggers [`fatal`].
pub fn restore(buf: &[u8], mut out: impl FnMut(u8)) {
    let ptr_width = size_of::<usize>();
    if buf.len() < ptr_width {
        fatal(Fatal::CorruptRestoreBuffer);
    }

    let mut ptr_bytes = [0u8; 8];
    ptr_bytes[..ptr_width].copy_from_slice(&buf[..ptr_width]);
    let ptr_val = u64::from_le_bytes(ptr_bytes) as usize;

    // SAFETY: the pointer was captured from a `&'static CStr` at the log
    // call site; the format engine's contract requires format strings to
    // have 'static lifetime, so the pointee is still valid here.
    let fmt = unsafe { CStr::from_ptr(ptr_val as *const core::ffi::c_char) };

    let bytes = fmt.to_bytes();
    let mut cursor = ptr_width;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c != b'%' {
            out(c);
            i += 1;
            continue;
        }

        let Some((spec, next_i)) = parse_spec(bytes, i) else {
            return;
        };
        i = next_i;

        if spec.specifier == Specifier::Percent {
            out(b'%');
            continue;
        }

        let width = packed_width_for(&spec);
        if cursor + width > buf.len() {
            fatal(Fatal::CorruptRestoreBuffer);
        }
        let arg_bytes = &buf[cursor..cursor + width];
        cursor += width;

        match spec.specifier {
            Specifier::SignedDec => {
                let raw = widen_unsigned_bytes(arg_bytes);
                emit(&spec, Resolved::Signed(widen_signed(raw, arg_bytes.len())), &mut out)
            }
            Specifier::UnsignedDec | Specifier::UnsignedHex | Specifier::Pointer => {
                emit(&spec, Resolved::Unsigned(widen_unsigned_bytes(arg_bytes)), &mut out)
            }
            Specifier::Str => {
                let str_ptr = widen_unsigned_bytes(arg_bytes) as usize;
                // SAFETY: packed by `capture` from a `&'static CStr` pointer.
                let s = unsafe { CStr::from_ptr(str_ptr as *const core::ffi::c_char) };
                emit(&spec, Resolved::Str(s), &mut out);
            }
            Specifier::Percent => unreachable!(),
        }
    }
}

/// Zero-extends a little-endian packed value to `u64`; the caller applies
/// sign extension itself via [`widen_signed`] where needed.
fn widen_unsigned_bytes(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}
