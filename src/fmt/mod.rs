//! S2a — the printf-subset format engine.
//!
//! Three modes share one format-string parser ([`value::parse_spec`]):
//! *direct* renders immediately through a per-character callback; *capture*
//! packs the format string's pointer plus narrowed argument bytes into a
//! caller buffer; *restore* unpacks a captured buffer and renders it exactly
//! as direct mode would have.
//!
//! Format strings are `&'static CStr` rather than `&'static str`: capture
//! mode only has room to pack a single pointer-width value for the format
//! string (see the record layout in `SPEC_FULL.md` §4.4.2), so restore must
//! be able to recover it from that raw pointer alone, the same way the
//! original C implementation walks a `char *` to its NUL terminator.

mod capture;
mod direct;
mod restore;
mod value;

pub use value::{Length, Spec, Specifier};
pub(crate) use value::render_magnitude;

pub use capture::capture;
pub use direct::direct;
pub use restore::restore;

/// One pre-typed call-site argument. Rust has no C-style varargs, so the
/// `LOG_*` macros and direct/capture mode alike take a slice of these
/// instead of widening loosely-typed variadic arguments (see the design
/// note on variadic capture in `SPEC_FULL.md` §9).
#[derive(Debug, Clone, Copy)]
pub enum Arg {
    Signed(i64),
    Unsigned(u64),
    Pointer(usize),
    Str(&'static core::ffi::CStr),
}
