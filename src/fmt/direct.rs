use core::ffi::CStr;

use super::value::{emit, narrow_signed, narrow_unsigned, packed_width_for, parse_spec, widen_signed, Resolved, Specifier};
use super::Arg;

/// Parses `fmt` left to right, writing regular bytes to `out` verbatim and,
/// on each completed specifier, consuming one argument from `args` and
/// writing its formatted value, narrowed to the width `spec.length` (or, for
/// pointers/strings, the native pointer width) commands. An unsupported
/// specifier terminates the operation immediately — no partial output after
/// the bad specifier.
///
/// Narrowing here mirrors what capture mode packs and restore mode widens
/// back from: without it, direct and restore would disagree on values wider
/// than the specifier's implied width (e.g. `%d` truncates to 4 bytes even
/// though `Arg::Signed` carries a full `i64`).
pub fn direct(fmt: &CStr, args: &[Arg], mut out: impl FnMut(u8)) {
    let bytes = fmt.to_bytes();
    let mut arg_iter = args.iter();
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

        let Some(arg) = arg_iter.next() else {
            return;
        };

        let width = packed_width_for(&spec);
        match (spec.specifier, arg) {
            (Specifier::SignedDec, Arg::Signed(v)) => {
                let narrowed = widen_signed(narrow_signed(*v, width), width);
                emit(&spec, Resolved::Signed(narrowed), &mut out)
            }
            (Specifier::UnsignedDec, Arg::Unsigned(v)) => {
                emit(&spec, Resolved::Unsigned(narrow_unsigned(*v, width)), &mut out)
            }
            (Specifier::UnsignedHex, Arg::Unsigned(v)) => {
                emit(&spec, Resolved::Unsigned(narrow_unsigned(*v, width)), &mut out)
            }
            (Specifier::Pointer, Arg::Pointer(p)) => emit(&spec, Resolved::Unsigned(*p as u64), &mut out),
            (Specifier::Str, Arg::Str(s)) => emit(&spec, Resolved::Str(s), &mut out),
            _ => return,
        }
    }
}
