use core::ffi::CStr;
use core::mem::size_of;

use super::value::{narrow_signed, narrow_unsigned, packed_width_for, parse_spec, Specifier};
use super::Arg;

/// Packs the format-string pointer followed by each argument's raw bytes,
/// narrowed to the width its length modifier (or, for pointers/strings, the
/// native pointer width) commands. Returns the number of bytes written, or
/// `0` if the buffer fills or `fmt` contains an unsupported specifier (the
/// caller treats either as a dropped record).
pub fn capture(fmt: &'static CStr, args: &[Arg], buf: &mut [u8]) -> usize {
    let ptr_width = size_of::<usize>();
    if buf.len() < ptr_width {
        return 0;
    }

    let ptr_bytes = (fmt.as_ptr() as u64).to_le_bytes();
    buf[..ptr_width].copy_from_slice(&ptr_bytes[..ptr_width]);
    let mut written = ptr_width;

    let bytes = fmt.to_bytes();
    let mut arg_iter = args.iter();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        let Some((spec, next_i)) = parse_spec(bytes, i) else {
            return 0;
        };
        i = next_i;

        if spec.specifier == Specifier::Percent {
            continue;
        }

        let Some(arg) = arg_iter.next() else {
            return 0;
        };

        let width = packed_width_for(&spec);
        if written + width > buf.len() {
            return 0;
        }

        let packed = pack_arg(arg, &spec);
        buf[written..written + width].copy_from_slice(&packed[..width]);
        written += width;
    }

    written
}

fn pack_arg(arg: &Arg, spec: &super::value::Spec) -> [u8; 8] {
    match (arg, spec.specifier) {
        (Arg::Signed(v), _) => {
            let width = spec.length.packed_width();
            narrow_signed(*v, width).to_le_bytes()
        }
        (Arg::Unsigned(v), _) => {
            let width = spec.length.packed_width();
            narrow_unsigned(*v, width).to_le_bytes()
        }
        (Arg::Pointer(p), _) => (*p as u64).to_le_bytes(),
        (Arg::Str(s), _) => (s.as_ptr() as u64).to_le_bytes(),
    }
}
