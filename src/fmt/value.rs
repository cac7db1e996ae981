//! Format-spec parsing and numeric rendering shared by direct, capture and
//! restore mode.

/// One parsed `%...` specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spec {
    pub pad_zero: bool,
    pub min_width: u32,
    pub length: Length,
    pub specifier: Specifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    None,
    Hh,
    H,
    L,
    Ll,
    Z,
}

impl Length {
    /// Byte width a value is narrowed to before being packed by capture
    /// mode. Pointers and strings ignore this and always pack pointer-sized
    /// (see [`packed_width_for`]).
    pub fn packed_width(self) -> usize {
        match self {
            Length::Hh => 1,
            Length::H => 2,
            Length::None => 4,
            Length::L => 8,
            Length::Ll => 8,
            Length::Z => core::mem::size_of::<usize>(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier {
    SignedDec,
    UnsignedDec,
    UnsignedHex,
    Pointer,
    Str,
    Percent,
}

/// The byte width capture packs for this specifier: pointer-sized for
/// pointers and strings, the length modifier's width otherwise.
pub fn packed_width_for(spec: &Spec) -> usize {
    match spec.specifier {
        Specifier::Pointer | Specifier::Str => core::mem::size_of::<usize>(),
        _ => spec.length.packed_width(),
    }
}

/// Truncates a value to `width` bytes, preserving bit pattern (not
/// magnitude) the way a C cast to a narrower integer type would. Shared by
/// direct mode (narrows before rendering) and capture mode (narrows before
/// packing), so both modes agree with what restore mode widens back.
pub fn narrow_unsigned(value: u64, width: usize) -> u64 {
    if width >= 8 {
        value
    } else {
        value & ((1u64 << (width * 8)) - 1)
    }
}

/// Signed counterpart of [`narrow_unsigned`].
pub fn narrow_signed(value: i64, width: usize) -> u64 {
    narrow_unsigned(value as u64, width)
}

/// Sign-extends a value narrowed to `width` bytes (e.g. by [`narrow_signed`]
/// or by unpacking a captured buffer) back out to `i64`. Restore mode and
/// direct mode both call this so a value wider than the specifier's implied
/// width renders identically either way.
pub fn widen_signed(raw: u64, width: usize) -> i64 {
    if width >= 8 {
        return raw as i64;
    }
    let sign_bit = 1u64 << (width * 8 - 1);
    if raw & sign_bit != 0 {
        (raw | !((sign_bit << 1) - 1)) as i64
    } else {
        raw as i64
    }
}

/// Parses one `%...` specifier starting at `bytes[start]` (which must be
/// `b'%'`). Returns the parsed spec and the index just past the specifier
/// character, or `None` if the specifier is malformed/unsupported — the
/// caller must terminate the enclosing format operation at that point.
pub fn parse_spec(bytes: &[u8], start: usize) -> Option<(Spec, usize)> {
    debug_assert_eq!(bytes.get(start), Some(&b'%'));
    let mut i = start + 1;

    let pad_zero = if bytes.get(i) == Some(&b'0') {
        i += 1;
        true
    } else {
        false
    };

    let mut min_width: u32 = 0;
    while let Some(&c) = bytes.get(i) {
        if c.is_ascii_digit() {
            min_width = min_width.saturating_mul(10).saturating_add((c - b'0') as u32);
            i += 1;
        } else {
            break;
        }
    }

    let length = match bytes.get(i) {
        Some(b'h') => {
            if bytes.get(i + 1) == Some(&b'h') {
                i += 2;
                Length::Hh
            } else {
                i += 1;
                Length::H
            }
        }
        Some(b'l') => {
            if bytes.get(i + 1) == Some(&b'l') {
                i += 2;
                Length::Ll
            } else {
                i += 1;
                Length::L
            }
        }
        Some(b'z') => {
            i += 1;
            Length::Z
        }
        _ => Length::None,
    };

    let specifier = match bytes.get(i) {
        Some(b'd') | Some(b'i') => Specifier::SignedDec,
        Some(b'u') => Specifier::UnsignedDec,
        Some(b'x') => Specifier::UnsignedHex,
        Some(b'p') => Specifier::Pointer,
        Some(b's') => Specifier::Str,
        Some(b'%') => Specifier::Percent,
        _ => return None,
    };
    i += 1;

    Some((
        Spec {
            pad_zero,
            min_width,
            length,
            specifier,
        },
        i,
    ))
}

/// Renders an unsigned value in `base` (10 or 16, lower-case hex digits),
/// honouring field width and zero/space padding. `negative` adds a leading
/// `-` (used by the signed path; width accounts for it).
pub fn render_magnitude(value: u64, base: u64, negative: bool, spec: &Spec, mut out: impl FnMut(u8)) {
    let mut digits = [0u8; 20];
    let mut n = 0usize;
    let mut v = value;

    if v == 0 {
        digits[0] = b'0';
        n = 1;
    } else {
        while v > 0 {
            let d = (v % base) as u8;
            digits[n] = if d < 10 { b'0' + d } else { b'a' + (d - 10) };
            n += 1;
            v /= base;
        }
    }

    let sign_len: u32 = if negative { 1 } else { 0 };
    let content_len = sign_len + n as u32;
    let pad_len = spec.min_width.saturating_sub(content_len);

    if spec.pad_zero {
        if negative {
            out(b'-');
        }
        for _ in 0..pad_len {
            out(b'0');
        }
    } else {
        for _ in 0..pad_len {
            out(b' ');
        }
        if negative {
            out(b'-');
        }
    }

    for idx in (0..n).rev() {
        out(digits[idx]);
    }
}

/// Renders a signed value, taking care with `i64::MIN` via an unsigned cast
/// of the negation.
pub fn render_signed(value: i64, spec: &Spec, out: impl FnMut(u8)) {
    let negative = value < 0;
    let magnitude = value.unsigned_abs();
    render_magnitude(magnitude, 10, negative, spec, out);
}

/// A value resolved to its run-time type, ready to be emitted for a given
/// specifier. Shared between direct mode (values come from an [`super::Arg`]
/// slice) and restore mode (values come from the packed byte buffer).
pub enum Resolved<'a> {
    Signed(i64),
    Unsigned(u64),
    Str(&'a core::ffi::CStr),
}

/// Emits one resolved value per `spec.specifier`. `%%` is handled by the
/// caller before a value is resolved, since it consumes no argument.
pub fn emit(spec: &Spec, resolved: Resolved<'_>, mut out: impl FnMut(u8)) {
    match (spec.specifier, resolved) {
        (Specifier::SignedDec, Resolved::Signed(v)) => render_signed(v, spec, out),
        (Specifier::UnsignedDec, Resolved::Unsigned(v)) => render_magnitude(v, 10, false, spec, out),
        (Specifier::UnsignedHex, Resolved::Unsigned(v)) => render_magnitude(v, 16, false, spec, out),
        (Specifier::Pointer, Resolved::Unsigned(v)) => render_magnitude(v, 16, false, spec, out),
        (Specifier::Str, Resolved::Str(s)) => {
            for &b in s.to_bytes() {
                out(b);
            }
        }
        _ => {}
    }
}
