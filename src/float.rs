/// Widens an IEEE-754 half-precision bit pattern to `f64`.
///
/// Widening is exact for every half-precision value, including subnormals,
/// infinities, and NaN. Follows the reference conversion from RFC 8949 §D.
pub fn f16_bits_to_f64(bits: u16) -> f64 {
    let exp = (bits >> 10) & 0x1f;
    let mant = f64::from(bits & 0x03ff);

    let magnitude = match exp {
        0 => mant * 2f64.powi(-24),
        0x1f => {
            if mant == 0.0 {
                f64::INFINITY
            } else {
                f64::NAN
            }
        }
        _ => (mant + 1024.0) * 2f64.powi(i32::from(exp) - 25),
    };

    if bits & 0x8000 == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Widens an IEEE-754 single-precision bit pattern to `f64`.
#[inline]
pub fn f32_bits_to_f64(bits: u32) -> f64 {
    f64::from(f32::from_bits(bits))
}
