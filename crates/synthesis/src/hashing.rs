/// Polynomial rolling hash over UTF-16 code units (`h = h * 31 + unit`)
/// with signed 32-bit wraparound, folded to its absolute value.
///
/// Stable across processes and platforms. Only used to derive seeds, so
/// collisions are harmless.
pub fn hash_key(input: &str) -> u32 {
    input
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
        .unsigned_abs()
}
