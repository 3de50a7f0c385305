// The float codec reinterprets bit patterns, which only round-trips when the
// host floats are IEEE-754 binary32/binary64.
const _: () = assert!(
    f32::RADIX == 2
        && f32::MANTISSA_DIGITS == 24
        && f32::MAX_EXP == 128
        && f64::MANTISSA_DIGITS == 53
        && f64::MAX_EXP == 1024,
    "zakoio requires IEEE-754 floating point"
);

/// Whether the host stores multi-byte values least significant byte first.
pub const HOST_IS_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// Converts bytes in host order into wire order (most significant first).
#[inline(always)]
pub fn host_to_wire<const N: usize>(mut bytes: [u8; N]) -> [u8; N] {
    if HOST_IS_LITTLE_ENDIAN {
        bytes.reverse();
    }
    bytes
}

/// Converts bytes in wire order into host order.
///
/// Reversal is its own inverse, so this is the same step as
/// [`host_to_wire`].
#[inline(always)]
pub fn wire_to_host<const N: usize>(bytes: [u8; N]) -> [u8; N] {
    host_to_wire(bytes)
}
