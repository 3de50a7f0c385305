use std::fmt::Debug;

use crate::endian::{host_to_wire, wire_to_host};

/// Fixed-width value with a big-endian wire encoding.
///
/// Implemented for every integer width from 8 to 64 bits, signed and unsigned,
/// and for `f32`/`f64`. The encoding never depends on the host byte order, so
/// these conversions can also be used to build records in memory that match
/// what [`BinaryStream`](crate::BinaryStream) writes.
pub trait Primitive: Sized + Copy + Debug + Send + Sync + 'static {
    /// Number of bytes on the wire.
    const SIZE: usize;

    /// Wire representation, exactly `SIZE` bytes.
    type Wire: AsRef<[u8]> + AsMut<[u8]> + Default + Copy;

    /// Encodes the value, most significant byte first.
    fn to_wire(self) -> Self::Wire;

    /// Decodes a value from its wire bytes.
    fn from_wire(bytes: Self::Wire) -> Self;
}

// Assembled byte by byte so the result is independent of host layout.
macro_rules! impl_primitive_for_unsigned {
    ($($t:ty),*) => {
        $(
            impl Primitive for $t {
                const SIZE: usize = size_of::<$t>();
                type Wire = [u8; size_of::<$t>()];

                #[inline]
                fn to_wire(self) -> Self::Wire {
                    let mut bytes = [0u8; size_of::<$t>()];
                    for (i, byte) in bytes.iter_mut().enumerate() {
                        let shift = 8 * (Self::SIZE - 1 - i);
                        *byte = ((self >> shift) & 0xff) as u8;
                    }
                    bytes
                }

                #[inline]
                fn from_wire(bytes: Self::Wire) -> Self {
                    bytes.iter().enumerate().fold(0, |num, (i, &byte)| {
                        let shift = 8 * (Self::SIZE - 1 - i);
                        num | (<$t>::from(byte) << shift)
                    })
                }
            }
        )*
    };
}

// Signed values travel as the unsigned bit pattern of the same width.
macro_rules! impl_primitive_for_signed {
    ($($t:ty => $u:ty),*) => {
        $(
            impl Primitive for $t {
                const SIZE: usize = <$u as Primitive>::SIZE;
                type Wire = <$u as Primitive>::Wire;

                #[inline]
                fn to_wire(self) -> Self::Wire {
                    (self as $u).to_wire()
                }

                #[inline]
                fn from_wire(bytes: Self::Wire) -> Self {
                    <$u>::from_wire(bytes) as $t
                }
            }
        )*
    };
}

macro_rules! impl_primitive_for_float {
    ($($t:ty => $bits:ty),*) => {
        $(
            impl Primitive for $t {
                const SIZE: usize = size_of::<$t>();
                type Wire = [u8; size_of::<$t>()];

                #[inline]
                fn to_wire(self) -> Self::Wire {
                    host_to_wire(self.to_bits().to_ne_bytes())
                }

                #[inline]
                fn from_wire(bytes: Self::Wire) -> Self {
                    <$t>::from_bits(<$bits>::from_ne_bytes(wire_to_host(bytes)))
                }
            }
        )*
    };
}

impl_primitive_for_unsigned!(u8, u16, u32, u64);
impl_primitive_for_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);
impl_primitive_for_float!(f32 => u32, f64 => u64);
