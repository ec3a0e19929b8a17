// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Morton (Z-order) codes
//!
//! Codes interleave the bits of per-axis fixed-point coordinates: x lands on bit 0, y on
//! bit 1 and (in 3D) z on bit 2 of every group. Normalized coordinates in `[0, 1]` map onto
//! `0..=MAX_2D` or `0..=MAX_3D` per axis.
//!
//! Two backends provide the bit deposit/extract kernels: BMI2 `pdep`/`pext` when the build
//! target enables `bmi2`, and a portable shift-and-mask emulation otherwise. Both produce
//! identical codes.

#[cfg(target_arch = "x86_64")]
pub mod bmi2;
pub mod portable;
mod sort;

pub use sort::{
    invert_permutation, morton_codes, par_morton_codes, par_sort_permutation, sort_permutation,
    UnitMapper,
};

#[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
mod backend {
    macro_rules! forward {
        ($($name:ident: $ty:ty),* $(,)?) => {
            $(
                #[inline]
                pub fn $name(x: $ty) -> $ty {
                    // SAFETY: this module is only compiled when the target enables BMI2.
                    unsafe { super::bmi2::$name(x) }
                }
            )*
        };
    }

    forward!(
        deposit_2d_u32: u32,
        extract_2d_u32: u32,
        deposit_3d_u32: u32,
        extract_3d_u32: u32,
        deposit_2d_u64: u64,
        extract_2d_u64: u64,
        deposit_3d_u64: u64,
        extract_3d_u64: u64,
    );
}

#[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
use portable as backend;

/// Unsigned integer usable as a Morton code
pub trait MortonCode: Copy + Ord + Default + Send + Sync + std::fmt::Debug + 'static {
    /// Largest per-axis coordinate of a 2D code
    const MAX_2D: Self;
    /// Largest per-axis coordinate of a 3D code
    const MAX_3D: Self;

    fn encode_2d(x: Self, y: Self) -> Self;
    fn decode_2d(self) -> (Self, Self);
    fn encode_3d(x: Self, y: Self, z: Self) -> Self;
    fn decode_3d(self) -> (Self, Self, Self);

    /// Fixed-point coordinate for `t` in `[0, 1]`, truncating toward zero
    fn from_unit(t: f64, max: Self) -> Self;
    /// Inverse of [`MortonCode::from_unit`] up to truncation
    fn to_unit(self, max: Self) -> f64;
}

macro_rules! impl_morton_code {
    ($ty:ty, $d2:ident, $e2:ident, $d3:ident, $e3:ident, $max2:expr, $max3:expr) => {
        impl MortonCode for $ty {
            const MAX_2D: Self = $max2;
            const MAX_3D: Self = $max3;

            #[inline]
            fn encode_2d(x: Self, y: Self) -> Self {
                backend::$d2(x) | (backend::$d2(y) << 1)
            }

            #[inline]
            fn decode_2d(self) -> (Self, Self) {
                (backend::$e2(self), backend::$e2(self >> 1))
            }

            #[inline]
            fn encode_3d(x: Self, y: Self, z: Self) -> Self {
                backend::$d3(x) | (backend::$d3(y) << 1) | (backend::$d3(z) << 2)
            }

            #[inline]
            fn decode_3d(self) -> (Self, Self, Self) {
                (
                    backend::$e3(self),
                    backend::$e3(self >> 1),
                    backend::$e3(self >> 2),
                )
            }

            #[inline]
            fn from_unit(t: f64, max: Self) -> Self {
                debug_assert!((0.0..=1.0).contains(&t), "coordinate {t} outside [0, 1]");
                (t.clamp(0.0, 1.0) * max as f64) as $ty
            }

            #[inline]
            fn to_unit(self, max: Self) -> f64 {
                self as f64 / max as f64
            }
        }
    };
}

impl_morton_code!(
    u32,
    deposit_2d_u32,
    extract_2d_u32,
    deposit_3d_u32,
    extract_3d_u32,
    0x0000_ffff,
    0x0000_03ff
);
impl_morton_code!(
    u64,
    deposit_2d_u64,
    extract_2d_u64,
    deposit_3d_u64,
    extract_3d_u64,
    0x0000_0000_ffff_ffff,
    0x0000_0000_001f_ffff
);

/// Encode a point of the unit square
pub fn encode_unit_2d<U: MortonCode>(x: f64, y: f64) -> U {
    U::encode_2d(U::from_unit(x, U::MAX_2D), U::from_unit(y, U::MAX_2D))
}

/// Decode to the lower corner of the code's cell in the unit square
pub fn decode_unit_2d<U: MortonCode>(code: U) -> (f64, f64) {
    let (x, y) = code.decode_2d();
    (x.to_unit(U::MAX_2D), y.to_unit(U::MAX_2D))
}

/// Encode a point of the unit cube
pub fn encode_unit_3d<U: MortonCode>(x: f64, y: f64, z: f64) -> U {
    U::encode_3d(
        U::from_unit(x, U::MAX_3D),
        U::from_unit(y, U::MAX_3D),
        U::from_unit(z, U::MAX_3D),
    )
}

/// Decode to the lower corner of the code's cell in the unit cube
pub fn decode_unit_3d<U: MortonCode>(code: U) -> (f64, f64, f64) {
    let (x, y, z) = code.decode_3d();
    (
        x.to_unit(U::MAX_3D),
        y.to_unit(U::MAX_3D),
        z.to_unit(U::MAX_3D),
    )
}
