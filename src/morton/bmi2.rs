// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! BMI2 `pdep`/`pext` bit deposit/extract
//!
//! Every function here requires a CPU with BMI2. The masks cover exactly the per-axis
//! domain, so results match [`super::portable`] bit for bit.

use core::arch::x86_64::{_pdep_u32, _pdep_u64, _pext_u32, _pext_u64};

const MASK_2D_U32: u32 = 0x5555_5555;
const MASK_3D_U32: u32 = 0x0924_9249;
const MASK_2D_U64: u64 = 0x5555_5555_5555_5555;
const MASK_3D_U64: u64 = 0x1249_2492_4924_9249;

/// # Safety
/// The running CPU must support BMI2.
#[target_feature(enable = "bmi2")]
pub unsafe fn deposit_2d_u32(x: u32) -> u32 {
    _pdep_u32(x, MASK_2D_U32)
}

/// # Safety
/// The running CPU must support BMI2.
#[target_feature(enable = "bmi2")]
pub unsafe fn extract_2d_u32(code: u32) -> u32 {
    _pext_u32(code, MASK_2D_U32)
}

/// # Safety
/// The running CPU must support BMI2.
#[target_feature(enable = "bmi2")]
pub unsafe fn deposit_3d_u32(x: u32) -> u32 {
    _pdep_u32(x, MASK_3D_U32)
}

/// # Safety
/// The running CPU must support BMI2.
#[target_feature(enable = "bmi2")]
pub unsafe fn extract_3d_u32(code: u32) -> u32 {
    _pext_u32(code, MASK_3D_U32)
}

/// # Safety
/// The running CPU must support BMI2.
#[target_feature(enable = "bmi2")]
pub unsafe fn deposit_2d_u64(x: u64) -> u64 {
    _pdep_u64(x, MASK_2D_U64)
}

/// # Safety
/// The running CPU must support BMI2.
#[target_feature(enable = "bmi2")]
pub unsafe fn extract_2d_u64(code: u64) -> u64 {
    _pext_u64(code, MASK_2D_U64)
}

/// # Safety
/// The running CPU must support BMI2.
#[target_feature(enable = "bmi2")]
pub unsafe fn deposit_3d_u64(x: u64) -> u64 {
    _pdep_u64(x, MASK_3D_U64)
}

/// # Safety
/// The running CPU must support BMI2.
#[target_feature(enable = "bmi2")]
pub unsafe fn extract_3d_u64(code: u64) -> u64 {
    _pext_u64(code, MASK_3D_U64)
}
