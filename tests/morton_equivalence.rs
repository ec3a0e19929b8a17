// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Morton kernels against a bit-by-bit reference, and parallel against serial ordering

use coremesh::morton::{self, portable, MortonCode};
use coremesh::{ElementType, PolytopeSoup};
use nalgebra::Point3;
use proptest::prelude::*;
use rayon::prelude::*;

/// Spread the low `bits` bits of `x` so bit `i` lands on bit `i * stride`
fn reference_deposit(x: u64, bits: u32, stride: u32) -> u64 {
    (0..bits).fold(0, |acc, i| acc | (((x >> i) & 1) << (i * stride)))
}

fn reference_extract(code: u64, bits: u32, stride: u32) -> u64 {
    (0..bits).fold(0, |acc, i| acc | (((code >> (i * stride)) & 1) << i))
}

const MASK_2D_U32: u32 = 0x5555_5555;
const MASK_3D_U32: u32 = 0x0924_9249;
const MASK_2D_U64: u64 = 0x5555_5555_5555_5555;
const MASK_3D_U64: u64 = 0x1249_2492_4924_9249;

#[test]
fn test_portable_u32_kernels_exhaustive() {
    for x in 0..=u32::MAX_2D {
        let expected = reference_deposit(x as u64, 16, 2) as u32;
        assert_eq!(portable::deposit_2d_u32(x), expected, "x = {x}");
        assert_eq!(portable::extract_2d_u32(expected), x);
        assert_eq!(portable::extract_2d_u32(expected | !MASK_2D_U32), x);
    }
    for x in 0..=u32::MAX_3D {
        let expected = reference_deposit(x as u64, 10, 3) as u32;
        assert_eq!(portable::deposit_3d_u32(x), expected, "x = {x}");
        assert_eq!(portable::extract_3d_u32(expected), x);
        assert_eq!(portable::extract_3d_u32(expected | !MASK_3D_U32), x);
    }
}

#[test]
fn test_portable_u64_3d_kernels_exhaustive() {
    for x in 0..=u64::MAX_3D {
        let expected = reference_deposit(x, 21, 3);
        assert_eq!(portable::deposit_3d_u64(x), expected, "x = {x}");
        assert_eq!(portable::extract_3d_u64(expected), x);
        assert_eq!(portable::extract_3d_u64(expected | !MASK_3D_U64), x);
    }
}

/// Run `check` over `0..=max` in parallel chunks
fn par_exhaustive(max: u64, check: impl Fn(u64) + Sync) {
    const CHUNK: u64 = 1 << 20;
    (0..=max / CHUNK).into_par_iter().for_each(|chunk| {
        let start = chunk * CHUNK;
        let end = (start + CHUNK - 1).min(max);
        for x in start..=end {
            check(x);
        }
    });
}

#[test]
#[ignore = "2^32 inputs; run with --ignored"]
fn test_portable_u64_2d_kernels_exhaustive() {
    par_exhaustive(u64::MAX_2D, |x| {
        let expected = reference_deposit(x, 32, 2);
        assert_eq!(portable::deposit_2d_u64(x), expected, "x = {x}");
        assert_eq!(portable::extract_2d_u64(expected), x);
        assert_eq!(portable::extract_2d_u64(expected | !MASK_2D_U64), x);
    });
}

#[cfg(target_arch = "x86_64")]
mod bmi2_backend {
    use super::*;
    use coremesh::morton::bmi2;

    /// Fails loudly on CPUs without BMI2 instead of passing
    fn require_bmi2() {
        assert!(
            std::arch::is_x86_feature_detected!("bmi2"),
            "this CPU lacks BMI2; the BMI2 kernels cannot be compared"
        );
    }

    // The BMI2 backend is only selected when the crate is compiled for it. Elsewhere these
    // tests are reported as ignored; `--ignored` still runs them on a BMI2-capable CPU.
    #[test]
    #[cfg_attr(
        not(target_feature = "bmi2"),
        ignore = "BMI2 backend not compiled in; build with -C target-feature=+bmi2"
    )]
    fn test_bmi2_u32_kernels_exhaustive() {
        require_bmi2();
        for x in 0..=u32::MAX_2D {
            let code = portable::deposit_2d_u32(x);
            // SAFETY: BMI2 support was checked above.
            unsafe {
                assert_eq!(bmi2::deposit_2d_u32(x), code, "x = {x}");
                assert_eq!(bmi2::extract_2d_u32(code), x);
                assert_eq!(bmi2::extract_2d_u32(code | !MASK_2D_U32), x);
            }
        }
        for x in 0..=u32::MAX_3D {
            let code = portable::deposit_3d_u32(x);
            // SAFETY: BMI2 support was checked above.
            unsafe {
                assert_eq!(bmi2::deposit_3d_u32(x), code, "x = {x}");
                assert_eq!(bmi2::extract_3d_u32(code), x);
                assert_eq!(bmi2::extract_3d_u32(code | !MASK_3D_U32), x);
            }
        }
    }

    #[test]
    #[cfg_attr(
        not(target_feature = "bmi2"),
        ignore = "BMI2 backend not compiled in; build with -C target-feature=+bmi2"
    )]
    fn test_bmi2_u64_3d_kernels_exhaustive() {
        require_bmi2();
        for x in 0..=u64::MAX_3D {
            let code = portable::deposit_3d_u64(x);
            // SAFETY: BMI2 support was checked above.
            unsafe {
                assert_eq!(bmi2::deposit_3d_u64(x), code, "x = {x}");
                assert_eq!(bmi2::extract_3d_u64(code), x);
                assert_eq!(bmi2::extract_3d_u64(code | !MASK_3D_U64), x);
            }
        }
    }

    #[test]
    #[ignore = "2^32 inputs; run with --ignored on a BMI2-capable CPU"]
    fn test_bmi2_u64_2d_kernels_exhaustive() {
        require_bmi2();
        par_exhaustive(u64::MAX_2D, |x| {
            let code = portable::deposit_2d_u64(x);
            // SAFETY: BMI2 support was checked before the parallel sweep.
            unsafe {
                assert_eq!(bmi2::deposit_2d_u64(x), code, "x = {x}");
                assert_eq!(bmi2::extract_2d_u64(code), x);
                assert_eq!(bmi2::extract_2d_u64(code | !MASK_2D_U64), x);
            }
        });
    }
}

fn soup_from_points(points: &[(f64, f64, f64)]) -> PolytopeSoup {
    let mut soup = PolytopeSoup::new();
    for &(x, y, z) in points {
        soup.add_vertex(x, y, z);
    }
    for i in 0..points.len() {
        soup.add_element(ElementType::Vertex, &[i]).unwrap();
    }
    soup
}

proptest! {
    #[test]
    fn prop_u64_kernels_match_reference(x in 0u64..=u64::MAX_2D, y in 0u64..=u64::MAX_3D) {
        prop_assert_eq!(portable::deposit_2d_u64(x), reference_deposit(x, 32, 2));
        prop_assert_eq!(portable::deposit_3d_u64(y), reference_deposit(y, 21, 3));
        let code = u64::encode_3d(y, y >> 1, y >> 2);
        prop_assert_eq!(reference_extract(code, 21, 3), y);
        prop_assert_eq!(code.decode_3d(), (y, y >> 1, y >> 2));
    }

    #[test]
    fn prop_encode_decode_2d(x in 0u32..=u32::MAX_2D, y in 0u32..=u32::MAX_2D) {
        prop_assert_eq!(u32::encode_2d(x, y).decode_2d(), (x, y));
    }

    #[test]
    fn prop_parallel_permutation_matches_serial(
        points in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0, -1.0f64..1.0), 0..300)
    ) {
        let points: Vec<Point3<f64>> =
            points.into_iter().map(|(x, y, z)| Point3::new(x, y, z)).collect();
        let serial = morton::sort_permutation::<u64>(&points);
        let parallel = morton::par_sort_permutation::<u64>(&points);
        prop_assert_eq!(&serial, &parallel);

        // Bijection
        let mut seen = serial.clone();
        seen.sort_unstable();
        prop_assert!(seen.iter().copied().eq(0..points.len()));
    }

    #[test]
    fn prop_soup_sort_is_idempotent_and_parallel_safe(
        points in prop::collection::vec((0.0f64..10.0, 0.0f64..10.0, 0.0f64..10.0), 1..120)
    ) {
        let soup = soup_from_points(&points);

        let mut serial = soup.clone();
        serial.morton_sort_vertices().unwrap();
        serial.morton_sort_elements().unwrap();
        let mut parallel = soup.clone();
        parallel.par_morton_sort_vertices().unwrap();
        parallel.par_morton_sort_elements().unwrap();
        prop_assert_eq!(&serial, &parallel);

        let mut again = serial.clone();
        again.morton_sort_vertices().unwrap();
        again.morton_sort_elements().unwrap();
        prop_assert_eq!(&again, &serial);

        for element in serial.elements() {
            prop_assert!(element.vertices().iter().all(|&v| v < serial.num_vertices()));
        }
    }
}
