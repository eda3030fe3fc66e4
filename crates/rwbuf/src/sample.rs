// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Numeric element type a buffer can store.
///
/// `Default` is the zero sample used for padding and back-fill. Conversion
/// goes through `f64` and saturates on the way back.
pub trait Sample: Copy + Default + PartialEq + fmt::Debug + Send + 'static {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;

    /// Convert into another sample type.
    fn cast<U: Sample>(self) -> U {
        U::from_f64(self.to_f64())
    }
}

macro_rules! impl_sample {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_sample!(f32, f64, i8, i16, i32, i64, u8, u16, u32);
