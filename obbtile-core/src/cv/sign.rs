// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use num_traits::Float;

use crate::constant::OVERLAP_EPS;

/// Sign of a value after snapping near-zero values to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    /// Integer form of the sign (-1, 0, or 1)
    pub fn as_i8(self) -> i8 {
        match self {
            Sign::Negative => -1,
            Sign::Zero => 0,
            Sign::Positive => 1,
        }
    }

    /// Check if two non-zero signs disagree
    pub fn opposes(self, other: Sign) -> bool {
        self.as_i8() * other.as_i8() == -1
    }
}

/// Classify the sign of a value with a tolerance band around zero
///
/// # Arguments
///
/// * `value` - Value to classify
/// * `epsilon` - Values in `[-epsilon, epsilon]` are treated as zero
///
/// # Examples
///
/// ```
/// use obbtile_core::cv::sign::{Sign, classify_sign};
///
/// assert_eq!(classify_sign(0.5_f64, 1e-6), Sign::Positive);
/// assert_eq!(classify_sign(-0.5_f32, 1e-6), Sign::Negative);
/// assert_eq!(classify_sign(1e-9_f64, 1e-6), Sign::Zero);
/// ```
pub fn classify_sign<T: Float>(value: T, epsilon: T) -> Sign {
    if value > epsilon {
        Sign::Positive
    } else if value < -epsilon {
        Sign::Negative
    } else {
        Sign::Zero
    }
}

/// Clipping tolerance converted to the working float type
pub fn overlap_eps<T: Float>() -> T {
    T::from(OVERLAP_EPS).unwrap_or_else(T::epsilon)
}

/// Classify a value with the shared clipping tolerance
pub fn sig<T: Float>(value: T) -> Sign {
    classify_sign(value, overlap_eps())
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_classify_sign_band() {
        assert_eq!(classify_sign(1e-6_f64, 1e-6), Sign::Zero);
        assert_eq!(classify_sign(-1e-6_f64, 1e-6), Sign::Zero);
        assert_eq!(classify_sign(1.1e-6_f64, 1e-6), Sign::Positive);
        assert_eq!(classify_sign(-1.1e-6_f64, 1e-6), Sign::Negative);
    }

    #[test]
    fn test_sig_f32_f64() {
        assert_eq!(sig(3.0_f32), Sign::Positive);
        assert_eq!(sig(-3.0_f64), Sign::Negative);
        assert_eq!(sig(0.0_f32), Sign::Zero);
    }

    #[test]
    fn test_opposes() {
        assert!(Sign::Positive.opposes(Sign::Negative));
        assert!(!Sign::Positive.opposes(Sign::Positive));
        assert!(!Sign::Zero.opposes(Sign::Negative));
    }
}
