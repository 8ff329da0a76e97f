// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine transforms applied to fonts.

/// A 2D affine transform.
///
/// The linear part (`xx`, `xy`, `yx`, `yy`) takes part in fontset and font
/// identity. The translation does not.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Matrix {
    /// Scale in the x direction.
    pub xx: f64,
    /// Shear of x by y.
    pub xy: f64,
    /// Shear of y by x.
    pub yx: f64,
    /// Scale in the y direction.
    pub yy: f64,
    /// Translation in the x direction.
    pub x0: f64,
    /// Translation in the y direction.
    pub y0: f64,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Shear used for synthesized italic faces.
    pub const SYNTHETIC_ITALIC: Self = Self::new(1.0, 0.2, 0.0, 1.0);

    /// Creates a transform with the given linear part and no translation.
    pub const fn new(xx: f64, xy: f64, yx: f64, yy: f64) -> Self {
        Self {
            xx,
            xy,
            yx,
            yy,
            x0: 0.0,
            y0: 0.0,
        }
    }

    /// Creates a uniform scale.
    pub const fn scale(factor: f64) -> Self {
        Self::new(factor, 0.0, 0.0, factor)
    }

    /// Returns true if the linear part is the identity.
    pub fn is_identity(&self) -> bool {
        self.linear_bits() == Self::IDENTITY.linear_bits()
    }

    /// Returns the transform that applies `other` first and then `self`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            xx: self.xx * other.xx + self.xy * other.yx,
            xy: self.xx * other.xy + self.xy * other.yy,
            yx: self.yx * other.xx + self.yy * other.yx,
            yy: self.yx * other.xy + self.yy * other.yy,
            x0: self.xx * other.x0 + self.xy * other.y0 + self.x0,
            y0: self.yx * other.x0 + self.yy * other.y0 + self.y0,
        }
    }

    /// Returns the factor by which font sizes are scaled in the vertical
    /// direction.
    pub fn font_scale_factor(&self) -> f64 {
        let det = self.xx * self.yy - self.yx * self.xy;
        let x = (self.xx * self.xx + self.yx * self.yx).sqrt();
        if x == 0.0 {
            return 0.0;
        }
        det.abs() / x
    }

    /// Returns the bit patterns of the linear part, used for identity.
    pub(crate) fn linear_bits(&self) -> [u64; 4] {
        [
            self.xx.to_bits(),
            self.xy.to_bits(),
            self.yx.to_bits(),
            self.yy.to_bits(),
        ]
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}
