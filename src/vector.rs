use std::ops::{Add, Div, Index, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SingularKinematics;

/// Energy-momentum four-vector (E, px, py, pz)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FourMomentum([f64; 4]);

impl FourMomentum {
    pub fn new(e: f64, px: f64, py: f64, pz: f64) -> Self {
        Self([e, px, py, pz])
    }

    pub fn e(&self) -> f64 {
        self.0[0]
    }

    pub fn px(&self) -> f64 {
        self.0[1]
    }

    pub fn py(&self) -> f64 {
        self.0[2]
    }

    pub fn pz(&self) -> f64 {
        self.0[3]
    }

    /// The spatial components (px, py, pz)
    pub fn spatial(&self) -> ThreeVector {
        ThreeVector([self.px(), self.py(), self.pz()])
    }

    /// Invariant mass squared, p·p
    pub fn m2(&self) -> f64 {
        minkowski_dot(self, self)
    }
}

impl From<[f64; 4]> for FourMomentum {
    fn from(p: [f64; 4]) -> Self {
        Self(p)
    }
}

impl Index<usize> for FourMomentum {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

impl Add for FourMomentum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl Sub for FourMomentum {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

/// Spatial three-vector
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ThreeVector([f64; 3]);

impl ThreeVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// See [unit]
    pub fn unit(&self) -> Result<Self, SingularKinematics> {
        unit(self)
    }
}

impl From<[f64; 3]> for ThreeVector {
    fn from(v: [f64; 3]) -> Self {
        Self(v)
    }
}

impl Index<usize> for ThreeVector {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

impl Add for ThreeVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl Sub for ThreeVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl Neg for ThreeVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.map(|x| -x))
    }
}

impl Mul<f64> for ThreeVector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0.map(|x| x * rhs))
    }
}

impl Div<f64> for ThreeVector {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self(self.0.map(|x| x / rhs))
    }
}

impl Mul<ThreeVector> for f64 {
    type Output = ThreeVector;

    fn mul(self, rhs: ThreeVector) -> ThreeVector {
        rhs * self
    }
}

/// Minkowski product E1·E2 − p1·p2
///
/// NaN components propagate into the result.
pub fn minkowski_dot(p1: &FourMomentum, p2: &FourMomentum) -> f64 {
    p1.e() * p2.e() - p1.spatial().dot(&p2.spatial())
}

/// Normalise `v` to unit length
///
/// A vector of length zero has no direction. Instead of dividing by
/// zero this returns [SingularKinematics::ZeroMomentum], as it does
/// for any other input where the result would not be finite.
pub fn unit(v: &ThreeVector) -> Result<ThreeVector, SingularKinematics> {
    let norm = v.norm();
    let res = *v / norm;
    if norm == 0. || !res.0.iter().all(|x| x.is_finite()) {
        return Err(SingularKinematics::ZeroMomentum);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn on_shell() {
        // (E, px, py, pz, M)
        let fixtures = [
            [13., 0., 3., 4., 12.],
            [5., 3., 4., 0., 0.],
            [91.188, 0., 0., 0., 91.188],
            [1133.5159684, 37.283715118, 21.98166528, -1132.689358, 0.],
        ];
        for [e, px, py, pz, m] in fixtures {
            let p = FourMomentum::new(e, px, py, pz);
            assert_relative_eq!(minkowski_dot(&p, &p), m * m, epsilon = 1e-3);
        }
    }

    #[test]
    fn dot_is_symmetric() {
        let p = FourMomentum::new(10., 1., 2., 3.);
        let q = FourMomentum::new(7., -1., 0.5, 2.);
        assert_eq!(minkowski_dot(&p, &q), minkowski_dot(&q, &p));
        assert_eq!(minkowski_dot(&p, &q), 70. - (-1. + 1. + 6.));
    }

    #[test]
    fn nan_propagates() {
        let p = FourMomentum::new(f64::NAN, 0., 0., 0.);
        assert!(minkowski_dot(&p, &p).is_nan());
    }

    #[test]
    fn unit_norm() {
        for v in [[1., 0., 0.], [3., 4., 0.], [-1e-8, 2e-8, 5e-9], [1e10, -3e12, 7.]] {
            let u = unit(&ThreeVector::from(v)).unwrap();
            assert_relative_eq!(u.norm(), 1., epsilon = 1e-12);
        }
        let u = ThreeVector::new(0., 3., 4.).unit().unwrap();
        assert_relative_eq!(u.y(), 0.6);
        assert_relative_eq!(u.z(), 0.8);
    }

    #[test]
    fn unit_zero() {
        assert_eq!(unit(&ThreeVector::default()), Err(SingularKinematics::ZeroMomentum));
    }

    #[test]
    fn sum() {
        let p = FourMomentum::new(5., 3., 4., 0.) + FourMomentum::new(5., -3., -4., 0.);
        assert_eq!(p, FourMomentum::new(10., 0., 0., 0.));
        assert_eq!(p.m2(), 100.);
        let v = ThreeVector::new(1., 2., 3.) - 2. * ThreeVector::new(1., 1., 1.);
        assert_eq!(v, ThreeVector::new(-1., 0., 1.));
        assert_eq!(-v, ThreeVector::new(1., 0., -1.));
    }
}
