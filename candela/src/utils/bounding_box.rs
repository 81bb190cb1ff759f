use std::ops::{Add, AddAssign};

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().collect()
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Surface area; zero for an empty box so that cost terms over an empty
    /// side vanish instead of exploding.
    pub fn area(&self) -> f32 {
        if !self.is_set() {
            return 0.0;
        }

        let extent = self.extent();

        2.0 * (extent.x * extent.y + extent.y * extent.z + extent.z * extent.x)
    }

    pub fn contains(&self, other: &Self) -> bool {
        other.min.cmpge(self.min).all() && other.max.cmple(self.max).all()
    }

    pub fn is_set(&self) -> bool {
        self.min.x != Self::default().min.x
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::MAX, Vec3::MIN)
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.min = self.min.min(rhs);
        self.max = self.max.max(rhs);
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Vec3>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

impl Add<Self> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Self> for BoundingBox {
    fn add_assign(&mut self, rhs: Self) {
        if rhs.is_set() {
            *self += rhs.min;
            *self += rhs.max;
        }
    }
}

impl FromIterator<Self> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Self>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn growing() {
        let target: BoundingBox =
            [vec3(-1.0, 0.0, 0.0), vec3(2.0, 3.0, 1.0), vec3(0.0, -2.0, 0.5)]
                .into_iter()
                .collect();

        assert_eq!(vec3(-1.0, -2.0, 0.0), target.min());
        assert_eq!(vec3(2.0, 3.0, 1.0), target.max());
        assert_eq!(vec3(0.5, 0.5, 0.5), target.center());
    }

    #[test]
    fn area() {
        let target = BoundingBox::new(Vec3::ZERO, vec3(1.0, 2.0, 3.0));

        assert_relative_eq!(22.0, target.area());
        assert_relative_eq!(0.0, BoundingBox::default().area());
    }

    #[test]
    fn union_with_empty() {
        let target = BoundingBox::new(Vec3::ZERO, Vec3::ONE);

        assert_eq!(target, target + BoundingBox::default());
        assert_eq!(target, BoundingBox::default() + target);
    }

    #[test]
    fn containment() {
        let outer = BoundingBox::new(Vec3::ZERO, vec3(4.0, 4.0, 4.0));
        let inner = BoundingBox::new(Vec3::ONE, vec3(2.0, 2.0, 2.0));

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
