use nalgebra::{Point3, Unit, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub position: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    /// Construct a new ray.
    pub fn new(position: Point3<f32>, direction: Unit<Vector3<f32>>) -> Ray {
        Ray {
            position,
            direction,
        }
    }

    /// Move the position of the ray along `direction` by `amount`.
    pub fn step(&mut self, amount: f32) {
        self.position += self.direction.scale(amount);
    }
}

#[test]
fn test_step() {
    let mut ray = Ray::new(
        Point3::new(1., 2., 3.),
        Unit::new_normalize(Vector3::new(0., 0., -1.)),
    );
    ray.step(0.5);
    ray.step(0.25);
    assert_eq!(ray.position, Point3::new(1., 2., 2.25));
}
