use nalgebra::{Point3, Unit, Vector3};

use crate::{
    ray::Ray,
    scene::{Distance, NodeId, Scene},
};

/// The step budget and convergence threshold for a sphere-tracing march.
#[derive(Debug, Clone)]
pub struct MarchConfig {
    pub max_steps: u32,
    pub epsilon: f32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            max_steps: 250,
            epsilon: 0.001,
        }
    }
}

/// Where a march ended up: the last point reached, the field value there,
/// and the number of steps consumed getting there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    pub position: Point3<f32>,
    pub residual: Distance,
    pub steps: u32,
}

impl MarchResult {
    /// A march hits a surface when the field drops to the configured epsilon.
    #[inline]
    pub fn hit(&self, config: &MarchConfig) -> bool {
        self.residual.0 <= config.epsilon
    }
}

/// Sphere-trace a ray through the distance field rooted at `root`. The field
/// value at each point bounds the distance to the nearest surface, so it's
/// always safe to advance by that much. Rays that escape the scene keep
/// stepping by ever larger amounts until the budget runs out, and come back
/// as a miss with a residual above epsilon.
pub fn march(config: &MarchConfig, scene: &Scene, root: NodeId, origin: &Ray) -> MarchResult {
    let mut ray = origin.clone();
    let mut residual = Distance(f32::INFINITY);

    for step in 0..config.max_steps {
        residual = scene.distance(root, &ray.position);

        if residual.0 <= config.epsilon {
            return MarchResult {
                position: ray.position,
                residual,
                steps: step,
            };
        }

        ray.step(residual.0);
    }

    MarchResult {
        position: ray.position,
        residual,
        steps: config.max_steps,
    }
}

/// Estimate the surface normal at `point` from central differences of the
/// field, sampled `eps` along each axis. At singular points of the field the
/// gradient vanishes and the normalized result is NaN.
pub fn normal(scene: &Scene, root: NodeId, point: &Point3<f32>, eps: f32) -> Unit<Vector3<f32>> {
    let offset = Vector3::new(eps, 0., 0.);

    let dx = scene.distance(root, &(point + offset.xyy())).0
        - scene.distance(root, &(point - offset.xyy())).0;
    let dy = scene.distance(root, &(point + offset.yxy())).0
        - scene.distance(root, &(point - offset.yxy())).0;
    let dz = scene.distance(root, &(point + offset.yyx())).0
        - scene.distance(root, &(point - offset.yyx())).0;

    Unit::new_normalize(Vector3::new(dx, dy, dz))
}
