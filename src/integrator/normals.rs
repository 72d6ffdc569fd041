use crate::{
    camera::{Camera, Sample},
    canvas::Color,
    integrator::{Integrator, IntegratorBuilder},
    march::{self, MarchConfig},
    scene::{NodeId, Scene},
};

/// Paints hits with the raw surface normal. The components are written out
/// as RGB without remapping, so faces turned along a negative axis clamp to
/// black on output.
pub struct Normals {
    camera: Camera,
    config: MarchConfig,
}

impl Integrator for Normals {
    fn luminance(&mut self, scene: &Scene, root: NodeId, sample: &Sample) -> Color {
        let ray = self.camera.generate_ray(sample.clone());
        let res = march::march(&self.config, scene, root, &ray);

        if res.hit(&self.config) {
            let normal = march::normal(scene, root, &res.position, self.config.epsilon);
            Color::new(normal.x, normal.y, normal.z)
        } else {
            Color::black()
        }
    }
}

pub struct NormalsBuilder {
    camera: Camera,
    config: MarchConfig,
}

impl NormalsBuilder {
    pub fn new(camera: Camera, config: MarchConfig) -> Self {
        Self { camera, config }
    }
}

impl IntegratorBuilder for NormalsBuilder {
    fn build(&self) -> Box<dyn Integrator> {
        Box::new(Normals {
            camera: self.camera.clone(),
            config: self.config.clone(),
        })
    }
}
