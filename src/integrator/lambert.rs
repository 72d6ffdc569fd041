use nalgebra::{Point3, Unit, Vector3};

use crate::{
    camera::{Camera, Sample},
    canvas::Color,
    integrator::{Integrator, IntegratorBuilder},
    march::{self, MarchConfig},
    ray::Ray,
    scene::{NodeId, Scene},
};

/// Ambient term added to the illumination before tinting.
const AMBIENT: f32 = 0.2;

/// Attenuation for points whose path to the light is blocked.
const SHADOW: f32 = 0.1;

/// Boost for points the light reaches unobstructed. This deliberately pushes
/// bright spots past 1; they only saturate at the 8-bit conversion.
const LIT: f32 = 1.4;

/// Diffuse shading from a single point light, with hard shadows.
pub struct Lambert {
    camera: Camera,
    config: MarchConfig,
    light: Point3<f32>,
    tint: Color,
}

/// The Lambertian light falling on `point`, scaled by a shadow march toward
/// the light. The shadow ray starts just off the surface so it doesn't hit
/// the surface it left from, and the point counts as occluded when the march
/// lands short of the light.
pub fn illumination(
    config: &MarchConfig,
    scene: &Scene,
    root: NodeId,
    light: &Point3<f32>,
    point: &Point3<f32>,
    normal: &Unit<Vector3<f32>>,
) -> f32 {
    let to_light = light - point;
    let dist_to_light = to_light.norm();
    let lambert = normal.dot(&to_light.normalize()).clamp(0., 1.);

    let start = point + normal.as_ref() * (2. * config.epsilon);
    let shadow = march::march(
        config,
        scene,
        root,
        &Ray::new(start, Unit::new_normalize(to_light)),
    );

    if shadow.hit(config) && (shadow.position - start).norm() < dist_to_light {
        lambert * SHADOW
    } else {
        lambert * LIT
    }
}

impl Integrator for Lambert {
    fn luminance(&mut self, scene: &Scene, root: NodeId, sample: &Sample) -> Color {
        let ray = self.camera.generate_ray(sample.clone());
        let res = march::march(&self.config, scene, root, &ray);

        if res.hit(&self.config) {
            let normal = march::normal(scene, root, &res.position, self.config.epsilon);
            let illum =
                illumination(&self.config, scene, root, &self.light, &res.position, &normal);
            (illum + AMBIENT) * &self.tint
        } else {
            Color::black()
        }
    }
}

pub struct LambertBuilder {
    camera: Camera,
    config: MarchConfig,
    light: Point3<f32>,
    tint: Color,
}

impl LambertBuilder {
    pub fn new(camera: Camera, config: MarchConfig, light: Point3<f32>, tint: Color) -> Self {
        Self {
            camera,
            config,
            light,
            tint,
        }
    }
}

impl IntegratorBuilder for LambertBuilder {
    fn build(&self) -> Box<dyn Integrator> {
        Box::new(Lambert {
            camera: self.camera.clone(),
            config: self.config.clone(),
            light: self.light,
            tint: self.tint.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_illumination_facing() {
        let mut scene = Scene::default();
        let root = scene.plane(0.);
        let config = MarchConfig {
            max_steps: 100,
            epsilon: 0.01,
        };
        let up = Unit::new_normalize(Vector3::new(0., 1., 0.));

        // light directly overhead, nothing in the way
        let overhead = Point3::new(0., 4., 0.);
        let lit = illumination(&config, &scene, root, &overhead, &Point3::origin(), &up);
        assert_abs_diff_eq!(lit, LIT, epsilon = 1e-4);

        // a light below the horizon contributes nothing
        let below = Point3::new(0., -4., 0.);
        let dark = illumination(&config, &scene, root, &below, &Point3::origin(), &up);
        assert_eq!(dark, 0.);
    }

    #[test]
    fn test_illumination_shadow() {
        let mut scene = Scene::default();
        let ground = scene.plane(0.);
        let blocker = scene.sphere(Point3::new(2., 1., 0.), 0.8);
        let root = scene.union(vec![ground, blocker]);

        let config = MarchConfig {
            max_steps: 100,
            epsilon: 0.01,
        };
        let light = Point3::new(4., 4., 0.);
        let up = Unit::new_normalize(Vector3::new(0., 1., 0.));

        // the sphere sits between the origin and the light
        let point = Point3::origin();
        let shaded = illumination(&config, &scene, root, &light, &point, &up);
        let lambert = (light - point).normalize().y;
        assert_abs_diff_eq!(shaded, lambert * SHADOW, epsilon = 1e-4);

        // while this point sees the light past the sphere's edge
        let point = Point3::new(-2., 0., -2.);
        let lit = illumination(&config, &scene, root, &light, &point, &up);
        let lambert = (light - point).normalize().y;
        assert_abs_diff_eq!(lit, lambert * LIT, epsilon = 1e-4);
    }

    #[test]
    fn test_luminance_tint() {
        let mut scene = Scene::default();
        let root = scene.plane(0.);

        let info = crate::camera::CanvasInfo::new(100, 100);
        let camera = Camera::new(&info, Point3::new(0., 3., 0.1), Point3::origin(), 1.);
        let config = MarchConfig {
            max_steps: 100,
            epsilon: 0.01,
        };
        let builder = LambertBuilder::new(
            camera,
            config,
            Point3::new(0., 4., 0.),
            Color::new(0.4, 0.5, 0.6),
        );
        let mut integrator = builder.build();

        // looking straight down at a lit plane: every channel carries the
        // tint scaled by the same illumination
        let color = integrator.luminance(&scene, root, &Sample::new(50., 50.));
        assert!(color.r > 0.);
        assert_abs_diff_eq!(color.g / color.r, 0.5 / 0.4, epsilon = 1e-3);
        assert_abs_diff_eq!(color.b / color.r, 0.6 / 0.4, epsilon = 1e-3);
    }
}
