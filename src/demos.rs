use clap::ValueEnum;
use nalgebra::{Point3, Vector3};

use crate::{
    camera::Camera,
    canvas::Color,
    frame::Orbit,
    integrator::{IntegratorBuilder, LambertBuilder, NormalsBuilder},
    march::MarchConfig,
    scene::{NodeId, Scene},
};

/// Half-length of the rod boxes. Stands in for an infinite extent; nothing
/// in the demo marches anywhere near this far.
const ROD_LENGTH: f32 = 1000.;

/// The bundled demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// An endless grid of hollowed spheres on a ground plane, painted with
    /// their surface normals.
    Tiled,

    /// A pair of spheres melting into three crossed rods, lit by a point
    /// light with hard shadows.
    Rods,
}

impl Demo {
    /// Build the demo's geometry, returning the root node.
    pub fn build(&self, scene: &mut Scene) -> NodeId {
        match self {
            Demo::Tiled => {
                let shell = scene.sphere(Point3::new(0., 1., 0.), 1.);
                let hollow = scene.sphere(Point3::new(0., 2., 0.), 0.8);
                let carved = scene.subtract(shell, hollow);
                let cap = scene.sphere(Point3::new(0., 2.3, 0.), 0.4);
                let ground = scene.plane(0.);
                let cell = scene.union(vec![carved, cap, ground]);
                scene.repeat(Vector3::new(3., 0., 3.), cell)
            }

            Demo::Rods => {
                let left = scene.sphere(Point3::new(-1.5, 0., 0.), 1.);
                let right = scene.sphere(Point3::new(1.5, 0., 0.), 1.);
                let x = scene.rect(Vector3::new(ROD_LENGTH, 0.3, 0.3));
                let y = scene.rect(Vector3::new(0.3, ROD_LENGTH, 0.3));
                let z = scene.rect(Vector3::new(0.3, 0.3, ROD_LENGTH));
                scene.smooth_union(0.5, &[left, right, x, y, z])
            }
        }
    }

    /// The marcher settings the demo was tuned with.
    pub fn march_config(&self) -> MarchConfig {
        match self {
            Demo::Tiled => MarchConfig {
                max_steps: 250,
                epsilon: 0.001,
            },

            Demo::Rods => MarchConfig {
                max_steps: 100,
                epsilon: 0.01,
            },
        }
    }

    /// The focal length scale applied to view rays.
    pub fn zoom(&self) -> f32 {
        match self {
            Demo::Tiled => 1.3,
            Demo::Rods => 1.,
        }
    }

    /// The flight path the camera follows.
    pub fn orbit(&self) -> Orbit {
        match self {
            Demo::Tiled => Orbit::Helix,
            Demo::Rods => Orbit::Ring,
        }
    }

    /// Both demos keep the camera aimed at the origin.
    pub fn look_at(&self) -> Point3<f32> {
        Point3::origin()
    }

    /// The shading model for the demo, wired up to `camera`.
    pub fn integrator(&self, camera: Camera) -> Box<dyn IntegratorBuilder> {
        match self {
            Demo::Tiled => Box::new(NormalsBuilder::new(camera, self.march_config())),

            Demo::Rods => Box::new(LambertBuilder::new(
                camera,
                self.march_config(),
                Point3::new(4., 4., 0.),
                Color::new(0.4, 0.5, 0.6),
            )),
        }
    }
}
