use nalgebra::{Point2, Point3, Unit, Vector3};

use crate::{canvas::Canvas, ray::Ray};

#[derive(Debug, Clone)]
pub struct CanvasInfo {
    /// The width in pixels of the canvas.
    pub width: u32,

    /// The height in pixels of the canvas.
    pub height: u32,

    /// The aspect ratio of a single pixel, usually 1.0.
    pub pixel_aspect_ratio: f32,
}

impl CanvasInfo {
    /// Create a new [`CanvasInfo`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_aspect_ratio: 1.,
        }
    }

    /// Set the pixel aspect ratio. Useful when the target is a terminal,
    /// whose character cells are around twice as tall as they are wide.
    pub fn with_pixel_aspect_ratio(mut self, ratio: f32) -> Self {
        self.pixel_aspect_ratio = ratio;
        self
    }

    /// The aspect ratio of the canvas, as displayed.
    pub fn aspect_ratio(&self) -> f32 {
        (self.width as f32) * self.pixel_aspect_ratio / (self.height as f32)
    }

    /// Allocate a canvas of the described size.
    pub fn new_canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct Sample {
    /// The point on the film where the ray originates.
    pub film: Point2<f32>,
}

impl Sample {
    pub fn new(fx: f32, fy: f32) -> Self {
        Self {
            film: Point2::new(fx, fy),
        }
    }
}

/// A pinhole camera fixed at `position`, aimed at a target point.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    right: Unit<Vector3<f32>>,
    up: Unit<Vector3<f32>>,
    forward: Unit<Vector3<f32>>,
    zoom: f32,
    width: f32,
    height: f32,
    aspect: f32,
}

impl Camera {
    /// Aim a camera at `look_at`. `zoom` scales the focal length: rays leave
    /// the eye through a film plane `zoom` units down the view axis.
    pub fn new(info: &CanvasInfo, position: Point3<f32>, look_at: Point3<f32>, zoom: f32) -> Self {
        // The up reference deliberately points down; the second cross
        // product turns it the right way up again. Flipping its sign here
        // rotates the frame upside down.
        let back = (position - look_at).normalize();
        let tilt_right = back.cross(&Vector3::new(0., -1., 0.));
        let tilt_up = back.cross(&tilt_right);

        let forward = Unit::new_normalize(look_at - position);
        let right = Unit::new_normalize(forward.cross(&tilt_up));
        let up = Unit::new_unchecked(right.cross(forward.as_ref()));

        Self {
            position,
            right,
            up,
            forward,
            zoom,
            width: info.width as f32,
            height: info.height as f32,
            aspect: info.aspect_ratio(),
        }
    }

    /// Given a [`Sample`], generate a ray.
    pub fn generate_ray(&self, sample: Sample) -> Ray {
        let u = (2. * sample.film.x / self.width - 1.) * self.aspect;
        let v = 2. * sample.film.y / self.height - 1.;

        let dir = self.right.scale(u) + self.up.scale(v) + self.forward.scale(self.zoom);
        Ray::new(self.position, Unit::new_normalize(dir))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_center_ray() {
        // the ray through the film center points straight at the target,
        // whatever the canvas shape
        for info in [
            CanvasInfo::new(800, 600),
            CanvasInfo::new(320, 240).with_pixel_aspect_ratio(0.5),
        ] {
            let eye = Point3::new(6., 6., 0.);
            let camera = Camera::new(&info, eye, Point3::origin(), 1.3);

            let sample = Sample::new(info.width as f32 / 2., info.height as f32 / 2.);
            let ray = camera.generate_ray(sample);
            let expected = Unit::new_normalize(Point3::origin() - eye);

            assert_eq!(ray.position, eye);
            assert_abs_diff_eq!(ray.direction.x, expected.x, epsilon = 1e-6);
            assert_abs_diff_eq!(ray.direction.y, expected.y, epsilon = 1e-6);
            assert_abs_diff_eq!(ray.direction.z, expected.z, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_basis_orientation() {
        let info = CanvasInfo::new(100, 100);
        let camera = Camera::new(&info, Point3::new(0., 0., 5.), Point3::origin(), 1.);

        // film x grows toward world +x, film y toward world +y
        let ray = camera.generate_ray(Sample::new(100., 50.));
        assert!(ray.direction.x > 0.);
        assert_abs_diff_eq!(ray.direction.y, 0., epsilon = 1e-6);

        let ray = camera.generate_ray(Sample::new(50., 100.));
        assert!(ray.direction.y > 0.);
        assert_abs_diff_eq!(ray.direction.x, 0., epsilon = 1e-6);
    }

    #[test]
    fn test_rays_are_unit_length() {
        let info = CanvasInfo::new(64, 48);
        let camera = Camera::new(&info, Point3::new(3., 2., -4.), Point3::origin(), 1.3);

        for (fx, fy) in [(0., 0.), (63.5, 0.5), (10., 47.), (32., 24.)] {
            let ray = camera.generate_ray(Sample::new(fx, fy));
            assert_abs_diff_eq!(ray.direction.norm(), 1., epsilon = 1e-6);
        }
    }
}
