use nalgebra::Point2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use smallvec::SmallVec;

/// A buffer of film-space sample points for one pixel. Inline storage covers
/// the usual handful of samples without touching the heap.
pub type SampleBuf = SmallVec<[Point2<f32>; 8]>;

pub trait Sampler: Send {
    /// Make an independent copy of this sampler for another render worker.
    fn clone_sampler(&self) -> Self
    where
        Self: Sized;

    /// Fill `samples` with the sample points for the pixel whose bottom-left
    /// corner sits at `pixel` in film space.
    fn pixel_samples(&mut self, samples: &mut SampleBuf, pixel: &Point2<f32>);

    /// A size-hint for the number of samples computed for each pixel.
    fn samples_per_pixel(&self) -> usize;
}

/// Samples the center of each cell of a width x height sub-pixel grid.
#[derive(Debug, Clone)]
pub struct UniformSampler {
    grid: Point2<u32>,
    step: Point2<f32>,
}

impl UniformSampler {
    pub fn new(width: u32, height: u32) -> Self {
        let grid = Point2::new(width.max(1), height.max(1));
        Self {
            grid,
            step: Point2::new(1. / (grid.x as f32), 1. / (grid.y as f32)),
        }
    }
}

impl Sampler for UniformSampler {
    fn clone_sampler(&self) -> Self {
        self.clone()
    }

    fn pixel_samples(&mut self, samples: &mut SampleBuf, pixel: &Point2<f32>) {
        for row in 0..self.grid.y {
            for col in 0..self.grid.x {
                samples.push(Point2::new(
                    pixel.x + (col as f32 + 0.5) * self.step.x,
                    pixel.y + (row as f32 + 0.5) * self.step.y,
                ));
            }
        }
    }

    fn samples_per_pixel(&self) -> usize {
        (self.grid.x * self.grid.y) as usize
    }
}

/// Like [`UniformSampler`], but each sample lands at a random point of its
/// grid cell instead of the center.
#[derive(Debug)]
pub struct JitteredSampler {
    grid: Point2<u32>,
    step: Point2<f32>,
    rng: StdRng,
}

impl JitteredSampler {
    pub fn new(width: u32, height: u32) -> Self {
        let grid = Point2::new(width.max(1), height.max(1));
        Self {
            grid,
            step: Point2::new(1. / (grid.x as f32), 1. / (grid.y as f32)),
            rng: StdRng::from_entropy(),
        }
    }
}

impl Sampler for JitteredSampler {
    /// The copy gets a freshly seeded rng, so workers don't repeat each
    /// other's jitter.
    fn clone_sampler(&self) -> Self {
        Self {
            grid: self.grid,
            step: self.step,
            rng: StdRng::from_entropy(),
        }
    }

    fn pixel_samples(&mut self, samples: &mut SampleBuf, pixel: &Point2<f32>) {
        for row in 0..self.grid.y {
            for col in 0..self.grid.x {
                let jx: f32 = self.rng.gen();
                let jy: f32 = self.rng.gen();
                samples.push(Point2::new(
                    pixel.x + (col as f32 + jx) * self.step.x,
                    pixel.y + (row as f32 + jy) * self.step.y,
                ));
            }
        }
    }

    fn samples_per_pixel(&self) -> usize {
        (self.grid.x * self.grid.y) as usize
    }
}

#[test]
fn test_uniform_sampler() {
    let mut sampler = UniformSampler::new(1, 1);
    let mut samples = SampleBuf::new();
    sampler.pixel_samples(&mut samples, &Point2::new(0., 0.));
    assert_eq!(1, samples.len());
    assert_eq!(1, sampler.samples_per_pixel());
    assert_eq!(Point2::new(0.5, 0.5), samples[0]);

    let mut sampler = UniformSampler::new(2, 2);
    let mut samples = SampleBuf::new();
    sampler.pixel_samples(&mut samples, &Point2::new(3., 7.));
    assert_eq!(4, samples.len());
    assert_eq!(4, sampler.samples_per_pixel());
    assert_eq!(Point2::new(3.25, 7.25), samples[0]);
    assert_eq!(Point2::new(3.75, 7.75), samples[3]);
}

#[test]
fn test_jittered_sampler_in_bounds() {
    let mut sampler = JitteredSampler::new(3, 3);
    let mut samples = SampleBuf::new();
    sampler.pixel_samples(&mut samples, &Point2::new(2., 5.));

    assert_eq!(9, samples.len());
    for sample in &samples {
        assert!(sample.x >= 2. && sample.x < 3.);
        assert!(sample.y >= 5. && sample.y < 6.);
    }
}

#[test]
fn test_degenerate_grid() {
    // a zero-sided grid still produces one sample per pixel
    let mut sampler = UniformSampler::new(0, 0);
    let mut samples = SampleBuf::new();
    sampler.pixel_samples(&mut samples, &Point2::new(0., 0.));
    assert_eq!(1, samples.len());
    assert_eq!(1, sampler.samples_per_pixel());
}
