use crossbeam::{channel, thread};
use nalgebra::Point2;

use crate::{
    camera::{CanvasInfo, Sample},
    canvas::{Canvas, Color},
    sampler::{SampleBuf, Sampler},
    scene::{NodeId, Scene},
};

mod lambert;
mod normals;

pub use lambert::{illumination, LambertBuilder};
pub use normals::NormalsBuilder;

/// An individual tile in the rendering target.
#[derive(Debug)]
struct Tile {
    offset_x: u32,
    offset_y: u32,
    width: u32,
    height: u32,
}

/// An iterator for tiles in a rendering target.
#[derive(Debug)]
struct Tiles {
    width: u32,
    height: u32,
    chunks_x: u32,
    chunks_y: u32,
    x: u32,
    y: u32,
}

impl Tiles {
    fn new(width: u32, height: u32) -> Self {
        let chunks_x = (width + 15) / 16;
        let chunks_y = (height + 15) / 16;

        Self {
            width,
            height,
            chunks_x,
            chunks_y,
            x: 0,
            y: 0,
        }
    }

    fn total(&self) -> u32 {
        self.chunks_x * self.chunks_y
    }
}

impl Iterator for Tiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.chunks_x {
            self.x = 0;
            self.y += 1;
        }

        if self.y >= self.chunks_y {
            return None;
        }

        let offset_x = self.x * 16;
        let offset_y = self.y * 16;
        let width = (self.width - offset_x).min(16);
        let height = (self.height - offset_y).min(16);

        self.x += 1;

        Some(Tile {
            offset_x,
            offset_y,
            width,
            height,
        })
    }
}

/// Render the scene, tracing 16x16 tiles of the canvas on `num_threads`
/// workers. Each worker builds its own integrator and sampler, and tiles
/// only come back together when the finished chunks are blitted into the
/// canvas, so the workers never contend on shared pixels.
pub fn render(
    info: CanvasInfo,
    scene: &Scene,
    root: NodeId,
    sampler: impl Sampler,
    builder: impl IntegratorBuilder,
    num_threads: usize,
) -> Canvas {
    let mut canvas = info.new_canvas();
    let num_threads = num_threads.max(1);

    let (input, tiles): (_, channel::Receiver<Tile>) = channel::unbounded();
    let (results, chunks) = channel::unbounded();

    thread::scope(|s| {
        for _ in 0..num_threads {
            let mut sampler = sampler.clone_sampler();
            let results = results.clone();
            let mut integrator = builder.build();
            let tiles = tiles.clone();
            s.spawn(move |_| {
                let mut samples = SampleBuf::new();
                let inv_num_samples = 1. / (sampler.samples_per_pixel() as f32);
                for tile in tiles {
                    let mut chunk = Canvas::new(tile.width, tile.height);

                    for ((col, row), pixel) in chunk.coords().zip(chunk.pixels_mut()) {
                        samples.clear();
                        sampler.pixel_samples(
                            &mut samples,
                            &Point2::new(
                                col as f32 + tile.offset_x as f32,
                                row as f32 + tile.offset_y as f32,
                            ),
                        );
                        for sample in &samples {
                            let sample = Sample::new(sample.x, sample.y);
                            *pixel += integrator.luminance(scene, root, &sample);
                        }

                        *pixel *= inv_num_samples;
                    }

                    results.send((tile.offset_x, tile.offset_y, chunk)).unwrap();
                }
            });
        }

        let tiles = Tiles::new(info.width, info.height);
        let expecting = tiles.total() as usize;

        log::debug!(
            "rendering {}x{} as {} tiles on {} threads",
            info.width,
            info.height,
            expecting,
            num_threads
        );

        s.spawn(move |_| {
            for tile in tiles {
                input.send(tile).unwrap();
            }
        });

        for (offset_x, offset_y, chunk) in chunks.into_iter().take(expecting) {
            canvas.blit(offset_x, offset_y, &chunk)
        }
    })
    .unwrap();

    canvas
}

pub trait IntegratorBuilder {
    fn build(&self) -> Box<dyn Integrator>;
}

impl<C: IntegratorBuilder + ?Sized> IntegratorBuilder for Box<C> {
    fn build(&self) -> Box<dyn Integrator> {
        self.as_ref().build()
    }
}

pub trait Integrator: Send {
    fn luminance(&mut self, scene: &Scene, root: NodeId, sample: &Sample) -> Color;
}

impl<C> Integrator for Box<C>
where
    C: Integrator + ?Sized,
{
    fn luminance(&mut self, scene: &Scene, root: NodeId, sample: &Sample) -> Color {
        self.as_mut().luminance(scene, root, sample)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::{camera::Camera, march::MarchConfig, sampler::UniformSampler};

    #[test]
    fn test_tiles_cover_canvas() {
        let tiles: Vec<Tile> = Tiles::new(33, 17).collect();
        assert_eq!(tiles.len() as u32, Tiles::new(33, 17).total());

        // every pixel is covered exactly once
        let area: u32 = tiles.iter().map(|tile| tile.width * tile.height).sum();
        assert_eq!(area, 33 * 17);

        // ragged edge tiles shrink to fit
        for tile in &tiles {
            assert!(tile.offset_x + tile.width <= 33);
            assert!(tile.offset_y + tile.height <= 17);
        }
    }

    #[test]
    fn test_tiles_empty_canvas() {
        assert_eq!(Tiles::new(0, 16).count(), 0);
        assert_eq!(Tiles::new(16, 0).count(), 0);
    }

    #[test]
    fn test_render_thread_count_invariant() {
        let mut scene = Scene::default();
        let root = scene.sphere(Point3::origin(), 1.);

        let info = CanvasInfo::new(40, 30);
        let camera = Camera::new(&info, Point3::new(0., 0., 5.), Point3::origin(), 1.);
        let config = MarchConfig::default();

        let one = render(
            info.clone(),
            &scene,
            root,
            UniformSampler::new(1, 1),
            NormalsBuilder::new(camera.clone(), config.clone()),
            1,
        );
        let four = render(
            info,
            &scene,
            root,
            UniformSampler::new(1, 1),
            NormalsBuilder::new(camera, config),
            4,
        );

        // the same image comes back no matter how the tiles were scheduled
        assert_eq!(one.data(), four.data());
        assert_eq!(one.width(), 40);
        assert_eq!(one.height(), 30);

        // the sphere fills the center of the frame but not the corners
        assert_ne!(*one.get(20, 15), Color::black());
        assert_eq!(*one.get(0, 0), Color::black());
    }
}
