use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;

use marchrs::{
    camera::{Camera, CanvasInfo},
    canvas::Canvas,
    demos::Demo,
    frame::FrameClock,
    integrator,
    sampler::{JitteredSampler, UniformSampler},
    scene::{NodeId, Scene},
};

#[derive(Debug, Parser)]
#[command(name = "marchrs")]
#[command(about = "CPU renderer for a pair of raymarched demo scenes", long_about = None)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every rendering subcommand.
#[derive(Debug, Args)]
struct RenderOpts {
    /// The demo scene to render.
    #[arg(long, value_enum, default_value = "tiled")]
    demo: Demo,

    /// Worker threads, defaulting to one per cpu.
    #[arg(long)]
    jobs: Option<usize>,

    /// Side of the sub-pixel sample grid. 1 samples pixel centers, 2 takes
    /// 4 samples per pixel, and so on.
    #[arg(long, default_value = "1")]
    samples: u32,

    /// Jitter samples within their grid cells instead of using the centers.
    #[arg(long)]
    jitter: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a single frame to a PNG.
    Render {
        #[command(flatten)]
        opts: RenderOpts,

        /// Output width in pixels.
        #[arg(long, default_value = "800")]
        width: u32,

        /// Output height in pixels.
        #[arg(long, default_value = "600")]
        height: u32,

        /// The point in the camera's flight to render, in seconds.
        #[arg(long, default_value = "0")]
        time: f32,

        /// Where to write the image.
        output: PathBuf,
    },

    /// Render a frame sequence to numbered PNGs.
    Animate {
        #[command(flatten)]
        opts: RenderOpts,

        /// Output width in pixels.
        #[arg(long, default_value = "800")]
        width: u32,

        /// Output height in pixels.
        #[arg(long, default_value = "600")]
        height: u32,

        /// How many frames to render.
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Playback rate the frame times are spaced for.
        #[arg(long, default_value = "30")]
        fps: f32,

        /// Directory that receives the numbered frames.
        out_dir: PathBuf,
    },

    /// Render a single frame as ascii art on stdout.
    Ascii {
        #[command(flatten)]
        opts: RenderOpts,

        /// Output width in characters.
        #[arg(long, default_value = "100")]
        width: u32,

        /// Output height in characters.
        #[arg(long, default_value = "40")]
        height: u32,

        /// The point in the camera's flight to render, in seconds.
        #[arg(long, default_value = "0")]
        time: f32,
    },
}

fn render_frame(
    opts: &RenderOpts,
    info: &CanvasInfo,
    scene: &Scene,
    root: NodeId,
    t: f32,
) -> Canvas {
    let demo = opts.demo;
    let camera = Camera::new(info, demo.orbit().position(t), demo.look_at(), demo.zoom());
    let builder = demo.integrator(camera);
    let jobs = opts.jobs.unwrap_or_else(num_cpus::get);

    if opts.jitter {
        integrator::render(
            info.clone(),
            scene,
            root,
            JitteredSampler::new(opts.samples, opts.samples),
            builder,
            jobs,
        )
    } else {
        integrator::render(
            info.clone(),
            scene,
            root,
            UniformSampler::new(opts.samples, opts.samples),
            builder,
            jobs,
        )
    }
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    match Opts::parse().command {
        Command::Render { opts, width, height, time, output } => {
            let info = CanvasInfo::new(width, height);
            let mut scene = Scene::default();
            let root = opts.demo.build(&mut scene);

            let start = Instant::now();
            let canvas = render_frame(&opts, &info, &scene, root, time);
            canvas.save_png(&output)?;
            info!(
                "rendered {:?} to {} in {:.2?}",
                opts.demo,
                output.display(),
                start.elapsed()
            );
        }

        Command::Animate {
            opts,
            width,
            height,
            frames,
            fps,
            out_dir,
        } => {
            anyhow::ensure!(fps > 0., "fps must be positive");
            std::fs::create_dir_all(&out_dir)?;

            let info = CanvasInfo::new(width, height);
            let mut scene = Scene::default();
            let root = opts.demo.build(&mut scene);

            let mut clock = FrameClock::new();
            let dt = 1. / fps;

            for frame in 0..frames {
                let start = Instant::now();
                let canvas = render_frame(&opts, &info, &scene, root, clock.elapsed());
                let path = out_dir.join(format!("frame_{:04}.png", frame));
                canvas.save_png(&path)?;
                info!(
                    "frame {}/{} ({:.2}s) in {:.2?}",
                    frame + 1,
                    frames,
                    clock.elapsed(),
                    start.elapsed()
                );
                clock.advance(dt);
            }
        }

        Command::Ascii { opts, width, height, time } => {
            // terminal cells are roughly twice as tall as they are wide
            let info = CanvasInfo::new(width, height).with_pixel_aspect_ratio(0.5);
            let mut scene = Scene::default();
            let root = opts.demo.build(&mut scene);

            let canvas = render_frame(&opts, &info, &scene, root, time);
            print!("{}", canvas.to_ascii());
        }
    }

    Ok(())
}
