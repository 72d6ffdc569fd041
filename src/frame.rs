use nalgebra::Point3;

/// Accumulated animation time, advanced by the frame driver.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by a frame's delta time, in seconds.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Seconds since the start of the animation.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// The flight paths the demo cameras follow.
#[derive(Debug, Clone, Copy)]
pub enum Orbit {
    /// Circles while drifting steadily along +z.
    Helix,

    /// A level circle at a fixed height.
    Ring,
}

impl Orbit {
    /// The eye position `t` seconds into the flight.
    pub fn position(&self, t: f32) -> Point3<f32> {
        match self {
            Orbit::Helix => Point3::new(
                4. * (t / 2.).sin() + 6.,
                4. * (t / 2.).cos() + 6.,
                5. * t,
            ),

            Orbit::Ring => Point3::new(6. * (t / 2.).sin(), 3., 6. * (t / 2.).cos()),
        }
    }
}
