pub mod camera;
pub mod canvas;
pub mod demos;
pub mod frame;
pub mod integrator;
pub mod march;
pub mod math;
pub mod ray;
pub mod sampler;
pub mod scene;
