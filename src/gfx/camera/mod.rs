pub mod camera;

pub use camera::CameraState;
