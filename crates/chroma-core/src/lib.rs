pub mod config;
pub mod detector;
pub mod frame;
pub mod sampler;
pub mod spectrum;

pub use config::{Config, ConfigError, DetectionConfig};
pub use detector::{hex_code, ColorBlobDetector, DetectError, Selection};
pub use frame::{Frame, FrameConfig, FrameError, PixelFormat};
pub use sampler::{Rect, SampleError};
