//! Platform layer the engine draws and measures through.

mod font;
pub mod platform;
mod surface;
mod window;

pub use font::Font;
pub use platform::DisplayMetrics;
pub use surface::SurfaceAdapter;
pub use window::WindowGeometry;
