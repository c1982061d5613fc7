//! Page routing and HTML rendering on top of the content snapshot.

pub mod render;
pub mod route;

pub use render::Renderer;
pub use route::{Page, Route, all_routes, resolve};
