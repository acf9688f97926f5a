//! Scene management: meshes, materials, renderables, and draw planning.
//!
//! The scene is deliberately simple: flat registries of named meshes and
//! materials, a list of renderable objects referencing them by name, and a
//! pure draw planner that turns the object list into a minimal sequence of
//! bind and draw commands.

pub mod batch;
pub mod camera;
pub mod material;
pub mod mesh;
pub mod object;
pub mod scene;

pub use batch::{plan_draws, DrawCommand};
pub use camera::{Camera, Projection};
pub use material::Material;
pub use mesh::Mesh;
pub use object::RenderObject;
pub use scene::{ContentProvider, Scene};
