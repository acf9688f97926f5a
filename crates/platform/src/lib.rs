//! Platform layer for the vkr engine: window management via winit,
//! Vulkan surface creation, and input state tracking.

mod input;
mod window;

pub use input::{InputState, KeyCode, MouseButton};
pub use window::Window;

pub use winit::event::WindowEvent;
pub use winit::event_loop::EventLoop;
