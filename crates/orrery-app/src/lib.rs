//! Application shell for the orrery viewer: platform directories, demo scene
//! assembly, and the winit window with its frame loop.

pub mod paths;
pub mod scene;
pub mod window;
