pub mod image_graph;
pub mod pointer;

pub use image_graph::ImageGraph;
pub use pointer::{Pointer, PointerEvent};
