//! LUMO Scene - scene model and text-format loading.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Camera`, `Primitive`, `Shape`, `Material`
//! - **Loader**: parsing of the flat key-value scene text format
//! - **Generator**: fixture scenes for renderer validation
//!
//! # Example
//!
//! ```ignore
//! use lumo_scene::load_scene;
//!
//! let scene = load_scene("cornell.txt")?;
//! println!("Loaded {} primitives at {}x{}",
//!     scene.primitives.len(),
//!     scene.width,
//!     scene.height);
//! ```

pub mod generator;
pub mod parser;
pub mod scene;

// Re-export commonly used types
pub use generator::{generate_scene, GeneratorConfig};
pub use parser::{load_scene, parse_scene, SceneParseError};
pub use scene::{Camera, Material, Primitive, Scene, Shape, Surface};
