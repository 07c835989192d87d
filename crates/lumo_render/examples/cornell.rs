//! Cornell-box example.
//!
//! Generates a fixture scene, renders it, and saves a PNG.

use lumo_render::{render, save_image, RenderOptions};
use lumo_scene::{generate_scene, parse_scene, GeneratorConfig};

fn main() {
    env_logger::init();

    let config = GeneratorConfig {
        primitive_count: 20,
        ..Default::default()
    };
    let scene = parse_scene(&generate_scene(&config)).expect("generated scene parses");

    println!(
        "Rendering {}x{} @ {} spp, {} primitives...",
        scene.width,
        scene.height,
        scene.samples,
        scene.primitives.len()
    );

    let start = std::time::Instant::now();
    let buffer = render(&scene, &RenderOptions { seed: 42 });
    println!("Rendered in {:?}", start.elapsed());

    let filename = "cornell.png";
    save_image(&buffer, filename).expect("Failed to save image");
    println!("Saved to {filename}");
}
