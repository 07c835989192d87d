//! Fixture scene generation.
//!
//! Emits scene text for renderer validation: a Cornell-box style room
//! (five walls and an emissive ceiling panel) filled with small boxes at
//! seeded-random positions. Output conforms to the grammar the parser
//! accepts, so generated fixtures round-trip through `parse_scene`.

use std::fmt::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Settings for one generated fixture.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of random boxes placed inside the room
    pub primitive_count: usize,

    /// Wall distance from the origin; boxes sample inside the walls
    pub extent: f32,

    /// RNG seed for box placement
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            primitive_count: 50,
            extent: 5.0,
            seed: 0,
        }
    }
}

/// Generate scene text per the given config.
pub fn generate_scene(config: &GeneratorConfig) -> String {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let e = config.extent;
    let mut out = String::new();

    out.push_str("DIMENSIONS 256 256\n");
    out.push_str("RAY_DEPTH 6\n");
    out.push_str("SAMPLES 32\n");
    out.push_str("\n");
    out.push_str("BG_COLOR 0 0 0\n");
    out.push_str("\n");
    writeln!(out, "CAMERA_POSITION 0 0 {}", 3.0 * e).unwrap();
    out.push_str("CAMERA_RIGHT 1 0 0\n");
    out.push_str("CAMERA_UP 0 1 0\n");
    out.push_str("CAMERA_FORWARD 0 0 -1\n");
    out.push_str("CAMERA_FOV_X 0.927295218\n");

    // Room: floor, back wall, ceiling, colored side walls
    wall(&mut out, (0.0, 1.0, 0.0), (0.0, -e, 0.0), (1.0, 1.0, 1.0));
    wall(&mut out, (0.0, 0.0, 1.0), (0.0, 0.0, -e), (1.0, 1.0, 1.0));
    wall(&mut out, (0.0, -1.0, 0.0), (0.0, e, 0.0), (1.0, 1.0, 1.0));
    wall(&mut out, (1.0, 0.0, 0.0), (-e, 0.0, 0.0), (1.0, 0.25, 0.25));
    wall(&mut out, (-1.0, 0.0, 0.0), (e, 0.0, 0.0), (0.25, 1.0, 0.25));

    // Ceiling light panel
    out.push_str("\nNEW_PRIMITIVE\n");
    writeln!(out, "BOX {} 0.1 {}", 0.4 * e, 0.4 * e).unwrap();
    writeln!(out, "POSITION 0 {e} 0").unwrap();
    out.push_str("EMISSION 2 2 2\n");

    // Random clutter, kept clear of the walls
    let margin = e - 0.5;
    for _ in 0..config.primitive_count {
        let x = rng.gen_range(-margin..=margin);
        let y = rng.gen_range(-margin..=margin);
        let z = rng.gen_range(-margin..=margin);
        out.push_str("\nNEW_PRIMITIVE\n");
        out.push_str("BOX 0.2 0.2 0.2\n");
        out.push_str("COLOR 0.5 0.5 0.0\n");
        writeln!(out, "POSITION {x} {y} {z}").unwrap();
    }

    out
}

fn wall(out: &mut String, normal: (f32, f32, f32), position: (f32, f32, f32), color: (f32, f32, f32)) {
    out.push_str("\nNEW_PRIMITIVE\n");
    writeln!(out, "PLANE {} {} {}", normal.0, normal.1, normal.2).unwrap();
    writeln!(out, "POSITION {} {} {}", position.0, position.1, position.2).unwrap();
    writeln!(out, "COLOR {} {} {}", color.0, color.1, color.2).unwrap();
}
