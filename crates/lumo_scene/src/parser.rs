//! Scene text-format parser.
//!
//! This module provides line-by-line parsing of the flat key-value scene
//! format. Each line is a case-sensitive keyword followed by
//! whitespace-separated arguments.
//!
//! # Supported Keys
//!
//! - `DIMENSIONS <w> <h>`
//! - `RAY_DEPTH <n>` / `SAMPLES <n>`
//! - `BG_COLOR <r> <g> <b>`
//! - `CAMERA_POSITION` / `CAMERA_RIGHT` / `CAMERA_UP` / `CAMERA_FORWARD` `<x> <y> <z>`
//! - `CAMERA_FOV_X <radians>`
//! - `NEW_PRIMITIVE` opens a primitive block, closed by the next
//!   `NEW_PRIMITIVE` or end of input
//! - `PLANE` / `BOX` / `SPHERE` / `ELLIPSOID` (shape, one per block)
//! - `POSITION` / `ROTATION` / `COLOR` / `EMISSION` / `METALLIC` /
//!   `DIELECTRIC` / `IOR` (placement and material, all optional)

use std::path::Path;
use std::str::FromStr;

use lumo_math::{try_normalize, Quat, Vec3};
use thiserror::Error;

use crate::scene::{Camera, Material, Primitive, Scene, Shape, Surface};

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum SceneParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("scene is missing required key {key}")]
    Missing { key: &'static str },
}

/// Result type for scene loading.
pub type ParseResult<T> = Result<T, SceneParseError>;

fn parse_err(line: usize, message: impl Into<String>) -> SceneParseError {
    SceneParseError::Parse {
        line,
        message: message.into(),
    }
}

/// Load and parse a scene file.
pub fn load_scene(path: impl AsRef<Path>) -> ParseResult<Scene> {
    let content = std::fs::read_to_string(path)?;
    parse_scene(&content)
}

/// Parse scene text into a validated `Scene`.
pub fn parse_scene(content: &str) -> ParseResult<Scene> {
    let mut builder = SceneBuilder::default();

    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        let mut tokens = raw.split_whitespace();
        let Some(key) = tokens.next() else {
            continue;
        };
        let args: Vec<&str> = tokens.collect();
        builder.line(line, key, &args)?;
    }

    builder.finish()
}

/// Parse exactly `N` arguments of one numeric type.
fn numbers<T: FromStr, const N: usize>(line: usize, key: &str, args: &[&str]) -> ParseResult<[T; N]>
where
    T: Copy + Default,
{
    if args.len() != N {
        return Err(parse_err(
            line,
            format!("{key} expects {N} arguments, got {}", args.len()),
        ));
    }
    let mut out = [T::default(); N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|_| parse_err(line, format!("{key}: invalid number '{arg}'")))?;
    }
    Ok(out)
}

fn vec3(line: usize, key: &str, args: &[&str]) -> ParseResult<Vec3> {
    let [x, y, z] = numbers::<f32, 3>(line, key, args)?;
    Ok(Vec3::new(x, y, z))
}

fn flag(line: usize, key: &str, args: &[&str]) -> ParseResult<()> {
    if !args.is_empty() {
        return Err(parse_err(
            line,
            format!("{key} expects no arguments, got {}", args.len()),
        ));
    }
    Ok(())
}

/// One primitive block under construction.
struct PrimitiveDraft {
    /// Line of the opening NEW_PRIMITIVE, for block-level diagnostics
    line: usize,
    shape: Option<Shape>,
    position: Vec3,
    rotation: Quat,
    material: Material,
}

impl PrimitiveDraft {
    fn new(line: usize) -> Self {
        Self {
            line,
            shape: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            material: Material::default(),
        }
    }

    fn set_shape(&mut self, line: usize, key: &str, shape: Shape) -> ParseResult<()> {
        if self.shape.is_some() {
            return Err(parse_err(line, format!("{key}: primitive already has a shape")));
        }
        self.shape = Some(shape);
        Ok(())
    }

    fn build(self) -> ParseResult<Primitive> {
        let shape = self.shape.ok_or_else(|| {
            parse_err(self.line, "primitive block has no shape key".to_string())
        })?;
        Ok(Primitive {
            shape,
            position: self.position,
            rotation: self.rotation,
            material: self.material,
        })
    }
}

#[derive(Default)]
struct CameraDraft {
    /// Line of the first camera key seen, for basis diagnostics
    first_line: Option<usize>,
    position: Option<Vec3>,
    right: Option<Vec3>,
    up: Option<Vec3>,
    forward: Option<Vec3>,
    fov_x: Option<(f32, usize)>,
}

impl CameraDraft {
    fn mark(&mut self, line: usize) {
        self.first_line.get_or_insert(line);
    }

    fn build(self) -> ParseResult<Camera> {
        let position = self.position.ok_or(SceneParseError::Missing {
            key: "CAMERA_POSITION",
        })?;
        let right = self.right.ok_or(SceneParseError::Missing {
            key: "CAMERA_RIGHT",
        })?;
        let up = self.up.ok_or(SceneParseError::Missing { key: "CAMERA_UP" })?;
        let forward = self.forward.ok_or(SceneParseError::Missing {
            key: "CAMERA_FORWARD",
        })?;
        let (fov_x, fov_line) = self.fov_x.ok_or(SceneParseError::Missing {
            key: "CAMERA_FOV_X",
        })?;

        if !(fov_x > 0.0 && fov_x < std::f32::consts::PI) {
            return Err(parse_err(
                fov_line,
                format!("CAMERA_FOV_X must be in (0, pi), got {fov_x}"),
            ));
        }

        let camera = Camera {
            position,
            right,
            up,
            forward,
            fov_x,
        };

        // Lenient-load policy: hand-authored bases are normalized and
        // re-orthogonalized rather than rejected.
        camera.orthonormalized().map_err(|_| {
            parse_err(
                self.first_line.unwrap_or(0),
                "camera basis vectors are degenerate".to_string(),
            )
        })
    }
}

#[derive(Default)]
struct SceneBuilder {
    dimensions: Option<(u32, u32)>,
    ray_depth: Option<u32>,
    samples: Option<u32>,
    background: Option<Vec3>,
    camera: CameraDraft,
    current: Option<PrimitiveDraft>,
    primitives: Vec<Primitive>,
}

impl SceneBuilder {
    fn line(&mut self, line: usize, key: &str, args: &[&str]) -> ParseResult<()> {
        match key {
            "DIMENSIONS" => {
                let [w, h] = numbers::<u32, 2>(line, key, args)?;
                if w == 0 || h == 0 {
                    return Err(parse_err(line, "DIMENSIONS must be positive"));
                }
                self.dimensions = Some((w, h));
            }
            "RAY_DEPTH" => {
                let [depth] = numbers::<u32, 1>(line, key, args)?;
                self.ray_depth = Some(depth);
            }
            "SAMPLES" => {
                let [samples] = numbers::<u32, 1>(line, key, args)?;
                if samples == 0 {
                    return Err(parse_err(line, "SAMPLES must be at least 1"));
                }
                self.samples = Some(samples);
            }
            "BG_COLOR" => {
                self.background = Some(vec3(line, key, args)?);
            }
            "CAMERA_POSITION" => {
                self.camera.mark(line);
                self.camera.position = Some(vec3(line, key, args)?);
            }
            "CAMERA_RIGHT" => {
                self.camera.mark(line);
                self.camera.right = Some(vec3(line, key, args)?);
            }
            "CAMERA_UP" => {
                self.camera.mark(line);
                self.camera.up = Some(vec3(line, key, args)?);
            }
            "CAMERA_FORWARD" => {
                self.camera.mark(line);
                self.camera.forward = Some(vec3(line, key, args)?);
            }
            "CAMERA_FOV_X" => {
                self.camera.mark(line);
                let [fov] = numbers::<f32, 1>(line, key, args)?;
                self.camera.fov_x = Some((fov, line));
            }
            "NEW_PRIMITIVE" => {
                flag(line, key, args)?;
                self.flush_primitive()?;
                self.current = Some(PrimitiveDraft::new(line));
            }
            "PLANE" => {
                let normal = vec3(line, key, args)?;
                let normal = try_normalize(normal)
                    .map_err(|_| parse_err(line, "PLANE normal must be non-zero"))?;
                self.primitive(line, key)?
                    .set_shape(line, key, Shape::Plane { normal })?;
            }
            "BOX" => {
                let half_extents = vec3(line, key, args)?;
                if half_extents.min_element() <= 0.0 {
                    return Err(parse_err(line, "BOX half-extents must be positive"));
                }
                self.primitive(line, key)?
                    .set_shape(line, key, Shape::Box { half_extents })?;
            }
            "SPHERE" => {
                let [radius] = numbers::<f32, 1>(line, key, args)?;
                if radius <= 0.0 {
                    return Err(parse_err(line, "SPHERE radius must be positive"));
                }
                self.primitive(line, key)?
                    .set_shape(line, key, Shape::Sphere { radius })?;
            }
            "ELLIPSOID" => {
                let radii = vec3(line, key, args)?;
                if radii.min_element() <= 0.0 {
                    return Err(parse_err(line, "ELLIPSOID radii must be positive"));
                }
                self.primitive(line, key)?
                    .set_shape(line, key, Shape::Ellipsoid { radii })?;
            }
            "POSITION" => {
                let position = vec3(line, key, args)?;
                self.primitive(line, key)?.position = position;
            }
            "ROTATION" => {
                let [x, y, z, w] = numbers::<f32, 4>(line, key, args)?;
                let rotation = Quat::from_xyzw(x, y, z, w);
                if rotation.length_squared() < f32::EPSILON {
                    return Err(parse_err(line, "ROTATION quaternion must be non-zero"));
                }
                self.primitive(line, key)?.rotation = rotation.normalize();
            }
            "COLOR" => {
                let albedo = vec3(line, key, args)?;
                self.primitive(line, key)?.material.albedo = albedo;
            }
            "EMISSION" => {
                let emission = vec3(line, key, args)?;
                self.primitive(line, key)?.material.emission = emission;
            }
            "METALLIC" => {
                flag(line, key, args)?;
                self.primitive(line, key)?.material.surface = Surface::Metallic;
            }
            "DIELECTRIC" => {
                flag(line, key, args)?;
                let material = &mut self.primitive(line, key)?.material;
                if !matches!(material.surface, Surface::Dielectric { .. }) {
                    material.surface = Surface::Dielectric { ior: 1.0 };
                }
            }
            "IOR" => {
                let [ior] = numbers::<f32, 1>(line, key, args)?;
                if ior <= 0.0 {
                    return Err(parse_err(line, "IOR must be positive"));
                }
                self.primitive(line, key)?.material.surface = Surface::Dielectric { ior };
            }
            _ => {
                return Err(parse_err(line, format!("unknown key '{key}'")));
            }
        }
        Ok(())
    }

    /// Access the open primitive block, failing for block keys at top level.
    fn primitive(&mut self, line: usize, key: &str) -> ParseResult<&mut PrimitiveDraft> {
        self.current
            .as_mut()
            .ok_or_else(|| parse_err(line, format!("{key} outside a primitive block")))
    }

    fn flush_primitive(&mut self) -> ParseResult<()> {
        if let Some(draft) = self.current.take() {
            self.primitives.push(draft.build()?);
        }
        Ok(())
    }

    fn finish(mut self) -> ParseResult<Scene> {
        self.flush_primitive()?;

        let (width, height) = self.dimensions.ok_or(SceneParseError::Missing {
            key: "DIMENSIONS",
        })?;
        let camera = self.camera.build()?;

        let scene = Scene {
            width,
            height,
            ray_depth: self.ray_depth.unwrap_or(6),
            samples: self.samples.unwrap_or(32),
            background: self.background.unwrap_or(Vec3::ZERO),
            camera,
            primitives: self.primitives,
        };

        log::debug!(
            "parsed scene: {}x{}, {} primitives, {} spp, depth {}",
            scene.width,
            scene.height,
            scene.primitives.len(),
            scene.samples,
            scene.ray_depth
        );

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMERA_BLOCK: &str = "\
CAMERA_POSITION 0 0 15
CAMERA_RIGHT 1 0 0
CAMERA_UP 0 1 0
CAMERA_FORWARD 0 0 -1
CAMERA_FOV_X 0.927295218
";

    fn with_camera(body: &str) -> String {
        format!("DIMENSIONS 256 256\n{CAMERA_BLOCK}{body}")
    }

    fn line_of(err: SceneParseError) -> usize {
        match err {
            SceneParseError::Parse { line, .. } => line,
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_minimal_plane_scene() {
        let text = with_camera(
            "RAY_DEPTH 6\nSAMPLES 32\n\nNEW_PRIMITIVE\nPLANE 0 1 0\nPOSITION 0 -5 0\nCOLOR 1 1 1\n",
        );
        let scene = parse_scene(&text).unwrap();

        assert_eq!(scene.width, 256);
        assert_eq!(scene.height, 256);
        assert_eq!(scene.ray_depth, 6);
        assert_eq!(scene.samples, 32);
        assert_eq!(scene.primitives.len(), 1);

        let prim = &scene.primitives[0];
        assert_eq!(prim.shape, Shape::Plane { normal: Vec3::Y });
        assert_eq!(prim.position, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(prim.material.albedo, Vec3::ONE);
        assert_eq!(prim.material.surface, Surface::Diffuse);
    }

    #[test]
    fn test_parse_defaults() {
        let scene = parse_scene(&with_camera("")).unwrap();
        assert_eq!(scene.ray_depth, 6);
        assert_eq!(scene.samples, 32);
        assert_eq!(scene.background, Vec3::ZERO);
        assert!(scene.primitives.is_empty());
    }

    #[test]
    fn test_parse_all_shapes() {
        let text = with_camera(
            "NEW_PRIMITIVE\nPLANE 0 0 1\n\
             NEW_PRIMITIVE\nBOX 1 2 3\n\
             NEW_PRIMITIVE\nSPHERE 2\n\
             NEW_PRIMITIVE\nELLIPSOID 1 2 3\n",
        );
        let scene = parse_scene(&text).unwrap();
        assert_eq!(scene.primitives.len(), 4);
        assert!(matches!(scene.primitives[1].shape, Shape::Box { .. }));
        assert!(matches!(scene.primitives[2].shape, Shape::Sphere { radius } if radius == 2.0));
        assert!(matches!(scene.primitives[3].shape, Shape::Ellipsoid { .. }));
    }

    #[test]
    fn test_parse_materials() {
        let text = with_camera(
            "NEW_PRIMITIVE\nSPHERE 1\nMETALLIC\nCOLOR 0.8 0.8 0.9\n\
             NEW_PRIMITIVE\nSPHERE 1\nIOR 1.5\n\
             NEW_PRIMITIVE\nSPHERE 1\nDIELECTRIC\n\
             NEW_PRIMITIVE\nBOX 2 0.1 2\nEMISSION 2 2 2\n",
        );
        let scene = parse_scene(&text).unwrap();

        assert_eq!(scene.primitives[0].material.surface, Surface::Metallic);
        assert_eq!(
            scene.primitives[1].material.surface,
            Surface::Dielectric { ior: 1.5 }
        );
        assert_eq!(
            scene.primitives[2].material.surface,
            Surface::Dielectric { ior: 1.0 }
        );
        assert!(scene.primitives[3].material.is_emissive());
    }

    #[test]
    fn test_parse_rotation_normalized() {
        let text = with_camera("NEW_PRIMITIVE\nBOX 1 1 1\nROTATION 0 2 0 0\n");
        let scene = parse_scene(&text).unwrap();
        let q = scene.primitives[0].rotation;
        assert!((q.length() - 1.0).abs() < 1e-6);
        assert!((q.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_key_fails() {
        let err = parse_scene(&with_camera("FROBNICATE 1 2 3\n")).unwrap_err();
        assert_eq!(line_of(err), 7);
    }

    #[test]
    fn test_wrong_arity_fails() {
        let err = parse_scene("DIMENSIONS 256\n").unwrap_err();
        assert_eq!(line_of(err), 1);
    }

    #[test]
    fn test_non_numeric_fails() {
        let err = parse_scene("DIMENSIONS wide tall\n").unwrap_err();
        assert_eq!(line_of(err), 1);
    }

    #[test]
    fn test_missing_dimensions_fails() {
        let err = parse_scene(CAMERA_BLOCK).unwrap_err();
        assert!(matches!(
            err,
            SceneParseError::Missing { key: "DIMENSIONS" }
        ));
    }

    #[test]
    fn test_incomplete_camera_fails() {
        let err = parse_scene("DIMENSIONS 64 64\nCAMERA_POSITION 0 0 0\n").unwrap_err();
        assert!(matches!(err, SceneParseError::Missing { .. }));
    }

    #[test]
    fn test_shapeless_primitive_fails() {
        let err =
            parse_scene(&with_camera("NEW_PRIMITIVE\nPOSITION 0 0 0\nCOLOR 1 1 1\n")).unwrap_err();
        // Reported against the line that opened the block
        assert_eq!(line_of(err), 7);
    }

    #[test]
    fn test_duplicate_shape_fails() {
        let err = parse_scene(&with_camera("NEW_PRIMITIVE\nSPHERE 1\nBOX 1 1 1\n")).unwrap_err();
        assert_eq!(line_of(err), 9);
    }

    #[test]
    fn test_material_key_outside_block_fails() {
        let err = parse_scene(&with_camera("COLOR 1 1 1\n")).unwrap_err();
        assert_eq!(line_of(err), 7);
    }

    #[test]
    fn test_degenerate_box_fails() {
        let err = parse_scene(&with_camera("NEW_PRIMITIVE\nBOX 1 0 1\n")).unwrap_err();
        assert_eq!(line_of(err), 8);
    }

    #[test]
    fn test_degenerate_plane_normal_fails() {
        let err = parse_scene(&with_camera("NEW_PRIMITIVE\nPLANE 0 0 0\n")).unwrap_err();
        assert_eq!(line_of(err), 8);
    }

    #[test]
    fn test_fov_out_of_range_fails() {
        let text = "DIMENSIONS 64 64\n\
            CAMERA_POSITION 0 0 0\nCAMERA_RIGHT 1 0 0\nCAMERA_UP 0 1 0\n\
            CAMERA_FORWARD 0 0 -1\nCAMERA_FOV_X 3.5\n";
        let err = parse_scene(text).unwrap_err();
        assert_eq!(line_of(err), 6);
    }

    #[test]
    fn test_collinear_camera_fails() {
        let text = "DIMENSIONS 64 64\n\
            CAMERA_POSITION 0 0 0\nCAMERA_RIGHT 0 0 -1\nCAMERA_UP 0 1 0\n\
            CAMERA_FORWARD 0 0 -1\nCAMERA_FOV_X 1.0\n";
        let err = parse_scene(text).unwrap_err();
        // Blamed on the first camera line
        assert_eq!(line_of(err), 2);
    }

    #[test]
    fn test_camera_reorthogonalized() {
        let text = "DIMENSIONS 64 64\n\
            CAMERA_POSITION 0 0 0\nCAMERA_RIGHT 2 0 -0.4\nCAMERA_UP 0.1 1 0\n\
            CAMERA_FORWARD 0 0 -3\nCAMERA_FOV_X 1.0\n";
        let scene = parse_scene(text).unwrap();
        let c = scene.camera;
        assert!(c.right.dot(c.forward).abs() < 1e-6);
        assert!((c.up.length() - 1.0).abs() < 1e-6);
    }
}
