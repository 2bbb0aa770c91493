//! Wavefront OBJ parsing with per-material vertex colors.
//!
//! The scene's meshes carry no textures; instead every `usemtl` group is
//! painted a solid color looked up in a caller-supplied map. Unknown
//! materials fall back to white so a missing entry is visible, not fatal.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;

use crate::error::AssetError;

/// Fallback color for faces whose material has no map entry.
const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// CPU-side mesh geometry, ready for upload.
///
/// All attribute vectors have the same length; `indices` is a triangle list
/// into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals; face normals are computed when the file has none.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex linear RGBA colors from the material map.
    pub colors: Vec<[f32; 4]>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Load an OBJ file and paint it with the given material colors.
pub fn load_mesh(
    path: &Path,
    material_colors: &HashMap<String, [f32; 3]>,
) -> Result<MeshData, AssetError> {
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&text, material_colors)?;
    log::debug!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text and paint it with the given material colors.
///
/// Supports `v`, `vn`, `f` (any polygon, fan-triangulated) and `usemtl`;
/// everything else is ignored. Faces without normal indices get a computed
/// flat face normal.
pub fn parse_obj(
    text: &str,
    material_colors: &HashMap<String, [f32; 3]>,
) -> Result<MeshData, AssetError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut current_color = DEFAULT_COLOR;
    let mut mesh = MeshData::default();

    for (line_idx, raw_line) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                positions.push(parse_vec3(&parts, line_no)?);
            }
            "vn" => {
                normals.push(parse_vec3(&parts, line_no)?);
            }
            "usemtl" => {
                if let Some(name) = parts.get(1) {
                    current_color = material_colors
                        .get(*name)
                        .copied()
                        .unwrap_or(DEFAULT_COLOR);
                }
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(AssetError::ObjParse {
                        line: line_no,
                        message: format!("face with {} vertices", parts.len() - 1),
                    });
                }
                emit_face(
                    &parts[1..],
                    line_no,
                    &positions,
                    &normals,
                    current_color,
                    &mut mesh,
                )?;
            }
            _ => {}
        }
    }

    if mesh.indices.is_empty() {
        return Err(AssetError::EmptyMesh);
    }
    Ok(mesh)
}

fn parse_vec3(parts: &[&str], line: usize) -> Result<[f32; 3], AssetError> {
    if parts.len() < 4 {
        return Err(AssetError::ObjParse {
            line,
            message: format!("expected 3 components, got {}", parts.len() - 1),
        });
    }
    let mut out = [0.0_f32; 3];
    for (slot, part) in out.iter_mut().zip(&parts[1..4]) {
        *slot = part.parse().map_err(|_| AssetError::ObjParse {
            line,
            message: format!("bad float `{part}`"),
        })?;
    }
    Ok(out)
}

/// Append one polygon as a triangle fan.
fn emit_face(
    corners: &[&str],
    line: usize,
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    color: [f32; 3],
    mesh: &mut MeshData,
) -> Result<(), AssetError> {
    let base = mesh.positions.len() as u32;
    let mut face_positions: Vec<Vec3> = Vec::with_capacity(corners.len());
    let mut face_normals: Vec<Option<[f32; 3]>> = Vec::with_capacity(corners.len());

    for corner in corners {
        // `pos`, `pos/tex`, `pos//normal` or `pos/tex/normal`, all 1-based.
        let fields: Vec<&str> = corner.split('/').collect();
        let pos_idx: usize = fields[0].parse().map_err(|_| AssetError::ObjParse {
            line,
            message: format!("bad face index `{corner}`"),
        })?;
        let position = positions
            .get(pos_idx.wrapping_sub(1))
            .ok_or_else(|| AssetError::ObjParse {
                line,
                message: format!("position index {pos_idx} out of bounds"),
            })?;

        let normal = fields
            .get(2)
            .filter(|f| !f.is_empty())
            .map(|f| {
                let idx: usize = f.parse().map_err(|_| AssetError::ObjParse {
                    line,
                    message: format!("bad normal index `{corner}`"),
                })?;
                normals
                    .get(idx.wrapping_sub(1))
                    .copied()
                    .ok_or_else(|| AssetError::ObjParse {
                        line,
                        message: format!("normal index {idx} out of bounds"),
                    })
            })
            .transpose()?;

        face_positions.push(Vec3::from_array(*position));
        face_normals.push(normal);
    }

    // Flat normal for corners the file left without one.
    let flat = if face_positions.len() >= 3 {
        (face_positions[1] - face_positions[0])
            .cross(face_positions[2] - face_positions[0])
            .normalize_or_zero()
    } else {
        Vec3::Z
    };

    for (position, normal) in face_positions.iter().zip(&face_normals) {
        mesh.positions.push(position.to_array());
        mesh.normals.push(normal.unwrap_or(flat.to_array()));
        mesh.colors.push([color[0], color[1], color[2], 1.0]);
    }

    for i in 1..face_positions.len() as u32 - 1 {
        mesh.indices.push(base);
        mesh.indices.push(base + i);
        mesh.indices.push(base + i + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

    fn no_materials() -> HashMap<String, [f32; 3]> {
        HashMap::new()
    }

    #[test]
    fn test_parses_plain_triangle() {
        let mesh = parse_obj(TRIANGLE, &no_materials()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.positions[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_normals_get_flat_face_normal() {
        let mesh = parse_obj(TRIANGLE, &no_materials()).unwrap();
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_explicit_normals_survive() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 1 0
f 1//1 2//1 3//1
";
        let mesh = parse_obj(obj, &no_materials()).unwrap();
        assert_eq!(mesh.normals[0], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_quad_fan_triangulates() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = parse_obj(obj, &no_materials()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_material_paints_following_faces() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
usemtl wheels
f 1 2 3
";
        let mut colors = HashMap::new();
        colors.insert("wheels".to_string(), [0.2, 0.2, 0.2]);
        let mesh = parse_obj(obj, &colors).unwrap();
        assert_eq!(mesh.colors[0], [0.2, 0.2, 0.2, 1.0]);
    }

    #[test]
    fn test_unknown_material_falls_back_to_white() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
usemtl mystery
f 1 2 3
";
        let mesh = parse_obj(obj, &no_materials()).unwrap();
        assert_eq!(mesh.colors[0], [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let err = parse_obj("# nothing here\n", &no_materials()).unwrap_err();
        assert!(matches!(err, AssetError::EmptyMesh));
    }

    #[test]
    fn test_out_of_bounds_index_is_an_error() {
        let obj = "v 0 0 0\nf 1 2 3\n";
        let err = parse_obj(obj, &no_materials()).unwrap_err();
        assert!(matches!(err, AssetError::ObjParse { line: 2, .. }));
    }
}
