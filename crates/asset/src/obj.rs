//! Wavefront OBJ parser: positions, normals, texture coordinates and
//! polygonal faces (`v`/`vn`/`vt`/`f`, everything else is skipped).
//!
//! Faces are fan-triangulated and every emitted corner is a fresh vertex
//! record; nothing is welded across faces. A face corner whose position
//! reference is invalid drops the whole triangle it belongs to, so the
//! output always holds complete triangles. Missing or out-of-range normal
//! and texcoord references degrade to zero vectors.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use thiserror::Error;

use crate::mesh::{MeshData, MeshVertex};

/// Errors that abort a load. Bad face references are not here on purpose:
/// they are per-triangle and recovered from during parsing.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("unsupported mesh format: '{0}' is not a Wavefront .obj file")]
    UnsupportedFormat(String),
    #[error("failed to read OBJ file: {0}")]
    Io(#[from] io::Error),
    #[error("OBJ contained no complete triangles")]
    EmptyMesh,
}

/// Load an OBJ mesh from a file path. The extension is checked before the
/// file is touched.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData, ObjError> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str());
    if ext != Some("obj") {
        return Err(ObjError::UnsupportedFormat(path.display().to_string()));
    }
    let file = File::open(path)?;
    load_obj_from_reader(BufReader::new(file))
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<MeshData, ObjError> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshData, ObjError> {
    parse_obj(io::Cursor::new(contents))
}

/// One `f`-directive corner, raw 1-based references. `None` means the part
/// was absent or unparsable; whether that is fatal for the triangle depends
/// on which attribute it is.
#[derive(Clone, Copy, Debug)]
struct FaceRef {
    pos: Option<usize>,
    tex: Option<usize>,
    norm: Option<usize>,
}

fn parse_obj<R: BufRead>(reader: R) -> Result<MeshData, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();

    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let mut line_count = 0usize;
    let mut face_count = 0usize;
    let mut dropped_triangles = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        line_count += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => match parse_vec3(&mut parts) {
                Some(pos) => positions.push(pos),
                None => log::warn!("line {line_no}: malformed 'v' directive, skipped"),
            },
            "vn" => match parse_vec3(&mut parts) {
                Some(n) => normals.push(n),
                None => log::warn!("line {line_no}: malformed 'vn' directive, skipped"),
            },
            "vt" => match parse_vec2(&mut parts) {
                Some(uv) => texcoords.push(uv),
                None => log::warn!("line {line_no}: malformed 'vt' directive, skipped"),
            },
            "f" => {
                face_count += 1;
                let refs: Vec<FaceRef> = parts.map(parse_face_ref).collect();
                if refs.len() < 3 {
                    log::warn!("line {line_no}: face with fewer than 3 vertices, skipped");
                    continue;
                }

                // Fan triangulation: corner 0 is the apex of every triangle,
                // triangle i is (0, i, i+1), preserving the input winding.
                for i in 1..refs.len() - 1 {
                    let corners = [refs[0], refs[i], refs[i + 1]];
                    match build_triangle(&corners, &positions, &normals, &texcoords) {
                        Some(tri) => {
                            for vertex in tri {
                                indices.push(vertices.len() as u32);
                                vertices.push(vertex);
                            }
                        }
                        None => {
                            // A position reference we cannot resolve poisons
                            // the whole triangle; emitting the surviving
                            // corners would leave a partial triangle behind.
                            log::warn!(
                                "line {line_no}: invalid position reference, triangle dropped"
                            );
                            dropped_triangles += 1;
                        }
                    }
                }
            }
            _ => {
                // Ignore other directives (o/g/s/usemtl/mtllib/etc.)
            }
        }
    }

    log::info!(
        "parsed OBJ: {} lines, {} positions, {} faces -> {} vertices / {} indices ({} triangles dropped)",
        line_count,
        positions.len(),
        face_count,
        vertices.len(),
        indices.len(),
        dropped_triangles
    );

    if vertices.is_empty() || indices.is_empty() {
        return Err(ObjError::EmptyMesh);
    }

    Ok(MeshData::new(vertices, indices))
}

/// Resolve one triangle's corners against the attribute pools. Returns
/// `None` if any corner's position reference is missing, zero or out of
/// range. Normal/texcoord misses are filled with zeros instead.
fn build_triangle(
    corners: &[FaceRef; 3],
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    texcoords: &[[f32; 2]],
) -> Option<[MeshVertex; 3]> {
    let mut tri = [MeshVertex::default(); 3];
    for (slot, corner) in tri.iter_mut().zip(corners) {
        let position = lookup(corner.pos, positions)?;
        let normal = lookup(corner.norm, normals).unwrap_or([0.0; 3]);
        let uv = lookup(corner.tex, texcoords).unwrap_or([0.0; 2]);
        *slot = MeshVertex::new(position, normal, uv);
    }
    Some(tri)
}

/// 1-based pool lookup; index 0 is invalid by definition.
fn lookup<T: Copy>(index: Option<usize>, pool: &[T]) -> Option<T> {
    let index = index?;
    if index == 0 {
        return None;
    }
    pool.get(index - 1).copied()
}

/// Parse `p`, `p/t`, `p/t/n` or `p//n`. Unparsable parts come back as
/// `None`; validation against the pools happens at emission time.
fn parse_face_ref(token: &str) -> FaceRef {
    let mut split = token.split('/');
    let pos = split.next().and_then(|s| s.parse::<usize>().ok());
    let tex = split.next().and_then(|s| s.parse::<usize>().ok());
    let norm = split.next().and_then(|s| s.parse::<usize>().ok());
    FaceRef { pos, tex, norm }
}

fn parse_vec3<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Option<[f32; 3]> {
    let x = parts.next()?.parse::<f32>().ok()?;
    let y = parts.next()?.parse::<f32>().ok()?;
    let z = parts.next()?.parse::<f32>().ok()?;
    Some([x, y, z])
}

fn parse_vec2<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Option<[f32; 2]> {
    let u = parts.next()?.parse::<f32>().ok()?;
    let v = parts.next()?.parse::<f32>().ok()?;
    Some([u, v])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_face_emits_three_fresh_vertices() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.5 0.5
f 1/1/1 2/1/1 3/1/1
";
        let mesh = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.uv, [0.5, 0.5]);
        }
        assert!(mesh.is_valid());
    }

    #[test]
    fn quad_fans_into_two_triangles() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3 4
";
        let mesh = load_obj_from_str(src).expect("parse quad");
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices.len(), 6);
        // Fan apex (pool vertex 1) opens both triangles; winding preserved.
        let positions: Vec<_> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions[0], [0.0, 0.0, 0.0]);
        assert_eq!(positions[3], [0.0, 0.0, 0.0]);
        assert_eq!(positions[1], [1.0, 0.0, 0.0]);
        assert_eq!(positions[2], [1.0, 1.0, 0.0]);
        assert_eq!(positions[4], [1.0, 1.0, 0.0]);
        assert_eq!(positions[5], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn ngon_fans_into_n_minus_two_triangles() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 2.0 1.0 0.0
v 1.0 2.0 0.0
v 0.0 2.0 0.0
v -1.0 1.0 0.0
f 1 2 3 4 5 6
";
        let mesh = load_obj_from_str(src).expect("parse hexagon");
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertices.len(), 12);
        // Every triangle starts at the apex.
        for tri in mesh.vertices.chunks(3) {
            assert_eq!(tri[0].position, [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn position_only_refs_zero_fill_attributes() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let mesh = load_obj_from_str(src).expect("parse");
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 0.0]);
            assert_eq!(v.uv, [0.0, 0.0]);
        }
    }

    #[test]
    fn all_reference_forms_are_tolerated() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 1.0 0.0
vt 0.25 0.75
f 1 2/1 3//1
";
        let mesh = load_obj_from_str(src).expect("parse mixed forms");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].uv, [0.25, 0.75]);
        assert_eq!(mesh.vertices[2].normal, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 0.0]);
    }

    #[test]
    fn zero_position_index_drops_whole_triangle() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
f 1 2 0
";
        let mesh = load_obj_from_str(src).expect("parse");
        // Only the valid triangle survives; no garbage corner sneaks in.
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn out_of_range_position_drops_only_the_affected_triangle() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
f 1 2 3 99
";
        let mesh = load_obj_from_str(src).expect("parse");
        // Quad fans into (1,2,3) and (1,3,99); the second is dropped whole.
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertices.len(), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn unparsable_position_reference_drops_triangle() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
f 1 nope 3
";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn out_of_range_normal_and_texcoord_recover_as_zero() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1/9/9 2/9/9 3/9/9
";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.vertices.len(), 3);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 0.0]);
            assert_eq!(v.uv, [0.0, 0.0]);
        }
    }

    #[test]
    fn unknown_directives_and_comments_are_ignored() {
        let src = "\
# a comment
mtllib scene.mtl
o thing
g body
s off
usemtl default
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.vertices.len(), 3);
    }

    #[test]
    fn malformed_vertex_line_is_skipped() {
        let src = "\
v 0.0 nope 0.0
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let mesh = load_obj_from_str(src).expect("parse");
        // The bad 'v' never entered the pool, so ref 1 is the first good one.
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn wrong_extension_is_rejected_before_io() {
        let err = load_obj_from_path("model.txt").unwrap_err();
        assert!(matches!(err, ObjError::UnsupportedFormat(_)));
        let err = load_obj_from_path("model").unwrap_err();
        assert!(matches!(err, ObjError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_obj_from_path("definitely-not-here.obj").unwrap_err();
        assert!(matches!(err, ObjError::Io(_)));
    }

    #[test]
    fn no_triangles_is_fatal() {
        let err = load_obj_from_str("v 0.0 0.0 0.0\n").unwrap_err();
        assert!(matches!(err, ObjError::EmptyMesh));

        // Faces exist but every triangle is malformed.
        let err = load_obj_from_str("v 0.0 0.0 0.0\nf 1 0 5\n").unwrap_err();
        assert!(matches!(err, ObjError::EmptyMesh));
    }

    #[test]
    fn face_with_too_few_corners_is_skipped() {
        let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2
f 1 2 3
";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.triangle_count(), 1);
    }
}
