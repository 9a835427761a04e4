//! STL codec for [`TriangleMesh`]: binary and ASCII formats.

use std::path::Path;

use crate::geometry::Vec3;
use crate::mesh::TriangleMesh;
use crate::types::GeometryError;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

fn parse_error(reason: impl Into<String>) -> GeometryError {
    GeometryError::StlParse {
        reason: reason.into(),
    }
}

fn check_indices(mesh: &TriangleMesh) -> Result<(), GeometryError> {
    if mesh.triangles.is_empty() {
        return Err(GeometryError::EmptyResult {
            operation: "STL export".to_string(),
        });
    }
    let vertex_count = mesh.positions.len();
    for tri in &mesh.triangles {
        for &idx in tri {
            if idx as usize >= vertex_count {
                return Err(parse_error(format!(
                    "index {} out of range (vertex count = {})",
                    idx, vertex_count
                )));
            }
        }
    }
    Ok(())
}

/// Export a mesh as binary STL.
///
/// Binary STL format:
/// - 80-byte header (arbitrary text)
/// - u32 triangle count (little-endian)
/// - For each triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes
pub fn write_binary(mesh: &TriangleMesh, name: &str) -> Result<Vec<u8>, GeometryError> {
    check_indices(mesh)?;
    let tri_count = mesh.triangle_count();
    let mut buf = Vec::with_capacity(HEADER_LEN + 4 + tri_count * TRIANGLE_LEN);

    let header = format!("binary STL: {}", name);
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(HEADER_LEN)]);
    buf.resize(HEADER_LEN, 0u8);

    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for (i, tri) in mesh.triangles.iter().enumerate() {
        for n in mesh.triangle_normal(i) {
            buf.extend_from_slice(&(n as f32).to_le_bytes());
        }
        for &idx in tri {
            for c in mesh.positions[idx as usize] {
                buf.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        // Attribute byte count (unused)
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(buf)
}

/// Export a mesh as an ASCII STL string.
pub fn write_ascii(mesh: &TriangleMesh, name: &str) -> Result<String, GeometryError> {
    check_indices(mesh)?;
    let mut out = String::with_capacity(mesh.triangle_count() * 300);
    out.push_str(&format!("solid {}\n", name));

    for (i, tri) in mesh.triangles.iter().enumerate() {
        let [nx, ny, nz] = mesh.triangle_normal(i);
        out.push_str(&format!("  facet normal {} {} {}\n", nx, ny, nz));
        out.push_str("    outer loop\n");
        for &idx in tri {
            let [x, y, z] = mesh.positions[idx as usize];
            out.push_str(&format!("      vertex {} {} {}\n", x, y, z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {}\n", name));
    Ok(out)
}

fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let mut count = [0u8; 4];
    count.copy_from_slice(&bytes[HEADER_LEN..HEADER_LEN + 4]);
    let tri_count = u32::from_le_bytes(count) as usize;
    tri_count
        .checked_mul(TRIANGLE_LEN)
        .and_then(|body| body.checked_add(HEADER_LEN + 4))
        == Some(bytes.len())
}

fn read_f32(bytes: &[u8], offset: usize) -> f64 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_le_bytes(raw) as f64
}

fn parse_binary(bytes: &[u8]) -> Vec<[[f64; 3]; 3]> {
    bytes[HEADER_LEN + 4..]
        .chunks_exact(TRIANGLE_LEN)
        .map(|record| {
            // Skip the stored normal; winding is authoritative.
            let mut tri = [[0.0; 3]; 3];
            for (k, corner) in tri.iter_mut().enumerate() {
                for (c, value) in corner.iter_mut().enumerate() {
                    *value = read_f32(record, 12 + k * 12 + c * 4);
                }
            }
            tri
        })
        .collect()
}

fn parse_ascii(text: &str) -> Result<Vec<[[f64; 3]; 3]>, GeometryError> {
    let mut tokens = text.split_whitespace();
    match tokens.next() {
        Some("solid") => {}
        _ => return Err(parse_error("missing 'solid' keyword")),
    }

    let mut soup = Vec::new();
    let mut corners: Vec<[f64; 3]> = Vec::with_capacity(3);
    let mut closed = false;
    while let Some(token) = tokens.next() {
        match token {
            "vertex" => {
                let mut p = [0.0; 3];
                for value in p.iter_mut() {
                    let raw = tokens
                        .next()
                        .ok_or_else(|| parse_error("truncated vertex"))?;
                    *value = raw
                        .parse::<f64>()
                        .map_err(|e| parse_error(format!("bad coordinate '{}': {}", raw, e)))?;
                }
                corners.push(p);
            }
            "endloop" => {
                if corners.len() != 3 {
                    return Err(parse_error(format!(
                        "facet has {} vertices, expected 3",
                        corners.len()
                    )));
                }
                soup.push([corners[0], corners[1], corners[2]]);
                corners.clear();
            }
            "endsolid" => {
                closed = true;
                break;
            }
            _ => {}
        }
    }
    if !closed {
        return Err(parse_error("missing 'endsolid'"));
    }
    Ok(soup)
}

/// Parse STL bytes (binary or ASCII, detected from the length field) into
/// an indexed mesh, welding corners closer than `weld_tol`.
pub fn read(bytes: &[u8], weld_tol: f64) -> Result<TriangleMesh, GeometryError> {
    let soup = if is_binary(bytes) {
        parse_binary(bytes)
    } else {
        let text =
            std::str::from_utf8(bytes).map_err(|e| parse_error(format!("not UTF-8: {}", e)))?;
        parse_ascii(text)?
    };
    if soup
        .iter()
        .flatten()
        .any(|p| !Vec3::from_array(*p).is_finite())
    {
        return Err(parse_error("non-finite vertex coordinate"));
    }
    Ok(TriangleMesh::from_triangle_soup(&soup, weld_tol))
}

pub fn read_file(path: &Path, weld_tol: f64) -> Result<TriangleMesh, GeometryError> {
    let bytes = std::fs::read(path).map_err(|e| GeometryError::Io {
        reason: format!("{}: {}", path.display(), e),
    })?;
    read(&bytes, weld_tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> TriangleMesh {
        TriangleMesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn binary_layout() {
        let stl = write_binary(&triangle(), "test").unwrap();
        assert_eq!(stl.len(), 80 + 4 + 50);
        assert_eq!(u32::from_le_bytes([stl[80], stl[81], stl[82], stl[83]]), 1);
        let header = String::from_utf8_lossy(&stl[..80]);
        assert!(header.contains("test"));
        // Normal z component
        assert_eq!(read_f32(&stl, 84 + 8), 1.0);
    }

    #[test]
    fn ascii_structure() {
        let stl = write_ascii(&triangle(), "tri").unwrap();
        assert!(stl.starts_with("solid tri\n"));
        assert!(stl.ends_with("endsolid tri\n"));
        assert_eq!(stl.matches("vertex").count(), 3);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let err = write_binary(&TriangleMesh::default(), "x").unwrap_err();
        assert!(matches!(err, GeometryError::EmptyResult { .. }));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut mesh = triangle();
        mesh.triangles[0][2] = 7;
        assert!(write_ascii(&mesh, "x").is_err());
    }

    #[test]
    fn both_formats_read_back() {
        let mesh = triangle();
        let from_binary = read(&write_binary(&mesh, "t").unwrap(), 1e-6).unwrap();
        let from_ascii = read(write_ascii(&mesh, "t").unwrap().as_bytes(), 1e-6).unwrap();
        assert_eq!(from_binary.triangles, mesh.triangles);
        assert_eq!(from_ascii, mesh);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            read(b"hello world", 1e-6),
            Err(GeometryError::StlParse { .. })
        ));
        assert!(matches!(
            read(b"solid x facet outer loop vertex 0 0", 1e-6),
            Err(GeometryError::StlParse { .. })
        ));
    }
}
