//! Procedural geometry for the diorama props.

use crate::core::types::Vec3;
use crate::render::mesh::{MeshData, SurfaceVertex};
use crate::scene::rand::hash_2d;

/// Horizontal water plane centered on the origin. UVs match the pointer
/// hit test in `math::ray::Ray::hit_rect_uv`: u grows with +x, v with -z.
pub fn pond_plane(size: f32, segments: u32) -> (Vec<SurfaceVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((segments + 1) * (segments + 1)) as usize);
    for row in 0..=segments {
        for col in 0..=segments {
            let u = col as f32 / segments as f32;
            let v = row as f32 / segments as f32;
            let x = (u - 0.5) * size;
            let z = (0.5 - v) * size;
            vertices.push(SurfaceVertex {
                position: [x, 0.0, z],
                normal: [0.0, 1.0, 0.0],
                uv: [u, v],
            });
        }
    }
    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    let stride = segments + 1;
    for row in 0..segments {
        for col in 0..segments {
            let a = row * stride + col;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    (vertices, indices)
}

/// Axis-aligned vertical sheet in the xy plane, facing +z.
pub fn vertical_sheet(width: f32, height: f32, center: Vec3) -> (Vec<SurfaceVertex>, Vec<u32>) {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let at = |x: f32, y: f32| (center + Vec3::new(x, y, 0.0)).to_array();
    let vertices = vec![
        SurfaceVertex { position: at(-hw, -hh), normal: [0.0, 0.0, 1.0], uv: [0.0, 1.0] },
        SurfaceVertex { position: at(hw, -hh), normal: [0.0, 0.0, 1.0], uv: [1.0, 1.0] },
        SurfaceVertex { position: at(hw, hh), normal: [0.0, 0.0, 1.0], uv: [1.0, 0.0] },
        SurfaceVertex { position: at(-hw, hh), normal: [0.0, 0.0, 1.0], uv: [0.0, 0.0] },
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];
    (vertices, indices)
}

/// Star-shaped prism: `prongs` points alternating between `outer` and
/// `inner` radius in the xy plane, extruded along +z. Side faces get their
/// UVs from the extruded-planar remap in the shader, so per-vertex UVs
/// here just carry the xy projection.
pub fn star_prism(
    prongs: u32,
    outer: f32,
    inner: f32,
    depth: f32,
    offset: Vec3,
) -> (Vec<SurfaceVertex>, Vec<u32>) {
    let ring: Vec<(f32, f32)> = (0..prongs * 2)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / (prongs * 2) as f32;
            let radius = if i % 2 == 0 { outer } else { inner };
            (angle.cos() * radius, angle.sin() * radius)
        })
        .collect();

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Front and back caps as fans around the center.
    for (cap_z, normal_z) in [(depth, 1.0f32), (0.0, -1.0)] {
        let base = vertices.len() as u32;
        vertices.push(SurfaceVertex {
            position: (offset + Vec3::new(0.0, 0.0, cap_z)).to_array(),
            normal: [0.0, 0.0, normal_z],
            uv: [offset.x, offset.y],
        });
        for &(x, y) in &ring {
            let p = offset + Vec3::new(x, y, cap_z);
            vertices.push(SurfaceVertex {
                position: p.to_array(),
                normal: [0.0, 0.0, normal_z],
                uv: [p.x, p.y],
            });
        }
        let n = ring.len() as u32;
        for i in 0..n {
            let a = base + 1 + i;
            let b = base + 1 + (i + 1) % n;
            if normal_z > 0.0 {
                indices.extend_from_slice(&[base, a, b]);
            } else {
                indices.extend_from_slice(&[base, b, a]);
            }
        }
    }

    // Side walls, one quad per ring edge with its own outward normal.
    let n = ring.len();
    for i in 0..n {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % n];
        let edge = Vec3::new(x1 - x0, y1 - y0, 0.0);
        let normal = edge.cross(Vec3::Z).normalize_or_zero();
        let base = vertices.len() as u32;
        for (x, y) in [(x0, y0), (x1, y1)] {
            for z in [0.0, depth] {
                let p = offset + Vec3::new(x, y, z);
                vertices.push(SurfaceVertex {
                    position: p.to_array(),
                    normal: normal.to_array(),
                    uv: [p.x, p.y],
                });
            }
        }
        indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
    }

    (vertices, indices)
}

/// Open cone with apex up, base radius 1, height 1, centered on the base.
pub fn cone(radial_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    mesh.positions.push(Vec3::new(0.0, 1.0, 0.0));
    for i in 0..radial_segments {
        let angle = std::f32::consts::TAU * i as f32 / radial_segments as f32;
        mesh.positions.push(Vec3::new(angle.cos(), 0.0, angle.sin()));
    }
    for i in 0..radial_segments {
        let a = 1 + i;
        let b = 1 + (i + 1) % radial_segments;
        mesh.indices.extend_from_slice(&[0, b, a]);
    }
    mesh.recompute_normals();
    mesh
}

/// Unit octahedron, the paper-boat body used for fish and splash motes.
pub fn octahedron() -> MeshData {
    let mut mesh = MeshData {
        positions: vec![
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
        ],
        normals: vec![],
        indices: vec![
            0, 2, 4, 4, 2, 1, 1, 2, 5, 5, 2, 0, //
            4, 3, 0, 1, 3, 4, 5, 3, 1, 0, 3, 5,
        ],
    };
    mesh.recompute_normals();
    mesh
}

/// Thin vertical quad for the instanced rain sheets.
pub fn rain_sheet() -> MeshData {
    let mut mesh = MeshData {
        positions: vec![
            Vec3::new(-0.01, -0.25, 0.0),
            Vec3::new(0.01, -0.25, 0.0),
            Vec3::new(0.01, 0.25, 0.0),
            Vec3::new(-0.01, 0.25, 0.0),
        ],
        normals: vec![],
        indices: vec![0, 1, 2, 0, 2, 3],
    };
    mesh.recompute_normals();
    mesh
}

/// Jagged backdrop ridge: a segmented plane with hashed vertex heights,
/// flat shaded by duplicating vertices per triangle.
pub fn mountain_range(
    width: f32,
    depth: f32,
    segments_x: u32,
    segments_z: u32,
    height_min: f32,
    height_max: f32,
    seed: u32,
) -> MeshData {
    let sample = |col: u32, row: u32| -> Vec3 {
        let u = col as f32 / segments_x as f32;
        let v = row as f32 / segments_z as f32;
        let h = height_min + hash_2d(col as i32, row as i32, seed) * (height_max - height_min);
        Vec3::new((u - 0.5) * width, h, (v - 0.5) * depth)
    };

    let mut mesh = MeshData::default();
    for row in 0..segments_z {
        for col in 0..segments_x {
            let corners = [
                sample(col, row),
                sample(col + 1, row),
                sample(col, row + 1),
                sample(col + 1, row + 1),
            ];
            for tri in [[0usize, 2, 1], [1, 2, 3]] {
                let base = mesh.positions.len() as u32;
                for &i in &tri {
                    mesh.positions.push(corners[i]);
                }
                mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
            }
        }
    }
    mesh.recompute_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pond_plane_uv_matches_hit_test() {
        use crate::math::Ray;
        let size = 4.0;
        let (vertices, _) = pond_plane(size, 8);
        // A ray straight down onto a vertex must report that vertex's uv.
        let v = &vertices[3];
        let ray = Ray {
            origin: Vec3::new(v.position[0], 5.0, v.position[2]),
            direction: Vec3::NEG_Y,
        };
        let uv = ray
            .hit_rect_uv(0.0, glam::Vec2::ZERO, glam::Vec2::splat(size * 0.5))
            .unwrap();
        assert!((uv.x - v.uv[0]).abs() < 1e-6, "u mismatch: {} vs {}", uv.x, v.uv[0]);
        assert!((uv.y - v.uv[1]).abs() < 1e-6, "v mismatch: {} vs {}", uv.y, v.uv[1]);
    }

    #[test]
    fn test_star_prism_counts() {
        let (vertices, indices) = star_prism(5, 1.0, 0.5, 0.3, Vec3::ZERO);
        // 2 caps of 11 verts each plus 10 side quads of 4 verts.
        assert_eq!(vertices.len(), 22 + 40);
        assert_eq!(indices.len() % 3, 0);
        // Every prong tip sits at the outer radius.
        let max_r = vertices
            .iter()
            .map(|v| (v.position[0].powi(2) + v.position[1].powi(2)).sqrt())
            .fold(0.0f32, f32::max);
        assert!((max_r - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mountain_heights_in_band() {
        let mesh = mountain_range(35.0, 50.0, 35, 50, -10.0, 15.0, 3);
        for p in &mesh.positions {
            assert!(
                (-10.0..=15.0).contains(&p.y),
                "vertex height {} outside band",
                p.y
            );
        }
    }

    #[test]
    fn test_cone_apex() {
        let mesh = cone(12);
        assert_eq!(mesh.positions[0], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.indices.len(), 36);
    }
}
