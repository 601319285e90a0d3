//! Procedural meshes: unit cube, torus knot, torus, UV sphere.
//!
//! The tube-like shapes lay out `uv.x` along their primary parameter so
//! the weave demo's offset table slices them into contiguous bands.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::MeshData;

/// The shapes the weave demo cycles through with the randomize key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// (4, 2) torus knot, the default.
    TorusKnot,
    /// Plain torus.
    Torus,
    /// UV sphere.
    Sphere,
}

impl ShapeKind {
    /// The next shape in the cycle.
    pub fn next(self) -> Self {
        match self {
            Self::TorusKnot => Self::Torus,
            Self::Torus => Self::Sphere,
            Self::Sphere => Self::TorusKnot,
        }
    }

    /// Build this shape's mesh at its demo-tuned proportions.
    pub fn mesh(self) -> MeshData {
        match self {
            Self::TorusKnot => torus_knot(0.5, 0.15, 200, 40, 4, 2),
            Self::Torus => torus(0.5, 0.2, 40, 40),
            Self::Sphere => uv_sphere(0.7, 64, 32),
        }
    }
}

/// Axis-aligned unit cube centered at the origin, with flat-shaded faces.
pub fn cube() -> MeshData {
    // (face normal, tangent u, tangent v)
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, tan_u, tan_v) in FACES {
        let base = mesh.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
        {
            let pos = (normal + tan_u * su + tan_v * sv) * 0.5;
            mesh.positions.push(pos);
            mesh.normals.push(normal);
            mesh.uvs
                .push(Vec2::new(su * 0.5 + 0.5, sv * 0.5 + 0.5));
        }
        mesh.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
        ]);
    }
    mesh
}

fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let cs = (q / p * u).cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * (q / p * u).sin() * 0.5,
    )
}

/// (p, q) torus knot swept with a circular tube.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let mut mesh = MeshData::default();
    let (pf, qf) = (p as f32, q as f32);

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * pf * TAU;
        // Frenet-ish frame from two nearby curve points
        let p1 = knot_curve(u, pf, qf, radius);
        let p2 = knot_curve(u + 0.01, pf, qf, radius);
        let t = p2 - p1;
        let n = p2 + p1;
        let b = t.cross(n).normalize();
        let n = b.cross(t).normalize();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();

            let pos = p1 + n * cx + b * cy;
            mesh.positions.push(pos);
            mesh.normals.push((pos - p1).normalize());
            mesh.uvs.push(Vec2::new(
                i as f32 / tubular_segments as f32,
                j as f32 / radial_segments as f32,
            ));
        }
    }

    grid_indices(&mut mesh.indices, tubular_segments, radial_segments);
    mesh
}

/// Plain torus in the XY plane.
pub fn torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> MeshData {
    let mut mesh = MeshData::default();

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * TAU;
        let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let pos = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            mesh.positions.push(pos);
            mesh.normals.push((pos - center).normalize());
            mesh.uvs.push(Vec2::new(
                i as f32 / tubular_segments as f32,
                j as f32 / radial_segments as f32,
            ));
        }
    }

    grid_indices(&mut mesh.indices, tubular_segments, radial_segments);
    mesh
}

/// Latitude/longitude sphere; `uv.x` runs along longitude.
pub fn uv_sphere(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
) -> MeshData {
    let mut mesh = MeshData::default();

    for i in 0..=width_segments {
        let u = i as f32 / width_segments as f32;
        let phi = u * TAU;

        for j in 0..=height_segments {
            let v = j as f32 / height_segments as f32;
            let theta = v * std::f32::consts::PI;

            let normal = Vec3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            );
            mesh.positions.push(normal * radius);
            mesh.normals.push(normal);
            mesh.uvs.push(Vec2::new(u, v));
        }
    }

    grid_indices(&mut mesh.indices, width_segments, height_segments);
    mesh
}

/// Two triangles per quad over an (outer+1) x (inner+1) vertex grid.
fn grid_indices(indices: &mut Vec<u32>, outer: u32, inner: u32) {
    for i in 1..=outer {
        for j in 1..=inner {
            let a = (inner + 1) * (i - 1) + (j - 1);
            let b = (inner + 1) * i + (j - 1);
            let c = (inner + 1) * i + j;
            let d = (inner + 1) * (i - 1) + j;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(mesh: &MeshData) {
        let n = mesh.positions.len();
        assert_eq!(mesh.normals.len(), n);
        assert_eq!(mesh.uvs.len(), n);
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < n));
        for normal in &mesh.normals {
            assert!((normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cube_is_valid() {
        let mesh = cube();
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_valid(&mesh);
        for pos in &mesh.positions {
            assert!(pos.abs().max_element() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn torus_knot_matches_segment_counts() {
        let mesh = torus_knot(0.5, 0.15, 200, 40, 4, 2);
        assert_eq!(mesh.positions.len(), 201 * 41);
        assert_eq!(mesh.indices.len(), (200 * 40 * 6) as usize);
        assert_valid(&mesh);
    }

    #[test]
    fn barcode_coordinate_spans_unit_range() {
        for mesh in [
            torus_knot(0.5, 0.15, 50, 8, 4, 2),
            torus(0.5, 0.2, 8, 50),
            uv_sphere(0.7, 50, 8),
        ] {
            let min = mesh.uvs.iter().map(|uv| uv.x).fold(f32::MAX, f32::min);
            let max = mesh.uvs.iter().map(|uv| uv.x).fold(f32::MIN, f32::max);
            assert_eq!(min, 0.0);
            assert_eq!(max, 1.0);
        }
    }

    #[test]
    fn barcode_coordinate_is_monotonic_along_tube() {
        let mesh = torus_knot(0.5, 0.15, 50, 8, 4, 2);
        // Vertices are emitted ring by ring; uv.x must never decrease
        let mut prev = 0.0f32;
        for uv in &mesh.uvs {
            assert!(uv.x >= prev - 1e-6);
            prev = prev.max(uv.x);
        }
    }

    #[test]
    fn shape_cycle_visits_all_and_returns() {
        let start = ShapeKind::TorusKnot;
        let mut seen = vec![start];
        let mut current = start;
        loop {
            current = current.next();
            if current == start {
                break;
            }
            seen.push(current);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn all_shapes_build_valid_meshes() {
        for kind in
            [ShapeKind::TorusKnot, ShapeKind::Torus, ShapeKind::Sphere]
        {
            assert_valid(&kind.mesh());
        }
    }
}
