/// Interleaved vertex data: position (3), color (3), texcoord (2).
pub const FLOATS_PER_VERTEX: usize = 8;

pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Latitude/longitude sphere centered at the origin. Colors are flat
    /// until something bakes lighting into them.
    pub fn sphere(radius: f32, stacks: u32, slices: u32, r: f32, g: f32, b: f32) -> Self {
        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize * FLOATS_PER_VERTEX);
        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);

        for i in 0..=stacks {
            let theta = i as f32 * std::f32::consts::PI / stacks as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for j in 0..=slices {
                let phi = j as f32 * 2.0 * std::f32::consts::PI / slices as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();

                let x = sin_theta * cos_phi;
                let y = cos_theta;
                let z = sin_theta * sin_phi;

                vertices.extend_from_slice(&[
                    radius * x, radius * y, radius * z,
                    r, g, b,
                    j as f32 / slices as f32,
                    i as f32 / stacks as f32,
                ]);
            }
        }

        for i in 0..stacks {
            for j in 0..slices {
                let a = (i * (slices + 1) + j) as u16;
                let b = a + slices as u16 + 1;
                indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
            }
        }

        Mesh { vertices, indices }
    }

    /// Rectangle in the XY plane facing +Z, centered at the origin.
    /// Texcoords run top-left to bottom-right like a canvas.
    pub fn plane(width: f32, height: f32) -> Self {
        let w = width / 2.0;
        let h = height / 2.0;

        let vertices = vec![
            -w, -h, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0,
             w, -h, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0,
             w,  h, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0,
            -w,  h, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0,
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];

        Mesh { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_has_expected_counts() {
        let mesh = Mesh::sphere(1.0, 16, 16, 0.0, 0.0, 1.0);
        assert_eq!(mesh.vertex_count(), 17 * 17);
        assert_eq!(mesh.indices.len(), 16 * 16 * 6);
    }

    #[test]
    fn sphere_indices_stay_in_range() {
        let mesh = Mesh::sphere(2.5, 16, 16, 1.0, 0.0, 0.0);
        let count = mesh.vertex_count() as u16;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn sphere_vertices_lie_on_the_radius() {
        let radius = 2.5;
        let mesh = Mesh::sphere(radius, 16, 16, 1.0, 1.0, 1.0);
        for v in mesh.vertices.chunks_exact(FLOATS_PER_VERTEX) {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - radius).abs() < 1e-4, "vertex off the sphere: {len}");
        }
    }

    #[test]
    fn plane_spans_its_dimensions() {
        let mesh = Mesh::plane(10.0, 4.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        let xs: Vec<f32> = mesh.vertices.chunks_exact(FLOATS_PER_VERTEX).map(|v| v[0]).collect();
        let ys: Vec<f32> = mesh.vertices.chunks_exact(FLOATS_PER_VERTEX).map(|v| v[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 5.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), -2.0);
    }

    #[test]
    fn plane_texcoords_cover_the_unit_square() {
        let mesh = Mesh::plane(1.0, 1.0);
        let uvs: Vec<(f32, f32)> = mesh
            .vertices
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(|v| (v[6], v[7]))
            .collect();
        assert_eq!(uvs, vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    }
}
