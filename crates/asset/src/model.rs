//! CPU-side model produced by the OBJ parser, with the post-processing
//! stages that derive texture coordinates and the interleaved buffer.

use corelib::{Aabb, Vec2, Vec3};

use crate::{ObjError, ObjResult};

/// Marks a triangle corner with no texture or normal reference.
///
/// Index arrays keep one slot per corner even when the attribute is
/// absent, so each array is always three entries per triangle.
pub const NO_INDEX: u32 = u32::MAX;

/// Geometry parsed from one OBJ file.
///
/// Built empty, populated by a single parse pass, then finalized by the
/// post-processing stages. Read-only afterwards through the accessors.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub(crate) name: Option<String>,
    pub(crate) positions: Vec<Vec3>,
    pub(crate) normals: Vec<Vec3>,
    pub(crate) tex_coords: Vec<Vec2>,
    pub(crate) position_indices: Vec<u32>,
    pub(crate) tex_coord_indices: Vec<u32>,
    pub(crate) normal_indices: Vec<u32>,
    pub(crate) centroid: Option<Vec3>,
    pub(crate) combined_buffer: Vec<f32>,
    pub(crate) smoothing_groups: Vec<String>,
    pub(crate) materials: Vec<String>,
}

impl Model {
    /// Object name from the last `o` directive, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Texture coordinates, either parsed from `vt` lines or synthesized.
    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    pub fn position_indices(&self) -> &[u32] {
        &self.position_indices
    }

    pub fn tex_coord_indices(&self) -> &[u32] {
        &self.tex_coord_indices
    }

    pub fn normal_indices(&self) -> &[u32] {
        &self.normal_indices
    }

    /// Mean of all positions, once [`Model::compute_centroid`] has run.
    pub fn centroid(&self) -> Option<Vec3> {
        self.centroid
    }

    /// Interleaved `[x, y, z, u, v]` floats, one group per position.
    pub fn combined_buffer(&self) -> &[f32] {
        &self.combined_buffer
    }

    /// Raw `s` directive operands. Stored, not interpreted.
    pub fn smoothing_groups(&self) -> &[String] {
        &self.smoothing_groups
    }

    /// Raw `usemtl`/`mtllib` operands. Stored, not interpreted.
    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    pub fn triangle_count(&self) -> usize {
        self.position_indices.len() / 3
    }

    /// Computes and stores the componentwise mean of all positions.
    ///
    /// Not part of the load pipeline; invoke on demand.
    pub fn compute_centroid(&mut self) -> ObjResult<Vec3> {
        if self.positions.is_empty() {
            return Err(ObjError::EmptyModel);
        }
        let mut sum = Vec3::ZERO;
        for position in &self.positions {
            sum += *position;
        }
        let centroid = sum / self.positions.len() as f32;
        self.centroid = Some(centroid);
        Ok(centroid)
    }

    /// Derives one planar UV per position by normalizing (x, y) into the
    /// model's bounding box.
    ///
    /// Does nothing when the file already supplied texture coordinates or
    /// there are no positions to project. A flat model has zero extent
    /// along some axis; the affected coordinate collapses to `0.0` instead
    /// of dividing by zero.
    pub fn synthesize_tex_coords(&mut self) {
        if !self.tex_coords.is_empty() || self.positions.is_empty() {
            return;
        }

        let Some(bounds) = Aabb::from_points(self.positions.iter().copied()) else {
            return;
        };
        log::debug!(
            "synthesizing UVs from bounding box min={:?} max={:?}",
            bounds.min,
            bounds.max
        );

        let extent = bounds.extent();
        self.tex_coords.reserve(self.positions.len());
        for position in &self.positions {
            let u = if extent.x > 0.0 {
                (position.x - bounds.min.x) / extent.x
            } else {
                0.0
            };
            let v = if extent.y > 0.0 {
                (position.y - bounds.min.y) / extent.y
            } else {
                0.0
            };
            self.tex_coords.push(Vec2::new(u, v));
        }

        // Synthesized UVs are addressed exactly like positions, so the
        // face-derived texture indices no longer apply.
        self.tex_coord_indices = (0..self.positions.len() as u32).collect();
    }

    /// Interleaves positions and texture coordinates into the combined
    /// `[x, y, z, u, v]` buffer, one group per vertex in position order.
    pub fn build_combined_buffer(&mut self) -> ObjResult<()> {
        if self.tex_coords.len() != self.positions.len() {
            return Err(ObjError::InconsistentBufferSize {
                positions: self.positions.len(),
                tex_coords: self.tex_coords.len(),
            });
        }

        let mut buffer = Vec::with_capacity(self.positions.len() * 5);
        for (position, uv) in self.positions.iter().zip(&self.tex_coords) {
            buffer.extend_from_slice(&[position.x, position.y, position.z, uv.x, uv.y]);
        }
        self.combined_buffer = buffer;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use corelib::{vec2, vec3};

    use super::*;

    #[test]
    fn centroid_is_the_componentwise_mean() {
        let mut model = Model::default();
        model.positions = vec![
            vec3(0.0, 0.0, 0.0),
            vec3(2.0, 0.0, 0.0),
            vec3(0.0, 2.0, 0.0),
        ];

        let centroid = model.compute_centroid().expect("non-empty model");
        assert!((centroid.x - 2.0 / 3.0).abs() < 1e-6);
        assert!((centroid.y - 2.0 / 3.0).abs() < 1e-6);
        assert!(centroid.z.abs() < 1e-6);
        assert_eq!(model.centroid(), Some(centroid));
    }

    #[test]
    fn centroid_of_empty_model_fails() {
        let mut model = Model::default();
        assert!(matches!(
            model.compute_centroid(),
            Err(ObjError::EmptyModel)
        ));
        assert_eq!(model.centroid(), None);
    }

    #[test]
    fn combined_buffer_interleaves_position_and_uv() {
        let mut model = Model::default();
        model.positions = vec![vec3(1.0, 2.0, 3.0)];
        model.tex_coords = vec![vec2(0.5, 0.5)];

        model.build_combined_buffer().expect("matching counts");
        assert_eq!(model.combined_buffer(), &[1.0, 2.0, 3.0, 0.5, 0.5]);
    }

    #[test]
    fn combined_buffer_rejects_mismatched_counts() {
        let mut model = Model::default();
        model.positions = vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)];
        model.tex_coords = vec![vec2(0.0, 0.0)];

        assert!(matches!(
            model.build_combined_buffer(),
            Err(ObjError::InconsistentBufferSize {
                positions: 2,
                tex_coords: 1,
            })
        ));
    }

    #[test]
    fn synthesis_normalizes_into_the_bounding_box() {
        let mut model = Model::default();
        model.positions = vec![
            vec3(0.0, 0.0, 0.0),
            vec3(2.0, 0.0, 0.0),
            vec3(0.0, 2.0, 0.0),
        ];

        model.synthesize_tex_coords();
        assert_eq!(
            model.tex_coords(),
            &[vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)]
        );
        assert_eq!(model.tex_coord_indices(), &[0, 1, 2]);
    }

    #[test]
    fn synthesis_is_a_no_op_when_uvs_exist() {
        let mut model = Model::default();
        model.positions = vec![vec3(0.0, 0.0, 0.0), vec3(4.0, 4.0, 0.0)];
        model.tex_coords = vec![vec2(0.25, 0.75), vec2(0.5, 0.5)];

        model.synthesize_tex_coords();
        assert_eq!(model.tex_coords(), &[vec2(0.25, 0.75), vec2(0.5, 0.5)]);
        assert!(model.tex_coord_indices().is_empty());
    }

    #[test]
    fn synthesis_without_positions_does_nothing() {
        let mut model = Model::default();
        model.synthesize_tex_coords();
        assert!(model.tex_coords().is_empty());
        assert!(model.tex_coord_indices().is_empty());
    }

    #[test]
    fn flat_model_collapses_uv_axis_to_zero() {
        let mut model = Model::default();
        model.positions = vec![
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 2.0),
            vec3(0.0, 2.0, 5.0),
        ];

        model.synthesize_tex_coords();
        assert_eq!(
            model.tex_coords(),
            &[vec2(0.0, 0.0), vec2(0.0, 0.5), vec2(0.0, 1.0)]
        );
    }
}
