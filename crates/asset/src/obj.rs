//! Line-oriented Wavefront OBJ parser.
//!
//! Supports positions, normals, texture coordinates and faces with mixed
//! optional per-corner attribute indices. Faces with more than three
//! corners are fan-triangulated on ingestion. After parsing, models with
//! no texture coordinates get planar UVs synthesized from the bounding
//! box, and the interleaved vertex buffer is assembled last.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::{
    ObjError, ObjResult,
    model::{Model, NO_INDEX},
};

/// One face corner, with indices already converted to base 0.
///
/// The position index is mandatory; texture and normal indices are each
/// optional per corner, independent of the rest of the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Corner {
    position: u32,
    tex_coord: Option<u32>,
    normal: Option<u32>,
}

/// Load an OBJ model from a file path.
///
/// The path must carry the `obj` extension; anything else fails before
/// the file is opened.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> ObjResult<Model> {
    let path = path.as_ref();
    let is_obj = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
    if !is_obj {
        return Err(ObjError::UnrecognizedFormat(path.to_path_buf()));
    }

    log::info!("Loading OBJ model from {}", path.display());
    let file = File::open(path)?;
    load_obj_from_reader(BufReader::new(file))
}

/// Load an OBJ model from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> ObjResult<Model> {
    let mut model = parse_obj(reader)?;
    finalize(&mut model)?;
    Ok(model)
}

/// Convenience helper to load an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> ObjResult<Model> {
    load_obj_from_reader(io::Cursor::new(contents))
}

/// Post-parse stages in their required order: UV synthesis (only when the
/// file supplied none) must run before buffer interleaving.
fn finalize(model: &mut Model) -> ObjResult<()> {
    if model.tex_coords().is_empty() {
        model.synthesize_tex_coords();
    }
    model.build_combined_buffer()
}

fn parse_obj<R: BufRead>(reader: R) -> ObjResult<Model> {
    let mut model = Model::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (tag, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        match tag {
            "o" => model.name = Some(rest.trim().to_owned()),
            "v" => {
                let position = parse_vec3(rest, line_no)?;
                model.positions.push(position);
            }
            "vn" => {
                let normal = parse_vec3(rest, line_no)?;
                model.normals.push(normal);
            }
            "vt" => {
                let uv = parse_vec2(rest, line_no)?;
                model.tex_coords.push(uv);
            }
            "f" => parse_face(&mut model, rest, line_no)?,
            "s" => model.smoothing_groups.push(rest.trim().to_owned()),
            "usemtl" | "mtllib" => model.materials.push(rest.trim().to_owned()),
            _ => {
                // Ignore other directives (g/l/p/etc.)
            }
        }
    }

    log::debug!(
        "parsed {} positions, {} normals, {} texture coordinates, {} triangles",
        model.positions().len(),
        model.normals().len(),
        model.tex_coords().len(),
        model.triangle_count()
    );
    Ok(model)
}

fn parse_face(model: &mut Model, rest: &str, line_no: usize) -> ObjResult<()> {
    let mut corners = Vec::with_capacity(4);
    for descriptor in rest.split_whitespace() {
        corners.push(parse_corner(descriptor, model, line_no)?);
    }
    if corners.len() < 3 {
        return Err(ObjError::malformed(
            line_no,
            format!("face needs at least 3 corners, got {}", corners.len()),
        ));
    }

    for triangle in triangulate_fan(&corners) {
        for corner in triangle {
            model.position_indices.push(corner.position);
            model
                .tex_coord_indices
                .push(corner.tex_coord.unwrap_or(NO_INDEX));
            model.normal_indices.push(corner.normal.unwrap_or(NO_INDEX));
        }
    }
    Ok(())
}

/// Fan decomposition around the first corner: an n-gon becomes the n-2
/// triangles `(corners[0], corners[i], corners[i+1])`, in source order.
/// Assumes convex, planar polygons.
fn triangulate_fan(corners: &[Corner]) -> impl Iterator<Item = [Corner; 3]> + '_ {
    (1..corners.len().saturating_sub(1)).map(|i| [corners[0], corners[i], corners[i + 1]])
}

/// Parse one `p`, `p/t`, `p//n` or `p/t/n` face descriptor against the
/// arrays declared so far.
fn parse_corner(descriptor: &str, model: &Model, line_no: usize) -> ObjResult<Corner> {
    let mut fields = descriptor.split('/');

    let position = resolve_index(fields.next(), model.positions().len(), line_no, "position")?
        .ok_or_else(|| {
            ObjError::malformed(
                line_no,
                format!("face corner '{descriptor}' is missing its position index"),
            )
        })?;
    let tex_coord = resolve_index(fields.next(), model.tex_coords().len(), line_no, "texture")?;
    let normal = resolve_index(fields.next(), model.normals().len(), line_no, "normal")?;

    Ok(Corner {
        position,
        tex_coord,
        normal,
    })
}

/// Convert a 1-based index field to base 0, checking that it lands inside
/// the target array. Missing or empty fields resolve to `None`.
fn resolve_index(
    field: Option<&str>,
    len: usize,
    line_no: usize,
    what: &str,
) -> ObjResult<Option<u32>> {
    let Some(token) = field else {
        return Ok(None);
    };
    if token.is_empty() {
        return Ok(None);
    }

    let raw: u32 = token.parse().map_err(|_| {
        ObjError::malformed(line_no, format!("invalid {what} index '{token}'"))
    })?;
    if raw == 0 || raw as usize > len {
        return Err(ObjError::malformed(
            line_no,
            format!("{what} index {raw} out of range (1..={len})"),
        ));
    }
    Ok(Some(raw - 1))
}

fn parse_vec3(rest: &str, line_no: usize) -> ObjResult<corelib::Vec3> {
    let mut fields = rest.split_whitespace();
    let x = parse_f32(fields.next(), line_no, "x")?;
    let y = parse_f32(fields.next(), line_no, "y")?;
    let z = parse_f32(fields.next(), line_no, "z")?;
    Ok(corelib::vec3(x, y, z))
}

fn parse_vec2(rest: &str, line_no: usize) -> ObjResult<corelib::Vec2> {
    let mut fields = rest.split_whitespace();
    let u = parse_f32(fields.next(), line_no, "u")?;
    let v = parse_f32(fields.next(), line_no, "v")?;
    Ok(corelib::vec2(u, v))
}

fn parse_f32(token: Option<&str>, line_no: usize, what: &str) -> ObjResult<f32> {
    let token = token
        .ok_or_else(|| ObjError::malformed(line_no, format!("missing {what} component")))?;
    token.parse::<f32>().map_err(|_| {
        ObjError::malformed(line_no, format!("invalid {what} component '{token}'"))
    })
}
