//! Wavefront OBJ mesh parsing.
//!
//! Supports `v`, `vt`, `vn`, `f` and `usemtl`. Other records (`o`, `g`, `s`,
//! `mtllib`, ...) are skipped. Faces are triangulated on the way in.

use crate::error::{ExportError, Result};
use glam::Vec3;

/// A triangle with 0-based pool indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjTriangle {
    pub vertices: [usize; 3],
    pub tex_coords: Option<[usize; 3]>,
    pub normals: Option<[usize; 3]>,
    /// Active `usemtl` name, if any.
    pub material: Option<String>,
}

/// A parsed OBJ mesh.
#[derive(Debug, Clone, Default)]
pub struct ObjModel {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<[f32; 2]>,
    pub triangles: Vec<ObjTriangle>,
}

impl ObjModel {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Material names in first-use order.
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for tri in &self.triangles {
            if let Some(name) = tri.material.as_deref() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

#[derive(Debug, Clone, Copy)]
struct Corner {
    vertex: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

/// Parse OBJ text.
pub fn parse_obj(text: &str) -> Result<ObjModel> {
    let mut model = ObjModel::default();
    let mut material: Option<String> = None;

    for (line_idx, raw) in text.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&args, line_num, "vertex")?;
                model.positions.push(Vec3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&args, line_num, "normal")?;
                model.normals.push(Vec3::new(x, y, z));
            }
            "vt" => {
                if args.is_empty() {
                    return Err(ExportError::obj_parse(line_num, "texture coordinate needs a value"));
                }
                let u = parse_float(args[0], line_num)?;
                let v = match args.get(1) {
                    Some(s) => parse_float(s, line_num)?,
                    None => 0.0,
                };
                model.tex_coords.push([u, v]);
            }
            "f" => {
                if args.len() < 3 {
                    return Err(ExportError::obj_parse(line_num, "face needs at least 3 vertices"));
                }
                let corners = args
                    .iter()
                    .map(|token| parse_corner(token, line_num, &model))
                    .collect::<Result<Vec<_>>>()?;

                // Fan from corner 0: a triangle stays as-is, a quad splits on 0-2.
                for i in 1..corners.len() - 1 {
                    model
                        .triangles
                        .push(make_triangle([corners[0], corners[i], corners[i + 1]], &material));
                }
            }
            "usemtl" => {
                // Names may contain spaces, matching `newmtl`.
                let name = args.join(" ");
                material = (!name.is_empty()).then_some(name);
            }
            _ => {}
        }
    }

    Ok(model)
}

fn make_triangle(corners: [Corner; 3], material: &Option<String>) -> ObjTriangle {
    let tex_coords = match corners.map(|c| c.tex_coord) {
        [Some(a), Some(b), Some(c)] => Some([a, b, c]),
        _ => None,
    };
    let normals = match corners.map(|c| c.normal) {
        [Some(a), Some(b), Some(c)] => Some([a, b, c]),
        _ => None,
    };
    ObjTriangle {
        vertices: corners.map(|c| c.vertex),
        tex_coords,
        normals,
        material: material.clone(),
    }
}

/// Parse `v`, `v/t`, `v//n` or `v/t/n`.
fn parse_corner(token: &str, line: usize, model: &ObjModel) -> Result<Corner> {
    let mut fields = token.split('/');
    let vertex = match fields.next() {
        Some(s) if !s.is_empty() => resolve_index(s, model.positions.len(), line, "vertex")?,
        _ => return Err(ExportError::obj_parse(line, format!("missing vertex index in '{}'", token))),
    };
    let tex_coord = match fields.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, model.tex_coords.len(), line, "texture")?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, model.normals.len(), line, "normal")?),
        _ => None,
    };
    Ok(Corner {
        vertex,
        tex_coord,
        normal,
    })
}

/// Convert a 1-based or negative relative index into a 0-based one.
fn resolve_index(token: &str, count: usize, line: usize, kind: &str) -> Result<usize> {
    let raw: i64 = token
        .parse()
        .map_err(|_| ExportError::obj_parse(line, format!("invalid {} index '{}'", kind, token)))?;
    let resolved = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        count as i64 + raw
    } else {
        return Err(ExportError::obj_parse(line, format!("{} index 0 is not valid", kind)));
    };
    if resolved < 0 || resolved >= count as i64 {
        return Err(ExportError::obj_parse(
            line,
            format!("{} index {} out of range ({} defined)", kind, raw, count),
        ));
    }
    Ok(resolved as usize)
}

/// Parse a finite number. `nan`, `inf` and out-of-range values are rejected.
fn parse_float(token: &str, line: usize) -> Result<f32> {
    match token.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ExportError::obj_parse(line, format!("invalid number '{}'", token))),
    }
}

fn parse_floats<const N: usize>(args: &[&str], line: usize, kind: &str) -> Result<[f32; N]> {
    if args.len() < N {
        return Err(ExportError::obj_parse(
            line,
            format!("{} needs {} values, found {}", kind, N, args.len()),
        ));
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(args) {
        *slot = parse_float(token, line)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a unit quad
v 0 0 0
v 1 0 0
v 1 0 1
v 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 1 0
usemtl Wood
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_parse_quad_splits_on_first_diagonal() {
        let model = parse_obj(QUAD).unwrap();
        assert_eq!(model.positions.len(), 4);
        assert_eq!(model.triangle_count(), 2);
        assert_eq!(model.triangles[0].vertices, [0, 1, 2]);
        assert_eq!(model.triangles[1].vertices, [0, 2, 3]);
        assert_eq!(model.triangles[1].tex_coords, Some([0, 2, 3]));
        assert_eq!(model.triangles[0].normals, Some([0, 0, 0]));
        assert_eq!(model.triangles[0].material.as_deref(), Some("Wood"));
    }

    #[test]
    fn test_parse_ngon_fan() {
        let text = "v 0 0 0\nv 1 0 0\nv 2 1 0\nv 1 2 0\nv 0 1 0\nf 1 2 3 4 5\n";
        let model = parse_obj(text).unwrap();
        let tris: Vec<_> = model.triangles.iter().map(|t| t.vertices).collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
        assert!(model.triangles.iter().all(|t| t.normals.is_none() && t.tex_coords.is_none()));
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf -3//-1 -2//-1 -1//-1\nv 5 5 5\nf 2 3 -1\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.triangles[0].vertices, [0, 1, 2]);
        assert_eq!(model.triangles[0].normals, Some([0, 0, 0]));
        assert_eq!(model.triangles[1].vertices, [1, 2, 3]);
    }

    #[test]
    fn test_mixed_corners_drop_partial_kind() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2 3\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.triangles[0].tex_coords, None);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, ExportError::ObjParse { line: 3, .. }));

        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, ExportError::ObjParse { line: 1, .. }));

        let err = parse_obj("v 0 0 0\nf 1 1\n").unwrap_err();
        assert!(matches!(err, ExportError::ObjParse { line: 2, .. }));

        let err = parse_obj("v 0 0 0\nv 0 0 0\nv 0 0 0\nf 0 1 2\n").unwrap_err();
        assert!(matches!(err, ExportError::ObjParse { line: 4, .. }));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for text in ["v 0 0 nan\n", "v inf 0 0\n", "v 1e39 0 0\n", "vn 0 -inf 0\n", "vt NaN 0\n"] {
            let err = parse_obj(text).unwrap_err();
            assert!(matches!(err, ExportError::ObjParse { line: 1, .. }), "{}", text);
        }
        assert!(parse_obj("v 1e38 -0.5 3\n").is_ok());
    }

    #[test]
    fn test_usemtl_keeps_spaces() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Dark  wood\nf 1 2 3\nusemtl\nf 1 2 3\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.triangles[0].material.as_deref(), Some("Dark wood"));
        assert_eq!(model.triangles[1].material, None);
    }

    #[test]
    fn test_material_names_in_first_use_order() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl b\nf 1 2 3\nusemtl a\nf 1 2 3\nusemtl b\nf 1 2 3\n";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.material_names(), vec!["b", "a"]);
    }
}
