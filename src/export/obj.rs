//! Wavefront OBJ/MTL export.
//!
//! The mesh is written with global `v`/`vn`/`vt` pools followed by the faces
//! in insertion order. A `usemtl` line is emitted only when the material
//! changes between consecutive faces.

use crate::material::Material;
use crate::mesher::{Face, MeshAccumulator};
use std::fmt::Write;

/// Name of the material library referenced by every exported OBJ.
pub const MATERIAL_LIBRARY: &str = "materials.mtl";

/// Serialize a mesh to OBJ text.
pub fn write_obj(mesh: &MeshAccumulator, name: &str) -> String {
    // ~40 bytes per pool line, ~30 per face
    let capacity = 256
        + (mesh.vertices.len() + mesh.normals.len() + mesh.tex_coords.len()) * 40
        + mesh.faces.len() * 30;
    let mut obj = String::with_capacity(capacity);

    writeln!(obj, "# Floor plan OBJ export").unwrap();
    writeln!(obj, "# Vertices: {}", mesh.vertices.len()).unwrap();
    writeln!(obj, "# Faces: {}", mesh.faces.len()).unwrap();
    writeln!(obj).unwrap();
    writeln!(obj, "mtllib {}", MATERIAL_LIBRARY).unwrap();
    writeln!(obj, "o {}", name).unwrap();
    writeln!(obj).unwrap();

    for v in &mesh.vertices {
        writeln!(obj, "v {} {} {}", v.x, v.y, v.z).unwrap();
    }
    for n in &mesh.normals {
        writeln!(obj, "vn {} {} {}", n.x, n.y, n.z).unwrap();
    }
    for uv in &mesh.tex_coords {
        writeln!(obj, "vt {} {}", uv[0], uv[1]).unwrap();
    }
    writeln!(obj).unwrap();

    let mut current: Option<&str> = None;
    for face in &mesh.faces {
        if current != Some(face.material.as_str()) {
            writeln!(obj, "usemtl {}", face.material).unwrap();
            current = Some(face.material.as_str());
        }
        write_face(&mut obj, face);
    }

    obj
}

fn write_face(obj: &mut String, face: &Face) {
    obj.push('f');
    for i in 0..3 {
        let v = face.vertices[i];
        match (face.uvs, face.normals) {
            (Some(t), Some(n)) => write!(obj, " {}/{}/{}", v, t[i], n[i]),
            (Some(t), None) => write!(obj, " {}/{}", v, t[i]),
            (None, Some(n)) => write!(obj, " {}//{}", v, n[i]),
            (None, None) => write!(obj, " {}", v),
        }
        .unwrap();
    }
    obj.push('\n');
}

/// Serialize materials to MTL text.
pub fn write_mtl<'a>(materials: impl IntoIterator<Item = &'a Material>) -> String {
    let mut mtl = String::new();
    writeln!(mtl, "# Floor plan materials").unwrap();

    for m in materials {
        writeln!(mtl).unwrap();
        writeln!(mtl, "newmtl {}", m.name).unwrap();
        writeln!(mtl, "Ka {} {} {}", m.ambient[0], m.ambient[1], m.ambient[2]).unwrap();
        writeln!(mtl, "Kd {} {} {}", m.diffuse[0], m.diffuse[1], m.diffuse[2]).unwrap();
        writeln!(mtl, "Ks {} {} {}", m.specular[0], m.specular[1], m.specular[2]).unwrap();
        writeln!(mtl, "Ns {}", m.shininess).unwrap();
        writeln!(mtl, "d {}", m.opacity()).unwrap();
        writeln!(mtl, "illum 2").unwrap();
        if let Some(texture) = &m.texture {
            writeln!(mtl, "map_Kd {}", texture).unwrap();
        }
    }

    mtl
}
