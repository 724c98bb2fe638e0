//! Furniture placement: imported models with a box fallback.
//!
//! Importing runs in two phases. Everything that can fail (locating,
//! fetching, unzipping, parsing, fitting) happens while staging into local
//! buffers. Only a fully staged model is committed to the shared mesh and
//! material library, so a broken archive never leaves partial geometry or
//! orphaned materials behind.

use super::geometry::{Face, MeshAccumulator};
use crate::error::{ExportError, Result};
use crate::material::{sanitize_name, Material, MaterialLibrary};
use crate::resource::{parse_obj, ModelArchive, MtlLibrary, ObjTriangle, ResourceLoader};
use crate::types::{plan_to_world, BoundingBox, Furniture, PlacementTransform, SurfaceKind};
use glam::Vec3;
use std::collections::HashMap;

/// How a furniture piece ended up in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurnitureOutcome {
    /// The imported model, with its triangle count.
    Model(usize),
    /// The stand-in box.
    Box,
}

/// A model parsed and fitted to its placement, not yet committed.
struct StagedModel {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<[f32; 2]>,
    triangles: Vec<ObjTriangle>,
    library: MtlLibrary,
    archive: ModelArchive,
}

/// Adds furniture pieces to an export.
pub struct FurnitureMesher<'a> {
    loader: ResourceLoader<'a>,
    default_library: &'a MtlLibrary,
}

impl<'a> FurnitureMesher<'a> {
    pub fn new(loader: ResourceLoader<'a>, default_library: &'a MtlLibrary) -> Self {
        Self {
            loader,
            default_library,
        }
    }

    /// Add one piece, falling back to a box if its model cannot be used.
    pub fn add(
        &self,
        mesh: &mut MeshAccumulator,
        materials: &mut MaterialLibrary,
        index: usize,
        piece: &Furniture,
    ) -> FurnitureOutcome {
        match self.stage(piece) {
            Ok(staged) => {
                let count = staged.triangles.len();
                commit_model(mesh, materials, index, piece, staged, self.default_library);
                tracing::debug!(index, name = piece.display_name(), triangles = count, "Imported furniture model");
                FurnitureOutcome::Model(count)
            }
            Err(e) => {
                tracing::warn!(
                    index,
                    name = piece.display_name(),
                    error = %e,
                    "Furniture model unavailable, using a box"
                );
                add_box(mesh, materials, piece);
                FurnitureOutcome::Box
            }
        }
    }

    fn stage(&self, piece: &Furniture) -> Result<StagedModel> {
        let archive = self.loader.load_model(piece)?;
        let model = parse_obj(&archive.mesh_text)?;
        if model.triangles.is_empty() {
            return Err(ExportError::InvalidArchive(format!(
                "{} has no faces",
                archive.mesh_name
            )));
        }
        let library = archive.materials();

        let bounds = BoundingBox::from_points(model.positions.iter().map(|p| p.to_array()))
            .ok_or_else(|| ExportError::InvalidArchive(format!("{} has no vertices", archive.mesh_name)))?;
        let transform = placement(&bounds, piece);

        Ok(StagedModel {
            positions: model.positions.iter().map(|&p| transform.transform_point(p)).collect(),
            normals: model.normals.iter().map(|&n| transform.transform_normal(n)).collect(),
            tex_coords: model.tex_coords,
            triangles: model.triangles,
            library,
            archive,
        })
    }
}

fn placement(bounds: &BoundingBox, piece: &Furniture) -> PlacementTransform {
    PlacementTransform::fit(
        bounds,
        [piece.width, piece.height, piece.depth],
        piece.angle,
        plan_to_world([piece.x, piece.y], piece.elevation),
    )
}

/// Material for faces without their own: the piece color or the default.
fn fallback_material(materials: &mut MaterialLibrary, piece: &Furniture) -> String {
    match piece.color {
        Some(color) => materials.color_material(color),
        None => materials.default_material(SurfaceKind::Furniture),
    }
}

fn commit_model(
    mesh: &mut MeshAccumulator,
    materials: &mut MaterialLibrary,
    index: usize,
    piece: &Furniture,
    staged: StagedModel,
    default_library: &MtlLibrary,
) {
    let vertices: Vec<u32> = staged.positions.iter().map(|&p| mesh.add_vertex(p)).collect();
    let normals: Vec<Option<u32>> = staged.normals.iter().map(|&n| mesh.add_normal(n)).collect();
    let tex_coords: Vec<u32> = staged.tex_coords.iter().map(|&uv| mesh.add_tex_coord(uv)).collect();

    let mut names: HashMap<&str, String> = HashMap::new();
    let mut fallback: Option<String> = None;

    for tri in &staged.triangles {
        let material = match tri.material.as_deref() {
            Some(source) => names
                .entry(source)
                .or_insert_with(|| {
                    source_material(materials, index, source, &staged.library, default_library, &staged.archive)
                })
                .clone(),
            None => fallback
                .get_or_insert_with(|| fallback_material(materials, piece))
                .clone(),
        };

        let normal_refs = tri.normals.and_then(|ns| {
            match ns.map(|n| normals[n]) {
                [Some(a), Some(b), Some(c)] => Some([a, b, c]),
                _ => None,
            }
        });
        let uv_refs = tri.tex_coords.map(|ts| ts.map(|t| tex_coords[t]));

        mesh.add_face(
            Face::new(tri.vertices.map(|v| vertices[v]), material)
                .with_normals(normal_refs)
                .with_uvs(uv_refs),
        );
    }
}

/// Create the material standing in for a model's own material.
///
/// Callers cache the result per source name, so a taken name here means a
/// different source sanitized to the same string.
fn source_material(
    materials: &mut MaterialLibrary,
    index: usize,
    source: &str,
    library: &MtlLibrary,
    default_library: &MtlLibrary,
    archive: &ModelArchive,
) -> String {
    let name = unique_name(materials, &format!("furniture_{}_{}", index, sanitize_name(source)));

    let material = match library.get(source).or_else(|| default_library.get(source)) {
        Some(record) => {
            let texture = record.diffuse_map.as_deref().and_then(|map| match archive.image(map) {
                Some(bytes) => Some(materials.register_texture(bytes.to_vec())),
                None => {
                    tracing::debug!(material = source, map, "Texture map not found in model archive");
                    None
                }
            });
            Material::from_mtl(name, record, texture)
        }
        None => Material::flat(name, SurfaceKind::Furniture.default_diffuse()),
    };
    materials.insert(material)
}

/// `base`, or `base_2`, `base_3`, ... if a material already has that name.
fn unique_name(materials: &MaterialLibrary, base: &str) -> String {
    if !materials.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}_{}", base, n))
        .find(|name| !materials.contains(name))
        .unwrap_or_else(|| base.to_string())
}

/// Add the stand-in box: eight corners, six quads.
pub fn add_box(mesh: &mut MeshAccumulator, materials: &mut MaterialLibrary, piece: &Furniture) {
    let unit = BoundingBox::unit();
    let transform = placement(&unit, piece);
    let material = fallback_material(materials, piece);

    let corners = unit.corners().map(|c| mesh.add_vertex(transform.transform_point(c)));
    let quad = |idx: [usize; 4]| idx.map(|i| corners[i]);
    let faces = [
        (quad([0, 3, 2, 1]), Vec3::NEG_Y),
        (quad([4, 5, 6, 7]), Vec3::Y),
        (quad([0, 1, 5, 4]), Vec3::NEG_X),
        (quad([3, 7, 6, 2]), Vec3::X),
        (quad([0, 4, 7, 3]), Vec3::NEG_Z),
        (quad([1, 2, 6, 5]), Vec3::Z),
    ];
    for (verts, normal) in faces {
        mesh.add_quad(verts, transform.transform_normal(normal), &material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::test_support::zip_bytes;
    use crate::resource::{parse_mtl, MemoryFetcher, ResourceLocator};
    use crate::types::Color;

    const MESH: &[u8] = b"\
v -1 0 -1
v 1 0 -1
v 1 2 1
v -1 2 1
vt 0 0
vt 1 0
vt 1 1
vn 0 0 1
usemtl Fabric
f 1/1/1 2/2/1 3/3/1
usemtl Legs
f 1 3 4
";

    const LIBRARY: &[u8] = b"newmtl Fabric\nKd 1 0 0\nmap_Kd maps/fabric.png\n";
    const IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2];

    struct Fixture {
        fetcher: MemoryFetcher,
        locator: ResourceLocator,
        defaults: MtlLibrary,
    }

    impl Fixture {
        fn new(fetcher: MemoryFetcher) -> Self {
            Self {
                fetcher,
                locator: ResourceLocator::default(),
                defaults: parse_mtl("newmtl Legs\nKd 0 0 1\n"),
            }
        }

        fn run(&self, piece: &Furniture) -> (MeshAccumulator, MaterialLibrary, FurnitureOutcome) {
            let loader = ResourceLoader::new(&self.fetcher, &self.locator);
            let mesher = FurnitureMesher::new(loader, &self.defaults);
            let mut mesh = MeshAccumulator::new();
            let mut materials = MaterialLibrary::new();
            let outcome = mesher.add(&mut mesh, &mut materials, 0, piece);
            (mesh, materials, outcome)
        }
    }

    fn chair_archive() -> Vec<u8> {
        zip_bytes(&[
            ("chair.obj", MESH),
            ("chair.mtl", LIBRARY),
            ("maps/fabric.png", IMAGE),
        ])
    }

    fn extents(mesh: &MeshAccumulator) -> (Vec3, Vec3) {
        let min = mesh.vertices.iter().fold(Vec3::splat(f32::MAX), |a, &v| a.min(v));
        let max = mesh.vertices.iter().fold(Vec3::splat(f32::MIN), |a, &v| a.max(v));
        (min, max)
    }

    #[test]
    fn test_no_reference_gives_box() {
        let fixture = Fixture::new(MemoryFetcher::new());
        let piece = Furniture::new(0.0, 0.0)
            .with_size(200.0, 50.0, 80.0)
            .with_angle(std::f32::consts::FRAC_PI_2);
        let (mesh, materials, outcome) = fixture.run(&piece);

        assert_eq!(outcome, FurnitureOutcome::Box);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.faces.iter().all(|f| f.material == "furniture_default"));
        assert!(materials.contains("furniture_default"));

        // Turned a quarter, the 200 cm width runs along z.
        let (min, max) = extents(&mesh);
        let size = max - min;
        assert!((size.x - 50.0).abs() < 1e-3);
        assert!((size.y - 80.0).abs() < 1e-3);
        assert!((size.z - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_box_faces_point_outward() {
        let fixture = Fixture::new(MemoryFetcher::new());
        let piece = Furniture::new(100.0, 40.0).with_angle(0.4);
        let (mesh, _, _) = fixture.run(&piece);
        let (min, max) = extents(&mesh);
        let center = (min + max) * 0.5;

        for face in &mesh.faces {
            let [a, b, c] = face.vertices.map(|v| mesh.position(v));
            let geometric = (b - a).cross(c - a);
            let n = mesh.normals[face.normals.unwrap()[0] as usize - 1];
            assert!(geometric.dot(n) > 0.0);
            assert!((a - center).dot(n) > 0.0);
        }
    }

    #[test]
    fn test_missing_archive_falls_back_with_color() {
        let fixture = Fixture::new(MemoryFetcher::new());
        let piece = Furniture::new(0.0, 0.0)
            .with_model("resources/models/missing.zip")
            .with_color(Color::rgb(10, 20, 30));
        let (mesh, materials, outcome) = fixture.run(&piece);

        assert_eq!(outcome, FurnitureOutcome::Box);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.faces.iter().all(|f| f.material == "color_10_20_30"));
        assert_eq!(materials.len(), 1);
    }

    #[test]
    fn test_imported_model_is_fitted_and_textured() {
        let fetcher = MemoryFetcher::new().with("resources/models/chair.zip", chair_archive());
        let fixture = Fixture::new(fetcher);
        let mut piece = Furniture::new(200.0, 300.0)
            .with_size(100.0, 60.0, 80.0)
            .with_model("chair.obj");
        piece.elevation = 10.0;
        let (mesh, materials, outcome) = fixture.run(&piece);

        assert_eq!(outcome, FurnitureOutcome::Model(2));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.tex_coords.len(), 3);

        let (min, max) = extents(&mesh);
        assert!((min - Vec3::new(150.0, 10.0, 270.0)).abs().max_element() < 1e-3);
        assert!((max - Vec3::new(250.0, 90.0, 330.0)).abs().max_element() < 1e-3);

        assert_eq!(mesh.faces[0].material, "furniture_0_Fabric");
        assert_eq!(mesh.faces[0].uvs, Some([1, 2, 3]));
        assert_eq!(mesh.faces[0].normals, Some([1, 1, 1]));
        assert_eq!(mesh.faces[1].material, "furniture_0_Legs");
        assert_eq!(mesh.faces[1].normals, None);

        let fabric = materials.get("furniture_0_Fabric").unwrap();
        assert_eq!(fabric.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(fabric.texture.as_deref(), Some("texture_0.png"));
        assert_eq!(materials.textures()[0].data, IMAGE);
        assert_eq!(materials.get("furniture_0_Legs").unwrap().diffuse, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_faces_without_material_use_fallback() {
        let archive = zip_bytes(&[("lamp.obj", b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")]);
        let fetcher = MemoryFetcher::new().with("resources/models/lamp.zip", archive);
        let fixture = Fixture::new(fetcher);
        let (mesh, materials, outcome) = fixture.run(&Furniture::new(0.0, 0.0).with_model("lamp.obj"));

        assert_eq!(outcome, FurnitureOutcome::Model(1));
        assert_eq!(mesh.faces[0].material, "furniture_default");
        assert_eq!(materials.len(), 1);
    }

    #[test]
    fn test_broken_mesh_commits_nothing() {
        let archive = zip_bytes(&[
            ("bad.obj", b"v 0 0 0\nusemtl Fabric\nf 1 2 3\n"),
            ("bad.mtl", LIBRARY),
            ("maps/fabric.png", IMAGE),
        ]);
        let fetcher = MemoryFetcher::new().with("resources/models/bad.zip", archive);
        let fixture = Fixture::new(fetcher);
        let (mesh, materials, outcome) = fixture.run(&Furniture::new(0.0, 0.0).with_model("bad.obj"));

        assert_eq!(outcome, FurnitureOutcome::Box);
        assert_eq!(mesh.vertex_count(), 8);
        assert!(materials.textures().is_empty());
        assert!(!materials.contains("furniture_0_Fabric"));
    }

    #[test]
    fn test_colliding_source_names_stay_distinct() {
        let obj: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Dark.wood\nf 1 2 3\nusemtl Dark_wood\nf 1 2 3\nusemtl Dark.wood\nf 1 3 2\n";
        let library: &[u8] = b"newmtl Dark.wood\nKd 1 0 0\nnewmtl Dark_wood\nKd 0 0 1\n";
        let archive = zip_bytes(&[("shelf.obj", obj), ("shelf.mtl", library)]);
        let fetcher = MemoryFetcher::new().with("resources/models/shelf.zip", archive);
        let fixture = Fixture::new(fetcher);
        let (mesh, materials, outcome) = fixture.run(&Furniture::new(0.0, 0.0).with_model("shelf.obj"));

        assert_eq!(outcome, FurnitureOutcome::Model(3));
        let names: Vec<&str> = mesh.faces.iter().map(|f| f.material.as_str()).collect();
        assert_eq!(names, ["furniture_0_Dark_wood", "furniture_0_Dark_wood_2", "furniture_0_Dark_wood"]);
        assert_eq!(materials.len(), 2);
        assert_eq!(materials.get("furniture_0_Dark_wood").unwrap().diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(materials.get("furniture_0_Dark_wood_2").unwrap().diffuse, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_material_name_with_spaces() {
        let obj: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Dark wood\nf 1 2 3\n";
        let library: &[u8] = b"newmtl Dark wood\nKd 1 0 0\n";
        let archive = zip_bytes(&[("desk.obj", obj), ("desk.mtl", library)]);
        let fetcher = MemoryFetcher::new().with("resources/models/desk.zip", archive);
        let fixture = Fixture::new(fetcher);
        let (mesh, materials, _) = fixture.run(&Furniture::new(0.0, 0.0).with_model("desk.obj"));

        assert_eq!(mesh.faces[0].material, "furniture_0_Dark_wood");
        assert_eq!(materials.get("furniture_0_Dark_wood").unwrap().diffuse, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_finite_vertex_gives_box() {
        let archive = zip_bytes(&[("vase.obj", b"v 0 0 0\nv 1e39 0 0\nv 0 1 nan\nf 1 2 3\n")]);
        let fetcher = MemoryFetcher::new().with("resources/models/vase.zip", archive);
        let fixture = Fixture::new(fetcher);
        let (mesh, _, outcome) = fixture.run(&Furniture::new(0.0, 0.0).with_model("vase.obj"));

        assert_eq!(outcome, FurnitureOutcome::Box);
        assert_eq!(mesh.vertex_count(), 8);
        assert!(mesh.vertices.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_catalog_id_locates_archive() {
        let fetcher = MemoryFetcher::new().with("resources/models/chair.zip", chair_archive());
        let fixture = Fixture::new(fetcher);
        let piece = Furniture::new(0.0, 0.0).with_catalog_id("eTeks#chair");
        let (_, _, outcome) = fixture.run(&piece);
        assert_eq!(outcome, FurnitureOutcome::Model(2));
    }
}
