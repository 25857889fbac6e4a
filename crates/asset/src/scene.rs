//! Binary scene-graph importer.
//!
//! Reads a `.scn` container: a tree of nodes, each carrying a local
//! transform, an optional mesh payload and a list of children. Geometry
//! is flattened into the shared pools with the node's world transform
//! baked into every control point at import time; no per-node transform
//! survives the import.
//!
//! Container layout (integers and floats little-endian):
//!
//! ```text
//! file    := magic "SCNG" , version u32 (= 1) , node
//! node    := local transform (16 x f32, column-major 4x4)
//!          , has_mesh u8 , [ mesh ] , child_count u32 , node*
//! mesh    := control_point_count u32 , (3 x f32)*
//!          , polygon_count u32 , polygon*
//!          , uv_layer , normal_layer
//! polygon := corner_count u32 , (control-point index u32)*
//! layer   := present u8 , [ mapping u8 , reference u8
//!          , value_count u32 , values* , index_count u32 , u32* ]
//! ```
//!
//! `mapping`: 0 = per control point, 1 = per polygon corner.
//! `reference`: 0 = direct, 1 = index-then-direct. The index array may be
//! empty for direct layers. Layer values are 2 floats per entry for the
//! uv layer, 3 for the normal layer.

use std::fs;
use std::path::Path;

use corelib::{Mat4, Vec3};
use log::{info, warn};

use crate::error::{LoadError, LoadResult};
use crate::mesh::{Corner, Face, Mesh};

pub const SCENE_MAGIC: [u8; 4] = *b"SCNG";
pub const SCENE_VERSION: u32 = 1;

/// How an attribute layer is keyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingMode {
    ByControlPoint,
    ByCorner,
}

/// How layer values are fetched once the key is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceMode {
    Direct,
    IndexToDirect,
}

/// Attribute layer: a value array plus the mapping/reference metadata
/// deciding which value a given corner sees.
#[derive(Clone, Debug)]
pub struct AttributeLayer<T> {
    pub mapping: MappingMode,
    pub reference: ReferenceMode,
    pub values: Vec<T>,
    pub indices: Vec<u32>,
}

impl<T: Copy> AttributeLayer<T> {
    /// Resolve the value one corner sees. `control_point` is the corner's
    /// control-point index, `corner` its position in the mesh's flattened
    /// corner sequence. `None` when a lookup lands outside the layer.
    pub fn resolve(&self, control_point: usize, corner: usize) -> Option<T> {
        let key = match self.mapping {
            MappingMode::ByControlPoint => control_point,
            MappingMode::ByCorner => corner,
        };
        let at = match self.reference {
            ReferenceMode::Direct => key,
            ReferenceMode::IndexToDirect => *self.indices.get(key)? as usize,
        };
        self.values.get(at).copied()
    }
}

/// Mesh payload attached to a node.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub control_points: Vec<[f32; 3]>,
    pub polygons: Vec<Vec<u32>>,
    pub uv_layer: Option<AttributeLayer<[f32; 2]>>,
    pub normal_layer: Option<AttributeLayer<[f32; 3]>>,
}

/// One scene-graph node.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub local_transform: Mat4,
    pub geometry: Option<Geometry>,
    pub children: Vec<SceneNode>,
}

/// Load a scene file and flatten it into a mesh.
pub fn load_scene_from_path(path: impl AsRef<Path>) -> LoadResult<Mesh> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_scene_from_bytes(&bytes)
}

/// Parse a scene image and flatten it into a mesh.
pub fn load_scene_from_bytes(bytes: &[u8]) -> LoadResult<Mesh> {
    let root = parse_scene(bytes)?;
    let mut mesh = Mesh::new();
    import_node(&root, Mat4::IDENTITY, &mut mesh);
    info!(
        "imported scene mesh: {} positions, {} texture coords, {} normals, {} faces",
        mesh.position_count(),
        mesh.texcoord_count(),
        mesh.normal_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parse the container into its node tree without flattening.
pub fn parse_scene(bytes: &[u8]) -> LoadResult<SceneNode> {
    let mut r = ByteReader::new(bytes);
    let magic = r.take(4)?;
    if magic != SCENE_MAGIC {
        return Err(LoadError::BadMagic {
            found: [magic[0], magic[1], magic[2], magic[3]],
        });
    }
    let version = r.read_u32()?;
    if version != SCENE_VERSION {
        return Err(LoadError::UnsupportedVersion(version));
    }
    read_node(&mut r)
}

/// Depth-first pre-order walk with an explicit world-transform
/// accumulator. Children are visited whether or not the node itself
/// carried geometry.
fn import_node(node: &SceneNode, parent: Mat4, mesh: &mut Mesh) {
    let world = parent * node.local_transform;
    if let Some(geometry) = &node.geometry {
        import_geometry(geometry, &world, mesh);
    }
    for child in &node.children {
        import_node(child, world, mesh);
    }
}

fn import_geometry(geometry: &Geometry, world: &Mat4, mesh: &mut Mesh) {
    // 1-based pool index of this node's first control point.
    let base = mesh.position_count() as i32;
    for cp in &geometry.control_points {
        let baked = world.transform_point3(Vec3::from_array(*cp));
        mesh.push_position(baked.to_array());
    }

    // Flat corner index across the whole payload; skipped polygons still
    // advance it so later corners line up with per-corner layers.
    let mut corner_cursor = 0usize;
    for polygon in &geometry.polygons {
        let arity = polygon.len();
        if !(3..=4).contains(&arity) {
            warn!("skipping {arity}-corner polygon (triangles and quads only)");
            corner_cursor += arity;
            continue;
        }

        let mut corners = [Corner::default(); 4];
        for (j, &cp) in polygon.iter().enumerate() {
            let texcoord = geometry
                .uv_layer
                .as_ref()
                .and_then(|layer| layer.resolve(cp as usize, corner_cursor + j))
                .map_or(0, |uv| mesh.push_texcoord(uv));
            let normal = geometry
                .normal_layer
                .as_ref()
                .and_then(|layer| layer.resolve(cp as usize, corner_cursor + j))
                .map_or(0, |n| mesh.push_normal(n));
            corners[j] = Corner::new(base + 1 + cp as i32, texcoord, normal);
        }
        corner_cursor += arity;

        mesh.push_face(if arity == 4 {
            Face::quad(corners)
        } else {
            Face::triangle([corners[0], corners[1], corners[2]])
        });
    }
}

fn read_node(r: &mut ByteReader) -> LoadResult<SceneNode> {
    let mut cols = [0.0f32; 16];
    for c in &mut cols {
        *c = r.read_f32()?;
    }
    let local_transform = Mat4::from_cols_array(&cols);

    let geometry = if r.read_u8()? != 0 {
        Some(read_geometry(r)?)
    } else {
        None
    };

    let child_count = r.read_u32()? as usize;
    let mut children = Vec::new();
    for _ in 0..child_count {
        children.push(read_node(r)?);
    }

    Ok(SceneNode {
        local_transform,
        geometry,
        children,
    })
}

fn read_geometry(r: &mut ByteReader) -> LoadResult<Geometry> {
    let control_point_count = r.read_u32()? as usize;
    let mut control_points = Vec::new();
    for _ in 0..control_point_count {
        control_points.push([r.read_f32()?, r.read_f32()?, r.read_f32()?]);
    }

    let polygon_count = r.read_u32()? as usize;
    let mut polygons = Vec::new();
    for _ in 0..polygon_count {
        let corner_count = r.read_u32()? as usize;
        let mut polygon = Vec::new();
        for _ in 0..corner_count {
            polygon.push(r.read_u32()?);
        }
        polygons.push(polygon);
    }

    let uv_layer = read_uv_layer(r)?;
    let normal_layer = read_normal_layer(r)?;

    Ok(Geometry {
        control_points,
        polygons,
        uv_layer,
        normal_layer,
    })
}

fn read_layer_meta(r: &mut ByteReader) -> LoadResult<Option<(MappingMode, ReferenceMode)>> {
    if r.read_u8()? == 0 {
        return Ok(None);
    }
    let mapping = match r.read_u8()? {
        0 => MappingMode::ByControlPoint,
        1 => MappingMode::ByCorner,
        value => {
            return Err(LoadError::InvalidTag {
                what: "mapping mode",
                value,
                offset: r.pos() - 1,
            });
        }
    };
    let reference = match r.read_u8()? {
        0 => ReferenceMode::Direct,
        1 => ReferenceMode::IndexToDirect,
        value => {
            return Err(LoadError::InvalidTag {
                what: "reference mode",
                value,
                offset: r.pos() - 1,
            });
        }
    };
    Ok(Some((mapping, reference)))
}

fn read_index_array(r: &mut ByteReader) -> LoadResult<Vec<u32>> {
    let count = r.read_u32()? as usize;
    let mut indices = Vec::new();
    for _ in 0..count {
        indices.push(r.read_u32()?);
    }
    Ok(indices)
}

fn read_uv_layer(r: &mut ByteReader) -> LoadResult<Option<AttributeLayer<[f32; 2]>>> {
    let Some((mapping, reference)) = read_layer_meta(r)? else {
        return Ok(None);
    };
    let value_count = r.read_u32()? as usize;
    let mut values = Vec::new();
    for _ in 0..value_count {
        values.push([r.read_f32()?, r.read_f32()?]);
    }
    let indices = read_index_array(r)?;
    Ok(Some(AttributeLayer {
        mapping,
        reference,
        values,
        indices,
    }))
}

fn read_normal_layer(r: &mut ByteReader) -> LoadResult<Option<AttributeLayer<[f32; 3]>>> {
    let Some((mapping, reference)) = read_layer_meta(r)? else {
        return Ok(None);
    };
    let value_count = r.read_u32()? as usize;
    let mut values = Vec::new();
    for _ in 0..value_count {
        values.push([r.read_f32()?, r.read_f32()?, r.read_f32()?]);
    }
    let indices = read_index_array(r)?;
    Ok(Some(AttributeLayer {
        mapping,
        reference,
        values,
        indices,
    }))
}

/// Little-endian cursor over the raw scene bytes.
struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn pos(&self) -> usize {
        self.offset
    }

    fn take(&mut self, n: usize) -> LoadResult<&'a [u8]> {
        let end = self.offset.checked_add(n).filter(|&e| e <= self.bytes.len());
        let Some(end) = end else {
            return Err(LoadError::Truncated {
                offset: self.offset,
            });
        };
        let out = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(out)
    }

    fn read_u8(&mut self) -> LoadResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> LoadResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f32(&mut self) -> LoadResult<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
