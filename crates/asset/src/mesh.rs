//! Pooled mesh representation shared by both loaders.
//!
//! Attribute records live in three append-only pools. Index 0 of every
//! pool holds a reserved all-zero entry so that a corner index of 0 can
//! mean "attribute absent"; real entries start at index 1.

/// 3D position record.
pub type Position = [f32; 3];
/// 2D texture-coordinate record.
pub type TexCoord = [f32; 2];
/// Normal vector record.
pub type Normal = [f32; 3];

/// One face corner: 1-based indices into the position, texture-coordinate
/// and normal pools. 0 marks an absent attribute. Indices are stored
/// exactly as the source supplied them (including zero, negative, or
/// out-of-range values), so consumers resolve through [`Mesh::position`]
/// and friends instead of indexing the pools directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Corner {
    pub position: i32,
    pub texcoord: i32,
    pub normal: i32,
}

impl Corner {
    pub fn new(position: i32, texcoord: i32, normal: i32) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }

    /// Corner carrying only a position index.
    pub fn position_only(position: i32) -> Self {
        Self::new(position, 0, 0)
    }
}

/// Polygon of three or four corners. The constructors are the only way
/// to build one, so the corner count is always 3 or 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    corners: [Corner; 4],
    count: u8,
}

impl Face {
    pub fn triangle(corners: [Corner; 3]) -> Self {
        Self {
            corners: [corners[0], corners[1], corners[2], Corner::default()],
            count: 3,
        }
    }

    pub fn quad(corners: [Corner; 4]) -> Self {
        Self { corners, count: 4 }
    }

    /// Number of live corners, 3 or 4.
    #[inline]
    pub fn corner_count(&self) -> usize {
        self.count as usize
    }

    #[inline]
    pub fn is_quad(&self) -> bool {
        self.count == 4
    }

    /// Live corners only.
    #[inline]
    pub fn corners(&self) -> &[Corner] {
        &self.corners[..self.count as usize]
    }
}

/// Indexed mesh: the three attribute pools plus the faces that reference
/// them. Pools only grow while a mesh is being built; afterwards they are
/// replaced wholesale by the next load.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    positions: Vec<Position>,
    texcoords: Vec<TexCoord>,
    normals: Vec<Normal>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Empty mesh: each pool holds only its reserved entry.
    pub fn new() -> Self {
        Self {
            positions: vec![[0.0; 3]],
            texcoords: vec![[0.0; 2]],
            normals: vec![[0.0; 3]],
            faces: Vec::new(),
        }
    }

    /// Append a position, returning its 1-based pool index.
    pub fn push_position(&mut self, p: Position) -> i32 {
        self.positions.push(p);
        (self.positions.len() - 1) as i32
    }

    /// Append a texture coordinate, returning its 1-based pool index.
    pub fn push_texcoord(&mut self, t: TexCoord) -> i32 {
        self.texcoords.push(t);
        (self.texcoords.len() - 1) as i32
    }

    /// Append a normal, returning its 1-based pool index.
    pub fn push_normal(&mut self, n: Normal) -> i32 {
        self.normals.push(n);
        (self.normals.len() - 1) as i32
    }

    pub fn push_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Number of real positions (reserved entry excluded).
    pub fn position_count(&self) -> usize {
        self.positions.len() - 1
    }

    /// Number of real texture coordinates (reserved entry excluded).
    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() - 1
    }

    /// Number of real normals (reserved entry excluded).
    pub fn normal_count(&self) -> usize {
        self.normals.len() - 1
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Resolve a position index; `None` for absent or out-of-range.
    pub fn position(&self, index: i32) -> Option<&Position> {
        resolve(&self.positions, index)
    }

    /// Resolve a texture-coordinate index; `None` for absent or out-of-range.
    pub fn texcoord(&self, index: i32) -> Option<&TexCoord> {
        resolve(&self.texcoords, index)
    }

    /// Resolve a normal index; `None` for absent or out-of-range.
    pub fn normal(&self, index: i32) -> Option<&Normal> {
        resolve(&self.normals, index)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve<T>(pool: &[T], index: i32) -> Option<&T> {
    if index <= 0 {
        return None;
    }
    pool.get(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mesh_holds_only_reserved_entries() {
        let mesh = Mesh::new();
        assert_eq!(mesh.position_count(), 0);
        assert_eq!(mesh.texcoord_count(), 0);
        assert_eq!(mesh.normal_count(), 0);
        assert_eq!(mesh.face_count(), 0);
        // Index 0 is never a real attribute.
        assert_eq!(mesh.position(0), None);
        assert_eq!(mesh.texcoord(0), None);
        assert_eq!(mesh.normal(0), None);
    }

    #[test]
    fn push_returns_one_based_indices() {
        let mut mesh = Mesh::new();
        assert_eq!(mesh.push_position([1.0, 2.0, 3.0]), 1);
        assert_eq!(mesh.push_position([4.0, 5.0, 6.0]), 2);
        assert_eq!(mesh.push_texcoord([0.5, 0.5]), 1);
        assert_eq!(mesh.push_normal([0.0, 1.0, 0.0]), 1);
        assert_eq!(mesh.position(1), Some(&[1.0, 2.0, 3.0]));
        assert_eq!(mesh.position(2), Some(&[4.0, 5.0, 6.0]));
    }

    #[test]
    fn out_of_range_and_negative_indices_resolve_to_none() {
        let mut mesh = Mesh::new();
        mesh.push_position([1.0, 0.0, 0.0]);
        assert_eq!(mesh.position(2), None);
        assert_eq!(mesh.position(-1), None);
        assert_eq!(mesh.position(i32::MAX), None);
    }

    #[test]
    fn face_corner_counts() {
        let tri = Face::triangle([
            Corner::position_only(1),
            Corner::position_only(2),
            Corner::position_only(3),
        ]);
        assert_eq!(tri.corner_count(), 3);
        assert!(!tri.is_quad());
        assert_eq!(tri.corners().len(), 3);

        let quad = Face::quad([
            Corner::position_only(1),
            Corner::position_only(2),
            Corner::position_only(3),
            Corner::position_only(4),
        ]);
        assert_eq!(quad.corner_count(), 4);
        assert!(quad.is_quad());
        assert_eq!(quad.corners()[3].position, 4);
    }
}
