//! Current-document state: the mesh being viewed plus its transform.
//!
//! One `ModelDocument` is the single owned value the host application
//! threads through loading, input handling and rendering. There is no
//! shared global and no locking; the owner serializes loads against
//! reads by construction.

use std::path::Path;

use corelib::transform::Transform;
use log::info;

use crate::error::{LoadError, LoadResult};
use crate::mesh::Mesh;
use crate::{obj, scene};

/// Entity counts reported after a successful load (reserved pool
/// entries excluded).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
    pub faces: usize,
}

impl LoadSummary {
    fn of(mesh: &Mesh) -> Self {
        Self {
            positions: mesh.position_count(),
            texcoords: mesh.texcoord_count(),
            normals: mesh.normal_count(),
            faces: mesh.face_count(),
        }
    }
}

/// The mesh currently loaded plus its model transform.
#[derive(Debug, Default)]
pub struct ModelDocument {
    mesh: Mesh,
    transform: Transform,
}

impl ModelDocument {
    /// Empty document: no geometry, identity transform.
    pub fn new() -> Self {
        Self {
            mesh: Mesh::new(),
            transform: Transform::identity(),
        }
    }

    /// Load the model at `path`, replacing the current mesh wholesale
    /// and resetting the transform. The importer is chosen by file
    /// extension (case-insensitive). On any failure the document keeps
    /// its previous mesh and transform.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> LoadResult<LoadSummary> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let mesh = match extension.as_deref() {
            Some("obj") => obj::load_obj_from_path(path)?,
            Some("scn") => scene::load_scene_from_path(path)?,
            _ => {
                return Err(LoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        let summary = LoadSummary::of(&mesh);
        self.mesh = mesh;
        self.transform.reset();
        info!(
            "loaded {}: {} positions, {} texture coords, {} normals, {} faces",
            path.display(),
            summary.positions,
            summary.texcoords,
            summary.normals,
            summary.faces
        );
        Ok(summary)
    }

    /// Reset the transform to identity without touching the mesh.
    pub fn reset_transform(&mut self) {
        self.transform.reset();
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::vec3;
    use std::fs;
    use std::path::PathBuf;

    /// Temp file that cleans up after itself.
    struct TempModel(PathBuf);

    impl TempModel {
        fn write(name: &str, contents: &[u8]) -> Self {
            let path = std::env::temp_dir().join(format!("modelview-{}-{name}", std::process::id()));
            fs::write(&path, contents).expect("write temp model");
            Self(path)
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempModel {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n";

    #[test]
    fn load_replaces_mesh_and_resets_transform() {
        let model = TempModel::write("tri.obj", TRIANGLE_OBJ.as_bytes());
        let mut doc = ModelDocument::new();
        doc.transform_mut().translation = vec3(1.0, 2.0, 3.0);
        doc.transform_mut().set_scale(4.0);

        let summary = doc.load_model(model.path()).expect("load");
        assert_eq!(
            summary,
            LoadSummary {
                positions: 3,
                texcoords: 0,
                normals: 0,
                faces: 1,
            }
        );
        assert_eq!(doc.mesh().face_count(), 1);
        assert_eq!(doc.transform(), &Transform::identity());
    }

    #[test]
    fn failed_load_preserves_previous_document() {
        let model = TempModel::write("keep.obj", TRIANGLE_OBJ.as_bytes());
        let mut doc = ModelDocument::new();
        doc.load_model(model.path()).expect("load");
        let before = doc.mesh().clone();
        doc.transform_mut().rotation_deg = vec3(0.0, 45.0, 0.0);
        let transform_before = *doc.transform();

        let err = doc.load_model("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert_eq!(doc.mesh(), &before);
        assert_eq!(doc.transform(), &transform_before);
    }

    #[test]
    fn unsupported_or_missing_extension_fails_before_loading() {
        let mut doc = ModelDocument::new();
        for path in ["model.stl", "model", "model.objx"] {
            let err = doc.load_model(path).unwrap_err();
            assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
        }
        assert_eq!(doc.mesh().face_count(), 0);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let model = TempModel::write("upper.OBJ", TRIANGLE_OBJ.as_bytes());
        let mut doc = ModelDocument::new();
        doc.load_model(model.path()).expect("load");
        assert_eq!(doc.mesh().position_count(), 3);
    }

    #[test]
    fn reset_transform_leaves_mesh_alone() {
        let model = TempModel::write("reset.obj", TRIANGLE_OBJ.as_bytes());
        let mut doc = ModelDocument::new();
        doc.load_model(model.path()).expect("load");
        doc.transform_mut().zoom_by(1.5);
        doc.reset_transform();
        assert_eq!(doc.transform(), &Transform::identity());
        assert_eq!(doc.mesh().face_count(), 1);
    }
}
