//! Entry point for the modelview inspector.
//!
//! Loads each model named on the command line into one document and
//! reports what came in. A load that fails keeps the previous model
//! current, same as the interactive viewer it fronts for.

use anyhow::{Result, bail};
use asset::{Mesh, ModelDocument};
use corelib::Vec3;

fn parse_scale_arg() -> Option<f32> {
    // Accept: --scale=FLOAT (applied after each successful load).
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--scale=") {
            match val.parse::<f32>() {
                Ok(s) => return Some(s),
                Err(_) => {
                    eprintln!("[warn] Bad --scale value '{}', ignoring.", val);
                    return None;
                }
            }
        }
    }
    None
}

fn model_paths() -> Vec<String> {
    std::env::args()
        .skip(1)
        .filter(|a| !a.starts_with("--"))
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths = model_paths();
    if paths.is_empty() {
        bail!("usage: modelview [--scale=F] <model.obj|model.scn> ...");
    }
    let scale = parse_scale_arg();

    let mut document = ModelDocument::new();
    for path in &paths {
        match document.load_model(path) {
            Ok(summary) => {
                log::info!(
                    "{path}: {} positions, {} texture coords, {} normals, {} faces",
                    summary.positions,
                    summary.texcoords,
                    summary.normals,
                    summary.faces
                );
                if let Some((min, max)) = bounds(document.mesh()) {
                    log::info!(
                        "{path}: bounds min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3})",
                        min.x, min.y, min.z, max.x, max.y, max.z
                    );
                }
                if let Some(scale) = scale {
                    document.transform_mut().set_scale(scale);
                    log::info!(
                        "{path}: model scale set to {:.3}",
                        document.transform().scale()
                    );
                }
            }
            Err(err) => log::error!("{path}: {err} (keeping previous model)"),
        }
    }

    Ok(())
}

/// Bounding box over every resolvable face corner. Corners whose
/// position index is absent or out of range contribute nothing.
fn bounds(mesh: &Mesh) -> Option<(Vec3, Vec3)> {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    let mut any = false;
    for face in mesh.faces() {
        for corner in face.corners() {
            if let Some(p) = mesh.position(corner.position) {
                let p = Vec3::from_array(*p);
                min = min.min(p);
                max = max.max(p);
                any = true;
            }
        }
    }
    any.then_some((min, max))
}
