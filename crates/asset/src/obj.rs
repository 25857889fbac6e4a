//! Text geometry parser.
//!
//! Line-oriented format: `v x y z`, `vt u v` and `vn x y z` append pool
//! entries; `f ...` lines go through a fixed-priority cascade of six
//! layouts (quad/triangle in full-triple, vertex-normal and bare-index
//! form). Unknown tags, malformed records and face lines matching no
//! layout are dropped without failing the load.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{LoadError, LoadResult};
use crate::mesh::{Corner, Face, Mesh};

/// Longest accepted line, in bytes. Longer lines are dropped whole.
const MAX_LINE_LEN: usize = 512;

/// Load a text geometry mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> LoadResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_obj_from_reader(BufReader::new(file))
}

/// Load a text geometry mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> LoadResult<Mesh> {
    parse_obj(reader)
}

/// Convenience helper to parse a text geometry string literal.
pub fn load_obj_from_str(contents: &str) -> LoadResult<Mesh> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(mut reader: R) -> LoadResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut line = String::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_no += 1;

        if line.len() > MAX_LINE_LEN {
            warn!("line {line_no} exceeds {MAX_LINE_LEN} bytes, dropped");
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else { continue };

        match tag {
            "v" => match parse_f32s(&mut parts) {
                Some(p) => {
                    mesh.push_position(p);
                }
                None => debug!("line {line_no}: malformed position, dropped"),
            },
            "vt" => match parse_f32s(&mut parts) {
                Some(t) => {
                    mesh.push_texcoord(t);
                }
                None => debug!("line {line_no}: malformed texture coordinate, dropped"),
            },
            "vn" => match parse_f32s(&mut parts) {
                Some(n) => {
                    mesh.push_normal(n);
                }
                None => debug!("line {line_no}: malformed normal, dropped"),
            },
            "f" => {
                let groups: Vec<&str> = parts.collect();
                match parse_face(&groups) {
                    Some(face) => mesh.push_face(face),
                    None => debug!("line {line_no}: face matches no known layout, dropped"),
                }
            }
            _ => {
                // Other directives (o/g/s/usemtl/mtllib/...) are ignored.
            }
        }
    }

    info!(
        "parsed text mesh: {} positions, {} texture coords, {} normals, {} faces",
        mesh.position_count(),
        mesh.texcoord_count(),
        mesh.normal_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

fn parse_f32s<'a, const N: usize>(parts: &mut impl Iterator<Item = &'a str>) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = parts.next()?.parse().ok()?;
    }
    Some(out)
}

/// Shape of one `f`-line index group.
#[derive(Clone, Copy, Debug)]
enum GroupForm {
    /// `v/t/n`: three integers.
    Triple,
    /// `v//n`: two integers around an empty middle field.
    VertexNormal,
    /// `v`: a single integer.
    Bare,
}

/// Face layouts in priority order. Quads come before triangles within
/// each form so a twelve-integer quad line is never claimed by a
/// triangle tier, and richer forms come before the bare fallback.
const FACE_TIERS: [(usize, GroupForm); 6] = [
    (4, GroupForm::Triple),
    (3, GroupForm::Triple),
    (4, GroupForm::VertexNormal),
    (3, GroupForm::VertexNormal),
    (4, GroupForm::Bare),
    (3, GroupForm::Bare),
];

/// Try each tier in order; a tier matches only if the group count is
/// exact and every group parses in that tier's form.
fn parse_face(groups: &[&str]) -> Option<Face> {
    for (count, form) in FACE_TIERS {
        if groups.len() != count {
            continue;
        }
        let mut corners = [Corner::default(); 4];
        let mut matched = true;
        for (slot, &token) in corners.iter_mut().zip(groups) {
            match parse_group(token, form) {
                Some(corner) => *slot = corner,
                None => {
                    matched = false;
                    break;
                }
            }
        }
        if !matched {
            continue;
        }
        return Some(if count == 4 {
            Face::quad(corners)
        } else {
            Face::triangle([corners[0], corners[1], corners[2]])
        });
    }
    None
}

fn parse_group(token: &str, form: GroupForm) -> Option<Corner> {
    let mut fields = token.split('/');
    let corner = match form {
        GroupForm::Triple => {
            let v = fields.next()?.parse().ok()?;
            let t = fields.next()?.parse().ok()?;
            let n = fields.next()?.parse().ok()?;
            Corner::new(v, t, n)
        }
        GroupForm::VertexNormal => {
            let v = fields.next()?.parse().ok()?;
            if !fields.next()?.is_empty() {
                return None;
            }
            let n = fields.next()?.parse().ok()?;
            Corner::new(v, 0, n)
        }
        GroupForm::Bare => Corner::position_only(fields.next()?.parse().ok()?),
    };
    if fields.next().is_some() {
        return None;
    }
    Some(corner)
}
