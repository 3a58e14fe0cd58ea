use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use std::path::Path;

use crate::terrain::{MeshTerrain, Triangle};

/// Loads every mesh in a glTF/GLB file as walkable ground, node transforms applied
pub fn load_gltf_terrain(path: impl AsRef<Path>) -> Result<MeshTerrain> {
    let path = path.as_ref();
    log::info!("Loading terrain from {:?}", path);

    let (gltf, buffers, _images) = gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    log::debug!(
        "glTF: {} scenes, {} nodes, {} meshes",
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count()
    );

    let mut triangles = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut triangles)?;
        }
    }

    if triangles.is_empty() {
        bail!("No triangle geometry found in {:?}", path);
    }

    log::info!("Extracted {} terrain triangles", triangles.len());
    Ok(MeshTerrain::from_triangles(triangles))
}

/// Recursively processes glTF nodes to extract triangles
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, triangles)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, triangles)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("Skipping non-triangle primitive in mesh {:?}", mesh.name());
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let positions = reader.read_positions().context("Mesh primitive has no positions")?;
        let vertices: Vec<Vec3> = positions
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            // No indices - plain triangle list
            None => (0..vertices.len() as u32).collect(),
        };

        triangles.extend(triangles_from_indices(&vertices, &indices)?);
    }

    Ok(())
}

fn triangles_from_indices(vertices: &[Vec3], indices: &[u32]) -> Result<Vec<Triangle>> {
    let vertex = |i: u32| {
        vertices
            .get(i as usize)
            .copied()
            .with_context(|| format!("Index {} out of range ({} vertices)", i, vertices.len()))
    };

    indices
        .chunks_exact(3)
        .map(|tri| Ok(Triangle::new(vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?)))
        .collect()
}
