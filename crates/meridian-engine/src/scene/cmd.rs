use crate::scene::shapes::mesh::MeshCmd;
use crate::scene::shapes::polyline::PolylineCmd;

/// Renderer-agnostic draw command stream.
///
/// `Polyline` is tessellated by the line renderer every frame it is drawn;
/// `Mesh` carries geometry that was tessellated ahead of time.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Polyline(PolylineCmd),
    Mesh(MeshCmd),
}
