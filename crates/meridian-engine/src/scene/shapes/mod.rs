pub(crate) mod mesh;
pub(crate) mod polyline;

pub use mesh::MeshCmd;
pub use polyline::PolylineCmd;
