use crate::scene::{DrawCmd, DrawList, ZIndex};
use crate::tessellate::LineMesh;

/// Pre-tessellated line geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCmd {
    pub mesh: LineMesh,
}

impl DrawList {
    /// Records a mesh produced by [`LineTessellator`](crate::tessellate::LineTessellator).
    #[inline]
    pub fn push_mesh(&mut self, z: ZIndex, mesh: LineMesh) {
        self.push(z, DrawCmd::Mesh(MeshCmd { mesh }));
    }
}
