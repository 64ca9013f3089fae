/// One step of a frame, executed in push order. Pass parameters (clear
/// color, viewport) live on the session, not here; the graph is pure
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Depth-only geometry pass into the shared depth buffer.
    DepthPrepass,
    /// Lit geometry against the prepass depth.
    Scene,
    /// Environment cube at the far plane, after opaque geometry.
    Skybox,
    /// Resolve the offscreen target and draw it to the surface.
    Blit,
}

#[derive(Default)]
pub struct FrameGraph {
    pub(crate) passes: Vec<Pass>,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn depth_prepass(mut self) -> Self {
        self.passes.push(Pass::DepthPrepass);
        self
    }
    pub fn scene(mut self) -> Self {
        self.passes.push(Pass::Scene);
        self
    }
    pub fn skybox(mut self) -> Self {
        self.passes.push(Pass::Skybox);
        self
    }
    pub fn blit(mut self) -> Self {
        self.passes.push(Pass::Blit);
        self
    }

    /// The full prepass / lit / sky / present sequence.
    pub fn standard() -> Self {
        Self::new().depth_prepass().scene().skybox().blit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_run_in_push_order() {
        let fg = FrameGraph::standard();
        assert_eq!(
            fg.passes,
            vec![Pass::DepthPrepass, Pass::Scene, Pass::Skybox, Pass::Blit]
        );
    }

    #[test]
    fn passes_carry_no_per_pass_state() {
        // The scene clear color is session state; two graphs built the
        // same way are interchangeable.
        let a = FrameGraph::standard();
        let b = FrameGraph::new().depth_prepass().scene().skybox().blit();
        assert_eq!(a.passes, b.passes);
    }
}
