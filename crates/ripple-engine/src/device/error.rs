/// What the frame loop should do after a surface acquire failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface was reconfigured; the next frame can render.
    Reconfigured,
    /// Transient failure (timeout); drop this frame.
    SkipFrame,
    /// Out of memory; the window cannot keep rendering.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
