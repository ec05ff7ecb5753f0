/// What the frame loop does after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was lost or outdated and has been configured again.
    Reconfigured,
    /// Acquisition timed out; the frame is dropped and the next redraw retries.
    SkipFrame,
    /// Out of memory; the window closes.
    Fatal,
}
