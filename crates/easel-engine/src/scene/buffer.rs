use super::Primitive;

/// Recorded primitives for one frame, in issue order.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps the allocation, so a buffer handed back and forth between
///   the drawing thread and the renderer stops allocating once warmed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneBuffer {
    items: Vec<Primitive>,
}

impl SceneBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded primitives. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replaces the contents with a copy of `other`, reusing this buffer's
    /// allocation.
    pub fn copy_from(&mut self, other: &SceneBuffer) {
        self.items.clear();
        self.items.extend_from_slice(&other.items);
    }

    #[inline]
    pub fn push(&mut self, primitive: Primitive) {
        self.items.push(primitive);
    }

    /// Returns primitives in issue (paint) order.
    #[inline]
    pub fn items(&self) -> &[Primitive] {
        &self.items
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    #[test]
    fn push_preserves_issue_order() {
        let mut buf = SceneBuffer::new();
        buf.push_line(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Color::WHITE);
        buf.push_ellipse(Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0), Color::WHITE, Color::TRANSPARENT);
        buf.push_point(Vec2::new(3.0, 4.0), Color::RED);

        let kinds: Vec<_> = buf.iter().map(Primitive::kind_name).collect();
        assert_eq!(kinds, ["line", "ellipse", "point"]);
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut buf = SceneBuffer::new();
        for i in 0..32 {
            buf.push_point(Vec2::new(i as f32, 0.0), Color::WHITE);
        }
        let cap = buf.items.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.items.capacity(), cap);
    }

    #[test]
    fn copy_from_replaces_contents() {
        let mut src = SceneBuffer::new();
        src.push_point(Vec2::new(1.0, 2.0), Color::RED);
        let mut dst = SceneBuffer::new();
        dst.push_line(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Color::WHITE);
        dst.push_point(Vec2::new(9.0, 9.0), Color::WHITE);

        dst.copy_from(&src);
        assert_eq!(dst, src);
    }
}
