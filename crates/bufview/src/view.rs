use bstr::BStr;

use crate::{
    buffer::{Buffer, MarkerId, ViewId},
    error::BufferError,
};

/// Mutable cursor access to one view of a [`Buffer`].
///
/// Obtained from [`Buffer::view`] or [`Buffer::root_view`]. All reads,
/// writes, searches and numeric parses are methods on this type; they are
/// spread over the `read`, `write`, `search` and `number` modules.
#[derive(Debug)]
pub struct ViewMut<'b, 'a> {
    pub(crate) buf: &'b mut Buffer<'a>,
    pub(crate) id: ViewId,
}

impl<'b, 'a> ViewMut<'b, 'a> {
    pub(crate) fn new(buf: &'b mut Buffer<'a>, id: ViewId) -> Self {
        Self { buf, id }
    }

    /// Handle of the view this cursor operates on.
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The underlying buffer, read-only so the view cannot be released out
    /// from under itself.
    #[must_use]
    pub fn buffer(&self) -> &Buffer<'a> {
        &*self.buf
    }

    /// Region offset of the view's first byte.
    #[must_use]
    pub fn start(&self) -> usize {
        self.buf.slot(self.id).start
    }

    /// Region offset of the cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.buf.slot(self.id).pos
    }

    /// Region offset one past the view's last byte.
    #[must_use]
    pub fn end(&self) -> usize {
        self.buf.slot(self.id).end
    }

    /// Bytes between the start of the view and the cursor.
    #[must_use]
    pub fn used(&self) -> usize {
        let v = self.buf.slot(self.id);
        v.pos - v.start
    }

    /// Bytes between the cursor and the end of the view.
    #[must_use]
    pub fn remaining(&self) -> usize {
        let v = self.buf.slot(self.id);
        v.end - v.pos
    }

    /// Bytes compacted away from the front since this view was created.
    #[must_use]
    pub fn shifted(&self) -> usize {
        self.buf.slot(self.id).shifted
    }

    /// Whether writes through this view are refused.
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.buf.slot(self.id).is_const
    }

    /// Whether the view is in peek mode.
    #[must_use]
    pub fn is_no_advance(&self) -> bool {
        self.buf.slot(self.id).no_advance
    }

    /// In no-advance mode every operation reports what it would have
    /// consumed but leaves the position where it is.
    pub fn set_no_advance(&mut self, no_advance: bool) {
        self.buf.slot_mut(self.id).no_advance = no_advance;
    }

    /// Makes this view read-only. Children derived afterwards inherit it.
    pub fn make_const(&mut self) {
        self.buf.slot_mut(self.id).is_const = true;
    }

    /// The unread bytes, from the cursor to the end of the view.
    #[must_use]
    pub fn current(&self) -> &[u8] {
        let v = self.buf.slot(self.id);
        &self.buf.backing.bytes()[v.pos..v.end]
    }

    /// The whole window, from the start of the view to its end.
    #[must_use]
    pub fn window(&self) -> &[u8] {
        let v = self.buf.slot(self.id);
        &self.buf.backing.bytes()[v.start..v.end]
    }

    /// The bytes consumed or written so far, from the start of the view to
    /// the cursor.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        let v = self.buf.slot(self.id);
        BStr::new(&self.buf.backing.bytes()[v.start..v.pos])
    }

    /// Writable access to the unread bytes. `None` for const views.
    pub fn remaining_mut(&mut self) -> Option<&mut [u8]> {
        let v = self.buf.slot(self.id);
        if v.is_const {
            return None;
        }
        let (pos, end) = (v.pos, v.end);
        self.buf.backing.raw_mut().map(|raw| &mut raw[pos..end])
    }

    /// Moves the cursor forward by up to `n` bytes, never past the end.
    ///
    /// Returns the distance the cursor would have moved, which is also what
    /// it reports in no-advance mode.
    pub fn advance(&mut self, n: usize) -> usize {
        let v = self.buf.slot(self.id);
        let n = n.min(v.end - v.pos);
        let target = v.pos + n;
        self.buf.move_to(self.id, target);
        n
    }

    /// Rewinds the cursor to the start of the view.
    pub fn set_to_start(&mut self) {
        let start = self.start();
        self.buf.move_to(self.id, start);
    }

    /// Moves the cursor to the end of the view.
    pub fn set_to_end(&mut self) {
        let end = self.end();
        self.buf.move_to(self.id, end);
    }

    /// Moves the cursor to `pos`, clamped into the window. Returns the new
    /// position.
    pub fn set_position(&mut self, pos: usize) -> usize {
        self.buf.move_to(self.id, pos);
        self.position()
    }

    /// Moves the cursor back (or forward) to a saved marker.
    ///
    /// Returns `false` without moving if the marker was released or belongs
    /// to a different view.
    pub fn reset_to(&mut self, marker: MarkerId) -> bool {
        if self.buf.marker_view(marker) != Some(self.id) {
            return false;
        }
        let Some(pos) = self.buf.marker_position(marker) else {
            return false;
        };
        self.buf.move_to(self.id, pos);
        true
    }

    /// Bytes from `marker` to the cursor, or `None` if the marker is not one
    /// of this view's or lies ahead of the cursor.
    #[must_use]
    pub fn since(&self, marker: MarkerId) -> Option<&[u8]> {
        if self.buf.marker_view(marker) != Some(self.id) {
            return None;
        }
        let from = self.buf.marker_position(marker)?;
        self.buf.backing.bytes().get(from..self.position())
    }

    /// Saves the current position.
    pub fn marker(&mut self) -> MarkerId {
        self.buf.insert_marker(self.id)
    }

    /// Derives a child starting at the cursor; see [`Buffer::child`].
    pub fn child(&mut self) -> ViewId {
        match self.buf.child(self.id) {
            Some(id) => id,
            None => unreachable!("live view has no slot"),
        }
    }

    /// Derives a child that never moves this view; see
    /// [`Buffer::peek_child`].
    pub fn peek_child(&mut self) -> ViewId {
        match self.buf.peek_child(self.id) {
            Some(id) => id,
            None => unreachable!("live view has no slot"),
        }
    }

    /// Grows the region on behalf of this view.
    ///
    /// # Errors
    ///
    /// [`BufferError::ReadOnly`] for a const view,
    /// [`BufferError::NotExtensible`] if the view's window stops short of the
    /// region end, otherwise whatever [`Buffer::extend`] reports.
    pub fn extend(&mut self, requested: usize) -> Result<usize, BufferError> {
        self.buf.extend_for(self.id, requested)
    }
}
