//! The arena that owns a region and every view and marker into it.
//!
//! Views and markers are addressed by generational handles and hold offsets,
//! never addresses, so a reallocation of the region cannot leave anything
//! dangling. What still has to happen when the region changes length is
//! re-deriving each view's `end` and clamping anything that fell past it;
//! [`Buffer::rebase`] does that for the whole tree in one pass.
//!
//! Invariants (checked by [`Buffer::check_invariants`] in tests and under the
//! `fuzzing` feature):
//! - every view satisfies `start <= position <= end <= len`;
//! - every marker lies inside its owning view's `[start, end]`;
//! - every live marker is reachable from exactly one view's marker list;
//! - mutable regions carry a `0` byte at `len`.

use bstr::BStr;

use crate::{
    error::BufferError,
    options::GrowthOptions,
    slots::{Key, Slots},
    storage::{Backing, Growable},
    view::ViewMut,
};

/// Handle to a view inside a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) Key);

/// Handle to a marker (bookmark) inside a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub(crate) Key);

#[derive(Debug, Clone)]
pub(crate) struct ViewSlot {
    pub(crate) start: usize,
    pub(crate) pos: usize,
    pub(crate) end: usize,
    pub(crate) shifted: usize,
    pub(crate) parent: Option<ViewId>,
    pub(crate) is_const: bool,
    pub(crate) no_advance: bool,
    /// Moving this view also moves its parent to the same offset.
    pub(crate) advance_parent: bool,
    /// Head of this view's marker list.
    pub(crate) markers: Option<MarkerId>,
}

#[derive(Debug, Clone)]
pub(crate) struct MarkerSlot {
    pub(crate) view: ViewId,
    pub(crate) pos: usize,
    next: Option<MarkerId>,
}

/// A point-in-time copy of a view's cursor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewInfo {
    /// Offset of the view's first byte in the region.
    pub start: usize,
    /// Offset of the cursor in the region.
    pub position: usize,
    /// Offset one past the view's last byte in the region.
    pub end: usize,
    /// Bytes discarded from the front of the region by [`Buffer::shift`]
    /// since this view was created.
    pub shifted: usize,
    /// The view this one was derived from, `None` for the root.
    pub parent: Option<ViewId>,
}

/// A byte region plus the tree of views and markers that reference it.
///
/// A buffer is created with a single root view spanning the whole region.
/// Child views start where their parent currently stands; markers save a
/// position and follow it through growth and compaction.
///
/// ```rust
/// use bufview::{Buffer, GrowthOptions};
///
/// let mut buf = Buffer::growable(GrowthOptions::default()).unwrap();
/// let root = buf.root();
/// buf.view(root).unwrap().append_str("hello").unwrap();
/// assert_eq!(buf.as_bytes(), b"hello");
/// ```
#[derive(Debug)]
pub struct Buffer<'a> {
    pub(crate) backing: Backing<'a>,
    pub(crate) views: Slots<ViewSlot>,
    pub(crate) markers: Slots<MarkerSlot>,
    root: ViewId,
    last_error: Option<BufferError>,
}

impl<'a> Buffer<'a> {
    fn with_backing(backing: Backing<'a>) -> Self {
        let mut views = Slots::default();
        let root = ViewId(views.insert(ViewSlot {
            start: 0,
            pos: 0,
            end: backing.len(),
            shifted: 0,
            parent: None,
            is_const: backing.is_const(),
            no_advance: false,
            advance_parent: false,
            markers: None,
        }));
        Self {
            backing,
            views,
            markers: Slots::default(),
            root,
            last_error: None,
        }
    }

    /// A read-only buffer over caller-owned bytes.
    ///
    /// No terminator is guaranteed after the data and the region can never
    /// grow.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_backing(Backing::Const(input))
    }

    /// A fixed-size, writable buffer over caller-owned bytes.
    ///
    /// The last byte of `out` is reserved for the terminator, so the region
    /// holds `out.len() - 1` bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::NoTerminatorRoom`] if `out` is empty.
    pub fn fixed(out: &'a mut [u8]) -> Result<Self, BufferError> {
        Ok(Self::with_backing(Backing::fixed(out)?))
    }
}

impl Buffer<'static> {
    /// A growable buffer owning its region, initially `options.floor` bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::AllocFailed`] if the initial allocation fails.
    pub fn growable(options: GrowthOptions) -> Result<Self, BufferError> {
        Ok(Self::with_backing(Backing::Growable(Growable::new(
            options,
        )?)))
    }
}

impl<'a> From<&'a str> for Buffer<'a> {
    fn from(input: &'a str) -> Self {
        Self::new(input.as_bytes())
    }
}

impl<'a> Buffer<'a> {
    /// The root view, which lives as long as the buffer.
    #[must_use]
    pub fn root(&self) -> ViewId {
        self.root
    }

    /// Cursor access to a view, or `None` if the handle was released.
    pub fn view(&mut self, id: ViewId) -> Option<ViewMut<'_, 'a>> {
        self.views.get(id.0)?;
        Some(ViewMut::new(self, id))
    }

    /// Cursor access to the root view.
    pub fn root_view(&mut self) -> ViewMut<'_, 'a> {
        let root = self.root;
        ViewMut::new(self, root)
    }

    /// Snapshot of a view's cursor state.
    #[must_use]
    pub fn info(&self, id: ViewId) -> Option<ViewInfo> {
        self.views.get(id.0).map(|v| ViewInfo {
            start: v.start,
            position: v.pos,
            end: v.end,
            shifted: v.shifted,
            parent: v.parent,
        })
    }

    /// Logical length of the region.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backing.len()
    }

    /// Whether the region is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the region is read-only.
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.backing.is_const()
    }

    /// The whole logical region.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.backing.bytes()
    }

    /// The bytes the root view has consumed or written so far.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        let root = self.slot(self.root);
        BStr::new(&self.backing.bytes()[root.start..root.pos])
    }

    /// Growth limits, for growable buffers.
    #[must_use]
    pub fn growth_options(&self) -> Option<GrowthOptions> {
        match &self.backing {
            Backing::Growable(g) => Some(g.options()),
            Backing::Const(_) | Backing::Fixed(_) => None,
        }
    }

    /// How many times the region has been reallocated.
    #[must_use]
    pub fn reallocations(&self) -> usize {
        self.backing.reallocations()
    }

    /// Live views, root included.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Live markers across all views.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Every live view.
    pub fn view_ids(&self) -> impl Iterator<Item = ViewId> {
        self.views.iter().map(|(key, _)| ViewId(key))
    }

    /// The most recent capacity failure.
    #[must_use]
    pub fn last_error(&self) -> Option<&BufferError> {
        self.last_error.as_ref()
    }

    /// Takes the most recent capacity failure, clearing the slot.
    pub fn take_last_error(&mut self) -> Option<BufferError> {
        self.last_error.take()
    }

    pub(crate) fn slot(&self, id: ViewId) -> &ViewSlot {
        match self.views.get(id.0) {
            Some(slot) => slot,
            None => unreachable!("view handle outlived its slot"),
        }
    }

    pub(crate) fn slot_mut(&mut self, id: ViewId) -> &mut ViewSlot {
        match self.views.get_mut(id.0) {
            Some(slot) => slot,
            None => unreachable!("view handle outlived its slot"),
        }
    }

    // --- Tree -------------------------------------------------------------

    fn derive(&mut self, parent: ViewId, len: usize, advance_parent: bool) -> Option<ViewId> {
        let p = self.views.get(parent.0)?;
        let end = p.pos.saturating_add(len).min(p.end);
        let slot = ViewSlot {
            start: p.pos,
            pos: p.pos,
            end,
            shifted: 0,
            parent: Some(parent),
            is_const: p.is_const,
            no_advance: false,
            advance_parent,
            markers: None,
        };
        Some(ViewId(self.views.insert(slot)))
    }

    /// Derives a child view starting at the parent's current position and
    /// sharing its end. Moving the child moves the parent with it.
    pub fn child(&mut self, parent: ViewId) -> Option<ViewId> {
        self.derive(parent, usize::MAX, true)
    }

    /// Like [`child`](Self::child), but the window ends at most `len` bytes
    /// after the parent's position. Such a child is never extended.
    pub fn child_bounded(&mut self, parent: ViewId, len: usize) -> Option<ViewId> {
        self.derive(parent, len, true)
    }

    /// Derives a child view whose movement never propagates to the parent.
    pub fn peek_child(&mut self, parent: ViewId) -> Option<ViewId> {
        self.derive(parent, usize::MAX, false)
    }

    /// Releases a view and every marker it owns. Its children are re-parented
    /// to its own parent, and only keep dragging it along if the released
    /// view did too.
    ///
    /// Releasing an already-released handle is a no-op.
    ///
    /// # Errors
    ///
    /// [`BufferError::RootRelease`] for the root view.
    pub fn release(&mut self, id: ViewId) -> Result<(), BufferError> {
        if id == self.root {
            return Err(BufferError::RootRelease);
        }
        let Some(slot) = self.views.remove(id.0) else {
            return Ok(());
        };
        let mut next = slot.markers;
        while let Some(m) = next {
            next = self.markers.remove(m.0).and_then(|m| m.next);
        }
        for (_, v) in self.views.iter_mut() {
            if v.parent == Some(id) {
                v.parent = slot.parent;
                // A child of a peek must not start moving the peek's parent.
                v.advance_parent &= slot.advance_parent;
            }
        }
        Ok(())
    }

    /// Moves a view to `target`, clamped into its window, and carries the
    /// move up the parent chain while links propagate.
    pub(crate) fn move_to(&mut self, id: ViewId, target: usize) {
        let v = self.slot_mut(id);
        if v.no_advance {
            return;
        }
        v.pos = target.clamp(v.start, v.end);
        let mut next = if v.advance_parent { v.parent } else { None };
        while let Some(pid) = next {
            let Some(p) = self.views.get_mut(pid.0) else {
                break;
            };
            if p.no_advance {
                break;
            }
            p.pos = target.clamp(p.start, p.end);
            next = if p.advance_parent { p.parent } else { None };
        }
    }

    // --- Markers ----------------------------------------------------------

    pub(crate) fn insert_marker(&mut self, view: ViewId) -> MarkerId {
        let v = self.slot(view);
        let slot = MarkerSlot {
            view,
            pos: v.pos,
            next: v.markers,
        };
        let id = MarkerId(self.markers.insert(slot));
        self.slot_mut(view).markers = Some(id);
        id
    }

    /// Saves the view's current position as a marker.
    pub fn marker(&mut self, view: ViewId) -> Option<MarkerId> {
        self.views.get(view.0)?;
        Some(self.insert_marker(view))
    }

    /// Releases a marker. Returns `false` if it was already released.
    pub fn release_marker(&mut self, marker: MarkerId) -> bool {
        let Some(slot) = self.markers.remove(marker.0) else {
            return false;
        };
        let Some(owner) = self.views.get_mut(slot.view.0) else {
            return true;
        };
        if owner.markers == Some(marker) {
            owner.markers = slot.next;
            return true;
        }
        let mut cur = owner.markers;
        while let Some(c) = cur {
            let Some(node) = self.markers.get_mut(c.0) else {
                break;
            };
            if node.next == Some(marker) {
                node.next = slot.next;
                break;
            }
            cur = node.next;
        }
        true
    }

    /// Region offset a marker points at.
    #[must_use]
    pub fn marker_position(&self, marker: MarkerId) -> Option<usize> {
        self.markers.get(marker.0).map(|m| m.pos)
    }

    /// The view a marker belongs to.
    #[must_use]
    pub fn marker_view(&self, marker: MarkerId) -> Option<ViewId> {
        self.markers.get(marker.0).map(|m| m.view)
    }

    /// The markers owned by `view`, most recently acquired first.
    pub fn markers_of(&self, view: ViewId) -> impl Iterator<Item = MarkerId> {
        let head = self.views.get(view.0).and_then(|v| v.markers);
        core::iter::successors(head, move |m| self.markers.get(m.0).and_then(|s| s.next))
    }

    // --- Growth -----------------------------------------------------------

    /// Asks the storage provider for `requested` more bytes, returning the
    /// number of bytes actually gained.
    ///
    /// Every view whose window reached the old end of the region follows it
    /// to the new end.
    ///
    /// # Errors
    ///
    /// [`BufferError::ReadOnly`] for const regions,
    /// [`BufferError::NotExtensible`] for fixed regions,
    /// [`BufferError::CeilingReached`] or [`BufferError::AllocFailed`] when the
    /// provider refuses. Each is also stored as the [last
    /// error](Self::last_error).
    pub fn extend(&mut self, requested: usize) -> Result<usize, BufferError> {
        let old_len = self.backing.len();
        let result = match &mut self.backing {
            Backing::Growable(g) => g.extend(requested),
            Backing::Const(_) => Err(BufferError::ReadOnly),
            Backing::Fixed(_) => Err(BufferError::NotExtensible { requested }),
        };
        match result {
            Ok(gained) => {
                if gained > 0 {
                    tracing::debug!(old_len, new_len = old_len + gained, gained, "extended buffer");
                    self.rebase(old_len);
                }
                Ok(gained)
            }
            Err(err) => {
                tracing::debug!(requested, error = %err, "buffer extension refused");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Extension on behalf of a view: only views whose window reaches the
    /// end of the region can be helped by growing it.
    pub(crate) fn extend_for(&mut self, id: ViewId, requested: usize) -> Result<usize, BufferError> {
        let v = self.slot(id);
        if v.is_const {
            return Err(BufferError::ReadOnly);
        }
        if v.end != self.backing.len() {
            return Err(BufferError::NotExtensible { requested });
        }
        self.extend(requested)
    }

    /// Re-derives every view and marker after the region changed length
    /// from `old_len` to its current length.
    ///
    /// Visits the whole tree unconditionally. A view whose `end` was the old
    /// region end follows the region; an `end` past the new length is cut to
    /// it. Positions and markers left past their view's end are clamped to
    /// it; the number of such clamps is returned and reported as a warning,
    /// since correct bookkeeping never produces one. Running it twice is the
    /// same as running it once.
    pub(crate) fn rebase(&mut self, old_len: usize) -> usize {
        let new_len = self.backing.len();
        let mut clamped = 0;

        for (_, v) in self.views.iter_mut() {
            if v.end == old_len || v.end > new_len {
                v.end = new_len;
            }
            v.start = v.start.min(v.end);
            if v.pos > v.end {
                v.pos = v.end;
                clamped += 1;
            }
        }

        for (_, m) in self.markers.iter_mut() {
            let Some(owner) = self.views.get(m.view.0) else {
                continue;
            };
            if m.pos > owner.end {
                m.pos = owner.end;
                clamped += 1;
            }
            m.pos = m.pos.max(owner.start);
        }

        if clamped > 0 {
            tracing::warn!(
                clamped,
                old_len,
                new_len,
                "rebase clamped positions past the end of the region"
            );
        }
        clamped
    }

    /// Shrinks a growable region to the root view's used length.
    ///
    /// A later extension snaps back to the configured floor. Fixed and const
    /// regions are left alone.
    ///
    /// # Errors
    ///
    /// [`BufferError::Clamped`] if views or markers pointed past the new end.
    /// They have been clamped to it and the trim has still happened.
    pub fn trim(&mut self) -> Result<(), BufferError> {
        let new_len = self.slot(self.root).pos;
        let old_len = self.backing.len();
        let Some(g) = self.backing.growable_mut() else {
            return Ok(());
        };
        if new_len >= old_len {
            return Ok(());
        }
        g.truncate(new_len);
        match self.rebase(old_len) {
            0 => Ok(()),
            clamped => Err(BufferError::Clamped { clamped }),
        }
    }

    // --- Compaction -------------------------------------------------------

    /// Discards up to `n` bytes from the front of the region, returning how
    /// many were discarded (`0` when refused).
    ///
    /// The shift is bounded by the nearest live position: no view position or
    /// marker may end up before the start of the region. The retained bytes
    /// are moved to the front, the freed tail is zeroed for
    /// [`tail_mut`](Self::tail_mut) to refill, and every position, marker and
    /// view start moves back by the shifted amount. Views that reach the end
    /// of the region keep reaching it. Const regions refuse.
    ///
    /// A request larger than the nearest position is granted in part rather
    /// than refused: the return value is the amount actually shifted, which
    /// callers compare against `n` if they need all or nothing.
    pub fn shift(&mut self, n: usize) -> usize {
        if self.backing.is_const() || n == 0 {
            return 0;
        }

        let mut max_shift = n.min(self.backing.len());
        for (_, v) in self.views.iter() {
            max_shift = max_shift.min(v.pos);
        }
        for (_, m) in self.markers.iter() {
            max_shift = max_shift.min(m.pos);
        }
        tracing::trace!(requested = n, granted = max_shift, "shift");
        if max_shift == 0 {
            return 0;
        }

        let len = self.backing.len();
        if let Some(raw) = self.backing.raw_mut() {
            raw.copy_within(max_shift..len, 0);
            raw[len - max_shift..].fill(0);
        }

        for (_, v) in self.views.iter_mut() {
            v.pos -= max_shift;
            v.start = v.start.saturating_sub(max_shift);
            // Windows that stop short of the region end move with their bytes.
            if v.end != len {
                v.end -= max_shift;
            }
            v.shifted += max_shift;
        }
        for (_, m) in self.markers.iter_mut() {
            m.pos -= max_shift;
        }

        max_shift
    }

    /// The last `n` bytes of a mutable region (fewer if the region is
    /// shorter), for writing fresh content after a [`shift`](Self::shift).
    pub fn tail_mut(&mut self, n: usize) -> Option<&mut [u8]> {
        let len = self.backing.len();
        let n = n.min(len);
        self.backing.raw_mut().map(|raw| &mut raw[len - n..len])
    }

    /// Verifies the structural invariants of the tree.
    ///
    /// # Errors
    ///
    /// A description of the first violation found.
    #[cfg(any(test, feature = "fuzzing"))]
    pub fn check_invariants(&self) -> Result<(), alloc::string::String> {
        use alloc::format;

        let len = self.backing.len();
        let mut reachable = 0;
        for (key, v) in self.views.iter() {
            if !(v.start <= v.pos && v.pos <= v.end && v.end <= len) {
                return Err(format!(
                    "view {key:?}: start {} pos {} end {} len {len}",
                    v.start, v.pos, v.end
                ));
            }
            let mut cur = v.markers;
            while let Some(m) = cur {
                let Some(slot) = self.markers.get(m.0) else {
                    return Err(format!("view {key:?}: dangling marker {m:?}"));
                };
                if slot.view.0 != key {
                    return Err(format!("marker {m:?} linked from the wrong view"));
                }
                if slot.pos < v.start || slot.pos > v.end {
                    return Err(format!(
                        "marker {m:?} at {} outside [{}, {}]",
                        slot.pos, v.start, v.end
                    ));
                }
                reachable += 1;
                cur = slot.next;
            }
        }
        if reachable != self.markers.len() {
            return Err(format!(
                "{} markers live, {reachable} reachable",
                self.markers.len()
            ));
        }
        if let Some(t) = self.backing.terminator() {
            if t != 0 {
                return Err(format!("terminator is {t:#04x}"));
            }
        }
        Ok(())
    }
}
