/// Growth configuration for a growable [`Buffer`](crate::Buffer).
///
/// Both limits are measured in logical bytes, excluding the terminator the
/// buffer always keeps one past the end. They are fixed for the lifetime of
/// the buffer.
///
/// # Examples
///
/// ```rust
/// use bufview::{Buffer, GrowthOptions};
///
/// let buf = Buffer::growable(GrowthOptions {
///     floor: 32,
///     ceiling: 50,
/// })
/// .unwrap();
/// assert_eq!(buf.len(), 32);
/// ```
///
/// # Default
///
/// Both fields default to `0`: start empty and grow without bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthOptions {
    /// Initial allocation, and the size the region snaps back to when an
    /// extension is requested after a trim took it below this value.
    ///
    /// A floor above a non-zero `ceiling` is clamped to the ceiling.
    ///
    /// # Default
    ///
    /// `0`
    pub floor: usize,

    /// Largest logical length the region may ever reach. `0` means unbounded.
    ///
    /// Once the region is at the ceiling every further extension fails with
    /// [`BufferError::CeilingReached`](crate::BufferError::CeilingReached).
    ///
    /// # Default
    ///
    /// `0`
    pub ceiling: usize,
}

impl GrowthOptions {
    /// Options with the given floor and no ceiling.
    #[must_use]
    pub const fn with_floor(floor: usize) -> Self {
        Self { floor, ceiling: 0 }
    }

    pub(crate) fn normalized(self) -> Self {
        if self.ceiling != 0 && self.floor > self.ceiling {
            Self {
                floor: self.ceiling,
                ..self
            }
        } else {
            self
        }
    }

    pub(crate) fn is_bounded(&self) -> bool {
        self.ceiling != 0
    }
}
