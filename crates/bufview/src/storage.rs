//! Storage backing a buffer tree.
//!
//! Three kinds of region exist:
//! - `Const`: caller-owned, read-only bytes. No terminator is guaranteed and
//!   the region can never be extended or shifted.
//! - `Fixed`: caller-owned, writable bytes. The last byte of the slice is
//!   reserved for the terminator, so the logical length is one less than the
//!   slice length.
//! - `Growable`: a `Vec<u8>` owned by the buffer, always one byte longer than
//!   the logical length, grown by the policy in [`Growable::extend`].
//!
//! Invariant for the two mutable kinds: `raw[len] == 0`.

use alloc::vec::Vec;

use crate::{error::BufferError, options::GrowthOptions};

#[derive(Debug)]
pub(crate) enum Backing<'a> {
    Const(&'a [u8]),
    Fixed(&'a mut [u8]),
    Growable(Growable),
}

impl<'a> Backing<'a> {
    pub(crate) fn fixed(bytes: &'a mut [u8]) -> Result<Self, BufferError> {
        let Some(last) = bytes.last_mut() else {
            return Err(BufferError::NoTerminatorRoom);
        };
        *last = 0;
        Ok(Backing::Fixed(bytes))
    }

    /// Logical length, excluding the terminator.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Backing::Const(b) => b.len(),
            Backing::Fixed(b) => b.len() - 1,
            Backing::Growable(g) => g.len(),
        }
    }

    #[inline]
    pub(crate) fn is_const(&self) -> bool {
        matches!(self, Backing::Const(_))
    }

    /// The logical region.
    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            Backing::Const(b) => b,
            Backing::Fixed(b) => &b[..b.len() - 1],
            Backing::Growable(g) => &g.data[..g.len()],
        }
    }

    /// The logical region plus its terminator slot. `None` for const regions.
    #[inline]
    pub(crate) fn raw_mut(&mut self) -> Option<&mut [u8]> {
        match self {
            Backing::Const(_) => None,
            Backing::Fixed(b) => Some(b),
            Backing::Growable(g) => Some(&mut g.data),
        }
    }

    /// The byte one past the logical end, for the two mutable kinds.
    pub(crate) fn terminator(&self) -> Option<u8> {
        match self {
            Backing::Const(_) => None,
            Backing::Fixed(b) => b.last().copied(),
            Backing::Growable(g) => g.data.last().copied(),
        }
    }

    pub(crate) fn growable_mut(&mut self) -> Option<&mut Growable> {
        match self {
            Backing::Growable(g) => Some(g),
            Backing::Const(_) | Backing::Fixed(_) => None,
        }
    }

    pub(crate) fn reallocations(&self) -> usize {
        match self {
            Backing::Growable(g) => g.reallocations,
            Backing::Const(_) | Backing::Fixed(_) => 0,
        }
    }
}

/// Owned, extensible region.
#[derive(Debug)]
pub(crate) struct Growable {
    data: Vec<u8>,
    options: GrowthOptions,
    reallocations: usize,
}

impl Growable {
    pub(crate) fn new(options: GrowthOptions) -> Result<Self, BufferError> {
        let options = options.normalized();
        let total = options.floor.saturating_add(1);
        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| BufferError::AllocFailed {
                requested: options.floor,
                total: options.floor,
            })?;
        data.resize(total, 0);
        Ok(Self {
            data,
            options,
            reallocations: 0,
        })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub(crate) fn options(&self) -> GrowthOptions {
        self.options
    }

    /// Target logical length for an extension of `requested` bytes, before
    /// the ceiling is applied.
    fn target(&self, requested: usize) -> usize {
        let len = self.len();
        let wanted = len.saturating_add(requested);
        if wanted < self.options.floor {
            self.options.floor
        } else if requested < len {
            len.saturating_mul(2)
        } else {
            wanted
        }
    }

    /// Grows the region by at least one byte, returning the number of logical
    /// bytes gained.
    ///
    /// The new bytes (and the terminator after them) are zeroed. Failure
    /// leaves the region untouched.
    pub(crate) fn extend(&mut self, requested: usize) -> Result<usize, BufferError> {
        let len = self.len();
        let mut target = self.target(requested);

        if self.options.is_bounded() && target > self.options.ceiling {
            if len >= self.options.ceiling {
                return Err(BufferError::CeilingReached {
                    requested,
                    total: len.saturating_add(requested),
                    ceiling: self.options.ceiling,
                });
            }
            target = self.options.ceiling;
        }

        let gained = target - len;
        if gained == 0 {
            return Ok(0);
        }

        self.data
            .try_reserve_exact(gained)
            .map_err(|_| BufferError::AllocFailed {
                requested: gained,
                total: target,
            })?;
        self.data.resize(target + 1, 0);
        self.reallocations += 1;

        Ok(gained)
    }

    /// Shrinks the region to `len` logical bytes and re-terminates it.
    pub(crate) fn truncate(&mut self, len: usize) {
        if len >= self.len() {
            return;
        }
        self.data.truncate(len + 1);
        self.data[len] = 0;
        self.data.shrink_to_fit();
        self.reallocations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn growable(floor: usize, ceiling: usize) -> Growable {
        Growable::new(GrowthOptions { floor, ceiling }).unwrap()
    }

    #[test]
    fn initial_allocation_is_floor_plus_terminator() {
        let g = growable(32, 50);
        assert_eq!(g.len(), 32);
        assert_eq!(g.data.len(), 33);
        assert_eq!(g.data[32], 0);
    }

    #[test]
    fn floor_is_clamped_to_ceiling() {
        let g = growable(64, 16);
        assert_eq!(g.len(), 16);
        assert_eq!(g.options().floor, 16);
    }

    #[test]
    fn recovers_to_floor_after_truncate() {
        let mut g = growable(32, 50);
        g.truncate(0);
        assert_eq!(g.len(), 0);
        assert_eq!(g.extend(10).unwrap(), 32);
        assert_eq!(g.len(), 32);
    }

    #[test]
    fn doubles_when_request_is_smaller_than_length() {
        let mut g = growable(0, 0);
        assert_eq!(g.extend(1).unwrap(), 1);
        assert_eq!(g.extend(2).unwrap(), 2);
        assert_eq!(g.len(), 3);
        assert_eq!(g.extend(1).unwrap(), 3);
        assert_eq!(g.len(), 6);
    }

    #[test]
    fn clamps_then_refuses_at_ceiling() {
        let mut g = growable(40, 50);
        assert_eq!(g.extend(1).unwrap(), 10);
        assert_eq!(g.len(), 50);
        assert_eq!(
            g.extend(1),
            Err(BufferError::CeilingReached {
                requested: 1,
                total: 51,
                ceiling: 50,
            })
        );
        assert_eq!(g.len(), 50);
        assert_eq!(g.reallocations, 1);
    }

    #[test]
    fn fixed_reserves_terminator() {
        let mut raw = [b'x'; 4];
        let b = Backing::fixed(&mut raw).unwrap();
        assert_eq!(b.len(), 3);
        assert_eq!(b.bytes(), b"xxx");
        drop(b);
        assert_eq!(raw[3], 0);

        let mut empty: [u8; 0] = [];
        assert_eq!(
            Backing::fixed(&mut empty).unwrap_err(),
            BufferError::NoTerminatorRoom
        );
    }
}
