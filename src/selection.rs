use std::num::NonZeroUsize;

/// A selection of [`Frame`](super::Frame)s to be written out of a [`Trajectory`](super::Trajectory).
///
/// The `start` of a [`Range`] is always bounded, and is zero by default. It is the number of
/// frames skipped at the beginning of the trajectory.
/// The `end` may be bounded or unbounded. In case the end is unbounded ([`None`]), frames are
/// selected up to and including the last one. If it is bounded by [`Some`] value, it is an
/// exclusive bound.
/// The `step` is the stride: the number of frames passed in each step. The number of frames
/// left out between two selected frames is equal to `step` - 1.
///
/// # Note
///
/// An instance where `start` > `end` is a valid `Range`, but it selects no frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: Option<usize>,
    pub step: NonZeroUsize,
}

impl Range {
    pub fn new(start: Option<usize>, end: Option<usize>, step: Option<NonZeroUsize>) -> Self {
        let mut sel = Self {
            end,
            ..Self::default()
        };
        if let Some(start) = start {
            sel.start = start;
        }
        if let Some(step) = step {
            sel.step = step;
        }
        sel
    }

    /// Skip the first `skip` frames, then take every `stride`-th frame.
    ///
    /// A `stride` of zero is treated as one.
    pub fn skip_stride(skip: usize, stride: usize) -> Self {
        Self::new(Some(skip), None, NonZeroUsize::new(stride))
    }

    /// The selected indices of a trajectory with `nframes` frames, in ascending order.
    pub fn indices(&self, nframes: usize) -> impl Iterator<Item = usize> {
        let end = self.end.map_or(nframes, |end| end.min(nframes));
        (self.start..end).step_by(self.step.get())
    }
}

impl Default for Range {
    fn default() -> Self {
        Self {
            start: 0,
            end: None,
            step: NonZeroUsize::MIN,
        }
    }
}
