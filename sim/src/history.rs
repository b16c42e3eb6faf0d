//! Rolling history of pose samples.

use std::num::NonZeroUsize;

use crate::error::{SimError, SimResult};

/// One pose sample: yaw in degrees and vertical position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    pub yaw: f32,
    pub y: f32,
}

impl Segment {
    #[must_use]
    pub const fn new(yaw: f32, y: f32) -> Self {
        Self { yaw, y }
    }
}

/// Fixed-capacity ring of [`Segment`]s indexed by ticks in the past.
///
/// Every slot is filled at construction, so lookbacks never observe an
/// unset sample.
///
/// ```
/// use std::num::NonZeroUsize;
/// use sim::{Segment, SegmentHistory};
///
/// let mut history = SegmentHistory::filled(NonZeroUsize::new(4).unwrap(), Segment::new(0.0, 64.0));
/// history.push(Segment::new(10.0, 65.0));
/// assert_eq!(history.get(0).unwrap().yaw, 10.0);
/// assert_eq!(history.get(1).unwrap().y, 64.0);
/// assert!(history.get(4).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SegmentHistory {
    slots: Box<[Segment]>,
    latest: usize,
}

impl SegmentHistory {
    /// Creates a history with every slot set to `initial`.
    #[must_use]
    pub fn filled(capacity: NonZeroUsize, initial: Segment) -> Self {
        Self {
            slots: vec![initial; capacity.get()].into_boxed_slice(),
            latest: 0,
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Records a new sample, overwriting the oldest.
    pub fn push(&mut self, segment: Segment) {
        self.latest = (self.latest + 1) % self.slots.len();
        self.slots[self.latest] = segment;
    }

    /// Returns the sample pushed `ticks_ago` pushes before the latest.
    pub fn get(&self, ticks_ago: usize) -> SimResult<Segment> {
        let capacity = self.slots.len();
        if ticks_ago >= capacity {
            return Err(SimError::LookbackOutOfRange {
                ticks_ago,
                capacity,
            });
        }
        Ok(self.slots[(self.latest + capacity - ticks_ago) % capacity])
    }
}
