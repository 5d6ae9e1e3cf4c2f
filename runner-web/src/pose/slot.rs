//! Latest-sample slot between the detector callback and the frame loop
//!
//! Single producer, single slot, last write wins. Samples are replaced
//! whole, so a reader never observes a half-written keypoint set.

use super::keypoint::PoseSample;

/// One frame-loop view of the slot
#[derive(Clone, Copy, Debug)]
pub struct PoseRead<'a> {
    pub sample: Option<&'a PoseSample>,
    /// Written since the previous `read`; false means the detector has not
    /// produced anything new and `sample` was already seen
    pub fresh: bool,
}

#[derive(Default)]
pub struct PoseSlot {
    latest: Option<PoseSample>,
    /// Total publishes, including "no detection" clears
    writes: u64,
    /// Value of `writes` at the last `read`
    read_at: u64,
}

impl PoseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite with a fresh detection
    pub fn publish(&mut self, sample: PoseSample) {
        self.latest = Some(sample);
        self.writes += 1;
    }

    /// Detector reported no person in frame
    pub fn clear(&mut self) {
        self.latest = None;
        self.writes += 1;
    }

    #[cfg(test)]
    fn latest(&self) -> Option<&PoseSample> {
        self.latest.as_ref()
    }

    /// Frame-loop read: latest sample plus whether it is new
    pub fn read(&mut self) -> PoseRead<'_> {
        let fresh = self.writes != self.read_at;
        self.read_at = self.writes;
        PoseRead {
            sample: self.latest.as_ref(),
            fresh,
        }
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}
