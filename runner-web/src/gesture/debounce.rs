//! Frame-count debounce
//!
//! A new value is only trusted after it has been observed for N
//! consecutive frames. Any frame that disagrees restarts the count.

/// Debounced value with a single pending candidate
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    stable: T,
    candidate: Option<T>,
    count: u32,
    required: u32,
}

impl<T: Copy + PartialEq> Debouncer<T> {
    /// `required` below 1 is treated as 1 (no debounce)
    pub fn new(initial: T, required: u32) -> Self {
        Self {
            stable: initial,
            candidate: None,
            count: 0,
            required: required.max(1),
        }
    }

    /// Feed one raw observation, returns the debounced value
    pub fn update(&mut self, raw: T) -> T {
        if raw == self.stable {
            self.candidate = None;
            self.count = 0;
            return self.stable;
        }

        if self.candidate == Some(raw) {
            self.count += 1;
        } else {
            self.candidate = Some(raw);
            self.count = 1;
        }

        if self.count >= self.required {
            self.stable = raw;
            self.candidate = None;
            self.count = 0;
        }

        self.stable
    }

    pub fn stable(&self) -> T {
        self.stable
    }

    /// Candidate being counted and how many frames it has persisted
    #[cfg(test)]
    fn pending(&self) -> Option<(T, u32)> {
        self.candidate.map(|c| (c, self.count))
    }

    /// Force a value and drop any pending candidate
    pub fn reset(&mut self, value: T) {
        self.stable = value;
        self.candidate = None;
        self.count = 0;
    }
}
