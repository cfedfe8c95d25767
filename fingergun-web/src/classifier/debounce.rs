//! Gesture debouncer - short unanimous-vote window per hand
//!
//! A single misclassified frame must not toggle the gesture, so the pose is
//! only reported once the last few verdicts all agree. Costs up to two frames
//! of latency at the default window length.

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct GestureDebouncer {
    /// Most recent verdicts, oldest first
    history: VecDeque<bool>,
    /// Window length
    capacity: usize,
}

impl GestureDebouncer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push this frame's verdict, returns the debounced state
    pub fn push(&mut self, verdict: bool) -> bool {
        self.history.push_back(verdict);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        self.is_active()
    }

    /// True only when the window is full and every entry is true
    pub fn is_active(&self) -> bool {
        self.history.len() == self.capacity && self.history.iter().all(|&v| v)
    }

    /// Frames currently in the window
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Change the window length, keeping the newest verdicts
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        Self::new(crate::config::GESTURE_HISTORY_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_true_never_activates() {
        let mut debouncer = GestureDebouncer::default();
        assert!(!debouncer.push(true));
        assert!(!debouncer.push(false));
        assert!(!debouncer.push(false));
    }

    #[test]
    fn test_three_trues_activate_on_third() {
        let mut debouncer = GestureDebouncer::default();
        assert!(!debouncer.push(true));
        assert!(!debouncer.push(true));
        assert!(debouncer.push(true));
    }

    #[test]
    fn test_one_false_drops_out() {
        let mut debouncer = GestureDebouncer::default();
        for _ in 0..3 {
            debouncer.push(true);
        }
        assert!(!debouncer.push(false));
        assert!(!debouncer.push(true));
        assert!(!debouncer.push(true));
        assert!(debouncer.push(true));
    }

    #[test]
    fn test_window_is_bounded() {
        let mut debouncer = GestureDebouncer::default();
        for i in 0..10 {
            debouncer.push(i % 2 == 0);
            assert!(debouncer.len() <= 3);
        }
    }

    #[test]
    fn test_clear_requires_full_window_again() {
        let mut debouncer = GestureDebouncer::default();
        for _ in 0..3 {
            debouncer.push(true);
        }
        debouncer.clear();
        assert!(debouncer.is_empty());
        assert!(!debouncer.push(true));
    }
}
