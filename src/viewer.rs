//! The lightbox state machine. The server renders the initial (closed)
//! state and ships the image list; public/viewer.js mirrors these
//! transitions in the browser. This module is the source of truth for the
//! transition table and the responsive fit math, and is what the tests
//! exercise.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Closed,
    Open {
        index: usize,
        /// Set while the fade between two images plays. Cleared by
        /// `settle` after the client-side delay; never blocks navigation.
        transitioning: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

/// A lightbox over a fixed list of N images. Navigation is cyclic: there
/// is no terminal index in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    image_count: usize,
    state: ViewerState,
}

impl Viewer {
    pub fn new(image_count: usize) -> Viewer {
        Viewer {
            image_count,
            state: ViewerState::Closed,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn open_index(&self) -> Option<usize> {
        match self.state {
            ViewerState::Open { index, .. } => Some(index),
            ViewerState::Closed => None,
        }
    }

    /// Thumbnail click. Out-of-range indices and empty viewers stay closed.
    pub fn open(&mut self, index: usize) {
        if index < self.image_count {
            self.state = ViewerState::Open { index, transitioning: false };
        }
    }

    pub fn close(&mut self) {
        self.state = ViewerState::Closed;
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn prev(&mut self) {
        // +N-1 instead of -1 keeps the arithmetic in unsigned range.
        self.step(self.image_count.wrapping_sub(1));
    }

    /// Clears the transient fade state once the client-side delay fires.
    pub fn settle(&mut self) {
        if let ViewerState::Open { index, .. } = self.state {
            self.state = ViewerState::Open { index, transitioning: false };
        }
    }

    pub fn handle_key(&mut self, key: KeyInput) {
        match key {
            KeyInput::ArrowLeft => self.prev(),
            KeyInput::ArrowRight => self.next(),
            KeyInput::Escape => self.close(),
            KeyInput::Other => {}
        }
    }

    fn step(&mut self, delta: usize) {
        if let ViewerState::Open { index, .. } = self.state {
            if self.image_count == 0 {
                return;
            }
            self.state = ViewerState::Open {
                index: (index + delta) % self.image_count,
                transitioning: true,
            };
        }
    }
}

/// Fits (width, height) into (max_w, max_h) preserving aspect ratio,
/// only ever scaling down. Used to size the open image against a
/// viewport-relative max box; recomputed on resize while open.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_w == 0 || max_h == 0 {
        return (0, 0);
    }
    if width <= max_w && height <= max_h {
        return (width, height);
    }

    let scale_w = max_w as f64 / width as f64;
    let scale_h = max_h as f64 / height as f64;
    let scale = scale_w.min(scale_h);

    let fitted_w = ((width as f64 * scale).round() as u32).max(1);
    let fitted_h = ((height as f64 * scale).round() as u32).max(1);
    (fitted_w.min(max_w), fitted_h.min(max_h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let mut viewer = Viewer::new(3);
        assert_eq!(viewer.state(), ViewerState::Closed);

        viewer.open(1);
        assert_eq!(viewer.open_index(), Some(1));

        viewer.close();
        assert_eq!(viewer.state(), ViewerState::Closed);

        viewer.open(3); // out of range
        assert_eq!(viewer.state(), ViewerState::Closed);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut viewer = Viewer::new(3);
        viewer.open(2);
        viewer.next();
        assert_eq!(viewer.open_index(), Some(0));
        viewer.prev();
        assert_eq!(viewer.open_index(), Some(2));
    }

    #[test]
    fn test_next_n_times_is_identity() {
        let n = 5;
        let mut viewer = Viewer::new(n);
        viewer.open(3);
        for _ in 0..n {
            viewer.next();
        }
        assert_eq!(viewer.open_index(), Some(3));
    }

    #[test]
    fn test_prev_undoes_next() {
        let mut viewer = Viewer::new(7);
        for start in 0..7 {
            viewer.open(start);
            viewer.next();
            viewer.prev();
            assert_eq!(viewer.open_index(), Some(start));
        }
    }

    #[test]
    fn test_navigation_noop_when_closed() {
        let mut viewer = Viewer::new(3);
        viewer.next();
        viewer.prev();
        viewer.settle();
        assert_eq!(viewer.state(), ViewerState::Closed);
    }

    #[test]
    fn test_transitioning_set_and_settled() {
        let mut viewer = Viewer::new(3);
        viewer.open(0);
        assert_eq!(viewer.state(), ViewerState::Open { index: 0, transitioning: false });

        viewer.next();
        assert_eq!(viewer.state(), ViewerState::Open { index: 1, transitioning: true });

        viewer.settle();
        assert_eq!(viewer.state(), ViewerState::Open { index: 1, transitioning: false });
    }

    #[test]
    fn test_key_input() {
        let mut viewer = Viewer::new(4);
        viewer.open(0);
        viewer.handle_key(KeyInput::ArrowRight);
        assert_eq!(viewer.open_index(), Some(1));
        viewer.handle_key(KeyInput::ArrowLeft);
        assert_eq!(viewer.open_index(), Some(0));
        viewer.handle_key(KeyInput::Other);
        assert_eq!(viewer.open_index(), Some(0));
        viewer.handle_key(KeyInput::Escape);
        assert_eq!(viewer.state(), ViewerState::Closed);
    }

    #[test]
    fn test_empty_viewer_stays_closed() {
        let mut viewer = Viewer::new(0);
        viewer.open(0);
        assert_eq!(viewer.state(), ViewerState::Closed);
    }

    #[test]
    fn test_fit_within() {
        // Already fits: untouched.
        assert_eq!(fit_within(400, 300, 800, 600), (400, 300));
        // Landscape constrained by width.
        assert_eq!(fit_within(4032, 3024, 1008, 1008), (1008, 756));
        // Portrait constrained by height.
        assert_eq!(fit_within(3024, 4032, 1008, 1008), (756, 1008));
        // Degenerate inputs.
        assert_eq!(fit_within(0, 100, 800, 600), (0, 0));
    }

    #[test]
    fn test_fit_within_never_exceeds_box() {
        for (w, h) in [(1920, 1080), (997, 1003), (10000, 1), (1, 10000)] {
            let (fw, fh) = fit_within(w, h, 640, 480);
            assert!(fw <= 640 && fh <= 480, "{}x{} -> {}x{}", w, h, fw, fh);
        }
    }
}
