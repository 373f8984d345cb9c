use log::debug;

use super::transform::CanvasPoint;

/// A drag gesture in canvas coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionGesture {
    pub start: CanvasPoint,
    pub end: CanvasPoint,
}

impl SelectionGesture {
    pub fn new(start: CanvasPoint, end: CanvasPoint) -> Self {
        Self { start, end }
    }

    /// The shorter side of the dragged box
    pub fn shorter_side(&self) -> f64 {
        let dx = (self.end.x - self.start.x).abs();
        let dy = (self.end.y - self.start.y).abs();
        dx.min(dy)
    }

    /// Normalized rectangle (x, y, width, height) for drawing
    pub fn rectangle(&self) -> (f64, f64, f64, f64) {
        let x = self.start.x.min(self.end.x);
        let y = self.start.y.min(self.end.y);
        let w = (self.start.x - self.end.x).abs();
        let h = (self.start.y - self.end.y).abs();
        (x, y, w, h)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    Pressed {
        start: CanvasPoint,
    },
    Dragging {
        start: CanvasPoint,
        current: CanvasPoint,
    },
    Finalized(SelectionGesture),
}

/// Press / drag / release tracking for the single live selection
#[derive(Clone, Debug)]
pub struct SelectionMachine {
    state: SelectionState,
    min_side: f64,
}

impl SelectionMachine {
    pub fn new(min_side: f64) -> Self {
        Self {
            state: SelectionState::Idle,
            min_side,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Start a new selection, superseding whatever was there
    pub fn press(&mut self, start: CanvasPoint) {
        self.state = SelectionState::Pressed { start };
    }

    pub fn drag(&mut self, current: CanvasPoint) {
        match self.state {
            SelectionState::Pressed { start } | SelectionState::Dragging { start, .. } => {
                self.state = SelectionState::Dragging { start, current };
            }
            SelectionState::Idle | SelectionState::Finalized(_) => {}
        }
    }

    /// Finish the gesture. Returns the gesture when it is large enough to
    /// produce a crop, otherwise drops it and goes back to idle.
    pub fn release(&mut self, end: CanvasPoint) -> Option<SelectionGesture> {
        let start = match self.state {
            SelectionState::Pressed { start } | SelectionState::Dragging { start, .. } => start,
            SelectionState::Idle | SelectionState::Finalized(_) => return None,
        };

        let gesture = SelectionGesture::new(start, end);
        debug!(
            "Selection from ({}, {}) to ({}, {})",
            start.x, start.y, end.x, end.y
        );

        if gesture.shorter_side() < self.min_side {
            debug!("Selection rejected, shorter side below {}", self.min_side);
            self.state = SelectionState::Idle;
            return None;
        }

        self.state = SelectionState::Finalized(gesture);
        Some(gesture)
    }

    pub fn finalized(&self) -> Option<SelectionGesture> {
        match self.state {
            SelectionState::Finalized(gesture) => Some(gesture),
            _ => None,
        }
    }

    /// The rectangle currently shown on the canvas, if any
    pub fn visual(&self) -> Option<SelectionGesture> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Pressed { start } => Some(SelectionGesture::new(start, start)),
            SelectionState::Dragging { start, current } => {
                Some(SelectionGesture::new(start, current))
            }
            SelectionState::Finalized(gesture) => Some(gesture),
        }
    }

    pub fn reset(&mut self) {
        self.state = SelectionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> CanvasPoint {
        CanvasPoint::new(x, y)
    }

    #[test]
    fn test_full_gesture_finalizes() {
        let mut machine = SelectionMachine::new(20.0);
        machine.press(p(50.0, 50.0));
        assert!(matches!(machine.state(), SelectionState::Pressed { .. }));

        machine.drag(p(100.0, 90.0));
        assert!(matches!(machine.state(), SelectionState::Dragging { .. }));

        let gesture = machine.release(p(150.0, 150.0)).unwrap();
        assert_eq!(gesture.start, p(50.0, 50.0));
        assert_eq!(gesture.end, p(150.0, 150.0));
        assert_eq!(machine.finalized(), Some(gesture));
    }

    #[test]
    fn test_drag_keeps_start_point() {
        let mut machine = SelectionMachine::new(20.0);
        machine.press(p(10.0, 20.0));
        machine.drag(p(40.0, 40.0));
        machine.drag(p(80.0, 90.0));
        let visual = machine.visual().unwrap();
        assert_eq!(visual.start, p(10.0, 20.0));
        assert_eq!(visual.end, p(80.0, 90.0));
    }

    #[test]
    fn test_small_selection_rejected() {
        let mut machine = SelectionMachine::new(20.0);
        machine.press(p(50.0, 50.0));
        machine.drag(p(200.0, 69.0));
        // 150 wide but only 19 tall
        assert!(machine.release(p(200.0, 69.0)).is_none());
        assert_eq!(machine.state(), SelectionState::Idle);
        assert!(machine.visual().is_none());
        assert!(machine.finalized().is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut machine = SelectionMachine::new(20.0);
        machine.press(p(0.0, 0.0));
        machine.drag(p(20.0, 20.0));
        assert!(machine.release(p(20.0, 20.0)).is_some());
    }

    #[test]
    fn test_click_without_drag_is_rejected() {
        let mut machine = SelectionMachine::new(20.0);
        machine.press(p(30.0, 30.0));
        assert!(machine.release(p(30.0, 30.0)).is_none());
        assert_eq!(machine.state(), SelectionState::Idle);
    }

    #[test]
    fn test_new_press_supersedes_finalized() {
        let mut machine = SelectionMachine::new(20.0);
        machine.press(p(0.0, 0.0));
        machine.release(p(100.0, 100.0));
        assert!(machine.finalized().is_some());

        machine.press(p(5.0, 5.0));
        assert!(machine.finalized().is_none());
        assert_eq!(machine.state(), SelectionState::Pressed { start: p(5.0, 5.0) });
    }

    #[test]
    fn test_rejected_release_discards_previous_selection() {
        let mut machine = SelectionMachine::new(20.0);
        machine.press(p(0.0, 0.0));
        machine.release(p(100.0, 100.0));

        machine.press(p(10.0, 10.0));
        machine.release(p(12.0, 12.0));
        assert!(machine.finalized().is_none());
    }

    #[test]
    fn test_drag_and_release_ignored_when_idle() {
        let mut machine = SelectionMachine::new(20.0);
        machine.drag(p(100.0, 100.0));
        assert_eq!(machine.state(), SelectionState::Idle);
        assert!(machine.release(p(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_rectangle_normalized() {
        let g = SelectionGesture::new(p(100.0, 80.0), p(40.0, 20.0));
        assert_eq!(g.rectangle(), (40.0, 20.0, 60.0, 60.0));
        assert_eq!(g.shorter_side(), 60.0);
    }
}
