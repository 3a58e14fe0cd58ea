use std::collections::{HashMap, VecDeque};

use glam::Vec2;

/// Input button identifier (logical key codes the walker cares about)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyP,
    KeyC,
    KeyF,
    Shift,
    Escape,
    MouseLeft,
}

/// Device event as delivered by the host, already mapped to logical buttons
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Button),
    KeyUp(Button),
    /// Relative pointer motion in device units
    MouseMotion { dx: f32, dy: f32 },
    /// Primary click on the view, used to re-acquire pointer capture
    Click,
}

/// Keyboard shortcuts that need the camera, executed at the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Shift+P
    AddWaypointHere,
    /// Shift+C
    ClearWaypoints,
    /// Shift+F
    ToggleFollow,
    /// Escape
    Exit,
}

/// Held-state queries
pub trait ButtonState {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;
}

/// Raw device state recorded between frames
///
/// Event callbacks only write here. The locomotion update reads held keys and
/// consumes the accumulated mouse delta and shortcut queue once per frame.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held: HashMap<Button, bool>,
    mouse_delta: Vec2,
    shortcuts: VecDeque<Shortcut>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. Returns the shortcut it queued, if any.
    pub fn record(&mut self, event: InputEvent) -> Option<Shortcut> {
        match event {
            InputEvent::KeyDown(button) => self.press(button),
            InputEvent::KeyUp(button) => {
                self.release(button);
                None
            }
            InputEvent::MouseMotion { dx, dy } => {
                self.mouse_delta += Vec2::new(dx, dy);
                None
            }
            InputEvent::Click => None,
        }
    }

    fn press(&mut self, button: Button) -> Option<Shortcut> {
        let was_down = self.held.insert(button, true).unwrap_or(false);
        if was_down {
            // Key repeat
            return None;
        }

        let shortcut = match (button, self.is_down(Button::Shift)) {
            (Button::Escape, _) => Some(Shortcut::Exit),
            (Button::KeyP, true) => Some(Shortcut::AddWaypointHere),
            (Button::KeyC, true) => Some(Shortcut::ClearWaypoints),
            (Button::KeyF, true) => Some(Shortcut::ToggleFollow),
            _ => None,
        };
        if let Some(shortcut) = shortcut {
            self.shortcuts.push_back(shortcut);
        }
        shortcut
    }

    fn release(&mut self, button: Button) {
        self.held.insert(button, false);
    }

    /// Mouse delta accumulated since the last call, then reset
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Queued shortcuts in arrival order, emptying the queue
    pub fn drain_shortcuts(&mut self) -> Vec<Shortcut> {
        self.shortcuts.drain(..).collect()
    }

    /// Forget everything; used when the walker is switched off
    pub fn clear(&mut self) {
        self.held.clear();
        self.mouse_delta = Vec2::ZERO;
        self.shortcuts.clear();
    }
}

impl ButtonState for InputTracker {
    fn is_down(&self, button: Button) -> bool {
        self.held.get(&button).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_empty() {
        let mut tracker = InputTracker::new();
        assert!(!tracker.is_down(Button::KeyW));
        assert_eq!(tracker.take_mouse_delta(), Vec2::ZERO);
        assert!(tracker.drain_shortcuts().is_empty());
    }

    #[test]
    fn test_press_and_release() {
        let mut tracker = InputTracker::new();

        tracker.record(InputEvent::KeyDown(Button::KeyW));
        tracker.record(InputEvent::KeyDown(Button::KeyA));
        assert!(tracker.is_down(Button::KeyW));
        assert!(tracker.is_down(Button::KeyA));

        tracker.record(InputEvent::KeyUp(Button::KeyW));
        assert!(!tracker.is_down(Button::KeyW));
        assert!(tracker.is_down(Button::KeyA));
    }

    #[test]
    fn test_key_repeat_not_duplicated() {
        let mut tracker = InputTracker::new();
        tracker.record(InputEvent::KeyDown(Button::Shift));
        assert_eq!(tracker.record(InputEvent::KeyDown(Button::KeyF)), Some(Shortcut::ToggleFollow));
        assert_eq!(tracker.record(InputEvent::KeyDown(Button::KeyF)), None);
        assert_eq!(tracker.drain_shortcuts(), vec![Shortcut::ToggleFollow]);
    }

    #[test]
    fn test_release_without_press() {
        let mut tracker = InputTracker::new();
        tracker.record(InputEvent::KeyUp(Button::KeyS));
        assert!(!tracker.is_down(Button::KeyS));
    }

    #[test]
    fn test_mouse_delta_is_consumed() {
        let mut tracker = InputTracker::new();
        tracker.record(InputEvent::MouseMotion { dx: 3.0, dy: -1.0 });
        tracker.record(InputEvent::MouseMotion { dx: 2.0, dy: 4.0 });

        assert_eq!(tracker.take_mouse_delta(), Vec2::new(5.0, 3.0));
        assert_eq!(tracker.take_mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_shift_shortcuts() {
        let mut tracker = InputTracker::new();

        // P without shift is not a shortcut
        assert_eq!(tracker.record(InputEvent::KeyDown(Button::KeyP)), None);
        tracker.record(InputEvent::KeyUp(Button::KeyP));

        tracker.record(InputEvent::KeyDown(Button::Shift));
        assert_eq!(
            tracker.record(InputEvent::KeyDown(Button::KeyP)),
            Some(Shortcut::AddWaypointHere)
        );
        assert_eq!(
            tracker.record(InputEvent::KeyDown(Button::KeyF)),
            Some(Shortcut::ToggleFollow)
        );
        assert_eq!(
            tracker.record(InputEvent::KeyDown(Button::KeyC)),
            Some(Shortcut::ClearWaypoints)
        );

        assert_eq!(
            tracker.drain_shortcuts(),
            vec![
                Shortcut::AddWaypointHere,
                Shortcut::ToggleFollow,
                Shortcut::ClearWaypoints
            ]
        );
        assert!(tracker.drain_shortcuts().is_empty());
    }

    #[test]
    fn test_escape_queues_exit() {
        let mut tracker = InputTracker::new();
        tracker.record(InputEvent::KeyDown(Button::Escape));
        assert_eq!(tracker.drain_shortcuts(), vec![Shortcut::Exit]);
    }

    #[test]
    fn test_clear_forgets_state() {
        let mut tracker = InputTracker::new();
        tracker.record(InputEvent::KeyDown(Button::KeyW));
        tracker.record(InputEvent::MouseMotion { dx: 1.0, dy: 1.0 });
        tracker.record(InputEvent::KeyDown(Button::Escape));

        tracker.clear();

        assert!(!tracker.is_down(Button::KeyW));
        assert_eq!(tracker.take_mouse_delta(), Vec2::ZERO);
        assert!(tracker.drain_shortcuts().is_empty());
    }
}
