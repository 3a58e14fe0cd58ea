use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::input::{Button, InputEvent};

/// Adapter that bridges Winit events to walker input events
#[derive(Debug, Clone, Copy, Default)]
pub struct WinitInput;

impl WinitInput {
    pub fn new() -> Self {
        Self
    }

    /// Translate a window event (keys, clicks)
    pub fn window_event(&self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let button = Self::keycode_to_button(keycode)?;
                Some(Self::key_event(button, event.state))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                match (Self::mouse_button_to_button(*button)?, state) {
                    (Button::MouseLeft, ElementState::Pressed) => Some(InputEvent::Click),
                    (btn, state) => Some(Self::key_event(btn, *state)),
                }
            }
            _ => None,
        }
    }

    /// Translate raw device motion. Only delivered relative under cursor grab.
    pub fn device_event(&self, event: &DeviceEvent) -> Option<InputEvent> {
        match event {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(InputEvent::MouseMotion {
                dx: *dx as f32,
                dy: *dy as f32,
            }),
            _ => None,
        }
    }

    fn key_event(button: Button, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyDown(button),
            ElementState::Released => InputEvent::KeyUp(button),
        }
    }

    /// Map Winit KeyCode to Button
    pub fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::KeyP => Some(Button::KeyP),
            KeyCode::KeyC => Some(Button::KeyC),
            KeyCode::KeyF => Some(Button::KeyF),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Shift),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            _ => None,
        }
    }
}
