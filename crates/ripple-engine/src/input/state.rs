use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, MouseButton, PointerButtonEvent, PointerMoveEvent};

/// Current input state for a single window.
///
/// Events may arrive at any time between frames; consumers read this once per
/// frame, so the pointer position is a last-write-wins snapshot.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an input event to the current state and records deltas in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release events are not delivered to unfocused windows.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
                frame.pointer_changed = true;
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
                frame.pointer_changed = true;
            }

            InputEvent::Key { key, state, repeat } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(*key) && !*repeat {
                        frame.keys_pressed.insert(*key);
                    }
                }
                ButtonState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton(PointerButtonEvent { button, state, position }) => {
                // A release delivered after the pointer left must not revive it.
                if let Some(pos) = position {
                    self.pointer_pos = Some(*pos);
                }

                match state {
                    ButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    ButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    #[test]
    fn pointer_position_is_last_write_wins() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, moved(1.0, 2.0));
        state.apply_event(&mut frame, moved(5.0, 6.0));
        assert_eq!(state.pointer_pos, Some((5.0, 6.0)));
        assert!(frame.pointer_changed);
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, moved(1.0, 2.0));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn key_repeat_is_not_a_new_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let press = |repeat| InputEvent::Key {
            key: Key::Char('r'),
            state: ButtonState::Pressed,
            repeat,
        };
        state.apply_event(&mut frame, press(false));
        frame.clear();
        state.apply_event(&mut frame, press(true));
        assert!(state.key_down(Key::Char('r')));
        assert!(!frame.key_pressed(Key::Char('r')));
    }

    #[test]
    fn focus_loss_releases_held_buttons() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
                position: Some((0.0, 0.0)),
            }),
        );
        assert!(state.button_down(MouseButton::Left));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn button_release_outside_window_keeps_pointer_absent() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let button = |st, position| {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: st,
                position,
            })
        };

        state.apply_event(&mut frame, moved(120.0, 80.0));
        state.apply_event(&mut frame, button(ButtonState::Pressed, state.pointer_pos));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        state.apply_event(&mut frame, button(ButtonState::Released, state.pointer_pos));

        assert_eq!(state.pointer_pos, None);
        assert!(!state.button_down(MouseButton::Left));
        assert!(frame.buttons_released.contains(&MouseButton::Left));
    }

    #[test]
    fn button_press_updates_pointer_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Right,
                state: ButtonState::Pressed,
                position: Some((3.0, 4.0)),
            }),
        );
        assert_eq!(state.pointer_pos, Some((3.0, 4.0)));
    }
}
