use std::collections::{HashMap, HashSet};

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerDragEvent,
    PointerMoveEvent,
};

/// Edge-triggered per-key switch.
///
/// Flips on every press transition and ignores releases.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Toggle {
    #[default]
    Off,
    On,
}

impl Toggle {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Toggle::Off => Toggle::On,
            Toggle::On => Toggle::Off,
        }
    }

    #[inline]
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

/// Current input state for a single window.
///
/// Holds level state (keys/buttons currently down, pointer position) and
/// edge state (per-key toggles). Per-frame transitions are recorded into an
/// `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,

    held: HashSet<Key>,
    toggles: HashMap<Key, Toggle>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        let mut derived = None;

        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release events are lost while unfocused; drop level state
                    // so nothing stays stuck. Toggles survive.
                    self.held.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                if self.buttons_down.contains(&MouseButton::Left) {
                    if let Some((px, py)) = self.pointer_pos {
                        derived = Some(InputEvent::PointerDrag(PointerDragEvent {
                            x: *x,
                            y: *y,
                            dx: *x - px,
                            dy: *y - py,
                        }));
                    }
                }
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerDrag(_) => {}

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                repeat,
                ..
            } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        let newly_held = self.held.insert(*key);
                        // A repeat can re-insert a key dropped on focus loss;
                        // it is still not a new press.
                        if newly_held && !*repeat {
                            frame.keys_pressed.insert(*key);
                        }
                        if !*repeat {
                            let toggle = self.toggles.entry(*key).or_default();
                            *toggle = toggle.flipped();
                        }
                    }
                    KeyState::Released => {
                        // Releasing a key that is not held is a no-op.
                        if self.held.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                // Position only comes from real moves; a press before the
                // first move carries a placeholder.
                if self.pointer_pos.is_some() {
                    self.pointer_pos = Some((*x, *y));
                }
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
        }

        frame.push_event(ev);
        if let Some(drag) = derived {
            frame.push_event(drag);
        }
    }

    /// Returns true while `key` is down.
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Returns true when `key` has been pressed an odd number of times.
    pub fn is_toggled(&self, key: Key) -> bool {
        self.toggle(key).is_on()
    }

    pub fn toggle(&self, key: Key) -> Toggle {
        self.toggles.get(&key).copied().unwrap_or_default()
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat }
    }

    fn press(s: &mut InputState, f: &mut InputFrame, k: Key) {
        s.apply_event(f, key(k, KeyState::Pressed, false));
    }

    fn release(s: &mut InputState, f: &mut InputFrame, k: Key) {
        s.apply_event(f, key(k, KeyState::Released, false));
    }

    fn button(b: MouseButton, state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: b,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn drags(f: &InputFrame) -> Vec<PointerDragEvent> {
        f.events
            .iter()
            .filter_map(|e| match e {
                InputEvent::PointerDrag(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn press_holds_and_toggles() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        press(&mut s, &mut f, Key::B);
        assert!(s.is_held(Key::B));
        assert!(s.is_toggled(Key::B));
        assert!(f.key_pressed(Key::B));
    }

    #[test]
    fn release_keeps_toggle() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        press(&mut s, &mut f, Key::G);
        release(&mut s, &mut f, Key::G);
        assert!(!s.is_held(Key::G));
        assert!(s.is_toggled(Key::G));
        assert!(f.keys_released.contains(&Key::G));
    }

    #[test]
    fn toggle_follows_press_parity() {
        for n in 0..7 {
            let (mut s, mut f) = (InputState::new(), InputFrame::default());
            for _ in 0..n {
                press(&mut s, &mut f, Key::W);
                release(&mut s, &mut f, Key::W);
            }
            assert_eq!(s.is_toggled(Key::W), n % 2 == 1, "after {n} presses");
            assert!(!s.is_held(Key::W));
        }
    }

    #[test]
    fn held_reflects_last_transition_only() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        for _ in 0..4 {
            press(&mut s, &mut f, Key::Space);
            release(&mut s, &mut f, Key::Space);
        }
        press(&mut s, &mut f, Key::Space);
        assert!(s.is_held(Key::Space));
    }

    #[test]
    fn releasing_unheld_key_is_noop() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        press(&mut s, &mut f, Key::A);
        release(&mut s, &mut f, Key::Z);
        release(&mut s, &mut f, Key::Z);
        assert!(s.is_held(Key::A));
        assert!(!s.is_held(Key::Z));
        assert!(!s.is_toggled(Key::Z));
        assert!(f.keys_released.is_empty());
    }

    #[test]
    fn key_repeat_never_flips_toggle() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        press(&mut s, &mut f, Key::B);
        for _ in 0..5 {
            s.apply_event(&mut f, key(Key::B, KeyState::Pressed, true));
        }
        assert!(s.is_toggled(Key::B));
        assert_eq!(f.keys_pressed.len(), 1);
    }

    #[test]
    fn focus_loss_clears_held_but_keeps_toggles() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        press(&mut s, &mut f, Key::Digit3);
        s.apply_event(&mut f, button(MouseButton::Left, MouseButtonState::Pressed, 1.0, 1.0));
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(!s.is_held(Key::Digit3));
        assert!(!s.button_down(MouseButton::Left));
        assert!(s.is_toggled(Key::Digit3));
    }

    #[test]
    fn drag_only_while_primary_button_down() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 10.0, y: 10.0 }));
        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 12.0, y: 9.0 }));
        assert!(drags(&f).is_empty());

        s.apply_event(&mut f, button(MouseButton::Left, MouseButtonState::Pressed, 12.0, 9.0));
        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 15.0, y: 13.0 }));
        assert_eq!(
            drags(&f),
            vec![PointerDragEvent { x: 15.0, y: 13.0, dx: 3.0, dy: 4.0 }]
        );

        s.apply_event(&mut f, button(MouseButton::Left, MouseButtonState::Released, 15.0, 13.0));
        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 20.0, y: 20.0 }));
        assert_eq!(drags(&f).len(), 1);
    }

    #[test]
    fn drag_follows_its_move_event() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 0.0, y: 0.0 }));
        s.apply_event(&mut f, button(MouseButton::Left, MouseButtonState::Pressed, 0.0, 0.0));
        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 0.0 }));
        let n = f.events.len();
        assert!(matches!(f.events[n - 2], InputEvent::PointerMoved(_)));
        assert!(matches!(f.events[n - 1], InputEvent::PointerDrag(_)));
    }

    #[test]
    fn separate_instances_do_not_share_state() {
        let (mut a, mut f) = (InputState::new(), InputFrame::default());
        let b = InputState::new();
        press(&mut a, &mut f, Key::G);
        assert!(!b.is_held(Key::G));
        assert!(!b.is_toggled(Key::G));
    }

    #[test]
    fn repeat_after_focus_loss_is_not_a_new_press() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        press(&mut s, &mut f, Key::F11);
        assert!(f.key_pressed(Key::F11));

        f.clear();
        s.apply_event(&mut f, InputEvent::Focused(false));
        s.apply_event(&mut f, InputEvent::Focused(true));
        s.apply_event(&mut f, key(Key::F11, KeyState::Pressed, true));

        assert!(f.keys_pressed.is_empty());
        assert!(s.is_held(Key::F11));
        assert!(s.is_toggled(Key::F11));
    }

    #[test]
    fn press_before_first_move_does_not_invent_a_position() {
        let (mut s, mut f) = (InputState::new(), InputFrame::default());
        s.apply_event(&mut f, button(MouseButton::Left, MouseButtonState::Pressed, 0.0, 0.0));
        assert_eq!(s.pointer_pos, None);

        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 640.0, y: 360.0 }));
        assert!(drags(&f).is_empty());

        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 642.0, y: 361.0 }));
        assert_eq!(
            drags(&f),
            vec![PointerDragEvent { x: 642.0, y: 361.0, dx: 2.0, dy: 1.0 }]
        );
    }
}
