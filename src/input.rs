//! Keyboard state sampled once per frame
//!
//! Window events are folded into two sets: keys pressed since the last frame
//! ("triggered") and keys currently down ("held"). The demo reads both between frames.
//! Shift is read from the window's modifier state, not from key events.

use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
};

/// Keys the demo responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    P,
    Num0,
    R,
    Plus,
    Minus,
    S,
    D,
    F,
    A,
    H,
    L,
    Escape,
}

impl Key {
    /// Maps a physical key; keys the demo does not use map to `None`
    pub fn from_key_code(code: KeyCode) -> Option<Key> {
        Some(match code {
            KeyCode::KeyP => Key::P,
            KeyCode::Digit0 | KeyCode::Numpad0 => Key::Num0,
            KeyCode::KeyR => Key::R,
            KeyCode::Equal | KeyCode::NumpadAdd => Key::Plus,
            KeyCode::Minus | KeyCode::NumpadSubtract => Key::Minus,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyD => Key::D,
            KeyCode::KeyF => Key::F,
            KeyCode::KeyA => Key::A,
            KeyCode::KeyH => Key::H,
            KeyCode::KeyL => Key::L,
            KeyCode::Escape => Key::Escape,
            _ => return None,
        })
    }

    /// Label shown in the key-binding listing
    pub fn label(self) -> &'static str {
        match self {
            Key::P => "p",
            Key::Num0 => "0",
            Key::R => "r",
            Key::Plus => "+",
            Key::Minus => "-",
            Key::S => "s",
            Key::D => "d",
            Key::F => "f",
            Key::A => "a",
            Key::H => "h",
            Key::L => "l",
            Key::Escape => "esc",
        }
    }
}

#[derive(Debug, Default)]
pub struct Keyboard {
    triggered: HashSet<Key>,
    held: HashSet<Key>,
    shift: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `is_synthetic` is winit's flag for events generated on focus changes
    pub fn handle_key_event(&mut self, event: &KeyEvent, is_synthetic: bool) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key(code, event.state, event.repeat, is_synthetic);
        }
    }

    /// Records a press or release. OS key repeats never count as a new trigger, and
    /// synthetic presses are dropped while synthetic releases still apply.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        state: ElementState,
        repeat: bool,
        is_synthetic: bool,
    ) {
        let Some(key) = Key::from_key_code(code) else {
            return;
        };
        if is_synthetic && state == ElementState::Pressed {
            return;
        }
        match state {
            ElementState::Pressed => {
                if !repeat && self.held.insert(key) {
                    self.triggered.insert(key);
                }
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    /// Pressed since the last [`end_frame`](Self::end_frame)
    pub fn is_triggered(&self, key: Key) -> bool {
        self.triggered.contains(&key)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Takes the modifier state reported by `WindowEvent::ModifiersChanged`
    pub fn handle_modifiers(&mut self, modifiers: ModifiersState) {
        self.shift = modifiers.shift_key();
    }

    /// Whether the modifier (Shift) is held
    pub fn modifier(&self) -> bool {
        self.shift
    }

    /// Forgets every held key and the modifier. Called when the window loses focus,
    /// since releases made elsewhere never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.shift = false;
    }

    /// Forgets this frame's triggers; held keys stay held
    pub fn end_frame(&mut self) {
        self.triggered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_lasts_one_frame() {
        let mut keyboard = Keyboard::new();
        keyboard.handle_key(KeyCode::KeyF, ElementState::Pressed, false, false);
        assert!(keyboard.is_triggered(Key::F));
        assert!(keyboard.is_held(Key::F));

        keyboard.end_frame();
        assert!(!keyboard.is_triggered(Key::F));
        assert!(keyboard.is_held(Key::F));

        keyboard.handle_key(KeyCode::KeyF, ElementState::Pressed, true, false);
        assert!(!keyboard.is_triggered(Key::F));

        keyboard.handle_key(KeyCode::KeyF, ElementState::Released, false, false);
        assert!(!keyboard.is_held(Key::F));
    }

    #[test]
    fn test_shift_follows_modifier_state() {
        let mut keyboard = Keyboard::new();
        assert!(!keyboard.modifier());
        keyboard.handle_modifiers(ModifiersState::SHIFT);
        assert!(keyboard.modifier());

        // Shift key events alone do not change the modifier
        keyboard.handle_key(KeyCode::ShiftRight, ElementState::Released, false, false);
        assert!(keyboard.modifier());

        keyboard.handle_modifiers(ModifiersState::empty());
        assert!(!keyboard.modifier());
    }

    #[test]
    fn test_focus_loss_releases_stuck_keys() {
        let mut keyboard = Keyboard::new();
        keyboard.handle_modifiers(ModifiersState::SHIFT);
        keyboard.handle_key(KeyCode::KeyR, ElementState::Pressed, false, false);
        keyboard.end_frame();

        // R and Shift are released while another window has focus
        keyboard.release_all();
        assert!(!keyboard.modifier());
        assert!(!keyboard.is_held(Key::R));

        keyboard.handle_key(KeyCode::KeyR, ElementState::Pressed, false, false);
        assert!(keyboard.is_triggered(Key::R));
        assert!(!keyboard.modifier());
    }

    #[test]
    fn test_synthetic_presses_are_ignored() {
        let mut keyboard = Keyboard::new();
        keyboard.handle_key(KeyCode::KeyF, ElementState::Pressed, false, true);
        assert!(!keyboard.is_triggered(Key::F));
        assert!(!keyboard.is_held(Key::F));

        keyboard.handle_key(KeyCode::KeyF, ElementState::Pressed, false, false);
        keyboard.handle_key(KeyCode::KeyF, ElementState::Released, false, true);
        assert!(!keyboard.is_held(Key::F));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_key_code(KeyCode::NumpadAdd), Some(Key::Plus));
        assert_eq!(Key::from_key_code(KeyCode::Equal), Some(Key::Plus));
        assert_eq!(Key::from_key_code(KeyCode::NumpadSubtract), Some(Key::Minus));
        assert_eq!(Key::from_key_code(KeyCode::Digit0), Some(Key::Num0));
        assert_eq!(Key::from_key_code(KeyCode::KeyQ), None);
        assert_eq!(Key::from_key_code(KeyCode::ShiftLeft), None);
    }
}
