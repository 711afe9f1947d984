//! Keyboard and touch input state
//!
//! Held keys and on-screen buttons are folded into one `TickInput`.
//! Escape is one-shot: it is reported once, then cleared.

use crate::sim::TickInput;

/// On-screen touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Gas,
    Brake,
    Left,
    Right,
}

impl TouchButton {
    pub const ALL: [TouchButton; 4] = [
        TouchButton::Gas,
        TouchButton::Brake,
        TouchButton::Left,
        TouchButton::Right,
    ];

    /// DOM id of the button on the web host
    pub fn element_id(&self) -> &'static str {
        match self {
            TouchButton::Gas => "touch-gas",
            TouchButton::Brake => "touch-brake",
            TouchButton::Left => "touch-left",
            TouchButton::Right => "touch-right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Gas,
    Brake,
    Left,
    Right,
    Handbrake,
    Escape,
}

fn control_for(key: &str) -> Option<Control> {
    match key {
        "w" | "W" | "ArrowUp" => Some(Control::Gas),
        "s" | "S" | "ArrowDown" => Some(Control::Brake),
        "a" | "A" | "ArrowLeft" => Some(Control::Left),
        "d" | "D" | "ArrowRight" => Some(Control::Right),
        " " | "Spacebar" => Some(Control::Handbrake),
        "Escape" => Some(Control::Escape),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    gas: bool,
    brake: bool,
    left: bool,
    right: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: Flags,
    handbrake: bool,
    touch: Flags,
    escape: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is one the game handles
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, down: bool) -> bool {
        let Some(control) = control_for(key) else {
            return false;
        };
        match control {
            Control::Gas => self.keys.gas = down,
            Control::Brake => self.keys.brake = down,
            Control::Left => self.keys.left = down,
            Control::Right => self.keys.right = down,
            Control::Handbrake => self.handbrake = down,
            Control::Escape => {
                if down {
                    self.escape = true;
                }
            }
        }
        true
    }

    pub fn set_touch(&mut self, button: TouchButton, pressed: bool) {
        match button {
            TouchButton::Gas => self.touch.gas = pressed,
            TouchButton::Brake => self.touch.brake = pressed,
            TouchButton::Left => self.touch.left = pressed,
            TouchButton::Right => self.touch.right = pressed,
        }
    }

    /// Was escape pressed since the last call
    pub fn take_escape(&mut self) -> bool {
        std::mem::take(&mut self.escape)
    }

    /// Release everything (focus lost, screen change)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            accelerate: self.keys.gas || self.touch.gas,
            brake: self.keys.brake || self.touch.brake,
            left: self.keys.left || self.touch.left,
            right: self.keys.right || self.touch.right,
            handbrake: self.handbrake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_mapping() {
        let mut input = InputState::new();
        assert!(input.key_down("w"));
        assert!(input.key_down("ArrowLeft"));
        assert!(input.key_down(" "));
        assert!(!input.key_down("q"));
        let tick = input.to_tick_input();
        assert!(tick.accelerate && tick.left && tick.handbrake);
        assert!(!tick.brake && !tick.right);

        input.key_up("W");
        assert!(!input.to_tick_input().accelerate);
    }

    #[test]
    fn test_touch_and_keys_combine() {
        let mut input = InputState::new();
        input.set_touch(TouchButton::Right, true);
        input.key_down("d");
        input.key_up("d");
        assert!(input.to_tick_input().right);
        input.set_touch(TouchButton::Right, false);
        assert!(!input.to_tick_input().right);
    }

    #[test]
    fn test_escape_is_one_shot() {
        let mut input = InputState::new();
        input.key_down("Escape");
        assert!(input.take_escape());
        assert!(!input.take_escape());
    }

    #[test]
    fn test_clear() {
        let mut input = InputState::new();
        input.key_down("s");
        input.set_touch(TouchButton::Gas, true);
        input.clear();
        assert_eq!(input.to_tick_input(), TickInput::default());
    }
}
