use dotmatrix_common::key::Key;

/// The eight DMG inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// Default keyboard layout: arrows for the d-pad, Z/X for A/B,
    /// A/S for Select/Start.
    pub fn from_key(key: Key) -> Option<Button> {
        match key {
            Key::Right => Some(Button::Right),
            Key::Left => Some(Button::Left),
            Key::Up => Some(Button::Up),
            Key::Down => Some(Button::Down),
            Key::Z => Some(Button::A),
            Key::X => Some(Button::B),
            Key::A => Some(Button::Select),
            Key::S => Some(Button::Start),
            _ => None,
        }
    }

    /// Whether the button sits in the d-pad group (P1.4) and its line bit.
    fn line(self) -> (bool, u8) {
        match self {
            Button::Right => (true, 0),
            Button::Left => (true, 1),
            Button::Up => (true, 2),
            Button::Down => (true, 3),
            Button::A => (false, 0),
            Button::B => (false, 1),
            Button::Select => (false, 2),
            Button::Start => (false, 3),
        }
    }
}

/// P1 ($FF00) matrix. Masks use bit=1 for "pressed"; the register inverts.
pub(crate) struct Joypad {
    select: u8,
    buttons: u8,
    dpad: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            // No group selected.
            select: 0x30,
            buttons: 0,
            dpad: 0,
        }
    }
}

impl Joypad {
    pub(crate) fn read(&self) -> u8 {
        // Bits 7-6 always read as 1 on DMG.
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.dpad;
        }
        if self.select & 0x20 == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    pub(crate) fn write(&mut self, value: u8) {
        // Lower nibble is read-only.
        self.select = value & 0x30;
    }

    /// Update one line, returning true when a fresh press pulls a line of
    /// a selected group low.
    pub(crate) fn set(&mut self, button: Button, pressed: bool) -> bool {
        let (dpad, bit) = button.line();
        let group = if dpad { 0x10 } else { 0x20 };
        let mask = if dpad { &mut self.dpad } else { &mut self.buttons };
        let was_pressed = *mask & (1 << bit) != 0;
        if pressed {
            *mask |= 1 << bit;
        } else {
            *mask &= !(1 << bit);
        }
        pressed && !was_pressed && self.select & group == 0
    }
}
