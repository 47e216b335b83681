use bitflags::bitflags;

bitflags! {
    /// Interrupt request/enable bits as laid out in IF ($FF0F) and IE ($FFFF).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

/// The five interrupt sources, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Interrupt::VBlank => 0,
            Interrupt::LcdStat => 1,
            Interrupt::Timer => 2,
            Interrupt::Serial => 3,
            Interrupt::Joypad => 4,
        }
    }

    #[inline]
    pub fn flag(self) -> InterruptFlags {
        InterruptFlags::from_bits_truncate(1 << self.index())
    }

    /// Service routine address: 0x40, 0x48, 0x50, 0x58, 0x60.
    #[inline]
    pub fn vector(self) -> u16 {
        0x40 + 8 * self.index() as u16
    }
}

/// Pending/enabled interrupt state plus the CPU's master enable (IME).
///
/// IME lives here rather than in the CPU so that every party which can see
/// a pending request can also see whether it will be serviced.
#[derive(Clone, Debug, Default)]
pub struct InterruptController {
    requested: InterruptFlags,
    enabled: InterruptFlags,
    // Bits 5-7 of IE are plain storage on hardware.
    ie_upper: u8,
    master: bool,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, interrupt: Interrupt) {
        self.requested |= interrupt.flag();
    }

    /// Raise every source in `flags` at once.
    pub fn request_flags(&mut self, flags: InterruptFlags) {
        self.requested |= flags;
    }

    pub fn set_enable(&mut self, interrupt: Interrupt, enabled: bool) {
        self.enabled.set(interrupt.flag(), enabled);
    }

    pub fn is_requested(&self, interrupt: Interrupt) -> bool {
        self.requested.contains(interrupt.flag())
    }

    /// Highest-priority source that is both requested and enabled.
    ///
    /// IME is deliberately not consulted here: HALT wake-up and the halt
    /// bug both depend on pending-ness alone.
    pub fn pending(&self) -> Option<Interrupt> {
        let ready = self.requested & self.enabled;
        Interrupt::ALL
            .into_iter()
            .find(|interrupt| ready.contains(interrupt.flag()))
    }

    pub fn pending_vector(&self) -> Option<u16> {
        self.pending().map(Interrupt::vector)
    }

    /// Clear the request bit for `interrupt` once the CPU has taken it.
    pub fn acknowledge(&mut self, interrupt: Interrupt) {
        self.requested.remove(interrupt.flag());
    }

    pub fn enable_master(&mut self) {
        self.master = true;
    }

    pub fn disable_master(&mut self) {
        self.master = false;
    }

    pub fn master_enabled(&self) -> bool {
        self.master
    }

    /// IF reads back with the three unused bits set.
    pub fn read_if(&self) -> u8 {
        self.requested.bits() | 0xE0
    }

    pub fn write_if(&mut self, value: u8) {
        self.requested = InterruptFlags::from_bits_truncate(value);
    }

    pub fn read_ie(&self) -> u8 {
        self.enabled.bits() | self.ie_upper
    }

    pub fn write_ie(&mut self, value: u8) {
        self.enabled = InterruptFlags::from_bits_truncate(value);
        self.ie_upper = value & 0xE0;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_follows_priority_order() {
        let mut ic = InterruptController::new();
        ic.write_ie(0x1F);
        ic.request(Interrupt::Joypad);
        ic.request(Interrupt::Timer);
        assert_eq!(ic.pending(), Some(Interrupt::Timer));
        assert_eq!(ic.pending_vector(), Some(0x50));

        ic.acknowledge(Interrupt::Timer);
        assert_eq!(ic.pending_vector(), Some(0x60));
    }

    #[test]
    fn disabled_sources_are_not_pending() {
        let mut ic = InterruptController::new();
        ic.request(Interrupt::VBlank);
        assert_eq!(ic.pending(), None);
        ic.set_enable(Interrupt::VBlank, true);
        assert_eq!(ic.pending(), Some(Interrupt::VBlank));
    }

    #[test]
    fn pending_ignores_master_enable() {
        let mut ic = InterruptController::new();
        ic.write_ie(0x01);
        ic.write_if(0x01);
        ic.disable_master();
        assert_eq!(ic.pending_vector(), Some(0x40));
    }

    #[test]
    fn register_readback() {
        let mut ic = InterruptController::new();
        ic.write_if(0xFF);
        assert_eq!(ic.read_if(), 0xFF);
        ic.write_if(0x00);
        assert_eq!(ic.read_if(), 0xE0);
        ic.write_ie(0xE5);
        assert_eq!(ic.read_ie(), 0xE5);
    }
}
