/// Divider, timer counter/modulo/control, per spec.md §4.2's timer protocol.
///
/// The divider is modeled as a free-running 16-bit T-cycle counter whose
/// high byte is the visible `DIV` register (this is the standard DMG
/// behaviour: one DIV tick every 256 T-cycles).
#[derive(Debug, Clone, Default)]
pub struct Timer {
    div_counter: u16,
    tima: u8,
    tma: u8,
    tac: u8,
    period_counter: u32,
    overflow_pending: bool,
}

const TAC_PERIODS: [u32; 4] = [1024, 16, 64, 256];

impl Timer {
    pub fn new() -> Timer {
        Timer::default()
    }

    pub fn div(&self) -> u8 {
        (self.div_counter >> 8) as u8
    }

    pub fn reset_div(&mut self) {
        self.div_counter = 0;
    }

    pub fn tima(&self) -> u8 {
        self.tima
    }

    pub fn set_tima(&mut self, v: u8) {
        self.tima = v;
    }

    pub fn tma(&self) -> u8 {
        self.tma
    }

    pub fn set_tma(&mut self, v: u8) {
        self.tma = v;
    }

    pub fn tac(&self) -> u8 {
        self.tac | 0xF8
    }

    pub fn set_tac(&mut self, v: u8) {
        self.tac = v & 0x07;
    }

    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Advance by `m_cycles` M-cycles. Returns true if the Timer interrupt
    /// should be requested this call.
    pub fn tick(&mut self, m_cycles: u32) -> bool {
        let t_cycles = m_cycles * 4;
        self.div_counter = self.div_counter.wrapping_add(t_cycles as u16);

        let mut interrupt = false;
        if self.overflow_pending {
            self.tima = self.tma;
            self.overflow_pending = false;
            interrupt = true;
        }

        if self.enabled() {
            let period = TAC_PERIODS[(self.tac & 0x03) as usize];
            self.period_counter += t_cycles;
            while self.period_counter >= period {
                self.period_counter -= period;
                let (next, overflowed) = self.tima.overflowing_add(1);
                self.tima = next;
                if overflowed {
                    self.overflow_pending = true;
                }
            }
        }
        interrupt
    }
}
