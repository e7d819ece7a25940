use super::Cpu;
use crate::devices::mmu::Mmu;

impl Cpu {
    /// Dispatch a non-`0xCB`-prefixed opcode. The four blocks below follow
    /// spec.md §4.1's partition of the opcode space exactly.
    pub(super) fn execute(&mut self, mmu: &mut Mmu, opcode: u8) {
        match opcode {
            0x00 => {}
            0x10 => {
                self.fetch_byte(mmu); // STOP's (unused) operand byte
            }

            // block 0: 16-bit immediate loads, inc/dec, indirect acc moves
            0x01 | 0x11 | 0x21 | 0x31 => {
                let idx = (opcode >> 4) & 0x3;
                let v = self.fetch_word(mmu);
                self.set_r16_sp(idx, v);
            }
            0x02 | 0x12 => {
                let addr = if opcode == 0x02 {
                    self.regs.bc()
                } else {
                    self.regs.de()
                };
                let a = self.regs.a;
                self.write_byte(mmu, addr, a);
            }
            0x22 => {
                let addr = self.regs.hl();
                let a = self.regs.a;
                self.write_byte(mmu, addr, a);
                self.regs.set_hl(addr.wrapping_add(1));
            }
            0x32 => {
                let addr = self.regs.hl();
                let a = self.regs.a;
                self.write_byte(mmu, addr, a);
                self.regs.set_hl(addr.wrapping_sub(1));
            }
            0x03 | 0x13 | 0x23 | 0x33 => {
                let idx = (opcode >> 4) & 0x3;
                let v = self.r16_sp(idx).wrapping_add(1);
                self.set_r16_sp(idx, v);
                self.internal(1);
            }
            0x0B | 0x1B | 0x2B | 0x3B => {
                let idx = (opcode >> 4) & 0x3;
                let v = self.r16_sp(idx).wrapping_sub(1);
                self.set_r16_sp(idx, v);
                self.internal(1);
            }
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                let idx = (opcode >> 3) & 7;
                let v = self.get_r8(mmu, idx);
                let r = self.inc8(v);
                self.set_r8(mmu, idx, r);
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                let idx = (opcode >> 3) & 7;
                let v = self.get_r8(mmu, idx);
                let r = self.dec8(v);
                self.set_r8(mmu, idx, r);
            }
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                let idx = (opcode >> 3) & 7;
                let v = self.fetch_byte(mmu);
                self.set_r8(mmu, idx, v);
            }
            0x07 => self.rlca(),
            0x0F => self.rrca(),
            0x17 => self.rla(),
            0x1F => self.rra(),
            0x08 => {
                let addr = self.fetch_word(mmu);
                let sp = self.sp;
                self.write_byte(mmu, addr, sp as u8);
                self.write_byte(mmu, addr.wrapping_add(1), (sp >> 8) as u8);
            }
            0x09 | 0x19 | 0x29 | 0x39 => {
                let idx = (opcode >> 4) & 0x3;
                let v = self.r16_sp(idx);
                self.add_hl(v);
                self.internal(1);
            }
            0x0A | 0x1A => {
                let addr = if opcode == 0x0A {
                    self.regs.bc()
                } else {
                    self.regs.de()
                };
                self.regs.a = self.read_byte(mmu, addr);
            }
            0x2A => {
                let addr = self.regs.hl();
                self.regs.a = self.read_byte(mmu, addr);
                self.regs.set_hl(addr.wrapping_add(1));
            }
            0x3A => {
                let addr = self.regs.hl();
                self.regs.a = self.read_byte(mmu, addr);
                self.regs.set_hl(addr.wrapping_sub(1));
            }
            0x18 => {
                let offset = self.fetch_byte(mmu) as i8;
                self.pc = self.pc.wrapping_add(offset as u16);
                self.internal(1);
            }
            0x20 | 0x28 | 0x30 | 0x38 => {
                let offset = self.fetch_byte(mmu) as i8;
                let cc = (opcode >> 3) & 0x3;
                if self.check_cc(cc) {
                    self.pc = self.pc.wrapping_add(offset as u16);
                    self.internal(1);
                }
            }
            0x27 => self.daa(),
            0x2F => self.cpl(),
            0x37 => self.scf(),
            0x3F => self.ccf(),

            // block 1 (0x76 is HALT, intercepted before this function runs)
            0x40..=0x7F => {
                let dst = (opcode >> 3) & 7;
                let src = opcode & 7;
                let v = self.get_r8(mmu, src);
                self.set_r8(mmu, dst, v);
            }

            // block 2: ALU against r8
            0x80..=0xBF => {
                let op = (opcode >> 3) & 7;
                let src = opcode & 7;
                let v = self.get_r8(mmu, src);
                self.alu(op, v);
            }

            // block 3: control flow, stack, I/O, misc
            0xC0 | 0xC8 | 0xD0 | 0xD8 => {
                self.internal(1);
                let cc = (opcode >> 3) & 0x3;
                if self.check_cc(cc) {
                    self.ret(mmu);
                    self.internal(1);
                }
            }
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let idx = (opcode >> 4) & 0x3;
                let v = self.pop(mmu);
                self.set_r16_af(idx, v);
            }
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let addr = self.fetch_word(mmu);
                let cc = (opcode >> 3) & 0x3;
                if self.check_cc(cc) {
                    self.pc = addr;
                    self.internal(1);
                }
            }
            0xC3 => {
                let addr = self.fetch_word(mmu);
                self.pc = addr;
                self.internal(1);
            }
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let addr = self.fetch_word(mmu);
                let cc = (opcode >> 3) & 0x3;
                if self.check_cc(cc) {
                    self.internal(1);
                    let pc = self.pc;
                    self.push(mmu, pc);
                    self.pc = addr;
                }
            }
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                self.internal(1);
                let idx = (opcode >> 4) & 0x3;
                let v = self.r16_af(idx);
                self.push(mmu, v);
            }
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let op = (opcode >> 3) & 7;
                let v = self.fetch_byte(mmu);
                self.alu(op, v);
            }
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                let vector = (opcode & 0x38) as u16;
                self.internal(1);
                let pc = self.pc;
                self.push(mmu, pc);
                self.pc = vector;
            }
            0xC9 => {
                self.ret(mmu);
                self.internal(1);
            }
            0xD9 => {
                self.ret(mmu);
                self.ime = true;
                self.internal(1);
            }
            0xCD => {
                let addr = self.fetch_word(mmu);
                self.internal(1);
                let pc = self.pc;
                self.push(mmu, pc);
                self.pc = addr;
            }
            0xE0 => {
                let offset = self.fetch_byte(mmu);
                let addr = 0xFF00 + u16::from(offset);
                let a = self.regs.a;
                self.write_byte(mmu, addr, a);
            }
            0xF0 => {
                let offset = self.fetch_byte(mmu);
                let addr = 0xFF00 + u16::from(offset);
                self.regs.a = self.read_byte(mmu, addr);
            }
            0xE2 => {
                let addr = 0xFF00 + u16::from(self.regs.c);
                let a = self.regs.a;
                self.write_byte(mmu, addr, a);
            }
            0xF2 => {
                let addr = 0xFF00 + u16::from(self.regs.c);
                self.regs.a = self.read_byte(mmu, addr);
            }
            0xE8 => {
                let v = self.add_sp_r8(mmu);
                self.sp = v;
                self.internal(2);
            }
            0xF8 => {
                let v = self.add_sp_r8(mmu);
                self.regs.set_hl(v);
                self.internal(1);
            }
            0xE9 => self.pc = self.regs.hl(),
            0xF9 => {
                self.sp = self.regs.hl();
                self.internal(1);
            }
            0xEA => {
                let addr = self.fetch_word(mmu);
                let a = self.regs.a;
                self.write_byte(mmu, addr, a);
            }
            0xFA => {
                let addr = self.fetch_word(mmu);
                self.regs.a = self.read_byte(mmu, addr);
            }
            0xF3 => {
                self.ime = false;
                self.ime_delay = 0;
            }
            0xFB => self.ime_delay = 2,

            // unofficial/unassigned: the table is total, but none of these
            // encode an instruction on real hardware.
            0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED | 0xF4 | 0xFC | 0xFD => {
                log::warn!(
                    "illegal opcode 0x{:02X} at 0x{:04X}",
                    opcode,
                    self.pc.wrapping_sub(1)
                );
            }
            _ => unreachable!("unhandled opcode 0x{:02X}", opcode),
        }
    }

    /// Dispatch the second byte of a `0xCB`-prefixed instruction: rotate/
    /// shift/swap, BIT, RES, SET, each over the same 8-way r8 space.
    pub(super) fn execute_cb(&mut self, mmu: &mut Mmu) {
        let opcode = self.fetch_byte(mmu);
        let reg = opcode & 7;
        let op = opcode >> 3;
        let v = self.get_r8(mmu, reg);

        match op {
            0 => {
                let r = self.rlc(v);
                self.set_r8(mmu, reg, r);
            }
            1 => {
                let r = self.rrc(v);
                self.set_r8(mmu, reg, r);
            }
            2 => {
                let r = self.rl(v);
                self.set_r8(mmu, reg, r);
            }
            3 => {
                let r = self.rr(v);
                self.set_r8(mmu, reg, r);
            }
            4 => {
                let r = self.sla(v);
                self.set_r8(mmu, reg, r);
            }
            5 => {
                let r = self.sra(v);
                self.set_r8(mmu, reg, r);
            }
            6 => {
                let r = self.swap(v);
                self.set_r8(mmu, reg, r);
            }
            7 => {
                let r = self.srl(v);
                self.set_r8(mmu, reg, r);
            }
            8..=15 => self.bit_test(v, op - 8),
            16..=23 => {
                let bit = op - 16;
                self.set_r8(mmu, reg, v & !(1 << bit));
            }
            24..=31 => {
                let bit = op - 24;
                self.set_r8(mmu, reg, v | (1 << bit));
            }
            _ => unreachable!(),
        }
    }
}
