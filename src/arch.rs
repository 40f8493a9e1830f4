// arch.rs — The architecture-specific half of inline interception.
//
// Only two things here know about machine code:
//   - how to encode an unconditional jump from one address to another,
//   - what a no-op looks like for padding.
// Relocation is deliberately naive: stolen bytes are copied as-is, so the
// configured prologue must not contain PC-relative instructions or branches
// into itself. The stolen size is configuration, never computed here.

use crate::error::{Error, Result};

/// Jump encodings the engine can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpEncoding {
    /// x86 `jmp rel32` (E9 xx xx xx xx), 5 bytes.
    Rel32,
    /// x86-64 `jmp [rip+0]` followed by the absolute target (FF 25 00000000 + u64), 14 bytes.
    AbsIndirect64,
    /// AArch64 `ldr x16, #8; br x16` followed by the absolute target, 16 bytes.
    A64Literal,
}

const X86_NOP: [u8; 1] = [0x90];
const A64_NOP: [u8; 4] = [0x1F, 0x20, 0x03, 0xD5];
const A64_LDR_X16_PC8: [u8; 4] = [0x50, 0x00, 0x00, 0x58];
const A64_BR_X16: [u8; 4] = [0x00, 0x02, 0x1F, 0xD6];

impl JumpEncoding {
    /// The encoding used for the architecture this crate is compiled for.
    #[cfg(target_arch = "x86")]
    pub const fn native() -> Self {
        JumpEncoding::Rel32
    }

    #[cfg(target_arch = "x86_64")]
    pub const fn native() -> Self {
        JumpEncoding::AbsIndirect64
    }

    #[cfg(target_arch = "aarch64")]
    pub const fn native() -> Self {
        JumpEncoding::A64Literal
    }

    /// Size of one encoded jump.
    pub const fn len(self) -> usize {
        match self {
            JumpEncoding::Rel32 => 5,
            JumpEncoding::AbsIndirect64 => 14,
            JumpEncoding::A64Literal => 16,
        }
    }

    /// Filler instruction for the bytes between the jump and the end of the
    /// stolen region.
    pub const fn nop(self) -> &'static [u8] {
        match self {
            JumpEncoding::Rel32 | JumpEncoding::AbsIndirect64 => &X86_NOP,
            JumpEncoding::A64Literal => &A64_NOP,
        }
    }

    /// Encode a jump placed at `from` that lands on `to`.
    pub fn encode(self, from: usize, to: usize) -> Result<Vec<u8>> {
        let mut code = Vec::with_capacity(self.len());
        match self {
            JumpEncoding::Rel32 => {
                let rel = (to as i64).wrapping_sub(from as i64 + 5);
                let rel = if usize::BITS == 32 {
                    // The whole address space is reachable with wrap-around.
                    rel as i32
                } else {
                    i32::try_from(rel).map_err(|_| Error::JumpOutOfRange { from, to })?
                };
                code.push(0xE9);
                code.extend_from_slice(&rel.to_le_bytes());
            }
            JumpEncoding::AbsIndirect64 => {
                code.extend_from_slice(&[0xFF, 0x25, 0x00, 0x00, 0x00, 0x00]);
                code.extend_from_slice(&(to as u64).to_le_bytes());
            }
            JumpEncoding::A64Literal => {
                code.extend_from_slice(&A64_LDR_X16_PC8);
                code.extend_from_slice(&A64_BR_X16);
                code.extend_from_slice(&(to as u64).to_le_bytes());
            }
        }
        Ok(code)
    }

    /// Bytes that replace a stolen region at `target`: a jump to `relay` padded
    /// with no-ops up to exactly `stolen_len`.
    pub fn redirect(self, target: usize, stolen_len: usize, relay: usize) -> Result<Vec<u8>> {
        let needed = self.len();
        let pad = stolen_len
            .checked_sub(needed)
            .filter(|pad| pad % self.nop().len() == 0)
            .ok_or(Error::StolenRegionTooSmall { stolen: stolen_len, needed })?;

        let mut code = self.encode(target, relay)?;
        for _ in 0..pad / self.nop().len() {
            code.extend_from_slice(self.nop());
        }
        Ok(code)
    }

    /// Trampoline body for a block at `block`: the stolen bytes followed by a
    /// jump back to `origin + stolen.len()`.
    pub fn relocate(self, stolen: &[u8], origin: usize, block: usize) -> Result<Vec<u8>> {
        let mut code = Vec::with_capacity(stolen.len() + self.len());
        code.extend_from_slice(stolen);
        let jump_at = block + stolen.len();
        code.extend(self.encode(jump_at, origin + stolen.len())?);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rel32_is_relative_to_next_instruction() {
        let code = JumpEncoding::Rel32.encode(0x1000, 0x1100).unwrap();
        assert_eq!(code, vec![0xE9, 0xFB, 0x00, 0x00, 0x00]);
        let back = JumpEncoding::Rel32.encode(0x1100, 0x1000).unwrap();
        assert_eq!(back, vec![0xE9, 0xFB, 0xFE, 0xFF, 0xFF]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn rel32_rejects_far_targets() {
        let err = JumpEncoding::Rel32.encode(0x1000, 0x7FFF_0000_0000).unwrap_err();
        assert!(matches!(err, Error::JumpOutOfRange { .. }));
    }

    #[test]
    fn abs64_embeds_target() {
        let code = JumpEncoding::AbsIndirect64.encode(0, 0x1122_3344).unwrap();
        assert_eq!(&code[..6], &[0xFF, 0x25, 0, 0, 0, 0]);
        assert_eq!(&code[6..], &0x1122_3344u64.to_le_bytes());
        assert_eq!(code.len(), JumpEncoding::AbsIndirect64.len());
    }

    #[test]
    fn a64_literal_layout() {
        let code = JumpEncoding::A64Literal.encode(0, 0xDEAD_BEEF).unwrap();
        assert_eq!(&code[..8], &[0x50, 0x00, 0x00, 0x58, 0x00, 0x02, 0x1F, 0xD6]);
        assert_eq!(&code[8..], &0xDEAD_BEEFu64.to_le_bytes());
    }

    #[test]
    fn redirect_pads_with_nops() {
        // 20-byte prologue, 14-byte jump: six NOPs.
        let code = JumpEncoding::AbsIndirect64.redirect(0x4000, 20, 0x8000).unwrap();
        assert_eq!(code.len(), 20);
        assert_eq!(&code[14..], &[0x90; 6]);
    }

    #[test]
    fn redirect_rejects_small_or_misaligned_regions() {
        assert!(matches!(
            JumpEncoding::AbsIndirect64.redirect(0, 12, 0x10),
            Err(Error::StolenRegionTooSmall { stolen: 12, needed: 14 })
        ));
        assert!(JumpEncoding::A64Literal.redirect(0, 18, 0x10).is_err());
        assert_eq!(JumpEncoding::A64Literal.redirect(0, 20, 0x10).unwrap().len(), 20);
    }

    #[test]
    fn relocate_jumps_back_past_stolen_bytes() {
        let stolen = [0x55, 0x89, 0xE5, 0x83, 0xEC];
        let code = JumpEncoding::Rel32.relocate(&stolen, 0x1000, 0x2000).unwrap();
        assert_eq!(&code[..5], &stolen);
        // jmp at 0x2005 to 0x1005: rel = 0x1005 - 0x200A = -0x1005
        assert_eq!(&code[5..], &[0xE9, 0xFB, 0xEF, 0xFF, 0xFF]);
    }
}
