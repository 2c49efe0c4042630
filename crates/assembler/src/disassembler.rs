//! Disassembler: block → canonical assembly text.
//!
//! Output format is flat text, one instruction per line. No indentation,
//! no comments, no blank lines. Operands print through
//! [`Instruction`](opsem_common::Instruction)'s `Display`, which writes
//! literals the way the parser reads them.

use opsem_common::Block;

/// Disassemble a block into canonical assembly text.
///
/// Array constants have no literal form, so a block holding one does not
/// reassemble. Everything else does.
pub fn disassemble(block: &Block) -> String {
    let mut out = String::new();
    for instr in &block.instructions {
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    out
}
