use std::fmt::Write as _;

use crate::consts::{DwForm, DwOp};
use crate::leb128::{sleb128_size, uleb128_size};

/// Accumulator for the three output streams and their running byte sizes.
/// The sizes must match what the assembler will emit for the directives
/// written into the streams.
#[derive(Debug, Default)]
pub struct MetaData {
    pub debug_info: String,
    pub debug_info_size: usize,

    pub debug_str: String,
    pub debug_str_size: usize,
    pub debug_str_count: usize,

    pub debug_abbrev: String,
    pub debug_abbrev_size: usize,
}

impl MetaData {
    pub fn new() -> Self {
        Self::default()
    }

    fn abbrev_uleb(&mut self, value: u64) {
        let _ = writeln!(self.debug_abbrev, "\t.uleb128 {}", value);
        self.debug_abbrev_size += uleb128_size(value);
    }
}

/// One DWARF stack-machine operation: a 1-byte opcode followed by zero or
/// more operands. Operands are kept textual so that assembler symbols can
/// be used where a relocatable value is wanted (e.g. `DW_OP_addr .Ltext0`).
#[derive(Debug, Clone)]
pub struct Operation {
    opcode: DwOp,
    operands: Vec<String>,
    m64: bool,
}

impl Operation {
    pub fn new(opcode: DwOp) -> Self {
        Self {
            opcode,
            operands: Vec::new(),
            m64: true,
        }
    }

    pub fn with_operand(opcode: DwOp, operand: impl Into<String>) -> Self {
        Self {
            opcode,
            operands: vec![operand.into()],
            m64: true,
        }
    }

    pub fn with_operands(
        opcode: DwOp,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self {
            opcode,
            operands: vec![first.into(), second.into()],
            m64: true,
        }
    }

    /// Select 32-bit address size instead of the 64-bit default.
    pub fn set_m64(mut self, m64: bool) -> Self {
        self.m64 = m64;
        self
    }

    fn operand(&self, idx: usize) -> &str {
        self.operands.get(idx).map(String::as_str).unwrap_or("")
    }

    fn operand_u(&self, idx: usize) -> u64 {
        self.operand(idx).parse().unwrap_or(0)
    }

    fn operand_i(&self, idx: usize) -> i64 {
        self.operand(idx).parse().unwrap_or(0)
    }

    /// Encoded size in bytes: the opcode byte plus its operands.
    pub fn size(&self) -> usize {
        use DwOp::*;
        let code = self.opcode as u8;
        match self.opcode {
            Addr => 1 + if self.m64 { 8 } else { 4 },
            Const1u | Const1s | Pick | DerefSize | XderefSize => 2,
            Const2u | Const2s | Call2 | Skip | Bra => 3,
            Const4u | Const4s | Call4 => 5,
            Const8u | Const8s => 9,
            // 32-bit DWARF: a section offset is 4 bytes
            CallRef => 5,
            PlusUconst | Constu | Regx | Piece => 1 + uleb128_size(self.operand_u(0)),
            Consts | Fbreg => 1 + sleb128_size(self.operand_i(0)),
            Bregx => 1 + uleb128_size(self.operand_u(0)) + sleb128_size(self.operand_i(1)),
            BitPiece => 1 + uleb128_size(self.operand_u(0)) + uleb128_size(self.operand_u(1)),
            ImplicitValue => {
                let n = self.operand_u(0);
                1 + uleb128_size(n) + n as usize
            }
            _ if (0x70..=0x8f).contains(&code) => 1 + sleb128_size(self.operand_i(0)),
            _ => 1,
        }
    }

    fn generate(&self, meta: &mut MetaData) {
        use DwOp::*;
        let code = self.opcode as u8;
        let _ = writeln!(meta.debug_info, "\t.byte {}", code);
        match self.opcode {
            Addr => {
                let directive = if self.m64 { ".quad" } else { ".long" };
                let _ = writeln!(meta.debug_info, "\t{} {}", directive, self.operand(0));
            }
            Const1u | Const1s | Pick | DerefSize | XderefSize => {
                let _ = writeln!(meta.debug_info, "\t.byte {}", self.operand(0));
            }
            Const2u | Const2s | Call2 | Skip | Bra => {
                let _ = writeln!(meta.debug_info, "\t.value {}", self.operand(0));
            }
            Const4u | Const4s | Call4 | CallRef => {
                let _ = writeln!(meta.debug_info, "\t.long {}", self.operand(0));
            }
            Const8u | Const8s => {
                let _ = writeln!(meta.debug_info, "\t.quad {}", self.operand(0));
            }
            PlusUconst | Constu | Regx | Piece => {
                let _ = writeln!(meta.debug_info, "\t.uleb128 {}", self.operand(0));
            }
            Consts | Fbreg => {
                let _ = writeln!(meta.debug_info, "\t.sleb128 {}", self.operand(0));
            }
            Bregx => {
                let _ = writeln!(meta.debug_info, "\t.uleb128 {}", self.operand(0));
                let _ = writeln!(meta.debug_info, "\t.sleb128 {}", self.operand(1));
            }
            BitPiece => {
                let _ = writeln!(meta.debug_info, "\t.uleb128 {}", self.operand(0));
                let _ = writeln!(meta.debug_info, "\t.uleb128 {}", self.operand(1));
            }
            ImplicitValue => {
                let _ = writeln!(meta.debug_info, "\t.uleb128 {}", self.operand(0));
                // the caller supplies the block bytes as a ready directive
                if !self.operand(1).is_empty() {
                    let _ = writeln!(meta.debug_info, "\t{}", self.operand(1));
                }
            }
            _ if (0x70..=0x8f).contains(&code) => {
                let _ = writeln!(meta.debug_info, "\t.sleb128 {}", self.operand(0));
            }
            _ => {}
        }
        meta.debug_info_size += self.size();
    }
}

/// A typed attribute value. Each variant knows its `DW_FORM_*` code and how
/// to emit itself onto the three streams while keeping the byte counters in
/// step with the assembler.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Sibling-chain terminator: emits the null abbrev code into
    /// `.debug_info` when the owning DIE is the last of its siblings.
    Reserved,
    /// Inline string (`DW_FORM_string`).
    Str(String),
    /// String-pool reference (`DW_FORM_strp`); the string itself lands in
    /// `.debug_str` under a fresh `.LASF<n>` label.
    Strp(String),
    Data1(String),
    Data2(String),
    Data4(String),
    Data8(String),
    SecOffset(String),
    Addr { value: String, m64: bool },
    /// Relocated reference to another DIE's label.
    RefAddr(String),
    ExprLoc(Vec<Operation>),
}

impl AttrValue {
    pub fn form(&self) -> DwForm {
        match self {
            AttrValue::Reserved => DwForm::Reserved,
            AttrValue::Str(_) => DwForm::String,
            AttrValue::Strp(_) => DwForm::Strp,
            AttrValue::Data1(_) => DwForm::Data1,
            AttrValue::Data2(_) => DwForm::Data2,
            AttrValue::Data4(_) => DwForm::Data4,
            AttrValue::Data8(_) => DwForm::Data8,
            AttrValue::SecOffset(_) => DwForm::SecOffset,
            AttrValue::Addr { .. } => DwForm::Addr,
            AttrValue::RefAddr(_) => DwForm::RefAddr,
            AttrValue::ExprLoc(_) => DwForm::Exprloc,
        }
    }

    pub fn generate(&self, meta: &mut MetaData) {
        match self {
            AttrValue::Reserved => {
                let _ = writeln!(meta.debug_info, "\t.uleb128 0");
                meta.debug_info_size += uleb128_size(0);
            }

            AttrValue::Str(s) => {
                meta.abbrev_uleb(DwForm::String as u64);
                let _ = writeln!(meta.debug_info, "\t.string \"{}\"", support::escape(s));
                meta.debug_info_size += s.len() + 1;
            }

            AttrValue::Strp(s) => {
                meta.abbrev_uleb(DwForm::Strp as u64);
                let n = meta.debug_str_count;
                let _ = writeln!(meta.debug_str, ".LASF{}:", n);
                let _ = writeln!(meta.debug_str, "\t.string \"{}\"", support::escape(s));
                meta.debug_str_size += s.len() + 1;
                let _ = writeln!(meta.debug_info, "\t.long .LASF{} - .Ldebug_str0", n);
                meta.debug_info_size += 4;
                meta.debug_str_count += 1;
            }

            AttrValue::Data1(d) => {
                meta.abbrev_uleb(DwForm::Data1 as u64);
                let _ = writeln!(meta.debug_info, "\t.byte {}", d);
                meta.debug_info_size += 1;
            }

            AttrValue::Data2(d) => {
                meta.abbrev_uleb(DwForm::Data2 as u64);
                let _ = writeln!(meta.debug_info, "\t.value {}", d);
                meta.debug_info_size += 2;
            }

            AttrValue::Data4(d) => {
                meta.abbrev_uleb(DwForm::Data4 as u64);
                let _ = writeln!(meta.debug_info, "\t.long {}", d);
                meta.debug_info_size += 4;
            }

            AttrValue::Data8(d) => {
                meta.abbrev_uleb(DwForm::Data8 as u64);
                let _ = writeln!(meta.debug_info, "\t.quad {}", d);
                meta.debug_info_size += 8;
            }

            AttrValue::SecOffset(offset) => {
                meta.abbrev_uleb(DwForm::SecOffset as u64);
                let _ = writeln!(meta.debug_info, "\t.long {}", offset);
                meta.debug_info_size += 4;
            }

            AttrValue::Addr { value, m64 } => {
                meta.abbrev_uleb(DwForm::Addr as u64);
                if *m64 {
                    let _ = writeln!(meta.debug_info, "\t.quad {}", value);
                    meta.debug_info_size += 8;
                } else {
                    let _ = writeln!(meta.debug_info, "\t.long {}", value);
                    meta.debug_info_size += 4;
                }
            }

            AttrValue::RefAddr(target) => {
                meta.abbrev_uleb(DwForm::RefAddr as u64);
                let _ = writeln!(meta.debug_info, "\t.long {} - .Ldebug_info0", target);
                meta.debug_info_size += 4;
            }

            AttrValue::ExprLoc(operations) => {
                meta.abbrev_uleb(DwForm::Exprloc as u64);
                let length: usize = operations.iter().map(Operation::size).sum();
                let _ = writeln!(meta.debug_info, "\t.uleb128 {}", length);
                meta.debug_info_size += uleb128_size(length as u64);
                for op in operations {
                    op.generate(meta);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_sizes_follow_the_per_opcode_formulas() {
        assert_eq!(Operation::with_operand(DwOp::Addr, ".Ltext0").size(), 9);
        assert_eq!(
            Operation::with_operand(DwOp::Addr, ".Ltext0")
                .set_m64(false)
                .size(),
            5
        );
        assert_eq!(Operation::with_operand(DwOp::Const1u, "7").size(), 2);
        assert_eq!(Operation::with_operand(DwOp::Const2s, "-2").size(), 3);
        assert_eq!(Operation::with_operand(DwOp::Skip, "12").size(), 3);
        assert_eq!(Operation::with_operand(DwOp::Const4u, "70000").size(), 5);
        assert_eq!(Operation::with_operand(DwOp::Const8u, "1").size(), 9);
        assert_eq!(Operation::new(DwOp::Lit5).size(), 1);
        assert_eq!(Operation::new(DwOp::Reg14).size(), 1);
        assert_eq!(Operation::with_operand(DwOp::PlusUconst, "127").size(), 2);
        assert_eq!(Operation::with_operand(DwOp::PlusUconst, "128").size(), 3);
        assert_eq!(Operation::with_operand(DwOp::Fbreg, "-16").size(), 2);
        assert_eq!(Operation::with_operand(DwOp::Breg6, "-65").size(), 3);
        assert_eq!(Operation::with_operands(DwOp::Bregx, "6", "-8").size(), 3);
        assert_eq!(Operation::with_operands(DwOp::BitPiece, "4", "128").size(), 4);
        assert_eq!(Operation::with_operand(DwOp::ImplicitValue, "3").size(), 5);
    }

    #[test]
    fn exprloc_length_prefix_matches_operation_sizes() {
        let ops = vec![
            Operation::with_operand(DwOp::Fbreg, "-16"),
            Operation::new(DwOp::StackValue),
        ];
        let value = AttrValue::ExprLoc(ops);
        let mut meta = MetaData::new();
        value.generate(&mut meta);
        assert!(
            meta.debug_info.contains("\t.uleb128 3\n"),
            "expected a 3-byte expression length, got:\n{}",
            meta.debug_info
        );
        assert!(meta.debug_info.contains("\t.byte 145"));
        assert!(meta.debug_info.contains("\t.sleb128 -16"));
        // length prefix (1) + fbreg (2) + stack_value (1)
        assert_eq!(meta.debug_info_size, 4);
    }

    #[test]
    fn strp_allocates_pool_labels_in_order() {
        let mut meta = MetaData::new();
        AttrValue::Strp("one".into()).generate(&mut meta);
        AttrValue::Strp("two".into()).generate(&mut meta);
        assert!(meta.debug_str.contains(".LASF0:"));
        assert!(meta.debug_str.contains(".LASF1:"));
        assert!(meta.debug_info.contains(".long .LASF0 - .Ldebug_str0"));
        assert!(meta.debug_info.contains(".long .LASF1 - .Ldebug_str0"));
        assert_eq!(meta.debug_info_size, 8);
        assert_eq!(meta.debug_str_size, 8);
    }

    #[test]
    fn inline_string_counts_nul_terminator() {
        let mut meta = MetaData::new();
        AttrValue::Str("abc".into()).generate(&mut meta);
        assert_eq!(meta.debug_info_size, 4);
        assert!(meta.debug_info.contains("\t.string \"abc\""));
        assert!(meta.debug_abbrev.contains("\t.uleb128 8"));
    }
}
