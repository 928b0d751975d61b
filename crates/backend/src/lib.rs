//! Single-pass x86-64 code generation over the reshaped block tree.
//!
//! The generator walks blocks, maintaining a stack of lexical scopes whose
//! frames hand out stack slots, and writes AT&T-syntax assembly into a text
//! buffer. Values move through `%rax` with `%r10` as the second scratch
//! register; calls follow the System V AMD64 convention with up to six
//! register arguments.

use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::{anyhow, bail, Result};
use dwarf::{AttrValue, DieNode, DieTree, DwAt, DwLang, DwTag};
use lex::{Token, TokenLabel as L};
use parse::{BasicBlock, BlockType, Instruction};
use support::parse_int;

mod frame;
mod symbol;

pub use frame::StackFrame;
pub use symbol::{BaseType, Symbol, SymbolTable};

const MAX_ARGS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reg {
    Ax = 0,
    Bx,
    Cx,
    Dx,
    Si,
    Di,
    Bp,
    Sp,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

#[rustfmt::skip]
const REGS_8BIT: [&str; 16] = [
    "al", "bl", "cl", "dl", "sil", "dil", "bpl", "spl",
    "r8b", "r9b", "r10b", "r11b", "r12b", "r13b", "r14b", "r15b",
];
#[rustfmt::skip]
const REGS_32BIT: [&str; 16] = [
    "eax", "ebx", "ecx", "edx", "esi", "edi", "ebp", "esp",
    "r8d", "r9d", "r10d", "r11d", "r12d", "r13d", "r14d", "r15d",
];
#[rustfmt::skip]
const REGS_64BIT: [&str; 16] = [
    "rax", "rbx", "rcx", "rdx", "rsi", "rdi", "rbp", "rsp",
    "r8", "r9", "r10", "r11", "r12", "r13", "r14", "r15",
];

impl Reg {
    fn r8(self) -> &'static str {
        REGS_8BIT[self as usize]
    }
    fn r32(self) -> &'static str {
        REGS_32BIT[self as usize]
    }
    fn r64(self) -> &'static str {
        REGS_64BIT[self as usize]
    }
}

// System V AMD64 argument registers, in declaration order
const ARG_REGS: [Reg; MAX_ARGS] = [Reg::Di, Reg::Si, Reg::Dx, Reg::Cx, Reg::R8, Reg::R9];

fn label_of(tokens: &[Token], idx: usize) -> L {
    tokens.get(idx).map(|t| t.label).unwrap_or(L::Null)
}

/// Statements carry their trailing semicolon; headers do not. Dispatch is
/// over the significant tokens only.
fn significant(tokens: &[Token]) -> &[Token] {
    match tokens.last() {
        Some(t) if t.label == L::Semicolon => &tokens[..tokens.len() - 1],
        _ => tokens,
    }
}

fn base_type_of(label: L) -> Option<BaseType> {
    match label {
        L::Bool => Some(BaseType::Bool),
        L::Char => Some(BaseType::Char),
        L::Int => Some(BaseType::Int),
        L::Void => Some(BaseType::Void),
        _ => None,
    }
}

pub struct X86Generator {
    symtab: SymbolTable,
    branch_count: usize,
    // interned string literals (quotes included) -> .LC index
    c_strs: HashMap<String, usize>,
    c_str_count: usize,
    source_name: String,
}

impl Default for X86Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl X86Generator {
    pub fn new() -> Self {
        Self {
            symtab: SymbolTable::new(),
            branch_count: 0,
            c_strs: HashMap::new(),
            c_str_count: 0,
            source_name: "<input>".to_string(),
        }
    }

    /// Name recorded in the debug-info compile unit.
    pub fn with_source(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::new()
        }
    }

    pub fn generate(&mut self, root: &BasicBlock) -> Result<String> {
        if root.kind != BlockType::Common {
            bail!("code generation must start from a common root block");
        }
        let mut out = String::new();
        self.gen_block(&mut out, root)?;
        self.dump_c_strings(&mut out);
        if self.symtab.depth() != 0 {
            bail!("unbalanced scopes after code generation; this is a bug");
        }
        Ok(out)
    }

    /// Like [`generate`], but brackets the code with `.Ltext0`/`.Letext0`
    /// and appends a DWARF compile unit describing the translation unit and
    /// its functions.
    pub fn generate_with_debug_info(&mut self, root: &BasicBlock) -> Result<String> {
        if root.kind != BlockType::Common {
            bail!("code generation must start from a common root block");
        }
        let mut body = String::new();
        self.gen_block(&mut body, root)?;
        if self.symtab.depth() != 0 {
            bail!("unbalanced scopes after code generation; this is a bug");
        }

        let mut out = String::new();
        out.push_str("\t.text\n.Ltext0:\n");
        out.push_str(&body);
        out.push_str("\n\t.text\n.Letext0:\n");
        self.dump_c_strings(&mut out);
        out.push_str(&self.build_debug_info(root));
        Ok(out)
    }

    fn build_debug_info(&self, root: &BasicBlock) -> String {
        let mut tree = DieTree::new(true);

        let mut cu = tree.new_die(DwTag::CompileUnit);
        cu.add_attr(DwAt::Name, AttrValue::Strp(self.source_name.clone()));
        cu.add_attr(
            DwAt::Producer,
            AttrValue::Strp(format!("nanocc {}", env!("CARGO_PKG_VERSION"))),
        );
        cu.add_attr(
            DwAt::Language,
            AttrValue::Data1((DwLang::C89 as u8).to_string()),
        );
        cu.add_attr(
            DwAt::LowPc,
            AttrValue::Addr {
                value: ".Ltext0".into(),
                m64: true,
            },
        );
        cu.add_attr(
            DwAt::HighPc,
            AttrValue::Addr {
                value: ".Letext0".into(),
                m64: true,
            },
        );

        let mut root_node = DieNode::new(cu);
        for child in &root.children {
            if child.kind != BlockType::Function {
                continue;
            }
            let name_tok = match child.instr.tokens.get(1) {
                Some(t) => t,
                None => continue,
            };
            let mut sub = tree.new_die(DwTag::Subprogram);
            sub.add_attr(DwAt::Name, AttrValue::Strp(name_tok.buf.clone()));
            sub.add_attr(DwAt::External, AttrValue::Data1("1".into()));
            sub.add_attr(DwAt::DeclLine, AttrValue::Data4(name_tok.line.to_string()));
            root_node.add_child(DieNode::new(sub));
        }
        tree.set_root(root_node);
        tree.generate()
    }

    fn new_label(&mut self) -> usize {
        let label = self.branch_count;
        self.branch_count += 1;
        label
    }

    // ===== String literals =====

    fn intern_string(&mut self, literal: &str) -> String {
        if let Some(&idx) = self.c_strs.get(literal) {
            return format!(".LC{}", idx);
        }
        let idx = self.c_str_count;
        self.c_str_count += 1;
        self.c_strs.insert(literal.to_string(), idx);
        format!(".LC{}", idx)
    }

    fn dump_c_strings(&self, out: &mut String) {
        let mut pairs: Vec<(&str, usize)> =
            self.c_strs.iter().map(|(s, &i)| (s.as_str(), i)).collect();
        pairs.sort_by_key(|&(_, idx)| idx);
        for (literal, idx) in pairs {
            let _ = writeln!(out, "\t.section .rodata");
            let _ = writeln!(out, ".LC{}:", idx);
            // the literal keeps its source quotes
            let _ = writeln!(out, "\t.string {}", literal);
        }
    }

    // ===== Blocks =====

    fn gen_block(&mut self, out: &mut String, block: &BasicBlock) -> Result<()> {
        match block.kind {
            BlockType::Common => {
                if !block.instr.is_empty() {
                    self.gen_instruction(out, &block.instr)?;
                } else {
                    self.symtab.enter();
                    for child in &block.children {
                        self.gen_block(out, child)?;
                    }
                    // recover the stack pointer for this scope
                    self.symtab.leave(out);
                }
            }

            BlockType::Function => {
                let toks = &block.instr.tokens;
                if toks.len() < 2 || block.children.len() != 1 {
                    bail!(
                        "line {}: malformed function definition",
                        block.line_range().0
                    );
                }
                let name = &toks[1].buf;
                let _ = writeln!(out, "\n\t.text");
                let _ = writeln!(out, "\t.globl {}", name);
                let _ = writeln!(out, "\t.type {}, @function", name);
                let _ = writeln!(out, "{}:", name);
                let _ = writeln!(out, "\tendbr64");

                self.symtab.enter();
                self.store_args(out, &block.instr)?;
                self.gen_block(out, &block.children[0])?;
                self.symtab.leave(out);
                let _ = writeln!(out, "\tret");
            }

            BlockType::While => {
                let toks = &block.instr.tokens;
                if toks.len() != 4 {
                    bail!(
                        "line {}: while condition must be a single value",
                        block.line_range().0
                    );
                }
                if block.children.len() != 1 {
                    bail!("line {}: while block has no body", block.line_range().0);
                }
                let enter_label = self.new_label();
                let leave_label = self.new_label();
                let _ = writeln!(out, ".L{}:", enter_label);
                self.load_value(out, &toks[2], Reg::Ax)?;
                let _ = writeln!(out, "\tcmp $0, %rax");
                let _ = writeln!(out, "\tje .L{}", leave_label);
                self.gen_block(out, &block.children[0])?;
                let _ = writeln!(out, "\tjmp .L{}", enter_label);
                let _ = writeln!(out, ".L{}:", leave_label);
            }

            BlockType::If => {
                let toks = &block.instr.tokens;
                if toks.len() != 4 {
                    bail!(
                        "line {}: if condition must be a single value",
                        block.line_range().0
                    );
                }
                if block.children.len() != 1 {
                    bail!("line {}: if block has no body", block.line_range().0);
                }
                let leave_label = self.new_label();
                self.load_value(out, &toks[2], Reg::Ax)?;
                let _ = writeln!(out, "\tcmp $0, %rax");
                let _ = writeln!(out, "\tje .L{}", leave_label);
                self.gen_block(out, &block.children[0])?;
                let _ = writeln!(out, ".L{}:", leave_label);
            }

            BlockType::IfElse => {
                let toks = &block.instr.tokens;
                if toks.len() != 4 || block.children.len() != 2 {
                    bail!("line {}: malformed if/else", block.line_range().0);
                }
                let else_label = self.new_label();
                let end_label = self.new_label();
                self.load_value(out, &toks[2], Reg::Ax)?;
                let _ = writeln!(out, "\tcmp $0, %rax");
                let _ = writeln!(out, "\tje .L{}", else_label);
                self.gen_block(out, &block.children[0])?;
                let _ = writeln!(out, "\tjmp .L{}", end_label);
                let _ = writeln!(out, ".L{}:", else_label);
                self.gen_block(out, &block.children[1])?;
                let _ = writeln!(out, ".L{}:", end_label);
            }

            BlockType::VarDeclare => {
                self.gen_var_declare(out, &block.instr)?;
            }

            BlockType::Return => {
                self.gen_return(out, &block.instr)?;
            }

            BlockType::Else => {
                // cleared by the if/else merge pass
                bail!("else block survived the if/else merge; this is a bug");
            }

            other => {
                bail!(
                    "line {}: {} blocks are parsed but not generated",
                    block.line_range().0,
                    other.as_str()
                );
            }
        }
        Ok(())
    }

    fn gen_var_declare(&mut self, out: &mut String, instr: &Instruction) -> Result<()> {
        let toks = significant(&instr.tokens);
        let line = toks.first().map(|t| t.line).unwrap_or(0);

        let base = match toks.first().and_then(|t| base_type_of(t.label)) {
            Some(b) => b,
            None => bail!("line {}: invalid type in declaration", line),
        };

        let mut pointer_level = 0u32;
        let mut i = 1;
        while label_of(toks, i) == L::Mul {
            pointer_level += 1;
            i += 1;
        }
        if pointer_level == 0 && base == BaseType::Void {
            bail!("line {}: cannot create scalar of void type", line);
        }

        if label_of(toks, i) != L::Alpha {
            bail!("line {}: expected a variable name", line);
        }
        let name = toks[i].buf.clone();

        let mut sym = Symbol::new(base, pointer_level);
        sym.is_global = self.symtab.depth() <= 1;

        // optional fixed-length array suffix
        if i + 1 < toks.len() {
            if label_of(toks, i + 1) != L::LeftSq
                || label_of(toks, i + 2) != L::Digit
                || label_of(toks, i + 3) != L::RightSq
            {
                bail!("line {}: malformed declaration of {}", line, name);
            }
            let array_size = parse_int(&toks[i + 2].buf)?;
            if array_size <= 0 {
                bail!("line {}: array {} must have a positive size", line, name);
            }
            sym.is_array = true;
            sym.array_size = array_size as usize;
        }

        let mem_size = sym.memory_size();
        if sym.is_global {
            // globals are zero-filled in .bss
            let _ = writeln!(out, "\n\t.bss");
            let _ = writeln!(out, "\t.align 16");
            let _ = writeln!(out, "\t.type {}, @object", name);
            let _ = writeln!(out, "\t.size {}, {}", name, mem_size);
            let _ = writeln!(out, "\t.globl {}", name);
            let _ = writeln!(out, "{}:\n\t.zero {}", name, mem_size);
        } else {
            let frame_id = self.symtab.current_frame_id();
            let frame = self
                .symtab
                .frame_mut()
                .ok_or_else(|| anyhow!("line {}: no open scope for {}", line, name))?;
            let old_size = frame.alloc_size;
            sym.addr = frame.alloc(mem_size);
            let grown = frame.alloc_size - old_size;
            if grown > 0 {
                let _ = writeln!(out, "\taddq $-{}, %rsp", grown);
            }
            sym.frame = frame_id;
        }

        self.symtab.add_symbol(&name, sym)
    }

    fn gen_return(&mut self, out: &mut String, instr: &Instruction) -> Result<()> {
        let toks = significant(&instr.tokens);
        let line = toks.first().map(|t| t.line).unwrap_or(0);
        if toks.len() > 2 {
            bail!(
                "line {}: return value must be a single literal or variable",
                line
            );
        }
        if toks.len() == 2 {
            match toks[1].label {
                L::Digit => {
                    let _ = writeln!(out, "\tmovq ${}, %rax", parse_int(&toks[1].buf)?);
                }
                L::Alpha => {
                    self.load_var(out, &toks[1].buf, toks[1].line, Reg::Ax)?;
                }
                _ => bail!("line {}: unsupported return value", line),
            }
        }
        // unwind every enclosing frame at once
        let _ = writeln!(out, "\taddq ${}, %rsp", self.symtab.stack_size());
        let _ = writeln!(out, "\tret");
        Ok(())
    }

    // ===== Instructions =====

    fn gen_instruction(&mut self, out: &mut String, instr: &Instruction) -> Result<()> {
        let toks = significant(&instr.tokens);
        if toks.is_empty() {
            return Ok(());
        }
        let line = toks[0].line;

        // f(args);
        if label_of(toks, 1) == L::LeftParen {
            if toks.len() < 3 {
                bail!("line {}: malformed call", line);
            }
            return self.gen_call(out, toks, 0);
        }

        // x = f(args);
        if label_of(toks, 1) == L::Assign && label_of(toks, 3) == L::LeftParen {
            if toks.len() < 5 {
                bail!("line {}: malformed call", line);
            }
            self.gen_call(out, toks, 2)?;
            return self.store_var(out, &toks[0].buf, toks[0].line, Reg::Ax);
        }

        // *p = v;
        if label_of(toks, 0) == L::Mul {
            return self.gen_store_through_pointer(out, toks);
        }

        match toks.len() {
            2 => self.gen_incdec(out, toks),
            3 => {
                // x = y;
                if label_of(toks, 1) != L::Assign {
                    bail!("line {}: expected an assignment", line);
                }
                self.load_value(out, &toks[2], Reg::Ax)?;
                self.store_var(out, &toks[0].buf, toks[0].line, Reg::Ax)
            }
            4 => self.gen_unary_assign(out, toks),
            5 => self.gen_binary_assign(out, toks),
            _ => bail!("line {}: statement is too complex to generate", line),
        }
    }

    fn gen_call(&mut self, out: &mut String, toks: &[Token], callee_idx: usize) -> Result<()> {
        let line = toks[callee_idx].line;
        let mut nargs = 0;
        let mut i = callee_idx + 2;
        while label_of(toks, i) != L::RightParen {
            if i >= toks.len() {
                bail!("line {}: unterminated call", line);
            }
            let arg = &toks[i];
            if !matches!(arg.label, L::Alpha | L::Digit | L::DoubleQuote) {
                bail!(
                    "line {}: call argument must be a variable or literal, got {}",
                    line,
                    support::quote(&arg.buf)
                );
            }
            let sep = label_of(toks, i + 1);
            if sep != L::Comma && sep != L::RightParen {
                bail!("line {}: malformed argument list", line);
            }
            if nargs >= MAX_ARGS {
                bail!("line {}: more than {} call arguments", line, MAX_ARGS);
            }
            self.load_value(out, arg, ARG_REGS[nargs])?;
            nargs += 1;
            i += 2;
        }
        let _ = writeln!(out, "\tcall {}", toks[callee_idx].buf);
        Ok(())
    }

    fn gen_store_through_pointer(&mut self, out: &mut String, toks: &[Token]) -> Result<()> {
        let line = toks[0].line;
        if toks.len() != 4 || label_of(toks, 2) != L::Assign {
            bail!("line {}: malformed store through pointer", line);
        }
        let ptr = &toks[1];
        if ptr.label != L::Alpha {
            bail!("line {}: can only store through a pointer variable", line);
        }

        self.load_value(out, &toks[3], Reg::R10)?;
        self.load_value(out, ptr, Reg::Ax)?;

        let sym = self
            .symtab
            .lookup(&ptr.buf)
            .ok_or_else(|| anyhow!("line {}: unknown variable {}", line, ptr.buf))?;
        let memsz = if sym.pointer_level > 1 {
            8
        } else {
            match sym.base_type {
                BaseType::Bool | BaseType::Char => 1,
                BaseType::Int => 4,
                _ => bail!("line {}: unsupported pointee type", line),
            }
        };
        let (mov, reg) = match memsz {
            1 => ("movb", Reg::R10.r8()),
            4 => ("movl", Reg::R10.r32()),
            _ => ("movq", Reg::R10.r64()),
        };
        let _ = writeln!(out, "\t{} %{}, (%rax)", mov, reg);
        Ok(())
    }

    fn gen_incdec(&mut self, out: &mut String, toks: &[Token]) -> Result<()> {
        let name_tok = &toks[0];
        let line = name_tok.line;
        if name_tok.label != L::Alpha {
            bail!("line {}: expected a variable", line);
        }

        self.load_var(out, &name_tok.buf, line, Reg::Ax)?;
        let sym = self
            .symtab
            .lookup(&name_tok.buf)
            .ok_or_else(|| anyhow!("line {}: unknown variable {}", line, name_tok.buf))?;

        // pointer arithmetic scales by the pointee width
        let step = if sym.pointer_level > 1 {
            8
        } else if sym.pointer_level == 1 {
            match sym.base_type {
                BaseType::Bool | BaseType::Char => 1,
                BaseType::Int => 4,
                _ => bail!("line {}: unsupported pointee for ++/--", line),
            }
        } else {
            1
        };

        match toks[1].label {
            L::Incr => {
                let _ = writeln!(out, "\taddq ${}, %rax", step);
            }
            L::Decr => {
                let _ = writeln!(out, "\taddq $-{}, %rax", step);
            }
            other => bail!("line {}: unknown unary operator {}", line, other.name()),
        }
        self.store_var(out, &name_tok.buf, line, Reg::Ax)
    }

    fn gen_unary_assign(&mut self, out: &mut String, toks: &[Token]) -> Result<()> {
        let line = toks[0].line;
        if label_of(toks, 1) != L::Assign {
            bail!("line {}: expected an assignment", line);
        }
        match toks[2].label {
            L::Add => {
                self.load_value(out, &toks[3], Reg::Ax)?;
            }
            L::Sub => {
                self.load_value(out, &toks[3], Reg::Ax)?;
                let _ = writeln!(out, "\tneg %rax");
            }
            L::Mul => {
                // pointer dereference
                self.load_value(out, &toks[3], Reg::Ax)?;
                let _ = writeln!(out, "\tmov (%rax), %rax");
            }
            L::Adrp => {
                let target = &toks[3];
                if target.label != L::Alpha {
                    bail!("line {}: cannot take the address of {}", line, target.buf);
                }
                let sym = self
                    .symtab
                    .lookup(&target.buf)
                    .ok_or_else(|| anyhow!("line {}: unknown variable {}", line, target.buf))?;
                if sym.is_global {
                    let _ = writeln!(out, "\tleaq {}(%rip), %rax", target.buf);
                } else {
                    let sp = self.symtab.stack_size();
                    let offset = sp - self.symtab.addr_of(&sym);
                    let _ = writeln!(out, "\tmovq %rsp, %rax");
                    let _ = writeln!(out, "\taddq ${}, %rax", offset);
                }
            }
            _ => bail!("line {}: syntax error in assignment", line),
        }
        self.store_var(out, &toks[0].buf, toks[0].line, Reg::Ax)
    }

    fn gen_binary_assign(&mut self, out: &mut String, toks: &[Token]) -> Result<()> {
        let line = toks[0].line;
        if label_of(toks, 1) != L::Assign {
            bail!("line {}: expected an assignment", line);
        }
        self.load_value(out, &toks[2], Reg::Ax)?;
        // r10 is the second scratch register
        self.load_value(out, &toks[4], Reg::R10)?;

        match toks[3].label {
            L::Add => {
                let _ = writeln!(out, "\tadd %r10, %rax");
            }
            L::Mul => {
                let _ = writeln!(out, "\timul %r10, %rax");
            }
            L::Eq => self.emit_compare(out, "je"),
            L::Ne => self.emit_compare(out, "jne"),
            L::Gt => self.emit_compare(out, "jg"),
            L::Ge => self.emit_compare(out, "jge"),
            L::Lt => self.emit_compare(out, "jl"),
            L::Le => self.emit_compare(out, "jle"),
            other => bail!("line {}: operator {} is not generated", line, other.name()),
        }
        self.store_var(out, &toks[0].buf, toks[0].line, Reg::Ax)
    }

    /// Lower a comparison to a 0/1 value in `%rax` through three fresh
    /// branch labels.
    fn emit_compare(&mut self, out: &mut String, jcc: &str) {
        let true_label = self.new_label();
        let false_label = self.new_label();
        let end_label = self.new_label();
        let _ = writeln!(out, "\tcmp %r10, %rax");
        let _ = writeln!(out, "\t{} .L{}", jcc, true_label);
        let _ = writeln!(out, ".L{}:", false_label);
        let _ = writeln!(out, "\tmovq $0, %rax");
        let _ = writeln!(out, "\tjmp .L{}", end_label);
        let _ = writeln!(out, ".L{}:", true_label);
        let _ = writeln!(out, "\tmovq $1, %rax");
        let _ = writeln!(out, ".L{}:", end_label);
    }

    // ===== Loads and stores =====

    /// Load a value (variable, integer literal, or interned string literal)
    /// into a register.
    fn load_value(&mut self, out: &mut String, token: &Token, reg: Reg) -> Result<()> {
        match token.label {
            L::DoubleQuote => {
                let label = self.intern_string(&token.buf);
                let _ = writeln!(out, "\tleaq {}(%rip), %{}", label, reg.r64());
                Ok(())
            }
            L::Digit => {
                let _ = writeln!(out, "\tmovq ${}, %{}", parse_int(&token.buf)?, reg.r64());
                Ok(())
            }
            L::Alpha => self.load_var(out, &token.buf, token.line, reg),
            _ => bail!(
                "line {}: cannot load {} into a register",
                token.line,
                support::quote(&token.buf)
            ),
        }
    }

    fn load_var(&mut self, out: &mut String, name: &str, line: u32, reg: Reg) -> Result<()> {
        let sym = self
            .symtab
            .lookup(name)
            .ok_or_else(|| anyhow!("line {}: unknown variable {}", line, name))?;
        if sym.is_array {
            bail!("line {}: cannot load array {} into a register", line, name);
        }

        let sp = self.symtab.stack_size();
        let offset = sp - self.symtab.addr_of(&sym);

        match sym.memory_size() {
            1 => {
                if sym.is_global {
                    let _ = writeln!(out, "\tmovb {}(%rip), %{}", name, reg.r8());
                } else {
                    let _ = writeln!(out, "\tmovb {}(%rsp), %{}", offset, reg.r8());
                }
                // zero the stale upper bits
                let _ = writeln!(out, "\tand $0xff, %{}", reg.r64());
            }
            4 => {
                if sym.is_global {
                    let _ = writeln!(out, "\tmovl {}(%rip), %{}", name, reg.r32());
                } else {
                    let _ = writeln!(out, "\tmovl {}(%rsp), %{}", offset, reg.r32());
                }
            }
            _ => {
                if sym.is_global {
                    let _ = writeln!(out, "\tmovq {}(%rip), %{}", name, reg.r64());
                } else {
                    let _ = writeln!(out, "\tmovq {}(%rsp), %{}", offset, reg.r64());
                }
            }
        }
        Ok(())
    }

    fn store_var(&mut self, out: &mut String, name: &str, line: u32, reg: Reg) -> Result<()> {
        let sym = self
            .symtab
            .lookup(name)
            .ok_or_else(|| anyhow!("line {}: unknown variable {}", line, name))?;
        if sym.is_array {
            bail!("line {}: cannot store array {} from a register", line, name);
        }

        let sp = self.symtab.stack_size();
        let offset = sp - self.symtab.addr_of(&sym);

        match sym.memory_size() {
            1 => {
                if sym.is_global {
                    let _ = writeln!(out, "\tmovb %{}, {}(%rip)", reg.r8(), name);
                } else {
                    let _ = writeln!(out, "\tmovb %{}, {}(%rsp)", reg.r8(), offset);
                }
            }
            4 => {
                if sym.is_global {
                    let _ = writeln!(out, "\tmovl %{}, {}(%rip)", reg.r32(), name);
                } else {
                    let _ = writeln!(out, "\tmovl %{}, {}(%rsp)", reg.r32(), offset);
                }
            }
            _ => {
                if sym.is_global {
                    let _ = writeln!(out, "\tmovq %{}, {}(%rip)", reg.r64(), name);
                } else {
                    let _ = writeln!(out, "\tmovq %{}, {}(%rsp)", reg.r64(), offset);
                }
            }
        }
        Ok(())
    }

    /// Move each declared parameter from its System V argument register
    /// into a freshly allocated stack slot and register it in the symbol
    /// table.
    fn store_args(&mut self, out: &mut String, header: &Instruction) -> Result<()> {
        let toks = &header.tokens;
        let line = toks.first().map(|t| t.line).unwrap_or(0);

        let mut i = 0;
        while i < toks.len() && toks[i].label != L::LeftParen {
            i += 1;
        }
        i += 1;
        if i >= toks.len() {
            bail!("line {}: malformed function header", line);
        }

        let mut nargs = 0;
        while label_of(toks, i) != L::RightParen {
            if i >= toks.len() {
                bail!("line {}: unterminated parameter list", line);
            }

            let base = match base_type_of(toks[i].label) {
                Some(b) => b,
                None => bail!(
                    "line {}: unsupported parameter type {}",
                    line,
                    toks[i].buf
                ),
            };
            let mut pointer_level = 0u32;
            let mut j = i + 1;
            while label_of(toks, j) == L::Mul {
                pointer_level += 1;
                j += 1;
            }

            // a bare `void` declares no parameters
            if base == BaseType::Void && pointer_level == 0 && label_of(toks, j) == L::RightParen {
                break;
            }
            if pointer_level == 0 && base == BaseType::Void {
                bail!("line {}: cannot create scalar of void type", line);
            }
            if label_of(toks, j) != L::Alpha {
                bail!("line {}: expected a parameter name", line);
            }
            let name = toks[j].buf.clone();

            let mut sym = Symbol::new(base, pointer_level);
            let frame_id = self.symtab.current_frame_id();
            let frame = self
                .symtab
                .frame_mut()
                .ok_or_else(|| anyhow!("line {}: no open scope for {}", line, name))?;
            let old_size = frame.alloc_size;
            sym.addr = frame.alloc(sym.memory_size());
            let grown = frame.alloc_size - old_size;
            if grown > 0 {
                let _ = writeln!(out, "\taddq $-{}, %rsp", grown);
            }
            sym.frame = frame_id;
            self.symtab.add_symbol(&name, sym)?;

            if nargs >= MAX_ARGS {
                bail!("line {}: more than {} parameters", line, MAX_ARGS);
            }
            self.store_var(out, &name, toks[j].line, ARG_REGS[nargs])?;
            nargs += 1;
            j += 1;

            match label_of(toks, j) {
                L::Comma => j += 1,
                L::RightParen => {}
                _ => bail!("line {}: malformed parameter list", line),
            }
            i = j;
        }

        Ok(())
    }
}
