use anyhow::{bail, Result};
use lex::{Token, TokenLabel as L};

/// A flat, semicolon- or header-terminated run of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instruction {
    pub tokens: Vec<Token>,
}

impl Instruction {
    /// Label of the idx-th token, `Null` when out of bounds.
    pub fn label_at(&self, idx: usize) -> L {
        self.tokens.get(idx).map(|t| t.label).unwrap_or(L::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// (first, last) source line covered; `(u32::MAX, 0)` when empty.
    pub fn line_range(&self) -> (u32, u32) {
        let mut ret = (u32::MAX, 0);
        for t in &self.tokens {
            ret.0 = ret.0.min(t.line);
            ret.1 = ret.1.max(t.line);
        }
        ret
    }

    /// Names of functions called in this instruction: any identifier
    /// directly followed by `(`.
    pub fn func_calls(&self) -> Vec<String> {
        let mut ret = Vec::new();
        for pair in self.tokens.windows(2) {
            if pair[0].label == L::Alpha && pair[1].label == L::LeftParen {
                ret.push(pair[0].buf.clone());
            }
        }
        ret
    }

    /// Names of variables mentioned: identifiers that are not call targets.
    pub fn var_names(&self) -> Vec<String> {
        let mut ret = Vec::new();
        for (i, t) in self.tokens.iter().enumerate() {
            if t.label != L::Alpha {
                continue;
            }
            if self.label_at(i + 1) == L::LeftParen {
                continue;
            }
            ret.push(t.buf.clone());
        }
        ret
    }

    /// Append this instruction's tokens, space separated, to `out`.
    pub fn render(&self, out: &mut String) {
        for t in &self.tokens {
            out.push_str(&t.buf);
            out.push(' ');
        }
    }
}

/// Classification of a block, decided by the leading significant token of
/// its instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Common,
    Function,
    If,
    Else,
    While,
    VarDeclare,
    Return,
    IfElse,
    For,
    Do,
    Switch,
    Case,
    Break,
    Continue,
    Struct,
    Union,
    Enum,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        use BlockType::*;
        match self {
            Common => "common",
            Function => "function",
            If => "if",
            Else => "else",
            While => "while",
            VarDeclare => "var",
            Return => "ret",
            IfElse => "if-else",
            For => "for",
            Do => "do",
            Switch => "switch",
            Case => "case",
            Break => "break",
            Continue => "continue",
            Struct => "struct",
            Union => "union",
            Enum => "enum",
        }
    }
}

/// A node of the block tree. Leaves carry an instruction and no children;
/// compound nodes carry children and an empty instruction. After the
/// reshape pass, control-flow headers carry both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    pub kind: BlockType,
    pub instr: Instruction,
    pub children: Vec<BasicBlock>,
    /// whether this block came from a `{ ... }` group
    pub braced: bool,
}

impl BasicBlock {
    pub fn empty() -> Self {
        Self {
            kind: BlockType::Common,
            instr: Instruction::default(),
            children: Vec::new(),
            braced: false,
        }
    }

    pub fn leaf(instr: Instruction) -> Self {
        Self {
            kind: BlockType::Common,
            instr,
            children: Vec::new(),
            braced: false,
        }
    }

    pub fn line_range(&self) -> (u32, u32) {
        let mut ret = if self.instr.is_empty() {
            (u32::MAX, 0)
        } else {
            self.instr.line_range()
        };
        for child in &self.children {
            let rg = child.line_range();
            ret.0 = ret.0.min(rg.0);
            ret.1 = ret.1.max(rg.1);
        }
        ret
    }

    /// Assign the block type from the first significant token. For a leading
    /// primitive type, a header not ending in `;` is a function, otherwise a
    /// variable declaration.
    pub(crate) fn classify(&mut self) {
        for token in &self.instr.tokens {
            match token.label {
                L::Null => continue,
                L::Case | L::Default => {
                    self.kind = BlockType::Case;
                    return;
                }
                L::Switch => {
                    self.kind = BlockType::Switch;
                    return;
                }
                L::Void | L::Int | L::Char | L::Bool => {
                    let n = self.instr.tokens.len();
                    if n > 3 && self.instr.tokens[n - 1].label != L::Semicolon {
                        self.kind = BlockType::Function;
                    } else {
                        self.kind = BlockType::VarDeclare;
                    }
                    return;
                }
                L::If => {
                    self.kind = BlockType::If;
                    return;
                }
                L::While => {
                    self.kind = BlockType::While;
                    return;
                }
                L::Do => {
                    self.kind = BlockType::Do;
                    return;
                }
                L::For => {
                    self.kind = BlockType::For;
                    return;
                }
                L::Break => {
                    self.kind = BlockType::Break;
                    return;
                }
                L::Continue => {
                    self.kind = BlockType::Continue;
                    return;
                }
                L::Else => {
                    self.kind = BlockType::Else;
                    return;
                }
                L::Return => {
                    self.kind = BlockType::Return;
                    return;
                }
                L::Struct => {
                    self.kind = BlockType::Struct;
                    return;
                }
                L::Union => {
                    self.kind = BlockType::Union;
                    return;
                }
                L::Enum => {
                    self.kind = BlockType::Enum;
                    return;
                }
                _ => {}
            }
        }
    }

    pub(crate) fn classify_tree(&mut self) {
        self.classify();
        for child in &mut self.children {
            child.classify_tree();
        }
    }

    /// Attach the body of each control-flow header to the header node:
    /// `if`/`else`/`while`/`for`/function headers whose instruction does not
    /// end in `;` consume the following sibling; `do` consumes two (body,
    /// then the `while (...);` condition).
    pub(crate) fn reshape(&mut self) {
        let old = std::mem::take(&mut self.children);
        let mut out = Vec::with_capacity(old.len());
        let mut it = old.into_iter();

        while let Some(mut child) = it.next() {
            match child.kind {
                BlockType::Do => {
                    if let Some(body) = it.next() {
                        child.children.push(body);
                    }
                    if let Some(cond) = it.next() {
                        child.children.push(cond);
                    }
                }
                BlockType::Function
                | BlockType::If
                | BlockType::Else
                | BlockType::For
                | BlockType::While => {
                    let n = child.instr.tokens.len();
                    if n > 0 && child.instr.tokens[n - 1].label != L::Semicolon {
                        if let Some(body) = it.next() {
                            child.children.push(body);
                        }
                    }
                }
                _ => {}
            }
            out.push(child);
        }

        self.children = out;
    }

    pub(crate) fn reshape_tree(&mut self) {
        for child in &mut self.children {
            child.reshape_tree();
        }
        self.reshape();
    }

    /// Fuse each `if` child directly followed by an `else` child into a
    /// single `if-else` node whose children are (then-body, else-body). An
    /// `else` surviving this pass is a syntax error.
    pub(crate) fn merge_if_else(&mut self) -> Result<()> {
        let old = std::mem::take(&mut self.children);
        let mut out = Vec::with_capacity(old.len());
        let mut it = old.into_iter().peekable();

        while let Some(mut child) = it.next() {
            if child.kind == BlockType::If
                && it.peek().map(|n| n.kind) == Some(BlockType::Else)
            {
                let mut els = it.next().unwrap_or_else(BasicBlock::empty);
                if child.children.len() != 1 || els.children.len() != 1 {
                    bail!("malformed if/else around line {}", child.line_range().0);
                }
                let then_body = child.children.pop().unwrap_or_else(BasicBlock::empty);
                let else_body = els.children.pop().unwrap_or_else(BasicBlock::empty);
                out.push(BasicBlock {
                    kind: BlockType::IfElse,
                    instr: child.instr,
                    children: vec![then_body, else_body],
                    braced: false,
                });
            } else {
                out.push(child);
            }
        }

        if let Some(stray) = out.iter().find(|c| c.kind == BlockType::Else) {
            bail!(
                "line {}: else block is not attached to an if block",
                stray.line_range().0
            );
        }

        self.children = out;
        Ok(())
    }

    pub(crate) fn merge_if_else_tree(&mut self) -> Result<()> {
        for child in &mut self.children {
            child.merge_if_else_tree()?;
        }
        self.merge_if_else()
    }

    fn render(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        if !self.instr.is_empty() {
            out.push_str(&pad);
            self.instr.render(out);
            out.push('\n');
        }
        if !self.children.is_empty() {
            if self.braced {
                out.push_str(&pad);
                out.push_str("{\n");
            }
            for child in &self.children {
                child.render(out, depth + 1);
            }
            if self.braced {
                out.push_str(&pad);
                out.push_str("}\n");
            }
        } else if self.braced && self.instr.is_empty() {
            out.push_str(&pad);
            out.push_str("{ }\n");
        }
    }

    /// Human-readable dump of the subtree, used by the CLI tools.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, 0);
        out
    }
}
