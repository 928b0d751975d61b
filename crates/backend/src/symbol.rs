use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::{bail, Result};

use crate::frame::StackFrame;

// 16MB stack ceiling, same limit the emitted code assumes
pub const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;

const SIZEOF_PTR: usize = 8;
const SIZEOF_INT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Void,
    Int,
    Bool,
    Char,
    Function,
}

/// What the symbol table records about one name. `addr` is the offset the
/// owning frame handed out; the real stack offset is recovered through the
/// frame arena at use sites. Globals have no frame and live in `.bss`.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub base_type: BaseType,
    pub pointer_level: u32,
    pub is_array: bool,
    pub is_global: bool,
    pub array_size: usize,
    pub addr: usize,
    pub frame: Option<usize>,
}

impl Symbol {
    pub fn new(base_type: BaseType, pointer_level: u32) -> Self {
        Self {
            base_type,
            pointer_level,
            is_array: false,
            is_global: false,
            array_size: 0,
            addr: 0,
            frame: None,
        }
    }

    /// Bytes of storage this symbol occupies: pointer size when the pointer
    /// level is non-zero, else the base-type width, times the array length
    /// for arrays, rounded up to a 4-byte multiple (single bytes excepted).
    pub fn memory_size(&self) -> usize {
        let scalar = if self.pointer_level > 0 {
            SIZEOF_PTR
        } else {
            match self.base_type {
                BaseType::Bool | BaseType::Char => 1,
                BaseType::Int => SIZEOF_INT,
                BaseType::Void | BaseType::Function => 0,
            }
        };
        debug_assert!(scalar > 0);

        let ret = if self.is_array {
            scalar * self.array_size
        } else {
            scalar
        };
        if ret == 1 {
            return ret;
        }
        (ret + 3) & !3
    }
}

/// Lexically scoped name resolution plus the arena of stack frames. Scope
/// entry derives a frame from the current top; scope exit pops the scope
/// and emits the `%rsp` restore, but leaves the frame in the arena so that
/// symbol copies taken earlier stay consistent.
#[derive(Debug, Default)]
pub struct SymbolTable {
    frames: Vec<StackFrame>,
    scope_frames: Vec<usize>,
    table_stack: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        for table in self.table_stack.iter().rev() {
            if let Some(sym) = table.get(name) {
                return Some(sym.clone());
            }
        }
        None
    }

    pub fn add_symbol(&mut self, name: &str, sym: Symbol) -> Result<()> {
        debug_assert!(sym.addr != 0 || sym.is_global);
        let table = match self.table_stack.last_mut() {
            Some(t) => t,
            None => bail!("no open scope for symbol {}", name),
        };
        if table.contains_key(name) {
            bail!("symbol {} already exists in this scope", name);
        }
        table.insert(name.to_string(), sym);
        Ok(())
    }

    /// Open a scope: push a fresh frame whose base sits right above
    /// everything the enclosing frames have allocated.
    pub fn enter(&mut self) {
        let current_sp = match self.scope_frames.last() {
            Some(&id) => {
                let frame = &self.frames[id];
                frame.initial_sp + frame.alloc_size
            }
            None => 0,
        };
        debug_assert!(current_sp < MAX_STACK_SIZE);
        let id = self.frames.len();
        self.frames.push(StackFrame::new(current_sp));
        self.scope_frames.push(id);
        self.table_stack.push(HashMap::new());
    }

    /// Close the current scope, emitting the stack-pointer restore for
    /// whatever the frame allocated.
    pub fn leave(&mut self, out: &mut String) {
        self.table_stack.pop();
        if let Some(id) = self.scope_frames.pop() {
            let alloc_size = self.frames[id].alloc_size;
            if alloc_size != 0 {
                let _ = writeln!(out, "\taddq ${}, %rsp", alloc_size);
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.table_stack.len()
    }

    /// Total bytes between the current stack pointer and the outermost
    /// frame base.
    pub fn stack_size(&self) -> usize {
        match self.scope_frames.last() {
            Some(&id) => {
                let frame = &self.frames[id];
                frame.initial_sp + frame.alloc_size
            }
            None => 0,
        }
    }

    pub fn current_frame_id(&self) -> Option<usize> {
        self.scope_frames.last().copied()
    }

    pub fn frame_mut(&mut self) -> Option<&mut StackFrame> {
        let id = *self.scope_frames.last()?;
        self.frames.get_mut(id)
    }

    /// Stack-pointer-relative address of a local symbol: the owning frame's
    /// base plus the offset it handed out.
    pub fn addr_of(&self, sym: &Symbol) -> usize {
        if sym.is_global {
            return 0;
        }
        match sym.frame {
            Some(id) => self.frames[id].initial_sp + sym.addr,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_size_rules() {
        let int_scalar = Symbol::new(BaseType::Int, 0);
        assert_eq!(int_scalar.memory_size(), 4);

        let ch = Symbol::new(BaseType::Char, 0);
        assert_eq!(ch.memory_size(), 1);

        let ptr = Symbol::new(BaseType::Void, 1);
        assert_eq!(ptr.memory_size(), 8);

        let mut arr = Symbol::new(BaseType::Char, 0);
        arr.is_array = true;
        arr.array_size = 10;
        // 10 bytes rounds up to 12
        assert_eq!(arr.memory_size(), 12);

        let mut int_arr = Symbol::new(BaseType::Int, 0);
        int_arr.is_array = true;
        int_arr.array_size = 3;
        assert_eq!(int_arr.memory_size(), 12);
    }

    #[test]
    fn scope_exit_emits_the_restore() {
        let mut symtab = SymbolTable::new();
        symtab.enter();
        symtab.frame_mut().unwrap().alloc(4);
        let mut out = String::new();
        symtab.leave(&mut out);
        assert_eq!(out, "\taddq $16, %rsp\n");
        assert_eq!(symtab.depth(), 0);
    }

    #[test]
    fn inner_frames_stack_on_outer_ones() {
        let mut symtab = SymbolTable::new();
        symtab.enter();
        symtab.frame_mut().unwrap().alloc(8);
        assert_eq!(symtab.stack_size(), 16);
        symtab.enter();
        assert_eq!(symtab.stack_size(), 16);
        symtab.frame_mut().unwrap().alloc(8);
        assert_eq!(symtab.stack_size(), 32);
        let mut out = String::new();
        symtab.leave(&mut out);
        symtab.leave(&mut out);
        assert_eq!(symtab.depth(), 0);
        assert_eq!(symtab.stack_size(), 0);
    }

    #[test]
    fn lookup_walks_scopes_inside_out() {
        let mut symtab = SymbolTable::new();
        symtab.enter();
        let mut outer = Symbol::new(BaseType::Int, 0);
        outer.addr = symtab.frame_mut().unwrap().alloc(4);
        outer.frame = symtab.current_frame_id();
        symtab.add_symbol("x", outer).unwrap();

        symtab.enter();
        let mut inner = Symbol::new(BaseType::Char, 0);
        inner.addr = symtab.frame_mut().unwrap().alloc(1);
        inner.frame = symtab.current_frame_id();
        symtab.add_symbol("x", inner).unwrap();

        let found = symtab.lookup("x").unwrap();
        assert_eq!(found.base_type, BaseType::Char);

        let mut out = String::new();
        symtab.leave(&mut out);
        let found = symtab.lookup("x").unwrap();
        assert_eq!(found.base_type, BaseType::Int);
    }

    #[test]
    fn duplicate_symbol_in_one_scope_is_rejected() {
        let mut symtab = SymbolTable::new();
        symtab.enter();
        let mut sym = Symbol::new(BaseType::Int, 0);
        sym.addr = symtab.frame_mut().unwrap().alloc(4);
        sym.frame = symtab.current_frame_id();
        symtab.add_symbol("dup", sym.clone()).unwrap();
        assert!(symtab.add_symbol("dup", sym).is_err());
    }
}
