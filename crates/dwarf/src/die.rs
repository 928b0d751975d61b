use std::fmt::Write as _;

use crate::consts::{DwAt, DwTag, VERSION};
use crate::leb128::uleb128_size;
use crate::value::{AttrValue, MetaData};

/// One debugging information entry: a tag, a has-children flag, and an
/// ordered attribute list. The label id is stable for the lifetime of the
/// owning tree and names the assembler symbol `.Ldebug_entry<N>`.
#[derive(Debug, Clone)]
pub struct Die {
    pub tag: DwTag,
    pub has_children: bool,
    pub attrs: Vec<(DwAt, AttrValue)>,
    label: usize,
}

impl Die {
    fn new(tag: DwTag, label: usize) -> Self {
        Self {
            tag,
            has_children: false,
            attrs: Vec::new(),
            label,
        }
    }

    pub fn index(&self) -> usize {
        self.label
    }

    pub fn label(&self) -> String {
        format!(".Ldebug_entry{}", self.label)
    }

    pub fn add_attr(&mut self, name: DwAt, value: AttrValue) -> &mut Self {
        self.attrs.push((name, value));
        self
    }
}

/// A node of the DIE tree; owns its children.
#[derive(Debug, Clone)]
pub struct DieNode {
    pub die: Die,
    pub children: Vec<DieNode>,
}

impl DieNode {
    pub fn new(die: Die) -> Self {
        Self {
            die,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: DieNode) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Pre-order flattening. Any node with children gets `DW_CHILDREN_yes`;
    /// the last child of every non-empty child list gains the trailing
    /// `reserved` attribute encoding the end-of-siblings null entry.
    fn prepare(&mut self) {
        if self.children.is_empty() {
            return;
        }
        self.die.has_children = true;
        for child in &mut self.children {
            child.prepare();
        }
        if let Some(last) = self.children.last_mut() {
            last.die.attrs.push((DwAt::Reserved, AttrValue::Reserved));
        }
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Die>) {
        out.push(&self.die);
        for child in &self.children {
            child.collect(out);
        }
    }
}

/// A flat, already-ordered list of entries plus the serializer that turns
/// it into `.debug_info` / `.debug_abbrev` / `.debug_str` assembler text.
pub struct DebugInfo {
    m64: bool,
    entries: Vec<Die>,
}

impl DebugInfo {
    pub fn new(m64: bool) -> Self {
        Self {
            m64,
            entries: Vec::new(),
        }
    }

    pub fn pointer_size(&self) -> usize {
        if self.m64 {
            8
        } else {
            4
        }
    }

    pub fn add_entry(&mut self, die: Die) -> &mut Self {
        self.entries.push(die);
        self
    }

    /// Serialize the entries. Abbreviation codes are 1-indexed and monotone;
    /// both streams end with a null ULEB128; the compilation-unit length is
    /// the accumulated info byte count plus the header fields that follow
    /// `unit_length` (2-byte version, 4-byte abbrev offset, 1-byte address
    /// size).
    pub fn generate(&self) -> String {
        let mut meta = MetaData::new();

        let _ = writeln!(
            meta.debug_abbrev,
            "\t.section .debug_abbrev,\"\",@progbits"
        );
        let _ = writeln!(meta.debug_abbrev, ".Ldebug_abbrev0:");

        let mut debug_lines = String::new();
        let _ = writeln!(debug_lines, "\t.section .debug_lines,\"\",@progbits");
        let _ = writeln!(debug_lines, ".Ldebug_lines0:");

        let _ = writeln!(meta.debug_str, "\t.section .debug_str");
        let _ = writeln!(meta.debug_str, ".Ldebug_str0:");

        let mut abbrev_code = 1u64;
        for entry in &self.entries {
            let _ = writeln!(meta.debug_info, "{}:", entry.label());
            let _ = writeln!(meta.debug_info, "\t.uleb128 {}", abbrev_code);
            meta.debug_info_size += uleb128_size(abbrev_code);
            let _ = writeln!(meta.debug_abbrev, "\t.uleb128 {}", abbrev_code);
            meta.debug_abbrev_size += uleb128_size(abbrev_code);

            let tag = entry.tag as u64;
            let _ = writeln!(meta.debug_abbrev, "\t.uleb128 {}", tag);
            meta.debug_abbrev_size += uleb128_size(tag);

            let children = if entry.has_children { 1 } else { 0 };
            let _ = writeln!(meta.debug_abbrev, "\t.byte {}", children);
            meta.debug_abbrev_size += 1;

            for (name, value) in &entry.attrs {
                let _ = writeln!(meta.debug_abbrev, "\t.uleb128 {}", *name as u64);
                meta.debug_abbrev_size += uleb128_size(*name as u64);
                value.generate(&mut meta);
            }

            // abbreviation terminator: an empty attribute pair
            let _ = writeln!(meta.debug_abbrev, "\t.uleb128 0");
            meta.debug_abbrev_size += uleb128_size(0);
            let _ = writeln!(meta.debug_abbrev, "\t.uleb128 0");
            meta.debug_abbrev_size += uleb128_size(0);

            abbrev_code += 1;
        }

        // end of debug info
        let _ = writeln!(meta.debug_info, "\t.uleb128 0");
        meta.debug_info_size += uleb128_size(0);
        // end of debug abbrev
        let _ = writeln!(meta.debug_abbrev, "\t.uleb128 0");
        meta.debug_abbrev_size += uleb128_size(0);

        let unit_length = meta.debug_info_size + 2 + 4 + 1;

        let mut out = String::new();
        let _ = writeln!(out, "\t.section .debug_info,\"\",@progbits");
        let _ = writeln!(out, ".Ldebug_info0:");
        let _ = writeln!(out, "\t.long {}", unit_length);
        let _ = writeln!(out, "\t.value {}", VERSION);
        let _ = writeln!(out, "\t.long .Ldebug_abbrev0");
        let _ = writeln!(out, "\t.byte {}", self.pointer_size());

        out.push_str(&meta.debug_info);
        out.push_str(&meta.debug_abbrev);
        out.push_str(&debug_lines);
        out.push_str(&meta.debug_str);
        out
    }
}

/// Owner of a DIE tree: allocates stable entry labels and drives the
/// flatten-then-serialize pipeline.
pub struct DieTree {
    m64: bool,
    next_label: usize,
    root: Option<DieNode>,
}

impl DieTree {
    pub fn new(m64: bool) -> Self {
        Self {
            m64,
            next_label: 0,
            root: None,
        }
    }

    /// Allocate a DIE with a fresh `.Ldebug_entry<N>` label.
    pub fn new_die(&mut self, tag: DwTag) -> Die {
        let label = self.next_label;
        self.next_label += 1;
        Die::new(tag, label)
    }

    pub fn set_root(&mut self, root: DieNode) {
        self.root = Some(root);
    }

    /// Flatten the tree in pre-order and serialize it.
    pub fn generate(&self) -> String {
        let mut info = DebugInfo::new(self.m64);
        if let Some(root) = &self.root {
            let mut prepared = root.clone();
            prepared.prepare();
            let mut ordered = Vec::new();
            prepared.collect(&mut ordered);
            for die in ordered {
                info.add_entry(die.clone());
            }
        }
        info.generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable_and_unique() {
        let mut tree = DieTree::new(true);
        let a = tree.new_die(DwTag::CompileUnit);
        let b = tree.new_die(DwTag::Subprogram);
        assert_eq!(a.label(), ".Ldebug_entry0");
        assert_eq!(b.label(), ".Ldebug_entry1");
    }

    #[test]
    fn last_sibling_gets_the_reserved_terminator() {
        let mut tree = DieTree::new(true);
        let root = tree.new_die(DwTag::CompileUnit);
        let first = tree.new_die(DwTag::Subprogram);
        let second = tree.new_die(DwTag::Subprogram);

        let mut root_node = DieNode::new(root);
        root_node.add_child(DieNode::new(first));
        root_node.add_child(DieNode::new(second));
        tree.set_root(root_node);

        let out = tree.generate();
        // three entries in pre-order
        assert!(out.contains(".Ldebug_entry0:"));
        assert!(out.contains(".Ldebug_entry1:"));
        assert!(out.contains(".Ldebug_entry2:"));
        // the second subprogram ends the sibling chain with a null entry
        let entry2 = out.split(".Ldebug_entry2:").nth(1).unwrap();
        let head: String = entry2.lines().take(2).collect::<Vec<_>>().join("\n");
        assert!(
            head.contains(".uleb128 3") && entry2.contains(".uleb128 0"),
            "expected the terminator after entry 2, got:\n{}",
            entry2
        );
    }
}
