use dwarf::{AttrValue, DieNode, DieTree, DwAt, DwLang, DwTag};

fn sample_tree() -> DieTree {
    let mut tree = DieTree::new(true);

    let mut cu = tree.new_die(DwTag::CompileUnit);
    cu.add_attr(DwAt::Name, AttrValue::Strp("main.c".into()));
    cu.add_attr(DwAt::Producer, AttrValue::Strp("nanocc 0.1.0".into()));
    cu.add_attr(
        DwAt::Language,
        AttrValue::Data1((DwLang::C89 as u8).to_string()),
    );

    let mut sub = tree.new_die(DwTag::Subprogram);
    sub.add_attr(DwAt::Name, AttrValue::Strp("main".into()));

    let mut root = DieNode::new(cu);
    root.add_child(DieNode::new(sub));
    tree.set_root(root);
    tree
}

#[test]
fn abbrev_stream_for_the_compile_unit() {
    let out = sample_tree().generate();

    // code 1, DW_TAG_compile_unit, children, then (name, strp),
    // (producer, strp), (language, data1), and the 0,0 terminator
    let expected = "\t.uleb128 1\n\
                    \t.uleb128 17\n\
                    \t.byte 1\n\
                    \t.uleb128 3\n\
                    \t.uleb128 14\n\
                    \t.uleb128 37\n\
                    \t.uleb128 14\n\
                    \t.uleb128 19\n\
                    \t.uleb128 11\n\
                    \t.uleb128 0\n\
                    \t.uleb128 0\n";
    assert!(
        out.contains(expected),
        "abbrev stream mismatch, output:\n{}",
        out
    );
}

#[test]
fn info_stream_references_the_string_pool() {
    let out = sample_tree().generate();

    assert!(out.contains(".Ldebug_entry0:"));
    assert!(out.contains("\t.long .LASF0 - .Ldebug_str0"));
    assert!(out.contains("\t.long .LASF1 - .Ldebug_str0"));
    assert!(out.contains("\t.long .LASF2 - .Ldebug_str0"));
    assert!(out.contains("\t.byte 1\n"), "language byte missing:\n{}", out);
    assert!(out.contains(".LASF0:"));
    assert!(out.contains("\t.string \"main.c\""));
    assert!(out.contains("\t.string \"nanocc 0.1.0\""));
}

#[test]
fn unit_length_counts_info_bytes_plus_header_tail() {
    // entry 0: code (1) + two strp (4 + 4) + data1 (1)      = 10 bytes
    // entry 1: code (1) + strp (4) + reserved terminator (1) =  6 bytes
    // stream terminator                                      =  1 byte
    // unit_length = 17 + 2 (version) + 4 (abbrev ptr) + 1 (addr size) = 24
    let out = sample_tree().generate();
    let after = out
        .split(".Ldebug_info0:\n")
        .nth(1)
        .expect("info section present");
    assert!(
        after.starts_with("\t.long 24\n"),
        "unexpected unit_length, output:\n{}",
        out
    );
    assert!(after.contains("\t.value 4\n"));
    assert!(after.contains("\t.long .Ldebug_abbrev0\n"));
    assert!(after.contains("\t.byte 8\n"));
}

#[test]
fn all_four_sections_are_concatenated_in_order() {
    let out = sample_tree().generate();
    let info = out.find(".section .debug_info").unwrap();
    let abbrev = out.find(".section .debug_abbrev").unwrap();
    let lines = out.find(".section .debug_lines").unwrap();
    let strs = out.find(".section .debug_str").unwrap();
    assert!(info < abbrev && abbrev < lines && lines < strs);
}
