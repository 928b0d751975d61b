//! Emission of DWARF v4 debugging information as assembler directives.
//!
//! The crate builds a tree of debugging information entries (DIEs) with
//! typed attribute values, flattens it into sibling-terminated linear
//! order, and writes the parallel `.debug_info` / `.debug_abbrev` /
//! `.debug_str` streams. Byte counters track the ULEB128/SLEB128 encodings
//! exactly, so the computed compilation-unit length matches what the
//! assembler produces.

pub mod consts;
mod die;
pub mod leb128;
mod value;

pub use consts::{DwAt, DwAte, DwForm, DwLang, DwOp, DwTag, VERSION};
pub use die::{DebugInfo, Die, DieNode, DieTree};
pub use leb128::{sleb128_size, uleb128_size};
pub use value::{AttrValue, MetaData, Operation};
