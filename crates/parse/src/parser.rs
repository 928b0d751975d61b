use anyhow::{bail, Result};
use lex::{Token, TokenLabel as L};

use crate::block::{BasicBlock, Instruction};

const MAX_RECURSION: usize = 256;

/// Recursive descent keyed solely on brackets and semicolons. Flushes the
/// accumulator instruction into a leaf child on `{`, `}` and `;`.
fn parse_recur(tokens: &[Token], index: &mut usize, depth: usize) -> Result<BasicBlock> {
    if depth > MAX_RECURSION {
        bail!("block nesting deeper than {} levels", MAX_RECURSION);
    }

    let mut top = BasicBlock::empty();
    let mut instr = Instruction::default();

    while *index < tokens.len() {
        let token = &tokens[*index];
        match token.label {
            L::LeftBracket => {
                if !instr.is_empty() {
                    top.children.push(BasicBlock::leaf(std::mem::take(&mut instr)));
                }
                *index += 1;
                let mut child = parse_recur(tokens, index, depth + 1)?;
                child.braced = true;
                top.children.push(child);
            }

            L::RightBracket => {
                if !instr.is_empty() {
                    top.children.push(BasicBlock::leaf(std::mem::take(&mut instr)));
                }
                *index += 1;
                return Ok(top);
            }

            L::Semicolon => {
                instr.tokens.push(token.clone());
                top.children.push(BasicBlock::leaf(std::mem::take(&mut instr)));
                *index += 1;
            }

            L::Null => {
                *index += 1;
            }

            _ => {
                instr.tokens.push(token.clone());
                *index += 1;
            }
        }
    }

    if !instr.is_empty() {
        top.children.push(BasicBlock::leaf(instr));
    }
    Ok(top)
}

/// Parse a token stream into a classified, reshaped, if/else-merged block
/// tree. The root is a `common` block whose children are the top-level
/// declarations.
pub fn parse_blocks(tokens: &[Token]) -> Result<BasicBlock> {
    let mut index = 0;
    let mut root = parse_recur(tokens, &mut index, 0)?;
    root.classify_tree();
    root.reshape_tree();
    root.merge_if_else_tree()?;
    Ok(root)
}
