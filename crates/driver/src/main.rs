use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use backend::X86Generator;
use lex::tokenize;
use parse::{parse_blocks, BasicBlock, BlockType};

#[derive(Parser, Debug)]
#[command(
    name = "nanocc",
    about = "nanocc — a tiny C-subset compiler with DWARF output",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lex a source file and dump the token stream to stdout and tokens.csv
    Tokens {
        /// Input source file
        input: PathBuf,
    },
    /// Parse a source file and print the block tree
    Parse {
        /// Input source file
        input: PathBuf,
    },
    /// Print the function-call tree
    Fntree {
        /// Input source file
        input: PathBuf,
    },
    /// Print the variable tree, one name per first use
    Vartree {
        /// Input source file
        input: PathBuf,
    },
    /// List function definitions as CSV: header, start line, end line
    Funcs {
        /// Input source file
        input: PathBuf,
    },
    /// Print the index-th function definition; exits 2 when out of range
    Funccopy {
        /// Input source file
        input: PathBuf,
        /// Zero-based function index
        index: usize,
    },
    /// Compile to AT&T assembly
    Emit {
        /// Input source file
        input: PathBuf,
        /// Output path (stdout when omitted)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        /// Append DWARF debug sections
        #[arg(short = 'g')]
        debug: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Tokens { input } => cmd_tokens(&input),
        Commands::Parse { input } => cmd_parse(&input),
        Commands::Fntree { input } => cmd_fntree(&input),
        Commands::Vartree { input } => cmd_vartree(&input),
        Commands::Funcs { input } => cmd_funcs(&input),
        Commands::Funccopy { input, index } => {
            let code = cmd_funccopy(&input, index)?;
            std::process::exit(code);
        }
        Commands::Emit {
            input,
            output,
            debug,
        } => cmd_emit(&input, output.as_deref(), debug),
    }
}

fn read_source(input: &PathBuf) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn parse_source(input: &PathBuf) -> Result<BasicBlock> {
    let src = read_source(input)?;
    let toks = tokenize(&src, true)?;
    parse_blocks(&toks)
}

fn cmd_tokens(input: &PathBuf) -> Result<()> {
    let src = read_source(input)?;
    let toks = tokenize(&src, false)?;

    let mut csv = String::new();
    for t in &toks {
        let _ = writeln!(
            csv,
            "{},{},{}",
            support::quote(&t.buf),
            t.line,
            t.label.name()
        );
    }
    print!("{}", csv);
    fs::write("tokens.csv", &csv).context("failed to write tokens.csv")?;
    Ok(())
}

fn cmd_parse(input: &PathBuf) -> Result<()> {
    let root = parse_source(input)?;
    print!("{}", root.dump());
    Ok(())
}

fn print_fn_calls(block: &BasicBlock, depth: usize, out: &mut String) {
    for name in block.instr.func_calls() {
        for _ in 0..depth.saturating_sub(1) {
            out.push('\t');
        }
        out.push_str(&name);
        out.push('\n');
    }
    for child in &block.children {
        print_fn_calls(child, depth + 1, out);
    }
}

fn cmd_fntree(input: &PathBuf) -> Result<()> {
    let root = parse_source(input)?;
    let mut out = String::new();
    print_fn_calls(&root, 0, &mut out);
    print!("{}", out);
    Ok(())
}

/// Scoped set of already-printed names, so each variable shows up at its
/// first use only.
struct VarTable {
    tables: Vec<HashSet<String>>,
}

impl VarTable {
    fn new() -> Self {
        Self {
            tables: vec![HashSet::new()],
        }
    }

    fn enter(&mut self) {
        self.tables.push(HashSet::new());
    }

    fn leave(&mut self) {
        self.tables.pop();
    }

    fn query(&self, var: &str) -> bool {
        self.tables.iter().any(|t| t.contains(var))
    }

    fn add(&mut self, var: String) {
        if let Some(top) = self.tables.last_mut() {
            top.insert(var);
        }
    }
}

fn print_vars(block: &BasicBlock, table: &mut VarTable, depth: usize, out: &mut String) {
    for var in block.instr.var_names() {
        if !table.query(&var) {
            for _ in 0..depth.saturating_sub(1) {
                out.push(' ');
            }
            out.push_str(&var);
            out.push('\n');
            table.add(var);
        }
    }
    table.enter();
    for child in &block.children {
        print_vars(child, table, depth + 1, out);
    }
    table.leave();
}

fn cmd_vartree(input: &PathBuf) -> Result<()> {
    let root = parse_source(input)?;
    let mut table = VarTable::new();
    let mut out = String::new();
    print_vars(&root, &mut table, 0, &mut out);
    println!("{}", out);
    Ok(())
}

fn top_level_functions(root: &BasicBlock) -> Vec<&BasicBlock> {
    root.children
        .iter()
        .filter(|c| c.kind == BlockType::Function)
        .collect()
}

fn cmd_funcs(input: &PathBuf) -> Result<()> {
    let root = parse_source(input)?;
    for func in top_level_functions(&root) {
        let (start, end) = func.line_range();
        let mut header = String::new();
        func.instr.render(&mut header);
        println!("{}, {}, {}", header.trim_end(), start, end);
    }
    Ok(())
}

fn cmd_funccopy(input: &PathBuf, index: usize) -> Result<i32> {
    let root = parse_source(input)?;
    let funcs = top_level_functions(&root);

    if index >= funcs.len() {
        println!("0 0\n(null)");
        return Ok(2);
    }

    let func = funcs[index];
    let (start, end) = func.line_range();
    println!("{} {}", start, end);
    println!("{}", func.dump());
    Ok(0)
}

fn cmd_emit(input: &PathBuf, output: Option<&std::path::Path>, debug: bool) -> Result<()> {
    let root = parse_source(input)?;
    let source_name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let mut generator = X86Generator::with_source(source_name);
    let asm = if debug {
        generator.generate_with_debug_info(&root)?
    } else {
        generator.generate(&root)?
    };

    match output {
        Some(path) => {
            fs::write(path, asm).with_context(|| format!("failed to write {}", path.display()))?
        }
        None => print!("{}", asm),
    }
    Ok(())
}
