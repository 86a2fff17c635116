//! # A 6809 instruction table decoder written in Rust.
//!
//! Reads a hand written instruction set table (one row per opcode) and turns each row into a
//! validated record: opcode, mnemonic, cycles, size, addressing modes and the effect the
//! instruction has on each condition code flag.
//!
//! ## Getting Started
//! ```
//! cargo run -- tables/ins.txt
//! ```
//! ...or if you've already built the binary then just...
//! ```
//! 6809tab --masks tables/ins2.txt
//! ```
//! ## Options
//! Help for command line options is available using -h or --help.
#[macro_use]
mod macros;
mod config;
mod error;
mod fields;
mod instruction;
mod row;
mod table;
use std::fmt;
use std::path::Path;
use std::result::Result;
pub(crate) use crate::error::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init();
    // process_file does all the work
    if let Err(e) = process_file(config::ARGS.file.as_str()) {
        println!("{}", e);
        return Err(Box::new(e));
    }
    Ok(())
}
/// process_file decodes the table and prints the records that pass the opcode filter
fn process_file(filename: &str) -> Result<(), Error> {
    info!("Decoding {}", filename);
    let table = table::read_table(Path::new(filename), config::ARGS.format, &config::row_policy())?;
    let selected: Vec<&instruction::InstructionRecord> = match config::ARGS.opcode {
        Some(op) => table.with_opcode(op).collect(),
        None => table.records.iter().collect(),
    };
    for r in &selected {
        if config::ARGS.list {
            println!("{}", r.to_row()?);
        } else {
            println!("{}", r);
        }
        if config::ARGS.masks {
            println!("     {}", r.masks);
        }
    }
    info!(
        "{} records from {} lines ({} not rows, {} rejected)",
        table.records.len(),
        table.lines,
        table.unmatched,
        table.rejected.len()
    );
    if !table.rejected.is_empty() {
        warn!("{} rows were skipped; see warnings above", table.rejected.len());
    }
    Ok(())
}
