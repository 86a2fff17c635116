use crate::row::FormatChoice;
use crate::table::RowPolicy;
use clap::Parser;
use clap_num::maybe_hex;
use lazy_static::lazy_static;

#[derive(Parser, Debug)]
#[command(author,version,about,long_about=None)]
pub struct Args {
    /// Instruction table (text) to decode
    pub file: String,

    /// Row format of the table; auto tries legacy rows first, then current rows
    #[arg(short, long, value_enum, default_value_t = FormatChoice::Auto)]
    pub format: FormatChoice,

    /// Skip rows that are both inherent and operand-taking instead of aborting the run
    #[arg(short, long)]
    pub keep_going: bool,

    /// Print each decoded record re-serialized as a table row
    #[arg(short, long)]
    pub list: bool,

    /// Print the derived condition code masks for each record
    #[arg(short, long)]
    pub masks: bool,

    /// Only print records with this opcode (hex ok with '0x')
    #[arg(long,value_parser=maybe_hex::<u8>)]
    pub opcode: Option<u8>,

    /// Reject rows with unrecognized condition code effect symbols
    #[arg(long)]
    pub reject_unknown: bool,

    /// Abort on the first bad row of any kind
    #[arg(short, long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

lazy_static! {
    pub static ref ARGS: Args = if cfg!(test) {
        // manually set parameters for running tests
        Args::parse_from(["test", "test"])
    } else {
        Args::parse()
    };
}

pub fn init() { lazy_static::initialize(&ARGS); }
/// Build the row policy from the command line.
pub fn row_policy() -> RowPolicy { RowPolicy::from_flags(ARGS.keep_going, ARGS.strict, ARGS.reject_unknown) }
