use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser};
use crnt::{ParseState, ReactionNetwork, SvdRank, DEFAULT_RANK_TOLERANCE};
use itertools::Itertools;
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

// See also `clap_cargo::style::CLAP_STYLING`
pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

#[derive(Debug, Parser)]
#[command(
    name = "crnt",
    about = "Structural analysis of chemical reaction networks.",
    long_about = "A program computing the structural invariants of chemical reaction networks:
linkage classes, strong linkage classes, terminal classes, deficiency and weak reversibility.
The program takes in as input several data files, in the format:

R1: A + B -> C
C <-> 2D
D -> 0

The system above has four species, A, B, C and D, and four complexes.
The reversible reaction adds both C -> 2D and its inverse 2D -> C.",
    styles = CLAP_STYLING,
)]
struct Cli {
    /// The path to the files specifying the chemical reaction network.
    #[arg(num_args = 1.., required = true)]
    data: Vec<PathBuf>,

    /// Singular values below this tolerance are treated as zero when computing the rank.
    #[arg(long, default_value_t = DEFAULT_RANK_TOLERANCE)]
    tolerance: f64,

    /// Whether to print the complexes of every linkage class and strong linkage class.
    #[arg(long)]
    classes: bool,

    /// Whether to search for absolute concentration robustness candidates.
    #[arg(long)]
    acr: bool,

    /// Increases the logging verbosity. Can be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn print_classes(title: &str, network: &ReactionNetwork, strong: bool) -> crnt::Result<()> {
    let classes = if strong {
        network.strong_linkage_classes()?
    } else {
        network.linkage_classes()?
    };
    println!("{title}:");
    for (idx, class) in classes.iter().enumerate() {
        let terminal = if strong && network.is_terminal(class) {
            " (terminal)"
        } else {
            ""
        };
        println!("\t{idx}{terminal}: {{{}}}", class.iter().format(", "));
    }
    Ok(())
}

fn run_cli(args: Cli) -> crnt::Result<()> {
    let mut parse_state = ParseState::default();
    for path in &args.data {
        parse_state.parse_data_file(path)?;
    }
    info!("Parsed {} reactions", parse_state.len());
    let network = parse_state.get_network()?;
    let oracle = SvdRank::new(args.tolerance);

    // Printing the summary to stdout, to be redirected as desired.
    println!("complexes\t{}", network.num_complexes());
    println!("reactions\t{}", network.num_reactions());
    println!("species\t{}", network.num_species());
    println!("compartments\t{}", network.compartments().join(","));
    println!("linkage_classes\t{}", network.linkage_classes()?.len());
    println!(
        "strong_linkage_classes\t{}",
        network.strong_linkage_classes()?.len()
    );
    println!(
        "terminal_strong_linkage_classes\t{}",
        network.terminal_strong_linkage_classes()?.len()
    );
    println!("deficiency\t{}", network.deficiency(&oracle)?);
    println!("weakly_reversible\t{}", network.is_weakly_reversible()?);
    if args.acr {
        let candidates = network.acr_candidates(&oracle)?;
        println!("acr_candidates\t{}", candidates.iter().join(","));
    }
    if args.classes {
        print_classes("linkage classes", &network, false)?;
        print_classes("strong linkage classes", &network, true)?;
    }
    Ok(())
}

pub fn main() -> ExitCode {
    let args = Cli::parse();
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if TermLogger::init(
        level_filter(args.verbose),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("Failed to initialize the logger");
    }

    match run_cli(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
