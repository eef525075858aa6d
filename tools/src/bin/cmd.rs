// Command line utility for clustering an affinity matrix

use affinity_cluster::mtx::load_mtx;
use affinity_cluster::{leiden_cluster, LeidenClusterConfig};
use anyhow::{Context, Error};
use clap::{value_parser, Arg, ArgAction, Command};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn main() -> Result<(), Error> {
    let matches = Command::new("affinity-cluster-cmd")
        .arg(
            Arg::new("INPUT")
                .help("mtx file holding a square affinity matrix")
                .required(true)
                .index(1)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("OUTPUT")
                .help("Output file, one cluster id per line. Gzipped when ending in .gz")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("N_SEEDS")
                .help("Number of seeds to try")
                .short('s')
                .long("n_seeds")
                .default_value("2")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("N_ITERATIONS")
                .help("Leiden iterations per seed, negative to run until convergence")
                .short('i')
                .long("n_iterations")
                .default_value("-1")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("VERBOSE")
                .help("Log the quality reached by every seed")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("VERBOSE");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if verbose { "info" } else { "warn" }))
        .init();

    let mtx_filename: &PathBuf = matches.get_one("INPUT").unwrap();
    let output: Option<&PathBuf> = matches.get_one("OUTPUT");
    let config = LeidenClusterConfig::default()
        .with_n_seeds(*matches.get_one("N_SEEDS").unwrap())
        .with_n_leiden_iterations(*matches.get_one("N_ITERATIONS").unwrap())
        .with_verbose(verbose);

    let matrix = load_mtx(mtx_filename)?;
    info!(
        "loaded {} vertices and {} stored entries from {}",
        matrix.n_vertices(),
        matrix.nnz(),
        mtx_filename.display()
    );

    let membership = leiden_cluster(&matrix, &config)?;
    info!(
        "found {} clusters",
        membership.iter().max().map_or(0, |label| label + 1)
    );

    match output {
        Some(path) => write_membership(&membership, path),
        None => labels_to_writer(&membership, std::io::stdout().lock()),
    }
}

fn write_membership(membership: &[usize], path: &Path) -> Result<(), Error> {
    let file = File::create(path).with_context(|| path.display().to_string())?;

    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut encoder = GzEncoder::new(file, Compression::default());
        labels_to_writer(membership, &mut encoder)?;
        encoder.finish()?;
        Ok(())
    } else {
        labels_to_writer(membership, file)
    }
}

fn labels_to_writer(membership: &[usize], writer: impl Write) -> Result<(), Error> {
    let mut writer = BufWriter::new(writer);
    for label in membership {
        writeln!(writer, "{label}")?;
    }
    writer.flush()?;
    Ok(())
}
