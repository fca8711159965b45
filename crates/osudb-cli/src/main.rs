use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use osudb_core::json::JsonOpts;
use osudb_core::{DbKind, ScoreDecodeOptions, TrailingFieldRule};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "osudb",
    about = "Inspect osu! stable databases (osu!.db, collection.db, scores.db)",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Read the trailing score double when bit 23 of the mods is set, instead
    /// of the literal `mods << 23 == 1` test
    #[arg(long, global = true)]
    mod_bit: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Dump a database file, or every database in a client folder, as JSON
    Dump(DumpArgs),
    /// Decode all databases of a client folder and print a short summary
    Summary(SummaryArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Library,
    Collections,
    Scores,
}

impl From<KindArg> for DbKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Library => DbKind::Library,
            KindArg::Collections => DbKind::Collections,
            KindArg::Scores => DbKind::Scores,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct DumpArgs {
    /// Database file or client folder
    path: PathBuf,
    /// Database kind; guessed from the file name when omitted
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
    /// Max array elements to include per array
    #[arg(long, default_value_t = 128)]
    max_array: usize,
    /// Single-line output
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(ClapArgs, Debug)]
struct SummaryArgs {
    /// Client folder holding osu!.db, collection.db and scores.db
    dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let scores = ScoreDecodeOptions {
        trailing_field: if cli.mod_bit {
            TrailingFieldRule::ModBit
        } else {
            TrailingFieldRule::LiteralShift
        },
    };
    match cli.cmd {
        Cmd::Dump(a) => cmd_dump(a, scores),
        Cmd::Summary(a) => cmd_summary(a, scores),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn cmd_dump(args: DumpArgs, scores: ScoreDecodeOptions) {
    let opts = JsonOpts {
        max_array_elems: args.max_array,
        pretty: !args.compact,
        scores,
    };
    let p = args.path.as_path();
    let start = Instant::now();
    let res = if p.is_file() {
        osudb_core::json::dump_file_json(p, args.kind.map(DbKind::from), &opts)
    } else if p.is_dir() {
        osudb_core::json::dump_dir_json(p, &opts)
    } else {
        eprintln!("not found: {}", p.display());
        std::process::exit(3);
    };
    match res {
        Ok(s) => {
            info!(path = %p.display(), elapsed = ?start.elapsed(), "dumped");
            print!("{}", s);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

fn require(path: Option<&Path>, kind: DbKind, dir: &Path) -> PathBuf {
    match path {
        Some(p) => p.to_path_buf(),
        None => {
            eprintln!("{} not found in {}", kind.file_name(), dir.display());
            std::process::exit(3);
        }
    }
}

fn fail(e: osudb_core::Error) -> ! {
    eprintln!("error: {}", e);
    std::process::exit(2);
}

fn cmd_summary(args: SummaryArgs, scores: ScoreDecodeOptions) {
    let dir = args.dir.as_path();
    if !osudb_core::install::is_install_root(dir) {
        eprintln!("not an osu! folder: {}", dir.display());
        std::process::exit(3);
    }
    let files = osudb_core::install::locate(dir);
    let library_path = require(files.get(DbKind::Library), DbKind::Library, dir);
    let collections_path = require(files.get(DbKind::Collections), DbKind::Collections, dir);
    let scores_path = require(files.get(DbKind::Scores), DbKind::Scores, dir);

    let start = Instant::now();
    let db = osudb_core::decode_library_file(&library_path).unwrap_or_else(|e| fail(e));
    info!(elapsed = ?start.elapsed(), beatmaps = db.beatmaps.len(), "decoded osu!.db");

    let start = Instant::now();
    let collections =
        osudb_core::decode_collections_file(&collections_path).unwrap_or_else(|e| fail(e));
    info!(elapsed = ?start.elapsed(), collections = collections.len(), "decoded collection.db");

    let start = Instant::now();
    let score_db =
        osudb_core::decode_scores_file_with(&scores_path, scores).unwrap_or_else(|e| fail(e));
    info!(elapsed = ?start.elapsed(), groups = score_db.beatmaps.len(), "decoded scores.db");

    println!("Client version:    {}", db.version);
    println!("Player name:       {}", db.player_name);
    println!("Beatmaps:          {}", db.beatmap_count);
    println!("Entry layout:      {:?}", db.layout());
    println!("User permissions:  {}", db.user_permissions);
    println!("Collections:       {}", collections.len());
    println!("Scored beatmaps:   {}", score_db.beatmaps.len());
    println!("Scores:            {}", score_db.total_scores());
}
