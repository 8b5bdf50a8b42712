//! Cache tag store trace simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Trace run:** Replay an address trace through a tag store and print statistics.
//! 2. **Script run:** Execute a Python script with the `tagsim` module injected, for sweeps
//!    and custom drivers.

use clap::{Parser, Subcommand, ValueEnum};
use pyo3::prelude::*;
use pyo3::types::PyList;
use serde::Serialize;
use std::ffi::CString;
use std::{fs, process};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tagsim_core::TagStoreConfig;
use tagsim_core::config::ReplacementPolicy;
use tagsim_core::sim::{TraceDriver, load_trace};

#[derive(Parser, Debug)]
#[command(
    name = "tagsim",
    author,
    version,
    about = "Set-associative cache tag store simulator",
    long_about = "Replay an address trace through a tag store, or run a Python script.\n\nTrace lines are `<op> <addr>` with op in R, W, B (write-back), I (invalidate).\n\nExamples:\n  tagsim run traces/stream.trace --policy trrip\n  tagsim run traces/mix.trace --config l2.json --sections summary,replacement\n  tagsim scripts/sweep.py"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace file.
    Run {
        /// Trace file.
        trace: String,

        /// JSON tag store configuration (defaults apply to missing keys).
        #[arg(short, long)]
        config: Option<String>,

        /// Replacement policy, overriding the config file.
        #[arg(short, long, value_enum)]
        policy: Option<PolicyArg>,

        /// Restrict victim selection to ways below this index.
        #[arg(long)]
        alloc_assoc: Option<usize>,

        /// Statistics sections to print (summary, replacement, occupancy).
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,

        /// Print statistics as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Run a Python script. Script gets argv as sys.argv.
    Script {
        /// Script path.
        path: String,

        /// Arguments for the script (sys.argv[1:]).
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Trash,
    Trrip,
    Wbar,
}

impl From<PolicyArg> for ReplacementPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Trash => Self::Trash,
            PolicyArg::Trrip => Self::Trrip,
            PolicyArg::Wbar => Self::Wbar,
        }
    }
}

/// JSON report printed by `run --json`.
#[derive(Serialize)]
struct RunReport {
    policy: String,
    records: usize,
    cycles: u64,
    writebacks: u64,
    deferred: u64,
    stats: serde_json::Value,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Run {
            trace,
            config,
            policy,
            alloc_assoc,
            sections,
            json,
        }) => cmd_run(&trace, config.as_deref(), policy, alloc_assoc, &sections, json),
        Some(Commands::Script { path, args }) => run_python_script(&path, args),
        None => {
            let args: Vec<String> = std::env::args().skip(1).collect();
            if let Some((script, rest)) = args.split_first()
                && script.ends_with(".py")
            {
                run_python_script(script, rest.to_vec());
                return;
            }
            eprintln!("Tag store simulator: pass a subcommand or a .py script");
            eprintln!();
            eprintln!("  tagsim run <trace>             Replay a trace");
            eprintln!("  tagsim <script.py> [args...]   Run script");
            eprintln!("  tagsim script <script.py>      Same, explicit subcommand");
            eprintln!();
            eprintln!("  tagsim --help  for full options");
            process::exit(1);
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, or by `verbose` when unset.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Builds the configuration from an optional JSON file plus command-line overrides.
fn load_config(
    path: Option<&str>,
    policy: Option<PolicyArg>,
    alloc_assoc: Option<usize>,
) -> Result<TagStoreConfig, String> {
    let mut config = match path {
        Some(p) => {
            let text = fs::read_to_string(p).map_err(|e| format!("reading {p}: {e}"))?;
            TagStoreConfig::from_json(&text).map_err(|e| format!("{p}: {e}"))?
        }
        None => TagStoreConfig::default(),
    };
    if let Some(policy) = policy {
        config.policy = policy.into();
    }
    if alloc_assoc.is_some() {
        config.alloc_assoc = alloc_assoc;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Replays `trace_path` and prints the resulting statistics.
///
/// Exits with code 1 on a bad configuration or an unreadable trace.
fn cmd_run(
    trace_path: &str,
    config_path: Option<&str>,
    policy: Option<PolicyArg>,
    alloc_assoc: Option<usize>,
    sections: &[String],
    json: bool,
) {
    let config = load_config(config_path, policy, alloc_assoc).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    let ops = load_trace(trace_path).unwrap_or_else(|e| {
        eprintln!("Error reading trace {trace_path}: {e}");
        process::exit(1);
    });
    let mut driver = TraceDriver::new(&config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let records = ops.len();
    info!(
        trace = trace_path,
        records,
        policy = ?config.policy,
        sets = config.num_sets(),
        assoc = config.assoc,
        "replaying trace"
    );
    let stats = driver.run(ops).clone();

    if json {
        let report = RunReport {
            policy: format!("{:?}", config.policy).to_uppercase(),
            records,
            cycles: driver.cycles(),
            writebacks: driver.writebacks(),
            deferred: driver.deferred(),
            stats: stats.to_json(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!(
        "Configuration: {} KiB, {}-way, {} B blocks, {} sets, policy {:?}",
        config.size_bytes / 1024,
        config.assoc,
        config.block_size,
        config.num_sets(),
        config.policy
    );
    println!(
        "[*] {records} records, {} cycles, {} write-backs, {} deferred fills",
        driver.cycles(),
        driver.writebacks(),
        driver.deferred()
    );
    stats.print_sections(sections);
}

/// Runs a Python script with `tagsim` injected into `sys.modules` and `sys.argv` set.
///
/// The script is executed as `__main__`. Exits the process with code 1 on script error or
/// missing file.
///
/// # Arguments
///
/// * `script_path` - Path to the `.py` file.
/// * `script_args` - Arguments passed as `sys.argv[1:]`.
fn run_python_script(script_path: &str, script_args: Vec<String>) {
    let script_content = fs::read_to_string(script_path).unwrap_or_else(|e| {
        eprintln!("Error reading script {script_path}: {e}");
        process::exit(1);
    });

    Python::with_gil(|py| {
        if let Err(e) = exec_script(py, script_path, &script_content, script_args) {
            e.print(py);
            process::exit(1);
        }
    });
}

fn exec_script(
    py: Python<'_>,
    script_path: &str,
    script_content: &str,
    script_args: Vec<String>,
) -> PyResult<()> {
    let sys = py.import("sys")?;
    let path = sys.getattr("path")?;
    let _ = path.call_method1("append", (".",))?;
    let _ = path.call_method1("append", ("python",))?;

    let m = PyModule::new(py, "tagsim")?;
    tagsim_py::register_tagsim_module(&m)?;
    sys.getattr("modules")?.set_item("tagsim", m)?;

    let mut full_args = vec![script_path.to_string()];
    full_args.extend(script_args);
    sys.setattr("argv", PyList::new(py, &full_args)?)?;

    let to_c = |s: &str| {
        CString::new(s).map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    };
    let _ = PyModule::from_code(
        py,
        &to_c(script_content)?,
        &to_c(script_path)?,
        &to_c("__main__")?,
    )?;
    Ok(())
}
