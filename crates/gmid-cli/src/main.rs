use std::env;
use std::path::PathBuf;

use gmid_api::http::{serve_blocking, HttpServerConfig};
use gmid_core::config::{load_config, ConfigSource};
use gmid_core::device::{DeviceFamily, DeviceParameters};
use gmid_core::export::write_sweep_table;
use gmid_core::history::{Session, DEFAULT_HISTORY_DEPTH};
use gmid_core::runner::run_dc_sweep;
use gmid_core::sweep::SweepResult;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!(
        r#"gm/Id Sweep Workbench

USAGE:
    gmid-cli --device <NAME> [OPTIONS]
    gmid-cli serve [--bind <ADDR>]

OPTIONS:
    -h, --help              Print help information
    -V, --version           Print version information
    -d, --device <NAME>     Device family: sg13_lv_nmos, sg13_lv_pmos,
                            sg13_hv_nmos, sg13_hv_pmos
    -w, --width <UM>        Drawn width in microns (default: 10)
    -l, --length <UM>       Drawn length in microns (default: 0.13)
    --fingers <N>           Finger count (default: 1)
    --mult <M>              Multiplier (default: 1)
    --vds <V>               Drain-source bias (default: 0.9)
    --max-vgs <V>           Gate sweep end magnitude (default: 1.8)
    --step <V>              Gate sweep step (default: 0.01)
    --vbs <V>               Body bias (default: 0)
    --config <PATH>         Global config file (default: config/global.json)
    -o, --table <PATH>      Write the derived table to a text file

SERVE OPTIONS:
    --bind <ADDR>           Listen address (default: 127.0.0.1:8080)

EXAMPLES:
    gmid-cli --device sg13_lv_nmos --width 10 --length 0.13
    gmid-cli --device sg13_lv_pmos --vds 0.9 --max-vgs 1.5 -o sweep.txt
    gmid-cli serve --bind 0.0.0.0:8080"#
    );
}

fn print_version() {
    println!("gmid-cli {}", VERSION);
}

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1).peekable();
    if args.peek().map(|arg| arg == "serve").unwrap_or(false) {
        args.next();
        run_serve(args);
        return;
    }

    let mut device: Option<String> = None;
    let mut width_um: f64 = 10.0;
    let mut length_um: f64 = 0.13;
    let mut fingers: u32 = 1;
    let mut mult: u32 = 1;
    let mut vds: Option<f64> = None;
    let mut vgs_max: Option<f64> = None;
    let mut step: Option<f64> = None;
    let mut vbs: Option<f64> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut table_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                print_version();
                std::process::exit(0);
            }
            "--device" | "-d" => {
                let Some(value) = args.next() else {
                    eprintln!("missing value for {}", arg);
                    std::process::exit(2);
                };
                device = Some(value);
            }
            "--width" | "-w" => {
                width_um = parse_f64_arg(&arg, args.next());
            }
            "--length" | "-l" => {
                length_um = parse_f64_arg(&arg, args.next());
            }
            "--fingers" => {
                fingers = parse_u32_arg(&arg, args.next());
            }
            "--mult" => {
                mult = parse_u32_arg(&arg, args.next());
            }
            "--vds" => {
                vds = Some(parse_f64_arg(&arg, args.next()));
            }
            "--max-vgs" => {
                vgs_max = Some(parse_f64_arg(&arg, args.next()));
            }
            "--step" => {
                step = Some(parse_f64_arg(&arg, args.next()));
            }
            "--vbs" => {
                vbs = Some(parse_f64_arg(&arg, args.next()));
            }
            "--config" => {
                let Some(value) = args.next() else {
                    eprintln!("missing value for {}", arg);
                    std::process::exit(2);
                };
                config_path = Some(PathBuf::from(value));
            }
            "--table" | "-o" => {
                let Some(value) = args.next() else {
                    eprintln!("missing value for {}", arg);
                    std::process::exit(2);
                };
                table_path = Some(PathBuf::from(value));
            }
            _ => {
                eprintln!("unexpected argument: {}", arg);
                std::process::exit(2);
            }
        }
    }

    let Some(device) = device else {
        eprintln!("usage: gmid-cli --device <name> [options]");
        std::process::exit(2);
    };
    let Some(family) = DeviceFamily::from_name(&device) else {
        eprintln!("unknown device family: {}", device);
        eprintln!(
            "known families: {}",
            DeviceFamily::all()
                .iter()
                .map(|f| f.model_name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        std::process::exit(2);
    };

    let mut params = DeviceParameters::new(family, width_um * 1e-6, length_um * 1e-6);
    params.fingers = fingers;
    params.mult = mult;
    if let Some(vds) = vds {
        params.vds = vds;
    }
    if let Some(vgs_max) = vgs_max {
        params.vgs_max = vgs_max;
    }
    if let Some(step) = step {
        params.vgs_step = step;
    }
    if let Some(vbs) = vbs {
        params.vbs = vbs;
    }
    if let Err(err) = params.validate() {
        eprintln!("{}", err);
        std::process::exit(2);
    }

    let config = load_config(config_path.as_deref());
    if config.source == ConfigSource::BuiltinDefaults {
        eprintln!("warning: no config file found, using built-in defaults");
    }

    println!(
        "dc sweep: {} w={}u l={}u ng={} m={} vds={} vgs 0..{} step {} vbs={}",
        family.model_name(),
        width_um,
        length_um,
        params.fingers,
        params.mult,
        params.vds,
        params.vgs_max,
        params.vgs_step,
        params.vbs
    );

    let result = match run_dc_sweep(&params, &config) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("simulation failed: {}", err);
            std::process::exit(1);
        }
    };
    if result.is_empty() {
        eprintln!("simulation returned no data");
        std::process::exit(1);
    }

    let mut session = Session::new(DEFAULT_HISTORY_DEPTH);
    session.commit(params.clone(), result);
    let Some(entry) = session.current.as_ref() else {
        eprintln!("simulation returned no data");
        std::process::exit(1);
    };

    print_summary(&entry.result);

    if let Some(path) = table_path {
        if let Err(err) = write_sweep_table(&entry.params, &entry.result, &path) {
            eprintln!("failed to write table: {}", err);
            std::process::exit(1);
        }
        println!("table written: {}", path.display());
    }
}

fn run_serve(mut args: std::iter::Peekable<std::iter::Skip<env::Args>>) {
    let mut bind_addr = "127.0.0.1:8080".to_string();
    let mut config_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => {
                let Some(value) = args.next() else {
                    eprintln!("missing value for {}", arg);
                    std::process::exit(2);
                };
                bind_addr = value;
            }
            "--config" => {
                let Some(value) = args.next() else {
                    eprintln!("missing value for {}", arg);
                    std::process::exit(2);
                };
                config_path = Some(PathBuf::from(value));
            }
            _ => {
                eprintln!("unexpected argument: {}", arg);
                std::process::exit(2);
            }
        }
    }

    let config = load_config(config_path.as_deref());
    if config.source == ConfigSource::BuiltinDefaults {
        eprintln!("warning: no config file found, using built-in defaults");
    }
    println!("listening on {}", bind_addr);
    if let Err(err) = serve_blocking(HttpServerConfig::new(bind_addr, config)) {
        eprintln!("server failed: {}", err);
        std::process::exit(1);
    }
}

fn print_summary(result: &SweepResult) {
    println!("{} sweep points", result.len());
    println!(
        "{:>10} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "vgs", "id", "gm", "gm/id", "gm/gds", "ft(GHz)"
    );

    let n = result.len();
    let show_all = n <= 20;
    for (i, point) in result.points.iter().enumerate() {
        if show_all || i < 5 || i >= n - 5 {
            println!(
                "{:>10.3} {:>12.4e} {:>12.4e} {:>12.3} {:>12.3} {:>12.3}",
                point.vgs,
                point.id,
                point.gm,
                point.gm_id,
                point.gm_gds,
                point.ft / 1e9
            );
        } else if i == 5 {
            println!("  ... ({} more points) ...", n - 10);
        }
    }
}

fn parse_f64_arg(name: &str, value: Option<String>) -> f64 {
    let Some(value) = value else {
        eprintln!("missing value for {}", name);
        std::process::exit(2);
    };
    match value.parse::<f64>() {
        Ok(parsed) => parsed,
        Err(_) => {
            eprintln!("invalid number for {}: {}", name, value);
            std::process::exit(2);
        }
    }
}

fn parse_u32_arg(name: &str, value: Option<String>) -> u32 {
    let Some(value) = value else {
        eprintln!("missing value for {}", name);
        std::process::exit(2);
    };
    match value.parse::<u32>() {
        Ok(parsed) if parsed >= 1 => parsed,
        _ => {
            eprintln!("{} must be a positive integer, got {}", name, value);
            std::process::exit(2);
        }
    }
}
