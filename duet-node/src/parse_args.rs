use std::net::SocketAddrV4;
use std::path::PathBuf;

use duet_core::config::Role;

const HELP: &str = "\
duet-node - one side of the Duet demo pair

Pairs with another node over UDP and runs the synchronized demos on the
terminal.

USAGE:
  duet-node [OPTIONS]

OPTIONS:
  -h, --help                 Prints help information
  -c, --config <file>        Load configuration from a TOML file
  -r, --role <master|slave>  Override node.role
  -n, --name <label>         Override node.name (up to 8 characters)
  --bind <ip:port>           Override link.bind
  --discovery <ip:port>      Override link.discovery
  --no-splash                Skip the boot splash
  -v, --verbose              Show pairing, rotation and link events
  -vv, --trace               Show every datagram
  --log <file>               Write log output to file instead of stderr

Two nodes on one host need distinct ports, each discovering the other:
  duet-node --bind 127.0.0.1:47800 --discovery 127.0.0.1:47801
  duet-node -r slave --bind 127.0.0.1:47801 --discovery 127.0.0.1:47800
";

/// Verbosity level for log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Startup, pairing and errors
    #[default]
    Quiet = 0,
    /// Rotation, drops and link events
    Verbose = 1,
    /// Every datagram
    Trace = 2,
}

#[derive(Debug, Default)]
pub struct AppArgs {
    pub config: Option<PathBuf>,
    pub role: Option<Role>,
    pub name: Option<String>,
    pub bind: Option<SocketAddrV4>,
    pub discovery: Option<SocketAddrV4>,
    pub no_splash: bool,
    pub verbosity: Verbosity,
    pub log_file: Option<String>,
}

fn parse_role(s: &str) -> Result<Role, &'static str> {
    match s {
        "master" => Ok(Role::Master),
        "slave" => Ok(Role::Slave),
        _ => Err("expected master or slave"),
    }
}

pub fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let args = parse_from(&mut pargs)?;

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {:?}.", remaining);
    }

    Ok(args)
}

fn parse_from(pargs: &mut pico_args::Arguments) -> Result<AppArgs, pico_args::Error> {
    let verbosity = if pargs.contains("--trace") || pargs.contains("-vv") {
        Verbosity::Trace
    } else if pargs.contains(["-v", "--verbose"]) {
        Verbosity::Verbose
    } else {
        Verbosity::Quiet
    };

    Ok(AppArgs {
        config: pargs.opt_value_from_str(["-c", "--config"])?,
        role: pargs.opt_value_from_fn(["-r", "--role"], parse_role)?,
        name: pargs.opt_value_from_str(["-n", "--name"])?,
        bind: pargs.opt_value_from_str("--bind")?,
        discovery: pargs.opt_value_from_str("--discovery")?,
        no_splash: pargs.contains("--no-splash"),
        verbosity,
        log_file: pargs.opt_value_from_str("--log")?,
    })
}
