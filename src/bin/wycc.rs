use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Header { output: Option<PathBuf> },
    Version,
}

impl Command {
    fn from_args(args: &[String]) -> Result<Self, String> {
        let prog = args.first().map(String::as_str).unwrap_or("wycc");
        let Some(command) = args.get(1) else {
            return Err(Self::usage(prog));
        };

        match command.as_str() {
            "--help" | "-h" => Err(Self::usage(prog)),
            "version" | "--version" => Ok(Command::Version),
            "header" => {
                let mut output = None;
                let mut rest = args[2..].iter();
                while let Some(arg) = rest.next() {
                    match arg.as_str() {
                        "-o" | "--output" => {
                            let path = rest.next().ok_or("--output requires a path")?;
                            output = Some(PathBuf::from(path));
                        }
                        opt => return Err(format!("Unknown option: {}\n\n{}", opt, Self::usage(prog))),
                    }
                }
                Ok(Command::Header { output })
            }
            other => Err(format!("Unknown command: {}\n\n{}", other, Self::usage(prog))),
        }
    }

    fn usage(prog: &str) -> String {
        format!(
            "wycc - runtime support for Whiley programs compiled to C\n\n\
            USAGE:\n    {} <COMMAND>\n\n\
            COMMANDS:\n    \
            header [-o PATH]   Print (or write) wycc_lib.h\n    \
            version            Print the runtime version",
            prog
        )
    }
}

fn main() {
    let (config, diagnostics) = wycc::RuntimeConfig::load();
    wycc::logging::init(&config);
    for diagnostic in &diagnostics {
        warn!(error = %diagnostic, "Ignoring configuration");
    }

    let args: Vec<String> = std::env::args().collect();
    let command = match Command::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    debug!(?command, "Command parsed");

    match command {
        Command::Version => println!("wycc {}", env!("CARGO_PKG_VERSION")),
        Command::Header { output: None } => print!("{}", wycc::header::render()),
        Command::Header { output: Some(path) } => {
            if let Err(e) = fs::write(&path, wycc::header::render()) {
                error!(path = %path.display(), error = %e, "Failed to write header");
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
            info!(path = %path.display(), "Header written");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            Command::from_args(&args(&["wycc", "header"])),
            Ok(Command::Header { output: None })
        );
        assert_eq!(
            Command::from_args(&args(&["wycc", "header", "-o", "out/wycc_lib.h"])),
            Ok(Command::Header {
                output: Some(PathBuf::from("out/wycc_lib.h"))
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::from_args(&args(&["wycc"])).is_err());
        assert!(Command::from_args(&args(&["wycc", "header", "-o"])).is_err());
        assert!(Command::from_args(&args(&["wycc", "build"])).is_err());
        assert_eq!(Command::from_args(&args(&["wycc", "version"])), Ok(Command::Version));
    }
}
