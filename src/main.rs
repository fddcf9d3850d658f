use clap::Parser;
use descviz::config::{Config, Format};
use descviz::dot::{self, DotOptions};
use descviz::label::{self, LabelOptions};
use descviz::{BuiltinNames, NameResolver, UsbIdsDatabase};
use flexi_logger::{FileSpec, Logger, detailed_format};
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "descviz",
    version,
    about = "Decode a USB GET_DESCRIPTOR response and draw its descriptor graph."
)]
struct Args {
    /// File holding one line of hex bytes, e.g. "12 01 00 02 ..." (defaults to stdin)
    #[arg(long, short, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output format (defaults to the config file setting, then dot)
    #[arg(long, short, value_enum)]
    format: Option<Format>,

    /// Write output to this path instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// usb.ids file (text or JSON) for vendor and product names
    #[arg(long, value_name = "PATH")]
    usb_ids: Option<PathBuf>,

    /// Leave out layout-only edges and rank groups in DOT output
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_layout: bool,

    /// List HID main-item flags that are in their default state
    #[arg(long, action = clap::ArgAction::SetTrue)]
    show_default_flags: bool,

    /// Log to a file in the working directory instead of stderr
    #[arg(long, action = clap::ArgAction::SetTrue)]
    log_file: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let logger = Logger::try_with_env_or_str("warn")?.format(detailed_format);
    let logger = if args.log_file {
        logger
            .log_to_file(FileSpec::default().suppress_timestamp())
            .append()
    } else {
        logger.log_to_stderr()
    };
    let _logger = logger.start()?;

    let config = Config::load();
    log::debug!("{config:?}");

    let names: Box<dyn NameResolver> = match args.usb_ids.as_ref().or(config.usb_ids.as_ref()) {
        Some(path) => match UsbIdsDatabase::load(path) {
            Ok(db) => {
                log::info!("{} vendors loaded from {}", db.len(), path.display());
                Box::new(db)
            }
            Err(e) => {
                log::warn!("Failed to load names from {}: {}", path.display(), e);
                Box::new(BuiltinNames)
            }
        },
        None => Box::new(BuiltinNames),
    };

    let line = read_input(args.input.as_ref())?;
    let bytes = descviz::parse_hex_line(&line)?;
    log::info!("Decoding {} bytes", bytes.len());
    let graph = descviz::decode_with(&bytes, names.as_ref());

    let label_opts = LabelOptions {
        show_default_flags: args.show_default_flags || config.show_default_flags,
    };
    let rendered = match args.format.unwrap_or(config.format) {
        Format::Dot => dot::render(
            &graph,
            &DotOptions {
                layout_edges: !args.no_layout && config.layout_edges,
                label: label_opts,
            },
        ),
        Format::Json => serde_json::to_string_pretty(&graph)? + "\n",
        Format::Text => label::render_text(&graph, &label_opts),
    };

    match args.output {
        Some(path) => fs::write(&path, rendered)?,
        None => io::stdout().lock().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    if let Some(path) = path {
        return fs::read_to_string(path);
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Enter descriptor bytes (hex): ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line)
}
