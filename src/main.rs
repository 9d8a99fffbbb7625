use anyhow::{bail, Context, Result};
use getopts::Options;
use log::LevelFilter;
use mailsink::{
    DiscardMail, Disposition, LogCredentials, LogRecipients, MailSink, MinProtocol, SaveMail,
    Server, Spool, TlsPolicy, Transcript,
};
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

const DEFAULT_ADDRESS: &str = "127.0.0.1:2525";
const DEFAULT_NAME: &str = "localhost";
const DEFAULT_EXTENSION: &str = "eml";
const DEFAULT_THREADS: u32 = 4;

// Command line option names
const OPT_HELP: &str = "help";
const OPT_ADDRESS: &str = "address";
const OPT_NAME: &str = "name";
const OPT_OUTPUT: &str = "output";
const OPT_EXTENSION: &str = "extension";
const OPT_DISCARD: &str = "discard";
const OPT_VERBOSE: &str = "verbose";
const OPT_DEBUG: &str = "debug";
const OPT_NO_COLOR: &str = "no-color";
const OPT_SSL_CERT: &str = "ssl-cert";
const OPT_SSL_KEY: &str = "ssl-key";
const OPT_TLS11: &str = "tls11";
const OPT_TLS12: &str = "tls12";
const OPT_TLS13: &str = "tls13";
const OPT_THREADS: &str = "threads";

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::new();
    opts.optflag("h", OPT_HELP, "print this help menu");
    opts.optopt("a", OPT_ADDRESS, "the address to listen on", "ADDRESS");
    opts.optopt("n", OPT_NAME, "the name the server greets with", "NAME");
    opts.optopt("o", OPT_OUTPUT, "the directory to write messages to", "DIR");
    opts.optopt("e", OPT_EXTENSION, "saved file extension", "EXT");
    opts.optflag("", OPT_DISCARD, "discard incoming messages");
    opts.optflag("v", OPT_VERBOSE, "verbose output");
    opts.optflag("d", OPT_DEBUG, "dump the protocol dialogue");
    opts.optflag("", OPT_NO_COLOR, "disable colored output");
    opts.optopt("", OPT_SSL_CERT, "PEM-encoded certificate", "PEM_FILE");
    opts.optopt("", OPT_SSL_KEY, "PEM-encoded private key", "PEM_FILE");
    opts.optflag("", OPT_TLS11, "accept TLSv1.1 as a minimum");
    opts.optflag("", OPT_TLS12, "accept TLSv1.2 as a minimum");
    opts.optflag("", OPT_TLS13, "accept TLSv1.3 as a minimum");
    opts.optopt("t", OPT_THREADS, "number of worker threads", "N");
    let matches = opts
        .parse(&args[1..])
        .context("cannot parse command line")?;
    if matches.opt_present(OPT_HELP) {
        print_usage(&args[0], &opts);
        return Ok(());
    }

    let color = !matches.opt_present(OPT_NO_COLOR);
    let level = if matches.opt_present(OPT_DEBUG) {
        LevelFilter::Trace
    } else if matches.opt_present(OPT_VERBOSE) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    setup_logger(level, color)?;

    let name = matches
        .opt_str(OPT_NAME)
        .unwrap_or_else(|| DEFAULT_NAME.to_owned());
    if name.is_empty() {
        bail!("server name cannot be empty");
    }

    let output = match matches.opt_str(OPT_OUTPUT) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => env::temp_dir(),
    };
    let meta = fs::metadata(&output)
        .with_context(|| format!("cannot use output directory {}", output.display()))?;
    if !meta.is_dir() {
        bail!("{} is not a directory", output.display());
    }

    let extension = matches
        .opt_str(OPT_EXTENSION)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned());
    let disposition: Arc<dyn Disposition> = if matches.opt_present(OPT_DISCARD) {
        Arc::new(DiscardMail)
    } else {
        Arc::new(SaveMail::new(Spool::new(output, &extension)))
    };
    let handler = MailSink::new(Arc::new(LogCredentials), Arc::new(LogRecipients), disposition);

    let min_protocol = MinProtocol::pick(
        matches.opt_present(OPT_TLS11),
        matches.opt_present(OPT_TLS12),
        matches.opt_present(OPT_TLS13),
    );
    let tls = TlsPolicy::new(
        matches.opt_str(OPT_SSL_CERT).map(PathBuf::from),
        matches.opt_str(OPT_SSL_KEY).map(PathBuf::from),
        min_protocol,
    )
    .build()
    .context("cannot load TLS material")?;
    if tls.is_some() {
        log::info!("STARTTLS enabled");
    }

    let threads = match matches.opt_str(OPT_THREADS) {
        Some(n) => n.parse().context("cannot parse worker thread count")?,
        None => DEFAULT_THREADS,
    };
    let addr = matches
        .opt_str(OPT_ADDRESS)
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_owned());
    let transcript = Transcript::new(matches.opt_present(OPT_DEBUG), color);

    let mut server = Server::new(handler);
    server
        .with_name(name)
        .with_tls(tls)
        .with_transcript(transcript)
        .with_num_threads(threads)
        .with_addr(addr.as_str())
        .with_context(|| format!("cannot listen on {}", addr))?;
    server.serve()?;
    Ok(())
}

fn setup_logger(level: LevelFilter, color: bool) -> Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    // Fall back to plain stderr/stdout logging when there is no terminal.
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, choice)
        .or_else(|_| SimpleLogger::init(level, Config::default()))
        .context("cannot initialize logger")
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}
