use clap::Parser;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use dragon_compiler::{CompileError, Emitter, Lexer, Parser as DParser};
use tracing::debug;
use tracing_subscriber::filter::{Directive, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "dragonc")]
#[command(about = "Translate a program into three-address code")]
struct Cli {
    /// Source file; standard input when absent
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Log each scanned token
    #[arg(long)]
    trace_lexer: bool,
    /// Log each token the parser matches
    #[arg(long)]
    trace_parser: bool,
    /// Log each emitted label
    #[arg(long)]
    trace_labels: bool,
    /// Print the parsed statement tree to stderr before generating code
    #[arg(long)]
    dump_ast: bool,
}

impl Cli {
    fn filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::from_default_env();
        let toggles = [
            (self.trace_lexer, "dragon_compiler::lexer=trace"),
            (self.trace_parser, "dragon_compiler::parser=trace"),
            (self.trace_labels, "dragon_compiler::codegen=debug"),
        ];
        for (on, directive) in toggles {
            if let (true, Ok(directive)) = (on, directive.parse::<Directive>()) {
                filter = filter.add_directive(directive);
            }
        }
        filter
    }
}

fn run<R: Read>(cli: &Cli, input: R) -> Result<(), CompileError> {
    let mut parser = DParser::new(Lexer::new(input))?;
    let stdout = io::stdout();
    let mut out = Emitter::new(stdout.lock());
    if cli.dump_ast {
        let body = parser.parse_program()?;
        eprintln!("{:#?}", body);
        parser.gen_program(&body, &mut out)?;
    } else {
        parser.program(&mut out)?;
    }
    out.finish().map_err(|e| CompileError::io(e, parser.line()))
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(cli.filter())
        .with_writer(io::stderr)
        .without_time()
        .init();

    debug!(file = ?cli.file, "reading program");
    let result = match &cli.file {
        Some(path) => match File::open(path) {
            Ok(file) => run(&cli, file),
            Err(e) => {
                eprintln!("failed to open {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => run(&cli, io::stdin().lock()),
    };
    if let Err(e) = result {
        if let Err(flush) = io::stdout().flush() {
            eprintln!("failed to flush output: {}", flush);
        }
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
