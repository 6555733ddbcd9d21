// cinderc: Cinder front end driver

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cinderc::backend::Builder;
use cinderc::codegen::Codegen;
use cinderc::parser::lexer::Lexer;
use cinderc::parser::parse::Parser;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("cinderc");

    let mut print_tree = false;
    let mut input = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "--tree" => print_tree = true,
            _ => input = Some(arg.clone()),
        }
    }

    let Some(input) = input else {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} [--tree] <file.cin>", program_name);
        eprintln!();
        eprintln!("  --tree   print the AST instead of lowering to IR");
        return ExitCode::FAILURE;
    };

    if !Path::new(&input).exists() {
        eprintln!("Error: File '{}' not found", input);
        return ExitCode::FAILURE;
    }

    let source = match fs::read_to_string(&input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: Could not read '{}': {}", input, err);
            return ExitCode::FAILURE;
        }
    };

    let tokens = match Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut parser = Parser::new(tokens);
    let root = parser.parse();

    for warning in parser.diagnostics().warnings() {
        eprintln!("{}", warning);
    }

    let Some(root) = root else {
        for error in parser.diagnostics().errors() {
            eprintln!("{}", error);
        }
        return ExitCode::FAILURE;
    };

    if print_tree {
        println!("{}", root.tree_dump(0));
        return ExitCode::SUCCESS;
    }

    let mut builder = Builder::new();
    let mut codegen = Codegen::new(&mut builder);
    if let Err(err) = codegen.gen_statement(&root) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    print!("{}", builder.dump());
    ExitCode::SUCCESS
}
