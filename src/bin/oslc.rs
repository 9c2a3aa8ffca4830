//! Command-line driver (§4.7, §6.1), grounded in `original_source/src/main.cpp`'s
//! argument handling and pipeline order: preprocess, tokenize, parse, then
//! either dump or emit. `clap` replaces the original's hand-rolled `argv`
//! loop; everything downstream of argument parsing follows the same
//! short-circuiting order the original uses (`--preprocess` wins over
//! tokenizing, `--print-tokens` wins over parsing, `--print-ast` wins over
//! emitting).

use std::fs;
use std::io::Write;
use std::process;

use clap::Parser as ClapParser;

use oslc::ast::attr::ProgramStage;
use oslc::emit::{Emitter, GlslEmitter, HlslEmitter, MslEmitter};
use oslc::{dump, lexer, preprocess, Context, Parser};

#[derive(ClapParser)]
#[clap(name = "oslc", about = "Cross-compiler front end for a small C-like GPU shading language")]
struct Args {
    #[clap(long)]
    input: String,

    #[clap(long)]
    format: Option<String>,

    #[clap(long)]
    output: Option<String>,

    #[clap(long = "output-version")]
    output_version: Option<u32>,

    #[clap(long)]
    program: Option<String>,

    #[clap(long = "main")]
    main_function: Option<String>,

    #[clap(long = "print-tokens")]
    print_tokens: bool,

    #[clap(long = "print-ast")]
    print_ast: bool,

    #[clap(long)]
    preprocess: bool,

    #[clap(long)]
    whitespaces: bool,
}

fn parse_program(name: &str) -> Result<ProgramStage, String> {
    match name {
        "fragment" => Ok(ProgramStage::Fragment),
        "vertex" => Ok(ProgramStage::Vertex),
        other => Err(format!("Invalid program: {}", other)),
    }
}

fn run(args: Args) -> Result<(), String> {
    let source = fs::read_to_string(&args.input)
        .map_err(|e| format!("Failed to open file {}: {}", args.input, e))?;

    let cleaned = preprocess::preprocess(&source).map_err(|e| e.to_string())?;

    if args.preprocess {
        println!("{}", cleaned);
        return Ok(());
    }

    let tokens = lexer::tokenize(&cleaned).map_err(|e| e.to_string())?;

    if args.print_tokens {
        print!("{}", dump::dump_tokens(&tokens));
        return Ok(());
    }

    let mut ctx = Context::new();
    {
        let mut parser = Parser::new(&mut ctx, tokens);
        parser.parse_translation_unit().map_err(|e| e.to_string())?;
    }

    if args.print_ast {
        print!("{}", dump::dump_context(&ctx));
        return Ok(());
    }

    let format = args.format.ok_or_else(|| "No format".to_string())?;
    let program = parse_program(
        args.program
            .as_deref()
            .ok_or_else(|| "No program".to_string())?,
    )?;
    let main_function = args
        .main_function
        .ok_or_else(|| "No main function".to_string())?;

    let out_code = match format.as_str() {
        "hlsl" => HlslEmitter::new(program, main_function, args.output_version).output(&ctx, args.whitespaces),
        "glsl" => GlslEmitter::new(program, main_function, args.output_version).output(&ctx, args.whitespaces),
        "msl" => MslEmitter::new(program, main_function, args.output_version).output(&ctx, args.whitespaces),
        other => return Err(format!("Invalid format: {}", other)),
    };

    match args.output {
        Some(path) => {
            let mut file = fs::File::create(&path)
                .map_err(|e| format!("Failed to open file {}: {}", path, e))?;
            file.write_all(out_code.as_bytes())
                .map_err(|e| format!("Failed to output code: {}", e))?;
        }
        None => println!("{}", out_code),
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
