use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use num_bigint::BigInt;
use solvc_core::{Expr, ExprRef, Program, Type};
use solvc_emit::{format_expr, BoogieEmitter, Emitter, EmitterConfig};
use solvc_transform::{
    builtin_program, encode_binary, encode_unary, explicit_conversion, implicit_conversion,
    range_constraint, BinaryOperator, Diagnostic, EncodingConfig, EncodingContext,
    TypeClassifier, UnaryOperator,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solvc")]
#[command(about = "Inspect how Solidity arithmetic and Ether transfers are encoded for Boogie")]
#[command(version = "0.1.0")]
#[command(author = "Gianluca Brigandi <gbrigand@gmail.com>")]
struct Cli {
    /// Log encoding decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the prelude and the transfer, send and call procedures
    Builtins {
        #[arg(short, long, value_enum, default_value = "int")]
        encoding: EncodingArg,

        #[arg(long)]
        check_overflow: bool,

        /// Dump the IR as JSON instead of Boogie text
        #[arg(long)]
        json: bool,

        /// Leave out `{:sourceloc}` and `{:message}` attributes
        #[arg(long)]
        no_source_attrs: bool,

        #[arg(long)]
        color: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Encode `lhs op rhs` or `op operand` on identifiers or integer literals
    Encode {
        #[arg(short, long, value_enum, default_value = "int")]
        encoding: EncodingArg,

        /// Operand type, e.g. uint8 or int256
        #[arg(short = 't', long = "type", default_value = "uint256")]
        ty: Type,

        #[arg(required = true, num_args = 2..=3, allow_hyphen_values = true)]
        expr: Vec<String>,
    },

    /// Convert an identifier or literal between two types
    Convert {
        #[arg(short, long, value_enum, default_value = "int")]
        encoding: EncodingArg,

        #[arg(long)]
        from: Type,

        #[arg(long)]
        to: Type,

        /// Treat the conversion as an explicit cast
        #[arg(long)]
        explicit: bool,

        #[arg(allow_hyphen_values = true)]
        operand: String,
    },

    /// Print the range constraint of a type for an identifier
    Tcc {
        ty: Type,

        #[arg(default_value = "x")]
        name: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EncodingArg {
    Int,
    Bv,
    Mod,
}

impl From<EncodingArg> for solvc_transform::Encoding {
    fn from(encoding: EncodingArg) -> Self {
        match encoding {
            EncodingArg::Int => solvc_transform::Encoding::Mathematical,
            EncodingArg::Bv => solvc_transform::Encoding::Bitvector,
            EncodingArg::Mod => solvc_transform::Encoding::Modular,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Builtins {
            encoding,
            check_overflow,
            json,
            no_source_attrs,
            color,
            output,
        } => cmd_builtins(encoding, check_overflow, json, no_source_attrs, color, output),
        Commands::Encode { encoding, ty, expr } => cmd_encode(encoding, ty, expr),
        Commands::Convert {
            encoding,
            from,
            to,
            explicit,
            operand,
        } => cmd_convert(encoding, from, to, explicit, operand),
        Commands::Tcc { ty, name } => cmd_tcc(ty, name),
    }
}

fn cmd_builtins(
    encoding: EncodingArg,
    check_overflow: bool,
    json: bool,
    no_source_attrs: bool,
    color: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    use colored::*;
    use std::fs;

    let config = EncodingConfig::new(encoding.into()).with_overflow_checks(check_overflow);
    let translation = builtin_program(config)?;
    print_diagnostics(&translation.diagnostics);

    let text = if json {
        translation.program.to_json()?
    } else {
        let emitter_config = EmitterConfig {
            use_colors: color && output.is_none(),
            include_source_attrs: !no_source_attrs,
            ..EmitterConfig::default()
        };
        BoogieEmitter::new(emitter_config).emit_to_string(&translation.program)?
    };

    if let Some(output_path) = output {
        fs::write(&output_path, &text)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        println!(
            " {} Wrote {} declarations to {}",
            "SUCCESS:".bright_green().bold(),
            translation.program.len(),
            output_path.display()
        );
    } else {
        print!("{}", text);
    }

    Ok(())
}

fn parse_operand(ctx: &EncodingContext, token: &str, bits: u32) -> Result<ExprRef> {
    if let Ok(value) = token.parse::<BigInt>() {
        return Ok(ctx.int_lit(&value, bits));
    }
    let mut chars = token.chars();
    let valid_start = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        Ok(Expr::id(token))
    } else {
        bail!("'{}' is neither an integer literal nor an identifier", token)
    }
}

fn bit_precise_shape(ty: &Type) -> Result<(u32, bool)> {
    match TypeClassifier::shape(ty) {
        Some(shape) => Ok(shape),
        None => bail!("type {} has no fixed bit width", ty),
    }
}

fn cmd_encode(encoding: EncodingArg, ty: Type, expr: Vec<String>) -> Result<()> {
    use colored::*;

    let (bits, signed) = bit_precise_shape(&ty)?;
    let mut ctx = EncodingContext::new(EncodingConfig::new(encoding.into()));

    let encoded = match expr.as_slice() {
        [op, operand] => {
            let op = UnaryOperator::from_token(op)
                .with_context(|| format!("unknown unary operator '{}'", op))?;
            let operand = parse_operand(&ctx, operand, bits)?;
            encode_unary(&mut ctx, None, op, operand, bits, signed)
        }
        [lhs, op, rhs] => {
            let op: BinaryOperator = op.parse()?;
            let lhs = parse_operand(&ctx, lhs, bits)?;
            let rhs = parse_operand(&ctx, rhs, bits)?;
            encode_binary(&mut ctx, None, op, lhs, rhs, bits, signed)
        }
        _ => bail!("expected `lhs op rhs` or `op operand`"),
    };

    println!("{} {}", "value:".bold(), format_expr(&encoded.expr));
    match &encoded.condition {
        Some(condition) => println!("{} {}", "condition:".bold(), format_expr(condition)),
        None => println!("{} none", "condition:".bold()),
    }

    let builtins = ctx.builtin_decls();
    if !builtins.is_empty() {
        let mut program = Program::new();
        program.add_decls(builtins)?;
        print!("{}", BoogieEmitter::default().emit_to_string(&program)?);
    }

    print_diagnostics(ctx.diagnostics());
    Ok(())
}

fn cmd_convert(
    encoding: EncodingArg,
    from: Type,
    to: Type,
    explicit: bool,
    operand: String,
) -> Result<()> {
    let mut ctx = EncodingContext::new(EncodingConfig::new(encoding.into()));
    let expr = match operand.parse::<BigInt>() {
        Ok(value) => Expr::int(value),
        Err(_) => parse_operand(&ctx, &operand, 256)?,
    };

    let converted = if explicit {
        explicit_conversion(&mut ctx, expr, Some(&from), Some(&to))?
    } else {
        implicit_conversion(&mut ctx, expr, &from, &to)?
    };
    println!("{}", format_expr(&converted));
    Ok(())
}

fn cmd_tcc(ty: Type, name: String) -> Result<()> {
    println!("{}", format_expr(&range_constraint(Expr::id(name), &ty)));
    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    use colored::*;

    for diagnostic in diagnostics {
        println!("{} {}", "warning:".yellow().bold(), diagnostic);
    }
}
