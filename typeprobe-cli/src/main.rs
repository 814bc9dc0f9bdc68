use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{prelude::*, EnvFilter};
use typeprobe::{FloatStyle, Literal, Report};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(
        long,
        env = "TYPEPROBE_FLOAT_STYLE",
        global = true,
        value_enum,
        default_value_t = FloatStyleArg::Fixed
    )]
    float_style: FloatStyleArg,
    #[clap(
        long,
        env = "TYPEPROBE_FORMAT",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    format: OutputFormat,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value and size of every declared value (the default)
    Report,
    /// Parse C literals and print their value, type and size
    Literal {
        #[clap(required = true)]
        literals: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FloatStyleArg {
    Fixed,
    Scientific,
}

impl From<FloatStyleArg> for FloatStyle {
    fn from(arg: FloatStyleArg) -> Self {
        match arg {
            FloatStyleArg::Fixed => FloatStyle::Fixed,
            FloatStyleArg::Scientific => FloatStyle::Scientific,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl Args {
    fn run_report(&self, out: &mut impl Write) -> Result<()> {
        let report = Report::standard().context("Building report")?;
        tracing::debug!(entries = report.entries.len(), "report built");
        match self.format {
            OutputFormat::Text => report.write_text(out, self.float_style.into())?,
            OutputFormat::Json => {
                report.write_json(&mut *out)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn run_literals(&self, literals: &[String], out: &mut impl Write) -> Result<()> {
        let parsed = literals
            .iter()
            .map(|text| {
                let text = text.trim();
                Literal::parse(text)
                    .with_context(|| format!("Parsing literal {:?}", text))
                    .map(|literal| (text, literal))
            })
            .collect::<Result<Vec<_>>>()?;
        match self.format {
            OutputFormat::Text => {
                for (text, literal) in &parsed {
                    writeln!(out, "{}", literal.describe(text, self.float_style.into()))?;
                }
            }
            OutputFormat::Json => {
                let literals: Vec<&Literal> = parsed.iter().map(|(_, literal)| literal).collect();
                serde_json::to_writer_pretty(&mut *out, &literals)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(io::stderr),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.command {
        None | Some(Command::Report) => args.run_report(&mut out),
        Some(Command::Literal { literals }) => args.run_literals(literals, &mut out),
    }?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(argv: &[&str]) -> String {
        let args = Args::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        match &args.command {
            None | Some(Command::Report) => args.run_report(&mut out).unwrap(),
            Some(Command::Literal { literals }) => args.run_literals(literals, &mut out).unwrap(),
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_default_is_report() {
        let out = run(&["typeprobe"]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("value of x: 50,"));
        assert!(lines[10].starts_with("Point coordinates: (10, 20),"));
        assert_eq!(out, run(&["typeprobe", "report"]));
    }

    #[test]
    fn test_report_flags() {
        let out = run(&["typeprobe", "report", "--float-style", "scientific"]);
        assert!(out.contains("value of b: 3.141590e+00,"));
        let json = run(&["typeprobe", "--format", "json"]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entries"].as_array().unwrap().len(), 11);
    }

    #[test]
    fn test_literals() {
        let out = run(&["typeprobe", "literal", "85", "0x4b", "'a'"]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("85: 85 (decimal int), size: "));
        assert!(lines[1].starts_with("0x4b: 75 (hexadecimal int), size: "));
        assert_eq!(lines[2], "'a': a, ASCII: 97 (char), size: 1 bytes");
    }

    #[test]
    fn test_bad_literal() {
        let args = Args::try_parse_from(["typeprobe", "literal", "09"]).unwrap();
        let mut out = Vec::new();
        let Some(Command::Literal { literals }) = &args.command else {
            panic!("expected the literal command");
        };
        let err = args.run_literals(literals, &mut out).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid digit"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_literal_requires_arguments() {
        assert!(Args::try_parse_from(["typeprobe", "literal"]).is_err());
    }
}
