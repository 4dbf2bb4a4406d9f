mod report;

use std::fmt::Display;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use encoding_rs::SHIFT_JIS;
use serde::Serialize;

use crc32_bitserial::{BitSequence, Generator};
use report::{CheckReport, GenerateReport, SelfTestReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TextEncoding {
    Utf8,
    ShiftJis,
}

#[derive(Parser)]
#[command(name = "crc32_bitserial")]
#[command(about = "Generate and check non-reflected CRC-32 checksums over bit strings")]
#[command(long_about = "Without -g, -t or -c, runs the built-in self-test on a sample message.")]
struct Cli {
    /// Generate a checksum for a message of '0'/'1' characters
    #[arg(short = 'g', value_name = "MESSAGE_BITS", conflicts_with_all = ["text", "check_stream"])]
    generate_bits: Option<String>,

    /// Generate a checksum for text, encoded with --encoding
    #[arg(short = 't', value_name = "TEXT", conflicts_with = "check_stream")]
    text: Option<String>,

    /// Byte encoding used for -t
    #[arg(long, value_enum, default_value_t = TextEncoding::Utf8)]
    encoding: TextEncoding,

    /// Check a message ++ checksum stream
    #[arg(short = 'c', value_name = "STREAM_BITS")]
    check_stream: Option<String>,

    /// Generator polynomial bits, leading 1 included (default 0x104C11DB7)
    #[arg(long, value_name = "BITS")]
    generator: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let generator = match &cli.generator {
        Some(bits) => bits
            .trim()
            .parse::<Generator>()
            .context("Failed to parse generator polynomial")?,
        None => Generator::crc32(),
    };

    if let Some(bits) = &cli.generate_bits {
        let message = parse_bits(bits).context("Failed to parse message")?;
        emit(&GenerateReport::new(message, &generator), cli.json)?;
    } else if let Some(text) = &cli.text {
        let message = BitSequence::from_bytes(&encode_text(text, cli.encoding)?);
        emit(&GenerateReport::new(message, &generator), cli.json)?;
    } else if let Some(bits) = &cli.check_stream {
        let stream = parse_bits(bits).context("Failed to parse bitstream")?;
        let report = CheckReport::new(stream, &generator)?;
        emit(&report, cli.json)?;
        if !report.outcome.accepted {
            std::process::exit(1);
        }
    } else {
        let report = SelfTestReport::run(&generator)?;
        emit(&report, cli.json)?;
        if !report.passed() {
            bail!("Self-test failed");
        }
    }

    Ok(())
}

fn parse_bits(input: &str) -> Result<BitSequence> {
    Ok(input.trim().parse()?)
}

fn encode_text(text: &str, encoding: TextEncoding) -> Result<Vec<u8>> {
    match encoding {
        TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        TextEncoding::ShiftJis => {
            let (cow, _, had_errors) = SHIFT_JIS.encode(text);
            if had_errors {
                bail!("Text contains characters not representable in Shift_JIS");
            }
            Ok(cow.to_vec())
        }
    }
}

fn emit<T: Serialize + Display>(report: &T, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize to JSON")?;
        println!("{out}");
    } else {
        println!("{report}");
    }
    Ok(())
}
