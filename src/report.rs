use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

use crc32_bitserial::{check, compute_checksum, BitSequence, CheckOutcome, Generator};

pub const SAMPLE_MESSAGE: &str = "10010000100000100100100010001011010101100011111111100000111";

#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub message: BitSequence,
    pub checksum: BitSequence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_hex: Option<String>,
    pub stream: BitSequence,
    pub stream_len: usize,
}

impl GenerateReport {
    pub fn new(message: BitSequence, generator: &Generator) -> Self {
        let checksum = compute_checksum(&message, generator);
        let digits = checksum.len().div_ceil(4);
        let checksum_hex = checksum
            .to_word()
            .map(|w| format!("0x{:0digits$X}", w, digits = digits));
        let stream = message.concat(&checksum);
        let stream_len = stream.len();
        Self {
            message,
            checksum,
            checksum_hex,
            stream,
            stream_len,
        }
    }
}

impl fmt::Display for GenerateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Message bits:   {}", self.message)?;
        write!(f, "CRC checksum:   {}", self.checksum)?;
        if let Some(hex) = &self.checksum_hex {
            write!(f, " ({hex})")?;
        }
        writeln!(f)?;
        writeln!(f, "Full stream:    {}", self.stream)?;
        write!(f, "Stream length:  {}", self.stream_len)
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub stream: BitSequence,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

impl CheckReport {
    pub fn new(stream: BitSequence, generator: &Generator) -> Result<Self> {
        let outcome = check(&stream, generator).context("Failed to check bitstream")?;
        Ok(Self { stream, outcome })
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stream bits:    {}", self.stream)?;
        writeln!(f, "Remainder:      {}", self.outcome.remainder)?;
        write!(
            f,
            "CRC check:      {}",
            if self.outcome.accepted { "PASS" } else { "FAIL" }
        )
    }
}

#[derive(Debug, Serialize)]
pub struct SelfTestReport {
    pub generate: GenerateReport,
    pub check: CheckReport,
    pub flips_total: usize,
    pub flips_detected: usize,
}

impl SelfTestReport {
    /// Encodes the sample message, checks the stream, then checks every
    /// single-bit corruption of it.
    pub fn run(generator: &Generator) -> Result<Self> {
        let message: BitSequence = SAMPLE_MESSAGE
            .parse()
            .context("Failed to parse sample message")?;
        let generate = GenerateReport::new(message, generator);
        let check = CheckReport::new(generate.stream.clone(), generator)?;

        let flips_total = generate.stream.len();
        let mut flips_detected = 0;
        for p in 0..flips_total {
            let corrupted = generate.stream.flipped(p);
            if !crc32_bitserial::check(&corrupted, generator)?.accepted {
                flips_detected += 1;
            }
        }

        Ok(Self {
            generate,
            check,
            flips_total,
            flips_detected,
        })
    }

    pub fn passed(&self) -> bool {
        self.check.outcome.accepted && self.flips_detected == self.flips_total
    }
}

impl fmt::Display for SelfTestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.generate)?;
        writeln!(f, "{}", self.check)?;
        write!(
            f,
            "Bit flips:      {}/{} detected",
            self.flips_detected, self.flips_total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_test_passes_with_default_generator() -> Result<()> {
        let report = SelfTestReport::run(&Generator::crc32())?;
        assert!(report.passed());
        assert_eq!(report.flips_total, 91);
        assert_eq!(report.generate.checksum_hex.as_deref(), Some("0x203BA36D"));
        Ok(())
    }

    #[test]
    fn generate_report_text_layout() -> Result<()> {
        let report = GenerateReport::new("1".parse()?, &Generator::crc32());
        let text = report.to_string();
        assert!(text.contains("CRC checksum:   00000100110000010001110110110111 (0x04C11DB7)"));
        assert!(text.ends_with("Stream length:  33"));
        Ok(())
    }

    #[test]
    fn check_report_json_flattens_outcome() -> Result<()> {
        let stream = GenerateReport::new(SAMPLE_MESSAGE.parse()?, &Generator::crc32()).stream;
        let report = CheckReport::new(stream, &Generator::crc32())?;
        let json: serde_json::Value = serde_json::to_value(&report)?;
        assert_eq!(json["accepted"], true);
        assert_eq!(json["remainder"], "0".repeat(33));
        Ok(())
    }

    #[test]
    fn check_report_surfaces_short_input() {
        let err = CheckReport::new(BitSequence::zeros(3), &Generator::crc32()).unwrap_err();
        assert!(format!("{err:#}").contains("shorter than the 32-bit checksum"));
    }
}
