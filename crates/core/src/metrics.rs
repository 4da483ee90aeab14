//! Per-run metrics for encode and decode operations.
//!
//! Tracks how many bytes went in and out, how the payload splits into
//! content, trailer and padding, and how long the run took.
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe. Each run owns its own instance.

use crate::trailer::TrailerLayout;
use std::time::{Duration, Instant};

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode,
    Decode,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Encode => "encode",
            Operation::Decode => "decode",
        }
    }
}

/// Counters and timing for a single encode or decode run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    /// Encode or decode; `None` until a layout is recorded
    pub operation: Option<Operation>,

    // === Input/Output ===
    /// Bytes read (file bytes on encode, frame bytes on decode)
    pub input_bytes: u64,

    /// Bytes produced (frame bytes on encode, file bytes on decode)
    pub output_bytes: u64,

    // === Payload ===
    /// Original file bytes inside the payload
    pub content_bytes: u64,

    /// Extension code bytes + length byte + width byte
    pub trailer_bytes: u64,

    /// 0xFF padding bytes
    pub padding_bytes: u64,

    /// Sample width recorded in the trailer
    pub sample_width: u8,

    /// Samples the payload occupies
    pub samples: u64,

    // === Verification ===
    /// Encoded output was read back and decoded to the input
    pub verified: bool,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            operation: None,
            input_bytes: 0,
            output_bytes: 0,
            content_bytes: 0,
            trailer_bytes: 0,
            padding_bytes: 0,
            sample_width: 0,
            samples: 0,
            verified: false,
        }
    }

    /// Record an encode that turned `layout.content_len` file bytes into a
    /// payload.
    pub fn record_encode(&mut self, layout: &TrailerLayout) {
        self.operation = Some(Operation::Encode);
        self.record_layout(layout);
        self.input_bytes = layout.content_len as u64;
        self.output_bytes = layout.total_len() as u64;
    }

    /// Record a decode that recovered `layout.content_len` bytes.
    pub fn record_decode(&mut self, layout: &TrailerLayout) {
        self.operation = Some(Operation::Decode);
        self.record_layout(layout);
        self.input_bytes = layout.total_len() as u64;
        self.output_bytes = layout.content_len as u64;
    }

    fn record_layout(&mut self, layout: &TrailerLayout) {
        self.content_bytes = layout.content_len as u64;
        self.trailer_bytes = layout.trailer_len() as u64;
        self.padding_bytes = layout.padding as u64;
        self.sample_width = layout.sample_width;
        self.samples = layout.samples() as u64;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Trailer and padding bytes relative to the content.
    ///
    /// Returns 0.0 if there is no content.
    pub fn overhead_ratio(&self) -> f64 {
        if self.content_bytes == 0 {
            0.0
        } else {
            (self.trailer_bytes + self.padding_bytes) as f64 / self.content_bytes as f64
        }
    }

    /// Duration of audio at `frame_rate` samples per second.
    pub fn audio_seconds(&self, frame_rate: u32) -> f64 {
        if frame_rate == 0 {
            0.0
        } else {
            self.samples as f64 / frame_rate as f64
        }
    }

    /// Compute throughput in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self, frame_rate: u32) {
        let operation = self.operation.map_or("run", Operation::name);

        println!("\n=== {} summary ===", operation);
        println!("Duration: {} ms", self.duration().as_millis());
        println!("Input:  {} bytes", self.input_bytes);
        println!("Output: {} bytes", self.output_bytes);
        println!("Throughput: {:.0} bytes/s", self.throughput_bps());
        println!();

        println!("=== Payload ===");
        println!("Content: {} bytes", self.content_bytes);
        println!("Trailer: {} bytes", self.trailer_bytes);
        println!("Padding: {} bytes", self.padding_bytes);
        println!("Overhead: {:.2}%", self.overhead_ratio() * 100.0);
        println!();

        println!("=== Audio ===");
        println!("Sample width: {} bytes", self.sample_width);
        println!(
            "Samples: {} ({:.3} s at {} Hz)",
            self.samples,
            self.audio_seconds(frame_rate),
            frame_rate
        );

        if self.verified {
            println!("Verification: PASSED ✓");
        }
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "operation={}\n\
             duration_ms={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             throughput_bps={:.0}\n\
             content_bytes={}\n\
             trailer_bytes={}\n\
             padding_bytes={}\n\
             sample_width={}\n\
             samples={}\n\
             verified={}\n",
            self.operation.map_or("none", Operation::name),
            self.duration().as_millis(),
            self.input_bytes,
            self.output_bytes,
            self.throughput_bps(),
            self.content_bytes,
            self.trailer_bytes,
            self.padding_bytes,
            self.sample_width,
            self.samples,
            self.verified,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
