//! CLI Module
//!
//! Command-line harness around [`AudioEditor`](crate::AudioEditor). File
//! I/O happens only here; the engine itself works on in-memory bytes.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Audioforge - sample-accurate audio editing
#[derive(Parser, Debug)]
#[command(name = "audioforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Editor configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Keep only a time range of the input
    #[command(name = "trim")]
    Trim {
        /// Input audio file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Start time in seconds
        #[arg(long)]
        start: f64,

        /// End time in seconds
        #[arg(long)]
        end: f64,
    },

    /// Concatenate two or more files
    #[command(name = "merge")]
    Merge {
        /// Input audio files, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Change volume
    #[command(name = "gain")]
    Gain {
        /// Input audio file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Linear multiplier
        #[arg(long)]
        volume: Option<f32>,

        /// Gain in decibels (takes precedence over --volume)
        #[arg(long = "db", allow_negative_numbers = true)]
        volume_db: Option<f32>,
    },

    /// Fade in and/or out
    #[command(name = "fade")]
    Fade {
        /// Input audio file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Fade-in duration in seconds
        #[arg(long, default_value_t = 0.0)]
        fade_in: f64,

        /// Fade-out duration in seconds
        #[arg(long, default_value_t = 0.0)]
        fade_out: f64,
    },

    /// Change playback speed
    #[command(name = "speed")]
    Speed {
        /// Input audio file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Speed multiplier (>1 faster, <1 slower)
        #[arg(long)]
        speed: f64,

        /// Keep the original pitch
        #[arg(long)]
        preserve_pitch: bool,
    },

    /// Reverse the audio
    #[command(name = "reverse")]
    Reverse {
        /// Input audio file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Peak-normalize
    #[command(name = "normalize")]
    Normalize {
        /// Input audio file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Target peak in [0, 1] (default from config, 0.95)
        #[arg(long)]
        target_peak: Option<f32>,
    },

    /// Re-encode any decodable file as 16-bit WAV
    #[command(name = "convert")]
    Convert {
        /// Input audio file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
    },
}
