//! CLI Command Implementations
//!
//! Each command reads its inputs from disk, runs one editor operation and
//! writes the encoded output when the operation succeeds.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::cli::Commands;
use crate::dsp::{FadeOptions, GainOptions, SpeedOptions};
use crate::engine::{AudioDecoder, EncodedAudio};
use crate::error::Result;
use crate::ops::{AudioEditor, OperationResult};

/// Execute one command
///
/// I/O errors propagate; editing failures come back inside the result.
pub fn execute<D: AudioDecoder>(
    editor: &AudioEditor<D>,
    command: &Commands,
) -> Result<OperationResult<EncodedAudio>> {
    match command {
        Commands::Trim {
            input,
            output,
            start,
            end,
        } => {
            let bytes = read_input(input)?;
            finish(editor.trim_audio(&bytes, *start, *end), output)
        }
        Commands::Merge { inputs, output } => {
            let files = inputs
                .iter()
                .map(|path| read_input(path))
                .collect::<Result<Vec<_>>>()?;
            let slices: Vec<&[u8]> = files.iter().map(Vec::as_slice).collect();
            finish(editor.merge_audio(&slices), output)
        }
        Commands::Gain {
            input,
            output,
            volume,
            volume_db,
        } => {
            let bytes = read_input(input)?;
            let options = GainOptions {
                volume: volume.unwrap_or(1.0),
                volume_db: *volume_db,
            };
            finish(editor.boost_volume(&bytes, &options), output)
        }
        Commands::Fade {
            input,
            output,
            fade_in,
            fade_out,
        } => {
            let bytes = read_input(input)?;
            let options = FadeOptions::new(*fade_in, *fade_out);
            finish(editor.fade_audio(&bytes, &options), output)
        }
        Commands::Speed {
            input,
            output,
            speed,
            preserve_pitch,
        } => {
            let bytes = read_input(input)?;
            let options = SpeedOptions::new(*speed, *preserve_pitch);
            finish(editor.change_speed(&bytes, &options), output)
        }
        Commands::Reverse { input, output } => {
            let bytes = read_input(input)?;
            finish(editor.reverse_audio(&bytes), output)
        }
        Commands::Normalize {
            input,
            output,
            target_peak,
        } => {
            let bytes = read_input(input)?;
            finish(editor.normalize_audio(&bytes, *target_peak), output)
        }
        Commands::Convert { input, output } => {
            let bytes = read_input(input)?;
            finish(editor.convert_audio(&bytes), output)
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    info!("Reading input: {}", path.display());
    Ok(fs::read(path)?)
}

/// Write the output file if the operation succeeded
fn finish(
    result: OperationResult<EncodedAudio>,
    output: &Path,
) -> Result<OperationResult<EncodedAudio>> {
    if let Some(encoded) = result.data() {
        fs::write(output, encoded.bytes())?;
        info!("Wrote {} bytes to {}", encoded.len(), output.display());
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{encode, SampleBuffer};
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_tone(path: &Path, frames: usize, rate: u32) {
        let data: Vec<f32> = (0..frames)
            .map(|i| 0.5 * (i as f32 * 0.05).sin())
            .collect();
        let buffer = SampleBuffer::from_channels(vec![data], rate).unwrap();
        fs::write(path, encode(&buffer).unwrap().bytes()).unwrap();
    }

    #[test]
    fn test_trim_command_writes_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_tone(&input, 8000, 8000);

        let command = Commands::Trim {
            input: input.clone(),
            output: output.clone(),
            start: 0.0,
            end: 0.5,
        };
        let result = execute(&AudioEditor::new(), &command).unwrap();

        assert!(result.is_success());
        let written = fs::read(&output).unwrap();
        assert_eq!(written.len(), 44 + 4000 * 2);
    }

    #[test]
    fn test_failed_operation_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_tone(&input, 800, 8000);

        let command = Commands::Merge {
            inputs: vec![input],
            output: output.clone(),
        };
        let result = execute(&AudioEditor::new(), &command).unwrap();

        assert!(!result.is_success());
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let command = Commands::Reverse {
            input: PathBuf::from("/nonexistent/path/audio.wav"),
            output: PathBuf::from("/nonexistent/path/out.wav"),
        };
        let err = execute(&AudioEditor::new(), &command).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
