use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::analysis::energy::EnergyAnalyzer;
use crate::codec::gateway::CodecGateway;
use crate::models::error::CodecError;
use crate::models::frame::{AudioFrame, FRAME_SAMPLES};

/// Default gateway implementation: a raw little-endian `i16` sample
/// stream on disk, no header, no framing.
///
/// ## File format
///
/// ```text
/// [sample 0, LE i16] [sample 1, LE i16] ...
/// ```
///
/// Write passes truncate the file; read passes deliver
/// [`FRAME_SAMPLES`]-sample frames, with a short final frame when the
/// stream length is not a multiple of the frame size. The analyzer
/// supplies the energy value returned by `process_frame`.
pub struct RawPcmCodec {
    analyzer: EnergyAnalyzer,
    writer: Option<BufWriter<File>>,
    reader: Option<BufReader<File>>,
    samples_written: u64,
}

impl RawPcmCodec {
    pub fn new(analyzer: EnergyAnalyzer) -> Self {
        Self {
            analyzer,
            writer: None,
            reader: None,
            samples_written: 0,
        }
    }

    /// Samples persisted during the current/most recent write pass.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }
}

impl CodecGateway for RawPcmCodec {
    fn prepare_write(&mut self, path: &Path) -> Result<(), CodecError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.writer = Some(BufWriter::new(file));
        self.samples_written = 0;
        Ok(())
    }

    fn prepare_read(&mut self, path: &Path) -> Result<(), CodecError> {
        let file = File::open(path)?;
        self.reader = Some(BufReader::new(file));
        Ok(())
    }

    fn process_frame(&mut self, frame: &[i16]) -> i32 {
        match self.writer.as_mut() {
            Some(writer) => {
                for &sample in frame {
                    if let Err(e) = writer.write_all(&sample.to_le_bytes()) {
                        log::warn!("raw pcm write hiccup: {}", e);
                        break;
                    }
                    self.samples_written += 1;
                }
            }
            None => log::warn!("process_frame with no open write pass"),
        }
        self.analyzer.compute_level(frame)
    }

    fn read_frame(&mut self) -> Result<Option<AudioFrame>, CodecError> {
        let reader = self.reader.as_mut().ok_or(CodecError::NotOpen)?;

        let mut bytes = vec![0u8; FRAME_SAMPLES * 2];
        let mut filled = 0;
        while filled < bytes.len() {
            let n = reader.read(&mut bytes[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled < 2 {
            return Ok(None);
        }

        let samples: Vec<i16> = bytes[..filled - filled % 2]
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Some(AudioFrame::new(samples)))
    }

    fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                log::warn!("raw pcm flush failed on close: {}", e);
            }
        }
        self.reader = None;
    }
}

impl Drop for RawPcmCodec {
    fn drop(&mut self) {
        self.close();
    }
}
