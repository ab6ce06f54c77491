//! Microphone capture using cpal.
//!
//! Records one utterance from the default input device: recording stops once
//! the speaker has been quiet for a moment after talking, or when the maximum
//! duration is reached. The result is a mono 16-bit WAV file held in memory.

use std::io::Cursor;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use cpal::SampleFormat;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no default input device")]
    NoDevice,
    #[error("cannot configure input device: {0}")]
    Config(String),
    #[error("input stream failed: {0}")]
    Stream(String),
    #[error("no speech detected")]
    NoSpeech,
    #[error("failed to encode recording: {0}")]
    Encode(#[from] hound::Error),
}

/// Tuning for when a recording starts counting as speech and when it ends.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub max_duration: Duration,
    /// Quiet time after speech that ends the recording.
    pub trailing_silence: Duration,
    /// RMS level (0.0..=1.0) above which a chunk counts as speech.
    pub speech_threshold: f32,
}

impl CaptureSettings {
    pub fn new(max_duration: Duration) -> Self {
        Self {
            max_duration,
            trailing_silence: Duration::from_millis(1200),
            speech_threshold: 0.02,
        }
    }
}

/// Energy-based end-of-utterance detection over mono chunks.
#[derive(Debug)]
pub struct SilenceDetector {
    threshold: f32,
    silence_samples_needed: usize,
    silent_samples: usize,
    heard_speech: bool,
}

impl SilenceDetector {
    pub fn new(sample_rate: u32, settings: &CaptureSettings) -> Self {
        let silence_samples_needed =
            (settings.trailing_silence.as_secs_f64() * f64::from(sample_rate)) as usize;
        Self {
            threshold: settings.speech_threshold,
            silence_samples_needed,
            silent_samples: 0,
            heard_speech: false,
        }
    }

    /// Feeds one chunk; returns true once the utterance is over.
    pub fn push(&mut self, chunk: &[f32]) -> bool {
        if chunk.is_empty() {
            return false;
        }
        if rms(chunk) >= self.threshold {
            self.heard_speech = true;
            self.silent_samples = 0;
        } else if self.heard_speech {
            self.silent_samples += chunk.len();
        }
        self.heard_speech && self.silent_samples >= self.silence_samples_needed
    }

    pub fn heard_speech(&self) -> bool {
        self.heard_speech
    }
}

fn rms(chunk: &[f32]) -> f32 {
    let sum: f32 = chunk.iter().map(|s| s * s).sum();
    (sum / chunk.len() as f32).sqrt()
}

/// Averages interleaved frames down to one channel.
pub fn downmix(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Encodes mono samples as a 16-bit PCM WAV file.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buf = Vec::new();
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut buf), spec)?;
        for sample in samples {
            let scaled = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            writer.write_sample(scaled)?;
        }
        writer.finalize()?;
    }
    Ok(buf)
}

/// Records one utterance and returns it as WAV bytes. Blocks the calling thread.
pub fn record_wav(settings: &CaptureSettings) -> Result<Vec<u8>, CaptureError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
    let device_name = device.name().unwrap_or_else(|_| "<unknown>".into());

    let supported = device
        .default_input_config()
        .map_err(|e| CaptureError::Config(e.to_string()))?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let channels = usize::from(config.channels.max(1));
    let sample_rate = config.sample_rate.0;
    info!(device = %device_name, sample_rate, channels, "Recording from microphone");

    let (tx, rx) = mpsc::channel::<Vec<f32>>();
    let on_error = |e: cpal::StreamError| warn!(error = %e, "Input stream error");

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(downmix(data, channels));
            },
            on_error,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let samples: Vec<f32> = data
                    .iter()
                    .map(|s| f32::from(*s) / f32::from(i16::MAX))
                    .collect();
                let _ = tx.send(downmix(&samples, channels));
            },
            on_error,
            None,
        ),
        other => {
            return Err(CaptureError::Config(format!(
                "unsupported sample format {other:?}"
            )));
        }
    }
    .map_err(|e| CaptureError::Stream(e.to_string()))?;

    stream
        .play()
        .map_err(|e| CaptureError::Stream(e.to_string()))?;

    let mut detector = SilenceDetector::new(sample_rate, settings);
    let mut samples = Vec::new();
    let started = Instant::now();
    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(chunk) => {
                let done = detector.push(&chunk);
                samples.extend(chunk);
                if done {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        if started.elapsed() >= settings.max_duration {
            debug!("Maximum recording duration reached");
            break;
        }
    }
    drop(stream);

    if !detector.heard_speech() {
        return Err(CaptureError::NoSpeech);
    }
    debug!(samples = samples.len(), "Recording finished");
    Ok(encode_wav(&samples, sample_rate)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CaptureSettings {
        CaptureSettings {
            max_duration: Duration::from_secs(5),
            trailing_silence: Duration::from_millis(500),
            speech_threshold: 0.1,
        }
    }

    #[test]
    fn test_silence_before_speech_never_ends() {
        let mut detector = SilenceDetector::new(1000, &settings());
        for _ in 0..10 {
            assert!(!detector.push(&[0.0; 100]));
        }
        assert!(!detector.heard_speech());
    }

    #[test]
    fn test_trailing_silence_ends_utterance() {
        let mut detector = SilenceDetector::new(1000, &settings());
        assert!(!detector.push(&[0.5; 100]));
        for _ in 0..4 {
            assert!(!detector.push(&[0.0; 100]));
        }
        assert!(detector.push(&[0.0; 100]));
    }

    #[test]
    fn test_speech_resets_silence() {
        let mut detector = SilenceDetector::new(1000, &settings());
        detector.push(&[0.5; 100]);
        for _ in 0..4 {
            detector.push(&[0.0; 100]);
        }
        assert!(!detector.push(&[0.5; 100]));
        assert!(!detector.push(&[0.0; 100]));
    }

    #[test]
    fn test_downmix_averages_frames() {
        assert_eq!(downmix(&[0.25, 0.75, -1.0, 1.0], 2), vec![0.5, 0.0]);
        assert_eq!(downmix(&[0.1, 0.2], 1), vec![0.1, 0.2]);
    }

    #[test]
    fn test_encode_wav_header() {
        let wav = encode_wav(&[0.0, 0.5, -0.5, 1.0], 16_000).unwrap();
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 4);
    }
}
