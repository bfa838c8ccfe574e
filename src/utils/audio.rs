use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// Output encodings accepted by the speech endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Opus => "opus",
            AudioFormat::Aac => "aac",
            AudioFormat::Flac => "flac",
            AudioFormat::Wav => "wav",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Opus => "audio/ogg",
            AudioFormat::Aac => "audio/aac",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Wav => "audio/wav",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

/// Joins per-chunk audio into one asset, in the order given.
///
/// WAV segments are merged by rewriting a single RIFF header over the
/// concatenated `data` chunks; every other format is a stream format and is
/// concatenated byte for byte.
pub fn merge_segments(format: AudioFormat, segments: &[Vec<u8>]) -> Result<Vec<u8>> {
    match format {
        AudioFormat::Wav => merge_wav(segments),
        _ => Ok(concat_binary(segments)),
    }
}

/// Simple binary concatenation. Suitable for MP3 or other stream-based formats.
pub fn concat_binary(segments: &[Vec<u8>]) -> Vec<u8> {
    let total: usize = segments.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    for segment in segments {
        out.extend_from_slice(segment);
    }
    out
}

struct WavInfo {
    fmt_content: Vec<u8>,
    data_offset: u64,
    data_size: u32,
}

fn scan_wav(bytes: &[u8]) -> Result<WavInfo> {
    let mut f = Cursor::new(bytes);

    let mut id = [0u8; 4];
    f.read_exact(&mut id)?;
    if &id != b"RIFF" {
        return Err(anyhow!("Not a RIFF stream"));
    }

    // Skip RIFF size
    f.seek(SeekFrom::Current(4))?;

    f.read_exact(&mut id)?;
    if &id != b"WAVE" {
        return Err(anyhow!("Not a WAVE stream"));
    }

    let mut fmt_content: Option<Vec<u8>> = None;
    let mut data: Option<(u64, u32)> = None;

    loop {
        let mut chunk_id = [0u8; 4];
        let n = f.read(&mut chunk_id)?;
        if n == 0 {
            break;
        }
        if n < 4 {
            return Err(anyhow!("Unexpected end of stream reading chunk ID"));
        }

        let mut size_buf = [0u8; 4];
        f.read_exact(&mut size_buf)?;
        let chunk_size = u32::from_le_bytes(size_buf);

        if &chunk_id == b"fmt " {
            let mut buf = vec![0u8; chunk_size as usize];
            f.read_exact(&mut buf)?;
            fmt_content = Some(buf);
        } else if &chunk_id == b"data" {
            data = Some((f.stream_position()?, chunk_size));
            break;
        } else {
            f.seek(SeekFrom::Current(chunk_size as i64))?;
        }
    }

    let (data_offset, data_size) = data.ok_or_else(|| anyhow!("Missing data chunk"))?;
    Ok(WavInfo {
        fmt_content: fmt_content.ok_or_else(|| anyhow!("Missing fmt chunk"))?,
        data_offset,
        data_size,
    })
}

fn merge_wav(segments: &[Vec<u8>]) -> Result<Vec<u8>> {
    let Some(first) = segments.first() else {
        return Ok(Vec::new());
    };

    let base_fmt = scan_wav(first).context("Failed to parse WAV segment 0")?.fmt_content;
    let too_large = || anyhow!("Merged WAV data exceeds the 4 GiB RIFF limit");
    let mut payloads = Vec::with_capacity(segments.len());
    let mut total_data_size: u32 = 0;

    for (i, segment) in segments.iter().enumerate() {
        let info = scan_wav(segment).with_context(|| format!("Failed to parse WAV segment {}", i))?;
        if info.fmt_content != base_fmt {
            return Err(anyhow!(
                "WAV format mismatch in segment {}. All segments must share sample rate and channels.",
                i
            ));
        }
        // Streamed WAV often declares a placeholder size; only the bytes
        // actually present are copied and counted.
        let start = (info.data_offset as usize).min(segment.len());
        let end = start.saturating_add(info.data_size as usize).min(segment.len());
        let payload = &segment[start..end];
        total_data_size = u32::try_from(payload.len())
            .ok()
            .and_then(|len| total_data_size.checked_add(len))
            .ok_or_else(too_large)?;
        payloads.push(payload);
    }

    let fmt_len = u32::try_from(base_fmt.len()).map_err(|_| too_large())?;
    // 4 (WAVE) + 8 (fmt hdr) + fmt_len + 8 (data hdr) + data_len
    let riff_size = (4 + 8 + 8u32)
        .checked_add(fmt_len)
        .and_then(|n| n.checked_add(total_data_size))
        .ok_or_else(too_large)?;

    let mut out = Vec::new();
    out.write_all(b"RIFF")?;
    out.write_all(&riff_size.to_le_bytes())?;
    out.write_all(b"WAVE")?;

    out.write_all(b"fmt ")?;
    out.write_all(&fmt_len.to_le_bytes())?;
    out.write_all(&base_fmt)?;

    out.write_all(b"data")?;
    out.write_all(&total_data_size.to_le_bytes())?;

    for payload in payloads {
        out.write_all(payload)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dummy_wav(payload: &[u8], sample_rate: u32) -> Vec<u8> {
        let size = payload.len() as u32;
        let mut buf = Vec::new();
        buf.write_all(b"RIFF").unwrap();
        buf.write_all(&(36 + size).to_le_bytes()).unwrap();
        buf.write_all(b"WAVE").unwrap();

        buf.write_all(b"fmt ").unwrap();
        buf.write_all(&16u32.to_le_bytes()).unwrap();
        // PCM (1), Mono (1), SampleRate, ByteRate, BlockAlign (2), Bits (16)
        buf.write_all(&1u16.to_le_bytes()).unwrap();
        buf.write_all(&1u16.to_le_bytes()).unwrap();
        buf.write_all(&sample_rate.to_le_bytes()).unwrap();
        buf.write_all(&(sample_rate * 2).to_le_bytes()).unwrap();
        buf.write_all(&2u16.to_le_bytes()).unwrap();
        buf.write_all(&16u16.to_le_bytes()).unwrap();

        buf.write_all(b"data").unwrap();
        buf.write_all(&size.to_le_bytes()).unwrap();
        buf.write_all(payload).unwrap();
        buf
    }

    #[test]
    fn test_concat_binary_preserves_order() {
        let merged = merge_segments(
            AudioFormat::Mp3,
            &[b"AAA".to_vec(), b"B".to_vec(), b"CC".to_vec()],
        )
        .unwrap();
        assert_eq!(merged, b"AAABCC");
    }

    #[test]
    fn test_merge_wav_segments() -> Result<()> {
        let wav1 = create_dummy_wav(&[1u8; 10], 24000);
        let wav2 = create_dummy_wav(&[2u8; 20], 24000);

        let merged = merge_segments(AudioFormat::Wav, &[wav1, wav2])?;

        let info = scan_wav(&merged)?;
        assert_eq!(info.data_size, 30);
        assert_eq!(info.fmt_content.len(), 16);
        let data = &merged[info.data_offset as usize..];
        assert_eq!(&data[..10], &[1u8; 10]);
        assert_eq!(&data[10..], &[2u8; 20]);
        Ok(())
    }

    #[test]
    fn test_merge_wav_with_placeholder_sizes() -> Result<()> {
        let streamed = |payload: &[u8]| {
            let mut wav = create_dummy_wav(payload, 24000);
            wav[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
            wav[40..44].copy_from_slice(&u32::MAX.to_le_bytes());
            wav
        };

        let merged = merge_segments(AudioFormat::Wav, &[streamed(&[7u8; 6]), streamed(&[9u8; 4])])?;

        let info = scan_wav(&merged)?;
        assert_eq!(info.data_size, 10);
        assert_eq!(u32::from_le_bytes(merged[4..8].try_into()?), 36 + 10);
        assert_eq!(&merged[info.data_offset as usize..], &[7, 7, 7, 7, 7, 7, 9, 9, 9, 9]);
        Ok(())
    }

    #[test]
    fn test_merge_wav_rejects_mismatched_format() {
        let wav1 = create_dummy_wav(&[0u8; 4], 24000);
        let wav2 = create_dummy_wav(&[0u8; 4], 44100);
        assert!(merge_segments(AudioFormat::Wav, &[wav1, wav2]).is_err());
    }

    #[test]
    fn test_media_types() {
        assert_eq!(AudioFormat::Mp3.media_type(), "audio/mpeg");
        assert_eq!(AudioFormat::default(), AudioFormat::Mp3);
        assert_eq!(AudioFormat::Wav.extension(), "wav");
    }
}
