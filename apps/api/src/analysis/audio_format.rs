//! Audio container selection for the model's `input_audio` part.
//!
//! The container tag comes from the client's MIME string via an explicit
//! substring table. Unknown or missing MIME types fall back to `wav` and are
//! reported as defaulted. The decoded bytes can also be sniffed so that a
//! mislabeled upload is at least visible in the logs.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Webm,
    Wav,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Webm => "webm",
            AudioFormat::Wav => "wav",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Webm => "audio/webm",
            AudioFormat::Wav => "audio/wav",
        }
    }
}

/// Used when no table entry matches the MIME string.
pub const DEFAULT_AUDIO_FORMAT: AudioFormat = AudioFormat::Wav;

/// MIME substring → container tag. First match wins.
pub const MIME_FORMAT_TABLE: &[(&str, AudioFormat)] = &[
    ("mp3", AudioFormat::Mp3),
    ("mpeg", AudioFormat::Mp3),
    ("webm", AudioFormat::Webm),
    ("wav", AudioFormat::Wav),
    ("wave", AudioFormat::Wav),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSelection {
    pub format: AudioFormat,
    /// True when no table entry matched and `DEFAULT_AUDIO_FORMAT` was used.
    pub defaulted: bool,
}

pub fn select_format(mime_type: Option<&str>) -> FormatSelection {
    let mime = mime_type.map(|m| m.to_ascii_lowercase()).unwrap_or_default();
    MIME_FORMAT_TABLE
        .iter()
        .find(|(needle, _)| mime.contains(needle))
        .map(|&(_, format)| FormatSelection {
            format,
            defaulted: false,
        })
        .unwrap_or(FormatSelection {
            format: DEFAULT_AUDIO_FORMAT,
            defaulted: true,
        })
}

/// Identifies the container from its magic number, if recognised.
pub fn sniff_format(bytes: &[u8]) -> Option<AudioFormat> {
    match bytes {
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some(AudioFormat::Wav),
        [0x1A, 0x45, 0xDF, 0xA3, ..] => Some(AudioFormat::Webm),
        [b'I', b'D', b'3', ..] => Some(AudioFormat::Mp3),
        [0xFF, b, ..] if b & 0xE0 == 0xE0 => Some(AudioFormat::Mp3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_mp3_variants() {
        assert_eq!(select_format(Some("audio/mp3")).format, AudioFormat::Mp3);
        assert_eq!(select_format(Some("audio/mpeg")).format, AudioFormat::Mp3);
    }

    #[test]
    fn test_select_webm_with_codecs() {
        let s = select_format(Some("audio/webm;codecs=opus"));
        assert_eq!(s.format, AudioFormat::Webm);
        assert!(!s.defaulted);
    }

    #[test]
    fn test_select_wav_is_explicit_match() {
        let s = select_format(Some("audio/wav"));
        assert_eq!(s.format, AudioFormat::Wav);
        assert!(!s.defaulted);
        assert!(!select_format(Some("audio/x-wave")).defaulted);
    }

    #[test]
    fn test_select_unknown_defaults_and_flags() {
        let s = select_format(Some("audio/ogg"));
        assert_eq!(s.format, DEFAULT_AUDIO_FORMAT);
        assert!(s.defaulted);
    }

    #[test]
    fn test_select_missing_defaults_and_flags() {
        let s = select_format(None);
        assert_eq!(s.format, AudioFormat::Wav);
        assert!(s.defaulted);
    }

    #[test]
    fn test_select_is_case_insensitive() {
        assert_eq!(select_format(Some("AUDIO/WEBM")).format, AudioFormat::Webm);
    }

    #[test]
    fn test_sniff_known_headers() {
        assert_eq!(sniff_format(b"RIFF\x24\x00\x00\x00WAVEfmt "), Some(AudioFormat::Wav));
        assert_eq!(sniff_format(&[0x1A, 0x45, 0xDF, 0xA3, 0x01]), Some(AudioFormat::Webm));
        assert_eq!(sniff_format(b"ID3\x04\x00"), Some(AudioFormat::Mp3));
        assert_eq!(sniff_format(&[0xFF, 0xFB, 0x90, 0x00]), Some(AudioFormat::Mp3));
    }

    #[test]
    fn test_sniff_unknown() {
        assert_eq!(sniff_format(b"OggS\x00\x02"), None);
        assert_eq!(sniff_format(&[]), None);
    }
}
