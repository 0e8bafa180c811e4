//! Photo creation dates from EXIF.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Tag, Value};

use sortmedia_core::CreationDate;

use crate::temporal::DateSource;
use crate::AnalyzeError;

/// Tags consulted for a creation date, most specific first.
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTime, Tag::DateTimeDigitized];

/// Reads creation dates from EXIF data in JPEG, TIFF, PNG, WebP and HEIF
/// containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifDateSource;

impl ExifDateSource {
    /// Create a new EXIF date source.
    pub fn new() -> Self {
        Self
    }
}

impl DateSource for ExifDateSource {
    fn read_date(&self, path: &Path) -> Result<Option<CreationDate>, AnalyzeError> {
        let file = File::open(path).map_err(|e| AnalyzeError::read(path, e))?;
        let mut reader = BufReader::new(file);

        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(
                exif::Error::NotFound(_)
                | exif::Error::NotSupported(_)
                | exif::Error::BlankValue(_),
            ) => return Ok(None),
            Err(exif::Error::Io(e)) => return Err(AnalyzeError::read(path, e)),
            Err(e) => {
                return Err(AnalyzeError::Exif {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let date = DATE_TAGS.iter().find_map(|&tag| {
            let field = exif.get_field(tag, In::PRIMARY)?;
            match field.value {
                Value::Ascii(ref values) => values.first().and_then(|v| parse_exif_datetime(v)),
                _ => None,
            }
        });

        Ok(date)
    }
}

/// Parse an EXIF `YYYY:MM:DD HH:MM:SS` value.
pub fn parse_exif_datetime(raw: &[u8]) -> Option<CreationDate> {
    let datetime = exif::DateTime::from_ascii(raw).ok()?;
    CreationDate::from_ymd(
        i32::from(datetime.year),
        u32::from(datetime.month),
        u32::from(datetime.day),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Wrap a little-endian TIFF block in a JPEG APP1 segment.
    fn jpeg_with_tiff(tiff: &[u8]) -> Vec<u8> {
        let segment_len = (2 + 6 + tiff.len()) as u16;
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&segment_len.to_be_bytes());
        jpeg.extend_from_slice(b"Exif\x00\x00");
        jpeg.extend_from_slice(tiff);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    fn ifd_entry(tiff: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
        tiff.extend_from_slice(&tag.to_le_bytes());
        tiff.extend_from_slice(&kind.to_le_bytes());
        tiff.extend_from_slice(&count.to_le_bytes());
        tiff.extend_from_slice(&value.to_le_bytes());
    }

    /// Minimal JPEG with one IFD0 `DateTime` entry.
    pub(crate) fn jpeg_with_datetime(datetime: &[u8; 19]) -> Vec<u8> {
        let mut tiff = b"II\x2a\x00".to_vec();
        tiff.extend_from_slice(&8u32.to_le_bytes());
        tiff.extend_from_slice(&1u16.to_le_bytes());
        ifd_entry(&mut tiff, 0x0132, 2, 20, 26);
        tiff.extend_from_slice(&0u32.to_le_bytes());
        tiff.extend_from_slice(datetime);
        tiff.push(0);
        jpeg_with_tiff(&tiff)
    }

    /// JPEG as cameras write it: IFD0 `DateTime` plus `DateTimeOriginal`
    /// in the Exif sub-IFD.
    pub(crate) fn jpeg_with_original(original: &[u8; 19], modified: &[u8; 19]) -> Vec<u8> {
        // IFD0 at 8 (two entries, ends at 38), Exif IFD at 38 (ends at 56),
        // then the two strings.
        let mut tiff = b"II\x2a\x00".to_vec();
        tiff.extend_from_slice(&8u32.to_le_bytes());
        tiff.extend_from_slice(&2u16.to_le_bytes());
        ifd_entry(&mut tiff, 0x0132, 2, 20, 56);
        ifd_entry(&mut tiff, 0x8769, 4, 1, 38);
        tiff.extend_from_slice(&0u32.to_le_bytes());

        tiff.extend_from_slice(&1u16.to_le_bytes());
        ifd_entry(&mut tiff, 0x9003, 2, 20, 76);
        tiff.extend_from_slice(&0u32.to_le_bytes());

        tiff.extend_from_slice(modified);
        tiff.push(0);
        tiff.extend_from_slice(original);
        tiff.push(0);
        jpeg_with_tiff(&tiff)
    }

    #[test]
    fn test_parse_exif_datetime() {
        let date = parse_exif_datetime(b"2099:09:29 10:10:10").unwrap();
        assert_eq!(date.components(), ["2099", "September", "29"]);
    }

    #[test]
    fn test_parse_exif_datetime_rejects_garbage() {
        assert!(parse_exif_datetime(b"not a date").is_none());
        assert!(parse_exif_datetime(b"0000:00:00 00:00:00").is_none());
    }

    #[test]
    fn test_read_date_from_jpeg() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("foobar.jpg");
        fs::write(&path, jpeg_with_datetime(b"2099:09:29 10:10:10")).unwrap();

        let date = ExifDateSource::new().read_date(&path).unwrap().unwrap();
        assert_eq!(date.components(), ["2099", "September", "29"]);
    }

    #[test]
    fn test_original_date_wins_over_modified() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("foobar.jpg");
        fs::write(
            &path,
            jpeg_with_original(b"2099:09:29 10:10:10", b"2101:01:02 03:04:05"),
        )
        .unwrap();

        let date = ExifDateSource::new().read_date(&path).unwrap().unwrap();
        assert_eq!(date.components(), ["2099", "September", "29"]);
    }

    #[test]
    fn test_heic_without_metadata_has_no_date() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lime.heic");
        let mut heic = vec![0x00, 0x00, 0x00, 0x18];
        heic.extend_from_slice(b"ftypheic");
        heic.extend_from_slice(&[0x00; 4]);
        heic.extend_from_slice(b"mif1heic");
        fs::write(&path, heic).unwrap();

        assert_eq!(ExifDateSource::new().read_date(&path).unwrap(), None);
    }

    #[test]
    fn test_read_date_without_exif() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bare.jpg");
        fs::write(&path, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        assert_eq!(ExifDateSource::new().read_date(&path).unwrap(), None);
    }

    #[test]
    fn test_read_date_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = ExifDateSource::new()
            .read_date(&temp.path().join("gone.jpg"))
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Read { .. }));
    }
}
