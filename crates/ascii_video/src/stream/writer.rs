use std::io::Write;

use log::debug;

use super::header::Header;
use crate::settings::Settings;
use crate::{Result, VideoError};

/// Appends a header and then fixed-size frames to a sink.
///
/// Frames carry no delimiter or count; readers derive both from the header
/// and the stream length.
#[derive(Debug)]
pub struct StreamWriter<W: Write> {
    sink: W,
    header: Option<Header>,
    frames_written: usize,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, header: None, frames_written: 0 }
    }

    pub fn write_header(&mut self, settings: &Settings) -> Result<()> {
        if self.header.is_some() {
            return Err(VideoError::HeaderState);
        }

        let header = settings.header();
        self.sink.write_all(&header.to_bytes())?;
        debug!("wrote header {:?}", header);
        self.header = Some(header);
        Ok(())
    }

    /// Copy one frame out of the encoder's buffer into the sink.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let header = self.header.ok_or(VideoError::HeaderState)?;
        let expected = header.frame_len();
        if frame.len() != expected {
            return Err(VideoError::FrameLength { expected, found: frame.len() });
        }

        self.sink.write_all(frame)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::settings::Fps;

    fn settings() -> Settings {
        Settings::new((4, 2), (2, 1), Fps::new(30, 1), false).unwrap()
    }

    #[test]
    fn frames_follow_the_header_without_delimiters() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.write_header(&settings()).unwrap();
        writer.write_frame(&[1; 10]).unwrap();
        writer.write_frame(&[2; 10]).unwrap();
        assert_eq!(writer.frames_written(), 2);

        let bytes = writer.into_inner().unwrap();
        let mut expected: Vec<u8> = vec![2, 0, 1, 0, 30, 1];
        expected.extend([1; 10]);
        expected.extend([2; 10]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn header_must_come_first_and_once() {
        let mut writer = StreamWriter::new(Vec::new());
        assert!(matches!(writer.write_frame(&[0; 10]), Err(VideoError::HeaderState)));
        writer.write_header(&settings()).unwrap();
        assert!(matches!(writer.write_header(&settings()), Err(VideoError::HeaderState)));
    }

    #[test]
    fn frames_of_the_wrong_size_are_rejected() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.write_header(&settings()).unwrap();
        assert!(matches!(
            writer.write_frame(&[0; 9]),
            Err(VideoError::FrameLength { expected: 10, found: 9 })
        ));
        assert_eq!(writer.frames_written(), 0);
        assert_eq!(writer.into_inner().unwrap().len(), 6);
    }
}
