use std::io::{self, Read};

use super::header::{Header, HEADER_LEN};
use crate::cell::codec::{CellInfo, CELL_BYTES};
use crate::{Result, VideoError};

/// Number of whole frames in a stream of `total_len` bytes.
pub fn frame_count_from_len(total_len: u64, header: &Header) -> u64 {
    let frame_len = header.frame_len() as u64;
    if frame_len == 0 {
        return 0;
    }
    total_len.saturating_sub(HEADER_LEN as u64) / frame_len
}

/// Decodes a stream back into frames of cells.
#[derive(Debug)]
pub struct StreamReader<R: Read> {
    source: R,
    header: Header,
    buffer: Vec<u8>,
}

impl<R: Read> StreamReader<R> {
    pub fn new(mut source: R) -> Result<Self> {
        let mut bytes = [0; HEADER_LEN];
        match read_full(&mut source, &mut bytes)? {
            HEADER_LEN => {},
            _ => return Err(VideoError::TruncatedHeader),
        }

        let header = Header::parse(bytes);
        Ok(Self { source, header, buffer: vec![0; header.frame_len()] })
    }

    pub fn info(&self) -> Header {
        self.header
    }

    /// Next frame in row-major order, or `None` at a clean end of stream.
    pub fn next_frame(&mut self) -> Result<Option<Vec<CellInfo>>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match read_full(&mut self.source, &mut self.buffer)? {
            0 => Ok(None),
            n if n < self.buffer.len() => Err(VideoError::TruncatedFrame),
            _ => Ok(Some(
                self.buffer
                    .chunks_exact(CELL_BYTES)
                    .map(|chunk| {
                        CellInfo::decode([chunk[0], chunk[1], chunk[2], chunk[3], chunk[4]])
                    })
                    .collect(),
            )),
        }
    }
}

impl<R: Read> Iterator for StreamReader<R> {
    type Item = Result<Vec<CellInfo>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Fill `buf` as far as the source allows; returns the bytes read.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::cell::codec::{encode, Color};
    use crate::settings::Fps;

    fn stream(frames: usize, trailing: &[u8]) -> Vec<u8> {
        let header = Header { width: 2, height: 1, fps: Fps::new(25, 1) };
        let mut bytes = header.to_bytes().to_vec();
        for frame in 0..frames {
            bytes.extend(encode(frame as u32, 32, 0, u32::from('#')).unwrap());
            bytes.extend(encode(32, 7, 1, u32::from('é')).unwrap());
        }
        bytes.extend_from_slice(trailing);
        bytes
    }

    #[test]
    fn reads_header_and_frames() {
        let mut reader = StreamReader::new(Cursor::new(stream(2, &[]))).unwrap();
        assert_eq!(reader.info().fps, Fps::new(25, 1));

        let first = reader.next_frame().unwrap().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].foreground, Color::Indexed(0));
        assert_eq!(first[1].background, Color::Indexed(7));
        assert_eq!(first[1].glyph(), Some('é'));

        let second = reader.next_frame().unwrap().unwrap();
        assert_eq!(second[0].foreground, Color::Indexed(1));
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn iterates_until_end_of_stream() {
        let reader = StreamReader::new(Cursor::new(stream(3, &[]))).unwrap();
        assert_eq!(reader.map(|frame| frame.unwrap()).count(), 3);
    }

    #[test]
    fn truncation_is_reported() {
        assert!(matches!(
            StreamReader::new(Cursor::new(vec![1, 0, 1])),
            Err(VideoError::TruncatedHeader)
        ));

        let mut reader = StreamReader::new(Cursor::new(stream(1, &[0, 0, 0]))).unwrap();
        assert!(reader.next_frame().unwrap().is_some());
        assert!(matches!(reader.next_frame(), Err(VideoError::TruncatedFrame)));
    }

    #[test]
    fn frame_count_ignores_partial_tail() {
        let header = Header { width: 2, height: 1, fps: Fps::UNSPECIFIED };
        assert_eq!(frame_count_from_len(6 + 30, &header), 3);
        assert_eq!(frame_count_from_len(6 + 34, &header), 3);
        assert_eq!(frame_count_from_len(3, &header), 0);
    }
}
