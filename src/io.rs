//! I/O utilities.
use std::io;
use std::io::prelude::*;

/// Combine a read-only stream and a write-only stream into one read-write
/// stream, so a [`StreamServer`](crate::server::StreamServer) can read a
/// canned request and record the response.
pub struct ReadWriteAdapter<R: Read, W: Write> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> ReadWriteAdapter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W: Write> Read for ReadWriteAdapter<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R: Read, W: Write> Write for ReadWriteAdapter<R, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_adapter_read() {
        let data = b"GET / HTTP/1.1\r\n\r\n";
        let mut adapter = ReadWriteAdapter::new(&data[..], vec![]);

        let mut buf = vec![0; 1024];
        let read_size = adapter.read(&mut buf).unwrap();
        assert_eq!(18, read_size);
        assert_eq!(data[..], buf[0..read_size]);
    }

    #[test]
    fn test_adapter_write() {
        let data = b"HTTP/1.1 200 OK\r\n";
        let readbuf: &[u8] = b"";
        let mut adapter = ReadWriteAdapter::new(readbuf, vec![]);
        adapter.write_all(&data[..]).unwrap();
        adapter.flush().unwrap();

        let (_, written) = adapter.into_parts();
        assert_eq!(data[..], written[..]);
    }
}
