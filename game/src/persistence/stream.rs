/// Fixed width little-endian value that can travel through a record stream.
pub trait Primitive: Sized + Copy {
    const SIZE: usize;

    fn read_from(bytes: &[u8]) -> Self;

    fn write_to(self, buffer: &mut Vec<u8>);
}

macro_rules! primitive {
    ($($ty:ty),*) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn read_from(bytes: &[u8]) -> Self {
                    let mut raw = [0; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }

                #[inline]
                fn write_to(self, buffer: &mut Vec<u8>) {
                    buffer.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

primitive!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Forward-only reader over a stored record.
pub struct PropStream<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> PropStream<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Reads the next value. On a short buffer nothing is consumed.
    pub fn read<T: Primitive>(&mut self) -> Option<T> {
        if self.remaining() < T::SIZE {
            return None;
        }
        let value = T::read_from(&self.buffer[self.position..]);
        self.position += T::SIZE;
        Some(value)
    }

    /// Reads a `u16` length prefixed UTF-8 string. Nothing is consumed when
    /// the string is truncated or not valid UTF-8.
    pub fn read_string(&mut self) -> Option<String> {
        let start = self.position;
        let length = self.read::<u16>()? as usize;
        if self.remaining() < length {
            self.position = start;
            return None;
        }
        let bytes = &self.buffer[self.position..self.position + length];
        match std::str::from_utf8(bytes) {
            Ok(value) => {
                self.position += length;
                Some(value.to_string())
            }
            Err(_) => {
                self.position = start;
                None
            }
        }
    }
}

/// Growable writer, reused across records with [`PropWriteStream::clear`].
#[derive(Default)]
pub struct PropWriteStream {
    buffer: Vec<u8>,
}

impl PropWriteStream {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn write<T: Primitive>(&mut self, value: T) {
        value.write_to(&mut self.buffer);
    }

    /// Strings longer than `u16::MAX` bytes are written as empty.
    pub fn write_string(&mut self, value: &str) {
        match u16::try_from(value.len()) {
            Ok(length) => {
                self.write(length);
                self.buffer.extend_from_slice(value.as_bytes());
            }
            Err(_) => self.write(0u16),
        }
    }

    /// Empties the stream, keeping its allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
