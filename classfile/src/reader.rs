use std::io::Read;
use crate::error::ParseError;

/// Big-endian primitive reads over a byte stream containing one class file.
///
/// Grounded on the `ClassRead` trait the teacher project used before it grew
/// a `Seek` bound for lazy bootstrap-method handling: this reader only ever
/// moves forward, since nothing here needs to revisit earlier bytes.
pub(crate) trait ClassRead {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N], ParseError>;

	fn read_u8(&mut self) -> Result<u8, ParseError> {
		Ok(u8::from_be_bytes(self.read_n()?))
	}
	fn read_u16(&mut self) -> Result<u16, ParseError> {
		Ok(u16::from_be_bytes(self.read_n()?))
	}
	fn read_u32(&mut self) -> Result<u32, ParseError> {
		Ok(u32::from_be_bytes(self.read_n()?))
	}
	fn read_i32(&mut self) -> Result<i32, ParseError> {
		Ok(i32::from_be_bytes(self.read_n()?))
	}
	fn read_i64(&mut self) -> Result<i64, ParseError> {
		Ok(i64::from_be_bytes(self.read_n()?))
	}
	fn read_f32(&mut self) -> Result<f32, ParseError> {
		Ok(f32::from_be_bytes(self.read_n()?))
	}
	fn read_f64(&mut self) -> Result<f64, ParseError> {
		Ok(f64::from_be_bytes(self.read_n()?))
	}

	fn read_u16_as_usize(&mut self) -> Result<usize, ParseError> {
		Ok(self.read_u16()? as usize)
	}

	fn read_u8_vec(&mut self, len: usize) -> Result<Vec<u8>, ParseError>;

	fn skip(&mut self, len: usize) -> Result<(), ParseError> {
		self.read_u8_vec(len).map(|_| ())
	}

	fn read_vec<T>(&mut self, mut get_element: impl FnMut(&mut Self) -> Result<T, ParseError>) -> Result<Vec<T>, ParseError> {
		let size = self.read_u16_as_usize()?;
		let mut vec = Vec::with_capacity(size);
		for _ in 0..size {
			vec.push(get_element(self)?);
		}
		Ok(vec)
	}
}

impl<T: Read> ClassRead for T {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
		let mut buf = [0u8; N];
		self.read_exact(&mut buf).map_err(|_| ParseError::TruncatedInput {
			context: format!("{N} bytes"),
		})?;
		Ok(buf)
	}

	fn read_u8_vec(&mut self, len: usize) -> Result<Vec<u8>, ParseError> {
		let mut buf = vec![0u8; len];
		self.read_exact(&mut buf).map_err(|_| ParseError::TruncatedInput {
			context: format!("{len} raw bytes"),
		})?;
		Ok(buf)
	}
}
