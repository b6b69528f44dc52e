use std::fmt::{Display, Formatter};

/// The "ParseError" kind of the error taxonomy: failures local to a single class file.
///
/// None of these are fatal to the enclosing analysis: the caller skips the
/// offending class and moves on to the next one.
#[derive(Debug)]
pub enum ParseError {
	/// The four-byte magic word wasn't `0xCAFEBABE`.
	InvalidClassFile { found: u32 },
	/// A constant pool entry had a tag byte this reader doesn't know how to decode.
	UnknownConstant { tag: u8, index: u16 },
	/// The input ended before a structure that was declared (by a preceding count/length) finished.
	TruncatedInput { context: String },
	/// A constant pool index pointed outside `1..pool_count`, or at the second half of a long/double.
	ConstantPoolIndexOutOfRange { index: u16, pool_count: u16 },
	/// A constant pool entry was read as UTF8 but the entry at that index has a different tag.
	NotUtf8 { index: u16, actual_tag: u8 },
}

impl Display for ParseError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ParseError::InvalidClassFile { found } =>
				write!(f, "not a class file: magic was {found:#010x}, expected 0xcafebabe"),
			ParseError::UnknownConstant { tag, index } =>
				write!(f, "unknown constant pool tag {tag} at index {index}"),
			ParseError::TruncatedInput { context } =>
				write!(f, "unexpected end of input while reading {context}"),
			ParseError::ConstantPoolIndexOutOfRange { index, pool_count } =>
				write!(f, "constant pool index {index} out of range (pool has {pool_count} entries)"),
			ParseError::NotUtf8 { index, actual_tag } =>
				write!(f, "constant pool entry {index} is not UTF8 (found tag {actual_tag})"),
		}
	}
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
	fn from(e: std::io::Error) -> Self {
		ParseError::TruncatedInput { context: e.to_string() }
	}
}
