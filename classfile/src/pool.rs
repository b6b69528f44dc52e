use crate::error::ParseError;
use crate::reader::ClassRead;

/// Tag bytes for the constant pool entries this reader understands (JVMS §4.4).
mod tag {
	pub(crate) const UTF8: u8 = 1;
	pub(crate) const INTEGER: u8 = 3;
	pub(crate) const FLOAT: u8 = 4;
	pub(crate) const LONG: u8 = 5;
	pub(crate) const DOUBLE: u8 = 6;
	pub(crate) const CLASS: u8 = 7;
	pub(crate) const STRING: u8 = 8;
	pub(crate) const FIELDREF: u8 = 9;
	pub(crate) const METHODREF: u8 = 10;
	pub(crate) const INTERFACE_METHODREF: u8 = 11;
	pub(crate) const NAME_AND_TYPE: u8 = 12;
	pub(crate) const METHOD_HANDLE: u8 = 15;
	pub(crate) const METHOD_TYPE: u8 = 16;
	pub(crate) const INVOKE_DYNAMIC: u8 = 18;
}

/// One constant pool entry, keeping only the data this reader ever consults.
///
/// Entries this tool never inspects the payload of (`Integer`, `Float`,
/// `String`, the `*ref` family, `NameAndType`, `MethodHandle`, `MethodType`,
/// `InvokeDynamic`) are kept only so that indices into them are valid and
/// their tag is known; their bytes are still fully consumed while reading so
/// that the cursor stays aligned for the next entry.
#[derive(Debug)]
pub(crate) enum ConstantPoolEntry {
	Utf8(String),
	Class { name_index: u16 },
	LongOrDouble,
	Other { tag: u8 },
}

/// A fully-read constant pool, 1-indexed as in the class file itself.
///
/// Index `0` and the second half of any `Long`/`Double` entry hold `None`.
pub(crate) struct ConstantPool {
	entries: Vec<Option<ConstantPoolEntry>>,
}

impl ConstantPool {
	pub(crate) fn read(reader: &mut impl ClassRead) -> Result<ConstantPool, ParseError> {
		let count = reader.read_u16()?;
		let mut entries: Vec<Option<ConstantPoolEntry>> = Vec::with_capacity(count as usize);
		entries.push(None); // index 0 is reserved

		let mut index = 1u16;
		while index < count {
			let tag = reader.read_u8()?;
			let entry = match tag {
				tag::UTF8 => {
					let len = reader.read_u16_as_usize()?;
					let bytes = reader.read_u8_vec(len)?;
					let string = crate::mutf8::decode(&bytes)
						.ok_or(ParseError::NotUtf8 { index, actual_tag: tag::UTF8 })?;
					ConstantPoolEntry::Utf8(string)
				}
				tag::INTEGER | tag::FLOAT => {
					reader.skip(4)?;
					ConstantPoolEntry::Other { tag }
				}
				tag::LONG | tag::DOUBLE => {
					reader.skip(8)?;
					entries.push(Some(ConstantPoolEntry::LongOrDouble));
					entries.push(None); // the second, unusable slot
					index += 2;
					continue;
				}
				tag::CLASS => {
					let name_index = reader.read_u16()?;
					ConstantPoolEntry::Class { name_index }
				}
				tag::STRING => {
					reader.skip(2)?;
					ConstantPoolEntry::Other { tag }
				}
				tag::FIELDREF | tag::METHODREF | tag::INTERFACE_METHODREF | tag::NAME_AND_TYPE | tag::INVOKE_DYNAMIC => {
					reader.skip(4)?;
					ConstantPoolEntry::Other { tag }
				}
				tag::METHOD_HANDLE => {
					reader.skip(1 + 2)?;
					ConstantPoolEntry::Other { tag }
				}
				tag::METHOD_TYPE => {
					reader.skip(2)?;
					ConstantPoolEntry::Other { tag }
				}
				other => return Err(ParseError::UnknownConstant { tag: other, index }),
			};

			entries.push(Some(entry));
			index += 1;
		}

		Ok(ConstantPool { entries })
	}

	fn pool_count(&self) -> u16 {
		self.entries.len() as u16
	}

	fn get(&self, index: u16) -> Result<&ConstantPoolEntry, ParseError> {
		self.entries.get(index as usize)
			.and_then(|slot| slot.as_ref())
			.ok_or(ParseError::ConstantPoolIndexOutOfRange { index, pool_count: self.pool_count() })
	}

	pub(crate) fn get_utf8(&self, index: u16) -> Result<&str, ParseError> {
		match self.get(index)? {
			ConstantPoolEntry::Utf8(s) => Ok(s.as_str()),
			other => Err(ParseError::NotUtf8 { index, actual_tag: other.tag() }),
		}
	}

	/// Resolves a `CONSTANT_Class` entry at `index` into its dotted (`.`-separated) name.
	pub(crate) fn get_class_name(&self, index: u16) -> Result<String, ParseError> {
		match self.get(index)? {
			ConstantPoolEntry::Class { name_index } => {
				let internal = self.get_utf8(*name_index)?;
				Ok(internal.replace('/', "."))
			}
			other => Err(ParseError::NotUtf8 { index, actual_tag: other.tag() }),
		}
	}

	/// All `CONSTANT_Class` entries in the pool, in index order. Used for the
	/// raw constant-pool sweep that picks up references buried in bytecode
	/// without parsing any instructions.
	pub(crate) fn all_class_names(&self) -> impl Iterator<Item = Result<String, ParseError>> + '_ {
		self.entries.iter().enumerate().filter_map(|(index, slot)| match slot {
			Some(ConstantPoolEntry::Class { .. }) => Some(self.get_class_name(index as u16)),
			_ => None,
		})
	}
}

impl ConstantPoolEntry {
	fn tag(&self) -> u8 {
		match self {
			ConstantPoolEntry::Utf8(_) => tag::UTF8,
			ConstantPoolEntry::Class { .. } => tag::CLASS,
			ConstantPoolEntry::LongOrDouble => tag::LONG,
			ConstantPoolEntry::Other { tag } => *tag,
		}
	}
}
