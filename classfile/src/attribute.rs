//! Parses the recursive `RuntimeVisibleAnnotations` attribute body (JVMS §4.7.16)
//! far enough to pull out every referenced type's package, without modeling
//! annotation values otherwise. This is "post-pass 2" of the source design:
//! walking every retained annotations attribute, class-level and member-level
//! alike, after the rest of the class has been read.

use crate::descriptor::object_type_names;
use crate::error::ParseError;
use crate::pool::ConstantPool;
use crate::reader::ClassRead;

/// Reads a `RuntimeVisibleAnnotations` attribute body, appending every
/// referenced type's dotted class name to `imports`.
pub(crate) fn read_annotations(reader: &mut impl ClassRead, pool: &ConstantPool, imports: &mut Vec<String>) -> Result<(), ParseError> {
	let num_annotations = reader.read_u16_as_usize()?;
	for _ in 0..num_annotations {
		read_annotation(reader, pool, imports)?;
	}
	Ok(())
}

/// Reads one `annotation` structure: `u2 type_index; u2 num_element_value_pairs; pairs[]`.
fn read_annotation(reader: &mut impl ClassRead, pool: &ConstantPool, imports: &mut Vec<String>) -> Result<(), ParseError> {
	let type_index = reader.read_u16()?;
	let annotation_descriptor = pool.get_utf8(type_index)?;
	imports.extend(object_type_names(annotation_descriptor));

	let num_pairs = reader.read_u16_as_usize()?;
	for _ in 0..num_pairs {
		let _name_index = reader.read_u16()?; // the element's name; not needed for package extraction
		read_element_value(reader, pool, imports)?;
	}

	Ok(())
}

/// Reads one `element_value`, recursing into nested annotations and arrays.
fn read_element_value(reader: &mut impl ClassRead, pool: &ConstantPool, imports: &mut Vec<String>) -> Result<(), ParseError> {
	let tag = reader.read_u8()?;
	match tag {
		b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => {
			reader.skip(2)?; // a constant-pool index; no package reference here
		}
		b'e' => {
			let type_name_index = reader.read_u16()?;
			let _const_name_index = reader.read_u16()?;
			let enum_type_descriptor = pool.get_utf8(type_name_index)?;
			imports.extend(object_type_names(enum_type_descriptor));
		}
		b'c' => {
			let class_info_index = reader.read_u16()?;
			let class_info = pool.get_utf8(class_info_index)?;
			imports.push(strip_class_info(class_info));
		}
		b'@' => {
			read_annotation(reader, pool, imports)?;
		}
		b'[' => {
			let num_values = reader.read_u16_as_usize()?;
			for _ in 0..num_values {
				read_element_value(reader, pool, imports)?;
			}
		}
		other => return Err(ParseError::UnknownConstant { tag: other, index: 0 }),
	}
	Ok(())
}

/// A `c` element value's class-info string is the internal-form class name,
/// optionally wrapped the way a field descriptor would be (`L...;`). Strips
/// either form down to the bare dotted class name.
fn strip_class_info(class_info: &str) -> String {
	let inner = class_info
		.strip_prefix('L')
		.map(|rest| rest.strip_suffix(';').unwrap_or(rest))
		.unwrap_or(class_info);

	inner.replace('/', ".")
}
