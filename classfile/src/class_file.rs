use std::io::Cursor;

use indexmap::IndexSet;

use crate::attribute::read_annotations;
use crate::descriptor::object_type_names;
use crate::error::ParseError;
use crate::filter::PackageFilter;
use crate::pool::ConstantPool;
use crate::reader::ClassRead;

const MAGIC: u32 = 0xCAFEBABE;

const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

/// One fully-decoded class: what `ClassFileReader::parse` produces for a
/// single byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClass {
	pub name: String,
	pub package_name: String,
	pub is_abstract: bool,
	pub source_file: String,
	pub imported_packages: IndexSet<String>,
	pub minor_version: u16,
	pub major_version: u16,
}

/// A raw attribute: `(name, body bytes)`, both class-level and member-level.
/// `RuntimeVisibleAnnotations` bodies are stashed here and walked in post-pass 2,
/// once every constant pool entry and the class's own package are known.
struct RawAttribute {
	name: String,
	body: Vec<u8>,
}

/// Decodes one class file, extracting every package this class depends on
/// (after `filter`), but nothing about its methods' bodies or its fields'
/// values.
pub fn parse(reader: &mut impl ClassRead, filter: &PackageFilter) -> Result<ParsedClass, ParseError> {
	let magic = reader.read_u32()?;
	if magic != MAGIC {
		return Err(ParseError::InvalidClassFile { found: magic });
	}

	let minor_version = reader.read_u16()?;
	let major_version = reader.read_u16()?;

	let pool = ConstantPool::read(reader)?;

	let access_flags = reader.read_u16()?;
	let is_abstract = access_flags & ACC_ABSTRACT != 0 || access_flags & ACC_INTERFACE != 0;

	let this_class_index = reader.read_u16()?;
	let name = pool.get_class_name(this_class_index)?;
	let package_name = package_of(&name);

	let mut imports = IndexSet::new();
	let mut pending_annotations = Vec::new();

	// A super_class of 0 is only valid for java.lang.Object itself (and
	// module-info classes), which have no superclass to import.
	let super_class_index = reader.read_u16()?;
	if super_class_index != 0 {
		let super_class_name = pool.get_class_name(super_class_index)?;
		add_import(&super_class_name, filter, &package_name, &mut imports);
	}

	let interfaces_count = reader.read_u16_as_usize()?;
	for _ in 0..interfaces_count {
		let interface_index = reader.read_u16()?;
		let interface_name = pool.get_class_name(interface_index)?;
		add_import(&interface_name, filter, &package_name, &mut imports);
	}

	read_members(reader, &pool, filter, &package_name, &mut imports, &mut pending_annotations)?; // fields
	read_members(reader, &pool, filter, &package_name, &mut imports, &mut pending_annotations)?; // methods

	let mut source_file = String::from("Unknown");
	let class_attributes = read_attributes(reader, &pool)?;
	for attribute in class_attributes {
		match attribute.name.as_str() {
			"SourceFile" => {
				let index = Cursor::new(&attribute.body).read_u16()?;
				source_file = pool.get_utf8(index)?.to_owned();
			}
			"RuntimeVisibleAnnotations" => pending_annotations.push(attribute.body),
			_ => {}
		}
	}

	// Post-pass 1: every raw CLASS constant, picking up references buried in bytecode.
	for class_name in pool.all_class_names() {
		add_import(&class_name?, filter, &package_name, &mut imports);
	}

	// Post-pass 2: every retained RuntimeVisibleAnnotations body, class- and member-level alike.
	for body in &pending_annotations {
		let mut names = Vec::new();
		read_annotations(&mut Cursor::new(body), &pool, &mut names)?;
		for class_name in names {
			add_import(&class_name, filter, &package_name, &mut imports);
		}
	}

	Ok(ParsedClass {
		name,
		package_name,
		is_abstract,
		source_file,
		imported_packages: imports,
		minor_version,
		major_version,
	})
}

/// Reads one field or method table: `u2 count` then, per entry,
/// `(access_flags u2, name_index u2, descriptor_index u2, attributes)`.
/// Descriptor object types are added as imports immediately; any
/// `RuntimeVisibleAnnotations` attribute on the member is queued for post-pass 2.
fn read_members(
	reader: &mut impl ClassRead,
	pool: &ConstantPool,
	filter: &PackageFilter,
	package_name: &str,
	imports: &mut IndexSet<String>,
	pending_annotations: &mut Vec<Vec<u8>>,
) -> Result<(), ParseError> {
	let count = reader.read_u16_as_usize()?;
	for _ in 0..count {
		let _access_flags = reader.read_u16()?;
		let _name_index = reader.read_u16()?;
		let descriptor_index = reader.read_u16()?;
		let descriptor = pool.get_utf8(descriptor_index)?;
		for class_name in object_type_names(descriptor) {
			add_import(&class_name, filter, package_name, imports);
		}

		for attribute in read_attributes(reader, pool)? {
			if attribute.name == "RuntimeVisibleAnnotations" {
				pending_annotations.push(attribute.body);
			}
		}
	}
	Ok(())
}

/// Reads an attribute table: `u2 count` then, per entry,
/// `(name_index u2, length u4, bytes[length])`.
fn read_attributes(reader: &mut impl ClassRead, pool: &ConstantPool) -> Result<Vec<RawAttribute>, ParseError> {
	let count = reader.read_u16_as_usize()?;
	let mut attributes = Vec::with_capacity(count);
	for _ in 0..count {
		let name_index = reader.read_u16()?;
		let name = pool.get_utf8(name_index)?.to_owned();
		let length = reader.read_u32()? as usize;
		let body = reader.read_u8_vec(length)?;
		attributes.push(RawAttribute { name, body });
	}
	Ok(attributes)
}

/// Splits a dotted class name at its last `.`; everything before it is the
/// package name. A name with no `.` belongs to the unnamed ("Default") package.
fn package_of(class_name: &str) -> String {
	match class_name.rfind('.') {
		Some(index) => class_name[..index].to_owned(),
		None => String::from("Default"),
	}
}

/// Offers `class_name`'s package to `filter`; records it as an import unless
/// rejected or equal to `self_package` (a class never depends on its own package).
fn add_import(class_name: &str, filter: &PackageFilter, self_package: &str, imports: &mut IndexSet<String>) {
	let package = package_of(class_name);
	if filter.accept(&package) && package != self_package {
		imports.insert(package);
	}
}
