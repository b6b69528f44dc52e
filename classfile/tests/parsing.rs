//! End-to-end tests against hand-assembled class file bytes. Each builder
//! writes out just enough of the wire format (JVMS §4.1) to exercise one
//! behavior; nothing here goes through a real compiler.

use classfile::PackageFilter;
use pretty_assertions::assert_eq;

/// Accumulates class file bytes in wire order.
struct ClassBuilder {
	bytes: Vec<u8>,
}

impl ClassBuilder {
	fn new() -> Self {
		ClassBuilder { bytes: Vec::new() }
	}

	fn u8(&mut self, v: u8) -> &mut Self {
		self.bytes.push(v);
		self
	}

	fn u16(&mut self, v: u16) -> &mut Self {
		self.bytes.extend_from_slice(&v.to_be_bytes());
		self
	}

	fn u32(&mut self, v: u32) -> &mut Self {
		self.bytes.extend_from_slice(&v.to_be_bytes());
		self
	}

	fn raw(&mut self, v: &[u8]) -> &mut Self {
		self.bytes.extend_from_slice(v);
		self
	}

	fn utf8_entry(&mut self, s: &str) -> &mut Self {
		self.u8(1).u16(s.len() as u16).raw(s.as_bytes())
	}

	fn class_entry(&mut self, name_index: u16) -> &mut Self {
		self.u8(7).u16(name_index)
	}
}

/// Builds a minimal valid class `a.X extends java.lang.Object`, with a
/// `SourceFile` attribute of `"X.java"`, no fields, methods or interfaces.
fn minimal_class() -> Vec<u8> {
	let mut b = ClassBuilder::new();
	b.u32(0xCAFEBABE).u16(0).u16(61); // magic, minor, major

	b.u16(7); // constant_pool_count (7 == highest index 6 + 1)
	b.utf8_entry("a/X");           // #1
	b.class_entry(1);              // #2 this_class
	b.utf8_entry("java/lang/Object"); // #3
	b.class_entry(3);              // #4 super_class
	b.utf8_entry("SourceFile");    // #5
	b.utf8_entry("X.java");        // #6

	b.u16(0);    // access_flags
	b.u16(2);    // this_class
	b.u16(4);    // super_class
	b.u16(0);    // interfaces_count
	b.u16(0);    // fields_count
	b.u16(0);    // methods_count

	b.u16(1);    // attributes_count
	b.u16(5);    // attribute name_index ("SourceFile")
	b.u32(2);    // attribute_length
	b.u16(6);    // sourcefile_index

	b.bytes
}

#[test]
fn parses_minimal_class_and_resolves_source_file() {
	let bytes = minimal_class();
	let mut cursor = std::io::Cursor::new(bytes);
	let filter = PackageFilter::accept_all();

	let parsed = classfile::parse(&mut cursor, &filter).expect("minimal class should parse");

	assert_eq!(parsed.name, "a.X");
	assert_eq!(parsed.package_name, "a");
	assert_eq!(parsed.is_abstract, false);
	assert_eq!(parsed.source_file, "X.java");
	assert!(parsed.imported_packages.contains("java.lang"));
}

#[test]
fn filtered_package_is_not_imported() {
	let bytes = minimal_class();
	let mut cursor = std::io::Cursor::new(bytes);
	let filter = PackageFilter::new(["java."]);

	let parsed = classfile::parse(&mut cursor, &filter).expect("minimal class should parse");

	assert!(!parsed.imported_packages.contains("java.lang"));
}

#[test]
fn bad_magic_fails_without_reading_further() {
	let mut b = ClassBuilder::new();
	b.u32(0xDEADBEEF).u16(0).u16(61);

	let mut cursor = std::io::Cursor::new(b.bytes);
	let filter = PackageFilter::accept_all();

	let err = classfile::parse(&mut cursor, &filter).expect_err("bad magic must fail");
	match err {
		classfile::ParseError::InvalidClassFile { found } => assert_eq!(found, 0xDEADBEEF),
		other => panic!("expected InvalidClassFile, got {other:?}"),
	}
	assert_eq!(cursor.position(), 4, "parser must not read past the magic on failure");
}

#[test]
fn long_constant_reserves_the_next_index() {
	let mut b = ClassBuilder::new();
	b.u32(0xCAFEBABE).u16(0).u16(61);

	// 6 logical entries, but the Long at #3 consumes #3 and #4, so the
	// class entry referencing "a/X" ends up at #6, and pool_count must be 7.
	b.u16(7);
	b.utf8_entry("a/X");             // #1
	b.class_entry(1);                // #2 this_class
	b.u8(5).raw(&0i64.to_be_bytes()); // #3 LONG (reserves #4)
	b.utf8_entry("java/lang/Object"); // #5
	b.class_entry(5);                // #6 super_class

	b.u16(0);  // access_flags
	b.u16(2);  // this_class
	b.u16(6);  // super_class
	b.u16(0);  // interfaces_count
	b.u16(0);  // fields_count
	b.u16(0);  // methods_count
	b.u16(0);  // attributes_count

	let mut cursor = std::io::Cursor::new(b.bytes);
	let filter = PackageFilter::accept_all();

	let parsed = classfile::parse(&mut cursor, &filter).expect("class with a long constant should parse");
	assert_eq!(parsed.name, "a.X");
	assert!(parsed.imported_packages.contains("java.lang"));
}

#[test]
fn zero_super_class_parses_without_an_import() {
	// java/lang/Object (and module-info classes) carry a super_class of 0.
	let mut b = ClassBuilder::new();
	b.u32(0xCAFEBABE).u16(0).u16(61);

	b.u16(2);
	b.utf8_entry("java/lang/Object"); // #1
	b.class_entry(1);                 // #2 this_class

	b.u16(0);  // access_flags
	b.u16(2);  // this_class
	b.u16(0);  // super_class
	b.u16(0);  // interfaces_count
	b.u16(0);  // fields_count
	b.u16(0);  // methods_count
	b.u16(0);  // attributes_count

	let mut cursor = std::io::Cursor::new(b.bytes);
	let filter = PackageFilter::accept_all();

	let parsed = classfile::parse(&mut cursor, &filter).expect("zero super_class should parse");
	assert_eq!(parsed.name, "java.lang.Object");
	assert!(parsed.imported_packages.is_empty());
}

#[test]
fn interface_is_abstract() {
	let mut b = ClassBuilder::new();
	b.u32(0xCAFEBABE).u16(0).u16(61);

	b.u16(5);
	b.utf8_entry("a/I");              // #1
	b.class_entry(1);                 // #2 this_class
	b.utf8_entry("java/lang/Object"); // #3
	b.class_entry(3);                 // #4 super_class

	const ACC_INTERFACE: u16 = 0x0200;
	const ACC_ABSTRACT: u16 = 0x0400;
	b.u16(ACC_INTERFACE | ACC_ABSTRACT); // access_flags
	b.u16(2);  // this_class
	b.u16(4);  // super_class
	b.u16(0);  // interfaces_count
	b.u16(0);  // fields_count
	b.u16(0);  // methods_count
	b.u16(0);  // attributes_count

	let mut cursor = std::io::Cursor::new(b.bytes);
	let filter = PackageFilter::accept_all();

	let parsed = classfile::parse(&mut cursor, &filter).expect("interface should parse");
	assert!(parsed.is_abstract);
}
