//! Just enough of the class-file format to drive resolution.
//!
//! [`parse`] walks the constant pool of a compiled unit and extracts the unit's
//! own name, its superclass and every `init()V` method it references. Nothing
//! past the `super_class` index is read.

use thiserror::Error ;



const MAGIC: u32 = 0xCAFE_BABE ;

#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum ClassFileError {
	#[error( "Bad magic number {0:#010x}" )]
	BadMagic( u32 ),
	#[error( "Unexpected end of class file at offset {0}" )]
	Truncated( usize ),
	#[error( "Unknown constant pool tag {tag} at index {index}" )]
	UnknownTag { tag: u8, index: u16 },
	#[error( "Constant pool index {0} does not point to the expected entry" )]
	BadIndex( u16 ),
}

/// What resolution needs to know about a compiled unit. Names are dotted.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct UnitInfo {
	pub name: String,
	pub super_name: Option<String>,
	/// Owners of every `init()V` method referenced by the unit, in constant pool order,
	/// without duplicates.
	pub init_calls: Vec<String>,
}

#[derive( Debug, Clone )]
enum Constant {
	Utf8( String ),
	Class( u16 ),
	Methodref { class: u16, name_and_type: u16 },
	NameAndType { name: u16, descriptor: u16 },
	Other,
	Unusable,
}

struct Reader<'a> {
	bytes: &'a [u8],
	offset: usize,
}

impl<'a> Reader<'a> {

	fn take( &mut self, len: usize ) -> Result<&'a [u8], ClassFileError> {
		let slice = self.bytes.get( self.offset..self.offset + len ).ok_or( ClassFileError::Truncated( self.offset ))?;
		self.offset += len ;
		Ok( slice )
	}

	fn u8( &mut self ) -> Result<u8, ClassFileError> { Ok( self.take( 1 )?[0] )}
	fn u16( &mut self ) -> Result<u16, ClassFileError> { let b = self.take( 2 )?; Ok( u16::from_be_bytes([ b[0], b[1] ]))}
	fn u32( &mut self ) -> Result<u32, ClassFileError> { let b = self.take( 4 )?; Ok( u32::from_be_bytes([ b[0], b[1], b[2], b[3] ]))}

}

/// Decodes the header and constant pool of a class file.
///
/// # Errors
/// Fails on a wrong magic number, truncated input, an unknown constant tag, or
/// `this_class`/`super_class` indices that don't name classes.
pub fn parse( bytes: &[u8] ) -> Result<UnitInfo, ClassFileError> {

	let mut reader = Reader { bytes, offset: 0 };
	let magic = reader.u32()?;
	if magic != MAGIC { return Err( ClassFileError::BadMagic( magic )) }
	let _minor = reader.u16()?;
	let _major = reader.u16()?;

	let count = reader.u16()?;
	let mut pool = vec![ Constant::Unusable ];
	while pool.len() < usize::from( count ) {
		let index = u16::try_from( pool.len() ).unwrap_or( u16::MAX );
		let tag = reader.u8()?;
		let constant = match tag {
			1 => {
				let len = reader.u16()?;
				Constant::Utf8( String::from_utf8_lossy( reader.take( usize::from( len ))? ).into_owned() )
			}
			7 => Constant::Class( reader.u16()? ),
			10 => Constant::Methodref { class: reader.u16()?, name_and_type: reader.u16()? },
			12 => Constant::NameAndType { name: reader.u16()?, descriptor: reader.u16()? },
			3 | 4 | 9 | 11 | 18 | 17 => { reader.take( 4 )?; Constant::Other }
			8 | 16 | 19 | 20 => { reader.take( 2 )?; Constant::Other }
			15 => { reader.take( 3 )?; Constant::Other }
			5 | 6 => { reader.take( 8 )?; pool.push( Constant::Other ); Constant::Unusable }
			tag => return Err( ClassFileError::UnknownTag { tag, index }),
		};
		pool.push( constant );
	}

	let _access = reader.u16()?;
	let this_class = reader.u16()?;
	let super_class = reader.u16()?;

	let name = class_name( &pool, this_class )?;
	let super_name = match super_class {
		0 => None,
		index => Some( class_name( &pool, index )?),
	};

	let mut init_calls: Vec<String> = Vec::new();
	for constant in &pool {
		let Constant::Methodref { class, name_and_type } = constant else { continue };
		let Some( Constant::NameAndType { name: method, descriptor }) = pool.get( usize::from( *name_and_type )) else { continue };
		if utf8( &pool, *method ) != Some( "init" ) || utf8( &pool, *descriptor ) != Some( "()V" ) { continue }
		let owner = class_name( &pool, *class )?;
		if !init_calls.contains( &owner ) { init_calls.push( owner ); }
	}

	Ok( UnitInfo { name, super_name, init_calls })

}

fn utf8( pool: &[Constant], index: u16 ) -> Option<&str> {
	match pool.get( usize::from( index )) {
		Some( Constant::Utf8( text )) => Some( text ),
		_ => None,
	}
}

fn class_name( pool: &[Constant], index: u16 ) -> Result<String, ClassFileError> {
	match pool.get( usize::from( index )) {
		Some( Constant::Class( name )) => utf8( pool, *name )
			.map(| name | name.replace( '/', "." ))
			.ok_or( ClassFileError::BadIndex( *name )),
		_ => Err( ClassFileError::BadIndex( index )),
	}
}
