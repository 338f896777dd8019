#[allow( dead_code )]
mod class_stub {

    /// Encodes a minimal class file: a constant pool naming the class, its superclass and
    /// one `init()V` method reference per call target, then an empty class body.
    pub fn encode( name: &str, super_name: Option<&str>, init_calls: &[&str] ) -> Vec<u8> {

        let mut pool = Pool { bytes: Vec::new(), next: 1 };
        let this_name = pool.utf8( &name.replace( '.', "/" ));
        let this_class = pool.class( this_name );
        let super_class = super_name.map(| super_name | {
            let super_utf8 = pool.utf8( &super_name.replace( '.', "/" ));
            pool.class( super_utf8 )
        }).unwrap_or( 0 );
        // takes two slots
        pool.long( 42 );
        for target in init_calls {
            let target_name = pool.utf8( &target.replace( '.', "/" ));
            let target_class = pool.class( target_name );
            let method = pool.utf8( "init" );
            let descriptor = pool.utf8( "()V" );
            let name_and_type = pool.name_and_type( method, descriptor );
            pool.methodref( target_class, name_and_type );
        }

        let mut bytes = Vec::new();
        bytes.extend_from_slice( &0xCAFE_BABE_u32.to_be_bytes() );
        bytes.extend_from_slice( &0_u16.to_be_bytes() );
        bytes.extend_from_slice( &52_u16.to_be_bytes() );
        bytes.extend_from_slice( &pool.next.to_be_bytes() );
        bytes.extend_from_slice( &pool.bytes );
        for value in [ 0x0021, this_class, super_class, 0, 0, 0, 0 ] {
            bytes.extend_from_slice( &u16::to_be_bytes( value ));
        }
        bytes

    }

    struct Pool {
        bytes: Vec<u8>,
        next: u16,
    }

    impl Pool {

        fn push( &mut self, tag: u8, payload: &[u8], slots: u16 ) -> u16 {
            let index = self.next ;
            self.bytes.push( tag );
            self.bytes.extend_from_slice( payload );
            self.next += slots ;
            index
        }

        fn utf8( &mut self, text: &str ) -> u16 {
            let mut payload = u16::try_from( text.len() ).expect( "utf8 constant too long" ).to_be_bytes().to_vec();
            payload.extend_from_slice( text.as_bytes() );
            self.push( 1, &payload, 1 )
        }

        fn class( &mut self, name: u16 ) -> u16 { self.push( 7, &name.to_be_bytes(), 1 )}

        fn long( &mut self, value: i64 ) -> u16 { self.push( 5, &value.to_be_bytes(), 2 )}

        fn name_and_type( &mut self, name: u16, descriptor: u16 ) -> u16 {
            self.push( 12, &[ name.to_be_bytes(), descriptor.to_be_bytes() ].concat(), 1 )
        }

        fn methodref( &mut self, class: u16, name_and_type: u16 ) -> u16 {
            self.push( 10, &[ class.to_be_bytes(), name_and_type.to_be_bytes() ].concat(), 1 )
        }

    }

}
