#[cfg(feature = "arbitrary")]
mod fuzz {
    use arbitrary::{Arbitrary, Unstructured};
    use nbt_core::{binary, snbt, Compound, SizeTracker, Tag, TagFile};

    fn fill_deterministic(buf: &mut [u8], seed: u64) {
        let mut state = seed;
        for byte in buf.iter_mut() {
            // xorshift64*
            state ^= state >> 12;
            state ^= state << 25;
            state ^= state >> 27;
            state = state.wrapping_mul(0x2545_F491_4F6C_DD1D);
            *byte = (state & 0xFF) as u8;
        }
    }

    fn rooted(tag: Tag) -> Compound {
        match tag {
            Tag::Compound(compound) => compound,
            other => {
                let mut root = Compound::new();
                root.put("value", other);
                root
            }
        }
    }

    #[test]
    fn fuzz_snbt_roundtrip() {
        let mut raw_data = [0u8; 1024 * 16];

        for i in 0..128u64 {
            fill_deterministic(&mut raw_data, 0x5EED_1234u64 ^ (i << 1));
            let mut u = Unstructured::new(&raw_data);
            if let Ok(tag) = Tag::arbitrary(&mut u) {
                let compact = snbt::write(&tag);
                let parsed = snbt::read(&compact).expect("compact snbt should parse");
                assert_eq!(parsed, tag, "compact text: {compact}");

                let ordered = snbt::to_ordered_string(&tag);
                let parsed = snbt::read(&ordered).expect("ordered snbt should parse");
                assert_eq!(parsed, tag, "ordered text: {ordered}");
            }
        }
    }

    #[test]
    fn fuzz_binary_roundtrip() {
        let mut raw_data = [0u8; 1024 * 16];

        for i in 0..128u64 {
            fill_deterministic(&mut raw_data, 0xA11C_E55u64 ^ i);
            let mut u = Unstructured::new(&raw_data);
            if let Ok(tag) = Tag::arbitrary(&mut u) {
                let root = rooted(tag);
                let bytes = binary::to_bytes(&root).expect("tree should encode");
                let decoded = binary::from_bytes(&bytes, SizeTracker::unlimited())
                    .expect("tree should decode");
                assert_eq!(decoded, root);

                let file = TagFile::new(root);
                let framed = file.to_binary().expect("frame should encode");
                assert_eq!(TagFile::from_binary(&framed).expect("frame should decode"), file);
            }
        }
    }

    #[test]
    fn fuzz_decoders_never_panic() {
        let mut raw_data = [0u8; 512];

        for i in 0..512u64 {
            fill_deterministic(&mut raw_data, 0xDEC0_DE00u64 ^ i);
            let len = (i as usize * 7) % raw_data.len();
            let input = &raw_data[..len];
            let _ = binary::from_bytes(input, SizeTracker::default());
            let _ = TagFile::from_binary(input);
            if let Ok(text) = std::str::from_utf8(input) {
                let _ = snbt::read(text);
            }
        }
    }
}
