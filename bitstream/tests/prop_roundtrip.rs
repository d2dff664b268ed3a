use bitstream::{pack_flags, unpack_flags, ByteReader, ByteWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
    F32(u32),
    Bytes(Vec<u8>),
    Units(Vec<u16>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<u16>().prop_map(Op::U16),
        any::<u32>().prop_map(Op::U32),
        any::<i8>().prop_map(Op::I8),
        any::<i16>().prop_map(Op::I16),
        any::<i32>().prop_map(Op::I32),
        any::<u32>().prop_map(Op::F32),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Op::Bytes),
        prop::collection::vec(any::<u16>(), 0..16).prop_map(Op::Units),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = ByteWriter::new(Vec::new());

        for op in &ops {
            match op {
                Op::U8(v) => writer.write_u8(*v).unwrap(),
                Op::U16(v) => writer.write_u16(*v).unwrap(),
                Op::U32(v) => writer.write_u32(*v).unwrap(),
                Op::I8(v) => writer.write_i8(*v).unwrap(),
                Op::I16(v) => writer.write_i16(*v).unwrap(),
                Op::I32(v) => writer.write_i32(*v).unwrap(),
                Op::F32(bits) => writer.write_f32(f32::from_bits(*bits)).unwrap(),
                Op::Bytes(v) => writer.write_bytes(v).unwrap(),
                Op::Units(v) => writer.write_u16_units(v).unwrap(),
            }
        }

        let written = writer.position();
        let bytes = writer.into_inner();
        prop_assert_eq!(written, bytes.len() as u64);
        let mut reader = ByteReader::new(bytes.as_slice());

        for op in &ops {
            match op {
                Op::U8(v) => prop_assert_eq!(reader.read_u8().unwrap(), *v),
                Op::U16(v) => prop_assert_eq!(reader.read_u16().unwrap(), *v),
                Op::U32(v) => prop_assert_eq!(reader.read_u32().unwrap(), *v),
                Op::I8(v) => prop_assert_eq!(reader.read_i8().unwrap(), *v),
                Op::I16(v) => prop_assert_eq!(reader.read_i16().unwrap(), *v),
                Op::I32(v) => prop_assert_eq!(reader.read_i32().unwrap(), *v),
                Op::F32(bits) => prop_assert_eq!(reader.read_f32().unwrap().to_bits(), *bits),
                Op::Bytes(v) => prop_assert_eq!(&reader.read_bytes(v.len()).unwrap(), v),
                Op::Units(v) => prop_assert_eq!(&reader.read_u16_units(v.len()).unwrap(), v),
            }
        }

        prop_assert_eq!(reader.position(), written);
        prop_assert!(reader.read_u8().unwrap_err().is_short_read());
    }

    #[test]
    fn prop_flags_roundtrip(value in any::<u32>(), bits in 0usize..=32) {
        let flags = unpack_flags(value, bits).unwrap();
        prop_assert_eq!(flags.len(), bits);
        let mask = if bits == 32 { u32::MAX } else { (1u32 << bits) - 1 };
        prop_assert_eq!(pack_flags(&flags).unwrap(), value & mask);
    }
}
