use super::*;

#[test]
fn integers_follow_configured_byte_order() {
    let mut buf = [0u8; 8];
    let mut cursor = BinaryCursor::new(&mut buf[..], ByteOrder::BigEndian);
    cursor.put_u32(0x0102_0304).expect("put be");
    cursor.set_order(ByteOrder::LittleEndian);
    cursor.put_u32(0x0102_0304).expect("put le");
    assert_eq!(buf, [1, 2, 3, 4, 4, 3, 2, 1]);

    let mut cursor = BinaryCursor::new(&buf[..], ByteOrder::LittleEndian);
    assert_eq!(cursor.get_u32().expect("get"), 0x0403_0201);
    assert_eq!(cursor.get_u32().expect("get"), 0x0102_0304);
    assert_eq!(cursor.remaining(), 0);
}

#[test]
fn signed_values_and_booleans() {
    let mut buf = vec![0u8; 16];
    let mut cursor = BinaryCursor::new(&mut buf, ByteOrder::LittleEndian);
    cursor.put_i64(-2).expect("i64");
    cursor.put_i16(-1).expect("i16");
    cursor.put_bool(true).expect("bool");
    cursor.put_i8(-5).expect("i8");

    cursor.seek(0).expect("rewind");
    assert_eq!(cursor.get_i64().expect("i64"), -2);
    assert_eq!(cursor.get_i16().expect("i16"), -1);
    assert!(cursor.get_bool().expect("bool"));
    assert_eq!(cursor.get_i8().expect("i8"), -5);
    assert_eq!(cursor.position(), 12);
}

#[test]
fn any_nonzero_byte_reads_as_true() {
    let mut cursor = BinaryCursor::new([0u8, 2, 0xFF], ByteOrder::LittleEndian);
    assert!(!cursor.get_bool().expect("first"));
    assert!(cursor.get_bool().expect("second"));
    assert!(cursor.get_bool().expect("third"));
}

#[test]
fn reads_past_end_fail_without_moving() {
    let mut cursor = BinaryCursor::new([1u8, 2, 3], ByteOrder::LittleEndian);
    cursor.seek(2).expect("seek");
    let err = cursor.get_u16().expect_err("only one byte left");
    assert!(matches!(
        err,
        CoreError::OutOfBounds {
            position: 2,
            len: 2,
            size: 3
        }
    ));
    assert_eq!(cursor.position(), 2);
    assert!(cursor.seek(4).is_err());
    assert!(cursor.skip(-3).is_err());
    cursor.skip(-2).expect("relative rewind");
    assert_eq!(cursor.position(), 0);
    cursor.seek(3).expect("end is a valid position");
}

#[test]
fn writes_never_grow_the_buffer() {
    let mut buf = [0u8; 3];
    let mut cursor = BinaryCursor::new(&mut buf[..], ByteOrder::LittleEndian);
    assert!(cursor.put_u32(1).is_err());
    assert!(cursor.fill_zero(4).is_err());
    assert!(cursor.put_u32_at(0, 1).is_err());
    assert_eq!(cursor.position(), 0);
    assert_eq!(cursor.len(), 3);
}

#[test]
fn length_prefixed_strings() {
    let mut buf = [0u8; 16];
    let mut cursor = BinaryCursor::new(&mut buf[..], ByteOrder::LittleEndian);
    cursor.put_string("Stage").expect("put");
    cursor.put_string("").expect("put empty");
    assert_eq!(cursor.position(), 9);

    let mut cursor = BinaryCursor::new(&buf[..], ByteOrder::LittleEndian);
    assert_eq!(cursor.get_string().expect("get"), "Stage");
    assert_eq!(cursor.get_string().expect("get empty"), "");
}

#[test]
fn truncated_string_restores_position() {
    let mut cursor = BinaryCursor::new([10u8, 0, b'a', b'b'], ByteOrder::LittleEndian);
    assert!(cursor.get_string().is_err());
    assert_eq!(cursor.position(), 0);
}

#[test]
fn fill_zero_and_absolute_patch() {
    let mut buf = [0xAAu8; 8];
    let mut cursor = BinaryCursor::new(&mut buf[..], ByteOrder::BigEndian);
    cursor.seek(4).expect("seek");
    cursor.fill_zero(4).expect("zero");
    cursor.put_u32_at(0, 0xDEAD_BEEF).expect("patch");
    assert_eq!(cursor.position(), 8);
    assert_eq!(
        cursor.peek_u32_at(0, ByteOrder::LittleEndian).expect("peek"),
        0xEFBE_ADDE
    );
    assert_eq!(buf, [0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 0]);
}
