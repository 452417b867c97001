use {
    rand::{rngs::StdRng, Rng, SeedableRng},
    slotpack_core::{
        codec::{decode, encode},
        constants::SLOT_COUNT,
        CodecError,
    },
    test_log::test,
};

#[test]
fn encodes_and_decodes_an_empty_page() {
    let page = vec![-1i32; SLOT_COUNT];
    let mut buf = Vec::new();
    encode(&mut buf, &page).unwrap();

    let mut cursor = &buf[..];
    assert_eq!(decode(&mut cursor).unwrap(), page);
}

#[test]
fn encodes_and_decodes_a_densely_populated_page() {
    let mut rng = StdRng::seed_from_u64(0xFEED_FACE);
    let page: Vec<i32> = (0..SLOT_COUNT).map(|_| rng.gen_range(0..i32::MAX)).collect();

    let mut buf = Vec::new();
    encode(&mut buf, &page).unwrap();

    let mut cursor = &buf[..];
    assert_eq!(decode(&mut cursor).unwrap(), page);
}

#[test]
fn rejects_an_array_of_the_wrong_length() {
    let page = vec![-1i32; 100];
    let mut buf = Vec::new();
    let err = encode(&mut buf, &page).unwrap_err();
    assert!(matches!(err, CodecError::WrongSlotCount(100)));
}

#[test]
fn a_stream_truncated_mid_payload_never_yields_a_partial_page() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut page = vec![-1i32; SLOT_COUNT];
    for slot in page.iter_mut() {
        if rng.gen_bool(0.6) {
            *slot = rng.gen_range(0..500_000);
        }
    }

    let mut buf = Vec::new();
    encode(&mut buf, &page).unwrap();
    buf.truncate(buf.len() - 3);

    let mut cursor = &buf[..];
    assert!(decode(&mut cursor).is_err());
}
