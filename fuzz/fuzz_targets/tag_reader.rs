#![no_main]

use libfuzzer_sys::fuzz_target;
use tag::{decode_network, encode_network, TagLimits};

fuzz_target!(|data: &[u8]| {
    let limits = TagLimits::default();
    let Ok(root) = decode_network(data, &limits) else {
        return;
    };

    // Anything the reader accepts re-encodes to a fixed point. Bytes are
    // compared rather than values so NaN floats do not trip the check.
    let bytes = encode_network(&root).expect("decoded tag re-encodes");
    let again = decode_network(&bytes, &limits).expect("re-encoded tag decodes");
    assert_eq!(encode_network(&again).expect("second encode"), bytes);
});
