#![no_main]

use libfuzzer_sys::fuzz_target;
use multipart_response::multipart;

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic, whatever the input.
    if let Ok(parts) = multipart::decode(data) {
        for part in &parts {
            let _ = part.headers().len();
            let _ = part.body().len();
        }
    }
});
