#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    drift_bpv7_fuzz::bundle(data);
});
