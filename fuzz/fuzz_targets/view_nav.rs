#![no_main]

use libfuzzer_sys::fuzz_target;

use bindoc::view;

fuzz_target!(|data: &[u8]| {
    let root = view(data);

    let _ = root.kind();
    let _ = root.is_object();
    let _ = root.is_number();
    let _ = root.bool();
    let _ = root.int();
    let _ = root.uint();
    let _ = root.float();
    let _ = root.text();
    let _ = root.binary();
    let _ = root.as_bytes();

    if let Ok(arr) = root.array() {
        let _ = arr.get(0);
        let _ = arr.get(3);
        for item in arr.iter().take(8) {
            if let Ok(v) = item {
                let _ = v.kind();
                let _ = v.materialize();
            }
        }
    }

    if let Ok(obj) = root.object() {
        for entry in obj.iter().take(8) {
            if let Ok((k, v)) = entry {
                let _ = obj.get(&k);
                let _ = v.materialize();
            }
        }
    }
});
