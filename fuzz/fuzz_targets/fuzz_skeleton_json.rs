#![no_main]

use bonemirror_core::{MirrorConfig, MirrorNode, PoseContext, Skeleton};
use libfuzzer_sys::fuzz_target;

// Arbitrary skeleton documents must either be rejected or mirror without panicking.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(skeleton) = serde_json::from_str::<Skeleton>(text) else {
        return;
    };

    let mut node = MirrorNode::new(MirrorConfig::default());
    node.initialize(&skeleton);
    let mut context = PoseContext::bind(&skeleton);
    node.evaluate(&skeleton, &mut context);
});
