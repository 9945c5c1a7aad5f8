#![no_main]
use boundviz_log::{JoinKey, ParserConfig, SectionParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The parser must survive arbitrary text under every join mode.
    let s = String::from_utf8_lossy(data);
    let _ = SectionParser::new().parse(&s);
    let config = ParserConfig {
        include_farkas: true,
        root_node_only: true,
        join: JoinKey::Iteration,
    };
    let _ = SectionParser::with_config(config).parse(&s);
});
