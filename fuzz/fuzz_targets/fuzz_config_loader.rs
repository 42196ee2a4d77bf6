#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = toml::from_str::<ppsdiff_config::Config>(data) {
        if cfg.validate().is_ok() {
            // A validated config must always yield a session.
            let edges = ppsdiff_core::EdgeCfg::from(&cfg.edges);
            let sequencing = ppsdiff_core::SequencingCfg::from(&cfg.sequencing);
            let built = ppsdiff_core::SessionBuilder::new()
                .with_edges(edges)
                .with_sequencing(sequencing)
                .apply_calibration(cfg.calibration.as_ref().map(ppsdiff_core::Calibration::from))
                .build();
            assert!(built.is_ok(), "validated config rejected: {built:?}");
        }
    }
});
