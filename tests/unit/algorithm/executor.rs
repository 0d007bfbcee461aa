//! Tests for engine registration, preconditions and phase orchestration

#[cfg(test)]
mod tests {
    use image::{ImageFormat, Rgba, RgbaImage};
    use photomosaic::algorithm::executor::{GenerationRequest, MosaicEngine};
    use photomosaic::algorithm::lifecycle::{AllocatorHint, CancellationToken};
    use photomosaic::compose::MosaicType;
    use photomosaic::io::configuration::MosaicConfig;
    use photomosaic::io::progress::{Phase, ProgressSink, ProgressUpdate};
    use photomosaic::io::storage::{MemoryStorage, SourceHandle};
    use photomosaic::spatial::Size;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};

    fn png_bytes(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(width, height, color)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("Failed to encode png");
        bytes
    }

    fn engine_with(storage: &Arc<MemoryStorage>) -> MosaicEngine {
        let config = MosaicConfig {
            worker_threads: Some(2),
            ..MosaicConfig::default()
        };
        MosaicEngine::with_config(storage.clone(), config).expect("Failed to build engine")
    }

    fn plain_request(size: u32, cell: u32) -> GenerationRequest {
        GenerationRequest::new(
            Size::new(size, size),
            Size::new(cell, cell),
            MosaicType::PlainColor,
        )
    }

    #[derive(Default)]
    struct CountingHint {
        calls: AtomicUsize,
    }

    impl AllocatorHint for CountingHint {
        fn release_retained(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct Recorder {
        updates: Mutex<Vec<ProgressUpdate>>,
    }

    impl ProgressSink for Recorder {
        fn report(&self, update: ProgressUpdate) {
            self.updates
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(update);
        }
    }

    // Cancels the run on the first update of `phase`
    struct CancelOn {
        phase: Phase,
        token: CancellationToken,
    }

    impl ProgressSink for CancelOn {
        fn report(&self, update: ProgressUpdate) {
            if update.phase == self.phase {
                self.token.cancel();
            }
        }
    }

    fn cancelling_engine(storage: &Arc<MemoryStorage>, phase: Phase) -> MosaicEngine {
        let engine = engine_with(storage);
        let token = engine.cancellation_token();
        engine.with_progress(Arc::new(CancelOn { phase, token }))
    }

    // Tests registering a master reports its size and validates the bytes
    // Verified by storing undecodable bytes
    #[test]
    fn test_set_master_image() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(&storage);

        let size = engine
            .set_master_image(png_bytes(12, 8, Rgba([0, 0, 0, 255])))
            .expect("Failed to set master");
        assert_eq!(size, Size::new(12, 8));
        assert_eq!(engine.master_size(), Some(size));

        let error = engine
            .set_master_image(b"nope".to_vec())
            .expect_err("Garbage master accepted");
        assert_eq!(error.message_key(), "MosaicServiceErrorImage");
        assert_eq!(engine.master_size(), Some(size));
    }

    // Tests a master can be read from a stream
    // Verified by reading only the first buffer
    #[test]
    fn test_set_master_from_reader() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(&storage);
        let bytes = png_bytes(5, 6, Rgba([1, 1, 1, 255]));

        let size = engine
            .set_master_from_reader(Cursor::new(bytes))
            .expect("Failed to read master");
        assert_eq!(size, Size::new(5, 6));
    }

    // Tests generation without a master fails first
    // Verified by checking tiles before the master
    #[test]
    fn test_missing_master() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(&storage);
        let request = GenerationRequest::new(
            Size::new(10, 10),
            Size::new(5, 5),
            MosaicType::Random,
        );

        let error = engine.generate(&request).expect_err("Generated without master");
        assert_eq!(error.message_key(), "MosaicServiceErrorMasterImage");
    }

    // Tests reset forgets the master and every tile
    // Verified by keeping the library on reset
    #[test]
    fn test_reset() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(&storage);
        engine
            .set_master_image(png_bytes(4, 4, Rgba([0, 0, 0, 255])))
            .expect("Failed to set master");
        engine.register_tile("a", SourceHandle::new("h"));

        engine.reset();
        assert_eq!(engine.master_size(), None);
        assert!(engine.library().is_empty());
        assert!(engine.ascii_text().is_none());
    }

    // Tests remove only drops the first duplicate
    // Verified by removing every match
    #[test]
    fn test_remove_tile() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(&storage);
        engine.register_tile("dup", SourceHandle::new("h1"));
        engine.register_tile("dup", SourceHandle::new("h2"));

        assert!(engine.remove_tile("dup").is_some());
        assert_eq!(engine.library().len(), 1);
        assert!(engine.remove_tile("absent").is_none());
        assert_eq!(engine.library().len(), 1);
    }

    // Tests invalid output sizes are rejected before any work
    // Verified by skipping output validation
    #[test]
    fn test_invalid_output() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(&storage);
        engine
            .set_master_image(png_bytes(4, 4, Rgba([0, 0, 0, 255])))
            .expect("Failed to set master");

        for request in [plain_request(0, 5), plain_request(10, 0), plain_request(10, 11)] {
            let error = engine.generate(&request).expect_err("Invalid request ran");
            assert_eq!(error.message_key(), "MosaicServiceErrorParameters");
        }
    }

    // Tests the allocator hint fires once per run, even on failure
    // Verified by signalling only on success
    #[test]
    fn test_allocator_hint() {
        let storage = Arc::new(MemoryStorage::new());
        let hint = Arc::new(CountingHint::default());
        let mut engine = engine_with(&storage).with_allocator_hint(hint.clone());
        engine
            .set_master_image(png_bytes(20, 20, Rgba([9, 9, 9, 255])))
            .expect("Failed to set master");

        engine
            .generate(&plain_request(20, 10))
            .expect("Generation failed");
        assert_eq!(hint.calls.load(Ordering::SeqCst), 1);

        engine.register_tile("broken", storage.insert(vec![0_u8; 4]));
        let classic = GenerationRequest::new(
            Size::new(20, 20),
            Size::new(10, 10),
            MosaicType::Classic(photomosaic::MatchPolicy::AllowRepeats),
        );
        let error = engine.generate(&classic).expect_err("Broken tile composed");
        assert_eq!(error.message_key(), "MosaicServiceErrorTiles");
        assert_eq!(hint.calls.load(Ordering::SeqCst), 2);
    }

    // Tests progress walks the windows in order and ends at 100
    // Verified by reporting composing in the averaging window
    #[test]
    fn test_progress_phases() {
        let storage = Arc::new(MemoryStorage::new());
        let recorder = Arc::new(Recorder::default());
        let mut engine = engine_with(&storage).with_progress(recorder.clone());
        engine
            .set_master_image(png_bytes(30, 30, Rgba([100, 0, 0, 255])))
            .expect("Failed to set master");
        engine.register_tile("t", storage.insert(png_bytes(4, 4, Rgba([0, 0, 0, 255]))));

        let request = GenerationRequest::new(
            Size::new(30, 30),
            Size::new(10, 10),
            MosaicType::Classic(photomosaic::MatchPolicy::AllowRepeats),
        );
        engine.generate(&request).expect("Generation failed");

        let updates = recorder
            .updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let phases: Vec<Phase> = updates.iter().map(|u| u.phase).collect();
        let first_loading = phases
            .iter()
            .position(|&p| p == Phase::LoadingTiles)
            .expect("No loading updates");
        let first_composing = phases
            .iter()
            .position(|&p| p == Phase::Composing)
            .expect("No composing updates");
        assert!(phases[..first_loading].iter().all(|&p| p == Phase::Averaging));
        assert!(first_loading < first_composing);

        let best = updates.iter().map(ProgressUpdate::percent).fold(0.0, f64::max);
        assert!((best - 100.0).abs() < 1e-9);
    }

    // Tests a token cancelled before the run does not block it
    // Verified by not clearing the token at start
    #[test]
    fn test_cancellation_cleared_at_start() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(&storage);
        engine
            .set_master_image(png_bytes(10, 10, Rgba([0, 0, 0, 255])))
            .expect("Failed to set master");

        let token = engine.cancellation_token();
        token.cancel();
        assert!(engine.generate(&plain_request(10, 5)).is_ok());
        assert!(!token.is_cancelled());
    }

    // Tests a zero thread count is rejected at construction
    // Verified by clamping to one thread
    #[test]
    fn test_invalid_config() {
        let config = MosaicConfig {
            worker_threads: Some(0),
            ..MosaicConfig::default()
        };
        let result = MosaicEngine::with_config(Arc::new(MemoryStorage::new()), config);
        assert!(result.is_err());
    }

    // Tests a run cancelled while averaging stops with the cancelled key
    // Verified by ignoring the token between rows
    #[test]
    fn test_cancel_during_averaging() {
        let storage = Arc::new(MemoryStorage::new());
        let hint = Arc::new(CountingHint::default());
        let mut engine =
            cancelling_engine(&storage, Phase::Averaging).with_allocator_hint(hint.clone());
        engine
            .set_master_image(png_bytes(40, 40, Rgba([50, 50, 50, 255])))
            .expect("Failed to set master");

        let error = engine
            .generate(&plain_request(40, 10))
            .expect_err("Cancelled run finished");
        assert_eq!(error.message_key(), "MosaicServiceErrorCancelled");
        assert_eq!(hint.calls.load(Ordering::SeqCst), 1);
    }

    // Tests a run cancelled while loading tiles never composes
    // Verified by checking the token only before averaging
    #[test]
    fn test_cancel_during_loading() {
        let storage = Arc::new(MemoryStorage::new());
        let mut engine = cancelling_engine(&storage, Phase::LoadingTiles);
        engine
            .set_master_image(png_bytes(20, 20, Rgba([50, 50, 50, 255])))
            .expect("Failed to set master");
        for index in 0..3 {
            let handle = storage.insert(png_bytes(10, 10, Rgba([index * 80, 0, 0, 255])));
            engine.register_tile(format!("t{index}"), handle);
        }

        let request = GenerationRequest::new(
            Size::new(20, 20),
            Size::new(10, 10),
            MosaicType::Classic(photomosaic::MatchPolicy::AllowRepeats),
        );
        let error = engine.generate(&request).expect_err("Cancelled run finished");
        assert_eq!(error.message_key(), "MosaicServiceErrorCancelled");

        // The next run starts with a cleared token and is cancelled again
        let again = engine.generate(&request).expect_err("Cancelled run finished");
        assert_eq!(again.message_key(), "MosaicServiceErrorCancelled");
    }

    // Tests oversized text art is refused before the master is resized
    // Verified by rendering the canvas unchecked
    #[test]
    fn test_oversized_text_art() {
        let storage = Arc::new(MemoryStorage::new());
        let config = MosaicConfig {
            worker_threads: Some(1),
            ascii_ratio: 1,
            ..MosaicConfig::default()
        };
        let mut engine =
            MosaicEngine::with_config(storage.clone(), config).expect("Failed to build engine");
        engine
            .set_master_image(png_bytes(10, 10, Rgba([0, 0, 0, 255])))
            .expect("Failed to set master");

        let request = GenerationRequest::new(
            Size::new(20_000, 20_000),
            Size::new(1, 1),
            MosaicType::AsciiArt,
        );
        let error = engine.generate(&request).expect_err("Oversized canvas rendered");
        assert_eq!(error.message_key(), "MosaicServiceErrorParameters");
        assert!(engine.ascii_text().is_none());

        let huge_scale = MosaicConfig {
            glyph_scale: 1 << 30,
            ..MosaicConfig::default()
        };
        assert!(MosaicEngine::with_config(storage, huge_scale).is_err());
    }
}
