//! Tests for nearest-color selection and the reuse policies

#[cfg(test)]
mod tests {
    use image::Rgb;
    use photomosaic::algorithm::bitset::CandidateSet;
    use photomosaic::algorithm::matching::{
        MatchPolicy, TileMatcher, nearest, nearest_candidate,
    };
    use photomosaic::io::configuration::ExhaustionPolicy;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const DARK_RED: Rgb<u8> = Rgb([200, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    // Tests the closest color wins
    // Verified by using max_by_key
    #[test]
    fn test_nearest() {
        let colors = [BLUE, DARK_RED, RED];
        assert_eq!(nearest(Rgb([250, 5, 5]), &colors), Some(2));
        assert_eq!(nearest(Rgb([10, 10, 240]), &colors), Some(0));
        assert_eq!(nearest(RED, &[]), None);
    }

    // Tests equal distances resolve to the first position
    // Verified by iterating in reverse
    #[test]
    fn test_nearest_tie_goes_first() {
        let colors = [Rgb([10, 0, 0]), Rgb([0, 10, 0]), Rgb([0, 0, 10])];
        assert_eq!(nearest(Rgb([0, 0, 0]), &colors), Some(0));
    }

    // Tests candidates restrict the search
    // Verified by ignoring the candidate set
    #[test]
    fn test_nearest_candidate() {
        let colors = [RED, DARK_RED, BLUE];
        let mut candidates = CandidateSet::full(3);
        candidates.remove(0);

        assert_eq!(nearest_candidate(RED, &colors, &candidates), Some(1));
        for index in 1..3 {
            candidates.remove(index);
        }
        assert_eq!(nearest_candidate(RED, &colors, &candidates), None);
    }

    // Tests repeats reuse the same best tile
    // Verified by removing tiles under the repeat policy
    #[test]
    fn test_allow_repeats() {
        let mut matcher = TileMatcher::new(
            vec![RED, BLUE],
            MatchPolicy::AllowRepeats,
            ExhaustionPolicy::Fail,
            3,
        );
        for _ in 0..3 {
            assert_eq!(matcher.select(RED).expect("Selection failed"), 0);
        }
        assert_eq!(matcher.assigned(), 3);
    }

    // Tests unique assignment never reuses a tile while others remain
    // Verified by skipping the removal
    #[test]
    fn test_unique_distinct() {
        let mut matcher = TileMatcher::new(
            vec![RED, DARK_RED, BLUE],
            MatchPolicy::Unique,
            ExhaustionPolicy::Fail,
            3,
        );
        let picks: Vec<usize> = (0..3)
            .map(|_| matcher.select(RED).expect("Selection failed"))
            .collect();

        assert_eq!(picks, vec![0, 1, 2]);
        assert_eq!(matcher.remaining(), 0);
    }

    // Tests exhaustion refills under the repeat policy
    // Verified by failing regardless of policy
    #[test]
    fn test_unique_exhaustion_repeat() {
        let mut matcher = TileMatcher::new(
            vec![RED, BLUE],
            MatchPolicy::Unique,
            ExhaustionPolicy::Repeat,
            3,
        );
        assert_eq!(matcher.select(RED).expect("Selection failed"), 0);
        assert_eq!(matcher.select(RED).expect("Selection failed"), 1);
        assert_eq!(matcher.select(RED).expect("Selection failed"), 0);
        assert_eq!(matcher.remaining(), 1);
    }

    // Tests exhaustion fails under the fail policy with progress details
    // Verified by refilling regardless of policy
    #[test]
    fn test_unique_exhaustion_fail() {
        let mut matcher = TileMatcher::new(
            vec![RED, BLUE],
            MatchPolicy::Unique,
            ExhaustionPolicy::Fail,
            4,
        );
        matcher.select(RED).expect("Selection failed");
        matcher.select(RED).expect("Selection failed");

        let error = matcher.select(RED).expect_err("Exhausted pool selected");
        assert_eq!(error.message_key(), "MosaicServiceErrorTilePoolExhausted");
        assert!(error.to_string().contains("2 of 4"));
    }

    // Tests an empty pool is reported as missing tiles
    // Verified by returning position zero
    #[test]
    fn test_empty_pool() {
        let mut matcher =
            TileMatcher::new(Vec::new(), MatchPolicy::AllowRepeats, ExhaustionPolicy::Repeat, 1);
        let error = matcher.select(RED).expect_err("Empty pool selected");
        assert_eq!(error.message_key(), "MosaicServiceErrorTiles");
    }
}
