//! Tests for the candidate set used by unique tile assignment

#[cfg(test)]
mod tests {
    use photomosaic::algorithm::bitset::CandidateSet;

    // Tests a full set holds every position
    // Verified by creating the full set with zeros
    #[test]
    fn test_full() {
        let full = CandidateSet::full(5);
        assert_eq!(full.count(), 5);
        assert_eq!(full.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);

        let none = CandidateSet::full(0);
        assert!(none.is_empty());
        assert_eq!(none.capacity(), 0);
    }

    // Tests removal reports presence and is idempotent
    // Verified by always returning true
    #[test]
    fn test_remove() {
        let mut set = CandidateSet::full(3);
        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert!(!set.contains(1));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    // Tests out of range positions are ignored
    // Verified by indexing the bits unchecked
    #[test]
    fn test_out_of_range() {
        let mut set = CandidateSet::full(2);
        assert!(!set.contains(5));
        assert!(!set.remove(5));
        assert_eq!(set.count(), 2);
    }

    // Tests refill restores every position
    // Verified by refilling only removed positions below one
    #[test]
    fn test_refill() {
        let mut set = CandidateSet::full(4);
        for index in 0..4 {
            set.remove(index);
        }
        assert!(set.is_empty());

        set.refill();
        assert_eq!(set.count(), 4);
    }

    // Tests display summarises availability
    // Verified by printing capacity twice
    #[test]
    fn test_display() {
        let mut set = CandidateSet::full(4);
        set.remove(0);
        assert_eq!(set.to_string(), "CandidateSet(3 of 4 available)");
    }
}
