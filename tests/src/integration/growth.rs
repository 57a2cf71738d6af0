//! # Tier Growth
//!
//! Growth protocol of the tier manager:
//!
//! 1. A new tier appears once the newest tier's estimated fill reaches the
//!    threshold, and not before
//! 2. Each tier is larger and tighter than the one before it
//! 3. Members of sealed tiers stay visible forever

#[cfg(test)]
mod tests {
    use tiered_bloom::{
        CountingTierManager, FilterGeometry, ScalableBloomFilter, TierConfig, TierConfigBuilder,
        TierSnapshot,
    };

    use crate::support::{init_tracing, members};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn config(initial_capacity: usize, fill_threshold: f64) -> TierConfig {
        TierConfigBuilder::new()
            .initial_capacity(initial_capacity)
            .target_fpr(0.01)
            .fill_threshold(fill_threshold)
            .build()
            .expect("valid config")
    }

    fn geometry_of(tier: &TierSnapshot) -> FilterGeometry {
        FilterGeometry::from_raw(tier.parameters.slot_count, tier.parameters.hash_count)
            .expect("tiers have valid geometry")
    }

    // =============================================================================
    // GROWTH TRIGGER
    // =============================================================================

    #[test]
    fn test_forced_growth_keeps_every_member() {
        init_tracing();
        let manager = ScalableBloomFilter::with_config(config(10, 0.5)).unwrap();
        let items = members("grow", 200);

        for item in &items {
            manager.add(item);
        }

        assert!(manager.tier_count() >= 3, "Got {} tiers", manager.tier_count());
        for item in &items {
            assert!(manager.might_contain(item), "Lost {} after growth", item);
        }
    }

    #[test]
    fn test_sealed_tiers_crossed_threshold_exactly_once() {
        let threshold = 0.5;
        let manager = ScalableBloomFilter::with_config(config(10, threshold)).unwrap();
        for item in members("seal", 1_000) {
            manager.add(item);
        }

        let tiers = manager.describe();
        let (newest, sealed) = tiers.split_last().expect("at least one tier");

        for tier in sealed {
            let inserts = tier.parameters.insert_count as usize;
            let geometry = geometry_of(tier);
            assert!(tier.estimated_fill >= threshold);
            assert!(
                geometry.expected_fill(inserts - 1) < threshold,
                "Tier {} kept taking inserts after crossing the threshold",
                tier.index
            );
        }
        assert!(newest.estimated_fill < threshold);
    }

    #[test]
    fn test_default_threshold_fills_tier_past_capacity() {
        let manager = ScalableBloomFilter::new(100, 0.01).unwrap();
        for item in members("default", 100) {
            manager.add(item);
        }
        assert_eq!(
            manager.tier_count(),
            1,
            "At capacity the estimated fill is about 0.5, below the 0.85 default"
        );
    }

    // =============================================================================
    // GROWTH SHAPE
    // =============================================================================

    #[test]
    fn test_next_tier_follows_growth_and_tightening() {
        let manager = ScalableBloomFilter::with_config(config(1_000, 0.5)).unwrap();
        for item in members("shape", 5_000) {
            manager.add(item);
        }

        let tiers = manager.describe();
        assert!(tiers.len() >= 2);
        for pair in tiers.windows(2) {
            let (capacity, fpr) = geometry_of(&pair[0]).next_tier_targets(2.0, 0.5);
            let expected = FilterGeometry::new(capacity, fpr).unwrap();
            assert_eq!(geometry_of(&pair[1]), expected);
        }
    }

    #[test]
    fn test_capacity_and_tightness_monotonic() {
        let manager = CountingTierManager::with_config(config(16, 0.6)).unwrap();
        for item in members("mono", 2_000) {
            manager.add(item);
        }

        let tiers = manager.describe();
        for pair in tiers.windows(2) {
            let older = geometry_of(&pair[0]);
            let newer = geometry_of(&pair[1]);
            assert!(newer.approximate_capacity() >= older.approximate_capacity());
            assert!(newer.approximate_base_fpr() <= older.approximate_base_fpr());
        }
    }

    #[test]
    fn test_custom_growth_factor() {
        let config = TierConfigBuilder::new()
            .initial_capacity(100)
            .fill_threshold(0.5)
            .growth_factor(4.0)
            .tightening_ratio(0.9)
            .build()
            .unwrap();
        let manager = ScalableBloomFilter::with_config(config).unwrap();
        for item in members("wide", 200) {
            manager.add(item);
        }

        let tiers = manager.describe();
        assert_eq!(tiers.len(), 2);
        let first = geometry_of(&tiers[0]).approximate_capacity();
        let second = geometry_of(&tiers[1]).approximate_capacity();
        let ratio = second as f64 / first as f64;
        assert!(ratio > 3.0 && ratio < 5.0, "Capacity ratio {}", ratio);
    }

    // =============================================================================
    // INTROSPECTION
    // =============================================================================

    #[test]
    fn test_describe_is_oldest_first() {
        let manager = ScalableBloomFilter::with_config(config(10, 0.5)).unwrap();
        for item in members("order", 300) {
            manager.add(item);
        }

        let tiers = manager.describe();
        assert_eq!(tiers.len(), manager.tier_count());
        let total: u64 = tiers.iter().map(|t| t.parameters.insert_count).sum();
        assert_eq!(total, 300);
        assert_eq!(manager.total_inserts(), 300);
        assert!(tiers.windows(2).all(|w| w[0].index < w[1].index));
        assert!(tiers[0].parameters.slot_count < tiers[tiers.len() - 1].parameters.slot_count);
    }
}
