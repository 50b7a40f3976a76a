#[cfg(test)]
mod tests {
    use maplit::hashmap;
    use proptest::prelude::*;

    use crate::common::PageNumber;
    use crate::policy::{PolicyKind, ReplacementPolicy, Resolution, errors::PolicyError};

    fn run(kind: PolicyKind, capacity: usize, seq: &[PageNumber]) -> Vec<Resolution> {
        let mut policy = ReplacementPolicy::new(kind, capacity);
        seq.iter()
            .enumerate()
            .map(|(i, page)| policy.resolve(*page, &seq[i + 1..]))
            .collect()
    }

    fn faults(kind: PolicyKind, capacity: usize, seq: &[PageNumber]) -> usize {
        run(kind, capacity, seq).iter().filter(|r| r.is_fault).count()
    }

    const F: fn(Option<PageNumber>) -> Resolution = Resolution::fault;

    #[test]
    fn fifo_reference_trace() {
        let trace = run(PolicyKind::Fifo, 3, &[1, 2, 3, 4, 1, 2, 5]);

        assert_eq!(
            trace,
            vec![
                F(None),
                F(None),
                F(None),
                F(Some(1)),
                F(Some(2)),
                F(Some(3)),
                F(Some(4)),
            ]
        );
    }

    #[test]
    fn lru_reference_trace_same_as_fifo_without_repeats() {
        assert_eq!(
            run(PolicyKind::Lru, 3, &[1, 2, 3, 4, 1, 2, 5]),
            run(PolicyKind::Fifo, 3, &[1, 2, 3, 4, 1, 2, 5]),
        );
    }

    #[test]
    fn lru_promotes_on_hit() {
        let trace = run(PolicyKind::Lru, 3, &[1, 2, 3, 1, 4]);

        assert_eq!(
            trace,
            vec![F(None), F(None), F(None), Resolution::hit(), F(Some(2))]
        );
    }

    #[test]
    fn fifo_ignores_hits_when_choosing_victim() {
        let trace = run(PolicyKind::Fifo, 3, &[1, 2, 3, 1, 4]);
        assert_eq!(trace[4], F(Some(1)));
    }

    #[test]
    fn lfu_keeps_popular_page() {
        let trace = run(PolicyKind::Lfu, 2, &[1, 1, 2, 3]);
        assert_eq!(trace[3], F(Some(2)));
    }

    #[test]
    fn lfu_breaks_ties_by_oldest_access() {
        // 1 and 2 both at frequency 2; 1 was used longer ago.
        let trace = run(PolicyKind::Lfu, 2, &[1, 2, 1, 2, 3]);
        assert_eq!(trace[4], F(Some(1)));
    }

    #[test]
    fn optimal_uses_future_accesses() {
        let trace = run(PolicyKind::Optimal, 3, &[1, 2, 3, 4, 1, 2, 5]);

        assert_eq!(trace[3], F(Some(3)));
        assert_eq!(trace[4], Resolution::hit());
        assert_eq!(trace[5], Resolution::hit());
        // nothing left to look at: oldest resident goes
        assert_eq!(trace[6], F(Some(1)));
    }

    #[test]
    fn fault_counts_on_classic_sequence() {
        let seq = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];
        let expected = hashmap! {
            PolicyKind::Fifo => 15,
            PolicyKind::Lru => 12,
            PolicyKind::Optimal => 9,
        };

        for (kind, count) in expected {
            assert_eq!(faults(kind, 3, &seq), count, "{kind}");
        }
    }

    #[test]
    fn stats_track_counters() {
        let mut policy = ReplacementPolicy::new(PolicyKind::Lru, 2);
        assert_eq!(policy.stats().hit_rate, 0.0);

        for page in [1, 2, 1, 1] {
            policy.resolve(page, &[]);
        }

        let stats = policy.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.faults, 2);
        assert_eq!(stats.total_accesses, 4);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_clears_residency_and_counters() {
        let mut policy = ReplacementPolicy::new(PolicyKind::Lfu, 2);
        policy.resolve(1, &[]);
        policy.resolve(1, &[]);
        policy.reset();

        assert_eq!(policy.resident_count(), 0);
        assert_eq!(policy.stats().total_accesses, 0);
        assert!(policy.resolve(1, &[]).is_fault);
    }

    #[test]
    fn zero_capacity_never_admits() {
        let mut policy = ReplacementPolicy::new(PolicyKind::Fifo, 0);

        assert_eq!(policy.resolve(1, &[]), F(None));
        assert_eq!(policy.resolve(1, &[]), F(None));
        assert_eq!(policy.resident_count(), 0);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("fifo".parse::<PolicyKind>(), Ok(PolicyKind::Fifo));
        assert_eq!("LRU".parse::<PolicyKind>(), Ok(PolicyKind::Lru));
        assert_eq!(" Lfu ".parse::<PolicyKind>(), Ok(PolicyKind::Lfu));
        assert_eq!("Optimal".parse::<PolicyKind>(), Ok(PolicyKind::Optimal));
        assert_eq!("opt".parse::<PolicyKind>(), Ok(PolicyKind::Optimal));

        for kind in PolicyKind::ALL {
            assert_eq!(kind.name().parse::<PolicyKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = ReplacementPolicy::from_name("clock", 4).unwrap_err();
        assert_eq!(
            err,
            PolicyError::UnknownPolicy {
                name: "clock".into()
            }
        );
        assert!(err.to_string().contains("clock"));
    }

    fn kind_strategy() -> impl Strategy<Value = PolicyKind> {
        prop_oneof![
            Just(PolicyKind::Fifo),
            Just(PolicyKind::Lru),
            Just(PolicyKind::Lfu),
            Just(PolicyKind::Optimal),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn resident_set_never_exceeds_capacity(
            kind in kind_strategy(),
            capacity in 1usize..8,
            seq in prop::collection::vec(0usize..12, 0..80),
        ) {
            let mut policy = ReplacementPolicy::new(kind, capacity);
            for (i, page) in seq.iter().enumerate() {
                let res = policy.resolve(*page, &seq[i + 1..]);
                prop_assert!(policy.resident_count() <= capacity);
                prop_assert!(policy.is_resident(*page));
                if let Some(evicted) = res.evicted {
                    prop_assert!(res.is_fault);
                    prop_assert!(!policy.is_resident(evicted));
                }
            }
            let stats = policy.stats();
            prop_assert_eq!(stats.total_accesses, seq.len() as u64);
        }

        #[test]
        fn optimal_never_faults_more_than_others(
            capacity in 1usize..6,
            seq in prop::collection::vec(0usize..10, 0..60),
        ) {
            let best = faults(PolicyKind::Optimal, capacity, &seq);
            for kind in [PolicyKind::Fifo, PolicyKind::Lru, PolicyKind::Lfu] {
                prop_assert!(best <= faults(kind, capacity, &seq));
            }
        }
    }
}
