//! Unit tests for rat-policy.

#[cfg(test)]
mod helpers {
    use rat_core::{Position, TechSet};
    use rat_net::{Availability, AvailabilityResolver, InfrastructureLayoutBuilder, NetworkCatalog};

    use crate::{LearningConfig, PolicyEngine};

    /// Epsilon pinned at zero: pure exploitation.
    pub fn greedy_engine(actions: usize) -> PolicyEngine {
        let cfg = LearningConfig { epsilon: 0.0, min_epsilon: 0.0, ..LearningConfig::default() };
        PolicyEngine::new(cfg, actions).unwrap()
    }

    pub fn availability_at(catalog: &NetworkCatalog, x: f64) -> Availability {
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_shared(Position::ORIGIN, catalog.all());
        let layout = b.build(catalog).unwrap();
        AvailabilityResolver::new(catalog, &layout).available(Position::ground(x, 0.0))
    }

    pub fn all3() -> TechSet {
        TechSet::first_n(3)
    }
}

// ── State encoding ────────────────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use std::collections::HashSet;

    use rat_core::{TechId, TechSet};
    use rat_net::NetworkCatalog;

    use super::helpers::availability_at;
    use crate::{BucketThresholds, DistanceBucket, PolicyError, StateKey};

    #[test]
    fn thresholds_from_fixture_catalog() {
        let t = BucketThresholds::from_catalog(&NetworkCatalog::default_v2x());
        assert_eq!(t, BucketThresholds { close: 40.0, medium: 60.0 });
        assert_eq!(t.bucket(0.0), DistanceBucket::Close);
        assert_eq!(t.bucket(40.0), DistanceBucket::Close);
        assert_eq!(t.bucket(40.5), DistanceBucket::Medium);
        assert_eq!(t.bucket(60.0), DistanceBucket::Medium);
        assert_eq!(t.bucket(61.0), DistanceBucket::Far);
    }

    #[test]
    fn thresholds_validated() {
        assert_eq!(
            BucketThresholds::new(50.0, 10.0).unwrap_err(),
            PolicyError::InvalidThresholds { close: 50.0, medium: 10.0 }
        );
        assert!(BucketThresholds::new(f64::NAN, 10.0).is_err());
        assert!(BucketThresholds::new(10.0, 10.0).is_ok());
    }

    #[test]
    fn keys_ignore_discovery_order() {
        let a: TechSet = [TechId(2), TechId(0)].into_iter().collect();
        let b: TechSet = [TechId(0), TechId(2)].into_iter().collect();
        let ka = StateKey::new(DistanceBucket::Far, a);
        let kb = StateKey::new(DistanceBucket::Far, b);
        assert_eq!(ka, kb);
        let set: HashSet<_> = [ka, kb].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn key_from_availability() {
        let c = NetworkCatalog::default_v2x();
        let t = BucketThresholds::from_catalog(&c);
        let key = StateKey::from_availability(&availability_at(&c, 50.0), &t);
        assert_eq!(key.bucket, DistanceBucket::Medium);
        assert_eq!(key.available.iter().collect::<Vec<_>>(), [TechId(1), TechId(2)]);
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use rat_core::{SimRng, TechId, TechSet};

    use super::helpers::{all3, greedy_engine};
    use crate::{DistanceBucket, LearningConfig, PolicyEngine, PolicyError, StateKey};

    fn key() -> StateKey {
        StateKey::new(DistanceBucket::Close, all3())
    }

    #[test]
    fn config_defaults_and_validation() {
        let d = LearningConfig::default();
        assert_eq!((d.alpha, d.epsilon, d.epsilon_decay, d.min_epsilon), (0.1, 1.0, 0.995, 0.01));
        let bad = LearningConfig { alpha: 0.0, ..d };
        assert_eq!(bad.validate().unwrap_err(), PolicyError::InvalidLearningRate(0.0));
        let bad = LearningConfig { min_epsilon: 0.5, epsilon: 0.2, ..d };
        assert!(matches!(bad.validate(), Err(PolicyError::InvalidEpsilon { .. })));
        let bad = LearningConfig { epsilon_decay: 1.5, ..d };
        assert_eq!(bad.validate().unwrap_err(), PolicyError::InvalidDecay(1.5));
        assert_eq!(PolicyEngine::new(d, 0).err(), Some(PolicyError::NoActions));
    }

    #[test]
    fn epsilon_monotone_and_floored() {
        let mut e = PolicyEngine::new(LearningConfig::default(), 3).unwrap();
        let mut prev = e.epsilon();
        assert_eq!(prev, 1.0);
        for i in 0..2_000 {
            e.learn(key(), TechId((i % 3) as u8), (i as f64).sin() * 10.0).unwrap();
            let eps = e.epsilon();
            assert!(eps <= prev);
            assert!(eps >= 0.01);
            prev = eps;
        }
        assert_eq!(e.epsilon(), 0.01);
    }

    #[test]
    fn q_value_converges_geometrically() {
        let mut e = PolicyEngine::new(LearningConfig::default(), 3).unwrap();
        let r = 7.5;
        let v0 = e.q_value(&key(), TechId(1));
        assert_eq!(v0, 0.0);
        for n in 1..=60 {
            e.learn(key(), TechId(1), r).unwrap();
            let v = e.q_value(&key(), TechId(1));
            let bound = 0.9f64.powi(n) * (v0 - r).abs();
            assert!((v - r).abs() <= bound + 1e-9, "step {n}: |{v} - {r}| > {bound}");
        }
    }

    #[test]
    fn single_update_is_moving_average() {
        let mut e = PolicyEngine::new(LearningConfig::default(), 3).unwrap();
        e.learn(key(), TechId(0), 10.0).unwrap();
        assert!((e.q_value(&key(), TechId(0)) - 1.0).abs() < 1e-12);
        e.learn(key(), TechId(0), 10.0).unwrap();
        assert!((e.q_value(&key(), TechId(0)) - 1.9).abs() < 1e-12);
        // other actions untouched
        assert_eq!(e.q_value(&key(), TechId(2)), 0.0);
    }

    #[test]
    fn exploit_picks_highest_value() {
        let mut e = greedy_engine(3);
        e.learn(key(), TechId(2), 5.0).unwrap();
        e.learn(key(), TechId(1), 1.0).unwrap();
        let mut rng = SimRng::new(1);
        for _ in 0..50 {
            assert_eq!(e.select_action(&key(), all3(), rng.inner()), Some(TechId(2)));
        }
    }

    #[test]
    fn exploit_ties_go_to_first_action() {
        let e = greedy_engine(3);
        let mut rng = SimRng::new(1);
        assert_eq!(e.select_action(&key(), all3(), rng.inner()), Some(TechId(0)));
        let later: TechSet = [TechId(2), TechId(1)].into_iter().collect();
        assert_eq!(e.select_action(&key(), later, rng.inner()), Some(TechId(1)));
    }

    #[test]
    fn exploit_restricted_to_available() {
        let mut e = greedy_engine(3);
        e.learn(key(), TechId(0), 100.0).unwrap();
        let only_lte = TechSet::single(TechId(2)).unwrap();
        let mut rng = SimRng::new(4);
        assert_eq!(e.select_action(&key(), only_lte, rng.inner()), Some(TechId(2)));
    }

    #[test]
    fn negative_values_still_select() {
        let mut e = greedy_engine(3);
        for a in 0..3 {
            e.learn(key(), TechId(a), -10.0 - a as f64).unwrap();
        }
        let mut rng = SimRng::new(4);
        assert_eq!(e.select_action(&key(), all3(), rng.inner()), Some(TechId(0)));
    }

    #[test]
    fn explore_covers_every_available_action() {
        let e = PolicyEngine::new(LearningConfig::default(), 3).unwrap();
        let mut rng = SimRng::new(99);
        let mut seen = [0usize; 3];
        for _ in 0..3_000 {
            let a = e.select_action(&key(), all3(), rng.inner()).unwrap();
            seen[a.index()] += 1;
        }
        for count in seen {
            assert!((800..1_200).contains(&count), "{seen:?}");
        }
    }

    #[test]
    fn empty_availability_selects_nothing() {
        let e = PolicyEngine::new(LearningConfig::default(), 3).unwrap();
        let mut rng = SimRng::new(0);
        assert_eq!(e.select_action(&key(), TechSet::EMPTY, rng.inner()), None);
    }

    #[test]
    fn unknown_action_fails_loudly() {
        let mut e = PolicyEngine::new(LearningConfig::default(), 3).unwrap();
        assert_eq!(
            e.learn(key(), TechId(3), 1.0).unwrap_err(),
            PolicyError::UnknownAction { action: TechId(3), width: 3 }
        );
        // rejected update leaves schedule and table alone
        assert_eq!(e.epsilon(), 1.0);
        assert!(e.table().is_empty());
    }

    #[test]
    fn telemetry_and_reset() {
        let mut e = PolicyEngine::new(LearningConfig::default(), 3).unwrap();
        e.learn(key(), TechId(0), 4.0).unwrap();
        e.learn(StateKey::new(DistanceBucket::Far, all3()), TechId(2), 2.0).unwrap();
        let t = e.telemetry();
        assert_eq!(t.episodes, 2);
        assert_eq!(t.total_reward, 6.0);
        assert_eq!(t.average_reward, 3.0);
        assert_eq!(t.table_states, 2);
        assert!(t.epsilon < 1.0);

        e.reset();
        assert_eq!(e.epsilon(), 1.0);
        assert_eq!(e.telemetry().episodes, 0);
        assert!(e.table().is_empty());
    }
}

// ── Rewards ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reward {
    use crate::{PolicyError, RewardModel, Rewards};

    #[test]
    fn success_and_failure_terms() {
        let m = RewardModel::default();
        // 10 - 20*0.1 - 30*0.01
        assert!((m.reward(true, 20.0, 30.0) - 7.7).abs() < 1e-12);
        // -5 - 20*0.1 - 30*0.01
        assert!((m.reward(false, 20.0, 30.0) + 7.3).abs() < 1e-12);
    }

    #[test]
    fn zero_inputs_give_base_reward() {
        let m = RewardModel::default();
        assert_eq!(m.reward(true, 0.0, 0.0), 10.0);
        assert_eq!(m.reward(false, 0.0, 0.0), -5.0);
    }

    #[test]
    fn switching_cost_applies_only_on_switch() {
        let m = RewardModel::new(Rewards { switching_cost: 2.0, ..Rewards::default() }).unwrap();
        let base = m.reward(true, 10.0, 10.0);
        assert_eq!(m.reward_with_switch(true, 10.0, 10.0, false), base);
        assert_eq!(m.reward_with_switch(true, 10.0, 10.0, true), base - 2.0);
    }

    #[test]
    fn non_finite_constants_rejected() {
        let err = RewardModel::new(Rewards { latency_penalty: f64::INFINITY, ..Rewards::default() })
            .unwrap_err();
        assert!(matches!(err, PolicyError::InvalidReward { name: "latency_penalty", .. }));
    }
}

// ── Baselines and the trait seam ──────────────────────────────────────────────

#[cfg(test)]
mod baseline {
    use rat_core::{SimRng, TechId};
    use rat_net::NetworkCatalog;

    use super::helpers::{availability_at, greedy_engine};
    use crate::{
        BucketThresholds, HeuristicPolicy, RandomPolicy, SelectionContext, SelectionPolicy,
        SignalStrengthPolicy, StateKey, StaticPolicy,
    };

    fn ctx<'a>(
        catalog: &'a NetworkCatalog,
        availability: &'a rat_net::Availability,
        previous: Option<TechId>,
    ) -> SelectionContext<'a> {
        let t = BucketThresholds::from_catalog(catalog);
        SelectionContext {
            state: StateKey::from_availability(availability, &t),
            availability,
            catalog,
            previous,
        }
    }

    #[test]
    fn static_falls_back_when_unavailable() {
        let c = NetworkCatalog::default_v2x();
        let near = availability_at(&c, 10.0);
        let far = availability_at(&c, 100.0);
        let mut rng = SimRng::new(0);
        let p = StaticPolicy(TechId(1));
        assert_eq!(p.select(&ctx(&c, &near, None), rng.inner()), Some(TechId(1)));
        assert_eq!(p.select(&ctx(&c, &far, None), rng.inner()), Some(TechId(2)));
    }

    #[test]
    fn random_stays_within_available() {
        let c = NetworkCatalog::default_v2x();
        let a = availability_at(&c, 50.0);
        let mut rng = SimRng::new(3);
        for _ in 0..200 {
            let t = RandomPolicy.select(&ctx(&c, &a, None), rng.inner()).unwrap();
            assert!(a.techs.contains(t));
        }
        let none = availability_at(&c, 500.0);
        assert_eq!(RandomPolicy.select(&ctx(&c, &none, None), rng.inner()), None);
    }

    #[test]
    fn signal_strength_from_a_shared_site() {
        let c = NetworkCatalog::default_v2x();
        let mut rng = SimRng::new(0);
        // 10 m: DSRC 0.75, WIFI 0.83, LTE 0.93
        let a = availability_at(&c, 10.0);
        assert_eq!(SignalStrengthPolicy.select(&ctx(&c, &a, None), rng.inner()), Some(TechId(2)));
        let none = availability_at(&c, 500.0);
        assert_eq!(SignalStrengthPolicy.select(&ctx(&c, &none, None), rng.inner()), None);
    }

    #[test]
    fn signal_strength_prefers_the_near_tower() {
        use rat_core::Position;
        use rat_net::{AvailabilityResolver, InfrastructureLayoutBuilder};

        let c = NetworkCatalog::default_v2x();
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_tower(Position::ORIGIN, TechId(0)).unwrap();
        b.add_tower(Position::ground(100.0, 0.0), TechId(1)).unwrap();
        b.add_tower(Position::ground(100.0, 0.0), TechId(2)).unwrap();
        let layout = b.build(&c).unwrap();
        // 2 m from DSRC (0.95), 98 m from LTE (0.35), WIFI out of range
        let a = AvailabilityResolver::new(&c, &layout).available(Position::ground(2.0, 0.0));
        assert_eq!(a.ordered(), [TechId(0), TechId(2)]);
        let mut rng = SimRng::new(0);
        assert_eq!(SignalStrengthPolicy.select(&ctx(&c, &a, None), rng.inner()), Some(TechId(0)));
    }

    #[test]
    fn signal_strength_ties_go_to_lowest_id() {
        let c = rat_net::NetworkCatalogBuilder::new(100.0)
            .profile("A", 10.0, 0.1, 50.0)
            .profile("B", 10.0, 0.1, 50.0)
            .build()
            .unwrap();
        let a = availability_at(&c, 20.0);
        let mut rng = SimRng::new(0);
        assert_eq!(SignalStrengthPolicy.select(&ctx(&c, &a, None), rng.inner()), Some(TechId(0)));
    }

    #[test]
    fn heuristic_prefers_dsrc_up_close() {
        let c = NetworkCatalog::default_v2x();
        let a = availability_at(&c, 5.0);
        let mut rng = SimRng::new(0);
        let p = HeuristicPolicy::default();
        assert_eq!(p.select(&ctx(&c, &a, None), rng.inner()), Some(TechId(0)));
    }

    #[test]
    fn heuristic_stay_bonus_is_sticky() {
        let c = NetworkCatalog::default_v2x();
        // At 35 m: DSRC = -20 - 20 - 87.5 = -127.5, WIFI = -50 - 50 - 58.3 = -158.3
        let a = availability_at(&c, 35.0);
        let mut rng = SimRng::new(0);
        let p = HeuristicPolicy::default();
        assert_eq!(p.select(&ctx(&c, &a, None), rng.inner()), Some(TechId(0)));
        assert_eq!(p.select(&ctx(&c, &a, Some(TechId(1))), rng.inner()), Some(TechId(1)));
        assert_eq!(p.exploration_rate(), 0.0);
        assert_eq!(p.action_count(), None);
    }

    #[test]
    fn engine_through_trait() {
        let c = NetworkCatalog::default_v2x();
        let a = availability_at(&c, 50.0);
        let mut e = greedy_engine(3);
        let context = ctx(&c, &a, None);
        SelectionPolicy::learn(&mut e, context.state, TechId(2), 3.0).unwrap();
        let mut rng = SimRng::new(0);
        assert_eq!(e.select(&context, rng.inner()), Some(TechId(2)));
        assert_eq!(SelectionPolicy::action_count(&e), Some(3));
        assert_eq!(e.exploration_rate(), 0.0);
    }
}
