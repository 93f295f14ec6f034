//! Unit tests for rat-net.
//!
//! All tests use the three-radio fixture catalog and hand-placed nodes.

#[cfg(test)]
mod helpers {
    use rat_core::Position;

    use crate::{InfrastructureLayout, InfrastructureLayoutBuilder, NetworkCatalog};

    /// One shared road-side unit at the origin.
    pub fn shared_rsu(catalog: &NetworkCatalog) -> InfrastructureLayout {
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_shared(Position::ORIGIN, catalog.all());
        b.build(catalog).unwrap()
    }

    /// Dedicated towers: DSRC at x=-100, WIFI at x=+100, LTE at the origin.
    pub fn per_tech_towers(catalog: &NetworkCatalog) -> InfrastructureLayout {
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_tower(Position::ground(-100.0, 0.0), catalog.lookup("DSRC").unwrap()).unwrap();
        b.add_tower(Position::ground(100.0, 0.0), catalog.lookup("WIFI").unwrap()).unwrap();
        b.add_tower(Position::ORIGIN, catalog.lookup("LTE").unwrap()).unwrap();
        b.build(catalog).unwrap()
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalog {
    use rat_core::TechId;

    use crate::{NetError, NetworkCatalog, NetworkCatalogBuilder};

    #[test]
    fn default_fixture_values() {
        let c = NetworkCatalog::default_v2x();
        assert_eq!(c.len(), 3);
        assert_eq!(c.max_total_range(), 150.0);
        let wifi = c.profile(c.lookup("WIFI").unwrap());
        assert_eq!(wifi.base_latency_ms, 50.0);
        assert_eq!(wifi.base_loss_rate, 0.05);
        assert_eq!(wifi.range, 60.0);
        assert_eq!(c.all().len(), 3);
    }

    #[test]
    fn ids_follow_insertion_order() {
        let c = NetworkCatalog::default_v2x();
        let names: Vec<_> = c.iter().map(|p| (p.id.0, p.name.as_str())).collect();
        assert_eq!(names, [(0, "DSRC"), (1, "WIFI"), (2, "LTE")]);
        assert_eq!(c.name_of(Some(TechId(2))), "LTE");
        assert_eq!(c.name_of(None), "None");
        assert!(c.get(TechId(3)).is_none());
    }

    #[test]
    fn empty_catalog_rejected() {
        assert_eq!(NetworkCatalogBuilder::new(100.0).build().unwrap_err(), NetError::EmptyCatalog);
    }

    #[test]
    fn duplicate_name_rejected() {
        let err = NetworkCatalogBuilder::new(100.0)
            .profile("A", 1.0, 0.1, 10.0)
            .profile("A", 2.0, 0.1, 20.0)
            .build()
            .unwrap_err();
        assert_eq!(err, NetError::DuplicateTechnology("A".into()));
    }

    #[test]
    fn loss_rate_bounds_checked() {
        let err = NetworkCatalogBuilder::new(100.0)
            .profile("A", 1.0, 1.5, 10.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, NetError::InvalidLossRate { .. }));
    }

    #[test]
    fn negative_latency_rejected() {
        let err = NetworkCatalogBuilder::new(100.0)
            .profile("A", -1.0, 0.1, 10.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, NetError::InvalidParameter { field: "latency", .. }));
    }

    #[test]
    fn range_beyond_dead_zone_rejected() {
        let err = NetworkCatalogBuilder::new(100.0)
            .profile("A", 1.0, 0.1, 120.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, NetError::RangeBeyondDeadZone { .. }));
    }

    #[test]
    fn range_equal_to_dead_zone_accepted() {
        assert!(NetworkCatalogBuilder::new(100.0).profile("A", 1.0, 0.1, 100.0).build().is_ok());
    }

    #[test]
    fn bad_max_range_rejected() {
        let err = NetworkCatalogBuilder::new(0.0).profile("A", 1.0, 0.1, 0.0).build().unwrap_err();
        assert_eq!(err, NetError::InvalidMaxRange(0.0));
    }

    #[test]
    fn too_many_technologies_rejected() {
        let b = (0..33).fold(NetworkCatalogBuilder::new(10.0), |b, i| {
            b.profile(format!("T{i}"), 1.0, 0.0, 1.0)
        });
        assert_eq!(b.build().unwrap_err(), NetError::TooManyTechnologies(33));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn catalog_from_json() {
        use crate::CatalogSpec;

        let json = r#"{
            "max_total_range": 150,
            "profiles": [
                { "name": "DSRC", "latency_ms": 20, "loss_rate": 0.02, "range": 40 },
                { "name": "LTE",  "latency_ms": 120, "loss_rate": 0.1, "range": 150 }
            ]
        }"#;
        let spec: CatalogSpec = serde_json::from_str(json).unwrap();
        let c = NetworkCatalog::try_from(spec).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.lookup("LTE"), Some(TechId(1)));
    }
}

// ── Infrastructure ────────────────────────────────────────────────────────────

#[cfg(test)]
mod infrastructure {
    use rat_core::{CoreError, NodeId, Position, TechId, TechSet};

    use super::helpers::per_tech_towers;
    use crate::{InfrastructureLayoutBuilder, NetError, NetworkCatalog};

    #[test]
    fn nearest_per_technology() {
        let c = NetworkCatalog::default_v2x();
        let layout = per_tech_towers(&c);
        let p = Position::ground(-90.0, 0.0);
        let (node, d) = layout.nearest(TechId(0), p).unwrap();
        assert_eq!(node, NodeId(0));
        assert!((d - 10.0).abs() < 1e-9);
        let (node, d) = layout.nearest(TechId(1), p).unwrap();
        assert_eq!(node, NodeId(1));
        assert!((d - 190.0).abs() < 1e-9);
        assert!(layout.nearest(TechId(7), p).is_none());
    }

    #[test]
    fn nearest_any_picks_closest_node() {
        let c = NetworkCatalog::default_v2x();
        let layout = per_tech_towers(&c);
        let (node, d) = layout.nearest_any(Position::ground(30.0, 0.0)).unwrap();
        assert_eq!(node, NodeId(2));
        assert!((d - 30.0).abs() < 1e-9);
    }

    #[test]
    fn multiple_nodes_same_tech() {
        let c = NetworkCatalog::default_v2x();
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_shared(Position::ground(0.0, 0.0), c.all());
        b.add_shared(Position::ground(200.0, 0.0), c.all());
        let layout = b.build(&c).unwrap();
        let (node, _) = layout.nearest(TechId(0), Position::ground(180.0, 0.0)).unwrap();
        assert_eq!(node, NodeId(1));
    }

    #[test]
    fn unserved_technology_rejected() {
        let c = NetworkCatalog::default_v2x();
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_tower(Position::ORIGIN, TechId(0)).unwrap();
        b.add_tower(Position::ORIGIN, TechId(1)).unwrap();
        assert_eq!(b.build(&c).unwrap_err(), NetError::UnservedTechnology("LTE".into()));
    }

    #[test]
    fn unknown_technology_rejected() {
        let c = NetworkCatalog::default_v2x();
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_shared(Position::ORIGIN, c.all());
        b.add_tower(Position::ORIGIN, TechId(5)).unwrap();
        assert_eq!(
            b.build(&c).unwrap_err(),
            NetError::UnknownTechnology { node: NodeId(1), tech: TechId(5) }
        );
    }

    #[test]
    fn empty_node_rejected() {
        let c = NetworkCatalog::default_v2x();
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_shared(Position::ORIGIN, TechSet::EMPTY);
        assert_eq!(b.build(&c).unwrap_err(), NetError::NodeServesNothing(NodeId(0)));
    }

    #[test]
    fn non_finite_position_rejected() {
        let c = NetworkCatalog::default_v2x();
        let mut b = InfrastructureLayoutBuilder::new();
        b.add_shared(Position::new(f64::NAN, 0.0, 0.0), c.all());
        assert_eq!(b.build(&c).unwrap_err(), NetError::InvalidPosition(NodeId(0)));
    }

    #[test]
    fn tower_beyond_set_capacity_rejected() {
        let mut b = InfrastructureLayoutBuilder::new();
        assert_eq!(
            b.add_tower(Position::ORIGIN, TechId(40)),
            Err(NetError::Core(CoreError::TechOutOfRange(TechId(40))))
        );
        assert!(b.build(&NetworkCatalog::default_v2x()).is_err());
    }

    #[test]
    fn node_errors_name_the_node() {
        assert_eq!(
            NetError::NodeServesNothing(NodeId(3)).to_string(),
            "NodeId(3) serves no technology"
        );
        assert_eq!(
            NetError::InvalidPosition(NodeId(7)).to_string(),
            "NodeId(7) has a non-finite position"
        );
    }
}

// ── Availability ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod availability {
    use rat_core::{Position, TechId};

    use super::helpers::{per_tech_towers, shared_rsu};
    use crate::{AvailabilityResolver, NetworkCatalog};

    #[test]
    fn all_available_at_rsu() {
        let c = NetworkCatalog::default_v2x();
        let layout = shared_rsu(&c);
        let a = AvailabilityResolver::new(&c, &layout).available(Position::ORIGIN);
        assert_eq!(a.ordered(), [TechId(0), TechId(1), TechId(2)]);
        assert_eq!(a.nearest_distance, 0.0);
    }

    #[test]
    fn range_boundary_inclusive() {
        let c = NetworkCatalog::default_v2x();
        let layout = shared_rsu(&c);
        let r = AvailabilityResolver::new(&c, &layout);
        let at_edge = r.available(Position::ground(40.0, 0.0));
        assert!(at_edge.techs.contains(TechId(0)));
        let past_edge = r.available(Position::ground(40.001, 0.0));
        assert!(!past_edge.techs.contains(TechId(0)));
        assert_eq!(past_edge.ordered(), [TechId(1), TechId(2)]);
    }

    #[test]
    fn only_lte_at_long_range() {
        let c = NetworkCatalog::default_v2x();
        let layout = shared_rsu(&c);
        let a = AvailabilityResolver::new(&c, &layout).available(Position::ground(100.0, 0.0));
        assert_eq!(a.ordered(), [TechId(2)]);
        assert!((a.distance(TechId(0)).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn nothing_beyond_dead_zone() {
        let c = NetworkCatalog::default_v2x();
        let layout = shared_rsu(&c);
        let a = AvailabilityResolver::new(&c, &layout).available(Position::ground(150.5, 0.0));
        assert!(a.is_empty());
    }

    #[test]
    fn wifi_at_dead_zone_is_excluded() {
        let c = NetworkCatalog::default_v2x();
        let layout = shared_rsu(&c);
        let a = AvailabilityResolver::new(&c, &layout).available(Position::ground(150.0, 0.0));
        assert!(!a.techs.contains(TechId(1)));
        assert_eq!(a.ordered(), [TechId(2)]);
    }

    #[test]
    fn per_tech_distances_differ() {
        let c = NetworkCatalog::default_v2x();
        let layout = per_tech_towers(&c);
        let a = AvailabilityResolver::new(&c, &layout).available(Position::ground(-80.0, 0.0));
        assert_eq!(a.ordered(), [TechId(0), TechId(2)]);
        assert_eq!(a.node(TechId(1)).map(|n| n.0), Some(1));
        assert!((a.distance(TechId(1)).unwrap() - 180.0).abs() < 1e-9);
    }
}

// ── Transmission ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod transmission {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use rat_core::{SimRng, TechId};

    use crate::{
        effective_loss_rate, latency_ms, signal_strength, NetworkCatalog, NetworkCatalogBuilder,
        TransmissionSimulator,
    };

    #[test]
    fn loss_at_range_equals_base() {
        let c = NetworkCatalog::default_v2x();
        for p in c.iter() {
            assert_eq!(effective_loss_rate(p.range, p, 150.0), p.base_loss_rate);
        }
    }

    #[test]
    fn loss_at_dead_zone_is_one() {
        let c = NetworkCatalog::default_v2x();
        for p in c.iter() {
            if p.range < 150.0 {
                assert_eq!(effective_loss_rate(150.0, p, 150.0), 1.0);
            }
            assert_eq!(effective_loss_rate(151.0, p, 150.0), 1.0);
        }
    }

    #[test]
    fn loss_non_decreasing_between_range_and_dead_zone() {
        let c = NetworkCatalog::default_v2x();
        let wifi = c.profile(TechId(1));
        let mut prev = effective_loss_rate(wifi.range, wifi, 150.0);
        let mut d = wifi.range;
        while d <= 150.0 {
            let l = effective_loss_rate(d, wifi, 150.0);
            assert!(l >= prev, "loss decreased at {d}: {l} < {prev}");
            assert!(l <= 1.0);
            prev = l;
            d += 0.5;
        }
    }

    #[test]
    fn loss_midpoint_interpolates() {
        let c = NetworkCatalog::default_v2x();
        let wifi = c.profile(TechId(1));
        // halfway between 60 and 150
        let l = effective_loss_rate(105.0, wifi, 150.0);
        assert!((l - (0.05 + 0.95 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn degenerate_span_saturates() {
        let c = NetworkCatalogBuilder::new(50.0).profile("X", 10.0, 0.2, 50.0).build().unwrap();
        let x = c.profile(TechId(0));
        assert_eq!(effective_loss_rate(50.0, x, 50.0), 0.2);
        assert_eq!(effective_loss_rate(50.0001, x, 50.0), 1.0);
        // caller-supplied max below range must not divide by zero
        assert_eq!(effective_loss_rate(60.0, x, 40.0), 1.0);
    }

    #[test]
    fn latency_grows_with_distance() {
        let c = NetworkCatalog::default_v2x();
        let dsrc = c.profile(TechId(0));
        assert_eq!(latency_ms(0.0, dsrc, 150.0), 20.0);
        assert_eq!(latency_ms(75.0, dsrc, 150.0), 30.0);
        assert_eq!(latency_ms(150.0, dsrc, 150.0), 40.0);
    }

    #[test]
    fn signal_full_at_node_and_zero_at_dead_zone() {
        let c = NetworkCatalog::default_v2x();
        for p in c.iter() {
            assert_eq!(signal_strength(0.0, p, 150.0), 1.0);
            assert_eq!(signal_strength(p.range, p, 150.0), 0.0);
            assert_eq!(signal_strength(150.0, p, 150.0), 0.0);
            assert_eq!(signal_strength(151.0, p, 150.0), 0.0);
        }
        let dsrc = c.profile(TechId(0));
        assert_eq!(signal_strength(20.0, dsrc, 150.0), 0.5);
        let wifi = c.profile(TechId(1));
        assert!((signal_strength(105.0, wifi, 150.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn signal_stays_in_unit_interval() {
        let c = NetworkCatalog::default_v2x();
        let sim = TransmissionSimulator::new(&c);
        for p in c.iter() {
            let mut d = 0.0;
            while d <= 200.0 {
                let s = sim.signal_strength(p.id, d);
                assert!((0.0..=1.0).contains(&s), "{} at {d}: {s}", p.name);
                d += 0.25;
            }
        }
    }

    #[test]
    fn signal_degenerate_profiles() {
        let c = NetworkCatalogBuilder::new(50.0)
            .profile("X", 10.0, 0.2, 50.0)
            .profile("Z", 10.0, 0.2, 0.0)
            .build()
            .unwrap();
        let x = c.profile(TechId(0));
        assert_eq!(signal_strength(50.0, x, 50.0), 0.0);
        assert_eq!(signal_strength(50.5, x, 50.0), 0.0);
        let z = c.profile(TechId(1));
        assert_eq!(signal_strength(0.0, z, 50.0), 1.0);
        assert_eq!(signal_strength(25.0, z, 50.0), 0.5);
    }

    #[test]
    fn dsrc_close_loss_fraction_matches_base_rate() {
        let c = NetworkCatalog::default_v2x();
        let sim = TransmissionSimulator::new(&c);
        let mut rng = SimRng::new(2024);
        let trials = 10_000;
        let lost = (0..trials)
            .filter(|_| !sim.transmit(TechId(0), 0.0, rng.inner()).success)
            .count();
        let frac = lost as f64 / trials as f64;
        assert!((frac - 0.02).abs() < 0.008, "observed loss {frac}");
    }

    #[test]
    fn wifi_at_dead_zone_never_succeeds() {
        let c = NetworkCatalog::default_v2x();
        let sim = TransmissionSimulator::new(&c);
        assert_eq!(sim.loss_rate(TechId(1), 150.0), 1.0);
        let mut rng = SimRng::new(5);
        for _ in 0..1_000 {
            assert!(!sim.transmit(TechId(1), 150.0, rng.inner()).success);
        }
    }

    #[test]
    fn latency_reported_on_failure() {
        let c = NetworkCatalog::default_v2x();
        let sim = TransmissionSimulator::new(&c);
        let out = sim.transmit(TechId(1), 150.0, &mut SmallRng::seed_from_u64(1));
        assert!(!out.success);
        assert_eq!(out.latency_ms, 100.0);
        assert_eq!(out.tech, TechId(1));
        assert_eq!(out.distance, 150.0);
    }

    #[test]
    fn same_seed_same_outcomes() {
        let c = NetworkCatalog::default_v2x();
        let sim = TransmissionSimulator::new(&c);
        let mut a = SmallRng::seed_from_u64(77);
        let mut b = SmallRng::seed_from_u64(77);
        for i in 0..200 {
            let d = i as f64 * 0.75;
            assert_eq!(sim.transmit(TechId(2), d, &mut a), sim.transmit(TechId(2), d, &mut b));
        }
    }
}
