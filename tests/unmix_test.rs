//! End-to-end tests of the unmix search through the public API, including
//! brute-force optimality comparison on small synthetic catalogs.

use mixopt::{
    mix_ids, unmix, unmix_best_base, AdditiveId, CancelToken, Catalog, Money, ParallelConfig,
    RankFilter, UnmixConfig, UnmixOutcome,
};

const CATALOG: &str = r#"{
    "ranks": ["Novice", "Dealer", "Baron"],
    "effects": {
        "Bright": { "multiplier": 0.2 },
        "Fast": { "multiplier": 0.3 },
        "Glow": { "multiplier": 0.1 }
    },
    "products": {
        "Plain": { "cost": 0.0, "sell_value": 35.0, "effects": [] },
        "Shiny": {
            "cost": 2.0,
            "sell_value": 50.0,
            "rank": "Dealer",
            "effects": ["Bright"]
        }
    },
    "additives": {
        "A": {
            "cost": 2.0,
            "rules": [ { "forbidden": ["Bright"], "add": "Bright" } ]
        },
        "B": {
            "cost": 5.0,
            "rules": [
                { "forbidden": ["Bright"], "add": "Bright" },
                { "required": ["Bright"], "add": "Fast" }
            ]
        },
        "C": {
            "cost": 1.0,
            "rank": "Baron",
            "rules": [
                { "forbidden": ["Bright"], "add": "Bright" },
                { "required": ["Fast"], "remove": "Fast", "add": "Glow" }
            ]
        }
    }
}"#;

fn names(catalog: &Catalog, ids: &[AdditiveId]) -> Vec<String> {
    ids.iter()
        .map(|&id| catalog.additive(id).name.clone())
        .collect()
}

/// Exhaustively enumerate every additive sequence up to `max_steps` and
/// return the best (cost, sequence) reaching a superset of `target`, using
/// the same tie-breaking as the search.
fn brute_force(
    catalog: &Catalog,
    base: mixopt::BaseId,
    target: mixopt::EffectSet,
    candidates: &[AdditiveId],
    max_steps: usize,
) -> Option<(Money, Vec<AdditiveId>)> {
    let mut best: Option<(Money, Vec<AdditiveId>)> = None;
    let mut frontier: Vec<Vec<AdditiveId>> = vec![Vec::new()];
    for _ in 0..=max_steps {
        let mut next = Vec::new();
        for seq in &frontier {
            let path = mix_ids(catalog, base, seq);
            if path.final_effects().is_superset_of(target) {
                let cost: Money = seq.iter().map(|&id| catalog.additive(id).cost).sum();
                let candidate = (cost, seq.clone());
                let is_better = match &best {
                    None => true,
                    Some((bc, bs)) => {
                        (cost, seq.len(), seq) < (*bc, bs.len(), bs)
                    }
                };
                if is_better {
                    best = Some(candidate);
                }
            }
            for &a in candidates {
                let mut longer = seq.clone();
                longer.push(a);
                next.push(longer);
            }
        }
        frontier = next;
    }
    best
}

#[test]
fn canonical_scenario_picks_the_cheap_single_step() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let base = catalog.base_id("Plain").unwrap();
    let target = catalog.effect_set(&["Bright"]).unwrap();
    let candidates = vec![
        catalog.additive_id("A").unwrap(),
        catalog.additive_id("B").unwrap(),
    ];

    let outcome = unmix(
        &catalog,
        base,
        target,
        &candidates,
        &UnmixConfig::default().with_max_steps(2),
        &CancelToken::new(),
    )
    .unwrap();

    let solution = outcome.solution().expect("solution expected");
    assert_eq!(names(&catalog, &solution.additives), vec!["A"]);
    assert_eq!(solution.cost, Money::from_cents(200));
}

#[test]
fn search_matches_brute_force_on_every_reachable_target() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let base = catalog.base_id("Plain").unwrap();
    let candidates: Vec<AdditiveId> = catalog.additives().map(|(id, _)| id).collect();
    let config = UnmixConfig::default().with_max_steps(3);

    let effect_names = ["Bright", "Fast", "Glow"];
    // All non-empty subsets of the three effects.
    for mask in 1u8..8 {
        let target_names: Vec<&str> = effect_names
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, n)| *n)
            .collect();
        let target = catalog.effect_set(&target_names).unwrap();

        let outcome = unmix(
            &catalog,
            base,
            target,
            &candidates,
            &config,
            &CancelToken::new(),
        )
        .unwrap();
        let expected = brute_force(&catalog, base, target, &candidates, 3);

        match (expected, outcome.solution()) {
            (None, None) => {}
            (Some((cost, seq)), Some(solution)) => {
                assert_eq!(
                    solution.cost, cost,
                    "cost mismatch for target {target_names:?}"
                );
                assert_eq!(
                    solution.additives, seq,
                    "sequence mismatch for target {target_names:?}"
                );
            }
            (expected, found) => panic!(
                "reachability mismatch for target {target_names:?}: \
                 brute force {expected:?}, search {found:?}"
            ),
        }
    }
}

#[test]
fn rank_gated_additives_never_appear_in_solutions() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let base = catalog.base_id("Plain").unwrap();
    let target = catalog.effect_set(&["Bright"]).unwrap();

    // At Novice rank "C" (the cheapest Bright source) is locked out.
    let filter = RankFilter::AtRank(0);
    let candidates = catalog.unlocked_additives(filter);
    assert!(!candidates.contains(&catalog.additive_id("C").unwrap()));

    let outcome = unmix(
        &catalog,
        base,
        target,
        &candidates,
        &UnmixConfig::default().with_max_steps(2),
        &CancelToken::new(),
    )
    .unwrap();
    let solution = outcome.solution().unwrap();
    assert_eq!(names(&catalog, &solution.additives), vec!["A"]);

    // With everything unlocked, the cheaper locked additive wins instead.
    let all = catalog.unlocked_additives(RankFilter::UnlockAll);
    let outcome = unmix(
        &catalog,
        base,
        target,
        &all,
        &UnmixConfig::default().with_max_steps(2),
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(
        names(&catalog, &outcome.solution().unwrap().additives),
        vec!["C"]
    );
}

#[test]
fn best_base_mode_respects_rank_gating() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let target = catalog.effect_set(&["Bright"]).unwrap();

    // "Shiny" already has Bright but unlocks at Dealer.
    let novice_bases = catalog.unlocked_bases(RankFilter::AtRank(0));
    let candidates = catalog.unlocked_additives(RankFilter::AtRank(0));
    let outcome = unmix_best_base(
        &catalog,
        &novice_bases,
        target,
        &candidates,
        &UnmixConfig::default().with_max_steps(2),
        &ParallelConfig::default().with_workers(2),
        &CancelToken::new(),
    )
    .unwrap();
    let solution = outcome.solution().unwrap();
    assert_eq!(catalog.base(solution.base).name, "Plain");
    assert_eq!(solution.cost, Money::from_cents(200));

    let dealer_bases = catalog.unlocked_bases(RankFilter::AtRank(1));
    let outcome = unmix_best_base(
        &catalog,
        &dealer_bases,
        target,
        &candidates,
        &UnmixConfig::default().with_max_steps(2),
        &ParallelConfig::default().with_workers(2),
        &CancelToken::new(),
    )
    .unwrap();
    let solution = outcome.solution().unwrap();
    assert_eq!(catalog.base(solution.base).name, "Shiny");
    assert_eq!(solution.cost, Money::ZERO);
}

#[test]
fn cancellation_yields_cancelled_not_notfound() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let base = catalog.base_id("Plain").unwrap();
    // A deep target; without the pre-set token this search would finish.
    let target = catalog.effect_set(&["Glow", "Fast", "Bright"]).unwrap();
    let candidates: Vec<AdditiveId> = catalog.additives().map(|(id, _)| id).collect();

    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = unmix(
        &catalog,
        base,
        target,
        &candidates,
        &UnmixConfig::default().with_max_steps(6),
        &cancel,
    )
    .unwrap();
    assert!(matches!(outcome, UnmixOutcome::Cancelled { .. }));
}

#[test]
fn not_found_within_bound_is_a_normal_outcome() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let base = catalog.base_id("Plain").unwrap();
    // Glow needs Bright, then Fast, then the Glow rewrite: three
    // applications minimum, beyond a bound of 2.
    let target = catalog.effect_set(&["Glow"]).unwrap();
    let candidates: Vec<AdditiveId> = catalog.additives().map(|(id, _)| id).collect();

    let outcome = unmix(
        &catalog,
        base,
        target,
        &candidates,
        &UnmixConfig::default().with_max_steps(2),
        &CancelToken::new(),
    )
    .unwrap();
    assert!(matches!(outcome, UnmixOutcome::NotFound { .. }));
}
