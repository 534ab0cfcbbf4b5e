//! Artifact naming and variant enumeration tests.

use lgbm_fixtures::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn kind_strategy() -> impl Strategy<Value = ProblemKind> {
    prop_oneof![
        Just(ProblemKind::MulticlassClassification),
        Just(ProblemKind::BinaryClassification),
        Just(ProblemKind::Regression),
        Just(ProblemKind::CountRegression),
    ]
}

fn boosting_strategy() -> impl Strategy<Value = BoostingStrategy> {
    prop_oneof![
        Just(BoostingStrategy::GBDT),
        Just(BoostingStrategy::RandomForest),
        Just(BoostingStrategy::DART),
        Just(BoostingStrategy::GOSS),
    ]
}

fn dataset_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z]{0,8}(NA)?"
}

fn truncation() -> impl Strategy<Value = Option<usize>> {
    prop_oneof![Just(None), (1usize..500).prop_map(Some)]
}

#[test]
fn test_reference_scenarios() {
    let iris_7 = name_for(
        ProblemKind::MulticlassClassification,
        BoostingStrategy::GBDT,
        "Iris",
        Some(7),
    );
    assert_eq!(iris_7.table_file_name(), "ClassificationIris@7.csv");

    let rf_audit = name_for(
        ProblemKind::BinaryClassification,
        BoostingStrategy::RandomForest,
        "Audit",
        None,
    );
    assert_eq!(rf_audit.model_file_name(), "RFClassificationAudit.txt");
    assert_eq!(rf_audit.table_file_name(), "RFClassificationAudit.csv");

    let visit = name_for(ProblemKind::CountRegression, BoostingStrategy::GBDT, "VisitNA", Some(31));
    assert_eq!(visit.as_str(), "RegressionVisitNA@31");
}

#[test]
fn test_enumeration_matches_reference_order() {
    let task = TaskBuilder::new("Audit", ProblemKind::BinaryClassification, "Adjusted")
        .n_estimators(31)
        .truncation(17)
        .strategy(StrategyOverride::new(BoostingStrategy::RandomForest).with_bagging(10, 0.75))
        .build()
        .unwrap();

    let variants = enumerate(&task).unwrap();
    let tables: Vec<&str> = variants.iter().map(|v| v.prediction_name.as_str()).collect();
    assert_eq!(
        tables,
        vec!["ClassificationAudit", "ClassificationAudit@17", "RFClassificationAudit"]
    );

    let models: Vec<&str> = variants
        .iter()
        .filter(|v| v.writes_model())
        .map(|v| v.model_name.as_str())
        .collect();
    assert_eq!(models, vec!["ClassificationAudit", "RFClassificationAudit"]);
}

#[test]
fn test_catalog_names_are_unique() {
    let tasks = catalog::default_tasks().unwrap();
    let variants: Vec<Variant> = tasks.iter().flat_map(|t| enumerate(t).unwrap()).collect();

    let tables: HashSet<_> = variants.iter().map(|v| &v.prediction_name).collect();
    assert_eq!(tables.len(), variants.len());

    let written: Vec<_> = variants
        .iter()
        .filter(|v| v.writes_model())
        .map(|v| &v.model_name)
        .collect();
    let unique: HashSet<_> = written.iter().collect();
    assert_eq!(unique.len(), written.len());
    assert!(written.iter().all(|name| !name.is_truncated()));
}

proptest! {
    #[test]
    fn prop_names_are_injective(
        a in (kind_strategy(), boosting_strategy(), dataset_name(), truncation()),
        b in (kind_strategy(), boosting_strategy(), dataset_name(), truncation()),
    ) {
        let name_a = name_for(a.0, a.1, &a.2, a.3);
        let name_b = name_for(b.0, b.1, &b.2, b.3);

        if name_a == name_b {
            prop_assert_eq!(a.0.function_name(), b.0.function_name());
            prop_assert_eq!(a.1, b.1);
            prop_assert_eq!(&a.2, &b.2);
            prop_assert_eq!(a.3, b.3);
        }
    }

    #[test]
    fn prop_truncation_suffix_only_when_truncated(
        kind in kind_strategy(),
        strategy in boosting_strategy(),
        dataset in dataset_name(),
        iteration in truncation(),
    ) {
        let name = name_for(kind, strategy, &dataset, iteration);
        prop_assert_eq!(name.is_truncated(), iteration.is_some());
        prop_assert!(name.as_str().contains(kind.function_name()));
        prop_assert_eq!(
            name.as_str().starts_with(kind.function_name()),
            strategy == BoostingStrategy::GBDT
        );
    }

    #[test]
    fn prop_enumeration_is_deterministic(
        kind in kind_strategy(),
        dataset in dataset_name(),
        truncations in prop::collection::btree_set(1usize..=50, 0..4),
    ) {
        let mut builder = TaskBuilder::new(dataset, kind, "y")
            .n_estimators(50)
            .strategy(StrategyOverride::new(BoostingStrategy::RandomForest).with_bagging(3, 0.75));
        for &iteration in &truncations {
            builder = builder.truncation(iteration);
        }
        let task = builder.build().unwrap();
        let reloaded: Task = serde_json::from_str(&serde_json::to_string(&task).unwrap()).unwrap();

        let names = |task: &Task| -> Vec<(ArtifactName, ArtifactName)> {
            enumerate(task)
                .unwrap()
                .into_iter()
                .map(|v| (v.model_name, v.prediction_name))
                .collect()
        };
        prop_assert_eq!(names(&task), names(&task));
        prop_assert_eq!(names(&task), names(&reloaded));
    }

    #[test]
    fn prop_enumerated_names_are_unique(
        kind in kind_strategy(),
        dataset in dataset_name(),
        truncations in prop::collection::btree_set(1usize..=50, 0..4),
        extra in prop::collection::btree_set(prop_oneof![Just(1u8), Just(2u8)], 0..3),
    ) {
        let mut builder = TaskBuilder::new(dataset, kind, "y").n_estimators(50);
        for &iteration in &truncations {
            builder = builder.truncation(iteration);
        }
        for &choice in &extra {
            let strategy = match choice {
                1 => StrategyOverride::new(BoostingStrategy::GOSS).with_truncation(10),
                _ => StrategyOverride::new(BoostingStrategy::RandomForest).with_bagging(3, 0.75),
            };
            builder = builder.strategy(strategy);
        }
        let task = builder.build().unwrap();

        let variants = enumerate(&task).unwrap();
        prop_assert_eq!(
            variants.len(),
            1 + truncations.len() + extra.len() + usize::from(extra.contains(&1))
        );

        let names: HashSet<_> = variants.iter().map(|v| v.prediction_name.clone()).collect();
        prop_assert_eq!(names.len(), variants.len());

        for variant in &variants {
            prop_assert_eq!(variant.writes_model(), variant.truncation().is_none());
            prop_assert_eq!(variant.params.n_estimators, 50);
        }
    }
}
