use std::collections::HashSet;

use pretty_assertions::assert_eq;
use seqpool_core::io::{FrequencyRow, MiningSnapshot};
use seqpool_core::model::config::ManagerConfig;
use seqpool_core::model::operation::{Declaration, Operation, OperationKind};
use seqpool_core::model::scope::{ScopeKey, ScopeMode};
use seqpool_core::model::sequence::{NominalTypes, Sequence, Step, Type};
use seqpool_core::{ComponentManager, PoolError};

fn int(value: i32) -> Sequence {
	Sequence::literal(Type::primitive("int"), &value.to_string())
}

fn text(value: &str) -> Sequence {
	Sequence::literal(Type::text("String"), &format!("\"{}\"", value))
}

fn method(unit: &str, namespace: &str, name: &str, inputs: Vec<Type>) -> Operation {
	Operation::new(
		name,
		OperationKind::Invocation(Declaration::new(unit, Some(namespace))),
		inputs,
		Type::void(),
	)
}

#[test]
fn generated_sequences_are_found_by_compatible_queries() {
	let mut types = NominalTypes::new();
	types.declare_subtype(Type::reference("Savings"), Type::reference("Account"));
	let mut manager = ComponentManager::new(ManagerConfig::default()).with_oracle(types);

	let savings = int(10)
		.extend(Step::new("new Savings(v0)", Type::reference("Savings"), vec![0]))
		.unwrap();
	manager.add_generated(savings.clone());

	let transfer = method("Bank", "bank", "transfer", vec![Type::reference("Bank"), Type::reference("Account")]);
	assert!(manager.query(&transfer, 1, false).unwrap().contains(&savings));
	assert!(manager.sequences_for_type(&Type::reference("Account")).contains(&savings));
	assert!(manager.sequences_for_type(&Type::primitive("int")).contains(&savings));
}

#[test]
fn reset_restores_the_seed_set() {
	let seeds = vec![int(1), text("a")];
	let mut manager = ComponentManager::with_seeds(ManagerConfig::default(), seeds.clone());

	let generated = int(2);
	manager.add_generated(generated.clone());
	assert_eq!(manager.generated_count(), 1);
	assert_eq!(manager.all_generated_sequences().len(), 3);

	manager.reset();
	let expected: HashSet<Sequence> = seeds.into_iter().collect();
	assert_eq!(manager.generated_count(), 0);
	assert_eq!(manager.all_generated_sequences(), expected);
	assert!(!manager.sequences_for_type(&Type::primitive("int")).contains(&generated));
}

#[test]
fn mixing_scoped_modes_fails_before_any_query() {
	let mut manager = ComponentManager::new(ManagerConfig::default());
	manager.register_literal(ScopeKey::unit("Account"), int(1)).unwrap();

	let err = manager.register_literal(ScopeKey::namespace("bank"), int(2)).unwrap_err();
	assert!(matches!(
		err,
		PoolError::MixedLiteralScopes { active: ScopeMode::DeclaringUnit, requested: ScopeMode::Namespace }
	));
	assert!(err.is_fatal());
}

#[test]
fn unit_literals_are_only_offered_to_their_unit() {
	let mut manager = ComponentManager::new(ManagerConfig::default());
	let limit = int(1_000);
	manager.register_literal(ScopeKey::unit("Account"), limit.clone()).unwrap();

	let withdraw = method("Account", "bank", "withdraw", vec![Type::reference("Account"), Type::primitive("int")]);
	let restock = method("Shelf", "bank", "restock", vec![Type::reference("Shelf"), Type::primitive("int")]);

	assert!(manager.query(&withdraw, 1, false).unwrap().contains(&limit));
	assert!(!manager.query(&restock, 1, false).unwrap().contains(&limit));
}

#[test]
fn receiver_query_on_a_plain_value_slot_is_a_precondition_violation() {
	let manager = ComponentManager::new(ManagerConfig::default());
	let parse = Operation::new("parse", OperationKind::Standalone, vec![Type::primitive("int")], Type::reference("Number"));

	match manager.query(&parse, 0, true) {
		Err(PoolError::ReceiverPrecondition { operation, slot, ty }) => {
			assert_eq!(operation, "parse(int)");
			assert_eq!(slot, 0);
			assert_eq!(ty, Type::primitive("int"));
		}
		other => panic!("expected a precondition violation, got {:?}", other.map(|list| list.len())),
	}
}

#[test]
fn weighted_selection_follows_tf_idf_weights() {
	let mut config = ManagerConfig::with_mining(1.0).unwrap();
	config.seed = 2024;
	let mut manager = ComponentManager::new(config);

	let widespread = int(0);
	let local = int(404);
	let unmined = int(7);
	let scope = ScopeKey::unit("Client");
	manager.set_global_cardinality(10).unwrap();
	manager.register_literal(scope.clone(), widespread.clone()).unwrap();
	manager.register_literal(scope.clone(), local.clone()).unwrap();
	manager.register_literal(scope.clone(), unmined.clone()).unwrap();
	// Same frequency, 0 appears in 9 of 10 units: 1 * 11 / 2 vs 1 * 11 / 10
	manager.record_frequency(scope.clone(), widespread.clone(), 1, Some(9)).unwrap();
	manager.record_frequency(scope.clone(), local.clone(), 1, Some(1)).unwrap();

	let get = method("Client", "net", "get", vec![Type::reference("Client"), Type::primitive("int")]);
	let mut picks = Vec::new();
	for _ in 0..2_000 {
		picks.push(manager.select(&get, 1, false).unwrap().unwrap());
	}

	let widespread_count = picks.iter().filter(|s| **s == widespread).count();
	let local_count = picks.iter().filter(|s| **s == local).count();
	assert_eq!(picks.iter().filter(|s| **s == unmined).count(), 0);
	// Expected 5:1, about 1667 of 2000
	assert!((1_550..=1_780).contains(&widespread_count), "0 picked {} times", widespread_count);
	assert_eq!(widespread_count + local_count, 2_000);

	let weights = manager.weights_for(&scope).unwrap();
	assert!((weights[&widespread] - 5.5).abs() < 1e-12);
	assert!((weights[&local] - 1.1).abs() < 1e-12);
}

#[test]
fn corrupt_occurrence_halts_weighting_for_the_scope() {
	let mut manager = ComponentManager::new(ManagerConfig::with_mining(1.0).unwrap());
	let scope = ScopeKey::namespace("bank");
	manager.set_global_cardinality(10).unwrap();
	manager.register_literal(scope.clone(), int(5)).unwrap();
	manager.record_frequency(scope.clone(), int(5), 2, Some(11)).unwrap();

	let deposit = method("Account", "bank", "deposit", vec![Type::reference("Account"), Type::primitive("int")]);
	let err = manager.select(&deposit, 1, false).unwrap_err();
	assert!(matches!(err, PoolError::DataIntegrity { occurrence: 11, cardinality: 10, .. }));
	assert!(err.is_fatal());
}

#[test]
fn missing_statistics_fall_back_to_uniform_choice() {
	let mut manager = ComponentManager::with_seeds(ManagerConfig::with_mining(1.0).unwrap(), vec![int(3)]);
	let deposit = method("Account", "bank", "deposit", vec![Type::reference("Account"), Type::primitive("int")]);

	assert!(manager.weights_for(&ScopeKey::Global).unwrap().is_empty());
	assert_eq!(manager.select(&deposit, 1, false).unwrap(), Some(int(3)));
}

#[test]
fn same_seed_reproduces_a_run() {
	let run = |seed: u64| {
		let mut config = ManagerConfig::default();
		config.seed = seed;
		let mut manager = ComponentManager::with_seeds(config, (0..20).map(int));
		let deposit = method("Account", "bank", "deposit", vec![Type::reference("Account"), Type::primitive("int")]);
		(0..50)
			.map(|_| manager.select(&deposit, 1, false).unwrap())
			.collect::<Vec<_>>()
	};
	assert_eq!(run(11), run(11));
}

#[test]
fn snapshot_feeds_literals_and_statistics() {
	let _ = env_logger::builder().is_test(true).try_init();
	let scope = ScopeKey::namespace("bank");
	let snapshot = MiningSnapshot {
		literals: vec![(scope.clone(), int(250)), (ScopeKey::Global, text("EUR"))],
		records: vec![FrequencyRow { scope: scope.clone(), sequence: int(250), frequency: 4, occurrence: Some(1) }],
		cardinalities: vec![(scope.clone(), 3)],
		global_cardinality: 8,
	};

	let mut manager = ComponentManager::new(ManagerConfig::with_mining(0.5).unwrap());
	manager.feed_snapshot(&snapshot).unwrap();

	let statistics = manager.mining_statistics().unwrap();
	assert_eq!(statistics.global_cardinality(), 8);
	assert_eq!(statistics.cardinality_for(&scope), 3);
	// 4 * 4 / (4 - 1)
	let weight = manager.weights_for(&scope).unwrap()[&int(250)];
	assert!((weight - 16.0 / 3.0).abs() < 1e-12);

	let primitives = manager.all_primitive_like_sequences();
	assert!(primitives.contains(&int(250)) && primitives.contains(&text("EUR")));

	// Statistics cannot be replayed into a run without mining
	let mut plain = ComponentManager::new(ManagerConfig::default());
	assert!(matches!(plain.feed_snapshot(&snapshot), Err(PoolError::MiningDisabled)));
}
