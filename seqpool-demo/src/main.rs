use std::path::Path;

use log::info;
use seqpool_core::io::{read_snapshot, snapshot_path, write_snapshot, FrequencyRow, MiningSnapshot};
use seqpool_core::model::config::ManagerConfig;
use seqpool_core::model::operation::{Declaration, Operation, OperationKind};
use seqpool_core::model::scope::ScopeKey;
use seqpool_core::model::sequence::{NominalTypes, Sequence, Step, Type};
use seqpool_core::ComponentManager;

/// Stands in for the mining pass: constants found in a small banking code base.
fn mine() -> MiningSnapshot {
    let int = |v: &str| Sequence::literal(Type::primitive("int"), v);
    let bank = ScopeKey::namespace("bank");
    let shop = ScopeKey::namespace("shop");

    // (scope, literal, frequency in scope, units of the scope it occurs in)
    let observed = [
        (&bank, int("0"), 12, 3),
        (&bank, int("100"), 4, 1),
        (&bank, int("-1"), 2, 2),
        (&shop, int("0"), 5, 2),
        (&shop, int("99"), 7, 1),
    ];

    let mut snapshot = MiningSnapshot { global_cardinality: 5, ..MiningSnapshot::default() };
    for (scope, sequence, frequency, occurrence) in observed {
        snapshot.literals.push((scope.clone(), sequence.clone()));
        snapshot.records.push(FrequencyRow { scope: scope.clone(), sequence, frequency, occurrence: Some(occurrence) });
    }
    snapshot.literals.push((ScopeKey::Global, Sequence::literal(Type::text("String"), "\"EUR\"")));
    snapshot.cardinalities.push((bank, 3));
    snapshot.cardinalities.push((shop, 2));
    snapshot
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Reuse the mined constants if a previous run saved them
    let cache = snapshot_path("./data/mining.dat")?;
    let snapshot = if cache.exists() {
        read_snapshot(&cache)?
    } else {
        let snapshot = mine();
        if Path::new("./data").is_dir() {
            write_snapshot(&cache, &snapshot)?;
        }
        snapshot
    };

    let mut types = NominalTypes::new();
    types.declare_subtype(Type::reference("Savings"), Type::reference("Account"));

    // Probability of picking a mined constant with TF-IDF weights instead of a uniform pick
    let mut config = ManagerConfig::with_mining(0.5)?;
    config.seed = 42;

    let seeds = vec![
        Sequence::literal(Type::primitive("int"), "1"),
        Sequence::literal(Type::text("String"), "\"\""),
    ];
    let mut manager = ComponentManager::with_seeds(config, seeds).with_oracle(types);
    manager.feed_snapshot(&snapshot)?;
    info!("fed {} mined literal(s) and {} record(s)", snapshot.literals.len(), snapshot.records.len());

    let savings = Sequence::literal(Type::primitive("int"), "1")
        .extend(Step::new("new Savings(v0)", Type::reference("Savings"), vec![0]))?;
    manager.add_generated(savings);

    let deposit = Operation::new(
        "deposit",
        OperationKind::Invocation(Declaration::new("Account", Some("bank"))),
        vec![Type::reference("Account"), Type::primitive("int")],
        Type::void(),
    );

    println!("Candidates for {} slot 1:", deposit);
    for sequence in manager.query(&deposit, 1, false)?.iter() {
        println!("  {}", sequence);
    }

    for (sequence, weight) in manager.weights_for(&ScopeKey::namespace("bank"))? {
        println!("Weight of {} in bank: {:.3}", sequence, weight);
    }

    for i in 0..10 {
        let receiver = manager.select(&deposit, 0, true)?;
        let amount = manager.select(&deposit, 1, false)?;
        match (receiver, amount) {
            (Some(receiver), Some(amount)) => println!("Call {}: {} with {}", i + 1, receiver, amount),
            _ => println!("Call {}: no candidates", i + 1),
        }
    }

    // A receiver query on an int slot is a caller bug
    match manager.query(&deposit, 1, true) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {}", e),
    }

    println!("Generated sequences: {}", manager.generated_count());
    manager.reset();
    println!("After reset: {} generated, {} total", manager.generated_count(), manager.size());
    manager.log_summary();

    Ok(())
}
