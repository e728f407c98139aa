//! Quantum to classical casts through the local simulator.

use std::sync::Arc;

use hhat_adapter_sim::SimulatorBackend;
use hhat_cast::{
    Cast, CastContext, CastError, CastInput, QuantumProgram, RawValue, ResolverKind,
    RuntimeConfig, WeightedAverageValue,
};
use hhat_hal::{Backend, JobStatus, ShotsPolicy};
use hhat_ir::{BlockIR, CoreLiteral, InstrIR, Literal, Value};
use hhat_mem::IndexManager;
use hhat_types::{FullName, TypeTable};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn simulator() -> Arc<dyn Backend> {
    Arc::new(SimulatorBackend::new().with_seed(42))
}

fn allocate(var: &FullName, n: usize) -> IndexManager {
    let mut idx = IndexManager::new(8);
    // occupy the front of the pool so the variable does not start at 0
    idx.request(&FullName::local("@pad"), 3).unwrap();
    idx.request(var, n).unwrap();
    idx
}

#[tokio::test]
async fn test_raw_distribution_round_trip() {
    init_tracing();
    let config = RuntimeConfig::default();
    let types = TypeTable::with_builtins();
    let ctx = CastContext::new(&config, simulator(), &types).with_resolver(Arc::new(RawValue));

    let var = FullName::local("@q");
    let idx = allocate(&var, 2);
    let block = BlockIR::from_instrs([InstrIR::call("@redim", [])]);

    let out = Cast::new("@u2", "u8")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap();

    let counts = out.as_counts().unwrap();
    assert_eq!(counts.total(), u64::from(config.execution.shots_for(2)));
    for (bitstring, _) in counts.iter() {
        assert_eq!(bitstring.len(), 2);
        assert!(["00", "01", "10", "11"].contains(&bitstring));
    }
}

#[tokio::test]
async fn test_highest_value_to_u8() {
    let config = RuntimeConfig::default();
    let types = TypeTable::with_builtins();
    let ctx = CastContext::new(&config, simulator(), &types);

    let var = FullName::local("@q");
    let idx = allocate(&var, 2);
    let block = BlockIR::from_instrs([InstrIR::call("@not", [])]);

    let out = Cast::new("@u2", "u8")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap();
    assert_eq!(out.as_literal(), Some(&Literal::core(Value::UInt(3), "u8")));
}

#[tokio::test]
async fn test_literal_preparation_survives_execution() {
    let mut config = RuntimeConfig::default();
    config.execution.shots = Some(200);
    let types = TypeTable::with_builtins();
    let ctx = CastContext::new(&config, simulator(), &types);

    let var = FullName::local("@q");
    let idx = allocate(&var, 3);
    // @5 sets slots 0 and 2; @not then flips every slot
    let block = BlockIR::from_instrs([InstrIR::call(
        "@not",
        [CoreLiteral::quantum(5, "@u3").into()],
    )]);

    let out = Cast::new("@u3", "u8")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap();
    assert_eq!(out.as_literal(), Some(&Literal::core(Value::UInt(2), "u8")));
}

#[tokio::test]
async fn test_weighted_average_of_basis_state() {
    let mut config = RuntimeConfig::default();
    config.execution.shots_policy = ShotsPolicy::Fixed { shots: 1024 };
    let types = TypeTable::with_builtins();
    let ctx = CastContext::new(&config, simulator(), &types)
        .with_resolver(Arc::new(WeightedAverageValue));

    let var = FullName::local("@b");
    let idx = allocate(&var, 1);
    let block = BlockIR::from_instrs([]);

    // every shot measures "0", whose ordinal is 48
    let out = Cast::new("@bool", "int")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap();
    assert_eq!(out.as_literal(), Some(&Literal::core(Value::Int(48), "int")));
}

#[tokio::test]
async fn test_quantum_to_quantum() {
    let mut config = RuntimeConfig::default();
    config.resolver = ResolverKind::Highest;
    let types = TypeTable::with_builtins();
    let ctx = CastContext::new(&config, simulator(), &types);

    let var = FullName::local("@q");
    let idx = allocate(&var, 2);
    let block = BlockIR::from_instrs([InstrIR::call("@not", [])]);

    let out = Cast::new("@u2", "@u3")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap();
    assert_eq!(
        out.as_literal(),
        Some(&Literal::Core(CoreLiteral::quantum(3, "@u3")))
    );

    let err = Cast::new("@u2", "@bool")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, CastError::IntOverflow { max: 1, .. }));
}

#[tokio::test]
async fn test_unallocated_variable() {
    let config = RuntimeConfig::default();
    let types = TypeTable::with_builtins();
    let ctx = CastContext::new(&config, simulator(), &types);

    let var = FullName::local("@ghost");
    let idx = IndexManager::new(4);
    let block = BlockIR::from_instrs([InstrIR::call("@redim", [])]);

    let err = Cast::new("@u2", "u8")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, CastError::Mem(_)));
}

#[tokio::test]
async fn test_origin_width_must_match_allocation() {
    let config = RuntimeConfig::default();
    let types = TypeTable::with_builtins();
    let ctx = CastContext::new(&config, simulator(), &types);

    let var = FullName::local("@q");
    let idx = allocate(&var, 3);
    let block = BlockIR::from_instrs([InstrIR::call("@not", [])]);

    let err = Cast::new("@bool", "u8")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap_err();
    match err {
        CastError::WidthMismatch {
            variable,
            origin,
            expected,
            held,
        } => {
            assert_eq!(variable, var);
            assert_eq!(origin, FullName::local("@bool"));
            assert_eq!(expected, "1");
            assert_eq!(held, 3);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = Cast::new("@u2", "u8")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, CastError::WidthMismatch { held: 3, .. }));
}

#[tokio::test]
async fn test_program_too_large_for_backend() {
    let config = RuntimeConfig::default();
    let types = TypeTable::with_builtins();
    let backend: Arc<dyn Backend> = Arc::new(SimulatorBackend::with_max_qubits(2));
    let ctx = CastContext::new(&config, backend, &types);

    let var = FullName::local("@q");
    let idx = allocate(&var, 3);
    let block = BlockIR::from_instrs([InstrIR::call("@redim", [])]);

    let err = Cast::new("@u3", "u8")
        .apply(CastInput::Quantum(QuantumProgram::new(&var, &block, &idx)), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, CastError::Hal(_)));
}

#[tokio::test]
async fn test_submit_returns_cancellable_handle() {
    let config = RuntimeConfig::default();
    let var = FullName::local("@q");
    let idx = allocate(&var, 2);
    let block = BlockIR::from_instrs([InstrIR::call("@redim", []), InstrIR::call("@sync", [])]);

    let program = QuantumProgram::new(&var, &block, &idx);
    let handle = program
        .submit(simulator(), &config.execution, &hhat_qlang::NoFallback)
        .await
        .unwrap();
    assert_eq!(handle.shots(), 2_000);
    // the simulator finishes on submit, so cancelling is a no-op
    handle.cancel().await.unwrap();
    assert_eq!(handle.status().await.unwrap(), JobStatus::Completed);

    let result = handle.wait(None).await.unwrap();
    assert_eq!(result.counts.total(), 2_000);
}
