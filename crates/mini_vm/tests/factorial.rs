use mini_vm::programs::factorial;
use mini_vm::{Effect, Fault, HaltReason, Opcode, Register, Vm, VmConfig};

fn traced() -> VmConfig {
    VmConfig { trace: true, max_steps: None }
}

#[test]
fn factorial_of_ten() {
    let out = Vm::new(VmConfig::default(), factorial(10)).run().unwrap();
    assert_eq!(out.halt, HaltReason::Halted);
    assert_eq!(out.stack, vec![3_628_800]);
    assert_eq!(out.registers.get(Register::A), 0);
    assert_eq!(out.registers.get(Register::B), 0);
}

#[test]
fn register_a_counts_multiplications() {
    let out = Vm::new(traced(), factorial(10)).run().unwrap();
    let muls = out.trace.iter().filter(|s| s.opcode == Opcode::Mul).count();
    assert_eq!(muls, 9);

    let peak = out
        .trace
        .iter()
        .filter_map(|s| match s.effect {
            Effect::Stored { reg: Register::A, value } => Some(value),
            _ => None,
        })
        .max();
    assert_eq!(peak, Some(10));

    // A never feeds the product: every MUL multiplies stack values only
    let products: Vec<i32> = out
        .trace
        .iter()
        .filter_map(|s| match s.effect {
            Effect::Arith { op: Opcode::Mul, result, .. } => Some(result),
            _ => None,
        })
        .collect();
    assert_eq!(products.last(), Some(&3_628_800));
    assert_eq!(products.first(), Some(&2));
}

#[test]
fn trace_ends_with_log_and_halt() {
    let out = Vm::new(traced(), factorial(10)).run().unwrap();
    let tail: Vec<&Effect> = out.trace.iter().rev().take(2).map(|s| &s.effect).collect();
    assert_eq!(tail[0], &Effect::Halted);
    assert_eq!(tail[1], &Effect::Logged { reg: Register::A, value: 0 });
    assert_eq!(out.trace.len() as u64, out.steps);
}

#[test]
fn small_factorials() {
    for (n, expected) in [(1, 1), (2, 2), (3, 6), (5, 120), (12, 479_001_600)] {
        let out = Vm::new(VmConfig::default(), factorial(n)).run().unwrap();
        assert_eq!(out.stack, vec![expected], "{n}!");
    }
}

#[test]
fn factorial_of_zero_overflows_the_stack() {
    let mut vm = Vm::new(VmConfig::default(), factorial(0));
    let err = vm.run().unwrap_err();
    assert_eq!(err.fault, Fault::StackOverflow);
    assert!(!vm.machine().is_running());
    assert_eq!(vm.machine().stack().depth(), mini_vm::STACK_SIZE);
}

#[test]
fn step_limit_caps_factorial() {
    let cfg = VmConfig { trace: false, max_steps: Some(50) };
    let err = Vm::new(cfg, factorial(10)).run().unwrap_err();
    assert_eq!(err.fault, Fault::StepLimitExceeded { limit: 50 });
}

#[test]
fn outcome_serializes() {
    let out = Vm::new(VmConfig::default(), factorial(4)).run().unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["halt"]["reason"], "halted");
    assert_eq!(json["stack"], serde_json::json!([24]));
    assert_eq!(json["registers"], serde_json::json!([0, 0, 0, 0, 0, 0]));
    assert!(json.get("trace").is_none());
}

#[test]
fn factorial_listing() {
    let text = mini_vm::listing(&factorial(10));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "0000: PSH 10");
    assert_eq!(lines[1], "0002: SET A 0");
    assert!(lines.contains(&"0019: IF B 0 25"));
    assert!(lines.contains(&"0033: IF A 0 40"));
    assert_eq!(lines.last(), Some(&"0042: HLT"));
}
