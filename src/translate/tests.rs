use super::*;
use crate::error::{status_message, ErrorKind};
use crate::ir::{Builder, FloatPredicate, IntPredicate};

fn ctx(n_variable_ind: usize, n_dependent: usize) -> TranslationContext {
    TranslationContext::new("f", n_variable_ind, n_dependent)
}

fn build(f: impl FnOnce(&mut Builder)) -> Function {
    let mut func = Function::new("f");
    let mut b = Builder::new(&mut func);
    f(&mut b);
    func
}

/// Load input element `k`.
fn input(b: &mut Builder, k: u64) -> ValueRef {
    let base = b.input();
    if k == 0 {
        b.load(base)
    } else {
        let ptr = b.gep(base, k);
        b.load(ptr)
    }
}

/// Store `value` into output element `k`.
fn output(b: &mut Builder, k: u64, value: ValueRef) {
    let base = b.output();
    if k == 0 {
        b.store(value, base);
    } else {
        let ptr = b.gep(base, k);
        b.store(value, ptr);
    }
}

fn ops(graph: &Graph) -> Vec<(GraphOp, Vec<usize>)> {
    graph
        .operators()
        .map(|operator| (operator.op, operator.args.to_vec()))
        .collect()
}

fn product() -> Function {
    build(|b| {
        let x0 = input(b, 0);
        let x1 = input(b, 1);
        let y = b.fmul(x0, x1);
        output(b, 0, y);
        b.ret_ok();
    })
}

// --- Scenarios ---

#[test]
fn test_product() {
    let result = translate_to_graph(&product(), &ctx(2, 1));
    assert_eq!(status_message(&result), "");
    let graph = result.unwrap();
    assert_eq!(ops(&graph), vec![(GraphOp::Mul, vec![1, 2])]);
    assert_eq!(graph.dependents(), &[3]);
    assert!(graph.constants().is_empty());
    assert_eq!(graph.function_name(), "f");
    assert_eq!(graph.n_node(), 3);
}

#[test]
fn test_missing_output_store() {
    let func = build(|b| {
        let x0 = input(b, 0);
        let x1 = input(b, 1);
        b.fmul(x0, x1);
        b.ret_ok();
    });
    let result = translate_to_graph(&func, &ctx(2, 1));
    assert_eq!(
        status_message(&result),
        "No store instruction for dependent variable index 0"
    );
    assert_eq!(result.unwrap_err(), TranslateError::IncompleteOutput { index: 0 });
}

#[test]
fn test_second_output_missing() {
    let func = build(|b| {
        let x0 = input(b, 0);
        output(b, 0, x0);
        b.ret_ok();
    });
    let err = translate_to_graph(&func, &ctx(1, 2)).unwrap_err();
    assert_eq!(err, TranslateError::IncompleteOutput { index: 1 });
}

#[test]
fn test_unknown_callee() {
    let func = build(|b| {
        let x0 = input(b, 0);
        let y = b.call_math("foo", &[x0]);
        output(b, 0, y);
        b.ret_ok();
    });
    let result = translate_to_graph(&func, &ctx(1, 1));
    assert!(status_message(&result).contains("Cannot call the function foo"));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Unresolved);
}

#[test]
fn test_compare_feeding_select() {
    let func = build(|b| {
        let a = input(b, 0);
        let c = input(b, 1);
        let lt = b.fcmp(FloatPredicate::Olt, a, c);
        let y = b.select(lt, a, c);
        output(b, 0, y);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(2, 1)).unwrap();
    assert_eq!(ops(&graph), vec![(GraphOp::CexpLt, vec![1, 2, 1, 2])]);
    // the comparison itself took no node
    assert_eq!(graph.dependents(), &[3]);
    assert_eq!(graph.n_node(), 3);
}

#[test]
fn test_atomic_call() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        let x1 = input(b, 1);
        b.store(x0, args);
        let p1 = b.gep(args, 1);
        b.store(x1, p1);
        b.call_atomic("atomic_foo", 2, args, 1, results);
        let y = b.load(results);
        output(b, 0, y);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(2, 1)).unwrap();
    assert_eq!(ops(&graph), vec![(GraphOp::Atom, vec![0, 1, 2, 1, 2])]);
    assert_eq!(graph.atomic_names(), &["foo".to_string()]);
    assert_eq!(graph.dependents(), &[3]);
}

// --- Node numbering ---

#[test]
fn test_atomic_results_are_contiguous() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        b.store(x0, args);
        b.call_atomic("atomic_split", 1, args, 2, results);
        let y0 = b.load(results);
        let p1 = b.gep(results, 1);
        let y1 = b.load(p1);
        let z = b.fadd(y0, y1);
        output(b, 0, y1);
        output(b, 1, z);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(1, 2)).unwrap();
    assert_eq!(
        ops(&graph),
        vec![
            (GraphOp::Atom, vec![0, 2, 1, 1]),
            (GraphOp::Add, vec![2, 3]),
        ]
    );
    assert_eq!(graph.dependents(), &[3, 4]);
    assert_eq!(graph.first_results(), vec![Some(2), Some(4)]);
}

#[test]
fn test_dynamic_parameters_come_first() {
    let func = build(|b| {
        let p = input(b, 0);
        let x = input(b, 1);
        let y = b.fmul(p, x);
        output(b, 0, y);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(1, 1).with_dynamic(1)).unwrap();
    assert_eq!(graph.n_dynamic_ind(), 1);
    assert_eq!(graph.n_variable_ind(), 1);
    assert_eq!(ops(&graph), vec![(GraphOp::Mul, vec![1, 2])]);
    assert_eq!(graph.dependents(), &[3]);
}

#[test]
fn test_constants_are_pooled_by_identity() {
    let func = build(|b| {
        let x = input(b, 0);
        let two = b.fconst(2.0);
        let other_two = b.fconst(2.0);
        let a = b.fmul(x, two);
        let c = b.fadd(a, two);
        let d = b.fsub(c, other_two);
        output(b, 0, d);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(1, 1).with_dynamic(1)).unwrap();
    // same handle, one node; equal value with another handle, another node
    assert_eq!(graph.constants(), &[2.0, 2.0]);
    assert_eq!(
        ops(&graph),
        vec![
            (GraphOp::Mul, vec![1, 3]),
            (GraphOp::Add, vec![5, 3]),
            (GraphOp::Sub, vec![6, 4]),
        ]
    );
    assert_eq!(graph.dependents(), &[7]);
}

#[test]
fn test_combine_allocates_no_node() {
    let func = build(|b| {
        let a = input(b, 0);
        let c = input(b, 1);
        let ne = b.fcmp(FloatPredicate::One, a, c);
        let code = b.zext(ne, 32);
        let y = b.fmul(a, c);
        output(b, 0, y);
        b.ret(code);
    });
    let graph = translate_to_graph(&func, &ctx(2, 1)).unwrap();
    assert_eq!(
        ops(&graph),
        vec![(GraphOp::CompEq, vec![2, 1]), (GraphOp::Mul, vec![1, 2])]
    );
    assert_eq!(graph.dependents(), &[3]);
}

#[test]
fn test_or_combines_two_compares() {
    let func = build(|b| {
        let a = input(b, 0);
        let c = input(b, 1);
        let lt = b.fcmp(FloatPredicate::Olt, a, c);
        let le = b.fcmp(FloatPredicate::Ole, c, a);
        let either = b.or(lt, le);
        let code = b.zext(either, 32);
        output(b, 0, a);
        b.ret(code);
    });
    let graph = translate_to_graph(&func, &ctx(2, 1)).unwrap();
    assert_eq!(
        ops(&graph),
        vec![(GraphOp::CompLe, vec![2, 1]), (GraphOp::CompLt, vec![1, 2])]
    );
    assert_eq!(graph.dependents(), &[1]);
}

#[test]
fn test_combine_results_are_never_arguments() {
    let func = build(|b| {
        let a = input(b, 0);
        let c = input(b, 1);
        let eq = b.fcmp(FloatPredicate::Oeq, a, c);
        let code = b.zext(eq, 32);
        let s = b.fadd(a, c);
        let t = b.fmul(s, a);
        output(b, 0, t);
        b.ret(code);
    });
    let graph = translate_to_graph(&func, &ctx(2, 1)).unwrap();
    let firsts = graph.first_results();
    for (operator, first) in graph.operators().zip(&firsts) {
        for &arg in operator.node_args() {
            assert!(arg >= 1);
            if let Some(first) = first {
                assert!(arg < *first, "{} uses a later node {}", operator.op, arg);
            }
        }
    }
    for &node in graph.dependents() {
        assert!((1..=graph.n_node()).contains(&node));
    }
}

#[test]
fn test_math_calls() {
    let func = build(|b| {
        let a = input(b, 0);
        let c = input(b, 1);
        let s = b.call_math("sin", &[a]);
        let p = b.call_math("pow", &[s, c]);
        let m = b.call_math("cppad_link_fabs", &[p]);
        let z = b.call_math("cppad_link_azmul", &[m, a]);
        let sg = b.call_math("cppad_link_sign", &[z]);
        let n = b.fneg(sg);
        output(b, 0, n);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(2, 1)).unwrap();
    assert_eq!(
        ops(&graph),
        vec![
            (GraphOp::Sin, vec![1]),
            (GraphOp::Pow, vec![3, 2]),
            (GraphOp::Abs, vec![4]),
            (GraphOp::Azmul, vec![5, 1]),
            (GraphOp::Sign, vec![6]),
            (GraphOp::Neg, vec![7]),
        ]
    );
    assert_eq!(graph.dependents(), &[8]);
}

#[test]
fn test_discrete_names_are_deduplicated() {
    let func = build(|b| {
        let a = input(b, 0);
        let f0 = b.call_math("discrete_floor", &[a]);
        let c0 = b.call_math("discrete_ceil", &[f0]);
        let f1 = b.call_math("discrete_floor", &[c0]);
        output(b, 0, f1);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(1, 1)).unwrap();
    assert_eq!(
        graph.discrete_names(),
        &["floor".to_string(), "ceil".to_string()]
    );
    assert_eq!(
        ops(&graph),
        vec![
            (GraphOp::Discrete, vec![0, 1]),
            (GraphOp::Discrete, vec![1, 2]),
            (GraphOp::Discrete, vec![0, 3]),
        ]
    );
    assert_eq!(graph.dependents(), &[4]);
}

#[test]
fn test_bare_discrete_prefix_is_a_plain_name() {
    let func = build(|b| {
        let a = input(b, 0);
        let y = b.call_math("discrete_", &[a]);
        output(b, 0, y);
        b.ret_ok();
    });
    let err = translate_to_graph(&func, &ctx(1, 1)).unwrap_err();
    assert_eq!(
        err,
        TranslateError::UnresolvedCallee {
            name: "discrete_".into()
        }
    );
}

// --- Side channels and control flow ---

#[test]
fn test_message_stores_and_branches_are_ignored() {
    let func = build(|b| {
        let a = input(b, 0);
        let msg = b.message();
        b.store(a, msg);
        let zero = b.iconst(1, 0);
        b.br(zero, "then", "else");
        b.jump("done");
        output(b, 0, a);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(1, 1)).unwrap();
    assert_eq!(graph.operator_count(), 0);
    assert_eq!(graph.dependents(), &[1]);
}

#[test]
fn test_integer_select_is_ignored() {
    let func = build(|b| {
        let a = input(b, 0);
        let one = b.iconst(32, 1);
        let two = b.iconst(32, 2);
        let lt = b.icmp(IntPredicate::Slt, one, two);
        let code = b.select(lt, one, two);
        output(b, 0, a);
        b.ret(code);
    });
    let graph = translate_to_graph(&func, &ctx(1, 1)).unwrap();
    assert_eq!(graph.operator_count(), 0);
}

#[test]
fn test_translate_reinitializes_the_sink() {
    let func = product();
    let mut graph = Graph::new();
    translate(&func, &ctx(2, 1), &mut graph).unwrap();
    let first = graph.clone();
    translate(&func, &ctx(2, 1), &mut graph).unwrap();
    assert_eq!(graph, first);
}

#[test]
fn test_display_of_translated_graph() {
    let func = build(|b| {
        let a = input(b, 0);
        let half = b.fconst(0.5);
        let s = b.fmul(a, half);
        let y = b.call_math("exp", &[s]);
        output(b, 0, y);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(1, 1)).unwrap();
    insta::assert_snapshot!(graph.to_string(), @r"
    graph f: dynamic=0 variable=1 constant=1
      2 = const 0.5
      3 = mul(1, 2)
      4 = exp(3)
    dependent: 4
    ");
}

// --- Failures ---

#[test]
fn test_unsupported_opcode() {
    let func = build(|b| {
        let a = input(b, 0);
        let r = b.other("frem", vec![a, a], Type::Double);
        output(b, 0, r.unwrap());
        b.ret_ok();
    });
    let result = translate_to_graph(&func, &ctx(1, 1));
    assert_eq!(status_message(&result), "Cannot handle the instruction frem");
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Unsupported);
}

fn malformed(func: &Function, ctx: &TranslationContext) -> (usize, String) {
    match translate_to_graph(func, ctx) {
        Err(TranslateError::MalformedInput { inst, reason }) => (inst, reason),
        other => panic!("expected malformed input, got {:?}", other),
    }
}

#[test]
fn test_second_zext_is_malformed() {
    let func = build(|b| {
        let a = input(b, 0);
        let lt = b.fcmp(FloatPredicate::Olt, a, a);
        b.zext(lt, 32);
        b.zext(lt, 32);
        output(b, 0, a);
        b.ret_ok();
    });
    let (inst, reason) = malformed(&func, &ctx(1, 1));
    assert_eq!(inst, 3);
    assert!(reason.contains("zext"));
}

#[test]
fn test_input_offset_out_of_bounds() {
    let func = build(|b| {
        let a = input(b, 2);
        output(b, 0, a);
        b.ret_ok();
    });
    let (inst, reason) = malformed(&func, &ctx(2, 1));
    assert_eq!(inst, 0);
    assert!(reason.contains("out of bounds"));
}

#[test]
fn test_load_through_unknown_pointer() {
    let func = build(|b| {
        let slot = b.alloca();
        let a = b.load(slot);
        output(b, 0, a);
        b.ret_ok();
    });
    let (inst, _) = malformed(&func, &ctx(1, 1));
    assert_eq!(inst, 1);
}

#[test]
fn test_store_to_output_out_of_bounds() {
    let func = build(|b| {
        let a = input(b, 0);
        output(b, 1, a);
        b.ret_ok();
    });
    let (_, reason) = malformed(&func, &ctx(1, 1));
    assert!(reason.contains("element 1"));
}

#[test]
fn test_select_with_unsupported_predicate() {
    let func = build(|b| {
        let a = input(b, 0);
        let c = input(b, 1);
        let gt = b.fcmp(FloatPredicate::Ogt, a, c);
        let y = b.select(gt, a, c);
        output(b, 0, y);
        b.ret_ok();
    });
    let (_, reason) = malformed(&func, &ctx(2, 1));
    assert!(reason.contains("ogt"));
}

#[test]
fn test_select_without_compare() {
    let func = build(|b| {
        let a = input(b, 0);
        let t = b.iconst(1, 1);
        let y = b.select(t, a, a);
        output(b, 0, y);
        b.ret_ok();
    });
    let (_, reason) = malformed(&func, &ctx(1, 1));
    assert!(reason.contains("not a comparison"));
}

#[test]
fn test_atomic_argument_never_stored() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        b.store(x0, args);
        b.call_atomic("atomic_foo", 2, args, 1, results);
        let y = b.load(results);
        output(b, 0, y);
        b.ret_ok();
    });
    let (_, reason) = malformed(&func, &ctx(1, 1));
    assert!(reason.contains("argument 1 of atomic function foo"));
}

#[test]
fn test_atomic_call_needs_prefix() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        b.store(x0, args);
        b.call_atomic("foo", 1, args, 1, results);
        output(b, 0, x0);
        b.ret_ok();
    });
    let err = translate_to_graph(&func, &ctx(1, 1)).unwrap_err();
    assert_eq!(err, TranslateError::UnresolvedCallee { name: "foo".into() });
}

#[test]
fn test_atomic_buffer_reused_with_other_length() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        b.store(x0, args);
        b.call_atomic("atomic_a", 1, args, 1, results);
        b.call_atomic("atomic_b", 2, args, 1, results);
        output(b, 0, x0);
        b.ret_ok();
    });
    let (_, reason) = malformed(&func, &ctx(1, 1));
    assert!(reason.contains("reused"));
}

#[test]
fn test_atomic_buffer_reused_with_same_length() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        b.store(x0, args);
        b.call_atomic("atomic_a", 1, args, 1, results);
        let y = b.load(results);
        b.store(y, args);
        b.call_atomic("atomic_a", 1, args, 1, results);
        let z = b.load(results);
        output(b, 0, z);
        b.ret_ok();
    });
    let graph = translate_to_graph(&func, &ctx(1, 1)).unwrap();
    assert_eq!(
        ops(&graph),
        vec![
            (GraphOp::Atom, vec![0, 1, 1, 1]),
            (GraphOp::Atom, vec![0, 1, 1, 2]),
        ]
    );
    assert_eq!(graph.atomic_names().len(), 1);
    assert_eq!(graph.dependents(), &[3]);
}

#[test]
fn test_wrong_signature() {
    let func = Function::with_args("g", &[(Type::Ptr, "x".to_string())]);
    let (inst, reason) = malformed(&func, &ctx(1, 1));
    assert_eq!(inst, 0);
    assert!(reason.contains("expected 6"));
}

#[test]
fn test_return_needs_an_integer() {
    let func = build(|b| {
        let a = input(b, 0);
        output(b, 0, a);
        b.ret(a);
    });
    let (_, reason) = malformed(&func, &ctx(1, 1));
    assert!(reason.starts_with("ret"));
}

// --- Counts taken from the IR ---

#[test]
fn test_atomic_result_count_past_node_limit() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        b.store(x0, args);
        b.call_atomic("atomic_foo", 1, args, u64::MAX, results);
        output(b, 0, x0);
        b.ret_ok();
    });
    let (inst, reason) = malformed(&func, &ctx(1, 1));
    assert_eq!(inst, 4);
    assert!(reason.contains("node limit"), "{}", reason);
}

#[test]
fn test_atomic_argument_count_is_not_allocated() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        b.store(x0, args);
        b.call_atomic("atomic_foo", u64::MAX, args, 1, results);
        output(b, 0, x0);
        b.ret_ok();
    });
    let (inst, reason) = malformed(&func, &ctx(1, 1));
    assert_eq!(inst, 4);
    assert!(reason.contains("argument 1 of atomic function foo was never stored"));
}

#[test]
fn test_huge_dependent_count_reports_first_missing_output() {
    let err = translate_to_graph(&product(), &ctx(2, usize::MAX)).unwrap_err();
    assert_eq!(err, TranslateError::IncompleteOutput { index: 1 });
}

#[test]
fn test_independent_count_past_node_limit() {
    let ctx = ctx(usize::MAX, 1).with_dynamic(1);
    let (inst, reason) = malformed(&product(), &ctx);
    assert_eq!(inst, 0);
    assert!(reason.contains("node limit"), "{}", reason);
}

#[test]
fn test_load_from_zero_result_atomic_is_malformed() {
    let func = build(|b| {
        let args = b.alloca();
        let results = b.alloca();
        let x0 = input(b, 0);
        b.store(x0, args);
        b.call_atomic("atomic_foo", 1, args, 0, results);
        let y = b.load(results);
        let z = b.fadd(y, x0);
        output(b, 0, z);
        b.ret_ok();
    });
    let (inst, reason) = malformed(&func, &ctx(1, 1));
    assert_eq!(inst, 5);
    assert!(reason.starts_with("load through"), "{}", reason);
}

#[test]
fn test_load_from_empty_input_is_malformed() {
    let func = build(|b| {
        let x = input(b, 0);
        output(b, 0, x);
        b.ret_ok();
    });
    let (inst, reason) = malformed(&func, &ctx(0, 1));
    assert_eq!(inst, 0);
    assert!(reason.starts_with("load through"), "{}", reason);
}
