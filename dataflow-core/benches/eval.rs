//! Evaluation benchmarks: long chains and wide fan-in over a few variables.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dataflow_core::graph::{Dataflow, NodeId};

fn build_chain(depth: usize) -> (Dataflow, NodeId) {
    let mut dag = Dataflow::new();
    let x = dag.declare_variable("x").unwrap();
    let one = dag.declare_variable("one").unwrap();
    dag.assign(x, 0).unwrap();
    dag.assign(one, 1).unwrap();

    let mut head: NodeId = x.into();
    for _ in 0..depth {
        head = dag.add(head, one).unwrap().into();
    }
    (dag, head)
}

fn build_tree(width: usize) -> (Dataflow, NodeId) {
    let mut dag = Dataflow::new();
    let mut layer: Vec<NodeId> = (0..width)
        .map(|i| {
            let var = dag.declare_variable(&format!("v{i}")).unwrap();
            dag.assign(var, i as i64).unwrap();
            var.into()
        })
        .collect();

    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| match pair {
                [lhs, rhs] => dag.mul(*lhs, *rhs).unwrap().into(),
                [single] => *single,
                _ => unreachable!(),
            })
            .collect();
    }
    (dag, layer[0])
}

fn bench_eval(c: &mut Criterion) {
    let (chain, head) = build_chain(1_000);
    c.bench_function("eval_chain_1000", |b| {
        b.iter(|| chain.eval(black_box(head)).unwrap())
    });

    let (tree, root) = build_tree(1_024);
    c.bench_function("eval_tree_1024", |b| {
        b.iter(|| tree.eval(black_box(root)).unwrap())
    });

    c.bench_function("graphviz_tree_1024", |b| {
        b.iter(|| tree.dump_to_graphviz().unwrap())
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
