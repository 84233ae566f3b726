use criterion::{black_box, criterion_group, criterion_main, Criterion};
use metis::agent::{DdpgAgent, DdpgAgentBuilder};
use ndarray::{array, Array1};

fn make_state(i: usize) -> Array1<f32> {
    let x = i as f32 * 0.05;
    array![x.sin(), x.cos(), (x * 0.5).sin()]
}

/// An agent already past its warm-up, so every feedback call below runs a
/// full learning iteration.
fn warmed_agent() -> DdpgAgent {
    let mut agent = DdpgAgentBuilder::new(3, 1)
        .hidden_size(64)
        .observe(64)
        .batch_size(32)
        .replay_memory(10_000)
        .seed(42)
        .build()
        .expect("benchmark configuration is valid");

    let action = array![0.0f32];
    for i in 0..100 {
        agent
            .feedback(
                make_state(i).view(),
                action.view(),
                0.1,
                false,
                make_state(i + 1).view(),
            )
            .expect("warm-up feedback succeeds");
    }
    agent
}

fn bench_select_action(c: &mut Criterion) {
    let mut agent = warmed_agent();
    let state = make_state(7);

    c.bench_function("ddpg_select_action_greedy", |b| {
        b.iter(|| {
            black_box(
                agent
                    .select_action(black_box(state.view()), false)
                    .expect("state width matches"),
            )
        })
    });

    c.bench_function("ddpg_select_action_explore", |b| {
        b.iter(|| {
            black_box(
                agent
                    .select_action(black_box(state.view()), true)
                    .expect("state width matches"),
            )
        })
    });
}

fn bench_feedback(c: &mut Criterion) {
    let mut agent = warmed_agent();
    let action = array![0.1f32];
    let mut step = 100usize;

    c.bench_function("ddpg_feedback_with_learning", |b| {
        b.iter(|| {
            step += 1;
            agent
                .feedback(
                    black_box(make_state(step).view()),
                    black_box(action.view()),
                    0.1,
                    false,
                    black_box(make_state(step + 1).view()),
                )
                .expect("learning stays finite");
        })
    });
}

criterion_group!(benches, bench_select_action, bench_feedback);
criterion_main!(benches);
