use criterion::{black_box, criterion_group, criterion_main, Criterion};

use signal_rl::agent::{DqnAgentBuilder, QTableAgent};
use signal_rl::types::{Action, Position};

fn bench_tabular_backup(c: &mut Criterion) {
    let mut agent = QTableAgent::default();

    c.bench_function("tabular_update_value", |b| {
        let mut i = 0i32;
        b.iter(|| {
            let state = Position::new(i % 100, (i / 100) % 100);
            let action = Action::from_index((i as usize) % 4);
            agent.update_value(black_box(state), action, 1.5, state.step(action));
            i += 1;
        })
    });
}

fn bench_tabular_choose_action(c: &mut Criterion) {
    let mut agent = QTableAgent::new(0.1, 0.9, 0.0);
    for x in 0..100 {
        for y in 0..100 {
            let state = Position::new(x, y);
            agent.update_value(state, Action::Up, (x + y) as f64, state.step(Action::Up));
        }
    }

    c.bench_function("tabular_choose_action", |b| {
        b.iter(|| agent.choose_action(black_box(Position::new(50, 50))))
    });
}

fn bench_dqn_replay(c: &mut Criterion) {
    let mut agent = DqnAgentBuilder::new(2, 4).batch_size(32).build();
    for i in 0..512 {
        let position = Position::new(i % 20, i / 20);
        agent.remember(
            position.to_state(),
            (i as usize) % 4,
            (i % 10) as f32,
            position.step(Action::Up).to_state(),
            false,
        );
    }

    c.bench_function("dqn_replay_batch_32", |b| {
        b.iter(|| agent.replay(black_box(32)).unwrap())
    });
}

fn bench_dqn_choose_action(c: &mut Criterion) {
    let mut agent = DqnAgentBuilder::new(2, 4).epsilon(0.0).epsilon_min(0.0).build();
    let state = Position::new(3, 4).to_state();

    c.bench_function("dqn_choose_action", |b| {
        b.iter(|| agent.choose_action(black_box(state.view())))
    });
}

criterion_group!(
    benches,
    bench_tabular_backup,
    bench_tabular_choose_action,
    bench_dqn_replay,
    bench_dqn_choose_action
);
criterion_main!(benches);
