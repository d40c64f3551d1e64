use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hunt_bot::{AStarPlanner, AgentParams, SearchAgent, Strategy};
use hunt_core::grid::{GridBuilder, World};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn world_for(seed: u64, dim: usize) -> World {
    let builder = GridBuilder::new(dim, 0.3).expect("valid builder");
    World::generate(&builder, &mut SmallRng::seed_from_u64(seed)).expect("connected world")
}

fn astar_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("astar");
    for dim in [25usize, 50] {
        let world = world_for(7, dim);
        let (start, goal) = (world.start(), world.target());
        group.bench_function(format!("plan_{dim}"), |b| {
            let mut grid = world.grid().clone();
            b.iter(|| black_box(AStarPlanner::new().plan(&mut grid, start, goal)))
        });
    }
    group.finish();
}

fn hunt_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("hunt");
    group.sample_size(10);
    for strategy in Strategy::ALL {
        let world = world_for(11, 20);
        let agent = SearchAgent::new(AgentParams::new(strategy, 200_000));
        group.bench_function(format!("hunt_{strategy}"), |b| {
            b.iter(|| {
                let mut w = world.clone();
                black_box(agent.run(&mut w, &mut SmallRng::seed_from_u64(3)))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, astar_bench, hunt_bench);
criterion_main!(benches);
