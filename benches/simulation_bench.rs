use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use physics2d::{collision, BodyType, Material, PhysicsConfig, PhysicsWorld, RigidBody, Vec2};

// --- Helpers for building scenes ---
fn world_with_floor() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(PhysicsConfig::default().with_grid_cell_size(100.0));
    let mut floor = RigidBody::new(BodyType::Static, Material::default()).at(Vec2::new(0.0, 500.0));
    floor
        .add_box(2000.0, 40.0, Vec2::ZERO)
        .expect("floor extents are positive");
    world.add_body(floor);
    world
}

fn run_steps(world: &mut PhysicsWorld, steps: usize) {
    let dt = 1.0 / 60.0;
    for _ in 0..steps {
        world.step(black_box(dt));
    }
}

fn run_circle_pile_bench(num_circles: usize) {
    let mut world = world_with_floor();
    let radius = 8.0;
    let per_row = 40;

    for i in 0..num_circles {
        let x = (i % per_row) as f64 * radius * 2.1 - 400.0;
        let y = 400.0 - (i / per_row) as f64 * radius * 2.1;
        let mut body = RigidBody::new(BodyType::Normal, Material::default()).at(Vec2::new(x, y));
        body.add_circle(radius, Vec2::ZERO).expect("radius is positive");
        world.add_body(body);
    }

    run_steps(&mut world, 30);
}

fn run_box_pile_bench(num_boxes: usize) {
    let mut world = world_with_floor();
    let size = 16.0;
    let per_row = 30;

    for i in 0..num_boxes {
        let x = (i % per_row) as f64 * size * 1.5 - 360.0;
        let y = 400.0 - (i / per_row) as f64 * size * 1.5;
        let mut body = RigidBody::new(BodyType::Normal, Material::default()).at(Vec2::new(x, y));
        body.add_box(size, size, Vec2::ZERO).expect("box extents are positive");
        world.add_body(body);
    }

    run_steps(&mut world, 30);
}

// Circles falling onto a static floor
fn bench_circle_pile(c: &mut Criterion) {
    let mut group = c.benchmark_group("circle_pile");

    for num_circles in [10, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_circles), num_circles, |b, &n| {
            b.iter(|| run_circle_pile_bench(black_box(n)));
        });
    }
    group.finish();
}

// Boxes falling onto a static floor
fn bench_box_pile(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_pile");

    for num_boxes in [10, 100, 300].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_boxes), num_boxes, |b, &n| {
            b.iter(|| run_box_pile_bench(black_box(n)));
        });
    }
    group.finish();
}

// Long diagonal ray over a sparse tile map
fn bench_raycast(c: &mut Criterion) {
    c.bench_function("raycast_diagonal", |b| {
        b.iter(|| {
            collision::cast(
                black_box(Vec2::new(3.0, 7.0)),
                black_box(Vec2::new(9000.0, 6000.0)),
                Vec2::splat(16.0),
                |(col, row)| col == 500 && row > 300,
            )
        });
    });
}

criterion_group!(benches, bench_circle_pile, bench_box_pile, bench_raycast);
criterion_main!(benches);
