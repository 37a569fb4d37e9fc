use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use indoc::indoc;

use maze_stepper::algorithm::Algorithm;
use maze_stepper::grid::Maze;
use maze_stepper::stepper::SearchStepper;

const MAZE: &str = indoc! {"
  2000000001
  1110111010
  1000100010
  1011101110
  1000001000
  1101111011
  1000000010
  1011111010
  1000100000
  1110101113
"};

fn solve(maze: &Maze, algorithm: Algorithm) -> usize {
    let mut stepper = SearchStepper::new(maze, algorithm);
    while !stepper.phase().is_terminal() {
        let _ = stepper.advance();
    }
    stepper.explored_count()
}

fn compare_algorithms(c: &mut Criterion) {
    let maze = Maze::try_from(MAZE).unwrap();

    let mut group = c.benchmark_group("Maze stepping");
    for algorithm in Algorithm::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithm),
            &maze,
            |b, maze| b.iter(|| solve(maze, algorithm)),
        );
    }
    group.finish();
}

criterion_group!(benches, compare_algorithms);
criterion_main!(benches);
