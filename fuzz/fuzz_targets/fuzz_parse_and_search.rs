#![no_main]

use libfuzzer_sys::fuzz_target;

use maze_stepper::algorithm::Algorithm;
use maze_stepper::grid::Maze;
use maze_stepper::stepper::SearchStepper;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(maze) = Maze::try_from(text) else {
        return;
    };

    for algorithm in Algorithm::ALL {
        let mut stepper = SearchStepper::new(&maze, algorithm);
        while !stepper.phase().is_terminal() {
            stepper.advance().expect("stepping a live search never fails");
        }
        let outcome = stepper.outcome().expect("terminal searches have outcomes");
        assert!(outcome.explored >= 1);
    }
});
