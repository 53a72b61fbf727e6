use std::thread;

use multitape::{Machine, Outcome, ProgramManager, DEFAULT_MAX_STEPS};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn machine_and_outcome_cross_threads() {
    assert_send_sync::<Machine>();
    assert_send_sync::<Outcome>();
}

#[test]
fn concurrent_runs_match_sequential_runs() {
    let program = ProgramManager::get_program_by_name("Binary addition").unwrap();
    let machine = Machine::from_program(&program).unwrap();

    let inputs: Vec<String> = (0u32..16)
        .map(|a| format!("{:b}+{:b}=", a * 7, a + 3))
        .collect();

    let sequential: Vec<Outcome> = inputs
        .iter()
        .map(|input| machine.run(input, DEFAULT_MAX_STEPS).unwrap())
        .collect();

    let concurrent: Vec<Outcome> = thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let machine = &machine;
                scope.spawn(move || machine.run(input, DEFAULT_MAX_STEPS).unwrap())
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(concurrent, sequential);
    assert!(concurrent.iter().all(Outcome::is_accepted));
}
