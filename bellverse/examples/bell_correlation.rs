use amplimer::{measure, BasisLabel, Gate, StateVector};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let mut rng = StdRng::seed_from_u64(2024);

    // Run many independent shots to collect statistics
    let mut counts = [[0usize; 2]; 2];

    for _ in 0..1000 {
        // Each shot starts from a fresh |00⟩
        let mut state = StateVector::prepare(&[BasisLabel::Zero, BasisLabel::Zero]).unwrap();

        state.apply(Gate::Hadamard(0)).unwrap();
        state.apply(Gate::ControlledX { control: 0, target: 1 }).unwrap();

        let outcome = measure(&mut state, &[0, 1], &mut rng).unwrap();
        counts[usize::from(outcome.bit(0))][usize::from(outcome.bit(1))] += 1;
    }

    println!("q0=0 q1=0: {} times", counts[0][0]);
    println!("q0=0 q1=1: {} times", counts[0][1]);
    println!("q0=1 q1=0: {} times", counts[1][0]);
    println!("q0=1 q1=1: {} times", counts[1][1]);
    println!("\nThe mixed outcomes never occur: both qubits always agree");
}
