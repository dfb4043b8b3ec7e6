use ndarray::array;

use crate::types::{calculate_directions, Action, Position};

#[test]
fn test_action_deltas() {
    let position = Position::new(2, 3);
    assert_eq!(position.step(Action::Up), Position::new(2, 4));
    assert_eq!(position.step(Action::Down), Position::new(2, 2));
    assert_eq!(position.step(Action::Left), Position::new(1, 3));
    assert_eq!(position.step(Action::Right), Position::new(3, 3));
}

#[test]
fn test_step_does_not_mutate_original() {
    let position = Position::new(0, 0);
    let _ = position.step(Action::Right);
    assert_eq!(position, Position::new(0, 0));
}

#[test]
fn test_action_index_round_trip() {
    for action in Action::ALL {
        assert_eq!(Action::from_index(action.index()), action);
    }
}

#[test]
fn test_action_display_names() {
    let names: Vec<String> = Action::ALL.iter().map(|a| a.to_string()).collect();
    assert_eq!(names, vec!["left", "right", "up", "down"]);
}

#[test]
fn test_state_vector() {
    assert_eq!(Position::new(-2, 7).to_state(), array![-2.0, 7.0]);
}

#[test]
fn test_directions_single_axis() {
    let origin = Position::new(0, 0);
    assert_eq!(
        calculate_directions(origin, Position::new(0, 1)),
        vec!["Move north by 1 meter(s)"]
    );
    assert_eq!(
        calculate_directions(origin, Position::new(0, -1)),
        vec!["Move south by 1 meter(s)"]
    );
    assert_eq!(
        calculate_directions(origin, Position::new(1, 0)),
        vec!["Move east by 1 meter(s)"]
    );
    assert_eq!(
        calculate_directions(origin, Position::new(-1, 0)),
        vec!["Move west by 1 meter(s)"]
    );
}

#[test]
fn test_directions_both_axes_zero_delta_omitted() {
    let directions = calculate_directions(Position::new(2, 3), Position::new(4, 1));
    assert_eq!(
        directions,
        vec!["Move south by 2 meter(s)", "Move east by 2 meter(s)"]
    );

    // No movement, no hints
    let none = calculate_directions(Position::new(5, 5), Position::new(5, 5));
    assert!(none.is_empty());
}
