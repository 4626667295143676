//! Playfield tests - movement, landing, sweeping and spawning

use blockfall::core::{
    collides, merge, shape_for, spawn_position, sweep_rows, ActivePiece, DropStep, Matrix,
    Playfield, Position, ScriptedSource,
};
use blockfall::types::{PieceType, Shift, Spin};

fn playfield(kinds: &[PieceType]) -> Playfield<ScriptedSource> {
    Playfield::new(10, 20, ScriptedSource::new(kinds.to_vec()).unwrap())
}

#[test]
fn test_sweep_preserves_order_of_remaining_rows() {
    let mut field = Matrix::new(4, 10);
    let full = [2, 5, 7];

    for y in 0..10 {
        if full.contains(&y) {
            for x in 0..4 {
                field.set(x, y, 9).unwrap();
            }
        } else {
            // One distinct marker per partial row
            field.set(y % 4, y, (y + 1) as u8).unwrap();
        }
    }
    let before = field.clone();

    assert_eq!(sweep_rows(&mut field), 3);

    // Three new empty rows on top
    for y in 0..3 {
        assert!(field.row(y).iter().all(|&c| c == 0), "row {y} should be empty");
    }

    // Remaining rows keep their relative order
    let kept: Vec<usize> = (0..10).filter(|y| !full.contains(&(*y as i32))).collect();
    for (i, old_y) in kept.iter().enumerate() {
        assert_eq!(field.row(3 + i), before.row(*old_y));
    }
}

#[test]
fn test_sweep_without_full_rows() {
    let mut field = Matrix::new(10, 20);
    field.set(0, 19, 1).unwrap();
    let before = field.clone();

    assert_eq!(sweep_rows(&mut field), 0);
    assert_eq!(field, before);
}

#[test]
fn test_merge_writes_only_piece_cells() {
    let mut field = Matrix::new(10, 20);
    field.set(0, 19, 3).unwrap();
    let piece = ActivePiece::new(PieceType::T, Position::new(4, 10));

    merge(&mut field, &piece);

    assert_eq!(field.occupied_count(), 5);
    assert_eq!(field.get(0, 19), Some(3));
    for (x, y) in [(5, 10), (4, 11), (5, 11), (6, 11)] {
        assert_eq!(field.get(x, y), Some(6));
    }
}

#[test]
fn test_merge_skips_cells_outside_field() {
    let mut field = Matrix::new(10, 20);
    // Horizontal I hanging one column off the left wall
    let piece = ActivePiece::new(PieceType::I, Position::new(-1, 0));

    merge(&mut field, &piece);

    assert_eq!(field.occupied_count(), 3);
    assert_eq!(field.row(1)[..4], [1, 1, 1, 0]);
}

#[test]
fn test_spawn_is_centered() {
    // Occupied columns after spawning each piece on a 10-wide field
    let expected = [
        (PieceType::I, 3..=6),
        (PieceType::J, 4..=6),
        (PieceType::L, 4..=6),
        (PieceType::O, 4..=5),
        (PieceType::S, 4..=6),
        (PieceType::T, 4..=6),
        (PieceType::Z, 4..=6),
    ];

    for (kind, columns) in expected {
        let mut pf = playfield(&[kind]);
        assert!(pf.spawn());

        let piece = pf.active().unwrap();
        let xs: Vec<i32> = piece.cells().map(|(x, _, _)| x).collect();
        assert_eq!(xs.iter().min(), Some(columns.start()), "{kind}");
        assert_eq!(xs.iter().max(), Some(columns.end()), "{kind}");
        assert!(piece.cells().all(|(_, y, _)| y <= 1), "{kind}");
    }
}

#[test]
fn test_spawn_position_on_narrow_field() {
    // Never pushed so far left that occupied cells leave the field
    let shape = shape_for(PieceType::I);
    assert_eq!(spawn_position(4, &shape), Position::new(0, 0));
}

#[test]
fn test_move_never_enters_collision() {
    let mut pf = playfield(&[PieceType::J]);
    pf.spawn();

    for _ in 0..12 {
        pf.move_horizontal(Shift::Left);
        let piece = pf.active().unwrap();
        assert!(!collides(pf.field(), piece.shape(), piece.position()));
    }
    assert_eq!(pf.active().unwrap().position().x, 0);

    for _ in 0..12 {
        pf.move_horizontal(Shift::Right);
        let piece = pf.active().unwrap();
        assert!(!collides(pf.field(), piece.shape(), piece.position()));
    }
    assert_eq!(pf.active().unwrap().position().x, 7);
}

#[test]
fn test_blocked_rotation_is_a_no_op() {
    // Only the top two rows are free, so a horizontal I has no room to stand up
    let mut field = Matrix::new(10, 20);
    for y in 2..20 {
        for x in 0..10 {
            field.set(x, y, 7).unwrap();
        }
    }
    let mut pf = Playfield::from_field(field.clone(), ScriptedSource::repeat(PieceType::I));
    assert!(pf.place_piece(PieceType::I, Position::new(3, 0)));
    let before = pf.active().unwrap().clone();

    assert!(!pf.rotate(Spin::Clockwise));
    assert!(!pf.rotate(Spin::CounterClockwise));

    assert_eq!(pf.active().unwrap(), &before);
    assert_eq!(pf.active().unwrap().shape(), &shape_for(PieceType::I));
    assert_eq!(pf.field(), &field);
}

#[test]
fn test_rotation_kicks_at_the_walls() {
    // T against the left wall: corrected column -1 is outside, kicked to 0
    let mut pf = playfield(&[PieceType::T]);
    pf.spawn();
    while pf.move_horizontal(Shift::Left) {}
    assert!(pf.rotate(Spin::Clockwise));
    assert_eq!(pf.active().unwrap().position(), Position::new(0, 0));

    // Stem-left T against the right wall: grid at 8 and 9 overhangs, kicked to 7
    let mut pf = playfield(&[PieceType::T]);
    pf.spawn();
    assert!(pf.rotate(Spin::CounterClockwise));
    while pf.move_horizontal(Shift::Right) {}
    assert_eq!(pf.active().unwrap().position(), Position::new(8, 0));
    assert!(pf.rotate(Spin::Clockwise));
    assert_eq!(pf.active().unwrap().position(), Position::new(7, 0));

    // Vertical I against the left wall lies down flush with it
    let mut pf = playfield(&[PieceType::I]);
    pf.spawn();
    assert!(pf.rotate(Spin::Clockwise));
    while pf.move_horizontal(Shift::Left) {}
    assert_eq!(pf.active().unwrap().position(), Position::new(-2, 0));
    assert!(pf.rotate(Spin::CounterClockwise));
    let piece = pf.active().unwrap();
    assert_eq!(piece.position(), Position::new(0, 0));
    let cells: Vec<_> = piece.cells().map(|(x, y, _)| (x, y)).collect();
    assert_eq!(cells, vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
}

#[test]
fn test_soft_drop_lands_on_floor() {
    let mut pf = playfield(&[PieceType::O, PieceType::T]);
    pf.spawn();

    let mut falls = 0;
    loop {
        match pf.soft_drop_one_step() {
            DropStep::Fell => falls += 1,
            DropStep::Landed(landing) => {
                assert_eq!(landing.lines_cleared, 0);
                assert!(!landing.game_over);
                break;
            }
            DropStep::Idle => panic!("piece vanished"),
        }
    }

    assert_eq!(falls, 18);
    assert_eq!(pf.field().occupied_count(), 4);
    assert_eq!(pf.active().unwrap().kind(), PieceType::T);
}

#[test]
fn test_hard_drop_clears_and_spawns() {
    let mut field = Matrix::new(10, 20);
    for x in 0..10 {
        if !(4..=5).contains(&x) {
            field.set(x, 19, 2).unwrap();
            field.set(x, 18, 2).unwrap();
        }
    }
    let mut pf = Playfield::from_field(field, ScriptedSource::repeat(PieceType::O));
    assert!(pf.spawn());

    let landing = pf.hard_drop().unwrap();
    assert_eq!(landing.lines_cleared, 2);
    assert_eq!(pf.field().occupied_count(), 0);
    assert!(pf.active().is_some());
}

#[test]
fn test_blocked_spawn_for_every_piece_type() {
    let mut field = Matrix::new(10, 20);
    for y in 0..2 {
        for x in 0..10 {
            field.set(x, y, 1).unwrap();
        }
    }

    for kind in PieceType::ALL {
        let mut pf = Playfield::from_field(field.clone(), ScriptedSource::repeat(kind));
        assert!(!pf.spawn(), "{kind} should not fit");
        assert!(pf.is_game_over());
        assert!(pf.active().is_none());
        assert_eq!(pf.field(), &field);
    }
}
