use super::*;

fn scenario_board() -> Board {
    // 3x3: A B A / B C B / A B A
    let labels = ["A", "B", "A", "B", "C", "B", "A", "B", "A"]
        .into_iter()
        .map(String::from)
        .collect();
    Board::new(3, 3, labels).unwrap()
}

#[tokio::test]
async fn look_reflects_all_down_initially() {
    let board = scenario_board();
    let snapshot = board.look("alice").await;
    let mut lines = snapshot.lines();
    assert_eq!(lines.next(), Some("3x3"));
    for line in lines {
        assert_eq!(line, "down");
    }
}

#[tokio::test]
async fn look_after_look_is_stable() {
    let board = scenario_board();
    let first = board.look("alice").await;
    let second = board.look("alice").await;
    assert_eq!(first, second);
}

// S1: a successful-match turn removes both cells, then a mismatch hides them.
#[tokio::test]
async fn s1_match_then_next_turn_mismatch() {
    let board = scenario_board();

    let snap = board.flip("alice", 0, 0).await.unwrap();
    assert_eq!(line(&snap, 1), "my A");

    let snap = board.flip("alice", 0, 2).await.unwrap();
    assert_eq!(line(&snap, 1), "my A");
    assert_eq!(line(&snap, 3), "my A");

    let snap = board.flip("alice", 1, 0).await.unwrap();
    assert_eq!(line(&snap, 1), "none");
    assert_eq!(line(&snap, 3), "none");
    assert_eq!(line(&snap, 4), "my B");
}

// S2: a waiter on a cell that gets removed by a match fails with NoCardHere.
#[tokio::test]
async fn s2_waiter_on_removed_cell_fails() {
    let board = scenario_board();

    board.flip("alice", 0, 0).await.unwrap();

    let bob_board = &board;
    let bob = async move { bob_board.flip("bob", 0, 0).await };

    let alice_turn = async {
        // give bob a chance to enqueue as a waiter on (0,0)
        tokio::task::yield_now().await;
        board.flip("alice", 2, 2).await.unwrap(); // match, removes (0,0) and (2,2)
        board.flip("alice", 1, 1).await.unwrap(); // next turn's Step A wakes bob
    };

    let (bob_result, _) = tokio::join!(bob, alice_turn);
    assert_eq!(bob_result, Err(FlipError::NoCardHere));
}

// S3: a waiter resumes owning the cell after the holder mismatches.
#[tokio::test]
async fn s3_waiter_wakes_with_ownership_on_mismatch() {
    let board = scenario_board();

    board.flip("alice", 0, 0).await.unwrap();

    let bob_board = &board;
    let bob = async move { bob_board.flip("bob", 0, 0).await };

    let alice_turn = async {
        tokio::task::yield_now().await;
        board.flip("alice", 1, 0).await.unwrap(); // mismatch A vs B
    };

    let (bob_result, _) = tokio::join!(bob, alice_turn);
    let snapshot = bob_result.unwrap();
    assert_eq!(line(&snapshot, 1), "my A");
}

// S4: of two concurrent waiters, exactly one resolves immediately.
#[tokio::test]
async fn s4_exactly_one_of_two_waiters_wakes() {
    let board = scenario_board();
    board.flip("alice", 0, 0).await.unwrap();

    let board_ref = &board;
    let bob = async move { board_ref.flip("bob", 0, 0).await };
    let carol = async move { board_ref.flip("carol", 0, 0).await };

    let alice_turn = async {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        board.flip("alice", 1, 0).await.unwrap(); // mismatch
    };

    let (bob_result, carol_result, _) = tokio::join!(
        tokio::time::timeout(std::time::Duration::from_millis(50), bob),
        tokio::time::timeout(std::time::Duration::from_millis(50), carol),
        alice_turn
    );

    let bob_done = bob_result.is_ok();
    let carol_done = carol_result.is_ok();
    assert!(bob_done ^ carol_done, "exactly one waiter should resolve");
}

// S5: Map rewrites every still-present "A" cell to "Z" while the board stays
// face-down throughout.
#[tokio::test]
async fn s5_map_rewrites_matching_labels() {
    let board = scenario_board();

    let snapshot = board
        .map("carol", |label| async move {
            Ok(if label == "A" { "Z".to_string() } else { label })
        })
        .await
        .unwrap();

    for line_text in snapshot.lines().skip(1) {
        assert_eq!(line_text, "down");
    }

    for &pos in &[(0usize, 0usize), (0, 2), (2, 0), (2, 2)] {
        let snap = board.flip("checker", pos.0, pos.1).await.unwrap();
        assert_eq!(line(&snap, idx(pos, 3) + 1), "my Z");
        // relinquish: flip a B cell as the mismatching second card.
        board.flip("checker", 1, 0).await.unwrap();
    }
}

#[tokio::test]
async fn flip_out_of_range_is_invalid_coordinates() {
    let board = scenario_board();
    let err = board.flip("alice", 5, 5).await.unwrap_err();
    assert_eq!(
        err,
        FlipError::InvalidCoordinates { row: 5, col: 5, rows: 3, cols: 3 }
    );
}

#[tokio::test]
async fn flip_on_removed_cell_is_no_card_here() {
    let board = scenario_board();
    board.flip("alice", 0, 0).await.unwrap();
    board.flip("alice", 0, 2).await.unwrap(); // match removes both
    board.flip("alice", 1, 1).await.unwrap(); // finalize the match
    let err = board.flip("alice", 0, 0).await.unwrap_err();
    assert_eq!(err, FlipError::NoCardHere);
}

#[tokio::test]
async fn second_card_on_controlled_cell_is_target_controlled_and_relinquishes_first() {
    let board = scenario_board();
    board.flip("alice", 0, 0).await.unwrap();
    board.flip("bob", 1, 0).await.unwrap(); // bob now controls (1,0) as his first card

    let err = board.flip("alice", 1, 0).await.unwrap_err();
    assert_eq!(err, FlipError::TargetControlled);

    // alice's first card was relinquished; she can start a fresh turn on it.
    let snap = board.flip("alice", 0, 0).await.unwrap();
    assert_eq!(line(&snap, 1), "my A");
}

#[tokio::test]
async fn unknown_player_first_flip_lazily_initializes_record() {
    let board = scenario_board();
    let snapshot = board.flip("never-seen-before", 0, 0).await.unwrap();
    assert_eq!(line(&snapshot, 1), "my A");
}

fn line(snapshot: &str, index: usize) -> &str {
    snapshot.lines().nth(index).unwrap()
}
